//! Page body rendering.
//!
//! [`HtmlContent`] turns each [`SiteNode`] into the HTML fragment placed
//! inside the page shell. It only reads the classified, resolved view the
//! site tree already carries.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use refdoc_model::{Documented, TypeDef, TypeKind};
use refdoc_site::naming::{group_slug, namespace_slug};
use refdoc_site::{
    Classification, ExtensionGroup, MemberKind, MemberRef, Origin, Page, SiteNode, ViewedMember,
    member_label,
};

use crate::printer::TypePrinter;

/// Produces the body fragment of a page.
pub trait ContentRenderer: Sync {
    /// Render the body of a node's page.
    fn render(&self, node: &SiteNode<'_>) -> String;
}

/// HTML body renderer.
#[derive(Clone, Copy, Debug)]
pub struct HtmlContent<'r, 'a> {
    printer: TypePrinter<'r, 'a>,
}

impl ContentRenderer for HtmlContent<'_, '_> {
    fn render(&self, node: &SiteNode<'_>) -> String {
        match &node.page {
            Page::Root => self.root(node),
            Page::Namespace { name, types } => self.namespace(node, name, types),
            Page::ExtensionMethods { namespace, groups } => self.extension_methods(namespace, groups),
            Page::Type { ty, classification } => self.type_page(ty, classification),
            Page::MemberGroup { ty, kind, members } => self.member_group(ty, *kind, members),
            Page::Member(member) => self.member(member),
        }
    }
}

impl<'r, 'a> HtmlContent<'r, 'a> {
    /// Create a renderer printing declarations with `printer`.
    pub fn new(printer: TypePrinter<'r, 'a>) -> Self {
        Self { printer }
    }

    fn href(&self, slug: &refdoc_site::Slug) -> String {
        self.printer.resolver().href(slug)
    }

    fn root(&self, node: &SiteNode<'_>) -> String {
        let mut html = String::from("<h1>Namespaces</h1>\n");
        if node.children.is_empty() {
            html.push_str("<p class=\"empty\">No documented namespaces.</p>\n");
            return html;
        }

        html.push_str("<table class=\"listing\">\n<tr><th>Namespace</th><th>Types</th></tr>\n");
        for child in &node.children {
            let count = match &child.page {
                Page::Namespace { types, .. } => types.len(),
                _ => 0,
            };
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{count}</td></tr>",
                anchor(&self.href(&child.slug), &child.label)
            );
        }
        html.push_str("</table>\n");
        html
    }

    fn namespace(&self, node: &SiteNode<'_>, name: &str, types: &[TypeDef]) -> String {
        let mut html = format!("<h1>{} Namespace</h1>\n", encode_text(&node.label));

        for (kind, heading) in [
            (TypeKind::Class, "Classes"),
            (TypeKind::Struct, "Structs"),
            (TypeKind::Interface, "Interfaces"),
            (TypeKind::Enum, "Enums"),
        ] {
            let of_kind: Vec<&TypeDef> = types.iter().filter(|t| t.kind == kind).collect();
            if of_kind.is_empty() {
                continue;
            }
            let _ = writeln!(html, "<h2>{heading}</h2>");
            html.push_str("<table class=\"listing\">\n");
            for ty in of_kind {
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td>{}</td></tr>",
                    self.printer.type_def(ty),
                    summary_inline(ty.summary())
                );
            }
            html.push_str("</table>\n");
        }

        let extensions = node
            .children
            .iter()
            .find(|child| matches!(child.page, Page::ExtensionMethods { .. }));
        if let Some(extensions) = extensions {
            let _ = writeln!(
                html,
                "<h2>Extension Methods</h2>\n<p>{}</p>",
                anchor(
                    &self.href(&extensions.slug),
                    &format!("Extension methods declared in {name}")
                )
            );
        }
        html
    }

    fn extension_methods(&self, namespace: &str, groups: &[ExtensionGroup<'_>]) -> String {
        let mut html = format!("<h1>{} Extension Methods</h1>\n", encode_text(namespace));
        for group in groups {
            let _ = writeln!(html, "<h2>Extensions for {}</h2>", self.printer.type_ref(group.target));
            html.push_str(&self.member_table(&group.methods));
        }
        html
    }

    fn type_page(&self, ty: &TypeDef, classification: &Classification<'_>) -> String {
        let mut html = format!(
            "<h1>{} {}</h1>\n",
            encode_text(&ty.display_name()),
            kind_title(ty.kind)
        );
        html.push_str(&summary_block(ty.summary()));
        let _ = writeln!(
            html,
            "<p class=\"namespace\">Namespace: {}</p>",
            anchor(&self.href(&namespace_slug(&ty.namespace)), namespace_label(&ty.namespace))
        );
        html.push_str(&syntax_block(&self.printer.type_syntax(ty)));

        if let Some(base) = classification.base_type {
            let _ = writeln!(
                html,
                "<p class=\"inherits\">Inherits from {}</p>",
                self.printer.type_ref(base)
            );
        }
        self.type_list(&mut html, "Derived Types", &classification.derived_types);
        if !classification.implemented_interfaces.is_empty() {
            html.push_str("<h2>Implements</h2>\n<ul>\n");
            for interface in &classification.implemented_interfaces {
                let _ = writeln!(html, "<li>{}</li>", self.printer.type_ref(interface));
            }
            html.push_str("</ul>\n");
        }
        self.type_list(&mut html, "Implementors", &classification.implementors);

        if ty.kind == TypeKind::Enum {
            html.push_str(&enum_values(ty));
            return html;
        }

        for kind in MemberKind::ALL {
            let members: Vec<ViewedMember<'_>> = classification.members(kind).copied().collect();
            if members.is_empty() {
                continue;
            }
            let _ = writeln!(
                html,
                "<h2>{}</h2>",
                anchor(&self.href(&group_slug(ty, kind)), kind.label())
            );
            html.push_str(&self.member_table(&members));
        }
        html
    }

    fn type_list(&self, html: &mut String, heading: &str, types: &[&TypeDef]) {
        if types.is_empty() {
            return;
        }
        let _ = writeln!(html, "<h2>{heading}</h2>\n<ul>");
        for ty in types {
            let _ = writeln!(html, "<li>{}</li>", self.printer.type_def(ty));
        }
        html.push_str("</ul>\n");
    }

    fn member_group(&self, ty: &TypeDef, kind: MemberKind, members: &[ViewedMember<'_>]) -> String {
        let mut html = format!(
            "<h1>{} {}</h1>\n",
            self.printer.type_def(ty),
            kind.label()
        );
        html.push_str(&self.member_table(members));
        html
    }

    fn member_table(&self, members: &[ViewedMember<'_>]) -> String {
        let mut html = String::from("<table class=\"members\">\n");
        for member in members {
            let caption = match member.origin {
                Origin::Declared => String::new(),
                Origin::Inherited => format!(
                    " <span class=\"origin\">(inherited from {})</span>",
                    self.printer.type_def(member.owner)
                ),
                Origin::Extension => format!(
                    " <span class=\"origin\">(extension from {})</span>",
                    self.printer.type_def(member.owner)
                ),
            };
            let _ = writeln!(
                html,
                "<tr><td>{}{caption}</td><td>{}</td></tr>",
                anchor(&self.href(&member.slug()), &member_label(member)),
                summary_inline(member.summary())
            );
        }
        html.push_str("</table>\n");
        html
    }

    fn member(&self, member: &ViewedMember<'_>) -> String {
        let owner = member.owner;
        let mut html = format!(
            "<h1>{}.{} {}</h1>\n",
            encode_text(&owner.display_name()),
            encode_text(&member_label(member)),
            kind_word(member)
        );
        html.push_str(&summary_block(member.summary()));
        let _ = writeln!(
            html,
            "<p class=\"declaring-type\">Declared in {}</p>",
            self.printer.type_def(owner)
        );

        let (syntax, parameters, returns) = match member.member {
            MemberRef::Constructor(ctor) => (
                self.printer.constructor_syntax(owner, ctor),
                ctor.parameters.as_slice(),
                None,
            ),
            MemberRef::Property(property) => (
                self.printer.property_syntax(owner, property),
                [].as_slice(),
                Some(&property.property_type),
            ),
            MemberRef::Method(method) => (
                self.printer.method_syntax(owner, method),
                method.parameters.as_slice(),
                Some(&method.return_type),
            ),
        };
        html.push_str(&syntax_block(&syntax));

        if !parameters.is_empty() {
            html.push_str("<h2>Parameters</h2>\n<dl class=\"parameters\">\n");
            for parameter in parameters {
                let _ = writeln!(
                    html,
                    "<dt>{}</dt><dd>{}</dd>",
                    encode_text(&parameter.name),
                    self.printer.type_ref(&parameter.parameter_type)
                );
            }
            html.push_str("</dl>\n");
        }
        if let Some(returns) = returns {
            let heading = match member.member {
                MemberRef::Property(_) => "Property Value",
                _ => "Returns",
            };
            let _ = writeln!(html, "<h2>{heading}</h2>\n<p>{}</p>", self.printer.type_ref(returns));
        }
        html
    }
}

fn anchor(href: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(href),
        encode_text(label)
    )
}

/// Summary paragraph, or an explicit empty placeholder.
fn summary_block(summary: Option<&str>) -> String {
    match summary {
        Some(text) => format!("<p class=\"summary\">{}</p>\n", encode_text(text)),
        None => "<p class=\"summary empty\"></p>\n".to_owned(),
    }
}

fn summary_inline(summary: Option<&str>) -> String {
    summary.map(|s| encode_text(s).into_owned()).unwrap_or_default()
}

fn syntax_block(syntax: &str) -> String {
    format!("<h2>Syntax</h2>\n<pre class=\"syntax\"><code>{syntax}</code></pre>\n")
}

fn enum_values(ty: &TypeDef) -> String {
    if ty.enum_values.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        "<h2>Values</h2>\n<table class=\"enum-values\">\n<tr><th>Name</th><th>Value</th><th>Description</th></tr>\n",
    );
    for value in &ty.enum_values {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            encode_text(&value.name),
            value.value,
            summary_inline(value.summary())
        );
    }
    html.push_str("</table>\n");
    html
}

fn kind_title(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Class => "Class",
        TypeKind::Struct => "Struct",
        TypeKind::Interface => "Interface",
        TypeKind::Enum => "Enum",
    }
}

fn kind_word(member: &ViewedMember<'_>) -> &'static str {
    match member.member {
        MemberRef::Constructor(_) => "Constructor",
        MemberRef::Property(_) => "Property",
        MemberRef::Method(_) => "Method",
    }
}

fn namespace_label(namespace: &str) -> &str {
    if namespace.is_empty() {
        refdoc_site::GLOBAL_NAMESPACE_LABEL
    } else {
        namespace
    }
}
