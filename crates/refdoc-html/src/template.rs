//! HTML page shell for static site generation.
//!
//! The navigation and footer fragments are rendered once per run and
//! injected verbatim into every page, so the sidebar and generation time
//! are identical across the whole site.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use refdoc_site::{BreadcrumbItem, NavItem, Navigation};

/// Stylesheet shared by all pages.
pub const STYLESHEET: &str = "style.css";

/// Default stylesheet contents.
pub const DEFAULT_CSS: &str = "\
body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; }
.layout { display: flex; min-height: 100vh; }
aside.sidebar { width: 280px; flex-shrink: 0; border-right: 1px solid #e5e7eb; padding: 1.5rem 1rem; overflow-y: auto; }
aside.sidebar ul { list-style: none; margin: 0; padding-left: 0.75rem; }
aside.sidebar a { color: #374151; text-decoration: none; font-size: 0.875rem; }
main { flex: 1; min-width: 0; padding: 1.5rem 2rem 3rem; }
.breadcrumbs ol { display: flex; list-style: none; padding: 0; color: #4b5563; font-size: 0.875rem; }
.breadcrumb-item::after { content: \"/\"; margin: 0 0.5rem; color: #9ca3af; }
.breadcrumb-item:last-child::after { content: none; }
pre.syntax { background: #f3f4f6; padding: 0.75rem 1rem; overflow-x: auto; }
table { border-collapse: collapse; }
td, th { border-bottom: 1px solid #e5e7eb; padding: 0.25rem 0.75rem; text-align: left; vertical-align: top; }
.summary.empty { display: none; }
.origin { color: #6b7280; font-size: 0.875rem; }
footer { border-top: 1px solid #e5e7eb; margin-top: 3rem; padding-top: 1rem; color: #6b7280; font-size: 0.75rem; }
";

/// All data needed to render a page.
pub struct PageData<'p> {
    /// Page title.
    pub title: &'p str,
    /// Site title, appended to the page title.
    pub site_title: &'p str,
    /// Rendered page body.
    pub html_content: &'p str,
    /// Breadcrumbs from the root to the page's parent.
    pub breadcrumbs: &'p [BreadcrumbItem],
    /// Shared navigation sidebar fragment.
    pub navigation: &'p str,
    /// Shared footer fragment.
    pub footer: &'p str,
}

/// Render a complete HTML page.
pub fn render_page(page: &PageData<'_>) -> String {
    let mut html = String::with_capacity(page.navigation.len() + page.html_content.len() + 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>{} - {}</title>",
        encode_text(page.title),
        encode_text(page.site_title)
    );
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{STYLESHEET}\">");
    html.push_str("</head>\n<body>\n");

    html.push_str("<div class=\"layout\">\n");
    html.push_str(page.navigation);

    html.push_str("<main>\n");
    render_breadcrumbs(&mut html, page.breadcrumbs);
    html.push_str("<article>\n");
    html.push_str(page.html_content);
    html.push_str("</article>\n");
    html.push_str(page.footer);
    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

/// Render the navigation sidebar shared by every page.
pub fn render_navigation(navigation: &Navigation, site_title: &str) -> String {
    let mut html = String::from("<aside class=\"sidebar\">\n");
    let _ = writeln!(
        html,
        "<a href=\"{}\" class=\"site-title\">{}</a>",
        encode_double_quoted_attribute(&navigation.home.href),
        encode_text(site_title)
    );
    html.push_str("<nav>\n<ul>\n");
    render_nav_items(&mut html, &navigation.items);
    html.push_str("</ul>\n</nav>\n</aside>\n");
    html
}

fn render_nav_items(html: &mut String, items: &[NavItem]) {
    for item in items {
        html.push_str("<li>\n");
        let _ = writeln!(
            html,
            "<a href=\"{}\">{}</a>",
            encode_double_quoted_attribute(&item.href),
            encode_text(&item.title)
        );
        if !item.children.is_empty() {
            html.push_str("<ul>\n");
            render_nav_items(html, &item.children);
            html.push_str("</ul>\n");
        }
        html.push_str("</li>\n");
    }
}

/// Render the footer shared by every page.
pub fn render_footer(site_title: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "<footer>{} &middot; Generated {}</footer>\n",
        encode_text(site_title),
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn render_breadcrumbs(html: &mut String, breadcrumbs: &[BreadcrumbItem]) {
    if breadcrumbs.is_empty() {
        return;
    }
    html.push_str("<nav class=\"breadcrumbs\">\n<ol>\n");
    for crumb in breadcrumbs {
        let _ = writeln!(
            html,
            "<li class=\"breadcrumb-item\"><a href=\"{}\">{}</a></li>",
            encode_double_quoted_attribute(&crumb.href),
            encode_text(&crumb.title)
        );
    }
    html.push_str("</ol>\n</nav>\n");
}
