//! Navigation derived from the site tree.
//!
//! [`Navigation`] is computed once per run and shared by every page, so the
//! sidebar is identical everywhere and links exactly the pages written.

use crate::tree::{SiteNode, SiteTree};

/// Navigation item with children for UI tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Relative link target.
    pub href: String,
    /// Child navigation items.
    pub children: Vec<NavItem>,
}

impl NavItem {
    fn from_node(node: &SiteNode<'_>, extension: &str) -> Self {
        Self {
            title: node.label.clone(),
            href: node.slug.href(extension),
            children: node
                .children
                .iter()
                .map(|child| Self::from_node(child, extension))
                .collect(),
        }
    }
}

/// Breadcrumb navigation item.
#[derive(Debug, PartialEq, Eq)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// Link target.
    pub href: String,
}

/// Site-wide navigation.
#[derive(Clone, Debug)]
pub struct Navigation {
    /// Link to the documentation root.
    pub home: NavItem,
    /// Namespace items with their subtrees.
    pub items: Vec<NavItem>,
}

impl Navigation {
    /// Derive navigation from the tree.
    pub fn from_tree(tree: &SiteTree<'_>, extension: &str) -> Self {
        let root = tree.root();
        Self {
            home: NavItem {
                title: root.label.clone(),
                href: root.slug.href(extension),
                children: Vec::new(),
            },
            items: root
                .children
                .iter()
                .map(|node| NavItem::from_node(node, extension))
                .collect(),
        }
    }

    /// Every href the navigation links to, in traversal order.
    pub fn hrefs(&self) -> Vec<&str> {
        fn collect<'n>(item: &'n NavItem, out: &mut Vec<&'n str>) {
            out.push(&item.href);
            for child in &item.children {
                collect(child, out);
            }
        }

        let mut out = vec![self.home.href.as_str()];
        for item in &self.items {
            collect(item, &mut out);
        }
        out
    }
}

/// Breadcrumbs for a page from its ancestors, root first.
///
/// The root is shown as its own label; the current page is excluded.
pub fn breadcrumbs(ancestors: &[&SiteNode<'_>], extension: &str) -> Vec<BreadcrumbItem> {
    ancestors
        .iter()
        .map(|node| BreadcrumbItem {
            title: node.label.clone(),
            href: node.slug.href(extension),
        })
        .collect()
}
