//! Navigation synthesis.
//!
//! Runs once, after the scan, over the finished [`SiteModel`](crate::site::SiteModel)
//! lists. A single walk over sections, categories and pages produces three
//! views of the same tree:
//!
//! - the global menu shown on every page,
//! - the body of each category index page,
//! - the body of each section index page.
//!
//! ```text
//! Blog                       blog/index.html
//! ├── Notes                  blog/notes/index.html
//! │   ├── Hello              blog/notes/hello.html
//! │   └── Rust Tips          blog/notes/rust-tips.html
//! └── Clients                blog/clients/index.html
//!     └── Acme               blog/clients/acme/index.html
//!         └── Case Study     blog/clients/acme/case-study.html
//! ```
//!
//! Only categories owned by a listed section appear. Categories outside any
//! section, and pages with no category, are left out of navigation; they
//! are still rendered.
//!
//! Synthetic pages come back in a fixed order: one section index per
//! section, in section order, followed by every category index.

use crate::config::SiteConfig;
use crate::route::{INDEX_DOCUMENT, Router};
use crate::types::{Category, Page, PageKind, Section};
use maud::{Markup, html};

/// Result of one navigation pass.
#[derive(Debug, Clone)]
pub struct Navigation {
    /// Global menu markup.
    pub menu: Markup,
    /// Synthetic index pages, to be appended after the content pages.
    pub pages: Vec<Page>,
}

/// A category with the pages filed directly under it.
struct CategoryNode<'a> {
    category: &'a Category,
    href: String,
    pages: Vec<&'a Page>,
    children: Vec<CategoryNode<'a>>,
}

struct SectionNode<'a> {
    section: &'a Section,
    href: String,
    categories: Vec<CategoryNode<'a>>,
}

/// Build the menu and synthetic index pages.
///
/// `sections` is used in the order given; sort it first if needed
/// (see [`SiteModel::navigation_order`](crate::site::SiteModel::navigation_order)).
/// `pages` should hold content pages only.
pub fn build_navigation(
    sections: &[Section],
    categories: &[Category],
    pages: &[Page],
    config: &SiteConfig,
) -> Navigation {
    let router = Router::new(&config.base_url);
    let tree: Vec<SectionNode> = sections
        .iter()
        .filter(|s| !s.is_unsectioned())
        .map(|section| section_node(section, categories, pages, &router))
        .collect();

    let mut section_pages = Vec::new();
    let mut category_pages = Vec::new();
    for node in &tree {
        for category in &node.categories {
            category_pages.push(category_page(node.section, category, &router, config));
            for child in &category.children {
                category_pages.push(category_page(node.section, child, &router, config));
            }
        }
        section_pages.push(section_page(node, &router, config));
    }

    section_pages.extend(category_pages);
    Navigation {
        menu: render_menu(&tree),
        pages: section_pages,
    }
}

fn section_node<'a>(
    section: &'a Section,
    categories: &'a [Category],
    pages: &'a [Page],
    router: &Router,
) -> SectionNode<'a> {
    let top_level = categories
        .iter()
        .filter(|c| c.section == section.slug && c.parent.is_empty());
    let categories = top_level
        .map(|category| {
            let children = categories
                .iter()
                .filter(|c| c.section == section.slug && c.parent == category.slug)
                .map(|child| category_node(child, pages, router, Vec::new()))
                .collect();
            category_node(category, pages, router, children)
        })
        .collect();

    SectionNode {
        section,
        href: router.href(&section_output_path(section)),
        categories,
    }
}

fn category_node<'a>(
    category: &'a Category,
    pages: &'a [Page],
    router: &Router,
    children: Vec<CategoryNode<'a>>,
) -> CategoryNode<'a> {
    CategoryNode {
        category,
        href: router.href(&category_output_path(category)),
        pages: pages
            .iter()
            .filter(|p| p.kind == PageKind::Content && category.contains(p))
            .collect(),
        children,
    }
}

/// `<section>/index.html`
pub fn section_output_path(section: &Section) -> String {
    format!("{}/{}", section.slug, INDEX_DOCUMENT)
}

/// `<section>/[<parent>/]<category>/index.html`
pub fn category_output_path(category: &Category) -> String {
    let mut segments = vec![category.section.as_str()];
    if !category.parent.is_empty() {
        segments.push(&category.parent);
    }
    segments.push(&category.slug);
    segments.push(INDEX_DOCUMENT);
    segments.join("/")
}

// ============================================================================
// Views
// ============================================================================

fn render_menu(tree: &[SectionNode]) -> Markup {
    html! {
        ul.menu {
            @for node in tree {
                li.menu-section {
                    a href=(node.href) { (node.section.title) }
                    @if !node.categories.is_empty() {
                        ul {
                            @for category in &node.categories {
                                (category_list_item(category))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Category link followed by its pages and child categories.
fn category_list_item(node: &CategoryNode) -> Markup {
    html! {
        li.menu-category {
            a href=(node.href) { (node.category.title) }
            (category_contents(node))
        }
    }
}

fn category_contents(node: &CategoryNode) -> Markup {
    html! {
        @if !node.pages.is_empty() || !node.children.is_empty() {
            ul {
                @for page in &node.pages {
                    li { a href=(page.href) { (page.title) } }
                }
                @for child in &node.children {
                    (category_list_item(child))
                }
            }
        }
    }
}

fn section_body(node: &SectionNode) -> Markup {
    html! {
        ul.index-list {
            @for category in &node.categories {
                (category_list_item(category))
            }
        }
    }
}

fn category_body(node: &CategoryNode) -> Markup {
    html! {
        div.index-list {
            (category_contents(node))
        }
    }
}

// ============================================================================
// Synthetic pages
// ============================================================================

fn section_page(node: &SectionNode, router: &Router, config: &SiteConfig) -> Page {
    let route = router.route_output(section_output_path(node.section));
    Page {
        kind: PageKind::SectionIndex,
        title: node.section.title.clone(),
        body: section_body(node).into_string(),
        output_path: route.output_path,
        url: route.url,
        href: route.href,
        source: String::new(),
        section: node.section.slug.clone(),
        category: String::new(),
        category_parent: String::new(),
        nav_index: node.section.index,
        intro: String::new(),
        description: String::new(),
        tags: String::new(),
        date: String::new(),
        og_image: config.og_image.clone(),
        og_type: config.og_type.clone(),
    }
}

fn category_page(
    section: &Section,
    node: &CategoryNode,
    router: &Router,
    config: &SiteConfig,
) -> Page {
    let route = router.route_output(category_output_path(node.category));
    Page {
        kind: PageKind::CategoryIndex,
        title: node.category.title.clone(),
        body: category_body(node).into_string(),
        output_path: route.output_path,
        url: route.url,
        href: route.href,
        source: String::new(),
        section: section.slug.clone(),
        category: node.category.slug.clone(),
        category_parent: node.category.parent.clone(),
        nav_index: section.index,
        intro: String::new(),
        description: String::new(),
        tags: String::new(),
        date: String::new(),
        og_image: config.og_image.clone(),
        og_type: config.og_type.clone(),
    }
}
