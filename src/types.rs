//! Shared types used across the build stages.
//!
//! Sections and categories are discovered by [`naming`](crate::naming) during
//! the scan, pages are assembled by [`scan`](crate::scan) and
//! [`nav`](crate::nav), and everything is serialized by the `scan` command.

use serde::Serialize;

/// A top-level navigation bucket, inferred from an `N_name/` directory.
///
/// The zero value (index 0, empty slug) marks an unsectioned page: it is
/// rendered and written but never appears in navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Section {
    /// Sort key from the numeric marker (`1_blog` → 1).
    pub index: u32,
    /// Display title (`my-notes` → "My Notes").
    pub title: String,
    /// Directory name after the marker, verbatim. Used in URLs.
    pub slug: String,
}

impl Section {
    pub fn is_unsectioned(&self) -> bool {
        self.slug.is_empty()
    }
}

/// A second-level navigation bucket, inferred from an `_name/` directory.
///
/// One level of nesting is supported: in `1_work/_clients/_acme/`, `acme`
/// is the category and `clients` its parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    pub title: String,
    pub slug: String,
    /// Parent category slug when nested, empty otherwise.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
    /// Slug of the owning section. Empty for categories outside any section.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub section: String,
}

impl Category {
    pub fn is_empty(&self) -> bool {
        self.slug.is_empty()
    }

    /// Whether `page` belongs directly to this category.
    pub fn contains(&self, page: &Page) -> bool {
        !self.is_empty()
            && page.section == self.section
            && page.category == self.slug
            && page.category_parent == self.parent
    }
}

/// Where a page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// One per source markdown file.
    Content,
    /// Synthetic listing of a category's pages.
    CategoryIndex,
    /// Synthetic listing of a section's categories and pages.
    SectionIndex,
}

impl PageKind {
    /// Sitemap `changefreq` for pages of this kind.
    pub fn change_frequency(self) -> &'static str {
        match self {
            PageKind::Content => "monthly",
            PageKind::CategoryIndex | PageKind::SectionIndex => "weekly",
        }
    }

    /// Sitemap `priority` for pages of this kind.
    pub fn priority(self) -> &'static str {
        match self {
            PageKind::Content => "0.5",
            PageKind::CategoryIndex => "0.8",
            PageKind::SectionIndex => "1.0",
        }
    }
}

/// One unit of output.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub kind: PageKind,
    pub title: String,
    /// Rendered HTML fragment.
    #[serde(skip)]
    pub body: String,
    /// Path relative to the output root, `/`-separated.
    pub output_path: String,
    /// Canonical public URL.
    pub url: String,
    /// Link target that resolves on a plain file server (keeps `.html`).
    pub href: String,
    /// Source path relative to the content root (content pages only).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub section: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category_parent: String,
    /// Inherited section index.
    pub nav_index: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub intro: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date: String,
    pub og_image: String,
    pub og_type: String,
}
