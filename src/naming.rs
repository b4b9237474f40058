//! Directory-name conventions that place a page in the site hierarchy.
//!
//! Two markers are recognised, both on directory names and at any depth:
//!
//! - **Section**: `N_name/` where `N` is 1 to 5 digits. The first such
//!   directory in a path decides the section: `1_blog/` → index 1, slug
//!   `blog`, title "Blog".
//! - **Category**: `_name/` (leading underscore). One marker makes a plain
//!   category; two markers make a nested one (`_clients/_acme/` → category
//!   `acme` with parent `clients`). More than two, or none, leaves the page
//!   uncategorised.
//!
//! ```text
//! content/
//! ├── index.md                       # unsectioned, root index
//! ├── about.md                       # unsectioned
//! ├── 1_blog/
//! │   ├── _notes/
//! │   │   └── post.md                # Blog › Notes
//! │   └── _long-reads/
//! │       └── essay.md               # Blog › Long Reads
//! └── 2_work/
//!     └── _clients/
//!         └── _acme/
//!             └── case-study.md      # Work › Clients › Acme
//! ```
//!
//! Classification never fails. A segment that does not fit a marker is just
//! an ordinary directory, so a malformed prefix leaves the page unsectioned
//! rather than aborting the build.
//!
//! ## Display Titles
//!
//! Dashes become spaces and each word is capitalised: `long-reads` →
//! "Long Reads". The slug itself is never altered.

use crate::types::{Category, Section};
use std::path::{Component, Path};

/// Longest numeric prefix accepted as a section marker.
const MAX_SECTION_DIGITS: usize = 5;

/// Hierarchy position of one path, plus which directory segments carried
/// the markers so [`route`](crate::route) can strip exactly those.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub section: Section,
    pub category: Category,
    /// Index (among directory segments) of the section marker.
    pub section_at: Option<usize>,
    /// Indices (among directory segments) of the category markers in use.
    pub category_at: Vec<usize>,
}

/// Parse a `N_name` section marker, returning `(index, slug)`.
///
/// - `"1_blog"` → `Some((1, "blog"))`
/// - `"00042_archive"` → `Some((42, "archive"))`
/// - `"123456_too-long"` → `None` (more than five digits)
/// - `"1_"` → `None` (empty name)
/// - `"blog"` → `None`
pub fn section_marker(segment: &str) -> Option<(u32, &str)> {
    let (prefix, name) = segment.split_once('_')?;
    if prefix.is_empty()
        || prefix.len() > MAX_SECTION_DIGITS
        || !prefix.bytes().all(|b| b.is_ascii_digit())
        || name.is_empty()
    {
        return None;
    }
    // At most five digits, always fits.
    Some((prefix.parse().unwrap_or(0), name))
}

/// Parse a `_name` category marker, returning the slug.
pub fn category_marker(segment: &str) -> Option<&str> {
    segment.strip_prefix('_').filter(|name| !name.is_empty())
}

/// Turn a slug into a display title: dashes to spaces, words capitalised.
pub fn display_title(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Directory segments of a relative path (everything but the file name).
pub fn directory_segments(relative: &Path) -> Vec<String> {
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    segments.pop();
    segments
}

/// Classify a file path relative to the content root.
pub fn classify(relative: &Path) -> Classification {
    let segments = directory_segments(relative);

    let mut classification = Classification::default();

    if let Some((at, (index, slug))) = segments
        .iter()
        .enumerate()
        .find_map(|(i, s)| section_marker(s).map(|m| (i, m)))
    {
        classification.section = Section {
            index,
            title: display_title(slug),
            slug: slug.to_string(),
        };
        classification.section_at = Some(at);
    }

    let markers: Vec<(usize, &str)> = segments
        .iter()
        .enumerate()
        .filter_map(|(i, s)| category_marker(s).map(|slug| (i, slug)))
        .collect();

    let (parent, category) = match markers.as_slice() {
        [only] => (None, Some(*only)),
        [parent, child] => (Some(*parent), Some(*child)),
        _ => (None, None),
    };

    if let Some((at, slug)) = category {
        classification.category = Category {
            title: display_title(slug),
            slug: slug.to_string(),
            parent: parent.map(|(_, p)| p.to_string()).unwrap_or_default(),
            section: classification.section.slug.clone(),
        };
        classification.category_at = parent.iter().map(|(i, _)| *i).chain([at]).collect();
    }

    classification
}
