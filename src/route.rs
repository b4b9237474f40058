//! Source path → output path and public URL.
//!
//! The output tree mirrors the content tree with the convention markers
//! removed and markdown files renamed to `.html`:
//!
//! ```text
//! content/1_blog/_notes/post.md     →  out/blog/notes/post.html
//! content/2_work/_a/_b/logo.png     →  out/work/a/b/logo.png
//! content/about_me.md               →  out/about_me.html
//! ```
//!
//! Markers are stripped per segment, and only from the segments that the
//! [classifier](crate::naming::classify) actually used. An underscore in any
//! other directory or in a file name survives untouched.

use crate::naming::{Classification, category_marker, directory_segments, section_marker};
use std::path::Path;

/// Name of the document served for a directory.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Output location of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path relative to the output root, `/`-separated.
    pub output_path: String,
    /// Canonical public URL (extension stripped).
    pub url: String,
    /// Link that resolves on a plain file server (extension kept).
    pub href: String,
}

/// Maps source paths to output paths under a configured base URL.
#[derive(Debug, Clone)]
pub struct Router {
    base_url: String,
}

impl Router {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Route a file given its path relative to the content root.
    pub fn rewrite(&self, relative: &Path, classification: &Classification) -> Route {
        let output_path = output_path(relative, classification);
        self.route_output(output_path)
    }

    /// Build a route for a path that is already relative to the output root.
    pub fn route_output(&self, output_path: String) -> Route {
        Route {
            url: self.canonical_url(&output_path),
            href: self.href(&output_path),
            output_path,
        }
    }

    /// Canonical URL: base URL joined with the output path minus extension.
    ///
    /// The root index document is the one exception and maps to exactly
    /// the base URL.
    pub fn canonical_url(&self, output_path: &str) -> String {
        let output_path = output_path.trim_start_matches('/');
        if output_path == INDEX_DOCUMENT {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, strip_extension(output_path))
    }

    pub fn href(&self, output_path: &str) -> String {
        format!("{}/{}", self.base_url, output_path.trim_start_matches('/'))
    }
}

/// Compute the output path (relative to the output root) of a source file.
pub fn output_path(relative: &Path, classification: &Classification) -> String {
    let mut segments: Vec<String> = directory_segments(relative)
        .into_iter()
        .enumerate()
        .map(|(i, segment)| {
            if classification.section_at == Some(i) {
                if let Some((_, name)) = section_marker(&segment) {
                    return name.to_string();
                }
            }
            if classification.category_at.contains(&i) {
                if let Some(name) = category_marker(&segment) {
                    return name.to_string();
                }
            }
            segment
        })
        .collect();

    if let Some(file_name) = relative.file_name() {
        segments.push(output_file_name(&file_name.to_string_lossy()));
    }

    segments.join("/")
}

/// Rename markdown files to `.html`; other files keep their name.
fn output_file_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("md") && !stem.is_empty() => {
            format!("{stem}.html")
        }
        _ => name.to_string(),
    }
}

/// Strip the extension of the last segment only.
fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..file_start + dot],
        _ => path,
    }
}
