//! CLI output formatting for the build stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity is
//! shown by its place in the site (section, category, page title) with
//! filesystem paths as secondary context: indented `Source:` lines for the
//! scan, `→ output` suffixes for the build.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Sections
//! 001 Blog
//!     Notes (2 pages)
//!         001 Hello
//!             Source: 1_blog/_notes/hello.md
//!         002 Rust Tips
//!             Source: 1_blog/_notes/rust-tips.md
//!
//! Unlisted
//!     001 About
//!         Source: about.md
//!
//! Static files
//!     1_blog/_notes/diagram.png
//!
//! Warnings
//!     Category "misc" is outside any section and left out of navigation
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 Blog → blog/index.html
//!     Notes → blog/notes/index.html
//!         001 Hello → blog/notes/hello.html
//!
//! Unlisted
//!     001 About → about.html
//!
//! Generated 2 content pages, 1 section page, 1 category page, 1 static file, 0 redirects
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::generate::GenerateReport;
use crate::scan::ScanResult;
use crate::site::SiteModel;
use crate::types::{Category, Page, PageKind, Section};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format an index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `3 pages`
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn plural_categories(count: usize) -> String {
    if count == 1 {
        "1 category".to_string()
    } else {
        format!("{count} categories")
    }
}

// ============================================================================
// Tree walker
// ============================================================================

enum Entry<'a> {
    Section(&'a Section),
    Category(&'a Category, usize),
    Page(usize, &'a Page),
}

/// A flattened node from walking the navigation tree.
struct TreeNode<'a> {
    depth: usize,
    entry: Entry<'a>,
}

/// Walk sections, categories and their content pages in navigation order.
fn walk_site_tree(site: &SiteModel) -> Vec<TreeNode<'_>> {
    let mut nodes = Vec::new();
    for section in site.navigation_order() {
        let Some(section) = site.sections.iter().find(|s| s.slug == section.slug) else {
            continue;
        };
        nodes.push(TreeNode {
            depth: 0,
            entry: Entry::Section(section),
        });
        let top_level = site
            .categories
            .iter()
            .filter(|c| c.section == section.slug && c.parent.is_empty());
        for category in top_level {
            push_category(site, category, 1, &mut nodes);
            let children = site
                .categories
                .iter()
                .filter(|c| c.section == section.slug && c.parent == category.slug);
            for child in children {
                push_category(site, child, 2, &mut nodes);
            }
        }
    }
    nodes
}

fn push_category<'a>(
    site: &'a SiteModel,
    category: &'a Category,
    depth: usize,
    nodes: &mut Vec<TreeNode<'a>>,
) {
    let pages: Vec<&Page> = site
        .pages
        .iter()
        .filter(|p| p.kind == PageKind::Content && category.contains(p))
        .collect();
    nodes.push(TreeNode {
        depth,
        entry: Entry::Category(category, pages.len()),
    });
    for (i, page) in pages.into_iter().enumerate() {
        nodes.push(TreeNode {
            depth: depth + 1,
            entry: Entry::Page(i + 1, page),
        });
    }
}

/// Content pages that navigation does not reach.
fn unlisted_pages(site: &SiteModel) -> Vec<&Page> {
    let listed = |p: &Page| {
        site.categories
            .iter()
            .any(|c| c.contains(p) && site.sections.iter().any(|s| s.slug == c.section))
    };
    site.pages
        .iter()
        .filter(|p| p.kind == PageKind::Content && !listed(p))
        .collect()
}

/// Output path of the synthetic index page for a section or category.
fn synthetic_path<'a>(
    site: &'a SiteModel,
    kind: PageKind,
    section: &str,
    category: Option<&Category>,
) -> Option<&'a str> {
    site.pages
        .iter()
        .find(|p| {
            p.kind == kind
                && p.section == section
                && category.is_none_or(|c| p.category == c.slug && p.category_parent == c.parent)
        })
        .map(|p| p.output_path.as_str())
}

fn format_warnings(orphans: &[Category]) -> Vec<String> {
    let mut lines = Vec::new();
    if orphans.is_empty() {
        return lines;
    }
    lines.push(String::new());
    lines.push("Warnings".to_string());
    for orphan in orphans {
        lines.push(format!(
            "    Category {:?} is outside any section and left out of navigation",
            orphan.slug
        ));
    }
    lines
}

// ============================================================================
// Scan output
// ============================================================================

/// Format scan output showing the discovered site structure.
pub fn format_scan_output(result: &ScanResult, source_root: &Path) -> Vec<String> {
    let site = &result.site;
    let mut lines = Vec::new();

    lines.push("Sections".to_string());
    for node in walk_site_tree(site) {
        let pad = indent(node.depth);
        match node.entry {
            Entry::Section(section) => {
                let index = format_index(section.index as usize);
                lines.push(format!("{}{} {}", pad, index, section.title));
            }
            Entry::Category(category, count) => {
                let count = plural(count, "page");
                lines.push(format!("{}{} ({})", pad, category.title, count));
            }
            Entry::Page(position, page) => {
                lines.push(format!("{}{} {}", pad, format_index(position), page.title));
                lines.push(format!("{}    Source: {}", pad, page.source));
            }
        }
    }

    let unlisted = unlisted_pages(site);
    if !unlisted.is_empty() {
        lines.push(String::new());
        lines.push("Unlisted".to_string());
        for (i, page) in unlisted.iter().enumerate() {
            lines.push(format!("    {} {}", format_index(i + 1), page.title));
            lines.push(format!("        Source: {}", page.source));
        }
    }

    if !result.static_files.is_empty() {
        lines.push(String::new());
        lines.push("Static files".to_string());
        for file in &result.static_files {
            let shown = file.source.strip_prefix(source_root).unwrap_or(&file.source);
            lines.push(format!("    {}", shown.display()));
        }
    }

    lines.extend(format_warnings(&result.orphans));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(result: &ScanResult, source_root: &Path) {
    for line in format_scan_output(result, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format build output: every page with the file it was written to.
pub fn format_generate_output(result: &ScanResult, report: &GenerateReport) -> Vec<String> {
    let site = &result.site;
    let mut lines = Vec::new();

    for node in walk_site_tree(site) {
        let pad = indent(node.depth);
        match node.entry {
            Entry::Section(section) => {
                let target = synthetic_path(site, PageKind::SectionIndex, &section.slug, None);
                lines.push(format!(
                    "{}{} {} \u{2192} {}",
                    pad,
                    format_index(section.index as usize),
                    section.title,
                    target.unwrap_or("-")
                ));
            }
            Entry::Category(category, _) => {
                let target = synthetic_path(
                    site,
                    PageKind::CategoryIndex,
                    &category.section,
                    Some(category),
                );
                lines.push(format!(
                    "{}{} \u{2192} {}",
                    pad,
                    category.title,
                    target.unwrap_or("-")
                ));
            }
            Entry::Page(position, page) => {
                lines.push(format!(
                    "{}{} {} \u{2192} {}",
                    pad,
                    format_index(position),
                    page.title,
                    page.output_path
                ));
            }
        }
    }

    let unlisted = unlisted_pages(site);
    if !unlisted.is_empty() {
        lines.push(String::new());
        lines.push("Unlisted".to_string());
        for (i, page) in unlisted.iter().enumerate() {
            lines.push(format!(
                "    {} {} \u{2192} {}",
                format_index(i + 1),
                page.title,
                page.output_path
            ));
        }
    }

    lines.extend(format_warnings(&result.orphans));

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}, {}",
        plural(report.content_pages, "content page"),
        plural(report.section_pages, "section page"),
        plural(report.category_pages, "category page"),
        plural(report.static_files, "static file"),
        plural(report.redirects.len(), "redirect"),
    ));
    lines
}

/// Print build output to stdout.
pub fn print_generate_output(result: &ScanResult, report: &GenerateReport) {
    for line in format_generate_output(result, report) {
        println!("{}", line);
    }
}

/// Format the `check` summary.
pub fn format_check_output(result: &ScanResult) -> Vec<String> {
    let site = &result.site;
    let content = site.pages.iter().filter(|p| p.kind == PageKind::Content).count();
    let mut lines = vec![format!(
        "Site OK: {}, {}, {}, {}",
        plural(site.sections.len(), "section"),
        plural_categories(site.categories.len()),
        plural(content, "page"),
        plural(result.static_files.len(), "static file"),
    )];
    lines.extend(format_warnings(&result.orphans));
    lines
}

pub fn print_check_output(result: &ScanResult) {
    for line in format_check_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use crate::test_helpers::{test_config, write_content};
    use std::path::PathBuf;

    fn scanned(files: &[(&str, &str)]) -> (ScanResult, PathBuf) {
        let tmp = write_content(files);
        let source = tmp.path().join("content");
        let result = scan(&source, &tmp.path().join("out"), &test_config()).unwrap();
        (result, source)
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "page"), "1 page");
        assert_eq!(plural(0, "page"), "0 pages");
        assert_eq!(plural(2, "redirect"), "2 redirects");
    }

    #[test]
    fn scan_output_shows_tree_with_sources() {
        let (result, source) = scanned(&[
            ("1_blog/_notes/b.md", "---\ntitle: Second\n---\n"),
            ("1_blog/_notes/a.md", "---\ntitle: First\n---\n"),
        ]);
        let lines = format_scan_output(&result, &source);
        assert_eq!(
            lines,
            vec![
                "Sections",
                "001 Blog",
                "    Notes (2 pages)",
                "        001 First",
                "            Source: 1_blog/_notes/a.md",
                "        002 Second",
                "            Source: 1_blog/_notes/b.md",
            ]
        );
    }

    #[test]
    fn scan_output_lists_unlisted_static_and_warnings() {
        let (result, source) = scanned(&[
            ("about.md", "---\ntitle: About\n---\n"),
            ("_misc/note.md", "---\ntitle: Note\n---\n"),
            ("logo.png", "png"),
        ]);
        let lines = format_scan_output(&result, &source);
        assert!(lines.contains(&"Unlisted".to_string()));
        assert!(lines.contains(&"    001 Note".to_string()));
        assert!(lines.contains(&"    002 About".to_string()));
        assert!(lines.contains(&"    logo.png".to_string()));
        assert!(lines.contains(
            &"    Category \"misc\" is outside any section and left out of navigation".to_string()
        ));
    }

    #[test]
    fn nested_categories_indent_further() {
        let (result, source) = scanned(&[("2_work/_clients/_acme/case.md", "x")]);
        let lines = format_scan_output(&result, &source);
        assert!(lines.contains(&"002 Work".to_string()));
        assert!(lines.contains(&"    Clients (0 pages)".to_string()));
        assert!(lines.contains(&"        Acme (1 page)".to_string()));
        assert!(lines.contains(&"            001 case".to_string()));
    }

    #[test]
    fn generate_output_maps_pages_to_files() {
        let (result, _) = scanned(&[("1_blog/_notes/hello.md", "---\ntitle: Hello\n---\n")]);
        let report = GenerateReport {
            content_pages: 1,
            section_pages: 1,
            category_pages: 1,
            ..GenerateReport::default()
        };
        let lines = format_generate_output(&result, &report);
        assert_eq!(lines[0], "001 Blog \u{2192} blog/index.html");
        assert_eq!(lines[1], "    Notes \u{2192} blog/notes/index.html");
        assert_eq!(lines[2], "        001 Hello \u{2192} blog/notes/hello.html");
        assert_eq!(
            lines.last().unwrap(),
            "Generated 1 content page, 1 section page, 1 category page, 0 static files, 0 redirects"
        );
    }

    #[test]
    fn check_output_summarises() {
        let (result, _) = scanned(&[("1_blog/_notes/hello.md", "x"), ("1_blog/_tips/t.md", "y")]);
        let lines = format_check_output(&result);
        assert_eq!(
            lines,
            vec!["Site OK: 1 section, 2 categories, 2 pages, 0 static files"]
        );
    }
}
