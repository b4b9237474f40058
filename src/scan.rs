//! Content tree scanning.
//!
//! Walks the content root, classifies every file by its directory names and
//! turns Markdown files into [`Page`]s. Everything else is queued for a
//! verbatim copy.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                          # Content root
//! ├── config.toml                   # Site config (required, not copied)
//! ├── redirects.toml                # Redirect manifest (optional, not copied)
//! ├── index.md                      # Unsectioned page → index.html
//! ├── 1_blog/                       # Section "Blog", index 1
//! │   ├── intro.md                  # In the section, no category
//! │   └── _notes/                   # Category "Notes"
//! │       ├── post.md               # → blog/notes/post.html
//! │       └── diagram.png           # → blog/notes/diagram.png (copied)
//! ├── 2_work/
//! │   └── _clients/_acme/           # Category "Acme" under "Clients"
//! │       └── case-study.md
//! └── .drafts/                      # Hidden, skipped
//! ```
//!
//! ## Ordering
//!
//! Entries are walked sorted by file name within each directory. Rendering
//! runs on the rayon pool, but results are collected index-stably and
//! registered in walk order, so the site model is identical to a sequential
//! scan.
//!
//! ## Validation
//!
//! - Malformed front matter aborts the scan, naming the file.
//! - Two sources with the same output path abort the scan, whether they are
//!   pages or copied files (`about.md` next to `about.html`).
//! - Categories that no section owns are kept but reported as orphans.
//! - A section slug found under two indices (`1_blog`, `2_blog`) is merged
//!   into the first and reported.

use crate::config::{CONFIG_FILE, REDIRECTS_FILE, RedirectManifest, SiteConfig};
use crate::naming::{Classification, classify};
use crate::nav::build_navigation;
use crate::redirects::redirect_path;
use crate::render::{self, RenderError};
use crate::route::Router;
use crate::site::{SiteError, SiteModel};
use crate::types::{Category, Page, PageKind};
use maud::Markup;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error(transparent)]
    Site(#[from] SiteError),
    #[error("Content directory not found: {0}")]
    MissingSource(PathBuf),
}

/// A non-Markdown file copied into the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Source path relative to the content root, `/` separated.
    pub relative: String,
    /// Destination relative to the output root.
    pub output_path: String,
}

/// Everything the generator needs from one scan.
#[derive(Debug)]
pub struct ScanResult {
    /// Sections, categories, content pages and synthetic index pages.
    pub site: SiteModel,
    /// Global navigation menu.
    pub menu: Markup,
    pub static_files: Vec<StaticFile>,
    /// Categories left out of navigation because no section owns them.
    pub orphans: Vec<Category>,
}

impl ScanResult {
    pub fn content_pages(&self) -> impl Iterator<Item = &Page> {
        self.site.pages.iter().filter(|p| p.kind == PageKind::Content)
    }

    /// Fail if a redirect would land on a page, a copied file or another
    /// redirect.
    pub fn check_redirects(&self, manifest: &RedirectManifest) -> Result<(), SiteError> {
        let mut others = static_claims(&self.static_files);
        others.extend(
            manifest
                .redirects
                .iter()
                .map(|r| (redirect_path(&r.from), format!("redirect from {:?}", r.from))),
        );
        self.site.check_unique_outputs(&others)
    }
}

/// Scan `source` into a site model whose files will land under `output`.
pub fn scan(source: &Path, output: &Path, config: &SiteConfig) -> Result<ScanResult, ScanError> {
    if !source.is_dir() {
        return Err(ScanError::MissingSource(source.to_path_buf()));
    }
    let router = Router::new(&config.base_url);

    let mut markdown = Vec::new();
    let mut static_files = Vec::new();
    for entry in walk(source, output) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path())
            .to_path_buf();
        if is_markdown(&relative) {
            markdown.push(relative);
        } else {
            let route = router.rewrite(&relative, &classify(&relative));
            static_files.push(StaticFile {
                source: entry.path().to_path_buf(),
                destination: output.join(&route.output_path),
                relative: slash_path(&relative),
                output_path: route.output_path,
            });
        }
    }

    let rendered: Vec<(Page, Classification)> = markdown
        .par_iter()
        .map(|relative| content_page(source, relative, &router, config))
        .collect::<Result<_, _>>()?;

    let mut site = SiteModel::new();
    for (page, classification) in rendered {
        site.add_page(page, &classification.section, &classification.category);
    }

    let orphans: Vec<Category> = site.orphan_categories().into_iter().cloned().collect();
    for orphan in &orphans {
        tracing::warn!(
            category = %orphan.slug,
            "category is not inside a section and will not appear in navigation"
        );
    }
    for (section, index) in site.index_conflicts() {
        tracing::warn!(
            section = %section.slug,
            index = section.index,
            ignored = index,
            "section found under two indices, keeping the first"
        );
    }

    let navigation = build_navigation(
        &site.navigation_order(),
        &site.categories,
        &site.pages,
        config,
    );
    site.extend_pages(navigation.pages);
    site.check_unique_outputs(&static_claims(&static_files))?;

    tracing::info!(
        pages = site.pages.len(),
        sections = site.sections.len(),
        categories = site.categories.len(),
        static_files = static_files.len(),
        "scan complete"
    );

    Ok(ScanResult {
        site,
        menu: navigation.menu,
        static_files,
        orphans,
    })
}

fn static_claims(files: &[StaticFile]) -> Vec<(String, String)> {
    files
        .iter()
        .map(|f| (f.output_path.clone(), f.relative.clone()))
        .collect()
}

/// Sorted walk that skips hidden entries, the root config files and the
/// output directory when it sits inside the content root.
///
/// The output directory is matched on its canonical path, so
/// `content/out` and `x/../content/out` name the same directory.
fn walk(source: &Path, output: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    let output = fs::canonicalize(output).ok();
    WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or_default();
            if name.starts_with('.') || is_output(e, output.as_deref()) {
                return false;
            }
            !(e.depth() == 1 && (name == CONFIG_FILE || name == REDIRECTS_FILE))
        })
}

fn is_output(entry: &DirEntry, output: Option<&Path>) -> bool {
    let Some(output) = output else {
        return false;
    };
    entry.file_type().is_dir()
        && fs::canonicalize(entry.path()).is_ok_and(|path| path == output)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Read, render and place one Markdown file.
fn content_page(
    source_root: &Path,
    relative: &Path,
    router: &Router,
    config: &SiteConfig,
) -> Result<(Page, Classification), ScanError> {
    let text = fs::read_to_string(source_root.join(relative))?;
    let document = render::render(&text).map_err(|source| ScanError::Render {
        path: relative.to_path_buf(),
        source,
    })?;
    let classification = classify(relative);
    let route = router.rewrite(relative, &classification);
    let fm = document.front_matter;

    let title = non_empty(fm.title.clone()).unwrap_or_else(|| file_stem(&route.output_path));
    let page = Page {
        kind: PageKind::Content,
        title,
        body: document.html,
        tags: fm.tags_line(),
        output_path: route.output_path,
        url: route.url,
        href: route.href,
        source: slash_path(relative),
        section: classification.section.slug.clone(),
        category: classification.category.slug.clone(),
        category_parent: classification.category.parent.clone(),
        nav_index: classification.section.index,
        intro: fm.intro.unwrap_or_default(),
        description: fm.description.unwrap_or_default(),
        date: fm.date.unwrap_or_default(),
        og_image: non_empty(fm.ogimage).unwrap_or_else(|| config.og_image.clone()),
        og_type: non_empty(fm.ogtype).unwrap_or_else(|| config.og_type.clone()),
    };

    tracing::debug!(source = %page.source, output = %page.output_path, "rendered");
    Ok((page, classification))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `blog/notes/post.html` → `post`
fn file_stem(output_path: &str) -> String {
    let name = output_path.rsplit('/').next().unwrap_or(output_path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MINIMAL_CONFIG, test_config, write_content};

    fn scan_tree(files: &[(&str, &str)]) -> Result<ScanResult, ScanError> {
        let tmp = write_content(files);
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        scan(&source, &output, &test_config())
    }

    fn content_paths(result: &ScanResult) -> Vec<&str> {
        result
            .content_pages()
            .map(|p| p.output_path.as_str())
            .collect()
    }

    #[test]
    fn post_in_section_and_category() {
        let result = scan_tree(&[(
            "1_blog/_notes/post.md",
            "---\ntitle: Hello\n---\n## One\n",
        )])
        .unwrap();

        let page = result.content_pages().next().unwrap();
        assert_eq!(page.title, "Hello");
        assert_eq!(page.output_path, "blog/notes/post.html");
        assert_eq!(page.url, "https://example.com/blog/notes/post");
        assert_eq!(page.source, "1_blog/_notes/post.md");
        assert_eq!(page.nav_index, 1);

        assert_eq!(result.site.sections.len(), 1);
        assert_eq!(result.site.sections[0].title, "Blog");
        assert_eq!(result.site.sections[0].index, 1);
        let notes = &result.site.categories[0];
        assert_eq!(notes.title, "Notes");
        assert_eq!(notes.parent, "");
        assert_eq!(notes.section, "blog");
    }

    #[test]
    fn synthetic_pages_appended_after_content() {
        let result = scan_tree(&[("1_blog/_notes/post.md", "text")]).unwrap();
        let kinds: Vec<PageKind> = result.site.pages.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PageKind::Content,
                PageKind::SectionIndex,
                PageKind::CategoryIndex
            ]
        );
        assert!(result.menu.clone().into_string().contains("Notes"));
    }

    #[test]
    fn walk_order_is_sorted_by_name() {
        let result = scan_tree(&[
            ("1_blog/_notes/c.md", "c"),
            ("1_blog/_notes/a.md", "a"),
            ("1_blog/_notes/b.md", "b"),
        ])
        .unwrap();
        assert_eq!(
            content_paths(&result),
            vec![
                "blog/notes/a.html",
                "blog/notes/b.html",
                "blog/notes/c.html"
            ]
        );
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        let result = scan_tree(&[("about.md", "No front matter")]).unwrap();
        let page = result.content_pages().next().unwrap();
        assert_eq!(page.title, "about");
        assert_eq!(page.og_type, "website");
        assert_eq!(page.intro, "");
    }

    #[test]
    fn front_matter_overrides_social_defaults() {
        let result = scan_tree(&[(
            "about.md",
            "---\nogtype: profile\nogimage: /me.png\ntags: [a, b]\n---\n",
        )])
        .unwrap();
        let page = result.content_pages().next().unwrap();
        assert_eq!(page.og_type, "profile");
        assert_eq!(page.og_image, "/me.png");
        assert_eq!(page.tags, "a, b");
    }

    #[test]
    fn static_files_are_rewritten_not_rendered() {
        let tmp = write_content(&[
            ("1_blog/_notes/diagram.png", "png"),
            ("1_blog/_notes/post.md", "text"),
        ]);
        let source = tmp.path().join("content");
        let output = tmp.path().join("out");
        let result = scan(&source, &output, &test_config()).unwrap();

        assert_eq!(
            result.static_files,
            vec![StaticFile {
                source: source.join("1_blog/_notes/diagram.png"),
                destination: output.join("blog/notes/diagram.png"),
                relative: "1_blog/_notes/diagram.png".to_string(),
                output_path: "blog/notes/diagram.png".to_string(),
            }]
        );
        assert_eq!(result.content_pages().count(), 1);
    }

    #[test]
    fn hidden_entries_and_root_config_skipped() {
        let result = scan_tree(&[
            ("config.toml", MINIMAL_CONFIG),
            ("redirects.toml", ""),
            (".drafts/secret.md", "hidden"),
            (".DS_Store", ""),
            ("1_blog/config.toml", "kept"),
            ("index.md", "home"),
        ])
        .unwrap();
        assert_eq!(content_paths(&result), vec!["index.html"]);
        let copied: Vec<_> = result
            .static_files
            .iter()
            .map(|f| f.destination.file_name().unwrap().to_owned())
            .collect();
        assert_eq!(copied, vec!["config.toml"]);
    }

    #[test]
    fn output_inside_source_is_not_walked() {
        let tmp = write_content(&[("index.md", "home"), ("out/stale.html", "old")]);
        let source = tmp.path().join("content");
        let output = source.join("out");
        let result = scan(&source, &output, &test_config()).unwrap();
        assert!(result.static_files.is_empty());
    }

    #[test]
    fn output_inside_source_matched_however_written() {
        let tmp = write_content(&[
            ("index.md", "home"),
            ("logo.png", "png"),
            ("out/index.html", "old"),
            ("out/logo.png", "old"),
        ]);
        fs::create_dir_all(tmp.path().join("x")).unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("x/../content/out");
        let result = scan(&source, &output, &test_config()).unwrap();

        let copied: Vec<&str> = result
            .static_files
            .iter()
            .map(|f| f.relative.as_str())
            .collect();
        assert_eq!(copied, vec!["logo.png"]);
        assert_eq!(content_paths(&result), vec!["index.html"]);
    }

    #[test]
    fn static_file_colliding_with_page_fails() {
        let err = scan_tree(&[("about.md", "rendered"), ("about.html", "hand written")])
            .unwrap_err();
        match err {
            ScanError::Site(SiteError::OutputCollision {
                path,
                first,
                second,
            }) => {
                assert_eq!(path, "about.html");
                assert_eq!(first, "about.md");
                assert_eq!(second, "about.html");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn static_files_colliding_after_rewrite_fail() {
        let err = scan_tree(&[("1_blog/_notes/x.png", "a"), ("1_blog/notes/x.png", "b")])
            .unwrap_err();
        assert!(matches!(err, ScanError::Site(SiteError::OutputCollision { .. })));
    }

    #[test]
    fn section_found_under_two_indices_keeps_first() {
        let result = scan_tree(&[("1_blog/a.md", "a"), ("2_blog/b.md", "b")]).unwrap();
        assert_eq!(result.site.sections.len(), 1);
        assert_eq!(result.site.sections[0].index, 1);
        assert_eq!(result.site.index_conflicts().len(), 1);
    }

    #[test]
    fn redirect_onto_section_index_is_rejected() {
        let result = scan_tree(&[("1_blog/_notes/post.md", "text"), ("logo.png", "png")]).unwrap();
        let manifest = |from: &str| RedirectManifest {
            redirects: vec![crate::config::Redirect {
                from: from.to_string(),
                to: "https://elsewhere.example".to_string(),
            }],
        };

        let err = result.check_redirects(&manifest("blog")).unwrap_err();
        let SiteError::OutputCollision { path, second, .. } = err;
        assert_eq!(path, "blog/index.html");
        assert_eq!(second, r#"redirect from "blog""#);

        assert!(result.check_redirects(&manifest("/logo.png")).is_err());
        assert!(result.check_redirects(&manifest("old/blog")).is_ok());
    }

    #[test]
    fn malformed_front_matter_names_the_file() {
        let err = scan_tree(&[("1_blog/bad.md", "---\ntitle: [oops\n---\n")]).unwrap_err();
        match err {
            ScanError::Render { path, .. } => assert_eq!(path, PathBuf::from("1_blog/bad.md")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn colliding_outputs_fail() {
        let err = scan_tree(&[("1_blog/post.md", "one"), ("2_blog/post.md", "two")]).unwrap_err();
        assert!(matches!(err, ScanError::Site(SiteError::OutputCollision { .. })));
    }

    #[test]
    fn orphan_categories_reported() {
        let result = scan_tree(&[("_misc/note.md", "loose"), ("1_blog/_notes/a.md", "a")]).unwrap();
        let orphans: Vec<&str> = result.orphans.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(orphans, vec!["misc"]);
    }

    #[test]
    fn missing_source_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = scan(
            &tmp.path().join("nope"),
            &tmp.path().join("out"),
            &test_config(),
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::MissingSource(_)));
    }

    #[test]
    fn file_stem_cases() {
        assert_eq!(file_stem("blog/notes/post.html"), "post");
        assert_eq!(file_stem("README"), "README");
    }
}
