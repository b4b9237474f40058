//! HTML site generation.
//!
//! Final stage of the build. Takes a finished [`ScanResult`] and writes the
//! output tree from scratch.
//!
//! ## Steps
//!
//! 1. Check that no redirect lands on a page or copied file, then remove and
//!    recreate the output directory. Refuses when the output directory is the
//!    content root or one of its ancestors.
//! 2. Copy the template's `assets/` directory into the output root.
//! 3. Copy static files from the content tree.
//! 4. Render every page (content and synthetic) in parallel.
//! 5. Write `sitemap.xml` and the redirect documents.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── index.html                 # content/index.md
//! ├── sitemap.xml
//! ├── blog/
//! │   ├── index.html             # Section index (synthetic)
//! │   └── notes/
//! │       ├── index.html         # Category index (synthetic)
//! │       ├── post.html          # content/1_blog/_notes/post.md
//! │       └── diagram.png        # copied
//! └── old/post/index.html        # redirect
//! ```
//!
//! ## Page Layout
//!
//! Every page shares one layout: site header with the global menu, a
//! breadcrumb (Home › Section › Category › Page), the page header (title,
//! intro, date, tags), an optional contents block, the body and a footer
//! with the configured contact links.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Page bodies and the menu are already HTML and are inserted unescaped;
//! everything else goes through maud's escaping.

use crate::config::{RedirectManifest, SiteConfig};
use crate::nav::{category_output_path, section_output_path};
use crate::redirects::write_redirects;
use crate::route::Router;
use crate::render::has_diagrams;
use crate::scan::{ScanResult, StaticFile};
use crate::site::SiteError;
use crate::sitemap::write_sitemap;
use crate::toc::{build_toc, extract_headings};
use crate::types::{Category, Page, PageKind, Section};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Refusing to clear {output}: it contains the content root {source_root}")]
    UnsafeOutput {
        output: PathBuf,
        source_root: PathBuf,
    },
    #[error(transparent)]
    Site(#[from] SiteError),
}

const CSS: &str = include_str!("../static/style.css");
const MERMAID_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js";

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Counts and paths from one generate run, for console output.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub content_pages: usize,
    pub section_pages: usize,
    pub category_pages: usize,
    pub static_files: usize,
    pub assets: usize,
    pub redirects: Vec<PathBuf>,
    pub sitemap: PathBuf,
}

pub fn generate(
    scan: &ScanResult,
    config: &SiteConfig,
    redirects: &RedirectManifest,
    options: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    let output = options.output.as_path();
    scan.check_redirects(redirects)?;
    prepare_output(&options.source, output)?;

    let assets = copy_template_assets(&config.template_assets_dir(&options.source), output)?;
    copy_static_files(&scan.static_files)?;

    let layout = Layout::new(scan, config);
    scan.site.pages.par_iter().try_for_each(|page| {
        let path = output.join(&page.output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, layout.render(page).into_string())?;
        tracing::debug!(output = %page.output_path, "page written");
        Ok::<(), GenerateError>(())
    })?;

    let sitemap = write_sitemap(output, &scan.site.pages)?;
    let redirects = write_redirects(output, redirects)?;

    let count = |kind: PageKind| scan.site.pages.iter().filter(|p| p.kind == kind).count();
    let report = GenerateReport {
        output: output.to_path_buf(),
        content_pages: count(PageKind::Content),
        section_pages: count(PageKind::SectionIndex),
        category_pages: count(PageKind::CategoryIndex),
        static_files: scan.static_files.len(),
        assets,
        redirects,
        sitemap,
    };
    tracing::info!(output = %output.display(), pages = scan.site.pages.len(), "site generated");
    Ok(report)
}

/// Clear the output directory, refusing to delete the content root.
fn prepare_output(source: &Path, output: &Path) -> Result<(), GenerateError> {
    let source_abs = fs::canonicalize(source)?;
    let output_abs = if output.exists() {
        fs::canonicalize(output)?
    } else {
        std::path::absolute(output)?
    };
    if source_abs.starts_with(&output_abs) {
        return Err(GenerateError::UnsafeOutput {
            output: output.to_path_buf(),
            source_root: source.to_path_buf(),
        });
    }
    if output.exists() {
        fs::remove_dir_all(output)?;
    }
    fs::create_dir_all(output)?;
    Ok(())
}

/// Copy `assets_dir` into `output`. A missing directory copies nothing.
fn copy_template_assets(assets_dir: &Path, output: &Path) -> Result<usize, GenerateError> {
    if !assets_dir.is_dir() {
        tracing::debug!(dir = %assets_dir.display(), "no template assets");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(assets_dir).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(assets_dir)
            .unwrap_or(entry.path());
        let target = output.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn copy_static_files(files: &[StaticFile]) -> Result<(), GenerateError> {
    for file in files {
        if let Some(parent) = file.destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&file.source, &file.destination)?;
    }
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Site-wide data shared by every page render.
struct Layout<'a> {
    config: &'a SiteConfig,
    router: Router,
    menu: &'a Markup,
    sections: &'a [Section],
    categories: &'a [Category],
}

impl<'a> Layout<'a> {
    fn new(scan: &'a ScanResult, config: &'a SiteConfig) -> Self {
        Self {
            config,
            router: Router::new(&config.base_url),
            menu: &scan.menu,
            sections: &scan.site.sections,
            categories: &scan.site.categories,
        }
    }

    fn home(&self) -> String {
        format!("{}/", self.router.base_url())
    }

    fn render(&self, page: &Page) -> Markup {
        let toc = match page.kind {
            PageKind::Content => build_toc(&extract_headings(&page.body)),
            _ => None,
        };
        let content = html! {
            (self.site_header())
            (self.breadcrumb(page))
            main class=(kind_class(page.kind)) {
                article {
                    header.page-header {
                        h1 { (page.title) }
                        @if !page.intro.is_empty() {
                            p.intro { (page.intro) }
                        }
                        @if !page.date.is_empty() {
                            p.date { time { (page.date) } }
                        }
                        @if !page.tags.is_empty() {
                            p.tags { (page.tags) }
                        }
                    }
                    @if let Some(toc) = toc {
                        (PreEscaped(toc))
                    }
                    div.content {
                        (PreEscaped(&page.body))
                    }
                }
            }
            (self.site_footer())
        };
        self.base_document(page, content)
    }

    /// Renders the base HTML document structure
    fn base_document(&self, page: &Page, content: Markup) -> Markup {
        let config = self.config;
        let title = if config.title.is_empty() || config.title == page.title {
            page.title.clone()
        } else {
            format!("{} | {}", page.title, config.title)
        };
        let og_image = (!page.og_image.is_empty()).then(|| self.absolute(&page.og_image));
        let card = if og_image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        };

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                    @if !page.description.is_empty() {
                        meta name="description" content=(page.description);
                    }
                    link rel="canonical" href=(page.url);
                    meta property="og:title" content=(page.title);
                    meta property="og:type" content=(page.og_type);
                    meta property="og:url" content=(page.url);
                    @if !config.title.is_empty() {
                        meta property="og:site_name" content=(config.title);
                    }
                    @if !page.description.is_empty() {
                        meta property="og:description" content=(page.description);
                    }
                    @if let Some(image) = &og_image {
                        meta property="og:image" content=(image);
                    }
                    meta name="twitter:card" content=(card);
                    @if !config.twitter.is_empty() {
                        meta name="twitter:site" content={ "@" (config.twitter) };
                    }
                    link rel="icon" href=(config.favicon);
                    style { (PreEscaped(CSS)) }
                    (PreEscaped(&config.analytics))
                }
                body {
                    (content)
                    @if has_diagrams(&page.body) {
                        script src=(MERMAID_SCRIPT) {}
                        script { "mermaid.initialize({startOnLoad: true});" }
                    }
                }
            }
        }
    }

    /// Renders the site header with the global menu
    fn site_header(&self) -> Markup {
        html! {
            header.site-header {
                a.site-title href=(self.home()) { (self.config.title) }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" { "Menu" }
                nav.site-nav {
                    (self.menu)
                }
            }
        }
    }

    /// Home › Section › [Parent ›] Category › Page, with the current page
    /// unlinked.
    fn breadcrumb(&self, page: &Page) -> Markup {
        let section = self.sections.iter().find(|s| s.slug == page.section);
        let (parent, category) = match page.kind {
            PageKind::SectionIndex => (None, None),
            _ => self.page_categories(page),
        };
        let is_category_index = page.kind == PageKind::CategoryIndex;

        html! {
            nav.breadcrumb aria-label="Breadcrumb" {
                a href=(self.home()) { "Home" }
                @if let Some(section) = section {
                    " › "
                    @if page.kind == PageKind::SectionIndex {
                        span aria-current="page" { (section.title) }
                    } @else {
                        a href=(self.router.href(&section_output_path(section))) { (section.title) }
                    }
                }
                @if let Some(parent) = parent {
                    " › "
                    (self.category_crumb(parent, section.is_some()))
                }
                @if let Some(category) = category {
                    " › "
                    @if is_category_index {
                        span aria-current="page" { (category.title) }
                    } @else {
                        (self.category_crumb(category, section.is_some()))
                    }
                }
                @if page.kind == PageKind::Content {
                    " › "
                    span aria-current="page" { (page.title) }
                }
            }
        }
    }

    /// Parent and own category of a page, if any.
    fn page_categories(&self, page: &Page) -> (Option<&'a Category>, Option<&'a Category>) {
        let find = |slug: &str, parent: &str| {
            self.categories
                .iter()
                .find(|c| c.section == page.section && c.slug == slug && c.parent == parent)
        };
        if page.category.is_empty() {
            return (None, None);
        }
        let parent = if page.category_parent.is_empty() {
            None
        } else {
            find(&page.category_parent, "")
        };
        (parent, find(&page.category, &page.category_parent))
    }

    /// Categories only have an index page when a section owns them.
    fn category_crumb(&self, category: &Category, linked: bool) -> Markup {
        html! {
            @if linked {
                a href=(self.router.href(&category_output_path(category))) { (category.title) }
            } @else {
                span { (category.title) }
            }
        }
    }

    fn site_footer(&self) -> Markup {
        let config = self.config;
        html! {
            footer.site-footer {
                ul.social {
                    @if !config.email.is_empty() {
                        li { a href={ "mailto:" (config.email) } { (config.email) } }
                    }
                    @if !config.github.is_empty() {
                        li { a href={ "https://github.com/" (config.github) } rel="me" { "GitHub" } }
                    }
                    @if !config.linkedin.is_empty() {
                        li { a href={ "https://www.linkedin.com/in/" (config.linkedin) } rel="me" { "LinkedIn" } }
                    }
                    @if !config.twitter.is_empty() {
                        li { a href={ "https://twitter.com/" (config.twitter) } rel="me" { "Twitter" } }
                    }
                }
                @if !config.domain.is_empty() {
                    p.domain { (config.domain) }
                }
            }
        }
    }

    /// Site-relative URLs are resolved against the base URL.
    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.router.base_url(), url.trim_start_matches('/'))
        }
    }
}

fn kind_class(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Content => "content-page",
        PageKind::CategoryIndex => "category-page",
        PageKind::SectionIndex => "section-page",
    }
}

// ============================================================================
// Tests
// ============================================================================
