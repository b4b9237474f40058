//! # Quire
//!
//! A static site compiler for Markdown notes. The directory tree is the
//! site map: numbered directories become sections, underscore directories
//! become categories, and every Markdown file becomes a page with a
//! generated table of contents.
//!
//! ```text
//! content/1_blog/_notes/post.md   →   out/blog/notes/post.html
//!         │      │                     Section "Blog" (index 1)
//!         │      └─ category           Category "Notes"
//!         └─ section, index 1
//! ```
//!
//! # Architecture: Scan, Then Generate
//!
//! ```text
//! 1. Scan      content/  →  SiteModel + menu    (walk, classify, render, navigate)
//! 2. Generate  SiteModel →  out/                (layout, copy, sitemap, redirects)
//! ```
//!
//! The scan does all the thinking and touches nothing on disk, so `check`
//! and `scan` can validate a content tree without writing output. Generate
//! is a straight projection of the finished model onto files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | `N_section` / `_category` directory convention parser |
//! | [`route`] | Source path → output path, canonical URL and link target |
//! | [`render`] | Front matter parsing and Markdown → HTML with heading ids |
//! | [`toc`] | Heading extraction and the nested contents block |
//! | [`site`] | Registry of sections, categories and pages for one build |
//! | [`nav`] | Global menu and synthetic section/category index pages |
//! | [`scan`] | Walks the content root and assembles the site model |
//! | [`generate`] | Writes the HTML site using Maud |
//! | [`sitemap`] | `sitemap.xml` |
//! | [`redirects`] | Meta-refresh documents from `redirects.toml` |
//! | [`config`] | `config.toml` and `redirects.toml` loading and validation |
//! | [`types`] | Shared types (`Section`, `Category`, `Page`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Markers Are Stripped Per Segment
//!
//! Only the directory that produced the section loses its `N_` prefix, and
//! only the directories that produced categories lose their leading `_`.
//! Underscores anywhere else, including file names, survive. A global
//! find-and-replace over the path would mangle `some_post.md`.
//!
//! ## Sections Sort by Index
//!
//! Sections are discovered in walk order but presented sorted by their
//! numeric prefix, so `10_archive` comes after `2_work` no matter how the
//! filesystem lists them. The sort is stable, so equal indices keep
//! discovery order.
//!
//! ## One Output Path, One Page
//!
//! Two sources that rewrite to the same output path (`1_blog/post.md` and
//! `2_blog/post.md`) fail the build instead of silently overwriting each
//! other. The same check covers synthetic index pages, copied files and
//! redirects: `1_blog/index.md` collides with the generated section index,
//! `about.html` with `about.md`, and a redirect from `blog` with
//! `blog/index.html`.
//!
//! ## Orphan Categories Warn
//!
//! A category outside any section (`content/_misc/`) still renders its
//! pages but cannot appear in navigation. The scan reports it rather than
//! dropping it silently.
//!
//! ## Contents From Rendered HTML
//!
//! The table of contents is read back from the rendered body instead of the
//! Markdown source, so it always links to the ids actually emitted. Its
//! nesting is a level stack: a jump from `h2` to `h5` opens one list, and
//! every list opened is closed.
//!
//! ## Full Rebuilds Only
//!
//! Every build deletes and rewrites the output directory. There is no
//! cache to go stale.

pub mod config;
pub mod generate;
pub mod naming;
pub mod nav;
pub mod output;
pub mod redirects;
pub mod render;
pub mod route;
pub mod scan;
pub mod site;
pub mod sitemap;
pub mod toc;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
