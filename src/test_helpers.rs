//! Shared test utilities for the quire test suite.
//!
//! Provides page builders for model-level tests and a tiny content-tree
//! writer for tests that go through the filesystem.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = write_content(&[
//!     ("config.toml", MINIMAL_CONFIG),
//!     ("1_blog/_notes/post.md", "---\ntitle: Hello\n---\nBody"),
//! ]);
//! let source = tmp.path().join("content");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::naming::classify;
use crate::route::Router;
use crate::types::{Page, PageKind};

/// Smallest valid `config.toml`.
pub const MINIMAL_CONFIG: &str = r#"
title = "Test Site"
base_url = "https://example.com"
"#;

/// A site config equivalent to [`MINIMAL_CONFIG`].
pub fn test_config() -> SiteConfig {
    SiteConfig {
        title: "Test Site".to_string(),
        base_url: "https://example.com".to_string(),
        ..SiteConfig::default()
    }
}

/// A bare content page at `output_path`, outside any section.
pub fn content_page(title: &str, output_path: &str) -> Page {
    let router = Router::new("https://example.com");
    let route = router.route_output(output_path.to_string());
    Page {
        kind: PageKind::Content,
        title: title.to_string(),
        body: format!("<p>{title}</p>"),
        output_path: route.output_path,
        url: route.url,
        href: route.href,
        source: String::new(),
        section: String::new(),
        category: String::new(),
        category_parent: String::new(),
        nav_index: 0,
        intro: String::new(),
        description: String::new(),
        tags: String::new(),
        date: String::new(),
        og_image: String::new(),
        og_type: "website".to_string(),
    }
}

/// A content page placed by classifying `source` like the scanner does.
pub fn classified_page(title: &str, source: &str) -> Page {
    let classification = classify(Path::new(source));
    let router = Router::new("https://example.com");
    let route = router.rewrite(Path::new(source), &classification);
    Page {
        source: source.to_string(),
        section: classification.section.slug.clone(),
        category: classification.category.slug.clone(),
        category_parent: classification.category.parent.clone(),
        nav_index: classification.section.index,
        ..content_page(title, &route.output_path)
    }
}

/// Write `files` under `<tmp>/content/` and return the temp dir.
pub fn write_content(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    fs::create_dir_all(&content).unwrap();
    for (path, body) in files {
        let target = content.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(target, body).unwrap();
    }
    tmp
}
