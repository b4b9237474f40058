//! Redirect pages.
//!
//! Each `[[redirect]]` in `redirects.toml` becomes a small HTML document
//! that sends the browser on to the target:
//!
//! ```text
//! from = "old/post"        →  out/old/post/index.html
//! from = "/old/post.html"  →  out/old/post.html
//! ```
//!
//! A `from` whose last segment has an extension is written at that exact
//! path; anything else is treated as a directory URL.

use crate::config::{Redirect, RedirectManifest};
use crate::route::INDEX_DOCUMENT;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};

/// Output path of a redirect, relative to the output root.
pub fn redirect_path(from: &str) -> String {
    let from = from.trim_matches('/');
    let last = from.rsplit('/').next().unwrap_or(from);
    match last.rfind('.') {
        Some(dot) if dot > 0 => from.to_string(),
        _ => format!("{from}/{INDEX_DOCUMENT}"),
    }
}

/// The document written for one redirect.
pub fn render_redirect(redirect: &Redirect) -> Markup {
    let refresh = format!("0; url={}", redirect.to);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Redirecting…" }
                link rel="canonical" href=(redirect.to);
                meta http-equiv="refresh" content=(refresh);
                meta name="robots" content="noindex";
            }
            body {
                p {
                    "This page has moved to "
                    a href=(redirect.to) { (redirect.to) }
                    "."
                }
            }
        }
    }
}

/// Write every redirect in declaration order.
///
/// Callers check paths first with
/// [`ScanResult::check_redirects`](crate::scan::ScanResult::check_redirects);
/// this writes whatever it is given.
pub fn write_redirects(
    output_dir: &Path,
    manifest: &RedirectManifest,
) -> std::io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(manifest.redirects.len());
    for redirect in &manifest.redirects {
        let path = output_dir.join(redirect_path(&redirect.from));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, render_redirect(redirect).into_string())?;
        tracing::debug!(from = %redirect.from, to = %redirect.to, "redirect written");
        written.push(path);
    }
    Ok(written)
}
