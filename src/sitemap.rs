//! `sitemap.xml` generation.
//!
//! One `<url>` per page, content and synthetic alike:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/blog/notes/post</loc>
//!     <lastmod>2024-03-01</lastmod>
//!     <changefreq>monthly</changefreq>
//!     <priority>0.5</priority>
//!   </url>
//! </urlset>
//! ```
//!
//! `changefreq` and `priority` depend on the page kind (see
//! [`PageKind`](crate::types::PageKind)). `lastmod` is only written when the
//! page's front matter `date` starts with a `YYYY-MM-DD` date.

use crate::types::Page;
use std::fs;
use std::path::{Path, PathBuf};

pub const SITEMAP_FILE: &str = "sitemap.xml";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render the sitemap document for `pages`, in order.
pub fn render_sitemap<'a>(pages: impl IntoIterator<Item = &'a Page>) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for page in pages {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&page.url)));
        if let Some(lastmod) = lastmod(&page.date) {
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            page.kind.change_frequency()
        ));
        xml.push_str(&format!(
            "    <priority>{}</priority>\n",
            page.kind.priority()
        ));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Write `sitemap.xml` into `output_dir`.
pub fn write_sitemap<'a>(
    output_dir: &Path,
    pages: impl IntoIterator<Item = &'a Page>,
) -> std::io::Result<PathBuf> {
    let path = output_dir.join(SITEMAP_FILE);
    fs::write(&path, render_sitemap(pages))?;
    Ok(path)
}

/// Leading `YYYY-MM-DD` of a front matter date.
fn lastmod(date: &str) -> Option<&str> {
    let day = date.trim().get(..10)?;
    let bytes = day.as_bytes();
    let shape = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    shape.then_some(day)
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
