//! Per-page table of contents.
//!
//! Headings are read back out of the rendered HTML rather than the markdown
//! source, so the contents block always matches the ids the renderer
//! actually emitted. Only `h2`..`h6` carrying an `id` count: `h1` is the page
//! title and id-less headings have nothing to link to.
//!
//! ## Nesting
//!
//! The list is built by a level-stack state machine rather than a tree. Each
//! heading either stays at the current depth, closes lists back down to its
//! level, or opens exactly one nested list. A jump from `h2` straight to
//! `h5` opens one list, not three:
//!
//! ```text
//! levels  [1, 4, 2]
//! emits   <ul> li <ul> li </ul><ul> li </ul></ul>
//! ```
//!
//! Every open is matched by a close, whatever order the headings come in.

use regex::Regex;
use std::sync::LazyLock;

/// Pages with fewer headings than this get no contents block.
pub const MIN_HEADINGS: usize = 3;

/// Opening tag for one nesting level.
const LIST_OPEN: &str = "<ul>";
const LIST_CLOSE: &str = "</ul>";

/// One entry for the contents block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingToken {
    /// 1 for `h2` through 5 for `h6`.
    pub level: u8,
    /// Target fragment id.
    pub anchor: String,
    /// Display text.
    pub label: String,
}

impl HeadingToken {
    pub fn new(level: u8, anchor: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            level,
            anchor: anchor.into(),
            label: label.into(),
        }
    }
}

/// Marker counts from one run of the state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TocStats {
    pub opened: usize,
    pub closed: usize,
    pub items: usize,
}

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([2-6])(\s[^>]*)?>(.*?)</h[2-6]\s*>").expect("valid heading regex")
});

static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid id regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Extract heading tokens, in document order, from rendered HTML.
pub fn extract_headings(html: &str) -> Vec<HeadingToken> {
    HEADING_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let rank: u8 = caps[1].parse().ok()?;
            let attrs = caps.get(2)?.as_str();
            let id = ID_RE.captures(attrs)?;
            let anchor = id.get(1).or_else(|| id.get(2))?.as_str();
            if anchor.is_empty() {
                return None;
            }
            let label = TAG_RE.replace_all(&caps[3], "").trim().to_string();
            Some(HeadingToken::new(rank - 1, anchor, label))
        })
        .collect()
}

/// Build the nested contents list, or `None` below [`MIN_HEADINGS`].
pub fn build_toc(tokens: &[HeadingToken]) -> Option<String> {
    if tokens.len() < MIN_HEADINGS {
        return None;
    }
    let (list, _) = nest(tokens);
    Some(format!(
        r#"<nav class="toc"><h2>Contents</h2>{list}</nav>"#
    ))
}

/// Run the level-stack state machine, returning the list markup.
pub fn nest(tokens: &[HeadingToken]) -> (String, TocStats) {
    let mut out = String::new();
    let mut stats = TocStats::default();
    let mut open: Vec<u8> = Vec::new();

    for token in tokens {
        while open.last().is_some_and(|&top| top > token.level) {
            open.pop();
            out.push_str(LIST_CLOSE);
            stats.closed += 1;
        }
        if open.last().is_none_or(|&top| top < token.level) {
            open.push(token.level);
            out.push_str(LIST_OPEN);
            stats.opened += 1;
        }
        out.push_str(&format!(
            r##"<li><a href="#{}">{}</a></li>"##,
            escape_attr(&token.anchor),
            token.label
        ));
        stats.items += 1;
    }

    for _ in open.drain(..) {
        out.push_str(LIST_CLOSE);
        stats.closed += 1;
    }

    (out, stats)
}

/// Escape a value for a double-quoted attribute.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
