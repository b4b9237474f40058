//! Markdown rendering with YAML front matter.
//!
//! A source file may open with a front matter block:
//!
//! ```text
//! ---
//! title: "Hello"
//! intro: One line shown under the title.
//! description: Used for the meta description and social cards.
//! tags: [rust, notes]
//! date: 2024-03-01
//! ogimage: /img/card.png
//! ogtype: article
//! ---
//! # Body starts here
//! ```
//!
//! Every key is optional and unknown keys are ignored. Values are read
//! leniently: `tags: 2024` and `title: 42` become strings, and a list or map
//! where a single value belongs is treated as absent. Only YAML that does not
//! parse is an error.
//!
//! The body is rendered with [pulldown-cmark](https://docs.rs/pulldown-cmark):
//!
//! - headings without an explicit `{#id}` get one derived from their text so
//!   the [contents block](crate::toc) and deep links can target them;
//! - single newlines inside a paragraph are kept as line breaks;
//! - ` ```mermaid ` fences become `<pre class="mermaid">` blocks for the
//!   client-side diagram renderer.

use maud::html as markup;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Fence language rendered as a diagram.
const DIAGRAM_LANGUAGE: &str = "mermaid";
const DIAGRAM_OPEN: &str = r#"<pre class="mermaid">"#;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}

/// Front matter keys recognised by the site.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub intro: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub description: Option<String>,
    /// A single value or a list; `tags: rust, notes` stays one entry.
    #[serde(deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "scalar")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub ogimage: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub ogtype: Option<String>,
}

impl FrontMatter {
    /// Tags joined with `, `, or empty.
    pub fn tags_line(&self) -> String {
        self.tags.join(", ")
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

fn tag_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let tags = match Value::deserialize(deserializer)? {
        Value::Sequence(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(&other).into_iter().collect(),
    };
    Ok(tags)
}

/// Text of a YAML scalar; `None` for null, lists and maps.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Output of rendering one source file.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub front_matter: FrontMatter,
    /// HTML fragment of the body.
    pub html: String,
}

/// Split a leading `---` delimited block from the body.
///
/// Returns `(None, source)` when there is no complete block.
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, source)
}

/// Parse a front matter block. Blank blocks give the default.
pub fn parse_front_matter(yaml: &str) -> Result<FrontMatter, RenderError> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Render a complete source file.
pub fn render(source: &str) -> Result<RenderedDocument, RenderError> {
    let (yaml, body) = split_front_matter(source);
    let front_matter = match yaml {
        Some(yaml) => parse_front_matter(yaml)?,
        None => FrontMatter::default(),
    };
    Ok(RenderedDocument {
        front_matter,
        html: render_markdown(body),
    })
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Whether rendered HTML holds a diagram block.
pub fn has_diagrams(html: &str) -> bool {
    html.contains(DIAGRAM_OPEN)
}

/// Render a markdown body to HTML, assigning ids to every heading.
pub fn render_markdown(body: &str) -> String {
    let mut events = diagram_blocks(Parser::new_ext(body, markdown_options()).map(|event| {
        match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        }
    }));
    let mut ids = HeadingIds::default();

    // Explicit ids are claimed first so generated ones never collide with them.
    for event in &events {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            ids.claim(id);
        }
    }

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let anchor = ids.allocate(&slugify(&heading_text(&events[i + 1..])));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
    }

    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Replace each mermaid fence with one raw `<pre class="mermaid">` event.
fn diagram_blocks<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut diagram: Option<String> = None;
    for event in events {
        if let Some(source) = diagram.as_mut() {
            match event {
                Event::Text(text) => source.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let block = markup! { pre.mermaid { (source.as_str()) } };
                    out.push(Event::Html(CowStr::from(format!("{}\n", block.into_string()))));
                    diagram = None;
                }
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref lang)))
                if lang.split_whitespace().next() == Some(DIAGRAM_LANGUAGE) =>
            {
                diagram = Some(String::new());
            }
            other => out.push(other),
        }
    }
    out
}

/// Plain text of a heading, up to its closing tag.
fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Lowercase, alphanumerics kept, everything else collapsed to single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

/// Hands out unique heading ids within one document: `faq`, `faq-1`, ...
#[derive(Default)]
struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    fn claim(&mut self, id: &str) {
        self.seen.entry(id.to_string()).or_insert(0);
    }

    fn allocate(&mut self, base: &str) -> String {
        let Some(count) = self.seen.get(base).copied() else {
            self.seen.insert(base.to_string(), 0);
            return base.to_string();
        };
        let mut n = count + 1;
        let mut candidate = format!("{base}-{n}");
        while self.seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.seen.insert(base.to_string(), n);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}
