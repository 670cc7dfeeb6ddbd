//! Allow-list HTML sanitizer.
//!
//! Allowed tags and attributes come from configuration. Independent of the
//! configuration, event-handler attributes are always removed, `script` and
//! `style` content is always discarded, and URL attributes must use an
//! allowed scheme.

use crate::lexer::{tokenize, MarkupEvent, TagToken};
use resonance_vdom::escape_html;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const ALWAYS_DISCARDED: &[&str] = &["script", "style"];
const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite", "action", "formaction", "poster"];
const VOID_TAGS: &[&str] = &["br", "hr", "img", "wbr", "col", "source", "track"];

/// Sanitizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizerConfig {
    #[serde(default = "default_allowed_tags")]
    pub allowed_tags: BTreeSet<String>,

    /// Allowed attributes per tag; the `*` entry applies to every tag
    #[serde(default = "default_allowed_attributes")]
    pub allowed_attributes: BTreeMap<String, BTreeSet<String>>,

    #[serde(default = "default_allowed_schemes")]
    pub allowed_schemes: BTreeSet<String>,

    /// Tags removed together with everything inside them
    #[serde(default = "default_discard_content_tags")]
    pub discard_content_tags: BTreeSet<String>,
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_allowed_tags() -> BTreeSet<String> {
    set(&[
        "address", "article", "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6",
        "main", "nav", "section", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
        "hr", "li", "ol", "p", "pre", "ul", "a", "abbr", "b", "br", "cite", "code", "em", "i",
        "kbd", "mark", "q", "s", "small", "span", "strong", "sub", "sup", "time", "u", "caption",
        "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    ])
}

fn default_allowed_attributes() -> BTreeMap<String, BTreeSet<String>> {
    let mut attributes = BTreeMap::new();
    attributes.insert("a".to_string(), set(&["href", "name", "target", "rel"]));
    attributes.insert(
        "img".to_string(),
        set(&["src", "srcset", "alt", "title", "width", "height", "loading"]),
    );
    attributes
}

fn default_allowed_schemes() -> BTreeSet<String> {
    set(&["http", "https", "ftp", "mailto", "tel"])
}

fn default_discard_content_tags() -> BTreeSet<String> {
    set(&["script", "style", "textarea", "option", "noscript"])
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            allowed_tags: default_allowed_tags(),
            allowed_attributes: default_allowed_attributes(),
            allowed_schemes: default_allowed_schemes(),
            discard_content_tags: default_discard_content_tags(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    config: SanitizerConfig,
}

impl Sanitizer {
    pub fn new(config: SanitizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Sanitize an HTML fragment
    pub fn sanitize(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut open: Vec<String> = Vec::new();
        let mut discard: Option<(String, usize)> = None;

        for event in tokenize(html) {
            if let Some((tag, depth)) = &mut discard {
                match &event {
                    MarkupEvent::Start(start) if &start.name == tag => *depth += 1,
                    MarkupEvent::End(name) if name == tag => {
                        *depth -= 1;
                        if *depth == 0 {
                            discard = None;
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                MarkupEvent::Start(tag) => {
                    // A self-closing slash does not end raw-text content
                    if self.discards_content(&tag.name) {
                        debug!(tag = %tag.name, "Discarding element with content");
                        discard = Some((tag.name.clone(), 1));
                        continue;
                    }
                    if !self.config.allowed_tags.contains(&tag.name) {
                        continue;
                    }
                    out.push_str(&self.render_start(&tag));
                    if !tag.self_closing && !VOID_TAGS.contains(&tag.name.as_str()) {
                        open.push(tag.name);
                    }
                }
                MarkupEvent::End(name) => {
                    if let Some(pos) = open.iter().rposition(|tag| *tag == name) {
                        for tag in open.drain(pos..).rev() {
                            out.push_str(&format!("</{}>", tag));
                        }
                    }
                }
                MarkupEvent::Text(text) => out.push_str(&escape_html(&text)),
            }
        }

        for tag in open.iter().rev() {
            out.push_str(&format!("</{}>", tag));
        }
        out
    }

    fn discards_content(&self, tag: &str) -> bool {
        ALWAYS_DISCARDED.contains(&tag) || self.config.discard_content_tags.contains(tag)
    }

    fn render_start(&self, tag: &TagToken) -> String {
        let mut rendered = format!("<{}", tag.name);
        for (name, value) in &tag.attributes {
            if !self.allows_attribute(&tag.name, name) {
                continue;
            }
            if URL_ATTRIBUTES.contains(&name.as_str()) && !self.allows_url(value) {
                debug!(tag = %tag.name, attribute = %name, "Dropping URL with disallowed scheme");
                continue;
            }
            rendered.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        rendered.push('>');
        rendered
    }

    fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        if attribute.starts_with("on") {
            return false;
        }
        let allowed = |key: &str| {
            self.config
                .allowed_attributes
                .get(key)
                .map(|attrs| attrs.contains(attribute))
                .unwrap_or(false)
        };
        allowed(tag) || allowed("*")
    }

    fn allows_url(&self, value: &str) -> bool {
        let cleaned: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect::<String>()
            .to_ascii_lowercase();

        let scheme_end = cleaned.find(':');
        let path_start = cleaned.find(['/', '?', '#']);
        match (scheme_end, path_start) {
            (Some(colon), Some(slash)) if slash < colon => true,
            (Some(colon), _) => self.config.allowed_schemes.contains(&cleaned[..colon]),
            (None, _) => true,
        }
    }
}
