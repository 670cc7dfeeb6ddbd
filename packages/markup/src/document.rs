//! Structured document state for the rich-text surface.
//!
//! The JSON shape follows the editor-state layout used by the editing
//! surface: `{"root":{"children":[...]}}` with `type`-tagged block and
//! inline nodes. Unknown node types deserialize to `Unknown` and are dropped
//! by [`EditorDocument::normalize`].

use crate::error::MarkupError;
use serde::{Deserialize, Serialize};

pub const FORMAT_BOLD: u32 = 1;
pub const FORMAT_ITALIC: u32 = 1 << 1;
pub const FORMAT_STRIKETHROUGH: u32 = 1 << 2;
pub const FORMAT_UNDERLINE: u32 = 1 << 3;
pub const FORMAT_CODE: u32 = 1 << 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorDocument {
    pub root: RootNode,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RootNode {
    #[serde(default)]
    pub children: Vec<BlockNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingTag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingTag {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(HeadingTag::H1),
            "h2" => Some(HeadingTag::H2),
            "h3" => Some(HeadingTag::H3),
            "h4" => Some(HeadingTag::H4),
            "h5" => Some(HeadingTag::H5),
            "h6" => Some(HeadingTag::H6),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingTag::H1 => "h1",
            HeadingTag::H2 => "h2",
            HeadingTag::H3 => "h3",
            HeadingTag::H4 => "h4",
            HeadingTag::H5 => "h5",
            HeadingTag::H6 => "h6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Bullet,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockNode {
    Paragraph {
        #[serde(default)]
        children: Vec<InlineNode>,
    },
    Heading {
        tag: HeadingTag,
        #[serde(default)]
        children: Vec<InlineNode>,
    },
    Quote {
        #[serde(default)]
        children: Vec<InlineNode>,
    },
    List {
        #[serde(rename = "listType")]
        list_type: ListType,
        #[serde(default)]
        children: Vec<BlockNode>,
    },
    #[serde(rename = "listitem")]
    ListItem {
        #[serde(default)]
        children: Vec<InlineNode>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InlineNode {
    Text {
        text: String,
        #[serde(default)]
        format: u32,
    },
    Link {
        url: String,
        #[serde(default)]
        children: Vec<InlineNode>,
    },
    #[serde(rename = "linebreak")]
    LineBreak,
    #[serde(other)]
    Unknown,
}

impl InlineNode {
    pub fn text(text: impl Into<String>) -> Self {
        InlineNode::Text {
            text: text.into(),
            format: 0,
        }
    }

    pub fn formatted(text: impl Into<String>, format: u32) -> Self {
        InlineNode::Text {
            text: text.into(),
            format,
        }
    }
}

impl BlockNode {
    pub fn paragraph(children: Vec<InlineNode>) -> Self {
        BlockNode::Paragraph { children }
    }

    fn inlines_mut(&mut self) -> Option<&mut Vec<InlineNode>> {
        match self {
            BlockNode::Paragraph { children }
            | BlockNode::Heading { children, .. }
            | BlockNode::Quote { children }
            | BlockNode::ListItem { children } => Some(children),
            BlockNode::List { .. } | BlockNode::Unknown => None,
        }
    }
}

impl EditorDocument {
    /// A document holding one empty paragraph
    pub fn empty() -> Self {
        Self {
            root: RootNode {
                children: vec![BlockNode::paragraph(Vec::new())],
            },
        }
    }

    pub fn from_blocks(children: Vec<BlockNode>) -> Self {
        Self {
            root: RootNode { children },
        }
    }

    /// Parse persisted document state
    pub fn parse(raw: &str) -> Result<Self, MarkupError> {
        let document: EditorDocument = serde_json::from_str(raw)?;
        Ok(document)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Normalize into canonical form: unknown nodes dropped, adjacent text
    /// runs with the same format merged, block edges trimmed, and an empty
    /// document given a single empty paragraph.
    pub fn normalize(mut self) -> Self {
        let blocks = std::mem::take(&mut self.root.children);
        self.root.children = blocks.into_iter().filter_map(normalize_block).collect();
        if self.root.children.is_empty() {
            self.root.children.push(BlockNode::paragraph(Vec::new()));
        }
        self
    }

    /// Text content with blocks separated by newlines
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.root.children {
            collect_block_text(block, &mut lines);
        }
        lines.join("\n")
    }
}

fn normalize_block(mut block: BlockNode) -> Option<BlockNode> {
    match block {
        BlockNode::Unknown => None,
        BlockNode::List {
            list_type,
            children,
        } => {
            let items: Vec<BlockNode> = children
                .into_iter()
                .filter_map(normalize_block)
                .filter(|item| matches!(item, BlockNode::ListItem { .. }))
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(BlockNode::List {
                    list_type,
                    children: items,
                })
            }
        }
        _ => {
            if let Some(inlines) = block.inlines_mut() {
                let normalized = normalize_inlines(std::mem::take(inlines));
                *inlines = trim_edges(normalized);
            }
            Some(block)
        }
    }
}

fn normalize_inlines(inlines: Vec<InlineNode>) -> Vec<InlineNode> {
    let mut out: Vec<InlineNode> = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match inline {
            InlineNode::Unknown => {}
            InlineNode::Text { text, format } => {
                if text.is_empty() {
                    continue;
                }
                if let Some(InlineNode::Text {
                    text: last,
                    format: last_format,
                }) = out.last_mut()
                {
                    if *last_format == format {
                        last.push_str(&text);
                        continue;
                    }
                }
                out.push(InlineNode::Text { text, format });
            }
            InlineNode::Link { url, children } => {
                let children = normalize_inlines(children);
                if !children.is_empty() {
                    out.push(InlineNode::Link { url, children });
                }
            }
            InlineNode::LineBreak => out.push(InlineNode::LineBreak),
        }
    }
    out
}

fn trim_edges(mut inlines: Vec<InlineNode>) -> Vec<InlineNode> {
    if let Some(InlineNode::Text { text, .. }) = inlines.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(InlineNode::Text { text, .. }) = inlines.last_mut() {
        *text = text.trim_end().to_string();
    }
    inlines.retain(|inline| !matches!(inline, InlineNode::Text { text, .. } if text.is_empty()));
    inlines
}

fn collect_block_text(block: &BlockNode, lines: &mut Vec<String>) {
    match block {
        BlockNode::Paragraph { children }
        | BlockNode::Heading { children, .. }
        | BlockNode::Quote { children }
        | BlockNode::ListItem { children } => {
            let mut line = String::new();
            collect_inline_text(children, &mut line);
            lines.push(line);
        }
        BlockNode::List { children, .. } => {
            for child in children {
                collect_block_text(child, lines);
            }
        }
        BlockNode::Unknown => {}
    }
}

fn collect_inline_text(inlines: &[InlineNode], out: &mut String) {
    for inline in inlines {
        match inline {
            InlineNode::Text { text, .. } => out.push_str(text),
            InlineNode::Link { children, .. } => collect_inline_text(children, out),
            InlineNode::LineBreak => out.push('\n'),
            InlineNode::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_editor_state() {
        let raw = r#"{
            "root": {
                "type": "root",
                "version": 1,
                "children": [
                    {"type": "heading", "tag": "h2", "children": [
                        {"type": "text", "text": "Title", "format": 1}
                    ]},
                    {"type": "paragraph", "children": [{"type": "text", "text": "Body"}]}
                ]
            }
        }"#;

        let doc = EditorDocument::parse(raw).unwrap();
        assert_eq!(doc.root.children.len(), 2);
        assert_eq!(
            doc.root.children[0],
            BlockNode::Heading {
                tag: HeadingTag::H2,
                children: vec![InlineNode::formatted("Title", FORMAT_BOLD)],
            }
        );
        assert_eq!(doc.plain_text(), "Title\nBody");
    }

    #[test]
    fn test_parse_rejects_plain_markup() {
        assert!(EditorDocument::parse("<p>Hello</p>").is_err());
        assert!(EditorDocument::parse("").is_err());
        assert!(EditorDocument::parse("42").is_err());
    }

    #[test]
    fn test_unknown_nodes_dropped_on_normalize() {
        let raw = r#"{"root":{"children":[
            {"type":"image","src":"x.png"},
            {"type":"paragraph","children":[{"type":"emoji"},{"type":"text","text":"ok"}]}
        ]}}"#;

        let doc = EditorDocument::parse(raw).unwrap().normalize();
        assert_eq!(
            doc.root.children,
            vec![BlockNode::paragraph(vec![InlineNode::text("ok")])]
        );
    }

    #[test]
    fn test_normalize_merges_runs_and_trims() {
        let doc = EditorDocument::from_blocks(vec![BlockNode::paragraph(vec![
            InlineNode::text("  Hello"),
            InlineNode::text(" there "),
            InlineNode::formatted("!", FORMAT_BOLD),
            InlineNode::text("  "),
        ])])
        .normalize();

        assert_eq!(
            doc.root.children,
            vec![BlockNode::paragraph(vec![
                InlineNode::text("Hello there "),
                InlineNode::formatted("!", FORMAT_BOLD),
            ])]
        );
    }

    #[test]
    fn test_normalize_empty_document() {
        let doc = EditorDocument::from_blocks(Vec::new()).normalize();
        assert_eq!(doc, EditorDocument::empty());
    }

    #[test]
    fn test_json_roundtrip_keeps_shape() {
        let doc = EditorDocument::from_blocks(vec![BlockNode::List {
            list_type: ListType::Bullet,
            children: vec![BlockNode::ListItem {
                children: vec![InlineNode::text("one")],
            }],
        }]);

        let json = doc.to_json();
        assert!(json.contains(r#""type":"list""#));
        assert!(json.contains(r#""listType":"bullet""#));
        assert!(json.contains(r#""type":"listitem""#));
        assert_eq!(EditorDocument::parse(&json).unwrap(), doc);
    }
}
