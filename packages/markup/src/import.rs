//! Markup → document import.
//!
//! Converts an HTML fragment into an [`EditorDocument`]. Block tags open
//! blocks, inline formatting tags accumulate a format bitmask, loose text is
//! collected into paragraphs. Script-like elements are skipped with their
//! content. The result is always normalized.

use crate::document::{
    BlockNode, EditorDocument, HeadingTag, InlineNode, ListType, FORMAT_BOLD, FORMAT_CODE,
    FORMAT_ITALIC, FORMAT_STRIKETHROUGH, FORMAT_UNDERLINE,
};
use crate::lexer::{tokenize, MarkupEvent, TagToken};

const SKIPPED_CONTENT: &[&str] = &["script", "style", "textarea", "noscript", "template"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum OpenBlock {
    Paragraph,
    Heading(HeadingTag),
    Quote,
    ListItem,
}

#[derive(Default)]
struct Importer {
    blocks: Vec<BlockNode>,
    current: Option<(OpenBlock, Vec<InlineNode>)>,
    list: Option<(ListType, Vec<BlockNode>)>,
    link: Option<(String, Vec<InlineNode>)>,
    formats: Vec<(String, u32)>,
    skip: Option<(String, usize)>,
}

/// Import markup as a normalized document
pub fn import_markup(markup: &str) -> EditorDocument {
    let mut importer = Importer::default();
    for event in tokenize(markup) {
        importer.handle(event);
    }
    importer.finish().normalize()
}

impl Importer {
    fn handle(&mut self, event: MarkupEvent) {
        if let Some((tag, depth)) = &mut self.skip {
            match &event {
                MarkupEvent::Start(start) if &start.name == tag => *depth += 1,
                MarkupEvent::End(name) if name == tag => {
                    *depth -= 1;
                    if *depth == 0 {
                        self.skip = None;
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            MarkupEvent::Start(tag) => self.start(tag),
            MarkupEvent::End(name) => self.end(&name),
            MarkupEvent::Text(text) => self.text(&text),
        }
    }

    fn start(&mut self, tag: TagToken) {
        let name = tag.name.as_str();
        if SKIPPED_CONTENT.contains(&name) {
            self.skip = Some((tag.name.clone(), 1));
            return;
        }

        match name {
            "p" | "div" | "section" | "article" => self.open_block(OpenBlock::Paragraph),
            "blockquote" => self.open_block(OpenBlock::Quote),
            "ul" | "ol" => {
                self.flush_block();
                self.flush_list();
                let list_type = if name == "ol" {
                    ListType::Number
                } else {
                    ListType::Bullet
                };
                self.list = Some((list_type, Vec::new()));
            }
            "li" => {
                if self.list.is_none() {
                    self.list = Some((ListType::Bullet, Vec::new()));
                }
                self.open_block(OpenBlock::ListItem);
            }
            "br" => self.push_inline(InlineNode::LineBreak),
            "a" => {
                self.ensure_block();
                let url = tag.attr("href").unwrap_or_default().to_string();
                self.link = Some((url, Vec::new()));
            }
            _ => {
                if let Some(heading) = HeadingTag::from_tag(name) {
                    self.open_block(OpenBlock::Heading(heading));
                } else if let Some(format) = format_for(name) {
                    if !tag.self_closing {
                        self.formats.push((tag.name.clone(), format));
                    }
                }
            }
        }
    }

    fn end(&mut self, name: &str) {
        match name {
            "p" | "div" | "section" | "article" | "blockquote" | "li" => self.flush_block(),
            "ul" | "ol" => {
                self.flush_block();
                self.flush_list();
            }
            "a" => self.close_link(),
            _ => {
                if HeadingTag::from_tag(name).is_some() {
                    self.flush_block();
                } else if let Some(pos) = self.formats.iter().rposition(|(tag, _)| tag == name) {
                    self.formats.truncate(pos);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        let collapsed = collapse_whitespace(text);
        if self.current.is_none() && collapsed.trim().is_empty() {
            return;
        }
        let format = self.formats.iter().fold(0, |acc, (_, bit)| acc | bit);
        self.push_inline(InlineNode::formatted(collapsed, format));
    }

    fn open_block(&mut self, kind: OpenBlock) {
        self.flush_block();
        if kind != OpenBlock::ListItem {
            self.flush_list();
        }
        self.current = Some((kind, Vec::new()));
    }

    fn ensure_block(&mut self) {
        if self.current.is_none() {
            if self.list.is_some() {
                self.current = Some((OpenBlock::ListItem, Vec::new()));
            } else {
                self.current = Some((OpenBlock::Paragraph, Vec::new()));
            }
        }
    }

    fn push_inline(&mut self, inline: InlineNode) {
        if let Some((_, children)) = &mut self.link {
            children.push(inline);
            return;
        }
        self.ensure_block();
        if let Some((_, children)) = &mut self.current {
            children.push(inline);
        }
    }

    fn close_link(&mut self) {
        if let Some((url, children)) = self.link.take() {
            self.push_inline(InlineNode::Link { url, children });
        }
    }

    fn flush_block(&mut self) {
        self.close_link();
        let Some((kind, children)) = self.current.take() else {
            return;
        };
        let block = match kind {
            OpenBlock::Paragraph => BlockNode::Paragraph { children },
            OpenBlock::Heading(tag) => BlockNode::Heading { tag, children },
            OpenBlock::Quote => BlockNode::Quote { children },
            OpenBlock::ListItem => BlockNode::ListItem { children },
        };
        match (&mut self.list, kind) {
            (Some((_, items)), OpenBlock::ListItem) => items.push(block),
            _ => self.blocks.push(block),
        }
    }

    fn flush_list(&mut self) {
        if let Some((list_type, children)) = self.list.take() {
            self.blocks.push(BlockNode::List {
                list_type,
                children,
            });
        }
    }

    fn finish(mut self) -> EditorDocument {
        self.flush_block();
        self.flush_list();
        EditorDocument::from_blocks(self.blocks)
    }
}

fn format_for(tag: &str) -> Option<u32> {
    match tag {
        "b" | "strong" => Some(FORMAT_BOLD),
        "i" | "em" => Some(FORMAT_ITALIC),
        "u" => Some(FORMAT_UNDERLINE),
        "s" | "strike" | "del" => Some(FORMAT_STRIKETHROUGH),
        "code" => Some(FORMAT_CODE),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.chars() {
        if c.is_whitespace() && c != '\u{a0}' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_paragraphs_and_formats() {
        let doc = import_markup("<p>Hello <b>bold <i>both</i></b></p><p>Second</p>");
        assert_eq!(
            doc.root.children,
            vec![
                BlockNode::paragraph(vec![
                    InlineNode::text("Hello "),
                    InlineNode::formatted("bold ", FORMAT_BOLD),
                    InlineNode::formatted("both", FORMAT_BOLD | FORMAT_ITALIC),
                ]),
                BlockNode::paragraph(vec![InlineNode::text("Second")]),
            ]
        );
    }

    #[test]
    fn test_loose_text_becomes_paragraph() {
        let doc = import_markup("Just some   text");
        assert_eq!(
            doc.root.children,
            vec![BlockNode::paragraph(vec![InlineNode::text("Just some text")])]
        );
    }

    #[test]
    fn test_import_headings_lists_links() {
        let doc = import_markup(
            r#"<h2>Title</h2><ul><li>One</li><li><a href="/two">Two</a></li></ul>"#,
        );
        assert_eq!(
            doc.root.children,
            vec![
                BlockNode::Heading {
                    tag: HeadingTag::H2,
                    children: vec![InlineNode::text("Title")],
                },
                BlockNode::List {
                    list_type: ListType::Bullet,
                    children: vec![
                        BlockNode::ListItem {
                            children: vec![InlineNode::text("One")],
                        },
                        BlockNode::ListItem {
                            children: vec![InlineNode::Link {
                                url: "/two".to_string(),
                                children: vec![InlineNode::text("Two")],
                            }],
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_script_content_skipped() {
        let doc = import_markup("<p>Safe</p><script>alert('x')</script><p>After</p>");
        assert_eq!(doc.plain_text(), "Safe\nAfter");
    }

    #[test]
    fn test_self_closing_script_content_skipped() {
        let doc = import_markup("<p>Safe</p><script/>alert('x')</script><p>After</p>");
        assert_eq!(doc.plain_text(), "Safe\nAfter");
    }

    #[test]
    fn test_empty_markup_yields_empty_paragraph() {
        assert_eq!(import_markup(""), EditorDocument::empty());
        assert_eq!(import_markup("   \n  "), EditorDocument::empty());
    }
}
