//! Document → HTML export.

use crate::document::{
    BlockNode, EditorDocument, InlineNode, ListType, FORMAT_BOLD, FORMAT_CODE, FORMAT_ITALIC,
    FORMAT_STRIKETHROUGH, FORMAT_UNDERLINE,
};
use resonance_vdom::escape_html;

/// Formats in the order their tags are opened (outermost first)
const FORMAT_TAGS: &[(u32, &str)] = &[
    (FORMAT_CODE, "code"),
    (FORMAT_BOLD, "strong"),
    (FORMAT_ITALIC, "em"),
    (FORMAT_UNDERLINE, "u"),
    (FORMAT_STRIKETHROUGH, "s"),
];

/// Render a document to HTML
pub fn to_html(document: &EditorDocument) -> String {
    let mut out = String::new();
    for block in &document.root.children {
        push_block(block, &mut out);
    }
    out
}

fn push_block(block: &BlockNode, out: &mut String) {
    match block {
        BlockNode::Paragraph { children } => push_wrapped("p", children, out),
        BlockNode::Heading { tag, children } => push_wrapped(tag.as_str(), children, out),
        BlockNode::Quote { children } => push_wrapped("blockquote", children, out),
        BlockNode::ListItem { children } => push_wrapped("li", children, out),
        BlockNode::List {
            list_type,
            children,
        } => {
            let tag = match list_type {
                ListType::Bullet => "ul",
                ListType::Number => "ol",
            };
            out.push_str(&format!("<{}>", tag));
            for child in children {
                push_block(child, out);
            }
            out.push_str(&format!("</{}>", tag));
        }
        BlockNode::Unknown => {}
    }
}

fn push_wrapped(tag: &str, children: &[InlineNode], out: &mut String) {
    out.push_str(&format!("<{}>", tag));
    if children.is_empty() {
        out.push_str("<br>");
    } else {
        push_inlines(children, out);
    }
    out.push_str(&format!("</{}>", tag));
}

fn push_inlines(inlines: &[InlineNode], out: &mut String) {
    for inline in inlines {
        match inline {
            InlineNode::Text { text, format } => {
                let open: Vec<&str> = FORMAT_TAGS
                    .iter()
                    .filter(|(bit, _)| format & bit != 0)
                    .map(|(_, tag)| *tag)
                    .collect();
                for tag in &open {
                    out.push_str(&format!("<{}>", tag));
                }
                out.push_str(&escape_html(text));
                for tag in open.iter().rev() {
                    out.push_str(&format!("</{}>", tag));
                }
            }
            InlineNode::Link { url, children } => {
                out.push_str(&format!("<a href=\"{}\">", escape_html(url)));
                push_inlines(children, out);
                out.push_str("</a>");
            }
            InlineNode::LineBreak => out.push_str("<br>"),
            InlineNode::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HeadingTag;

    #[test]
    fn test_export_formats_nest_in_order() {
        let doc = EditorDocument::from_blocks(vec![BlockNode::paragraph(vec![
            InlineNode::text("Hi "),
            InlineNode::formatted("there", FORMAT_BOLD | FORMAT_ITALIC),
        ])]);

        assert_eq!(to_html(&doc), "<p>Hi <strong><em>there</em></strong></p>");
    }

    #[test]
    fn test_export_escapes_text_and_urls() {
        let doc = EditorDocument::from_blocks(vec![BlockNode::Heading {
            tag: HeadingTag::H1,
            children: vec![InlineNode::Link {
                url: "/a?x=\"1\"".to_string(),
                children: vec![InlineNode::text("<script>")],
            }],
        }]);

        assert_eq!(
            to_html(&doc),
            "<h1><a href=\"/a?x=&quot;1&quot;\">&lt;script&gt;</a></h1>"
        );
    }

    #[test]
    fn test_export_lists_and_empty_blocks() {
        let doc = EditorDocument::from_blocks(vec![
            BlockNode::List {
                list_type: ListType::Number,
                children: vec![BlockNode::ListItem {
                    children: vec![InlineNode::text("one")],
                }],
            },
            BlockNode::paragraph(Vec::new()),
        ]);

        assert_eq!(to_html(&doc), "<ol><li>one</li></ol><p><br></p>");
    }
}
