//! HTML serialization for virtual trees.

use crate::vdom::VNode;

/// Options for HTML rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

struct Context<'a> {
    options: &'a RenderOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            for _ in 0..self.depth {
                self.buffer.push_str(&self.options.indent);
            }
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }
}

/// Render a virtual tree to an HTML string
pub fn render_html(node: &VNode, options: &RenderOptions) -> String {
    let mut ctx = Context::new(options);
    render_node(node, &mut ctx);
    ctx.buffer
}

fn render_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Element {
            tag,
            attributes,
            children,
            key,
        } => {
            let mut open = format!("<{}", tag);
            if let Some(key) = key {
                open.push_str(&format!(" data-key=\"{}\"", escape_html(key)));
            }
            for (name, value) in attributes {
                open.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
            }

            if is_self_closing(tag) {
                open.push_str(" />");
                ctx.add_line(&open);
                return;
            }

            open.push('>');
            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                render_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
        VNode::Text { content } => ctx.add_line(&escape_html(content)),
        VNode::Fragment { children } => {
            for child in children {
                render_node(child, ctx);
            }
        }
        VNode::RawHtml { html } => ctx.add_line(html),
        VNode::Editable {
            attribute,
            path,
            control,
            child,
        } => {
            ctx.add_line(&format!(
                "<div data-resonance-editable=\"{}\" data-resonance-path=\"{}\" \
                 data-resonance-control=\"{}\">",
                escape_html(attribute),
                escape_html(path),
                escape_html(control)
            ));
            ctx.indent();
            render_node(child, ctx);
            ctx.dedent();
            ctx.add_line("</div>");
        }
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
