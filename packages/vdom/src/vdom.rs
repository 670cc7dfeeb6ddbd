use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<VNode>,
        /// Explicit key for repeated items
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },

    /// Ordered children without a wrapping element
    Fragment {
        #[serde(default)]
        children: Vec<VNode>,
    },

    /// Markup that has already been sanitized and is inserted verbatim
    RawHtml { html: String },

    /// A rendered node rewired into an editable control for one attribute
    Editable {
        attribute: String,
        path: String,
        control: String,
        child: Box<VNode>,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn fragment(children: Vec<VNode>) -> Self {
        VNode::Fragment { children }
    }

    pub fn raw_html(html: impl Into<String>) -> Self {
        VNode::RawHtml { html: html.into() }
    }

    pub fn editable(
        attribute: impl Into<String>,
        path: impl Into<String>,
        control: impl Into<String>,
        child: VNode,
    ) -> Self {
        VNode::Editable {
            attribute: attribute.into(),
            path: path.into(),
            control: control.into(),
            child: Box::new(child),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        match self {
            VNode::Element {
                ref mut children, ..
            }
            | VNode::Fragment { ref mut children } => children.push(child),
            _ => {}
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        match self {
            VNode::Element {
                ref mut children, ..
            }
            | VNode::Fragment { ref mut children } => children.extend(new_children),
            _ => {}
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    /// Element tag, if this is an element
    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    /// Ordered children of composite nodes (elements and fragments)
    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } | VNode::Fragment { children } => children,
            _ => &[],
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, VNode::Element { .. })
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, VNode::Editable { .. })
    }

    /// Concatenated text content of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Depth-first search for the first node matching `predicate`
    pub fn find(&self, predicate: &dyn Fn(&VNode) -> bool) -> Option<&VNode> {
        if predicate(self) {
            return Some(self);
        }
        if let VNode::Editable { child, .. } = self {
            return child.find(predicate);
        }
        self.children().iter().find_map(|child| child.find(predicate))
    }

    /// Collect every node matching `predicate`, depth-first
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&VNode) -> bool, out: &mut Vec<&'a VNode>) {
        if predicate(self) {
            out.push(self);
        }
        if let VNode::Editable { child, .. } = self {
            child.find_all(predicate, out);
            return;
        }
        for child in self.children() {
            child.find_all(predicate, out);
        }
    }
}

fn collect_text(node: &VNode, out: &mut String) {
    match node {
        VNode::Text { content } => out.push_str(content),
        VNode::Editable { child, .. } => collect_text(child, out),
        VNode::RawHtml { .. } => {}
        VNode::Element { children, .. } | VNode::Fragment { children } => {
            for child in children {
                collect_text(child, out);
            }
        }
    }
}

/// Virtual Document (collection of root nodes)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VirtualDomDocument {
    pub nodes: Vec<VNode>,
}

impl VirtualDomDocument {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_node(&mut self, node: VNode) {
        self.nodes.push(node);
    }

    /// Load a document from JSON; a single root node is accepted as well
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<VirtualDomDocument>(json) {
            Ok(doc) => Ok(doc),
            Err(_) => {
                let node: VNode = serde_json::from_str(json)?;
                Ok(Self { nodes: vec![node] })
            }
        }
    }

    /// All roots wrapped into one fragment
    pub fn into_root(self) -> VNode {
        VNode::fragment(self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let node = VNode::element("div")
            .with_attr("class", "card")
            .with_child(VNode::text("Hello"))
            .with_key("a");

        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.attr("class"), Some("card"));
        assert_eq!(node.key(), Some("a"));
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.text_content(), "Hello");
    }

    #[test]
    fn test_with_attr_ignores_text() {
        let node = VNode::text("plain").with_attr("class", "x");
        assert_eq!(node, VNode::text("plain"));
    }

    #[test]
    fn test_serde_shape() {
        let json = r#"{"type":"Element","tag":"img","attributes":{"src":"/a.png"}}"#;
        let node: VNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.attr("src"), Some("/a.png"));
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_document_accepts_single_node() {
        let doc = VirtualDomDocument::from_json(r#"{"type":"Text","content":"hi"}"#).unwrap();
        assert_eq!(doc.nodes.len(), 1);

        let doc = VirtualDomDocument::from_json(r#"{"nodes":[]}"#).unwrap();
        assert!(doc.nodes.is_empty());
    }

    #[test]
    fn test_find_descends_into_editable() {
        let tree = VNode::element("section").with_child(VNode::editable(
            "hero",
            "hero",
            "image",
            VNode::element("img").with_attr("src", "/hero.png"),
        ));

        let found = tree.find(&|n| n.tag() == Some("img"));
        assert_eq!(found.and_then(|n| n.attr("src")), Some("/hero.png"));
    }
}
