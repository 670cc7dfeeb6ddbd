use resonance_vdom::VNode;
use std::collections::BTreeMap;

/// Visitor pattern for traversing virtual trees immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &VNode) {
        walk_node(self, node);
    }

    fn visit_element(
        &mut self,
        _tag: &str,
        _attributes: &BTreeMap<String, String>,
        children: &[VNode],
    ) {
        for child in children {
            self.visit_node(child);
        }
    }

    fn visit_text(&mut self, _content: &str) {
        // Leaf node, no children to walk
    }

    fn visit_raw_html(&mut self, _html: &str) {
        // Leaf node, no children to walk
    }

    fn visit_editable(&mut self, _attribute: &str, _path: &str, _control: &str, child: &VNode) {
        self.visit_node(child);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &VNode) {
    match node {
        VNode::Element {
            tag,
            attributes,
            children,
            ..
        } => visitor.visit_element(tag, attributes, children),
        VNode::Text { content } => visitor.visit_text(content),
        VNode::Fragment { children } => {
            for child in children {
                visitor.visit_node(child);
            }
        }
        VNode::RawHtml { html } => visitor.visit_raw_html(html),
        VNode::Editable {
            attribute,
            path,
            control,
            child,
        } => visitor.visit_editable(attribute, path, control, child),
    }
}

/// Folding pattern for rewriting virtual trees
///
/// A fold consumes nothing and returns a new tree. Default implementations
/// rebuild every composite node with folded children and keep leaves as-is,
/// so an empty `impl Fold` is an identity transform.
pub trait Fold: Sized {
    fn fold_node(&mut self, node: &VNode) -> VNode {
        walk_fold(self, node)
    }

    fn fold_element(
        &mut self,
        tag: &str,
        attributes: &BTreeMap<String, String>,
        children: &[VNode],
        key: Option<&str>,
    ) -> VNode {
        VNode::Element {
            tag: tag.to_string(),
            attributes: attributes.clone(),
            children: self.fold_children(children),
            key: key.map(str::to_string),
        }
    }

    fn fold_children(&mut self, children: &[VNode]) -> Vec<VNode> {
        children.iter().map(|child| self.fold_node(child)).collect()
    }
}

pub fn walk_fold<F: Fold>(folder: &mut F, node: &VNode) -> VNode {
    match node {
        VNode::Element {
            tag,
            attributes,
            children,
            key,
        } => folder.fold_element(tag, attributes, children, key.as_deref()),
        VNode::Fragment { children } => VNode::Fragment {
            children: folder.fold_children(children),
        },
        // Leaves and already-editable wrappers pass through unchanged
        VNode::Text { .. } | VNode::RawHtml { .. } | VNode::Editable { .. } => node.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TextCounter {
        count: usize,
    }

    impl Visitor for TextCounter {
        fn visit_text(&mut self, _content: &str) {
            self.count += 1;
        }
    }

    struct Identity;

    impl Fold for Identity {}

    struct Uppercase;

    impl Fold for Uppercase {
        fn fold_node(&mut self, node: &VNode) -> VNode {
            match node {
                VNode::Text { content } => VNode::text(content.to_uppercase()),
                other => walk_fold(self, other),
            }
        }
    }

    fn sample() -> VNode {
        VNode::element("div")
            .with_attr("id", "root")
            .with_child(VNode::text("a"))
            .with_child(VNode::fragment(vec![VNode::text("b")]))
            .with_child(VNode::editable("k", "k", "image", VNode::text("c")))
    }

    #[test]
    fn test_visitor_counts_text_through_editable() {
        let mut counter = TextCounter { count: 0 };
        counter.visit_node(&sample());
        assert_eq!(counter.count, 3);
    }

    #[test]
    fn test_identity_fold_preserves_tree() {
        let tree = sample();
        assert_eq!(Identity.fold_node(&tree), tree);
    }

    #[test]
    fn test_fold_rewrites_without_mutating_input() {
        let tree = sample();
        let folded = Uppercase.fold_node(&tree);

        assert_eq!(tree.children()[0], VNode::text("a"));
        assert_eq!(folded.children()[0], VNode::text("A"));
        assert_eq!(folded.attr("id"), Some("root"));
        // Editable wrappers are not descended into
        assert_eq!(folded.children()[2], tree.children()[2]);
    }
}
