//! Tree binding: rewires media nodes into editable wrappers.
//!
//! The binder is a [`Fold`] over the rendered tree. An `img` whose `src`
//! equals the effective value of an Image descriptor that has not matched yet
//! is wrapped in an [`VNode::Editable`] carrying that descriptor's key and
//! field path. The first unmatched descriptor in declaration order wins, and
//! each descriptor binds at most once. Everything else is rebuilt unchanged.

use crate::attributes::{strategy_for, AttributeDescriptor, AttributeType};
use crate::path::{compose, PathSegment};
use crate::resolver::ResolvedValues;
use resonance_common::{walk_node, Fold, Visitor};
use resonance_vdom::VNode;
use std::collections::BTreeMap;
use tracing::debug;

struct Candidate {
    key: String,
    source: String,
    matched: bool,
}

pub struct TreeBinder<'a> {
    scope_path: &'a str,
    candidates: Vec<Candidate>,
}

impl<'a> TreeBinder<'a> {
    pub fn new(
        scope_path: &'a str,
        descriptors: &[AttributeDescriptor],
        values: &ResolvedValues,
    ) -> Self {
        let candidates = descriptors
            .iter()
            .filter(|descriptor| descriptor.attribute_type == AttributeType::Image)
            .map(|descriptor| Candidate {
                key: descriptor.key.clone(),
                source: values.text(&descriptor.key),
                matched: false,
            })
            .collect();

        Self {
            scope_path,
            candidates,
        }
    }

    fn claim(&mut self, source: &str) -> Option<String> {
        let candidate = self
            .candidates
            .iter_mut()
            .find(|candidate| !candidate.matched && candidate.source == source)?;
        candidate.matched = true;
        Some(candidate.key.clone())
    }

    fn is_matched(&self, key: &str) -> bool {
        self.candidates
            .iter()
            .any(|candidate| candidate.matched && candidate.key == key)
    }
}

impl Fold for TreeBinder<'_> {
    fn fold_element(
        &mut self,
        tag: &str,
        attributes: &BTreeMap<String, String>,
        children: &[VNode],
        key: Option<&str>,
    ) -> VNode {
        let original = |children: Vec<VNode>| VNode::Element {
            tag: tag.to_string(),
            attributes: attributes.clone(),
            children,
            key: key.map(str::to_string),
        };

        if tag == "img" {
            if let Some(source) = attributes.get("src") {
                if let Some(attribute) = self.claim(source) {
                    let path = compose(self.scope_path, &PathSegment::attribute(&attribute));
                    debug!(attribute = %attribute, path = %path, "Bound media node");
                    let control = strategy_for(AttributeType::Image).control();
                    return VNode::editable(attribute, path, control, original(children.to_vec()));
                }
            }
        }

        original(self.fold_children(children))
    }
}

/// Result of binding one tree
#[derive(Debug, Clone, PartialEq)]
pub struct BindOutcome {
    pub tree: VNode,
    /// Descriptor keys bound to a node, in declaration order
    pub bound: Vec<String>,
    /// Descriptor keys left for standalone controls, in declaration order
    pub unmatched: Vec<String>,
}

/// Bind a rendered tree against a scope's descriptors
pub fn bind(
    tree: &VNode,
    scope_path: &str,
    descriptors: &[AttributeDescriptor],
    values: &ResolvedValues,
) -> BindOutcome {
    let mut binder = TreeBinder::new(scope_path, descriptors, values);
    let tree = binder.fold_node(tree);

    let (bound, unmatched): (Vec<String>, Vec<String>) = descriptors
        .iter()
        .map(|descriptor| descriptor.key.clone())
        .partition(|key| binder.is_matched(key));

    BindOutcome {
        tree,
        bound,
        unmatched,
    }
}

/// One editable wrapper found in a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableSite {
    pub attribute: String,
    pub path: String,
    pub control: String,
}

#[derive(Default)]
struct SiteCollector {
    sites: Vec<EditableSite>,
}

impl Visitor for SiteCollector {
    fn visit_editable(&mut self, attribute: &str, path: &str, control: &str, child: &VNode) {
        self.sites.push(EditableSite {
            attribute: attribute.to_string(),
            path: path.to_string(),
            control: control.to_string(),
        });
        self.visit_node(child);
    }
}

/// Every editable wrapper in document order, including nested ones
pub fn editable_sites(tree: &VNode) -> Vec<EditableSite> {
    let mut collector = SiteCollector::default();
    walk_node(&mut collector, tree);
    collector.sites
}
