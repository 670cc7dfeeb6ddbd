//! # Content Scope
//!
//! One named binding of a persisted bundle, a session override layer and the
//! pending (staged, not yet saved) control values. Scopes nest: child scopes
//! and list items compose their paths from the parent and never write to it.
//!
//! Reads go through three layers:
//!
//! ```text
//! preview snapshot (while previewing)
//!         ↓ otherwise
//! overrides (if truthy) → bundle (if truthy) → fallback
//! ```
//!
//! Pending values are what the controls currently hold. They are shown in the
//! controls, included in preview snapshots and in emitted fields, and become
//! overrides on commit.

use crate::attributes::{strategy_for, AttributeDescriptor, AttributeType, FieldType};
use crate::binder::bind;
use crate::error::{ContentError, ContentResult};
use crate::fields::{FieldEmitter, FieldSet};
use crate::image::ImageFile;
use crate::list::ListController;
use crate::mode::{EditMode, RenderContext};
use crate::mount::MountGate;
use crate::path::{compose, PathSegment};
use crate::resolver::{resolve, resolve_value, OverrideLayer, ResolvedValues};
use crate::value::{ContentBundle, ContentValue};
use resonance_markup::{EditorDocument, MarkupCommit, RichTextBridge, Sanitizer};
use resonance_vdom::VNode;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// An attribute registered by a rendering helper
#[derive(Debug, Clone)]
struct FieldBinding {
    key: String,
    attribute_type: AttributeType,
    fallback: ContentValue,
}

#[derive(Debug)]
pub struct ContentScope {
    name: String,
    path: String,
    bundle: ContentBundle,
    overrides: OverrideLayer,
    pending: BTreeMap<String, String>,
    staged_images: BTreeMap<String, ImageFile>,
    bindings: Vec<FieldBinding>,
    markups: Vec<RichTextBridge>,
    lists: Vec<ListController>,
    children: Vec<ContentScope>,
    preview: Option<ContentBundle>,
    sanitizer: Arc<Sanitizer>,
    gate: Option<MountGate>,
}

impl ContentScope {
    /// A root scope; its path is its name
    pub fn new(name: impl Into<String>, bundle: ContentBundle, sanitizer: Arc<Sanitizer>) -> Self {
        let name = name.into();
        let path = compose("", &PathSegment::scope(&name));
        Self::with_path(name, path, bundle, sanitizer)
    }

    pub(crate) fn with_path(
        name: impl Into<String>,
        path: impl Into<String>,
        bundle: ContentBundle,
        sanitizer: Arc<Sanitizer>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            bundle,
            overrides: OverrideLayer::new(),
            pending: BTreeMap::new(),
            staged_images: BTreeMap::new(),
            bindings: Vec::new(),
            markups: Vec::new(),
            lists: Vec::new(),
            children: Vec::new(),
            preview: None,
            sanitizer,
            gate: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn bundle(&self) -> &ContentBundle {
        &self.bundle
    }

    pub fn overrides(&self) -> &OverrideLayer {
        &self.overrides
    }

    pub fn pending(&self, key: &str) -> Option<&str> {
        self.pending.get(key).map(String::as_str)
    }

    pub fn preview_snapshot(&self) -> Option<&ContentBundle> {
        self.preview.as_ref()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    /// Delay interactivity of this scope's controls
    pub fn start_mount_gate(&mut self, delay: Duration) {
        self.gate = Some(MountGate::start(delay));
    }

    pub fn is_interactive(&self) -> bool {
        self.gate.as_ref().map(MountGate::is_open).unwrap_or(true)
    }

    pub fn render_context(&self, mode: EditMode) -> RenderContext {
        RenderContext::new(mode).with_interactive(self.is_interactive())
    }

    pub(crate) fn set_path(&mut self, path: String) {
        for child in &mut self.children {
            child.set_path(compose(&path, &PathSegment::scope(&child.name)));
        }
        for list in &mut self.lists {
            list.set_parent_path(path.clone());
        }
        self.path = path;
    }

    fn attribute_path(&self, key: &str) -> String {
        compose(&self.path, &PathSegment::attribute(key))
    }

    // Values

    /// Effective value of a key, preview-aware
    pub fn value(&self, key: &str, fallback: &ContentValue) -> ContentValue {
        match &self.preview {
            Some(snapshot) => resolve_value(key, snapshot, &OverrideLayer::new(), fallback),
            None => resolve_value(key, &self.bundle, &self.overrides, fallback),
        }
    }

    /// Text currently held by the control of a key
    pub fn control_text(&self, key: &str, fallback: &ContentValue) -> String {
        match self.pending.get(key) {
            Some(raw) => raw.clone(),
            None => self.value(key, fallback).to_text(),
        }
    }

    /// Bundle with overrides and pending values folded in
    pub fn merged_bundle(&self) -> ContentBundle {
        let mut merged = self.bundle.clone();
        for (key, value) in self.overrides.iter() {
            merged.insert(key.clone(), value.clone());
        }
        for (key, raw) in &self.pending {
            merged.insert(key.clone(), ContentValue::Text(raw.clone()));
        }
        merged
    }

    fn resolve_descriptors(&self, descriptors: &[AttributeDescriptor]) -> ResolvedValues {
        match &self.preview {
            Some(snapshot) => resolve(snapshot, &OverrideLayer::new(), descriptors),
            None => resolve(&self.bundle, &self.overrides, descriptors),
        }
    }

    fn register(&mut self, key: &str, attribute_type: AttributeType, fallback: ContentValue) {
        match self.bindings.iter_mut().find(|binding| binding.key == key) {
            Some(binding) => {
                binding.attribute_type = attribute_type;
                binding.fallback = fallback;
            }
            None => self.bindings.push(FieldBinding {
                key: key.to_string(),
                attribute_type,
                fallback,
            }),
        }
    }

    fn binding(&self, key: &str) -> ContentResult<&FieldBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.key == key)
            .ok_or_else(|| ContentError::UnknownAttribute {
                scope: self.path.clone(),
                key: key.to_string(),
            })
    }

    // Rendering helpers

    /// A plain text attribute
    pub fn text(
        &mut self,
        ctx: &RenderContext,
        attribute: &str,
        fallback: impl Into<ContentValue>,
    ) -> VNode {
        let fallback = fallback.into();
        self.register(attribute, AttributeType::RawString, fallback.clone());

        if ctx.controls() {
            let current = ContentValue::Text(self.control_text(attribute, &fallback));
            strategy_for(AttributeType::RawString).bind(
                attribute,
                &self.attribute_path(attribute),
                &current,
                ctx.enabled(),
            )
        } else {
            VNode::text(self.value(attribute, &fallback).to_text())
        }
    }

    /// A rich text attribute backed by a [`RichTextBridge`]
    pub fn markup(&mut self, ctx: &RenderContext, attribute: &str, fallback_html: &str) -> VNode {
        let bridge = match self.markups.iter().position(|m| m.attribute() == attribute) {
            Some(index) => &self.markups[index],
            None => {
                let raw = self.value(attribute, &ContentValue::Null);
                let raw = raw.is_truthy().then(|| raw.to_text());
                let bridge = RichTextBridge::mount(
                    attribute,
                    raw.as_deref(),
                    fallback_html,
                    self.sanitizer.clone(),
                );
                self.markups.push(bridge);
                &self.markups[self.markups.len() - 1]
            }
        };

        let node = bridge.render(ctx.controls());
        if ctx.controls() {
            node.with_attr("data-resonance-path", self.attribute_path(attribute))
        } else {
            node
        }
    }

    /// Typed attributes rendered through `render`
    ///
    /// While editing, media nodes in the rendered tree are bound to Image
    /// descriptors and every other descriptor gets a standalone control
    /// after the tree.
    pub fn attributes<F>(
        &mut self,
        ctx: &RenderContext,
        descriptors: &[AttributeDescriptor],
        render: F,
    ) -> ContentResult<VNode>
    where
        F: FnOnce(&ResolvedValues) -> VNode,
    {
        AttributeDescriptor::validate_unique(descriptors)?;
        for descriptor in descriptors {
            self.register(
                &descriptor.key,
                descriptor.attribute_type,
                descriptor.default_value.clone(),
            );
        }

        let values = self.resolve_descriptors(descriptors);
        let tree = render(&values);
        if !ctx.controls() {
            return Ok(tree);
        }

        let outcome = bind(&tree, &self.path, descriptors, &values);
        let mut container = VNode::element("div")
            .with_attr("data-resonance-attributes", self.path.as_str())
            .with_child(outcome.tree);

        for key in &outcome.unmatched {
            let Some(descriptor) = descriptors.iter().find(|d| &d.key == key) else {
                continue;
            };
            let current = match self.pending.get(key) {
                Some(raw) => ContentValue::Text(raw.clone()),
                None => values.get(key).cloned().unwrap_or_default(),
            };
            container = container.with_child(descriptor.strategy().bind(
                key,
                &self.attribute_path(key),
                &current,
                ctx.enabled(),
            ));
        }

        Ok(container)
    }

    /// A repeatable list; hydrated on first use
    pub fn list<F>(
        &mut self,
        ctx: &RenderContext,
        attribute: &str,
        default_items: &ContentValue,
        render_item: F,
    ) -> VNode
    where
        F: FnMut(&mut ContentScope, usize) -> VNode,
    {
        let index = match self.lists.iter().position(|l| l.attribute() == attribute) {
            Some(index) => index,
            None => {
                let items = self.value(attribute, default_items);
                let mut list = ListController::hydrate(
                    attribute,
                    self.path.clone(),
                    &items,
                    self.sanitizer.clone(),
                );
                if self.preview.is_some() {
                    list.enter_preview();
                }
                self.lists.push(list);
                self.lists.len() - 1
            }
        };

        self.lists[index].render(ctx, render_item)
    }

    /// Child scope for a nested bundle, created on first use
    pub fn nested(&mut self, name: &str) -> &mut ContentScope {
        let index = match self.children.iter().position(|child| child.name == name) {
            Some(index) => index,
            None => {
                let bundle = self
                    .value(name, &ContentValue::Null)
                    .as_bundle()
                    .cloned()
                    .unwrap_or_default();
                let path = compose(&self.path, &PathSegment::scope(name));
                let mut child = ContentScope::with_path(name, path, bundle, self.sanitizer.clone());
                if self.preview.is_some() {
                    child.enter_preview();
                }
                self.children.push(child);
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    pub fn list_mut(&mut self, attribute: &str) -> ContentResult<&mut ListController> {
        let scope = self.path.clone();
        self.lists
            .iter_mut()
            .find(|list| list.attribute() == attribute)
            .ok_or_else(|| ContentError::UnknownList {
                scope,
                attribute: attribute.to_string(),
            })
    }

    pub fn markup_mut(&mut self, attribute: &str) -> ContentResult<&mut RichTextBridge> {
        let scope = self.path.clone();
        self.markups
            .iter_mut()
            .find(|bridge| bridge.attribute() == attribute)
            .ok_or_else(|| ContentError::UnknownAttribute {
                scope,
                key: attribute.to_string(),
            })
    }

    /// Walk down child scopes and list items
    ///
    /// Scope and attribute segments select child scopes by name; list
    /// segments select an item of the named list.
    pub fn descend(&mut self, segments: &[PathSegment]) -> ContentResult<&mut ContentScope> {
        let Some((first, rest)) = segments.split_first() else {
            return Ok(self);
        };

        let next = match first {
            PathSegment::Scope(name) | PathSegment::Attribute(name) => {
                let scope = self.path.clone();
                self.children
                    .iter_mut()
                    .find(|child| child.name == *name)
                    .ok_or_else(|| ContentError::UnknownAttribute {
                        scope,
                        key: name.clone(),
                    })?
            }
            PathSegment::List { attribute, index } => {
                self.list_mut(attribute)?.item_scope_mut(*index)?
            }
        };

        next.descend(rest)
    }

    // Edits

    /// Record what a control currently holds
    pub fn stage(&mut self, key: &str, raw: impl Into<String>) -> ContentResult<()> {
        self.binding(key)?;
        self.pending.insert(key.to_string(), raw.into());
        Ok(())
    }

    /// Stage a selected image as a data URI; no file is a no-op
    pub fn stage_image(&mut self, key: &str, file: Option<ImageFile>) -> ContentResult<bool> {
        let Some(file) = file else {
            return Ok(false);
        };
        if self.binding(key)?.attribute_type != AttributeType::Image {
            return Err(ContentError::invalid(key, "not an image attribute"));
        }

        debug!(key = %key, file = %file.file_name, bytes = file.bytes.len(), "Staged image");
        self.pending.insert(key.to_string(), file.to_data_uri());
        self.staged_images.insert(key.to_string(), file);
        Ok(true)
    }

    /// Save a control: its text is parsed by the attribute's strategy and
    /// written to the override layer
    pub fn commit(&mut self, key: &str) -> ContentResult<ContentValue> {
        let binding = self.binding(key)?;
        let raw = match self.pending.get(key) {
            Some(raw) => raw.clone(),
            None => self.value(key, &binding.fallback).to_text(),
        };
        let value = strategy_for(binding.attribute_type).read(key, &raw)?;

        self.overrides.set(key, value.clone());
        self.pending.remove(key);
        Ok(value)
    }

    /// Acquire the editing surface of a markup attribute
    pub fn activate_markup(&mut self, attribute: &str) -> ContentResult<()> {
        let bridge = self.markup_mut(attribute)?;
        bridge.begin_activation();
        bridge.finish_activation();
        Ok(())
    }

    pub fn commit_markup(&mut self, attribute: &str, markup: &str) -> ContentResult<MarkupCommit> {
        let commit = self.markup_mut(attribute)?.commit_markup(markup)?;
        self.overrides
            .set(attribute, ContentValue::Text(commit.value.clone()));
        Ok(commit)
    }

    pub fn commit_document(
        &mut self,
        attribute: &str,
        document: EditorDocument,
    ) -> ContentResult<MarkupCommit> {
        let commit = self.markup_mut(attribute)?.commit(document)?;
        self.overrides
            .set(attribute, ContentValue::Text(commit.value.clone()));
        Ok(commit)
    }

    // Session lifecycle

    /// Freeze the current values for preview, recursively
    pub fn enter_preview(&mut self) {
        self.preview = Some(self.merged_bundle());
        for child in &mut self.children {
            child.enter_preview();
        }
        for list in &mut self.lists {
            list.enter_preview();
        }
    }

    pub fn exit_preview(&mut self) {
        self.preview = None;
        for child in &mut self.children {
            child.exit_preview();
        }
        for list in &mut self.lists {
            list.exit_preview();
        }
    }

    /// Fold acknowledged values into a new bundle generation
    ///
    /// Overrides, pending values and staged files are cleared and the
    /// published values become the persisted ones.
    #[instrument(skip_all, fields(path = %self.path))]
    pub fn settle(&mut self) {
        self.bundle = self.merged_bundle();
        self.overrides.clear();
        self.pending.clear();
        self.staged_images.clear();
        self.preview = None;

        for child in &mut self.children {
            child.settle();
        }
        for list in &mut self.lists {
            list.settle();
        }
        debug!("Scope settled");
    }

    /// Emit every registered control of this scope and its descendants
    pub fn emit_fields(&self, emitter: &mut FieldEmitter, fields: &mut FieldSet) {
        for binding in &self.bindings {
            let path = self.attribute_path(&binding.key);
            let value = self.control_text(&binding.key, &binding.fallback);
            emitter.emit_value(
                fields,
                &path,
                &binding.key,
                FieldType::from(binding.attribute_type),
                value,
            );
            if let Some(file) = self.staged_images.get(&binding.key) {
                emitter.emit_image_file(fields, &path, file);
            }
        }

        for bridge in &self.markups {
            let path = self.attribute_path(bridge.attribute());
            emitter.emit_value(
                fields,
                &path,
                bridge.attribute(),
                FieldType::Copy,
                bridge.value_json(),
            );
        }

        for list in &self.lists {
            list.emit_fields(emitter, fields);
        }

        for child in &self.children {
            child.emit_fields(emitter, fields);
        }
    }

    pub fn collect_fields(&self, emitter: &mut FieldEmitter) -> FieldSet {
        let mut fields = FieldSet::new();
        self.emit_fields(emitter, &mut fields);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_markup::{BlockNode, InlineNode};

    fn bundle(entries: &[(&str, ContentValue)]) -> ContentBundle {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn scope(entries: &[(&str, ContentValue)]) -> ContentScope {
        ContentScope::new("hero", bundle(entries), Arc::new(Sanitizer::default()))
    }

    fn editing() -> RenderContext {
        RenderContext::new(EditMode::Editing)
    }

    #[test]
    fn test_text_viewing_and_editing() {
        let mut scope = scope(&[("title", ContentValue::from("Persisted"))]);

        let viewing = scope.text(&RenderContext::new(EditMode::Viewing), "title", "Fallback");
        assert_eq!(viewing, VNode::text("Persisted"));

        let editing = scope.text(&editing(), "title", "Fallback");
        let input = editing.find(&|n| n.tag() == Some("input")).unwrap();
        assert_eq!(input.attr("name"), Some("hero.title.value"));
        assert_eq!(input.attr("value"), Some("Persisted"));
    }

    #[test]
    fn test_text_waits_for_mount_gate() {
        let mut scope = scope(&[]);
        let ctx = editing().with_interactive(false);
        assert_eq!(scope.text(&ctx, "title", "Fallback"), VNode::text("Fallback"));
    }

    #[test]
    fn test_stage_requires_registration() {
        let mut scope = scope(&[]);
        assert!(matches!(
            scope.stage("title", "x"),
            Err(ContentError::UnknownAttribute { .. })
        ));

        scope.text(&editing(), "title", "Fallback");
        scope.stage("title", "Draft").unwrap();
        assert_eq!(scope.pending("title"), Some("Draft"));
        assert_eq!(scope.control_text("title", &ContentValue::Null), "Draft");
    }

    #[test]
    fn test_commit_validates_through_strategy() {
        let mut scope = scope(&[]);
        scope
            .attributes(
                &editing(),
                &[AttributeDescriptor::number("count", 1.0)],
                |_| VNode::fragment(Vec::new()),
            )
            .unwrap();

        scope.stage("count", "abc").unwrap();
        assert!(matches!(
            scope.commit("count"),
            Err(ContentError::InvalidValue { .. })
        ));
        assert!(scope.overrides().is_empty());

        scope.stage("count", "12").unwrap();
        assert_eq!(scope.commit("count").unwrap(), ContentValue::from(12.0));
        assert_eq!(scope.pending("count"), None);
        assert_eq!(scope.value("count", &ContentValue::Null), ContentValue::from(12.0));
    }

    #[test]
    fn test_attributes_bind_and_standalone_controls() {
        let mut scope = scope(&[("logo", ContentValue::from("/persisted.png"))]);
        let descriptors = vec![
            AttributeDescriptor::image("logo", "/default.png"),
            AttributeDescriptor::url("link", "/home"),
        ];

        let node = scope
            .attributes(&editing(), &descriptors, |values| {
                VNode::element("a")
                    .with_attr("href", values.text("link"))
                    .with_child(VNode::element("img").with_attr("src", values.text("logo")))
            })
            .unwrap();

        let wrapper = node.find(&|n| n.is_editable()).unwrap();
        match wrapper {
            VNode::Editable { attribute, path, .. } => {
                assert_eq!(attribute, "logo");
                assert_eq!(path, "hero.logo");
            }
            other => panic!("Expected editable wrapper, got {:?}", other),
        }

        let standalone = node
            .find(&|n| n.attr("name") == Some("hero.link.value"))
            .unwrap();
        assert_eq!(standalone.attr("value"), Some("/home"));
    }

    #[test]
    fn test_attributes_reject_duplicates() {
        let mut scope = scope(&[]);
        let result = scope.attributes(
            &editing(),
            &[
                AttributeDescriptor::color("c", "#fff"),
                AttributeDescriptor::color("c", "#000"),
            ],
            |_| VNode::fragment(Vec::new()),
        );
        assert!(matches!(result, Err(ContentError::DuplicateDescriptor(_))));
    }

    #[test]
    fn test_preview_snapshot_includes_pending() {
        let mut scope = scope(&[("title", ContentValue::from("Persisted"))]);
        scope.text(&editing(), "title", "Fallback");
        scope.stage("title", "Draft").unwrap();

        scope.enter_preview();
        let previewing = RenderContext::new(EditMode::Previewing);
        assert_eq!(scope.text(&previewing, "title", "Fallback"), VNode::text("Draft"));

        scope.exit_preview();
        assert!(scope.preview_snapshot().is_none());
        assert_eq!(scope.pending("title"), Some("Draft"));
    }

    #[test]
    fn test_stage_image() {
        let mut scope = scope(&[]);
        scope
            .attributes(
                &editing(),
                &[
                    AttributeDescriptor::image("logo", ""),
                    AttributeDescriptor::url("link", ""),
                ],
                |_| VNode::fragment(Vec::new()),
            )
            .unwrap();

        assert!(!scope.stage_image("logo", None).unwrap());
        assert_eq!(scope.pending("logo"), None);

        let file = ImageFile::new("a.png", "image/png", vec![1, 2]);
        assert!(matches!(
            scope.stage_image("link", Some(file.clone())),
            Err(ContentError::InvalidValue { .. })
        ));

        assert!(scope.stage_image("logo", Some(file)).unwrap());
        assert_eq!(scope.pending("logo"), Some("data:image/png;base64,AQI="));

        let fields = scope.collect_fields(&mut FieldEmitter::default());
        assert_eq!(fields.text("hero.logo.value"), Some("data:image/png;base64,AQI="));
        assert_eq!(fields.text("hero.logo.type"), Some("Image"));
        assert!(fields.get("hero.logo.imageFile").is_some());
        assert!(fields.get("hero.link.imageFile").is_none());
    }

    #[test]
    fn test_list_items_are_nested_scopes() {
        let items = ContentValue::List(vec![ContentValue::Bundle(bundle(&[(
            "title",
            ContentValue::from("First"),
        )]))]);
        let mut scope = ContentScope::new(
            "page",
            bundle(&[("items", items)]),
            Arc::new(Sanitizer::default()),
        );
        let ctx = editing();

        scope.list(&ctx, "items", &ContentValue::Null, |item, _| {
            item.text(&ctx, "title", "Untitled")
        });

        let item = scope
            .descend(&[PathSegment::list("items", 0)])
            .unwrap();
        assert_eq!(item.path(), "page.items.fields[0].data");
        item.stage("title", "Edited").unwrap();

        let fields = scope.collect_fields(&mut FieldEmitter::default());
        assert_eq!(fields.text("page.items.type"), Some("Fields"));
        assert_eq!(fields.text("page.items.fields[0].id"), Some("1"));
        assert_eq!(
            fields.text("page.items.fields[0].data.title.value"),
            Some("Edited")
        );
    }

    #[test]
    fn test_nested_scope_paths() {
        let mut inner = ContentBundle::new();
        inner.insert("label".to_string(), ContentValue::from("Inner"));
        let mut scope = scope(&[("cta", ContentValue::Bundle(inner))]);

        let child = scope.nested("cta");
        assert_eq!(child.path(), "hero.cta");
        let node = child.text(&RenderContext::new(EditMode::Viewing), "label", "x");
        assert_eq!(node, VNode::text("Inner"));

        assert!(scope.descend(&[PathSegment::scope("cta")]).is_ok());
        assert!(scope.descend(&[PathSegment::scope("missing")]).is_err());
    }

    #[test]
    fn test_markup_commit_writes_override() {
        let mut scope = scope(&[]);
        scope.markup(&editing(), "body", "<p>Fallback</p>");

        assert!(matches!(
            scope.commit_markup("body", "<p>x</p>"),
            Err(ContentError::Markup(_))
        ));

        scope.activate_markup("body").unwrap();
        let doc = EditorDocument::from_blocks(vec![BlockNode::paragraph(vec![InlineNode::text(
            "Edited",
        )])]);
        let commit = scope.commit_document("body", doc.clone()).unwrap();
        assert_eq!(commit.html, "<p>Edited</p>");
        assert_eq!(
            scope.overrides().get("body"),
            Some(&ContentValue::Text(doc.to_json()))
        );

        let fields = scope.collect_fields(&mut FieldEmitter::default());
        assert_eq!(fields.text("hero.body.type"), Some("Copy"));
        assert_eq!(fields.text("hero.body.value"), Some(doc.to_json().as_str()));
    }

    #[test]
    fn test_settle_rebases_bundle() {
        let mut scope = scope(&[("title", ContentValue::from("Old"))]);
        scope.text(&editing(), "title", "Fallback");
        scope.stage("title", "New").unwrap();
        scope.enter_preview();

        scope.settle();

        assert_eq!(scope.bundle()["title"], ContentValue::from("New"));
        assert!(scope.overrides().is_empty());
        assert_eq!(scope.pending("title"), None);
        assert!(!scope.is_previewing());
        assert_eq!(
            scope.text(&RenderContext::new(EditMode::Viewing), "title", "Fallback"),
            VNode::text("New")
        );
    }
}
