//! Repeatable list items with stable synthetic ids.
//!
//! Each item is exposed as its own nested [`ContentScope`] rooted at
//! `{parent}.{attribute}.fields[{index}].data`. Ids are assigned once, at
//! hydration or on add, and survive removal of other items. The index part of
//! an item's path is recomputed whenever the order changes.

use crate::error::ListError;
use crate::fields::{FieldEmitter, FieldSet};
use crate::mode::{EditMode, RenderContext};
use crate::path::{compose, PathSegment};
use crate::scope::ContentScope;
use crate::value::{ContentBundle, ContentValue};
use resonance_markup::Sanitizer;
use resonance_vdom::VNode;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct ListItemRecord {
    synthetic_id: u64,
    scope: ContentScope,
}

impl ListItemRecord {
    pub fn synthetic_id(&self) -> u64 {
        self.synthetic_id
    }

    pub fn scope(&self) -> &ContentScope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut ContentScope {
        &mut self.scope
    }

    /// Current item data, including unpublished edits
    pub fn data(&self) -> ContentBundle {
        self.scope.merged_bundle()
    }
}

#[derive(Debug)]
enum ListState {
    /// Hydrated data was not a list
    Unavailable,
    Items(Vec<ListItemRecord>),
}

#[derive(Debug)]
pub struct ListController {
    attribute: String,
    parent_path: String,
    state: ListState,
    next_id: u64,
    sanitizer: Arc<Sanitizer>,
}

impl ListController {
    /// Hydrate from persisted items; one synthetic id per item, in order
    pub fn hydrate(
        attribute: impl Into<String>,
        parent_path: impl Into<String>,
        items: &ContentValue,
        sanitizer: Arc<Sanitizer>,
    ) -> Self {
        let mut controller = Self {
            attribute: attribute.into(),
            parent_path: parent_path.into(),
            state: ListState::Unavailable,
            next_id: 1,
            sanitizer,
        };

        match items.as_list() {
            Some(values) => {
                let mut records = Vec::with_capacity(values.len());
                for (index, value) in values.iter().enumerate() {
                    let bundle = value.as_bundle().cloned().unwrap_or_default();
                    records.push(controller.new_record(index, bundle));
                }
                controller.state = ListState::Items(records);
            }
            None => {
                debug!(attribute = %controller.attribute, "List data is not a list");
            }
        }

        controller
    }

    fn new_record(&mut self, index: usize, bundle: ContentBundle) -> ListItemRecord {
        let synthetic_id = self.next_id;
        self.next_id += 1;
        ListItemRecord {
            synthetic_id,
            scope: ContentScope::with_path(
                self.attribute.clone(),
                self.item_path(index),
                bundle,
                self.sanitizer.clone(),
            ),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Path of the list container, `{parent}.{attribute}`
    pub fn path(&self) -> String {
        compose(&self.parent_path, &PathSegment::attribute(&self.attribute))
    }

    pub fn item_path(&self, index: usize) -> String {
        compose(&self.parent_path, &PathSegment::list(&self.attribute, index))
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, ListState::Items(_))
    }

    pub fn items(&self) -> &[ListItemRecord] {
        match &self.state {
            ListState::Items(items) => items,
            ListState::Unavailable => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.items().iter().map(|item| item.synthetic_id).collect()
    }

    /// Append an empty item; inert outside editing
    pub fn add(&mut self, mode: EditMode) -> Option<u64> {
        if !mode.accepts_edits() {
            debug!(attribute = %self.attribute, ?mode, "Ignoring add outside editing");
            return None;
        }

        let index = match &self.state {
            ListState::Items(items) => items.len(),
            ListState::Unavailable => {
                debug!(attribute = %self.attribute, "Ignoring add on unavailable list");
                return None;
            }
        };

        let record = self.new_record(index, ContentBundle::new());
        let synthetic_id = record.synthetic_id;
        if let ListState::Items(items) = &mut self.state {
            items.push(record);
        }
        Some(synthetic_id)
    }

    /// Remove one item; the others keep their ids and relative order
    pub fn remove(&mut self, index: usize) -> Result<ListItemRecord, ListError> {
        let items = match &mut self.state {
            ListState::Items(items) => items,
            ListState::Unavailable => {
                return Err(ListError::Unavailable(self.attribute.clone()));
            }
        };

        if index >= items.len() {
            return Err(ListError::IndexOutOfRange {
                attribute: self.attribute.clone(),
                index,
                len: items.len(),
            });
        }

        let removed = items.remove(index);
        self.reindex();
        Ok(removed)
    }

    pub fn item_scope_mut(&mut self, index: usize) -> Result<&mut ContentScope, ListError> {
        let attribute = &self.attribute;
        match &mut self.state {
            ListState::Items(items) => {
                let len = items.len();
                items
                    .get_mut(index)
                    .map(|item| &mut item.scope)
                    .ok_or_else(|| ListError::IndexOutOfRange {
                        attribute: attribute.clone(),
                        index,
                        len,
                    })
            }
            ListState::Unavailable => Err(ListError::Unavailable(attribute.clone())),
        }
    }

    pub(crate) fn set_parent_path(&mut self, parent_path: String) {
        self.parent_path = parent_path;
        self.reindex();
    }

    fn reindex(&mut self) {
        let paths: Vec<String> = (0..self.len()).map(|index| self.item_path(index)).collect();
        if let ListState::Items(items) = &mut self.state {
            for (item, path) in items.iter_mut().zip(paths) {
                item.scope.set_path(path);
            }
        }
    }

    fn scopes_mut(&mut self) -> impl Iterator<Item = &mut ContentScope> {
        let items: &mut [ListItemRecord] = match &mut self.state {
            ListState::Items(items) => items,
            ListState::Unavailable => &mut [],
        };
        items.iter_mut().map(|item| &mut item.scope)
    }

    pub(crate) fn enter_preview(&mut self) {
        self.scopes_mut().for_each(ContentScope::enter_preview);
    }

    pub(crate) fn exit_preview(&mut self) {
        self.scopes_mut().for_each(ContentScope::exit_preview);
    }

    pub(crate) fn settle(&mut self) {
        self.scopes_mut().for_each(ContentScope::settle);
    }

    /// Render every item keyed by its synthetic id
    pub fn render<F>(&mut self, ctx: &RenderContext, mut render_item: F) -> VNode
    where
        F: FnMut(&mut ContentScope, usize) -> VNode,
    {
        let body = match &mut self.state {
            ListState::Unavailable => VNode::text("No items"),
            ListState::Items(items) => VNode::fragment(
                items
                    .iter_mut()
                    .enumerate()
                    .map(|(index, item)| {
                        let mut node = VNode::element("div")
                            .with_key(item.synthetic_id.to_string())
                            .with_attr("data-resonance-item", item.scope.path())
                            .with_child(render_item(&mut item.scope, index));
                        if ctx.controls() {
                            node = node.with_child(button(
                                "Remove",
                                !ctx.enabled(),
                                ("data-resonance-remove", index.to_string()),
                            ));
                        }
                        node
                    })
                    .collect(),
            ),
        };

        if !ctx.interactive || ctx.mode == EditMode::Viewing {
            return body;
        }

        VNode::fragment(vec![
            body,
            button(
                &format!("Add another {} item", self.attribute),
                !ctx.enabled(),
                ("data-resonance-add", self.path()),
            ),
        ])
    }

    /// Container fields, item ids, then each item's own fields
    pub fn emit_fields(&self, emitter: &mut FieldEmitter, fields: &mut FieldSet) {
        let path = self.path();
        emitter.emit_container(fields, &path, &self.attribute);
        for (index, item) in self.items().iter().enumerate() {
            emitter.emit_item_id(fields, &path, index, item.synthetic_id);
            item.scope.emit_fields(emitter, fields);
        }
    }
}

fn button(label: &str, disabled: bool, data: (&str, String)) -> VNode {
    let mut node = VNode::element("button")
        .with_attr("type", "button")
        .with_attr(data.0, data.1)
        .with_child(VNode::text(label));
    if disabled {
        node = node.with_attr("disabled", "disabled");
    }
    node
}
