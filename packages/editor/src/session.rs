//! # Edit Session Management
//!
//! Top-level coordinator of an in-place editing session. Owns the mode,
//! one [`Region`] per mounted root scope, and the publish handshake.
//!
//! ```text
//!             field change (dirty ↑)
//!               ┌──────┐
//!               ↓      │
//! Viewing    Editing ──┘ ⇄ Previewing
//! (terminal)    ↑  \        /
//!   success ack │   publish
//!   or failure  │   ↓
//!            Publishing
//! ```
//!
//! Field changes are only accepted in `Editing`. A publish snapshots the
//! fields of every dirty region into one event; the matching success
//! acknowledgment clears all of those flags together.

use crate::config::EditorConfig;
use crate::errors::{SessionError, SessionResult};
use crate::message::{InboundMessage, PublishEvent};
use crate::region::Region;
use resonance_content::{
    ContentError, ContentPath, ContentRegistry, ContentScope, ContentValue, EditMode,
    FieldEmitter, FieldSet, ImageFile, PathSegment, RenderContext,
};
use resonance_markup::{MarkupCommit, Sanitizer};
use resonance_vdom::VNode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub struct EditSession {
    /// Scope id carried by publish events
    id: String,
    origin: String,
    mode: EditMode,
    registry: ContentRegistry,
    regions: Vec<Region>,
    /// Regions whose fields are in the in-flight publish
    in_flight: Vec<String>,
    emitter: FieldEmitter,
    sanitizer: Arc<Sanitizer>,
    mount_delay: Duration,
}

/// Resolved target of a path-addressed edit
struct Target<'a> {
    region: &'a mut Region,
    segments: Vec<PathSegment>,
    key: String,
}

impl EditSession {
    /// Editing when the registry's editor flag is set, otherwise Viewing
    pub fn new(id: impl Into<String>, registry: ContentRegistry, config: &EditorConfig) -> Self {
        let mode = if registry.is_editor_mode {
            EditMode::Editing
        } else {
            EditMode::Viewing
        };

        Self {
            id: id.into(),
            origin: config.origin.clone(),
            mode,
            registry,
            regions: Vec::new(),
            in_flight: Vec::new(),
            emitter: FieldEmitter::new(config.id_policy),
            sanitizer: Arc::new(Sanitizer::new(config.sanitizer.clone())),
            mount_delay: config.mount_delay(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// Mount a root scope, hydrated from the registry
    ///
    /// Mounting an existing region returns it unchanged.
    pub fn mount_region(&mut self, name: &str) -> &mut ContentScope {
        let index = match self.regions.iter().position(|r| r.name() == name) {
            Some(index) => index,
            None => {
                let mut scope = ContentScope::new(
                    name,
                    self.registry.bundle_for(name),
                    self.sanitizer.clone(),
                );
                if self.mode != EditMode::Viewing {
                    scope.start_mount_gate(self.mount_delay);
                }
                debug!(region = %name, "Mounted region");
                self.regions.push(Region::new(scope));
                self.regions.len() - 1
            }
        };
        &mut self.regions[index].scope
    }

    pub fn region(&self, name: &str) -> Option<&ContentScope> {
        self.regions
            .iter()
            .find(|r| r.name() == name)
            .map(|r| &r.scope)
    }

    pub fn region_mut(&mut self, name: &str) -> SessionResult<&mut ContentScope> {
        self.regions
            .iter_mut()
            .find(|r| r.name() == name)
            .map(|r| &mut r.scope)
            .ok_or_else(|| SessionError::UnknownRegion(name.to_string()))
    }

    pub fn is_dirty(&self) -> bool {
        self.regions.iter().any(|r| r.dirty.is_raised())
    }

    pub fn is_region_dirty(&self, name: &str) -> bool {
        self.regions
            .iter()
            .any(|r| r.name() == name && r.dirty.is_raised())
    }

    pub fn dirty_regions(&self) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|r| r.dirty.is_raised())
            .map(Region::name)
            .collect()
    }

    /// Render one region inside its edit form
    pub fn render_region<F>(&mut self, name: &str, render: F) -> SessionResult<VNode>
    where
        F: FnOnce(&mut ContentScope, &RenderContext) -> VNode,
    {
        let mode = self.mode;
        let scope = self.region_mut(name)?;
        let ctx = scope.render_context(mode);
        let body = render(scope, &ctx);

        if mode == EditMode::Viewing {
            return Ok(body);
        }
        Ok(VNode::element("form")
            .with_attr("data-resonance-content-form", name)
            .with_child(body))
    }

    /// Publish and preview buttons, shown once something changed
    pub fn render_toolbar(&self) -> Option<VNode> {
        if self.mode == EditMode::Viewing || !self.is_dirty() {
            return None;
        }

        let disabled = self.mode == EditMode::Publishing;
        let preview_label = if self.mode.is_previewing() {
            "End preview"
        } else {
            "Preview"
        };
        let button = |label: &str, action: &str| {
            let node = VNode::element("button")
                .with_attr("type", "button")
                .with_attr("data-resonance-action", action)
                .with_child(VNode::text(label));
            if disabled {
                node.with_attr("disabled", "disabled")
            } else {
                node
            }
        };

        Some(
            VNode::element("div")
                .with_attr("data-resonance-toolbar", "true")
                .with_child(button("Publish", "publish"))
                .with_child(button(preview_label, "preview")),
        )
    }

    fn ensure_editing(&self, operation: &'static str) -> SessionResult<()> {
        if self.mode.accepts_edits() {
            Ok(())
        } else {
            Err(SessionError::Refused {
                operation,
                mode: self.mode,
            })
        }
    }

    /// Split `{region}.{scopes...}.{key}` into its region, scope segments
    /// and final key
    fn locate(&mut self, path: &str) -> SessionResult<Target<'_>> {
        let parsed = ContentPath::parse(path)?;
        let segments = parsed.segments();

        let Some((first, rest)) = segments.split_first() else {
            return Err(SessionError::InvalidTarget(path.to_string()));
        };
        let Some((last, scopes)) = rest.split_last() else {
            return Err(SessionError::InvalidTarget(path.to_string()));
        };
        let PathSegment::Attribute(key) = last else {
            return Err(SessionError::InvalidTarget(path.to_string()));
        };

        let region = self
            .regions
            .iter_mut()
            .find(|r| r.name() == first.name())
            .ok_or_else(|| SessionError::UnknownRegion(first.name().to_string()))?;

        Ok(Target {
            region,
            segments: scopes.to_vec(),
            key: key.clone(),
        })
    }

    /// Stage the text a control now holds
    #[instrument(skip(self, raw))]
    pub fn change_field(&mut self, path: &str, raw: &str) -> SessionResult<()> {
        self.ensure_editing("change a field")?;
        let target = self.locate(path)?;
        target
            .region
            .scope
            .descend(&target.segments)?
            .stage(&target.key, raw)?;
        target.region.dirty.raise();
        Ok(())
    }

    /// Save a control into the override layer
    #[instrument(skip(self))]
    pub fn commit_field(&mut self, path: &str) -> SessionResult<ContentValue> {
        self.ensure_editing("save a field")?;
        let target = self.locate(path)?;
        let value = target
            .region
            .scope
            .descend(&target.segments)?
            .commit(&target.key)?;
        target.region.dirty.raise();
        Ok(value)
    }

    /// Stage a selected image; no file is a no-op
    #[instrument(skip(self, file))]
    pub fn stage_image(&mut self, path: &str, file: Option<ImageFile>) -> SessionResult<bool> {
        self.ensure_editing("stage an image")?;
        let target = self.locate(path)?;
        let staged = target
            .region
            .scope
            .descend(&target.segments)?
            .stage_image(&target.key, file)?;
        if staged {
            target.region.dirty.raise();
        }
        Ok(staged)
    }

    pub fn activate_markup(&mut self, path: &str) -> SessionResult<()> {
        self.ensure_editing("activate a markup editor")?;
        let target = self.locate(path)?;
        target
            .region
            .scope
            .descend(&target.segments)?
            .activate_markup(&target.key)?;
        Ok(())
    }

    #[instrument(skip(self, markup))]
    pub fn commit_markup(&mut self, path: &str, markup: &str) -> SessionResult<MarkupCommit> {
        self.ensure_editing("commit markup")?;
        let target = self.locate(path)?;
        let commit = target
            .region
            .scope
            .descend(&target.segments)?
            .commit_markup(&target.key, markup)?;
        target.region.dirty.raise();
        Ok(commit)
    }

    /// Append an item to the list at `path`
    #[instrument(skip(self))]
    pub fn list_add(&mut self, path: &str) -> SessionResult<Option<u64>> {
        self.ensure_editing("add a list item")?;
        let mode = self.mode;
        let target = self.locate(path)?;
        let added = target
            .region
            .scope
            .descend(&target.segments)?
            .list_mut(&target.key)?
            .add(mode);
        if added.is_some() {
            target.region.dirty.raise();
        }
        Ok(added)
    }

    #[instrument(skip(self))]
    pub fn list_remove(&mut self, path: &str, index: usize) -> SessionResult<()> {
        self.ensure_editing("remove a list item")?;
        let target = self.locate(path)?;
        target
            .region
            .scope
            .descend(&target.segments)?
            .list_mut(&target.key)?
            .remove(index)
            .map_err(ContentError::from)?;
        target.region.dirty.raise();
        Ok(())
    }

    /// Editing → Previewing; every region freezes its current values
    pub fn enter_preview(&mut self) -> SessionResult<()> {
        if self.mode != EditMode::Editing {
            return Err(SessionError::Refused {
                operation: "enter preview",
                mode: self.mode,
            });
        }
        for region in &mut self.regions {
            region.scope.enter_preview();
        }
        self.mode = EditMode::Previewing;
        debug!("Entered preview");
        Ok(())
    }

    /// Previewing → Editing; snapshots are discarded, dirty flags kept
    pub fn exit_preview(&mut self) -> SessionResult<()> {
        if self.mode != EditMode::Previewing {
            return Err(SessionError::Refused {
                operation: "exit preview",
                mode: self.mode,
            });
        }
        for region in &mut self.regions {
            region.scope.exit_preview();
        }
        self.mode = EditMode::Editing;
        debug!("Exited preview");
        Ok(())
    }

    pub fn toggle_preview(&mut self) -> SessionResult<()> {
        if self.mode.is_previewing() {
            self.exit_preview()
        } else {
            self.enter_preview()
        }
    }

    /// Editing or Previewing → Publishing
    ///
    /// Returns the aggregated event for every dirty region. Further
    /// publishes are refused until the in-flight one is acknowledged or
    /// reported failed.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn publish(&mut self) -> SessionResult<PublishEvent> {
        match self.mode {
            EditMode::Publishing => return Err(SessionError::AlreadyPublishing),
            EditMode::Viewing => {
                return Err(SessionError::Refused {
                    operation: "publish",
                    mode: self.mode,
                })
            }
            EditMode::Editing | EditMode::Previewing => {}
        }

        let mut fields = FieldSet::new();
        let mut in_flight = Vec::new();
        for region in self.regions.iter().filter(|r| r.dirty.is_raised()) {
            region.scope.emit_fields(&mut self.emitter, &mut fields);
            in_flight.push(region.name().to_string());
        }

        if in_flight.is_empty() {
            return Err(SessionError::NothingToPublish);
        }

        info!(regions = ?in_flight, fields = fields.len(), "Publishing");
        self.in_flight = in_flight;
        self.mode = EditMode::Publishing;
        Ok(PublishEvent::new(self.id.clone(), fields))
    }

    /// Handle a message from the host window
    ///
    /// Returns true when it acknowledged the in-flight publish. Messages from
    /// another origin are dropped.
    pub fn handle_message(&mut self, message: &InboundMessage) -> bool {
        if message.origin != self.origin {
            debug!(origin = %message.origin, "Ignoring message from foreign origin");
            return false;
        }
        if !message.is_publish_success() {
            debug!(kind = ?message.message_type(), "Ignoring unrelated message");
            return false;
        }
        if self.mode != EditMode::Publishing {
            debug!(mode = ?self.mode, "Ignoring acknowledgment without a publish in flight");
            return false;
        }

        let acknowledged = std::mem::take(&mut self.in_flight);
        for region in &mut self.regions {
            if acknowledged.iter().any(|name| name == region.name()) {
                region.dirty.clear();
                region.scope.settle();
            } else {
                region.scope.exit_preview();
            }
        }

        self.mode = EditMode::Editing;
        info!(regions = ?acknowledged, "Publish acknowledged");
        true
    }

    /// Publishing → Editing without clearing anything
    pub fn publish_failed(&mut self) -> SessionResult<()> {
        if self.mode != EditMode::Publishing {
            return Err(SessionError::Refused {
                operation: "fail a publish",
                mode: self.mode,
            });
        }

        for region in &mut self.regions {
            region.scope.exit_preview();
        }
        self.in_flight.clear();
        self.mode = EditMode::Editing;
        info!("Publish failed, dirty state retained");
        Ok(())
    }
}
