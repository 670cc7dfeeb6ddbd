//! # Resonance Content
//!
//! Value resolution, path addressing and tree binding for in-place content
//! editing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: persisted bundles + editor flag   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ scope: bundle + overrides + pending edits   │
//! │  - resolver: effective values per key       │
//! │  - path: canonical field addresses          │
//! │  - binder: media nodes → editable wrappers  │
//! │  - list: repeatable items with stable ids   │
//! │  - markup bridge for rich text attributes   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ fields: flattened field set for publishing  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use resonance_content::{AttributeDescriptor, ContentScope, EditMode, RenderContext};
//!
//! let mut scope = ContentScope::new("hero", registry.bundle_for("hero"), sanitizer);
//! let ctx = RenderContext::new(EditMode::Editing);
//!
//! let title = scope.text(&ctx, "title", "Welcome");
//! let banner = scope.attributes(
//!     &ctx,
//!     &[AttributeDescriptor::image("banner", "/default.png")],
//!     |values| VNode::element("img").with_attr("src", values.text("banner")),
//! )?;
//! ```

pub mod attributes;
pub mod binder;
mod error;
pub mod fields;
pub mod image;
pub mod list;
pub mod mode;
pub mod mount;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod value;

pub use attributes::{
    strategy_for, AttributeDescriptor, AttributeStrategy, AttributeType, FieldType,
};
pub use binder::{bind, editable_sites, BindOutcome, EditableSite, TreeBinder};
pub use error::{ContentError, ContentResult, ListError, PathError};
pub use fields::{BinaryField, FieldEmitter, FieldSet, FieldValue, IdPolicy};
pub use image::ImageFile;
pub use list::{ListController, ListItemRecord};
pub use mode::{EditMode, RenderContext};
pub use mount::{MountGate, DEFAULT_MOUNT_DELAY};
pub use path::{compose, ContentPath, PathSegment};
pub use registry::ContentRegistry;
pub use resolver::{resolve, resolve_value, OverrideLayer, ResolvedValues};
pub use scope::ContentScope;
pub use value::{ContentBundle, ContentValue};
