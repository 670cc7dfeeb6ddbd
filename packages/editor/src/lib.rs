//! # Resonance Editor
//!
//! In-place content editing sessions for Resonance pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ content: scopes, attributes, lists, fields  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Mode machine (view/edit/preview/publish) │
//! │  - Per-region dirty tracking                │
//! │  - Path-addressed field edits               │
//! │  - Aggregated publish events                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ publisher: transport + acknowledgment       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use resonance_editor::{EditSession, EditorConfig, Publisher, RetryPolicy};
//!
//! let config = EditorConfig::load(&cwd)?;
//! let mut session = EditSession::new("page", registry, &config);
//!
//! let html = session.render_region("hero", |scope, ctx| scope.text(ctx, "title", "Welcome"))?;
//! session.change_field("hero.title", "Hello")?;
//!
//! let mut publisher = Publisher::new(events_tx, acks_rx, RetryPolicy::from(&config.publish));
//! publisher.publish(&mut session).await?;
//! ```

mod config;
mod errors;
mod message;
mod publisher;
mod region;
mod session;

pub use config::{EditorConfig, PublishPolicy, DEFAULT_CONFIG_NAME};
pub use errors::{ConfigError, PublishError, SessionError, SessionResult};
pub use message::{InboundMessage, PublishEvent, PUBLISH_EVENT_TYPE, PUBLISH_SUCCESS_TYPE};
pub use publisher::{PublishTransport, Publisher, RetryPolicy};
pub use region::{DirtyFlag, Region};
pub use session::EditSession;

// Re-export common types for convenience
pub use resonance_content::{ContentRegistry, EditMode, FieldSet, RenderContext};
