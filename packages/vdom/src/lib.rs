//! # Resonance VDOM
//!
//! The rendered-tree model every other Resonance crate works against.
//!
//! A tree is made of elements (tag + attributes + ordered children), text,
//! fragments, pre-sanitized raw HTML, and editable wrappers produced by the
//! binder. Trees are plain values: transforms build new trees instead of
//! mutating shared ones.

pub mod html;
pub mod vdom;

pub use html::{escape_html, render_html, RenderOptions};
pub use vdom::{VNode, VirtualDomDocument};
