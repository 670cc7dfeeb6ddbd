//! # Resonance Markup
//!
//! Rich-text support for markup-typed attributes.
//!
//! ## Pipeline
//!
//! ```text
//! persisted value ──parse──→ EditorDocument ──export──→ HTML ──sanitize──→ presentation
//!        │                        ↑
//!        └──(not document JSON)──import (markup → document)
//! ```
//!
//! The [`RichTextBridge`] keeps the structured document and the sanitized
//! presentational fragment in sync for one attribute.

mod bridge;
mod document;
mod error;
mod export;
mod import;
mod lexer;
mod sanitizer;

pub use bridge::{MarkupCommit, MountOrigin, RichTextBridge, SurfaceState};
pub use document::{
    BlockNode, EditorDocument, HeadingTag, InlineNode, ListType, RootNode, FORMAT_BOLD,
    FORMAT_CODE, FORMAT_ITALIC, FORMAT_STRIKETHROUGH, FORMAT_UNDERLINE,
};
pub use error::MarkupError;
pub use export::to_html;
pub use import::import_markup;
pub use lexer::{decode_entities, tokenize, MarkupEvent, TagToken};
pub use sanitizer::{Sanitizer, SanitizerConfig};
