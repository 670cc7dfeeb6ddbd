//! # Rich Text Bridge
//!
//! Holds the two representations of one markup-typed attribute:
//!
//! - the structured document state (re-editable, persisted as JSON)
//! - the sanitized presentational HTML derived from it
//!
//! Both are recomputed together on every commit, before the owning scope is
//! handed the new value. Nothing here is fatal: a persisted value that is not
//! document state is imported as markup instead.

use crate::document::EditorDocument;
use crate::error::MarkupError;
use crate::export::to_html;
use crate::import::import_markup;
use crate::sanitizer::Sanitizer;
use resonance_vdom::VNode;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Where the mounted document state came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOrigin {
    /// Persisted value parsed as document state
    DocumentState,
    /// Persisted value imported as markup
    ImportedValue,
    /// No persisted value; the host-rendered fallback was imported
    ImportedFallback,
}

/// Lifecycle of the lazily activated editing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Inactive,
    Loading,
    Ready,
}

/// Result of a commit, handed to the owning scope
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupCommit {
    /// Serialized document state
    pub value: String,
    /// Sanitized presentational HTML
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct RichTextBridge {
    attribute: String,
    document: EditorDocument,
    presentation: String,
    origin: MountOrigin,
    surface: SurfaceState,
    sanitizer: Arc<Sanitizer>,
}

impl RichTextBridge {
    /// Mount the bridge from a persisted raw value, falling back to markup
    pub fn mount(
        attribute: impl Into<String>,
        raw: Option<&str>,
        fallback_markup: &str,
        sanitizer: Arc<Sanitizer>,
    ) -> Self {
        let attribute = attribute.into();

        let (document, origin) = match raw.filter(|raw| !raw.is_empty()) {
            Some(raw) => match EditorDocument::parse(raw) {
                Ok(document) => (document.normalize(), MountOrigin::DocumentState),
                Err(error) => {
                    debug!(
                        attribute = %attribute,
                        error = %error,
                        "Persisted value is not document state, importing as markup"
                    );
                    (import_markup(raw), MountOrigin::ImportedValue)
                }
            },
            None => (import_markup(fallback_markup), MountOrigin::ImportedFallback),
        };

        let presentation = sanitizer.sanitize(&to_html(&document));

        Self {
            attribute,
            document,
            presentation,
            origin,
            surface: SurfaceState::Inactive,
            sanitizer,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn document(&self) -> &EditorDocument {
        &self.document
    }

    /// Sanitized presentational HTML
    pub fn presentation(&self) -> &str {
        &self.presentation
    }

    /// Serialized document state, as published
    pub fn value_json(&self) -> String {
        self.document.to_json()
    }

    pub fn origin(&self) -> MountOrigin {
        self.origin
    }

    pub fn surface(&self) -> SurfaceState {
        self.surface
    }

    pub fn begin_activation(&mut self) {
        if self.surface == SurfaceState::Inactive {
            self.surface = SurfaceState::Loading;
        }
    }

    pub fn finish_activation(&mut self) {
        self.surface = SurfaceState::Ready;
    }

    /// Activate the editing surface, awaiting its acquisition
    ///
    /// Only this bridge is `Loading` while the loader runs; sibling controls
    /// are unaffected.
    pub async fn activate<F>(&mut self, loader: F)
    where
        F: Future<Output = ()>,
    {
        self.begin_activation();
        loader.await;
        self.finish_activation();
    }

    /// Commit an edited document; both representations are recomputed
    pub fn commit(&mut self, document: EditorDocument) -> Result<MarkupCommit, MarkupError> {
        if self.surface != SurfaceState::Ready {
            return Err(MarkupError::SurfaceInactive(self.attribute.clone()));
        }

        self.document = document.normalize();
        self.presentation = self.sanitizer.sanitize(&to_html(&self.document));
        debug!(attribute = %self.attribute, "Markup committed");

        Ok(MarkupCommit {
            value: self.value_json(),
            html: self.presentation.clone(),
        })
    }

    /// Commit edited markup by importing it first
    pub fn commit_markup(&mut self, markup: &str) -> Result<MarkupCommit, MarkupError> {
        self.commit(import_markup(markup))
    }

    /// Render the control
    pub fn render(&self, editing: bool) -> VNode {
        let presentation = VNode::raw_html(self.presentation.clone());
        if !editing {
            return VNode::element("div").with_child(presentation);
        }

        match self.surface {
            SurfaceState::Inactive => VNode::element("div")
                .with_attr("data-resonance-surface", "inactive")
                .with_child(presentation),
            SurfaceState::Loading => VNode::element("div")
                .with_attr("data-resonance-surface", "loading")
                .with_child(VNode::text("Loading editor...")),
            SurfaceState::Ready => VNode::element("div")
                .with_attr("data-resonance-surface", "ready")
                .with_attr("contenteditable", "true")
                .with_child(presentation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockNode, InlineNode};

    fn sanitizer() -> Arc<Sanitizer> {
        Arc::new(Sanitizer::default())
    }

    fn ready(mut bridge: RichTextBridge) -> RichTextBridge {
        bridge.begin_activation();
        bridge.finish_activation();
        bridge
    }

    #[test]
    fn test_mount_from_document_state() {
        let raw = r#"{"root":{"children":[
            {"type":"paragraph","children":[{"type":"text","text":"Saved"}]}
        ]}}"#;
        let bridge = RichTextBridge::mount("body", Some(raw), "<p>Fallback</p>", sanitizer());

        assert_eq!(bridge.origin(), MountOrigin::DocumentState);
        assert_eq!(bridge.presentation(), "<p>Saved</p>");
    }

    #[test]
    fn test_mount_malformed_state_imports_markup() {
        let bridge = RichTextBridge::mount("body", Some("<p>Old <b>html</b></p>"), "", sanitizer());

        assert_eq!(bridge.origin(), MountOrigin::ImportedValue);
        assert_eq!(bridge.presentation(), "<p>Old <strong>html</strong></p>");
    }

    #[test]
    fn test_mount_without_value_uses_fallback() {
        let bridge = RichTextBridge::mount("body", None, "<h1>Default</h1>", sanitizer());
        assert_eq!(bridge.origin(), MountOrigin::ImportedFallback);
        assert_eq!(bridge.presentation(), "<h1>Default</h1>");
    }

    #[test]
    fn test_injected_script_never_presented() {
        let raw = r#"<p>Hi</p><script>document.cookie</script><img src=x onerror="alert(1)">"#;
        let bridge = RichTextBridge::mount("body", Some(raw), "", sanitizer());

        assert!(!bridge.presentation().contains("script"));
        assert!(!bridge.presentation().contains("document.cookie"));
        assert!(!bridge.presentation().contains("onerror"));

        let raw = "<p>Hi</p><script/>document.cookie='stolen'</script>";
        let bridge = RichTextBridge::mount("body", Some(raw), "", sanitizer());
        assert!(!bridge.presentation().contains("document.cookie"));
        assert!(!bridge.document().plain_text().contains("stolen"));

        let mut bridge = ready(bridge);
        let commit = bridge
            .commit_markup("<script>alert('again')</script><p>clean</p>")
            .unwrap();
        assert_eq!(commit.html, "<p>clean</p>");
    }

    #[test]
    fn test_commit_updates_both_representations() {
        let mut bridge = ready(RichTextBridge::mount("body", None, "<p>a</p>", sanitizer()));

        let doc = EditorDocument::from_blocks(vec![BlockNode::paragraph(vec![InlineNode::text(
            "new text",
        )])]);
        let commit = bridge.commit(doc.clone()).unwrap();

        assert_eq!(bridge.document(), &doc);
        assert_eq!(commit.html, "<p>new text</p>");
        assert_eq!(commit.value, doc.to_json());
        assert_eq!(bridge.presentation(), commit.html);
    }

    #[test]
    fn test_commit_requires_ready_surface() {
        let mut bridge = RichTextBridge::mount("body", None, "<p>a</p>", sanitizer());
        let result = bridge.commit(EditorDocument::empty());
        assert!(matches!(result, Err(MarkupError::SurfaceInactive(_))));
        assert_eq!(bridge.presentation(), "<p>a</p>");
    }

    #[test]
    fn test_render_loading_state() {
        let mut bridge = RichTextBridge::mount("body", None, "<p>a</p>", sanitizer());
        bridge.begin_activation();

        let node = bridge.render(true);
        assert_eq!(node.attr("data-resonance-surface"), Some("loading"));
        assert_eq!(node.text_content(), "Loading editor...");

        let viewing = bridge.render(false);
        assert_eq!(viewing.children()[0], VNode::raw_html("<p>a</p>"));
    }

    #[tokio::test]
    async fn test_activate_awaits_loader() {
        let mut bridge = RichTextBridge::mount("body", None, "", sanitizer());
        bridge.activate(tokio::task::yield_now()).await;
        assert_eq!(bridge.surface(), SurfaceState::Ready);
    }
}
