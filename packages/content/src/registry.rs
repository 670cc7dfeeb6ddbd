//! Host-provided content registry.

use crate::error::ContentResult;
use crate::value::ContentBundle;
use resonance_common::{load_json, FileSystem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Persisted bundles per scope and the editor-mode flag
///
/// Constructed once at the composition root and passed down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRegistry {
    #[serde(default)]
    pub content_values: BTreeMap<String, ContentBundle>,
    #[serde(default)]
    pub is_editor_mode: bool,
}

impl ContentRegistry {
    pub fn new(content_values: BTreeMap<String, ContentBundle>, is_editor_mode: bool) -> Self {
        Self {
            content_values,
            is_editor_mode,
        }
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> ContentResult<Self> {
        let registry: ContentRegistry = load_json(fs, path)?;
        debug!(
            path = %path.display(),
            scopes = registry.content_values.len(),
            "Loaded content registry"
        );
        Ok(registry)
    }

    /// Persisted bundle of a scope, empty when the scope has none
    pub fn bundle_for(&self, scope: &str) -> ContentBundle {
        self.content_values.get(scope).cloned().unwrap_or_default()
    }
}
