use serde::{Deserialize, Serialize};

/// Session mode shared by every scope of an edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditMode {
    Viewing,
    Editing,
    Previewing,
    Publishing,
}

impl EditMode {
    /// Field changes are only accepted while editing
    pub fn accepts_edits(&self) -> bool {
        matches!(self, EditMode::Editing)
    }

    /// Whether editing controls are rendered at all
    pub fn shows_controls(&self) -> bool {
        matches!(self, EditMode::Editing | EditMode::Publishing)
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self, EditMode::Previewing)
    }
}

/// Inherited by nested scopes while rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub mode: EditMode,
    /// False until the mount gate has opened
    pub interactive: bool,
}

impl RenderContext {
    pub fn new(mode: EditMode) -> Self {
        Self {
            mode,
            interactive: true,
        }
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Controls are rendered and the mount delay has elapsed
    pub fn controls(&self) -> bool {
        self.mode.shows_controls() && self.interactive
    }

    /// Controls accept input
    pub fn enabled(&self) -> bool {
        self.mode.accepts_edits()
    }
}
