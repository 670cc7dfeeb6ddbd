use resonance_content::ContentScope;

/// Dirty state of one independent edit region
///
/// Raised on the first field change; cleared only by a publish-success
/// acknowledgment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlag(bool);

impl DirtyFlag {
    pub fn raise(&mut self) {
        self.0 = true;
    }

    pub(crate) fn clear(&mut self) {
        self.0 = false;
    }

    pub fn is_raised(&self) -> bool {
        self.0
    }
}

/// A root content scope and its dirty flag
#[derive(Debug)]
pub struct Region {
    pub scope: ContentScope,
    pub dirty: DirtyFlag,
}

impl Region {
    pub fn new(scope: ContentScope) -> Self {
        Self {
            scope,
            dirty: DirtyFlag::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.scope.name()
    }
}
