pub mod bind;
pub mod fields;
pub mod init;
pub mod markup;

pub use bind::{bind, BindArgs};
pub use fields::{fields, FieldsArgs};
pub use init::{init, InitArgs};
pub use markup::{markup, MarkupArgs};

use anyhow::{Context, Result};
use resonance_common::{load_json, RealFileSystem};
use resonance_content::{AttributeDescriptor, ContentRegistry};
use std::path::Path;

/// Resolve `path` against the working directory
pub(crate) fn resolve(cwd: &Path, path: &Path) -> std::path::PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

pub(crate) fn load_registry(cwd: &Path, path: &Path) -> Result<ContentRegistry> {
    let path = resolve(cwd, path);
    ContentRegistry::load(&RealFileSystem, &path)
        .with_context(|| format!("Failed to load registry {}", path.display()))
}

pub(crate) fn load_descriptors(cwd: &Path, path: &Path) -> Result<Vec<AttributeDescriptor>> {
    let path = resolve(cwd, path);
    load_json(&RealFileSystem, &path)
        .with_context(|| format!("Failed to load descriptors {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_cwd() {
        let cwd = Path::new("/site");
        assert_eq!(
            resolve(cwd, Path::new("content.json")),
            Path::new("/site/content.json")
        );
        assert_eq!(
            resolve(cwd, Path::new("/data/content.json")),
            Path::new("/data/content.json")
        );
    }
}
