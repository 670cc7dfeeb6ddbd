use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File system abstraction for loading registries and configuration
pub trait FileSystem {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error>;
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }
}

/// Mock file system for testing
pub struct MockFileSystem {
    pub files: HashMap<PathBuf, String>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, std::io::Error> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}

/// Read and deserialize a JSON file
pub fn load_json<T: serde::de::DeserializeOwned>(
    fs: &dyn FileSystem,
    path: &Path,
) -> crate::CommonResult<T> {
    let content = fs.read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommonError;

    #[test]
    fn test_mock_file_system_roundtrip() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/site/content.json", r#"{"title":"Hi"}"#);

        assert!(fs.exists(Path::new("/site/content.json")));
        assert!(!fs.exists(Path::new("/site/other.json")));

        let value: serde_json::Value = load_json(&fs, Path::new("/site/content.json")).unwrap();
        assert_eq!(value["title"], "Hi");
    }

    #[test]
    fn test_load_json_missing_file() {
        let fs = MockFileSystem::new();
        let result: crate::CommonResult<serde_json::Value> =
            load_json(&fs, Path::new("/missing.json"));
        assert!(matches!(result, Err(CommonError::Io(_))));
    }

    #[test]
    fn test_load_json_invalid() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/bad.json", "{not json");
        let result: crate::CommonResult<serde_json::Value> = load_json(&fs, Path::new("/bad.json"));
        assert!(matches!(result, Err(CommonError::Json(_))));
    }
}
