use crate::errors::ConfigError;
use resonance_common::{load_json, FileSystem, RealFileSystem};
use resonance_content::IdPolicy;
use resonance_markup::SanitizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "resonance.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Origin acknowledgments must come from
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Delay before editing controls become interactive
    #[serde(default = "default_mount_delay_ms")]
    pub mount_delay_ms: u64,

    #[serde(default)]
    pub id_policy: IdPolicy,

    #[serde(default)]
    pub publish: PublishPolicy,

    #[serde(default)]
    pub sanitizer: SanitizerConfig,
}

fn default_origin() -> String {
    "http://localhost".to_string()
}

fn default_mount_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPolicy {
    /// Wait per attempt; `null` waits forever
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: Option<u64>,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_timeout_ms() -> Option<u64> {
    Some(10_000)
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for PublishPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PublishPolicy {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            mount_delay_ms: default_mount_delay_ms(),
            id_policy: IdPolicy::default(),
            publish: PublishPolicy::default(),
            sanitizer: SanitizerConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from(&RealFileSystem, cwd)
    }

    pub fn load_from(fs: &dyn FileSystem, cwd: &Path) -> Result<Self, ConfigError> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if fs.exists(&config_path) {
            Ok(load_json(fs, &config_path)?)
        } else {
            // Return default config if none exists
            Ok(EditorConfig::default())
        }
    }

    pub fn mount_delay(&self) -> Duration {
        Duration::from_millis(self.mount_delay_ms)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_common::MockFileSystem;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "origin": "https://site.example",
            "mountDelayMs": 0,
            "idPolicy": "stable",
            "publish": { "timeoutMs": null, "maxAttempts": 1 },
            "sanitizer": { "allowedTags": ["p", "a"] }
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.origin, "https://site.example");
        assert_eq!(config.mount_delay(), Duration::ZERO);
        assert_eq!(config.id_policy, IdPolicy::Stable);
        assert_eq!(config.publish.timeout(), None);
        assert_eq!(config.publish.max_attempts, 1);
        assert_eq!(config.sanitizer.allowed_tags.len(), 2);
        assert!(config.sanitizer.allowed_schemes.contains("https"));
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.mount_delay(), Duration::from_millis(500));
        assert_eq!(config.id_policy, IdPolicy::PerRender);
        assert_eq!(config.publish.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.publish.max_attempts, 3);
    }

    #[test]
    fn test_load_falls_back_to_default() {
        let fs = MockFileSystem::new();
        let config = EditorConfig::load_from(&fs, Path::new("/site")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_directory() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/site/resonance.config.json", r#"{"mountDelayMs": 250}"#);

        let config = EditorConfig::load_from(&fs, Path::new("/site")).unwrap();
        assert_eq!(config.mount_delay_ms, 250);
        assert_eq!(config.origin, "http://localhost");
    }

    #[test]
    fn test_invalid_config_reports_error() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/site/resonance.config.json", "{ nope");
        assert!(matches!(
            EditorConfig::load_from(&fs, Path::new("/site")),
            Err(ConfigError::Load(_))
        ));
    }
}
