// Build settings
// Every field has a default, so an empty file (or no file) reproduces the
// standard five-registry build.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://standards-oui.ieee.org";

/// Floor for all registries together (35830 as of 2018-09-05).
pub const DEFAULT_MIN_TOTAL: usize = 35_000;

/// Which rule field goes into the prefix table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableValueSetting {
    /// Human-facing display name (default)
    #[default]
    Display,
    /// Canonical name, for consumers that translate through the JSON map
    Canonical,
}

/// One upstream registry export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub name: String,
    /// Path appended to `base_url`
    pub path: String,
    /// Fewer rows than this aborts the build
    #[serde(default)]
    pub min_entries: usize,
}

impl RegistryConfig {
    fn new(name: &str, path: &str, min_entries: usize) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            min_entries,
        }
    }
}

/// Where the two artifacts go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub prefix_table: String,
    pub canonical_map: String,
    pub table_value: TableValueSetting,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            prefix_table: "oui.csv".to_string(),
            canonical_map: "oui_cn.json".to_string(),
            table_value: TableValueSetting::Display,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub base_url: String,
    pub min_total: usize,
    /// Cap on each whole registry download, in seconds. Unset means only
    /// the connect phase is bounded.
    pub fetch_timeout_secs: Option<u64>,
    /// Override rule file
    pub rules: PathBuf,
    pub output: OutputConfig,
    pub registries: Vec<RegistryConfig>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_total: DEFAULT_MIN_TOTAL,
            fetch_timeout_secs: None,
            rules: PathBuf::from("oui-translate.csv"),
            output: OutputConfig::default(),
            registries: vec![
                RegistryConfig::new("OUI", "/oui/oui.csv", 1000),
                RegistryConfig::new("CID", "/cid/cid.csv", 75),
                RegistryConfig::new("IAB", "/iab/iab.csv", 1000),
                RegistryConfig::new("OUI28", "/oui28/mam.csv", 1000),
                RegistryConfig::new("OUI36", "/oui36/oui36.csv", 1000),
            ],
        }
    }
}

impl BuildConfig {
    /// Get the per-user config file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ouimap");
        config_dir.join("config.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: BuildConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// An explicit path must exist; otherwise the per-user file is used if
    /// present, else the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let path = Self::config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registries.is_empty() {
            return Err(ConfigError::Validation(
                "at least one registry is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for registry in &self.registries {
            if registry.name.trim().is_empty() {
                return Err(ConfigError::Validation("registry with empty name".into()));
            }
            if registry.path.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "registry '{}' has an empty path",
                    registry.name
                )));
            }
            if !seen.insert(registry.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate registry name '{}'",
                    registry.name
                )));
            }
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!("invalid base_url '{}': {}", self.base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.fetch_timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "fetch_timeout_secs must be greater than zero".into(),
            ));
        }

        if self.output.prefix_table.is_empty() || self.output.canonical_map.is_empty() {
            return Err(ConfigError::Validation("output file names must not be empty".into()));
        }
        if self.output.prefix_table == self.output.canonical_map {
            return Err(ConfigError::Validation(
                "prefix_table and canonical_map must be different files".into(),
            ));
        }

        Ok(())
    }

    /// Registries sorted by name. Prefix precedence depends on this order.
    pub fn registries_in_processing_order(&self) -> Vec<&RegistryConfig> {
        let mut sorted: Vec<&RegistryConfig> = self.registries.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    pub fn prefix_table_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.prefix_table)
    }

    pub fn canonical_map_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.canonical_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_five_registries() {
        let config = BuildConfig::default();
        config.validate().unwrap();
        assert_eq!(config.registries.len(), 5);
        assert_eq!(config.min_total, 35_000);
        assert_eq!(config.prefix_table_path(), PathBuf::from("dist/oui.csv"));
        assert_eq!(config.canonical_map_path(), PathBuf::from("dist/oui_cn.json"));
    }

    #[test]
    fn processing_order_is_by_name() {
        let config = BuildConfig::default();
        let names: Vec<_> = config
            .registries_in_processing_order()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["CID", "IAB", "OUI", "OUI28", "OUI36"]);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(BuildConfig::from_toml("").unwrap(), BuildConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = BuildConfig::from_toml(
            r#"
base_url = "http://127.0.0.1:8080/cache"
min_total = 10

[output]
table_value = "canonical"

[[registries]]
name = "OUI"
path = "/oui/oui.csv"
min_entries = 5
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080/cache");
        assert_eq!(config.min_total, 10);
        assert_eq!(config.output.table_value, TableValueSetting::Canonical);
        assert_eq!(config.output.dir, PathBuf::from("dist"));
        assert_eq!(config.registries, vec![RegistryConfig::new("OUI", "/oui/oui.csv", 5)]);
    }

    #[test]
    fn fetch_timeout_is_optional() {
        assert_eq!(BuildConfig::default().fetch_timeout_secs, None);
        let config = BuildConfig::from_toml("fetch_timeout_secs = 600").unwrap();
        assert_eq!(config.fetch_timeout_secs, Some(600));

        let err = BuildConfig::from_toml("fetch_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn duplicate_registry_rejected() {
        let err = BuildConfig::from_toml(
            r#"
[[registries]]
name = "OUI"
path = "/a.csv"

[[registries]]
name = "OUI"
path = "/b.csv"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate registry name 'OUI'"));
    }

    #[test]
    fn empty_registry_list_rejected() {
        let err = BuildConfig::from_toml("registries = []").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn bad_base_url_rejected() {
        let err = BuildConfig::from_toml(r#"base_url = "ftp://example.com""#).unwrap_err();
        assert!(err.to_string().contains("http or https"));

        let err = BuildConfig::from_toml(r#"base_url = "not a url""#).unwrap_err();
        assert!(err.to_string().contains("invalid base_url"));
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = BuildConfig::load(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_total = 1\n").unwrap();
        let config = BuildConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.min_total, 1);
    }
}
