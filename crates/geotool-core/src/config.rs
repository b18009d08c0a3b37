use crate::error::{GeotoolError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the saved session, named after the browser storage key
pub const DEFAULT_DATA_FILE: &str = "geotool_data.json";

/// Default cache version; the static generation is named `geotool-<version>`
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// Hosts whose responses are treated as map tiles
pub const DEFAULT_TILE_HOSTS: &[&str] = &["google.com", "openstreetmap.org"];

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

pub const DEFAULT_PORT: u16 = 8080;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoTool
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub data_file: ConfigValue<PathBuf>,
    pub cache_version: ConfigValue<String>,
    pub tile_hosts: ConfigValue<Vec<String>>,
    pub origin: ConfigValue<String>,
    pub port: ConfigValue<u16>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            data_file: ConfigValue::new(PathBuf::from(DEFAULT_DATA_FILE), ConfigSource::Default),
            cache_version: ConfigValue::new(
                DEFAULT_CACHE_VERSION.to_string(),
                ConfigSource::Default,
            ),
            tile_hosts: ConfigValue::new(
                DEFAULT_TILE_HOSTS.iter().map(|h| h.to_string()).collect(),
                ConfigSource::Default,
            ),
            origin: ConfigValue::new(DEFAULT_ORIGIN.to_string(), ConfigSource::Default),
            port: ConfigValue::new(DEFAULT_PORT, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeotoolError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeotoolError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_file) = file_config.data_file {
            self.data_file.update(data_file, ConfigSource::File);
        }

        if let Some(version) = file_config.cache_version {
            let version = parse_cache_version(&version)?;
            self.cache_version.update(version, ConfigSource::File);
        }

        if let Some(hosts) = file_config.tile_hosts {
            self.tile_hosts.update(normalize_hosts(hosts), ConfigSource::File);
        }

        if let Some(origin) = file_config.origin {
            self.origin.update(origin, ConfigSource::File);
        }

        if let Some(port) = file_config.port {
            self.port.update(port, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the file only if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOTOOL_DATA_FILE
        if let Ok(path) = env::var("GEOTOOL_DATA_FILE") {
            if path.trim().is_empty() {
                tracing::warn!("Ignoring empty GEOTOOL_DATA_FILE");
            } else {
                self.data_file.update(PathBuf::from(path), ConfigSource::Environment);
            }
        }

        // GEOTOOL_CACHE_VERSION
        if let Ok(version) = env::var("GEOTOOL_CACHE_VERSION") {
            match parse_cache_version(&version) {
                Ok(version) => self.cache_version.update(version, ConfigSource::Environment),
                Err(e) => tracing::warn!("Invalid GEOTOOL_CACHE_VERSION value '{}': {}", version, e),
            }
        }

        // GEOTOOL_TILE_HOSTS, comma separated
        if let Ok(hosts) = env::var("GEOTOOL_TILE_HOSTS") {
            let hosts = parse_tile_hosts(&hosts);
            if hosts.is_empty() {
                tracing::warn!("Ignoring GEOTOOL_TILE_HOSTS: no hosts listed");
            } else {
                self.tile_hosts.update(hosts, ConfigSource::Environment);
            }
        }

        // GEOTOOL_ORIGIN
        if let Ok(origin) = env::var("GEOTOOL_ORIGIN") {
            self.origin.update(origin, ConfigSource::Environment);
        }

        // GEOTOOL_PORT
        if let Ok(port_str) = env::var("GEOTOOL_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port.update(port, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOTOOL_PORT value '{}': expected a port number",
                    port_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(data_file) = overrides.data_file {
            self.data_file.update(data_file, ConfigSource::Cli);
        }

        if let Some(version) = overrides.cache_version {
            self.cache_version.update(version, ConfigSource::Cli);
        }

        if let Some(hosts) = overrides.tile_hosts {
            self.tile_hosts.update(normalize_hosts(hosts), ConfigSource::Cli);
        }

        if let Some(origin) = overrides.origin {
            self.origin.update(origin, ConfigSource::Cli);
        }

        if let Some(port) = overrides.port {
            self.port.update(port, ConfigSource::Cli);
        }
    }

    /// Name of the static cache generation
    pub fn static_cache_name(&self) -> String {
        format!("geotool-{}", self.cache_version.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "data_file".to_string(),
            (self.data_file.value.display().to_string(), self.data_file.source),
        );

        map.insert(
            "cache_version".to_string(),
            (self.cache_version.value.clone(), self.cache_version.source),
        );

        map.insert(
            "tile_hosts".to_string(),
            (self.tile_hosts.value.join(","), self.tile_hosts.source),
        );

        map.insert("origin".to_string(), (self.origin.value.clone(), self.origin.source));

        map.insert("port".to_string(), (self.port.value.to_string(), self.port.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    data_file: Option<PathBuf>,
    cache_version: Option<String>,
    tile_hosts: Option<Vec<String>>,
    origin: Option<String>,
    port: Option<u16>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_file: Option<PathBuf>,
    pub cache_version: Option<String>,
    pub tile_hosts: Option<Vec<String>>,
    pub origin: Option<String>,
    pub port: Option<u16>,
}

/// Validate a cache version tag.
///
/// The tag ends up in a cache name, so it must be non-empty and made of
/// ASCII alphanumerics, `.`, `-` or `_`.
pub fn parse_cache_version(s: &str) -> Result<String> {
    let trimmed = s.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(GeotoolError::ConfigInvalid {
            key: "cache_version".to_string(),
            reason: format!("Invalid cache version: '{}'. Use letters, digits, '.', '-' or '_'", s),
        })
    }
}

/// Split a comma-separated host list
pub fn parse_tile_hosts(s: &str) -> Vec<String> {
    normalize_hosts(s.split(',').map(str::to_string).collect())
}

fn normalize_hosts(hosts: Vec<String>) -> Vec<String> {
    hosts
        .into_iter()
        .map(|h| h.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.data_file.value, PathBuf::from("geotool_data.json"));
        assert_eq!(config.cache_version.value, "v1");
        assert_eq!(config.tile_hosts.value, vec!["google.com", "openstreetmap.org"]);
        assert_eq!(config.port.source, ConfigSource::Default);
        assert_eq!(config.static_cache_name(), "geotool-v1");
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
data_file = "/var/lib/geotool/session.json"
cache_version = "v2"
tile_hosts = ["tile.opentopomap.org", " .Google.com "]
port = 9000
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.data_file.value, PathBuf::from("/var/lib/geotool/session.json"));
        assert_eq!(config.data_file.source, ConfigSource::File);
        assert_eq!(config.static_cache_name(), "geotool-v2");
        assert_eq!(config.tile_hosts.value, vec!["tile.opentopomap.org", "google.com"]);
        assert_eq!(config.port.value, 9000);
        assert_eq!(config.origin.source, ConfigSource::Default);
    }

    #[test]
    fn test_bad_cache_version_in_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"cache_version = "v 2/../""#).unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, GeotoolError::ConfigInvalid { ref key, .. } if key == "cache_version"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            data_file: Some(PathBuf::from("field.json")),
            port: Some(3000),
            ..Default::default()
        });

        assert_eq!(config.data_file.value, PathBuf::from("field.json"));
        assert_eq!(config.data_file.source, ConfigSource::Cli);
        assert_eq!(config.port.value, 3000);
        assert_eq!(config.cache_version.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_tile_hosts() {
        assert_eq!(
            parse_tile_hosts("google.com, OpenStreetMap.org,,"),
            vec!["google.com", "openstreetmap.org"]
        );
        assert!(parse_tile_hosts(" , ").is_empty());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 5);
        let (hosts, source) = &map["tile_hosts"];
        assert_eq!(hosts, "google.com,openstreetmap.org");
        assert_eq!(*source, ConfigSource::Default);
    }
}
