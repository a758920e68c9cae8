//! Configuration management for careerd.
//!
//! Loads settings from /etc/careerd/config.toml, falling back to a
//! ./careerd.toml next to the binary, then to defaults. CAREERD_CONFIG
//! overrides the path entirely.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/careerd/config.toml";

/// Working-directory fallback for development setups
pub const LOCAL_CONFIG_PATH: &str = "careerd.toml";

/// Environment variable overriding the config file path
pub const CONFIG_ENV: &str = "CAREERD_CONFIG";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_bind_addr() -> String {
    // Localhost only; the platform gateway proxies external traffic
    "127.0.0.1:7870".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("careerd.db")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: default_database_path(),
        }
    }
}

/// Gateway authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer secret the gateway must present; empty disables the check
    #[serde(default)]
    pub shared_secret: String,
}

/// Locale bundle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Directory holding `<locale>/translations.json` bundles
    #[serde(default = "default_translations_dir")]
    pub translations_dir: PathBuf,

    /// Locale served when the requested one has no bundle
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_translations_dir() -> PathBuf {
    PathBuf::from("translations")
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            translations_dir: default_translations_dir(),
            default_locale: default_locale(),
        }
    }
}

/// Module catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// JSON file mapping module ids to labels; unset runs without a catalog
    #[serde(default)]
    pub map_path: Option<PathBuf>,
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub i18n: I18nConfig,

    #[serde(default)]
    pub modules: ModulesConfig,
}

impl Config {
    /// Load config from the standard locations, or return defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from_path(&path).unwrap_or_else(|e| {
                warn!("Config {} unreadable, using defaults: {}", path, e);
                Config::default()
            });
        }

        Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(LOCAL_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })
    }

    /// Load config from a specific path
    fn load_from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:7870");
        assert_eq!(config.server.database_path, PathBuf::from("careerd.db"));
        assert!(config.auth.shared_secret.is_empty());
        assert_eq!(config.i18n.default_locale, "en");
        assert!(config.modules.map_path.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[server]
bind_addr = "0.0.0.0:9000"

[auth]
shared_secret = "s3cret"

[modules]
map_path = "/etc/careerd/modules.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.auth.shared_secret, "s3cret");
        assert_eq!(
            config.modules.map_path,
            Some(PathBuf::from("/etc/careerd/modules.json"))
        );
        // Defaults for missing fields
        assert_eq!(config.server.database_path, PathBuf::from("careerd.db"));
        assert_eq!(config.i18n.translations_dir, PathBuf::from("translations"));
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind_addr, Config::default().server.bind_addr);
    }
}
