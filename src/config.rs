//! Client configuration

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::storage::FileStorage;

/// Config file location relative to the user config directory
const CONFIG_FILE_PATH: &str = "specials-admin/config.toml";

/// Prefix of environment overrides, e.g. `SPECIALS_API_BASE_URL`
const ENV_PREFIX: &str = "SPECIALS_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, endpoint paths are appended to it
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Where the session tokens are kept; defaults to the user data directory
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000/api".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            token_file: None,
        }
    }
}

/// A command line value, applied over the config file and the environment
pub struct ConfigOverride(Figment);

impl ConfigOverride {
    pub fn api_base_url(url: impl Into<String>) -> Self {
        Self(Figment::new().merge(Serialized::default("api_base_url", url.into())))
    }

    pub fn token_file(path: impl Into<PathBuf>) -> Self {
        Self(Figment::new().merge(Serialized::default("token_file", path.into())))
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Load defaults, then the user config file, then `SPECIALS_*` env vars,
    /// then `overrides`. The merged result is validated once.
    pub fn load(overrides: impl IntoIterator<Item = ConfigOverride>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = Self::config_file_path() {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Self::from_figment(with_overrides(figment, overrides))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/specials-admin/config.toml`
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_PATH))
    }

    /// Configured token file, or the platform default
    pub fn token_file_path(&self) -> Option<PathBuf> {
        self.token_file.clone().or_else(FileStorage::default_path)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_base_url).map_err(|e| {
            ClientError::Configuration(format!("Invalid API base URL {}: {e}", self.api_base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "API base URL must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn with_overrides(
    mut figment: Figment,
    overrides: impl IntoIterator<Item = ConfigOverride>,
) -> Figment {
    for ConfigOverride(provider) in overrides {
        figment = figment.merge(provider);
    }
    figment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(ClientConfig::default()))
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_figment(defaults()).unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.token_file.is_none());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = defaults().merge(Toml::string(
            r#"
            api_base_url = "https://admin.example.com/api"
            token_file = "/tmp/session.json"
            "#,
        ));

        let config = ClientConfig::from_figment(figment).unwrap();
        assert_eq!(config.api_base_url, "https://admin.example.com/api");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.token_file_path(), Some(PathBuf::from("/tmp/session.json")));
    }

    #[test]
    fn test_rejects_bad_url() {
        let figment = defaults().merge(Toml::string(r#"api_base_url = "not a url""#));
        assert!(matches!(
            ClientConfig::from_figment(figment),
            Err(ClientError::Configuration(_))
        ));

        let config = ClientConfig::new("ftp://example.com/api");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_command_line_overrides_bad_file_value() {
        let file = defaults().merge(Toml::string(
            r#"
            api_base_url = "not a url"
            timeout_secs = 5
            "#,
        ));
        let overrides = [
            ConfigOverride::api_base_url("https://admin.example.com/api"),
            ConfigOverride::token_file("/tmp/other.json"),
        ];

        let config = ClientConfig::from_figment(with_overrides(file, overrides)).unwrap();
        assert_eq!(config.api_base_url, "https://admin.example.com/api");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/other.json")));
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let overrides = [ConfigOverride::api_base_url("localhost:8000")];
        assert!(matches!(
            ClientConfig::from_figment(with_overrides(defaults(), overrides)),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
