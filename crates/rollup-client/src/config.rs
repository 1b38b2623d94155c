//! Client configuration.
//!
//! Constructed explicitly and passed to [`crate::L2Client`]; nothing here
//! reads process-wide state except [`ClientConfig::load`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rollup_core::AssetId;
use rollup_txutils::KeySource;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Where the signing seed comes from.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyConfig {
    /// Hex seed inline. Local tooling and tests only.
    Seed(String),
    /// Name of an environment variable holding the hex seed.
    Env(String),
    /// Path of a file holding the hex seed.
    File(PathBuf),
}

impl KeyConfig {
    pub fn to_source(&self) -> KeySource {
        match self {
            Self::Seed(seed) => KeySource::Seed { seed: seed.clone() },
            Self::Env(var_name) => KeySource::EnvVar {
                var_name: var_name.clone(),
            },
            Self::File(path) => KeySource::File { path: path.clone() },
        }
    }
}

impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seed(_) => f.write_str("Seed(<redacted>)"),
            Self::Env(var) => f.debug_tuple("Env").field(var).finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Rollup REST endpoint root.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout (ms). Default: 10,000.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Window added to "now" for unset expirations (ms). Default: 7 days.
    #[serde(default = "default_expiry_ms")]
    pub default_expiry_ms: i64,
    /// Gas asset used when a call does not name one. Default: 0.
    #[serde(default = "default_gas_asset_id")]
    pub default_gas_asset_id: i64,
    /// Signing key. Unset: read-only client.
    #[serde(default)]
    pub key: Option<KeyConfig>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8888".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_expiry_ms() -> i64 {
    7 * 24 * 60 * 60 * 1000
}

fn default_gas_asset_id() -> i64 {
    0
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_ms: default_request_timeout_ms(),
            default_expiry_ms: default_expiry_ms(),
            default_gas_asset_id: default_gas_asset_id(),
            key: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `ROLLUP_CONFIG` (default `config/default.toml`).
    pub fn load() -> ClientResult<Self> {
        let config_path =
            std::env::var("ROLLUP_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ClientError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ClientError::Config(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        if self.default_expiry_ms <= 0 {
            return Err(ClientError::Config(
                "default_expiry_ms must be positive".to_string(),
            ));
        }
        if self.default_gas_asset_id < 0 {
            return Err(ClientError::Config(
                "default_gas_asset_id must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn gas_asset_id(&self) -> AssetId {
        AssetId::new(self.default_gas_asset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: ClientConfig = toml::from_str(r#"endpoint = "https://api.example.org""#).unwrap();
        assert_eq!(config.endpoint, "https://api.example.org");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.default_expiry_ms, 604_800_000);
        assert_eq!(config.gas_asset_id(), AssetId::new(0));
        assert!(config.key.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_key_config_forms() {
        let config: ClientConfig = toml::from_str(
            r#"
            [key]
            env = "ROLLUP_SEED"
            "#,
        )
        .unwrap();
        assert_eq!(config.key, Some(KeyConfig::Env("ROLLUP_SEED".to_string())));
        assert!(matches!(
            config.key.unwrap().to_source(),
            KeySource::EnvVar { var_name } if var_name == "ROLLUP_SEED"
        ));

        let config: ClientConfig = toml::from_str(
            r#"
            [key]
            file = "/etc/rollup/seed"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.key,
            Some(KeyConfig::File(PathBuf::from("/etc/rollup/seed")))
        );
    }

    #[test]
    fn test_seed_is_redacted_in_debug() {
        let key = KeyConfig::Seed("0xdeadbeef".to_string());
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("deadbeef"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClientConfig {
            key: Some(KeyConfig::Seed("0x01".to_string())),
            default_gas_asset_id: 2,
            ..ClientConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig {
            endpoint: "127.0.0.1:8888".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));

        let config = ClientConfig {
            default_expiry_ms: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing_is_config_error() {
        let err = ClientConfig::from_file("/nonexistent/rollup.toml").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
