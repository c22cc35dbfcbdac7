//! # Service Configuration
//!
//! Loaded once at startup. An optional YAML file named by `STATESET_CONFIG`
//! supplies defaults; `PORT`, `AUTH_TOKEN` and `STATESET_LOG_JSON` override
//! it.
//!
//! ```yaml
//! port: 8080
//! auth_token: change-me
//! log_json: true
//! rules:
//!   review_precondition: strict
//!   agreement_signers: party
//! ```

use std::path::Path;

use serde::Deserialize;
use stateset_contracts::RulesConfig;
use thiserror::Error;

use crate::auth::SecretToken;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration of the API service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Bearer token required on `/v1/*`; `None` disables auth.
    pub auth_token: Option<SecretToken>,
    pub rules: RulesConfig,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: None,
            rules: RulesConfig::default(),
            log_json: false,
        }
    }
}

/// Error loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    port: Option<u16>,
    auth_token: Option<String>,
    log_json: Option<bool>,
    rules: RulesConfig,
}

impl AppConfig {
    /// Parse a YAML config document. Missing keys take their defaults.
    pub fn from_yaml_str(doc: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = if doc.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(doc)?
        };
        Ok(Self {
            port: file.port.unwrap_or(DEFAULT_PORT),
            auth_token: file.auth_token.filter(|t| !t.is_empty()).map(SecretToken::new),
            rules: file.rules,
            log_json: file.log_json.unwrap_or(false),
        })
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let doc = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&doc)
    }

    /// Apply environment overrides read through `var`.
    pub fn with_overrides(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = var("PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(token) = var("AUTH_TOKEN").filter(|t| !t.is_empty()) {
            self.auth_token = Some(SecretToken::new(token));
        }
        if let Some(flag) = var("STATESET_LOG_JSON") {
            self.log_json = match flag.as_str() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "STATESET_LOG_JSON",
                        value: flag,
                    })
                }
            };
        }
        Ok(self)
    }

    /// Load from `STATESET_CONFIG` (if set) plus process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var("STATESET_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_yaml_file(Path::new(&path))?,
            _ => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stateset_contracts::{AgreementSignerPolicy, ReviewPrecondition};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn full_document() {
        let cfg = AppConfig::from_yaml_str(
            "port: 9000\nauth_token: s3cret\nlog_json: true\nrules:\n  review_precondition: strict\n  agreement_signers: both_parties\n",
        )
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.auth_token, Some(SecretToken::new("s3cret")));
        assert!(cfg.log_json);
        assert_eq!(cfg.rules.review_precondition, ReviewPrecondition::Strict);
        assert_eq!(cfg.rules.agreement_signers, AgreementSignerPolicy::BothParties);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(AppConfig::from_yaml_str("listen: 1\n").is_err());
    }

    #[test]
    fn env_overrides_file() {
        let cfg = AppConfig::from_yaml_str("port: 9000\n")
            .unwrap()
            .with_overrides(env(&[("PORT", "7000"), ("AUTH_TOKEN", "t"), ("STATESET_LOG_JSON", "1")]))
            .unwrap();
        assert_eq!(cfg.port, 7000);
        assert_eq!(cfg.auth_token, Some(SecretToken::new("t")));
        assert!(cfg.log_json);
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = AppConfig::default()
            .with_overrides(env(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stateset.yaml");
        std::fs::write(&path, "rules:\n  agreement_signers: party\n").unwrap();
        let cfg = AppConfig::from_yaml_file(&path).unwrap();
        assert_eq!(cfg.rules.agreement_signers, AgreementSignerPolicy::Party);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn debug_does_not_leak_token() {
        let cfg = AppConfig::from_yaml_str("auth_token: hunter2\n").unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
