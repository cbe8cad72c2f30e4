//! Pipeline configuration loaded from TOML.
//!
//! ```toml
//! [classifier]
//! blend_threshold = 0.8
//! model_path = "models/sensitivity.json"
//!
//! [secret_keys.default]
//! env = "PAT_TOKEN_KEY"
//!
//! [secret_keys.audit]
//! value = "inline-key-material"
//!
//! [policies.auditor.rules.PII]
//! kind = "tokenize"
//! key = "audit"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use pat_classify::DEFAULT_BLEND_THRESHOLD;
use pat_policy::{PolicyDefinition, PolicyEngine};
use pat_transform::{KeyRing, SecretKey};
use serde::Deserialize;
use tracing::Level;

use crate::error::ConfigError;
use crate::logging::{LogConfig, LogFormat};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub classifier: ClassifierConfig,
    pub secret_keys: BTreeMap<String, KeySource>,
    pub policies: BTreeMap<String, PolicyDefinition>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Rule confidence at or above which the statistical model is skipped.
    pub blend_threshold: f32,
    /// Model artifact; rule-only classification when unset.
    pub model_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            blend_threshold: DEFAULT_BLEND_THRESHOLD,
            model_path: None,
        }
    }
}

/// Where a secret key's material comes from.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySource {
    /// Inline key material.
    Value(String),
    /// Name of an environment variable holding the key material.
    Env(String),
}

impl KeySource {
    /// Resolve against the process environment.
    pub fn resolve(&self, name: &str) -> Result<SecretKey, ConfigError> {
        self.resolve_with(name, |var| std::env::var(var).ok())
    }

    /// Resolve with a custom environment lookup.
    pub fn resolve_with<F>(&self, name: &str, lookup: F) -> Result<SecretKey, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let material = match self {
            KeySource::Value(value) => value.clone(),
            KeySource::Env(var) => lookup(var).ok_or_else(|| ConfigError::MissingEnv {
                key: name.to_string(),
                var: var.clone(),
            })?,
        };
        if material.is_empty() {
            return Err(ConfigError::EmptySecret {
                key: name.to_string(),
            });
        }
        Ok(SecretKey::new(material))
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Value(_) => f.write_str("Value([REDACTED])"),
            KeySource::Env(var) => f.debug_tuple("Env").field(var).finish(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub log_data: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level: Level = self.level.parse().map_err(|_| ConfigError::Invalid {
            message: format!("unknown log level `{}`", self.level),
        })?;
        Ok(LogConfig::default()
            .with_level(level)
            .with_format(self.format)
            .with_log_file(self.log_file.clone())
            .with_log_data(self.log_data))
    }
}

impl PipelineConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.classifier.blend_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                message: format!("blend_threshold must be within 0.0..=1.0, got {threshold}"),
            });
        }
        Ok(())
    }

    /// Resolve every configured secret key.
    pub fn key_ring(&self) -> Result<KeyRing, ConfigError> {
        self.key_ring_with(|var| std::env::var(var).ok())
    }

    pub fn key_ring_with<F>(&self, lookup: F) -> Result<KeyRing, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ring = KeyRing::new();
        for (name, source) in &self.secret_keys {
            ring.insert(name.clone(), source.resolve_with(name, &lookup)?);
        }
        Ok(ring)
    }

    /// Built-in policies plus the configured ones.
    pub fn policy_engine(&self) -> Result<PolicyEngine, ConfigError> {
        let mut engine = PolicyEngine::with_defaults();
        engine.register_definitions(&self.policies)?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config.classifier.blend_threshold, DEFAULT_BLEND_THRESHOLD);
        assert!(config.classifier.model_path.is_none());
        assert!(config.secret_keys.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn key_sources_parse_by_tag() {
        let config = PipelineConfig::from_toml_str(
            r#"
[secret_keys.default]
env = "PAT_KEY"

[secret_keys.inline]
value = "abc"
"#,
        )
        .unwrap();
        assert_eq!(
            config.secret_keys["default"],
            KeySource::Env("PAT_KEY".to_string())
        );
        assert_eq!(
            config.secret_keys["inline"],
            KeySource::Value("abc".to_string())
        );
    }

    #[test]
    fn inline_key_is_redacted_in_debug() {
        let source = KeySource::Value("hunter2".to_string());
        assert_eq!(format!("{source:?}"), "Value([REDACTED])");
    }

    #[test]
    fn empty_secret_is_rejected() {
        let err = KeySource::Value(String::new())
            .resolve_with("default", |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptySecret { ref key } if key == "default"));
    }

    #[test]
    fn threshold_out_of_range_is_invalid() {
        let err = PipelineConfig::from_toml_str("[classifier]\nblend_threshold = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn logging_section_builds_log_config() {
        let config =
            PipelineConfig::from_toml_str("[logging]\nlevel = \"debug\"\nformat = \"json\"\n")
                .unwrap();
        let log_config = config.logging.to_log_config().unwrap();
        assert_eq!(log_config.level, Level::DEBUG);
        assert_eq!(log_config.format, LogFormat::Json);

        let bad = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(bad.to_log_config().is_err());
    }
}
