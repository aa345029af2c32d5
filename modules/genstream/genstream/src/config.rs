use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment prefix; nested keys use `__` (`GENSTREAM_UPSTREAM__URL`).
pub const ENV_PREFIX: &str = "GENSTREAM_";

/// Relay configuration.
///
/// Layers, later wins: compiled defaults, optional YAML file, `GENSTREAM_*` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenStreamConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Allowed CORS origin. Any origin is allowed when unset.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_owned(),
            cors_origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Generation endpoint receiving `{ model, prompt }`.
    pub url: String,
    pub model: String,
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434/api/generate".to_owned(),
            model: "gemma2:2b".to_owned(),
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// End-to-end deadline of one relay operation; `0` disables it.
    pub deadline_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { deadline_secs: 120 }
    }
}

impl RelayConfig {
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        (self.deadline_secs > 0).then(|| Duration::from_secs(self.deadline_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl GenStreamConfig {
    /// Build the layered figment without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load the configuration. An explicitly named file must exist.
    ///
    /// # Errors
    /// Returns a figment error when the file is missing or a layer holds a value of the wrong
    /// type.
    #[allow(clippy::result_large_err)]
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        if let Some(path) = file {
            if !path.is_file() {
                return Err(format!("configuration file {} not found", path.display()).into());
            }
        }
        Self::figment(file).extract()
    }
}
