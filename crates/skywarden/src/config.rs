//! Application configuration.
//!
//! Everything the core needs is carried in an explicit [`AppConfig`]
//! passed in at construction time — credentials and endpoint lists are
//! configuration values, never ambient lookups inside the pipeline.
//! Loaded from `~/.skywarden/config.yaml` (or a path given on the CLI);
//! every field has a sensible default so a missing file still works.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::Domain;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default coordinate used when the caller omits one.
    #[serde(default)]
    pub location: LocationConfig,

    /// Per-domain toggles and search radii.
    #[serde(default)]
    pub domains: DomainsConfig,

    /// Open-Meteo API key (only required for commercial use; the free
    /// tier works without one).
    #[serde(default)]
    pub open_meteo_api_key: Option<String>,

    /// Ordered remote generation endpoints, primary first. Empty list
    /// means the rule-based generator handles everything.
    #[serde(default)]
    pub generators: Vec<EndpointConfig>,

    /// Advisory tuning constants.
    #[serde(default)]
    pub advisory: AdvisoryTuning,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Default config path: `~/.skywarden/config.yaml`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".skywarden")
            .join("config.yaml")
    }

    /// Load from an explicit path, or from the default path when it
    /// exists, or fall back to defaults. An explicit path that fails to
    /// load is an error; a missing default file is not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Default coordinate (Zurich).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_lat")]
    pub lat: f64,
    #[serde(default = "default_lon")]
    pub lon: f64,
}

fn default_lat() -> f64 {
    47.3769
}

fn default_lon() -> f64 {
    8.5417
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lat: default_lat(),
            lon: default_lon(),
        }
    }
}

/// Domain toggles and search radii.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainsConfig {
    /// Domains switched off in configuration; their adapters report
    /// `unavailable` without being attempted.
    #[serde(default)]
    pub disabled: Vec<Domain>,

    #[serde(default)]
    pub radii: RadiusConfig,
}

impl DomainsConfig {
    pub fn is_enabled(&self, domain: Domain) -> bool {
        !self.disabled.contains(&domain)
    }
}

/// Per-domain search radii in kilometers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusConfig {
    #[serde(default = "default_seismic_km")]
    pub seismic_km: f64,
    #[serde(default = "default_wildfire_km")]
    pub wildfire_km: f64,
    #[serde(default = "default_volcanic_km")]
    pub volcanic_km: f64,
    #[serde(default = "default_disaster_alerts_km")]
    pub disaster_alerts_km: f64,
}

fn default_seismic_km() -> f64 {
    500.0
}

fn default_wildfire_km() -> f64 {
    100.0
}

fn default_volcanic_km() -> f64 {
    300.0
}

fn default_disaster_alerts_km() -> f64 {
    1000.0
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            seismic_km: default_seismic_km(),
            wildfire_km: default_wildfire_km(),
            volcanic_km: default_volcanic_km(),
            disaster_alerts_km: default_disaster_alerts_km(),
        }
    }
}

/// Wire shape of a remote generation endpoint's response, declared in
/// configuration — never probed from the payload at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseFormat {
    /// OpenAI-style: `choices[0].message.content`.
    ChatCompletions,
    /// HF-inference-style: `generated_text` (bare object or one-element array).
    TextGeneration,
}

/// One remote generation endpoint in the cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Identifier recorded as advisory provenance, e.g. "apertus-8b".
    pub id: String,

    pub url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name sent in the request body, where the format needs one.
    #[serde(default)]
    pub model: Option<String>,

    pub format: ResponseFormat,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_tokens() -> u32 {
    256
}

/// Advisory judgment-call constants, fixed here rather than inferred
/// from inconsistent upstream history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryTuning {
    /// Minimum Kp for the aurora-visibility tip and question answer.
    #[serde(default = "default_aurora_kp")]
    pub aurora_kp_threshold: f64,

    /// Relative humidity below which the humidifier tip fires.
    #[serde(default = "default_humidifier_below")]
    pub humidifier_below_pct: f64,

    /// Relative humidity above which the dehumidifier tip fires.
    #[serde(default = "default_dehumidifier_above")]
    pub dehumidifier_above_pct: f64,
}

fn default_aurora_kp() -> f64 {
    5.0
}

fn default_humidifier_below() -> f64 {
    30.0
}

fn default_dehumidifier_above() -> f64 {
    70.0
}

impl Default for AdvisoryTuning {
    fn default() -> Self {
        Self {
            aurora_kp_threshold: default_aurora_kp(),
            humidifier_below_pct: default_humidifier_below(),
            dehumidifier_above_pct: default_dehumidifier_above(),
        }
    }
}
