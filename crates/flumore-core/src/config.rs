//! Adapter configuration that hosts and the CLI can serialize/deserialize.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How a dataset path is turned into a source adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Dispatch by file extension.
    #[default]
    Auto,
    Json,
    Csv,
}

impl FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SourceFormat::Auto),
            "json" => Ok(SourceFormat::Json),
            "csv" => Ok(SourceFormat::Csv),
            other => Err(Error::Config(format!("unknown source format '{other}'"))),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceFormat::Auto => "auto",
            SourceFormat::Json => "json",
            SourceFormat::Csv => "csv",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Nesting depth past which geometry decomposition fails instead of recursing.
    pub max_geometry_depth: usize,

    /// Log every read feature's structured form to the host log.
    pub log_features: bool,

    /// Source adapter selection for reader datasets.
    pub source_format: SourceFormat,

    /// Mapping-file directive the reader looks up when opened without parameters.
    pub parameter_tag: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            max_geometry_depth: 256,
            log_features: true,
            source_format: SourceFormat::Auto,
            parameter_tag: "FLUMORE_PARAMETER".to_string(),
        }
    }
}

impl AdapterConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `FLUMORE_MAX_GEOMETRY_DEPTH`: decomposition depth limit
    /// - `FLUMORE_LOG_FEATURES`: `true`/`false`, `1`/`0`
    /// - `FLUMORE_SOURCE_FORMAT`: `auto`, `json` or `csv`
    /// - `FLUMORE_PARAMETER_TAG`: mapping-file directive name
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AdapterConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("FLUMORE_MAX_GEOMETRY_DEPTH") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.max_geometry_depth = v;
            }
        }

        if let Some(s) = lookup("FLUMORE_LOG_FEATURES") {
            if let Some(v) = parse_flag(&s) {
                cfg.log_features = v;
            }
        }

        if let Some(s) = lookup("FLUMORE_SOURCE_FORMAT") {
            if let Ok(v) = s.parse::<SourceFormat>() {
                cfg.source_format = v;
            }
        }

        if let Some(s) = lookup("FLUMORE_PARAMETER_TAG") {
            if !s.trim().is_empty() {
                cfg.parameter_tag = s.trim().to_string();
            }
        }

        cfg
    }

    /// Parse a JSON config document; missing keys take their defaults.
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
