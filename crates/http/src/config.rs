// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration (spec §6 "Configuration"): a TOML file at
//! `--config`/`MEGARG_CONFIG` (default `./config.toml`), every field
//! overridable by a `MEGARG_*` environment variable, following the
//! teacher's `oj-daemon::env` convention of centralizing environment
//! lookups in one module.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Every field as read from the TOML file, all optional so a missing file
/// is not itself an error — only a missing *required* field is.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    api_host: Option<String>,
    api_port: Option<u16>,
    outputs_root: Option<PathBuf>,
    assets_root: Option<PathBuf>,
    script_path: Option<PathBuf>,
    max_concurrent_jobs: Option<usize>,
    max_concurrent_downloads: Option<usize>,
    stop_grace_period_seconds: Option<u64>,
    shutdown_drain_seconds: Option<u64>,
    default_threads: Option<u32>,
}

/// Resolved, fully-defaulted service configuration (spec §6).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub outputs_root: PathBuf,
    /// Root directory under which database-asset bundles are installed.
    /// Not named in spec.md's configuration table; added because
    /// component G needs somewhere to put them.
    pub assets_root: PathBuf,
    pub script_path: PathBuf,
    pub max_concurrent_jobs: usize,
    pub max_concurrent_downloads: usize,
    pub stop_grace_period: Duration,
    pub shutdown_drain: Duration,
    pub default_threads: u32,
}

impl Config {
    /// Load from `path` (if it exists), then apply `MEGARG_*` environment
    /// overrides, then validate. Missing `outputs_root`/`script_path` after
    /// both steps is a startup error — never silently defaulted.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut raw = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<RawConfig>(&contents).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RawConfig::default(),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        apply_env_overrides(&mut raw);
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let outputs_root = raw
            .outputs_root
            .ok_or(ConfigError::MissingField("outputs_root"))?;
        let script_path = raw
            .script_path
            .ok_or(ConfigError::MissingField("script_path"))?;
        let assets_root = raw
            .assets_root
            .unwrap_or_else(|| outputs_root.join("..").join("assets"));

        let max_concurrent_jobs = raw.max_concurrent_jobs.unwrap_or(1);
        if max_concurrent_jobs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_jobs",
                message: "must be >= 1".to_string(),
            });
        }
        let max_concurrent_downloads = raw.max_concurrent_downloads.unwrap_or(2);
        if max_concurrent_downloads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_downloads",
                message: "must be >= 1".to_string(),
            });
        }

        Ok(Self {
            api_host: raw.api_host.unwrap_or_else(|| "127.0.0.1".to_string()),
            api_port: raw.api_port.unwrap_or(8080),
            outputs_root,
            assets_root,
            script_path,
            max_concurrent_jobs,
            max_concurrent_downloads,
            stop_grace_period: Duration::from_secs(raw.stop_grace_period_seconds.unwrap_or(10)),
            shutdown_drain: Duration::from_secs(raw.shutdown_drain_seconds.unwrap_or(30)),
            default_threads: raw.default_threads.unwrap_or(8),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn apply_env_overrides(raw: &mut RawConfig) {
    if let Ok(v) = std::env::var("MEGARG_API_HOST") {
        raw.api_host = Some(v);
    }
    if let Some(v) = env_parsed("MEGARG_API_PORT") {
        raw.api_port = Some(v);
    }
    if let Ok(v) = std::env::var("MEGARG_OUTPUTS_ROOT") {
        raw.outputs_root = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("MEGARG_ASSETS_ROOT") {
        raw.assets_root = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("MEGARG_SCRIPT_PATH") {
        raw.script_path = Some(PathBuf::from(v));
    }
    if let Some(v) = env_parsed("MEGARG_MAX_CONCURRENT_JOBS") {
        raw.max_concurrent_jobs = Some(v);
    }
    if let Some(v) = env_parsed("MEGARG_MAX_CONCURRENT_DOWNLOADS") {
        raw.max_concurrent_downloads = Some(v);
    }
    if let Some(v) = env_parsed("MEGARG_STOP_GRACE_PERIOD_SECONDS") {
        raw.stop_grace_period_seconds = Some(v);
    }
    if let Some(v) = env_parsed("MEGARG_SHUTDOWN_DRAIN_SECONDS") {
        raw.shutdown_drain_seconds = Some(v);
    }
    if let Some(v) = env_parsed("MEGARG_DEFAULT_THREADS") {
        raw.default_threads = Some(v);
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
