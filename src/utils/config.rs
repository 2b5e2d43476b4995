//! Client configuration.
//!
//! Each setting resolves as: CLI flag > environment variable > config file > default.
//! The config file is YAML (`.yaml` / `.yml`) or JSON (anything else).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dlp::client::{DEFAULT_ENDPOINT, parse_endpoint};

pub const ENV_ENDPOINT: &str = "DLP_ENDPOINT";
pub const ENV_ACCESS_TOKEN: &str = "DLP_ACCESS_TOKEN";
pub const ENV_LANGUAGE_CODE: &str = "DLP_LANGUAGE_CODE";
pub const ENV_CONFIG: &str = "DLP_CONFIG";

/// Shape of the optional config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub language_code: Option<String>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub language_code: Option<String>,
}

/// Fully resolved settings used to build the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub access_token: Option<String>,
    pub language_code: Option<String>,
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let lower = path.to_string_lossy().to_ascii_lowercase();

    if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        serde_yaml::from_str(&raw).context("failed to parse YAML config file")
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON config file")
    }
}

/// Resolve settings from CLI overrides, the environment (`env` lookup) and the config file.
pub fn resolve(cli: Overrides, env: impl Fn(&str) -> Option<String>) -> Result<Settings> {
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let file = match cli.config.or_else(|| env(ENV_CONFIG).map(PathBuf::from)) {
        Some(path) => load_file(&path)?,
        None => FileConfig::default(),
    };

    let endpoint = cli
        .endpoint
        .or_else(|| env(ENV_ENDPOINT))
        .or(file.endpoint)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    parse_endpoint(&endpoint)?;

    Ok(Settings {
        endpoint,
        access_token: cli
            .access_token
            .or_else(|| env(ENV_ACCESS_TOKEN))
            .or(file.access_token),
        language_code: cli
            .language_code
            .or_else(|| env(ENV_LANGUAGE_CODE))
            .or(file.language_code),
    })
}

/// `resolve` against the real process environment.
pub fn resolve_from_env(cli: Overrides) -> Result<Settings> {
    resolve(cli, |k| std::env::var(k).ok())
}
