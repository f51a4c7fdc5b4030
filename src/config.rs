// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use thanos_core::{Result, ThanosError};
use thanos_rpc::DEFAULT_CHAIN_ID_CACHE_SIZE;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(s)
    }
}

fn deserialize_rpc_url<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    if let Some(url) = &opt {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(serde::de::Error::custom(format!(
                "Invalid RPC URL: '{url}'. Must start with https:// or http://"
            )));
        }
    }
    Ok(opt.map(|url| url.trim_end_matches('/').to_string()))
}

fn deserialize_positive<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<u64>::deserialize(deserializer)?;
    if opt == Some(0) {
        return Err(serde::de::Error::custom("value must be greater than 0"));
    }
    Ok(opt)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_rpc_url")]
    pub rpc_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_positive")]
    pub chain_id_cache_size: Option<u64>,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default, deserialize_with = "deserialize_positive")]
    pub timeout: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        const MAX_CONFIG_SIZE: u64 = 64 * 1024;
        let metadata = std::fs::metadata(path).map_err(|e| {
            ThanosError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        if metadata.len() > MAX_CONFIG_SIZE {
            return Err(ThanosError::Config("Config file too large".into()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ThanosError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ThanosError::Config(e.to_string()))
    }

    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("thanos").join("config.toml"))
            .ok_or(ThanosError::HomeNotFound)
    }

    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_url.as_deref()
    }

    pub fn chain_id_cache_size(&self) -> usize {
        self.chain_id_cache_size
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_CHAIN_ID_CACHE_SIZE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
rpc_url = "https://mainnet.api.tez.ie/"
chain_id_cache_size = 16
log_level = "debug"
log_json = true
timeout = 10
"#;
        let config = Config::parse(content).unwrap();
        assert_eq!(config.rpc_url(), Some("https://mainnet.api.tez.ie"));
        assert_eq!(config.chain_id_cache_size(), 16);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.log_json);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.rpc_url().is_none());
        assert_eq!(config.chain_id_cache_size(), DEFAULT_CHAIN_ID_CACHE_SIZE);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(!config.log_json);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse("log_level = \"trace\"\n").unwrap();
        assert_eq!(config.log_level, LogLevel::Trace);
        assert!(config.rpc_url.is_none());
    }

    #[test]
    fn test_invalid_rpc_url() {
        let result = Config::parse("rpc_url = \"wss://node.example\"\n");
        assert!(matches!(result, Err(ThanosError::Config(_))));
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(Config::parse("timeout = 0\n").is_err());
        assert!(Config::parse("chain_id_cache_size = 0\n").is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::parse("vault_path = \"~/.thanos\"\n").is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(Config::parse("log_level = \"verbose\"\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rpc_url = \"http://localhost:8732\"").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.rpc_url(), Some("http://localhost:8732"));
    }

    #[test]
    fn test_from_file_too_large() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let padding = "#".repeat(70 * 1024);
        writeln!(file, "{padding}").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid config: Config file too large");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ThanosError::Config(_))));
    }
}
