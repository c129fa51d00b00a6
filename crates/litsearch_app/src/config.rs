use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use litsearch_engine::ApiSettings;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::logging::LogDestination;

const DEFAULT_CONFIG_FILENAME: &str = "litsearch.ron";
const API_URL_ENV: &str = "LITSEARCH_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            api_base_url: api.base_url,
            poll_interval_ms: litsearch_core::DEFAULT_POLL_INTERVAL.as_millis() as u64,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the config file, then `LITSEARCH_API_URL`, then CLI flags.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if implicit.is_file() {
                    Self::from_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url;
        }
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(ms) = cli.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(destination) = cli.log_destination {
            self.log_destination = destination;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_backend_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.poll_interval(), Duration::from_millis(2000));
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("litsearch.ron");
        fs::write(
            &path,
            r#"(api_base_url: "http://papers.internal:9000", log_destination: both)"#,
        )
        .unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.api_base_url, "http://papers.internal:9000");
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("absent.ron")),
            ..Cli::default()
        };
        let err = ClientConfig::resolve(&cli).unwrap_err();
        assert!(err.to_string().contains("absent.ron"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.ron");
        fs::write(&path, "(poll_interval_ms: \"soon\")").unwrap();
        assert!(ClientConfig::from_file(&path).is_err());
    }

    #[test]
    fn env_then_cli_override_in_order() {
        let mut config = ClientConfig::default();
        config.apply_env(|key| (key == API_URL_ENV).then(|| "http://env:1".to_string()));
        assert_eq!(config.api_base_url, "http://env:1");

        config.apply_cli(&Cli {
            api_url: Some("http://cli:2".into()),
            poll_interval_ms: Some(500),
            log_level: Some("debug".into()),
            ..Cli::default()
        });
        assert_eq!(config.api_base_url, "http://cli:2");
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let mut config = ClientConfig::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn api_settings_carry_timeouts() {
        let config = ClientConfig {
            connect_timeout_secs: 3,
            request_timeout_secs: 90,
            ..ClientConfig::default()
        };
        let settings = config.api_settings();
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.request_timeout, Duration::from_secs(90));
    }
}
