use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jobguard_core::limits::MAX_ANALYSIS_CHARS;
use jobguard_engine::{ApiFlavor, RelaySettings, DEFAULT_SERVER_URL};
use jobguard_logging::{guard_info, LogDestination};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use super::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "./jobguard.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub api: ApiFlavor,
    pub max_chars: usize,
    pub connect_timeout_secs: u64,
    /// `None` waits for the server however long it takes.
    pub request_timeout_secs: Option<u64>,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api: ApiFlavor::default(),
            max_chars: MAX_ANALYSIS_CHARS,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            log_destination: LogDestination::default(),
            log_level: LogLevel::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        guard_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(server) = &cli.server {
            self.server_url = server.clone();
        }
        if cli.legacy_api {
            self.api = ApiFlavor::CheckJob;
        }
        if let Some(max_chars) = cli.max_chars {
            self.max_chars = max_chars;
        }
        if cli.verbose {
            self.log_level = LogLevel::Debug;
        }
    }

    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            base_url: self.server_url.clone(),
            flavor: self.api,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobguard.ron");
        fs::write(
            &path,
            r#"(server_url: "http://10.0.0.5:5000", api: CheckJob, request_timeout_secs: Some(180))"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server_url, "http://10.0.0.5:5000");
        assert_eq!(config.api, ApiFlavor::CheckJob);
        assert_eq!(config.max_chars, MAX_ANALYSIS_CHARS);

        let settings = config.relay_settings();
        assert_eq!(settings.endpoint(), "http://10.0.0.5:5000/check_job");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(180)));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobguard.ron");
        fs::write(&path, "(server_url: 42").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn printed_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobguard.ron");
        let config = AppConfig {
            log_destination: LogDestination::Both,
            log_level: LogLevel::Warn,
            ..AppConfig::default()
        };
        fs::write(&path, config.to_ron().unwrap()).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let cli = Cli::try_parse_from([
            "jobguard",
            "--server",
            "http://analysis.local:8080/",
            "--legacy-api",
            "--max-chars",
            "1500",
            "config",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        config.apply_cli(&cli);

        assert_eq!(config.max_chars, 1500);
        assert_eq!(
            config.relay_settings().endpoint(),
            "http://analysis.local:8080/check_job"
        );
    }
}
