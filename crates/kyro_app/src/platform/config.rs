//! Layered settings: built-in defaults, then `kyro.ron`, then command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use engine_logging::{LogDestination, DEFAULT_LOG_FILE};
use kyro_engine::{ApiSettings, DEFAULT_API_URL};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "kyro.ron";

#[derive(Debug, Parser)]
#[command(name = "kyro", about = "Monitor a batch of automated job applications")]
pub struct Cli {
    /// RON config file (default: ./kyro.ron when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "KYRO_API_URL")]
    pub api_url: Option<String>,

    /// Status poll interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Log destination: file, terminal or both
    #[arg(long)]
    pub log: Option<LogDestination>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Resume to preselect in the form
    #[arg(long, value_name = "PATH")]
    pub resume: Option<PathBuf>,

    /// File with one target URL per line
    #[arg(long, value_name = "PATH")]
    pub urls_file: Option<PathBuf>,

    /// Target URL (repeatable)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// Submit the form right away
    #[arg(long)]
    pub submit: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Contents of the RON config file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log: String,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval_ms: millis(api.poll_interval),
            connect_timeout_ms: millis(api.connect_timeout),
            request_timeout_ms: millis(api.request_timeout),
            log: "file".to_string(),
            log_level: "info".to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl FileConfig {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Reads `explicit`, or the default file if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&path, &content)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    pub resume: Option<PathBuf>,
    pub urls: String,
    pub auto_submit: bool,
}

impl Settings {
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        let file = FileConfig::load(cli.config.as_deref())?;
        let file_urls = match cli.urls_file.as_deref() {
            Some(path) => fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?,
            None => String::new(),
        };
        Self::resolve(cli, file, &file_urls)
    }

    /// Applies command-line overrides on top of the file config.
    pub fn resolve(cli: Cli, file: FileConfig, file_urls: &str) -> Result<Self, ConfigError> {
        let log_destination = match cli.log {
            Some(destination) => destination,
            None => file.log.parse().map_err(|message| ConfigError::Invalid {
                field: "log",
                message,
            })?,
        };
        let log_level = cli
            .log_level
            .as_deref()
            .unwrap_or(&file.log_level)
            .parse::<LevelFilter>()
            .map_err(|err| ConfigError::Invalid {
                field: "log_level",
                message: err.to_string(),
            })?;

        let poll_interval_ms = cli.poll_interval_ms.unwrap_or(file.poll_interval_ms);
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                message: "must be greater than zero".to_string(),
            });
        }

        let mut urls = file_urls.trim_end().to_string();
        for url in &cli.urls {
            if !urls.is_empty() {
                urls.push('\n');
            }
            urls.push_str(url);
        }

        Ok(Self {
            api: ApiSettings {
                base_url: cli.api_url.unwrap_or(file.api_url),
                connect_timeout: Duration::from_millis(file.connect_timeout_ms),
                request_timeout: Duration::from_millis(file.request_timeout_ms),
                poll_interval: Duration::from_millis(poll_interval_ms),
            },
            log_destination,
            log_level,
            log_file: file.log_file,
            resume: cli.resume,
            urls,
            auto_submit: cli.submit,
        })
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["kyro"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_poll_every_two_seconds() {
        let settings = Settings::resolve(cli(&[]), FileConfig::default(), "").unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.api.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.log_destination, LogDestination::File);
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert!(!settings.auto_submit);
    }

    #[test]
    fn partial_ron_file_keeps_other_defaults() {
        let file = FileConfig::parse(
            Path::new("kyro.ron"),
            r#"(api_url: "http://backend:9000", poll_interval_ms: 500, log: "both")"#,
        )
        .unwrap();
        assert_eq!(file.request_timeout_ms, 30_000);

        let settings = Settings::resolve(cli(&[]), file, "").unwrap();
        assert_eq!(settings.api.base_url, "http://backend:9000");
        assert_eq!(settings.api.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.log_destination, LogDestination::Both);
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig {
            api_url: "http://from-file".to_string(),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(
            cli(&[
                "--api-url",
                "http://from-flag",
                "--poll-interval-ms",
                "250",
                "--log",
                "terminal",
                "--log-level",
                "debug",
                "--submit",
            ]),
            file,
            "",
        )
        .unwrap();
        assert_eq!(settings.api.base_url, "http://from-flag");
        assert_eq!(settings.api.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.log_destination, LogDestination::Terminal);
        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert!(settings.auto_submit);
    }

    #[test]
    fn urls_from_file_and_flags_are_joined() {
        let settings = Settings::resolve(
            cli(&["--url", "https://c.com"]),
            FileConfig::default(),
            "https://a.com\nhttps://b.com\n",
        )
        .unwrap();
        assert_eq!(settings.urls, "https://a.com\nhttps://b.com\nhttps://c.com");
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let err = Settings::resolve(
            cli(&["--poll-interval-ms", "0"]),
            FileConfig::default(),
            "",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "poll_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn bad_log_destination_in_file_is_reported() {
        let file = FileConfig {
            log: "syslog".to_string(),
            ..FileConfig::default()
        };
        let err = Settings::resolve(cli(&[]), file, "").unwrap_err();
        assert!(err.to_string().starts_with("invalid log:"));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(request_timeout_ms: 1500)"#).unwrap();

        let config = FileConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.request_timeout_ms, 1500);
        assert_eq!(config.api_url, "http://localhost:8000");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = FileConfig::load(Some(&dir.path().join("absent.ron"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let err = FileConfig::parse(Path::new("kyro.ron"), "(api_url: 42").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
