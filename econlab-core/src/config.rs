//! Run configuration loaded from a TOML file.
//!
//! One file drives both fetchers and the dashboard:
//!
//! ```toml
//! banxico_token = "..."
//! inegi_token = "..."
//! start_date = "2020-01-01"
//! end_date = "2024-12-31"
//! data_dir = "data"          # optional
//!
//! [banxico]                  # optional
//! base_url = "https://www.banxico.org.mx/SieAPIRest/service/v1"
//! timeout_secs = 30
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Default root directory for persisted series.
pub const DEFAULT_DATA_DIR: &str = "data";

pub const BANXICO_BASE_URL: &str = "https://www.banxico.org.mx/SieAPIRest/service/v1";
pub const INEGI_BASE_URL: &str =
    "https://www.inegi.org.mx/app/api/indicadores/desarrolladores/jsonxml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("start_date {start} is after end_date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("missing {0} in config")]
    MissingToken(&'static str),
}

/// Endpoint settings for one upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl EndpointConfig {
    fn banxico() -> Self {
        Self {
            base_url: BANXICO_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }

    fn inegi() -> Self {
        Self {
            base_url: INEGI_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// On-disk shape of the configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    banxico_token: String,
    #[serde(default)]
    inegi_token: String,
    start_date: String,
    end_date: String,
    data_dir: Option<PathBuf>,
    banxico: Option<EndpointConfig>,
    inegi: Option<EndpointConfig>,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    banxico_token: String,
    inegi_token: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_dir: PathBuf,
    pub banxico: EndpointConfig,
    pub inegi: EndpointConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let start_date = parse_iso_date("start_date", &raw.start_date)?;
        let end_date = parse_iso_date("end_date", &raw.end_date)?;
        if start_date > end_date {
            return Err(ConfigError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Self {
            banxico_token: raw.banxico_token,
            inegi_token: raw.inegi_token,
            start_date,
            end_date,
            data_dir: raw
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            banxico: raw.banxico.unwrap_or_else(EndpointConfig::banxico),
            inegi: raw.inegi.unwrap_or_else(EndpointConfig::inegi),
        })
    }

    /// Banxico SIE token; required only when the Banxico fetcher runs.
    pub fn banxico_token(&self) -> Result<&str, ConfigError> {
        non_empty(&self.banxico_token, "banxico_token")
    }

    /// INEGI token; required only when the INEGI fetcher runs.
    pub fn inegi_token(&self) -> Result<&str, ConfigError> {
        non_empty(&self.inegi_token, "inegi_token")
    }
}

fn non_empty<'a>(token: &'a str, field: &'static str) -> Result<&'a str, ConfigError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::MissingToken(field));
    }
    Ok(token)
}

fn parse_iso_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
