//! Dashboard configuration.
//!
//! The dashboard takes no CLI flags. It reads the environment at startup:
//! - `ECONLAB_CONFIG`: path to the shared TOML config (default `config/config.toml`)
//! - `ECONLAB_DATA_DIR`: overrides the config file's `data_dir`
//! - `ECONLAB_DASHBOARD_PORT`: listen port (default 8501)
//!
//! Only `data_dir` is taken from the config file; the dashboard holds no
//! API credentials. A missing config file falls back to `data`.

use econlab_core::config::{DEFAULT_CONFIG_PATH, DEFAULT_DATA_DIR};
use serde::Deserialize;
use std::path::PathBuf;

pub const ENV_CONFIG: &str = "ECONLAB_CONFIG";
pub const ENV_DATA_DIR: &str = "ECONLAB_DATA_DIR";
pub const ENV_PORT: &str = "ECONLAB_DASHBOARD_PORT";

fn default_port() -> u16 {
    8501
}

/// The subset of the shared config file the dashboard reads.
#[derive(Debug, Default, Deserialize)]
struct StorageSection {
    data_dir: Option<PathBuf>,
}

/// Dashboard server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            port: default_port(),
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config_path =
            PathBuf::from(lookup(ENV_CONFIG).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()));

        let storage = match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<StorageSection>(&content) {
                Ok(section) => section,
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), error = %e, "ignoring unparsable config");
                    StorageSection::default()
                }
            },
            Err(_) => {
                tracing::debug!(path = %config_path.display(), "no config file, using defaults");
                StorageSection::default()
            }
        };

        let data_dir = lookup(ENV_DATA_DIR)
            .map(PathBuf::from)
            .or(storage.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let port = match lookup(ENV_PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid {ENV_PORT}, using default");
                default_port()
            }),
            None => default_port(),
        };

        Self { data_dir, port }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_config_file() {
        let cfg = DashboardConfig::from_lookup(lookup(&[(ENV_CONFIG, "/nonexistent/econlab.toml")]));
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn data_dir_comes_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "banxico_token = \"x\"\nstart_date = \"2020-01-01\"\nend_date = \"2021-01-01\"\ndata_dir = \"/srv/econ\"\n",
        )
        .unwrap();

        let cfg = DashboardConfig::from_lookup(lookup(&[(ENV_CONFIG, path.to_str().unwrap())]));
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/econ"));
    }

    #[test]
    fn env_overrides_win() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            (ENV_CONFIG, "/nonexistent/econlab.toml"),
            (ENV_DATA_DIR, "/tmp/econ"),
            (ENV_PORT, "9000"),
        ]));
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/econ"));
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn bad_port_falls_back() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            (ENV_CONFIG, "/nonexistent/econlab.toml"),
            (ENV_PORT, "eighty"),
        ]));
        assert_eq!(cfg.port, 8501);
    }
}
