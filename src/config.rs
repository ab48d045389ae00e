use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories_next::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin the API itself is reachable at, used for raw links.
    pub base_url: String,
    /// Origin of the web frontend, used for share links.
    pub frontend_url: String,
    pub port: u16,
    pub database: Database,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://localhost:4000".to_owned(),
            frontend_url: "http://localhost:5173".to_owned(),
            port: 4000,
            database: Database::default(),
            limits: Limits::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
}

impl Default for Database {
    fn default() -> Self {
        Database {
            url: "sqlite://fadebin.db?mode=rwc".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Cap on the request body in bytes, enforced before parsing.
    pub max_body_size: usize,
    /// Cap on paste content in characters.
    pub max_content_length: usize,
    /// Requests allowed per client within one rate limit window.
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_body_size: 200 * 1024,
            max_content_length: 20_000,
            rate_limit_requests: 30,
            rate_limit_window_secs: 60,
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Otherwise `config.toml` in the working
    /// directory wins, then the platform config directory, then the built-in
    /// defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let path = match path {
            Some(path) => Some(path.to_owned()),
            None => [Some(PathBuf::from("config.toml")), default_config_path()]
                .into_iter()
                .flatten()
                .find(|p| p.is_file()),
        };

        let Some(path) = path else {
            debug!("no config file found, using defaults");
            return Ok(Config::default());
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }
}

fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "fadebin")?;
    Some(dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_limits() {
        let config = Config::default();
        assert_eq!(config.port, 4000);
        assert_eq!(config.limits.max_content_length, 20_000);
        assert_eq!(config.limits.rate_limit_requests, 30);
        assert_eq!(config.limits.rate_limit_window_secs, 60);
    }

    #[test]
    fn partial_config_keeps_defaults_elsewhere() {
        let config: Config = toml::from_str(
            r#"
            port = 8080

            [limits]
            max_content_length = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.limits.max_content_length, 500);
        assert_eq!(config.limits.max_body_size, 200 * 1024);
        assert_eq!(config.base_url, "http://localhost:4000");
    }

    #[test]
    fn full_config_round_trips() {
        let config: Config = toml::from_str(
            r#"
            base_url = "https://paste.example.org"
            frontend_url = "https://example.org"
            port = 9000

            [database]
            url = "sqlite:///var/lib/fadebin/pastes.db?mode=rwc"

            [limits]
            max_body_size = 1024
            max_content_length = 100
            rate_limit_requests = 5
            rate_limit_window_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://paste.example.org");
        assert_eq!(config.database.url, "sqlite:///var/lib/fadebin/pastes.db?mode=rwc");
        assert_eq!(config.limits.rate_limit_requests, 5);
    }
}
