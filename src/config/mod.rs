//! Run configuration: defaults, an optional TOML file, CLI overrides.
//!
//! Configuration is read from `~/.config/dowser/config.toml` when
//! present; missing fields fall back to defaults and CLI flags override
//! everything.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::app::{DowserError, Result};

pub const DEFAULT_BROWSER_URL: &str = "http://localhost:9222";
pub const DEFAULT_SITEMAP_URL: &str = "https://clutch.co/sitemap.xml";
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_RATE_LIMIT: usize = 4;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote debugging endpoint of the browser to attach to.
    pub browser_url: String,

    /// Sitemap index to discover profile links from.
    pub sitemap_url: String,

    /// Number of concurrent workers.
    pub concurrency: usize,

    /// Page loads admitted per second, shared across all workers.
    pub rate_limit: usize,

    /// Shuffle the seed list before queueing.
    pub randomize: bool,

    /// Output file path; `-` writes to stdout.
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_url: DEFAULT_BROWSER_URL.to_string(),
            sitemap_url: DEFAULT_SITEMAP_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            rate_limit: DEFAULT_RATE_LIMIT,
            randomize: false,
            output: "-".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| DowserError::Config(format!("{}: {}", path.display(), e)))
    }

    /// `~/.config/dowser/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dowser").join("config.toml"))
    }

    /// The admission window of the rate limiter.
    pub fn rate_period(&self) -> Duration {
        Duration::from_secs(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(DowserError::Config(
                "concurrency must be greater than zero".into(),
            ));
        }
        if self.rate_limit == 0 {
            return Err(DowserError::Config(
                "rate limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.browser_url, "http://localhost:9222");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.rate_limit, 4);
        assert!(!config.randomize);
        assert_eq!(config.output, "-");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "concurrency = 8\nrandomize = true").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.concurrency, 8);
        assert!(config.randomize);
        assert_eq!(config.rate_limit, 4);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "concurrency = ").unwrap();

        assert!(matches!(
            Config::load(Some(path.as_path())),
            Err(DowserError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_rate_limit() {
        let config = Config {
            rate_limit: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
