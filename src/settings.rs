use std::path::Path;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "rec_schedule.toml";

const DEFAULT_FACILITY_URLS: &[&str] = &[
    "https://ottawa.ca/en/recreation-and-parks/facilities/place-listing/walter-baker-sports-centre",
    "https://ottawa.ca/en/recreation-and-parks/facilities/place-listing/minto-recreation-complex-barrhaven",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Facility pages to fetch, one schedule page each.
    pub facility_urls: Vec<String>,
    pub concurrency: usize,
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            facility_urls: DEFAULT_FACILITY_URLS.iter().map(|u| u.to_string()).collect(),
            concurrency: 4,
            max_retries: 3,
            backoff_ms: 2000,
            timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Defaults, then `path` (or `rec_schedule.toml` if present), then `REC_*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::build(Config::builder().add_source(file).add_source(env_source()))
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.facility_urls.is_empty(), "No facility URLs configured");
        ensure!(self.concurrency >= 1, "concurrency must be at least 1");
        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("REC")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("facility_urls")
}

/// Settings from an inline TOML document layered over the defaults.
pub fn from_toml(toml: &str) -> Result<Settings> {
    Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.facility_urls.len(), 2);
        assert!(s.facility_urls[0].ends_with("walter-baker-sports-centre"));
        assert_eq!(s.concurrency, 4);
    }

    #[test]
    fn toml_overrides_some_fields() {
        let s = from_toml(
            r#"
            facility_urls = ["https://example.test/a"]
            max_retries = 0
            "#,
        )
        .unwrap();
        assert_eq!(s.facility_urls, vec!["https://example.test/a"]);
        assert_eq!(s.max_retries, 0);
        assert_eq!(s.timeout_secs, 30);
    }

    #[test]
    fn empty_url_list_rejected() {
        assert!(from_toml("facility_urls = []").is_err());
        assert!(from_toml("concurrency = 0").is_err());
    }
}
