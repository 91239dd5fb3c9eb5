use crate::engine::QuantityInputPolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    #[default]
    Http,
    Fixture,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceConfig {
    #[serde(default)]
    pub provider: Provider,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Simulated latency for the fixture provider.
    #[serde(default)]
    pub fixture_latency_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_request_timeout() -> u64 {
    10_000
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Http,
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
            data_dir: default_data_dir(),
            fixture_latency_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReviewConfig {
    #[serde(default)]
    pub quantity_input: QuantityInputPolicy,
    #[serde(default = "default_recent_spoilage_rows")]
    pub recent_spoilage_rows: usize,
}

fn default_recent_spoilage_rows() -> usize {
    crate::analytics::spoilage::DEFAULT_RECENT_ROWS
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            quantity_input: QuantityInputPolicy::default(),
            recent_spoilage_rows: default_recent_spoilage_rows(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("grocer-review.log")
}
fn default_log_filter() -> String {
    "grocer_review=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for (key, value) in parse_env_lines(content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }

    /// Apply `GROCER_API_BASE` and `GROCER_DATA_DIR` overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("GROCER_API_BASE").ok(),
            std::env::var("GROCER_DATA_DIR").ok(),
        );
    }

    fn apply_overrides(&mut self, base_url: Option<String>, data_dir: Option<String>) {
        if let Some(base) = base_url.map(|b| sanitize(&b)).filter(|b| !b.is_empty()) {
            self.data_source.base_url = base;
        }
        if let Some(dir) = data_dir.map(|d| sanitize(&d)).filter(|d| !d.is_empty()) {
            self.data_source.data_dir = PathBuf::from(dir);
        }
    }
}

fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

/// Strip carriage returns, BOM, and other invisible chars from a value.
fn sanitize(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert_eq!(config.data_source.provider, Provider::Fixture);
        assert_eq!(config.review.quantity_input, QuantityInputPolicy::Reject);
        assert_eq!(config.review.recent_spoilage_rows, 10);
        assert_eq!(config.logging.filter, "grocer_review=info");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.data_source.provider, Provider::Http);
        assert_eq!(config.data_source.base_url, "http://localhost:8000");
        assert_eq!(config.data_source.request_timeout_ms, 10_000);
        assert_eq!(config.logging.file, PathBuf::from("grocer-review.log"));
    }

    #[test]
    fn test_coerce_policy_from_toml() {
        let config = Config::parse(
            r#"
            [review]
            quantity_input = "coerce-to-zero"
            "#,
        )
        .unwrap();
        assert_eq!(config.review.quantity_input, QuantityInputPolicy::CoerceToZero);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(Config::parse("[data_source]\nprovider = \"gemini\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some(" http://api.internal:9000\r".to_string()), Some(String::new()));
        assert_eq!(config.data_source.base_url, "http://api.internal:9000");
        assert_eq!(config.data_source.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_parse_env_lines() {
        let parsed = parse_env_lines("# comment\nGROCER_API_BASE=\"http://x\"\n\nBAD LINE\nGROCER_DATA_DIR = ./fixtures\r\n");
        assert_eq!(
            parsed,
            vec![
                ("GROCER_API_BASE".to_string(), "http://x".to_string()),
                ("GROCER_DATA_DIR".to_string(), "./fixtures".to_string()),
            ]
        );
    }
}
