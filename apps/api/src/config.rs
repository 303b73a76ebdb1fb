use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::tailoring::DEFAULT_TIMEOUT_SECS;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the single generated file per format.
    pub output_dir: PathBuf,
    pub docx_template_path: Option<PathBuf>,
    pub tailor_webhook_url: Option<String>,
    pub match_webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            output_dir: var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            docx_template_path: var("DOCX_TEMPLATE_PATH").map(PathBuf::from),
            tailor_webhook_url: var("TAILOR_WEBHOOK_URL"),
            match_webhook_url: var("MATCH_WEBHOOK_URL"),
            webhook_timeout_secs: match var("WEBHOOK_TIMEOUT_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .with_context(|| format!("WEBHOOK_TIMEOUT_SECS must be a number of seconds, got '{raw}'"))?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.docx_template_path.is_none());
        assert!(config.tailor_webhook_url.is_none());
        assert_eq!(config.webhook_timeout_secs, 30);
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let config = config_from(&[
            ("PORT", "8081"),
            ("OUTPUT_DIR", "/tmp/out"),
            ("TAILOR_WEBHOOK_URL", "https://hook.example.com/t"),
            ("MATCH_WEBHOOK_URL", "  "),
            ("WEBHOOK_TIMEOUT_SECS", "10"),
        ])
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(
            config.tailor_webhook_url.as_deref(),
            Some("https://hook.example.com/t")
        );
        assert!(config.match_webhook_url.is_none());
        assert_eq!(config.webhook_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_port_fails() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("WEBHOOK_TIMEOUT_SECS", "soon")]).is_err());
    }
}
