//! Data models and structures
//!
//! Defines the relay's request payload, its response body, and the process
//! configuration resolved once at startup.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Canonical `{image, text}` pair every inbound body format reduces to.
///
/// After [`crate::relay::body::normalize_base64`] the image never carries a
/// `data:` URI prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPayload {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub text: String,
}

impl NormalizedPayload {
    pub fn new(image: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            text: text.into(),
        }
    }
}

/// Success body: `{"result": "<string>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub result: String,
}

/// Shape of the static prompt file.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub system_prompt: Option<String>,
}

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_IMAGE_DETAIL: &str = "low";
pub const DEFAULT_PROMPT_CONFIG_PATH: &str = "config/prompt.yaml";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Missing keys are reported per request, not at startup.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub image_detail: String,
    pub prompt_config_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub upstream_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = non_empty("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| crate::Error::Configuration(format!("Invalid BIND_ADDR: {}", e)))?;

        let upstream_timeout_secs = match non_empty("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                crate::Error::Configuration(format!("Invalid UPSTREAM_TIMEOUT_SECS: {}", e))
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let max_body_bytes = match non_empty("MAX_BODY_BYTES") {
            Some(raw) => raw.parse::<usize>().map_err(|e| {
                crate::Error::Configuration(format!("Invalid MAX_BODY_BYTES: {}", e))
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            image_detail: non_empty("OPENAI_IMAGE_DETAIL")
                .unwrap_or_else(|| DEFAULT_IMAGE_DETAIL.to_string()),
            prompt_config_path: non_empty("PROMPT_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_CONFIG_PATH)),
            bind_addr,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            max_body_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.openai_base_url, "https://api.openai.com");
        assert_eq!(config.image_detail, "low");
        assert_eq!(config.prompt_config_path, PathBuf::from("config/prompt.yaml"));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_BASE_URL", "http://localhost:8080/"),
            ("BIND_ADDR", "127.0.0.1:8000"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.openai_base_url, "http://localhost:8080");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_configuration_error() {
        let err = Config::from_lookup(lookup_from(&[("UPSTREAM_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Configuration(_)));
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_payload_deserializes_missing_fields_as_empty() {
        let payload: NormalizedPayload = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(payload, NormalizedPayload::new("", "hi"));
    }
}
