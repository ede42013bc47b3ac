//! Static system prompt loading.
//!
//! The prompt lives in a YAML file with a single required `system_prompt`
//! field. It is read on every request so an edited file takes effect
//! without a restart.

use crate::models::PromptConfig;
use crate::{Error, Result};
use std::path::Path;

/// Read and validate the system prompt at `path`.
///
/// Any failure is reported as a configuration error prefixed with
/// `Failed to load prompt config:`.
pub async fn load_system_prompt(path: &Path) -> Result<String> {
    read_system_prompt(path)
        .await
        .map_err(|e| Error::Configuration(format!("Failed to load prompt config: {}", e)))
}

async fn read_system_prompt(path: &Path) -> Result<String> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_system_prompt(&raw)
}

/// Extract `system_prompt` from YAML text.
pub fn parse_system_prompt(raw: &str) -> Result<String> {
    let config: Option<PromptConfig> = serde_yaml::from_str(raw)?;

    config
        .and_then(|c| c.system_prompt)
        .filter(|prompt| !prompt.trim().is_empty())
        .ok_or_else(|| {
            Error::Configuration("system_prompt field is missing in prompt.yaml".to_string())
        })
}
