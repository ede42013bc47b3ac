use anyhow::Result;
use clap::Parser;
use speechless::models::Config;
use speechless::relay::RelayState;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "speechless")]
#[command(about = "Relay a screenshot and spoken text to a multimodal model")]
struct CliArgs {
    /// Address to listen on (overrides BIND_ADDR).
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Path to the system prompt YAML (overrides PROMPT_CONFIG_PATH).
    #[arg(long, value_name = "PATH")]
    prompt_config: Option<PathBuf>,
}

impl CliArgs {
    fn apply(self, mut config: Config) -> Config {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(path) = self.prompt_config {
            config.prompt_config_path = path;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "speechless=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting speechless relay");

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => args.apply(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every relay request will fail until it is configured");
    }
    info!(
        "Upstream model: {} (timeout {}s), prompt file: {}",
        config.openai_model,
        config.upstream_timeout.as_secs(),
        config.prompt_config_path.display()
    );

    // One connection pool for every upstream call.
    let state = RelayState::from_config(&config, reqwest::Client::new());

    if let Err(e) = speechless::server::serve(config.bind_addr, state).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;
    use speechless::models::Config;

    #[test]
    fn test_cli_overrides_config() {
        let args = CliArgs::try_parse_from([
            "speechless",
            "--bind",
            "127.0.0.1:9000",
            "--prompt-config",
            "/etc/speechless/prompt.yaml",
        ])
        .unwrap();
        let config = args.apply(Config::from_lookup(|_| None).unwrap());

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(
            config.prompt_config_path.to_string_lossy(),
            "/etc/speechless/prompt.yaml"
        );
    }

    #[test]
    fn test_cli_rejects_invalid_bind() {
        let err = CliArgs::try_parse_from(["speechless", "--bind", "nowhere"]).unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }
}
