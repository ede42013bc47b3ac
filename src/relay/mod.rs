//! The context relay: one inbound request in, one upstream completion out.

pub mod body;

use crate::ai::{OpenAiChatClient, VisionChatService};
use crate::models::{Config, RelayResponse};
use crate::{prompts, Error, Result};
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use body::BodyKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

pub const MISSING_API_KEY_MESSAGE: &str = "OPENAI_API_KEY is not configured";

/// Read-only state shared by every relay request.
#[derive(Clone)]
pub struct RelayState {
    vision: Option<Arc<dyn VisionChatService>>,
    prompt_path: Arc<PathBuf>,
    max_body_bytes: usize,
}

impl RelayState {
    /// `vision` is `None` when no upstream credential is configured.
    pub fn new(
        vision: Option<Arc<dyn VisionChatService>>,
        prompt_path: PathBuf,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            vision,
            prompt_path: Arc::new(prompt_path),
            max_body_bytes,
        }
    }

    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Self {
        let vision = OpenAiChatClient::from_config(config, http_client)
            .map(|client| Arc::new(client) as Arc<dyn VisionChatService>);

        Self::new(
            vision,
            config.prompt_config_path.clone(),
            config.max_body_bytes,
        )
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

/// Run one request through the relay pipeline.
///
/// Steps run in a fixed order and stop at the first failure: credential
/// check, prompt load, body decoding, validation, upstream call.
pub async fn handle(state: &RelayState, request: Request) -> Result<String> {
    let vision = state
        .vision
        .as_ref()
        .ok_or_else(|| Error::Configuration(MISSING_API_KEY_MESSAGE.to_string()))?;

    let system_prompt = prompts::load_system_prompt(&state.prompt_path).await?;

    let kind = BodyKind::from_headers(request.headers());
    tracing::debug!("Decoding {:?} request body", kind);
    let payload = body::extract_payload(kind, request, state.max_body_bytes).await?;
    let payload = body::validate_and_normalize(payload)?;

    vision.complete(&system_prompt, &payload).await
}

/// `POST /api/process-context`
pub async fn process_context(State(state): State<RelayState>, request: Request) -> Response {
    let span = tracing::info_span!("process_context", request_id = %Uuid::new_v4());

    async move {
        match handle(&state, request).await {
            Ok(result) => {
                info!("Relay succeeded ({} chars)", result.chars().count());
                Json(RelayResponse { result }).into_response()
            }
            Err(e) => {
                if e.is_server_error() {
                    error!("process-context error: {}", e);
                } else {
                    warn!("Rejected request: {}", e);
                }
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}
