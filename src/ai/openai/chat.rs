use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, MessagePart};
use crate::ai::{mime, VisionChatService};
use crate::models::{
    Config, NormalizedPayload, DEFAULT_IMAGE_DETAIL, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    model: String,
    image_detail: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(
                api_key,
                Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
                client,
            ),
            model,
            image_detail: DEFAULT_IMAGE_DETAIL.to_string(),
        }
    }

    /// Build a client from process configuration, or `None` when no API key is set.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Option<Self> {
        let api_key = config.openai_api_key.clone()?;
        Some(Self {
            http: OpenAiHttpClient::new_with_client(api_key, config.upstream_timeout, client)
                .with_base_url(config.openai_base_url.clone()),
            model: config.openai_model.clone(),
            image_detail: config.image_detail.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, system_prompt: &str, payload: &NormalizedPayload) -> ChatCompletionRequest {
        let mime = mime::detect_base64_image_mime(&payload.image);
        let data_url = format!("data:{};base64,{}", mime, payload.image);

        let system_message = ChatMessage {
            role: "system".to_string(),
            content: Some(ChatMessageContent::Text(system_prompt.to_string())),
        };

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(ChatMessageContent::ImageContent(vec![
                MessagePart::text(payload.text.clone()),
                MessagePart::image_url(data_url, self.image_detail.clone()),
            ])),
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![system_message, user_message],
        }
    }
}

#[async_trait]
impl VisionChatService for OpenAiChatClient {
    async fn complete(&self, system_prompt: &str, payload: &NormalizedPayload) -> Result<String> {
        tracing::debug!(
            "Sending vision chat completion (model: {}, image: {} base64 chars, text: {} chars)",
            self.model,
            payload.image.len(),
            payload.text.chars().count()
        );

        let request = self.build_request(system_prompt, payload);
        let response = self.http.chat_completion(&request).await?;

        let text = response.first_text();
        if text.is_empty() {
            tracing::warn!("OpenAI returned no text content");
        }
        Ok(text)
    }
}
