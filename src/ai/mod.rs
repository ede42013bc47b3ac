//! Upstream multimodal model integration
//!
//! The relay talks to the model through [`VisionChatService`] so handlers can
//! be exercised against [`MockVisionChatClient`] without network access.

pub mod mime;
pub mod mock;
pub mod openai;

pub use mock::MockVisionChatClient;
pub use openai::OpenAiChatClient;

use crate::models::NormalizedPayload;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VisionChatService: Send + Sync {
    /// Send one chat completion built from `system_prompt` and `payload` and
    /// return the generated text. A reply without text content yields `""`.
    async fn complete(&self, system_prompt: &str, payload: &NormalizedPayload) -> Result<String>;
}
