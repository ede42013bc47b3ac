use super::VisionChatService;
use crate::models::NormalizedPayload;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One recorded call to [`MockVisionChatClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub payload: NormalizedPayload,
}

pub struct MockVisionChatClient {
    responses: Arc<Mutex<Vec<String>>>,
    error: Option<String>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockVisionChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Make every call fail with an [`Error::AiProvider`] carrying `message`.
    pub fn with_error(mut self, message: String) -> Self {
        self.error = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockVisionChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionChatService for MockVisionChatClient {
    async fn complete(&self, system_prompt: &str, payload: &NormalizedPayload) -> Result<String> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                system_prompt: system_prompt.to_string(),
                payload: payload.clone(),
            });
            calls.len()
        };

        if let Some(message) = &self.error {
            return Err(Error::AiProvider(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            Ok(format!("Mock reply to: {}", payload.text))
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
