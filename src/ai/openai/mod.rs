pub mod chat;
pub mod client;
pub mod types;

pub use chat::OpenAiChatClient;

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::matchers::{method, path};
    use wiremock::MockBuilder;

    pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

    pub fn post(endpoint: &str) -> MockBuilder {
        wiremock::Mock::given(method("POST")).and(path(endpoint))
    }

    pub fn chat_response(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }
}
