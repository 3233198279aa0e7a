use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Internal to the narrative module: every variant triggers the local
/// fallback and none of them surface to the caller of the report run.
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Blocking client for an OpenAI-compatible chat-completion endpoint.
pub struct CompletionClient {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl CompletionClient {
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            endpoint,
        }
    }

    pub fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, NarrativeError> {
        let payload = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.2,
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = res.json()?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| NarrativeError::MalformedResponse("empty choices list".to_string()))?;
        Ok(choice.message.content)
    }
}
