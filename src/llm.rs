//! Text-completion collaborator.
//!
//! Every AI section of a briefing is one prompt in, one completion out.  The
//! [`Completion`] trait hides whether that goes to a local Ollama server or
//! a hosted chat-completions endpoint.  Failures never abort a report:
//! [`complete_or_error`] turns them into a line of text that takes the
//! completion's place.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Backend, LlmConfig};
use crate::error::LlmError;

/// One prompt and the knobs that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A service that completes a prompt.
pub trait Completion: Send {
    /// Short label used in logs and the UI status bar.
    fn name(&self) -> &str;

    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Run `request`, substituting `"Error: …"` text on failure.
pub fn complete_or_error(llm: &dyn Completion, request: &CompletionRequest) -> String {
    match llm.complete(request) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("{} completion failed: {e}", llm.name());
            format!("Error: {e}")
        }
    }
}

/// Build the client selected by `config.backend`.
pub fn from_config(config: &LlmConfig) -> Box<dyn Completion> {
    match config.backend {
        Backend::Ollama => Box::new(OllamaClient::new(&config.ollama_url, &config.ollama_model)),
        Backend::Hosted => Box::new(HostedClient::new(
            &config.hosted_url,
            &config.hosted_model,
            config.hosted_token.clone(),
        )),
    }
}

fn classify(
    backend: &'static str,
    endpoint: &str,
    timeout: Duration,
    e: reqwest::Error,
) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout {
            backend,
            secs: timeout.as_secs(),
        }
    } else if e.is_connect() {
        LlmError::Unreachable {
            backend,
            endpoint: endpoint.to_string(),
        }
    } else {
        LlmError::Http(e)
    }
}

// ---------------------------------------------------------------------------
// Ollama
// ---------------------------------------------------------------------------

/// Talks to a local Ollama server through its `/api/generate` endpoint.
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    const BACKEND: &'static str = "Ollama";

    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.to_string(),
        }
    }
}

impl Completion for OllamaClient {
    fn name(&self) -> &str {
        Self::BACKEND
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        debug!("Ollama {} <- {} chars", self.model, request.prompt.len());
        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .map_err(|e| classify(Self::BACKEND, &self.endpoint, request.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                backend: Self::BACKEND,
                status: status.as_u16(),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| classify(Self::BACKEND, &self.endpoint, request.timeout, e))?;
        Ok(parsed.response)
    }
}

// ---------------------------------------------------------------------------
// Hosted chat completions
// ---------------------------------------------------------------------------

/// Talks to an OpenAI-compatible `chat/completions` endpoint with a bearer
/// token.
pub struct HostedClient {
    client: Client,
    endpoint: String,
    model: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl HostedClient {
    const BACKEND: &'static str = "Hosted LLM";

    pub fn new(endpoint: &str, model: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            token,
        }
    }
}

impl Completion for HostedClient {
    fn name(&self) -> &str {
        Self::BACKEND
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let token = self
            .token
            .as_deref()
            .ok_or(LlmError::MissingCredential("HF_TOKEN"))?;

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .map_err(|e| classify(Self::BACKEND, &self.endpoint, request.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                backend: Self::BACKEND,
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| classify(Self::BACKEND, &self.endpoint, request.timeout, e))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Malformed {
                backend: Self::BACKEND,
                detail: "no choices in response".to_string(),
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replies with a fixed answer (or error) and records every prompt.
    pub struct FakeCompletion {
        pub reply: Result<String, &'static str>,
        pub prompts: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeCompletion {
        pub fn answering(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(credential: &'static str) -> Self {
            Self {
                reply: Err(credential),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl Completion for FakeCompletion {
        fn name(&self) -> &str {
            "fake"
        }

        fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .map_err(LlmError::MissingCredential)
        }
    }

    #[test]
    fn success_is_trimmed() {
        let llm = FakeCompletion::answering("  Imagine a tiny ball...\n");
        let text = complete_or_error(&llm, &CompletionRequest::new("explain"));
        assert_eq!(text, "Imagine a tiny ball...");
        assert_eq!(llm.calls(), 1);
    }

    #[test]
    fn failure_is_substituted_as_text() {
        let llm = FakeCompletion::failing("HF_TOKEN");
        let text = complete_or_error(&llm, &CompletionRequest::new("explain"));
        assert_eq!(text, "Error: missing credential: set HF_TOKEN");
    }

    #[test]
    fn hosted_client_without_token_fails_before_network() {
        let client = HostedClient::new("http://127.0.0.1:9/v1/chat/completions", "m", None);
        let err = client.complete(&CompletionRequest::new("hi")).unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential("HF_TOKEN")));
    }

    #[test]
    fn request_builder_sets_knobs() {
        let req = CompletionRequest::new("p")
            .max_tokens(600)
            .temperature(0.8)
            .timeout(Duration::from_secs(120));
        assert_eq!(req.max_tokens, 600);
        assert_eq!(req.temperature, 0.8);
        assert_eq!(req.timeout, Duration::from_secs(120));
    }

    #[test]
    fn ollama_endpoint_is_normalised() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3.2");
        assert_eq!(client.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(client.model, "llama3.2");
    }

    #[test]
    fn backend_selection_follows_config() {
        let mut config = LlmConfig::default();
        assert_eq!(from_config(&config).name(), "Ollama");
        config.backend = Backend::Hosted;
        assert_eq!(from_config(&config).name(), "Hosted LLM");
    }
}
