use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::errors::GenerationError;
use crate::log_generation;
use crate::models::GenerateResponse;

/// Fixed timeout for a single generation request
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(45);

/// Number of characters of source text embedded in the prompt
pub const PROMPT_CONTENT_CHARS: usize = 500;

/// A text-generation endpoint that turns a prompt into free text
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Build the quiz instruction sent to the backend
pub fn build_quiz_prompt(text: &str) -> String {
    let content: String = text.chars().take(PROMPT_CONTENT_CHARS).collect();

    format!(
        r#"Generate ONLY this JSON format with no other text:
{{
  "summary": "Brief summary",
  "quizQuestions": [
    {{"type": "mcq", "question": "Q?", "options": ["A", "B", "C", "D"], "correctIndex": 0, "difficulty": "easy", "explanation": "Ans"}}
  ],
  "flashcards": [
    {{"front": "Q", "back": "A"}}
  ]
}}

Content: {}"#,
        content
    )
}

/// Ollama `/api/generate` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

/// Ollama provider implementation
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(endpoint: String, model: String) -> Result<Self> {
        let client = Client::builder().timeout(GENERATION_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint,
            model,
        })
    }
}

#[async_trait]
impl GenerationBackend for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request_body = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        log_generation!(
            start,
            provider = self.provider_name(),
            model = self.model,
            prompt_length = prompt.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .inspect_err(|e| {
                log_generation!(error, provider = self.provider_name(), error = e);
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            let err = GenerationError::Status {
                status: status.as_u16(),
                body,
            };
            log_generation!(error, provider = self.provider_name(), error = err);
            return Err(err);
        }

        let payload = response.text().await?;
        let ollama_response: OllamaResponse = serde_json::from_str(&payload)
            .map_err(|e| GenerationError::InvalidPayload(e.to_string()))?;

        info!(
            provider = self.provider_name(),
            response_length = ollama_response.response.len(),
            "Successfully received generation response"
        );

        Ok(ollama_response.response)
    }

    fn provider_name(&self) -> &'static str {
        "Ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Turns backend free text into a `GenerateResponse`, one fallible step at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseParser;

impl JsonResponseParser {
    /// Strip a surrounding code fence and an optional `json` language tag
    pub fn normalize(content: &str) -> String {
        let mut cleaned = content.trim();

        if cleaned.starts_with("```") {
            cleaned = cleaned.split("```").nth(1).unwrap_or("").trim();
            if let Some(rest) = cleaned.strip_prefix("json") {
                cleaned = rest.trim();
            }
        }

        cleaned.to_string()
    }

    pub fn parse(content: &str) -> Result<Value, GenerationError> {
        serde_json::from_str(content).map_err(GenerationError::InvalidJson)
    }

    /// Split string-typed `options` into whitespace-separated tokens.
    ///
    /// Lossy: an option that itself contains spaces becomes several options.
    pub fn repair_options(value: &mut Value) {
        let Some(questions) = value.get_mut("quizQuestions").and_then(Value::as_array_mut) else {
            return;
        };

        for question in questions {
            if let Some(options) = question.get_mut("options") {
                if let Value::String(joined) = &*options {
                    let tokens = joined
                        .split_whitespace()
                        .map(|token| Value::String(token.to_string()))
                        .collect();
                    *options = Value::Array(tokens);
                }
            }
        }
    }

    pub fn validate(value: Value) -> Result<GenerateResponse, GenerationError> {
        serde_json::from_value(value).map_err(GenerationError::Schema)
    }

    /// Run the full chain: normalize, parse, repair, validate
    pub fn parse_generate_response(&self, content: &str) -> Result<GenerateResponse, GenerationError> {
        let normalized = Self::normalize(content);
        debug!(normalized_json = %normalized, "Normalized generation response");

        let mut value = Self::parse(&normalized)?;
        Self::repair_options(&mut value);
        Self::validate(value)
    }
}
