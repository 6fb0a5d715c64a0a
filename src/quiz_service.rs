use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::config::GeneratorConfig;
use crate::errors::{ApiError, GenerationError};
use crate::llm_providers::{build_quiz_prompt, GenerationBackend, JsonResponseParser, OllamaProvider};
use crate::log_generation;
use crate::mock_generator::generate_mock_quiz;
use crate::models::{GenerateRequest, GenerateResponse, GenerationOutcome, GenerationSource};

/// Generates quizzes through the backend, falling back to the local generator
#[derive(Clone)]
pub struct QuizService {
    backend: Arc<dyn GenerationBackend>,
    json_parser: JsonResponseParser,
}

impl QuizService {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            json_parser: JsonResponseParser,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let provider = OllamaProvider::new(config.endpoint.clone(), config.model.clone())?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn provider_name(&self) -> &'static str {
        self.backend.provider_name()
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Generate with the backend; any backend failure is absorbed by the fallback.
    /// Only a failing fallback is reported.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        request_id: Uuid,
    ) -> Result<GenerationOutcome, ApiError> {
        match self.generate_with_model(&request.text).await {
            Ok(response) => Ok(GenerationOutcome {
                response,
                source: GenerationSource::Model,
            }),
            Err(e) => {
                log_generation!(fallback, request_id = request_id, kind = e.kind(), error = e);
                let response = run_fallback(&request.text)?;
                Ok(GenerationOutcome {
                    response,
                    source: GenerationSource::Fallback,
                })
            }
        }
    }

    pub async fn generate_with_model(&self, text: &str) -> Result<GenerateResponse, GenerationError> {
        let started = Instant::now();
        let prompt = build_quiz_prompt(text);

        let raw = self.backend.generate(&prompt).await?;
        debug!(response_content = %raw, "Raw generation backend response");

        let response = self.json_parser.parse_generate_response(&raw)?;

        log_generation!(
            success,
            provider = self.provider_name(),
            duration_ms = started.elapsed().as_millis() as u64,
            question_count = response.quiz_questions.len()
        );
        Ok(response)
    }
}

/// Run the local generator, turning a panic into a reportable failure
fn run_fallback(text: &str) -> Result<GenerateResponse, ApiError> {
    panic::catch_unwind(AssertUnwindSafe(|| generate_mock_quiz(text))).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "fallback generator panicked".to_string());
        ApiError::GenerationFailed(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubBackend {
        reply: std::result::Result<String, u16>,
    }

    #[async_trait]
    impl GenerationBackend for StubBackend {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(GenerationError::Status {
                    status: *status,
                    body: "stub failure".to_string(),
                }),
            }
        }

        fn provider_name(&self) -> &'static str {
            "Stub"
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }
    }

    fn service(reply: std::result::Result<&str, u16>) -> QuizService {
        QuizService::new(Arc::new(StubBackend {
            reply: reply.map(str::to_string),
        }))
    }

    fn request(text: &str) -> GenerateRequest {
        GenerateRequest {
            unit_id: "U101".to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_model_response_is_used_when_valid() {
        let reply = r#"```json
{"summary": "From the model", "quizQuestions": [{"type": "mcq", "question": "Q?", "options": "yes no", "correctIndex": 1}], "flashcards": []}
```"#;
        let outcome = service(Ok(reply))
            .generate(&request("Some text."), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(outcome.source, GenerationSource::Model);
        assert_eq!(outcome.response.summary, "From the model");
        assert_eq!(outcome.response.quiz_questions[0].options, vec!["yes", "no"]);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back() {
        let outcome = service(Err(503))
            .generate(&request("Paris is the capital of France. It has the Eiffel Tower."), Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(outcome.source, GenerationSource::Fallback);
        assert_eq!(outcome.response.summary, "Paris is the capital of France. It has the Eiffel Tower.");
        assert_eq!(outcome.response.quiz_questions.len(), 2);
    }

    #[tokio::test]
    async fn test_garbage_and_schema_drift_fall_back() {
        for reply in ["not json at all", r#"{"summary": "only a summary"}"#, "```json\n[1, 2]\n```"] {
            let outcome = service(Ok(reply))
                .generate(&request("A. B."), Uuid::new_v4())
                .await
                .unwrap();
            assert_eq!(outcome.source, GenerationSource::Fallback, "reply {:?}", reply);
            assert_eq!(outcome.response.flashcards.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_generate_with_model_reports_failure_kind() {
        let err = service(Ok("nope")).generate_with_model("text").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_json");

        let err = service(Err(500)).generate_with_model("text").await.unwrap_err();
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_run_fallback_on_empty_text() {
        let response = run_fallback("").unwrap();
        assert_eq!(response.summary, "Content processed.");
    }
}
