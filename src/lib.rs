pub mod logging;

pub mod api;
pub mod config;
pub mod errors;
pub mod llm_providers;
pub mod mock_generator;
pub mod models;
pub mod quiz_service;
pub mod upload_service;

pub use api::{create_router, AppState};
pub use config::Config;
pub use errors::*;
pub use llm_providers::{GenerationBackend, JsonResponseParser, OllamaProvider};
pub use mock_generator::generate_mock_quiz;
pub use models::*;
pub use quiz_service::QuizService;
pub use upload_service::UploadService;
