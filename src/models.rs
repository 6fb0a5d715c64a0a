use serde::{Deserialize, Deserializer, Serialize};

fn default_difficulty() -> String {
    "easy".to_string()
}

// Models sometimes emit `"difficulty": null`; treat it like an absent field.
fn difficulty_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_difficulty))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub unit_id: String, // Opaque, caller-defined unit identifier
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(rename = "type")]
    pub question_type: String, // e.g. "mcq"
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: i64, // Expected to index into options, not enforced
    #[serde(default = "default_difficulty", deserialize_with = "difficulty_or_default")]
    pub difficulty: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub summary: String,
    pub quiz_questions: Vec<QuizQuestion>,
    pub flashcards: Vec<Flashcard>,
}

/// Which generator produced a response. Reported out of band, never in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Model,
    Fallback,
}

impl GenerationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationSource::Model => "model",
            GenerationSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub response: GenerateResponse,
    pub source: GenerationSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_url: String,
}

/// A file accepted by the upload endpoint, as stored on disk.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub title: String,
    pub file_url: String,
    pub size_bytes: usize,
}
