use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::services::ServeDir;
use uuid::Uuid;

use crate::{
    errors::{ApiError, ErrorContext, ErrorResponse},
    models::*,
    quiz_service::QuizService,
    upload_service::UploadService,
};

// Import logging macros
use crate::{log_api_error, log_api_start, log_api_success, log_api_warn};

/// Upload size limit for `/upload-pdf`
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Header reporting whether the model or the fallback produced a quiz
pub const GENERATION_SOURCE_HEADER: &str = "x-generation-source";

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
    pub upload_service: UploadService,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "API running..." }))
}

pub async fn generate_quiz(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::from(rejection).to_response_with_context(ErrorContext::new("generate", "quiz"))
    })?;
    let request_id = Uuid::new_v4();
    log_api_start!("generate", request_id = request_id, unit_id = request.unit_id);

    match state.quiz_service.generate(&request, request_id).await {
        Ok(outcome) => {
            log_api_success!(
                "generate",
                request_id = request_id,
                source = outcome.source.as_str(),
                format!("{} questions, {} flashcards", outcome.response.quiz_questions.len(), outcome.response.flashcards.len())
            );
            Ok((
                [(GENERATION_SOURCE_HEADER, outcome.source.as_str())],
                Json(outcome.response),
            ))
        }
        Err(e) => {
            log_api_error!("generate", request_id = request_id, error = e, "fallback generation failed");
            let context = ErrorContext::new("generate", "quiz").with_id(&request.unit_id);
            Err(e.to_response_with_context(context))
        }
    }
}

/// Form parts accepted by the upload endpoint
#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    bytes: Option<Vec<u8>>,
    title: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                form.filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file bytes: {}", e)))?;
                form.bytes = Some(data.to_vec());
            }
            Some("title") => {
                let title = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read title: {}", e)))?;
                form.title = Some(title);
            }
            _ => {}
        }
    }

    Ok(form)
}

pub async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    log_api_start!("upload_pdf");
    let context = || ErrorContext::new("upload_pdf", "file");

    let form = read_upload_form(multipart)
        .await
        .map_err(|e| e.to_response_with_context(context()))?;

    let (Some(bytes), Some(filename)) = (form.bytes, form.filename) else {
        return Err(ApiError::BadRequest("Multipart form must include a file".to_string())
            .to_response_with_context(context()));
    };
    let Some(title) = form.title else {
        return Err(ApiError::BadRequest("Multipart form must include a title".to_string())
            .to_response_with_context(context().with_id(&filename)));
    };

    match state.upload_service.store(&filename, &title, &bytes).await {
        Ok(stored) => {
            log_api_success!("upload_pdf", filename = stored.filename, "file stored");
            Ok(Json(UploadResponse {
                file_url: stored.file_url,
            }))
        }
        Err(e @ ApiError::BadRequest(_)) => {
            log_api_warn!("upload_pdf", filename = filename, "rejected filename");
            Err(e.to_response_with_context(context().with_id(&filename)))
        }
        Err(e) => {
            log_api_error!("upload_pdf", filename = filename, error = e, "failed to store file");
            Err(e.to_response_with_context(context().with_id(&filename)))
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.upload_service.upload_dir());

    Router::new()
        .route("/", get(root))
        // Only the first characters of `text` reach the prompt, so any size is accepted
        .route("/generate", post(generate_quiz).layer(DefaultBodyLimit::disable()))
        .route(
            "/upload-pdf",
            post(upload_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest_service("/uploads", uploads)
        .with_state(state)
}
