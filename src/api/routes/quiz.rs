//! Quiz handlers: document upload and question retrieval.

use crate::api::AppState;
use crate::error::{Result, ValidationError};
use crate::pipeline::IncomingFile;
use crate::types::{QuestionRecord, UploadResponse};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};

/// Multipart field name clients are expected to use for the document
pub const FILE_FIELD: &str = "file";

/// POST /upload - Upload a document and generate questions from it
///
/// Runs the whole cycle before answering: store, generate, parse, cache.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "quiz",
    request_body(content = Vec<u8>, description = "One document in the 'file' field (multipart/form-data)", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Questions generated", body = UploadResponse),
        (status = 400, description = "Rejected upload (no file, several files, wrong media type, empty file)", body = crate::error::ApiError),
        (status = 413, description = "Request body exceeds the configured upload limit", body = crate::error::ApiError),
        (status = 409, description = "Another upload is being processed", body = crate::error::ApiError),
        (status = 500, description = "Generator or filesystem failure", body = crate::error::ApiError)
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let files = collect_files(multipart, state.config.storage.max_upload_bytes).await?;
    let outcome = state.pipeline.submit_upload(files).await?;

    Ok(Json(UploadResponse {
        message: format!(
            "Generated {} questions from {}",
            outcome.questions.len(),
            outcome.document.filename
        ),
        filename: outcome.document.filename,
        questions: outcome.questions.as_ref().clone(),
        dropped_blocks: outcome.dropped_blocks,
    }))
}

/// Read every file part before anything touches the filesystem
///
/// A part counts as a file when it carries a filename or uses the `file`
/// field name; other form fields are ignored.
async fn collect_files(mut multipart: Multipart, limit: usize) -> Result<Vec<IncomingFile>> {
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e, limit).into()),
        };

        if field.file_name().is_none() && field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let media_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit))?;

        files.push(IncomingFile {
            filename,
            media_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(files)
}

fn multipart_error(error: MultipartError, limit: usize) -> ValidationError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::TooLarge { limit }
    } else {
        ValidationError::Malformed(error.body_text())
    }
}

/// GET /questions - Current question set
#[utoipa::path(
    get,
    path = "/questions",
    tag = "quiz",
    responses(
        (status = 200, description = "Parsed questions in source order (possibly empty)", body = Vec<QuestionRecord>),
        (status = 409, description = "Cache is cold and an upload is being processed", body = crate::error::ApiError),
        (status = 500, description = "Generator output could not be read", body = crate::error::ApiError)
    )
)]
pub async fn get_questions(State(state): State<AppState>) -> Result<Json<Vec<QuestionRecord>>> {
    let questions = state.pipeline.questions().await?;
    Ok(Json(questions.as_ref().clone()))
}
