//! HTTP surface for DocDigest.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /summarize` – Multipart upload (`file`, optional `length`, optional `ui_language`).
//!   Returns `{ original_length, summary, summary_length }`.
//! - `POST /translate` – JSON `{ text, target_language }`. Returns `{ translated_text, target_language }`.
//! - `POST /download-pdf` – JSON `{ summary, custom_title }`. Returns the summary as a PDF attachment.
//! - `GET /metrics` – Pipeline counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Client mistakes (missing file, bad extension, unreadable document, empty text) map to `400`
//! with `{ "error": message }`. Provider failures are reported inside the `200` payload text.

use crate::metrics::MetricsSnapshot;
use crate::pipeline::{
    DEFAULT_TARGET_LANGUAGE, DigestApi, PipelineError, RenderRequest, SummaryRequest,
    TranslationRequest, UploadedDocument, ValidationError,
};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router; uploads larger than `max_upload_bytes` are rejected.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: DigestApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize::<S>))
        .route("/translate", post(translate::<S>))
        .route("/download-pdf", post(download_pdf::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Success response for `POST /summarize`.
#[derive(Serialize)]
struct SummarizeResponse {
    /// Word count of the extracted document text.
    original_length: usize,
    /// Generated summary (or a readable generation failure).
    summary: String,
    /// Word count of `summary`.
    summary_length: usize,
}

/// Form fields collected from the multipart upload.
struct SummarizeForm {
    file: Option<UploadedDocument>,
    length: Option<String>,
    ui_language: Option<String>,
}

/// Summarize an uploaded document.
async fn summarize<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: DigestApi,
{
    let form = read_summarize_form(multipart).await?;
    let document = form.file.ok_or(ValidationError::MissingFile)?;
    let request = SummaryRequest::from_form(form.length.as_deref(), form.ui_language.as_deref());

    let result = service.summarize_document(document, request).await?;
    Ok(Json(SummarizeResponse {
        original_length: result.original_word_count,
        summary: result.summary_text,
        summary_length: result.summary_word_count,
    }))
}

async fn read_summarize_form(mut multipart: Multipart) -> Result<SummarizeForm, ValidationError> {
    let mut form = SummarizeForm {
        file: None,
        length: None,
        ui_language: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ValidationError::MalformedForm(error.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| ValidationError::MalformedForm(error.to_string()))?;
                form.file = Some(UploadedDocument::new(filename, bytes.to_vec()));
            }
            "length" | "ui_language" => {
                let value = field
                    .text()
                    .await
                    .map_err(|error| ValidationError::MalformedForm(error.to_string()))?;
                if name == "length" {
                    form.length = Some(value);
                } else {
                    form.ui_language = Some(value);
                }
            }
            _ => {
                // Unknown fields are drained and ignored
                field
                    .bytes()
                    .await
                    .map_err(|error| ValidationError::MalformedForm(error.to_string()))?;
            }
        }
    }

    Ok(form)
}

/// Request body for `POST /translate`.
#[derive(Deserialize)]
struct TranslateRequestBody {
    /// Text to translate; `null` or missing counts as empty.
    #[serde(default)]
    text: Option<String>,
    /// Target language code (defaults to `en`; unknown codes translate into English).
    #[serde(default)]
    target_language: Option<String>,
}

/// Success response for `POST /translate`.
#[derive(Serialize)]
struct TranslateResponse {
    translated_text: String,
    target_language: String,
}

/// Translate text into the requested language.
async fn translate<S>(
    State(service): State<Arc<S>>,
    Json(body): Json<TranslateRequestBody>,
) -> Result<Json<TranslateResponse>, AppError>
where
    S: DigestApi,
{
    let request = TranslationRequest {
        text: body.text.unwrap_or_default(),
        target_language: body
            .target_language
            .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string()),
    };
    let result = service.translate_text(request).await?;
    Ok(Json(TranslateResponse {
        translated_text: result.translated_text,
        target_language: result.target_language,
    }))
}

/// Request body for `POST /download-pdf`.
#[derive(Deserialize)]
struct DownloadRequestBody {
    /// Summary text to print; `null` or missing renders an empty body.
    #[serde(default)]
    summary: Option<String>,
    /// Optional title; blank means the default title.
    #[serde(default)]
    custom_title: Option<String>,
}

/// Render the summary as a PDF attachment.
async fn download_pdf<S>(
    State(service): State<Arc<S>>,
    Json(body): Json<DownloadRequestBody>,
) -> Result<Response, AppError>
where
    S: DigestApi + 'static,
{
    let request = RenderRequest {
        body_text: body.summary.unwrap_or_default(),
        title: body.custom_title,
    };
    let rendered = tokio::task::spawn_blocking(move || service.render_document(request))
        .await
        .map_err(|error| PipelineError::Worker(error.to_string()))??;

    let disposition = format!("attachment; filename={}", rendered.filename());
    Ok((
        [
            (header::CONTENT_TYPE, rendered.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}

/// Return a snapshot of the pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: DigestApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Upload a txt, pdf, or docx file as multipart field `file` (optional `length`, `ui_language`). Response returns { \"original_length\": number, \"summary\": string, \"summary_length\": number }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "translate",
                method: "POST",
                path: "/translate",
                description: "Translate text into en, it, es, fr, or de (unknown codes translate into English).",
                request_example: Some(json!({
                    "text": "Testo da tradurre",
                    "target_language": "en"
                })),
            },
            CommandDescriptor {
                name: "download_pdf",
                method: "POST",
                path: "/download-pdf",
                description: "Render a summary as a PDF attachment.",
                request_example: Some(json!({
                    "summary": "First line\nSecond line",
                    "custom_title": "Quarterly report"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return pipeline counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(PipelineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self(inner)
    }
}

impl From<ValidationError> for AppError {
    fn from(inner: ValidationError) -> Self {
        Self(inner.into())
    }
}
