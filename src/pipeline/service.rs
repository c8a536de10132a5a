//! Digest service coordinating extraction, prompting, generation, and export.

use crate::{
    extraction::count_words,
    generation::GenerationClient,
    metrics::{DigestMetrics, MetricsSnapshot},
    pipeline::{
        staging::stage_and_extract,
        types::{
            PipelineError, RenderRequest, SummaryRequest, SummaryResult, TranslationRequest,
            TranslationResult, UploadedDocument, ValidationError,
        },
    },
    prompt::{build_summary_prompt, build_translation_prompt},
    render::{RenderedDocument, render_summary},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Prefix of the summary text returned when the provider call fails.
pub const SUMMARY_FAILURE_PREFIX: &str = "Generation failed: ";
/// Prefix of the translated text returned when the provider call fails.
pub const TRANSLATION_FAILURE_PREFIX: &str = "Translation failed: ";

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait DigestApi: Send + Sync {
    /// Validate, stage, extract, and summarize an uploaded document.
    async fn summarize_document(
        &self,
        document: UploadedDocument,
        request: SummaryRequest,
    ) -> Result<SummaryResult, PipelineError>;

    /// Translate free text.
    async fn translate_text(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResult, PipelineError>;

    /// Render a summary into a downloadable PDF.
    fn render_document(&self, request: RenderRequest) -> Result<RenderedDocument, PipelineError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Coordinates the pipeline: upload staging, text extraction, prompt construction, and the
/// single call to the generation provider.
///
/// The generation client is injected so tests can substitute a double. Construct the service
/// once near process start and share it through an `Arc`.
pub struct DigestService {
    generator: Arc<dyn GenerationClient>,
    upload_dir: PathBuf,
    metrics: Arc<DigestMetrics>,
}

impl DigestService {
    /// Build a service that stages uploads under `upload_dir`.
    pub fn new(generator: Arc<dyn GenerationClient>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            upload_dir: upload_dir.into(),
            metrics: Arc::new(DigestMetrics::new()),
        }
    }

    /// Directory used to stage uploads.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    async fn extract(
        &self,
        request_id: Uuid,
        document: UploadedDocument,
    ) -> Result<String, PipelineError> {
        let format = document.format()?;
        tracing::debug!(%format, bytes = document.bytes.len(), "Validated upload");

        let upload_dir = self.upload_dir.clone();
        tokio::task::spawn_blocking(move || {
            stage_and_extract(&upload_dir, request_id, format, &document.bytes)
        })
        .await
        .map_err(|error| PipelineError::Worker(error.to_string()))?
    }
}

#[async_trait]
impl DigestApi for DigestService {
    async fn summarize_document(
        &self,
        document: UploadedDocument,
        request: SummaryRequest,
    ) -> Result<SummaryResult, PipelineError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "summarize",
            %request_id,
            filename = %document.filename,
        );

        async move {
            tracing::info!(
                max_words = request.max_words,
                language = request.language.map(|language| language.code()).unwrap_or("auto"),
                "Summarizing document"
            );

            let text = match self.extract(request_id, document).await {
                Ok(text) => text,
                Err(error) => {
                    if matches!(error, PipelineError::Extraction(_)) {
                        self.metrics.record_extraction_failure();
                    }
                    tracing::warn!(%error, "Upload rejected");
                    return Err(error);
                }
            };
            let original_word_count = count_words(&text);
            tracing::debug!(original_word_count, "Extracted text");

            let prompt = build_summary_prompt(&text, request.max_words, request.language);
            let (summary_text, generation_error) = match self.generator.generate(&prompt).await {
                Ok(summary) => (summary, None),
                Err(error) => {
                    self.metrics.record_generation_failure();
                    tracing::warn!(%error, "Summary generation failed");
                    let detail = error.to_string();
                    (format!("{SUMMARY_FAILURE_PREFIX}{detail}"), Some(detail))
                }
            };
            self.metrics.record_summary();

            let summary_word_count = count_words(&summary_text);
            tracing::info!(
                original_word_count,
                summary_word_count,
                "Summary request completed"
            );
            Ok(SummaryResult {
                original_word_count,
                summary_text,
                summary_word_count,
                generation_error,
            })
        }
        .instrument(span)
        .await
    }

    async fn translate_text(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResult, PipelineError> {
        let TranslationRequest {
            text,
            target_language,
        } = request;
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }

        tracing::info!(
            target_language = %target_language,
            words = count_words(&text),
            "Translating text"
        );
        let prompt = build_translation_prompt(&text, &target_language);
        let (translated_text, generation_error) = match self.generator.generate(&prompt).await {
            Ok(translated) => (translated, None),
            Err(error) => {
                self.metrics.record_generation_failure();
                tracing::warn!(%error, "Translation failed");
                let detail = error.to_string();
                (format!("{TRANSLATION_FAILURE_PREFIX}{detail}"), Some(detail))
            }
        };
        self.metrics.record_translation();

        Ok(TranslationResult {
            translated_text,
            target_language,
            generation_error,
        })
    }

    fn render_document(&self, request: RenderRequest) -> Result<RenderedDocument, PipelineError> {
        let rendered = render_summary(&request.body_text, request.title.as_deref())?;
        self.metrics.record_render();
        tracing::info!(
            title = %rendered.title,
            pages = rendered.page_count,
            "Rendered summary document"
        );
        Ok(rendered)
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationError;
    use crate::language::Language;
    use tokio::sync::Mutex;

    struct ScriptedGenerator {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().await.push(prompt.to_string());
            self.reply
                .clone()
                .map_err(GenerationError::GenerationFailed)
        }
    }

    #[tokio::test]
    async fn summary_counts_words_and_uses_prompt_builder() {
        let dir = tempfile::tempdir().expect("dir");
        let generator = ScriptedGenerator::replying("Greetings repeated twice here.");
        let service = DigestService::new(generator.clone(), dir.path());

        let result = service
            .summarize_document(
                UploadedDocument::new("hello.txt", b"Hello world. Hello again.".to_vec()),
                SummaryRequest::from_form(Some("5"), Some("en")),
            )
            .await
            .expect("summary");

        assert_eq!(result.original_word_count, 4);
        assert_eq!(result.summary_word_count, 4);
        assert!(result.generation_error.is_none());

        let prompts = generator.prompts.lock().await;
        assert_eq!(
            prompts.as_slice(),
            [build_summary_prompt(
                "Hello world. Hello again.",
                5,
                Some(Language::English)
            )]
        );
        assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
    }

    #[tokio::test]
    async fn generation_failure_is_folded_into_summary_text() {
        let dir = tempfile::tempdir().expect("dir");
        let service = DigestService::new(ScriptedGenerator::failing("quota"), dir.path());

        let result = service
            .summarize_document(
                UploadedDocument::new("a.txt", b"Some words".to_vec()),
                SummaryRequest::default(),
            )
            .await
            .expect("summary payload");

        assert!(result.summary_text.starts_with(SUMMARY_FAILURE_PREFIX));
        assert!(result.summary_text.contains("quota"));
        assert_eq!(result.summary_word_count, count_words(&result.summary_text));
        assert!(result.generation_error.is_some());

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.generation_failures, 1);
        assert_eq!(snapshot.documents_summarized, 1);
    }

    #[tokio::test]
    async fn unsupported_upload_never_touches_disk() {
        let dir = tempfile::tempdir().expect("dir");
        let uploads = dir.path().join("uploads");
        let generator = ScriptedGenerator::replying("unused");
        let service = DigestService::new(generator.clone(), &uploads);

        let error = service
            .summarize_document(
                UploadedDocument::new("setup.exe", b"MZ".to_vec()),
                SummaryRequest::default(),
            )
            .await
            .expect_err("rejected");

        assert!(matches!(
            error,
            PipelineError::Validation(ValidationError::UnsupportedFormat { .. })
        ));
        assert!(!uploads.exists());
        assert!(generator.prompts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_skips_generation_and_cleans_up() {
        let dir = tempfile::tempdir().expect("dir");
        let generator = ScriptedGenerator::replying("unused");
        let service = DigestService::new(generator.clone(), dir.path());

        let error = service
            .summarize_document(
                UploadedDocument::new("broken.docx", b"not a zip".to_vec()),
                SummaryRequest::default(),
            )
            .await
            .expect_err("extraction failure");

        assert!(matches!(error, PipelineError::Extraction(_)));
        assert!(error.is_client_error());
        assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
        assert!(generator.prompts.lock().await.is_empty());
        assert_eq!(service.metrics_snapshot().extraction_failures, 1);
    }

    #[tokio::test]
    async fn translation_echoes_unknown_codes_and_prompts_in_english() {
        let dir = tempfile::tempdir().expect("dir");
        let generator = ScriptedGenerator::replying("Hello");
        let service = DigestService::new(generator.clone(), dir.path());

        let result = service
            .translate_text(TranslationRequest {
                text: "Ciao".into(),
                target_language: "xx".into(),
            })
            .await
            .expect("translation");

        assert_eq!(result.translated_text, "Hello");
        assert_eq!(result.target_language, "xx");
        let prompts = generator.prompts.lock().await;
        assert!(prompts[0].starts_with("Translate the following text into English."));
    }

    #[tokio::test]
    async fn empty_translation_text_is_rejected() {
        let dir = tempfile::tempdir().expect("dir");
        let service = DigestService::new(ScriptedGenerator::replying("x"), dir.path());

        let error = service
            .translate_text(TranslationRequest {
                text: "   ".into(),
                target_language: "en".into(),
            })
            .await
            .expect_err("empty");
        assert!(matches!(
            error,
            PipelineError::Validation(ValidationError::EmptyText)
        ));
    }

    #[test]
    fn render_counts_documents() {
        let dir = tempfile::tempdir().expect("dir");
        let service = DigestService::new(ScriptedGenerator::replying("x"), dir.path());
        let rendered = service
            .render_document(RenderRequest {
                body_text: "Body".into(),
                title: None,
            })
            .expect("render");
        assert!(!rendered.bytes.is_empty());
        assert_eq!(service.metrics_snapshot().documents_rendered, 1);
    }
}
