//! Request/response values and error definitions for the digest pipeline.

use crate::extraction::{DocumentFormat, ExtractionError};
use crate::language::Language;
use crate::render::RenderError;
use thiserror::Error;

/// Summary length used when the caller supplies none or an unusable value.
pub const DEFAULT_SUMMARY_WORDS: usize = 150;
/// UI language assumed when the caller does not send one.
pub const DEFAULT_UI_LANGUAGE: &str = "it";
/// Translation target assumed when the caller does not send one.
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Input rejected before any file is written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The multipart form carried no `file` field.
    #[error("No file uploaded")]
    MissingFile,
    /// The uploaded file had an empty name.
    #[error("Empty file name")]
    EmptyFilename,
    /// The extension is not one of `txt`, `pdf`, `docx`.
    #[error("Unsupported file format (allowed: txt, pdf, docx)")]
    UnsupportedFormat {
        /// Name supplied by the client.
        filename: String,
    },
    /// Translation was requested for empty text.
    #[error("No text to translate")]
    EmptyText,
    /// The upload form could not be read.
    #[error("Malformed upload: {0}")]
    MalformedForm(String),
}

/// Errors emitted by the digest pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Text could not be extracted from the upload.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// The upload could not be written to the staging directory.
    #[error("Failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),
    /// PDF export failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A blocking worker panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Worker(String),
}

impl PipelineError {
    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Extraction(_))
    }
}

/// A file received from a client, alive for one request only.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Name declared by the client; only its extension is used.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Create an upload from its declared name and contents.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Validate the declared name and resolve the document format.
    pub fn format(&self) -> Result<DocumentFormat, ValidationError> {
        if self.filename.trim().is_empty() {
            return Err(ValidationError::EmptyFilename);
        }
        DocumentFormat::from_filename(&self.filename).ok_or_else(|| {
            ValidationError::UnsupportedFormat {
                filename: self.filename.clone(),
            }
        })
    }
}

/// Parameters controlling a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Approximate target length in words; always positive.
    pub max_words: usize,
    /// Output language, or `None` to follow the source text.
    pub language: Option<Language>,
}

impl SummaryRequest {
    /// Coerce raw form values.
    ///
    /// `length` falls back to [`DEFAULT_SUMMARY_WORDS`] when absent, non-numeric, zero, or
    /// negative. `ui_language` falls back to [`DEFAULT_UI_LANGUAGE`] when absent or blank;
    /// `auto` and unrecognized codes leave the language unset.
    pub fn from_form(length: Option<&str>, ui_language: Option<&str>) -> Self {
        let ui_language = ui_language
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_UI_LANGUAGE);
        Self {
            max_words: parse_max_words(length),
            language: Language::from_code(ui_language),
        }
    }
}

impl Default for SummaryRequest {
    fn default() -> Self {
        Self::from_form(None, None)
    }
}

/// Parse a requested summary length, coercing unusable input to the default.
pub fn parse_max_words(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|words| *words > 0)
        .and_then(|words| usize::try_from(words).ok())
        .unwrap_or(DEFAULT_SUMMARY_WORDS)
}

/// Result of summarizing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    /// Whitespace-token count of the extracted text.
    pub original_word_count: usize,
    /// Summary text, or a readable failure message when generation failed.
    pub summary_text: String,
    /// Whitespace-token count of `summary_text`.
    pub summary_word_count: usize,
    /// Provider failure folded into `summary_text`, if any.
    pub generation_error: Option<String>,
}

/// Text to translate and the requested target code.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Source text.
    pub text: String,
    /// Target language code as sent by the caller; unknown codes translate into English.
    pub target_language: String,
}

/// Result of a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    /// Translated text, or a readable failure message when generation failed.
    pub translated_text: String,
    /// Target code echoed back exactly as requested.
    pub target_language: String,
    /// Provider failure folded into `translated_text`, if any.
    pub generation_error: Option<String>,
}

/// Summary export request.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// Body text; newlines become line breaks.
    pub body_text: String,
    /// Title printed on the first page; blank means the default title.
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_words_defaults_for_missing_or_unusable_values() {
        assert_eq!(parse_max_words(None), 150);
        assert_eq!(parse_max_words(Some("")), 150);
        assert_eq!(parse_max_words(Some("many")), 150);
        assert_eq!(parse_max_words(Some("12.5")), 150);
        assert_eq!(parse_max_words(Some("0")), 150);
        assert_eq!(parse_max_words(Some("-40")), 150);
    }

    #[test]
    fn max_words_accepts_positive_integers() {
        assert_eq!(parse_max_words(Some("5")), 5);
        assert_eq!(parse_max_words(Some(" 300 ")), 300);
    }

    #[test]
    fn ui_language_defaults_to_italian() {
        let request = SummaryRequest::from_form(None, None);
        assert_eq!(request.language, Some(Language::Italian));
        assert_eq!(request, SummaryRequest::default());
        assert_eq!(
            SummaryRequest::from_form(Some("80"), Some("  ")).language,
            Some(Language::Italian)
        );
    }

    #[test]
    fn auto_and_unknown_ui_languages_leave_language_unset() {
        assert_eq!(SummaryRequest::from_form(None, Some("auto")).language, None);
        assert_eq!(SummaryRequest::from_form(None, Some("pt")).language, None);
        assert_eq!(
            SummaryRequest::from_form(None, Some("en")).language,
            Some(Language::English)
        );
    }

    #[test]
    fn upload_validation_checks_name_and_extension() {
        assert!(matches!(
            UploadedDocument::new("", b"x".to_vec()).format(),
            Err(ValidationError::EmptyFilename)
        ));
        assert!(matches!(
            UploadedDocument::new("virus.exe", b"x".to_vec()).format(),
            Err(ValidationError::UnsupportedFormat { .. })
        ));
        assert_eq!(
            UploadedDocument::new("Notes.TXT", b"x".to_vec())
                .format()
                .expect("format"),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn only_request_faults_are_client_errors() {
        assert!(PipelineError::from(ValidationError::MissingFile).is_client_error());
        assert!(!PipelineError::Worker("panicked".into()).is_client_error());
    }
}
