//! Document pipeline: validation, staging, extraction, summarization, translation, and export.

mod service;
mod staging;
pub mod types;

pub use service::{DigestApi, DigestService, SUMMARY_FAILURE_PREFIX, TRANSLATION_FAILURE_PREFIX};
pub use types::{
    DEFAULT_SUMMARY_WORDS, DEFAULT_TARGET_LANGUAGE, DEFAULT_UI_LANGUAGE, PipelineError,
    RenderRequest, SummaryRequest, SummaryResult, TranslationRequest, TranslationResult,
    UploadedDocument, ValidationError, parse_max_words,
};
