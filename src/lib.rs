#![deny(missing_docs)]

//! Core library for the DocDigest summarization service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Plain-text extraction for uploaded documents.
pub mod extraction;
/// Generation client abstraction and provider adapters.
pub mod generation;
/// Supported output languages.
pub mod language;
/// Structured logging and tracing setup.
pub mod logging;
/// Pipeline activity counters.
pub mod metrics;
/// Summarize/translate/export orchestration.
pub mod pipeline;
/// Prompt construction.
pub mod prompt;
/// PDF export of summaries.
pub mod render;
