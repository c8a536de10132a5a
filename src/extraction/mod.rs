//! Plain-text extraction for uploaded documents.
//!
//! Each supported format lives in its own submodule; [`read_document`] only dispatches. Faults
//! raised by the underlying parsers are converted into [`ExtractionError`] values so callers never
//! see parser-specific error types.

mod docx;
mod pdf;

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Upload formats accepted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// UTF-8 plain text (`.txt`).
    PlainText,
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Office Open XML word-processing document (`.docx`).
    Docx,
}

impl DocumentFormat {
    /// Extensions accepted on upload, lowercase.
    pub const ALLOWED_EXTENSIONS: [&'static str; 3] = ["txt", "pdf", "docx"];

    /// Match an extension (without the dot), case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Infer the format from the text after the last `.` in `filename`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        Self::from_extension(extension)
    }

    /// Canonical extension, used when staging uploads.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PlainText => "TXT",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        })
    }
}

/// Reasons a document's text could not be extracted.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The staged file could not be opened or read.
    #[error("Error reading the file: {0}")]
    Io(#[from] std::io::Error),
    /// A plain-text upload was not valid UTF-8.
    #[error("Error reading the file: content is not valid UTF-8 ({0})")]
    Encoding(#[from] std::string::FromUtf8Error),
    /// The format-specific parser rejected the document.
    #[error("Error reading the {format}: {detail}")]
    Parse {
        /// Format whose parser failed.
        format: DocumentFormat,
        /// Parser diagnostic.
        detail: String,
    },
}

impl ExtractionError {
    pub(crate) fn parse(format: DocumentFormat, detail: impl ToString) -> Self {
        Self::Parse {
            format,
            detail: detail.to_string(),
        }
    }
}

/// Extract trimmed plain text from the file at `path`, interpreted as `format`.
///
/// The file is only read; removing it is the caller's responsibility. An empty result is a
/// valid outcome for documents without extractable text.
pub fn read_document(path: &Path, format: DocumentFormat) -> Result<String, ExtractionError> {
    let text = match format {
        DocumentFormat::PlainText => read_plain_text(path)?,
        DocumentFormat::Pdf => pdf::extract_text(path)?,
        DocumentFormat::Docx => docx::extract_text(path)?,
    };
    tracing::debug!(%format, chars = text.len(), "Extracted document text");
    Ok(text)
}

fn read_plain_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes)?;
    Ok(text.trim().to_string())
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
