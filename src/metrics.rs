use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline activity since startup.
#[derive(Default)]
pub struct DigestMetrics {
    documents_summarized: AtomicU64,
    extraction_failures: AtomicU64,
    generation_failures: AtomicU64,
    translations: AtomicU64,
    documents_rendered: AtomicU64,
}

impl DigestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document whose text reached the summarization step.
    pub fn record_summary(&self) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upload whose text could not be extracted.
    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed call to the generation provider.
    pub fn record_generation_failure(&self) {
        self.generation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed translation request.
    pub fn record_translation(&self) {
        self.translations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rendered PDF.
    pub fn record_render(&self) {
        self.documents_rendered.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            generation_failures: self.generation_failures.load(Ordering::Relaxed),
            translations: self.translations.load(Ordering::Relaxed),
            documents_rendered: self.documents_rendered.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents that reached the summarization step.
    pub documents_summarized: u64,
    /// Uploads rejected because text extraction failed.
    pub extraction_failures: u64,
    /// Summaries or translations whose provider call failed.
    pub generation_failures: u64,
    /// Translation requests served.
    pub translations: u64,
    /// PDFs rendered for download.
    pub documents_rendered: u64,
}
