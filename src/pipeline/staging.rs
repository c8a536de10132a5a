//! Request-scoped staging of uploads on disk.
//!
//! Uploads are written under a name derived from the request id plus a random tempfile suffix,
//! never the client-supplied filename, so concurrent uploads of `report.pdf` cannot clobber each
//! other. The staged file is removed as soon as extraction finishes, whatever the outcome; if a
//! worker unwinds before that, dropping the [`tempfile::NamedTempFile`] removes it instead.

use crate::extraction::{self, DocumentFormat};
use crate::pipeline::types::PipelineError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Write `bytes` into `upload_dir`, extract its text, then delete the staged file.
pub(crate) fn stage_and_extract(
    upload_dir: &Path,
    request_id: Uuid,
    format: DocumentFormat,
    bytes: &[u8],
) -> Result<String, PipelineError> {
    let staged = stage(upload_dir, request_id, format, bytes).map_err(PipelineError::Staging)?;
    tracing::debug!(path = %staged.path().display(), "Staged upload");

    let outcome = extraction::read_document(staged.path(), format);

    let path = staged.path().to_path_buf();
    if let Err(error) = staged.close() {
        tracing::warn!(path = %path.display(), %error, "Failed to remove staged upload");
    }

    Ok(outcome?)
}

fn stage(
    upload_dir: &Path,
    request_id: Uuid,
    format: DocumentFormat,
    bytes: &[u8],
) -> std::io::Result<NamedTempFile> {
    std::fs::create_dir_all(upload_dir)?;
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{request_id}-"))
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(upload_dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionError;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
    }

    #[test]
    fn staged_file_is_removed_after_success() {
        let dir = tempfile::tempdir().expect("dir");
        let text = stage_and_extract(
            dir.path(),
            Uuid::new_v4(),
            DocumentFormat::PlainText,
            b"  Hello world.  ",
        )
        .expect("text");
        assert_eq!(text, "Hello world.");
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn staged_file_is_removed_after_extraction_failure() {
        let dir = tempfile::tempdir().expect("dir");
        let error = stage_and_extract(
            dir.path(),
            Uuid::new_v4(),
            DocumentFormat::Pdf,
            b"not a pdf",
        )
        .expect_err("parse failure");
        assert!(matches!(
            error,
            PipelineError::Extraction(ExtractionError::Parse { .. })
        ));
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn staged_names_are_unique_for_the_same_request() {
        let dir = tempfile::tempdir().expect("dir");
        let request_id = Uuid::new_v4();
        let first = stage(dir.path(), request_id, DocumentFormat::PlainText, b"one").expect("first");
        let second =
            stage(dir.path(), request_id, DocumentFormat::PlainText, b"two").expect("second");

        assert_ne!(first.path(), second.path());
        for staged in [&first, &second] {
            let name = staged
                .path()
                .file_name()
                .and_then(|name| name.to_str())
                .expect("file name");
            assert!(name.starts_with(&format!("{request_id}-")), "{name}");
            assert!(name.ends_with(".txt"), "{name}");
        }
        assert_eq!(std::fs::read(first.path()).expect("read"), b"one");
        assert_eq!(std::fs::read(second.path()).expect("read"), b"two");
    }

    #[test]
    fn concurrent_uploads_each_extract_their_own_content() {
        let dir = tempfile::tempdir().expect("dir");
        let request_id = Uuid::new_v4();
        let bodies: Vec<String> = (0..8).map(|n| format!("upload number {n}")).collect();

        let texts: Vec<String> = std::thread::scope(|scope| {
            let workers: Vec<_> = bodies
                .iter()
                .map(|body| {
                    let upload_dir = dir.path();
                    scope.spawn(move || {
                        stage_and_extract(
                            upload_dir,
                            request_id,
                            DocumentFormat::PlainText,
                            body.as_bytes(),
                        )
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().expect("worker").expect("text"))
                .collect()
        });

        assert_eq!(texts, bodies);
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn missing_upload_dir_is_created() {
        let dir = tempfile::tempdir().expect("dir");
        let nested = dir.path().join("nested").join("uploads");
        stage_and_extract(&nested, Uuid::new_v4(), DocumentFormat::PlainText, b"ok")
            .expect("text");
        assert!(nested.is_dir());
        assert_eq!(entries(&nested), 0);
    }
}
