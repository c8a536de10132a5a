use super::{DocumentFormat, ExtractionError};
use lopdf::Document;
use std::path::Path;

/// Extract page text in document order, one newline between pages.
pub(super) fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let document =
        Document::load(path).map_err(|error| ExtractionError::parse(DocumentFormat::Pdf, error))?;

    let pages = document.get_pages();
    let mut text = String::new();
    for page_number in pages.keys() {
        let page_text = document
            .extract_text(&[*page_number])
            .map_err(|error| ExtractionError::parse(DocumentFormat::Pdf, error))?;
        text.push_str(&page_text);
        text.push('\n');
    }

    tracing::trace!(pages = pages.len(), "Read PDF pages");
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_summary;
    use std::io::Write;

    #[test]
    fn reads_text_from_rendered_pdf() {
        let rendered = render_summary("Quarterly revenue grew steadily.", Some("Finance"))
            .expect("render");
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("temp file");
        file.write_all(&rendered.bytes).expect("write");
        file.flush().expect("flush");

        let text = extract_text(file.path()).expect("pdf text");
        assert!(text.contains("Finance"), "{text}");
        assert!(text.contains("Quarterly revenue grew steadily."), "{text}");
    }

    #[test]
    fn pages_are_read_in_order_with_newlines_between_them() {
        let body = (0..120)
            .map(|n| format!("line {n:03}"))
            .collect::<Vec<_>>()
            .join("\n");
        let rendered = render_summary(&body, None).expect("render");
        assert!(rendered.page_count >= 3, "pages: {}", rendered.page_count);
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("temp file");
        file.write_all(&rendered.bytes).expect("write");
        file.flush().expect("flush");

        let text = extract_text(file.path()).expect("pdf text");
        let positions: Vec<usize> = ["line 000", "line 060", "line 119"]
            .iter()
            .map(|needle| text.find(needle).expect(needle))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{positions:?}");

        let document = Document::load_mem(&rendered.bytes).expect("reload");
        let second_page = document.extract_text(&[2]).expect("page 2");
        let first_line = second_page
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .expect("page 2 text");
        let start = text.find(first_line).expect("page 2 line in full text");
        assert!(start > 0);
        assert_eq!(&text[start - 1..start], "\n");
        assert!(text.ends_with(crate::render::FOOTER_TAGLINE), "{text}");
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("temp file");
        file.write_all(b"definitely not a pdf").expect("write");
        file.flush().expect("flush");

        let error = extract_text(file.path()).expect_err("parse error");
        assert!(matches!(
            error,
            ExtractionError::Parse {
                format: DocumentFormat::Pdf,
                ..
            }
        ));
    }
}
