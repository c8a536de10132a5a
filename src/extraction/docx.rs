use super::{DocumentFormat, ExtractionError};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const TEXT_BOX_CONTENT: &[u8] = b"txbxContent";

/// Extract paragraph text in document order, one newline between paragraphs.
pub(super) fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(parse_error)?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(parse_error)?
        .read_to_string(&mut xml)
        .map_err(parse_error)?;

    let paragraphs = collect_paragraphs(&xml)?;
    tracing::trace!(paragraphs = paragraphs.len(), "Read DOCX paragraphs");
    Ok(paragraphs.join("\n").trim().to_string())
}

/// Walk the WordprocessingML body, gathering the text runs of each `<w:p>`.
///
/// Text boxes (`<w:txbxContent>`) carry their own paragraphs nested inside a run of the
/// surrounding paragraph; their subtrees are skipped so only body-level paragraphs are read.
fn collect_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_run = false;
    let mut in_text_run = false;
    let mut text_box_depth = 0usize;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(element) if text_box_depth > 0 => {
                if element.local_name().as_ref() == TEXT_BOX_CONTENT {
                    text_box_depth += 1;
                }
            }
            Event::End(element) if text_box_depth > 0 => {
                if element.local_name().as_ref() == TEXT_BOX_CONTENT {
                    text_box_depth -= 1;
                }
            }
            _ if text_box_depth > 0 => {}
            Event::Start(element) => match element.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"r" => in_run = true,
                b"t" => in_text_run = true,
                name if name == TEXT_BOX_CONTENT => text_box_depth = 1,
                _ => {}
            },
            Event::Empty(element) => {
                if let Some(paragraph) = current.as_mut().filter(|_| in_run) {
                    match element.local_name().as_ref() {
                        b"tab" => paragraph.push('\t'),
                        b"br" | b"cr" => paragraph.push('\n'),
                        _ => {}
                    }
                }
                if element.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Event::Text(text) if in_text_run => {
                let content = text.unescape().map_err(parse_error)?;
                current
                    .get_or_insert_with(String::new)
                    .push_str(&content);
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"r" => in_run = false,
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parse_error(error: impl ToString) -> ExtractionError {
    ExtractionError::parse(DocumentFormat::Docx, error)
}
