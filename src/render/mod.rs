//! Summary export as a paginated A4 PDF.
//!
//! Documents are assembled directly with lopdf using the standard Helvetica faces, so no font
//! files are embedded. Line wrapping and centering rely on the Helvetica advance widths in
//! [`metrics`]. Apart from the `CreationDate` in the info dictionary, output is a pure function
//! of the inputs.

mod layout;
mod metrics;

use layout::{Align, PageLayout, TextStyle};
use lopdf::{Dictionary, Document, Object, Stream, content::Content, dictionary};
use thiserror::Error;
use time::{OffsetDateTime, macros::format_description};

/// Title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "Document Summary";
/// Subtitle printed under every title.
pub const SUBTITLE: &str = "Generated with DocDigest AI";
/// Bold first line of the footer block.
pub const FOOTER_HEADLINE: &str = "Summary generated with DocDigest";
/// Second line of the footer block.
pub const FOOTER_TAGLINE: &str = "Powered by AI";
/// MIME type of every rendered document.
pub const CONTENT_TYPE: &str = "application/pdf";
/// File name suggested to browsers downloading a rendered summary.
pub const DOWNLOAD_FILENAME: &str = "docdigest_summary.pdf";

pub(crate) const PAGE_WIDTH: f32 = 595.0;
pub(crate) const PAGE_HEIGHT: f32 = 842.0;
pub(crate) const MARGIN: f32 = 50.0;

const TITLE_STYLE: TextStyle = TextStyle {
    bold: true,
    size: 24.0,
    leading: 29.0,
    color: [0x25, 0x63, 0xeb],
};
const SUBTITLE_STYLE: TextStyle = TextStyle {
    bold: false,
    size: 12.0,
    leading: 14.4,
    color: [0x6b, 0x72, 0x80],
};
const BODY_STYLE: TextStyle = TextStyle {
    bold: false,
    size: 11.0,
    leading: 18.0,
    color: [0x11, 0x18, 0x27],
};
const FOOTER_BOLD_STYLE: TextStyle = TextStyle {
    bold: true,
    size: 9.0,
    leading: 11.0,
    color: [0x9c, 0xa3, 0xaf],
};
const FOOTER_STYLE: TextStyle = TextStyle {
    bold: false,
    ..FOOTER_BOLD_STYLE
};
const RULE_COLOR: [u8; 3] = [0xe5, 0xe7, 0xeb];

/// Errors raised while serializing a PDF.
#[derive(Debug, Error)]
pub enum RenderError {
    /// lopdf rejected the generated objects or content stream.
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    /// Writing the serialized document failed.
    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
    /// The creation timestamp could not be formatted.
    #[error("failed to format PDF date: {0}")]
    Date(#[from] time::error::Format),
}

/// A rendered PDF held in memory.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Serialized PDF bytes.
    pub bytes: Vec<u8>,
    /// Title that was printed at the top of the first page.
    pub title: String,
    /// Number of pages produced.
    pub page_count: usize,
}

impl RenderedDocument {
    /// MIME type of the payload.
    pub const fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Suggested attachment file name.
    pub const fn filename(&self) -> &'static str {
        DOWNLOAD_FILENAME
    }
}

/// Resolve the printed title: the trimmed custom title, or [`DEFAULT_TITLE`] when blank.
pub fn resolve_title(custom_title: Option<&str>) -> String {
    custom_title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

/// Render `body` under a centered title into a PDF.
///
/// Newlines in `body` become line breaks; an empty body yields an empty body section.
pub fn render_summary(
    body: &str,
    custom_title: Option<&str>,
) -> Result<RenderedDocument, RenderError> {
    let title = resolve_title(custom_title);

    let mut layout = PageLayout::new();
    layout.paragraph(&title, &TITLE_STYLE, Align::Center);
    layout.space(20.0);
    layout.paragraph(SUBTITLE, &SUBTITLE_STYLE, Align::Center);
    layout.space(30.0 + 21.6);
    for line in body.split('\n') {
        layout.paragraph(line.trim_end_matches('\r'), &BODY_STYLE, Align::Left);
    }
    layout.space(20.0 + 36.0);
    layout.rule(RULE_COLOR, 1.0);
    layout.space(30.0);
    layout.paragraph(FOOTER_HEADLINE, &FOOTER_BOLD_STYLE, Align::Center);
    layout.paragraph(FOOTER_TAGLINE, &FOOTER_STYLE, Align::Center);

    let pages = layout.finish();
    let page_count = pages.len();
    let bytes = assemble(&title, pages)?;
    tracing::debug!(page_count, bytes = bytes.len(), "Rendered summary PDF");

    Ok(RenderedDocument {
        bytes,
        title,
        page_count,
    })
}

fn assemble(title: &str, pages: Vec<Content>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(standard_font("Helvetica"));
    let bold_id = doc.add_object(standard_font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            layout::REGULAR_FONT => regular_id,
            layout::BOLD_FONT => bold_id,
        },
    });
    let media_box: Vec<Object> = vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];

    let mut kids = Vec::with_capacity(pages.len());
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let created = pdf_date(OffsetDateTime::now_utc())?;
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(layout::encode_win_ansi(title)),
        "Producer" => Object::string_literal("DocDigest"),
        "CreationDate" => Object::string_literal(created),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn standard_font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn pdf_date(now: OffsetDateTime) -> Result<String, RenderError> {
    Ok(now.format(format_description!(
        "D:[year][month][day][hour][minute][second]Z"
    ))?)
}
