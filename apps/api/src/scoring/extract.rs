//! Document text extraction for uploaded resumes.
//!
//! Dispatch is by file extension only; the bytes are never sniffed.

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format.")]
    UnsupportedFormat,

    #[error("Error extracting text: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    /// Also selected for `.doc`; only the XML-based format actually parses.
    Docx,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        match file_extension(filename).to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" | "doc" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

/// Text after the last `.`, or the whole name when there is none.
pub fn file_extension(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or(filename)
}

/// Extracts plain text from `bytes`, choosing a parser from `filename`'s extension.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    match DocumentFormat::from_filename(filename) {
        Some(DocumentFormat::Pdf) => extract_from_pdf(bytes),
        Some(DocumentFormat::Docx) => extract_from_docx(bytes),
        None => Err(ExtractError::UnsupportedFormat),
    }
}

/// Runs [`extract_text`] on the blocking pool. A parser panic becomes a parse error.
pub async fn extract_text_blocking(bytes: bytes::Bytes, filename: String) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, &filename))
        .await
        .map_err(|e| ExtractError::Parse(format!("parser aborted: {e}")))?
}

fn extract_from_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Parse(e.to_string()))?;
    Ok(pages.join("\n"))
}

fn extract_from_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    push_paragraph_text(children, &mut text);
    text
}

/// Hyperlinks nest their own runs, so their text is walked as well.
fn push_paragraph_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_text(&link.children, text),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut buf = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    fn pdf_fixture(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
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
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extension_is_text_after_last_dot() {
        assert_eq!(file_extension("jane.doe.resume.PDF"), "PDF");
        assert_eq!(file_extension("README"), "README");
        assert_eq!(file_extension("archive."), "");
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_filename("cv.PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_filename("cv.Docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_filename("cv.doc"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_filename("cv.txt"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = extract_text(b"anything", "resume.xyz").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat));
        assert_eq!(err.to_string(), "Unsupported file format.");
    }

    #[test]
    fn test_docx_paragraphs_joined_by_newline() {
        let bytes = docx_fixture(&["Jane Doe", "Senior Rust Engineer", "Kubernetes, Kafka"]);
        let text = extract_text(&bytes, "resume.docx").unwrap();
        assert_eq!(text, "Jane Doe\nSenior Rust Engineer\nKubernetes, Kafka");
    }

    #[test]
    fn test_docx_hyperlink_text_is_kept() {
        let contact = Paragraph::new()
            .add_run(Run::new().add_text("Email: "))
            .add_hyperlink(
                Hyperlink::new("contact", HyperlinkType::Anchor)
                    .add_run(Run::new().add_text("jane@example.io")),
            )
            .add_run(Run::new().add_text(" (preferred)"));
        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(contact)
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_text(&buf.into_inner(), "resume.docx").unwrap();
        assert_eq!(text, "Jane Doe\nEmail: jane@example.io (preferred)");
    }

    #[test]
    fn test_legacy_doc_fails_at_parse_time() {
        // OLE compound file magic, not a zip container.
        let bytes = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0, 0, 0, 0];
        let err = extract_text(&bytes, "resume.doc").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
        assert!(err.to_string().starts_with("Error extracting text: "));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let err = extract_text(b"definitely not a pdf", "resume.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn test_pdf_pages_in_order() {
        let bytes = pdf_fixture(&["FirstPage", "SecondPage"]);
        let text = extract_text(&bytes, "resume.pdf").unwrap();
        let first = text.find("FirstPage").expect("first page text");
        let second = text.find("SecondPage").expect("second page text");
        assert!(first < second, "pages out of order: {text:?}");
        assert!(text[first..second].contains('\n'));
    }

    #[tokio::test]
    async fn test_blocking_wrapper_returns_extractor_result() {
        let bytes = bytes::Bytes::from(docx_fixture(&["Hello"]));
        let text = extract_text_blocking(bytes, "cv.docx".into()).await.unwrap();
        assert_eq!(text, "Hello");
    }
}
