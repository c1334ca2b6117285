//! Text extraction from declared document formats

use crate::error::ExtractionError;
use crate::input::file_detector::MediaType;
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::panic::{self, UnwindSafe};
use std::sync::Mutex;
use zip::ZipArchive;

type ExtractResult = std::result::Result<String, ExtractionError>;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractResult;
}

/// Extract plain text from `bytes` according to the declared media type.
///
/// Never panics and never returns an untyped failure: every problem is one of
/// the [`ExtractionError`] variants, whose display text is user-facing.
pub fn extract(bytes: &[u8], media_type: &MediaType) -> ExtractResult {
    debug!("Extracting {} bytes declared as {}", bytes.len(), media_type);
    match media_type {
        MediaType::Pdf => PdfExtractor.extract(bytes),
        MediaType::PlainText | MediaType::OctetStream => PlainTextExtractor.extract(bytes),
        MediaType::Docx => DocxExtractor.extract(bytes),
        MediaType::Other(mime) => Err(ExtractionError::Unsupported(mime.clone())),
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractResult {
        // pdf-extract panics on some malformed inputs
        let pages = catch_quietly(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| ExtractionError::Failed("PDF parser aborted on malformed input".to_string()))?
            .map_err(|e| ExtractionError::Failed(e.to_string()))?;

        debug!("PDF has {} pages", pages.len());
        join_pages(pages)
    }
}

static PANIC_HOOK: Mutex<()> = Mutex::new(());

/// Run `f`, turning a panic into `Err` without the default hook printing a
/// backtrace to stderr. The panic message is logged at debug level instead.
fn catch_quietly<T>(f: impl FnOnce() -> T + UnwindSafe) -> std::thread::Result<T> {
    // Hook swaps must not interleave or the silent hook could stay installed.
    let _guard = PANIC_HOOK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!("PDF parser panicked: {}", info)));
    let result = panic::catch_unwind(f);
    panic::set_hook(previous);

    result
}

/// Join per-page text with single spaces, skipping pages that produced nothing.
///
/// A document whose pages are all empty or whitespace is most likely a scan.
pub fn join_pages<I>(pages: I) -> ExtractResult
where
    I: IntoIterator<Item = String>,
{
    let text = pages
        .into_iter()
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.trim().is_empty() {
        return Err(ExtractionError::ScannedPdf);
    }
    Ok(text)
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractResult {
        String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Failed(e.to_string()))
    }
}

/// Word-processing documents: headers, body, then footers.
pub struct DocxExtractor;

const DOCX_BODY_PART: &str = "word/document.xml";

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractResult {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractionError::Failed(e.to_string()))?;

        let mut text = String::new();
        for part in Self::text_parts(&archive) {
            let mut xml = String::new();
            archive
                .by_name(&part)
                .map_err(|e| ExtractionError::Failed(format!("{}: {}", part, e)))?
                .read_to_string(&mut xml)
                .map_err(|e| ExtractionError::Failed(format!("{}: {}", part, e)))?;

            text.push_str(&self.xml_to_text(&xml)?);
        }

        Ok(text)
    }
}

impl DocxExtractor {
    fn text_parts<R: Read + std::io::Seek>(archive: &ZipArchive<R>) -> Vec<String> {
        let mut headers = Vec::new();
        let mut footers = Vec::new();
        for name in archive.file_names() {
            if !name.ends_with(".xml") {
                continue;
            }
            if name.starts_with("word/header") {
                headers.push(name.to_string());
            } else if name.starts_with("word/footer") {
                footers.push(name.to_string());
            }
        }
        headers.sort();
        footers.sort();

        let mut parts = headers;
        parts.push(DOCX_BODY_PART.to_string());
        parts.extend(footers);
        parts
    }

    fn xml_to_text(&self, xml: &str) -> ExtractResult {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        let mut run_depth = 0usize;
        let mut in_text = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ExtractionError::Failed(e.to_string()))?;

            match event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"r" => run_depth += 1,
                    b"t" => in_text = true,
                    _ => {}
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"r" => run_depth = run_depth.saturating_sub(1),
                    b"t" => in_text = false,
                    b"p" => text.push('\n'),
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    // tab stops in paragraph properties are not content
                    b"tab" if run_depth > 0 => text.push('\t'),
                    b"br" | b"cr" => text.push('\n'),
                    b"p" => text.push('\n'),
                    _ => {}
                },
                Event::Text(t) if in_text => {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| ExtractionError::Failed(e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Rust </w:t></w:r><w:r><w:t>&amp; Go</w:t></w:r></w:p>
    <w:p><w:r><w:t>Skills:</w:t><w:tab/><w:t>Kubernetes</w:t><w:br/><w:t>Terraform</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_plain_text_is_verbatim() {
        let text = extract("  Python, Go\n5 years backend ".as_bytes(), &MediaType::PlainText).unwrap();
        assert_eq!(text, "  Python, Go\n5 years backend ");
    }

    #[test]
    fn test_octet_stream_is_decoded_as_text() {
        let text = extract(b"plain bytes", &MediaType::OctetStream).unwrap();
        assert_eq!(text, "plain bytes");
    }

    #[test]
    fn test_invalid_utf8_is_an_extraction_failure() {
        let err = extract(&[0xff, 0xfe, 0x00], &MediaType::PlainText).unwrap_err();
        assert!(matches!(err, ExtractionError::Failed(_)));
        assert!(err.to_string().starts_with("Error extracting text:"));
    }

    #[test]
    fn test_unsupported_type_names_the_type() {
        let err = extract(b"\x89PNG", &MediaType::from_mime("image/png")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: image/png");
    }

    #[test]
    fn test_empty_pdf_pages_report_scanned_document() {
        let err = join_pages(vec![String::new(), String::new()]).unwrap_err();
        assert_eq!(err, ExtractionError::ScannedPdf);

        let err = join_pages(vec!["   ".to_string(), "\n".to_string()]).unwrap_err();
        assert_eq!(err, ExtractionError::ScannedPdf);

        assert_eq!(join_pages(Vec::<String>::new()).unwrap_err(), ExtractionError::ScannedPdf);
    }

    #[test]
    fn test_pdf_pages_joined_with_single_space_skipping_empty() {
        let text = join_pages(vec![
            "Page one".to_string(),
            String::new(),
            "Page three".to_string(),
        ])
        .unwrap();
        assert_eq!(text, "Page one Page three");
    }

    #[test]
    fn test_garbage_pdf_is_a_failure_not_a_panic() {
        let err = extract(b"definitely not a pdf", &MediaType::Pdf).unwrap_err();
        assert!(matches!(err, ExtractionError::Failed(_)));
    }

    #[test]
    fn test_parser_panic_is_caught() {
        let result = catch_quietly(|| -> u32 { panic!("malformed xref") });
        assert!(result.is_err());

        assert_eq!(catch_quietly(|| 7).unwrap(), 7);
    }

    #[test]
    fn test_blank_pdf_reports_scanned_document() {
        let bytes = std::fs::read("tests/fixtures/blank_scan.pdf").unwrap();
        assert_eq!(extract(&bytes, &MediaType::Pdf).unwrap_err(), ExtractionError::ScannedPdf);
    }

    #[test]
    fn test_pdf_empty_middle_page_is_skipped() {
        let bytes = std::fs::read("tests/fixtures/three_pages.pdf").unwrap();
        let text = extract(&bytes, &MediaType::Pdf).unwrap();

        let one = text.find("Hello Page One").unwrap() + "Hello Page One".len();
        let three = text.find("Page Three").unwrap();
        let between = &text[one..three];
        assert_eq!(between.matches(' ').count(), 1, "text: {:?}", text);
        assert!(between.trim().is_empty());
    }

    #[test]
    fn test_docx_visible_text() {
        let bytes = build_docx(&[(DOCX_BODY_PART, BODY)]);
        let text = extract(&bytes, &MediaType::Docx).unwrap();

        assert_eq!(text, "Jane Doe\nRust & Go\nSkills:\tKubernetes\nTerraform\n");
    }

    #[test]
    fn test_docx_headers_and_footers_wrap_body() {
        let header = r#"<w:hdr xmlns:w="w"><w:p><w:r><w:t>HEADER</w:t></w:r></w:p></w:hdr>"#;
        let footer = r#"<w:ftr xmlns:w="w"><w:p><w:r><w:t>FOOTER</w:t></w:r></w:p></w:ftr>"#;
        let bytes = build_docx(&[
            ("word/footer1.xml", footer),
            (DOCX_BODY_PART, BODY),
            ("word/header1.xml", header),
        ]);

        let text = extract(&bytes, &MediaType::Docx).unwrap();
        assert!(text.starts_with("HEADER\n"));
        assert!(text.ends_with("FOOTER\n"));
        assert!(text.contains("Jane Doe"));
    }

    #[test]
    fn test_docx_missing_body_is_a_failure() {
        let bytes = build_docx(&[("word/styles.xml", "<w:styles/>")]);
        let err = extract(&bytes, &MediaType::Docx).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_docx_not_a_zip_is_a_failure() {
        let err = extract(b"PK but not really", &MediaType::Docx).unwrap_err();
        assert!(matches!(err, ExtractionError::Failed(_)));
    }
}
