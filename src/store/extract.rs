//! Text extraction from uploaded documents
//!
//! Pure functions from raw bytes to text, dispatched on the extension
//! the document was stored under.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

/// Upper bound on the decompressed size of `word/document.xml`
const MAX_DOCX_XML_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("pdf extraction failed: {0}")]
    Pdf(String),
    #[error("not a valid docx archive: {0}")]
    Docx(String),
    #[error("document.xml is not well-formed: {0}")]
    Xml(String),
    #[error("file is not valid utf-8")]
    Utf8,
}

/// Extract text from `bytes` according to the stored extension.
///
/// `txt` and `md` must be valid UTF-8. Unrecognized extensions fall
/// back to lossy conversion so legacy `.doc` uploads still yield
/// something askable.
pub fn extract_text(bytes: &[u8], extension: &str) -> Result<String, ExtractError> {
    match extension {
        "pdf" => pdf_text(bytes),
        "docx" => docx_text(bytes),
        "txt" | "md" => std::str::from_utf8(bytes)
            .map(ToString::to_string)
            .map_err(|_| ExtractError::Utf8),
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Collect the `w:t` text runs out of `word/document.xml`, one line
/// per `w:p` paragraph.
fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = Vec::new();
    entry
        .take(MAX_DOCX_XML_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut reader = Reader::from_reader(xml.as_slice());
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                text.push_str(&t.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ExtractError::Xml(e.to_string())),
        }
        buf.clear();
    }

    Ok(text.trim_end().to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Minimal OOXML container holding one `word/document.xml`.
    pub(crate) fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            let body: String = paragraphs
                .iter()
                .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
                .collect();
            write!(
                writer,
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
                 <w:body>{body}</w:body></w:document>"
            )
            .unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }
}
