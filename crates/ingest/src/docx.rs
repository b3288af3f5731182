//! Text extraction from DOCX case files.
//!
//! A DOCX file is a ZIP archive; the body text lives in `word/document.xml`
//! as runs of `<w:t>` inside `<w:p>` paragraph elements. We pull the text out
//! with a streaming XML reader and emit one line per paragraph.

use crate::error::LoaderError;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Extract the plain text of a .docx file, paragraph per line.
pub fn extract_docx_text(path: &Path) -> Result<String, LoaderError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| LoaderError::Malformed("missing word/document.xml".to_string()))?
        .read_to_string(&mut xml)?;

    document_xml_to_text(&xml)
}

fn document_xml_to_text(xml: &str) -> Result<String, LoaderError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => {
                in_text_run = true;
            }
            Event::End(e) if e.name().as_ref() == b"w:t" => {
                in_text_run = false;
            }
            Event::Text(t) if in_text_run => {
                out.push_str(&t.unescape()?);
            }
            // Paragraph boundaries become blank-line separators so that the
            // chunker can split on them
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                out.push_str("\n\n");
            }
            Event::Empty(e) if e.name().as_ref() == b"w:br" => {
                out.push('\n');
            }
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => {
                out.push('\t');
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.trim().to_string())
}
