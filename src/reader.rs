//! Local file reading for the supported document formats.
//!
//! Dispatch is a closed enum over the known extensions, so adding or removing a
//! format is a compile-checked change rather than a lookup-table edit.

use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("unsupported file type: {extension}")]
    UnsupportedType { extension: String },
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to extract PDF text: {0}")]
    Pdf(#[from] pdf_extract::OutputError),
    #[error("failed to open document archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to parse document XML: {0}")]
    DocxParse(String),
}

/// The document formats suma can extract text from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Text,
    Pdf,
    Docx,
}

impl FileFormat {
    /// Determine the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, ReaderError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" => Ok(FileFormat::Text),
            "pdf" => Ok(FileFormat::Pdf),
            "docx" => Ok(FileFormat::Docx),
            _ => Err(ReaderError::UnsupportedType { extension }),
        }
    }
}

/// Extract the text content of a single file, dispatching on its extension
pub fn read_any_file(path: &Path) -> Result<String, ReaderError> {
    match FileFormat::from_path(path)? {
        FileFormat::Text => read_txt(path),
        FileFormat::Pdf => read_pdf(path),
        FileFormat::Docx => read_docx(path),
    }
}

/// Best-effort UTF-8 read; invalid byte sequences are replaced, never fatal
fn read_txt(path: &Path) -> Result<String, ReaderError> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Page-wise PDF text extraction. Pages without extractable text contribute
/// blank lines rather than errors.
fn read_pdf(path: &Path) -> Result<String, ReaderError> {
    Ok(pdf_extract::extract_text(path)?)
}

/// Extract paragraph text from a `.docx` archive (`word/document.xml`),
/// joining paragraphs with newlines. Legacy `.doc` is not supported.
fn read_docx(path: &Path) -> Result<String, ReaderError> {
    use quick_xml::events::Event;

    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ReaderError::DocxParse(e.to_string()))?;

        match event {
            Event::Start(ref e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Text(ref t) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ReaderError::DocxParse(e.to_string()))?;
                current.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
