//! Document reading: extract plain text from a PDF or text file.
//!
//! Format is decided by the file extension alone; content is never sniffed.
//! An unknown extension fails immediately with [`McqGenError::UnsupportedFormat`]
//! so the caller can report the problem before any work is done.

use crate::error::McqGenError;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Extract the text content of `path`.
///
/// * `.pdf` — text of every page in document order, concatenated with no
///   separator. A page that fails extraction fails the whole read.
/// * `.txt` — the file's bytes decoded as strict UTF-8, returned verbatim.
/// * anything else — [`McqGenError::UnsupportedFormat`], no partial read.
pub fn read_file(path: impl AsRef<Path>) -> Result<String, McqGenError> {
    let path = path.as_ref();
    let name = display_name(path);

    match extension_of(path).as_deref() {
        Some("pdf") => {
            let doc = Document::load(path).map_err(|e| map_open_error(path, e))?;
            extract_pdf_text(&doc, &name)
        }
        Some("txt") => {
            let bytes = std::fs::read(path).map_err(|e| map_io_error(path, e))?;
            decode_utf8(bytes, &name)
        }
        other => Err(McqGenError::UnsupportedFormat {
            name,
            extension: other.unwrap_or("").to_string(),
        }),
    }
}

/// Extract text from an in-memory upload: a file name plus its bytes.
///
/// Same extension and decoding contract as [`read_file`]; nothing touches
/// the filesystem.
pub fn read_named_bytes(name: &str, bytes: &[u8]) -> Result<String, McqGenError> {
    match extension_of(Path::new(name)).as_deref() {
        Some("pdf") => {
            let doc = Document::load_mem(bytes).map_err(|e| McqGenError::PdfExtraction {
                name: name.to_string(),
                detail: e.to_string(),
            })?;
            extract_pdf_text(&doc, name)
        }
        Some("txt") => decode_utf8(bytes.to_vec(), name),
        other => Err(McqGenError::UnsupportedFormat {
            name: name.to_string(),
            extension: other.unwrap_or("").to_string(),
        }),
    }
}

/// Lower-cased file extension, if any.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Walk the page table in document order and concatenate each page's text.
fn extract_pdf_text(doc: &Document, name: &str) -> Result<String, McqGenError> {
    let mut text = String::new();
    for (page_num, _object_id) in doc.get_pages() {
        let page_text = doc
            .extract_text(&[page_num])
            .map_err(|e| McqGenError::PdfExtraction {
                name: name.to_string(),
                detail: format!("page {page_num}: {e}"),
            })?;
        text.push_str(&page_text);
    }
    debug!("Extracted {} chars of PDF text from '{}'", text.len(), name);
    Ok(text)
}

fn decode_utf8(bytes: Vec<u8>, name: &str) -> Result<String, McqGenError> {
    String::from_utf8(bytes).map_err(|e| McqGenError::InvalidUtf8 {
        name: name.to_string(),
        detail: e.to_string(),
    })
}

fn map_io_error(path: &Path, e: std::io::Error) -> McqGenError {
    match e.kind() {
        std::io::ErrorKind::NotFound => McqGenError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => McqGenError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => McqGenError::Internal(format!("read '{}': {e}", path.display())),
    }
}

fn map_open_error(path: &Path, e: lopdf::Error) -> McqGenError {
    // lopdf wraps the io::Error for missing files; recover the distinction
    // so the caller sees FileNotFound rather than a parse failure.
    if let lopdf::Error::IO(ref io_err) = e {
        match io_err.kind() {
            std::io::ErrorKind::NotFound => {
                return McqGenError::FileNotFound {
                    path: path.to_path_buf(),
                }
            }
            std::io::ErrorKind::PermissionDenied => {
                return McqGenError::PermissionDenied {
                    path: path.to_path_buf(),
                }
            }
            _ => {}
        }
    }
    McqGenError::PdfExtraction {
        name: display_name(path),
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn txt_read_is_utf8_identity() {
        let mut f = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let content = "Photosynthesis converts light into chemical energy.\nLine two. Ünïcödé.";
        f.write_all(content.as_bytes()).unwrap();

        let text = read_file(f.path()).unwrap();
        assert_eq!(text, content);
    }

    #[test]
    fn txt_rejects_invalid_utf8() {
        let mut f = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        f.write_all(&[0xFF, 0xFE, 0x00, 0x80]).unwrap();

        let err = read_file(f.path()).unwrap_err();
        assert!(matches!(err, McqGenError::InvalidUtf8 { .. }), "got: {err}");
    }

    #[test]
    fn unsupported_extension_fails_without_reading() {
        let mut f = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        f.write_all(b"irrelevant").unwrap();

        let err = read_file(f.path()).unwrap_err();
        match err {
            McqGenError::UnsupportedFormat { extension, .. } => {
                assert_eq!(extension, "docx");
            }
            other => panic!("expected UnsupportedFormat, got: {other}"),
        }
    }

    #[test]
    fn extension_with_no_suffix_is_unsupported() {
        let err = read_named_bytes("README", b"plain text").unwrap_err();
        assert!(matches!(err, McqGenError::UnsupportedFormat { .. }));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let text = read_named_bytes("NOTES.TXT", "hello".as_bytes()).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = read_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, McqGenError::FileNotFound { .. }), "got: {err}");
    }

    #[test]
    fn garbage_pdf_is_extraction_failure() {
        let err = read_named_bytes("broken.pdf", b"not a pdf at all").unwrap_err();
        assert!(matches!(err, McqGenError::PdfExtraction { .. }), "got: {err}");
    }
}
