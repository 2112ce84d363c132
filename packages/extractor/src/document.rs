//! Loading CDA documents into an immutable in-memory tree.

use std::fmt;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};

use crate::config::validate_document_path;
use crate::error::{ExtractorError, Result};

/// A parsed clinical document.
///
/// Borrows the source text for its whole lifetime and is never mutated,
/// so any number of queries may run against it, including from several
/// threads at once.
pub struct ClinicalDocument<'input> {
    tree: Document<'input>,
}

impl<'input> ClinicalDocument<'input> {
    /// Parse a document from XML text.
    ///
    /// Only well-formedness is checked. A well-formed document without the
    /// expected sections is valid and simply yields empty query results.
    ///
    /// # Examples
    /// ```
    /// use ccd_extractor::ClinicalDocument;
    ///
    /// let doc = ClinicalDocument::parse(r#"<ClinicalDocument xmlns="urn:hl7-org:v3"/>"#).unwrap();
    /// assert_eq!(doc.root().tag_name().name(), "ClinicalDocument");
    ///
    /// assert!(ClinicalDocument::parse("").is_err());
    /// assert!(ClinicalDocument::parse("<unclosed>").is_err());
    /// ```
    pub fn parse(text: &'input str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.trim().is_empty() {
            return Err(ExtractorError::MalformedDocument(
                "document is empty".to_string(),
            ));
        }

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let tree = Document::parse_with_options(text, options)?;

        tracing::info!(
            root = tree.root_element().tag_name().name(),
            nodes = tree.descendants().count(),
            "parsed clinical document"
        );

        Ok(Self { tree })
    }

    /// Parse a document from raw bytes, which must be UTF-8.
    pub fn from_bytes(bytes: &'input [u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            ExtractorError::MalformedDocument(format!("document is not valid UTF-8: {e}"))
        })?;
        Self::parse(text)
    }

    /// The document's root element.
    #[must_use]
    pub fn root(&self) -> Node<'_, 'input> {
        self.tree.root_element()
    }
}

impl fmt::Debug for ClinicalDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClinicalDocument")
            .field("root", &self.root().tag_name().name())
            .finish_non_exhaustive()
    }
}

/// Read a document file from disk.
///
/// The path must end in `.xml` and the file may not exceed `max_size` bytes.
/// The returned text is parsed with [`ClinicalDocument::parse`].
pub fn read_document(path: &Path, max_size: u64) -> Result<String> {
    validate_document_path(path)?;

    let size = fs::metadata(path)?.len();
    if size > max_size {
        return Err(ExtractorError::DocumentTooLarge {
            size,
            max: max_size,
        });
    }

    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), size, "read document");

    String::from_utf8(bytes).map_err(|e| {
        ExtractorError::MalformedDocument(format!(
            "{} is not valid UTF-8: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_document_is_send_and_sync() {
        assert_send_sync::<ClinicalDocument<'static>>();
    }

    #[test]
    fn test_parse_minimal() {
        let doc = ClinicalDocument::parse(r#"<ClinicalDocument xmlns="urn:hl7-org:v3"/>"#).unwrap();
        assert_eq!(doc.root().tag_name().namespace(), Some("urn:hl7-org:v3"));
    }

    #[test]
    fn test_parse_empty_is_malformed() {
        let err = ClinicalDocument::parse("   \n").unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_parse_ill_formed_is_malformed() {
        let err = ClinicalDocument::parse("<ClinicalDocument><section></ClinicalDocument>")
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_with_bom_and_stylesheet() {
        let xml = "\u{feff}<?xml version=\"1.0\"?>\n<?xml-stylesheet type=\"text/xsl\" href=\"cda.xsl\"?>\n<ClinicalDocument xmlns=\"urn:hl7-org:v3\"/>";
        assert!(ClinicalDocument::parse(xml).is_ok());
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        let err = ClinicalDocument::from_bytes(&[0x3c, 0xff, 0xfe, 0x3e]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_bytes() {
        let bytes = br#"<ClinicalDocument xmlns="urn:hl7-org:v3"><component/></ClinicalDocument>"#;
        let doc = ClinicalDocument::from_bytes(bytes).unwrap();
        assert_eq!(doc.root().tag_name().name(), "ClinicalDocument");
    }

    #[test]
    fn test_read_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patient.xml");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"<ClinicalDocument xmlns="urn:hl7-org:v3"/>"#).unwrap();

        let text = read_document(&path, 1024).unwrap();
        assert!(ClinicalDocument::parse(&text).is_ok());
    }

    #[test]
    fn test_read_document_too_large() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patient.xml");
        fs::write(&path, "<ClinicalDocument/>").unwrap();

        let err = read_document(&path, 4).unwrap_err();
        assert!(matches!(
            err,
            ExtractorError::DocumentTooLarge { size: 19, max: 4 }
        ));
    }

    #[test]
    fn test_read_document_rejects_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patient.txt");
        fs::write(&path, "<ClinicalDocument/>").unwrap();

        let err = read_document(&path, 1024).unwrap_err();
        assert!(matches!(err, ExtractorError::InvalidDocumentPath(_)));
    }
}
