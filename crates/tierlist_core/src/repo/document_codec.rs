//! Portable document blob codec.
//!
//! # Responsibility
//! - Serialize a `Document` for download and durable storage.
//! - Decode user-supplied bytes into a validated `Document`.
//! - Describe which files the import flow accepts.
//!
//! # Invariants
//! - Decoding never mutates the decoded content; referential clean-up is
//!   the store's job.
//! - Duplicate ids are rejected, not silently merged.

use crate::model::document::{Document, DocumentValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Suggested file name for exported documents.
pub const EXPORT_FILE_NAME: &str = "tier-list.json";
/// MIME type of exported documents.
pub const EXPORT_MIME_TYPE: &str = "application/json";

const ACCEPTED_EXTENSION: &str = "json";
const ACCEPTED_MIME_TYPES: &[&str] = &["application/json", "text/json"];

/// Failure decoding or encoding a document blob.
#[derive(Debug)]
pub enum DocumentCodecError {
    /// Bytes are not JSON of the document shape.
    Malformed(serde_json::Error),
    /// JSON decoded but violates identity invariants.
    Invalid(DocumentValidationError),
}

impl Display for DocumentCodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed document: {err}"),
            Self::Invalid(err) => write!(f, "invalid document: {err}"),
        }
    }
}

impl Error for DocumentCodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for DocumentCodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

impl From<DocumentValidationError> for DocumentCodecError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Serializes the full document as compact JSON.
pub fn export_document(document: &Document) -> Result<Vec<u8>, DocumentCodecError> {
    Ok(serde_json::to_vec(document)?)
}

/// Parses and validates a document blob.
///
/// # Errors
/// - `Malformed` when bytes are not UTF-8 JSON with `tiers` and `things`.
/// - `Invalid` when tier or thing ids repeat.
pub fn import_document(bytes: &[u8]) -> Result<Document, DocumentCodecError> {
    let document: Document = serde_json::from_slice(bytes)?;
    document.validate()?;
    Ok(document)
}

/// Returns whether a picked file passes the import filter.
///
/// Accepts a `.json` extension (any case) or a JSON MIME type.
pub fn is_accepted_import(file_name: &str, mime_type: Option<&str>) -> bool {
    let extension_ok = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ACCEPTED_EXTENSION));
    let mime_ok = mime_type.is_some_and(|mime| {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        ACCEPTED_MIME_TYPES
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(essence))
    });
    extension_ok || mime_ok
}

#[cfg(test)]
mod tests {
    use super::{export_document, import_document, is_accepted_import, DocumentCodecError};
    use crate::model::document::Document;

    #[test]
    fn import_rejects_non_document_json() {
        let err = import_document(br#"{"tiers": []}"#).unwrap_err();
        assert!(matches!(err, DocumentCodecError::Malformed(_)));

        let err = import_document(b"not json").unwrap_err();
        assert!(matches!(err, DocumentCodecError::Malformed(_)));
    }

    #[test]
    fn export_writes_both_collections() {
        let bytes = export_document(&Document::with_default_tiers()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["tiers"].as_array().map(Vec::len), Some(6));
        assert_eq!(value["things"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["tiers"][0]["hexColor"], "#ff7f7e");
    }

    #[test]
    fn import_filter_matches_extension_or_mime() {
        assert!(is_accepted_import("list.JSON", None));
        assert!(is_accepted_import("export", Some("text/json")));
        assert!(is_accepted_import("export", Some("application/json; charset=utf-8")));
        assert!(!is_accepted_import("list.csv", Some("text/csv")));
        assert!(!is_accepted_import("json", None));
    }
}
