//! Input boundary: media-type validation ahead of the parser

use crate::error::{Error, Result};
use crate::parser::parse_csv;
use crate::rowset::RowSet;

/// Media types accepted as delimited/plain text
const ACCEPTED_MEDIA_TYPES: &[&str] = &["text/csv", "text/plain"];

/// Validate a declared media type, then parse the text into a RowSet.
///
/// Anything not declared as delimited/plain text is rejected before the
/// parser runs. The type check compares only the essence of the declaration,
/// so parameters like `text/csv; charset=utf-8` are accepted.
pub fn ingest(raw: &str, declared_media_type: &str) -> Result<RowSet> {
    let declared = declared_media_type.trim();
    let essence = declared.split(';').next().unwrap_or(declared).trim();

    if !ACCEPTED_MEDIA_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(essence))
    {
        return Err(Error::UnsupportedMediaType {
            declared: declared.to_string(),
        });
    }

    parse_csv(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_accepts_csv() {
        let rowset = ingest("a,b\n1,2\n", "text/csv").unwrap();
        assert_eq!(rowset.len(), 1);
    }

    #[test]
    fn test_ingest_accepts_plain_text_with_parameters() {
        assert!(ingest("a\n1\n", "text/plain; charset=utf-8").is_ok());
        assert!(ingest("a\n1\n", "Text/CSV").is_ok());
    }

    #[test]
    fn test_ingest_rejects_other_types() {
        let err = ingest("a\n1\n", "application/pdf").unwrap_err();
        match err {
            Error::UnsupportedMediaType { declared } => {
                assert_eq!(declared, "application/pdf");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ingest_rejection_happens_before_parsing() {
        // Even valid CSV text is rejected when the declared type is wrong
        let err = ingest("a,b\n1,2\n", "application/json").unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType { .. }));
    }
}
