use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document could not be read as a PDF: {0}")]
    Unreadable(String),

    #[error("no extractable text in document")]
    NoText,
}

/// Extracts plain text from PDF bytes.
///
/// A document that parses but yields only whitespace is `NoText`.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    if pdf_bytes.is_empty() {
        return Err(ExtractionError::NoText);
    }

    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_no_text() {
        assert!(matches!(extract_text(b""), Err(ExtractionError::NoText)));
    }

    #[test]
    fn test_non_pdf_bytes_are_unreadable() {
        assert!(matches!(
            extract_text(b"this is a plain text file, not a pdf"),
            Err(ExtractionError::Unreadable(_))
        ));
    }
}
