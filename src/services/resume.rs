use thiserror::Error;

/// Errors that can occur while reading an uploaded resume
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Uploaded file is empty")]
    EmptyUpload,

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("No text could be extracted from the PDF")]
    NoText,
}

/// Extract the plain text of a PDF resume
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ResumeError> {
    if bytes.is_empty() {
        return Err(ResumeError::EmptyUpload);
    }

    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ResumeError::Pdf(e.to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ResumeError::NoText);
    }

    tracing::debug!("Extracted {} characters from PDF resume", text.len());
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload() {
        assert!(matches!(extract_pdf_text(&[]), Err(ResumeError::EmptyUpload)));
    }

    #[test]
    fn test_not_a_pdf() {
        assert!(matches!(
            extract_pdf_text(b"this is plain text, not a pdf"),
            Err(ResumeError::Pdf(_))
        ));
    }
}
