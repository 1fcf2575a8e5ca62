//! Text extraction for source documents.
//!
//! Extraction is a collaborator concern: the pipeline only requires one
//! ordered UTF-8 text stream per document, NFC-normalized. Two strategies
//! are provided — direct PDF text extraction for born-digital files, and an
//! external OCR command for scanned ones. Which one runs is configuration,
//! not code.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Result};

use crate::config::ExtractionConfig;
use crate::normalize::nfc;

/// Extraction error. A failure skips the document; the folder pass continues.
#[derive(Debug)]
pub enum ExtractError {
    Pdf(String),
    Ocr(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::Ocr(e) => write!(f, "OCR extraction failed: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Produces one ordered text stream per document.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Direct text extraction from born-digital PDFs.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf(e.to_string()))?;
        Ok(nfc(&text))
    }
}

/// Runs an external OCR command for scanned PDFs.
///
/// The argv template substitutes `{input}` with the document path; the
/// command must print the recognized text to stdout.
pub struct OcrCommandExtractor {
    argv: Vec<String>,
}

impl OcrCommandExtractor {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl TextExtractor for OcrCommandExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let input = path.to_string_lossy();
        let argv: Vec<String> = self
            .argv
            .iter()
            .map(|arg| arg.replace("{input}", &input))
            .collect();
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ExtractError::Ocr("empty OCR command".to_string()))?;

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ExtractError::Ocr(format!("{}: {}", program, e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(nfc(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Instantiate the extractor named by the configuration.
pub fn create_extractor(config: &ExtractionConfig) -> Result<Box<dyn TextExtractor>> {
    match config.strategy.as_str() {
        "text" => Ok(Box::new(PdfTextExtractor)),
        "ocr" => {
            if config.ocr_command.is_empty() {
                bail!("extraction.ocr_command must be set when strategy is 'ocr'");
            }
            Ok(Box::new(OcrCommandExtractor::new(
                config.ocr_command.clone(),
            )))
        }
        other => bail!(
            "Unknown extraction strategy: '{}'. Use text or ocr.",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_command_substitutes_input_path() {
        let extractor = OcrCommandExtractor::new(vec![
            "echo".to_string(),
            "scanned:{input}".to_string(),
        ]);
        let text = extractor.extract(Path::new("/tmp/doc.pdf")).unwrap();
        assert_eq!(text.trim(), "scanned:/tmp/doc.pdf");
    }

    #[test]
    fn ocr_failure_reports_status() {
        let extractor = OcrCommandExtractor::new(vec!["false".to_string()]);
        let err = extractor.extract(Path::new("/tmp/doc.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-pdf.pdf");
        std::fs::write(&path, "plain text, not a pdf").unwrap();
        let err = PdfTextExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
