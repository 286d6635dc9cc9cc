//! PDF text extraction.
//!
//! The pipeline only accepts PDF input. [`is_pdf`] gates on the magic
//! header; a [`TextExtractor`] turns the bytes into one string per page and
//! [`normalize_pages`] folds those pages into a single whitespace-normalized
//! string.

use anyhow::{anyhow, Result};

/// Leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// True when `bytes` starts with the PDF magic header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts per-page text from a document.
///
/// Implementations return one entry per page, in page order. A page without
/// a text layer yields an empty (or whitespace-only) string, not an error.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>>;
}

/// [`TextExtractor`] backed by `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        // pdf-extract panics on some malformed documents. The default panic
        // hook still prints that panic to stderr before the error is returned.
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(anyhow!("PDF extraction failed: {}", e)),
            Err(_) => Err(anyhow!("PDF extraction failed: malformed document")),
        }
    }
}

/// Join pages with single spaces and collapse every whitespace run.
pub fn normalize_pages(pages: &[String]) -> String {
    pages
        .iter()
        .flat_map(|page| page.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal one-page PDF using the standard Helvetica font.
    fn minimal_pdf(content: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        let o1 = out.len();
        out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
        let o2 = out.len();
        out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
        let o3 = out.len();
        out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
        let o4 = out.len();
        out.extend_from_slice(
            format!(
                "4 0 obj << /Length {} >> stream\n{}\nendstream endobj\n",
                content.len(),
                content
            )
            .as_bytes(),
        );
        let o5 = out.len();
        out.extend_from_slice(
            b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
        );
        let xref_start = out.len();
        out.extend_from_slice(b"xref\n0 6\n");
        out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
        for offset in [o1, o2, o3, o4, o5] {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
        out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
        out.extend_from_slice(b"%%EOF\n");
        out
    }

    #[test]
    fn detects_pdf_header() {
        assert!(is_pdf(b"%PDF-1.7\n..."));
        assert!(!is_pdf(b"PK\x03\x04"));
        assert!(!is_pdf(b""));
        assert!(!is_pdf(b"%PD"));
    }

    #[test]
    fn normalize_collapses_whitespace_across_pages() {
        let pages = vec![
            "  First\tpage\n\ntext ".to_string(),
            String::new(),
            "second   page".to_string(),
        ];
        assert_eq!(normalize_pages(&pages), "First page text second page");
    }

    #[test]
    fn normalize_blank_pages_is_empty() {
        let pages = vec!["   ".to_string(), "\n".to_string()];
        assert_eq!(normalize_pages(&pages), "");
        assert_eq!(normalize_pages(&[]), "");
    }

    #[test]
    fn extracts_text_from_minimal_pdf() {
        let pdf = minimal_pdf("BT /F1 12 Tf 100 700 Td (extract test phrase) Tj ET");
        let pages = PdfExtractor.extract_pages(&pdf).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(normalize_pages(&pages).contains("extract test phrase"));
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let err = PdfExtractor.extract_pages(b"not a pdf").unwrap_err();
        assert!(err.to_string().contains("PDF extraction failed"));
    }
}
