//! # pdf-outline
//!
//! Title and heading-outline inference for PDF documents.
//!
//! The crate decodes a PDF into a page model (pages, blocks, lines and
//! styled spans with bounding boxes) and infers a structured outline from
//! it: a document title plus H1/H2/H3 headings with page numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multilingual rules**: English, Japanese, Chinese, Spanish, French,
//!   German, Arabic, Korean and Russian heading keywords and noise filters
//! - **Decoder independent**: anything that builds a [`model::Document`]
//!   can be analyzed
//! - **List suppression**: numbered list items are kept out of the outline
//! - **Batch processing**: directories of PDFs in parallel with Rayon

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

pub use batch::{process_batch, BatchOptions, BatchSummary};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    Block, Document, HeadingLevel, HeadingRecord, Line, ListSequence, OutlineReport,
    OutlineResult, Page, Rect, Span,
};
pub use outline::{AnalysisConfig, Lang};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use render::JsonFormat;

use std::path::Path;

/// Decode a PDF file into the page model.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::parse_file;
///
/// let doc = parse_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    PdfParser::open(path)?.parse()
}

/// Decode a PDF held in memory into the page model.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    PdfParser::from_bytes(data)?.parse()
}

/// Infer the outline of an already decoded document with default thresholds.
pub fn analyze(document: &Document) -> OutlineResult {
    outline::analyze(document, &AnalysisConfig::default()).result
}

/// Extract the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// for heading in &outline.outline {
///     println!("{} {} (p. {})", heading.level, heading.text, heading.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    OutlineExtractor::new().extract(path)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_bytes(data: &[u8]) -> Result<OutlineResult> {
    OutlineExtractor::new().extract_bytes(data)
}

/// Builder for decoding PDFs and inferring their outlines.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{AnalysisConfig, OutlineExtractor};
///
/// let outline = OutlineExtractor::new()
///     .strict()
///     .with_config(AnalysisConfig::default().with_first_page_max_size(18.0))
///     .extract("document.pdf")?;
/// # Ok::<(), pdf_outline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    parse_options: ParseOptions,
    config: AnalysisConfig,
}

impl OutlineExtractor {
    /// Create a new extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip undecodable pages instead of failing.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Fail on the first undecodable page.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Set the decoder options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the analysis thresholds.
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Infer the outline of a decoded document, with list diagnostics.
    pub fn analyze(&self, document: &Document) -> OutlineReport {
        outline::analyze(document, &self.config)
    }

    /// Decode a PDF file and return the outline with diagnostics.
    pub fn extract_report<P: AsRef<Path>>(&self, path: P) -> Result<OutlineReport> {
        let path = path.as_ref();
        let document = PdfParser::open_with_options(path, self.parse_options.clone())?.parse()?;
        log::info!(
            "Decoded {} ({} pages)",
            path.display(),
            document.page_count()
        );
        Ok(self.analyze(&document))
    }

    /// Decode a PDF file and return its outline.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<OutlineResult> {
        Ok(self.extract_report(path)?.result)
    }

    /// Decode a PDF held in memory and return its outline.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<OutlineResult> {
        let document =
            PdfParser::from_bytes_with_options(data, self.parse_options.clone())?.parse()?;
        Ok(self.analyze(&document).result)
    }

    /// Like [`extract`](Self::extract), but a failure yields the empty result.
    pub fn extract_or_empty<P: AsRef<Path>>(&self, path: P) -> OutlineResult {
        let path = path.as_ref();
        self.extract(path).unwrap_or_else(|e| {
            log::error!("Failed to process {}: {}", path.display(), e);
            OutlineResult::empty()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_empty_document() {
        let result = analyze(&Document::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_extract_or_empty_on_missing_file() {
        let result = OutlineExtractor::new().extract_or_empty("/nonexistent/file.pdf");
        assert_eq!(result, OutlineResult::empty());
    }

    #[test]
    fn test_extract_bytes_rejects_garbage() {
        assert!(matches!(
            extract_outline_bytes(b"garbage"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_extractor_builder() {
        let extractor = OutlineExtractor::new().strict();
        assert_eq!(extractor.parse_options.error_mode, ErrorMode::Strict);
    }
}
