//! PDF decoding into the page model.

mod boxes;
mod layout;
mod options;
mod pdf_parser;
mod table_detector;

pub use boxes::BoxCollector;
pub use layout::{LayoutAnalyzer, TextLine, TextSpan};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig, TableRowData};
