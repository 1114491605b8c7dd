//! Heading level inference from font size and weight.

use crate::model::{Document, HeadingLevel, Span};

/// Baseline used when a document has no text.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Infer a heading level from a span's size relative to the document average.
pub fn classify_by_formatting(span: &Span, average: f32) -> Option<HeadingLevel> {
    let ratio = if average > 0.0 {
        span.font_size / average
    } else {
        1.0
    };

    if ratio >= 1.4 || (span.bold && ratio >= 1.2) {
        Some(HeadingLevel::H1)
    } else if ratio >= 1.2 || (span.bold && ratio >= 1.0) {
        Some(HeadingLevel::H2)
    } else if span.bold && ratio >= 0.8 {
        Some(HeadingLevel::H3)
    } else {
        None
    }
}

/// Mean size of non-blank spans over the first `sample_pages` pages.
pub fn average_font_size(document: &Document, sample_pages: usize) -> f32 {
    let (sum, count) = document
        .pages
        .iter()
        .take(sample_pages)
        .flat_map(|page| page.spans())
        .filter(|span| !span.is_blank())
        .fold((0.0f32, 0usize), |(sum, count), span| {
            (sum + span.font_size, count + 1)
        });

    if count == 0 {
        DEFAULT_FONT_SIZE
    } else {
        sum / count as f32
    }
}
