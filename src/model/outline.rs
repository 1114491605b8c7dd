//! Outline output types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse structural rank of a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text, normalized with a single trailing space
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl HeadingRecord {
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The externally observable artifact for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Document title (empty when none could be reconstructed)
    pub title: String,
    /// Headings sorted by page, then text
    pub outline: Vec<HeadingRecord>,
}

impl OutlineResult {
    /// The result reported for documents that could not be processed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }
}

/// A line suppressed because it belongs to a numbered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSequence {
    /// Text of the suppressed line
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of sibling lines sharing the major number
    pub sibling_count: usize,
    /// Texts of those siblings
    pub siblings: Vec<String>,
}

/// Outline plus the diagnostics collected while building it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineReport {
    pub result: OutlineResult,
    /// Numbered list items that were kept out of the outline
    pub lists: Vec<ListSequence>,
}
