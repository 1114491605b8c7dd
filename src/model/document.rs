//! Page / block / line / span structure produced by the decoder.

use serde::{Deserialize, Serialize};

use super::Rect;

/// A run of text sharing one font and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the font is bold
    #[serde(default)]
    pub bold: bool,
    /// Rotation in degrees, normalized to `[0, 360)`
    #[serde(default)]
    pub rotation: f32,
    /// Bounding box in page space
    pub bbox: Rect,
}

impl Span {
    /// Create an unrotated span.
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
            rotation: 0.0,
            bbox,
        }
    }

    /// Set the rotation angle (degrees, any range).
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees.rem_euclid(360.0);
        self
    }

    /// Check whether the span runs along one of the page axes
    /// (0°, 90°, 180° or 270°) within `tolerance` degrees.
    pub fn is_axis_aligned(&self, tolerance: f32) -> bool {
        [0.0f32, 90.0, 180.0, 270.0].iter().any(|base| {
            let diff = (self.rotation - base + 180.0).rem_euclid(360.0) - 180.0;
            diff.abs() <= tolerance
        })
    }

    /// Whether the trimmed text is empty.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Spans sharing a vertical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Spans in reading order
    pub spans: Vec<Span>,
    /// Bounding box covering all spans
    pub bbox: Rect,
}

impl Line {
    /// Create a line, deriving its bounding box from the spans.
    pub fn new(spans: Vec<Span>) -> Self {
        let bbox = spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        Self { spans, bbox }
    }

    /// Trimmed span texts joined with single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Mean span font size (0 for an empty line).
    pub fn average_font_size(&self) -> f32 {
        average_size(&self.spans)
    }

    /// Largest span font size (0 for an empty line).
    pub fn max_font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }
}

/// An ordered group of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub lines: Vec<Line>,
}

impl Block {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

/// A single page with its exclusion regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Text blocks in reading order
    pub blocks: Vec<Block>,
    /// Table regions
    #[serde(default)]
    pub tables: Vec<Rect>,
    /// Rectangles drawn on the page
    #[serde(default)]
    pub boxes: Vec<Rect>,
}

impl Page {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            tables: Vec::new(),
            boxes: Vec::new(),
        }
    }

    /// Create an empty US Letter page.
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Iterate over every line of the page.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Iterate over every span of the page.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines().flat_map(|l| l.spans.iter())
    }

    /// Check whether the centre of `bbox` lies inside a table region.
    pub fn in_table(&self, bbox: &Rect) -> bool {
        self.tables.iter().any(|t| t.contains_center_of(bbox))
    }

    /// Plain text of the page, one line per text line.
    pub fn plain_text(&self) -> String {
        self.lines()
            .map(|l| l.text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A decoded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

pub(crate) fn average_size(spans: &[Span]) -> f32 {
    if spans.is_empty() {
        return 0.0;
    }
    spans.iter().map(|s| s.font_size).sum::<f32>() / spans.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x0: f32, size: f32) -> Span {
        Span::new(text, size, false, Rect::new(x0, 100.0, x0 + 40.0, 100.0 + size))
    }

    #[test]
    fn test_line_bbox_and_text() {
        let line = Line::new(vec![span(" Hello ", 10.0, 12.0), span("", 50.0, 12.0), span("World", 60.0, 14.0)]);
        assert_eq!(line.text(), "Hello World");
        assert_eq!(line.bbox, Rect::new(10.0, 100.0, 100.0, 114.0));
        assert_eq!(line.max_font_size(), 14.0);
        assert!((line.average_font_size() - 12.666_667).abs() < 1e-4);
    }

    #[test]
    fn test_axis_alignment() {
        let base = span("x", 0.0, 10.0);
        assert!(base.clone().with_rotation(0.0).is_axis_aligned(5.0));
        assert!(base.clone().with_rotation(358.0).is_axis_aligned(5.0));
        assert!(base.clone().with_rotation(-88.0).is_axis_aligned(5.0));
        assert!(!base.clone().with_rotation(45.0).is_axis_aligned(5.0));
    }

    #[test]
    fn test_document_deserializes_with_defaults() {
        let json = r#"{"pages":[{"number":1,"width":612,"height":792,"blocks":[
            {"lines":[{"spans":[{"text":"Hi","font_size":12,"bbox":{"x0":0,"y0":0,"x1":10,"y1":12}}],
                        "bbox":{"x0":0,"y0":0,"x1":10,"y1":12}}]}]}]}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.page_count(), 1);
        let span = &doc.pages[0].blocks[0].lines[0].spans[0];
        assert!(!span.bold);
        assert_eq!(span.rotation, 0.0);
        assert!(doc.pages[0].tables.is_empty());
    }
}
