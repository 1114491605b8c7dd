//! Span, line and block reconstruction from page content streams.
//!
//! Content is read in PDF user space (origin bottom-left). Spans are grouped
//! into lines by baseline and lines into blocks by spacing, then converted to
//! the top-left page space of [`crate::model`].

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{Block, Line, Rect, Span};

/// A decoded text-showing operation in PDF user space.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content, NFC normalized
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Baseline angle in degrees, `[0, 360)`
    pub rotation: f32,
}

impl TextSpan {
    /// Create a new text span; width is estimated from the character count.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let width = text.chars().count() as f32 * font_size * 0.5;

        Self {
            text,
            x,
            y,
            width,
            font_size,
            font_name,
            is_bold,
            rotation: 0.0,
        }
    }

    /// Set the baseline angle.
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees.rem_euclid(360.0);
        self
    }

    /// Get the bottom Y coordinate (approximate, based on font size).
    pub fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }

    /// Get the top Y coordinate (approximate, based on font size).
    pub fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Convert to a model span on a page of the given height.
    pub fn to_span(&self, page_height: f32) -> Span {
        let bbox = Rect::new(
            self.x,
            page_height - self.top(),
            self.right(),
            page_height - self.bottom(),
        );
        Span::new(self.text.clone(), self.font_size, self.is_bold, bbox).with_rotation(self.rotation)
    }
}

/// Spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    /// Baseline of the first span
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Dominant font size, weighted by text length
    pub font_size: f32,
}

impl TextLine {
    /// Create a line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));

        let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum();
        let font_size = match (total_chars, spans.first()) {
            (0, Some(first)) => first.font_size,
            (0, None) => 0.0,
            _ => weighted / total_chars as f32,
        };
        let (x, y) = spans.first().map(|s| (s.x, s.y)).unwrap_or_default();

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Join spans that belong to one word run.
    ///
    /// Consecutive spans with the same style and no visible gap are
    /// concatenated; kerning often splits a word across several `TJ`
    /// strings.
    pub fn merged_spans(&self) -> Vec<TextSpan> {
        let mut merged: Vec<TextSpan> = Vec::new();

        for span in &self.spans {
            if let Some(prev) = merged.last_mut() {
                let same_style = prev.is_bold == span.is_bold
                    && (prev.font_size - span.font_size).abs() < 0.5
                    && (prev.rotation - span.rotation).abs() < 0.5;
                let char_count = span.text.chars().count().max(1);
                let threshold = span.width / char_count as f32 * 0.2;
                let gap = span.x - prev.right();

                if same_style && gap <= threshold {
                    prev.text.push_str(&span.text);
                    prev.width = span.right() - prev.x;
                    continue;
                }

                let both_cjk = prev.text.chars().last().is_some_and(is_spaceless_script_char)
                    && span.text.chars().next().is_some_and(is_spaceless_script_char);
                if same_style && both_cjk {
                    prev.text.push_str(&span.text);
                    prev.width = span.right() - prev.x;
                    continue;
                }
            }
            merged.push(span.clone());
        }

        merged
    }

    /// Convert to a model line on a page of the given height.
    pub fn to_line(&self, page_height: f32) -> Line {
        Line::new(
            self.merged_spans()
                .iter()
                .map(|s| s.to_span(page_height))
                .collect(),
        )
    }
}

/// Text-state tracking for one content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    /// Start of the current line
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn reset(&mut self) {
        let leading = self.leading;
        *self = Self::default();
        self.leading = leading;
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        let leading = if self.leading > 0.0 { self.leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    /// Move the pen along the baseline after showing text.
    fn advance(&mut self, width: f32) {
        self.e += width * self.a;
        self.f += width * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn rotation(&self) -> f32 {
        self.b.atan2(self.a).to_degrees()
    }
}

/// Reads text spans from content streams and rebuilds lines and blocks.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Map font resource names to base font names for a page.
    pub fn page_fonts(&self, page_id: ObjectId) -> Result<HashMap<Vec<u8>, String>> {
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(fonts
            .iter()
            .map(|(name, font)| {
                let base_font = font
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                (name.clone(), base_font)
            })
            .collect())
    }

    /// Decode the text-showing operators of a content stream.
    pub fn extract_spans(&self, content: &Content, fonts: &HashMap<Vec<u8>, String>) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut font_name = String::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in &content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    matrix.reset();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            font_name = fonts
                                .get(name)
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            matrix.leading = -ty;
                        }
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        matrix.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }

                    let text = match op.operator.as_str() {
                        "TJ" => match op.operands.first() {
                            Some(Object::Array(items)) => decode_tj_array(items),
                            _ => String::new(),
                        },
                        "\"" => op.operands.get(2).map(decode_string).unwrap_or_default(),
                        _ => op.operands.first().map(decode_string).unwrap_or_default(),
                    };

                    if text.trim().is_empty() {
                        continue;
                    }

                    let text: String = text.nfc().collect();
                    let (x, y) = matrix.position();
                    let size = font_size * matrix.scale();
                    let span = TextSpan::new(text, x, y, size, font_name.clone())
                        .with_rotation(matrix.rotation());
                    matrix.advance(span.width / matrix.scale().max(f32::EPSILON));
                    spans.push(span);
                }
                _ => {}
            }
        }

        spans
    }

    /// Group spans into lines based on baseline position, top to bottom.
    pub fn group_spans_into_lines(&self, mut spans: Vec<TextSpan>) -> Vec<TextLine> {
        spans.sort_by(|a, b| b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x)));

        let mut lines: Vec<TextLine> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let tolerance = span.font_size * 0.3;
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            lines.push(TextLine::from_spans(current));
        }

        lines
    }

    /// Group lines into blocks (paragraphs) based on spacing.
    pub fn group_lines_into_blocks(&self, lines: Vec<TextLine>) -> Vec<Vec<TextLine>> {
        let avg_spacing = average_line_spacing(&lines);
        let mut blocks: Vec<Vec<TextLine>> = Vec::new();
        let mut current: Vec<TextLine> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if should_break_block(prev, &line, avg_spacing) {
                    blocks.push(std::mem::take(&mut current));
                }
            }
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(current);
        }

        blocks
    }

    /// Build model blocks from spans for a page of the given height.
    pub fn build_blocks(&self, spans: Vec<TextSpan>, page_height: f32) -> Vec<Block> {
        let lines = self.group_spans_into_lines(spans);
        log::debug!("Grouped spans into {} lines", lines.len());

        self.group_lines_into_blocks(lines)
            .into_iter()
            .map(|lines| Block::new(lines.iter().map(|l| l.to_line(page_height)).collect()))
            .collect()
    }
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        12.0
    } else {
        spacings.iter().sum::<f32>() / spacings.len() as f32
    }
}

/// Determine if a new block should start.
fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    // paragraph gap
    if (prev.y - curr.y).abs() > avg_spacing * 1.5 {
        return true;
    }
    if (prev.font_size - curr.font_size).abs() > 1.0 {
        return true;
    }
    // indentation change
    (prev.x - curr.x).abs() > 20.0
}

fn decode_string(obj: &Object) -> String {
    match obj {
        Object::String(bytes, _) => decode_text_simple(bytes),
        _ => String::new(),
    }
}

/// Decode a `TJ` array, turning large negative adjustments into spaces.
fn decode_tj_array(items: &[Object]) -> String {
    // 1/1000 text space units; about a word space for most fonts
    const SPACE_THRESHOLD: f32 = 200.0;

    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode_text_simple(bytes)),
            other => {
                let Some(n) = get_number(other) else {
                    continue;
                };
                let needs_space = -n > SPACE_THRESHOLD
                    && !combined.ends_with(' ')
                    && !combined.ends_with('\u{00A0}')
                    && combined
                        .chars()
                        .last()
                        .is_some_and(|c| !is_spaceless_script_char(c));
                if needs_space {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

/// Helper to extract number from PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{20000}'..='\u{2A6DF}'
        | '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{3000}'..='\u{303F}')
}

/// Simple text decoding: UTF-16BE with BOM, then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    fn text_span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, size, "Helvetica".to_string())
    }

    fn analyze(operations: Vec<Operation>) -> Vec<TextSpan> {
        let doc = LopdfDocument::with_version("1.5");
        let analyzer = LayoutAnalyzer::new(&doc);
        let mut fonts = HashMap::new();
        fonts.insert(b"F1".to_vec(), "Helvetica-Bold".to_string());
        analyzer.extract_spans(&Content { operations }, &fonts)
    }

    #[test]
    fn test_text_span_bold_detection() {
        let span = TextSpan::new("T".into(), 0.0, 0.0, 12.0, "Arial-BoldMT".into());
        assert!(span.is_bold);
        let span = TextSpan::new("T".into(), 0.0, 0.0, 12.0, "Helvetica-Black".into());
        assert!(span.is_bold);
        let span = TextSpan::new("T".into(), 0.0, 0.0, 12.0, "TimesNewRoman".into());
        assert!(!span.is_bold);
    }

    #[test]
    fn test_to_span_flips_y_axis() {
        let span = text_span("Title", 72.0, 700.0, 20.0).to_span(792.0);
        assert_eq!(span.bbox.x0, 72.0);
        assert!((span.bbox.y0 - 76.0).abs() < 1e-3);
        assert!((span.bbox.y1 - 96.0).abs() < 1e-3);
        assert_eq!(span.bbox.width(), 50.0);
    }

    #[test]
    fn test_extract_spans_tracks_font_and_position() {
        let spans = analyze(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(18)]),
            Operation::new("Td", vec![Object::Integer(72), Object::Integer(700)]),
            Operation::new("Tj", vec![Object::string_literal("Overview")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Overview");
        assert_eq!(spans[0].font_size, 18.0);
        assert_eq!((spans[0].x, spans[0].y), (72.0, 700.0));
        assert!(spans[0].is_bold);
        assert_eq!(spans[0].rotation, 0.0);
    }

    #[test]
    fn test_extract_spans_rotation() {
        let spans = analyze(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
            Operation::new(
                "Tm",
                vec![
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Integer(-1),
                    Object::Integer(0),
                    Object::Integer(50),
                    Object::Integer(100),
                ],
            ),
            Operation::new("Tj", vec![Object::string_literal("Sideways")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(spans.len(), 1);
        assert!((spans[0].rotation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_tj_array_spacing() {
        let items = vec![
            Object::string_literal("Hello"),
            Object::Integer(-300),
            Object::string_literal("World"),
            Object::Integer(-50),
            Object::string_literal("!"),
        ];
        assert_eq!(decode_tj_array(&items), "Hello World!");
    }

    #[test]
    fn test_group_spans_into_lines_and_blocks() {
        let doc = LopdfDocument::with_version("1.5");
        let analyzer = LayoutAnalyzer::new(&doc);
        let spans = vec![
            text_span("World", 120.0, 700.0, 12.0),
            text_span("Hello", 72.0, 701.0, 12.0),
            text_span("Next line", 72.0, 686.0, 12.0),
            text_span("Far below", 72.0, 500.0, 12.0),
        ];

        let lines = analyzer.group_spans_into_lines(spans);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans[0].text, "Hello");

        let blocks = analyzer.group_lines_into_blocks(lines);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 2);
    }

    #[test]
    fn test_merged_spans_join_kerned_fragments() {
        let mut first = text_span("Hel", 72.0, 700.0, 10.0);
        first.width = 15.0;
        let second = text_span("lo", 87.0, 700.0, 10.0);
        let third = text_span("there", 120.0, 700.0, 10.0);
        let line = TextLine::from_spans(vec![first, second, third]);

        let merged = line.merged_spans();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "Hello");
        assert_eq!(line.to_line(792.0).text(), "Hello there");
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]), "AB");
        assert_eq!(decode_text_simple("héllo".as_bytes()), "héllo");
        assert_eq!(decode_text_simple(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn test_spaceless_script() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('あ'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
