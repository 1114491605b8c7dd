//! Table region detection using text position analysis (stream mode).
//!
//! Tables are found from text alignment alone, without graphical rules:
//! spans are grouped into rows, column edges are voted on across rows, and
//! runs of well-aligned rows become table regions.

use std::collections::{HashMap, HashSet};

use crate::model::Rect;

use super::layout::TextSpan;

/// A detected table region in PDF user space.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Baseline of the first row (PDF coords, larger is higher)
    pub top_y: f32,
    /// Baseline of the last row
    pub bottom_y: f32,
    /// Left X boundary
    pub left_x: f32,
    /// Right X boundary
    pub right_x: f32,
    /// Detected column boundaries (X coordinates)
    pub columns: Vec<f32>,
    /// Rows of text spans grouped by Y position
    pub rows: Vec<TableRowData>,
}

impl DetectedTable {
    /// Bounding rectangle in top-left page space.
    pub fn to_rect(&self, page_height: f32) -> Rect {
        let tallest = self
            .rows
            .iter()
            .flat_map(|r| r.spans.iter())
            .map(|s| s.font_size)
            .fold(0.0_f32, f32::max);

        Rect::new(
            self.left_x,
            page_height - (self.top_y + tallest * 0.8),
            self.right_x,
            page_height - (self.bottom_y - tallest * 0.2),
        )
    }
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Y position of this row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to report a region
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 3,
            min_columns: 2,
            max_columns: 8,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects table regions in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect table regions and return their rectangles in page space.
    pub fn detect_regions(&self, spans: &[TextSpan], page_height: f32) -> Vec<Rect> {
        self.detect(spans)
            .iter()
            .map(|t| t.to_rect(page_height))
            .collect()
    }

    /// Detect tables in the given spans.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            log::debug!("TableDetector: not enough spans ({})", spans.len());
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        if columns.len() < self.config.min_columns {
            log::debug!("TableDetector: not enough columns ({})", columns.len());
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let table_rows = rows[start..=end].to_vec();

            // Re-detect columns for this specific region
            let table_columns = self.detect_columns(&table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(&table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            let cells: Vec<&TextSpan> = table_rows.iter().flat_map(|r| r.spans.iter()).collect();
            let left_x = cells.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
            let right_x = cells.iter().map(|s| s.right()).fold(f32::NEG_INFINITY, f32::max);
            let top_y = table_rows.first().map(|r| r.y).unwrap_or_default();
            let bottom_y = table_rows.last().map(|r| r.y).unwrap_or_default();

            tables.push(DetectedTable {
                top_y,
                bottom_y,
                left_x,
                right_x,
                columns: table_columns,
                rows: table_rows,
            });
        }

        log::debug!("TableDetector: found {} tables", tables.len());
        tables
    }

    /// Group spans into rows by Y position.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x)));

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            match current_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            rows.push(make_row(current));
        }

        rows
    }

    /// Detect column boundaries from aligned left edges.
    ///
    /// Rows with several spans vote first; when too few exist every row
    /// votes, one vote per span.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        const BUCKET: f32 = 5.0;

        let multi: Vec<&TableRowData> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();

        let voters = if multi.len() >= self.config.min_rows {
            for row in &multi {
                let buckets: HashSet<i32> =
                    row.spans.iter().map(|s| (s.x / BUCKET).round() as i32).collect();
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
            multi.len()
        } else {
            for span in rows.iter().flat_map(|r| r.spans.iter()) {
                *edge_counts.entry((span.x / BUCKET).round() as i32).or_insert(0) += 1;
            }
            rows.len()
        };

        let min_occurrences = ((voters as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * BUCKET)
            .collect();
        edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find contiguous row regions that form tables.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.spans.len() >= 2
                && alignment_score(row, columns) >= self.config.min_alignment_ratio;

            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                    start = None;
                }
                _ => {}
            }
        }

        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Check if detected rows actually represent a numbered or bulleted list.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullets = 0;
        let mut numbers = 0;
        for span in rows.iter().filter_map(|r| r.spans.first()) {
            let text = span.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }

        let total = rows.len() as f32;
        if bullets as f32 / total >= 0.5 {
            return true;
        }
        // numbered first columns are common in real tables; only reject 2-column layouts
        columns.len() == 2 && (bullets + numbers) as f32 / total >= 0.5
    }
}

fn make_row(mut spans: Vec<TextSpan>) -> TableRowData {
    spans.sort_by(|a, b| a.x.total_cmp(&b.x));
    let y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
    TableRowData { y, spans }
}

/// Fraction of a row's spans that start on a column edge.
fn alignment_score(row: &TableRowData, columns: &[f32]) -> f32 {
    const TOLERANCE: f32 = 5.0;

    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|s| columns.iter().any(|c| (s.x - c).abs() <= TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "※" | "□" | "◆" | "▶" | "➤"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }
    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }
    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && matches!(chars[1], '.' | ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        let mut span = TextSpan::new(text.to_string(), x, y, 12.0, "Helvetica".to_string());
        span.width = text.len() as f32 * 6.0;
        span
    }

    fn grid(rows: usize, xs: &[f32]) -> Vec<TextSpan> {
        (0..rows)
            .flat_map(|r| {
                let y = 700.0 - r as f32 * 15.0;
                xs.iter()
                    .enumerate()
                    .map(move |(c, x)| make_span(&format!("R{r}C{c}"), *x, y))
            })
            .collect()
    }

    // ==========================================================================
    // Rows and columns
    // ==========================================================================

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("B1", 60.0, 100.0),
            make_span("A1", 10.0, 100.0),
            make_span("A2", 10.0, 85.0),
            make_span("B2", 60.0, 85.0),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spans[0].text, "A1");
        assert_eq!(rows[1].spans.len(), 2);
    }

    #[test]
    fn test_detect_columns() {
        let detector = TableDetector::new();
        let rows = detector.group_into_rows(&grid(4, &[50.0, 200.0, 350.0]));
        assert_eq!(detector.detect_columns(&rows), vec![50.0, 200.0, 350.0]);
    }

    // ==========================================================================
    // Regions
    // ==========================================================================

    #[test]
    fn test_detect_simple_table() {
        let detector = TableDetector::new();
        let tables = detector.detect(&grid(4, &[50.0, 200.0, 350.0]));
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 4);
        assert_eq!(tables[0].columns.len(), 3);
    }

    #[test]
    fn test_two_rows_not_reported() {
        let detector = TableDetector::new();
        assert!(detector.detect(&grid(2, &[50.0, 200.0, 350.0])).is_empty());
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = TableDetector::new();
        let spans: Vec<TextSpan> = (0..6)
            .map(|i| make_span("Body text line", 72.0, 700.0 - i as f32 * 14.0))
            .collect();
        assert!(detector.detect(&spans).is_empty());
    }

    #[test]
    fn test_numbered_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans: Vec<TextSpan> = (0..4)
            .flat_map(|i| {
                let y = 700.0 - i as f32 * 15.0;
                vec![
                    make_span(&format!("{}.", i + 1), 72.0, y),
                    make_span("List entry text", 100.0, y),
                ]
            })
            .collect();
        assert!(detector.detect(&spans).is_empty());
    }

    #[test]
    fn test_region_rect_is_top_down() {
        let detector = TableDetector::new();
        let regions = detector.detect_regions(&grid(3, &[50.0, 200.0]), 792.0);
        assert_eq!(regions.len(), 1);
        let rect = regions[0];
        assert_eq!(rect.x0, 50.0);
        assert!(rect.y0 < rect.y1);
        // first baseline 700 with size 12 -> top at 792 - 709.6
        assert!((rect.y0 - 82.4).abs() < 1e-3);
        assert!(rect.contains_point(100.0, 100.0));
    }

    #[test]
    fn test_list_markers() {
        assert!(is_bullet_marker("•"));
        assert!(is_number_marker("12."));
        assert!(is_number_marker("a)"));
        assert!(is_number_marker("3"));
        assert!(!is_number_marker("Revenue"));
    }
}
