//! Tunable thresholds for outline analysis.

use crate::model::{Page, Rect};

/// Thresholds used by the title reconstructor and the outline assembler.
///
/// `Default` carries the calibrated values; builder methods override single
/// knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Pages sampled for the document average font size
    pub sample_pages: usize,

    /// Lines starting beyond this fraction of page width are right-aligned
    pub right_align_ratio: f32,

    /// Title candidates must start above this fraction of page height
    pub title_max_y_ratio: f32,

    /// Multi-part titles stop at this fraction of page height
    pub title_stop_y_ratio: f32,

    /// Second size group must reach this fraction of the largest to be merged
    pub title_group_ratio: f32,

    /// Form-field box width window (exclusive)
    pub box_width: (f32, f32),

    /// Form-field box height window (exclusive)
    pub box_height: (f32, f32),

    /// Lines inspected on each side for list siblings
    pub list_window: usize,

    /// Siblings needed to call a line a list item
    pub list_min_siblings: usize,

    /// Heading text must be strictly longer than this
    pub min_heading_chars: usize,

    /// Heading text must be strictly shorter than this
    pub max_heading_chars: usize,

    /// Unbolded page-1 headings must be smaller than this
    pub first_page_max_size: f32,

    /// Maximum average-size difference for merging lines
    pub merge_size_delta: f32,

    /// Maximum vertical gap for merging lines, in multiples of font size
    pub merge_gap_factor: f32,

    /// Right-to-left text must start beyond this fraction of width
    pub rtl_min_x_ratio: f32,

    /// Left-to-right text must start before this fraction of width
    pub ltr_max_x_ratio: f32,

    /// Allowed deviation from an axis, in degrees
    pub rotation_tolerance: f32,
}

impl AnalysisConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pages sampled for the average font size.
    pub fn with_sample_pages(mut self, pages: usize) -> Self {
        self.sample_pages = pages;
        self
    }

    /// Set the right-alignment ratio.
    pub fn with_right_align_ratio(mut self, ratio: f32) -> Self {
        self.right_align_ratio = ratio;
        self
    }

    /// Set the form-field box size window.
    pub fn with_box_window(mut self, width: (f32, f32), height: (f32, f32)) -> Self {
        self.box_width = width;
        self.box_height = height;
        self
    }

    /// Set the list detection window and sibling threshold.
    pub fn with_list_window(mut self, window: usize, min_siblings: usize) -> Self {
        self.list_window = window;
        self.list_min_siblings = min_siblings;
        self
    }

    /// Set the heading length bounds (both exclusive).
    pub fn with_heading_length(mut self, min: usize, max: usize) -> Self {
        self.min_heading_chars = min;
        self.max_heading_chars = max;
        self
    }

    /// Set the page-1 size gate for unbolded headings.
    pub fn with_first_page_max_size(mut self, size: f32) -> Self {
        self.first_page_max_size = size;
        self
    }

    /// Set the rotation tolerance in degrees.
    pub fn with_rotation_tolerance(mut self, degrees: f32) -> Self {
        self.rotation_tolerance = degrees;
        self
    }

    /// Check whether a rectangle of this size counts as a form-field box.
    pub fn is_form_box(&self, width: f32, height: f32) -> bool {
        width > self.box_width.0
            && width < self.box_width.1
            && height > self.box_height.0
            && height < self.box_height.1
    }

    /// Check whether the centre of `bbox` lies inside a form-field box
    /// drawn on the page.
    pub fn in_form_box(&self, page: &Page, bbox: &Rect) -> bool {
        page.boxes
            .iter()
            .any(|b| b.contains_center_of(bbox) && self.is_form_box(b.width(), b.height()))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_pages: 5,
            right_align_ratio: 0.6,
            title_max_y_ratio: 0.6,
            title_stop_y_ratio: 0.5,
            title_group_ratio: 0.6,
            box_width: (200.0, 600.0),
            box_height: (50.0, 700.0),
            list_window: 10,
            list_min_siblings: 2,
            min_heading_chars: 3,
            max_heading_chars: 200,
            first_page_max_size: 16.0,
            merge_size_delta: 1.0,
            merge_gap_factor: 1.5,
            rtl_min_x_ratio: 0.3,
            ltr_max_x_ratio: 0.7,
            rotation_tolerance: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.sample_pages, 5);
        assert_eq!(config.list_window, 10);
        assert_eq!(config.first_page_max_size, 16.0);
    }

    #[test]
    fn test_form_box_window_is_exclusive() {
        let config = AnalysisConfig::default();
        assert!(config.is_form_box(300.0, 100.0));
        assert!(!config.is_form_box(200.0, 100.0));
        assert!(!config.is_form_box(300.0, 700.0));
        assert!(!config.is_form_box(50.0, 20.0));
    }

    #[test]
    fn test_in_form_box() {
        let config = AnalysisConfig::default();
        let mut page = Page::letter(1);
        page.boxes.push(Rect::new(50.0, 100.0, 450.0, 300.0));
        page.boxes.push(Rect::new(0.0, 500.0, 20.0, 520.0));

        assert!(config.in_form_box(&page, &Rect::new(60.0, 150.0, 200.0, 162.0)));
        assert!(!config.in_form_box(&page, &Rect::new(60.0, 400.0, 200.0, 412.0)));
        // too small to be a form field
        assert!(!config.in_form_box(&page, &Rect::new(2.0, 505.0, 18.0, 515.0)));
    }

    #[test]
    fn test_builder() {
        let config = AnalysisConfig::new()
            .with_list_window(5, 3)
            .with_heading_length(2, 100);
        assert_eq!(config.list_window, 5);
        assert_eq!(config.list_min_siblings, 3);
        assert_eq!(config.min_heading_chars, 2);
        assert_eq!(config.max_heading_chars, 100);
    }
}
