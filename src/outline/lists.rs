//! Suppression of numbered list items that look like subsection headings.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Line, ListSequence};

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\s+").expect("valid pattern"));

/// Neighbourhood inspected around a candidate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    /// Lines inspected before and after the candidate
    pub lines: usize,
    /// Siblings needed to call the candidate a list item
    pub min_siblings: usize,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            lines: 10,
            min_siblings: 2,
        }
    }
}

fn major_number(text: &str) -> Option<u64> {
    NUMBERED_ITEM
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Check whether `text` (the line at `index` of a block) is one item of a
/// `N.M` numbered sequence.
///
/// Neighbours within the window sharing the major number `N` are counted;
/// the candidate line itself and empty lines are ignored. The returned
/// sequence has `page` 0; callers fill it in.
pub fn detect_list_item(
    text: &str,
    lines: &[Line],
    index: usize,
    window: &ListWindow,
) -> Option<ListSequence> {
    let text = text.trim();
    let major = major_number(text)?;

    let start = index.saturating_sub(window.lines);
    let end = lines.len().min(index.saturating_add(window.lines + 1));

    let siblings: Vec<String> = (start..end)
        .filter(|&i| i != index)
        .map(|i| lines[i].text())
        .filter(|t| !t.is_empty())
        .filter(|t| major_number(t) == Some(major))
        .collect();

    if siblings.len() >= window.min_siblings {
        log::debug!(
            "list item {:?}: {} siblings share major number {}",
            text,
            siblings.len(),
            major
        );
        Some(ListSequence {
            text: text.to_string(),
            page: 0,
            sibling_count: siblings.len(),
            siblings,
        })
    } else {
        None
    }
}

/// Boolean form of [`detect_list_item`].
pub fn is_list_item(text: &str, lines: &[Line], index: usize, window: &ListWindow) -> bool {
    detect_list_item(text, lines, index, window).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rect, Span};

    fn line(text: &str) -> Line {
        Line::new(vec![Span::new(text, 11.0, false, Rect::new(0.0, 0.0, 100.0, 11.0))])
    }

    fn block(texts: &[&str]) -> Vec<Line> {
        texts.iter().map(|t| line(t)).collect()
    }

    #[test]
    fn test_sequence_is_detected() {
        let lines = block(&["9.1 Alpha", "9.2 Beta", "9.3 Gamma"]);
        let window = ListWindow::default();

        for i in 0..3 {
            let seq = detect_list_item(&lines[i].text(), &lines, i, &window).unwrap();
            assert_eq!(seq.sibling_count, 2);
        }

        let seq = detect_list_item("9.2 Beta", &lines, 1, &window).unwrap();
        assert_eq!(seq.siblings, vec!["9.1 Alpha", "9.3 Gamma"]);
    }

    #[test]
    fn test_isolated_item_is_not_a_list() {
        let lines = block(&["Intro text", "9.1 Alpha", "More text"]);
        assert!(!is_list_item("9.1 Alpha", &lines, 1, &ListWindow::default()));
    }

    #[test]
    fn test_different_major_numbers() {
        let lines = block(&["8.1 Alpha", "9.1 Beta", "10.1 Gamma"]);
        assert!(!is_list_item("9.1 Beta", &lines, 1, &ListWindow::default()));
    }

    #[test]
    fn test_empty_neighbours_are_skipped() {
        let lines = block(&["3.1 A", "", "  ", "3.2 B", "3.3 C"]);
        assert!(is_list_item("3.1 A", &lines, 0, &ListWindow::default()));
    }

    #[test]
    fn test_window_limits_search() {
        let mut texts = vec!["4.1 First"];
        texts.extend(std::iter::repeat("filler").take(12));
        texts.extend(["4.2 Second", "4.3 Third"]);
        let lines = block(&texts);

        assert!(!is_list_item("4.1 First", &lines, 0, &ListWindow::default()));
        let wide = ListWindow {
            lines: 20,
            min_siblings: 2,
        };
        assert!(is_list_item("4.1 First", &lines, 0, &wide));
    }

    #[test]
    fn test_only_dotted_numbers_are_considered() {
        let lines = block(&["1. One", "1. Two", "1. Three"]);
        assert!(!is_list_item("1. One", &lines, 0, &ListWindow::default()));
    }
}
