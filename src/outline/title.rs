//! Title reconstruction from the first page.
//!
//! Titles are often split across several lines and sizes ("Annual" /
//! "Report 2024"), repeated for visual effect, or surrounded by running
//! headers. Lines are filtered, grouped by rounded font size, clustered by
//! vertical proximity and finally deduplicated word by word.

use std::collections::{BTreeMap, HashSet};

use super::config::AnalysisConfig;
use crate::model::{Line, Page};

/// A first-page line that may belong to the title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    pub text: String,
    /// Largest kept span size
    pub font_size: f32,
    /// Top of the line
    pub y: f32,
    pub bold: bool,
}

const TITLE_PUNCTUATION: &[char] = &['.', ',', '!', '?', ':', ';'];
const PRESERVED_WORDS: [&str; 10] = ["a", "an", "of", "in", "on", "to", "by", "for", "at", "as"];

fn keep_span_text(text: &str) -> bool {
    if text.chars().count() <= 1 {
        return false;
    }
    if ["Page ", "Chapter ", "Section ", "http"]
        .iter()
        .any(|p| text.starts_with(p))
    {
        return false;
    }
    if [".com", ".org", ".net"].iter().any(|s| text.ends_with(s)) {
        return false;
    }
    if text.chars().all(|c| c.is_ascii_digit() || c == '-')
        || text.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
    {
        return false;
    }
    let mut chars = text.chars();
    if matches!(chars.next(), Some('a'..='z')) && chars.all(char::is_whitespace) {
        return false;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > 3 {
        let distinct: HashSet<&str> = words.iter().copied().collect();
        if (distinct.len() as f32) < words.len() as f32 * 0.6 {
            return false;
        }
    }
    true
}

fn candidate_from_line(line: &Line) -> Option<TitleCandidate> {
    let mut parts = Vec::new();
    let mut size = 0.0f32;
    let mut bold = false;

    for span in &line.spans {
        let text = span.text.trim();
        if keep_span_text(text) {
            parts.push(text);
            size = size.max(span.font_size);
            bold |= span.bold;
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(TitleCandidate {
        text: parts.join(" "),
        font_size: size,
        y: line.bbox.y0,
        bold,
    })
}

/// Collect the title candidates of a page.
///
/// Right-aligned lines, lines inside tables or form-field boxes and lines
/// starting in the lower part of the page are not candidates.
pub fn title_candidates(page: &Page, config: &AnalysisConfig) -> Vec<TitleCandidate> {
    let max_x = page.width * config.right_align_ratio;
    let max_y = page.height * config.title_max_y_ratio;

    page.lines()
        .filter(|line| {
            line.bbox.x0 <= max_x
                && line.bbox.y0 < max_y
                && !page.in_table(&line.bbox)
                && !config.in_form_box(page, &line.bbox)
        })
        .filter_map(candidate_from_line)
        .filter(|c| c.text.chars().count() < 200)
        .collect()
}

/// Round a size to the nearest even number, ties to even as well.
fn size_key(size: f32) -> i64 {
    (size / 2.0).round_ties_even() as i64 * 2
}

/// Reconstruct the document title from the first page.
///
/// Returns an empty string when no line qualifies.
pub fn reconstruct_title(page: &Page, config: &AnalysisConfig) -> String {
    let candidates = title_candidates(page, config);
    if candidates.is_empty() {
        return String::new();
    }

    let mut groups: BTreeMap<i64, Vec<TitleCandidate>> = BTreeMap::new();
    for c in candidates {
        groups.entry(size_key(c.font_size)).or_default().push(c);
    }

    let mut keys = groups.keys().rev().copied();
    let Some(largest) = keys.next() else {
        return String::new();
    };
    let second = keys.next();
    let max_distance = largest as f32 * 3.0;

    if let Some(second) = second {
        if second as f32 >= largest as f32 * config.title_group_ratio {
            if let Some(title) = multi_part_title(&groups, largest, second, page, config) {
                log::debug!("multi-part title: {:?}", title);
                return title;
            }
        }
    }

    let mut group = groups.remove(&largest).unwrap_or_default();
    group.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut first_cluster: Vec<&TitleCandidate> = Vec::new();
    for c in &group {
        match first_cluster.last() {
            Some(last) if c.y - last.y > max_distance => break,
            _ => first_cluster.push(c),
        }
    }

    let mut seen = HashSet::new();
    let parts: Vec<&str> = first_cluster
        .iter()
        .map(|c| c.text.trim())
        .filter(|t| t.chars().count() > 2 && seen.insert(*t))
        .collect();

    if parts.is_empty() {
        return String::new();
    }
    deduplicate_title(&parts.join(" "))
}

fn multi_part_title(
    groups: &BTreeMap<i64, Vec<TitleCandidate>>,
    largest: i64,
    second: i64,
    page: &Page,
    config: &AnalysisConfig,
) -> Option<String> {
    let mut merged: Vec<&TitleCandidate> = groups[&largest].iter().chain(&groups[&second]).collect();
    merged.sort_by(|a, b| a.y.total_cmp(&b.y));

    let stop_y = page.height * config.title_stop_y_ratio;
    let max_distance = largest as f32 * 3.0;

    let mut clusters: Vec<Vec<&TitleCandidate>> = Vec::new();
    for c in merged {
        if c.y > stop_y {
            break;
        }
        match clusters
            .iter_mut()
            .find(|cluster| cluster.last().is_some_and(|last| (c.y - last.y).abs() <= max_distance))
        {
            Some(cluster) => cluster.push(c),
            None => clusters.push(vec![c]),
        }
    }

    let parts: Vec<String> = clusters
        .iter()
        .map(|cluster| {
            cluster
                .iter()
                .map(|c| c.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|t| !t.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(deduplicate_title(&parts.join(" ")))
    }
}

fn clean_word(word: &str) -> String {
    word.trim_matches(TITLE_PUNCTUATION).to_lowercase()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check whether `needle` occurs in `haystack` delimited by word boundaries.
pub(crate) fn is_word_bounded(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(i, m)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + m.len()..].chars().next();
        let first = m.chars().next();
        let last = m.chars().next_back();

        let start_ok = match (before, first) {
            (Some(b), Some(f)) => is_word_char(b) != is_word_char(f),
            (None, Some(f)) => is_word_char(f),
            _ => false,
        };
        let end_ok = match (last, after) {
            (Some(l), Some(a)) => is_word_char(l) != is_word_char(a),
            (Some(l), None) => is_word_char(l),
            _ => false,
        };
        start_ok && end_ok
    })
}

/// Whether `word` looks like a fragment of `other` rather than a word of
/// its own. Both are cleaned.
fn is_fragment_of(word: &str, other: &str) -> bool {
    if word == other || !other.contains(word) {
        return false;
    }
    let len = word.chars().count();
    let gap = other.chars().count().saturating_sub(len);
    if gap < 2 {
        return false;
    }
    if len <= 3 {
        other.starts_with(word) || other.ends_with(word)
    } else {
        !is_word_bounded(other, word)
    }
}

/// Remove split-word fragments, stray letters and repeats from a title.
///
/// `"RFP: R RFP: Request f quest for Pr Proposal"` becomes
/// `"RFP: Request for Proposal"`.
pub fn deduplicate_title(title: &str) -> String {
    let words: Vec<&str> = title
        .split_whitespace()
        .filter(|w| {
            let clean = clean_word(w);
            clean.chars().count() > 1 || clean == "a"
        })
        .collect();
    let cleaned: Vec<String> = words.iter().map(|w| clean_word(w)).collect();

    let mut kept: Vec<&str> = Vec::new();
    let mut kept_clean: Vec<&str> = Vec::new();

    for (i, word) in words.iter().enumerate() {
        let clean = cleaned[i].as_str();
        if PRESERVED_WORDS.contains(&clean) {
            kept.push(word);
            kept_clean.push(clean);
            continue;
        }

        let fragment = cleaned
            .iter()
            .enumerate()
            .any(|(j, other)| i != j && is_fragment_of(clean, other));
        if fragment || kept_clean.contains(&clean) {
            continue;
        }
        kept.push(word);
        kept_clean.push(clean);
    }

    kept.join(" ")
}
