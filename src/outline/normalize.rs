//! Cleanup of extraction artifacts in heading and title text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static SPLIT_CAPITAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z])\s+([a-z]{2,})\b").expect("valid pattern"));
static SPLIT_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z])\s+([A-Z]{2,})\b").expect("valid pattern"));
static SPLIT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z])\s+([a-z]{2})\b").expect("valid pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid pattern"));
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([!?.,;:])").expect("valid pattern"));
static SPACE_BETWEEN_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([!?.,;:])\s*([!?.,;:])").expect("valid pattern"));

/// Two-letter fragments rejoined to a preceding single lowercase letter.
const SUFFIX_WHITELIST: [&str; 6] = ["ou", "he", "er", "ed", "ly", "ng"];

/// Clean up spacing artifacts.
///
/// Rejoins capitals split from the rest of their word (`"Y ou"`,
/// `"T HERE"`) and a small whitelist of split lowercase suffixes, collapses
/// whitespace and tightens punctuation. Headings get exactly one trailing
/// space when non-empty.
pub fn normalize(text: &str, heading: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = SPLIT_CAPITAL.replace_all(text, "${1}${2}");
    let text = SPLIT_UPPER.replace_all(&text, "${1}${2}");
    let text = SPLIT_SUFFIX.replace_all(&text, |caps: &Captures| {
        if SUFFIX_WHITELIST.contains(&&caps[2]) {
            format!("{}{}", &caps[1], &caps[2])
        } else {
            caps[0].to_string()
        }
    });
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "${1}");
    let text = SPACE_BETWEEN_PUNCT.replace_all(&text, "${1}${2}");

    let mut cleaned = text.trim().to_string();
    if heading && !cleaned.is_empty() {
        cleaned.push(' ');
    }
    cleaned
}
