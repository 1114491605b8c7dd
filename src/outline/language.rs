//! Script-based language detection.

use super::keywords::{heading_keywords, KeywordCategory, Lang};

#[derive(Debug, Default, Clone, Copy)]
struct ScriptCounts {
    latin: usize,
    cjk: usize,
    arabic: usize,
    cyrillic: usize,
    kana: bool,
    hangul: bool,
}

impl ScriptCounts {
    fn count(text: &str) -> Self {
        let mut counts = Self::default();
        for c in text.chars() {
            match c {
                'A'..='Z' | 'a'..='z' => counts.latin += 1,
                '\u{3040}'..='\u{30ff}' => {
                    counts.cjk += 1;
                    counts.kana = true;
                }
                '\u{ac00}'..='\u{d7af}' => {
                    counts.cjk += 1;
                    counts.hangul = true;
                }
                '\u{4e00}'..='\u{9fff}' => counts.cjk += 1,
                '\u{0600}'..='\u{06ff}' => counts.arabic += 1,
                '\u{0400}'..='\u{04ff}' => counts.cyrillic += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Detect the dominant language of a text fragment.
///
/// The script family with the most characters wins, ties going to Latin,
/// then CJK, Arabic and Cyrillic. Latin text is narrowed to a European
/// language by heading-keyword substrings. Defaults to English.
pub fn detect_language(text: &str) -> Lang {
    let counts = ScriptCounts::count(text);

    let mut best = counts.latin;
    let mut family = 0;
    for (i, n) in [counts.cjk, counts.arabic, counts.cyrillic].into_iter().enumerate() {
        if n > best {
            best = n;
            family = i + 1;
        }
    }

    match family {
        1 if counts.kana => Lang::Ja,
        1 if counts.hangul => Lang::Ko,
        1 => Lang::Zh,
        2 => Lang::Ar,
        3 => Lang::Ru,
        _ => detect_latin(text),
    }
}

fn detect_latin(text: &str) -> Lang {
    let lower = text.to_lowercase();
    Lang::LATIN
        .into_iter()
        .find(|lang| {
            KeywordCategory::ALL.iter().any(|category| {
                heading_keywords(*lang, *category)
                    .iter()
                    .any(|keyword| lower.contains(keyword))
            })
        })
        .unwrap_or(Lang::En)
}
