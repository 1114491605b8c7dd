//! Heading level inference from the text alone.

use std::sync::LazyLock;

use super::keywords::{alternation, heading_keywords, KeywordCategory, Lang};
use super::language::detect_language;
use super::noise::should_skip;
use super::rules::{class, Rule, RuleTable};
use crate::model::HeadingLevel;

/// Ordered heading rule families for one language.
///
/// Families are evaluated H1, H2, H3 and then the restrictive single-word
/// fallback; the first matching rule wins. Only the fallback is
/// case-sensitive.
#[derive(Debug)]
pub struct HeadingRules {
    pub h1: RuleTable<HeadingLevel>,
    pub h2: RuleTable<HeadingLevel>,
    pub h3: RuleTable<HeadingLevel>,
    pub fallback: RuleTable<HeadingLevel>,
}

static HEADING_RULES: LazyLock<Vec<HeadingRules>> =
    LazyLock::new(|| Lang::ALL.iter().map(|lang| HeadingRules::build(*lang)).collect());

impl HeadingRules {
    /// Cached rules for `lang` with English as fallback.
    pub fn for_lang(lang: Lang) -> &'static HeadingRules {
        &HEADING_RULES[lang.index()]
    }

    fn build(lang: Lang) -> Self {
        Self {
            h1: h1_rules(lang),
            h2: h2_rules(lang),
            h3: h3_rules(),
            fallback: fallback_rules(),
        }
    }

    /// First matching rule across all families.
    ///
    /// Fallback rules only apply to texts of at least three characters.
    pub fn first_match(&self, text: &str) -> Option<&Rule<HeadingLevel>> {
        self.h1
            .first_match(text)
            .or_else(|| self.h2.first_match(text))
            .or_else(|| self.h3.first_match(text))
            .or_else(|| {
                if text.chars().count() >= 3 {
                    self.fallback.first_match(text)
                } else {
                    None
                }
            })
    }
}

fn h1_rules(lang: Lang) -> RuleTable<HeadingLevel> {
    use HeadingLevel::H1;

    let mut table = RuleTable::new();
    for l in lang.with_fallback() {
        let part = alternation(heading_keywords(*l, KeywordCategory::Part).iter().copied());
        let chapter = alternation(heading_keywords(*l, KeywordCategory::Chapter).iter().copied());
        table = table
            .rule(
                format!("part_number_{}", l.code()),
                &format!(r"(?i)^(?:{})\s+[IVX\d]+", part),
                H1,
            )
            .rule(
                format!("chapter_number_{}", l.code()),
                &format!(r"(?i)^(?:{})\s+\d+", chapter),
                H1,
            );
    }

    table
        .rule("chapter_en", r"(?i)^chapter\s+\d+", H1)
        .rule("dai_sho", r"(?i)^第\d+章", H1)
        .rule("dai_bu", r"(?i)^第\d+部", H1)
        .rule("geul_jang", r"(?i)^글\d+장", H1)
        .rule("glava", r"(?i)^глава\s+\d+", H1)
        .rule("chast", r"(?i)^часть\s+[IVX\d]+", H1)
        .rule("kapitel", r"(?i)^kapitel\s+\d+", H1)
        .rule("teil", r"(?i)^teil\s+[IVX\d]+", H1)
        .rule("capitulo", r"(?i)^capítulo\s+\d+", H1)
        .rule("parte", r"(?i)^parte\s+[IVX\d]+", H1)
        .rule("chapitre", r"(?i)^chapitre\s+\d+", H1)
        .rule("partie", r"(?i)^partie\s+[IVX\d]+", H1)
        .rule("fasl", r"(?i)^فصل\s+\d+", H1)
        .rule("juz", r"(?i)^جزء\s+\d+", H1)
        .rule("je_jang", r"(?i)^제\d+장", H1)
        .rule("je_bu", r"(?i)^제\d+부", H1)
        .rule("all_caps", &format!(r"(?i)^[A-Z{}\s]{{10,}}$", class::CJK), H1)
        .rule(
            "numbered_capital",
            &format!(r"(?i)^\d+\.\s+[A-Z{}]", class::CJK),
            H1,
        )
        .rule(
            "multi_caps",
            &format!(
                r"(?i)^[A-Z{han}][A-Z{cjk}\s]+[A-Z{han}]$",
                han = class::HAN,
                cjk = class::CJK
            ),
            H1,
        )
}

fn h2_rules(lang: Lang) -> RuleTable<HeadingLevel> {
    use HeadingLevel::H2;

    let mut table = RuleTable::new();
    for l in lang.with_fallback() {
        let appendix = alternation(heading_keywords(*l, KeywordCategory::Appendix).iter().copied());
        table = table
            .rule(
                format!("appendix_label_{}", l.code()),
                &format!(r"(?i)^(?:{})\s+[A-Z0-9]+:", appendix),
                H2,
            )
            .rule(
                format!("appendix_id_{}", l.code()),
                &format!(r"(?i)^(?:{})\s*[A-Z0-9]+", appendix),
                H2,
            );
    }

    let upper = format!("A-Z{}", class::HAN);
    let lower = format!("a-z{}{}", class::KANA, class::HANGUL);
    let title_word = format!("[{}][{}]+", upper, lower);

    table
        .rule("furoku", r"(?i)^付録[A-Z0-9]", H2)
        .rule("fulu", r"(?i)^附录[A-Z0-9]", H2)
        .rule("prilozhenie", r"(?i)^приложение\s+[A-ZА-Я0-9]", H2)
        .rule("anhang", r"(?i)^anhang\s+[A-Z0-9]", H2)
        .rule("apendice", r"(?i)^apéndice\s+[A-Z0-9]", H2)
        .rule("annexe", r"(?i)^annexe\s+[A-Z0-9]", H2)
        .rule("mulhaq", r"(?i)^ملحق\s+[A-Z0-9]", H2)
        .rule("burok", r"(?i)^부록\s*[A-Z0-9]", H2)
        .rule("decimal_section", r"(?i)^\d+\.\d+\s+", H2)
        .rule(
            "title_case_colon",
            &format!(r"(?i)^{w}(?:\s+{w})*:$", w = title_word),
            H2,
        )
        .rule("number_capital", &format!(r"(?i)^\d+\s+[{}]", upper), H2)
        .rule("title_case", &format!(r"(?i)^{w}(?:\s+{w})*$", w = title_word), H2)
}

fn h3_rules() -> RuleTable<HeadingLevel> {
    use HeadingLevel::H3;

    RuleTable::new()
        .rule("decimal_subsection", r"(?i)^\d+\.\d+\.\d+\s+", H3)
        .rule("letter_paren", r"(?i)^[a-z]\)\s+", H3)
        .rule(
            "bullet_capital",
            &format!(r"(?i)^[{}]\s+[A-Z{}]", class::BULLETS, class::HAN),
            H3,
        )
        .rule("parenthesised", r"(?i)^[(（][a-z0-9]+[)）]\s+", H3)
}

fn fallback_rules() -> RuleTable<HeadingLevel> {
    use HeadingLevel::H2;

    RuleTable::new()
        .rule("caps_word", r"^[A-Z]{4,}$", H2)
        .rule("han_word", &format!(r"^[{}]{{2,}}$", class::HAN), H2)
        .rule("kana_word", &format!(r"^[{}]{{3,}}$", class::KANA), H2)
        .rule("hangul_word", &format!(r"^[{}]{{2,}}$", class::HANGUL), H2)
}

/// Infer a heading level from the text alone.
///
/// Returns `None` for noise (see [`should_skip`]) and for text no rule
/// recognizes.
pub fn classify_by_pattern(text: &str) -> Option<HeadingLevel> {
    let text = text.trim();
    if should_skip(text, None) {
        return None;
    }

    let rules = HeadingRules::for_lang(detect_language(text));
    let rule = rules.first_match(text)?;
    log::debug!("pattern[{}] {}: {:?}", rule.name(), rule.result(), text);
    Some(*rule.result())
}
