//! Rejection of text that looks like a heading but is not one.
//!
//! Table-of-contents rows, warnings, addresses, form fields, contact details
//! and dates are all common on cover pages and forms. Each decision carries a
//! [`NoiseReason`] so callers can log why a line was dropped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::keywords::{alternation, keywords_for, month_names, warning_words, KeywordCategory, Lang};
use super::language::detect_language;
use super::rules::{class, RuleTable};
use crate::model::Span;

/// Why a text fragment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseReason {
    Empty,
    TableOfContents,
    Warning,
    WebContact,
    Address,
    FormField,
    Date,
}

impl NoiseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseReason::Empty => "empty",
            NoiseReason::TableOfContents => "table of contents",
            NoiseReason::Warning => "warning",
            NoiseReason::WebContact => "web/contact",
            NoiseReason::Address => "address",
            NoiseReason::FormField => "form field",
            NoiseReason::Date => "date",
        }
    }
}

impl fmt::Display for NoiseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled noise rules for one detected language.
struct NoiseRules {
    toc: RuleTable<NoiseReason>,
    toc_exempt: RuleTable<()>,
    warning: RuleTable<NoiseReason>,
    warning_words: Vec<&'static str>,
    content: RuleTable<NoiseReason>,
}

static NOISE_RULES: LazyLock<Vec<NoiseRules>> =
    LazyLock::new(|| Lang::ALL.iter().map(|lang| NoiseRules::build(*lang)).collect());

static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\d+\.\s+[A-Z{}]", class::CJK)).expect("valid pattern")
});

static LETTERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "[A-Za-z{}{}{}]",
        class::CJK,
        class::ARABIC,
        class::CYRILLIC
    ))
    .expect("valid pattern")
});

static DOT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{3,}").expect("valid pattern"));

impl NoiseRules {
    fn for_lang(lang: Lang) -> &'static NoiseRules {
        &NOISE_RULES[lang.index()]
    }

    fn build(lang: Lang) -> Self {
        use NoiseReason::*;

        let langs = lang.with_fallback();

        let toc = RuleTable::new()
            .rule("dot_run", r"\.{3,}", TableOfContents)
            .rule("dot_leader_page", r"\.{2,}\s*\d+\s*$", TableOfContents)
            .rule("spaced_leader_page", r"\s+\.+\s*\d+\s*$", TableOfContents)
            .rule("ellipsis_leader_page", r"…+\s*\d+\s*$", TableOfContents);

        let toc_words = alternation(keywords_for(langs, KeywordCategory::TableOfContents));
        let appendix_words = alternation(keywords_for(langs, KeywordCategory::Appendix));
        let toc_exempt = RuleTable::new()
            .rule("toc_heading", &format!(r"(?i)^(?:{})\b", toc_words), ())
            .rule(
                "appendix_label",
                &format!(r"(?i)^(?:{})\s+[A-Z0-9]+:", appendix_words),
                (),
            );

        let mut warning = RuleTable::new();
        for l in langs {
            warning = warning.rule(
                format!("warning_words_{}", l.code()),
                &format!("(?i)(?:{})", alternation(warning_words(*l).iter().copied())),
                Warning,
            );
        }
        let warning = warning
            .rule("dot_com", r"(?i)\.COM\b", WebContact)
            .rule("www", r"(?i)WWW\.", WebContact)
            .rule("email", r"@.*\.", WebContact)
            .rule(
                "caps_instruction",
                r"(?i)^[A-Z\s]+(?:REQUIRED|MUST|SHOULD|PLEASE|VISIT)",
                Warning,
            );

        let warning_words = langs
            .iter()
            .flat_map(|l| warning_words(*l).iter().copied())
            .collect();

        let content = address_rules()
            .extend(form_rules())
            .extend(web_rules())
            .extend(date_rules(lang));

        Self {
            toc,
            toc_exempt,
            warning,
            warning_words,
            content,
        }
    }
}

fn address_rules() -> RuleTable<NoiseReason> {
    use NoiseReason::Address;

    RuleTable::new()
        .rule(
            "street",
            &format!(
                r"(?i)^\d+\s+[A-Za-z\s{}]+(?:street|st\b|avenue|ave\b|road|rd\b|drive|dr\b|lane|ln\b|parkway|pkwy|boulevard|blvd\b|街|路|町|丁目)",
                class::CJK
            ),
            Address,
        )
        .rule("state_zip", r"(?i)^[A-Z]{2}\s+\d{5}(?:-\d{4})?$", Address)
        .rule(
            "city_state_zip",
            r"(?i)^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*,\s*[A-Z]{2}\s+\d{5}$",
            Address,
        )
        .rule(
            "unit",
            r"(?i)^(?:Suite|Ste|Apt|Unit|Building|Bldg|Floor|Fl|号室|階)\b.*\d+",
            Address,
        )
}

fn form_rules() -> RuleTable<NoiseReason> {
    use NoiseReason::FormField;

    RuleTable::new()
        .rule("rule_line", r"(?i)^[_\-]{3,}$", FormField)
        .rule(
            "labelled_field",
            r"(?i)^\s*(?:RSVP|Name|Date|Time|Phone|Email|Address|Sign|Signature|Title|Age|名前|日付|時間|電話|メール|住所|署名|タイトル|年齢|姓名|日期|时间|电话|邮箱|地址|签名|标题|年龄)[\s:]*[_\-]*$",
            FormField,
        )
        .rule(
            "signature_of",
            r"(?i)^\s*(?:Signature\s+of\s+\w+|署名者|签名者)",
            FormField,
        )
        .rule(
            "yes_no",
            r"(?i)^\s*(?:Yes|No|Maybe|はい|いいえ|たぶん|是|否|也许)[\s:]*$",
            FormField,
        )
        .rule("underscores", r"_{3,}", FormField)
        .rule("dashes", r"-{3,}", FormField)
        .rule(
            "serial_number",
            r"(?i)^(?:S\.?No\.?|Sl\.?No\.?|Sr\.?No\.?|Serial\s*No\.?|Serial\s*Number|番号|序号)[\s:]*$",
            FormField,
        )
        .rule(
            "numbered_label",
            r"(?i)^\d+\.\s*(?:Amount|Name|Address|Details?|Signature|金額|名前|住所|詳細|署名|金额|姓名|地址|详情|签名)",
            FormField,
        )
        .rule(
            "field_label",
            r"(?i)^(?:Relationship|Amount|Signature|Details?|関係|金額|署名|詳細|关系|金额|签名|详情)[\s:]*$",
            FormField,
        )
        .rule("dot_filler", r"^[.\s]{5,}$", FormField)
        .rule("dots_only", r"^\s*\.+\s*$", FormField)
        .rule("dot_leader", r"\.{3,}", FormField)
        .rule(
            "bullet",
            &format!(r"^\s*[{}]\s+", class::BULLETS),
            FormField,
        )
        .rule("ascii_bullet", r"^\s*[-*+]\s+", FormField)
        .rule("numbered_sentence", r"(?i)^\s*\d+[.)]\s+[a-z][a-z]", FormField)
        .rule("lettered_item", r"(?i)^\s*[a-z][.)]\s+", FormField)
        .rule("roman_item", r"(?i)^\s*[ivxlcdm]+[.)]\s+", FormField)
        .rule("parenthesised_item", r"(?i)^\s*\([a-z0-9]+\)\s+", FormField)
        .rule("trailing_dot_star", r"\s+\.\s*\*\s*$", FormField)
        .rule("sentence_fragment", r"(?i)^[a-z].*\s+\.$", FormField)
        .rule(
            "demonstrative_start",
            r"(?i)^\s*(?:the|this|these|that|those|これ|その|あの|この|该|这|那)\s+",
            FormField,
        )
        .rule(
            "years_suffix",
            r"(?i)\s+(?:years?|年|年間|岁|歲)\s*[.*]*$",
            FormField,
        )
        .rule(
            "conjunction_end",
            r"(?i)\s+(?:and|or|と|または|和|或者)\s*$",
            FormField,
        )
        .rule(
            "preposition_end",
            r"(?i)\s+(?:of|in|to|for|with|by|at|on|の|に|で|から|へ|的|在|到|为|和|由)\s*$",
            FormField,
        )
}

fn web_rules() -> RuleTable<NoiseReason> {
    use NoiseReason::WebContact;

    const TLDS: &str = "com|org|net|edu|gov|mil|biz|info|io|co|uk|us|jp|cn|kr";

    RuleTable::new()
        .rule(
            "url",
            &format!(r"(?i)^(?:https?://)?(?:www\.)?[a-z0-9\-.]+\.(?:{})/?", TLDS),
            WebContact,
        )
        .rule("domain_end", &format!(r"(?i)\.(?:{})\s*$", TLDS), WebContact)
        .rule(
            "contact_label",
            r"(?i)^(?:Email|Website|URL|Web|WWW|メール|ウェブサイト|网站|웹사이트)[:\s]",
            WebContact,
        )
}

fn date_rules(lang: Lang) -> RuleTable<NoiseReason> {
    use NoiseReason::Date;

    let mut table = RuleTable::new()
        .rule("numeric_dmy", r"^\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\.?$", Date)
        .rule("numeric_ymd", r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}\.?$", Date)
        .rule("spaced_dmy", r"^\d{1,2}\s+\d{1,2}\s+\d{4}\.?$", Date);

    for l in lang.with_fallback() {
        let months = month_names(*l);
        if months.is_empty() {
            continue;
        }
        let months = alternation(months.iter().copied());
        let code = l.code();
        table = table
            .rule(
                format!("day_month_year_{}", code),
                &format!(r"(?i)^\d{{1,2}}\s+(?:{})\s+\d{{4}}\.?$", months),
                Date,
            )
            .rule(
                format!("month_day_year_{}", code),
                &format!(r"(?i)^(?:{})\s+\d{{1,2}},?\s+\d{{4}}\.?$", months),
                Date,
            )
            .rule(
                format!("month_year_{}", code),
                &format!(r"(?i)^(?:{})\s+\d{{4}}\.?$", months),
                Date,
            );
    }
    table
}

/// Classify a text fragment as noise.
///
/// Returns `None` when the text may be a heading. When `spans` are given, a
/// numbered line like `"1. Scope"` with a bold lettered span is accepted
/// before the content rules run.
pub fn classify_noise(text: &str, spans: Option<&[Span]>) -> Option<NoiseReason> {
    let text = text.trim();
    if text.is_empty() {
        return Some(NoiseReason::Empty);
    }

    let lang = detect_language(text);
    let rules = NoiseRules::for_lang(lang);

    if let Some(rule) = rules.toc.first_match(text) {
        if !rules.toc_exempt.is_match(text) {
            log::debug!("noise[{}]: {:?}", rule.name(), text);
            return Some(*rule.result());
        }
    }

    if let Some(rule) = rules.warning.first_match(text) {
        log::debug!("noise[{}]: {:?}", rule.name(), text);
        return Some(*rule.result());
    }

    if text.chars().count() > 60 {
        let lower = text.to_lowercase();
        if rules.warning_words.iter().any(|w| lower.contains(w)) {
            return Some(NoiseReason::Warning);
        }
    }

    if NUMBERED_HEADING.is_match(text) {
        if DOT_RUN.is_match(text) {
            return Some(NoiseReason::TableOfContents);
        }
        match spans {
            Some(spans) => {
                let bold_text = spans
                    .iter()
                    .any(|s| s.bold && LETTERED.is_match(s.text.trim()));
                if bold_text {
                    return None;
                }
            }
            None => return None,
        }
    }

    let rule = rules.content.first_match(text)?;
    log::debug!("noise[{}]: {:?}", rule.name(), text);
    Some(*rule.result())
}

/// Check whether a text fragment should be kept out of the outline.
pub fn should_skip(text: &str, spans: Option<&[Span]>) -> bool {
    classify_noise(text, spans).is_some()
}
