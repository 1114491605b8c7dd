//! Static per-language keyword tables.
//!
//! Tables are keyed by `(Lang, KeywordCategory)` so that adding a language is
//! a data change. Entries are matched literally.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported language tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lang {
    En,
    Ja,
    Zh,
    Es,
    Fr,
    De,
    Ar,
    Ko,
    Ru,
}

impl Lang {
    /// Every supported language.
    pub const ALL: [Lang; 9] = [
        Lang::En,
        Lang::Ja,
        Lang::Zh,
        Lang::Es,
        Lang::Fr,
        Lang::De,
        Lang::Ar,
        Lang::Ko,
        Lang::Ru,
    ];

    /// Latin-script languages, in keyword detection order.
    pub const LATIN: [Lang; 4] = [Lang::En, Lang::Es, Lang::Fr, Lang::De];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ja => "ja",
            Lang::Zh => "zh",
            Lang::Es => "es",
            Lang::Fr => "fr",
            Lang::De => "de",
            Lang::Ar => "ar",
            Lang::Ko => "ko",
            Lang::Ru => "ru",
        }
    }

    /// Whether text in this language runs right to left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Lang::Ar)
    }

    /// The language followed by English, without repeating English.
    pub fn with_fallback(&self) -> &'static [Lang] {
        match self {
            Lang::En => &[Lang::En],
            Lang::Ja => &[Lang::Ja, Lang::En],
            Lang::Zh => &[Lang::Zh, Lang::En],
            Lang::Es => &[Lang::Es, Lang::En],
            Lang::Fr => &[Lang::Fr, Lang::En],
            Lang::De => &[Lang::De, Lang::En],
            Lang::Ar => &[Lang::Ar, Lang::En],
            Lang::Ko => &[Lang::Ko, Lang::En],
            Lang::Ru => &[Lang::Ru, Lang::En],
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::ALL
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Other(format!("unsupported language: {}", s)))
    }
}

/// Heading keyword categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Part,
    Appendix,
    Chapter,
    Introduction,
    Conclusion,
    References,
    TableOfContents,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 7] = [
        KeywordCategory::Part,
        KeywordCategory::Appendix,
        KeywordCategory::Chapter,
        KeywordCategory::Introduction,
        KeywordCategory::Conclusion,
        KeywordCategory::References,
        KeywordCategory::TableOfContents,
    ];
}

/// Heading keywords for a language and category, lower-cased.
pub fn heading_keywords(lang: Lang, category: KeywordCategory) -> &'static [&'static str] {
    use KeywordCategory::*;

    match (lang, category) {
        (Lang::En, Part) => &["part", "section"],
        (Lang::En, Appendix) => &["appendix", "annex"],
        (Lang::En, Chapter) => &["chapter", "chap"],
        (Lang::En, Introduction) => &["introduction", "intro"],
        (Lang::En, Conclusion) => &["conclusion", "summary"],
        (Lang::En, References) => &["references", "bibliography", "citations"],
        (Lang::En, TableOfContents) => &["table of contents", "contents", "toc"],

        (Lang::Ja, Part) => &["部", "章", "パート"],
        (Lang::Ja, Appendix) => &["付録", "別添", "添付", "参考資料"],
        (Lang::Ja, Chapter) => &["章", "チャプター"],
        (Lang::Ja, Introduction) => &["はじめに", "序論", "導入", "概要", "まえがき"],
        (Lang::Ja, Conclusion) => &["結論", "まとめ", "おわりに", "総括"],
        (Lang::Ja, References) => &["参考文献", "引用文献", "文献", "参照"],
        (Lang::Ja, TableOfContents) => &["目次", "内容", "もくじ"],

        (Lang::Zh, Part) => &["部分", "部", "章"],
        (Lang::Zh, Appendix) => &["附录", "附錄", "附件", "参考资料", "參考資料"],
        (Lang::Zh, Chapter) => &["章", "章节", "章節"],
        (Lang::Zh, Introduction) => &["介绍", "介紹", "序言", "导言", "導言", "概述"],
        (Lang::Zh, Conclusion) => &["结论", "結論", "总结", "總結", "小结", "小結"],
        (Lang::Zh, References) => &["参考文献", "參考文獻", "引用文献", "引用文獻", "文献", "文獻"],
        (Lang::Zh, TableOfContents) => &["目录", "目錄", "内容", "內容"],

        (Lang::Es, Part) => &["parte", "sección", "capítulo"],
        (Lang::Es, Appendix) => &["apéndice", "anexo", "adjunto"],
        (Lang::Es, Chapter) => &["capítulo", "cap"],
        (Lang::Es, Introduction) => &["introducción", "intro", "presentación"],
        (Lang::Es, Conclusion) => &["conclusión", "resumen", "síntesis"],
        (Lang::Es, References) => &["referencias", "bibliografía", "citas"],
        (Lang::Es, TableOfContents) => &["índice", "contenido", "tabla de contenidos"],

        (Lang::Fr, Part) => &["partie", "section", "chapitre"],
        (Lang::Fr, Appendix) => &["annexe", "appendice", "complément"],
        (Lang::Fr, Chapter) => &["chapitre", "chap"],
        (Lang::Fr, Introduction) => &["introduction", "présentation", "avant-propos"],
        (Lang::Fr, Conclusion) => &["conclusion", "résumé", "synthèse"],
        (Lang::Fr, References) => &["références", "bibliographie", "citations"],
        (Lang::Fr, TableOfContents) => &["table des matières", "sommaire", "contenu"],

        (Lang::De, Part) => &["teil", "abschnitt", "kapitel"],
        (Lang::De, Appendix) => &["anhang", "anlage", "beilage"],
        (Lang::De, Chapter) => &["kapitel", "kap"],
        (Lang::De, Introduction) => &["einführung", "einleitung", "vorwort"],
        (Lang::De, Conclusion) => &["schlussfolgerung", "zusammenfassung", "fazit"],
        (Lang::De, References) => &["literatur", "bibliographie", "quellen"],
        (Lang::De, TableOfContents) => &["inhaltsverzeichnis", "inhalt"],

        (Lang::Ar, Part) => &["جزء", "قسم", "فصل", "باب"],
        (Lang::Ar, Appendix) => &["ملحق", "مرفق", "ضميمة"],
        (Lang::Ar, Chapter) => &["فصل", "باب"],
        (Lang::Ar, Introduction) => &["مقدمة", "تمهيد", "استهلال"],
        (Lang::Ar, Conclusion) => &["خاتمة", "استنتاج", "ملخص"],
        (Lang::Ar, References) => &["مراجع", "مصادر", "ببليوغرافيا"],
        (Lang::Ar, TableOfContents) => &["فهرس المحتويات", "المحتويات", "فهرس"],

        (Lang::Ko, Part) => &["부", "편", "장"],
        (Lang::Ko, Appendix) => &["부록", "첨부", "참고자료"],
        (Lang::Ko, Chapter) => &["장", "챕터"],
        (Lang::Ko, Introduction) => &["서론", "도입", "개요", "머리말"],
        (Lang::Ko, Conclusion) => &["결론", "요약", "맺음말", "정리"],
        (Lang::Ko, References) => &["참고문헌", "인용문헌", "문헌", "참조"],
        (Lang::Ko, TableOfContents) => &["목차", "차례", "내용"],

        (Lang::Ru, Part) => &["часть", "раздел", "глава"],
        (Lang::Ru, Appendix) => &["приложение", "дополнение"],
        (Lang::Ru, Chapter) => &["глава", "гл"],
        (Lang::Ru, Introduction) => &["введение", "предисловие", "вступление"],
        (Lang::Ru, Conclusion) => &["заключение", "выводы", "резюме"],
        (Lang::Ru, References) => &["литература", "библиография", "источники"],
        (Lang::Ru, TableOfContents) => &["содержание", "оглавление"],
    }
}

/// Month names (full and abbreviated) used for date detection.
pub fn month_names(lang: Lang) -> &'static [&'static str] {
    match lang {
        Lang::En => &[
            "january", "february", "march", "april", "may", "june", "july", "august",
            "september", "october", "november", "december", "jan", "feb", "mar", "apr",
            "jun", "jul", "aug", "sep", "oct", "nov", "dec",
        ],
        Lang::Ja | Lang::Ko => &[],
        Lang::Zh => &[
            "十一月", "十二月", "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月",
            "九月", "十月",
        ],
        Lang::Es => &[
            "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
            "septiembre", "octubre", "noviembre", "diciembre", "ene", "feb", "mar", "abr",
            "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
        ],
        Lang::Fr => &[
            "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
            "septembre", "octobre", "novembre", "décembre", "janv", "févr", "avr", "juil",
            "sept", "oct", "nov", "déc",
        ],
        Lang::De => &[
            "januar", "februar", "märz", "april", "mai", "juni", "juli", "august",
            "september", "oktober", "november", "dezember", "jan", "feb", "mär", "apr",
            "jun", "jul", "aug", "sep", "okt", "nov", "dez",
        ],
        Lang::Ar => &[
            "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس", "سبتمبر",
            "أكتوبر", "نوفمبر", "ديسمبر",
        ],
        Lang::Ru => &[
            "январь", "февраль", "март", "апрель", "май", "июнь", "июль", "август",
            "сентябрь", "октябрь", "ноябрь", "декабрь", "янв", "фев", "мар", "апр", "июн",
            "июл", "авг", "сен", "окт", "ноя", "дек",
        ],
    }
}

/// Warning and instruction words, lower-cased.
pub fn warning_words(lang: Lang) -> &'static [&'static str] {
    match lang {
        Lang::En => &["required", "must", "mandatory", "warning", "notice", "important", "attention"],
        Lang::Ja => &["必須", "必要", "注意", "警告", "重要", "お知らせ", "義務"],
        Lang::Zh => &["必需", "必须", "必須", "注意", "警告", "重要", "通知", "强制", "強制"],
        Lang::Es => &["requerido", "obligatorio", "advertencia", "aviso", "importante", "atención"],
        Lang::Fr => &["requis", "obligatoire", "avertissement", "avis", "important", "attention"],
        Lang::De => &["erforderlich", "pflicht", "warnung", "hinweis", "wichtig", "achtung"],
        Lang::Ar => &["مطلوب", "إجباري", "تحذير", "إشعار", "مهم", "انتباه"],
        Lang::Ko => &["필수", "필요", "주의", "경고", "중요", "알림", "의무"],
        Lang::Ru => &["обязательно", "необходимо", "предупреждение", "уведомление", "важно", "внимание"],
    }
}

/// Keywords of one category across a language list, in order.
pub fn keywords_for(langs: &[Lang], category: KeywordCategory) -> Vec<&'static str> {
    langs
        .iter()
        .flat_map(|lang| heading_keywords(*lang, category).iter().copied())
        .collect()
}

/// Build a regex alternation (`a|b|c`) of escaped literals, longest first.
pub fn alternation<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.into_iter().collect();
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    words.dedup();
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}
