//! Outline assembly: walks every line of the document and decides which
//! ones are headings.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::config::AnalysisConfig;
use super::formatting::{average_font_size, classify_by_formatting};
use super::keywords::{alternation, heading_keywords, KeywordCategory, Lang};
use super::language::detect_language;
use super::lists::{detect_list_item, ListWindow};
use super::noise::should_skip;
use super::normalize::normalize;
use super::pattern::classify_by_pattern;
use super::rules::RuleTable;
use super::title::{is_word_bounded, reconstruct_title};
use crate::model::{
    Document, HeadingLevel, HeadingRecord, Line, ListSequence, OutlineReport, OutlineResult,
    Page, Span,
};

static TOC_HEADINGS: LazyLock<Vec<RuleTable<()>>> = LazyLock::new(|| {
    Lang::ALL
        .iter()
        .map(|lang| {
            let words = alternation(toc_keywords(*lang));
            RuleTable::new().rule("toc_heading", &format!(r"(?i)^(?:{})$", words), ())
        })
        .collect()
});

static NUMBERED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("valid pattern"));

fn toc_keywords(lang: Lang) -> impl Iterator<Item = &'static str> {
    lang.with_fallback()
        .iter()
        .flat_map(|l| heading_keywords(*l, KeywordCategory::TableOfContents).iter().copied())
}

/// Why a line with a plausible heading text was rejected by its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exclusion {
    Table,
    FormBox,
    Direction,
    RightAligned,
}

/// One or more consecutive lines read as a single heading candidate.
struct MergedLine<'a> {
    text: String,
    spans: Vec<&'a Span>,
    first: &'a Line,
}

impl MergedLine<'_> {
    fn any_bold(&self) -> bool {
        self.spans.iter().any(|s| s.bold)
    }

    fn all_bold(&self) -> bool {
        self.spans.iter().all(|s| s.bold)
    }

    fn max_font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }
}

fn mean_size(spans: &[&Span]) -> f32 {
    if spans.is_empty() {
        0.0
    } else {
        spans.iter().map(|s| s.font_size).sum::<f32>() / spans.len() as f32
    }
}

fn oriented_spans<'a>(line: &'a Line, tolerance: f32) -> Vec<&'a Span> {
    line.spans
        .iter()
        .filter(|s| !s.is_blank() && s.is_axis_aligned(tolerance))
        .collect()
}

fn joined_text(spans: &[&Span]) -> String {
    spans
        .iter()
        .map(|s| s.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_latin_or_cyrillic(word: &str) -> bool {
    word.chars()
        .any(|c| c.is_ascii_alphabetic() || ('\u{0400}'..='\u{04ff}').contains(&c))
}

/// Check whether a page's text mentions a table-of-contents keyword.
///
/// Latin and Cyrillic keywords must appear as whole words.
fn is_toc_page(page: &Page) -> bool {
    let text = page.plain_text().to_lowercase();
    let lang = detect_language(&text);
    toc_keywords(lang).any(|keyword| {
        if is_latin_or_cyrillic(keyword) {
            is_word_bounded(&text, keyword)
        } else {
            text.contains(keyword)
        }
    })
}

/// Build the outline of a document.
pub fn analyze(document: &Document, config: &AnalysisConfig) -> OutlineReport {
    OutlineAssembler::new(document, config).run()
}

struct OutlineAssembler<'a> {
    document: &'a Document,
    config: &'a AnalysisConfig,
    average: f32,
    title: String,
    processed: HashSet<String>,
    outline: Vec<HeadingRecord>,
    lists: Vec<ListSequence>,
}

impl<'a> OutlineAssembler<'a> {
    fn new(document: &'a Document, config: &'a AnalysisConfig) -> Self {
        let average = average_font_size(document, config.sample_pages);
        let title = document
            .pages
            .first()
            .map(|page| reconstruct_title(page, config))
            .unwrap_or_default();

        log::debug!("average font size {:.2}, title {:?}", average, title);

        Self {
            document,
            config,
            average,
            title,
            processed: HashSet::new(),
            outline: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn run(mut self) -> OutlineReport {
        let document = self.document;
        for (index, page) in document.pages.iter().enumerate() {
            let toc_page = is_toc_page(page);
            for block in &page.blocks {
                self.walk_block(page, index == 0, toc_page, &block.lines);
            }
        }

        let mut outline = std::mem::take(&mut self.outline);
        outline.sort_by(|a, b| a.page.cmp(&b.page).then_with(|| a.text.cmp(&b.text)));
        let mut seen = HashSet::new();
        outline.retain(|h| seen.insert((h.level, h.text.clone())));

        log::info!(
            "Extracted {} headings from {} pages",
            outline.len(),
            document.page_count()
        );

        let title = if self.title.is_empty() {
            String::new()
        } else {
            normalize(&self.title, true)
        };

        OutlineReport {
            result: OutlineResult { title, outline },
            lists: self.lists,
        }
    }

    fn walk_block(&mut self, page: &'a Page, first_page: bool, toc_page: bool, lines: &'a [Line]) {
        let mut i = 0;
        while i < lines.len() {
            let start = i;
            let merged = self.merge_lines(lines, &mut i);
            i += 1;
            self.consider(page, first_page, toc_page, lines, start, merged);
        }
    }

    /// Read the line at `*i` and absorb the following lines that continue it.
    /// Leaves `*i` on the last absorbed line.
    /// Gaps are measured from the bottom of the first line.
    fn merge_lines(&self, lines: &'a [Line], i: &mut usize) -> MergedLine<'a> {
        let tolerance = self.config.rotation_tolerance;
        let first = &lines[*i];
        let mut spans = oriented_spans(first, tolerance);
        let mut parts = vec![joined_text(&spans)];

        while *i + 1 < lines.len() {
            let next = &lines[*i + 1];
            let next_spans = oriented_spans(next, tolerance);
            if next_spans.is_empty() {
                break;
            }

            let size = mean_size(&spans);
            let next_size = mean_size(&next_spans);
            let gap = (next.bbox.y0 - first.bbox.y1).abs();

            if (size - next_size).abs() > self.config.merge_size_delta
                || gap > size * self.config.merge_gap_factor
            {
                break;
            }

            parts.push(joined_text(&next_spans));
            spans.extend(next_spans);
            *i += 1;
        }

        let raw = parts
            .iter()
            .filter(|p| !p.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        MergedLine {
            text: normalize(&raw, false),
            spans,
            first,
        }
    }

    fn exclusion(&self, page: &Page, line: &MergedLine<'_>) -> Option<Exclusion> {
        let bbox = &line.first.bbox;
        if page.in_table(bbox) {
            return Some(Exclusion::Table);
        }
        if self.config.in_form_box(page, bbox) {
            return Some(Exclusion::FormBox);
        }

        let lang = detect_language(&line.text);
        let x = bbox.x0;
        if lang.is_rtl() {
            if x <= page.width * self.config.rtl_min_x_ratio {
                return Some(Exclusion::Direction);
            }
        } else {
            if x >= page.width * self.config.ltr_max_x_ratio {
                return Some(Exclusion::Direction);
            }
            if x > page.width * self.config.right_align_ratio {
                return Some(Exclusion::RightAligned);
            }
        }
        None
    }

    /// Whether `text` is the title itself, ignoring case and outer spaces.
    fn is_title(&self, text: &str) -> bool {
        !self.title.is_empty() && text.trim().to_lowercase() == self.title.trim().to_lowercase()
    }

    /// Whether `text` is the title or a short run of its words.
    fn is_title_related(&self, text: &str) -> bool {
        if self.title.is_empty() {
            return false;
        }
        if self.is_title(text) {
            return true;
        }
        let title = self.title.to_lowercase();
        let lower = text.to_lowercase();

        let title_words: HashSet<&str> = title.split_whitespace().collect();
        let line_words: HashSet<&str> = lower.split_whitespace().collect();
        !line_words.is_empty()
            && line_words.len() <= 3
            && line_words.iter().all(|w| title_words.contains(w))
    }

    fn heading_level(&self, line: &MergedLine<'_>) -> Option<HeadingLevel> {
        if line.any_bold() && !line.all_bold() {
            log::debug!("mixed bold, skipping formatting: {:?}", line.text);
        } else if let Some(level) = line
            .spans
            .iter()
            .find_map(|s| classify_by_formatting(s, self.average))
        {
            return Some(level);
        }
        classify_by_pattern(&line.text)
    }

    fn consider(
        &mut self,
        page: &Page,
        first_page: bool,
        toc_page: bool,
        lines: &'a [Line],
        index: usize,
        line: MergedLine<'a>,
    ) {
        let text = line.text.as_str();
        let chars = text.chars().count();
        if chars <= self.config.min_heading_chars
            || chars >= self.config.max_heading_chars
            || line.spans.is_empty()
            || self.processed.contains(text)
        {
            return;
        }

        let spans: Vec<Span> = line.spans.iter().map(|s| (*s).clone()).collect();
        if should_skip(text, Some(&spans)) {
            return;
        }
        if self.is_title(text) || (first_page && self.is_title_related(text)) {
            log::debug!("title text: {:?}", text);
            return;
        }
        if let Some(reason) = self.exclusion(page, &line) {
            log::debug!("excluded ({:?}): {:?}", reason, text);
            return;
        }

        if toc_page {
            let lang = detect_language(text);
            let toc_heading = TOC_HEADINGS[lang.index()].is_match(text);
            if !toc_heading && !(NUMBERED_PREFIX.is_match(text) && line.any_bold()) {
                return;
            }
        }

        let Some(level) = self.heading_level(&line) else {
            return;
        };

        let window = ListWindow {
            lines: self.config.list_window,
            min_siblings: self.config.list_min_siblings,
        };
        if let Some(sequence) = detect_list_item(text, lines, index, &window) {
            self.lists.push(ListSequence {
                page: page.number,
                ..sequence
            });
            return;
        }

        if first_page && !line.any_bold() && line.max_font_size() >= self.config.first_page_max_size
        {
            log::debug!("large unbolded page-1 text: {:?}", text);
            return;
        }

        log::debug!("{} on page {}: {:?}", level, page.number, text);
        self.outline
            .push(HeadingRecord::new(level, normalize(text, true), page.number));
        self.processed.insert(line.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Rect};

    fn span(text: &str, size: f32, bold: bool, x: f32, y: f32) -> Span {
        let width = text.chars().count() as f32 * size * 0.5;
        Span::new(text, size, bold, Rect::new(x, y, x + width, y + size))
    }

    fn line(text: &str, size: f32, bold: bool, y: f32) -> Line {
        Line::new(vec![span(text, size, bold, 72.0, y)])
    }

    fn single_block_page(number: u32, lines: Vec<Line>) -> Page {
        let mut page = Page::letter(number);
        page.add_block(Block::new(lines));
        page
    }

    fn body(start_y: f32, count: usize) -> Vec<Line> {
        (0..count)
            .map(|i| {
                line(
                    "Plain body text, which runs along the page.",
                    10.0,
                    false,
                    start_y + i as f32 * 40.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_merge_lines_joins_continuations() {
        let lines = vec![
            line("Strategic", 14.0, true, 100.0),
            line("Priorities", 14.0, true, 116.0),
            line("Body", 10.0, false, 200.0),
        ];
        let doc = Document::new();
        let config = AnalysisConfig::default();
        let assembler = OutlineAssembler::new(&doc, &config);

        let mut i = 0;
        let merged = assembler.merge_lines(&lines, &mut i);
        assert_eq!(merged.text, "Strategic Priorities");
        assert_eq!(i, 1);
        assert_eq!(merged.spans.len(), 2);
    }

    #[test]
    fn test_rotated_spans_are_ignored() {
        let lines = vec![Line::new(vec![
            span("Upright", 12.0, false, 72.0, 100.0),
            span("Tilted", 12.0, false, 150.0, 100.0).with_rotation(30.0),
        ])];
        let doc = Document::new();
        let config = AnalysisConfig::default();
        let assembler = OutlineAssembler::new(&doc, &config);

        let mut i = 0;
        assert_eq!(assembler.merge_lines(&lines, &mut i).text, "Upright");
    }

    #[test]
    fn test_bold_heading_on_second_page() {
        let mut doc = Document::new();
        doc.add_page(single_block_page(1, body(100.0, 5)));
        let mut lines = vec![line("Background", 10.0, true, 80.0)];
        lines.extend(body(140.0, 5));
        doc.add_page(single_block_page(2, lines));

        let report = analyze(&doc, &AnalysisConfig::default());
        assert_eq!(
            report.result.outline,
            vec![HeadingRecord::new(HeadingLevel::H2, "Background ", 2)]
        );
    }

    #[test]
    fn test_right_aligned_and_table_lines_are_excluded() {
        let mut page = single_block_page(
            2,
            vec![
                Line::new(vec![span("Summary", 10.0, true, 400.0, 80.0)]),
                line("Milestones", 10.0, true, 300.0),
            ],
        );
        page.tables.push(Rect::new(50.0, 280.0, 560.0, 360.0));
        let mut doc = Document::new();
        doc.add_page(single_block_page(1, body(100.0, 3)));
        doc.add_page(page);

        let report = analyze(&doc, &AnalysisConfig::default());
        assert!(report.result.outline.is_empty());
    }

    #[test]
    fn test_toc_page_keeps_only_toc_heading() {
        let mut doc = Document::new();
        doc.add_page(single_block_page(1, body(100.0, 3)));
        doc.add_page(single_block_page(
            2,
            vec![
                line("Table of Contents", 10.0, true, 80.0),
                line("Background", 10.0, true, 200.0),
            ],
        ));

        let report = analyze(&doc, &AnalysisConfig::default());
        let texts: Vec<_> = report.result.outline.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Table of Contents "]);
    }

    #[test]
    fn test_toc_keyword_is_word_bounded() {
        let page = single_block_page(3, vec![line("Stock levels", 10.0, false, 80.0)]);
        assert!(!is_toc_page(&page));
        let page = single_block_page(3, vec![line("Contents", 10.0, false, 80.0)]);
        assert!(is_toc_page(&page));
    }

    #[test]
    fn test_title_related_lines() {
        let mut doc = Document::new();
        doc.add_page(single_block_page(1, vec![line("Annual Report", 24.0, false, 40.0)]));
        let config = AnalysisConfig::default();
        let assembler = OutlineAssembler::new(&doc, &config);

        assert_eq!(assembler.title, "Annual Report");
        assert!(assembler.is_title_related("annual report"));
        assert!(assembler.is_title_related("Report"));
        assert!(!assembler.is_title_related("Report Card"));
        assert!(assembler.is_title(" ANNUAL REPORT "));
        assert!(!assembler.is_title("Annual"));
    }

    #[test]
    fn test_merge_gap_measured_from_first_line() {
        let lines = vec![
            line("Alpha Beta", 12.0, true, 100.0),
            line("Gamma Delta", 12.0, true, 114.0),
            line("Epsilon Zeta", 12.0, true, 128.0),
            line("Theta Iota", 12.0, true, 142.0),
        ];
        let doc = Document::new();
        let config = AnalysisConfig::default();
        let assembler = OutlineAssembler::new(&doc, &config);

        let mut i = 0;
        let merged = assembler.merge_lines(&lines, &mut i);
        assert_eq!(merged.text, "Alpha Beta Gamma Delta Epsilon Zeta");
        assert_eq!(i, 2);

        i += 1;
        assert_eq!(assembler.merge_lines(&lines, &mut i).text, "Theta Iota");
        assert_eq!(i, 3);
    }

    #[test]
    fn test_title_in_capitals_on_later_page() {
        let mut p1 = vec![line("Annual Report", 24.0, false, 40.0)];
        p1.extend(body(200.0, 3));
        let mut p2 = vec![line("ANNUAL REPORT", 12.0, true, 40.0)];
        p2.extend(body(100.0, 3));

        let mut doc = Document::new();
        doc.add_page(single_block_page(1, p1));
        doc.add_page(single_block_page(2, p2));

        let report = analyze(&doc, &AnalysisConfig::default());
        assert_eq!(report.result.title, "Annual Report ");
        assert!(report.result.outline.is_empty());
    }

    #[test]
    fn test_word_containing_toc_does_not_mark_toc_page() {
        // "stock" contains "toc"; a substring match would drop "Background"
        let mut doc = Document::new();
        doc.add_page(single_block_page(1, body(100.0, 3)));
        doc.add_page(single_block_page(
            2,
            vec![
                line("Background", 10.0, true, 80.0),
                line("Stock levels remained stable, as expected.", 10.0, false, 200.0),
            ],
        ));

        let report = analyze(&doc, &AnalysisConfig::default());
        assert_eq!(
            report.result.outline,
            vec![HeadingRecord::new(HeadingLevel::H2, "Background ", 2)]
        );
    }
}
