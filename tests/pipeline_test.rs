//! End-to-end tests: PDF bytes through decoding and outline inference.

mod common;

use pdf_outline::{
    extract_outline_bytes, parse_bytes, HeadingLevel, HeadingRecord, OutlineExtractor,
    ParseOptions,
};

#[test]
fn test_decode_sample_report() {
    let doc = parse_bytes(&common::sample_report()).unwrap();

    assert_eq!(doc.page_count(), 2);
    assert_eq!((doc.pages[0].width, doc.pages[0].height), (595.0, 842.0));

    let first = doc.pages[0].lines().next().unwrap();
    assert_eq!(first.text(), "Annual Report");
    assert!(first.spans[0].bold);
    assert_eq!(first.spans[0].font_size, 24.0);
    assert!(first.bbox.y0 < 100.0);

    assert_eq!(doc.pages[1].lines().count(), 5);
    assert!(doc.pages[1].tables.is_empty());
}

#[test]
fn test_extract_sample_report() {
    let result = extract_outline_bytes(&common::sample_report()).unwrap();

    assert_eq!(result.title, "Annual Report ");
    assert_eq!(
        result.outline,
        vec![HeadingRecord::new(HeadingLevel::H1, "Background ", 2)]
    );
}

#[test]
fn test_extract_without_detectors() {
    let options = ParseOptions::new().with_tables(false).with_boxes(false);
    let result = OutlineExtractor::new()
        .with_parse_options(options)
        .extract_bytes(&common::sample_report())
        .unwrap();

    assert_eq!(result.outline.len(), 1);
}

#[test]
fn test_page_without_text() {
    let bytes = common::build_pdf(&[vec![]]);
    let result = extract_outline_bytes(&bytes).unwrap();
    assert!(result.is_empty());
}
