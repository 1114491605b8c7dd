//! Shared helpers for building small PDFs in memory.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of text: content, font size, bold, baseline.
pub struct TextLine {
    pub text: &'static str,
    pub size: i64,
    pub bold: bool,
    pub baseline: i64,
}

pub const fn text(text: &'static str, size: i64, bold: bool, baseline: i64) -> TextLine {
    TextLine {
        text,
        size,
        bold,
        baseline,
    }
}

fn page_operations(lines: &[TextLine]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for line in lines {
        let font = if line.bold { "F1" } else { "F2" };
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(line.size)],
        ));
        ops.push(Operation::new(
            "Td",
            vec![Object::Integer(72), Object::Integer(line.baseline)],
        ));
        ops.push(Operation::new("Tj", vec![Object::string_literal(line.text)]));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

/// Build an A4 PDF with one entry of `pages` per page.
pub fn build_pdf(pages: &[Vec<TextLine>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => bold_id,
            "F2" => regular_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let content = Content {
            operations: page_operations(lines),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

const BODY: &str = "Plain body text, which runs along the page.";

/// A two-page report: a 24pt title, body text, and a bold heading on page 2.
pub fn sample_report() -> Vec<u8> {
    let page1 = vec![
        text("Annual Report", 24, true, 760),
        text(BODY, 10, false, 680),
        text(BODY, 10, false, 640),
        text(BODY, 10, false, 600),
        text(BODY, 10, false, 560),
    ];
    let page2 = vec![
        text("Background", 16, true, 780),
        text(BODY, 10, false, 720),
        text(BODY, 10, false, 680),
        text(BODY, 10, false, 640),
        text(BODY, 10, false, 600),
    ];
    build_pdf(&[page1, page2])
}
