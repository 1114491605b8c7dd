//! PDF document parser using lopdf.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{Document, Page};

use super::boxes::BoxCollector;
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ParseOptions};
use super::table_detector::TableDetector;

/// US Letter, used when no MediaBox can be resolved.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// PDF document parser.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;

        let doc = LopdfDocument::load(path)?;
        Self::with_document(doc, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let doc = LopdfDocument::load_mem(data)?;
        Self::with_document(doc, options)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn with_document(doc: LopdfDocument, options: ParseOptions) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc, options })
    }

    /// Decode every page into the page model.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();

        for (page_num, page_id) in self.doc.get_pages() {
            match self.parse_page(page_num, page_id) {
                Ok(page) => document.add_page(page),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!("Skipping text of page {}: {}", page_num, e);
                    let (width, height) = self.page_dimensions(page_id);
                    document.add_page(Page::new(page_num, width, height));
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!("Decoded {} pages", document.page_count());
        Ok(document)
    }

    /// Decode one page by its 1-based number.
    pub fn parse_page_number(&self, number: u32) -> Result<Page> {
        let pages = self.doc.get_pages();
        let page_id = pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, pages.len() as u32))?;
        self.parse_page(number, *page_id)
    }

    /// Decode a single page.
    fn parse_page(&self, page_num: u32, page_id: ObjectId) -> Result<Page> {
        let (width, height) = self.page_dimensions(page_id);
        let mut page = Page::new(page_num, width, height);

        let content = self.page_content(page_id)?;
        let fonts = match self.analyzer().page_fonts(page_id) {
            Ok(fonts) => fonts,
            Err(e) => {
                log::warn!("Page {}: font resources unavailable: {}", page_num, e);
                HashMap::new()
            }
        };

        let spans = self.analyzer().extract_spans(&content, &fonts);

        if self.options.detect_tables {
            page.tables = TableDetector::with_config(self.options.table_config.clone())
                .detect_regions(&spans, height);
        }
        if self.options.detect_boxes {
            page.boxes = BoxCollector::new(height).collect(&content);
        }

        for block in self.analyzer().build_blocks(spans, height) {
            page.add_block(block);
        }

        Ok(page)
    }

    fn analyzer(&self) -> LayoutAnalyzer<'_> {
        LayoutAnalyzer::new(&self.doc)
    }

    /// Decoded content stream operations of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Content> {
        let bytes = self.doc.get_page_content(page_id)?;
        Content::decode(&bytes).map_err(|e| Error::PdfParse(format!("content stream: {}", e)))
    }

    /// Page width and height from the (possibly inherited) MediaBox.
    fn page_dimensions(&self, page_id: ObjectId) -> (f32, f32) {
        let mut current = Some(page_id);

        // MediaBox is inheritable through the page tree
        while let Some(id) = current {
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };

            if let Ok(media_box) = dict.get(b"MediaBox") {
                let resolved = match media_box {
                    Object::Reference(r) => self.doc.get_object(*r).ok(),
                    other => Some(other),
                };
                if let Some(dims) = resolved.and_then(media_box_size) {
                    return dims;
                }
            }

            current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
        }

        DEFAULT_PAGE_SIZE
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

fn media_box_size(obj: &Object) -> Option<(f32, f32)> {
    let array = obj.as_array().ok()?;
    if array.len() < 4 {
        return None;
    }
    let n = |i: usize| super::layout::get_number(&array[i]);
    let width = (n(2)? - n(0)?).abs();
    let height = (n(3)? - n(1)?).abs();
    (width > 0.0 && height > 0.0).then_some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use lopdf::{dictionary, Stream};

    /// Build a one-page PDF with the given content operations.
    fn build_pdf(operations: Vec<Operation>, media_box_on_parent: bool) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));

        let media_box = Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]);
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        let mut pages = dictionary! {
            "Type" => "Pages",
            "Count" => 1,
        };
        if media_box_on_parent {
            pages.set("MediaBox", media_box);
        } else {
            page.set("MediaBox", media_box);
        }
        let page_id = doc.add_object(page);
        pages.set("Kids", Object::Array(vec![page_id.into()]));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("save pdf");
        bytes
    }

    fn heading_ops() -> Vec<Operation> {
        vec![
            Operation::new("re", vec![50.into(), 500.into(), 300.into(), 100.into()]),
            Operation::new("S", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), 24.into()]),
            Operation::new("Td", vec![72.into(), 760.into()]),
            Operation::new("Tj", vec![Object::string_literal("Annual Report")]),
            Operation::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_parse_single_page() {
        let bytes = build_pdf(heading_ops(), false);
        let parser = PdfParser::from_bytes(&bytes).unwrap();
        assert_eq!(parser.page_count(), 1);

        let document = parser.parse().unwrap();
        let page = &document.pages[0];
        assert_eq!(page.number, 1);
        assert_eq!((page.width, page.height), (595.0, 842.0));

        let line = page.lines().next().unwrap();
        assert_eq!(line.text(), "Annual Report");
        assert!(line.spans[0].bold);
        assert_eq!(line.spans[0].font_size, 24.0);
        // baseline 760 on an 842pt page
        assert!((line.bbox.y0 - (842.0 - 760.0 - 19.2)).abs() < 1e-3);

        assert_eq!(page.boxes, vec![crate::model::Rect::new(50.0, 242.0, 350.0, 342.0)]);
    }

    #[test]
    fn test_inherited_media_box() {
        let bytes = build_pdf(heading_ops(), true);
        let document = PdfParser::from_bytes(&bytes).unwrap().parse().unwrap();
        assert_eq!(document.pages[0].height, 842.0);
    }

    #[test]
    fn test_boxes_disabled() {
        let bytes = build_pdf(heading_ops(), false);
        let options = ParseOptions::default().with_boxes(false);
        let document = PdfParser::from_bytes_with_options(&bytes, options)
            .unwrap()
            .parse()
            .unwrap();
        assert!(document.pages[0].boxes.is_empty());
    }

    #[test]
    fn test_parse_page_number() {
        let parser = PdfParser::from_bytes(&build_pdf(heading_ops(), false)).unwrap();
        assert_eq!(parser.parse_page_number(1).unwrap().number, 1);
        assert!(matches!(
            parser.parse_page_number(3),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let result = PdfParser::from_bytes(b"plain text, not a pdf");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_media_box_size() {
        let obj = Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]);
        assert_eq!(media_box_size(&obj), Some((612.0, 792.0)));

        let short = Object::Array(vec![0.into(), 0.into()]);
        assert_eq!(media_box_size(&short), None);
    }
}
