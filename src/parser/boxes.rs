//! Vector rectangle collection.

use lopdf::content::Content;

use crate::model::Rect;

use super::layout::get_number;

/// Collects rectangles drawn with the `re` operator.
///
/// Coordinates are taken as written in the content stream; `cm`
/// transformations are not applied.
#[derive(Debug, Clone, Copy)]
pub struct BoxCollector {
    page_height: f32,
}

impl BoxCollector {
    pub fn new(page_height: f32) -> Self {
        Self { page_height }
    }

    /// Collect every `re` rectangle in top-left page space.
    pub fn collect(&self, content: &Content) -> Vec<Rect> {
        content
            .operations
            .iter()
            .filter(|op| op.operator == "re" && op.operands.len() >= 4)
            .filter_map(|op| {
                let x = get_number(&op.operands[0])?;
                let y = get_number(&op.operands[1])?;
                let w = get_number(&op.operands[2])?;
                let h = get_number(&op.operands[3])?;
                Some(Rect::from_origin_size(x, self.page_height - (y + h), w, h))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use lopdf::Object;

    #[test]
    fn test_collect_rectangles() {
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "re",
                    vec![
                        Object::Integer(50),
                        Object::Integer(600),
                        Object::Integer(300),
                        Object::Integer(100),
                    ],
                ),
                Operation::new("S", vec![]),
                Operation::new("re", vec![Object::Real(10.5), Object::Integer(10)]),
                Operation::new("Q", vec![]),
            ],
        };

        let boxes = BoxCollector::new(792.0).collect(&content);
        assert_eq!(boxes, vec![Rect::new(50.0, 92.0, 350.0, 192.0)]);
    }

    #[test]
    fn test_negative_height_is_normalized() {
        let content = Content {
            operations: vec![Operation::new(
                "re",
                vec![
                    Object::Integer(0),
                    Object::Integer(700),
                    Object::Integer(200),
                    Object::Integer(-100),
                ],
            )],
        };

        let boxes = BoxCollector::new(792.0).collect(&content);
        assert_eq!(boxes, vec![Rect::new(0.0, 92.0, 200.0, 192.0)]);
    }
}
