//! Document model types.
//!
//! The model is the contract between the decoding collaborators
//! (`parser`) and the outline engine (`outline`). Anything that can build a
//! [`Document`] can be analyzed, so every type here is (de)serializable.

mod document;
mod geometry;
mod outline;

pub use document::{Block, Document, Line, Page, Span};
pub use geometry::Rect;
pub use outline::{HeadingLevel, HeadingRecord, ListSequence, OutlineReport, OutlineResult};
