//! Document structure inference.
//!
//! The engine consumes a [`Document`](crate::model::Document) and produces
//! an [`OutlineReport`](crate::model::OutlineReport). Every text-level
//! decision lives in its own module:
//!
//! - [`language`] guesses the language of a fragment
//! - [`normalize`] repairs spacing artifacts
//! - [`noise`] rejects text that is not a heading
//! - [`pattern`] and [`formatting`] assign heading levels
//! - [`lists`] suppresses numbered list items
//! - [`title`] rebuilds the document title
//! - [`assembler`] walks the document and combines the above

pub mod assembler;
pub mod config;
pub mod formatting;
pub mod keywords;
pub mod language;
pub mod lists;
pub mod noise;
pub mod normalize;
pub mod pattern;
pub mod rules;
pub mod title;

pub use assembler::analyze;
pub use config::AnalysisConfig;
pub use formatting::{average_font_size, classify_by_formatting};
pub use keywords::{KeywordCategory, Lang};
pub use language::detect_language;
pub use lists::{detect_list_item, is_list_item, ListWindow};
pub use noise::{classify_noise, should_skip, NoiseReason};
pub use normalize::normalize;
pub use pattern::{classify_by_pattern, HeadingRules};
pub use rules::{Rule, RuleTable};
pub use title::{deduplicate_title, reconstruct_title, TitleCandidate};
