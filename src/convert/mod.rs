//! Document driver: discovery, per-document conversion and the batch engine

pub mod discover;
pub mod document;
pub mod engine;

pub use discover::{DocumentFilter, discover};
pub use document::{ConvertedDocument, DocumentOutcome, convert_text};
pub use engine::{BatchOutcome, ConvertOptions, convert_batch};
