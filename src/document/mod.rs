//! Document parsing and data structures module
//!
//! This module provides functionality for parsing Microsoft Word (.docx) documents
//! and converting them into a structured representation: classified paragraphs,
//! a section tree, captioned tables and numbered figures.

pub mod cleanup;
pub mod content;
pub(crate) mod decode;
pub(crate) mod io;
pub mod loader;
pub mod models;
pub(crate) mod parsing;
pub mod query;

// Re-export all models and query functions
pub use models::*;
pub use query::*;

pub use cleanup::{clean_text, CleaningRules, CleaningStats, DocumentCleaner, TextNormalizer};
pub use content::{
    DocumentContent, DrawingRef, GridCell, ParagraphStyle, Relationship, StyleResolver, TableGrid,
    VerticalMerge,
};
pub use decode::decode_docx;
pub use io::StyleSheet;
pub use loader::{load_document, parse_bytes, parse_content};
