//! docstruct: structural parser for .docx files
//!
//! This library turns Microsoft Word documents into a structured
//! representation: classified paragraphs, a section hierarchy, tables with
//! their captions and figures numbered by chapter.

pub mod config;
pub mod document;
pub mod error;
pub mod export;

/// Export format options
#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum ExportFormat {
    /// Full structure as pretty-printed JSON
    #[default]
    Json,
    /// Section tree with a table and figure summary
    Outline,
    /// Paragraph text only
    Text,
}

// Re-export commonly used types
pub use config::Config;
pub use document::{load_document, parse_bytes, DocumentStructure, ParseOptions};
pub use error::{Error, ImageResolutionError, Result};
