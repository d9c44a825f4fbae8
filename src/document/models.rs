//! Core data structures for the parsed document
//!
//! This module defines the output of a parse: classified paragraphs, the
//! section tree, captioned tables and numbered figures. A `DocumentStructure`
//! owns everything it contains and is never mutated after the parse returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Free-form document metadata, keyed by name
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Options controlling one parse invocation
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Run the text normalizer over every paragraph before parsing
    pub clean: bool,
    pub cleaning_rules: crate::document::cleanup::CleaningRules,
    /// Directory that image relationship targets are resolved against
    pub media_dir: Option<PathBuf>,
    /// Skip images whose target file is missing under `media_dir`
    pub verify_image_targets: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            clean: false,
            cleaning_rules: Default::default(),
            media_dir: None,
            verify_image_targets: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphType {
    Title,
    Content,
    ListItem,
    Table,
    Image,
    Reference,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paragraph {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ParagraphType,
    /// Title level; 0 for the document title, 1..N for headings
    pub level: u32,
    /// Position among all body paragraphs, blank ones included
    pub index: usize,
    pub style: Option<String>,
}

impl Paragraph {
    pub fn is_title(&self) -> bool {
        self.kind == ParagraphType::Title
    }

    /// True for paragraphs carrying the document-title style
    pub fn is_document_title(&self) -> bool {
        self.is_title() && self.style.as_deref() == Some("Title")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub title: Option<Paragraph>,
    pub level: u32,
    pub paragraphs: Vec<Paragraph>,
    pub subsections: Vec<Section>,
    pub start_index: usize,
    pub end_index: usize,
}

impl Section {
    pub fn title_text(&self) -> &str {
        self.title.as_ref().map(|t| t.text.trim()).unwrap_or("")
    }

    /// Number of sections in this subtree, this one included
    pub fn count(&self) -> usize {
        1 + self.subsections.iter().map(Section::count).sum::<usize>()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableCell {
    pub text: String,
    pub row: usize,
    pub col: usize,
    pub is_header: bool,
    pub rowspan: usize,
    pub colspan: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub cells: Vec<TableCell>,
    pub num_rows: usize,
    pub num_cols: usize,
    pub caption: Option<String>,
}

impl Table {
    /// Cell whose origin is at `(row, col)`
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Cells grouped by row, in column order
    pub fn rows(&self) -> Vec<Vec<&TableCell>> {
        let mut rows = vec![Vec::new(); self.num_rows];
        for cell in &self.cells {
            if let Some(row) = rows.get_mut(cell.row) {
                row.push(cell);
            }
        }
        for row in rows.iter_mut() {
            row.sort_by_key(|c| c.col);
        }
        rows
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub path: String,
    pub caption: Option<String>,
    /// `{chapter}-{counter}`
    pub figure_number: String,
    pub relationship_id: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentStructure {
    pub title: Option<String>,
    pub sections: Vec<Section>,
    pub paragraphs: Vec<Paragraph>,
    pub tables: Vec<Table>,
    pub images: Vec<Image>,
    pub metadata: Metadata,
    /// Recoverable problems met while parsing
    pub warnings: Vec<String>,
}

impl DocumentStructure {
    pub fn paragraphs_of_type(&self, kind: ParagraphType) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter().filter(move |p| p.kind == kind)
    }

    pub fn section_count(&self) -> usize {
        self.sections.iter().map(Section::count).sum()
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub location: SearchLocation,
    pub text: String,
    pub start_pos: usize,
    pub end_pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLocation {
    /// Index into `DocumentStructure::paragraphs`
    Paragraph(usize),
    TableCell { table: usize, row: usize, col: usize },
    ImageCaption(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineItem {
    pub title: String,
    pub level: u32,
    pub depth: usize,
    pub start_index: usize,
    pub end_index: usize,
}
