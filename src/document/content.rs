//! Decoded document content
//!
//! The parser does not look at XML. It consumes this element model, which the
//! .docx decoder fills in and which tests can build by hand: every body
//! paragraph with its resolved style, the raw element stream in document
//! order, and the relationships of the main document part.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

static HEADING_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^heading\s*(\d+)$").unwrap());

static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*$").unwrap());

/// Relationship type of embedded pictures
pub const IMAGE_RELATIONSHIP_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// A resolved paragraph style: its display name and, for headings, the level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub name: String,
    pub heading_level: Option<u32>,
}

impl ParagraphStyle {
    pub fn new(name: &str) -> Self {
        let name = canonical_style_name(name);
        let heading_level = if name.starts_with("Heading") {
            TRAILING_NUMBER
                .captures(&name)
                .and_then(|c| c[1].parse().ok())
        } else {
            None
        };
        Self {
            name,
            heading_level,
        }
    }

    pub fn is_title(&self) -> bool {
        self.name == "Title"
    }

    pub fn is_heading(&self) -> bool {
        self.name.starts_with("Heading")
    }

    pub fn is_caption(&self) -> bool {
        self.name == "Caption"
    }
}

/// Map Word's built-in style names and ids onto their display names.
///
/// styles.xml stores built-ins in lower case (`heading 1`), while paragraph
/// properties reference ids (`Heading1`). Both become `Heading 1`.
pub fn canonical_style_name(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(caps) = HEADING_STYLE.captures(raw) {
        return format!("Heading {}", &caps[1]);
    }
    match raw.to_ascii_lowercase().as_str() {
        "title" => "Title".to_string(),
        "caption" => "Caption".to_string(),
        "heading" => "Heading".to_string(),
        _ => raw.to_string(),
    }
}

/// Capability query for paragraph styles
pub trait StyleResolver {
    /// Resolve a style id into its structured form; `None` when nothing is known
    fn resolve(&self, style_id: &str) -> Option<ParagraphStyle>;
}

/// Resolver with no style table: ids are canonicalised as they are
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityStyles;

impl StyleResolver for IdentityStyles {
    fn resolve(&self, style_id: &str) -> Option<ParagraphStyle> {
        if style_id.trim().is_empty() {
            None
        } else {
            Some(ParagraphStyle::new(style_id))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphElement {
    /// Position among all body paragraphs
    pub index: usize,
    pub text: String,
    pub style: Option<ParagraphStyle>,
}

impl ParagraphElement {
    pub fn style_name(&self) -> Option<&str> {
        self.style.as_ref().map(|s| s.name.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalMerge {
    Restart,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub text: String,
    pub grid_span: usize,
    pub vertical_merge: Option<VerticalMerge>,
}

impl GridCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grid_span: 1,
            vertical_merge: None,
        }
    }

    pub fn with_span(mut self, span: usize) -> Self {
        self.grid_span = span.max(1);
        self
    }

    pub fn with_vertical_merge(mut self, merge: VerticalMerge) -> Self {
        self.vertical_merge = Some(merge);
        self
    }
}

/// A table as stored in the document: rows of physical cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableGrid {
    pub rows: Vec<Vec<GridCell>>,
    /// Column count declared by the table grid, 0 when absent
    pub declared_columns: usize,
}

impl TableGrid {
    /// Plain grid without merges
    pub fn from_text<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(GridCell::new).collect())
                .collect(),
            declared_columns: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingRef {
    /// Relationship ids embedded by the drawing
    pub relationship_ids: Vec<String>,
    /// Extent in pixels
    pub extent: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamElement {
    /// Position in `DocumentContent::paragraphs`
    Paragraph(usize),
    Table(TableGrid),
    Drawing(DrawingRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

impl Relationship {
    pub fn is_image(&self) -> bool {
        self.rel_type == IMAGE_RELATIONSHIP_TYPE || self.rel_type.ends_with("/image")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub author: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub paragraphs: Vec<ParagraphElement>,
    pub stream: Vec<StreamElement>,
    pub relationships: Vec<Relationship>,
    /// Directory image targets are resolved against
    pub base_dir: Option<PathBuf>,
    pub properties: CoreProperties,
}

impl DocumentContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a body paragraph, returning its index
    pub fn push_paragraph(&mut self, text: impl Into<String>, style: Option<ParagraphStyle>) -> usize {
        let index = self.paragraphs.len();
        self.paragraphs.push(ParagraphElement {
            index,
            text: text.into(),
            style,
        });
        self.stream.push(StreamElement::Paragraph(index));
        index
    }

    /// Append a paragraph whose style id is resolved without a style table
    pub fn push_styled(&mut self, text: impl Into<String>, style_id: &str) -> usize {
        self.push_paragraph(text, IdentityStyles.resolve(style_id))
    }

    pub fn push_table(&mut self, grid: TableGrid) {
        self.stream.push(StreamElement::Table(grid));
    }

    pub fn push_drawing(&mut self, drawing: DrawingRef) {
        self.stream.push(StreamElement::Drawing(drawing));
    }

    pub fn add_relationship(&mut self, id: &str, rel_type: &str, target: &str) {
        self.relationships.push(Relationship {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
    }

    pub fn add_image_relationship(&mut self, id: &str, target: &str) {
        self.add_relationship(id, IMAGE_RELATIONSHIP_TYPE, target);
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Iterate the stream, resolving paragraph positions
    pub fn elements(&self) -> impl Iterator<Item = ContentRef<'_>> {
        self.stream.iter().filter_map(move |element| match element {
            StreamElement::Paragraph(pos) => self.paragraphs.get(*pos).map(ContentRef::Paragraph),
            StreamElement::Table(grid) => Some(ContentRef::Table(grid)),
            StreamElement::Drawing(drawing) => Some(ContentRef::Drawing(drawing)),
        })
    }
}

/// Borrowed view of one stream element
#[derive(Debug, Clone, Copy)]
pub enum ContentRef<'a> {
    Paragraph(&'a ParagraphElement),
    Table(&'a TableGrid),
    Drawing(&'a DrawingRef),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_style_names() {
        assert_eq!(canonical_style_name("heading 1"), "Heading 1");
        assert_eq!(canonical_style_name("Heading2"), "Heading 2");
        assert_eq!(canonical_style_name("caption"), "Caption");
        assert_eq!(canonical_style_name("Title"), "Title");
        assert_eq!(canonical_style_name("List Bullet 2"), "List Bullet 2");
    }

    #[test]
    fn test_style_heading_level() {
        assert_eq!(ParagraphStyle::new("Heading3").heading_level, Some(3));
        assert_eq!(ParagraphStyle::new("Heading").heading_level, None);
        assert_eq!(ParagraphStyle::new("Normal").heading_level, None);
        assert!(ParagraphStyle::new("caption").is_caption());
    }

    #[test]
    fn test_stream_keeps_document_order() {
        let mut content = DocumentContent::new();
        content.push_styled("表1-1 设备", "Caption");
        content.push_table(TableGrid::from_text([["a", "b"]]));
        content.push_paragraph("正文", None);

        let kinds: Vec<&str> = content
            .elements()
            .map(|e| match e {
                ContentRef::Paragraph(_) => "p",
                ContentRef::Table(_) => "t",
                ContentRef::Drawing(_) => "d",
            })
            .collect();
        assert_eq!(kinds, ["p", "t", "p"]);
        assert_eq!(content.paragraphs[1].index, 1);
    }

    #[test]
    fn test_empty_style_id_does_not_resolve() {
        assert!(IdentityStyles.resolve("  ").is_none());
    }
}
