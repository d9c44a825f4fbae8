//! .docx decoding
//!
//! Turns the bytes of a .docx package into `DocumentContent`. docx-rs reads
//! the body; the style table, relationships and core properties come from
//! their own parts. Only a package that cannot be opened or whose main
//! document part cannot be read is an error.

use std::path::PathBuf;

use super::content::{DocumentContent, StyleResolver};
use super::io::{
    parse_core_properties, parse_relationships, DocxPackage, StyleSheet, CORE_PROPERTIES_PART,
    DOCUMENT_RELS_PART, STYLES_PART,
};
use super::parsing::formatting::{extract_paragraph_drawings, extract_paragraph_text};
use super::parsing::table::{extract_table_drawings, extract_table_grid};
use crate::error::Result;

/// Decode a .docx package into the parser's element model
pub fn decode_docx(data: &[u8], base_dir: Option<PathBuf>) -> Result<DocumentContent> {
    let mut package = DocxPackage::open(data)?;
    let docx = docx_rs::read_docx(data)?;

    let styles = read_style_sheet(&mut package);
    let mut content = DocumentContent::new();
    content.base_dir = base_dir;
    content.relationships = read_relationships(&mut package);
    content.properties = package
        .read_part(CORE_PROPERTIES_PART)
        .and_then(|xml| match parse_core_properties(&xml) {
            Ok(props) => Some(props),
            Err(err) => {
                log::warn!("ignoring malformed {CORE_PROPERTIES_PART}: {err}");
                None
            }
        })
        .unwrap_or_default();

    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                for drawing in extract_paragraph_drawings(para) {
                    content.push_drawing(drawing);
                }

                let style = para
                    .property
                    .style
                    .as_ref()
                    .and_then(|style| styles.resolve(&style.val));
                content.push_paragraph(extract_paragraph_text(para), style);
            }
            docx_rs::DocumentChild::Table(table) => {
                content.push_table(extract_table_grid(table));
                for drawing in extract_table_drawings(table) {
                    content.push_drawing(drawing);
                }
            }
            _ => {
                // Section properties, bookmarks and structured tags carry no content here
            }
        }
    }

    log::debug!(
        "decoded {} paragraphs, {} stream elements, {} relationships",
        content.paragraphs.len(),
        content.stream.len(),
        content.relationships.len()
    );

    Ok(content)
}

fn read_style_sheet(package: &mut DocxPackage) -> StyleSheet {
    let Some(xml) = package.read_part(STYLES_PART) else {
        log::debug!("no {STYLES_PART}, style ids are used as names");
        return StyleSheet::default();
    };
    StyleSheet::from_xml(&xml).unwrap_or_else(|err| {
        log::warn!("ignoring malformed {STYLES_PART}: {err}");
        StyleSheet::default()
    })
}

fn read_relationships(package: &mut DocxPackage) -> Vec<super::content::Relationship> {
    let Some(xml) = package.read_part(DOCUMENT_RELS_PART) else {
        return Vec::new();
    };
    parse_relationships(&xml).unwrap_or_else(|err| {
        log::warn!("ignoring malformed {DOCUMENT_RELS_PART}: {err}");
        Vec::new()
    })
}
