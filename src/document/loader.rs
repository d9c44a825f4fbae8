//! Document loading and orchestration
//!
//! This module contains the entry points that turn a .docx file, its bytes,
//! or already decoded content into a `DocumentStructure`, coordinating the
//! classification, sectioning, table and image passes.

use serde_json::json;
use std::path::Path;

use super::cleanup::{character_count, DocumentCleaner};
use super::content::DocumentContent;
use super::decode::decode_docx;
use super::io::validate_docx_file;
use super::models::*;
use super::parsing::heading::classify_paragraph;
use super::parsing::image::{ImageAssociator, ImageLocator};
use super::parsing::sections::build_sections;
use super::parsing::table::TableAssociator;
use crate::error::Result;

/// Load and parse a .docx file
///
/// This function:
/// 1. Validates the file name
/// 2. Decodes the package (the only step that can fail)
/// 3. Parses the decoded content
/// 4. Adds file metadata
pub fn load_document(file_path: &Path, options: &ParseOptions) -> Result<DocumentStructure> {
    validate_docx_file(file_path)?;

    let data = std::fs::read(file_path)?;
    let mut structure = parse_bytes(&data, options).inspect_err(|err| {
        log::error!("Error parsing document {}: {err}", file_path.display());
    })?;

    structure.metadata.insert(
        "file_path".to_string(),
        json!(file_path.to_string_lossy()),
    );
    structure
        .metadata
        .insert("file_size".to_string(), json!(data.len()));

    log::info!("Document parsed successfully: {}", file_path.display());
    Ok(structure)
}

/// Parse a .docx package held in memory
pub fn parse_bytes(data: &[u8], options: &ParseOptions) -> Result<DocumentStructure> {
    let content = decode_docx(data, options.media_dir.clone())?;
    Ok(parse_content(&content, options))
}

/// Parse decoded content. Never fails: per-element problems become warnings.
pub fn parse_content(content: &DocumentContent, options: &ParseOptions) -> DocumentStructure {
    if options.clean {
        let (cleaned, stats) = DocumentCleaner::new(options.cleaning_rules.clone()).clean_content(content);
        let mut structure = build_structure(&cleaned, options);
        structure.metadata.insert("cleaning".to_string(), json!(stats));
        return structure;
    }

    build_structure(content, options)
}

fn build_structure(content: &DocumentContent, options: &ParseOptions) -> DocumentStructure {
    let mut structure = DocumentStructure::default();

    for element in &content.paragraphs {
        if element.is_blank() {
            continue;
        }

        let classification = classify_paragraph(element);
        let paragraph = Paragraph {
            text: element.text.clone(),
            kind: classification.kind,
            level: classification.level,
            index: element.index,
            style: element.style_name().map(str::to_string),
        };

        if structure.paragraphs.is_empty() && paragraph.is_document_title() {
            structure.title = Some(paragraph.text.trim().to_string());
        }

        structure.paragraphs.push(paragraph);
    }

    structure.sections = build_sections(&structure.paragraphs);
    structure.tables = TableAssociator::new().collect(content);

    let locator = ImageLocator {
        base_dir: content.base_dir.clone().or_else(|| options.media_dir.clone()),
        verify_targets: options.verify_image_targets,
    };
    let extraction = ImageAssociator::new(&content.relationships, locator).collect(content);
    structure.images = extraction.images;
    structure.warnings = extraction.warnings;

    fill_metadata(&mut structure, content);

    log::info!(
        "parsed {} paragraphs into {} sections, {} tables, {} images ({} warnings)",
        structure.paragraphs.len(),
        structure.section_count(),
        structure.tables.len(),
        structure.images.len(),
        structure.warnings.len()
    );

    structure
}

fn fill_metadata(structure: &mut DocumentStructure, content: &DocumentContent) {
    let characters: usize = structure
        .paragraphs
        .iter()
        .map(|p| character_count(&p.text))
        .sum();

    let metadata = &mut structure.metadata;
    metadata.insert("paragraph_count".to_string(), json!(structure.paragraphs.len()));
    metadata.insert("table_count".to_string(), json!(structure.tables.len()));
    metadata.insert("image_count".to_string(), json!(structure.images.len()));
    metadata.insert("character_count".to_string(), json!(characters));

    let props = &content.properties;
    for (key, value) in [
        ("core_title", &props.title),
        ("author", &props.author),
        ("created", &props.created),
        ("modified", &props.modified),
    ] {
        if let Some(value) = value {
            metadata.insert(key.to_string(), json!(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::content::TableGrid;

    fn sample_content() -> DocumentContent {
        let mut content = DocumentContent::new();
        content.push_styled("维修标准文档", "Title");
        content.push_styled("第一章：概述", "Heading1");
        content.push_styled("1.1 文档目的", "Heading2");
        content.push_paragraph("本文档旨在规范维修流程。", None);
        content.push_paragraph("", None);
        content.push_styled("1.2 适用范围", "Heading2");
        content.push_paragraph("● 机械设备维修", None);
        content.push_paragraph("● 电气设备维修", None);
        content.push_styled("表1-1 设备维修周期", "Caption");
        content.push_table(TableGrid::from_text([["设备类型", "维修周期"], ["机械设备", "每季度"]]));
        content.push_paragraph("\"设备维修应当遵循安全第一的原则。\"", None);
        content
    }

    #[test]
    fn test_parse_sample_structure() {
        let structure = parse_content(&sample_content(), &ParseOptions::default());

        assert_eq!(structure.title.as_deref(), Some("维修标准文档"));
        assert_eq!(structure.paragraphs.len(), 9);

        let chapter = structure
            .paragraphs
            .iter()
            .find(|p| p.text.contains("第一章"))
            .unwrap();
        assert_eq!(chapter.level, 1);

        assert_eq!(structure.paragraphs_of_type(ParagraphType::ListItem).count(), 2);
        assert_eq!(structure.paragraphs_of_type(ParagraphType::Reference).count(), 1);

        assert_eq!(structure.sections.len(), 1);
        let first = &structure.sections[0];
        assert_eq!(first.level, 1);
        assert_eq!(first.subsections.len(), 2);
        // Caption, list items and the quotation all land in 1.2
        assert_eq!(first.subsections[1].paragraphs.len(), 4);

        assert_eq!(structure.tables.len(), 1);
        assert_eq!(structure.tables[0].caption.as_deref(), Some("表1-1 设备维修周期"));
        assert_eq!(structure.tables[0].num_rows, 2);
        assert_eq!(structure.tables[0].num_cols, 2);

        assert_eq!(structure.metadata["paragraph_count"], json!(9));
    }

    #[test]
    fn test_blank_paragraphs_are_excluded() {
        let mut content = DocumentContent::new();
        content.push_paragraph("  ", None);
        content.push_paragraph("正文", None);
        content.push_paragraph("\t\n", None);

        let structure = parse_content(&content, &ParseOptions::default());
        assert_eq!(structure.paragraphs.len(), 1);
        assert_eq!(structure.paragraphs[0].index, 1);
    }

    #[test]
    fn test_title_only_from_first_paragraph() {
        let mut content = DocumentContent::new();
        content.push_paragraph("前言", None);
        content.push_styled("维修标准文档", "Title");

        let structure = parse_content(&content, &ParseOptions::default());
        assert_eq!(structure.title, None);
        assert!(structure.sections.is_empty());
    }

    #[test]
    fn test_clean_option_records_stats() {
        let options = ParseOptions {
            clean: true,
            ..Default::default()
        };
        let structure = parse_content(&sample_content(), &options);

        assert_eq!(structure.paragraphs.len(), 9);
        assert_eq!(structure.metadata["cleaning"]["removed_paragraphs"], json!(1));
        let body = structure
            .paragraphs
            .iter()
            .find(|p| p.text.starts_with("本文档"))
            .unwrap();
        assert_eq!(body.text, "本文档旨在规范维修流程.");
    }
}
