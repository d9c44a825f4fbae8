//! Document search and navigation operations
//!
//! This module provides read-only querying operations on parsed documents:
//! full-text search, outline generation and the flattened text handed to
//! downstream extraction steps.

use super::models::*;

pub fn search_document(document: &DocumentStructure, query: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();
    let query = query.trim();
    if query.is_empty() {
        return results;
    }
    let query_lower: String = query.chars().flat_map(char::to_lowercase).collect();

    let mut push_match = |location: SearchLocation, text: &str| {
        if let Some((start_pos, end_pos)) = find_ignore_case(text, &query_lower) {
            results.push(SearchResult {
                location,
                text: text.to_string(),
                start_pos,
                end_pos,
            });
        }
    };

    for (index, paragraph) in document.paragraphs.iter().enumerate() {
        push_match(SearchLocation::Paragraph(index), &paragraph.text);
    }

    for (table_index, table) in document.tables.iter().enumerate() {
        for cell in &table.cells {
            push_match(
                SearchLocation::TableCell {
                    table: table_index,
                    row: cell.row,
                    col: cell.col,
                },
                &cell.text,
            );
        }
    }

    for (index, image) in document.images.iter().enumerate() {
        if let Some(caption) = &image.caption {
            push_match(SearchLocation::ImageCaption(index), caption);
        }
    }

    results
}

/// Byte range in `text` of the first case-insensitive match of `needle_lower`.
///
/// Lowercasing can change a character's length, so every byte of the
/// lowered text remembers the original character it came from.
fn find_ignore_case(text: &str, needle_lower: &str) -> Option<(usize, usize)> {
    if needle_lower.is_empty() {
        return None;
    }

    let mut lowered = String::with_capacity(text.len());
    let mut origins: Vec<(usize, usize)> = Vec::with_capacity(text.len());
    for (offset, c) in text.char_indices() {
        for lower in c.to_lowercase() {
            lowered.push(lower);
        }
        origins.resize(lowered.len(), (offset, offset + c.len_utf8()));
    }

    let start = lowered.find(needle_lower)?;
    let end = start + needle_lower.len();
    Some((origins[start].0, origins[end - 1].1))
}

/// Section titles in document order, depth-first
pub fn generate_outline(document: &DocumentStructure) -> Vec<OutlineItem> {
    fn walk(sections: &[Section], depth: usize, outline: &mut Vec<OutlineItem>) {
        for section in sections {
            outline.push(OutlineItem {
                title: section.title_text().to_string(),
                level: section.level,
                depth,
                start_index: section.start_index,
                end_index: section.end_index,
            });
            walk(&section.subsections, depth + 1, outline);
        }
    }

    let mut outline = Vec::new();
    walk(&document.sections, 0, &mut outline);
    outline
}

/// Paragraph text joined by newlines, in document order
pub fn plain_text(document: &DocumentStructure) -> String {
    document
        .paragraphs
        .iter()
        .map(|p| p.text.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// First section, at any depth, whose title contains `needle`
pub fn find_section<'a>(document: &'a DocumentStructure, needle: &str) -> Option<&'a Section> {
    fn find<'a>(sections: &'a [Section], needle: &str) -> Option<&'a Section> {
        sections.iter().find_map(|section| {
            if section.title_text().contains(needle) {
                Some(section)
            } else {
                find(&section.subsections, needle)
            }
        })
    }

    find(&document.sections, needle)
}
