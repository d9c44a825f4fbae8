//! Text and property extraction from docx-rs elements
//!
//! This module pulls paragraph text, drawing references and table cell merge
//! properties out of docx-rs paragraph, run and cell elements.

use once_cell::sync::Lazy;
use regex::Regex;

use super::super::content::{DrawingRef, VerticalMerge};

/// English Metric Units per pixel at 96 dpi
const EMU_PER_PIXEL: u32 = 9525;

static GRID_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"grid_span: Some\(GridSpan \{ val: (\d+)").unwrap());

static VERTICAL_MERGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"vertical_merge: Some\(VMerge \{ val: (\w+)").unwrap());

/// Extract plain text from a paragraph, untrimmed
pub(crate) fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();

    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                text.push_str(&extract_run_text(run));
            }
            docx_rs::ParagraphChild::Insert(insert) => {
                // Tracked insertions count as present text
                for child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        text.push_str(&extract_run_text(run));
                    }
                }
            }
            docx_rs::ParagraphChild::Delete(_) => {
                // Tracked deletions are not part of the text
            }
            _ => {}
        }
    }

    text
}

/// Extract text from a run
pub(crate) fn extract_run_text(run: &docx_rs::Run) -> String {
    let mut text = String::new();

    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text_elem) => {
                text.push_str(&text_elem.text);
            }
            docx_rs::RunChild::Tab(_) => {
                text.push('\t');
            }
            docx_rs::RunChild::Break(_) => {
                text.push('\n');
            }
            _ => {}
        }
    }

    text
}

/// Collect every picture in a paragraph, in run order: DrawingML drawings
/// and legacy VML `w:pict` shapes that carry image data
pub(crate) fn extract_paragraph_drawings(para: &docx_rs::Paragraph) -> Vec<DrawingRef> {
    let mut drawings = Vec::new();

    for child in &para.children {
        let runs: Vec<&docx_rs::Run> = match child {
            docx_rs::ParagraphChild::Run(run) => vec![run.as_ref()],
            docx_rs::ParagraphChild::Insert(insert) => insert
                .children
                .iter()
                .filter_map(|c| match c {
                    docx_rs::InsertChild::Run(run) => Some(run.as_ref()),
                    _ => None,
                })
                .collect(),
            _ => continue,
        };

        for run in runs {
            for run_child in &run.children {
                match run_child {
                    docx_rs::RunChild::Drawing(drawing) => drawings.extend(drawing_ref(drawing)),
                    docx_rs::RunChild::Shape(shape) => drawings.extend(shape_ref(shape)),
                    _ => {}
                }
            }
        }
    }

    drawings
}

fn drawing_ref(drawing: &docx_rs::Drawing) -> Option<DrawingRef> {
    match &drawing.data {
        Some(docx_rs::DrawingData::Pic(pic)) => {
            let relationship_ids = if pic.id.is_empty() {
                Vec::new()
            } else {
                vec![pic.id.clone()]
            };
            let (cx, cy) = pic.size;
            let extent = if cx > 0 && cy > 0 {
                Some((cx / EMU_PER_PIXEL, cy / EMU_PER_PIXEL))
            } else {
                None
            };
            Some(DrawingRef {
                relationship_ids,
                extent,
            })
        }
        // Text boxes carry no picture
        _ => None,
    }
}

/// VML pictures have no extent in pixels, only CSS in the shape style
fn shape_ref(shape: &docx_rs::Shape) -> Option<DrawingRef> {
    let image = shape.image_data.as_ref()?;
    let relationship_ids = if image.id.is_empty() {
        Vec::new()
    } else {
        vec![image.id.clone()]
    };
    Some(DrawingRef {
        relationship_ids,
        extent: None,
    })
}

/// Read `gridSpan` and `vMerge` from a cell property.
///
/// docx-rs keeps these fields private, so they are read back from the debug
/// representation.
pub(crate) fn extract_cell_merge(
    property: &docx_rs::TableCellProperty,
) -> (usize, Option<VerticalMerge>) {
    let debug = format!("{property:?}");

    let grid_span = GRID_SPAN
        .captures(&debug)
        .and_then(|c| c[1].parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);

    let vertical_merge = VERTICAL_MERGE
        .captures(&debug)
        .and_then(|c| match &c[1] {
            "Restart" => Some(VerticalMerge::Restart),
            "Continue" => Some(VerticalMerge::Continue),
            _ => None,
        });

    (grid_span, vertical_merge)
}
