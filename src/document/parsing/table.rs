//! Table extraction and caption association
//!
//! Tables are correlated with the caption paragraph directly in front of
//! them. Merged cells are folded into their origin cell: a horizontal merge
//! widens `colspan`, a vertical merge grows `rowspan` and the continuation
//! cells disappear.
//!
//! Pictures laid out inside table cells are collected separately so the
//! image pass sees them right after their table.

use std::collections::HashMap;

use super::super::content::{
    ContentRef, DocumentContent, DrawingRef, GridCell, ParagraphElement, TableGrid, VerticalMerge,
};
use super::super::models::{Table, TableCell};
use super::formatting::{extract_cell_merge, extract_paragraph_drawings, extract_paragraph_text};

/// Walks the stream and pairs caption paragraphs with the following table
#[derive(Debug, Default)]
pub(crate) struct TableAssociator {
    pending_caption: Option<String>,
}

impl TableAssociator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn observe_paragraph(&mut self, para: &ParagraphElement) {
        let text = para.text.trim();
        if text.is_empty() {
            return;
        }

        let is_caption = match &para.style {
            Some(style) => style.is_caption(),
            None => text.starts_with('表') || text.starts_with("Table"),
        };

        if is_caption {
            self.pending_caption = Some(text.to_string());
        } else if let Some(discarded) = self.pending_caption.take() {
            log::debug!("caption {discarded:?} is not followed by a table, discarding");
        }
    }

    pub(crate) fn observe_table(&mut self, grid: &TableGrid) -> Table {
        build_table(grid, self.pending_caption.take())
    }

    pub(crate) fn collect(mut self, content: &DocumentContent) -> Vec<Table> {
        let mut tables = Vec::new();
        for element in content.elements() {
            match element {
                ContentRef::Paragraph(para) => self.observe_paragraph(para),
                ContentRef::Table(grid) => tables.push(self.observe_table(grid)),
                ContentRef::Drawing(_) => {}
            }
        }
        tables
    }
}

/// Build a table from its physical rows, resolving merges into spans
pub(crate) fn build_table(grid: &TableGrid, caption: Option<String>) -> Table {
    let mut cells: Vec<TableCell> = Vec::new();
    // Column -> cell index of the vertical merge currently open there
    let mut open_merges: HashMap<usize, usize> = HashMap::new();
    let mut widest_row = 0;

    for (row, physical) in grid.rows.iter().enumerate() {
        let mut col = 0;

        for GridCell {
            text,
            grid_span,
            vertical_merge,
        } in physical
        {
            let span = (*grid_span).max(1);

            if *vertical_merge == Some(VerticalMerge::Continue) {
                if let Some(&origin) = open_merges.get(&col) {
                    cells[origin].rowspan += 1;
                    col += span;
                    continue;
                }
            }

            let index = cells.len();
            cells.push(TableCell {
                text: text.trim().to_string(),
                row,
                col,
                is_header: row == 0,
                rowspan: 1,
                colspan: span,
            });

            match vertical_merge {
                Some(VerticalMerge::Restart) | Some(VerticalMerge::Continue) => {
                    open_merges.insert(col, index);
                }
                None => {
                    open_merges.remove(&col);
                }
            }

            col += span;
        }

        widest_row = widest_row.max(col);
    }

    Table {
        cells,
        num_rows: grid.rows.len(),
        num_cols: grid.declared_columns.max(widest_row),
        caption,
    }
}

/// Convert a docx-rs table into its physical grid
pub(crate) fn extract_table_grid(table: &docx_rs::Table) -> TableGrid {
    let mut rows = Vec::new();

    for table_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = table_child;
        let mut cells = Vec::new();

        for row_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            let mut texts = Vec::new();

            for content in &cell.children {
                if let docx_rs::TableCellContent::Paragraph(para) = content {
                    let text = extract_paragraph_text(para);
                    if !text.trim().is_empty() {
                        texts.push(text.trim().to_string());
                    }
                }
            }

            let (grid_span, vertical_merge) = extract_cell_merge(&cell.property);
            cells.push(GridCell {
                text: texts.join("\n"),
                grid_span,
                vertical_merge,
            });
        }

        rows.push(cells);
    }

    TableGrid {
        rows,
        declared_columns: table.grid.len(),
    }
}

/// Pictures inside the table's cells, row by row, nested tables included
pub(crate) fn extract_table_drawings(table: &docx_rs::Table) -> Vec<DrawingRef> {
    let mut drawings = Vec::new();

    for table_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = table_child;
        for row_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            for content in &cell.children {
                match content {
                    docx_rs::TableCellContent::Paragraph(para) => {
                        drawings.extend(extract_paragraph_drawings(para));
                    }
                    docx_rs::TableCellContent::Table(nested) => {
                        drawings.extend(extract_table_drawings(nested));
                    }
                    _ => {}
                }
            }
        }
    }

    drawings
}
