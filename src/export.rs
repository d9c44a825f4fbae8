use anyhow::Result;
use std::fmt::Write;

use crate::document::*;
use crate::ExportFormat;

pub fn export(document: &DocumentStructure, format: &ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => export_to_json(document),
        ExportFormat::Outline => export_to_outline(document),
        ExportFormat::Text => Ok(export_to_text(document)),
    }
}

pub fn export_to_json(document: &DocumentStructure) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Section tree followed by a summary of tables and figures
pub fn export_to_outline(document: &DocumentStructure) -> Result<String> {
    let mut output = String::new();

    if let Some(title) = &document.title {
        writeln!(output, "{title}")?;
        writeln!(output, "{}", "=".repeat(title.chars().count().clamp(8, 50)))?;
    }

    writeln!(output, "Sections:")?;
    for item in generate_outline(document) {
        writeln!(
            output,
            "{}- {} (level {}, paragraphs {}..={})",
            "  ".repeat(item.depth + 1),
            item.title,
            item.level,
            item.start_index,
            item.end_index
        )?;
    }

    if !document.tables.is_empty() {
        output.push('\n');
        writeln!(output, "Tables:")?;
        for table in &document.tables {
            writeln!(
                output,
                "  - {} ({}x{})",
                table.caption.as_deref().unwrap_or("(no caption)"),
                table.num_rows,
                table.num_cols
            )?;
        }
    }

    if !document.images.is_empty() {
        output.push('\n');
        writeln!(output, "Images:")?;
        for image in &document.images {
            writeln!(
                output,
                "  - [{}] {} -> {}",
                image.figure_number,
                image.caption.as_deref().unwrap_or(""),
                image.path
            )?;
        }
    }

    if !document.warnings.is_empty() {
        output.push('\n');
        writeln!(output, "Warnings:")?;
        for warning in &document.warnings {
            writeln!(output, "  - {warning}")?;
        }
    }

    Ok(output)
}

pub fn export_to_text(document: &DocumentStructure) -> String {
    let mut text = plain_text(document);
    if !text.is_empty() {
        text.push('\n');
    }
    text
}
