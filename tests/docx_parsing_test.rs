use docstruct::document::{load_document, parse_bytes, ParagraphType, ParseOptions};
use docstruct::Error;
use docx_rs::{Docx, Paragraph, Pic, Run, Table, TableCell, TableRow, VMergeType};
use std::io::{Cursor, Read, Write};
use tempfile::tempdir;

/// 1x1 RGB PNG
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53,
    0xde, 0x00, 0x00, 0x00, 0x0c, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0xcf, 0xc0, 0x00,
    0x00, 0x03, 0x01, 0x01, 0x00, 0xc9, 0xfe, 0x92, 0xef, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e,
    0x44, 0xae, 0x42, 0x60, 0x82,
];

fn para(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn styled(text: &str, style_id: &str) -> Paragraph {
    para(text).style(style_id)
}

fn table(rows: &[&[&str]]) -> Table {
    Table::new(
        rows.iter()
            .map(|row| {
                TableRow::new(
                    row.iter()
                        .map(|text| TableCell::new().add_paragraph(para(text)))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn picture() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_image(Pic::new(PIXEL_PNG)))
}

fn pack(docx: Docx) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).expect("Failed to write test document");
    buf.into_inner()
}

/// Copy a package, passing word/document.xml through `edit`
fn rewrite_document_xml(data: &[u8], edit: impl Fn(&str) -> String) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let name = file.name().to_string();
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).unwrap();
        if name == "word/document.xml" {
            bytes = edit(&String::from_utf8(bytes).unwrap()).into_bytes();
        }
        writer.start_file(name, options).unwrap();
        writer.write_all(&bytes).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Replace the run holding `marker` with a legacy VML picture of `rel_id`
fn replace_run_with_vml(xml: &str, marker: &str, rel_id: &str) -> String {
    let at = xml.find(marker).expect("marker run not found");
    let start = xml[..at].rfind("<w:r>").expect("run start not found");
    let end = at + xml[at..].find("</w:r>").expect("run end not found") + "</w:r>".len();
    let vml = format!(
        "<w:r><w:pict xmlns:v=\"urn:schemas-microsoft-com:vml\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
         <v:shape style=\"width:40pt;height:30pt\"><v:imagedata r:id=\"{rel_id}\"/></v:shape>\
         </w:pict></w:r>"
    );
    format!("{}{}{}", &xml[..start], vml, &xml[end..])
}

fn maintenance_manual() -> Vec<u8> {
    pack(
        Docx::new()
            .add_paragraph(styled("设备维修标准", "Title"))
            .add_paragraph(styled("第一章：概述", "Heading1"))
            .add_paragraph(styled("1.1 文档目的", "Heading2"))
            .add_paragraph(para("本文档旨在规范维修流程。"))
            .add_paragraph(para(""))
            .add_paragraph(styled("1.2 适用范围", "Heading2"))
            .add_paragraph(para("● 机械设备维修"))
            .add_paragraph(para("● 电气设备维修"))
            .add_paragraph(styled("第二章：维修计划", "Heading1"))
            .add_paragraph(styled("表2-1 设备维修计划", "Caption"))
            .add_table(table(&[
                &["设备", "周期", "负责人", "备注"],
                &["发动机", "每季度", "张工", "无"],
                &["变速箱", "每半年", "李工", "无"],
                &["电气系统", "每月", "王工", "无"],
            ]))
            .add_paragraph(para("\"设备维修应当遵循安全第一的原则。\"")),
    )
}

#[test]
fn test_parse_generated_docx() {
    let structure = parse_bytes(&maintenance_manual(), &ParseOptions::default())
        .expect("Failed to parse test document");

    assert_eq!(structure.title.as_deref(), Some("设备维修标准"));
    assert_eq!(structure.paragraphs.len(), 10);

    let levels: Vec<u32> = structure
        .paragraphs_of_type(ParagraphType::Title)
        .map(|p| p.level)
        .collect();
    assert_eq!(levels, [0, 1, 2, 2, 1]);
    assert_eq!(structure.paragraphs_of_type(ParagraphType::ListItem).count(), 2);
    assert_eq!(structure.paragraphs_of_type(ParagraphType::Reference).count(), 1);
}

#[test]
fn test_sections_from_generated_docx() {
    let structure = parse_bytes(&maintenance_manual(), &ParseOptions::default()).unwrap();

    assert_eq!(structure.sections.len(), 2);
    assert_eq!(structure.sections[0].subsections.len(), 2);
    assert!(structure.sections[1].subsections.is_empty());
    // Caption and the quotation after the table
    assert_eq!(structure.sections[1].paragraphs.len(), 2);
}

#[test]
fn test_table_caption_from_generated_docx() {
    let structure = parse_bytes(&maintenance_manual(), &ParseOptions::default()).unwrap();

    assert_eq!(structure.tables.len(), 1);
    let table = &structure.tables[0];
    assert_eq!(table.caption.as_deref(), Some("表2-1 设备维修计划"));
    assert_eq!(table.num_rows, 4);
    assert_eq!(table.num_cols, 4);
    assert_eq!(table.cell(3, 0).map(|c| c.text.as_str()), Some("电气系统"));
    assert!(structure.images.is_empty());
}

#[test]
fn test_load_document_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manual.docx");
    std::fs::write(&path, maintenance_manual()).unwrap();

    let structure = load_document(&path, &ParseOptions::default()).unwrap();
    assert_eq!(structure.sections.len(), 2);
    assert_eq!(
        structure.metadata["file_size"],
        serde_json::json!(std::fs::metadata(&path).unwrap().len())
    );
    assert_eq!(structure.metadata["table_count"], serde_json::json!(1));
}

#[test]
fn test_clean_option_on_generated_docx() {
    let data = pack(
        Docx::new()
            .add_paragraph(styled("第一章：概述", "Heading1"))
            .add_paragraph(para("检查  油位，，确认无泄漏！"))
            .add_paragraph(para("   ")),
    );
    let options = ParseOptions {
        clean: true,
        ..Default::default()
    };

    let structure = parse_bytes(&data, &options).unwrap();
    assert_eq!(structure.paragraphs[1].text, "检查 油位, 确认无泄漏!");
    assert_eq!(structure.metadata["cleaning"]["removed_paragraphs"], serde_json::json!(1));
}

#[test]
fn test_merged_cells_from_generated_docx() {
    let data = pack(
        Docx::new().add_table(
            Table::new(vec![
                TableRow::new(vec![
                    TableCell::new()
                        .add_paragraph(para("部件"))
                        .vertical_merge(VMergeType::Restart),
                    TableCell::new().add_paragraph(para("检查项目")).grid_span(2),
                ]),
                TableRow::new(vec![
                    TableCell::new()
                        .add_paragraph(para(""))
                        .vertical_merge(VMergeType::Continue),
                    TableCell::new().add_paragraph(para("外观")),
                    TableCell::new().add_paragraph(para("功能")),
                ]),
            ])
            .set_grid(vec![2000, 2000, 2000]),
        ),
    );

    let structure = parse_bytes(&data, &ParseOptions::default()).unwrap();
    let table = &structure.tables[0];
    assert_eq!((table.num_rows, table.num_cols), (2, 3));
    assert_eq!(table.cells.len(), 4);

    let origin = table.cell(0, 0).unwrap();
    assert_eq!((origin.text.as_str(), origin.rowspan, origin.colspan), ("部件", 2, 1));
    let wide = table.cell(0, 1).unwrap();
    assert_eq!((wide.text.as_str(), wide.rowspan, wide.colspan), ("检查项目", 1, 2));
    assert_eq!(table.cell(1, 2).map(|c| c.text.as_str()), Some("功能"));
}

#[test]
fn test_pictures_from_generated_docx() {
    let data = pack(
        Docx::new()
            .add_paragraph(styled("第一章：概述", "Heading1"))
            .add_paragraph(picture())
            .add_paragraph(styled("图1-2 油路示意", "Caption"))
            .add_paragraph(picture()),
    );

    let structure = parse_bytes(&data, &ParseOptions::default()).unwrap();
    let numbers: Vec<&str> = structure.images.iter().map(|i| i.figure_number.as_str()).collect();
    assert_eq!(numbers, ["1-1", "1-2"]);
    assert!(structure.images.iter().all(|i| i.relationship_id.is_some()));
    assert_eq!(structure.images[0].caption.as_deref(), Some("图1-1"));
    assert_eq!(structure.images[1].caption.as_deref(), Some("图1-2 油路示意"));
    assert!(structure.warnings.is_empty());
}

#[test]
fn test_legacy_vml_picture_is_numbered() {
    let data = pack(
        Docx::new()
            .add_paragraph(styled("第一章：概述", "Heading1"))
            .add_paragraph(picture())
            .add_paragraph(para("VML_PICTURE")),
    );
    let first = parse_bytes(&data, &ParseOptions::default()).unwrap();
    let rel_id = first.images[0].relationship_id.clone().unwrap();

    let data = rewrite_document_xml(&data, |xml| replace_run_with_vml(xml, "VML_PICTURE", &rel_id));
    let structure = parse_bytes(&data, &ParseOptions::default()).unwrap();

    let numbers: Vec<&str> = structure.images.iter().map(|i| i.figure_number.as_str()).collect();
    assert_eq!(numbers, ["1-1", "1-2"]);
    assert_eq!(structure.images[1].relationship_id.as_deref(), Some(rel_id.as_str()));
    assert_eq!(structure.images[1].width, None);
}

#[test]
fn test_picture_inside_table_cell() {
    let data = pack(
        Docx::new()
            .add_paragraph(styled("第一章：概述", "Heading1"))
            .add_table(Table::new(vec![TableRow::new(vec![
                TableCell::new().add_paragraph(para("进气门")),
                TableCell::new().add_paragraph(picture()),
            ])]))
            .add_paragraph(picture()),
    );

    let structure = parse_bytes(&data, &ParseOptions::default()).unwrap();
    assert_eq!(structure.tables.len(), 1);
    let numbers: Vec<&str> = structure.images.iter().map(|i| i.figure_number.as_str()).collect();
    assert_eq!(numbers, ["1-1", "1-2"]);
}

#[test]
fn test_garbage_bytes_are_fatal() {
    let result = parse_bytes(b"definitely not a zip archive", &ParseOptions::default());
    assert!(matches!(result, Err(Error::Zip(_))));
}

#[test]
fn test_wrong_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manual.doc");
    std::fs::write(&path, maintenance_manual()).unwrap();

    let result = load_document(&path, &ParseOptions::default());
    assert!(matches!(result, Err(Error::InvalidFormat(_))));
}
