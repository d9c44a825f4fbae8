//! Container access and auxiliary part readers
//!
//! This module validates the .docx container and reads the parts docx-rs
//! does not hand back in a usable form: the style table, the relationships
//! of the main document part, and the core properties.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use super::content::{CoreProperties, ParagraphStyle, Relationship, StyleResolver};
use crate::error::{Error, Result};

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const STYLES_PART: &str = "word/styles.xml";
pub(crate) const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
pub(crate) const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Validates that the file looks like a .docx before reading it
pub(crate) fn validate_docx_file(file_path: &Path) -> Result<()> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !extension.eq_ignore_ascii_case("docx") {
        return Err(Error::InvalidFormat(format!(
            "Invalid file format. Expected .docx file, got .{extension}\n\
            Note: only Word .docx files are supported (not .doc, .xlsx, .zip, etc.)"
        )));
    }

    Ok(())
}

/// Read access to the parts of an in-memory .docx package
pub(crate) struct DocxPackage<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> DocxPackage<'a> {
    pub(crate) fn open(data: &'a [u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        if archive.by_name(DOCUMENT_PART).is_err() {
            if archive.by_name("xl/workbook.xml").is_ok() {
                return Err(Error::InvalidFormat(
                    "This appears to be an Excel file (.xlsx).\n\
                    Only Word documents (.docx) are supported."
                        .to_string(),
                ));
            }

            return Err(Error::InvalidFormat(format!(
                "Invalid .docx file: missing {DOCUMENT_PART}\n\
                This file may be corrupted or is not a valid Word document."
            )));
        }

        Ok(Self { archive })
    }

    /// Read a part as text; `None` when it is absent or unreadable
    pub(crate) fn read_part(&mut self, name: &str) -> Option<String> {
        let mut file = self.archive.by_name(name).ok()?;
        let mut content = String::new();
        match file.read_to_string(&mut content) {
            Ok(_) => Some(content),
            Err(err) => {
                log::warn!("could not read {name}: {err}");
                None
            }
        }
    }
}

/// Style id to style name table from styles.xml
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    names: HashMap<String, String>,
}

impl StyleSheet {
    pub fn from_xml(xml: &str) -> std::result::Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut names = HashMap::new();
        let mut current_id: Option<String> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"style" => {
                        current_id = attribute(e, b"styleId");
                    }
                    b"name" => {
                        if let (Some(id), Some(name)) = (&current_id, attribute(e, b"val")) {
                            names.insert(id.clone(), name);
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) if e.local_name().as_ref() == b"style" => {
                    current_id = None;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl StyleResolver for StyleSheet {
    fn resolve(&self, style_id: &str) -> Option<ParagraphStyle> {
        if style_id.trim().is_empty() {
            return None;
        }
        match self.names.get(style_id) {
            Some(name) => Some(ParagraphStyle::new(name)),
            None => {
                log::debug!("style id {style_id:?} is not in the style table, using the id");
                Some(ParagraphStyle::new(style_id))
            }
        }
    }
}

/// Relationships declared by a .rels part
pub(crate) fn parse_relationships(
    xml: &str,
) -> std::result::Result<Vec<Relationship>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut relationships = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    relationships.push(Relationship {
                        id,
                        rel_type: attribute(e, b"Type").unwrap_or_default(),
                        target,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Title, author and dates from docProps/core.xml
pub(crate) fn parse_core_properties(
    xml: &str,
) -> std::result::Result<CoreProperties, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut properties = CoreProperties::default();
    let mut current: Option<Vec<u8>> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                current = Some(e.local_name().as_ref().to_vec());
            }
            Event::Text(ref t) => {
                let value = t.unescape()?.trim().to_string();
                let slot = match current.as_deref() {
                    Some(b"title") => Some(&mut properties.title),
                    Some(b"creator") => Some(&mut properties.author),
                    Some(b"created") => Some(&mut properties.created),
                    Some(b"modified") => Some(&mut properties.modified),
                    _ => None,
                };
                if let Some(slot) = slot {
                    if !value.is_empty() {
                        *slot = Some(value);
                    }
                }
            }
            Event::End(_) => {
                current = None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(properties)
}

fn attribute(element: &quick_xml::events::BytesStart, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}
