//! Paragraph classification
//!
//! This module decides what a paragraph is: a title (with its level), a list
//! item, a quotation or plain content. Signals are tried in a fixed order and
//! the first one that answers wins:
//!
//! 1. the resolved paragraph style (`Title`, `Heading N`, `Caption`)
//! 2. title text patterns (`第一章`, `1.`, `1.1`, `1.1.1`)
//! 3. list markers
//! 4. surrounding double quotes
//! 5. content

use once_cell::sync::Lazy;
use regex::Regex;

use super::super::content::{ParagraphElement, ParagraphStyle};
use super::super::models::ParagraphType;
use super::list::{is_list_item, is_quotation};

/// Title patterns in match order, each bound to its level
static TITLE_PATTERNS: Lazy<Vec<(Regex, u32)>> = Lazy::new(|| {
    vec![
        // Chapter headings written with Chinese numerals: "第一章：概述"
        (
            Regex::new(r"^第[一二三四五六七八九十]+章\s*[:：]?\s*(.*)").unwrap(),
            1,
        ),
        // "1. 概述"
        (Regex::new(r"^\d+\.\s+").unwrap(), 1),
        // "1.1 文档目的"
        (Regex::new(r"^\d+\.\d+\s+").unwrap(), 2),
        // "1.1.1 检查周期"
        (Regex::new(r"^\d+\.\d+\.\d+\s+").unwrap(), 3),
    ]
});

/// Outcome of classifying one paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Classification {
    pub(crate) kind: ParagraphType,
    pub(crate) level: u32,
}

impl Classification {
    fn new(kind: ParagraphType) -> Self {
        Self { kind, level: 0 }
    }

    fn title(level: u32) -> Self {
        Self {
            kind: ParagraphType::Title,
            level,
        }
    }
}

pub(crate) fn classify_paragraph(para: &ParagraphElement) -> Classification {
    classify(para.style.as_ref(), &para.text)
}

/// Classify from an optional style and the paragraph text
pub(crate) fn classify(style: Option<&ParagraphStyle>, text: &str) -> Classification {
    let text = text.trim();

    if let Some(classification) = style.and_then(|style| classify_by_style(style, text)) {
        return classification;
    }

    if let Some(level) = detect_title_level_from_text(text) {
        return Classification::title(level);
    }

    if is_list_item(text) {
        return Classification::new(ParagraphType::ListItem);
    }

    if is_quotation(text) {
        return Classification::new(ParagraphType::Reference);
    }

    Classification::new(ParagraphType::Content)
}

/// Style signal; `None` when the style says nothing about the type
fn classify_by_style(style: &ParagraphStyle, text: &str) -> Option<Classification> {
    if style.is_title() {
        return Some(Classification::title(0));
    }

    if style.is_heading() {
        let level = match style.heading_level {
            Some(level) => level,
            None => {
                log::debug!(
                    "style {:?} has no heading level, falling back to text patterns",
                    style.name
                );
                detect_title_level_from_text(text).unwrap_or(0)
            }
        };
        return Some(Classification::title(level));
    }

    // Captions belong to tables and figures, not to the section tree
    if style.is_caption() {
        return Some(Classification::new(ParagraphType::Content));
    }

    None
}

/// Level of the first title pattern the text matches
pub(crate) fn detect_title_level_from_text(text: &str) -> Option<u32> {
    let text = text.trim();
    TITLE_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, level)| *level)
}
