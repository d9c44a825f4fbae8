//! Text normalization and document cleaning
//!
//! This module rewrites paragraph text before it is parsed or persisted:
//! whitespace collapsing, full-width punctuation folding, duplicate
//! punctuation removal and punctuation spacing. Cleaning is never required
//! for parsing; it is an optional pre-pass.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::content::{DocumentContent, ParagraphElement, StreamElement};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Full-width punctuation and its half-width replacement
const PUNCTUATION_MAP: &[(char, char)] = &[
    ('，', ','),
    ('。', '.'),
    ('：', ':'),
    ('；', ';'),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('！', '!'),
    ('？', '?'),
    ('（', '('),
    ('）', ')'),
    ('【', '['),
    ('】', ']'),
    ('《', '<'),
    ('》', '>'),
];

/// Punctuation collapsed when repeated back to back
const COLLAPSIBLE: &[char] = &[',', '.', '!', '?', ';'];

/// Punctuation that must be followed by whitespace
const SPACED: &[char] = &[',', '.', '!', '?', ';', ':'];

/// Switches for each cleaning step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleaningRules {
    pub remove_extra_spaces: bool,
    pub normalize_punctuation: bool,
    pub remove_empty_paragraphs: bool,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            remove_extra_spaces: true,
            normalize_punctuation: true,
            remove_empty_paragraphs: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    rules: CleaningRules,
}

impl TextNormalizer {
    pub fn new(rules: CleaningRules) -> Self {
        Self { rules }
    }

    pub fn clean(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let mut text = if self.rules.remove_extra_spaces {
            collapse_whitespace(text)
        } else {
            text.to_string()
        };

        if self.rules.normalize_punctuation {
            text = normalize_punctuation(&text);
        }

        text
    }
}

/// Clean text with every rule enabled
pub fn clean_text(text: &str) -> String {
    TextNormalizer::default().clean(text)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

pub(crate) fn normalize_punctuation(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| {
            PUNCTUATION_MAP
                .iter()
                .find(|(full, _)| *full == c)
                .map(|(_, half)| *half)
                .unwrap_or(c)
        })
        .collect();

    // Collapse ",,," into ","
    let mut deduped = String::with_capacity(folded.len());
    let mut previous: Option<char> = None;
    for c in folded.chars() {
        if COLLAPSIBLE.contains(&c) && previous == Some(c) {
            continue;
        }
        deduped.push(c);
        previous = Some(c);
    }

    let mut spaced = String::with_capacity(deduped.len() + 8);
    let mut chars = deduped.chars().peekable();
    while let Some(c) = chars.next() {
        spaced.push(c);
        if SPACED.contains(&c) {
            if let Some(next) = chars.peek() {
                if !next.is_whitespace() {
                    spaced.push(' ');
                }
            }
        }
    }

    spaced
}

/// Counts reported by a document-level cleaning pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleaningStats {
    pub total_paragraphs: usize,
    pub cleaned_paragraphs: usize,
    pub removed_paragraphs: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentCleaner {
    rules: CleaningRules,
}

impl DocumentCleaner {
    pub fn new(rules: CleaningRules) -> Self {
        Self { rules }
    }

    /// Produce cleaned content: blank paragraphs dropped, text normalized.
    ///
    /// Paragraphs keep their original `index`; stream positions are remapped.
    pub fn clean_content(&self, content: &DocumentContent) -> (DocumentContent, CleaningStats) {
        let normalizer = TextNormalizer::new(self.rules.clone());
        let mut stats = CleaningStats {
            total_paragraphs: content.paragraphs.len(),
            ..Default::default()
        };

        let mut positions = vec![None; content.paragraphs.len()];
        let mut paragraphs = Vec::with_capacity(content.paragraphs.len());

        for (pos, para) in content.paragraphs.iter().enumerate() {
            if para.is_blank() && self.rules.remove_empty_paragraphs {
                stats.removed_paragraphs += 1;
                continue;
            }

            let cleaned = normalizer.clean(&para.text);
            if cleaned != para.text {
                stats.cleaned_paragraphs += 1;
            }

            positions[pos] = Some(paragraphs.len());
            paragraphs.push(ParagraphElement {
                index: para.index,
                text: cleaned,
                style: para.style.clone(),
            });
        }

        let stream = content
            .stream
            .iter()
            .filter_map(|element| match element {
                StreamElement::Paragraph(pos) => positions
                    .get(*pos)
                    .copied()
                    .flatten()
                    .map(StreamElement::Paragraph),
                other => Some(other.clone()),
            })
            .collect();

        log::info!(
            "Document cleaned: {} paragraphs, {} rewritten, {} removed",
            stats.total_paragraphs,
            stats.cleaned_paragraphs,
            stats.removed_paragraphs
        );

        let cleaned = DocumentContent {
            paragraphs,
            stream,
            relationships: content.relationships.clone(),
            base_dir: content.base_dir.clone(),
            properties: content.properties.clone(),
        };
        (cleaned, stats)
    }
}

pub(crate) fn character_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
