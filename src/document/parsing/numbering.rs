//! Chapter and figure numbering
//!
//! Figures are numbered `{chapter}-{counter}`, with the counter restarting at
//! every chapter heading. The state lives in a `FigureNumbering` owned by a
//! single parse.

use once_cell::sync::Lazy;
use regex::Regex;

static CHINESE_CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^第([一二三四五六七八九十]+)章").unwrap());

static ARABIC_CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:第\s*(\d+)\s*章|(\d+)\.\s)").unwrap());

/// Numeral characters one through ten
const CHINESE_NUMERALS: &[(&str, u32)] = &[
    ("一", 1),
    ("二", 2),
    ("三", 3),
    ("四", 4),
    ("五", 5),
    ("六", 6),
    ("七", 7),
    ("八", 8),
    ("九", 9),
    ("十", 10),
];

pub(crate) fn chinese_numeral_value(numeral: &str) -> Option<u32> {
    CHINESE_NUMERALS
        .iter()
        .find(|(text, _)| *text == numeral)
        .map(|(_, value)| *value)
}

/// Chapter marker found at the start of a heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChapterMarker {
    Number(u32),
    /// Matched the chapter pattern but the numeral is outside the table
    Unmapped(String),
}

pub(crate) fn detect_chapter_marker(text: &str) -> Option<ChapterMarker> {
    let text = text.trim();

    if let Some(caps) = CHINESE_CHAPTER.captures(text) {
        let numeral = &caps[1];
        return Some(match chinese_numeral_value(numeral) {
            Some(value) => ChapterMarker::Number(value),
            None => ChapterMarker::Unmapped(numeral.to_string()),
        });
    }

    let caps = ARABIC_CHAPTER.captures(text)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?.as_str();
    Some(match digits.parse::<u32>() {
        Ok(value) if value > 0 => ChapterMarker::Number(value),
        _ => ChapterMarker::Unmapped(digits.to_string()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FigureNumber {
    pub(crate) chapter: u32,
    pub(crate) counter: u32,
}

impl FigureNumber {
    pub(crate) fn label(&self) -> String {
        format!("{}-{}", self.chapter, self.counter)
    }

    /// Caption used when the figure has none of its own
    pub(crate) fn default_caption(&self) -> String {
        format!("图{}-{}", self.chapter, self.counter)
    }
}

#[derive(Debug)]
pub(crate) struct FigureNumbering {
    current_chapter: u32,
    figure_counter: u32,
}

impl Default for FigureNumbering {
    fn default() -> Self {
        Self {
            current_chapter: 1,
            figure_counter: 1,
        }
    }
}

impl FigureNumbering {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enter_chapter(&mut self, chapter: u32) {
        self.current_chapter = chapter;
        self.figure_counter = 1;
    }

    pub(crate) fn current_chapter(&self) -> u32 {
        self.current_chapter
    }

    /// Number of the next figure without consuming it
    pub(crate) fn peek(&self) -> FigureNumber {
        FigureNumber {
            chapter: self.current_chapter,
            counter: self.figure_counter,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.figure_counter += 1;
    }
}
