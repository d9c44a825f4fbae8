//! List item and quotation detection
//!
//! Text-only checks used by the classifier once no style or title pattern
//! has claimed a paragraph.

use once_cell::sync::Lazy;
use regex::Regex;

static LIST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Bullet glyphs: "● 机械设备"
        Regex::new(r"^[●○•]\s+").unwrap(),
        // "(1) ", "1. ", "1、", "a) "
        Regex::new(r"^\(?[0-9a-zA-Z]\)?[\s.、]").unwrap(),
        // Dashes: "- 注意", "— 备注"
        Regex::new(r"^[-—]\s+").unwrap(),
    ]
});

/// Matching open/close quotation pairs
const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('\u{201C}', '\u{201D}')];

pub(crate) fn is_list_item(text: &str) -> bool {
    let text = text.trim();
    LIST_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

/// Text wrapped in double quotes on both ends
pub(crate) fn is_quotation(text: &str) -> bool {
    let text = text.trim();
    let mut chars = text.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return false;
    };
    QUOTE_PAIRS
        .iter()
        .any(|(open, close)| first == *open && last == *close)
}
