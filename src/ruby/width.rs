//! Glyph-width estimation for ruby layout
//!
//! Widths are pixel estimates per character (Arial at 16px in the stock
//! table). Characters missing from the table count as [`DEFAULT_CHAR_WIDTH`].

use std::collections::HashMap;

/// Width used for any character absent from the table
pub const DEFAULT_CHAR_WIDTH: u32 = 8;

/// Marker inserted when a long gloss is broken across lines
pub const LINE_BREAK: &str = "<br>";

/// Read-only per-character pixel widths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharWidthTable(HashMap<char, u32>);

impl CharWidthTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, ch: char, width: u32) -> Self {
        self.0.insert(ch, width);
        self
    }

    pub fn width_of(&self, ch: char) -> u32 {
        self.0.get(&ch).copied().unwrap_or(DEFAULT_CHAR_WIDTH)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<char, u32>> for CharWidthTable {
    fn from(widths: HashMap<char, u32>) -> Self {
        CharWidthTable(widths)
    }
}

impl FromIterator<(char, u32)> for CharWidthTable {
    fn from_iter<I: IntoIterator<Item = (char, u32)>>(iter: I) -> Self {
        CharWidthTable(iter.into_iter().collect())
    }
}

/// Total estimated width of `text`, saturating at `u64::MAX`.
pub fn measure_width(text: &str, widths: &CharWidthTable) -> u64 {
    text.chars()
        .fold(0u64, |total, c| total.saturating_add(u64::from(widths.width_of(c))))
}

/// Byte offsets just after the first character whose cumulative width
/// reaches each threshold, in order. Each threshold is looked for only after
/// the previous one was found, and on a later character.
fn break_offsets(text: &str, widths: &CharWidthTable, thresholds: &[f64]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(thresholds.len());
    let mut pending = thresholds.iter().peekable();
    let mut cumulative = 0u64;

    for (index, ch) in text.char_indices() {
        cumulative = cumulative.saturating_add(u64::from(widths.width_of(ch)));
        let Some(&&threshold) = pending.peek() else {
            break;
        };
        if cumulative as f64 >= threshold {
            offsets.push(index + ch.len_utf8());
            pending.next();
        }
    }

    offsets
}

fn insert_breaks(text: &str, offsets: &[usize]) -> String {
    let mut result = text.to_string();
    for &offset in offsets.iter().rev() {
        result.insert_str(offset, LINE_BREAK);
    }
    result
}

/// Insert one line break once half of the total width has been reached.
pub fn insert_break_at_half(text: &str, widths: &CharWidthTable) -> String {
    let total = measure_width(text, widths);
    if total == 0 {
        return text.to_string();
    }
    let half = total as f64 / 2.0;
    insert_breaks(text, &break_offsets(text, widths, &[half]))
}

/// Insert up to two line breaks, at one third and two thirds of the total width.
pub fn insert_break_at_thirds(text: &str, widths: &CharWidthTable) -> String {
    let total = measure_width(text, widths);
    if total == 0 {
        return text.to_string();
    }
    let third = total as f64 / 3.0;
    insert_breaks(text, &break_offsets(text, widths, &[third, third * 2.0]))
}
