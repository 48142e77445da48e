//! Text segmentation for read-along display.
//!
//! The strategy mirrors how a narrator paces an article: paragraphs are the
//! outer unit, sentences the inner one, and sentences too long to show as a
//! single subtitle line are broken at clause punctuation. The logic is
//! isolated so it can be swapped for a smarter splitter later.

use serde::Serialize;

/// Sentences longer than this (in chars) are split at clause punctuation.
pub const LONG_SENTENCE_CHARS: usize = 150;

/// One displayable unit of text, in reading order. Immutable once created;
/// a session builds its segment list exactly once per article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub text: String,
    pub is_new_paragraph: bool,
}

fn is_sentence_end(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '。' | '！' | '？')
}

fn is_clause_end(ch: char) -> bool {
    matches!(ch, ',' | ';' | '，' | '；')
}

/// True when the segment ends at a sentence boundary (used for pause weighting).
pub fn ends_sentence(text: &str) -> bool {
    text.chars().last().is_some_and(is_sentence_end)
}

/// True when the segment ends at a clause boundary.
pub fn ends_clause(text: &str) -> bool {
    text.chars().last().is_some_and(is_clause_end)
}

/// Split `text` into display segments.
///
/// Paragraphs are separated by one or more newlines. Within a paragraph,
/// sentences end at `.!?` (or full-width equivalents) followed by
/// whitespace; sentences over `long_sentence_chars` chars are further split
/// after `,;` (or full-width equivalents) followed by whitespace. The first
/// unit of each paragraph is tagged `is_new_paragraph`. Empty units are
/// dropped, so the result never contains blank segments. Deterministic for
/// identical input.
pub fn segment(text: &str, long_sentence_chars: usize) -> Vec<Segment> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut segments: Vec<Segment> = Vec::new();
    for paragraph in text.lines().map(str::trim).filter(|p| !p.is_empty()) {
        let mut first_in_paragraph = true;
        for sentence in split_after_boundary(paragraph, is_sentence_end) {
            let units = if sentence.trim().chars().count() > long_sentence_chars {
                split_after_boundary(&sentence, is_clause_end)
            } else {
                vec![sentence]
            };

            for unit in units {
                let unit = unit.trim();
                if unit.is_empty() {
                    continue;
                }
                segments.push(Segment {
                    index: segments.len(),
                    text: unit.to_owned(),
                    is_new_paragraph: first_in_paragraph,
                });
                first_in_paragraph = false;
            }
        }
    }

    segments
}

/// Split `text` into pieces ending just after a boundary character that is
/// immediately followed by whitespace. The whitespace is left at the head of
/// the next piece; callers trim it away.
fn split_after_boundary(text: &str, is_boundary: fn(char) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if is_boundary(ch) && chars.peek().is_some_and(|next| next.is_whitespace()) {
            pieces.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}
