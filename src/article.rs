//! Article loading.
//!
//! This module is intentionally small: it reads an already-cleaned
//! plain-text article (paragraphs separated by blank lines) and normalizes
//! it for segmentation. Fetching and boilerplate cleanup happen upstream;
//! the engine only ever sees their output.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

/// A cleaned article plus the audio metadata it synchronizes against.
#[derive(Debug, Clone)]
pub struct Article {
    pub text: String,
    pub audio_url: Option<String>,
}

/// Read an article from disk and normalize it for the segmenter.
pub fn load_article(path: &Path, audio_url: Option<String>) -> Result<Article> {
    if !path.exists() {
        bail!("Article not found: {}", path.display());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read article at {}", path.display()))?;
    let text = normalize_text(&raw);
    info!(
        path = %path.display(),
        total_chars = text.chars().count(),
        paragraphs = text.lines().filter(|l| !l.trim().is_empty()).count(),
        "Loaded article"
    );
    Ok(Article { text, audio_url })
}

/// Canonicalize line endings, apply NFC, and drop per-line trailing
/// whitespace so downstream char counts are stable across sources.
pub fn normalize_text(raw: &str) -> String {
    let composed: String = raw.replace("\r\n", "\n").replace('\r', "\n").nfc().collect();
    let mut text = String::with_capacity(composed.len());
    for line in composed.lines() {
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text.truncate(text.trim_end().len());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_line_endings_become_newlines() {
        assert_eq!(normalize_text("one\r\ntwo\rthree"), "one\ntwo\nthree");
    }

    #[test]
    fn trailing_whitespace_is_stripped_per_line() {
        assert_eq!(normalize_text("a sentence.   \nnext line.\t\n\n"), "a sentence.\nnext line.");
    }

    #[test]
    fn decomposed_accents_are_composed() {
        // "e" + combining acute becomes the single composed char.
        assert_eq!(normalize_text("caf\u{0065}\u{0301}"), "caf\u{00e9}");
    }

    #[test]
    fn missing_article_is_an_error() {
        assert!(load_article(Path::new("/nonexistent/article.txt"), None).is_err());
    }
}
