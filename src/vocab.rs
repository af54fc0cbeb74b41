//! Vocabulary list parsing.
//!
//! One record per line: `translated - original`, where the separator is any
//! dash (`-`, `–`, `—`) with optional surrounding whitespace. Only the first
//! dash splits, so the original side may itself contain dashes.

use crate::error::{Result, VocardsError};
use crate::pipeline::types::VocabPair;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[-–—]\s*").expect("dash pattern is valid"));

/// Parses one vocabulary line.
///
/// Returns `None` for blank lines, lines without a dash, and lines where
/// either side is empty after trimming.
pub fn parse_vocab_line(line: &str) -> Option<VocabPair> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = DASH.splitn(line, 2);
    let translated = parts.next()?.trim();
    let original = parts.next()?.trim();

    if translated.is_empty() || original.is_empty() {
        return None;
    }

    Some(VocabPair::new(translated, original))
}

/// Lazily parses every line of `text`, skipping lines that are not records.
pub fn parse_vocab(text: &str) -> impl Iterator<Item = VocabPair> + '_ {
    text.lines().enumerate().filter_map(|(index, line)| {
        let pair = parse_vocab_line(line);
        if pair.is_none() && !line.trim().is_empty() {
            tracing::debug!(line = index + 1, "Skipping line without a dash separator");
        }
        pair
    })
}

/// Reads the vocabulary file at startup.
pub fn read_vocab_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VocardsError::InputNotFound {
                path: path.display().to_string(),
            }
        } else {
            VocardsError::Io(e)
        }
    })
}
