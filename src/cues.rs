//! Delivery-cue handling for story text.
//!
//! Story text may carry bracketed delivery cues such as `[excited]` or
//! `[whispering]` that steer the synthesis voice. Display text must not show
//! them, but the synthesis request keeps the raw text so the voice can honor
//! them. Everything here is a pure function over strings.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_CUE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static RE_WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Display/synthesis split of one raw text-box string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub display: String,
    pub synthesis: String,
}

/// Normalize raw story text into what the reader shows and what the voice
/// speaks. The synthesis side is the raw text unchanged.
pub fn normalize(raw: &str) -> NormalizedText {
    NormalizedText {
        display: strip_cues(raw),
        synthesis: raw.to_string(),
    }
}

/// Remove every bracketed cue and collapse the whitespace left behind.
///
/// An unterminated `[` has no closing bracket to match, so it stays in the
/// text as a literal character rather than swallowing the rest of the line.
pub fn strip_cues(raw: &str) -> String {
    let without_cues = RE_CUE_TOKEN.replace_all(raw, " ");
    RE_WHITESPACE_RUN
        .replace_all(&without_cues, " ")
        .trim()
        .to_string()
}

/// Split display text into the word sequence the highlighter indexes into.
pub fn split_words(display: &str) -> Vec<&str> {
    display.split_whitespace().collect()
}
