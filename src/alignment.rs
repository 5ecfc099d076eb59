//! Word-timing rectification.
//!
//! The synthesis gateway's alignment is computed against its own duration
//! estimate, which drifts from the real decoded audio length; played as-is
//! the highlight falls visibly behind the voice, worse the longer the text
//! box. Rectification filters cue artifacts out of the alignment and rescales
//! every timestamp so the word timeline spans the actual decoded duration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

static RE_PURE_CUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[.*\]$").unwrap());
static RE_EMBEDDED_CUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// One spoken word and the interval during which it is audible.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlignmentWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// Filter cue artifacts and rescale timestamps to the decoded duration.
///
/// `per_word_seconds` is the approximation used to reconstruct the gateway's
/// duration estimate from the surviving word count. If either that estimate
/// or the decoded duration is unavailable (zero), timestamps pass through
/// unscaled.
pub fn rectify(
    raw: Vec<AlignmentWord>,
    decoded_duration: Duration,
    per_word_seconds: f64,
) -> Vec<AlignmentWord> {
    let filtered: Vec<AlignmentWord> = raw
        .into_iter()
        .filter_map(|entry| {
            if RE_PURE_CUE.is_match(entry.word.trim()) {
                return None;
            }
            let word = RE_EMBEDDED_CUE.replace_all(&entry.word, "").trim().to_string();
            if word.is_empty() {
                return None;
            }
            Some(AlignmentWord { word, ..entry })
        })
        .collect();

    let estimated = filtered.len() as f64 * per_word_seconds;
    let decoded = decoded_duration.as_secs_f64();
    if estimated <= 0.0 || decoded <= 0.0 {
        return filtered;
    }

    let scale = decoded / estimated;
    debug!(
        words = filtered.len(),
        estimated, decoded, scale, "Rescaling alignment to decoded duration"
    );
    filtered
        .into_iter()
        .map(|entry| AlignmentWord {
            start: entry.start * scale,
            end: entry.end * scale,
            ..entry
        })
        .collect()
}
