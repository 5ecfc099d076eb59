//! Word highlight tracking.
//!
//! Consumes playback-time ticks against a rectified alignment and decides
//! which word is lit. Once speech has begun, losing the containing interval
//! (the gap between words, or the silent tail after the last word) keeps the
//! previous word lit rather than flashing the highlight off.

use crate::alignment::AlignmentWord;

#[derive(Debug, Default)]
pub struct WordHighlighter {
    current: Option<usize>,
}

impl WordHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Recompute the highlight for a new playback time. Returns the new index
    /// only when it changed since the previous tick, so callers never repaint
    /// an unchanged word.
    pub fn advance(&mut self, time_seconds: f64, alignment: &[AlignmentWord]) -> Option<usize> {
        let next = highlight_index_for(time_seconds, alignment, self.current);
        if next == self.current {
            return None;
        }
        self.current = next;
        next
    }

    /// Pin the highlight to the final word, for the hold at natural end.
    pub fn hold_last(&mut self, alignment: &[AlignmentWord]) {
        if !alignment.is_empty() {
            self.current = Some(alignment.len() - 1);
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Interval containment with the hold policy: first entry whose
/// `start <= t < end` wins; before the first start nothing is lit; anywhere
/// past that without a containing interval the previous index is retained.
pub fn highlight_index_for(
    time_seconds: f64,
    alignment: &[AlignmentWord],
    previous: Option<usize>,
) -> Option<usize> {
    let first = alignment.first()?;
    if time_seconds < first.start {
        return None;
    }
    alignment
        .iter()
        .position(|entry| entry.start <= time_seconds && time_seconds < entry.end)
        .or(previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment() -> Vec<AlignmentWord> {
        vec![
            AlignmentWord {
                word: "a".to_string(),
                start: 0.0,
                end: 1.0,
            },
            AlignmentWord {
                word: "b".to_string(),
                start: 1.2,
                end: 2.0,
            },
        ]
    }

    #[test]
    fn finds_containing_interval() {
        assert_eq!(highlight_index_for(0.5, &alignment(), None), Some(0));
        assert_eq!(highlight_index_for(1.5, &alignment(), Some(0)), Some(1));
        assert_eq!(highlight_index_for(0.0, &alignment(), None), Some(0));
    }

    #[test]
    fn holds_last_word_past_end_of_speech() {
        let single = vec![AlignmentWord {
            word: "a".to_string(),
            start: 0.0,
            end: 1.0,
        }];
        assert_eq!(highlight_index_for(1.5, &single, Some(0)), Some(0));
    }

    #[test]
    fn nothing_lit_during_leading_silence() {
        let late = vec![AlignmentWord {
            word: "a".to_string(),
            start: 0.5,
            end: 1.0,
        }];
        assert_eq!(highlight_index_for(-0.1, &late, None), None);
        assert_eq!(highlight_index_for(0.2, &late, None), None);
    }

    #[test]
    fn retains_previous_in_inter_word_gap() {
        assert_eq!(highlight_index_for(1.1, &alignment(), Some(0)), Some(0));
    }

    #[test]
    fn advance_reports_only_changes() {
        let words = alignment();
        let mut highlighter = WordHighlighter::new();
        assert_eq!(highlighter.advance(0.2, &words), Some(0));
        assert_eq!(highlighter.advance(0.6, &words), None);
        assert_eq!(highlighter.advance(1.5, &words), Some(1));
        assert_eq!(highlighter.advance(3.0, &words), None);
        assert_eq!(highlighter.current(), Some(1));
    }

    #[test]
    fn empty_alignment_never_highlights() {
        let mut highlighter = WordHighlighter::new();
        assert_eq!(highlighter.advance(0.5, &[]), None);
        assert_eq!(highlighter.current(), None);
    }

    #[test]
    fn hold_last_pins_final_word() {
        let words = alignment();
        let mut highlighter = WordHighlighter::new();
        highlighter.hold_last(&words);
        assert_eq!(highlighter.current(), Some(1));
        highlighter.clear();
        assert_eq!(highlighter.current(), None);
    }
}
