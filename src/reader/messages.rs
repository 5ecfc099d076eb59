use crate::alignment::AlignmentWord;
use crate::audio::AudioClip;
use std::time::Instant;

/// Events fed into the reader: user commands, synthesis worker results, and
/// the host's clock ticks.
#[derive(Debug)]
pub enum ReaderEvent {
    /// Narrate the whole current page and keep going to the end of the book.
    PlayPage,
    /// Narrate a single text box on the current page.
    BoxTapped(usize),
    TogglePause,
    Stop,
    /// Dismiss a synthesis failure and return to idle.
    AcknowledgeFailure,
    NextPage,
    PreviousPage,
    SynthesisReady {
        request_id: u64,
        page: usize,
        box_idx: usize,
        clip: AudioClip,
        alignment: Option<Vec<AlignmentWord>>,
    },
    SynthesisFailed {
        request_id: u64,
        error: String,
    },
    Tick(Instant),
}
