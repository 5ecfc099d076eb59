use crate::cancellation::CancellationToken;

mod navigation;
mod playback;
mod reducer;
mod sequencer;

/// Work the reducer cannot perform itself: spawning synthesis workers and
/// fire-and-forget persistence. Executed by the runtime after each reduce.
#[derive(Debug)]
pub enum Effect {
    Synthesize {
        request_id: u64,
        page: usize,
        box_idx: usize,
        text: String,
        context_id: String,
        cancel: CancellationToken,
    },
    SaveProgress {
        page: usize,
    },
    IncrementReadCount,
    Alert(String),
}
