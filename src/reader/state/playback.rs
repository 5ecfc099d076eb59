use crate::alignment::AlignmentWord;
use crate::audio::{AudioClip, MediaSession};
use crate::cancellation::CancellationToken;
use crate::highlight::WordHighlighter;
use std::time::{Duration, Instant};
use tracing::debug;

/// Lifecycle of the single active playback unit.
#[derive(Debug, Clone, PartialEq)]
pub(in crate::reader) enum PlaybackLifecycle {
    Idle,
    Loading {
        page: usize,
        box_idx: usize,
    },
    Playing,
    Paused,
    /// Audio finished naturally; the last-word highlight is held until the
    /// grace period expires and the unit reports completion.
    Ended {
        since: Instant,
    },
    Failed {
        message: String,
    },
}

/// The live pairing of one text box with its audio and rectified alignment.
#[derive(Debug)]
pub(in crate::reader) struct PlaybackUnit {
    pub(in crate::reader) page: usize,
    pub(in crate::reader) box_idx: usize,
    pub(in crate::reader) clip: AudioClip,
    pub(in crate::reader) alignment: Vec<AlignmentWord>,
    pub(in crate::reader) duration: Duration,
}

pub(in crate::reader) struct PlaybackState {
    pub(in crate::reader) media: Box<dyn MediaSession>,
    pub(in crate::reader) lifecycle: PlaybackLifecycle,
    pub(in crate::reader) unit: Option<PlaybackUnit>,
    pub(in crate::reader) highlighter: WordHighlighter,
    pub(in crate::reader) request_id: u64,
    pub(in crate::reader) cancel: Option<CancellationToken>,
    pub(in crate::reader) started_at: Option<Instant>,
    pub(in crate::reader) elapsed: Duration,
}

impl PlaybackState {
    pub(in crate::reader) fn new(media: Box<dyn MediaSession>) -> Self {
        Self {
            media,
            lifecycle: PlaybackLifecycle::Idle,
            unit: None,
            highlighter: WordHighlighter::new(),
            request_id: 0,
            cancel: None,
            started_at: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Force the current unit (live or in flight) through a full stop:
    /// cancel pending synthesis, release the audio resource, clear the
    /// highlight, and invalidate late callbacks. Safe to call in any state.
    pub(in crate::reader) fn stop_current(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.request_id = self.request_id.wrapping_add(1);
        self.media.stop();
        self.unit = None;
        self.highlighter.clear();
        self.started_at = None;
        self.elapsed = Duration::ZERO;
        if self.lifecycle != PlaybackLifecycle::Idle {
            debug!("Stopped playback unit");
            self.lifecycle = PlaybackLifecycle::Idle;
        }
    }

    /// Enter `Loading` for a new unit. Returns the request id and the
    /// cancellation token the synthesis worker must carry.
    pub(in crate::reader) fn begin_loading(
        &mut self,
        page: usize,
        box_idx: usize,
    ) -> (u64, CancellationToken) {
        self.stop_current();
        self.request_id = self.request_id.wrapping_add(1);
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        self.lifecycle = PlaybackLifecycle::Loading { page, box_idx };
        (self.request_id, token)
    }

    /// Playback position derived from the monotonic clock: time accumulated
    /// across pauses plus time since the last resume, clamped to the clip.
    pub(in crate::reader) fn position(&self, now: Instant) -> Duration {
        let mut position = self.elapsed;
        if let Some(started) = self.started_at {
            position += now.saturating_duration_since(started);
        }
        if let Some(unit) = &self.unit {
            if unit.duration > Duration::ZERO {
                position = position.min(unit.duration);
            }
        }
        position
    }

    pub(in crate::reader) fn active_box(&self) -> Option<(usize, usize)> {
        match &self.lifecycle {
            PlaybackLifecycle::Loading { page, box_idx } => Some((*page, *box_idx)),
            PlaybackLifecycle::Playing
            | PlaybackLifecycle::Paused
            | PlaybackLifecycle::Ended { .. } => {
                self.unit.as_ref().map(|unit| (unit.page, unit.box_idx))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::testing::FakeMediaSession;

    #[test]
    fn position_accumulates_across_pauses() {
        let (media, _log) = FakeMediaSession::new();
        let mut playback = PlaybackState::new(media);
        let t0 = Instant::now();
        playback.elapsed = Duration::from_millis(500);
        playback.started_at = Some(t0);
        assert_eq!(
            playback.position(t0 + Duration::from_millis(300)),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn position_clamps_to_clip_duration() {
        let (media, _log) = FakeMediaSession::new();
        let mut playback = PlaybackState::new(media);
        let t0 = Instant::now();
        playback.started_at = Some(t0);
        playback.unit = Some(PlaybackUnit {
            page: 0,
            box_idx: 0,
            clip: AudioClip {
                bytes: Vec::new().into(),
                duration: Some(Duration::from_secs(1)),
            },
            alignment: Vec::new(),
            duration: Duration::from_secs(1),
        });
        assert_eq!(
            playback.position(t0 + Duration::from_secs(5)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn begin_loading_invalidates_previous_request() {
        let (media, log) = FakeMediaSession::new();
        let mut playback = PlaybackState::new(media);
        let (first, token) = playback.begin_loading(0, 0);
        let (second, _) = playback.begin_loading(0, 1);
        assert_ne!(first, second);
        assert!(token.is_cancelled());
        assert!(log.lock().unwrap().ops.contains(&"stop".to_string()));
    }

    #[test]
    fn stop_is_idempotent() {
        let (media, _log) = FakeMediaSession::new();
        let mut playback = PlaybackState::new(media);
        playback.stop_current();
        playback.stop_current();
        assert_eq!(playback.lifecycle, PlaybackLifecycle::Idle);
        assert!(playback.unit.is_none());
    }
}
