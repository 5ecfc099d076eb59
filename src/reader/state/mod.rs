mod playback;
mod sequencer;

use crate::audio::MediaSession;
use crate::book::Book;
use crate::config::NarratorConfig;
use crate::cues::{split_words, strip_cues};
use tracing::info;

pub(in crate::reader) use playback::{PlaybackLifecycle, PlaybackState, PlaybackUnit};
pub(in crate::reader) use sequencer::{AutoPlayPhase, AutoPlayState};

/// Framework-facing view of the playback lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Failed,
}

/// Everything a binding layer needs to render one frame of the reader. Built
/// fresh after every event; listeners are only notified when it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderSnapshot {
    pub page: usize,
    pub page_count: usize,
    pub active_box: Option<usize>,
    pub words: Vec<String>,
    pub highlight: Option<usize>,
    pub phase: PlaybackPhase,
    pub auto_play: bool,
    pub completed: bool,
    pub alert: Option<String>,
}

type Listener = Box<dyn FnMut(&ReaderSnapshot)>;

/// The narrated-reading engine: one book, one playback unit at most, and the
/// auto-play cursor, reduced over events from the host.
pub struct Reader {
    pub(in crate::reader) book: Book,
    pub(in crate::reader) current_page: usize,
    pub(in crate::reader) playback: PlaybackState,
    pub(in crate::reader) autoplay: AutoPlayState,
    pub(in crate::reader) config: NarratorConfig,
    listeners: Vec<Listener>,
    last_snapshot: Option<ReaderSnapshot>,
}

impl Reader {
    pub fn new(
        book: Book,
        config: NarratorConfig,
        media: Box<dyn MediaSession>,
        start_page: Option<usize>,
    ) -> Self {
        let current_page = start_page
            .unwrap_or(0)
            .min(book.page_count().saturating_sub(1));
        if current_page > 0 {
            info!(page = current_page + 1, "Resuming from saved progress");
        }
        Self {
            book,
            current_page,
            playback: PlaybackState::new(media),
            autoplay: AutoPlayState::new(),
            config,
            listeners: Vec::new(),
            last_snapshot: None,
        }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Register a change listener; it fires after any event that altered the
    /// observable state, with the fresh snapshot.
    pub fn subscribe(&mut self, listener: impl FnMut(&ReaderSnapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        let active_box = self.playback.active_box().and_then(|(page, box_idx)| {
            (page == self.current_page).then_some(box_idx)
        });
        let words = active_box
            .and_then(|box_idx| self.book.text_box(self.current_page, box_idx))
            .map(|text_box| {
                let display = strip_cues(&text_box.text);
                split_words(&display)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let (phase, alert) = match &self.playback.lifecycle {
            PlaybackLifecycle::Idle => (PlaybackPhase::Idle, None),
            PlaybackLifecycle::Loading { .. } => (PlaybackPhase::Loading, None),
            PlaybackLifecycle::Playing => (PlaybackPhase::Playing, None),
            PlaybackLifecycle::Paused => (PlaybackPhase::Paused, None),
            PlaybackLifecycle::Ended { .. } => (PlaybackPhase::Ended, None),
            PlaybackLifecycle::Failed { message } => {
                (PlaybackPhase::Failed, Some(message.clone()))
            }
        };
        ReaderSnapshot {
            page: self.current_page,
            page_count: self.book.page_count(),
            active_box,
            words,
            highlight: self.playback.highlighter.current(),
            phase,
            auto_play: self.autoplay.is_on(),
            completed: matches!(self.autoplay.phase, AutoPlayPhase::Completed),
            alert,
        }
    }

    pub(in crate::reader) fn notify_if_changed(&mut self) {
        let snapshot = self.snapshot();
        if self.last_snapshot.as_ref() == Some(&snapshot) {
            return;
        }
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
        self.last_snapshot = Some(snapshot);
    }
}
