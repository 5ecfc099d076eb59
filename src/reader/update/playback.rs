use super::Effect;
use crate::alignment::{AlignmentWord, rectify};
use crate::audio::AudioClip;
use crate::cues::normalize;
use crate::reader::state::{PlaybackLifecycle, PlaybackUnit, Reader};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

impl Reader {
    pub(in crate::reader) fn handle_box_tapped(&mut self, box_idx: usize, effects: &mut Vec<Effect>) {
        self.autoplay.force_off("text box tapped");
        self.start_unit(self.current_page, box_idx, effects);
    }

    /// Tear down whatever is active and request synthesis for one text box.
    pub(in crate::reader) fn start_unit(
        &mut self,
        page: usize,
        box_idx: usize,
        effects: &mut Vec<Effect>,
    ) {
        let Some(text_box) = self.book.text_box(page, box_idx) else {
            debug!(page = page + 1, box_idx, "No such text box; ignoring start");
            return;
        };
        // The voice gets the cue-annotated side; the display side is derived
        // wherever the box is rendered.
        let text = normalize(&text_box.text).synthesis;
        let (request_id, cancel) = self.playback.begin_loading(page, box_idx);
        info!(
            page = page + 1,
            box_idx, request_id, "Requesting narration for text box"
        );
        effects.push(Effect::Synthesize {
            request_id,
            page,
            box_idx,
            text,
            context_id: self.book.id.clone(),
            cancel,
        });
    }

    pub(in crate::reader) fn handle_synthesis_ready(
        &mut self,
        request_id: u64,
        page: usize,
        box_idx: usize,
        clip: AudioClip,
        alignment: Option<Vec<AlignmentWord>>,
        effects: &mut Vec<Effect>,
    ) {
        if request_id != self.playback.request_id {
            debug!(
                request_id,
                current = self.playback.request_id,
                "Ignoring synthesis result from a superseded request"
            );
            return;
        }
        if !matches!(self.playback.lifecycle, PlaybackLifecycle::Loading { .. }) {
            debug!(request_id, "Synthesis result arrived outside loading; ignoring");
            return;
        }
        if page != self.current_page {
            debug!(
                page = page + 1,
                current = self.current_page + 1,
                "Ignoring synthesis result for a different page"
            );
            return;
        }

        self.playback.cancel = None;
        let decoded = clip.duration.unwrap_or_default();
        let rectified = alignment
            .map(|words| rectify(words, decoded, self.config.per_word_seconds))
            .unwrap_or_default();
        if rectified.is_empty() {
            warn!(
                page = page + 1,
                box_idx, "No usable word timing for this text box; highlighting disabled"
            );
        }

        match self.playback.media.begin(&clip) {
            Ok(()) => {
                self.playback.unit = Some(PlaybackUnit {
                    page,
                    box_idx,
                    duration: decoded,
                    clip,
                    alignment: rectified,
                });
                self.playback.lifecycle = PlaybackLifecycle::Playing;
                self.playback.elapsed = Duration::ZERO;
                self.playback.started_at = Some(Instant::now());
                debug!(
                    page = page + 1,
                    box_idx,
                    duration_ms = decoded.as_millis(),
                    "Narration playing"
                );
            }
            Err(err) => self.fail_playback(format!("{err:#}"), effects),
        }
    }

    pub(in crate::reader) fn handle_synthesis_failed(
        &mut self,
        request_id: u64,
        error: String,
        effects: &mut Vec<Effect>,
    ) {
        if request_id != self.playback.request_id {
            debug!(
                request_id,
                current = self.playback.request_id,
                "Ignoring failure from a superseded request"
            );
            return;
        }
        self.fail_playback(error, effects);
    }

    /// A failed unit never lingers half-active: audio is released, the alert
    /// surfaces once, and auto-play stops rather than silently skipping
    /// ahead over a broken gateway.
    fn fail_playback(&mut self, message: String, effects: &mut Vec<Effect>) {
        warn!(%message, "Narration unavailable");
        if let Some(cancel) = self.playback.cancel.take() {
            cancel.cancel();
        }
        self.playback.media.stop();
        self.playback.unit = None;
        self.playback.highlighter.clear();
        self.playback.started_at = None;
        self.playback.elapsed = Duration::ZERO;
        self.playback.lifecycle = PlaybackLifecycle::Failed {
            message: message.clone(),
        };
        self.autoplay.force_off("synthesis failure");
        effects.push(Effect::Alert(message));
    }

    pub(in crate::reader) fn handle_acknowledge_failure(&mut self) {
        if matches!(self.playback.lifecycle, PlaybackLifecycle::Failed { .. }) {
            self.playback.lifecycle = PlaybackLifecycle::Idle;
        }
    }

    pub(in crate::reader) fn handle_toggle_pause(&mut self) {
        match self.playback.lifecycle {
            PlaybackLifecycle::Playing => {
                self.playback.media.pause();
                if let Some(started) = self.playback.started_at.take() {
                    self.playback.elapsed += Instant::now().saturating_duration_since(started);
                }
                self.playback.lifecycle = PlaybackLifecycle::Paused;
                self.autoplay.force_off("paused");
                info!("Narration paused");
            }
            PlaybackLifecycle::Paused => {
                self.playback.media.resume();
                self.playback.started_at = Some(Instant::now());
                self.playback.lifecycle = PlaybackLifecycle::Playing;
                info!("Narration resumed");
            }
            // Pausing between units (a pending page turn) still cancels
            // auto-play; there is no unit to freeze.
            _ => self.autoplay.force_off("paused"),
        }
    }

    pub(in crate::reader) fn handle_stop(&mut self) {
        self.autoplay.force_off("stopped");
        self.playback.stop_current();
    }

    pub(in crate::reader) fn handle_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        self.tick_playback(now, effects);
        self.tick_autoplay(now, effects);
    }

    fn tick_playback(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        match self.playback.lifecycle {
            PlaybackLifecycle::Playing => {
                let position = self.playback.position(now);
                let playback = &mut self.playback;
                let mut finished = playback.media.finished();
                let mut has_alignment = false;
                if let Some(unit) = &playback.unit {
                    has_alignment = !unit.alignment.is_empty();
                    playback
                        .highlighter
                        .advance(position.as_secs_f64(), &unit.alignment);
                    if unit.duration > Duration::ZERO && position >= unit.duration {
                        finished = true;
                    }
                }
                if finished {
                    if has_alignment {
                        if let Some(unit) = &self.playback.unit {
                            self.playback.highlighter.hold_last(&unit.alignment);
                        }
                        debug!("Narration finished; holding last word");
                        self.playback.lifecycle = PlaybackLifecycle::Ended { since: now };
                    } else {
                        let request_id = self.playback.request_id;
                        self.release_finished_unit();
                        self.handle_unit_completed(request_id, now, effects);
                    }
                }
            }
            PlaybackLifecycle::Ended { since } => {
                let hold = Duration::from_millis(self.config.highlight_hold_ms);
                if now.saturating_duration_since(since) >= hold {
                    let request_id = self.playback.request_id;
                    self.release_finished_unit();
                    self.handle_unit_completed(request_id, now, effects);
                }
            }
            _ => {}
        }
    }

    /// Normal-completion teardown. Unlike `stop_current` this keeps the
    /// request id, so the completion it reports still matches the unit.
    fn release_finished_unit(&mut self) {
        self.playback.media.stop();
        self.playback.unit = None;
        self.playback.highlighter.clear();
        self.playback.started_at = None;
        self.playback.elapsed = Duration::ZERO;
        self.playback.lifecycle = PlaybackLifecycle::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::messages::ReaderEvent;
    use crate::reader::state::PlaybackPhase;
    use crate::reader::testing::{clip, test_reader, two_page_book, word_alignment};

    fn request_of(effects: &[Effect]) -> (u64, usize, usize) {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Synthesize {
                    request_id,
                    page,
                    box_idx,
                    ..
                } => Some((*request_id, *page, *box_idx)),
                _ => None,
            })
            .expect("a synthesis request")
    }

    fn ready(request: (u64, usize, usize), alignment: Option<Vec<crate::alignment::AlignmentWord>>) -> ReaderEvent {
        ReaderEvent::SynthesisReady {
            request_id: request.0,
            page: request.1,
            box_idx: request.2,
            clip: clip(2.0),
            alignment,
        }
    }

    #[test]
    fn starting_a_second_unit_stops_the_first_before_audio_begins() {
        let (mut reader, log) = test_reader(two_page_book());
        let effects = reader.reduce(ReaderEvent::BoxTapped(0));
        let first = request_of(&effects);
        let _ = reader.reduce(ready(first, Some(word_alignment(&["a"]))));
        assert!(log.lock().unwrap().playing);

        let effects = reader.reduce(ReaderEvent::BoxTapped(1));
        {
            let log = log.lock().unwrap();
            assert!(!log.playing, "first unit must be stopped before the second starts");
        }
        let second = request_of(&effects);
        let _ = reader.reduce(ready(second, None));

        let log = log.lock().unwrap();
        let begins_and_stops: Vec<&str> = log
            .ops
            .iter()
            .map(String::as_str)
            .filter(|op| *op == "begin" || *op == "stop")
            .collect();
        let second_begin = begins_and_stops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op == "begin")
            .nth(1)
            .map(|(i, _)| i)
            .expect("second begin");
        assert!(
            begins_and_stops[..second_begin].contains(&"stop"),
            "a stop must separate the two begins"
        );
    }

    #[test]
    fn stale_synthesis_result_never_plays() {
        let (mut reader, log) = test_reader(two_page_book());
        let effects = reader.reduce(ReaderEvent::BoxTapped(0));
        let first = request_of(&effects);
        let effects = reader.reduce(ReaderEvent::BoxTapped(1));
        let second = request_of(&effects);

        // The first request resolves late, after it was superseded.
        let _ = reader.reduce(ready(first, None));
        assert_eq!(reader.snapshot().phase, PlaybackPhase::Loading);
        assert_eq!(log.lock().unwrap().ops.iter().filter(|op| *op == "begin").count(), 0);

        let _ = reader.reduce(ready(second, None));
        assert_eq!(reader.snapshot().phase, PlaybackPhase::Playing);
    }

    #[test]
    fn synthesis_result_for_a_left_page_is_discarded() {
        let (mut reader, _log) = test_reader(two_page_book());
        let effects = reader.reduce(ReaderEvent::BoxTapped(0));
        let first = request_of(&effects);
        let _ = reader.reduce(ReaderEvent::NextPage);
        let _ = reader.reduce(ready(first, None));
        assert_eq!(reader.snapshot().phase, PlaybackPhase::Idle);
    }

    #[test]
    fn highlight_follows_the_clock() {
        let (mut reader, _log) = test_reader(two_page_book());
        let effects = reader.reduce(ReaderEvent::BoxTapped(0));
        let request = request_of(&effects);
        // Four words over a 2 s clip: rectified to 0.5 s per word.
        let _ = reader.reduce(ready(request, Some(word_alignment(&["a", "b", "c", "d"]))));

        let t0 = Instant::now();
        let _ = reader.reduce(ReaderEvent::Tick(t0 + Duration::from_millis(250)));
        assert_eq!(reader.snapshot().highlight, Some(0));
        let _ = reader.reduce(ReaderEvent::Tick(t0 + Duration::from_millis(1250)));
        assert_eq!(reader.snapshot().highlight, Some(2));
    }

    #[test]
    fn natural_end_holds_the_last_word_before_going_idle() {
        let (mut reader, _log) = test_reader(two_page_book());
        let effects = reader.reduce(ReaderEvent::BoxTapped(0));
        let request = request_of(&effects);
        let _ = reader.reduce(ready(request, Some(word_alignment(&["a", "b"]))));

        let _ = reader.reduce(ReaderEvent::Tick(Instant::now() + Duration::from_secs(5)));
        let snapshot = reader.snapshot();
        assert_eq!(snapshot.phase, PlaybackPhase::Ended);
        assert_eq!(snapshot.highlight, Some(1));

        let _ = reader.reduce(ReaderEvent::Tick(Instant::now() + Duration::from_secs(10)));
        let snapshot = reader.snapshot();
        assert_eq!(snapshot.phase, PlaybackPhase::Idle);
        assert_eq!(snapshot.highlight, None);
    }

    #[test]
    fn pause_freezes_the_clock_and_resume_continues_it() {
        let (mut reader, log) = test_reader(two_page_book());
        let effects = reader.reduce(ReaderEvent::BoxTapped(0));
        let request = request_of(&effects);
        let _ = reader.reduce(ready(request, Some(word_alignment(&["a", "b", "c", "d"]))));

        let _ = reader.reduce(ReaderEvent::TogglePause);
        assert_eq!(reader.snapshot().phase, PlaybackPhase::Paused);
        assert!(!log.lock().unwrap().playing);

        // Ticks while paused do not move the highlight.
        let _ = reader.reduce(ReaderEvent::Tick(Instant::now() + Duration::from_secs(5)));
        assert_eq!(reader.snapshot().phase, PlaybackPhase::Paused);

        let _ = reader.reduce(ReaderEvent::TogglePause);
        assert_eq!(reader.snapshot().phase, PlaybackPhase::Playing);
        assert!(log.lock().unwrap().playing);
    }
}
