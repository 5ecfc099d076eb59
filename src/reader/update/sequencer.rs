use super::Effect;
use crate::reader::state::{AutoPlayPhase, Reader};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

impl Reader {
    /// Start narrating the current page from its first text box and keep
    /// chaining through the rest of the book. Entering a page persists it.
    pub(in crate::reader) fn handle_play_page(&mut self, effects: &mut Vec<Effect>) {
        let page = self.current_page;
        if self.book.text_box_count(page) == 0 {
            info!(page = page + 1, "Page has no narratable text");
            return;
        }
        info!(page = page + 1, "Auto-play started");
        self.autoplay.phase = AutoPlayPhase::Active { page, box_idx: 0 };
        effects.push(Effect::SaveProgress { page });
        self.start_unit(page, 0, effects);
    }

    /// A playback unit reported natural completion. Chain to the next text
    /// box, schedule a page turn, or finish the book. Completions from
    /// superseded units and duplicates that land while an advance is already
    /// pending are discarded here; this is the guard that keeps overlapping
    /// completions from double-advancing the cursor.
    pub(in crate::reader) fn handle_unit_completed(
        &mut self,
        request_id: u64,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) {
        if request_id != self.playback.request_id {
            debug!(
                request_id,
                current = self.playback.request_id,
                "Ignoring completion from a superseded unit"
            );
            return;
        }

        match self.autoplay.phase {
            AutoPlayPhase::Active { page, box_idx } => {
                if page != self.current_page {
                    warn!(
                        page = page + 1,
                        current = self.current_page + 1,
                        "Auto-play cursor lost its page; stopping"
                    );
                    self.autoplay.force_off("page mismatch");
                    return;
                }
                if box_idx + 1 < self.book.text_box_count(page) {
                    debug!(page = page + 1, next_box = box_idx + 1, "Advancing to next text box");
                    self.autoplay.phase = AutoPlayPhase::Active {
                        page,
                        box_idx: box_idx + 1,
                    };
                    self.start_unit(page, box_idx + 1, effects);
                } else if !self.book.is_last_page(page) {
                    let lead = Duration::from_millis(self.config.page_turn_lead_ms);
                    let settle = Duration::from_millis(self.config.page_turn_settle_ms);
                    info!(from = page + 1, "Scheduling page turn");
                    self.autoplay.phase = AutoPlayPhase::TurningPage {
                        to: page + 1,
                        flip_at: now + lead,
                        resume_at: now + lead + settle,
                        flipped: false,
                    };
                } else {
                    info!(book_id = %self.book.id, "Book finished");
                    effects.push(Effect::IncrementReadCount);
                    self.autoplay.phase = AutoPlayPhase::Completed;
                }
            }
            AutoPlayPhase::TurningPage { .. } => {
                warn!("Ignoring re-entrant advance while a page turn is pending");
            }
            AutoPlayPhase::Off | AutoPlayPhase::Completed => {
                debug!("Unit completed with auto-play off; nothing to advance");
            }
        }
    }

    /// Drive a pending page turn through its two deadlines: flip the page
    /// after the lead delay, resume narration after the settle delay.
    pub(in crate::reader) fn tick_autoplay(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if let AutoPlayPhase::TurningPage {
            to,
            flip_at,
            resume_at,
            flipped,
        } = self.autoplay.phase
        {
            if !flipped && now >= flip_at {
                self.current_page = to.min(self.book.page_count().saturating_sub(1));
                info!(page = self.current_page + 1, "Page turned");
                effects.push(Effect::SaveProgress {
                    page: self.current_page,
                });
                self.autoplay.phase = AutoPlayPhase::TurningPage {
                    to,
                    flip_at,
                    resume_at,
                    flipped: true,
                };
            }
            if let AutoPlayPhase::TurningPage {
                to,
                resume_at,
                flipped: true,
                ..
            } = self.autoplay.phase
            {
                if now >= resume_at {
                    if self.book.text_box_count(to) > 0 {
                        self.autoplay.phase = AutoPlayPhase::Active { page: to, box_idx: 0 };
                        self.start_unit(to, 0, effects);
                    } else {
                        info!(page = to + 1, "Page has no narratable text; stopping auto-play");
                        self.autoplay.phase = AutoPlayPhase::Off;
                    }
                }
            }
        }
    }
}
