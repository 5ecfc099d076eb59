use std::time::Instant;
use tracing::info;

/// Auto-play cursor over the book. Page turns are time-boxed: the old page
/// stays visible for the lead delay, then the index flips, then narration
/// resumes after the settle delay. Both deadlines are fixed when the turn is
/// scheduled so an interrupted turn leaves nothing armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::reader) enum AutoPlayPhase {
    Off,
    Active {
        page: usize,
        box_idx: usize,
    },
    TurningPage {
        to: usize,
        flip_at: Instant,
        resume_at: Instant,
        flipped: bool,
    },
    Completed,
}

pub(in crate::reader) struct AutoPlayState {
    pub(in crate::reader) phase: AutoPlayPhase,
}

impl AutoPlayState {
    pub(in crate::reader) fn new() -> Self {
        Self {
            phase: AutoPlayPhase::Off,
        }
    }

    pub(in crate::reader) fn is_on(&self) -> bool {
        !matches!(self.phase, AutoPlayPhase::Off | AutoPlayPhase::Completed)
    }

    /// Manual overrides always win; auto-play never survives one.
    pub(in crate::reader) fn force_off(&mut self, reason: &'static str) {
        if self.is_on() {
            info!(reason, "Auto-play stopped");
        }
        self.phase = AutoPlayPhase::Off;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn turning_page_counts_as_on() {
        let mut autoplay = AutoPlayState::new();
        let now = Instant::now();
        autoplay.phase = AutoPlayPhase::TurningPage {
            to: 1,
            flip_at: now + Duration::from_millis(400),
            resume_at: now + Duration::from_millis(800),
            flipped: false,
        };
        assert!(autoplay.is_on());
        autoplay.force_off("test");
        assert_eq!(autoplay.phase, AutoPlayPhase::Off);
    }

    #[test]
    fn completed_counts_as_off() {
        let mut autoplay = AutoPlayState::new();
        autoplay.phase = AutoPlayPhase::Completed;
        assert!(!autoplay.is_on());
    }
}
