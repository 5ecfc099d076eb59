use super::Effect;
use crate::reader::state::Reader;
use tracing::info;

impl Reader {
    pub(in crate::reader) fn handle_next_page(&mut self, effects: &mut Vec<Effect>) {
        self.go_to_page(self.current_page + 1, effects);
    }

    pub(in crate::reader) fn handle_previous_page(&mut self, effects: &mut Vec<Effect>) {
        if self.current_page > 0 {
            self.go_to_page(self.current_page - 1, effects);
        }
    }

    /// Manual navigation: auto-play never survives it, and whatever was
    /// narrating is torn down before the page changes.
    fn go_to_page(&mut self, new_page: usize, effects: &mut Vec<Effect>) {
        if new_page >= self.book.page_count() {
            return;
        }
        self.autoplay.force_off("manual navigation");
        self.playback.stop_current();
        self.current_page = new_page;
        info!(page = new_page + 1, "Navigated to page");
        effects.push(Effect::SaveProgress { page: new_page });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::messages::ReaderEvent;
    use crate::reader::state::AutoPlayPhase;
    use crate::reader::testing::{test_reader, two_page_book};

    #[test]
    fn navigation_saves_progress_and_stops_autoplay() {
        let (mut reader, log) = test_reader(two_page_book());
        let _ = reader.reduce(ReaderEvent::PlayPage);
        let effects = reader.reduce(ReaderEvent::NextPage);

        assert_eq!(reader.current_page(), 1);
        assert!(matches!(reader.autoplay.phase, AutoPlayPhase::Off));
        assert!(effects
            .iter()
            .any(|effect| matches!(effect, Effect::SaveProgress { page: 1 })));
        assert!(log.lock().unwrap().ops.contains(&"stop".to_string()));
    }

    #[test]
    fn navigation_clamps_at_book_edges() {
        let (mut reader, _log) = test_reader(two_page_book());
        let effects = reader.reduce(ReaderEvent::PreviousPage);
        assert!(effects.is_empty());
        assert_eq!(reader.current_page(), 0);

        let _ = reader.reduce(ReaderEvent::NextPage);
        let effects = reader.reduce(ReaderEvent::NextPage);
        assert!(effects.is_empty());
        assert_eq!(reader.current_page(), 1);
    }
}
