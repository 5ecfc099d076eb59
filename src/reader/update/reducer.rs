use super::Effect;
use crate::reader::messages::ReaderEvent;
use crate::reader::state::Reader;

impl Reader {
    /// Apply one event, returning the effects the runtime must execute.
    /// Subscribed listeners are notified afterwards if the observable state
    /// changed.
    pub fn reduce(&mut self, event: ReaderEvent) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            ReaderEvent::PlayPage => self.handle_play_page(&mut effects),
            ReaderEvent::BoxTapped(box_idx) => self.handle_box_tapped(box_idx, &mut effects),
            ReaderEvent::TogglePause => self.handle_toggle_pause(),
            ReaderEvent::Stop => self.handle_stop(),
            ReaderEvent::AcknowledgeFailure => self.handle_acknowledge_failure(),
            ReaderEvent::NextPage => self.handle_next_page(&mut effects),
            ReaderEvent::PreviousPage => self.handle_previous_page(&mut effects),
            ReaderEvent::SynthesisReady {
                request_id,
                page,
                box_idx,
                clip,
                alignment,
            } => self.handle_synthesis_ready(request_id, page, box_idx, clip, alignment, &mut effects),
            ReaderEvent::SynthesisFailed { request_id, error } => {
                self.handle_synthesis_failed(request_id, error, &mut effects)
            }
            ReaderEvent::Tick(now) => self.handle_tick(now, &mut effects),
        }

        self.notify_if_changed();
        effects
    }
}
