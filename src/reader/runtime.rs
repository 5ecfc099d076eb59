//! Effect execution.
//!
//! The reducer stays synchronous and pure-ish; everything slow or fallible
//! lands here. Synthesis runs on its own thread per request and reports back
//! through the event channel; a cancelled or superseded request is dropped
//! before it can touch the reader.

use crate::alignment::AlignmentWord;
use crate::audio::AudioClip;
use crate::gateway::{SynthesisGateway, SynthesisRequest};
use crate::progress::ProgressStore;
use crate::reader::messages::ReaderEvent;
use crate::reader::update::Effect;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, warn};

pub struct Runtime {
    gateway: Arc<dyn SynthesisGateway>,
    store: ProgressStore,
    events: Sender<ReaderEvent>,
    voice_id: String,
    book_id: String,
}

impl Runtime {
    pub fn new(
        gateway: Arc<dyn SynthesisGateway>,
        store: ProgressStore,
        events: Sender<ReaderEvent>,
        voice_id: String,
        book_id: String,
    ) -> Self {
        Self {
            gateway,
            store,
            events,
            voice_id,
            book_id,
        }
    }

    pub fn execute(&self, effect: Effect) {
        match effect {
            Effect::Synthesize {
                request_id,
                page,
                box_idx,
                text,
                context_id,
                cancel,
            } => {
                let gateway = Arc::clone(&self.gateway);
                let events = self.events.clone();
                let voice_id = self.voice_id.clone();
                thread::spawn(move || {
                    let result = (|| -> anyhow::Result<(AudioClip, Option<Vec<AlignmentWord>>)> {
                        cancel.check_cancelled("synthesize")?;
                        let response = gateway.synthesize(&SynthesisRequest {
                            text,
                            voice_id,
                            context_id: Some(context_id),
                        })?;
                        cancel.check_cancelled("fetch-audio")?;
                        let bytes = gateway.fetch_audio(&response.audio_url)?;
                        cancel.check_cancelled("decode")?;
                        let clip = AudioClip::decode(bytes);
                        Ok((clip, response.alignment.map(|alignment| alignment.words)))
                    })();

                    if cancel.is_cancelled() {
                        debug!(request_id, "Dropping result of a cancelled synthesis request");
                        return;
                    }
                    let event = match result {
                        Ok((clip, alignment)) => ReaderEvent::SynthesisReady {
                            request_id,
                            page,
                            box_idx,
                            clip,
                            alignment,
                        },
                        Err(err) => ReaderEvent::SynthesisFailed {
                            request_id,
                            error: format!("{err:#}"),
                        },
                    };
                    let _ = events.send(event);
                });
            }
            Effect::SaveProgress { page } => self.store.save_progress(&self.book_id, page),
            Effect::IncrementReadCount => self.store.increment_read_count(&self.book_id),
            Effect::Alert(message) => {
                warn!(%message, "Narration problem surfaced to the reader");
                eprintln!("! {message}");
            }
        }
    }
}
