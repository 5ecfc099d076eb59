//! Audio output ownership.
//!
//! Exactly one narration clip may hold the device output at a time. Instead
//! of hunting down stray players, everything that makes sound goes through a
//! single `MediaSession`; starting a new clip structurally tears down the
//! previous one. The rodio implementation backs the real player, tests use a
//! scripted fake.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Decoded-duration-annotated audio bytes for one text box.
#[derive(Clone)]
pub struct AudioClip {
    pub bytes: Arc<[u8]>,
    pub duration: Option<Duration>,
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("bytes", &self.bytes.len())
            .field("duration", &self.duration)
            .finish()
    }
}

impl AudioClip {
    /// Wrap fetched audio bytes, probing the container for its playable
    /// length. Duration stays `None` when the container does not report one.
    pub fn decode(bytes: Vec<u8>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        let duration = Decoder::new(Cursor::new(Arc::clone(&bytes)))
            .ok()
            .and_then(|decoder| decoder.total_duration());
        Self { bytes, duration }
    }
}

/// The one owner of device audio output.
pub trait MediaSession {
    /// Stop whatever is playing and start this clip from the beginning.
    fn begin(&mut self, clip: &AudioClip) -> Result<()>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Idempotent; rewinds and releases the underlying resource so it cannot
    /// silently resume.
    fn stop(&mut self);
    /// True when no queued audio remains (or nothing was ever started).
    fn finished(&self) -> bool;
}

pub struct RodioMediaSession {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioMediaSession {
    pub fn new(volume: f32) -> Result<Self> {
        let (_stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        Ok(Self {
            _stream,
            handle,
            sink: None,
            volume,
        })
    }
}

impl MediaSession for RodioMediaSession {
    fn begin(&mut self, clip: &AudioClip) -> Result<()> {
        self.stop();
        let sink = Sink::try_new(&self.handle).context("Creating audio sink")?;
        let source =
            Decoder::new(Cursor::new(Arc::clone(&clip.bytes))).context("Decoding audio clip")?;
        sink.set_volume(self.volume);
        sink.append(source);
        sink.play();
        debug!(bytes = clip.bytes.len(), "Started narration clip");
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn finished(&self) -> bool {
        self.sink.as_ref().map(|sink| sink.empty()).unwrap_or(true)
    }
}
