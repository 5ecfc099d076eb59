//! Shared fixtures for reader tests: a scripted media session and small
//! books that exercise the sequencer without touching an audio device.

use crate::alignment::AlignmentWord;
use crate::audio::{AudioClip, MediaSession};
use crate::book::{Book, Page, TextBox};
use crate::config::NarratorConfig;
use crate::reader::state::Reader;
use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeMediaLog {
    pub(crate) ops: Vec<String>,
    pub(crate) playing: bool,
    pub(crate) finished: bool,
}

pub(crate) struct FakeMediaSession {
    log: Arc<Mutex<FakeMediaLog>>,
}

impl FakeMediaSession {
    pub(crate) fn new() -> (Box<dyn MediaSession>, Arc<Mutex<FakeMediaLog>>) {
        let log = Arc::new(Mutex::new(FakeMediaLog::default()));
        (
            Box::new(FakeMediaSession {
                log: Arc::clone(&log),
            }),
            log,
        )
    }
}

impl MediaSession for FakeMediaSession {
    fn begin(&mut self, _clip: &AudioClip) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.ops.push("begin".to_string());
        log.playing = true;
        log.finished = false;
        Ok(())
    }

    fn pause(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.ops.push("pause".to_string());
        log.playing = false;
    }

    fn resume(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.ops.push("resume".to_string());
        log.playing = true;
    }

    fn stop(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.ops.push("stop".to_string());
        log.playing = false;
        log.finished = true;
    }

    fn finished(&self) -> bool {
        self.log.lock().unwrap().finished
    }
}

fn text_box(id: &str, text: &str, order: usize) -> TextBox {
    TextBox {
        id: id.to_string(),
        text: text.to_string(),
        x: 0.0,
        y: 0.0,
        order,
    }
}

/// Two pages: the first with two text boxes, the terminal with one.
pub(crate) fn two_page_book() -> Book {
    Book {
        id: "bk-test".to_string(),
        title: "Test Book".to_string(),
        pages: vec![
            Page {
                number: 1,
                text_boxes: vec![
                    text_box("b0", "[excited] Once upon a time", 0),
                    text_box("b1", "there was a bear", 1),
                ],
                background_url: None,
            },
            Page {
                number: 2,
                text_boxes: vec![text_box("b2", "The End", 0)],
                background_url: None,
            },
        ],
    }
}

pub(crate) fn test_config() -> NarratorConfig {
    NarratorConfig::default()
}

pub(crate) fn test_reader(book: Book) -> (Reader, Arc<Mutex<FakeMediaLog>>) {
    let (media, log) = FakeMediaSession::new();
    (Reader::new(book, test_config(), media, None), log)
}

pub(crate) fn clip(duration_secs: f64) -> AudioClip {
    AudioClip {
        bytes: Vec::new().into(),
        duration: Some(Duration::from_secs_f64(duration_secs)),
    }
}

/// Back-to-back word intervals, 0.4 s each.
pub(crate) fn word_alignment(words: &[&str]) -> Vec<AlignmentWord> {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| AlignmentWord {
            word: word.to_string(),
            start: i as f64 * 0.4,
            end: (i + 1) as f64 * 0.4,
        })
        .collect()
}
