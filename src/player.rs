//! Terminal host for the reading engine.
//!
//! Owns the event loop: stdin commands and synthesis results arrive on one
//! channel, ticks are injected at the configured cadence, and every state
//! change repaints the page with the spoken word in inverse video.

use crate::book::Book;
use crate::cues::strip_cues;
use crate::reader::runtime::Runtime;
use crate::reader::{PlaybackPhase, Reader, ReaderEvent, ReaderSnapshot};
use anyhow::Result;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const HIGHLIGHT_ON: &str = "\x1b[7m";
const HIGHLIGHT_OFF: &str = "\x1b[0m";

/// Read stdin lines and translate them into reader events until quit.
pub fn spawn_command_thread(events: Sender<ReaderEvent>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = line.trim().to_ascii_lowercase();
            let event = match command.as_str() {
                "" => continue,
                "q" | "quit" => {
                    quit.store(true, Ordering::Release);
                    break;
                }
                "p" | "play" => ReaderEvent::PlayPage,
                "space" | "pause" => ReaderEvent::TogglePause,
                "s" | "stop" => ReaderEvent::Stop,
                "n" | "next" => ReaderEvent::NextPage,
                "b" | "back" => ReaderEvent::PreviousPage,
                "ok" => ReaderEvent::AcknowledgeFailure,
                other => match other.parse::<usize>() {
                    Ok(box_idx) => ReaderEvent::BoxTapped(box_idx),
                    Err(_) => {
                        println!(
                            "commands: p(lay)  pause  s(top)  n(ext)  b(ack)  <box #>  ok  q(uit)"
                        );
                        continue;
                    }
                },
            };
            if events.send(event).is_err() {
                break;
            }
        }
    });
}

/// Drive the reader until quit: deliver queued events, tick on cadence, and
/// hand every effect to the runtime.
pub fn run(
    mut reader: Reader,
    runtime: Runtime,
    events: Receiver<ReaderEvent>,
    tick_interval: Duration,
    quit: Arc<AtomicBool>,
) -> Result<()> {
    let book_for_render = reader.book().clone();
    render(&book_for_render, &reader.snapshot());
    reader.subscribe(move |snapshot| render(&book_for_render, snapshot));
    println!("Type p to play the page, q to quit.");

    let mut next_tick = Instant::now() + tick_interval;
    while !quit.load(Ordering::Acquire) {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        match events.recv_timeout(timeout) {
            Ok(event) => {
                for effect in reader.reduce(event) {
                    runtime.execute(effect);
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                next_tick = now + tick_interval;
                for effect in reader.reduce(ReaderEvent::Tick(now)) {
                    runtime.execute(effect);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    info!("Reader loop finished");
    Ok(())
}

fn render(book: &Book, snapshot: &ReaderSnapshot) {
    let Some(page) = book.page(snapshot.page) else {
        return;
    };
    println!();
    println!(
        "── {} · page {}/{} {}",
        book.title,
        snapshot.page + 1,
        snapshot.page_count,
        status_label(snapshot)
    );
    for (box_idx, text_box) in page.text_boxes.iter().enumerate() {
        if Some(box_idx) == snapshot.active_box {
            println!("  {box_idx}: {}", highlighted_line(snapshot));
        } else {
            println!("  {box_idx}: {}", strip_cues(&text_box.text));
        }
    }
    if let Some(alert) = &snapshot.alert {
        println!("  ! {alert} (type ok to dismiss)");
    }
    if snapshot.completed {
        println!("  ★ {} finished!", book.title);
    }
    debug!(
        page = snapshot.page + 1,
        active_box = ?snapshot.active_box,
        highlight = ?snapshot.highlight,
        "Rendered frame"
    );
}

fn highlighted_line(snapshot: &ReaderSnapshot) -> String {
    let mut line = String::new();
    for (word_idx, word) in snapshot.words.iter().enumerate() {
        if word_idx > 0 {
            line.push(' ');
        }
        if Some(word_idx) == snapshot.highlight {
            line.push_str(HIGHLIGHT_ON);
            line.push_str(word);
            line.push_str(HIGHLIGHT_OFF);
        } else {
            line.push_str(word);
        }
    }
    line
}

fn status_label(snapshot: &ReaderSnapshot) -> &'static str {
    match snapshot.phase {
        PlaybackPhase::Idle => "",
        PlaybackPhase::Loading => "(loading…)",
        PlaybackPhase::Playing => {
            if snapshot.auto_play {
                "(auto-playing)"
            } else {
                "(playing)"
            }
        }
        PlaybackPhase::Paused => "(paused)",
        PlaybackPhase::Ended => "(finishing)",
        PlaybackPhase::Failed => "(narration unavailable)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlighted_line_marks_exactly_one_word() {
        let snapshot = ReaderSnapshot {
            page: 0,
            page_count: 1,
            active_box: Some(0),
            words: vec!["Once".to_string(), "upon".to_string()],
            highlight: Some(1),
            phase: PlaybackPhase::Playing,
            auto_play: false,
            completed: false,
            alert: None,
        };
        let line = highlighted_line(&snapshot);
        assert_eq!(line.matches(HIGHLIGHT_ON).count(), 1);
        assert!(line.contains("upon"));
        assert!(line.starts_with("Once"));
    }
}
