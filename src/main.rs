//! Entry point for the storybook narrator.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Fetch the book and look up saved reading progress.
//! - Wire up the gateway, audio output, and persistence, then run the player.

mod alignment;
mod audio;
mod book;
mod cancellation;
mod config;
mod content;
mod cues;
mod gateway;
mod highlight;
mod player;
mod progress;
mod reader;

use crate::audio::RodioMediaSession;
use crate::config::load_config;
use crate::content::load_book;
use crate::gateway::HttpSynthesisGateway;
use crate::progress::ProgressStore;
use crate::reader::runtime::Runtime;
use crate::reader::{Reader, ReaderEvent};
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        source = %args.source,
        gateway = %config.gateway_url,
        voice = %config.voice_id,
        "Starting storybook narrator"
    );

    let book = load_book(&args.source)?;
    let store = ProgressStore::new(config.cache_dir.clone());
    let resume_page = if args.from_start {
        None
    } else {
        store.load_progress(&book.id)
    };
    if let Some(page) = resume_page {
        info!(page = page + 1, "Found saved reading progress");
    }

    let gateway = Arc::new(HttpSynthesisGateway::new(
        config.gateway_url.clone(),
        Duration::from_secs(config.synthesis_timeout_secs),
    )?);
    let media = RodioMediaSession::new(config.volume)?;
    let (events_tx, events_rx) = mpsc::channel::<ReaderEvent>();

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = Arc::clone(&quit);
        ctrlc::set_handler(move || {
            quit.store(true, Ordering::Release);
        })
        .context("Installing Ctrl-C handler")?;
    }
    player::spawn_command_thread(events_tx.clone(), Arc::clone(&quit));

    let tick_interval = Duration::from_millis(config.tick_interval_ms);
    let voice_id = config.voice_id.clone();
    let book_id = book.id.clone();
    let reader = Reader::new(book, config, Box::new(media), resume_page);
    let runtime = Runtime::new(gateway, store, events_tx, voice_id, book_id);
    player::run(reader, runtime, events_rx, tick_interval, quit)
}

struct Args {
    source: String,
    from_start: bool,
}

fn parse_args() -> Result<Args> {
    let mut source = None;
    let mut from_start = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--from-start" => from_start = true,
            other if source.is_none() => source = Some(other.to_string()),
            other => return Err(anyhow!("Unexpected argument: {other}")),
        }
    }
    let source = source
        .ok_or_else(|| anyhow!("Usage: story-narrator <book.json | book-url> [--from-start]"))?;
    Ok(Args { source, from_start })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
