//! Entry point for the read-along sync engine.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load the article text via `article`.
//! - Load configuration from `conf/config.toml`.
//! - Build a sync session, then emit captions, a JSON plan, or run a
//!   playback simulation.

mod article;
mod captions;
mod config;
mod mapper;
mod segmenter;
mod session;
mod simulate;
mod timing;

use crate::article::load_article;
use crate::config::load_config;
use crate::segmenter::Segment;
use crate::session::SyncSession;
use crate::timing::Timing;
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

struct Args {
    article_path: PathBuf,
    duration: f64,
    audio_url: Option<String>,
    vtt_out: Option<PathBuf>,
    json: bool,
    simulate: bool,
}

#[derive(Serialize)]
struct SyncPlan<'a> {
    segments: &'a [Segment],
    timings: &'a [Timing],
}

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
        path = %args.article_path.display(),
        duration = args.duration,
        level = %config.log_level,
        "Starting read-along sync"
    );

    let article = load_article(&args.article_path, args.audio_url.clone())?;
    if let Some(url) = &article.audio_url {
        info!(%url, "Synchronizing against audio source");
    }
    let tick_interval_ms = config.tick_interval_ms;
    let mut session = SyncSession::new(&article.text, config);
    session.on_metadata(args.duration);

    if !session.has_content() {
        warn!("Article contains no usable text; nothing to synchronize");
        println!("(no content)");
        return Ok(());
    }

    if args.json {
        let plan = SyncPlan {
            segments: session.segments(),
            timings: session.timings(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("Failed to serialize sync plan")?
        );
    }

    if let Some(path) = &args.vtt_out {
        fs::write(path, session.webvtt())
            .with_context(|| format!("Failed to write captions to {}", path.display()))?;
        info!(path = %path.display(), cues = session.segments().len(), "Wrote caption track");
    }

    if args.simulate {
        simulate::run(&mut session, args.duration, tick_interval_ms);
    } else if !args.json && args.vtt_out.is_none() {
        // No output selected: print the caption track to stdout.
        print!("{}", session.webvtt());
    }

    Ok(())
}

fn parse_args() -> Result<Args> {
    const USAGE: &str =
        "Usage: readalong <article.txt> <duration-secs> [--audio-url URL] [--vtt PATH] [--json] [--simulate]";

    let mut positional = Vec::new();
    let mut audio_url = None;
    let mut vtt_out = None;
    let mut json = false;
    let mut simulate = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--audio-url" => {
                audio_url = Some(args.next().ok_or_else(|| anyhow!("--audio-url needs a value"))?);
            }
            "--vtt" => {
                vtt_out = Some(PathBuf::from(
                    args.next().ok_or_else(|| anyhow!("--vtt needs a path"))?,
                ));
            }
            "--json" => json = true,
            "--simulate" => simulate = true,
            other if other.starts_with("--") => {
                return Err(anyhow!("Unknown flag {other}\n{USAGE}"));
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        return Err(anyhow!(USAGE));
    }
    let article_path = PathBuf::from(&positional[0]);
    let duration: f64 = positional[1]
        .parse()
        .with_context(|| format!("Invalid duration: {}", positional[1]))?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(anyhow!("Duration must be a non-negative number of seconds"));
    }

    Ok(Args {
        article_path,
        duration,
        audio_url,
        vtt_out,
        json,
        simulate,
    })
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
