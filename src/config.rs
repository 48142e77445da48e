//! Configuration loading for the sync engine.
//!
//! All tunables are centralized here and loaded from `conf/config.toml` if
//! present. Any missing or invalid entries fall back to sensible defaults so
//! the engine can always run.

use crate::segmenter::LONG_SENTENCE_CHARS;
use crate::timing::TimingWeights;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Engine configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default = "default_long_sentence_chars")]
    pub long_sentence_chars: usize,
    #[serde(default = "default_min_full_mode_chars")]
    pub min_full_mode_chars: usize,
    #[serde(default = "default_scroll_debounce_ms")]
    pub scroll_debounce_ms: u64,
    #[serde(default = "default_seek_offset_secs")]
    pub seek_offset_secs: f64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub weights: TimingWeights,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            long_sentence_chars: default_long_sentence_chars(),
            min_full_mode_chars: default_min_full_mode_chars(),
            scroll_debounce_ms: default_scroll_debounce_ms(),
            seek_offset_secs: default_seek_offset_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            weights: TimingWeights::default(),
            log_level: default_log_level(),
        }
    }
}

/// Load config from `path`, falling back to defaults on any failure.
pub fn load_config(path: &Path) -> SyncConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return SyncConfig::default();
        }
    };

    let mut config = match toml::from_str::<SyncConfig>(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            SyncConfig::default()
        }
    };
    clamp_config(&mut config);
    config
}

/// Pull out-of-range values back into usable bounds.
pub fn clamp_config(config: &mut SyncConfig) {
    config.long_sentence_chars = config.long_sentence_chars.clamp(20, 2000);
    config.min_full_mode_chars = config.min_full_mode_chars.min(10_000);
    config.scroll_debounce_ms = config.scroll_debounce_ms.min(10_000);
    config.seek_offset_secs = if config.seek_offset_secs.is_finite() {
        config.seek_offset_secs.clamp(0.0, 1.0)
    } else {
        default_seek_offset_secs()
    };
    config.tick_interval_ms = config.tick_interval_ms.clamp(10, 1000);

    let defaults = TimingWeights::default();
    let sanitize = |value: f64, fallback: f64| {
        if value.is_finite() && value >= 0.0 {
            value
        } else {
            fallback
        }
    };
    config.weights.sentence_end_pause = sanitize(
        config.weights.sentence_end_pause,
        defaults.sentence_end_pause,
    );
    config.weights.clause_end_pause =
        sanitize(config.weights.clause_end_pause, defaults.clause_end_pause);
    config.weights.paragraph_start_pause = sanitize(
        config.weights.paragraph_start_pause,
        defaults.paragraph_start_pause,
    );
    config.weights.complex_word_bonus = sanitize(
        config.weights.complex_word_bonus,
        defaults.complex_word_bonus,
    );
}

fn default_long_sentence_chars() -> usize {
    LONG_SENTENCE_CHARS
}

fn default_min_full_mode_chars() -> usize {
    40
}

fn default_scroll_debounce_ms() -> u64 {
    300
}

fn default_seek_offset_secs() -> f64 {
    0.01
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
