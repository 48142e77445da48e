//! Per-article synchronization session.
//!
//! One `SyncSession` owns everything a single article/audio pair needs: the
//! segment list, the estimated timings, the active-segment index, and the
//! display mode. Loading a new article means building a new session; nothing
//! carries over.
//!
//! The session is driven from one logical thread through a single entry
//! point, `on_tick`, called both by the periodic polling driver and by
//! discrete player time updates. It never performs IO or touches a clock on
//! its own; callers pass the current `Instant` in, which keeps the scroll
//! debounce testable. State changes come back as a list of [`Effect`]s for
//! the renderer to apply, and a tick that changes nothing returns nothing,
//! so redundant calls within the same instant are harmless.

use crate::captions::to_webvtt;
use crate::config::SyncConfig;
use crate::mapper::locate;
use crate::segmenter::{Segment, segment};
use crate::timing::{Timing, compute_timings};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How the article is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// All segments rendered inline, auto-scroll keeps the active one centered.
    Full,
    /// Only the active segment and the one after it are shown.
    Subtitle,
}

/// Visual state of one rendered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentClass {
    Past,
    Active,
    Future,
}

fn class_of(index: usize, current: Option<usize>) -> SegmentClass {
    match current {
        None => SegmentClass::Future,
        Some(active) if index == active => SegmentClass::Active,
        Some(active) if index < active => SegmentClass::Past,
        Some(_) => SegmentClass::Future,
    }
}

/// Rendering directives produced by the session. The renderer applies them
/// in order; the session itself never touches a display surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SegmentClassChanged { index: usize, class: SegmentClass },
    ScrollToSegment { index: usize },
    ShowSubtitle { current: String, next: Option<String> },
    ModeChanged { mode: DisplayMode },
    /// Timings were (re)built; a caption track can be regenerated.
    CaptionsReady,
    /// Set playback position, then resume.
    Seek { time: f64 },
    Play,
}

pub struct SyncSession {
    config: SyncConfig,
    segments: Vec<Segment>,
    timings: Vec<Timing>,
    current: Option<usize>,
    mode: DisplayMode,
    toggle_locked: bool,
    last_scroll: Option<Instant>,
}

impl SyncSession {
    /// Build a session for one article. Timings stay empty until the audio
    /// duration arrives via [`SyncSession::on_metadata`]; until then the
    /// session is untimed and ticks resolve no active segment.
    pub fn new(text: &str, config: SyncConfig) -> Self {
        let segments = segment(text, config.long_sentence_chars);
        let content_chars = text.trim().chars().count();

        // Very short articles render poorly as a scrolling reader; lock them
        // into subtitle mode. Articles with no usable text are read-only.
        let (mode, toggle_locked) = if segments.is_empty() {
            (DisplayMode::Full, true)
        } else if content_chars < config.min_full_mode_chars {
            (DisplayMode::Subtitle, true)
        } else {
            (DisplayMode::Full, false)
        };

        info!(
            segments = segments.len(),
            content_chars,
            ?mode,
            toggle_locked,
            "Created sync session"
        );

        Self {
            config,
            segments,
            timings: Vec::new(),
            current: None,
            mode,
            toggle_locked,
            last_scroll: None,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn timings(&self) -> &[Timing] {
        &self.timings
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn can_toggle(&self) -> bool {
        !self.toggle_locked
    }

    pub fn has_content(&self) -> bool {
        !self.segments.is_empty()
    }

    /// True once timings exist for every segment.
    pub fn is_timed(&self) -> bool {
        !self.segments.is_empty() && self.timings.len() == self.segments.len()
    }

    pub fn segment_class(&self, index: usize) -> SegmentClass {
        class_of(index, self.current)
    }

    /// Serialize the current plan as a WebVTT caption track.
    pub fn webvtt(&self) -> String {
        to_webvtt(&self.segments, &self.timings)
    }

    /// Audio metadata became available. Rebuilds timings; segments and
    /// timings always change together, so their lengths stay aligned.
    /// Non-finite or negative durations are ignored and the session stays
    /// untimed until a usable value arrives.
    pub fn on_metadata(&mut self, duration: f64) -> Vec<Effect> {
        if !duration.is_finite() || duration < 0.0 {
            warn!(duration, "Ignoring unusable audio duration");
            return Vec::new();
        }
        if self.segments.is_empty() {
            debug!("No segments; nothing to time");
            return Vec::new();
        }

        self.timings = compute_timings(duration, &self.segments, &self.config.weights);
        info!(
            duration,
            timings = self.timings.len(),
            "Computed segment timings"
        );
        vec![Effect::CaptionsReady]
    }

    /// Advance the session to playback position `time`.
    ///
    /// Both the polling driver and player time-update events land here; the
    /// session does not care which. `now` is the caller's clock reading,
    /// used only for the auto-scroll debounce. Seeking backwards is fine:
    /// the locate fast path fails and a fresh search runs.
    pub fn on_tick(&mut self, time: f64, now: Instant) -> Vec<Effect> {
        if self.timings.is_empty() {
            return Vec::new();
        }

        let next = locate(&self.timings, self.current, time);
        if next == self.current {
            return Vec::new();
        }

        let previous = self.current;
        self.current = next;
        debug!(time, ?previous, current = ?next, "Active segment changed");

        let mut effects = self.class_diff(previous, next);
        match (self.mode, next) {
            (DisplayMode::Full, Some(index)) => {
                let debounce = Duration::from_millis(self.config.scroll_debounce_ms);
                let elapsed_enough = self
                    .last_scroll
                    .is_none_or(|last| now.duration_since(last) >= debounce);
                if elapsed_enough {
                    self.last_scroll = Some(now);
                    effects.push(Effect::ScrollToSegment { index });
                }
            }
            (DisplayMode::Subtitle, Some(index)) => {
                effects.push(self.subtitle_effect(index));
            }
            (_, None) => {}
        }

        effects
    }

    /// Switch between full-text and subtitle display, unless the session is
    /// locked into one mode.
    pub fn toggle_mode(&mut self) -> Vec<Effect> {
        if self.toggle_locked {
            debug!("Mode toggle is disabled for this session");
            return Vec::new();
        }

        self.mode = match self.mode {
            DisplayMode::Full => DisplayMode::Subtitle,
            DisplayMode::Subtitle => DisplayMode::Full,
        };
        info!(mode = ?self.mode, "Display mode toggled");

        let mut effects = vec![Effect::ModeChanged { mode: self.mode }];
        if self.mode == DisplayMode::Subtitle && !self.segments.is_empty() {
            // Show the active segment, or the first one before playback starts.
            effects.push(self.subtitle_effect(self.current.unwrap_or(0)));
        }
        effects
    }

    /// A rendered segment was clicked: jump playback just past its start so
    /// the boundary cannot re-trigger the previous segment, then resume.
    pub fn click_segment(&mut self, index: usize) -> Vec<Effect> {
        let Some(timing) = self.timings.get(index) else {
            debug!(index, "Click on segment without timing; ignoring");
            return Vec::new();
        };
        let time = timing.start + self.config.seek_offset_secs;
        info!(index, time, "Seeking to clicked segment");
        vec![Effect::Seek { time }, Effect::Play]
    }

    /// Playback finished. The driver stops polling; session state only needs
    /// its scroll debounce cleared so a replay scrolls immediately.
    pub fn on_ended(&mut self) {
        self.last_scroll = None;
        debug!("Playback ended");
    }

    /// Effects for exactly the segments whose visual class changed between
    /// the old and new active index. Indices outside the span between the
    /// two keep their class, so a one-step advance touches two segments and
    /// a long seek touches only the span it crossed.
    fn class_diff(&self, previous: Option<usize>, next: Option<usize>) -> Vec<Effect> {
        let lo = previous.unwrap_or(0).min(next.unwrap_or(0));
        let hi = previous
            .unwrap_or(0)
            .max(next.unwrap_or(0))
            .min(self.segments.len().saturating_sub(1));

        (lo..=hi)
            .filter(|&index| class_of(index, previous) != class_of(index, next))
            .map(|index| Effect::SegmentClassChanged {
                index,
                class: class_of(index, next),
            })
            .collect()
    }

    fn subtitle_effect(&self, index: usize) -> Effect {
        Effect::ShowSubtitle {
            current: self
                .segments
                .get(index)
                .map(|s| s.text.clone())
                .unwrap_or_default(),
            next: self.segments.get(index + 1).map(|s| s.text.clone()),
        }
    }
}
