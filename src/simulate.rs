//! Offline playback simulation.
//!
//! Stands in for a real player: advances a simulated clock across the full
//! audio duration at the configured tick interval and feeds every tick into
//! the session, exactly the way the polling loop and time-update events
//! would during live playback. Useful for eyeballing the estimated pacing of
//! an article from the terminal.

use crate::session::{Effect, SyncSession};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Tallies of what a simulated playback produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationReport {
    pub ticks: usize,
    pub transitions: usize,
    pub scrolls: usize,
    pub subtitle_updates: usize,
}

/// Drive `session` from 0 to `duration` seconds in `tick_interval_ms` steps.
///
/// The session must already be timed (metadata applied); untimed sessions
/// simply report zero transitions. The final tick lands exactly on
/// `duration` so the tail clamping path is exercised too.
pub fn run(session: &mut SyncSession, duration: f64, tick_interval_ms: u64) -> SimulationReport {
    let mut report = SimulationReport::default();
    let step = Duration::from_millis(tick_interval_ms.max(1));
    let base = Instant::now();

    let mut elapsed = Duration::ZERO;
    loop {
        let time = elapsed.as_secs_f64().min(duration);
        let effects = session.on_tick(time, base + elapsed);
        report.ticks += 1;
        tally(session, time, &effects, &mut report);

        if elapsed.as_secs_f64() >= duration {
            break;
        }
        elapsed += step;
    }
    session.on_ended();

    info!(
        ticks = report.ticks,
        transitions = report.transitions,
        scrolls = report.scrolls,
        "Simulation finished"
    );
    report
}

fn tally(session: &SyncSession, time: f64, effects: &[Effect], report: &mut SimulationReport) {
    for effect in effects {
        match effect {
            Effect::SegmentClassChanged { index, class } => {
                debug!(time, index, ?class, "Segment class changed");
            }
            Effect::ScrollToSegment { index } => {
                report.scrolls += 1;
                debug!(time, index, "Auto-scroll to segment");
            }
            Effect::ShowSubtitle { current, .. } => {
                report.subtitle_updates += 1;
                debug!(time, subtitle = %current, "Subtitle updated");
            }
            _ => {}
        }
    }

    let became_active = effects.iter().any(|e| {
        matches!(
            e,
            Effect::SegmentClassChanged {
                class: crate::session::SegmentClass::Active,
                ..
            }
        )
    });
    if became_active {
        report.transitions += 1;
        if let Some(index) = session.current_index() {
            let text = &session.segments()[index].text;
            info!(time = format!("{time:.2}"), index, segment = %text, "Now reading");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;

    #[test]
    fn every_segment_becomes_active_once() {
        let mut session = SyncSession::new(
            "First sentence here. Second one follows. Third wraps up.",
            SyncConfig::default(),
        );
        session.on_metadata(6.0);
        let report = run(&mut session, 6.0, 50);
        assert_eq!(report.transitions, 3);
        assert!(report.scrolls >= 1);
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn untimed_session_reports_no_transitions() {
        let mut session = SyncSession::new("Some text. More text.", SyncConfig::default());
        let report = run(&mut session, 5.0, 50);
        assert_eq!(report.transitions, 0);
        assert_eq!(report.scrolls, 0);
        assert!(report.ticks > 1);
    }

    #[test]
    fn zero_duration_runs_a_single_tick() {
        let mut session = SyncSession::new("One. Two.", SyncConfig::default());
        session.on_metadata(0.0);
        let report = run(&mut session, 0.0, 50);
        assert_eq!(report.ticks, 1);
        // Zero-width intervals clamp straight to the last segment.
        assert_eq!(session.current_index(), Some(1));
    }
}
