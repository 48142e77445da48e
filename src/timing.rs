//! Heuristic allocation of audio time across text segments.
//!
//! No per-word timestamps exist for the narration, so each segment gets a
//! share of the total duration proportional to a content weight: longer text
//! takes longer to read, sentence/clause-final punctuation adds a pause,
//! paragraph openings add a longer one, and long words slow the reader down.
//! The result is a deterministic estimate, not an alignment.

use crate::segmenter::{Segment, ends_clause, ends_sentence};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_COMPLEX_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w{7,}\b").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// The `[start, end)` interval assigned to one segment, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timing {
    pub start: f64,
    pub end: f64,
    pub weight: f64,
}

/// Tunable weight bonuses. Defaults are the canonical values; the config
/// file may override them.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingWeights {
    pub sentence_end_pause: f64,
    pub clause_end_pause: f64,
    pub paragraph_start_pause: f64,
    pub complex_word_bonus: f64,
}

impl Default for TimingWeights {
    fn default() -> Self {
        Self {
            sentence_end_pause: 10.0,
            clause_end_pause: 5.0,
            paragraph_start_pause: 15.0,
            complex_word_bonus: 3.0,
        }
    }
}

/// Collapse internal whitespace runs to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").into_owned()
}

/// Content weight of one segment. Never below 1.
pub fn segment_weight(segment: &Segment, weights: &TimingWeights) -> f64 {
    let mut weight = collapse_whitespace(&segment.text).chars().count() as f64;

    // A segment ends in at most one mark, so the pauses are exclusive.
    if ends_sentence(&segment.text) {
        weight += weights.sentence_end_pause;
    } else if ends_clause(&segment.text) {
        weight += weights.clause_end_pause;
    }

    if segment.is_new_paragraph {
        weight += weights.paragraph_start_pause;
    }

    weight += RE_COMPLEX_WORD.find_iter(&segment.text).count() as f64 * weights.complex_word_bonus;

    weight.max(1.0)
}

/// Distribute `duration` seconds over `segments` proportionally to their
/// weights.
///
/// Intervals are built from running cumulative sums, so they are contiguous
/// and cover `[0, duration]` exactly: `timings[0].start == 0`,
/// `timings[i].end == timings[i + 1].start`, `timings[last].end == duration`.
/// A zero duration collapses every interval to `[0, 0)`, which downstream
/// lookup must tolerate.
pub fn compute_timings(duration: f64, segments: &[Segment], weights: &TimingWeights) -> Vec<Timing> {
    if segments.is_empty() {
        return Vec::new();
    }
    let duration = duration.max(0.0);

    let segment_weights: Vec<f64> = segments
        .iter()
        .map(|segment| segment_weight(segment, weights))
        .collect();
    // The per-segment floor keeps this positive for nonempty input; the guard
    // only protects against division by zero if that ever changes.
    let total_weight: f64 = segment_weights.iter().sum::<f64>().max(1.0);

    let mut timings = Vec::with_capacity(segments.len());
    let mut accumulated = 0.0;
    for (i, weight) in segment_weights.iter().enumerate() {
        let start = accumulated / total_weight * duration;
        accumulated += weight;
        let end = if i + 1 == segments.len() {
            // Land exactly on the total, immune to float accumulation slack.
            duration
        } else {
            accumulated / total_weight * duration
        };
        timings.push(Timing {
            start,
            end,
            weight: *weight,
        });
    }

    timings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::{LONG_SENTENCE_CHARS, segment};

    const EPSILON: f64 = 1e-9;

    fn plain_segment(index: usize, text: &str) -> Segment {
        Segment {
            index,
            text: text.to_owned(),
            is_new_paragraph: false,
        }
    }

    #[test]
    fn weights_split_duration_proportionally() {
        // Bare 12-char and 8-char segments carry weights 12 and 8 (ratio
        // 3:2), so 10 seconds splits into [0,6) and [6,10).
        let segments = vec![
            plain_segment(0, "abcd efg hij"),
            plain_segment(1, "abc defg"),
        ];
        let weights = TimingWeights::default();
        assert_eq!(segment_weight(&segments[0], &weights), 12.0);
        assert_eq!(segment_weight(&segments[1], &weights), 8.0);

        let timings = compute_timings(10.0, &segments, &weights);
        assert_eq!(
            timings,
            vec![
                Timing {
                    start: 0.0,
                    end: 6.0,
                    weight: 12.0,
                },
                Timing {
                    start: 6.0,
                    end: 10.0,
                    weight: 8.0,
                },
            ]
        );
    }

    #[test]
    fn intervals_are_contiguous_and_cover_duration() {
        let segments = segment(
            "First sentence here. Second, slightly longer sentence!\nNew paragraph begins. And ends.",
            LONG_SENTENCE_CHARS,
        );
        let timings = compute_timings(42.5, &segments, &TimingWeights::default());
        assert_eq!(timings.len(), segments.len());
        assert!(timings[0].start.abs() < EPSILON);
        for pair in timings.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < EPSILON);
        }
        assert!((timings.last().unwrap().end - 42.5).abs() < EPSILON);
        for timing in &timings {
            assert!(timing.start < timing.end);
            assert!(timing.weight >= 1.0);
        }
    }

    #[test]
    fn sentence_pause_outweighs_clause_pause() {
        let weights = TimingWeights::default();
        let sentence = plain_segment(0, "same length text.");
        let clause = plain_segment(0, "same length text,");
        let bare = plain_segment(0, "same length textx");
        let w_sentence = segment_weight(&sentence, &weights);
        let w_clause = segment_weight(&clause, &weights);
        let w_bare = segment_weight(&bare, &weights);
        assert!((w_sentence - w_bare - 10.0).abs() < EPSILON);
        assert!((w_clause - w_bare - 5.0).abs() < EPSILON);
    }

    #[test]
    fn paragraph_start_adds_pause_weight() {
        let weights = TimingWeights::default();
        let mut opener = plain_segment(0, "Plain words here.");
        let base = segment_weight(&opener, &weights);
        opener.is_new_paragraph = true;
        assert!((segment_weight(&opener, &weights) - base - 15.0).abs() < EPSILON);
    }

    #[test]
    fn complex_words_add_bonus_per_match() {
        let weights = TimingWeights::default();
        // "remarkable" and "pronunciation" are 7+ word chars; "short" is not.
        let seg = plain_segment(0, "remarkable pronunciation short");
        let collapsed_len = seg.text.chars().count() as f64;
        assert!((segment_weight(&seg, &weights) - collapsed_len - 6.0).abs() < EPSILON);
    }

    #[test]
    fn whitespace_collapses_before_counting() {
        let weights = TimingWeights::default();
        let spaced = plain_segment(0, "a  b\t\tc");
        let tight = plain_segment(0, "a b c");
        assert!(
            (segment_weight(&spaced, &weights) - segment_weight(&tight, &weights)).abs() < EPSILON
        );
    }

    #[test]
    fn weight_never_drops_below_one() {
        let weights = TimingWeights::default();
        assert!(segment_weight(&plain_segment(0, ""), &weights) >= 1.0);
    }

    #[test]
    fn empty_segments_produce_empty_timings() {
        assert!(compute_timings(30.0, &[], &TimingWeights::default()).is_empty());
    }

    #[test]
    fn zero_duration_collapses_all_intervals() {
        let segments = segment("One. Two. Three.", LONG_SENTENCE_CHARS);
        let timings = compute_timings(0.0, &segments, &TimingWeights::default());
        assert_eq!(timings.len(), 3);
        for timing in timings {
            assert_eq!(timing.start, 0.0);
            assert_eq!(timing.end, 0.0);
        }
    }
}
