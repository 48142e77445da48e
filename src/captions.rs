//! WebVTT serialization of a computed (segments, timings) plan.
//!
//! The output feeds a native caption track, so cue text is collapsed to
//! single-spaced lines. Pure string building; no side effects.

use crate::segmenter::Segment;
use crate::timing::{Timing, collapse_whitespace};

/// Format a second offset as `HH:MM:SS.mmm`.
fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let whole = seconds as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let millis = ((seconds - whole as f64) * 1000.0) as u64;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

/// Render sequential numbered cues for each segment/timing pair.
///
/// Segments and timings are positionally aligned; extra entries on either
/// side are ignored rather than panicking, though the session never produces
/// mismatched lengths.
pub fn to_webvtt(segments: &[Segment], timings: &[Timing]) -> String {
    let mut vtt = String::from("WEBVTT\n\n");
    for (i, (segment, timing)) in segments.iter().zip(timings).enumerate() {
        vtt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timestamp(timing.start),
            format_timestamp(timing.end),
            collapse_whitespace(&segment.text)
        ));
    }
    vtt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::{LONG_SENTENCE_CHARS, segment};
    use crate::timing::{TimingWeights, compute_timings};

    #[test]
    fn timestamps_render_fixed_width() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(6.5), "00:00:06.500");
        assert_eq!(format_timestamp(61.25), "00:01:01.250");
        assert_eq!(format_timestamp(3661.5), "01:01:01.500");
        assert_eq!(format_timestamp(-2.0), "00:00:00.000");
    }

    #[test]
    fn cues_are_numbered_and_aligned() {
        let segments = segment("Hello world. This is a test.", LONG_SENTENCE_CHARS);
        let timings = compute_timings(10.0, &segments, &TimingWeights::default());
        let vtt = to_webvtt(&segments, &timings);

        assert!(vtt.starts_with("WEBVTT\n\n1\n00:00:00.000 --> "));
        assert!(vtt.contains("\n2\n"));
        assert!(vtt.contains("Hello world.\n"));
        assert!(vtt.contains("This is a test.\n"));
        assert!(vtt.ends_with("\n\n"));
        // Last cue ends exactly at the audio duration.
        assert!(vtt.contains("--> 00:00:10.000\n"));
    }

    #[test]
    fn cue_text_is_whitespace_collapsed() {
        let segments = vec![Segment {
            index: 0,
            text: "spread   out\twords".to_owned(),
            is_new_paragraph: true,
        }];
        let timings = compute_timings(4.0, &segments, &TimingWeights::default());
        let vtt = to_webvtt(&segments, &timings);
        assert!(vtt.contains("spread out words\n"));
    }

    #[test]
    fn empty_plan_is_header_only() {
        assert_eq!(to_webvtt(&[], &[]), "WEBVTT\n\n");
    }
}
