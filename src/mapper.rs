//! Playback-time to segment lookup.
//!
//! Called on every poll tick and every player time update, so the common
//! case (still inside the current segment) must stay O(1); cold lookups
//! binary-search the sorted, non-overlapping intervals.

use crate::timing::Timing;

/// Find the segment whose interval contains `time`.
///
/// `hint` is the previously active index; when `time` still falls inside its
/// interval it is returned without searching. Otherwise a fresh binary
/// search runs, so backwards seeks are as valid as forward progress. A
/// `time` at or past the final interval's end clamps to the last segment
/// rather than reporting no match; a negative `time` or an empty timing
/// list yields `None`.
pub fn locate(timings: &[Timing], hint: Option<usize>, time: f64) -> Option<usize> {
    let last = timings.last()?;
    if !time.is_finite() || time < 0.0 {
        return None;
    }

    if let Some(idx) = hint {
        if let Some(current) = timings.get(idx) {
            if time >= current.start && time < current.end {
                return Some(idx);
            }
        }
    }

    if time >= last.end {
        return Some(timings.len() - 1);
    }

    let mut lo = 0usize;
    let mut hi = timings.len() - 1;
    while lo <= hi {
        let mid = (lo + hi) / 2;
        let interval = &timings[mid];
        if time < interval.start {
            if mid == 0 {
                break;
            }
            hi = mid - 1;
        } else if time >= interval.end {
            lo = mid + 1;
        } else {
            return Some(mid);
        }
    }

    // Inside [0, last.end) but in no interval: only possible through float
    // slack or zero-width intervals at a zero duration.
    None
}
