use crate::filename::char_len;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Char range to drop from a stem. Negative indices count from the end,
/// with `-1` resolving to the end of the stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveRange {
    pub start: i64,
    pub end: i64,
}

impl RemoveRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeError {
    #[error("({start} to {end}) is not a valid range for removal: negative start with non-negative end")]
    MixedSign { start: i64, end: i64 },
    #[error("({start} to {end}) is not a valid range for removal: end resolves before start")]
    Inverted { start: i64, end: i64 },
}

impl RangeError {
    pub fn range(&self) -> RemoveRange {
        match *self {
            RangeError::MixedSign { start, end } | RangeError::Inverted { start, end } => {
                RemoveRange { start, end }
            }
        }
    }
}

/// Resolves a range against a stem of `len` chars into absolute `[start, end)` offsets.
pub fn resolve_range(range: RemoveRange, len: usize) -> Result<(usize, usize), RangeError> {
    let RemoveRange { start, end } = range;
    let from_end = |index: i64| len as i64 + 1 + index;

    let (lo, hi) = match (start >= 0, end >= 0) {
        (true, true) => (start.min(end), start.max(end)),
        (false, false) => (from_end(start.min(end)), from_end(start.max(end))),
        (true, false) => {
            let resolved_end = from_end(end);
            if resolved_end <= start {
                return Err(RangeError::Inverted { start, end });
            }
            (start, resolved_end)
        }
        (false, true) => return Err(RangeError::MixedSign { start, end }),
    };

    Ok((clamp(lo, len), clamp(hi, len)))
}

/// Drops every valid range from `stem`. All ranges are resolved against the
/// same input, so earlier removals never shift later ones.
pub fn apply_removals(stem: &str, ranges: &[RemoveRange]) -> (String, Vec<RangeError>) {
    let len = char_len(stem);
    let mut removed = vec![false; len];
    let mut errors = Vec::new();

    for range in ranges {
        match resolve_range(*range, len) {
            Ok((start, end)) => removed[start..end].fill(true),
            Err(err) => errors.push(err),
        }
    }

    let kept = stem
        .chars()
        .zip(removed)
        .filter(|(_, removed)| !removed)
        .map(|(ch, _)| ch)
        .collect();
    (kept, errors)
}

fn clamp(index: i64, len: usize) -> usize {
    index.clamp(0, len as i64) as usize
}
