//! Entry-range partitioning and the one-shot range hand-off.
//!
//! The flat record index space `[0, total_records)` is divided into one
//! contiguous half-open range per worker slot. Ranges are disjoint and their
//! union is exactly the full index space, which is the entire basis for
//! running slots concurrently without synchronization.

use rowfan_result::{Error, Result};

/// A half-open interval `[begin, end)` of flat record indices assigned to
/// one worker slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRange {
    pub begin: u64,
    pub end: u64,
}

impl EntryRange {
    pub fn len(&self) -> u64 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn contains(&self, flat: u64) -> bool {
        flat >= self.begin && flat < self.end
    }
}

/// Split `[0, total_records)` into `n_slots` contiguous ranges of near-equal
/// size.
///
/// Each range has `total / n_slots` records; the first `total % n_slots`
/// ranges carry one extra record each. Ranges are returned in slot order,
/// each starting where the previous ended. Zero slots yield no ranges.
pub fn partition_entry_ranges(total_records: u64, n_slots: usize) -> Vec<EntryRange> {
    if n_slots == 0 {
        return Vec::new();
    }
    let base = total_records / n_slots as u64;
    let mut remainder = total_records % n_slots as u64;
    let mut ranges = Vec::with_capacity(n_slots);
    let mut begin = 0u64;
    for _ in 0..n_slots {
        let mut end = begin + base;
        if remainder != 0 {
            remainder -= 1;
            end += 1;
        }
        ranges.push(EntryRange { begin, end });
        begin = end;
    }
    ranges
}

#[derive(Debug)]
enum HandOffState {
    NotYetIssued(Vec<EntryRange>),
    Issued,
}

/// One-shot ownership hand-off for the computed entry ranges.
///
/// The host receives the ranges exactly once. A second request is a defined
/// [`Error::RangesAlreadyConsumed`] rather than a silent empty result, so
/// "no more work to hand out" can never be confused with "zero work".
#[derive(Debug)]
pub struct RangeHandOff {
    state: HandOffState,
}

impl RangeHandOff {
    pub fn new(ranges: Vec<EntryRange>) -> Self {
        Self {
            state: HandOffState::NotYetIssued(ranges),
        }
    }

    pub fn is_issued(&self) -> bool {
        matches!(self.state, HandOffState::Issued)
    }

    /// Transfer ownership of the ranges to the caller.
    pub fn take(&mut self) -> Result<Vec<EntryRange>> {
        match std::mem::replace(&mut self.state, HandOffState::Issued) {
            HandOffState::NotYetIssued(ranges) => Ok(ranges),
            HandOffState::Issued => Err(Error::RangesAlreadyConsumed),
        }
    }
}
