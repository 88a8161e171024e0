//! Candidate counting and flat-index resolution.
//!
//! The explosion structure is captured by a *threshold sequence*: one
//! cumulative element count per source row, taken from the first nested
//! column in declaration order. Entry `r` is the number of exploded records
//! contributed by rows `[0..=r]`, so the sequence is non-decreasing and its
//! last entry is the nested columns' total. Resolving a flat record index
//! back to `(source_row, inner_offset)` is a binary search for the first
//! threshold strictly greater than the index.

use rowfan_result::{Error, Result};

use crate::column::ExplodeColumn;

/// Immutable index from flat exploded-record indices to source positions.
///
/// Built exactly once at initialization and shared read-only by every slot
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExplodeIndex {
    thresholds: Vec<u64>,
    total_records: u64,
}

impl ExplodeIndex {
    /// Scan all columns, computing the total record count and populating the
    /// threshold sequence from the first nested column encountered.
    ///
    /// The total is the maximum contribution across columns: nested columns
    /// contribute the sum of their per-row element counts, scalar columns
    /// contribute their row count (they broadcast, so they can sustain at
    /// most one record per row on their own).
    pub fn build(columns: &[ExplodeColumn]) -> Result<Self> {
        let mut thresholds: Vec<u64> = Vec::new();
        let mut total_records = 0u64;
        for column in columns {
            if column.is_nested() {
                let fill = thresholds.is_empty();
                if fill {
                    thresholds.reserve(column.num_source_rows());
                }
                let mut running = 0u64;
                for row in 0..column.num_source_rows() {
                    running += column.element_count(row)? as u64;
                    if fill {
                        thresholds.push(running);
                    }
                }
                total_records = total_records.max(running);
            } else {
                total_records = total_records.max(column.num_source_rows() as u64);
            }
        }
        Ok(Self {
            thresholds,
            total_records,
        })
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// Map a flat record index to `(source_row, inner_offset)`.
    ///
    /// With no nested columns the mapping degenerates to the identity: every
    /// source row is one exploded record. Indices at or beyond
    /// `total_records`, and indices beyond the threshold coverage (possible
    /// when a scalar column is longer than the nested total), are
    /// [`Error::IndexOutOfRange`].
    pub fn resolve(&self, flat: u64) -> Result<(usize, usize)> {
        if flat >= self.total_records {
            return Err(Error::IndexOutOfRange {
                index: flat,
                len: self.total_records,
            });
        }
        if self.thresholds.is_empty() {
            return Ok((flat as usize, 0));
        }
        let covered = self.thresholds[self.thresholds.len() - 1];
        if flat >= covered {
            return Err(Error::IndexOutOfRange {
                index: flat,
                len: covered,
            });
        }
        // First row whose cumulative count exceeds the flat index. Rows
        // contributing zero elements are skipped by construction: their
        // threshold equals their predecessor's.
        let row = self.thresholds.partition_point(|&t| t <= flat);
        let prev = if row == 0 { 0 } else { self.thresholds[row - 1] };
        Ok((row, (flat - prev) as usize))
    }
}
