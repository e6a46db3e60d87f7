//! Contiguous range partitioning of a document across workers
//!
//! Every worker but the last gets `item_count / worker_count` items; the last
//! one absorbs the remainder. Ranges are half-open, disjoint, and in
//! document order, so concatenating per-partition output reproduces the
//! original ordering.

use crate::error::{Error, Result};
use std::ops::Range;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Half-open index range `[start, end)` owned by exactly one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Partition {
    /// Position of this partition in the split
    pub index: usize,

    /// First item index (inclusive)
    pub start: usize,

    /// Last item index (exclusive)
    pub end: usize,
}

impl Partition {
    /// Number of items in the partition
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the partition holds no items
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Index range, usable for slicing
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `item_count` items into `worker_count` contiguous partitions.
///
/// Returns an error when `worker_count` is zero. When there are more workers
/// than items the leading partitions are empty and the last one holds
/// everything.
pub fn partition(item_count: usize, worker_count: usize) -> Result<Vec<Partition>> {
    if worker_count == 0 {
        return Err(Error::InvalidConfig(
            "worker count must be at least 1".to_string(),
        ));
    }

    let base = item_count / worker_count;

    let partitions = (0..worker_count)
        .map(|index| {
            let start = index * base;
            let end = if index == worker_count - 1 {
                item_count
            } else {
                start + base
            };
            Partition { index, start, end }
        })
        .collect();

    Ok(partitions)
}
