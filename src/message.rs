//! Messages workers hand to the reduction sink

use crate::partition::Partition;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A worker's result, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Envelope<T> {
    /// The actual message payload
    pub payload: T,

    /// Partition the payload was computed from
    pub partition: Partition,

    /// Name of the worker thread that produced it
    pub source: Option<String>,
}

impl<T> Envelope<T> {
    /// Create a new envelope for a partition
    pub fn new(payload: T, partition: Partition) -> Self {
        Self {
            payload,
            partition,
            source: None,
        }
    }

    /// Set the producing worker name
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Index of the originating partition
    pub fn partition_index(&self) -> usize {
        self.partition.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_creation() {
        let partition = Partition {
            index: 2,
            start: 6,
            end: 10,
        };
        let envelope =
            Envelope::new("longest".to_string(), partition).with_source("cipher-worker-2");

        assert_eq!(envelope.payload, "longest");
        assert_eq!(envelope.partition_index(), 2);
        assert_eq!(envelope.source.as_deref(), Some("cipher-worker-2"));
    }
}
