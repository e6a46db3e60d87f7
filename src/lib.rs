//! # Parallel Cipher
//!
//! Parallel versus sequential line transformation. A document is split into
//! contiguous line ranges, each range is handed to its own worker thread,
//! and the per-worker results are recombined and timed.
//!
//! ## Key Features
//!
//! - **Contiguous partitioning**: every worker gets `N / W` lines, the last one
//!   absorbs the remainder
//! - **Exclusive ownership**: each partition belongs to exactly one worker;
//!   output slots are disjoint so workers never contend
//! - **Deterministic order**: parallel output is byte-identical to the
//!   sequential driver
//! - **Two-level reduction**: per-worker longest line, then a global pick over
//!   a channel
//! - **Timing**: wall-clock per worker count, reported as CSV
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────┐
//!   read_lines ─> │  partition   │  [0,3) [3,6) [6,10)
//!                 └──────┬───────┘
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!   ┌────────────┐ ┌────────────┐ ┌────────────┐
//!   │  Worker 0  │ │  Worker 1  │ │  Worker 2  │
//!   └─────┬──────┘ └─────┬──────┘ └─────┬──────┘
//!         │ slots / channel             │
//!         ▼             ▼               ▼
//!   ┌──────────────────────────────────────────┐
//!   │      join all → reassemble / reduce       │ ─> write_lines
//!   └──────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use parallel_cipher::prelude::*;
//!
//! let lines: Vec<String> = ["ABC", "xyz9", "Hello, World!"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let pool = WorkerPool::new(PoolConfig::new().with_num_workers(2)).unwrap();
//! let encrypted = pool.transform(&lines, &CaesarCipher::new(3)).unwrap();
//! assert_eq!(encrypted, ["DEF", "abc2", "Khoor, Zruog!"]);
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod channel;
pub mod cipher;
pub mod config;
pub mod error;
pub mod io;
pub mod message;
pub mod partition;
pub mod pool;
pub mod run;
pub mod sequential;
pub mod timing;
pub mod worker;

// Re-exports
pub use channel::{Channel, ChannelBackend, ChannelConfig, Receiver, Sender};
pub use cipher::{transform, CaesarCipher, LineTransform, DEFAULT_SHIFT};
pub use config::{Mode, RunConfig};
pub use error::{Error, Result};
pub use message::Envelope;
pub use partition::{partition, Partition};
pub use pool::{PoolConfig, WorkerPool};
pub use run::{benchmark, run, RunOutcome};
pub use sequential::{longest_line, sequential_transform};
pub use timing::{measure, TimingReport};
pub use worker::{Worker, WorkerConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cipher::{transform, CaesarCipher, LineTransform};
    pub use crate::config::{Mode, RunConfig};
    pub use crate::error::{Error, Result};
    pub use crate::partition::{partition, Partition};
    pub use crate::pool::{PoolConfig, WorkerPool};
    pub use crate::sequential::{longest_line, sequential_transform};
    pub use crate::timing::{measure, TimingReport};
}
