//! Message channels for handing worker results to the driver
//!
//! The reduction driver collects one local result per worker through a
//! multi-producer channel. Either `flume` or `crossbeam` can back it; both
//! halves keep shared counters so a run can report how many results moved.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache line size for padding (typically 64 bytes on x86-64)
const CACHE_LINE_SIZE: usize = 64;

/// Channel implementation backing a [`Sender`]/[`Receiver`] pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelBackend {
    /// `flume` channels
    #[default]
    Flume,

    /// `crossbeam` channels
    Crossbeam,
}

/// Channel configuration
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Buffer capacity
    pub capacity: usize,

    /// Implementation to use
    pub backend: ChannelBackend,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            backend: ChannelBackend::default(),
        }
    }
}

impl ChannelConfig {
    /// Create a new channel configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the backend
    pub fn with_backend(mut self, backend: ChannelBackend) -> Self {
        self.backend = backend;
        self
    }
}

/// Statistics shared by both halves of a channel
#[repr(align(64))] // Align to cache line
#[derive(Debug)]
pub struct ChannelStats {
    /// Number of messages sent
    pub messages_sent: AtomicU64,

    /// Number of messages received
    pub messages_received: AtomicU64,

    /// Number of send errors
    pub send_errors: AtomicU64,

    _padding: [u8; CACHE_LINE_SIZE - 24],
}

impl Default for ChannelStats {
    fn default() -> Self {
        Self {
            messages_sent: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            send_errors: AtomicU64::new(0),
            _padding: [0; CACHE_LINE_SIZE - 24],
        }
    }
}

impl ChannelStats {
    /// Get the number of messages sent
    pub fn sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    /// Get the number of messages received
    pub fn received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    /// Get the number of send errors
    pub fn send_errors(&self) -> u64 {
        self.send_errors.load(Ordering::Relaxed)
    }
}

/// Sender half of a channel
pub struct Sender<T> {
    inner: SenderInner<T>,
    stats: Arc<ChannelStats>,
}

enum SenderInner<T> {
    Flume(flume::Sender<T>),
    Crossbeam(crossbeam::channel::Sender<T>),
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: match &self.inner {
                SenderInner::Flume(s) => SenderInner::Flume(s.clone()),
                SenderInner::Crossbeam(s) => SenderInner::Crossbeam(s.clone()),
            },
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<T> Sender<T> {
    /// Send a message, blocking while the channel is full
    pub fn send(&self, msg: T) -> Result<()> {
        let result: Result<()> = match &self.inner {
            SenderInner::Flume(s) => s.send(msg).map_err(Error::from),
            SenderInner::Crossbeam(s) => s.send(msg).map_err(Error::from),
        };

        match result {
            Ok(()) => {
                self.stats.messages_sent.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.stats.send_errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }
}

/// Receiver half of a channel
pub struct Receiver<T> {
    inner: ReceiverInner<T>,
    stats: Arc<ChannelStats>,
}

enum ReceiverInner<T> {
    Flume(flume::Receiver<T>),
    Crossbeam(crossbeam::channel::Receiver<T>),
}

impl<T> Receiver<T> {
    /// Take every message already queued without blocking
    pub fn drain(&self) -> Vec<T> {
        let drained: Vec<T> = match &self.inner {
            ReceiverInner::Flume(r) => r.try_iter().collect(),
            ReceiverInner::Crossbeam(r) => r.try_iter().collect(),
        };
        self.stats
            .messages_received
            .fetch_add(drained.len() as u64, Ordering::Relaxed);
        drained
    }

    /// Get channel statistics
    pub fn stats(&self) -> Arc<ChannelStats> {
        Arc::clone(&self.stats)
    }
}

/// Channel factory
pub struct Channel;

impl Channel {
    /// Create a bounded channel with the given configuration
    pub fn new<T>(config: ChannelConfig) -> (Sender<T>, Receiver<T>) {
        let stats = Arc::new(ChannelStats::default());

        let (tx, rx) = match config.backend {
            ChannelBackend::Flume => {
                let (tx, rx) = flume::bounded(config.capacity);
                (SenderInner::Flume(tx), ReceiverInner::Flume(rx))
            }
            ChannelBackend::Crossbeam => {
                let (tx, rx) = crossbeam::channel::bounded(config.capacity);
                (SenderInner::Crossbeam(tx), ReceiverInner::Crossbeam(rx))
            }
        };

        (
            Sender {
                inner: tx,
                stats: Arc::clone(&stats),
            },
            Receiver { inner: rx, stats },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flume_backend_drain() {
        let (tx, rx) = Channel::new::<i32>(ChannelConfig::new().with_capacity(10));

        tx.send(42).unwrap();
        tx.send(43).unwrap();

        assert_eq!(rx.drain(), vec![42, 43]);
        assert!(rx.drain().is_empty());

        let stats = rx.stats();
        assert_eq!(stats.sent(), 2);
        assert_eq!(stats.received(), 2);
    }

    #[test]
    fn test_crossbeam_backend_drain() {
        let (tx, rx) = Channel::new::<usize>(
            ChannelConfig::new()
                .with_capacity(8)
                .with_backend(ChannelBackend::Crossbeam),
        );

        let producers = tx.clone();
        for i in 0..5 {
            producers.send(i).unwrap();
        }
        drop(producers);
        tx.send(5).unwrap();

        assert_eq!(rx.drain(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(rx.stats().sent(), 6);
        assert_eq!(rx.stats().received(), 6);
    }

    #[test]
    fn test_send_after_disconnect() {
        for backend in [ChannelBackend::Flume, ChannelBackend::Crossbeam] {
            let (tx, rx) = Channel::new::<u8>(ChannelConfig::new().with_backend(backend));
            let stats = rx.stats();
            drop(rx);

            assert!(matches!(tx.send(1), Err(Error::SendError(_))));
            assert_eq!(stats.send_errors(), 1);
            assert_eq!(stats.sent(), 0);
        }
    }
}
