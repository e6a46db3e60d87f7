//! Error types for the parallel cipher

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for parallel cipher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while partitioning, dispatching, or doing I/O
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the input or writing an output failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration, rejected before any work is dispatched
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker thread could not be started
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// Worker thread panicked
    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    /// Worker returned an error for its partition
    #[error("Worker for partition {partition} failed: {message}")]
    WorkerFailed {
        /// Index of the partition the worker owned
        partition: usize,
        /// Error reported by the worker
        message: String,
    },

    /// Channel send error
    #[error("Channel send error: {0}")]
    SendError(String),

    /// Channel receive error
    #[error("Channel receive error: {0}")]
    ReceiveError(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl<T> From<flume::SendError<T>> for Error {
    fn from(err: flume::SendError<T>) -> Self {
        Error::SendError(err.to_string())
    }
}

impl From<flume::RecvError> for Error {
    fn from(err: flume::RecvError) -> Self {
        Error::ReceiveError(err.to_string())
    }
}

impl<T> From<crossbeam::channel::SendError<T>> for Error {
    fn from(err: crossbeam::channel::SendError<T>) -> Self {
        Error::SendError(err.to_string())
    }
}

impl From<crossbeam::channel::RecvError> for Error {
    fn from(err: crossbeam::channel::RecvError) -> Self {
        Error::ReceiveError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = Error::io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.txt"));
        assert!(msg.contains("no such file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_channel_error_conversion() {
        let (tx, rx) = flume::bounded::<u8>(1);
        drop(rx);
        let err: Error = tx.send(1).unwrap_err().into();
        assert!(matches!(err, Error::SendError(_)));
    }
}
