//! Run configuration passed into the drivers

use crate::channel::{ChannelBackend, ChannelConfig};
use crate::cipher::{CaesarCipher, DEFAULT_SHIFT};
use crate::error::{Error, Result};
use crate::pool::PoolConfig;
use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// What a run does with the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Shift every line forward
    #[default]
    Encrypt,

    /// Shift every line back
    Decrypt,

    /// Select the longest line
    Longest,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Encrypt => write!(f, "encrypt"),
            Mode::Decrypt => write!(f, "decrypt"),
            Mode::Longest => write!(f, "longest"),
        }
    }
}

/// Everything a single run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Text file to read
    pub input: PathBuf,

    /// Where transformed lines go (required unless the mode is `Longest`)
    pub output: Option<PathBuf>,

    /// Number of workers for the parallel driver
    pub workers: usize,

    /// Cipher shift
    pub shift: i64,

    /// What to compute
    pub mode: Mode,

    /// Use the single-threaded driver instead of the worker pool
    pub sequential: bool,

    /// Pin workers to CPU cores
    pub cpu_affinity: bool,

    /// Channel implementation for the reduction sink
    pub channel_backend: ChannelBackend,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            workers: num_cpus::get(),
            shift: DEFAULT_SHIFT,
            mode: Mode::default(),
            sequential: false,
            cpu_affinity: false,
            channel_backend: ChannelBackend::default(),
        }
    }
}

impl RunConfig {
    /// Configuration reading `input` with defaults for everything else
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Set the output path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the cipher shift
    pub fn with_shift(mut self, shift: i64) -> Self {
        self.shift = shift;
        self
    }

    /// Set the mode
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Use the sequential driver
    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Pin workers to CPU cores
    pub fn with_cpu_affinity(mut self, enable: bool) -> Self {
        self.cpu_affinity = enable;
        self
    }

    /// Choose the reduction channel implementation
    pub fn with_channel_backend(mut self, backend: ChannelBackend) -> Self {
        self.channel_backend = backend;
        self
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.mode != Mode::Longest && self.output.is_none() {
            return Err(Error::InvalidConfig(format!(
                "{} mode requires an output path",
                self.mode
            )));
        }
        Ok(())
    }

    /// Cipher for this run; decryption uses the inverse shift
    pub fn cipher(&self) -> CaesarCipher {
        let cipher = CaesarCipher::new(self.shift);
        match self.mode {
            Mode::Decrypt => cipher.inverse(),
            Mode::Encrypt | Mode::Longest => cipher,
        }
    }

    /// Pool configuration derived from this run
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .with_num_workers(self.workers)
            .with_cpu_affinity(self.cpu_affinity)
            .with_channel(ChannelConfig::new().with_backend(self.channel_backend))
    }
}
