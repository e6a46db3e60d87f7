//! Parallel drivers: one worker per partition, started together, joined once
//!
//! The transform driver writes every worker's output into a pre-sized slot
//! range matching its partition, so the result is in document order and
//! identical to the sequential driver. The reduction driver collects one
//! local result per worker over a channel and reduces them after the join.

use crate::channel::{Channel, ChannelConfig};
use crate::cipher::LineTransform;
use crate::error::{Error, Result};
use crate::message::Envelope;
use crate::partition::{partition, Partition};
use crate::sequential::longest_of;
use crate::worker::{
    join_all, spawn_scoped, LongestLineWorker, TransformWorker, Worker, WorkerConfig,
};
use std::thread;
use tracing::{debug, warn};

/// Worker pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of workers, one per partition
    pub num_workers: usize,

    /// Configuration template for workers
    pub worker_config: WorkerConfig,

    /// Whether to enable CPU affinity pinning
    pub enable_cpu_affinity: bool,

    /// Reduction sink configuration
    pub channel: ChannelConfig,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            worker_config: WorkerConfig::default(),
            enable_cpu_affinity: false,
            channel: ChannelConfig::default(),
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of workers
    pub fn with_num_workers(mut self, num: usize) -> Self {
        self.num_workers = num;
        self
    }

    /// Set the worker configuration template
    pub fn with_worker_config(mut self, config: WorkerConfig) -> Self {
        self.worker_config = config;
        self
    }

    /// Enable CPU affinity pinning
    pub fn with_cpu_affinity(mut self, enable: bool) -> Self {
        self.enable_cpu_affinity = enable;
        self
    }

    /// Set the reduction sink configuration
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channel = channel;
        self
    }
}

/// Fans a document out across scoped worker threads.
///
/// Threads are created per call and never reused, so every run starts from
/// a clean set of workers.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    config: PoolConfig,
}

impl WorkerPool {
    /// Create a pool, rejecting a zero worker count
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.num_workers == 0 {
            return Err(Error::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Partitions a document of `line_count` lines would be split into
    pub fn partitions(&self, line_count: usize) -> Result<Vec<Partition>> {
        let partitions = partition(line_count, self.config.num_workers)?;
        let empty = partitions.iter().filter(|p| p.is_empty()).count();
        if empty > 0 {
            warn!(
                workers = self.config.num_workers,
                lines = line_count,
                empty,
                "more workers than lines, some partitions are empty"
            );
        }
        Ok(partitions)
    }

    fn worker_config_for(&self, index: usize) -> WorkerConfig {
        let mut config = self.config.worker_config.clone();

        if self.config.enable_cpu_affinity {
            config.cpu_affinity = Some(index % num_cpus::get());
        }

        config.name = Some(match &config.name {
            Some(prefix) => format!("{}-{}", prefix, index),
            None => format!("cipher-worker-{}", index),
        });

        config
    }

    /// Start one thread per worker, then join them all.
    ///
    /// Every worker is running before the first join. If a spawn fails, the
    /// workers already started are still joined before the error is returned.
    pub(crate) fn dispatch<W: Worker>(&self, workers: Vec<W>) -> Result<Vec<W::Output>> {
        let count = workers.len();

        thread::scope(|scope| -> Result<Vec<W::Output>> {
            let mut handles = Vec::with_capacity(count);
            let mut spawn_error = None;

            for worker in workers {
                let config = self.worker_config_for(worker.partition().index);
                match spawn_scoped(scope, worker, &config) {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        spawn_error = Some(e);
                        break;
                    }
                }
            }

            let outputs = join_all(handles)?;
            match spawn_error {
                Some(e) => Err(e),
                None => {
                    debug!(workers = count, "all workers joined");
                    Ok(outputs)
                }
            }
        })
    }

    /// Transform every line in parallel, keeping document order
    pub fn transform<T>(&self, lines: &[String], transform: &T) -> Result<Vec<String>>
    where
        T: LineTransform + ?Sized,
    {
        let partitions = self.partitions(lines.len())?;
        let mut output = vec![String::new(); lines.len()];

        let mut workers = Vec::with_capacity(partitions.len());
        let mut remaining: &mut [String] = &mut output;
        for part in &partitions {
            let (slots, rest) = std::mem::take(&mut remaining).split_at_mut(part.len());
            remaining = rest;
            workers.push(TransformWorker::new(*part, &lines[part.range()], slots, transform));
        }

        let written: usize = self.dispatch(workers)?.into_iter().sum();
        debug!(lines = written, "parallel transform finished");

        Ok(output)
    }

    /// Longest line of the document, reduced first per worker then globally.
    ///
    /// Local results are ordered by partition before the final reduction,
    /// so ties resolve to the earliest line in the document exactly as a
    /// single sequential pass would.
    pub fn longest_line(&self, lines: &[String]) -> Result<Option<String>> {
        let partitions = self.partitions(lines.len())?;

        // Every worker sends exactly once before the driver drains, so the
        // sink must hold one result per worker.
        let capacity = self.config.channel.capacity.max(partitions.len());
        let (tx, rx) = Channel::new::<Envelope<Option<String>>>(
            self.config.channel.clone().with_capacity(capacity),
        );

        let workers: Vec<_> = partitions
            .iter()
            .map(|part| LongestLineWorker::new(*part, &lines[part.range()], tx.clone()))
            .collect();
        drop(tx);

        self.dispatch(workers)?;

        let mut reports = rx.drain();
        let stats = rx.stats();
        if reports.len() != partitions.len() {
            return Err(Error::ReceiveError(format!(
                "expected {} worker results, received {}",
                partitions.len(),
                reports.len()
            )));
        }
        reports.sort_by_key(Envelope::partition_index);

        debug!(
            sent = stats.sent(),
            received = stats.received(),
            send_errors = stats.send_errors(),
            "reducing local results"
        );
        Ok(longest_of(reports.into_iter().filter_map(|e| e.payload)))
    }
}
