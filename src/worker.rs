//! Worker abstraction for partitioned processing
//!
//! A worker owns exactly one partition for the duration of a run. It borrows
//! its input lines, produces its result, and hands it back either through
//! its own output slots or through the reduction channel. Workers are
//! spawned as named scoped threads so they can borrow the document without
//! copying it.

use crate::channel::Sender;
use crate::cipher::LineTransform;
use crate::error::{Error, Result};
use crate::message::Envelope;
use crate::partition::Partition;
use crate::sequential::longest_line;
use std::any::Any;
use std::thread::{self, Scope, ScopedJoinHandle};
use tracing::debug;

/// Worker configuration
#[derive(Debug, Clone, Default)]
pub struct WorkerConfig {
    /// Worker name, used as the thread name
    pub name: Option<String>,

    /// CPU core to pin this worker to (None = no pinning)
    pub cpu_affinity: Option<usize>,

    /// Stack size for worker thread (None = default)
    pub stack_size: Option<usize>,
}

impl WorkerConfig {
    /// Create a new worker configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set CPU affinity
    pub fn with_cpu_affinity(mut self, cpu: usize) -> Self {
        self.cpu_affinity = Some(cpu);
        self
    }

    /// Set stack size
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }
}

/// A unit of work bound to one partition
pub trait Worker: Send {
    /// What the worker hands back when joined
    type Output: Send;

    /// Partition this worker owns
    fn partition(&self) -> Partition;

    /// Process the partition
    fn run(self) -> Result<Self::Output>;
}

/// Applies a line transform to its partition, writing into its own slots
pub struct TransformWorker<'a, T: ?Sized> {
    partition: Partition,
    input: &'a [String],
    output: &'a mut [String],
    transform: &'a T,
}

impl<'a, T: LineTransform + ?Sized> TransformWorker<'a, T> {
    /// Create a worker; `input` and `output` must both cover `partition`
    pub fn new(
        partition: Partition,
        input: &'a [String],
        output: &'a mut [String],
        transform: &'a T,
    ) -> Self {
        debug_assert_eq!(input.len(), partition.len());
        debug_assert_eq!(output.len(), partition.len());
        Self {
            partition,
            input,
            output,
            transform,
        }
    }
}

impl<'a, T: LineTransform + ?Sized> Worker for TransformWorker<'a, T> {
    /// Lines written
    type Output = usize;

    fn partition(&self) -> Partition {
        self.partition
    }

    fn run(self) -> Result<usize> {
        let Self {
            input,
            output,
            transform,
            ..
        } = self;

        for (slot, line) in output.iter_mut().zip(input) {
            *slot = transform.apply(line);
        }
        Ok(input.len())
    }
}

/// Finds the longest line of its partition and sends it to the driver
pub struct LongestLineWorker<'a> {
    partition: Partition,
    lines: &'a [String],
    sink: Sender<Envelope<Option<String>>>,
}

impl<'a> LongestLineWorker<'a> {
    /// Create a worker; `lines` must cover `partition`
    pub fn new(
        partition: Partition,
        lines: &'a [String],
        sink: Sender<Envelope<Option<String>>>,
    ) -> Self {
        debug_assert_eq!(lines.len(), partition.len());
        Self {
            partition,
            lines,
            sink,
        }
    }
}

impl<'a> Worker for LongestLineWorker<'a> {
    type Output = ();

    fn partition(&self) -> Partition {
        self.partition
    }

    fn run(self) -> Result<()> {
        let local = longest_line(self.lines).map(str::to_owned);

        let mut envelope = Envelope::new(local, self.partition);
        if let Some(name) = thread::current().name() {
            envelope = envelope.with_source(name);
        }
        self.sink.send(envelope)
    }
}

/// Handle to a running scoped worker
pub struct WorkerHandle<'scope, T> {
    name: String,
    partition: Partition,
    handle: ScopedJoinHandle<'scope, Result<T>>,
}

impl<'scope, T> WorkerHandle<'scope, T> {
    /// Wait for the worker to finish.
    ///
    /// A panic becomes [`Error::WorkerPanicked`] and a returned error becomes
    /// [`Error::WorkerFailed`]; neither is swallowed.
    pub fn join(self) -> Result<T> {
        match self.handle.join() {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(Error::WorkerFailed {
                partition: self.partition.index,
                message: e.to_string(),
            }),
            Err(payload) => Err(Error::WorkerPanicked(format!(
                "{}: {}",
                self.name,
                panic_message(&*payload)
            ))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}

/// Spawn a worker on a named thread inside `scope`
pub fn spawn_scoped<'scope, 'env, W>(
    scope: &'scope Scope<'scope, 'env>,
    worker: W,
    config: &WorkerConfig,
) -> Result<WorkerHandle<'scope, W::Output>>
where
    W: Worker + 'scope,
    W::Output: 'scope,
{
    let partition = worker.partition();
    let name = match &config.name {
        Some(name) => name.clone(),
        None => format!("worker-{}", partition.index),
    };

    let mut thread_builder = thread::Builder::new().name(name.clone());

    if let Some(stack_size) = config.stack_size {
        thread_builder = thread_builder.stack_size(stack_size);
    }

    let cpu_affinity = config.cpu_affinity;

    let handle = thread_builder
        .spawn_scoped(scope, move || {
            if let Some(cpu) = cpu_affinity {
                if let Some(core_ids) = core_affinity::get_core_ids() {
                    if cpu < core_ids.len() {
                        core_affinity::set_for_current(core_ids[cpu]);
                    }
                }
            }

            debug!(
                partition = partition.index,
                start = partition.start,
                end = partition.end,
                "worker started"
            );
            let output = worker.run();
            debug!(partition = partition.index, ok = output.is_ok(), "worker finished");
            output
        })
        .map_err(Error::Spawn)?;

    Ok(WorkerHandle {
        name,
        partition,
        handle,
    })
}

/// Join every handle exactly once, returning outputs in handle order.
///
/// All workers are joined even after a failure so no panic goes unobserved;
/// the first error encountered is returned.
pub fn join_all<T>(handles: Vec<WorkerHandle<'_, T>>) -> Result<Vec<T>> {
    let mut outputs = Vec::with_capacity(handles.len());
    let mut first_error = None;

    for handle in handles {
        match handle.join() {
            Ok(output) => outputs.push(output),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(outputs),
    }
}
