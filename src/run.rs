//! End-to-end runs: read, partition, dispatch, join, write, and time it

use crate::config::{Mode, RunConfig};
use crate::error::{Error, Result};
use crate::io::{read_lines, write_lines};
use crate::pool::WorkerPool;
use crate::sequential::{longest_line, sequential_transform};
use crate::timing::{measure, TimingReport};
use std::time::Duration;
use tracing::{debug, info};

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Mode that ran
    pub mode: Mode,

    /// Worker count used (1 for the sequential driver)
    pub workers: usize,

    /// Lines read from the input
    pub lines: usize,

    /// Time spent partitioning, dispatching, joining and writing
    pub elapsed: Duration,

    /// Selected line in `Longest` mode
    pub longest: Option<String>,
}

/// Execute one run as described by `config`.
///
/// The input is read before the clock starts; the timed region covers the
/// driver and, for the cipher modes, writing the output file.
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    config.validate()?;

    let lines = read_lines(&config.input)?;
    let workers = if config.sequential { 1 } else { config.workers };

    let (longest, elapsed) = match config.mode {
        Mode::Encrypt | Mode::Decrypt => {
            let output = config
                .output
                .as_ref()
                .ok_or_else(|| Error::InvalidConfig("output path missing".to_string()))?;
            let cipher = config.cipher();
            debug!(shift = cipher.shift(), mode = %config.mode, "cipher selected");

            let (result, elapsed) = measure(|| -> Result<()> {
                let transformed = if config.sequential {
                    sequential_transform(&lines, &cipher)
                } else {
                    WorkerPool::new(config.pool_config())?.transform(&lines, &cipher)?
                };
                write_lines(output, &transformed)
            });
            result?;
            (None, elapsed)
        }
        Mode::Longest => {
            let (result, elapsed) = measure(|| -> Result<Option<String>> {
                if config.sequential {
                    Ok(longest_line(&lines).map(str::to_owned))
                } else {
                    WorkerPool::new(config.pool_config())?.longest_line(&lines)
                }
            });
            (result?, elapsed)
        }
    };

    info!(
        mode = %config.mode,
        workers,
        lines = lines.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "run complete"
    );

    Ok(RunOutcome {
        mode: config.mode,
        workers,
        lines: lines.len(),
        elapsed,
        longest,
    })
}

/// Run `config` once per worker count and collect the timings
pub fn benchmark(config: &RunConfig, worker_counts: &[usize]) -> Result<TimingReport> {
    if worker_counts.is_empty() {
        return Err(Error::InvalidConfig(
            "at least one worker count is required".to_string(),
        ));
    }
    if let Some(zero) = worker_counts.iter().find(|&&w| w == 0) {
        return Err(Error::InvalidConfig(format!(
            "invalid worker count in benchmark: {}",
            zero
        )));
    }

    let mut report = TimingReport::new();
    for &workers in worker_counts {
        let run_config = config.clone().with_workers(workers).with_sequential(false);
        let outcome = run(&run_config)?;
        info!(
            workers,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "{} with {} threads took {} ms",
            outcome.mode,
            workers,
            outcome.elapsed.as_millis()
        );
        report.record(workers, outcome.elapsed);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_encrypt_then_decrypt() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("plain.csv");
        let encrypted = dir.path().join("encrypted.csv");
        let decrypted = dir.path().join("decrypted.csv");
        fs::write(&input, "ABC\nxyz9\nHello, World!\n").unwrap();

        let config = RunConfig::new(&input).with_output(&encrypted).with_workers(2);
        let outcome = run(&config).unwrap();
        assert_eq!(outcome.lines, 3);
        assert_eq!(outcome.workers, 2);
        assert_eq!(
            fs::read_to_string(&encrypted).unwrap(),
            "DEF\nabc2\nKhoor, Zruog!\n"
        );

        run(&RunConfig::new(&encrypted)
            .with_output(&decrypted)
            .with_mode(Mode::Decrypt)
            .with_sequential(true))
        .unwrap();
        assert_eq!(fs::read(&decrypted).unwrap(), fs::read(&input).unwrap());
    }

    #[test]
    fn test_sequential_and_parallel_files_match() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let seq = dir.path().join("seq.txt");
        let par = dir.path().join("par.txt");
        let body: String = (0..250)
            .map(|i| format!("row {} -> value {}\n", i, i * 31))
            .collect();
        fs::write(&input, body).unwrap();

        run(&RunConfig::new(&input).with_output(&seq).with_sequential(true)).unwrap();
        run(&RunConfig::new(&input).with_output(&par).with_workers(7)).unwrap();
        assert_eq!(fs::read(&seq).unwrap(), fs::read(&par).unwrap());
    }

    #[test]
    fn test_longest_mode() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "a\nabc\nab\n").unwrap();

        let config = RunConfig::new(&input).with_mode(Mode::Longest).with_workers(3);
        let outcome = run(&config).unwrap();
        assert_eq!(outcome.longest.as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempdir().unwrap();
        let config =
            RunConfig::new(dir.path().join("nope.txt")).with_output(dir.path().join("out"));
        assert!(matches!(run(&config), Err(Error::Io { .. })));
    }

    #[test]
    fn test_benchmark_records_each_count() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "one\ntwo\nthree\n").unwrap();

        let config = RunConfig::new(&input).with_output(&output);
        let report = benchmark(&config, &[4, 1, 2]).unwrap();
        let workers: Vec<usize> = report.entries().map(|(w, _)| w).collect();
        assert_eq!(workers, vec![1, 2, 4]);
    }

    #[test]
    fn test_benchmark_rejects_zero() {
        let config = RunConfig::new("unused").with_output("unused-out");
        assert!(matches!(benchmark(&config, &[2, 0]), Err(Error::InvalidConfig(_))));
        assert!(matches!(benchmark(&config, &[]), Err(Error::InvalidConfig(_))));
    }
}
