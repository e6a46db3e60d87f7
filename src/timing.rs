//! Wall-clock timing of driver runs

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Header row of the CSV report
pub const CSV_HEADER: &str = "Threads,Time(ms)";

/// Run `f` and return its result together with the elapsed wall-clock time
pub fn measure<T, F>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Elapsed time per worker count, in ascending worker order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingReport {
    timings: BTreeMap<usize, Duration>,
}

impl TimingReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a run, replacing any earlier entry for the same worker count
    pub fn record(&mut self, workers: usize, elapsed: Duration) {
        self.timings.insert(workers, elapsed);
    }

    /// `(workers, elapsed)` pairs in ascending worker order
    pub fn entries(&self) -> impl Iterator<Item = (usize, Duration)> + '_ {
        self.timings.iter().map(|(&w, &d)| (w, d))
    }

    /// Write `Threads,Time(ms)` followed by one row per run
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", CSV_HEADER)?;
        for (workers, elapsed) in self.entries() {
            writeln!(writer, "{},{}", workers, elapsed.as_millis())?;
        }
        writer.flush()
    }

    /// Write the CSV report to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        self.write_csv(&mut BufWriter::new(file))
            .map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_returns_value() {
        let (value, elapsed) = measure(|| {
            std::thread::sleep(Duration::from_millis(5));
            42
        });
        assert_eq!(value, 42);
        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_csv_sorted_by_workers() {
        let mut report = TimingReport::new();
        report.record(16, Duration::from_millis(40));
        report.record(4, Duration::from_micros(125_900));
        report.record(8, Duration::from_millis(70));

        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Threads,Time(ms)\n4,125\n8,70\n16,40\n"
        );
    }

    #[test]
    fn test_record_overwrites() {
        let mut report = TimingReport::new();
        report.record(4, Duration::from_millis(10));
        report.record(4, Duration::from_millis(20));
        let entries: Vec<_> = report.entries().collect();
        assert_eq!(entries, vec![(4, Duration::from_millis(20))]);
    }

    #[test]
    fn test_empty_report_has_header() {
        let mut out = Vec::new();
        TimingReport::new().write_csv(&mut out).unwrap();
        assert_eq!(out, b"Threads,Time(ms)\n");
    }
}
