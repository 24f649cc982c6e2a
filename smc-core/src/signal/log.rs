//! Signal log: deduplicated record of emitted signals with JSONL persistence.
//!
//! One JSON object per line, append-only on disk. Loading skips malformed
//! lines so a partially written tail does not poison the whole file.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;

use super::{Signal, SignalId};

#[derive(Debug, Clone, Default)]
pub struct SignalLog {
    signals: Vec<Signal>,
    ids: HashSet<SignalId>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `signal` unless an identical one is already logged.
    ///
    /// Returns `true` if the signal was new.
    pub fn record(&mut self, signal: Signal) -> bool {
        if !self.ids.insert(signal.id()) {
            return false;
        }
        self.signals.push(signal);
        true
    }

    pub fn contains(&self, id: &SignalId) -> bool {
        self.ids.contains(id)
    }

    /// The `n` most recently recorded signals, newest first.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &Signal> {
        self.signals.iter().rev().take(n)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Read a JSONL log. A missing file is an empty log.
    pub fn load_jsonl(path: &Path) -> io::Result<Self> {
        let mut log = Self::new();
        if !path.exists() {
            return Ok(log);
        }

        let reader = io::BufReader::new(fs::File::open(path)?);
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Signal>(&line) {
                Ok(signal) => {
                    log.record(signal);
                }
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(path = %path.display(), skipped, "skipped malformed signal log lines");
        }
        tracing::debug!(path = %path.display(), signals = log.len(), "loaded signal log");
        Ok(log)
    }

    /// Append `signal` to `path` and record it, unless it is already logged.
    ///
    /// Returns `Ok(true)` if the signal was written, `Ok(false)` for a duplicate.
    /// The signal is only recorded once the write succeeded, so a failed
    /// append can be retried.
    pub fn record_and_append(&mut self, signal: Signal, path: &Path) -> io::Result<bool> {
        if self.contains(&signal.id()) {
            return Ok(false);
        }
        let json = serde_json::to_string(&signal)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{json}")?;
        file.flush()?;
        self.record(signal);

        tracing::info!(path = %path.display(), "appended signal to log");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::tests::sample_signal;

    #[test]
    fn duplicates_are_ignored() {
        let mut log = SignalLog::new();
        assert!(log.record(sample_signal()));
        assert!(!log.record(sample_signal()));
        assert_eq!(log.len(), 1);
        assert!(log.contains(&sample_signal().id()));
    }

    #[test]
    fn latest_is_newest_first() {
        let mut log = SignalLog::new();
        for i in 0..5 {
            let mut s = sample_signal();
            s.entry += i as f64;
            log.record(s);
        }
        let entries: Vec<f64> = log.latest(2).map(|s| s.entry).collect();
        assert_eq!(entries, vec![1.1 + 4.0, 1.1 + 3.0]);
        assert_eq!(log.latest(10).count(), 5);
    }

    #[test]
    fn jsonl_roundtrip_skips_duplicates_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("signals.jsonl");

        let mut log = SignalLog::new();
        assert!(log.record_and_append(sample_signal(), &path).unwrap());
        assert!(!log.record_and_append(sample_signal(), &path).unwrap());
        let mut other = sample_signal();
        other.direction = crate::signal::Direction::Sell;
        assert!(log.record_and_append(other, &path).unwrap());

        // Simulate a torn write.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"symbol\": \"EUR").unwrap();

        let reloaded = SignalLog::load_jsonl(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(&sample_signal().id()));
    }

    #[test]
    fn failed_append_is_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the log's parent directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut log = SignalLog::new();
        assert!(log
            .record_and_append(sample_signal(), &blocker.join("signals.jsonl"))
            .is_err());
        assert!(log.is_empty());
        assert!(!log.contains(&sample_signal().id()));

        let path = dir.path().join("signals.jsonl");
        assert!(log.record_and_append(sample_signal(), &path).unwrap());
        assert_eq!(SignalLog::load_jsonl(&path).unwrap().len(), 1);
    }

    #[test]
    fn missing_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = SignalLog::load_jsonl(&dir.path().join("absent.jsonl")).unwrap();
        assert!(log.is_empty());
    }
}
