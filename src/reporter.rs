use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::alerts::Alert;

/// Persists the alert buffer to a JSON file.
///
/// Each flush overwrites the file with the full buffer; the file always holds
/// the alerts from the most recent non-empty cycle.
pub struct Reporter {
    path: PathBuf,
}

impl Reporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write the buffer out and clear it. An empty buffer is a no-op.
    ///
    /// On failure the buffer is left untouched so nothing is dropped; the
    /// caller logs the error and retries on the next cycle.
    pub fn flush(&self, alerts: &mut Vec<Alert>) -> Result<usize> {
        if alerts.is_empty() {
            return Ok(0);
        }

        ensure_parent(&self.path)
            .with_context(|| format!("creating directory for {}", self.path.display()))?;
        let json = serde_json::to_string_pretty(&alerts).context("serializing alerts")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;

        let count = alerts.len();
        info!("Saved {count} alerts to {}", self.path.display());
        alerts.clear();
        Ok(count)
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_alerts(count: usize) -> Vec<Alert> {
        (0..count)
            .map(|i| Alert::cpu(80.0 + i as f64, 80.0))
            .collect()
    }

    #[test]
    fn flush_writes_every_alert_and_drains_the_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        let reporter = Reporter::new(path.clone());

        let mut alerts = sample_alerts(3);
        let written = reporter.flush(&mut alerts).unwrap();

        assert_eq!(written, 3);
        assert!(alerts.is_empty());

        let content = fs::read_to_string(&path).unwrap();
        let parsed: Vec<Alert> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn flush_overwrites_the_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        let reporter = Reporter::new(path.clone());

        let mut first = sample_alerts(3);
        reporter.flush(&mut first).unwrap();
        let mut second = sample_alerts(1);
        reporter.flush(&mut second).unwrap();

        let parsed: Vec<Alert> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn empty_buffer_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        let reporter = Reporter::new(path.clone());

        let mut alerts = Vec::new();
        assert_eq!(reporter.flush(&mut alerts).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("alerts.json");
        let reporter = Reporter::new(path.clone());

        let mut alerts = sample_alerts(1);
        reporter.flush(&mut alerts).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn failed_flush_leaves_the_buffer_untouched() {
        let dir = tempdir().unwrap();
        // A regular file where the directory should be makes create_dir_all
        // fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let reporter = Reporter::new(blocker.join("sub").join("alerts.json"));

        let mut alerts = sample_alerts(2);
        assert!(reporter.flush(&mut alerts).is_err());
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn round_trip_preserves_field_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alerts.json");
        let reporter = Reporter::new(path.clone());

        let mut alerts = vec![
            Alert::cpu(91.2, 80.0),
            Alert::memory(88.0, 85.0, 6 * 1024 * 1024 * 1024),
            Alert::disk(95.0, 90.0, 9 * 1024 * 1024 * 1024),
        ];
        let original = alerts.clone();
        reporter.flush(&mut alerts).unwrap();

        let parsed: Vec<Alert> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }
}
