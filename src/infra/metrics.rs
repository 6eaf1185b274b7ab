// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records the average training loss to a CSV file after each
// fine-tuning epoch.
//
// Why log metrics to CSV?
//   - Easy to open in a spreadsheet
//   - Can plot learning curves to diagnose training issues
//   - Provides a permanent record of each training run
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,avg_loss
//   1,3.124500
//   2,2.890100
//   ...
//
// The loss should decrease each epoch; a flat or rising curve on
// this small curated dataset usually means the correction log fed
// in contradictory targets.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all batches in this epoch
    pub avg_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, avg_loss: f64) -> Self {
        Self { epoch, avg_loss }
    }
}

/// Appends epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,avg_loss")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6}", m.epoch, m.avg_loss)?;

        tracing::debug!("Logged epoch {} metrics: avg_loss={:.4}", m.epoch, m.avg_loss);
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_header_then_rows() {
        let dir    = TempDir::new().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 3.1245)).unwrap();
        logger.log(&EpochMetrics::new(2, 2.8901)).unwrap();

        let content = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "epoch,avg_loss");
        assert_eq!(lines[1], "1,3.124500");
        assert_eq!(lines[2], "2,2.890100");
    }

    #[test]
    fn test_reopening_appends_without_duplicate_header() {
        let dir = TempDir::new().unwrap();
        MetricsLogger::new(dir.path()).unwrap().log(&EpochMetrics::new(1, 1.0)).unwrap();
        MetricsLogger::new(dir.path()).unwrap().log(&EpochMetrics::new(2, 0.5)).unwrap();

        let content = fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(content.matches("epoch,avg_loss").count(), 1);
        assert_eq!(content.lines().count(), 3);
    }
}
