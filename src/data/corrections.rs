// ============================================================
// Layer 4 — Correction Log
// ============================================================
// User-submitted corrections live in a plain tab-separated file,
// one "question<TAB>corrected answer" pair per line. An external
// collaborator (or the `correct` subcommand) appends to it; the
// training pipeline consumes it on the next run.
//
// Malformed lines — anything without exactly one tab — are skipped
// with a warning, never fatal: one bad submission must not block a
// whole training run. A missing file just means no corrections yet.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::domain::training_example::TrainingExample;
use crate::domain::traits::ExampleSource;

pub struct CorrectionLog {
    path: PathBuf,
}

impl CorrectionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one correction as a single well-formed log line.
    ///
    /// Interior tabs and newlines in either field are flattened to
    /// spaces first, so a submission can never produce a line the
    /// reader would later have to skip as malformed.
    pub fn append(&self, question: &str, corrected_answer: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open correction log '{}'", self.path.display()))?;

        writeln!(file, "{}\t{}", flatten(question), flatten(corrected_answer))
            .with_context(|| format!("Cannot append to '{}'", self.path.display()))?;

        tracing::debug!("Recorded correction in '{}'", self.path.display());
        Ok(())
    }
}

impl ExampleSource for CorrectionLog {
    fn load_examples(&self) -> Result<Vec<TrainingExample>> {
        if !self.path.exists() {
            tracing::info!(
                "No correction log at '{}' — training on curated examples only",
                self.path.display()
            );
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read correction log '{}'", self.path.display()))?;

        let mut examples = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            match fields.as_slice() {
                [question, answer] => {
                    examples.push(TrainingExample::from_correction(question, answer));
                }
                _ => tracing::warn!("Skipping malformed correction: {line}"),
            }
        }

        tracing::info!("Loaded {} corrections", examples.len());
        Ok(examples)
    }
}

/// Replace field-breaking characters with single spaces.
fn flatten(field: &str) -> String {
    field
        .split(['\t', '\n', '\r'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::training_example::build_input_text;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        let log = CorrectionLog::new(dir.path().join("user_corrections.txt"));
        assert!(log.load_examples().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("user_corrections.txt");
        fs::write(
            &path,
            "q one\ta one\nno tab at all\nq\ttoo\tmany tabs\nq two\ta two\n",
        )
        .unwrap();

        let examples = CorrectionLog::new(&path).load_examples().unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].input_text, build_input_text("q one"));
        assert_eq!(examples[0].output_text, "a one");
        assert_eq!(examples[1].output_text, "a two");
    }

    #[test]
    fn test_append_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let log = CorrectionLog::new(dir.path().join("user_corrections.txt"));
        log.append("A 5N force on a 2m lever.", "Torque = 10 Nm").unwrap();
        log.append("Second question", "Second answer").unwrap();

        let examples = log.load_examples().unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[1].output_text, "Second answer");
    }

    #[test]
    fn test_append_flattens_field_breakers() {
        let dir = TempDir::new().unwrap();
        let log = CorrectionLog::new(dir.path().join("user_corrections.txt"));
        log.append("tabbed\tquestion", "multi\nline answer").unwrap();

        let examples = log.load_examples().unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].output_text, "multi line answer");
        assert!(examples[0].input_text.contains("tabbed question"));
    }
}
