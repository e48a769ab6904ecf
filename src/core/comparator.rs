// comparator.rs - External similarity scoring oracle

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tempfile::NamedTempFile;

use crate::data::SequenceRecord;
use crate::error::{Error, Result};

/// Pairwise similarity oracle consumed by the builders.
///
/// Scores are e-value-like: non-negative, smaller = more similar. `None`
/// means no significant hit. Implementations must be deterministic for a
/// fixed pair of inputs; the matrix builder relies on that to make its
/// redundant-computation race benign.
pub trait SequenceComparator: Send + Sync {
    fn compare(&self, subject: &SequenceRecord, query: &SequenceRecord) -> Result<Option<f64>>;
}

/// Comparator backed by the external `blastn` binary.
///
/// Each call writes subject and query to their own temporary FASTA files and
/// parses the best-hit e-value from tabular output. The temp files are
/// deleted when they drop, whether or not the comparison succeeds.
pub struct BlastnComparator {
    blastn_path: PathBuf,
}

impl BlastnComparator {
    pub fn new<P: Into<PathBuf>>(blastn_path: P) -> Self {
        Self {
            blastn_path: blastn_path.into(),
        }
    }

    fn write_fasta(record: &SequenceRecord) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, ">{} {}", record.id, record.description)?;
        file.write_all(&record.seq)?;
        writeln!(file)?;
        file.flush()?;
        Ok(file)
    }
}

impl Default for BlastnComparator {
    fn default() -> Self {
        Self::new("blastn")
    }
}

impl SequenceComparator for BlastnComparator {
    fn compare(&self, subject: &SequenceRecord, query: &SequenceRecord) -> Result<Option<f64>> {
        let subject_file = Self::write_fasta(subject)?;
        let query_file = Self::write_fasta(query)?;

        let output = Command::new(&self.blastn_path)
            .arg("-subject")
            .arg(subject_file.path())
            .arg("-query")
            .arg(query_file.path())
            .arg("-outfmt")
            .arg("6 evalue")
            .output()
            .map_err(|e| {
                Error::comparator(format!(
                    "failed to run {}: {}",
                    self.blastn_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(Error::comparator(format!(
                "blastn exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_best_evalue(&String::from_utf8_lossy(&output.stdout))
    }
}

/// First line of tabular output carries the best hit's e-value.
/// No lines at all means no significant hit.
fn parse_best_evalue(stdout: &str) -> Result<Option<f64>> {
    match stdout.lines().find(|line| !line.trim().is_empty()) {
        None => Ok(None),
        Some(line) => {
            let evalue: f64 = line
                .trim()
                .parse()
                .map_err(|_| Error::comparator(format!("malformed blastn e-value: '{}'", line)))?;
            if evalue < 0.0 {
                return Err(Error::comparator(format!(
                    "negative blastn e-value: {}",
                    evalue
                )));
            }
            Ok(Some(evalue))
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;

    /// Deterministic table-backed comparator for tests. Scores are stored
    /// symmetrically; pairs absent from the table score as no hit.
    #[derive(Default)]
    pub struct TableComparator {
        scores: HashMap<(String, String), f64>,
    }

    impl TableComparator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_score(mut self, a: &str, b: &str, score: f64) -> Self {
            self.scores.insert((a.to_string(), b.to_string()), score);
            self.scores.insert((b.to_string(), a.to_string()), score);
            self
        }
    }

    impl SequenceComparator for TableComparator {
        fn compare(
            &self,
            subject: &SequenceRecord,
            query: &SequenceRecord,
        ) -> Result<Option<f64>> {
            Ok(self
                .scores
                .get(&(subject.id.clone(), query.id.clone()))
                .copied())
        }
    }

    /// Comparator whose every call is a fatal failure.
    pub struct FailingComparator;

    impl SequenceComparator for FailingComparator {
        fn compare(&self, _: &SequenceRecord, _: &SequenceRecord) -> Result<Option<f64>> {
            Err(Error::comparator("mock scorer failure"))
        }
    }
}
