// store.rs - FASTA-backed sequence store

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bio::io::fasta;

use crate::data::record::{SequenceKey, SequenceRecord};
use crate::error::{Error, Result};

/// Lookup interface consumed by the clustering core.
/// Keys reference records owned by the store; the core never owns sequences.
pub trait SequenceStore: Send + Sync {
    fn lookup(&self, key: &SequenceKey) -> Result<&SequenceRecord>;
}

/// In-memory store of FASTA records, keyed by record id.
#[derive(Debug, Default)]
pub struct FastaStore {
    records: HashMap<SequenceKey, SequenceRecord>,
    // Keys in file order, so runs are reproducible
    order: Vec<SequenceKey>,
}

impl FastaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a FASTA file or a directory of .fasta/.fa files.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut store = Self::new();
        if path.is_dir() {
            println!("🧬 Loading sequences from directory: {}", path.display());
            store.load_directory(path)?;
        } else if path.is_file() {
            println!("🧬 Loading sequences from file: {}", path.display());
            store.load_fasta(path)?;
        } else {
            return Err(Error::config(format!(
                "sequence path does not exist: {}",
                path.display()
            )));
        }
        println!("✅ {} sequences indexed", store.len());
        Ok(store)
    }

    fn load_directory(&mut self, dir: &Path) -> Result<()> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("fasta") | Some("fa")
                )
            })
            .collect();
        paths.sort();
        for path in paths {
            self.load_fasta(&path)?;
        }
        Ok(())
    }

    fn load_fasta(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let reader = fasta::Reader::new(BufReader::new(file));
        for result in reader.records() {
            let record = result.map_err(|e| {
                Error::fasta(format!("invalid record in {}: {}", path.display(), e))
            })?;
            self.insert(record_from_fasta(&record));
        }
        Ok(())
    }

    pub fn insert(&mut self, record: SequenceRecord) {
        let key = record.key();
        if self.records.insert(key.clone(), record).is_none() {
            self.order.push(key);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All keys in file order.
    pub fn keys(&self) -> Vec<SequenceKey> {
        self.order.clone()
    }
}

impl SequenceStore for FastaStore {
    fn lookup(&self, key: &SequenceKey) -> Result<&SequenceRecord> {
        self.records
            .get(key)
            .ok_or_else(|| Error::MissingSequence(key.to_string()))
    }
}

fn record_from_fasta(record: &fasta::Record) -> SequenceRecord {
    // bio splits the header into id and description; the OTU rule wants
    // the description tokens only, matching the original header layout
    SequenceRecord::new(
        record.id().to_string(),
        record.desc().unwrap_or("").to_string(),
        record.seq().to_vec(),
    )
}

/// Load guide sequences from a FASTA file, in file order.
pub fn load_guide_sequences(path: &Path) -> Result<Vec<SequenceRecord>> {
    if !path.is_file() {
        return Err(Error::MissingGuideFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let reader = fasta::Reader::new(BufReader::new(file));
    let mut guides = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| Error::fasta(format!("invalid record in {}: {}", path.display(), e)))?;
        guides.push(record_from_fasta(&record));
    }
    if guides.is_empty() {
        return Err(Error::EmptyGuideSet(path.to_path_buf()));
    }
    Ok(guides)
}
