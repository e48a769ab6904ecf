// record.rs - Sequence records and keys

use std::fmt::{self, Display};

/// Opaque identifier referencing one sequence record in a store.
/// The clustering core only ever passes keys around; the records
/// themselves stay owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceKey(pub String);

impl SequenceKey {
    pub fn new<S: Into<String>>(id: S) -> Self {
        SequenceKey(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SequenceKey {
    fn from(id: &str) -> Self {
        SequenceKey(id.to_string())
    }
}

/// Read-only view of a single sequence record
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    pub id: String,
    pub description: String,
    pub seq: Vec<u8>,
}

impl SequenceRecord {
    pub fn new<S: Into<String>>(id: S, description: S, seq: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            seq,
        }
    }

    pub fn key(&self) -> SequenceKey {
        SequenceKey(self.id.clone())
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// The operational taxonomic unit: the first two whitespace-separated
    /// tokens of the description (e.g. "Lythrum salicaria").
    pub fn taxon(&self) -> String {
        let mut tokens = self.description.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(genus), Some(species)) => format!("{} {}", genus, species),
            (Some(genus), None) => genus.to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxon_from_description() {
        let record = SequenceRecord::new(
            "AF495760.1",
            "Lythrum salicaria chloroplast rbcL-like mRNA, partial sequence",
            b"ATCG".to_vec(),
        );
        assert_eq!(record.taxon(), "Lythrum salicaria");
    }

    #[test]
    fn test_taxon_short_description() {
        let record = SequenceRecord::new("X1", "Lythrum", b"AT".to_vec());
        assert_eq!(record.taxon(), "Lythrum");

        let empty = SequenceRecord::new("X2", "", b"AT".to_vec());
        assert_eq!(empty.taxon(), "");
    }

    #[test]
    fn test_key_roundtrip() {
        let record = SequenceRecord::new("AB123", "Genus species locus", b"ACGT".to_vec());
        assert_eq!(record.key(), SequenceKey::from("AB123"));
        assert_eq!(record.key().as_str(), "AB123");
        assert_eq!(record.len(), 4);
    }
}
