// mod.rs - Cluster output module

use std::collections::HashSet;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use bio::io::fasta;
use rayon::prelude::*;

use crate::core::Cluster;
use crate::data::{SequenceRecord, SequenceStore};
use crate::error::{Error, Result};

/// Minimum number of distinct taxa for a cluster to be phylogenetically
/// informative.
pub const DEFAULT_MIN_TAXA: usize = 4;

/// One surviving cluster, ready to be aligned downstream.
#[derive(Debug)]
pub struct ClusterFile {
    pub path: PathBuf,
    pub sequences: usize,
    pub taxa: usize,
}

/// Distinct taxa in a cluster, in first-seen order.
pub fn distinct_taxa<S>(store: &S, cluster: &Cluster) -> Result<Vec<String>>
where
    S: SequenceStore + ?Sized,
{
    let mut seen = HashSet::new();
    let mut taxa = Vec::new();
    for key in cluster {
        let taxon = store.lookup(key)?.taxon();
        if seen.insert(taxon.clone()) {
            taxa.push(taxon);
        }
    }
    Ok(taxa)
}

/// Keep phylogenetically informative clusters, deduplicate each by taxon
/// (first sequence per taxon wins), and write one FASTA file per survivor
/// under `output_dir`. Files are numbered in cluster order.
pub fn write_cluster_files<S>(
    store: &S,
    clusters: &[Cluster],
    output_dir: &Path,
    min_taxa: usize,
) -> Result<Vec<ClusterFile>>
where
    S: SequenceStore + ?Sized,
{
    create_dir_all(output_dir)?;

    // Filter and dedupe sequentially so file numbering stays stable
    let mut informative: Vec<Vec<&SequenceRecord>> = Vec::new();
    for cluster in clusters {
        let taxa = distinct_taxa(store, cluster)?;
        if taxa.len() < min_taxa {
            continue;
        }
        let mut kept = Vec::new();
        let mut taxa_in_cluster = HashSet::new();
        for key in cluster {
            let record = store.lookup(key)?;
            if taxa_in_cluster.insert(record.taxon()) {
                kept.push(record);
            }
        }
        informative.push(kept);
    }

    let discarded = clusters.len() - informative.len();
    println!(
        "📁 Writing {} informative clusters to {} ({} discarded with < {} taxa)",
        informative.len(),
        output_dir.display(),
        discarded,
        min_taxa
    );

    let files: Vec<ClusterFile> = informative
        .par_iter()
        .enumerate()
        .map(|(i, records)| write_cluster_fasta(output_dir, i, records))
        .collect::<Result<Vec<_>>>()?;

    for file in &files {
        println!(
            "  📄 {}: {} sequences, {} taxa",
            file.path.display(),
            file.sequences,
            file.taxa
        );
    }

    Ok(files)
}

fn write_cluster_fasta(
    output_dir: &Path,
    index: usize,
    records: &[&SequenceRecord],
) -> Result<ClusterFile> {
    let path = output_dir.join(format!("{}.fasta", index));
    let mut writer = fasta::Writer::to_file(&path)
        .map_err(|e| Error::fasta(format!("failed to create {}: {}", path.display(), e)))?;

    let mut taxa = HashSet::new();
    for record in records {
        let description = (!record.description.is_empty()).then_some(record.description.as_str());
        writer
            .write(&record.id, description, &record.seq)
            .map_err(|e| Error::fasta(format!("failed to write {}: {}", path.display(), e)))?;
        taxa.insert(record.taxon());
    }

    Ok(ClusterFile {
        path,
        sequences: records.len(),
        taxa: taxa.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FastaStore, SequenceKey};

    fn store_with(entries: &[(&str, &str)]) -> FastaStore {
        let mut store = FastaStore::new();
        for (id, description) in entries {
            store.insert(SequenceRecord::new(
                id.to_string(),
                description.to_string(),
                b"ACGT".to_vec(),
            ));
        }
        store
    }

    fn cluster(ids: &[&str]) -> Cluster {
        ids.iter().map(|id| SequenceKey::from(*id)).collect()
    }

    #[test]
    fn test_distinct_taxa_order() {
        let store = store_with(&[
            ("A1", "Genus one rbcL"),
            ("A2", "Genus two rbcL"),
            ("A3", "Genus one matK"),
        ]);
        let taxa = distinct_taxa(&store, &cluster(&["A1", "A2", "A3"])).unwrap();
        assert_eq!(taxa, vec!["Genus one", "Genus two"]);
    }

    #[test]
    fn test_uninformative_clusters_discarded() {
        let store = store_with(&[
            ("A1", "Genus one rbcL"),
            ("A2", "Genus two rbcL"),
            ("A3", "Genus three rbcL"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let files = write_cluster_files(
            &store,
            &[cluster(&["A1", "A2", "A3"])],
            dir.path(),
            DEFAULT_MIN_TAXA,
        )
        .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_taxon_dedupe_keeps_first() {
        let store = store_with(&[
            ("A1", "Genus one rbcL"),
            ("A2", "Genus one rbcL duplicate"),
            ("B1", "Genus two rbcL"),
            ("C1", "Genus three rbcL"),
            ("D1", "Genus four rbcL"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let files = write_cluster_files(
            &store,
            &[cluster(&["A1", "A2", "B1", "C1", "D1"])],
            dir.path(),
            4,
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].sequences, 4);
        assert_eq!(files[0].taxa, 4);

        let content = std::fs::read_to_string(&files[0].path).unwrap();
        assert!(content.contains(">A1"));
        assert!(!content.contains(">A2"));
    }

    #[test]
    fn test_files_numbered_in_cluster_order() {
        let store = store_with(&[
            ("A1", "Genus one rbcL"),
            ("B1", "Genus two rbcL"),
            ("C1", "Genus three rbcL"),
            ("D1", "Genus four rbcL"),
            ("E1", "Genus five matK"),
            ("F1", "Genus six matK"),
            ("G1", "Genus seven matK"),
            ("H1", "Genus eight matK"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let files = write_cluster_files(
            &store,
            &[
                cluster(&["A1", "B1", "C1", "D1"]),
                cluster(&["E1"]),
                cluster(&["E1", "F1", "G1", "H1"]),
            ],
            dir.path(),
            4,
        )
        .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].path.ends_with("0.fasta"));
        assert!(files[1].path.ends_with("1.fasta"));
    }
}
