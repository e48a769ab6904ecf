// config.rs - Configuration file support

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::args::Args;
use crate::error::{Error, Result};

/// Settings read from a TOML file. Command line arguments override these.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub sequences: Option<String>,
    pub guide: Option<String>,
    pub output_dir: Option<String>,

    // Clustering
    pub evalue: Option<f64>,
    pub length: Option<f64>,
    pub min_taxa: Option<usize>,

    // Taxon filtering
    pub include_taxa: Option<String>,
    pub exclude_taxa: Option<String>,

    // Performance
    pub threads: Option<usize>,

    // External tools
    pub blastn_path: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::config(format!("failed to parse config file '{}': {}", path.display(), e))
        })?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Fill in any argument the command line left unset
    pub fn apply_to(self, args: &mut Args) {
        args.sequences = args.sequences.take().or(self.sequences);
        args.guide = args.guide.take().or(self.guide);
        args.output_dir = args.output_dir.take().or(self.output_dir);
        args.evalue = args.evalue.or(self.evalue);
        args.length = args.length.or(self.length);
        args.min_taxa = args.min_taxa.or(self.min_taxa);
        args.include_taxa = args.include_taxa.take().or(self.include_taxa);
        args.exclude_taxa = args.exclude_taxa.take().or(self.exclude_taxa);
        args.threads = args.threads.or(self.threads);
        args.blastn_path = args.blastn_path.take().or(self.blastn_path);
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# sumclust.toml - Configuration file for sumclust
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Path to a FASTA file or a directory of FASTA files to cluster
sequences = "/path/to/sequences"

# FASTA file of guide sequences (omit for all-by-all clustering)
# guide = "guides.fasta"

# Output directory for cluster FASTA files
output_dir = "clusters"

# =============================================================================
# CLUSTERING
# =============================================================================

# BLAST e-value threshold to merge clusters
evalue = 1e-10

# Threshold of sequence length percent similarity, in (0, 1]
length = 0.5

# Minimum number of distinct taxa per output cluster
min_taxa = 4

# =============================================================================
# TAXON FILTERING
# =============================================================================

# Include only sequences whose description matches regex pattern
# include_taxa = "Onagraceae.*"

# Exclude sequences whose description matches regex pattern
# exclude_taxa = "uncultured.*"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of worker threads (omit for auto-detection)
# threads = 16

# =============================================================================
# EXTERNAL TOOLS
# =============================================================================

# Path to the blastn binary
blastn_path = "blastn"
"#
        .to_string()
    }
}
