// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// sumclust - cluster sequences into phylogenetically informative groups
pub struct Args {
    /// path to a FASTA file or a directory of FASTA files to cluster
    #[argh(option)]
    pub sequences: Option<String>,

    /// FASTA file of guide sequences; skips all-by-all comparisons and
    /// assigns each sequence to a guide-seeded cluster
    #[argh(option)]
    pub guide: Option<String>,

    /// e-value threshold to merge clusters (default: 1e-10)
    #[argh(option)]
    pub evalue: Option<f64>,

    /// threshold of sequence length percent similarity, in (0, 1] (default: 0.5)
    #[argh(option)]
    pub length: Option<f64>,

    /// output directory for cluster FASTA files (default: clusters)
    #[argh(option)]
    pub output_dir: Option<String>,

    /// minimum number of distinct taxa per output cluster (default: 4)
    #[argh(option)]
    pub min_taxa: Option<usize>,

    /// include only sequences whose description matches regex pattern
    #[argh(option)]
    pub include_taxa: Option<String>,

    /// exclude sequences whose description matches regex pattern
    #[argh(option)]
    pub exclude_taxa: Option<String>,

    /// number of worker threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// path to the blastn binary (default: blastn)
    #[argh(option)]
    pub blastn_path: Option<String>,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// validate inputs without clustering (dry run)
    #[argh(switch)]
    pub dry_run: bool,
}
