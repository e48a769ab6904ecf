// validation.rs - Input validation utilities

use std::path::PathBuf;

use regex::Regex;

use crate::cli::args::Args;
use crate::core::DEFAULT_DISTANCE_THRESHOLD;
use crate::error::{Error, Result};
use crate::output::DEFAULT_MIN_TAXA;

/// Fully resolved run settings after defaults and validation.
pub struct RunSettings {
    pub sequences: PathBuf,
    pub guide: Option<PathBuf>,
    pub distance_threshold: f64,
    pub length_threshold: f64,
    pub output_dir: PathBuf,
    pub min_taxa: usize,
    pub workers: usize,
    pub blastn_path: PathBuf,
    pub include_taxa: Option<Regex>,
    pub exclude_taxa: Option<Regex>,
}

/// Validate all command line arguments and resolve defaults
pub fn validate_args(args: &Args) -> Result<RunSettings> {
    let sequences = args
        .sequences
        .as_ref()
        .ok_or_else(|| Error::config("--sequences is required"))?;

    let length_threshold = args.length.unwrap_or(0.5);
    if length_threshold <= 0.0 || length_threshold > 1.0 {
        return Err(Error::config(
            "length threshold must be in (0, 1]".to_string(),
        ));
    }

    let distance_threshold = args.evalue.unwrap_or(DEFAULT_DISTANCE_THRESHOLD);
    if distance_threshold < 0.0 || !distance_threshold.is_finite() {
        return Err(Error::config(
            "e-value threshold must be a non-negative number".to_string(),
        ));
    }

    if args.threads == Some(0) {
        return Err(Error::config("--threads must be at least 1".to_string()));
    }
    let workers = args.threads.unwrap_or_else(num_cpus::get);

    let guide = match &args.guide {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.is_file() {
                return Err(Error::MissingGuideFile(path));
            }
            Some(path)
        }
        None => None,
    };

    let include_taxa = compile_filter(&args.include_taxa, "include-taxa")?;
    let exclude_taxa = compile_filter(&args.exclude_taxa, "exclude-taxa")?;

    Ok(RunSettings {
        sequences: PathBuf::from(sequences),
        guide,
        distance_threshold,
        length_threshold,
        output_dir: PathBuf::from(args.output_dir.as_deref().unwrap_or("clusters")),
        min_taxa: args.min_taxa.unwrap_or(DEFAULT_MIN_TAXA),
        workers,
        blastn_path: PathBuf::from(args.blastn_path.as_deref().unwrap_or("blastn")),
        include_taxa,
        exclude_taxa,
    })
}

fn compile_filter(pattern: &Option<String>, name: &str) -> Result<Option<Regex>> {
    match pattern {
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|e| Error::config(format!("invalid {} regex: {}", name, e))),
        None => Ok(None),
    }
}
