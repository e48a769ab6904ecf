// main.rs - CLI entry point

use std::time::Instant;

use sumclust::cli::Config;
use sumclust::error::Result;
use sumclust::output::write_cluster_files;
use sumclust::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<()> {
    let mut args: Args = argh::from_env();

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified; command line wins
    if let Some(config_path) = args.config.clone() {
        Config::from_file(&config_path)?.apply_to(&mut args);
    }

    let settings = validate_args(&args)?;

    println!("🚀 sumclust v{}", sumclust::VERSION);
    println!("🧵 Workers: {}", settings.workers);
    println!(
        "📏 Length similarity threshold: {}",
        settings.length_threshold
    );

    let total_start = Instant::now();

    // Index all candidate sequences
    let store = FastaStore::from_path(&settings.sequences)?;
    let keys = select_keys(&store, &settings)?;
    println!("🔑 {} sequences selected for clustering", keys.len());

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    let coordinator = WorkCoordinator::new(settings.workers);
    let comparator = BlastnComparator::new(settings.blastn_path.clone());

    // Exactly one of the two paths runs per invocation
    let clusters = match &settings.guide {
        Some(guide_path) => {
            let guides = load_guide_sequences(guide_path)?;
            println!("🧭 Using {} guide sequences to define clusters", guides.len());
            GuidedClusterBuilder::new(settings.length_threshold, coordinator).build(
                &store,
                &guides,
                &keys,
                &comparator,
            )?
        }
        None => {
            println!(
                "🔄 All-by-all clustering with e-value threshold {:e}",
                settings.distance_threshold
            );
            let matrix = DistanceMatrixBuilder::new(settings.length_threshold, coordinator)
                .build(&store, &keys, &comparator)?;
            ClusterEngine::new(settings.distance_threshold).cluster(&keys, matrix)?
        }
    };
    println!("🧩 {} raw clusters built", clusters.len());

    let files = write_cluster_files(&store, &clusters, &settings.output_dir, settings.min_taxa)?;

    println!(
        "✅ {} informative clusters written in {:.2}s",
        files.len(),
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// All store keys, in file order, reduced by the optional taxon filters.
fn select_keys(store: &FastaStore, settings: &RunSettings) -> Result<Vec<SequenceKey>> {
    let mut keys = Vec::new();
    for key in store.keys() {
        let record = store.lookup(&key)?;
        if let Some(include) = &settings.include_taxa {
            if !include.is_match(&record.description) {
                continue;
            }
        }
        if let Some(exclude) = &settings.exclude_taxa {
            if exclude.is_match(&record.description) {
                continue;
            }
        }
        keys.push(key);
    }
    Ok(keys)
}
