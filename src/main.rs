use anyhow::Result;
use clap::Parser;

mod cluster;
mod config;
mod data;
mod ensemble;
mod error;
mod rng;
mod storage;
mod viz;

use config::SigCluConfig;

#[derive(Parser, Debug)]
#[clap(
    name = "sigclu",
    about = "Significance clustering of graph partition ensembles"
)]
struct Cli {
    /// Path to input ensemble JSON file
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "core_results")]
    output_dir: String,

    /// Significance level: fraction of replicates allowed to disagree
    #[clap(long, default_value = "0.05")]
    sig: f64,

    /// Random seed (defaults to the built-in constant)
    #[clap(long)]
    seed: Option<u64>,

    /// Smallest acceptable core size
    #[clap(long, default_value = "6")]
    min_core_size: usize,

    /// Independent annealing attempts per extraction pass
    #[clap(long, default_value = "10")]
    num_trials: usize,

    /// Retries of the search when the best core is undersized
    #[clap(long, default_value = "40")]
    num_exhaustion_loops: usize,

    /// Initial annealing temperature
    #[clap(long, default_value = "10.0")]
    temp_init: f64,

    /// Exponential cooling factor, strictly between 0 and 1
    #[clap(long, default_value = "0.99")]
    cooling_rate: f64,

    /// Penalty scale factor
    #[clap(long, default_value = "20.0")]
    pen_scalar: f64,

    /// Flip trials per sweep as a multiple of the node count
    #[clap(long, default_value = "1")]
    rep_scalar: usize,

    /// Hard cap on annealing sweeps
    #[clap(long, default_value = "1000")]
    max_sweeps: usize,

    /// Start each annealing run from a random subset instead of all nodes
    #[clap(long)]
    random_init: bool,

    /// Skip visualizations
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting significance clustering");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    // 1. Load the ensemble
    let ensemble = data::json::load_ensemble(&args.input)?;

    // 2. Extract cores
    let config = SigCluConfig {
        seed: args.seed.unwrap_or(rng::DEFAULT_SEED),
        sig: args.sig,
        temp_init: args.temp_init,
        cooling_rate: args.cooling_rate,
        pen_scalar: args.pen_scalar,
        rep_scalar: args.rep_scalar,
        min_core_size: args.min_core_size,
        num_trials: args.num_trials,
        num_exhaustion_loops: args.num_exhaustion_loops,
        max_sweeps: args.max_sweeps,
        initialize_all: !args.random_init,
    };

    let mut extractor = cluster::extract::CoreExtractor::new(&ensemble, config)?;
    extractor.run()?;
    let cores = extractor.cores()?;

    log::info!("Found {} cores", cores.len());

    // 3. Save results
    storage::save_results(cores, &ensemble, &args.output_dir)?;

    // 4. Generate visualizations if requested
    if !args.skip_viz {
        viz::generate_visualizations(cores, &ensemble, args.sig, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
