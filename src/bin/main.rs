//! RSSK Command Line Interface
//!
//! Computes subsequence string kernel matrices from sequence lists and
//! writes them as labelled CSV.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use rssk::api::SumStringKernel;
use rssk::core::{Engine, KernelConfig, MatchingMode, Result};
use rssk::data::{save_matrix_csv, write_matrix_csv};
use rssk::kernel::SubstitutionModel;
use rssk::persistence::{load_config, save_config};
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rssk")]
#[command(about = "Gap-weighted subsequence string kernels")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "RSSK Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the kernel matrix of a sequence file
    Matrix(MatrixArgs),
    /// Compute the kernel value of two sequences
    Pair(PairArgs),
}

#[derive(Args)]
struct MatrixArgs {
    /// Sequence file: one sequence per line, optionally "label sequence"
    #[arg(short, long)]
    input: PathBuf,

    /// Second sequence file for the columns (defaults to the input)
    #[arg(short, long)]
    against: Option<PathBuf>,

    /// Output CSV file (prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    kernel: KernelArgs,
}

#[derive(Args)]
struct PairArgs {
    /// First sequence
    x: String,

    /// Second sequence
    y: String,

    #[command(flatten)]
    kernel: KernelArgs,
}

#[derive(Args)]
struct KernelArgs {
    /// JSON configuration file used as the base for all other flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Smallest subsequence length
    #[arg(long)]
    min_k: Option<usize>,

    /// Largest subsequence length
    #[arg(long)]
    max_k: Option<usize>,

    /// Gap decay factor
    #[arg(short, long)]
    lambda: Option<f64>,

    /// Return the raw summed kernel
    #[arg(long)]
    no_normalize: bool,

    /// Normalize each per-length kernel before summing
    #[arg(long)]
    normalize_before: bool,

    /// Worker threads (1 = sequential, 0 = all cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Score letter pairs with a substitution model (identity unless the config has one)
    #[arg(long)]
    soft_matching: bool,

    /// Pair kernel implementation
    #[arg(long)]
    engine: Option<CliEngine>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliEngine {
    /// Dynamic programming recurrence (fast, default)
    #[value(name = "recursive")]
    Recursive,
    /// Explicit subsequence enumeration (exponential, for validation)
    #[value(name = "explicit")]
    Explicit,
}

impl From<CliEngine> for Engine {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::Recursive => Engine::Recursive,
            CliEngine::Explicit => Engine::Explicit,
        }
    }
}

impl KernelArgs {
    /// Configuration file (or defaults) overridden by command-line flags
    fn resolve(&self) -> Result<KernelConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {path:?}");
                load_config(path)?
            }
            None => KernelConfig::default(),
        };

        if let Some(min_k) = self.min_k {
            config.min_k = min_k;
        }
        if let Some(max_k) = self.max_k {
            config.max_k = max_k;
        }
        if let Some(lambda) = self.lambda {
            config.lambda = lambda;
        }
        if self.no_normalize {
            config.normalize = false;
        }
        if self.normalize_before {
            config.normalize_before = true;
        }
        if let Some(workers) = self.workers {
            config.n_workers = workers;
        }
        if self.soft_matching {
            config.matching = MatchingMode::Soft;
            if config.substitution_model.is_none() {
                warn!("No substitution model configured, using the identity model");
                config.substitution_model = Some(Arc::new(SubstitutionModel::identity()));
            }
        }
        if let Some(engine) = self.engine {
            config.engine = engine.into();
        }

        config.validate()?;
        if let Some(path) = &self.save_config {
            save_config(&config, path)?;
            info!("Configuration saved to {path:?}");
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Matrix(args) => matrix_command(args),
        Commands::Pair(args) => pair_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn matrix_command(args: MatrixArgs) -> Result<()> {
    let config = args.kernel.resolve()?;
    info!("Input file: {:?}", args.input);
    info!(
        "Parameters: k={}..={}, lambda={}, normalize={}, workers={}",
        config.min_k, config.max_k, config.lambda, config.normalize, config.n_workers
    );

    let start = Instant::now();
    let kernel = SumStringKernel::new().with_config(config);
    let result = kernel.transform_files(&args.input, args.against.as_ref())?;
    info!(
        "Computed {}x{} kernel matrix in {:.2?}",
        result.matrix.rows(),
        result.matrix.cols(),
        start.elapsed()
    );

    match &args.output {
        Some(path) => {
            save_matrix_csv(path, &result.matrix, &result.row_labels, &result.col_labels)?;
            info!("Kernel matrix saved to {path:?}");
        }
        None => {
            let stdout = io::stdout();
            write_matrix_csv(
                stdout.lock(),
                &result.matrix,
                &result.row_labels,
                &result.col_labels,
            )?;
        }
    }

    Ok(())
}

fn pair_command(args: PairArgs) -> Result<()> {
    let config = args.kernel.resolve()?;
    let kernel = SumStringKernel::new().with_config(config);
    let value = kernel.pairwise(&args.x, &args.y)?;
    println!("{value}");
    Ok(())
}
