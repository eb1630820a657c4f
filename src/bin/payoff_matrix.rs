//! Payoff Matrix Binary
//!
//! Runs one Monte Carlo scenario per strategy pair and prints the matrix of
//! win probabilities with its pure-strategy equilibria.
//!
//! ## Usage
//! ```bash
//! cargo run --bin payoff_matrix --release -- --iterations 20000 --seed 7
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use electoral_sim::{build_payoff_matrix, load_model, ElectoralModel, PlayerId, RawInputs, SamplerKind};

#[derive(Parser)]
#[command(name = "payoff_matrix")]
#[command(about = "Win-probability payoff matrix over all strategy pairs", version)]
struct Cli {
    #[command(flatten)]
    inputs: RawInputs,

    /// JSON model file (defaults to the built-in calibration)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Normal variate generator
    #[arg(long, value_enum, default_value_t = SamplerKind::BoxMuller)]
    sampler: SamplerKind,

    /// Print the matrix as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let model = match &cli.model {
        Some(path) => load_model(path)?,
        None => ElectoralModel::default(),
    };
    let model = cli.inputs.overlay(model);

    let mut source = cli.sampler.build(cli.seed);
    let matrix = build_payoff_matrix(&model, &mut *source).context("payoff matrix build")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&matrix)?);
        return Ok(());
    }

    println!("=======================================================");
    println!("  {}", model.metadata.title);
    println!("  Payoff Matrix (win probability)");
    println!("=======================================================");
    println!();
    println!("Parameters:");
    println!(
        "  A: {} ({:.1}%), B: {} ({:.1}%)",
        model.player(PlayerId::A).name,
        model.base_support(PlayerId::A) * 100.0,
        model.player(PlayerId::B).name,
        model.base_support(PlayerId::B) * 100.0
    );
    println!(
        "  Sigma: {}, Iterations per cell: {}, Time steps: {}",
        model.sigma(),
        model.iterations(),
        model.time_steps()
    );
    println!("  Sampler: {}", cli.sampler.name());
    println!();
    print!("{matrix}");
    println!();

    let equilibria = matrix.pure_equilibria();
    println!("Pure-strategy equilibria:");
    if equilibria.is_empty() {
        println!("  none (look for a mixed equilibrium)");
    }
    for cell in equilibria {
        println!("  ({}, {})  {}", cell.strategy_a, cell.strategy_b, cell);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
