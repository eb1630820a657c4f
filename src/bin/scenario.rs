//! Single Scenario Binary
//!
//! Estimates win probabilities for one strategy pair and prints the sample
//! trajectory of the first trial.
//!
//! ## Usage
//! ```bash
//! cargo run --bin scenario --release -- --strategy-a BD --strategy-b MC --seed 1
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use electoral_sim::{load_model, run_scenario, ElectoralModel, PlayerId, RawInputs, SamplerKind};

#[derive(Parser)]
#[command(name = "scenario")]
#[command(about = "Monte Carlo win probabilities for one strategy pair", version)]
struct Cli {
    /// Strategy played by A
    #[arg(long = "strategy-a", default_value = "BD")]
    strategy_a: String,

    /// Strategy played by B
    #[arg(long = "strategy-b", default_value = "BD")]
    strategy_b: String,

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

    /// Print the result as JSON
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
    let result = run_scenario(
        &model,
        &cli.strategy_a,
        &cli.strategy_b,
        true,
        &mut *source,
    )
    .with_context(|| format!("scenario {} vs {}", cli.strategy_a, cli.strategy_b))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let name_a = &model.player(PlayerId::A).name;
    let name_b = &model.player(PlayerId::B).name;

    println!("=======================================================");
    println!("  {}", model.metadata.title);
    println!("=======================================================");
    println!();
    println!("Parameters:");
    println!(
        "  Base support: {} {:.1}%, {} {:.1}%",
        name_a,
        model.base_support(PlayerId::A) * 100.0,
        name_b,
        model.base_support(PlayerId::B) * 100.0
    );
    println!(
        "  Sigma: {}, Iterations: {}, Time steps: {}",
        model.sigma(),
        model.iterations(),
        model.time_steps()
    );
    println!("  Sampler: {}", cli.sampler.name());
    println!();
    println!(
        "Strategies: {} (A) plays {}, {} (B) plays {}",
        name_a, result.strategy_a, name_b, result.strategy_b
    );
    println!("{}", "-".repeat(50));
    println!("  P({} wins): {:.1} %", name_a, result.prob_a * 100.0);
    println!("  P({} wins): {:.1} %", name_b, result.prob_b * 100.0);
    println!();

    println!("Sample trajectory (trial 1):");
    println!("| Step | {:>9} | {:>9} |", format!("{name_a} (A)"), format!("{name_b} (B)"));
    println!("|------|-----------|-----------|");
    let labels = result.path_a.labels();
    let pct_a = result.path_a.percentages();
    let pct_b = result.path_b.percentages();
    for ((label, a), b) in labels.iter().zip(&pct_a).zip(&pct_b) {
        println!("| {:4} | {:8.2}% | {:8.2}% |", label, a, b);
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
