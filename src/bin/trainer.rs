use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use itemlab::config::load_config;
use itemlab::logging::init_tracing;
use itemlab::training::{ModelSource, SyntheticTrainer};

/// Train the synthetic linear-regression model and write it to disk.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Output model file (defaults to the configured model_path)
    #[clap(short, long)]
    output: Option<PathBuf>,

    #[clap(long)]
    samples: Option<usize>,

    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config().context("Failed to load config")?;
    init_tracing(&config.log_level);

    let mut training = config.training.clone();
    if let Some(samples) = args.samples {
        training.samples = samples;
    }
    if let Some(seed) = args.seed {
        training.seed = seed;
    }
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.model_path));

    let trained = SyntheticTrainer::new(training).produce()?;
    trained.model.save(&output)?;

    println!("Model created and saved to {}", output.display());
    println!("{}", serde_json::to_string_pretty(&trained.report)?);
    Ok(())
}
