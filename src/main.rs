use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use evo_snake::evolution::EvolutionConfig;
use evo_snake::game::GameConfig;
use evo_snake::modes::{EvolveConfig, EvolveMode, HumanMode};

#[derive(Parser)]
#[command(name = "evo_snake")]
#[command(version, about = "Snake game with evolved neural controllers")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Generations to run in evolve mode
    #[arg(long, default_value = "100")]
    generations: usize,

    /// Population size (overrides the config file)
    #[arg(long)]
    population: Option<usize>,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluation worker threads (overrides the config file)
    #[arg(long)]
    workers: Option<usize>,

    /// JSON evolution config; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Evolve a population of neural controllers
    Evolve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.mode {
        Mode::Human => {
            let defaults = GameConfig::default();
            let config = GameConfig::new(
                cli.width.unwrap_or(defaults.grid_width),
                cli.height.unwrap_or(defaults.grid_height),
            );
            config
                .validate()
                .map_err(anyhow::Error::msg)
                .context("Invalid game configuration")?;

            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        Mode::Evolve => {
            // No subscriber in human mode: log lines would corrupt the TUI
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("evo_snake=info")),
                )
                .init();

            let evolution = evolution_config(&cli)?;
            let generations = cli.generations;

            // Evaluation blocks on the rayon pool
            let champion = tokio::task::spawn_blocking(move || -> Result<_> {
                let mut mode = EvolveMode::new(EvolveConfig::new(generations, evolution))?;
                mode.run()
            })
            .await
            .context("Evolution task panicked")??;

            println!("\nChampion genome:");
            println!("{}", champion.to_json().context("Failed to encode champion")?);
        }
    }

    Ok(())
}

fn evolution_config(cli: &Cli) -> Result<EvolutionConfig> {
    let mut config = match &cli.config {
        Some(path) => EvolutionConfig::from_json_file(path)?,
        None => EvolutionConfig::default(),
    };

    if let Some(width) = cli.width {
        config.game.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.game.grid_height = height;
    }
    if let Some(population) = cli.population {
        config.population_size = population;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    Ok(config)
}
