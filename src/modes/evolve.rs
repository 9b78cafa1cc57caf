//! Evolution mode
//!
//! Runs the genetic driver for a fixed number of generations, reporting
//! progress as it goes, and hands back the champion genome at the end.
//!
//! # Example
//!
//! ```rust,no_run
//! use evo_snake::evolution::EvolutionConfig;
//! use evo_snake::modes::{EvolveConfig, EvolveMode};
//!
//! let config = EvolveConfig::new(100, EvolutionConfig::default());
//! let mut mode = EvolveMode::new(config)?;
//! let champion = mode.run()?;
//! println!("{}", champion.to_json()?);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};

use crate::evolution::{EvolutionConfig, GenerationSummary, GeneticDriver};
use crate::metrics::EvolutionStats;
use crate::neural::GenomeRecord;

/// Configuration for evolution mode
#[derive(Debug, Clone)]
pub struct EvolveConfig {
    /// Number of generations to run
    pub generations: usize,

    /// Print rolling statistics every N generations
    pub log_frequency: usize,

    /// Generations kept in the rolling statistics window
    pub stats_window: usize,

    pub evolution: EvolutionConfig,
}

impl EvolveConfig {
    pub fn new(generations: usize, evolution: EvolutionConfig) -> Self {
        Self {
            generations,
            log_frequency: 10,
            stats_window: 20,
            evolution,
        }
    }
}

pub struct EvolveMode {
    driver: GeneticDriver,
    stats: EvolutionStats,
    config: EvolveConfig,
    last_summary: Option<GenerationSummary>,
}

impl EvolveMode {
    pub fn new(config: EvolveConfig) -> Result<Self> {
        let driver = GeneticDriver::new(config.evolution.clone())
            .context("Failed to initialize genetic driver")?;
        let stats = EvolutionStats::new(config.stats_window.max(1));

        Ok(Self {
            driver,
            stats,
            config,
            last_summary: None,
        })
    }

    pub fn stats(&self) -> &EvolutionStats {
        &self.stats
    }

    pub fn last_summary(&self) -> Option<&GenerationSummary> {
        self.last_summary.as_ref()
    }

    /// Run every generation and return the final champion's genome
    pub fn run(&mut self) -> Result<GenomeRecord> {
        self.print_header();

        for generation in 0..self.config.generations {
            let summary = self
                .driver
                .run_generation()
                .with_context(|| format!("Generation {} failed", generation))?;
            self.stats.record_generation(&summary);
            self.last_summary = Some(summary);

            let completed = generation + 1;
            if self.config.log_frequency > 0 && completed % self.config.log_frequency == 0 {
                self.print_progress(completed);
            }
        }

        let champion = self
            .driver
            .champion()
            .context("No generation was evaluated, nothing to report")?;

        println!("\nEvolution complete!");
        println!("{}", self.stats.format_summary());

        Ok(champion.to_record())
    }

    fn print_header(&self) {
        let evo = &self.config.evolution;
        println!("{}", "=".repeat(70));
        println!("Neuroevolution - Snake");
        println!("{}", "=".repeat(70));
        println!("Generations: {}", self.config.generations);
        println!(
            "Board: {}x{} grid",
            evo.game.grid_width, evo.game.grid_height
        );
        println!("Population: {}", evo.population_size);
        println!("  Elitism: {}", evo.elitism);
        println!("  Tournament size: {}", evo.tournament_size);
        println!("  Mutation rate: {}", evo.mutation_rate);
        println!("  Mutation std dev: {}", evo.network.mutation_std_dev);
        println!("  Layers: {:?}", evo.network.layer_sizes());
        println!("Step cap: {}", evo.step_cap());
        println!("Workers: {}", evo.workers);
        println!("Seed: {}", evo.seed);
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, generation: usize) {
        println!(
            "[Generation {}/{}] {}",
            generation,
            self.config.generations,
            self.stats.format_summary()
        );
    }
}
