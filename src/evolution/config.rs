//! Evolution run configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::game::{GameConfig, Turn, HISTORY_FEATURES};
use crate::neural::NetworkConfig;

/// How an episode turns into a fitness score
///
/// All increments are non-negative. The ratio between survival and capture
/// rewards is a tuning choice, not a fixed rule of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Added for every tick the snake survives
    pub survival_reward: f32,

    /// Added for every food item captured
    pub capture_reward: f32,

    /// Added once when the snake fills the board
    pub win_bonus: f32,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            survival_reward: 1.0,
            capture_reward: 50.0,
            win_bonus: 500.0,
        }
    }
}

impl FitnessWeights {
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, value) in [
            ("survival_reward", self.survival_reward),
            ("capture_reward", self.capture_reward),
            ("win_bonus", self.win_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                ));
            }
        }
        Ok(())
    }
}

/// Configuration for a neuroevolution run
///
/// # Example
///
/// ```rust
/// use evo_snake::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig {
///     population_size: 20,
///     seed: 7,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Number of genomes per generation
    ///
    /// Default: 50
    pub population_size: usize,

    /// Top-ranked genomes copied unmutated into the next generation
    ///
    /// Default: 2
    pub elitism: usize,

    /// Contestants drawn (with replacement) per tournament
    ///
    /// Default: 3
    pub tournament_size: usize,

    /// Per-parameter mutation probability
    ///
    /// Default: 0.05
    pub mutation_rate: f32,

    /// Episode step cap as a multiple of the board's cell count
    ///
    /// Default: 4
    pub step_cap_multiplier: usize,

    /// Worker threads used while evaluating a generation
    ///
    /// Default: 4
    pub workers: usize,

    /// Seed for every random draw of the run
    pub seed: u64,

    pub game: GameConfig,
    pub network: NetworkConfig,
    pub fitness: FitnessWeights,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            elitism: 2,
            tournament_size: 3,
            mutation_rate: 0.05,
            step_cap_multiplier: 4,
            workers: 4,
            seed: 42,
            game: GameConfig::default(),
            network: NetworkConfig::default(),
            fitness: FitnessWeights::default(),
        }
    }
}

impl EvolutionConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: EvolutionConfig =
            serde_json::from_str(&json).context("Failed to deserialize config")?;
        Ok(config)
    }

    /// Maximum number of ticks in one episode
    ///
    /// `step_cap_multiplier × cells`, saturating at `u32::MAX` (the range of
    /// `GameState::steps`). A saturated cap still ends every episode, only
    /// later.
    pub fn step_cap(&self) -> u32 {
        let cap = self
            .step_cap_multiplier
            .saturating_mul(self.game.cell_count());
        u32::try_from(cap).unwrap_or(u32::MAX)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.population_size < 2 {
            return Err(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            ));
        }

        if self.elitism > self.population_size {
            return Err(format!(
                "elitism ({}) cannot exceed population_size ({})",
                self.elitism, self.population_size
            ));
        }

        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }

        if self.step_cap_multiplier == 0 {
            return Err("step_cap_multiplier must be at least 1".to_string());
        }

        if self.workers == 0 {
            return Err("workers must be at least 1".to_string());
        }

        self.game.validate()?;
        self.network.validate()?;
        self.fitness.validate()?;

        if self.network.input_size != HISTORY_FEATURES {
            return Err(format!(
                "network input_size must match the move-history features ({}), got {}",
                HISTORY_FEATURES, self.network.input_size
            ));
        }

        if self.network.output_size != Turn::COUNT {
            return Err(format!(
                "network output_size must be {}, got {}",
                Turn::COUNT,
                self.network.output_size
            ));
        }

        Ok(())
    }
}
