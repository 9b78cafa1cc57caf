//! Neuroevolution of snake controllers
//!
//! Provides:
//! - Agents that bind a network to its own game, heading and move history
//! - Configurable fitness shaping
//! - A generation driver with parallel evaluation, tournament selection,
//!   uniform crossover, Gaussian mutation and elitism

pub mod agent;
pub mod config;
pub mod driver;

pub use agent::{Agent, EpisodeOutcome};
pub use config::{EvolutionConfig, FitnessWeights};
pub use driver::{EvaluationResult, GenerationSummary, GeneticDriver, Phase};
