//! Evo Snake - A Snake game played by evolved neural controllers
//!
//! This library provides:
//! - Core game logic and steering (game module)
//! - Feedforward controller networks (neural module)
//! - Genetic search over controller weights (evolution module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes (human, evolve)

pub mod error;
pub mod evolution;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod neural;
pub mod render;

pub use error::{Result, SnakeError};
