//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is driven the same way by the keyboard loop and by evolved agents.

pub mod action;
pub mod config;
pub mod engine;
pub mod history;
pub mod state;
pub mod steering;

// Re-export commonly used types
pub use action::{Direction, Turn};
pub use config::GameConfig;
pub use engine::GameEngine;
pub use history::{MoveHistory, HISTORY_CAPACITY, HISTORY_FEATURES};
pub use state::{GameState, Position, Snake, StepStatus};
pub use steering::{DirectionState, MoveCommandQueue};
