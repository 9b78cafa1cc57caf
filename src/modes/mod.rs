pub mod evolve;
pub mod human;

pub use evolve::{EvolveConfig, EvolveMode};
pub use human::HumanMode;
