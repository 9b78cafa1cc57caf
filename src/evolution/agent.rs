//! One controller network playing one game

use crate::error::Result;
use crate::game::{
    DirectionState, GameConfig, GameEngine, GameState, MoveHistory, StepStatus, Turn,
};
use crate::neural::Network;

use super::config::FitnessWeights;

/// Result of running an agent to a terminal status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    pub fitness: f32,
    pub status: StepStatus,
    pub score: u32,
    pub steps: u32,
}

/// A genome bound to its own board, heading, move history and fitness
///
/// Agents share nothing with each other, so a generation can be played out
/// on any number of threads.
#[derive(Debug, Clone)]
pub struct Agent {
    network: Network,
    history: MoveHistory,
    engine: GameEngine,
    state: GameState,
    heading: DirectionState,
    fitness: f32,
}

impl Agent {
    /// Create an agent on a fresh board whose food sequence follows `seed`
    pub fn new(network: Network, game_config: GameConfig, seed: u64) -> Self {
        let mut engine = GameEngine::with_seed(game_config, seed);
        let state = engine.reset();

        Self {
            network,
            history: MoveHistory::new(),
            engine,
            state,
            heading: DirectionState::default(),
            fitness: 0.0,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn heading(&self) -> &DirectionState {
        &self.heading
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Let the network pick a turn and advance the game by one tick
    ///
    /// The chosen turn is mapped to an absolute heading, run through the
    /// anti-reversal guard, and the heading that results is recorded in the
    /// move history after the step.
    pub fn decide_next_move(&mut self) -> Result<StepStatus> {
        let features = self.history.encode();
        let turn = Turn::from_index(self.network.decide(&features)?);

        self.heading.transition(turn.apply(self.heading.current()));
        let heading = self.heading.current();

        let status = self.engine.step(&mut self.state, heading);
        self.history.add_move(heading);

        Ok(status)
    }

    /// Accumulate a fitness increment
    ///
    /// # Panics
    ///
    /// Panics on a negative or non-finite increment.
    pub fn add_fitness(&mut self, delta: f32) {
        assert!(
            delta.is_finite() && delta >= 0.0,
            "fitness increments must be finite and non-negative, got {}",
            delta
        );
        self.fitness += delta;
    }

    /// Play until a terminal status, or `Timeout` once `step_cap` ticks have run
    pub fn run_episode(
        &mut self,
        step_cap: u32,
        weights: &FitnessWeights,
    ) -> Result<EpisodeOutcome> {
        let mut status = self.state.status;

        while !status.is_terminal() {
            if self.state.steps >= step_cap {
                status = StepStatus::Timeout;
                self.state.status = status;
                break;
            }

            let score_before = self.state.score;
            status = self.decide_next_move()?;

            if matches!(status, StepStatus::Alive | StepStatus::Win) {
                self.add_fitness(weights.survival_reward);
            }

            let captured = self.state.score - score_before;
            if captured > 0 {
                self.add_fitness(weights.capture_reward * captured as f32);
            }

            if status == StepStatus::Win {
                self.add_fitness(weights.win_bonus);
            }
        }

        Ok(EpisodeOutcome {
            fitness: self.fitness,
            status,
            score: self.state.score,
            steps: self.state.steps,
        })
    }
}
