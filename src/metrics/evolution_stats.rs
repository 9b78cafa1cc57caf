//! Rolling statistics over evolution generations
//!
//! Tracks per-generation best/mean fitness, best score and terminal-status
//! counts, keeping a rolling window for smoothed figures alongside all-time
//! records.

use std::collections::VecDeque;

use crate::evolution::GenerationSummary;

/// Generation statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use evo_snake::evolution::GenerationSummary;
/// use evo_snake::metrics::EvolutionStats;
///
/// let mut stats = EvolutionStats::new(10);
/// stats.record_generation(&GenerationSummary {
///     generation: 0,
///     best_fitness: 120.0,
///     mean_fitness: 30.0,
///     best_score: 2,
///     mean_steps: 25.0,
///     wall_collisions: 40,
///     self_collisions: 5,
///     wins: 0,
///     timeouts: 5,
/// });
///
/// assert_eq!(stats.total_generations(), 1);
/// assert_eq!(stats.best_fitness_ever(), 120.0);
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionStats {
    best_fitness: VecDeque<f32>,
    mean_fitness: VecDeque<f32>,
    mean_steps: VecDeque<f32>,

    best_fitness_ever: f32,
    best_score_ever: u32,
    total_generations: usize,
    total_wins: usize,

    window_size: usize,
}

impl EvolutionStats {
    pub fn new(window_size: usize) -> Self {
        Self {
            best_fitness: VecDeque::with_capacity(window_size),
            mean_fitness: VecDeque::with_capacity(window_size),
            mean_steps: VecDeque::with_capacity(window_size),
            best_fitness_ever: 0.0,
            best_score_ever: 0,
            total_generations: 0,
            total_wins: 0,
            window_size,
        }
    }

    /// Record the summary of one evaluated generation
    pub fn record_generation(&mut self, summary: &GenerationSummary) {
        Self::push_deque(&mut self.best_fitness, summary.best_fitness, self.window_size);
        Self::push_deque(&mut self.mean_fitness, summary.mean_fitness, self.window_size);
        Self::push_deque(&mut self.mean_steps, summary.mean_steps, self.window_size);

        self.best_fitness_ever = self.best_fitness_ever.max(summary.best_fitness);
        self.best_score_ever = self.best_score_ever.max(summary.best_score);
        self.total_generations += 1;
        self.total_wins += summary.wins;
    }

    /// Rolling mean of each generation's best fitness
    pub fn mean_best_fitness(&self) -> f32 {
        Self::mean(&self.best_fitness)
    }

    /// Rolling mean of each generation's mean fitness
    pub fn mean_population_fitness(&self) -> f32 {
        Self::mean(&self.mean_fitness)
    }

    pub fn mean_episode_steps(&self) -> f32 {
        Self::mean(&self.mean_steps)
    }

    pub fn best_fitness_ever(&self) -> f32 {
        self.best_fitness_ever
    }

    pub fn best_score_ever(&self) -> u32 {
        self.best_score_ever
    }

    pub fn total_generations(&self) -> usize {
        self.total_generations
    }

    pub fn total_wins(&self) -> usize {
        self.total_wins
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Generations: {} | Best: {:.2} | Avg best: {:.2} | Avg mean: {:.2} | Steps: {:.1} | Top score: {} | Wins: {}",
            self.total_generations,
            self.best_fitness_ever,
            self.mean_best_fitness(),
            self.mean_population_fitness(),
            self.mean_episode_steps(),
            self.best_score_ever,
            self.total_wins,
        )
    }

    fn mean(deque: &VecDeque<f32>) -> f32 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f32>() / deque.len() as f32
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
