//! Generation loop: evaluate, rank, breed
//!
//! The driver cycles through three phases:
//!
//! ```text
//! Evaluating ─→ Ranking ─→ Breeding ─→ Evaluating (next generation)
//! ```
//!
//! Evaluation plays every genome out on a bounded worker pool. Results are
//! put back in population order before ranking, so the outcome of a run only
//! depends on the seed, not on which worker finished first. Ranking and
//! breeding run on the calling thread.
//!
//! Parents are chosen by tournament selection: `tournament_size` ranks are
//! drawn uniformly with replacement and the best-ranked contestant wins.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SnakeError};
use crate::game::StepStatus;
use crate::neural::Network;

use super::agent::{Agent, EpisodeOutcome};
use super::config::EvolutionConfig;

/// Phase of the generation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Evaluating,
    Ranking,
    Breeding,
}

/// Outcome of one genome's episode, tagged with its population index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    pub index: usize,
    pub outcome: EpisodeOutcome,
}

/// Aggregate figures for one evaluated generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub best_score: u32,
    pub mean_steps: f32,
    pub wall_collisions: usize,
    pub self_collisions: usize,
    pub wins: usize,
    pub timeouts: usize,
}

impl GenerationSummary {
    fn from_results(generation: usize, results: &[EvaluationResult]) -> Self {
        let count = results.len().max(1) as f32;
        let count_status =
            |status: StepStatus| results.iter().filter(|r| r.outcome.status == status).count();

        Self {
            generation,
            best_fitness: results
                .iter()
                .map(|r| r.outcome.fitness)
                .fold(0.0, f32::max),
            mean_fitness: results.iter().map(|r| r.outcome.fitness).sum::<f32>() / count,
            best_score: results.iter().map(|r| r.outcome.score).max().unwrap_or(0),
            mean_steps: results.iter().map(|r| r.outcome.steps as f32).sum::<f32>() / count,
            wall_collisions: count_status(StepStatus::WallCollision),
            self_collisions: count_status(StepStatus::SelfCollision),
            wins: count_status(StepStatus::Win),
            timeouts: count_status(StepStatus::Timeout),
        }
    }
}

/// Evolves a fixed-size population of controller networks
pub struct GeneticDriver {
    config: EvolutionConfig,
    rng: ChaCha8Rng,
    pool: ThreadPool,
    population: Vec<Network>,
    phase: Phase,
    generation: usize,
    results: Vec<EvaluationResult>,
    ranking: Vec<usize>,
    champion: Option<Network>,
}

impl GeneticDriver {
    /// Validate the configuration and sample the first generation
    pub fn new(config: EvolutionConfig) -> Result<Self> {
        config.validate().map_err(SnakeError::InvalidConfig)?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let population = (0..config.population_size)
            .map(|_| config.network.init(&mut rng))
            .collect();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("evo-worker-{}", i))
            .build()?;

        tracing::debug!(
            population = config.population_size,
            workers = config.workers,
            seed = config.seed,
            "initialized genetic driver"
        );

        Ok(Self {
            config,
            rng,
            pool,
            population,
            phase: Phase::Evaluating,
            generation: 0,
            results: Vec::new(),
            ranking: Vec::new(),
            champion: None,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed generations
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[Network] {
        &self.population
    }

    /// Results of the latest evaluation, in population order
    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    /// Best genome of the latest ranked generation
    pub fn champion(&self) -> Option<&Network> {
        self.champion.as_ref()
    }

    /// Run one full evaluate → rank → breed cycle
    pub fn run_generation(&mut self) -> Result<GenerationSummary> {
        self.evaluate()?;
        let summary = GenerationSummary::from_results(self.generation, &self.results);
        self.rank();
        self.breed()?;

        tracing::info!(
            generation = summary.generation,
            best_fitness = summary.best_fitness,
            mean_fitness = summary.mean_fitness,
            best_score = summary.best_score,
            mean_steps = summary.mean_steps,
            walls = summary.wall_collisions,
            self_hits = summary.self_collisions,
            wins = summary.wins,
            timeouts = summary.timeouts,
            "generation complete"
        );

        Ok(summary)
    }

    /// Play every genome to a terminal status on the worker pool
    fn evaluate(&mut self) -> Result<()> {
        assert_eq!(self.phase, Phase::Evaluating, "evaluate called out of phase");

        // Episode seeds are drawn up front so scheduling cannot change them
        let seeds: Vec<u64> = (0..self.population.len())
            .map(|_| self.rng.gen())
            .collect();
        let step_cap = self.config.step_cap();
        let game = &self.config.game;
        let weights = &self.config.fitness;
        let population = &self.population;

        let evaluated: Vec<Result<EvaluationResult>> = self.pool.install(|| {
            population
                .par_iter()
                .zip(seeds.par_iter())
                .enumerate()
                .map(|(index, (network, &seed))| {
                    let mut agent = Agent::new(network.clone(), game.clone(), seed);
                    let outcome = agent.run_episode(step_cap, weights)?;
                    tracing::trace!(
                        index,
                        fitness = outcome.fitness,
                        status = outcome.status.as_str(),
                        score = outcome.score,
                        "agent finished"
                    );
                    Ok(EvaluationResult { index, outcome })
                })
                .collect()
        });

        let mut results = evaluated.into_iter().collect::<Result<Vec<_>>>()?;
        results.sort_by_key(|r| r.index);

        self.results = results;
        self.phase = Phase::Ranking;
        Ok(())
    }

    /// Order population indices by fitness, best first; ties keep index order
    fn rank(&mut self) {
        assert_eq!(self.phase, Phase::Ranking, "rank called out of phase");

        let results = &self.results;
        let mut ranking: Vec<usize> = (0..results.len()).collect();
        ranking.sort_by(|&a, &b| {
            results[b]
                .outcome
                .fitness
                .total_cmp(&results[a].outcome.fitness)
                .then(a.cmp(&b))
        });

        self.champion = ranking.first().map(|&i| self.population[i].clone());
        self.ranking = ranking;
        self.phase = Phase::Breeding;
    }

    /// Fill the next generation: elites first, then mutated crossover children
    fn breed(&mut self) -> Result<()> {
        assert_eq!(self.phase, Phase::Breeding, "breed called out of phase");

        let size = self.config.population_size;
        let mut next = Vec::with_capacity(size);

        for &idx in self.ranking.iter().take(self.config.elitism) {
            next.push(self.population[idx].clone());
        }

        while next.len() < size {
            let mother = self.tournament();
            let father = self.tournament();
            let mut child =
                self.population[mother].crossover(&self.population[father], &mut self.rng)?;
            child.mutate(
                self.config.mutation_rate,
                self.config.network.mutation_std_dev,
                &mut self.rng,
            );
            next.push(child);
        }

        self.population = next;
        self.generation += 1;
        self.phase = Phase::Evaluating;
        Ok(())
    }

    /// Population index of a tournament winner
    fn tournament(&mut self) -> usize {
        let n = self.ranking.len();
        let best_rank = (0..self.config.tournament_size)
            .map(|_| self.rng.gen_range(0..n))
            .min()
            .unwrap_or(0);
        self.ranking[best_rank]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    fn small_config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            population_size: 12,
            elitism: 2,
            tournament_size: 3,
            mutation_rate: 0.1,
            workers: 3,
            seed,
            game: GameConfig::new(8, 8),
            ..Default::default()
        }
    }

    #[test]
    fn test_driver_creation() {
        let driver = GeneticDriver::new(small_config(1)).unwrap();
        assert_eq!(driver.population().len(), 12);
        assert_eq!(driver.phase(), Phase::Evaluating);
        assert_eq!(driver.generation(), 0);
        assert!(driver.champion().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config(1);
        config.population_size = 0;
        assert!(matches!(
            GeneticDriver::new(config),
            Err(SnakeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_phase_cycle() {
        let mut driver = GeneticDriver::new(small_config(2)).unwrap();

        driver.evaluate().unwrap();
        assert_eq!(driver.phase(), Phase::Ranking);
        driver.rank();
        assert_eq!(driver.phase(), Phase::Breeding);
        driver.breed().unwrap();
        assert_eq!(driver.phase(), Phase::Evaluating);
        assert_eq!(driver.generation(), 1);
    }

    #[test]
    fn test_results_in_population_order() {
        let mut driver = GeneticDriver::new(small_config(3)).unwrap();
        driver.evaluate().unwrap();

        let indices: Vec<usize> = driver.results().iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
        assert!(driver
            .results()
            .iter()
            .all(|r| r.outcome.status.is_terminal()));
        assert!(driver
            .results()
            .iter()
            .all(|r| r.outcome.steps <= driver.config().step_cap()));
    }

    #[test]
    fn test_ranking_descending_with_stable_ties() {
        let mut driver = GeneticDriver::new(small_config(4)).unwrap();
        driver.evaluate().unwrap();
        driver.rank();

        for pair in driver.ranking.windows(2) {
            let a = driver.results[pair[0]].outcome.fitness;
            let b = driver.results[pair[1]].outcome.fitness;
            assert!(a > b || (a == b && pair[0] < pair[1]));
        }
    }

    #[test]
    fn test_elites_carried_unmutated() {
        let mut driver = GeneticDriver::new(small_config(5)).unwrap();
        driver.evaluate().unwrap();
        driver.rank();
        let elites: Vec<Network> = driver.ranking[..2]
            .iter()
            .map(|&i| driver.population[i].clone())
            .collect();

        driver.breed().unwrap();

        assert_eq!(driver.population().len(), 12);
        assert_eq!(&driver.population()[..2], elites.as_slice());
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let mut a = GeneticDriver::new(small_config(6)).unwrap();
        let mut b = GeneticDriver::new(small_config(6)).unwrap();

        for _ in 0..3 {
            assert_eq!(a.run_generation().unwrap(), b.run_generation().unwrap());
        }
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn test_worker_count_does_not_change_outcome() {
        let mut single = small_config(7);
        single.workers = 1;
        let mut many = small_config(7);
        many.workers = 4;

        let mut a = GeneticDriver::new(single).unwrap();
        let mut b = GeneticDriver::new(many).unwrap();

        for _ in 0..2 {
            assert_eq!(a.run_generation().unwrap(), b.run_generation().unwrap());
        }
        assert_eq!(a.champion(), b.champion());
    }

    #[test]
    fn test_summary_counts_cover_population() {
        let mut driver = GeneticDriver::new(small_config(8)).unwrap();
        let summary = driver.run_generation().unwrap();

        assert_eq!(summary.generation, 0);
        assert_eq!(
            summary.wall_collisions + summary.self_collisions + summary.wins + summary.timeouts,
            12
        );
        assert!(summary.best_fitness >= summary.mean_fitness);
        assert!(driver.champion().is_some());
    }

    #[test]
    fn test_full_elitism_keeps_population() {
        let mut config = small_config(9);
        config.elitism = config.population_size;
        let mut driver = GeneticDriver::new(config).unwrap();
        let before: Vec<Network> = driver.population().to_vec();

        driver.run_generation().unwrap();

        let mut after: Vec<Network> = driver.population().to_vec();
        assert_eq!(after.len(), before.len());
        // Same genomes, reordered by rank
        for genome in &before {
            let pos = after.iter().position(|g| g == genome).unwrap();
            after.remove(pos);
        }
        assert!(after.is_empty());
    }
}
