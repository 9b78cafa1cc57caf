use super::{
    action::Direction,
    config::GameConfig,
    state::{GameState, Position, Snake, StepStatus},
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The game engine that handles all game logic
///
/// Owns the random stream used for food placement, so two engines built from
/// the same seed produce the same sequence of food cells.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    rng: ChaCha8Rng,
}

impl GameEngine {
    /// Create a new game engine seeded from OS entropy
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create a new game engine with a reproducible food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    ///
    /// The snake starts at the centre of the board heading right.
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );
        state.food = match self.spawn_food(&state) {
            Some(food) => food,
            None => panic!(
                "fresh {}x{} board has no free cell",
                state.grid_width, state.grid_height
            ),
        };

        state
    }

    /// Execute one step of the game with the given heading
    ///
    /// The heading is taken as-is; reversal filtering belongs to
    /// `DirectionState`. A finished game is left untouched and keeps
    /// reporting its terminal status.
    pub fn step(&mut self, state: &mut GameState, heading: Direction) -> StepStatus {
        if !state.is_alive() {
            return state.status;
        }

        let new_head = state.snake.head().moved_in_direction(heading);
        state.steps += 1;

        if let Some(collision) = self.check_collision(state, new_head) {
            state.status = collision;
            return collision;
        }

        let ate_food = new_head == state.food;
        state.snake.advance(new_head, ate_food);

        if ate_food {
            state.score += 1;

            if state.is_board_full() {
                state.status = StepStatus::Win;
                return StepStatus::Win;
            }

            match self.spawn_food(state) {
                Some(food) => state.food = food,
                None => {
                    state.status = StepStatus::Win;
                    return StepStatus::Win;
                }
            }
        }

        debug_assert!(state.is_in_bounds(state.snake.head()));
        debug_assert!(!state.snake.occupies(state.food));

        StepStatus::Alive
    }

    /// Check if the new head position causes a collision
    ///
    /// Self collision is tested against the whole current body, including the
    /// tail segment that would otherwise be vacated this tick.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<StepStatus> {
        if !state.is_in_bounds(pos) {
            return Some(StepStatus::WallCollision);
        }

        if state.snake.occupies(pos) {
            return Some(StepStatus::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell not covered by the snake
    ///
    /// Tries `food_retry_budget` random draws first, then falls back to
    /// enumerating the free cells so a nearly full board still terminates.
    /// Returns `None` only when no free cell exists.
    fn spawn_food(&mut self, state: &GameState) -> Option<Position> {
        for _ in 0..self.config.food_retry_budget {
            let x = self.rng.gen_range(0..state.grid_width) as i32;
            let y = self.rng.gen_range(0..state.grid_height) as i32;
            let pos = Position::new(x, y);

            if !state.is_occupied_by_snake(pos) {
                return Some(pos);
            }
        }

        let free = state.free_cells();
        tracing::trace!(
            free = free.len(),
            "food sampling exhausted retries, enumerating free cells"
        );
        free.choose(&mut self.rng).copied()
    }
}
