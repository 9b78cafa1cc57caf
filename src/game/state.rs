use std::collections::VecDeque;

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake's body, head first
///
/// Backed by a ring buffer so a tick is one push-front and at most one
/// pop-back, with no per-segment allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a new snake whose segments trail behind `head`, opposite to `facing`
    pub fn new(head: Position, facing: Direction, length: usize) -> Self {
        assert!(length > 0, "snake must have at least one segment");

        let (back_dx, back_dy) = facing.opposite().delta();
        let mut body = VecDeque::with_capacity(length);
        let mut segment = head;
        body.push_back(segment);
        for _ in 1..length {
            segment = segment.moved_by(back_dx, back_dy);
            body.push_back(segment);
        }

        Self { body }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments<I: IntoIterator<Item = Position>>(segments: I) -> Self {
        let body: VecDeque<Position> = segments.into_iter().collect();
        assert!(!body.is_empty(), "snake must have at least one segment");
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Iterate over every segment, head first
    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Check if position is covered by any segment, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Advance the head to `new_head`, dropping the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Outcome of a single game step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// The snake is still in play
    Alive,
    /// The head left the board
    WallCollision,
    /// The head ran into the body
    SelfCollision,
    /// The body covers every cell of the board
    Win,
    /// The episode hit its step cap without another terminal status
    Timeout,
}

impl StepStatus {
    /// Whether this status ends the episode
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepStatus::Alive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Alive => "alive",
            StepStatus::WallCollision => "wall",
            StepStatus::SelfCollision => "self",
            StepStatus::Win => "win",
            StepStatus::Timeout => "timeout",
        }
    }
}

/// Complete game state
///
/// Collaborators (renderer, human input loop) only read the body, the food
/// cell and the status; every mutation goes through `GameEngine::step`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub status: StepStatus,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            status: StepStatus::Alive,
        }
    }

    /// Whether the episode is still running
    pub fn is_alive(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Whether the body covers the whole board
    pub fn is_board_full(&self) -> bool {
        self.snake.len() == self.cell_count()
    }

    /// Every cell not covered by the snake, in row-major order
    pub fn free_cells(&self) -> Vec<Position> {
        let mut occupied = vec![false; self.cell_count()];
        for pos in self.snake.segments() {
            if self.is_in_bounds(*pos) {
                occupied[pos.y as usize * self.grid_width + pos.x as usize] = true;
            }
        }

        occupied
            .iter()
            .enumerate()
            .filter(|(_, taken)| !**taken)
            .map(|(idx, _)| {
                Position::new(
                    (idx % self.grid_width) as i32,
                    (idx / self.grid_width) as i32,
                )
            })
            .collect()
    }
}
