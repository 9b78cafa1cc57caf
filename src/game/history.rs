use std::collections::VecDeque;

use super::action::Direction;

/// Number of recent headings kept in the window
pub const HISTORY_CAPACITY: usize = 10;

/// Width of the one-hot block each heading occupies
pub const HEADING_FEATURES: usize = Direction::ALL.len();

/// Length of the encoded feature vector fed to a controller network
pub const HISTORY_FEATURES: usize = HISTORY_CAPACITY * HEADING_FEATURES;

/// Ring buffer of the most recent headings taken by the snake
///
/// # Encoding
///
/// Each slot becomes a 4-wide one-hot block ordered `[Up, Down, Left, Right]`.
/// Blocks run oldest to newest; slots not yet filled are zero blocks at the
/// end, so the vector is always `HISTORY_FEATURES` long.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    moves: VecDeque<Direction>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self {
            moves: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Record a heading, evicting the oldest one once full
    pub fn add_move(&mut self, heading: Direction) {
        if self.moves.len() >= HISTORY_CAPACITY {
            self.moves.pop_front();
        }
        self.moves.push_back(heading);
    }

    /// Buffered headings, oldest first
    pub fn moves(&self) -> impl Iterator<Item = &Direction> + '_ {
        self.moves.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn encode(&self) -> Vec<f32> {
        let mut features = vec![0.0; HISTORY_FEATURES];
        for (slot, heading) in self.moves.iter().enumerate() {
            features[slot * HEADING_FEATURES + heading.index()] = 1.0;
        }
        features
    }
}
