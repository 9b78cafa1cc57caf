//! Heading control: the anti-reversal guard and the pending-command queue
//!
//! `DirectionState` is the single owner of the snake's heading. Anything that
//! wants to turn the snake, a keyboard or a network, submits a request and the
//! guard decides whether it sticks.

use std::collections::VecDeque;

use super::action::Direction;

/// Current heading with a guard against 180-degree turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionState {
    current: Direction,
}

impl DirectionState {
    /// Heading every game starts with
    pub const INITIAL: Direction = Direction::Right;

    pub fn new(initial: Direction) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    /// Adopt `requested` unless it reverses the current heading
    ///
    /// Returns true when the request was adopted. Same-heading requests are
    /// accepted as no-ops.
    pub fn transition(&mut self, requested: Direction) -> bool {
        if self.current.is_opposite(requested) {
            return false;
        }
        self.current = requested;
        true
    }
}

impl Default for DirectionState {
    fn default() -> Self {
        Self::new(Self::INITIAL)
    }
}

/// FIFO of heading changes requested between ticks
#[derive(Debug, Clone, Default)]
pub struct MoveCommandQueue {
    pending: VecDeque<Direction>,
}

impl MoveCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request; filtering happens on dequeue
    pub fn enqueue(&mut self, heading: Direction) {
        self.pending.push_back(heading);
    }

    /// Pop entries until one does not reverse `current`
    ///
    /// Reversals are dropped for good. With nothing usable left the current
    /// heading comes back unchanged.
    pub fn dequeue(&mut self, current: Direction) -> Direction {
        while let Some(next) = self.pending.pop_front() {
            if !current.is_opposite(next) {
                return next;
            }
        }
        current
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
