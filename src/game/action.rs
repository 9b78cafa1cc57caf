use serde::{Deserialize, Serialize};

/// Absolute heading of the snake on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All headings, in the order used by the one-hot feature encoding
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The heading pointing the other way
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Heading after a quarter turn counter-clockwise
    pub fn turned_left(&self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Down => Direction::Right,
            Direction::Left => Direction::Down,
            Direction::Right => Direction::Up,
        }
    }

    /// Heading after a quarter turn clockwise
    pub fn turned_right(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Right => Direction::Down,
        }
    }

    /// Position of this heading inside [`Direction::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Egocentric action chosen by a network, relative to the current heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Straight,
}

impl Turn {
    /// Number of actions a controller network must output
    pub const COUNT: usize = 3;

    /// Map a network output index to an action
    ///
    /// - 0 → Left
    /// - 1 → Right
    /// - 2 → Straight
    /// - other → Straight
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Turn::Left,
            1 => Turn::Right,
            _ => Turn::Straight,
        }
    }

    /// Absolute heading reached by applying this action to `current`
    pub fn apply(&self, current: Direction) -> Direction {
        match self {
            Turn::Left => current.turned_left(),
            Turn::Right => current.turned_right(),
            Turn::Straight => current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_turns_are_never_reversals() {
        for dir in Direction::ALL {
            assert!(!dir.turned_left().is_opposite(dir));
            assert!(!dir.turned_right().is_opposite(dir));
            assert_eq!(dir.turned_left().turned_right(), dir);
            assert_eq!(dir.turned_left().turned_left(), dir.opposite());
        }
    }

    #[test]
    fn test_rotation_table() {
        assert_eq!(Turn::Left.apply(Direction::Right), Direction::Up);
        assert_eq!(Turn::Right.apply(Direction::Right), Direction::Down);
        assert_eq!(Turn::Straight.apply(Direction::Right), Direction::Right);
        assert_eq!(Turn::Left.apply(Direction::Up), Direction::Left);
        assert_eq!(Turn::Right.apply(Direction::Down), Direction::Left);
    }

    #[test]
    fn test_turn_from_index() {
        assert_eq!(Turn::from_index(0), Turn::Left);
        assert_eq!(Turn::from_index(1), Turn::Right);
        assert_eq!(Turn::from_index(2), Turn::Straight);
        assert_eq!(Turn::from_index(7), Turn::Straight);
    }

    #[test]
    fn test_index_matches_all() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }
}
