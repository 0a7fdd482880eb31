//! Positions, directions, cells and the mutable board.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::PowerupKind;

/// A coordinate on the board.
///
/// Signed so that a one-step move off the top or left edge is representable
/// long enough to be rejected by the bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one cell away in `direction`. Up decreases `y`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - 1),
            Direction::Down => Self::new(self.x, self.y + 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
            Direction::Stay => self,
        }
    }

    /// Chebyshev (king-move) distance to `other`.
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Manhattan distance to `other`.
    #[must_use]
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A requested move for one agent for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Move to `y - 1`.
    Up,
    /// Move to `y + 1`.
    Down,
    /// Move to `x - 1`.
    Left,
    /// Move to `x + 1`.
    Right,
    /// Remain in place.
    Stay,
}

impl Direction {
    /// All five tokens, in wire order.
    pub const ALL: [Self; 5] = [Self::Up, Self::Down, Self::Left, Self::Right, Self::Stay];

    /// The wire token for this direction.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Stay => "STAY",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Returned when a token is not one of `UP`, `DOWN`, `LEFT`, `RIGHT`, `STAY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDirection(pub String);

impl fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid direction token {:?}", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(Self::Up),
            "DOWN" => Ok(Self::Down),
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            "STAY" => Ok(Self::Stay),
            other => Err(InvalidDirection(other.to_string())),
        }
    }
}

/// Contents of one occupied board cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Impassable without pass-wall.
    Wall,
    /// Teleports an agent entering it to `pair`.
    Portal {
        /// Exit position.
        pair: Position,
        /// Display label shared by both ends.
        name: String,
    },
    /// Collectable by defenders.
    Coin {
        /// Points granted on pickup.
        score: u32,
    },
    /// A power-up waiting to be picked up.
    Powerup {
        /// Which effect it grants.
        kind: PowerupKind,
    },
}

impl Cell {
    /// Walls and portals are never removed by gameplay.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Wall | Self::Portal { .. })
    }
}

/// The mutable per-match board.
///
/// Cells are stored densely in row-major order; `None` is an empty floor cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Option<Cell>>,
}

impl Board {
    /// Create an empty board. Returns `None` if either dimension is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let size = usize::try_from(width).ok()? * usize::try_from(height).ok()?;
        Some(Self {
            width,
            height,
            cells: vec![None; size],
        })
    }

    /// Board width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Board height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Check if a position is within `[0, width) x [0, height)`.
    #[must_use]
    pub const fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// The cell at `pos`, if any. Out-of-bounds positions are always empty.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Place a cell, replacing whatever was there.
    ///
    /// Returns `false` if `pos` is out of bounds.
    pub fn insert(&mut self, pos: Position, cell: Cell) -> bool {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = Some(cell);
            true
        } else {
            false
        }
    }

    /// Remove and return the cell at `pos`.
    pub fn remove(&mut self, pos: Position) -> Option<Cell> {
        self.index(pos).and_then(|idx| self.cells[idx].take())
    }

    /// Check whether `pos` is empty floor.
    #[must_use]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Iterate over occupied cells in row-major order.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref().map(|cell| {
                let x = (idx % width) as i32;
                let y = (idx / width) as i32;
                (Position::new(x, y), cell)
            })
        })
    }

    /// Number of coin cells remaining.
    #[must_use]
    pub fn coin_count(&self) -> usize {
        self.iter()
            .filter(|(_, cell)| matches!(cell, Cell::Coin { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_step() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.step(Direction::Up), Position::new(5, 4));
        assert_eq!(pos.step(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.step(Direction::Left), Position::new(4, 5));
        assert_eq!(pos.step(Direction::Right), Position::new(6, 5));
        assert_eq!(pos.step(Direction::Stay), pos);
    }

    #[test]
    fn test_position_chebyshev() {
        let a = Position::new(0, 0);
        assert_eq!(a.chebyshev(Position::new(3, -2)), 3);
        assert_eq!(a.chebyshev(Position::new(-1, 4)), 4);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn test_direction_tokens() {
        for dir in Direction::ALL {
            assert_eq!(dir.token().parse::<Direction>(), Ok(dir));
        }
        assert!("up".parse::<Direction>().is_err());
        assert!("JUMP".parse::<Direction>().is_err());
    }

    #[test]
    fn test_board_zero_size() {
        assert!(Board::new(0, 10).is_none());
        assert!(Board::new(10, -1).is_none());
    }

    #[test]
    fn test_board_bounds() {
        let board = Board::new(10, 8).unwrap();
        assert!(board.in_bounds(Position::new(0, 0)));
        assert!(board.in_bounds(Position::new(9, 7)));
        assert!(!board.in_bounds(Position::new(10, 0)));
        assert!(!board.in_bounds(Position::new(0, 8)));
        assert!(!board.in_bounds(Position::new(-1, 3)));
    }

    #[test]
    fn test_board_insert_remove() {
        let mut board = Board::new(4, 4).unwrap();
        let pos = Position::new(2, 3);
        assert!(board.insert(pos, Cell::Coin { score: 10 }));
        assert_eq!(board.get(pos), Some(&Cell::Coin { score: 10 }));
        assert_eq!(board.coin_count(), 1);

        assert_eq!(board.remove(pos), Some(Cell::Coin { score: 10 }));
        assert!(board.is_empty_at(pos));
        assert_eq!(board.coin_count(), 0);

        assert!(!board.insert(Position::new(4, 0), Cell::Wall));
        assert!(board.get(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_board_iter_row_major() {
        let mut board = Board::new(3, 3).unwrap();
        board.insert(Position::new(2, 0), Cell::Wall);
        board.insert(Position::new(0, 1), Cell::Wall);
        board.insert(Position::new(1, 0), Cell::Wall);

        let order: Vec<Position> = board.iter().map(|(pos, _)| pos).collect();
        assert_eq!(
            order,
            vec![Position::new(1, 0), Position::new(2, 0), Position::new(0, 1)]
        );
    }
}
