// Shared game types
// Grid coordinates use screen orientation: x grows to the right, y grows downward.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D cell coordinate on the grid
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Calculates Manhattan distance between two coordinates
    pub fn manhattan_distance(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True if the coordinate lies inside a square grid of the given size
    pub fn is_inside(&self, size: i32) -> bool {
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four unit movement vectors
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to its wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Unit vector (dx, dy) for this direction
    pub fn vector(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Maps a raw vector back to a direction. Anything that is not one of the
    /// four unit vectors is rejected.
    pub fn from_vector(dx: i32, dy: i32) -> Option<Direction> {
        Direction::all().into_iter().find(|d| d.vector() == (dx, dy))
    }

    /// Two directions are opposite iff their vectors sum to zero
    pub fn is_opposite(&self, other: Direction) -> bool {
        let (ax, ay) = self.vector();
        let (bx, by) = other.vector();
        ax + bx == 0 && ay + by == 0
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        let (dx, dy) = self.vector();
        Coord {
            x: coord.x + dx,
            y: coord.y + dy,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner tag of a snake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    P1,
    P2,
}

impl Player {
    /// Fixed evaluation order used wherever both players are processed
    pub fn both() -> [Player; 2] {
        [Player::P1, Player::P2]
    }

    pub fn index(&self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative per-player scores for a session
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scores {
    pub p1: u32,
    pub p2: u32,
}

impl Scores {
    pub fn add(&mut self, player: Player, points: u32) {
        match player {
            Player::P1 => self.p1 += points,
            Player::P2 => self.p2 += points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Right.is_opposite(Direction::Right));
    }

    #[test]
    fn test_apply_uses_screen_orientation() {
        let c = Coord::new(3, 3);
        assert_eq!(Direction::Up.apply(&c), Coord::new(3, 2));
        assert_eq!(Direction::Down.apply(&c), Coord::new(3, 4));
        assert_eq!(Direction::Left.apply(&c), Coord::new(2, 3));
        assert_eq!(Direction::Right.apply(&c), Coord::new(4, 3));
    }

    #[test]
    fn test_from_vector_rejects_non_unit() {
        assert_eq!(Direction::from_vector(1, 0), Some(Direction::Right));
        assert_eq!(Direction::from_vector(0, -1), Some(Direction::Up));
        assert_eq!(Direction::from_vector(1, 1), None);
        assert_eq!(Direction::from_vector(0, 0), None);
        assert_eq!(Direction::from_vector(2, 0), None);
    }

    #[test]
    fn test_is_inside() {
        assert!(Coord::new(0, 0).is_inside(10));
        assert!(Coord::new(9, 9).is_inside(10));
        assert!(!Coord::new(10, 3).is_inside(10));
        assert!(!Coord::new(-1, 3).is_inside(10));
    }

    #[test]
    fn test_player_serde_names() {
        assert_eq!(serde_json::to_string(&Player::P1).unwrap(), "\"p1\"");
        let p: Player = serde_json::from_str("\"p2\"").unwrap();
        assert_eq!(p, Player::P2);
    }
}
