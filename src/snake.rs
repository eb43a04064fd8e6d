// Snake body and movement
//
// Bodies are head-first deques; a move pushes the new head and drops the tail unless growing.

use std::collections::VecDeque;

use crate::types::{Coord, Direction};

/// One player's snake. The head is `body[0]`, the tail is the last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub body: VecDeque<Coord>,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Latest requested direction, committed at the start of the next tick
    pub pending_direction: Direction,
    pub alive: bool,
}

impl Snake {
    /// Lays `length` segments backward from `head`, opposite to `direction`
    pub fn new_at(head: Coord, direction: Direction, length: usize) -> Self {
        assert!(length > 0, "a snake needs at least one segment");

        let (dx, dy) = direction.vector();
        let body = (0..length as i32)
            .map(|i| Coord {
                x: head.x - i * dx,
                y: head.y - i * dy,
            })
            .collect();

        Snake {
            body,
            direction,
            pending_direction: direction,
            alive: true,
        }
    }

    /// Builds a snake from explicit segments, checking the body invariants
    pub fn from_body(body: Vec<Coord>, direction: Direction) -> Result<Self, String> {
        if body.is_empty() {
            return Err("snake body must have at least one segment".to_string());
        }

        for (i, pair) in body.windows(2).enumerate() {
            if pair[0].manhattan_distance(&pair[1]) != 1 {
                return Err(format!(
                    "segments {} {} and {} {} are not adjacent",
                    i,
                    pair[0],
                    i + 1,
                    pair[1]
                ));
            }
        }

        for (i, segment) in body.iter().enumerate() {
            if body[..i].contains(segment) {
                return Err(format!("segment {} overlaps the body at {}", i, segment));
            }
        }

        Ok(Snake {
            body: body.into(),
            direction,
            pending_direction: direction,
            alive: true,
        })
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, coord: &Coord) -> bool {
        self.body.contains(coord)
    }

    /// Commits the pending direction unless it would reverse onto the neck.
    /// Returns the direction in effect for this tick.
    pub fn commit_direction(&mut self) -> Direction {
        if !self.pending_direction.is_opposite(self.direction) {
            self.direction = self.pending_direction;
        }
        self.direction
    }

    pub fn next_head(&self) -> Coord {
        self.direction.apply(&self.head())
    }

    /// Prepends the new head; the tail is kept only when `grow` is set
    pub fn advance(&mut self, next_head: Coord, grow: bool) {
        self.body.push_front(next_head);
        if !grow {
            self.body.pop_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_at_lays_body_backwards() {
        let snake = Snake::new_at(Coord::new(4, 12), Direction::Right, 3);
        let body: Vec<_> = snake.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![Coord::new(4, 12), Coord::new(3, 12), Coord::new(2, 12)]
        );

        let snake = Snake::new_at(Coord::new(19, 12), Direction::Left, 3);
        let body: Vec<_> = snake.body.iter().copied().collect();
        assert_eq!(
            body,
            vec![Coord::new(19, 12), Coord::new(20, 12), Coord::new(21, 12)]
        );
        assert_eq!(snake.pending_direction, Direction::Left);
    }

    #[test]
    fn test_from_body_rejects_gaps_and_overlaps() {
        assert!(Snake::from_body(vec![], Direction::Up).is_err());
        assert!(Snake::from_body(
            vec![Coord::new(0, 0), Coord::new(2, 0)],
            Direction::Left
        )
        .is_err());
        assert!(Snake::from_body(
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(1, 1),
                Coord::new(0, 1),
                Coord::new(0, 0),
            ],
            Direction::Left
        )
        .is_err());
        assert!(Snake::from_body(vec![Coord::new(3, 3)], Direction::Up).is_ok());
    }

    #[test]
    fn test_commit_direction_ignores_reversal() {
        let mut snake = Snake::new_at(Coord::new(5, 5), Direction::Right, 3);
        snake.pending_direction = Direction::Left;
        assert_eq!(snake.commit_direction(), Direction::Right);

        snake.pending_direction = Direction::Up;
        assert_eq!(snake.commit_direction(), Direction::Up);
        assert_eq!(snake.next_head(), Coord::new(5, 4));
    }

    #[test]
    fn test_advance_with_and_without_growth() {
        let mut snake = Snake::new_at(Coord::new(5, 5), Direction::Right, 3);
        snake.advance(Coord::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Coord::new(6, 5));
        assert!(!snake.occupies(&Coord::new(3, 5)));

        snake.advance(Coord::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert!(snake.occupies(&Coord::new(4, 5)));
    }
}
