// Collision rules
//
// Hazards are classified against the board as it was before anyone moved.
// Outcome resolution is a flat decision table over (head_on, p1_dies, p2_dies).

use serde::{Deserialize, Serialize};

use crate::snake::Snake;
use crate::types::{Coord, Player};

/// Everything that can kill one snake on a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hazards {
    pub hits_wall: bool,
    pub hits_self: bool,
    pub hits_other: bool,
}

impl Hazards {
    /// Classifies `next_head` for `own` against the pre-move bodies
    pub fn classify(next_head: Coord, own: &Snake, other: &Snake, size: i32) -> Self {
        let hits_wall = !next_head.is_inside(size);
        // An off-grid head cannot land on a segment
        let hits_self = !hits_wall && own.occupies(&next_head);
        let hits_other = other.occupies(&next_head);

        Hazards {
            hits_wall,
            hits_self,
            hits_other,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.hits_wall || self.hits_self || self.hits_other
    }
}

/// How a round was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "result", content = "player")]
pub enum RoundOutcome {
    Winner(Player),
    Draw,
}

/// Result of applying the decision table to one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Death flags indexed by `Player::index`
    pub dies: [bool; 2],
    /// `None` while the round continues
    pub outcome: Option<RoundOutcome>,
}

impl Resolution {
    pub fn dies(&self, player: Player) -> bool {
        self.dies[player.index()]
    }
}

/// Decides who dies and how the round ends
///
/// | head_on | p1 fatal | p2 fatal | dies       | outcome      |
/// |---------|----------|----------|------------|--------------|
/// | yes     | any      | any      | both       | draw         |
/// | no      | no       | no       | none       | continues    |
/// | no      | yes      | no       | p1         | p2 wins      |
/// | no      | no       | yes      | p2         | p1 wins      |
/// | no      | yes      | yes      | both       | draw         |
pub fn resolve(head_on: bool, p1: &Hazards, p2: &Hazards) -> Resolution {
    let (dies, outcome) = match (head_on, p1.is_fatal(), p2.is_fatal()) {
        (true, _, _) => ([true, true], Some(RoundOutcome::Draw)),
        (false, false, false) => ([false, false], None),
        (false, true, false) => ([true, false], Some(RoundOutcome::Winner(Player::P2))),
        (false, false, true) => ([false, true], Some(RoundOutcome::Winner(Player::P1))),
        (false, true, true) => ([true, true], Some(RoundOutcome::Draw)),
    };

    Resolution { dies, outcome }
}
