// Round engine
//
// Owns the whole round state. Every mutation goes through `tick`, `set_intent`,
// `start`, `toggle_pause`, `restart` and `complete_restart`, so callers that
// serialize those calls never observe a half-applied tick.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::Config;
use crate::food::place_food;
use crate::rules::{resolve, Hazards, RoundOutcome};
use crate::snake::Snake;
use crate::types::{Coord, Direction, Player, Scores};

/// Token for the one-shot round renewal scheduled when a round ends.
/// Only the most recently issued handle is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartHandle {
    generation: u64,
}

/// What happened during one effective tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub session: u32,
    pub round: u32,
    /// Tick number within the round, starting at 1
    pub tick: u64,
    /// Directions committed this tick, indexed by `Player::index`
    pub directions: [Direction; 2],
    pub hazards: [Hazards; 2],
    pub head_on: bool,
    /// Players that ate, in evaluation order
    pub eaten_by: Vec<Player>,
    pub outcome: Option<RoundOutcome>,
    /// Present when the round ended; hand it back to `complete_restart`
    pub restart: Option<RestartHandle>,
}

impl TickReport {
    pub fn hazards_for(&self, player: Player) -> &Hazards {
        &self.hazards[player.index()]
    }

    pub fn direction_for(&self, player: Player) -> Direction {
        self.directions[player.index()]
    }
}

/// Read-only view of one snake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeView {
    pub player: Player,
    pub body: Vec<Coord>,
    pub direction: Direction,
    pub alive: bool,
}

/// Owned copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_size: i32,
    pub session: u32,
    pub round: u32,
    pub tick: u64,
    pub snakes: [SnakeView; 2],
    pub food: Coord,
    pub scores: Scores,
    pub food_collected: u32,
    pub running: bool,
    pub paused: bool,
    pub last_outcome: Option<RoundOutcome>,
}

impl Snapshot {
    pub fn snake(&self, player: Player) -> &SnakeView {
        &self.snakes[player.index()]
    }
}

pub struct RoundEngine {
    config: Config,
    seed: u64,
    rng: StdRng,
    snakes: [Snake; 2],
    food: Coord,
    scores: Scores,
    food_collected: u32,
    running: bool,
    paused: bool,
    session: u32,
    round: u32,
    tick: u64,
    last_outcome: Option<RoundOutcome>,
    restart_generation: u64,
    pending_restart: Option<RestartHandle>,
}

impl RoundEngine {
    /// Creates an engine with the configured seed, or a random one
    pub fn new(config: Config) -> Result<Self, String> {
        let seed = config.rng.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    /// Creates a stopped engine holding a fresh first round
    pub fn with_seed(config: Config, seed: u64) -> Result<Self, String> {
        config.validate()?;

        let snakes = Self::starting_snakes(&config);
        let mut engine = RoundEngine {
            rng: round_rng(seed, 1, 1),
            config,
            seed,
            snakes,
            food: Coord::new(0, 0),
            scores: Scores::default(),
            food_collected: 0,
            running: false,
            paused: false,
            session: 1,
            round: 1,
            tick: 0,
            last_outcome: None,
            restart_generation: 0,
            pending_restart: None,
        };
        engine.reset_round();

        info!("Round engine ready (seed {})", seed);
        Ok(engine)
    }

    /// Creates a stopped engine around an explicit board
    ///
    /// Both snakes must lie on the grid without sharing a cell, and the food
    /// must sit on a free cell.
    pub fn with_round(
        config: Config,
        seed: u64,
        p1: Snake,
        p2: Snake,
        food: Coord,
    ) -> Result<Self, String> {
        config.validate()?;
        let size = config.grid.size;

        for (player, snake) in Player::both().into_iter().zip([&p1, &p2]) {
            if snake.is_empty() {
                return Err(format!("{} has an empty body", player));
            }
            if let Some(outside) = snake.body.iter().find(|c| !c.is_inside(size)) {
                return Err(format!("{} segment {} is off the grid", player, outside));
            }
        }
        if let Some(shared) = p1.body.iter().find(|c| p2.occupies(c)) {
            return Err(format!("snakes overlap at {}", shared));
        }
        if !food.is_inside(size) {
            return Err(format!("food {} is off the grid", food));
        }
        if p1.occupies(&food) || p2.occupies(&food) {
            return Err(format!("food {} sits on a snake", food));
        }

        Ok(RoundEngine {
            rng: round_rng(seed, 1, 1),
            config,
            seed,
            snakes: [p1, p2],
            food,
            scores: Scores::default(),
            food_collected: 0,
            running: false,
            paused: false,
            session: 1,
            round: 1,
            tick: 0,
            last_outcome: None,
            restart_generation: 0,
            pending_restart: None,
        })
    }

    fn starting_snakes(config: &Config) -> [Snake; 2] {
        let grid = &config.grid;
        let row = grid.size / 2;
        [
            Snake::new_at(
                Coord::new(grid.start_inset, row),
                Direction::Right,
                grid.start_length,
            ),
            Snake::new_at(
                Coord::new(grid.size - 1 - grid.start_inset, row),
                Direction::Left,
                grid.start_length,
            ),
        ]
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snake(&self, player: Player) -> &Snake {
        &self.snakes[player.index()]
    }

    pub fn food(&self) -> Coord {
        self.food
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn food_collected(&self) -> u32 {
        self.food_collected
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    pub fn pending_restart(&self) -> Option<RestartHandle> {
        self.pending_restart
    }

    /// Overwrites the player's requested direction; consumed by the next tick
    pub fn set_intent(&mut self, player: Player, direction: Direction) {
        debug!("{} intent {}", player, direction);
        self.snakes[player.index()].pending_direction = direction;
    }

    /// Same as `set_intent` for raw (dx, dy) input
    pub fn set_intent_vector(&mut self, player: Player, dx: i32, dy: i32) -> Result<(), String> {
        let direction = Direction::from_vector(dx, dy)
            .ok_or_else(|| format!("({}, {}) is not a unit direction", dx, dy))?;
        self.set_intent(player, direction);
        Ok(())
    }

    /// Starts or resumes play. Ignored while a finished round waits for renewal.
    pub fn start(&mut self) {
        if self.pending_restart.is_some() {
            debug!("Start ignored: round {} is waiting for renewal", self.round);
            return;
        }
        if !self.running {
            self.running = true;
            self.paused = false;
            info!("Round {} started", self.round);
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.running {
            return;
        }
        self.paused = !self.paused;
        info!(
            "Round {} {}",
            self.round,
            if self.paused { "paused" } else { "resumed" }
        );
    }

    /// Clears the scores and installs a fresh round, leaving the engine stopped.
    /// Any outstanding restart handle becomes stale.
    pub fn restart(&mut self) {
        if self.pending_restart.take().is_some() {
            debug!("Manual restart cancelled the scheduled round renewal");
        }
        self.scores = Scores::default();
        self.running = false;
        self.paused = false;
        self.session += 1;
        self.round = 1;
        self.reset_round();
        info!("Session {} restarted", self.session);
    }

    /// Installs the next round if `handle` is still the current one
    ///
    /// # Returns
    /// * `bool` - false when the handle was cancelled or already used
    pub fn complete_restart(&mut self, handle: RestartHandle) -> bool {
        if self.pending_restart != Some(handle) {
            warn!("Ignoring stale round renewal (generation {})", handle.generation);
            return false;
        }

        self.pending_restart = None;
        self.round += 1;
        self.reset_round();
        self.running = true;
        info!("Round {} begins", self.round);
        true
    }

    /// Fresh snakes and food for the current round; scores are untouched
    fn reset_round(&mut self) {
        self.rng = round_rng(self.seed, self.session, self.round);
        self.snakes = Self::starting_snakes(&self.config);
        self.food = self.spawn_food();
        self.food_collected = 0;
        self.tick = 0;
        self.last_outcome = None;
    }

    fn spawn_food(&mut self) -> Coord {
        let occupied: HashSet<Coord> = self
            .snakes
            .iter()
            .flat_map(|snake| snake.body.iter().copied())
            .collect();

        place_food(
            &occupied,
            self.config.grid.size,
            self.config.food.max_random_attempts,
            &mut self.rng,
        )
    }

    /// Advances the round by one step
    ///
    /// # Returns
    /// * `Option<TickReport>` - `None` when stopped or paused (nothing changed)
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.running || self.paused {
            return None;
        }

        let size = self.config.grid.size;
        let [p1, p2] = &mut self.snakes;

        let directions = [p1.commit_direction(), p2.commit_direction()];
        let next_heads = [p1.next_head(), p2.next_head()];

        let hazards = [
            Hazards::classify(next_heads[0], p1, p2, size),
            Hazards::classify(next_heads[1], p2, p1, size),
        ];
        let head_on = next_heads[0] == next_heads[1];
        let resolution = resolve(head_on, &hazards[0], &hazards[1]);

        // Both growth and eating compare against the food as it was before
        // this tick's respawn
        let food = self.food;
        for player in Player::both() {
            let snake = &mut self.snakes[player.index()];
            if resolution.dies(player) {
                snake.alive = false;
                continue;
            }
            let next = next_heads[player.index()];
            snake.advance(next, next == food);
        }

        let eaten_by: Vec<Player> = Player::both()
            .into_iter()
            .filter(|p| !resolution.dies(*p) && next_heads[p.index()] == food)
            .collect();
        for &player in &eaten_by {
            self.scores.add(player, self.config.scoring.food_points);
            self.food_collected += 1;
            debug!("{} ate food at {}", player, food);
        }
        if !eaten_by.is_empty() {
            self.food = self.spawn_food();
        }

        self.tick += 1;
        debug!(
            "Round {} tick {}: p1 {} -> {}, p2 {} -> {}",
            self.round, self.tick, directions[0], next_heads[0], directions[1], next_heads[1]
        );

        let restart = resolution.outcome.map(|outcome| self.end_round(outcome));

        Some(TickReport {
            session: self.session,
            round: self.round,
            tick: self.tick,
            directions,
            hazards,
            head_on,
            eaten_by,
            outcome: resolution.outcome,
            restart,
        })
    }

    fn end_round(&mut self, outcome: RoundOutcome) -> RestartHandle {
        self.running = false;
        if let RoundOutcome::Winner(player) = outcome {
            self.scores.add(player, self.config.scoring.win_bonus);
        }
        self.last_outcome = Some(outcome);

        self.restart_generation += 1;
        let handle = RestartHandle {
            generation: self.restart_generation,
        };
        self.pending_restart = Some(handle);

        match outcome {
            RoundOutcome::Winner(player) => info!(
                "Round {} won by {} after {} ticks (p1 {} : p2 {})",
                self.round, player, self.tick, self.scores.p1, self.scores.p2
            ),
            RoundOutcome::Draw => info!(
                "Round {} drawn after {} ticks (p1 {} : p2 {})",
                self.round, self.tick, self.scores.p1, self.scores.p2
            ),
        }

        handle
    }

    pub fn snapshot(&self) -> Snapshot {
        let view = |player: Player| {
            let snake = &self.snakes[player.index()];
            SnakeView {
                player,
                body: snake.body.iter().copied().collect(),
                direction: snake.direction,
                alive: snake.alive,
            }
        };

        Snapshot {
            grid_size: self.config.grid.size,
            session: self.session,
            round: self.round,
            tick: self.tick,
            snakes: [view(Player::P1), view(Player::P2)],
            food: self.food,
            scores: self.scores,
            food_collected: self.food_collected,
            running: self.running,
            paused: self.paused,
            last_outcome: self.last_outcome,
        }
    }
}

/// Random stream for one round, derived from the engine seed and the round identity
fn round_rng(seed: u64, session: u32, round: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ (u64::from(session) << 32) ^ u64::from(round))
}
