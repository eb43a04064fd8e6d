// Game server facade
//
// Holds the single shared round engine and exposes one method per HTTP endpoint.
// Also owns the fixed-rate tick scheduler and the deferred round renewals.
// The engine mutex is never held across an await point.

use log::{debug, info};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::engine::{RestartHandle, RoundEngine, Snapshot, TickReport};
use crate::session_log::{SessionLogEntry, SessionLogger};
use crate::types::{Direction, Player};

pub type SharedEngine = Arc<Mutex<RoundEngine>>;

/// Direction as sent by an input adapter: a wire name or a raw unit vector
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum IntentDirection {
    Named(Direction),
    Vector { dx: i32, dy: i32 },
}

/// Body of POST /intent
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct IntentRequest {
    pub player: Player,
    pub direction: IntentDirection,
}

/// Local two-player game server
#[derive(Clone)]
pub struct GameServer {
    engine: SharedEngine,
    logger: SessionLogger,
    tick_interval: Duration,
    restart_delay: Duration,
}

impl GameServer {
    /// Creates a server around an engine; timings come from the engine's config
    pub fn new(engine: RoundEngine, logger: SessionLogger) -> Self {
        let timing = engine.config().timing.clone();
        GameServer {
            engine: Arc::new(Mutex::new(engine)),
            logger,
            tick_interval: Duration::from_millis(timing.tick_ms),
            restart_delay: Duration::from_millis(timing.restart_delay_ms),
        }
    }

    /// Server metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        let engine = self.engine.lock();
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "grid_size": engine.config().grid.size,
            "tick_ms": self.tick_interval.as_millis() as u64,
            "players": ["p1", "p2"],
        })
    }

    /// Corresponds to GET /state endpoint
    pub fn snapshot(&self) -> Snapshot {
        self.engine.lock().snapshot()
    }

    /// Corresponds to POST /intent endpoint
    /// Fails only for vectors that are not one of the four unit directions
    pub fn set_intent(&self, request: IntentRequest) -> Result<(), String> {
        let mut engine = self.engine.lock();
        match request.direction {
            IntentDirection::Named(direction) => {
                engine.set_intent(request.player, direction);
                Ok(())
            }
            IntentDirection::Vector { dx, dy } => engine.set_intent_vector(request.player, dx, dy),
        }
    }

    /// Corresponds to POST /start endpoint
    pub fn start(&self) -> Snapshot {
        let mut engine = self.engine.lock();
        engine.start();
        engine.snapshot()
    }

    /// Corresponds to POST /pause endpoint
    pub fn toggle_pause(&self) -> Snapshot {
        let mut engine = self.engine.lock();
        engine.toggle_pause();
        engine.snapshot()
    }

    /// Corresponds to POST /restart endpoint
    pub fn restart(&self) -> Snapshot {
        let mut engine = self.engine.lock();
        engine.restart();
        engine.snapshot()
    }

    /// Spawns the fixed-rate tick loop
    ///
    /// Missed intervals are skipped rather than replayed in a burst, and a tick
    /// on a stopped or paused engine does nothing.
    pub fn spawn_scheduler(&self) -> JoinHandle<()> {
        let server = self.clone();
        info!(
            "Tick scheduler running every {}ms",
            server.tick_interval.as_millis()
        );

        tokio::spawn(async move {
            let mut interval = time::interval(server.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                server.run_tick();
            }
        })
    }

    /// Applies one scheduler tick
    /// Must be called from within a tokio runtime
    pub fn run_tick(&self) -> Option<TickReport> {
        let (report, entry) = {
            let mut engine = self.engine.lock();
            let report = engine.tick()?;
            let entry = self
                .logger
                .is_enabled()
                .then(|| SessionLogEntry::new(engine.seed(), &report, engine.snapshot()));
            (report, entry)
        };

        if let Some(entry) = entry {
            self.logger.log_tick(entry);
        }
        if let Some(handle) = report.restart {
            self.schedule_restart(handle);
        }

        Some(report)
    }

    fn schedule_restart(&self, handle: RestartHandle) {
        let engine = self.engine.clone();
        let delay = self.restart_delay;
        debug!("Next round in {}ms", delay.as_millis());

        tokio::spawn(async move {
            time::sleep(delay).await;
            engine.lock().complete_restart(handle);
        });
    }
}
