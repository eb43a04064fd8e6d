// Replay module for re-simulating recorded sessions
//
// This module provides functionality to:
// 1. Parse JSONL session logs
// 2. Re-run the round engine from the recorded seed and directions
// 3. Compare every re-simulated board with the recorded one
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::engine::{RoundEngine, Snapshot};
use crate::rules::RoundOutcome;
use crate::session_log::SessionLogEntry;
use crate::types::{Player, Scores};

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub session: u32,
    pub round: u32,
    pub tick: u64,
    pub matches: bool,
    /// First field that differs from the recording
    pub difference: Option<String>,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_ticks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// How one recorded round finished
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub session: u32,
    pub round: u32,
    pub ticks: u64,
    pub outcome: Option<RoundOutcome>,
    pub scores: Scores,
}

/// Replay engine for session logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine; `config` must be the one the session ran with
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all entries from a JSONL file, ordered by session, round and tick
    pub fn load_log_file<P: AsRef<Path>>(
        &self,
        log_path: P,
    ) -> Result<Vec<SessionLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: SessionLogEntry = serde_json::from_str(&line).map_err(|e| {
                format!("Failed to parse JSON on line {}: {}", line_num + 1, e)
            })?;

            entries.push(entry);
        }

        // Writes are spawned per tick, so lines can land slightly out of order
        entries.sort_by_key(|e| (e.session, e.round, e.tick));

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-simulates every entry in order
    pub fn replay_all(&self, entries: &[SessionLogEntry]) -> Result<Vec<ReplayResult>, String> {
        let first = match entries.first() {
            Some(first) => first,
            None => return Ok(Vec::new()),
        };

        if let Some(other) = entries.iter().find(|e| e.seed != first.seed) {
            return Err(format!(
                "Log mixes seeds {} and {}; replay one session file at a time",
                first.seed, other.seed
            ));
        }
        if first.snapshot.grid_size != self.config.grid.size {
            return Err(format!(
                "Log was recorded on a {}x{} grid but the config says {}",
                first.snapshot.grid_size, first.snapshot.grid_size, self.config.grid.size
            ));
        }

        let mut engine = RoundEngine::with_seed(self.config.clone(), first.seed)?;
        engine.start();

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            results.push(self.replay_entry(&mut engine, entry)?);
        }

        Ok(results)
    }

    fn replay_entry(
        &self,
        engine: &mut RoundEngine,
        entry: &SessionLogEntry,
    ) -> Result<ReplayResult, String> {
        Self::align(engine, entry)?;

        if entry.tick != engine.tick_count() + 1 {
            warn!(
                "Session {} round {}: expected tick {}, log has tick {}",
                entry.session,
                entry.round,
                engine.tick_count() + 1,
                entry.tick
            );
        }

        for player in Player::both() {
            engine.set_intent(player, entry.directions[player.index()]);
        }

        engine.tick().ok_or_else(|| {
            format!(
                "Engine is not running at session {} round {} tick {}",
                entry.session, entry.round, entry.tick
            )
        })?;

        let difference = Self::describe_difference(&entry.snapshot, &engine.snapshot());
        let matches = difference.is_none();

        if self.verbose {
            if matches {
                info!(
                    "Session {} round {} tick {}: ✓ MATCH",
                    entry.session, entry.round, entry.tick
                );
            } else {
                warn!(
                    "Session {} round {} tick {}: ✗ MISMATCH - {}",
                    entry.session,
                    entry.round,
                    entry.tick,
                    difference.as_deref().unwrap_or_default()
                );
            }
        }

        Ok(ReplayResult {
            session: entry.session,
            round: entry.round,
            tick: entry.tick,
            matches,
            difference,
        })
    }

    /// Drives manual restarts and round renewals until the engine sits in the entry's round
    fn align(engine: &mut RoundEngine, entry: &SessionLogEntry) -> Result<(), String> {
        if entry.session < engine.session() {
            return Err(format!(
                "Log goes back from session {} to session {}",
                engine.session(),
                entry.session
            ));
        }
        if entry.session > engine.session() {
            while engine.session() < entry.session {
                engine.restart();
            }
            engine.start();
        }

        if entry.round < engine.round() {
            return Err(format!(
                "Log goes back from round {} to round {} in session {}",
                engine.round(),
                entry.round,
                entry.session
            ));
        }
        while engine.round() < entry.round {
            let handle = engine.pending_restart().ok_or_else(|| {
                format!(
                    "Round {} of session {} never ended but the log continues in round {}",
                    engine.round(),
                    entry.session,
                    entry.round
                )
            })?;
            engine.complete_restart(handle);
        }

        Ok(())
    }

    /// Names the first field where the re-simulated board differs
    fn describe_difference(expected: &Snapshot, actual: &Snapshot) -> Option<String> {
        if expected == actual {
            return None;
        }

        for player in Player::both() {
            let (e, a) = (expected.snake(player), actual.snake(player));
            if e.body != a.body {
                return Some(format!("{} body {:?} != {:?}", player, e.body, a.body));
            }
            if e.direction != a.direction {
                return Some(format!("{} direction {} != {}", player, e.direction, a.direction));
            }
            if e.alive != a.alive {
                return Some(format!("{} alive {} != {}", player, e.alive, a.alive));
            }
        }
        if expected.food != actual.food {
            return Some(format!("food {} != {}", expected.food, actual.food));
        }
        if expected.scores != actual.scores {
            return Some(format!("scores {:?} != {:?}", expected.scores, actual.scores));
        }
        if expected.food_collected != actual.food_collected {
            return Some(format!(
                "food collected {} != {}",
                expected.food_collected, actual.food_collected
            ));
        }
        if expected.last_outcome != actual.last_outcome {
            return Some(format!(
                "outcome {:?} != {:?}",
                expected.last_outcome, actual.last_outcome
            ));
        }

        Some("round flags or counters differ".to_string())
    }

    /// Collapses entries into one summary per recorded round
    pub fn round_summaries(&self, entries: &[SessionLogEntry]) -> Vec<RoundSummary> {
        let mut summaries: Vec<RoundSummary> = Vec::new();

        for entry in entries {
            let summary = RoundSummary {
                session: entry.session,
                round: entry.round,
                ticks: entry.tick,
                outcome: entry.outcome,
                scores: entry.snapshot.scores,
            };
            match summaries.last_mut() {
                Some(last) if last.session == entry.session && last.round == entry.round => {
                    *last = summary;
                }
                _ => summaries.push(summary),
            }
        }

        summaries
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_ticks = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_ticks - matches;
        let match_rate = if total_ticks > 0 {
            (matches as f64 / total_ticks as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_ticks,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, entries: &[SessionLogEntry], results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Ticks:    {}", stats.total_ticks);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        for summary in self.round_summaries(entries) {
            let outcome = match summary.outcome {
                Some(RoundOutcome::Winner(player)) => format!("{} wins", player),
                Some(RoundOutcome::Draw) => "draw".to_string(),
                None => "unfinished".to_string(),
            };
            println!(
                "Session {} round {}: {} after {} ticks (p1 {} : p2 {})",
                summary.session,
                summary.round,
                outcome,
                summary.ticks,
                summary.scores.p1,
                summary.scores.p2
            );
        }
        println!();

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Session {} round {} tick {}: {}",
                    result.session,
                    result.round,
                    result.tick,
                    result.difference.as_deref().unwrap_or_default()
                );
            }
            println!();
        }
    }
}
