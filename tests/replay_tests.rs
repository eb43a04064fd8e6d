// Replay tests
//
// Records sessions straight from the round engine, then checks that the
// replay engine re-simulates them tick for tick:
// - Loading JSONL session logs
// - Following round renewals and manual restarts
// - Detecting tampered entries
// - Summarising rounds

use duel_snake::config::Config;
use duel_snake::engine::RoundEngine;
use duel_snake::replay::ReplayEngine;
use duel_snake::rules::RoundOutcome;
use duel_snake::session_log::SessionLogEntry;
use duel_snake::types::{Coord, Direction, Player};
use std::fs;
use std::path::PathBuf;

const SEED: u64 = 2024;

fn config() -> Config {
    Config::with_grid_size(12)
}

/// p1 staircases up and right, p2 runs down into the wall on tick 6 of every round.
/// A manual restart happens before step 20.
fn record_session(steps: usize) -> Vec<SessionLogEntry> {
    let mut engine = RoundEngine::with_seed(config(), SEED).expect("valid config");
    engine.start();

    let mut entries = Vec::new();
    for step in 0..steps {
        if step == 20 {
            engine.restart();
            engine.start();
        }

        let p1 = if engine.tick_count() % 2 == 0 {
            Direction::Up
        } else {
            Direction::Right
        };
        engine.set_intent(Player::P1, p1);
        engine.set_intent(Player::P2, Direction::Down);

        if let Some(report) = engine.tick() {
            entries.push(SessionLogEntry::new(engine.seed(), &report, engine.snapshot()));
            if let Some(handle) = report.restart {
                engine.complete_restart(handle);
            }
        }
    }

    entries
}

fn temp_log_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("duel_snake_{}_{}.jsonl", name, std::process::id()))
}

fn write_log(path: &PathBuf, entries: &[SessionLogEntry]) {
    let contents: String = entries
        .iter()
        .map(|e| e.to_json_line().expect("entry should serialize"))
        .collect();
    fs::write(path, contents).expect("Failed to write temp log");
}

#[test]
fn test_recorded_session_shape() {
    let entries = record_session(40);

    assert_eq!(entries.len(), 40, "every step should tick");
    assert_eq!(entries[0].session, 1);
    assert_eq!(entries[0].round, 1);
    assert_eq!(entries[0].tick, 1);
    assert_eq!(entries[5].outcome, Some(RoundOutcome::Winner(Player::P1)));
    assert_eq!(entries[6].round, 2);
    assert_eq!(entries[20].session, 2);
    assert_eq!(entries[20].round, 1);
    // Scores restart from zero, so only this round's food counts
    let snapshot = &entries[20].snapshot;
    assert_eq!(
        snapshot.scores.p1 + snapshot.scores.p2,
        snapshot.food_collected
    );
}

#[test]
fn test_replay_matches_every_tick() {
    let entries = record_session(40);
    let replay = ReplayEngine::new(config(), false);

    let results = replay.replay_all(&entries).expect("replay should succeed");

    assert_eq!(results.len(), entries.len());
    for result in &results {
        assert!(
            result.matches,
            "session {} round {} tick {} diverged: {:?}",
            result.session, result.round, result.tick, result.difference
        );
    }

    let stats = replay.generate_stats(&results);
    assert_eq!(stats.total_ticks, 40);
    assert_eq!(stats.mismatches, 0);
    assert_eq!(stats.match_rate, 100.0);
}

#[test]
fn test_load_log_file_round_trip() {
    let entries = record_session(25);
    let path = temp_log_path("round_trip");
    write_log(&path, &entries);

    let replay = ReplayEngine::new(config(), false);
    let loaded = replay.load_log_file(&path).expect("Failed to load temp log");
    fs::remove_file(&path).ok();

    assert_eq!(loaded, entries);
}

#[test]
fn test_load_log_file_restores_tick_order() {
    let mut entries = record_session(12);
    let expected = entries.clone();
    entries.swap(3, 4);
    entries.swap(0, 9);

    let path = temp_log_path("out_of_order");
    write_log(&path, &entries);

    let replay = ReplayEngine::new(config(), false);
    let loaded = replay.load_log_file(&path).expect("Failed to load temp log");
    fs::remove_file(&path).ok();

    assert_eq!(loaded, expected);
}

#[test]
fn test_load_log_file_reports_bad_line() {
    let path = temp_log_path("bad_line");
    fs::write(&path, "{\"not\": \"an entry\"}\n").expect("Failed to write temp log");

    let replay = ReplayEngine::new(config(), false);
    let result = replay.load_log_file(&path);
    fs::remove_file(&path).ok();

    let err = result.expect_err("malformed line should fail");
    assert!(err.contains("line 1"), "unexpected error: {}", err);
}

#[test]
fn test_tampered_food_is_reported() {
    let mut entries = record_session(10);
    let original = entries[2].snapshot.food;
    entries[2].snapshot.food = if original == Coord::new(11, 11) {
        Coord::new(0, 11)
    } else {
        Coord::new(11, 11)
    };

    let replay = ReplayEngine::new(config(), false);
    let results = replay.replay_all(&entries).expect("replay should succeed");

    assert!(!results[2].matches);
    let difference = results[2].difference.clone().unwrap_or_default();
    assert!(difference.starts_with("food"), "unexpected difference: {}", difference);
    assert!(results[3].matches, "later ticks replay from the engine, not the log");
}

#[test]
fn test_mixed_seeds_are_rejected() {
    let mut entries = record_session(8);
    entries[4].seed = SEED + 1;

    let replay = ReplayEngine::new(config(), false);
    assert!(replay.replay_all(&entries).is_err());
}

#[test]
fn test_grid_size_mismatch_is_rejected() {
    let entries = record_session(3);
    let replay = ReplayEngine::new(Config::default_hardcoded(), false);
    assert!(replay.replay_all(&entries).is_err());
}

#[test]
fn test_empty_log_replays_to_nothing() {
    let replay = ReplayEngine::new(config(), false);
    let results = replay.replay_all(&[]).expect("empty replay should succeed");
    assert!(results.is_empty());
}

#[test]
fn test_round_summaries() {
    let entries = record_session(40);
    let replay = ReplayEngine::new(config(), false);

    let summaries = replay.round_summaries(&entries);

    // 20 steps per session: three finished rounds of 6 ticks plus 2 ticks
    assert_eq!(summaries.len(), 8);
    for summary in &summaries {
        if summary.round < 4 {
            assert_eq!(summary.ticks, 6);
            assert_eq!(summary.outcome, Some(RoundOutcome::Winner(Player::P1)));
        } else {
            assert_eq!(summary.ticks, 2);
            assert_eq!(summary.outcome, None);
        }
    }
    assert!(summaries[2].scores.p1 >= 9, "three wins earn at least 9 points");
    assert_eq!(summaries[4].session, 2);
}
