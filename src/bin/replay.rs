// Standalone replay tool for duel snake session logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Re-simulate every tick and compare boards
//   --summary              Only list how each recorded round ended
//   --verbose              Show detailed output for each tick
//   --config <path>        Path to Duel.toml (default: Duel.toml)

use std::env;
use std::process;

use duel_snake::config::Config;
use duel_snake::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Duel Snake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Re-simulate every tick and compare boards");
    eprintln!("  --summary               Only list how each recorded round ended");
    eprintln!("  --verbose               Show detailed output for each tick");
    eprintln!("  --config <path>         Path to Duel.toml (default: Duel.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Check that a recorded session re-simulates exactly");
    eprintln!("  replay duel_session.jsonl --all");
    eprintln!();
    eprintln!("  # List round results");
    eprintln!("  replay duel_session.jsonl --summary");
}

fn main() {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Duel.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                mode = Some("all");
            }
            "--summary" => {
                mode = Some("summary");
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = args[i + 1].clone();
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all or --summary");
        print_usage();
        process::exit(1);
    };

    // Load configuration
    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        "all" => {
            println!("Re-simulating {} ticks...\n", entries.len());
            match engine.replay_all(&entries) {
                Ok(results) => {
                    engine.print_report(&entries, &results);
                    if results.iter().any(|r| !r.matches) {
                        process::exit(2);
                    }
                }
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        _ => {
            for summary in engine.round_summaries(&entries) {
                println!(
                    "Session {} round {}: {:?} after {} ticks (p1 {} : p2 {})",
                    summary.session,
                    summary.round,
                    summary.outcome,
                    summary.ticks,
                    summary.scores.p1,
                    summary.scores.p2
                );
            }
        }
    }
}
