//! Heroville Headless Balance Simulator
//!
//! Runs whole sessions through the real tick loop with an automated town
//! manager, then reports how heroes fared.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N        Number of runs with incrementing seeds (default: 20)
//!   --ticks N       Ticks per run (default: 3600 = 1 hour game time)
//!   --seed N        RNG seed (default: 42)
//!   --heroes N      Heroes at the start of each run (default: 1)
//!   --balance FILE  JSON balance overrides
//!   --legacy        Use the legacy reward scheme
//!   --json          Print the report as JSON
//!   --verbose       Log each run

use heroville::core::balance::Balance;
use heroville::simulator::{run_simulation, SimConfig};
use std::path::Path;
use std::process;
use tracing::Level;

// ── CLI Configuration ────────────────────────────────────────────────

struct CliConfig {
    sim: SimConfig,
    json: bool,
}

fn parse_number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|s| s.parse::<T>()) {
        Some(Ok(value)) => value,
        _ => {
            eprintln!("{flag} requires a number");
            print_usage();
            process::exit(1);
        }
    }
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = CliConfig {
        sim: SimConfig {
            num_runs: 20,
            seed: Some(42),
            verbosity: 0,
            ..Default::default()
        },
        json: false,
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                config.sim.num_runs = parse_number(&args, i, "--runs");
            }
            "--ticks" => {
                i += 1;
                config.sim.ticks_per_run = parse_number(&args, i, "--ticks");
            }
            "--seed" => {
                i += 1;
                config.sim.seed = Some(parse_number(&args, i, "--seed"));
            }
            "--heroes" => {
                i += 1;
                config.sim.starting_heroes = parse_number(&args, i, "--heroes");
            }
            "--balance" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("--balance requires a file");
                    process::exit(1);
                };
                config.sim.balance = match Balance::load(Path::new(path)) {
                    Ok(balance) => balance,
                    Err(e) => {
                        eprintln!("Failed to read {path}: {e}");
                        process::exit(1);
                    }
                };
            }
            "--legacy" => config.sim.balance = Balance::legacy_rewards(),
            "--json" => config.json = true,
            "--verbose" => config.sim.verbosity = 2,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn print_usage() {
    eprintln!(
        "Heroville Balance Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N        Number of runs with incrementing seeds (default: 20)\n\
         \x20 --ticks N       Ticks per run (default: 3600 = 1 hour)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --heroes N      Heroes at the start of each run (default: 1)\n\
         \x20 --balance FILE  JSON balance overrides\n\
         \x20 --legacy        Use the legacy reward scheme\n\
         \x20 --json          Print the report as JSON\n\
         \x20 --verbose       Log each run\n\
         \x20 --help, -h      Show this help"
    );
}

fn main() {
    let config = parse_args();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::INFO)
        .init();

    if !config.json {
        eprintln!(
            "Heroville Simulator: {} ticks x {} run(s), seed={}",
            config.sim.ticks_per_run,
            config.sim.num_runs,
            config.sim.seed.unwrap_or_default(),
        );
    }

    let report = run_simulation(&config.sim);

    if config.json {
        println!("{}", report.to_json());
    } else {
        print!("{}", report.to_text());
    }
}
