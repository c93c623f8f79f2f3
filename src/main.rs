//! Heroville headless session.
//!
//! Loads the last save (or starts a new town), runs the tick loop with the
//! automated town manager and prints the event log as it grows.
//!
//! Usage:
//!   heroville [OPTIONS]
//!
//! Options:
//!   --ticks N        Ticks to run (default: 600)
//!   --seed N         RNG seed (default: random)
//!   --fresh          Ignore any existing save
//!   --heroes N       Heroes in a fresh town (default: 1)
//!   --save FILE      Save file (default: platform data directory)
//!   --export FILE    Write a JSON copy of the game on exit
//!   --import FILE    Start from a JSON export
//!   --realtime       Tick once per second instead of as fast as possible
//!   --no-manage      Do not gather, build or craft automatically
//!   --quiet          Only print the final summary

use heroville::core::constants::AUTOSAVE_INTERVAL_TICKS;
use heroville::core::game_loop::{Game, GameLoop, TickClock};
use heroville::core::game_state::GameState;
use heroville::save::SaveManager;
use heroville::simulator::{bootstrap_state, manage_town};
use heroville::town::StandardCatalog;
use heroville::Balance;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};
use tracing::{info, warn, Level};

const MAX_BUILDING_LEVEL: u32 = 5;

struct Config {
    ticks: u64,
    seed: Option<u64>,
    fresh: bool,
    heroes: u32,
    save_path: Option<PathBuf>,
    export_path: Option<PathBuf>,
    import_path: Option<PathBuf>,
    realtime: bool,
    manage: bool,
    quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticks: 600,
            seed: None,
            fresh: false,
            heroes: 1,
            save_path: None,
            export_path: None,
            import_path: None,
            realtime: false,
            manage: true,
            quiet: false,
        }
    }
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("{flag} requires a value");
            print_usage();
            process::exit(1);
        }
    }
}

fn parse_number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match next_value(args, i, flag).parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("{flag} requires a number");
            process::exit(1);
        }
    }
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => {
                i += 1;
                config.ticks = parse_number(&args, i, "--ticks");
            }
            "--seed" => {
                i += 1;
                config.seed = Some(parse_number(&args, i, "--seed"));
            }
            "--heroes" => {
                i += 1;
                config.heroes = parse_number(&args, i, "--heroes");
            }
            "--save" => {
                i += 1;
                config.save_path = Some(PathBuf::from(next_value(&args, i, "--save")));
            }
            "--export" => {
                i += 1;
                config.export_path = Some(PathBuf::from(next_value(&args, i, "--export")));
            }
            "--import" => {
                i += 1;
                config.import_path = Some(PathBuf::from(next_value(&args, i, "--import")));
            }
            "--fresh" => config.fresh = true,
            "--realtime" => config.realtime = true,
            "--no-manage" => config.manage = false,
            "--quiet" => config.quiet = true,
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
        "Heroville - Idle Dungeon Crawler\n\
         \n\
         Usage: heroville [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --ticks N        Ticks to run (default: 600)\n\
         \x20 --seed N         RNG seed (default: random)\n\
         \x20 --fresh          Ignore any existing save\n\
         \x20 --heroes N       Heroes in a fresh town (default: 1)\n\
         \x20 --save FILE      Save file (default: platform data directory)\n\
         \x20 --export FILE    Write a JSON copy of the game on exit\n\
         \x20 --import FILE    Start from a JSON export\n\
         \x20 --realtime       Tick once per second\n\
         \x20 --no-manage      Do not gather, build or craft automatically\n\
         \x20 --quiet          Only print the final summary\n\
         \x20 --help, -h       Show this help"
    );
}

fn load_or_create(config: &Config, manager: &SaveManager, rng: &mut ChaCha8Rng) -> GameState {
    if let Some(path) = &config.import_path {
        match manager.import_json(path, rng) {
            Ok(state) => {
                info!(path = %path.display(), "imported game");
                return state;
            }
            Err(e) => warn!(error = %e, "import failed, starting a new town"),
        }
    } else if !config.fresh && manager.save_exists() {
        match manager.load(rng) {
            Ok(state) => {
                info!(tick = state.tick, heroes = state.heroes.len(), "loaded save");
                return state;
            }
            Err(e) => warn!(error = %e, "save could not be loaded, starting a new town"),
        }
    }
    bootstrap_state(Balance::default(), config.heroes, rng)
}

/// Prints log lines written during `tick`, oldest first.
fn print_new_lines(state: &GameState, tick: u64) {
    let mut lines: Vec<&str> = state
        .log
        .entries()
        .take_while(|entry| entry.tick == tick)
        .map(|entry| entry.message.as_str())
        .collect();
    lines.reverse();
    for line in lines {
        println!("[{tick:>6}] {line}");
    }
}

fn print_summary(state: &GameState) {
    println!("--- Tick {} ---", state.tick);
    for hero in &state.heroes {
        println!(
            "  {} L{} {}/{} HP, {} gold, {}",
            hero.name, hero.level, hero.health, hero.max_health, hero.inventory.gold, hero.status
        );
    }
    let resources = &state.town.resources;
    println!(
        "  Town: {} materials, {} parts, {} gold",
        resources.materials, resources.monster_parts, resources.gold
    );
}

fn main() -> io::Result<()> {
    let config = parse_args();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::INFO)
        .init();

    let manager = match &config.save_path {
        Some(path) => SaveManager::with_path(path.clone())?,
        None => SaveManager::new()?,
    };
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let catalog = StandardCatalog;
    let mut game = Game::with_catalog(load_or_create(&config, &manager, &mut rng), catalog);
    let mut clock = TickClock::default();
    let mut last_frame = Instant::now();
    let mut ticks_run = 0;

    while ticks_run < config.ticks {
        let due = if config.realtime {
            std::thread::sleep(Duration::from_millis(50));
            let elapsed = last_frame.elapsed().as_millis() as u64;
            last_frame = Instant::now();
            clock.advance(elapsed).min(config.ticks - ticks_run)
        } else {
            1
        };

        for _ in 0..due {
            game.tick(&mut rng);
            ticks_run += 1;
            let tick = game.state().tick;
            if config.manage {
                manage_town(game.state_mut(), &catalog, MAX_BUILDING_LEVEL, &mut rng);
            }
            if !config.quiet {
                print_new_lines(game.state(), tick);
            }
            if tick % AUTOSAVE_INTERVAL_TICKS == 0 {
                if let Err(e) = manager.save(game.state()) {
                    warn!(error = %e, "autosave failed");
                }
            }
        }
    }

    manager.save(game.state())?;
    if let Some(path) = &config.export_path {
        manager.export_json(game.state(), path)?;
    }
    print_summary(game.state());
    Ok(())
}
