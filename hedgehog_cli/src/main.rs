// Hedgehog forest: headless scripted driver.
//
// Loads a map, builds a session, plays a command script against it, and
// prints the final game snapshot as JSON. Every game event is logged through
// `tracing` (set `RUST_LOG=info` to see them, `debug` for hazard rolls and
// predator moves).
//
// Usage:
//   cargo run -p hedgehog_cli -- <map.json> [--script FILE] [--config FILE] [--seed N]
//
// Without `--script` the script is read from stdin. Without `--seed` the
// seed comes from the clock and is logged so the run can be replayed.
//
// Script format: one command per line. `up`/`down`/`left`/`right` (and the
// compass synonyms), `move DIR`, `collect`, `talk`, `curl`, `uncurl`,
// `tick [N]`, `restart`, or a JSON `GameCommand`. `#` starts a comment.

use anyhow::{Context, Result};
use hedgehog_prng::GameRng;
use hedgehog_sim::command::{CommandOutcome, GameCommand, ScriptStep, parse_script_line};
use hedgehog_sim::config::SimConfig;
use hedgehog_sim::event::GameEvent;
use hedgehog_sim::map::MapDescription;
use hedgehog_sim::session::{RestartOutcome, Session};
use std::io::Read;
use tracing::{debug, error, info, warn};

const USAGE: &str = "usage: hedgehog <map.json> [--script FILE] [--config FILE] [--seed N]";

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!(error = %err, "run failed");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let map_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .context(USAGE)?;
    let map_json =
        std::fs::read_to_string(map_path).with_context(|| format!("reading map {map_path}"))?;
    let map = MapDescription::from_json(&map_json)
        .with_context(|| format!("parsing map {map_path}"))?;

    let config = match parse_flag::<String>(&args, "--config")? {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            SimConfig::from_json(&json).with_context(|| format!("parsing config {path}"))?
        }
        None => SimConfig::default(),
    };

    let seed = match parse_flag::<u64>(&args, "--seed")? {
        Some(seed) => seed,
        None => GameRng::from_clock().next_u64(),
    };

    let script = match parse_flag::<String>(&args, "--script")? {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading script {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading script from stdin")?;
            buf
        }
    };

    info!(
        seed,
        width = map.width,
        height = map.height,
        "starting session"
    );
    let mut session = Session::new(map, config, seed);
    session.controller_mut().events_mut().on_any(log_event);

    for (index, line) in script.lines().enumerate() {
        let step = parse_script_line(line)
            .with_context(|| format!("script line {}: {line:?}", index + 1))?;
        let Some(step) = step else {
            continue;
        };
        match step {
            ScriptStep::Command(command) => {
                let outcome = session.apply(command);
                if outcome == CommandOutcome::Ignored {
                    debug!(line = index + 1, "command ignored, game is over");
                }
            }
            ScriptStep::Ticks(n) => {
                for _ in 0..n {
                    session.apply(GameCommand::Tick);
                }
            }
            ScriptStep::Restart => match session.restart() {
                RestartOutcome::OutOfLives => info!("no lives left, restart again for a new game"),
                outcome => info!(?outcome, "restarted"),
            },
        }
    }

    let snapshot = session.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn log_event(event: &GameEvent) {
    match serde_json::to_string(event) {
        Ok(payload) => info!(event = event.name(), %payload, "game event"),
        Err(err) => warn!(event = event.name(), error = %err, "could not serialize event"),
    }
}

/// The value after `flag`, if the flag is present. A flag with no value, or
/// a value that does not parse, is an error.
fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let value = args
        .get(i + 1)
        .filter(|v| !v.starts_with("--"))
        .with_context(|| format!("{flag} needs a value\n{USAGE}"))?;
    let parsed = value
        .parse()
        .with_context(|| format!("invalid value for {flag}: {value:?}"))?;
    Ok(Some(parsed))
}
