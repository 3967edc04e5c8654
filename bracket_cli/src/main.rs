//! Command line front-end for double-elimination brackets.
//!
//! Brackets live in JSON files; every command reads one, and `build` and
//! `report` write the updated bracket back out.

mod commands;
mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Error, bail};
use bracket_engine::tournament::TournamentId;
use config::CliConfig;
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Build and run double-elimination brackets stored as JSON

USAGE:
  bracket <COMMAND> [OPTIONS]

COMMANDS:
  build       Seed ranked entrants and write a new bracket
  report      Record one match result
  standings   Print records and placements
  playable    Print matches ready to be played

BUILD OPTIONS:
  --entrants   FILE        JSON array of {id, name}, best first  [required]
  --tournament ID          Tournament id stored in the bracket   [default: 1]
  --out        FILE        Output file                           [default: stdout]

REPORT OPTIONS:
  --bracket    FILE        Bracket file                          [required]
  --match      ID          Match id such as W1-2, L3-1 or GF1    [required]
  --winner     ID          Winning competitor id                 [required]
  --loser      ID          Losing competitor id                  [required]
  --score      W-L         Game score, winner first (e.g. 3-1)
  --out        FILE        Output file                           [default: the bracket file]

STANDINGS / PLAYABLE OPTIONS:
  --bracket    FILE        Bracket file                          [required]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  BRACKET_BYE_POLICY       exclude | count       [default: exclude]
  BRACKET_GRAND_FINALS     reset | single        [default: reset]
  BRACKET_PRETTY_JSON      true | false          [default: true]
  BRACKET_MAX_COMPETITORS  Largest entrant list  [default: 1024]
  RUST_LOG                 Log level (e.g. info, debug)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    env_logger::builder().format_target(false).init();

    let config = CliConfig::from_env()?;

    match pargs.subcommand()?.as_deref() {
        Some("build") => {
            let entrants: PathBuf = pargs.value_from_str("--entrants")?;
            let tournament_id: TournamentId = pargs
                .opt_value_from_str("--tournament")?
                .unwrap_or(1);
            let out: Option<PathBuf> = pargs.opt_value_from_str("--out")?;
            finish_args(pargs)?;

            let bracket = commands::build(&read(&entrants)?, tournament_id, &config)?;
            info!(
                "Built tournament {} with {} competitors ({} playable matches)",
                tournament_id,
                bracket.competitors.len(),
                bracket.playable_matches().len()
            );
            emit(&commands::to_json(&bracket, &config)?, out.as_deref())?;
        }
        Some("report") => {
            let path: PathBuf = pargs.value_from_str("--bracket")?;
            let match_id: String = pargs.value_from_str("--match")?;
            let winner: String = pargs.value_from_str("--winner")?;
            let loser: String = pargs.value_from_str("--loser")?;
            let score: Option<String> = pargs.opt_value_from_str("--score")?;
            let out: Option<PathBuf> = pargs.opt_value_from_str("--out")?;
            finish_args(pargs)?;

            let mut bracket = commands::load(&read(&path)?)?;
            commands::report(&mut bracket, &match_id, &winner, &loser, score.as_deref())?;
            info!("Recorded {}: {} beat {}", match_id, winner, loser);

            let target = out.unwrap_or(path);
            emit(&commands::to_json(&bracket, &config)?, Some(&target))?;
        }
        Some("standings") => {
            let path: PathBuf = pargs.value_from_str("--bracket")?;
            finish_args(pargs)?;

            let bracket = commands::load(&read(&path)?)?;
            print!("{}", commands::render_standings(&bracket));
        }
        Some("playable") => {
            let path: PathBuf = pargs.value_from_str("--bracket")?;
            finish_args(pargs)?;

            let bracket = commands::load(&read(&path)?)?;
            print!("{}", commands::render_playable(&bracket));
        }
        Some(other) => bail!("Unknown command '{}'\n\n{}", other, HELP),
        None => {
            print!("{HELP}");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Reject arguments nothing consumed
fn finish_args(pargs: Arguments) -> Result<(), Error> {
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("Unexpected arguments: {:?}", remaining);
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to a file, or stdout when no file is given
fn emit(contents: &str, out: Option<&Path>) -> Result<(), Error> {
    match out {
        Some(path) => {
            std::fs::write(path, format!("{contents}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}
