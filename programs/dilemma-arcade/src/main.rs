//! Dilemma Arcade
//!
//! Terminal front end: play a session, store its results, browse history and
//! high scores.

mod cli;
mod ledger;
mod logging;
mod play;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use dilemma_logic::{registry, GameConfig, GameSession};

use crate::cli::{format_seed, Cli, Command};
use crate::ledger::{high_scores, history, Ledger, ResultSink};
use crate::play::Outcome;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.data_dir, cli.verbose)?;
    let mut ledger = Ledger::open(&cli.data_dir)?;
    log::debug!("{:<24}{}", "ledger", ledger.path().display());
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Play { user, opponents, seed, against } => {
            let seed = seed.unwrap_or_else(rand::random);
            let config = GameConfig { opponents_per_game: opponents, ..GameConfig::standard() };
            let mut session = if against.is_empty() {
                GameSession::random(seed, config)
            } else {
                let names: Vec<&str> = against.iter().map(|name| name.trim()).collect();
                GameSession::from_names(&names, seed, config)
            }
            .context("start session")?;
            log::info!("{:<24}{}", "session seed", format_seed(&seed));

            writeln!(
                out,
                "{} opponents, {} rounds each. Good luck, {}.",
                session.opponents().len(),
                session.rounds_per_opponent(),
                user
            )?;

            match play::run(&mut session, io::stdin().lock(), &mut out)? {
                Outcome::Abandoned => {
                    log::info!("session abandoned by {}", user);
                    writeln!(out, "session abandoned; nothing recorded")?;
                }
                Outcome::Finished => {
                    let finished = session.finish()?;
                    play::print_results(&finished, &mut out)?;
                    ledger
                        .record(&user, chrono::Utc::now(), &finished.results)
                        .context("save results")?;
                }
            }
        }
        Command::History { user } => {
            let sessions = history(&ledger.records()?, &user);
            if sessions.is_empty() {
                writeln!(out, "no games recorded for {}", user)?;
            }
            for s in sessions {
                writeln!(
                    out,
                    "{}  rounds {:>4}  score {:>5}  {}",
                    s.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    s.total_rounds,
                    s.total_score,
                    s.opponents
                )?;
            }
        }
        Command::Highscores => {
            for (rank, score) in high_scores(&ledger.records()?).iter().enumerate() {
                writeln!(out, "{:>3}. {:<24}{:>6}", rank + 1, score.user, score.high_score)?;
            }
        }
        Command::Strategies => {
            for info in registry::catalog() {
                let marker = if info.in_pool { ' ' } else { '*' };
                writeln!(out, "{}{:<24}{}", marker, info.id, info.description)?;
            }
            writeln!(out, "* never dealt at random; pick with --against")?;
        }
    }

    Ok(())
}
