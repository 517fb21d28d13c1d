use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Where the result ledger and logs live
    #[arg(long, env = "DILEMMA_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,
    /// Echo engine logs to the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Play a session against a lineup of scripted opponents")]
    Play {
        #[arg(long, env = "DILEMMA_USER")]
        user: String,
        /// Opponents dealt at random from the pool
        #[arg(long, default_value_t = 5)]
        opponents: usize,
        /// 64 hex characters; random when omitted
        #[arg(long, value_parser = parse_seed)]
        seed: Option<[u8; 32]>,
        /// Play these strategies in this order instead of a random lineup
        #[arg(long, value_delimiter = ',')]
        against: Vec<String>,
    },
    #[command(about = "List a user's past sessions", alias = "hist")]
    History {
        #[arg(long, env = "DILEMMA_USER")]
        user: String,
    },
    #[command(about = "Best session score of every user")]
    Highscores,
    #[command(about = "Describe every opponent strategy")]
    Strategies,
}

pub fn parse_seed(hex: &str) -> Result<[u8; 32], String> {
    let hex = hex.trim();
    if hex.len() != 64 || !hex.is_ascii() {
        return Err("seed must be exactly 64 hex characters".to_string());
    }
    let mut seed = [0u8; 32];
    for (i, byte) in seed.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
            .map_err(|e| format!("seed byte {}: {}", i, e))?;
    }
    Ok(seed)
}

pub fn format_seed(seed: &[u8; 32]) -> String {
    seed.iter().map(|b| format!("{:02x}", b)).collect()
}
