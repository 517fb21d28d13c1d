//! Result ledger
//!
//! Finished matches are appended to a JSON-lines file, one line per
//! (user, session, opponent). A session is identified by the timestamp it
//! was recorded under; history and high scores group on it.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use dilemma_logic::{MatchResult, StrategyKind};
use serde::{Deserialize, Serialize};

const LEDGER_FILE: &str = "games.jsonl";

/// Where finished sessions go
pub trait ResultSink {
    fn record(
        &mut self,
        user: &str,
        timestamp: DateTime<Utc>,
        results: &[MatchResult],
    ) -> anyhow::Result<()>;
}

/// One stored match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub opponent: StrategyKind,
    pub rounds_played: usize,
    pub user_score: u32,
    pub opponent_score: u32,
}

impl GameRecord {
    pub fn new(user: &str, timestamp: DateTime<Utc>, result: &MatchResult) -> Self {
        Self {
            user: user.to_string(),
            timestamp,
            opponent: result.opponent,
            rounds_played: result.rounds_played(),
            user_score: result.user_score,
            opponent_score: result.ai_score,
        }
    }
}

/// JSON-lines ledger in the data directory
#[derive(Clone, Debug)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("create data directory {}", data_dir.display()))?;
        Ok(Self { path: data_dir.join(LEDGER_FILE) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored match; a missing ledger is an empty one
    pub fn records(&self) -> anyhow::Result<Vec<GameRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("open {}", self.path.display()));
            }
        };

        let mut records = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("read {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line)
                .with_context(|| format!("{} line {}", self.path.display(), n + 1))?;
            records.push(record);
        }
        Ok(records)
    }
}

impl ResultSink for Ledger {
    fn record(
        &mut self,
        user: &str,
        timestamp: DateTime<Utc>,
        results: &[MatchResult],
    ) -> anyhow::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);

        for result in results {
            let record = GameRecord::new(user, timestamp, result);
            serde_json::to_writer(&mut writer, &record).context("serialize game record")?;
            writer.write_all(b"\n")?;
        }
        writer.flush().with_context(|| format!("write {}", self.path.display()))?;

        log::info!(
            "{:<24}{} matches for {}",
            "recorded session",
            results.len(),
            user
        );
        Ok(())
    }
}

/// One past session of a user
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub timestamp: DateTime<Utc>,
    pub total_rounds: usize,
    pub total_score: u32,
    pub opponents: String,
}

/// A user's sessions, newest first
pub fn history(records: &[GameRecord], user: &str) -> Vec<SessionSummary> {
    let mut sessions: BTreeMap<DateTime<Utc>, SessionSummary> = BTreeMap::new();
    for record in records.iter().filter(|r| r.user == user) {
        let summary = sessions
            .entry(record.timestamp)
            .or_insert_with(|| SessionSummary {
                timestamp: record.timestamp,
                total_rounds: 0,
                total_score: 0,
                opponents: String::new(),
            });
        summary.total_rounds += record.rounds_played;
        summary.total_score += record.user_score;
        if !summary.opponents.is_empty() {
            summary.opponents.push_str(", ");
        }
        summary.opponents.push_str(record.opponent.name());
    }
    sessions.into_values().rev().collect()
}

/// A user's best session
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HighScore {
    pub user: String,
    pub high_score: u32,
}

/// Best session total per user, highest first
pub fn high_scores(records: &[GameRecord]) -> Vec<HighScore> {
    let mut sessions: HashMap<(&str, DateTime<Utc>), u32> = HashMap::new();
    for record in records {
        *sessions.entry((record.user.as_str(), record.timestamp)).or_insert(0) += record.user_score;
    }

    let mut best: HashMap<&str, u32> = HashMap::new();
    for ((user, _), total) in sessions {
        let entry = best.entry(user).or_insert(total);
        *entry = (*entry).max(total);
    }

    let mut scores: Vec<HighScore> = best
        .into_iter()
        .map(|(user, high_score)| HighScore { user: user.to_string(), high_score })
        .collect();
    scores.sort_by(|a, b| b.high_score.cmp(&a.high_score).then_with(|| a.user.cmp(&b.user)));
    scores
}
