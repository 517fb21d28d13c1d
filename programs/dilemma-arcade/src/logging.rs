use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};

fn log_path(dir: &Path, now: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{}.log", now.format("%Y%m%dT%H%M%S%.3f")))
}

/// Initialize dual logging: DEBUG to a timestamped file under
/// `<data_dir>/logs`, WARN (INFO with `verbose`) to stderr.
pub fn init(data_dir: &Path, verbose: bool) -> anyhow::Result<()> {
    let dir = data_dir.join("logs");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let config = ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let path = log_path(&dir, Utc::now());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let file = WriteLogger::new(log::LevelFilter::Debug, config.clone(), file);
    let term = TermLogger::new(
        if verbose { log::LevelFilter::Info } else { log::LevelFilter::Warn },
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    CombinedLogger::init(vec![term, file]).context("initialize logger")
}
