use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;
use crate::error::Result;
use crate::headless::run_headless;
use crate::logging::{LogTarget, init_logging};
use crate::terminal::run_terminal;

#[derive(Debug, Default, Parser)]
#[command(
    name = "vsort",
    about = "Animated sorting-algorithm visualizer for the terminal",
    version
)]
pub struct Cli {
    /// TOML config file. Flags override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Length of the primary buffer (selection, merge, bubble).
    #[arg(long, value_name = "N")]
    pub primary_size: Option<usize>,

    /// Length of the miniature buffer (counting, insertion).
    #[arg(long, value_name = "N")]
    pub mini_size: Option<usize>,

    /// Pause between runs, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub pause_ms: Option<u64>,

    /// Shuffle seed for reproducible runs.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Stop after this many passes over the schedule.
    #[arg(long, value_name = "N")]
    pub rounds: Option<u64>,

    /// Run without a terminal; progress goes to the log.
    #[arg(long)]
    pub headless: bool,

    /// Print run reports (headless) and errors as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Write logs to this file. Terminal mode logs nothing otherwise.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Key that exits immediately.
    #[arg(long, value_name = "KEY")]
    pub quit_key: Option<char>,

    /// Surface width in columns (default: terminal width at startup).
    #[arg(long, value_name = "COLS")]
    pub width: Option<u16>,

    /// Surface height in rows (default: terminal height at startup).
    #[arg(long, value_name = "ROWS")]
    pub height: Option<u16>,

    /// Minimum time between intermediate frames, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub frame_interval_ms: Option<u64>,
}

impl Cli {
    fn log_target(&self) -> LogTarget {
        match (&self.log_file, self.headless) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, true) => LogTarget::Stderr,
            (None, false) => LogTarget::Off,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::resolve(&cli)?;
    init_logging(&cli.log_target())?;

    let result = if cli.headless {
        let stdout = std::io::stdout();
        run_headless(config.engine, cli.json, &mut stdout.lock()).map(drop)
    } else {
        run_terminal(config)
    };

    if let Err(error) = &result {
        tracing::error!(%error, "visualsort stopped");
    }
    result
}
