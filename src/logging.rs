use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

/// Initializes logging to the terminal and, when given, to `log_file`.
///
/// The terminal logger is left out while the TUI owns the screen.
pub fn initialize_logging(level: LevelFilter, log_file: Option<&Path>, terminal: bool) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if terminal {
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if loggers.is_empty() {
        return Ok(());
    }
    CombinedLogger::init(loggers).context("Failed to initialize logging")
}
