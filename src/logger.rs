//! One-call logger setup. The library itself only emits `log` macros; a
//! binary (or a test) that wants to see them calls one of these helpers
//! once at startup. Calling them again is a no-op.
use crate::error::ChemNetError;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;

/// Terminal-only logging.
pub fn init_console(level: LevelFilter) {
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

/// Terminal logging plus a log file.
pub fn init_with_file<P: AsRef<Path>>(level: LevelFilter, path: P) -> Result<(), ChemNetError> {
    let file = File::create(path)?;
    let _ = CombinedLogger::init(vec![
        TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(level, Config::default(), file),
    ]);
    Ok(())
}
