//! CLI command implementations

pub mod banks;
pub mod categories;
pub mod import;
pub mod logs;
pub mod setup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use extrato_core::{EntryPoint, ExtratoContext, LogEvent, LoggingService};

/// Get the extrato directory from environment or default
pub fn get_extrato_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("EXTRATO_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".extrato")
    }
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let extrato_dir = get_extrato_dir();
    std::fs::create_dir_all(&extrato_dir).ok()?;
    LoggingService::new(&extrato_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get or create the extrato context
pub fn get_context() -> Result<ExtratoContext> {
    let extrato_dir = get_extrato_dir();

    std::fs::create_dir_all(&extrato_dir)
        .with_context(|| format!("Failed to create extrato directory: {:?}", extrato_dir))?;

    ExtratoContext::new(&extrato_dir).context("Failed to initialize extrato context")
}
