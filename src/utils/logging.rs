//! Logging initialization for board-deploy

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;
use std::path::Path;

/// Map `-v`/`-q` flags to a level filter
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Parse a configured level name, falling back to `info`
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

/// Initialize human-readable stderr logging for the CLI
pub fn init_cli_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = level_from_flags(verbose, quiet);

    Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(level)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init()?;

    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("Logging initialized with level: {:?}", level);
    Ok(())
}

/// Initialize JSON-lines logging, to `file` when given or stdout otherwise
pub fn init_structured_logging(level: LevelFilter, file: Option<&Path>) -> Result<()> {
    use chrono::Utc;
    use std::fs::OpenOptions;

    let target: Box<dyn Write + Send> = match file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => Box::new(std::io::stdout()),
    };

    Builder::from_default_env()
        .target(Target::Pipe(target))
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}", json_record(record, Utc::now())))
        .try_init()?;

    log_panics::init();

    log::debug!("Structured logging initialized with level: {:?}", level);
    Ok(())
}

fn json_record(record: &log::Record<'_>, now: chrono::DateTime<chrono::Utc>) -> serde_json::Value {
    serde_json::json!({
        "timestamp": now.to_rfc3339(),
        "level": record.level().to_string(),
        "module": record.module_path().unwrap_or("unknown"),
        "message": record.args().to_string(),
        "target": record.target(),
    })
}
