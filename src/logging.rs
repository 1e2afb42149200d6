use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: `--verbose` beats `log_level`
/// from `config.toml`, which beats the `warn` default.
pub fn default_level(verbose: u8, config_level: Option<&str>) -> &str {
    match verbose {
        0 => config_level.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// With `log_file` set, events are appended there without ANSI colours so the
/// dashboard keeps the terminal to itself. Otherwise they go to stderr.
pub fn init(verbose: u8, config_level: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    let level = default_level(verbose, config_level);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log_level filter: {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true);

    let init_result = match log_file {
        Some(path) => {
            let file = open_log(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if let Err(err) = init_result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config_level() {
        assert_eq!(default_level(0, None), "warn");
        assert_eq!(default_level(0, Some("ticklist=debug")), "ticklist=debug");
        assert_eq!(default_level(1, Some("error")), "info");
        assert_eq!(default_level(2, None), "debug");
        assert_eq!(default_level(7, None), "trace");
    }

    #[test]
    fn log_file_is_created_in_append_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticklist.log");
        std::fs::write(&path, "existing\n").unwrap();
        drop(open_log(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing\n");
    }

    #[test]
    fn missing_log_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log(&dir.path().join("nope").join("x.log")).unwrap_err();
        assert!(err.to_string().contains("failed to open log file"));
    }
}
