//! CLI argument definitions for the Sage binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::{Path, PathBuf};

/// Sage: a terminal assistant that answers questions from public knowledge services.
#[derive(Parser, Debug)]
#[command(name = "sage", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Directory holding the session database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Keep sessions in memory only; nothing is read from or written to disk.
    #[arg(long = "ephemeral")]
    pub ephemeral: bool,

    /// Never speak replies, whatever the config says.
    #[arg(long = "no-speech")]
    pub no_speech: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SAGE_CONFIG env var > ~/.sage/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SAGE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory, expanding a leading `~`.
    ///
    /// Priority: --data-dir flag > SAGE_DATA_DIR env var > config file value.
    pub fn resolve_data_dir(&self, config_data_dir: &str) -> PathBuf {
        if let Some(ref p) = self.data_dir {
            return p.clone();
        }
        let raw = std::env::var("SAGE_DATA_DIR").unwrap_or_else(|_| config_data_dir.to_string());
        expand_home(&raw, home_dir().as_deref())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value. `RUST_LOG` still wins
    /// over both when the subscriber is built.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

/// Expand `~/` (or `~\`) against `home`. Without a home the current directory is used.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home.unwrap_or_else(|| Path::new(".")).join(rest),
        None => PathBuf::from(path),
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".sage").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
