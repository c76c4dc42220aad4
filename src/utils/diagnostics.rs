//! `tracing` subscriber setup, enabled by the `BOOKCHAT_LOG` filter.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::core::config::io::project_dirs;

pub const LOG_ENV: &str = "BOOKCHAT_LOG";

pub enum DiagnosticsSink {
    Stderr,
    /// Used while the terminal UI owns the screen.
    File(PathBuf),
}

/// Install the global subscriber. Without `BOOKCHAT_LOG` set this is a no-op.
pub fn init(sink: DiagnosticsSink) -> Result<(), Box<dyn Error>> {
    init_with(std::env::var(LOG_ENV).ok(), sink)
}

/// Install the global subscriber for `directives`, if any.
pub fn init_with(directives: Option<String>, sink: DiagnosticsSink) -> Result<(), Box<dyn Error>> {
    let Some(directives) = directives else {
        return Ok(());
    };
    let filter = EnvFilter::try_new(directives)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match sink {
        DiagnosticsSink::Stderr => builder.with_writer(std::io::stderr).try_init(),
        DiagnosticsSink::File(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    installed.map_err(|e| -> Box<dyn Error> { e.to_string().into() })
}

pub fn default_log_file() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().join("bookchat.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("bookchat.log"))
}
