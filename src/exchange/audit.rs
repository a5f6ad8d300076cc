//! Append-only audit log of executed exchange commands.

use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::config::AuditConfig;
use crate::Result;

/// Audit log writer.
///
/// Each call to [`AuditLog::record`] appends one line of the form
/// `<timestamp> - <user> call command: <command>.`
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: Option<PathBuf>,
}

impl AuditLog {
    /// Create an audit log writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Create an audit log that records nothing.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Create an audit log from configuration.
    pub fn from_config(config: &AuditConfig) -> Self {
        if config.enabled {
            Self::new(&config.path)
        } else {
            Self::disabled()
        }
    }

    /// Path of the log file, if enabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append a line for `command` issued by `user_name`.
    ///
    /// The parent directory is created if missing.
    pub async fn record(&self, user_name: &str, command: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string();
        let line = format_line(&timestamp, user_name, command);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

fn format_line(timestamp: &str, user_name: &str, command: &str) -> String {
    format!("{timestamp} - {user_name} call command: {command}.\n")
}
