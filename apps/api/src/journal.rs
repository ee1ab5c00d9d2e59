//! Append-only results journal.
//!
//! Every upload, webhook, match, miss, forward outcome and search lookup is
//! written as one timestamped line. The file is informational; nothing reads it back.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

pub struct ResultsJournal {
    path: PathBuf,
    // Serializes writers so lines never interleave.
    write_lock: Mutex<()>,
}

impl ResultsJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `<timestamp>: <message>` to the journal.
    /// Write failures are logged and swallowed.
    pub async fn record(&self, message: impl AsRef<str>) {
        let line = format!(
            "{}: {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message.as_ref()
        );

        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.append(line.as_bytes()).await {
            warn!("Failed to write results journal {}: {e}", self.path.display());
        }
    }

    async fn append(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await
    }
}
