// services/view_log.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};
use tracing::warn;

use crate::models::view::ViewEvent;

#[derive(Error, Debug)]
pub enum ViewLogError {
    #[error("Failed to encode view event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to append view event: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for view events. Nothing reads them back.
#[async_trait]
pub trait ViewRecorder: Send + Sync {
    async fn record(&self, event: &ViewEvent) -> Result<(), ViewLogError>;
}

/// Appends one JSON object per line to a file that is rotated externally
pub struct JsonLinesViewLog {
    path: PathBuf,
    // Keeps concurrent lines from interleaving.
    write_lock: Mutex<()>,
}

impl JsonLinesViewLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ViewRecorder for JsonLinesViewLog {
    async fn record(&self, event: &ViewEvent) -> Result<(), ViewLogError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Drops every event
pub struct NoopViewLog;

#[async_trait]
impl ViewRecorder for NoopViewLog {
    async fn record(&self, _event: &ViewEvent) -> Result<(), ViewLogError> {
        Ok(())
    }
}

/// Records a view and reports whether it landed. Never returns an error.
pub async fn record_view(recorder: &dyn ViewRecorder, event: ViewEvent) -> bool {
    match recorder.record(&event).await {
        Ok(()) => true,
        Err(e) => {
            warn!(message_id = %event.message_id, error = %e, "failed to record view");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn appends_one_json_line_per_event() {
        let dir = TempDir::new().unwrap();
        let log = JsonLinesViewLog::new(dir.path().join("views.log"));

        assert!(record_view(&log, ViewEvent::now("abc", "10.0.0.1", "curl/8.0")).await);
        assert!(record_view(&log, ViewEvent::now("def", "10.0.0.2", "Firefox")).await);

        let contents = tokio::fs::read_to_string(log.path()).await.unwrap();
        let events: Vec<ViewEvent> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message_id, "abc");
        assert_eq!(events[1].ip, "10.0.0.2");
        assert_eq!(events[1].user_agent, "Firefox");
    }

    #[tokio::test]
    async fn unwritable_path_is_absorbed() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        let log = JsonLinesViewLog::new(dir.path());

        assert!(!record_view(&log, ViewEvent::now("abc", "unknown", "unknown")).await);
    }

    #[tokio::test]
    async fn noop_always_succeeds() {
        assert!(record_view(&NoopViewLog, ViewEvent::now("x", "y", "z")).await);
    }
}
