//! Session transcript: every byte of text the device sent, in order.

use std::path::Path;

use log::debug;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, TaskError};

/// Append-only record of a session's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// The full transcript.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Transcript length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append the transcript to `path`, creating the file if needed.
    ///
    /// Existing content is never truncated, so repeated runs accumulate.
    pub async fn append_to_file(&self, path: &Path) -> Result<()> {
        let to_task_error = |source| TaskError::OutputFile {
            path: path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(to_task_error)?;
        file.write_all(self.text.as_bytes())
            .await
            .map_err(to_task_error)?;
        file.flush().await.map_err(to_task_error)?;

        debug!("Appended {} bytes to {}", self.text.len(), path.display());
        Ok(())
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_only_grows() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        transcript.push_str("switch>");
        transcript.push_str("enable\r\nswitch#");
        assert_eq!(transcript.as_str(), "switch>enable\r\nswitch#");
        assert_eq!(transcript.len(), 22);
    }

    #[tokio::test]
    async fn test_append_accumulates_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");

        let mut first = Transcript::new();
        first.push_str("run one\n");
        first.append_to_file(&path).await.unwrap();

        let mut second = Transcript::new();
        second.push_str("run two\n");
        second.append_to_file(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "run one\nrun two\n");
    }

    #[tokio::test]
    async fn test_append_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.txt");

        let err = Transcript::new().append_to_file(&path).await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Task(TaskError::OutputFile { .. })
        ));
    }
}
