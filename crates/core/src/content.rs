//! Whole-document read and replace of an entry's backing file.
//!
//! Both operations honour the override-directory precedence of
//! [`ScriptEntry::resolved_path`]. Writes are not locked or versioned; two
//! concurrent edits of the same entry race and the last one wins.

use std::io::ErrorKind;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::catalog_config::DEFAULT_CATALOG_TEMPLATE;
use crate::entry::ScriptEntry;
use crate::error::CoreError;

#[derive(Debug, Clone)]
pub struct ContentService {
    self_config_template: &'static str,
}

impl Default for ContentService {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_TEMPLATE)
    }
}

impl ContentService {
    /// `self_config_template` is served for the self-configuration entry
    /// until its file exists.
    pub fn new(self_config_template: &'static str) -> Self {
        Self {
            self_config_template,
        }
    }

    /// Return the full contents of the entry's file.
    ///
    /// Never fails: a missing file yields the template for the
    /// self-configuration entry and an empty body for everything else; other
    /// I/O errors are logged and yield an empty body.
    pub async fn read_all(&self, entry: &ScriptEntry) -> Vec<u8> {
        let path = entry.resolved_path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound && entry.is_self_config() => {
                debug!(path = %path.display(), "Configuration file absent, serving default template");
                self.self_config_template.as_bytes().to_vec()
            }
            Err(e) => {
                warn!(key = %entry.key, path = %path.display(), error = %e, "Failed to read script file");
                Vec::new()
            }
        }
    }

    /// Replace the entry's file contents with `content`.
    ///
    /// The file is truncated and rewritten in full. A missing file is an
    /// error, except for the self-configuration entry, which is created on
    /// first save.
    pub async fn write_all(&self, entry: &ScriptEntry, content: &[u8]) -> Result<(), CoreError> {
        let path = entry.resolved_path();
        let shown = path.display().to_string();

        let result = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(entry.is_self_config())
                .open(&path)
                .await?;
            file.write_all(content).await?;
            file.flush().await
        }
        .await;

        match result {
            Ok(()) => {
                debug!(key = %entry.key, path = %shown, bytes = content.len(), "Script file replaced");
                Ok(())
            }
            Err(e) => {
                warn!(key = %entry.key, path = %shown, error = %e, "Failed to write script file");
                Err(CoreError::io(shown, e))
            }
        }
    }
}
