//! Catalogue entry types and list projections.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::paths;

/// Distinguishes real scripts from the synthetic entry that exposes the
/// catalogue configuration file itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Script,
    SelfConfig,
}

/// A catalogued runnable script with its location and display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Unique lookup key used by every operation.
    pub key: String,
    /// File name inside the effective directory (defaults to the key).
    pub file_name: String,
    /// Display group; the declared group or the containing directory name.
    pub group: String,
    /// Free-text annotation, empty when absent.
    pub remark: String,
    /// Primary working directory.
    pub directory: String,
    /// Alternate directory that wins over `directory` when set.
    pub override_directory: Option<String>,
    /// Shown in the "common" view.
    pub pinned: bool,
    pub kind: EntryKind,
}

impl ScriptEntry {
    /// Build a plain script entry whose key and file name coincide.
    pub fn script(file_name: impl Into<String>, directory: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            key: file_name.clone(),
            file_name,
            group: String::new(),
            remark: String::new(),
            directory: directory.into(),
            override_directory: None,
            pinned: false,
            kind: EntryKind::Script,
        }
    }

    /// `"<group>/<file_name>"`, or the bare file name when no group is known.
    pub fn display_name(&self) -> String {
        if self.group.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}/{}", self.group, self.file_name)
        }
    }

    /// The override directory when set, otherwise the primary directory.
    pub fn effective_directory(&self) -> &str {
        match self.override_directory.as_deref() {
            Some(dir) if !dir.is_empty() => dir,
            _ => &self.directory,
        }
    }

    /// Full path of the backing file: effective directory + file name.
    pub fn resolved_path(&self) -> PathBuf {
        paths::resolve(self.effective_directory(), &self.file_name)
    }

    pub fn is_self_config(&self) -> bool {
        self.kind == EntryKind::SelfConfig
    }

    pub fn view(&self) -> EntryView {
        EntryView {
            id: self.key.clone(),
            name: self.display_name(),
            remark: self.remark.clone(),
        }
    }
}

/// List projection handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub id: String,
    pub name: String,
    pub remark: String,
}

/// Which entries a listing should contain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    PinnedOnly,
    SingleKey(String),
}

impl FromStr for ListFilter {
    type Err = CoreError;

    /// Accepts `all`, `pinned` or `key:<key>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "pinned" => Ok(Self::PinnedOnly),
            other => match other.strip_prefix("key:") {
                Some(key) if !key.is_empty() => Ok(Self::SingleKey(key.to_string())),
                _ => Err(CoreError::Validation(format!(
                    "unknown list filter '{other}' (expected all, pinned or key:<key>)"
                ))),
            },
        }
    }
}
