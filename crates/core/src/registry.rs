//! The startup-built, read-only catalogue of script entries.
//!
//! A [`Registry`] is assembled once from discovered and declared entries and
//! then shared (behind an `Arc`) by every request handler. It is never
//! mutated afterwards, so lookups need no locking.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::catalog_config::{CatalogConfig, DeclaredEntry};
use crate::discovery::{self, DiscoveryOptions};
use crate::entry::{EntryKind, EntryView, ListFilter, ScriptEntry};
use crate::error::CoreError;

/// Key of the synthetic entry exposing the catalogue configuration file.
///
/// `@` keeps it clear of anything discovery can produce.
pub const SELF_CONFIG_KEY: &str = "@catalog";

#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: IndexMap<String, ScriptEntry>,
}

impl Registry {
    /// Merge discovered entries with declared ones.
    ///
    /// Discovered entries are inserted in traversal order, so a later file
    /// with the same name replaces an earlier one. Declared entries are
    /// applied afterwards: an existing key gets the declared remark, is
    /// pinned, and picks up any declared override directory or group, but
    /// keeps its discovered location. A declared key that was not discovered
    /// becomes a new entry at the declared `path`; without a `path` it is
    /// skipped with a warning.
    pub fn build(discovered: Vec<ScriptEntry>, declared: &IndexMap<String, DeclaredEntry>) -> Self {
        let mut entries: IndexMap<String, ScriptEntry> = IndexMap::new();

        for entry in discovered {
            if let Some(previous) = entries.get(&entry.key) {
                debug!(
                    key = %entry.key,
                    replaced = %previous.directory,
                    by = %entry.directory,
                    "Duplicate script name, later directory wins"
                );
            }
            entries.insert(entry.key.clone(), entry);
        }

        for (key, declaration) in declared {
            if key.is_empty() {
                warn!("Ignoring declared entry with an empty key");
                continue;
            }
            match entries.get_mut(key) {
                Some(existing) => decorate(existing, declaration),
                None => match declared_entry(key, declaration) {
                    Some(entry) => {
                        entries.insert(key.clone(), entry);
                    }
                    None => warn!(key = %key, "Declared entry has no path and was not discovered, skipping"),
                },
            }
        }

        Self { entries }
    }

    /// Discover, merge and optionally expose the configuration file itself.
    pub fn from_config(config: &CatalogConfig, self_config: Option<&Path>) -> Self {
        let discovered = discovery::discover(&DiscoveryOptions {
            roots: &config.discovery.roots,
            max_depth: config.discovery.max_depth,
            extension: &config.discovery.extension,
            annotations: &config.annotations,
        });

        let mut registry = Self::build(discovered, &config.scripts);
        if let Some(path) = self_config {
            registry = registry.with_self_config(path);
        }

        info!(
            entries = registry.len(),
            pinned = registry.entries.values().filter(|e| e.pinned).count(),
            "Script registry built"
        );
        registry
    }

    /// Add the synthetic entry for the configuration document at `path`.
    pub fn with_self_config(mut self, path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config.toml".to_string());
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
            _ => ".".to_string(),
        };

        let entry = ScriptEntry {
            key: SELF_CONFIG_KEY.to_string(),
            file_name,
            group: String::new(),
            remark: "catalogue configuration".to_string(),
            directory,
            override_directory: None,
            pinned: false,
            kind: EntryKind::SelfConfig,
        };
        self.entries.insert(entry.key.clone(), entry);
        self
    }

    pub fn lookup(&self, key: &str) -> Result<&ScriptEntry, CoreError> {
        self.entries.get(key).ok_or_else(|| CoreError::NotFound {
            key: key.to_string(),
        })
    }

    /// Project entries for display.
    ///
    /// `All` and `PinnedOnly` never include the self-configuration entry;
    /// `SingleKey` can address it.
    pub fn list_for_display(&self, filter: &ListFilter) -> Vec<EntryView> {
        match filter {
            ListFilter::All => self
                .entries
                .values()
                .filter(|e| !e.is_self_config())
                .map(ScriptEntry::view)
                .collect(),
            ListFilter::PinnedOnly => self
                .entries
                .values()
                .filter(|e| e.pinned && !e.is_self_config())
                .map(ScriptEntry::view)
                .collect(),
            ListFilter::SingleKey(key) => self.entries.get(key).map(ScriptEntry::view).into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn decorate(entry: &mut ScriptEntry, declaration: &DeclaredEntry) {
    entry.remark = declaration.remark.clone();
    entry.pinned = true;
    if let Some(env) = &declaration.env {
        entry.override_directory = Some(env.clone());
    }
    if let Some(group) = &declaration.group {
        entry.group = group.clone();
    }
}

fn declared_entry(key: &str, declaration: &DeclaredEntry) -> Option<ScriptEntry> {
    let directory = declaration.path.clone()?;
    Some(ScriptEntry {
        key: key.to_string(),
        file_name: declaration.name.clone().unwrap_or_else(|| key.to_string()),
        group: declaration.group.clone().unwrap_or_default(),
        remark: declaration.remark.clone(),
        directory,
        override_directory: declaration.env.clone(),
        pinned: true,
        kind: EntryKind::Script,
    })
}
