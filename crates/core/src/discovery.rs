//! Filesystem discovery of script files under the configured roots.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::entry::ScriptEntry;

/// Discovery parameters, usually taken from the `[discovery]` section.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions<'a> {
    /// Roots scanned in order.
    pub roots: &'a [String],
    /// Inclusive depth bound; the root listing itself is depth 0.
    pub max_depth: usize,
    /// Eligible extension without the leading dot, matched case-insensitively.
    pub extension: &'a str,
    /// File name -> remark. Annotated files are pinned.
    pub annotations: &'a IndexMap<String, String>,
}

/// Walk every root and return the eligible scripts in traversal order.
///
/// Traversal order is root declaration order, then lexical order of the
/// directory entries at each level, so a registry built from the result
/// resolves duplicate file names deterministically (last one wins).
/// Unreadable or missing directories contribute no entries.
pub fn discover(options: &DiscoveryOptions<'_>) -> Vec<ScriptEntry> {
    let mut found = Vec::new();
    for root in options.roots {
        walk(Path::new(root), options, &mut found);
    }
    debug!(count = found.len(), roots = options.roots.len(), "Discovery complete");
    found
}

fn walk(root: &Path, options: &DiscoveryOptions<'_>, found: &mut Vec<ScriptEntry>) {
    // Files directly under the root sit at walkdir depth 1.
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(options.max_depth + 1)
        .follow_links(true)
        .sort_by_file_name();

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, root = %root.display(), "Failed to read script directory");
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), options.extension) {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(dir) = entry.path().parent() else {
            continue;
        };

        let mut script = ScriptEntry::script(file_name, dir.to_string_lossy());
        script.group = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(remark) = options.annotations.get(file_name) {
            script.remark = remark.clone();
            script.pinned = true;
        }
        found.push(script);
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
