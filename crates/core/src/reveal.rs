//! Open an entry's directory in the host file manager.

use crate::entry::ScriptEntry;

/// Directory shown for `entry`, in the host's native separator style.
pub fn reveal_target(entry: &ScriptEntry) -> String {
    let dir = entry.effective_directory();
    if cfg!(windows) {
        dir.replace('/', "\\")
    } else {
        dir.to_string()
    }
}

/// Ask the desktop to show the entry's effective directory.
///
/// Failures are logged and otherwise ignored.
pub fn reveal(entry: &ScriptEntry) {
    let target = reveal_target(entry);
    match open::that_detached(&target) {
        Ok(()) => tracing::debug!(key = %entry.key, target = %target, "Opened file manager"),
        Err(e) => tracing::warn!(key = %entry.key, target = %target, error = %e, "Failed to open file manager"),
    }
}
