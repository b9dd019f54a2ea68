//! Directory + file name joining.

use std::path::PathBuf;

/// Join `directory` and `file_name` with exactly one separator between them.
///
/// Trailing `/` or `\` on `directory` are collapsed; `..` segments and
/// symlinks are left untouched. Inputs come from local configuration and
/// are trusted.
///
/// # Examples
///
/// ```
/// use batdeck_core::paths::resolve;
///
/// assert_eq!(resolve("scripts", "deploy.bat"), resolve("scripts/", "deploy.bat"));
/// assert_eq!(resolve("scripts//", "deploy.bat").to_str(), Some("scripts/deploy.bat"));
/// ```
pub fn resolve(directory: &str, file_name: &str) -> PathBuf {
    let base = directory.trim_end_matches(['/', '\\']);
    if base.is_empty() {
        // Root directory ("/") or an empty base; keep the leading separator
        // only when one was present.
        return if directory.is_empty() {
            PathBuf::from(file_name)
        } else {
            PathBuf::from(format!("/{file_name}"))
        };
    }
    PathBuf::from(format!("{base}/{file_name}"))
}
