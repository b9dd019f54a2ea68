//! Catalogue configuration document.
//!
//! The document is TOML and describes where scripts live, which of them are
//! pinned, how they are launched, and any explicitly declared entries:
//!
//! ```toml
//! [discovery]
//! roots = ["./scripts"]
//! max_depth = 2
//!
//! [annotations]
//! "deploy.bat" = "prod deploy"
//!
//! [execution]
//! mode = "attached"
//! codepage = "gbk"
//!
//! [scripts."build.bat"]
//! remark = "nightly build"
//! path = "D:/ci"
//! env = "D:/ci-staging"
//! group = "ci"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::CoreError;

/// Default inclusive depth bound for discovery (depths 0, 1 and 2).
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Default script extension, without the leading dot.
pub const DEFAULT_EXTENSION: &str = "bat";

/// Default legacy codepage used to decode process diagnostics.
pub const DEFAULT_CODEPAGE: &str = "gbk";

/// Body served for the self-configuration entry until the file exists.
pub const DEFAULT_CATALOG_TEMPLATE: &str = r#"# Batdeck catalogue configuration.

[discovery]
# Directories scanned for scripts, in order. Later roots win on name clashes.
# Relative roots are resolved against the directory holding this file.
roots = ["../scripts"]
# Inclusive depth bound: 0 scans only the roots themselves.
max_depth = 2
extension = "bat"

[annotations]
# "<file name>" = "<remark>" pins a discovered script to the common view.
# "deploy.bat" = "prod deploy"

[execution]
# "attached" streams stdout back to the caller; "detached" fires and forgets.
mode = "attached"
# Encoding of diagnostic output produced by scripts.
codepage = "gbk"

# Declared entries. `path` is required for scripts that discovery does not find.
# [scripts."build.bat"]
# remark = "nightly build"
# path = "D:/ci"
# env = "D:/ci-staging"
# group = "ci"
"#;

/// How scripts are supervised once launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Spawn directly, stream stdout to the caller, capture stderr.
    #[default]
    Attached,
    /// Start through a shell indirection and return immediately.
    Detached,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    pub roots: Vec<String>,
    pub max_depth: usize,
    pub extension: String,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutionSection {
    pub mode: ExecutionMode,
    pub codepage: String,
}

impl Default for ExecutionSection {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            codepage: DEFAULT_CODEPAGE.to_string(),
        }
    }
}

/// An explicitly declared entry (`[scripts."<key>"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeclaredEntry {
    pub remark: String,
    /// Directory holding the script. Required when the key was not discovered.
    pub path: Option<String>,
    /// Override ("environment") directory.
    pub env: Option<String>,
    /// File name when it differs from the key.
    pub name: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub discovery: DiscoverySection,
    /// File name -> remark. Presence pins the entry.
    pub annotations: IndexMap<String, String>,
    pub execution: ExecutionSection,
    /// Declared entries in document order.
    pub scripts: IndexMap<String, DeclaredEntry>,
}

impl CatalogConfig {
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        toml::from_str(text).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Read and parse the document at `path`.
    ///
    /// Relative discovery roots are resolved against the document's own
    /// directory so the server can be started from anywhere.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::io(path.display().to_string(), e))?;
        let mut config = Self::parse(&text)?;
        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.rebase_roots(base);
        }
        Ok(config)
    }

    fn rebase_roots(&mut self, base: &Path) {
        for root in &mut self.discovery.roots {
            if Path::new(root.as_str()).is_relative() {
                *root = base.join(root.as_str()).to_string_lossy().into_owned();
            }
        }
    }
}
