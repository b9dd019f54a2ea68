//! Unified launch interface and shared types.
//!
//! Defines [`ScriptExecutor`], implemented by the attached and detached
//! executors, along with [`LaunchPlan`], [`Launch`], [`ExitReport`] and
//! [`ScriptError`].

use std::fmt;
use std::path::PathBuf;

use tokio::io::DuplexStream;
use tokio::task::JoinHandle;

use crate::catalog_config::ExecutionMode;
use crate::entry::ScriptEntry;

/// Where and what to launch for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Registry key, used for logging.
    pub key: String,
    /// Absolute path of the script.
    pub program: PathBuf,
    /// Child working directory (the entry's effective directory).
    pub working_directory: PathBuf,
}

impl LaunchPlan {
    /// Apply override-directory precedence and resolve the script path.
    ///
    /// The program path is made absolute against the server's current
    /// directory: relative programs combined with a different child working
    /// directory resolve differently across platforms.
    pub fn for_entry(entry: &ScriptEntry) -> Self {
        let program = entry.resolved_path();
        let program = std::path::absolute(&program).unwrap_or(program);
        Self {
            key: entry.key.clone(),
            program,
            working_directory: PathBuf::from(entry.effective_directory()),
        }
    }
}

/// Outcome of a supervised process, available once it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// Process exit code (`-1` if killed by a signal or never reaped).
    pub exit_code: i32,
    pub success: bool,
    /// Captured stderr, decoded from the diagnostic codepage.
    pub stderr: String,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// A started process.
#[derive(Debug)]
pub struct Launch {
    /// Live stdout relay (attached mode only). Dropping it does not stop
    /// the script.
    pub stdout: Option<DuplexStream>,
    /// Supervisor task that reaps the child and logs its outcome.
    pub supervisor: JoinHandle<ExitReport>,
}

/// Errors raised while starting a script.
#[derive(Debug)]
pub enum ScriptError {
    /// The script file (or the shell used to start it) was not found.
    NotFound(String),
    /// The script exists but is not executable by this user.
    PermissionDenied(String),
    /// Any other I/O error while spawning.
    IoError(std::io::Error),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Script not found: {path}"),
            Self::PermissionDenied(path) => write!(f, "Permission denied: {path}"),
            Self::IoError(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            _ => None,
        }
    }
}

/// Implemented by the attached and detached executors.
///
/// `launch` spawns a supervisor task and therefore must be called from
/// within a Tokio runtime.
pub trait ScriptExecutor: Send + Sync {
    fn mode(&self) -> ExecutionMode;

    /// Start the process described by `plan`.
    fn launch(&self, plan: &LaunchPlan) -> Result<Launch, ScriptError>;

    /// Launch the script behind `entry`, logging spawn failures.
    fn run(&self, entry: &ScriptEntry) -> Result<Launch, ScriptError> {
        let plan = LaunchPlan::for_entry(entry);
        tracing::info!(
            key = %plan.key,
            program = %plan.program.display(),
            cwd = %plan.working_directory.display(),
            mode = ?self.mode(),
            "Launching script"
        );
        self.launch(&plan).inspect_err(|e| {
            tracing::error!(key = %plan.key, error = %e, "Failed to start script");
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
