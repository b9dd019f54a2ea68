//! Attached executor.
//!
//! Spawns the script itself as the child process, relays its stdout to the
//! caller for live streaming and captures stderr for diagnostics.

use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use super::executor::{Launch, LaunchPlan, ScriptError, ScriptExecutor};
use super::subprocess;
use crate::catalog_config::ExecutionMode;
use crate::codepage::DiagnosticCodepage;

pub struct AttachedExecutor {
    codepage: DiagnosticCodepage,
}

impl AttachedExecutor {
    pub fn new(codepage: DiagnosticCodepage) -> Self {
        Self { codepage }
    }
}

impl ScriptExecutor for AttachedExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Attached
    }

    fn launch(&self, plan: &LaunchPlan) -> Result<Launch, ScriptError> {
        let mut cmd = Command::new(&plan.program);
        cmd.current_dir(&plan.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let started = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| subprocess::classify_spawn_error(&plan.program, e))?;

        let (stdout, supervisor) =
            subprocess::supervise(plan.key.clone(), child, self.codepage, started);
        Ok(Launch { stdout, supervisor })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
