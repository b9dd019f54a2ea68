//! Detached executor.
//!
//! Starts the script through a shell indirection that backgrounds it and
//! exits immediately. No output is captured from the script itself; only
//! the shell's own stderr is kept for diagnostics.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use super::executor::{Launch, LaunchPlan, ScriptError, ScriptExecutor};
use super::subprocess;
use crate::catalog_config::ExecutionMode;
use crate::codepage::DiagnosticCodepage;

pub struct DetachedExecutor {
    codepage: DiagnosticCodepage,
}

impl DetachedExecutor {
    pub fn new(codepage: DiagnosticCodepage) -> Self {
        Self { codepage }
    }
}

#[cfg(windows)]
fn shell_command(program: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg("start").arg("").arg(program);
    cmd
}

#[cfg(not(windows))]
fn shell_command(program: &Path) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(r#""$0" >/dev/null 2>&1 &"#).arg(program);
    cmd
}

impl ScriptExecutor for DetachedExecutor {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Detached
    }

    fn launch(&self, plan: &LaunchPlan) -> Result<Launch, ScriptError> {
        if !plan.program.is_file() {
            return Err(ScriptError::NotFound(plan.program.display().to_string()));
        }

        let mut cmd = shell_command(&plan.program);
        cmd.current_dir(&plan.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let started = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| subprocess::classify_spawn_error(&plan.program, e))?;

        // stdout is not piped, so there is nothing to relay.
        let (stdout, supervisor) =
            subprocess::supervise(plan.key.clone(), child, self.codepage, started);
        Ok(Launch { stdout, supervisor })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
