//! Script launching and supervision.
//!
//! Provides the [`ScriptExecutor`](executor::ScriptExecutor) trait with an
//! attached (output-streaming) and a detached (fire-and-forget)
//! implementation. Every launch is an independent child process; there is
//! no queue, no concurrency limit, no timeout and no cancellation.

use std::sync::Arc;

use crate::catalog_config::ExecutionMode;
use crate::codepage::DiagnosticCodepage;

pub mod attached;
pub mod detached;
pub mod executor;
pub mod subprocess;

use attached::AttachedExecutor;
use detached::DetachedExecutor;
use executor::ScriptExecutor;

/// Build the executor selected by configuration.
pub fn executor_for(mode: ExecutionMode, codepage: DiagnosticCodepage) -> Arc<dyn ScriptExecutor> {
    match mode {
        ExecutionMode::Attached => Arc::new(AttachedExecutor::new(codepage)),
        ExecutionMode::Detached => Arc::new(DetachedExecutor::new(codepage)),
    }
}
