//! Shared subprocess supervision used by both executors.
//!
//! [`supervise`] owns the child once it has started: it relays stdout to
//! the caller, drains stderr, reaps the process and logs the outcome with
//! stderr converted from the diagnostic codepage.
//!
//! The caller only ever sees the read half of an in-memory pipe. When it
//! goes away (the HTTP client disconnected) the supervisor keeps draining
//! the child's stdout, so the script never writes into a closed pipe and
//! runs to completion.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::process::Child;
use tokio::task::JoinHandle;

use super::executor::{ExitReport, ScriptError};
use crate::codepage::DiagnosticCodepage;

/// Maximum stderr captured per process (10 MiB).
const MAX_STDERR_BYTES: usize = 10 * 1024 * 1024;

/// Buffer between the child's stdout and the caller's reader.
const STDOUT_RELAY_BYTES: usize = 64 * 1024;

/// Map a spawn failure to a [`ScriptError`].
pub fn classify_spawn_error(program: &Path, err: std::io::Error) -> ScriptError {
    match err.kind() {
        ErrorKind::NotFound => ScriptError::NotFound(program.display().to_string()),
        ErrorKind::PermissionDenied => ScriptError::PermissionDenied(program.display().to_string()),
        _ => ScriptError::IoError(err),
    }
}

/// Reap `child` in a background task and log how it ended.
///
/// Returns the caller's end of the stdout relay (`None` when the child's
/// stdout was not piped) and the supervisor handle. The child is not killed
/// when the reader, the task or its handle is dropped; a started script
/// always runs to completion.
pub fn supervise(
    key: String,
    mut child: Child,
    codepage: DiagnosticCodepage,
    started: Instant,
) -> (Option<DuplexStream>, JoinHandle<ExitReport>) {
    let stderr = child.stderr.take();
    let (reader, stdout_relay) = match child.stdout.take() {
        Some(stdout) => {
            let (reader, writer) = tokio::io::duplex(STDOUT_RELAY_BYTES);
            (Some(reader), Some(relay(stdout, writer)))
        }
        None => (None, None),
    };

    let supervisor = tokio::spawn(async move {
        let relay_stdout = async {
            if let Some(relay) = stdout_relay {
                relay.await;
            }
        };
        let ((), stderr_bytes, status) =
            tokio::join!(relay_stdout, read_capped(stderr), child.wait());
        let duration_ms = started.elapsed().as_millis() as u64;
        let stderr = codepage.decode(&stderr_bytes);

        let (exit_code, success) = match status {
            Ok(status) => (status.code().unwrap_or(-1), status.success()),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to wait for script");
                (-1, false)
            }
        };

        if success {
            tracing::info!(key = %key, exit_code, duration_ms, "Script finished");
        } else {
            tracing::warn!(
                key = %key,
                exit_code,
                duration_ms,
                stderr = %stderr.trim_end(),
                "Script exited with failure"
            );
        }

        ExitReport {
            exit_code,
            success,
            stderr,
            duration_ms,
        }
    });

    (reader, supervisor)
}

/// Copy `source` into `sink` until EOF.
///
/// Once `sink` stops accepting writes the rest of `source` is discarded
/// instead, so the producing process never sees a broken pipe.
async fn relay<R, W>(mut source: R, mut sink: W)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; 8 * 1024];
    loop {
        let n = match source.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        if sink.write_all(&buf[..n]).await.is_err() {
            tracing::debug!("Output reader dropped, discarding remaining output");
            let _ = tokio::io::copy(&mut source, &mut tokio::io::sink()).await;
            return;
        }
    }
    let _ = sink.shutdown().await;
}

/// Read a stream to the end, keeping at most [`MAX_STDERR_BYTES`].
///
/// Output past the cap is drained and dropped so the pipe stays open.
async fn read_capped<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let mut capped = h.take(MAX_STDERR_BYTES as u64);
        if capped.read_to_end(&mut buf).await.is_ok() {
            let mut rest = capped.into_inner();
            let _ = tokio::io::copy(&mut rest, &mut tokio::io::sink()).await;
        }
    }
    buf
}
