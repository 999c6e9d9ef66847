//! Execution engine: run a program once on a given stdin.
//!
//! Wall-clock time is measured around the whole spawn + wait. Only stdout is captured; stderr is passed
//! through to the terminal and never inspected, so a crashing program is detected through its exit status
//! alone.
//!
//! The child is spawned with `kill_on_drop`, so it is killed on every early exit path: a time limit firing,
//! a Ctrl-C dropping the in-flight future, or an IO error.

use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};

use judgekit_core::TestFailure;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::program::Program;

/// Errors from the execution engine.
///
/// `Failed` is an ordinary per-test failure. `Spawn` and `Io` mean the program cannot be run at all.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Failed(#[from] TestFailure),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while running `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// A run that exited with status 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Captured stdout, trimmed.
    pub output: String,
    pub elapsed: Duration,
}

/// Run `program` once, feeding it `stdin`.
///
/// ## Errors
/// - [`TestFailure::TimeLimitExceeded`] when `time_limit` is set and the program outlives it. The child is
///   killed and reaped before returning.
/// - [`TestFailure::NonZeroExitCode`] with the trimmed stdout when the program fails or is killed by a signal.
/// - [`ExecError::Spawn`] / [`ExecError::Io`] when the program cannot be started or its pipes fail.
#[tracing::instrument(skip_all, fields(program = %program, stdin_len = stdin.len()))]
pub async fn execute(program: &Program, stdin: &str, time_limit: Option<Duration>) -> Result<Execution, ExecError> {
    let start = Instant::now();

    let mut child = program
        .to_command()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let io_error = |source: io::Error| ExecError::Io {
        program: program.to_string(),
        source,
    };

    let pipe_in = child.stdin.take();
    let mut pipe_out = child
        .stdout
        .take()
        .ok_or_else(|| io_error(io::Error::other("stdout was not captured")))?;

    let payload = stdin.as_bytes();
    let feed = async move {
        if let Some(mut pipe) = pipe_in {
            // A program may exit without reading all of its input.
            match pipe.write_all(payload).await {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
        }
        Ok(())
    };
    let collect = async move {
        let mut buf = Vec::new();
        pipe_out.read_to_end(&mut buf).await.map(|_| buf)
    };
    let finished = async {
        let (fed, out) = tokio::join!(feed, collect);
        fed?;
        let out = out?;
        let status = child.wait().await?;
        Ok::<_, io::Error>((status, out))
    };

    let outcome = match time_limit {
        Some(limit) => {
            let timed = tokio::time::timeout(limit, finished).await;
            match timed {
                Ok(outcome) => outcome,
                Err(_) => {
                    // Already exited between the deadline and the kill is fine.
                    let _ = child.kill().await;
                    tracing::debug!(limit_ms = limit.as_millis() as u64, "time limit exceeded");
                    return Err(TestFailure::TimeLimitExceeded { limit }.into());
                }
            }
        }
        None => finished.await,
    };
    let (status, raw) = outcome.map_err(io_error)?;

    let elapsed = start.elapsed();
    let output = String::from_utf8_lossy(&raw);
    tracing::debug!(
        code = ?status.code(),
        elapsed_ms = elapsed.as_millis() as u64,
        output_len = raw.len(),
        "program finished"
    );

    if !status.success() {
        return Err(TestFailure::non_zero_exit(status.code(), &output).into());
    }

    Ok(Execution {
        output: output.trim().to_string(),
        elapsed,
    })
}
