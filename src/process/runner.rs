//! The supervised runner

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::platform::{harness_stdout, terminate_and_reap};
use super::{RunError, RunOutcome};

/// Where the child's stdout and stderr go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Both streams go to the harness's stdout, so the user sees them live.
    #[default]
    Forward,
    /// Both streams are discarded.
    Discard,
}

/// Runs a command once under a deadline.
#[derive(Debug, Clone, Default)]
pub struct SupervisedRunner {
    output: OutputMode,
}

impl SupervisedRunner {
    pub fn new(output: OutputMode) -> Self {
        Self { output }
    }

    /// Run `command`, feeding it `payload` on stdin, for at most `deadline`.
    ///
    /// Returns once the child has exited and been reaped, in both the normal
    /// and the timed-out case. The child's exit code is reported, not judged.
    pub async fn run(&self, command: &[OsString], payload: Vec<u8>, deadline: Duration) -> Result<RunOutcome, RunError> {
        let (program, args) = command.split_first().ok_or(RunError::EmptyCommand)?;
        let program_path = PathBuf::from(program);

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::piped()).kill_on_drop(true);
        match self.output {
            OutputMode::Forward => {
                let stderr = harness_stdout().unwrap_or_else(|err| {
                    debug!(error = %err, "could not duplicate stdout, child stderr stays on stderr");
                    Stdio::inherit()
                });
                cmd.stdout(Stdio::inherit()).stderr(stderr);
            }
            OutputMode::Discard => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        let mut child = cmd.spawn().map_err(|source| RunError::Launch {
            program: program_path.clone(),
            source,
        })?;
        debug!(program = %program_path.display(), pid = ?child.id(), ?deadline, "spawned child");

        let stdin = child.stdin.take().ok_or_else(|| RunError::StdinUnavailable {
            program: program_path.clone(),
        })?;
        let writer = tokio::spawn(write_payload(stdin, payload));

        let waited = tokio::time::timeout(deadline, child.wait()).await;
        let outcome = match waited {
            Ok(status) => {
                let status = status.map_err(|source| RunError::Wait {
                    program: program_path.clone(),
                    source,
                })?;
                debug!(%status, "child exited");
                RunOutcome::NormalExit(status.code())
            }
            Err(_) => {
                warn!(program = %program_path.display(), ?deadline, "deadline elapsed, killing child");
                let status = terminate_and_reap(&mut child).await.map_err(|source| RunError::Wait {
                    program: program_path.clone(),
                    source,
                })?;
                debug!(%status, "killed child reaped");
                RunOutcome::TimedOut
            }
        };

        finish_writer(writer).await;
        Ok(outcome)
    }
}

/// Write the whole payload, then close stdin to mark end of input.
async fn write_payload(mut stdin: ChildStdin, payload: Vec<u8>) -> io::Result<()> {
    stdin.write_all(&payload).await?;
    stdin.flush().await?;
    drop(stdin);
    Ok(())
}

/// Collect the writer's result, cancelling it if it is still blocked.
async fn finish_writer(writer: JoinHandle<io::Result<()>>) {
    if !writer.is_finished() {
        writer.abort();
    }
    match writer.await {
        Ok(Ok(())) => debug!("payload delivered"),
        Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!("child closed stdin before reading the whole payload");
        }
        Ok(Err(err)) => warn!(error = %err, "failed writing payload to child"),
        Err(err) if err.is_cancelled() => debug!("payload writer cancelled"),
        Err(err) => warn!(error = %err, "payload writer panicked"),
    }
}
