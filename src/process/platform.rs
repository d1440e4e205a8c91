//! Platform-specific process plumbing

use std::io;
use std::process::{ExitStatus, Stdio};

use tokio::process::Child;
use tracing::debug;

/// Kill the child and wait for it to be reaped.
///
/// Uses SIGKILL on Unix and `TerminateProcess` on Windows. A kill that fails
/// because the child already exited is ignored; the wait still reaps it.
pub async fn terminate_and_reap(child: &mut Child) -> io::Result<ExitStatus> {
    if let Err(err) = child.start_kill() {
        debug!(error = %err, "kill failed, child has likely exited already");
    }
    child.wait().await
}

/// A handle to the harness's own stdout, for redirecting a child's stderr.
#[cfg(unix)]
pub(crate) fn harness_stdout() -> io::Result<Stdio> {
    use std::os::fd::AsFd;

    let fd = io::stdout().as_fd().try_clone_to_owned()?;
    Ok(Stdio::from(fd))
}

#[cfg(windows)]
pub(crate) fn harness_stdout() -> io::Result<Stdio> {
    use std::os::windows::io::AsHandle;

    let handle = io::stdout().as_handle().try_clone_to_owned()?;
    Ok(Stdio::from(handle))
}

#[cfg(not(any(unix, windows)))]
pub(crate) fn harness_stdout() -> io::Result<Stdio> {
    Ok(Stdio::inherit())
}
