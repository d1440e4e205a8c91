//! Supervised child processes
//!
//! Runs one child to completion or to its deadline, whichever comes first.
//!
//! ## Protocol
//!
//! 1. Spawn with stdin piped; stdout and stderr go to the harness's stdout.
//! 2. A writer task pushes the whole payload into stdin, then closes it.
//! 3. The child's exit is raced against the deadline.
//! 4. On expiry the child is killed and reaped before `run` returns.
//!
//! The writer never shares a task with the deadline, so a child that stops
//! reading cannot stall the countdown.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod platform;
mod runner;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use platform::terminate_and_reap;
pub use runner::{OutputMode, SupervisedRunner};

/// How a supervised run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The child exited on its own. `None` means it was ended by a signal.
    NormalExit(Option<i32>),
    /// The deadline elapsed and the child was killed.
    TimedOut,
}

impl RunOutcome {
    pub fn timed_out(self) -> bool {
        matches!(self, RunOutcome::TimedOut)
    }
}

/// Errors that abort a supervised run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("empty command line")]
    EmptyCommand,

    #[error("failed to launch {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stdin pipe of {} was not available", .program.display())]
    StdinUnavailable { program: PathBuf },

    #[error("failed waiting for {}: {source}", .program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// True when the child never started.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, RunError::Launch { .. } | RunError::EmptyCommand)
    }
}
