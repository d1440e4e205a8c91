#![forbid(unsafe_code)]
//! Test harness for the pspautotests suite
//!
//! Resolves test names to compiled images, hands them to a headless emulator
//! as one batch over stdin, and supervises the emulator under a deadline.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `process` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod harness;
pub mod locate;
pub mod process;
pub mod resolver;

pub use batch::{Batch, emulator_command};
pub use config::HarnessConfig;
pub use harness::{BatchOutcome, BatchReporter, BatchSummary, ConsoleReporter, Harness};
pub use process::{OutputMode, RunError, RunOutcome, SupervisedRunner};
pub use resolver::{ArtifactKind, ResolvedImage, TestTarget, resolve};
