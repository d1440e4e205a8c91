//! Batch orchestration
//!
//! Resolves the requested targets, assembles them into one batch and runs
//! that batch through a single emulator process.
//!
//! ## BatchReporter Trait
//!
//! Reporting is kept apart from execution through [`BatchReporter`], the same
//! split the console and TeamCity outputs share.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::info;

use crate::batch::{Batch, emulator_command};
use crate::config::HarnessConfig;
use crate::process::{OutputMode, RunError, RunOutcome, SupervisedRunner};
use crate::resolver::{self, ResolvedImage};

// ============================================================================
// Batch Reporter Trait
// ============================================================================

/// Trait for reporting batch progress.
pub trait BatchReporter {
    /// Called once all targets are resolved, before anything runs
    fn on_resolved(&mut self, _images: &[ResolvedImage]) {}

    /// Called when there was nothing to run
    fn on_empty_batch(&mut self) {}

    /// Called right before the emulator is launched
    fn on_batch_start(&mut self, batch: &Batch, deadline: Duration);

    /// Called after the emulator has exited or been killed
    fn on_batch_complete(&mut self, emulator: &Path, summary: &BatchSummary);
}

/// What happened to a batch that was actually run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub tests: usize,
    pub outcome: RunOutcome,
    pub deadline: Duration,
    pub elapsed: Duration,
}

/// Result of [`Harness::run_tests`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No targets, so no process was launched.
    Empty,
    Ran(BatchSummary),
}

/// Console reporter; also emits TeamCity service messages in TeamCity mode.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub teamcity: bool,
}

impl ConsoleReporter {
    pub fn new(teamcity: bool) -> Self {
        Self { teamcity }
    }

    fn tcprint(&self, message: &str) {
        if self.teamcity {
            println!("##teamcity[progressMessage '{}']", teamcity_escape(message));
        }
    }
}

impl BatchReporter for ConsoleReporter {
    fn on_empty_batch(&mut self) {
        eprintln!("No tests to run");
    }

    fn on_batch_start(&mut self, batch: &Batch, deadline: Duration) {
        self.tcprint(&format!("Running {} test(s)", batch.len()));
        info!(tests = batch.len(), ?deadline, "running batch");
    }

    fn on_batch_complete(&mut self, emulator: &Path, summary: &BatchSummary) {
        if summary.outcome.timed_out() {
            println!(
                "\x1b[31mTIMEOUT\x1b[0m: killed after {:.2}s ({} test(s), {:.0}s allowed)",
                summary.elapsed.as_secs_f64(),
                summary.tests,
                summary.deadline.as_secs_f64()
            );
            self.tcprint("Test batch timed out");
        }
        println!("Ran {}", emulator.display());
    }
}

/// Escape a string for a TeamCity service message.
fn teamcity_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '|' => escaped.push_str("||"),
            '\'' => escaped.push_str("|'"),
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            '[' => escaped.push_str("|["),
            ']' => escaped.push_str("|]"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ============================================================================
// Harness
// ============================================================================

/// Runs batches of tests for one configuration.
pub struct Harness<R> {
    config: HarnessConfig,
    runner: SupervisedRunner,
    reporter: R,
}

impl<R: BatchReporter> Harness<R> {
    pub fn new(config: HarnessConfig, reporter: R) -> Self {
        Self {
            config,
            runner: SupervisedRunner::new(OutputMode::Forward),
            reporter,
        }
    }

    /// Replace the runner (tests use this to silence child output).
    pub fn with_runner(mut self, runner: SupervisedRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Resolve `names` and run them as one batch.
    ///
    /// A timeout is a normal outcome; only a launch or wait failure is an
    /// error.
    pub async fn run_tests(&mut self, names: Vec<String>) -> Result<BatchOutcome, RunError> {
        let images = resolver::resolve(names, &self.config.test_root);
        self.reporter.on_resolved(&images);

        let batch = Batch::new(images);
        if batch.is_empty() {
            self.reporter.on_empty_batch();
            return Ok(BatchOutcome::Empty);
        }

        let deadline = batch.deadline(self.config.test_timeout);
        let command = emulator_command(
            &self.config.emulator,
            self.config.test_timeout,
            &self.config.emulator_flags(),
        );

        self.reporter.on_batch_start(&batch, deadline);
        let start = Instant::now();
        let outcome = self.runner.run(&command, batch.payload(), deadline).await?;

        let summary = BatchSummary {
            tests: batch.len(),
            outcome,
            deadline,
            elapsed: start.elapsed(),
        };
        self.reporter.on_batch_complete(&self.config.emulator, &summary);
        Ok(BatchOutcome::Ran(summary))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingReporter {
        resolved: usize,
        empty: bool,
        started: bool,
    }

    impl BatchReporter for RecordingReporter {
        fn on_resolved(&mut self, images: &[ResolvedImage]) {
            self.resolved = images.len();
        }

        fn on_empty_batch(&mut self) {
            self.empty = true;
        }

        fn on_batch_start(&mut self, _batch: &Batch, _deadline: Duration) {
            self.started = true;
        }

        fn on_batch_complete(&mut self, _emulator: &Path, _summary: &BatchSummary) {}
    }

    #[tokio::test]
    async fn test_empty_batch_launches_nothing() {
        // A missing emulator would be a launch failure if anything were spawned.
        let config = HarnessConfig::new().with_emulator("/nonexistent/PPSSPPHeadless");
        let mut harness = Harness::new(config, RecordingReporter::default());

        let outcome = harness.run_tests(Vec::new()).await.unwrap();
        assert_eq!(outcome, BatchOutcome::Empty);
        assert!(harness.reporter().empty);
        assert!(!harness.reporter().started);
    }

    #[tokio::test]
    async fn test_missing_emulator_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig::new()
            .with_emulator("/nonexistent/PPSSPPHeadless")
            .with_test_root(dir.path());
        let mut harness = Harness::new(config, RecordingReporter::default())
            .with_runner(SupervisedRunner::new(OutputMode::Discard));

        let err = harness.run_tests(vec!["cpu/fpu/fpu".into()]).await.unwrap_err();
        assert!(err.is_launch_failure());
        assert_eq!(harness.reporter().resolved, 1);
    }

    #[test]
    fn test_teamcity_escape() {
        assert_eq!(teamcity_escape("a|b'c[d]\n"), "a||b|'c|[d|]|n");
    }
}
