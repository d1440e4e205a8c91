//! Harness configuration
//!
//! Everything a run needs is carried in one [`HarnessConfig`] value and passed
//! to the harness explicitly, so several configurations can coexist (tests do
//! this constantly).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the emulator binary (skips discovery).
pub const EMULATOR_ENV: &str = "PSPTEST_EMULATOR";
/// Environment variable naming the test root (skips discovery).
pub const TEST_ROOT_ENV: &str = "PSPTEST_ROOT";

/// Per-test deadline used when none is configured.
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Flags that belong to the harness and are never forwarded to the emulator.
pub const HARNESS_ONLY_FLAGS: &[&str] = &["-g", "--graphics"];

/// Configuration for one harness invocation.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Emulator binary to launch
    pub emulator: PathBuf,
    /// Directory holding the compiled test images
    pub test_root: PathBuf,
    /// Deadline granted to each test; a batch gets this times its size
    pub test_timeout: Duration,
    /// Emit TeamCity progress lines and forward `--teamcity` to the emulator
    pub teamcity: bool,
    /// Graphics comparison mode (regression set only by default)
    pub graphics: bool,
    /// Extra flags appended to the emulator command line
    pub passthrough: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            emulator: PathBuf::new(),
            test_root: PathBuf::from("pspautotests/tests"),
            test_timeout: DEFAULT_TEST_TIMEOUT,
            teamcity: false,
            graphics: false,
            passthrough: Vec::new(),
        }
    }
}

impl HarnessConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the emulator binary
    pub fn with_emulator(mut self, emulator: impl Into<PathBuf>) -> Self {
        self.emulator = emulator.into();
        self
    }

    /// Set the test root directory
    pub fn with_test_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.test_root = root.into();
        self
    }

    /// Set the per-test deadline
    pub fn with_test_timeout(mut self, timeout: Duration) -> Self {
        self.test_timeout = timeout;
        self
    }

    /// Enable or disable TeamCity mode
    pub fn with_teamcity(mut self, enabled: bool) -> Self {
        self.teamcity = enabled;
        self
    }

    /// Enable or disable graphics mode
    pub fn with_graphics(mut self, enabled: bool) -> Self {
        self.graphics = enabled;
        self
    }

    /// Set the flags forwarded to the emulator.
    ///
    /// Harness-only flags are dropped here so they can never reach the child.
    pub fn with_passthrough<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passthrough = flags
            .into_iter()
            .map(Into::into)
            .filter(|flag| !HARNESS_ONLY_FLAGS.contains(&flag.as_str()))
            .collect();
        self
    }

    /// Flags forwarded to the emulator, including `--teamcity` when enabled.
    pub fn emulator_flags(&self) -> Vec<String> {
        let mut flags = Vec::with_capacity(self.passthrough.len() + 1);
        if self.teamcity && !self.passthrough.iter().any(|f| f == "--teamcity") {
            flags.push("--teamcity".to_string());
        }
        flags.extend(self.passthrough.iter().cloned());
        flags
    }
}

/// Explicit paths taken from the environment, if set and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub emulator: Option<PathBuf>,
    pub test_root: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read `PSPTEST_EMULATOR` and `PSPTEST_ROOT`.
    pub fn from_env() -> Self {
        Self {
            emulator: non_empty_var(EMULATOR_ENV),
            test_root: non_empty_var(TEST_ROOT_ENV),
        }
    }
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
