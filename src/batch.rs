//! A batch of resolved images submitted to one emulator invocation

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::resolver::ResolvedImage;

/// Argument telling the emulator to read its target list from stdin.
pub const STDIN_TARGETS_ARG: &str = "@-";

/// Ordered images run by a single child process.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    images: Vec<ResolvedImage>,
}

impl Batch {
    pub fn new(images: Vec<ResolvedImage>) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &[ResolvedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The stdin payload: one image path per line, in batch order.
    pub fn payload(&self) -> Vec<u8> {
        self.images
            .iter()
            .map(|image| image.path.to_string_lossy())
            .collect::<Vec<_>>()
            .join("\n")
            .into_bytes()
    }

    /// Wall-clock budget for the whole batch.
    ///
    /// Tests run one after another inside the child, so the budget grows with
    /// the batch while any single hung test still eats at most its own share.
    pub fn deadline(&self, per_test: Duration) -> Duration {
        let count = u32::try_from(self.images.len()).unwrap_or(u32::MAX);
        per_test.saturating_mul(count)
    }
}

/// Build `<emulator> --compare --timeout=<secs> @- [flags...]`.
pub fn emulator_command(emulator: &Path, per_test: Duration, flags: &[String]) -> Vec<OsString> {
    let mut command = Vec::with_capacity(4 + flags.len());
    command.push(emulator.as_os_str().to_os_string());
    command.push(OsString::from("--compare"));
    command.push(OsString::from(format!("--timeout={}", whole_seconds(per_test))));
    command.push(OsString::from(STDIN_TARGETS_ARG));
    command.extend(flags.iter().map(OsString::from));
    command
}

/// Seconds for the emulator's `--timeout`, rounded up so a sub-second
/// deadline never becomes `--timeout=0`.
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ArtifactKind, TestTarget};
    use std::path::PathBuf;

    fn image(path: &str) -> ResolvedImage {
        ResolvedImage {
            target: TestTarget::new(path.trim_end_matches(".prx")),
            path: PathBuf::from(path),
            kind: ArtifactKind::Prx,
        }
    }

    #[test]
    fn test_payload_is_newline_joined_in_order() {
        let batch = Batch::new(vec![image("t/b.prx"), image("t/a.prx"), image("t/c.prx")]);
        assert_eq!(batch.payload(), b"t/b.prx\nt/a.prx\nt/c.prx".to_vec());
    }

    #[test]
    fn test_deadline_scales_with_batch_size() {
        let batch = Batch::new(vec![image("a.prx"), image("b.prx"), image("c.prx")]);
        assert_eq!(batch.deadline(Duration::from_secs(5)), Duration::from_secs(15));
        assert_eq!(batch.deadline(Duration::from_millis(250)), Duration::from_millis(750));
    }

    #[test]
    fn test_empty_batch() {
        let batch = Batch::default();
        assert!(batch.is_empty());
        assert!(batch.payload().is_empty());
        assert_eq!(batch.deadline(Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_emulator_command_shape() {
        let flags = vec!["--teamcity".to_string(), "-v".to_string()];
        let command = emulator_command(Path::new("build/PPSSPPHeadless"), Duration::from_secs(5), &flags);
        let command: Vec<_> = command.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            command,
            vec!["build/PPSSPPHeadless", "--compare", "--timeout=5", "@-", "--teamcity", "-v"]
        );
    }

    #[test]
    fn test_emulator_timeout_rounds_up_fractions() {
        let timeout_arg = |per_test: Duration| {
            let command = emulator_command(Path::new("emu"), per_test, &[]);
            command[2].to_string_lossy().into_owned()
        };
        assert_eq!(timeout_arg(Duration::from_millis(500)), "--timeout=1");
        assert_eq!(timeout_arg(Duration::from_millis(2500)), "--timeout=3");
        assert_eq!(timeout_arg(Duration::from_secs(4)), "--timeout=4");
    }
}
