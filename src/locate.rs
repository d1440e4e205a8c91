//! Locating the emulator binary and the test suite on disk

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::debug;

/// Build outputs that may hold the headless emulator, relative to the
/// checkout root. `*` matches any suffix of a single path component.
pub const EMULATOR_CANDIDATES: &[&str] = &[
    // Windows
    "Windows/Debug/PPSSPPHeadless.exe",
    "Windows/Release/PPSSPPHeadless.exe",
    "Windows/x64/Debug/PPSSPPHeadless.exe",
    "Windows/x64/Release/PPSSPPHeadless.exe",
    // Mac
    "build*/Debug/PPSSPPHeadless",
    "build*/Release/PPSSPPHeadless",
    "build*/RelWithDebInfo/PPSSPPHeadless",
    "build*/MinSizeRel/PPSSPPHeadless",
    // Linux
    "build*/PPSSPPHeadless",
    "PPSSPPHeadless",
];

/// Directory holding the test-suite checkout.
pub const SUITE_DIR: &str = "pspautotests";
/// Test root inside the suite checkout.
pub const TESTS_SUBDIR: &str = "tests";
/// Artifact that must exist before anything runs; proves the suite is built.
pub const SENTINEL_ARTIFACT: &str = "cpu/cpu_alu/cpu_alu.prx";

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("test suite not found; please run git submodule init; git submodule update;")]
    TestRootMissing,

    #[error(
        "please install the pspsdk and run make in common/ and in all the tests\n(checked for existence of {})",
        .checked.display()
    )]
    SentinelMissing { checked: PathBuf },

    #[error("PPSSPP executable missing, please build one.")]
    EmulatorMissing,

    #[error("emulator override {} does not exist", .0.display())]
    EmulatorOverrideMissing(PathBuf),

    #[error("invalid emulator search pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("I/O error while locating {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directories searched for the suite and the emulator, in priority order:
/// the working directory, then the harness executable's directory and up to
/// two of its ancestors (covers `target/debug` inside a checkout).
pub fn search_bases() -> Vec<PathBuf> {
    let mut bases = vec![PathBuf::from(".")];
    if let Ok(exe_path) = env::current_exe() {
        bases.extend(exe_path.ancestors().skip(1).take(3).map(Path::to_path_buf));
    }
    bases
}

/// Find `pspautotests/tests` under the first base that has a suite checkout.
pub fn find_test_root(bases: &[PathBuf]) -> Result<PathBuf, LocateError> {
    bases
        .iter()
        .map(|base| base.join(SUITE_DIR))
        .find(|suite| suite.is_dir())
        .map(|suite| suite.join(TESTS_SUBDIR))
        .ok_or(LocateError::TestRootMissing)
}

/// Confirm the suite has been built before running anything.
pub fn check_sentinel(test_root: &Path) -> Result<(), LocateError> {
    let checked = test_root.join(SENTINEL_ARTIFACT);
    if checked.is_file() {
        Ok(())
    } else {
        Err(LocateError::SentinelMissing { checked })
    }
}

/// Pick the most recently built emulator among the candidates under `bases`.
pub fn find_emulator(bases: &[PathBuf]) -> Result<PathBuf, LocateError> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for base in bases {
        for pattern in EMULATOR_CANDIDATES {
            for path in candidate_paths(base, pattern)? {
                if !path.is_file() {
                    continue;
                }
                let modified = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .map_err(|source| LocateError::Io {
                        path: path.clone(),
                        source,
                    })?;
                debug!(path = %path.display(), ?modified, "emulator candidate");
                if newest.as_ref().is_none_or(|(best, _)| modified > *best) {
                    newest = Some((modified, path));
                }
            }
        }
    }

    newest.map(|(_, path)| path).ok_or(LocateError::EmulatorMissing)
}

/// Validate an explicitly configured emulator path.
pub fn check_emulator_override(path: &Path) -> Result<PathBuf, LocateError> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(LocateError::EmulatorOverrideMissing(path.to_path_buf()))
    }
}

/// Existing paths matching a candidate pattern under `base`.
fn candidate_paths(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, LocateError> {
    let escaped_base = glob::Pattern::escape(&base.to_string_lossy());
    let full = format!("{}/{}", escaped_base, pattern);
    let entries = glob::glob(&full).map_err(|source| LocateError::Pattern {
        pattern: full.clone(),
        source,
    })?;
    Ok(entries.flatten().collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs::File;
    use std::time::Duration;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn set_mtime(path: &Path, secs_after_epoch: u64) {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch);
        File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
    }

    #[test]
    fn test_candidate_paths_wildcard_component() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("build/PPSSPPHeadless"));
        touch(&dir.path().join("build-sdl/PPSSPPHeadless"));
        touch(&dir.path().join("other/PPSSPPHeadless"));

        let found: HashSet<PathBuf> = candidate_paths(dir.path(), "build*/PPSSPPHeadless")
            .unwrap()
            .into_iter()
            .collect();
        let expected: HashSet<PathBuf> = [
            dir.path().join("build/PPSSPPHeadless"),
            dir.path().join("build-sdl/PPSSPPHeadless"),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_candidate_paths_escapes_base() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("checkout[1]");
        touch(&base.join("build/PPSSPPHeadless"));

        let found = candidate_paths(&base, "build*/PPSSPPHeadless").unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("build/PPSSPPHeadless"));
    }

    #[test]
    fn test_find_emulator_picks_newest() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("build/PPSSPPHeadless");
        let new = dir.path().join("build-mac/Release/PPSSPPHeadless");
        touch(&old);
        touch(&new);
        set_mtime(&old, 1_000_000);
        set_mtime(&new, 2_000_000);

        let found = find_emulator(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found, new);
    }

    #[test]
    fn test_find_emulator_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_emulator(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, LocateError::EmulatorMissing));
    }

    #[test]
    fn test_find_test_root_uses_first_base_with_suite() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::create_dir_all(second.path().join("pspautotests/tests")).unwrap();

        let bases = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let root = find_test_root(&bases).unwrap();
        assert_eq!(root, second.path().join("pspautotests/tests"));
    }

    #[test]
    fn test_find_test_root_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_test_root(&[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, LocateError::TestRootMissing));
    }

    #[test]
    fn test_sentinel_check() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_sentinel(dir.path()),
            Err(LocateError::SentinelMissing { .. })
        ));

        touch(&dir.path().join(SENTINEL_ARTIFACT));
        assert!(check_sentinel(dir.path()).is_ok());
    }
}
