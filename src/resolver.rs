//! Target resolution
//!
//! Maps logical test names (`cpu/cpu_alu/cpu_alu`) to the compiled image the
//! emulator should load. `.prx` is preferred; `.elf` is the fallback. A
//! missing artifact is never an error here: the emulator reports it itself
//! when it tries to load the path.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Preferred artifact extension.
pub const PRIMARY_EXTENSION: &str = "prx";
/// Fallback artifact extension.
pub const SECONDARY_EXTENSION: &str = "elf";

/// A logical test, named by its path under the test root without extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestTarget(String);

impl TestTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Path of this target's artifact with the given extension.
    pub fn artifact_path(&self, test_root: &Path, extension: &str) -> PathBuf {
        test_root.join(format!("{}.{}", self.0, extension))
    }
}

impl fmt::Display for TestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestTarget {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TestTarget {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Which artifact a target resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Prx,
    Elf,
    /// Neither artifact exists; the path points at the `.prx` anyway.
    Missing,
}

/// A target bound to the image path handed to the emulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub target: TestTarget,
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// Resolve a single target against `test_root`.
pub fn resolve_one(target: TestTarget, test_root: &Path) -> ResolvedImage {
    let primary = target.artifact_path(test_root, PRIMARY_EXTENSION);
    if primary.exists() {
        return ResolvedImage {
            target,
            path: primary,
            kind: ArtifactKind::Prx,
        };
    }

    let secondary = target.artifact_path(test_root, SECONDARY_EXTENSION);
    if secondary.exists() {
        warn!(target = %target, "no {}, trying {}", PRIMARY_EXTENSION, SECONDARY_EXTENSION);
        return ResolvedImage {
            target,
            path: secondary,
            kind: ArtifactKind::Elf,
        };
    }

    warn!(
        target = %target,
        path = %primary.display(),
        "no {} or {} artifact; passing the {} path through",
        PRIMARY_EXTENSION,
        SECONDARY_EXTENSION,
        PRIMARY_EXTENSION
    );
    ResolvedImage {
        target,
        path: primary,
        kind: ArtifactKind::Missing,
    }
}

/// Resolve every name, preserving input order.
pub fn resolve<I, S>(names: I, test_root: &Path) -> Vec<ResolvedImage>
where
    I: IntoIterator<Item = S>,
    S: Into<TestTarget>,
{
    names
        .into_iter()
        .map(|name| resolve_one(name.into(), test_root))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_prefers_prx() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cpu/fpu/fpu.prx");
        touch(dir.path(), "cpu/fpu/fpu.elf");

        let image = resolve_one("cpu/fpu/fpu".into(), dir.path());
        assert_eq!(image.kind, ArtifactKind::Prx);
        assert_eq!(image.path, dir.path().join("cpu/fpu/fpu.prx"));
    }

    #[test]
    fn test_falls_back_to_elf() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "ctrl/ctrl.elf");

        let image = resolve_one("ctrl/ctrl".into(), dir.path());
        assert_eq!(image.kind, ArtifactKind::Elf);
        assert_eq!(image.path, dir.path().join("ctrl/ctrl.elf"));
    }

    #[test]
    fn test_missing_keeps_primary_path() {
        let dir = tempfile::tempdir().unwrap();

        let image = resolve_one("umd/umd".into(), dir.path());
        assert_eq!(image.kind, ArtifactKind::Missing);
        assert_eq!(image.path, dir.path().join("umd/umd.prx"));
    }

    #[test]
    fn test_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.elf");
        touch(dir.path(), "c.prx");

        let names = ["c", "a", "b"];
        let images = resolve(names, dir.path());
        let resolved: Vec<&str> = images.iter().map(|i| i.target.name()).collect();
        assert_eq!(resolved, names);
        assert_eq!(
            images.iter().map(|i| i.kind).collect::<Vec<_>>(),
            vec![ArtifactKind::Prx, ArtifactKind::Missing, ArtifactKind::Elf]
        );
    }

    #[test]
    fn test_empty_input() {
        let images = resolve(Vec::<String>::new(), Path::new("/nonexistent"));
        assert!(images.is_empty());
    }
}
