//! Property-based tests for resolution and batch sizing

use std::path::Path;
use std::time::Duration;

use proptest::prelude::*;
use psptest::{ArtifactKind, Batch, resolve};

fn name_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_]{0,7}", 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    /// Property: resolution keeps length and order, and falls back to `.prx`
    /// when nothing exists
    #[test]
    fn resolution_preserves_order(names in prop::collection::vec(name_strategy(), 0..32)) {
        let root = Path::new("/nonexistent-psptest-root");
        let images = resolve(names.iter().cloned(), root);

        prop_assert_eq!(images.len(), names.len());
        for (image, name) in images.iter().zip(&names) {
            prop_assert_eq!(image.target.name(), name.as_str());
            prop_assert_eq!(image.kind, ArtifactKind::Missing);
            prop_assert_eq!(&image.path, &root.join(format!("{}.prx", name)));
        }
    }

    /// Property: the batch deadline is the per-test deadline times the batch size
    #[test]
    fn deadline_is_per_test_times_count(count in 0usize..64, millis in 1u64..10_000) {
        let names: Vec<String> = (0..count).map(|i| format!("t/{}", i)).collect();
        let batch = Batch::new(resolve(names, Path::new("/nonexistent-psptest-root")));
        let per_test = Duration::from_millis(millis);

        prop_assert_eq!(batch.deadline(per_test), per_test * count as u32);
        let payload = String::from_utf8(batch.payload()).unwrap();
        prop_assert_eq!(payload.lines().count(), count);
    }
}
