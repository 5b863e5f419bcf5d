//! Service set merging
//!
//! Exclusions are restrictive and must hold on every constituent, so they
//! are unioned. Default imports are permissive and must be valid on every
//! constituent, so they are intersected.

use super::configurator::PlatformConfigurator;
use super::imports::{FqName, ImportPath};
use super::services::{CompositeServiceSet, PlatformServiceSet};
use super::TargetPlatform;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

/// Folds constituent service sets into one composite set
pub struct ServiceMerger;

impl ServiceMerger {
    /// Merge service sets in constituent order
    ///
    /// An empty input yields a composite with no imports and no exclusions.
    pub fn merge(sets: &[PlatformServiceSet]) -> CompositeServiceSet {
        let platform = TargetPlatform::new(sets.iter().map(|set| set.platform));
        let configurator = PlatformConfigurator::Composite(
            sets.iter().map(|set| set.configurator.clone()).collect(),
        );

        CompositeServiceSet {
            platform,
            default_imports: Self::intersect(sets.iter().map(|set| &set.default_imports)),
            low_priority_imports: Self::intersect(
                sets.iter().map(|set| &set.low_priority_imports),
            ),
            excluded_imports: Self::union(sets.iter().map(|set| &set.excluded_imports)),
            configurator,
        }
    }

    /// Intersection, ordered like the first list
    fn intersect<'a>(mut lists: impl Iterator<Item = &'a Vec<ImportPath>>) -> Vec<ImportPath> {
        let Some(first) = lists.next() else {
            return Vec::new();
        };

        let mut retained: FxHashSet<&ImportPath> = first.iter().collect();
        for list in lists {
            let members: FxHashSet<&ImportPath> = list.iter().collect();
            retained.retain(|path| members.contains(path));
        }

        let mut seen = FxHashSet::default();
        first
            .iter()
            .filter(|path| retained.contains(path) && seen.insert(*path))
            .cloned()
            .collect()
    }

    fn union<'a>(sets: impl Iterator<Item = &'a BTreeSet<FqName>>) -> BTreeSet<FqName> {
        sets.flat_map(|set| set.iter().cloned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformKind;

    #[test]
    fn test_empty_merge() {
        let merged = ServiceMerger::merge(&[]);
        assert!(merged.default_imports.is_empty());
        assert!(merged.low_priority_imports.is_empty());
        assert!(merged.excluded_imports.is_empty());
        assert!(merged.platform.is_empty());
        assert_eq!(merged.configurator, PlatformConfigurator::Composite(vec![]));
    }

    #[test]
    fn test_single_set_is_identity() {
        let jvm = PlatformServiceSet::builtin(PlatformKind::Jvm);
        let merged = ServiceMerger::merge(std::slice::from_ref(&jvm));
        assert_eq!(merged.default_imports, jvm.default_imports);
        assert_eq!(merged.low_priority_imports, jvm.low_priority_imports);
        assert_eq!(merged.excluded_imports, jvm.excluded_imports);
    }

    #[test]
    fn test_intersection_keeps_first_order() {
        let a = PlatformServiceSet::new(PlatformKind::Jvm)
            .with_default_import("c.*")
            .with_default_import("a.*")
            .with_default_import("b.*");
        let b = PlatformServiceSet::new(PlatformKind::Js)
            .with_default_import("b.*")
            .with_default_import("c.*");

        let merged = ServiceMerger::merge(&[a, b]);
        assert_eq!(
            merged.default_imports,
            vec![ImportPath::parse("c.*"), ImportPath::parse("b.*")]
        );
    }

    #[test]
    fn test_exclusions_are_unioned() {
        let a = PlatformServiceSet::new(PlatformKind::Jvm).with_excluded_import("x.A");
        let b = PlatformServiceSet::new(PlatformKind::Native).with_excluded_import("y.B");

        let merged = ServiceMerger::merge(&[a, b]);
        assert_eq!(merged.excluded_imports.len(), 2);
        assert!(merged.excluded_imports.contains(&FqName::new("x.A")));
        assert!(merged.excluded_imports.contains(&FqName::new("y.B")));
    }

    #[test]
    fn test_composite_configurator_order() {
        let merged = ServiceMerger::merge(&[
            PlatformServiceSet::builtin(PlatformKind::Js),
            PlatformServiceSet::builtin(PlatformKind::Common),
        ]);
        assert_eq!(
            merged.configurator,
            PlatformConfigurator::Composite(vec![
                PlatformConfigurator::Js,
                PlatformConfigurator::Common
            ])
        );
    }
}
