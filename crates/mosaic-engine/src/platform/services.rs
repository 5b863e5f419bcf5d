//! Per-platform and composite service sets

use super::configurator::PlatformConfigurator;
use super::imports::{FqName, ImportPath};
use super::merge::ServiceMerger;
use super::{PlatformKind, TargetPlatform};
use std::collections::BTreeSet;

/// Star imports every platform treats as default
const SHARED_DEFAULT_IMPORTS: &[&str] = &[
    "lang.*",
    "lang.annotation.*",
    "lang.collections.*",
    "lang.comparisons.*",
    "lang.ranges.*",
    "lang.sequences.*",
    "lang.text.*",
];

/// Services one platform contributes to a module
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformServiceSet {
    /// Platform that supplies these services
    pub platform: PlatformKind,
    /// Imports applied to every file, in priority order
    pub default_imports: Vec<ImportPath>,
    /// Imports consulted only after explicit and default imports
    pub low_priority_imports: Vec<ImportPath>,
    /// Names hidden from default imports
    pub excluded_imports: BTreeSet<FqName>,
    /// Checker and extension registrar
    pub configurator: PlatformConfigurator,
}

impl PlatformServiceSet {
    /// Empty service set for a platform
    pub fn new(platform: PlatformKind) -> Self {
        Self {
            platform,
            default_imports: Vec::new(),
            low_priority_imports: Vec::new(),
            excluded_imports: BTreeSet::new(),
            configurator: PlatformConfigurator::for_kind(platform),
        }
    }

    /// Add a default import
    pub fn with_default_import(mut self, path: &str) -> Self {
        self.default_imports.push(ImportPath::parse(path));
        self
    }

    /// Add a low-priority import
    pub fn with_low_priority_import(mut self, path: &str) -> Self {
        self.low_priority_imports.push(ImportPath::parse(path));
        self
    }

    /// Add an excluded name
    pub fn with_excluded_import(mut self, name: &str) -> Self {
        self.excluded_imports.insert(FqName::new(name));
        self
    }

    /// Services shipped with the toolchain for a platform kind
    pub fn builtin(platform: PlatformKind) -> Self {
        let mut services = Self::new(platform);
        for path in SHARED_DEFAULT_IMPORTS {
            services = services.with_default_import(path);
        }

        match platform {
            PlatformKind::Jvm => services
                .with_default_import("lang.jvm.*")
                .with_low_priority_import("java.lang.*")
                .with_excluded_import("java.lang.Deprecated")
                .with_excluded_import("java.lang.Override"),
            PlatformKind::Js => services
                .with_default_import("lang.js.*")
                .with_excluded_import("lang.text.Appendable"),
            PlatformKind::Native => services
                .with_default_import("lang.native.*")
                .with_excluded_import("lang.native.concurrent.Future"),
            PlatformKind::Common => services,
        }
    }
}

/// Services of a composite platform, merged from its constituents
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeServiceSet {
    /// The composite platform
    pub platform: TargetPlatform,
    /// Imports every constituent treats as default
    pub default_imports: Vec<ImportPath>,
    /// Low-priority imports every constituent shares
    pub low_priority_imports: Vec<ImportPath>,
    /// Names any constituent excludes
    pub excluded_imports: BTreeSet<FqName>,
    /// Constituent configurators, in constituent order
    pub configurator: PlatformConfigurator,
}

impl CompositeServiceSet {
    /// Merge the built-in services of every component of `platform`
    pub fn for_platform(platform: &TargetPlatform) -> Self {
        let sets: Vec<PlatformServiceSet> = platform
            .components()
            .iter()
            .map(|kind| PlatformServiceSet::builtin(*kind))
            .collect();
        ServiceMerger::merge(&sets)
    }

    /// Check whether a name is hidden from default imports
    pub fn is_excluded(&self, name: &FqName) -> bool {
        self.excluded_imports.contains(name)
    }

    /// Check whether a name is visible through default or low-priority imports
    pub fn is_default_imported(&self, name: &FqName) -> bool {
        !self.is_excluded(name)
            && self
                .default_imports
                .iter()
                .chain(self.low_priority_imports.iter())
                .any(|import| import.imports(name))
    }
}
