//! Target platforms and their per-platform services
//!
//! A [`TargetPlatform`] is an ordered combination of constituent
//! [`PlatformKind`]s. Each kind contributes a [`PlatformServiceSet`]; the
//! [`ServiceMerger`] folds them into the [`CompositeServiceSet`] a module
//! container is built from.

mod configurator;
mod imports;
mod merge;
mod services;

pub use configurator::PlatformConfigurator;
pub use imports::{FqName, ImportPath};
pub use merge::ServiceMerger;
pub use services::{CompositeServiceSet, PlatformServiceSet};

use crate::error::PlatformError;
use std::fmt;
use std::str::FromStr;

/// A constituent platform component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlatformKind {
    /// Java virtual machine
    Jvm,
    /// JavaScript
    Js,
    /// Platform-independent common code
    Common,
    /// Native binaries
    Native,
}

impl PlatformKind {
    /// All known platform kinds
    pub const ALL: [PlatformKind; 4] = [
        PlatformKind::Jvm,
        PlatformKind::Js,
        PlatformKind::Common,
        PlatformKind::Native,
    ];

    /// Lowercase identifier used in manifests and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            PlatformKind::Jvm => "jvm",
            PlatformKind::Js => "js",
            PlatformKind::Common => "common",
            PlatformKind::Native => "native",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Jvm => write!(f, "JVM"),
            PlatformKind::Js => write!(f, "JS"),
            PlatformKind::Common => write!(f, "Common"),
            PlatformKind::Native => write!(f, "Native"),
        }
    }
}

impl FromStr for PlatformKind {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jvm" => Ok(PlatformKind::Jvm),
            "js" => Ok(PlatformKind::Js),
            "common" => Ok(PlatformKind::Common),
            "native" => Ok(PlatformKind::Native),
            other => Err(PlatformError::UnknownPlatform(other.to_string())),
        }
    }
}

/// An ordered, duplicate-free combination of platform components
///
/// Order is significant: constituent configurators run in this order and
/// the first constituent wins extension clashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TargetPlatform {
    components: Vec<PlatformKind>,
}

impl TargetPlatform {
    /// Build a platform from components, dropping repeats
    pub fn new(components: impl IntoIterator<Item = PlatformKind>) -> Self {
        let mut unique = Vec::new();
        for kind in components {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { components: unique }
    }

    /// Single-component platform
    pub fn single(kind: PlatformKind) -> Self {
        Self {
            components: vec![kind],
        }
    }

    /// JVM-only platform
    pub fn jvm() -> Self {
        Self::single(PlatformKind::Jvm)
    }

    /// JS-only platform
    pub fn js() -> Self {
        Self::single(PlatformKind::Js)
    }

    /// Common-only platform
    pub fn common() -> Self {
        Self::single(PlatformKind::Common)
    }

    /// Native-only platform
    pub fn native() -> Self {
        Self::single(PlatformKind::Native)
    }

    /// Parse a comma or plus separated list such as `jvm,common` or `js+common`
    pub fn parse(spec: &str) -> Result<Self, PlatformError> {
        let kinds = spec
            .split([',', '+'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(PlatformKind::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if kinds.is_empty() {
            return Err(PlatformError::Empty);
        }
        Ok(Self::new(kinds))
    }

    /// Constituent components in order
    pub fn components(&self) -> &[PlatformKind] {
        &self.components
    }

    /// Check membership of a component
    pub fn has(&self, kind: PlatformKind) -> bool {
        self.components.contains(&kind)
    }

    /// Check whether JVM is a component
    pub fn has_jvm(&self) -> bool {
        self.has(PlatformKind::Jvm)
    }

    /// Check whether JS is a component
    pub fn has_js(&self) -> bool {
        self.has(PlatformKind::Js)
    }

    /// Check whether Native is a component
    pub fn has_native(&self) -> bool {
        self.has(PlatformKind::Native)
    }

    /// Common code: either an explicit Common component or a mix of platforms
    pub fn is_common(&self) -> bool {
        self.has(PlatformKind::Common) || self.components.len() > 1
    }

    /// JS is the only component
    pub fn is_js(&self) -> bool {
        self.components == [PlatformKind::Js]
    }

    /// JVM is the only component
    pub fn is_jvm(&self) -> bool {
        self.components == [PlatformKind::Jvm]
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the platform has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "<none>");
        }
        for (i, kind) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", kind)?;
        }
        Ok(())
    }
}

impl FromIterator<PlatformKind> for TargetPlatform {
    fn from_iter<I: IntoIterator<Item = PlatformKind>>(iter: I) -> Self {
        Self::new(iter)
    }
}
