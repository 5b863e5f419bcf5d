//! Module identity, content and context
//!
//! These are the raw inputs a module resolver is built from. Everything here
//! is supplied by the embedding environment and treated as immutable.

mod declarations;
mod parts;

pub use declarations::{
    Declaration, DeclarationEntry, DeclarationKind, DeclarationProvider, DeclarationProviderFactory,
    FileBasedDeclarationProvider, FileBasedDeclarationProviderFactory, SyntheticFile,
};
pub use parts::{
    MetadataPart, MetadataPartProvider, MetadataPartProviderFactory, PackagePartProvider,
    PackagePartProviderFactory,
};

use crate::error::PlatformError;
use crate::platform::TargetPlatform;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// What a module is built from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Sources compiled as part of the project
    Source,
    /// Precompiled library with its roots on disk
    Library {
        /// Library roots
        roots: Vec<PathBuf>,
    },
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ModuleInfoData {
    name: String,
    platform: Option<TargetPlatform>,
    kind: ModuleKind,
}

/// Identity of a compilation module
///
/// Cheap to clone; equality and hashing are structural and stable, so the
/// value is used directly as a cache key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ModuleInfo(Arc<ModuleInfoData>);

impl ModuleInfo {
    /// Create a module identity
    pub fn new(
        name: impl Into<String>,
        platform: Option<TargetPlatform>,
        kind: ModuleKind,
    ) -> Self {
        Self(Arc::new(ModuleInfoData {
            name: name.into(),
            platform,
            kind,
        }))
    }

    /// Source module targeting `platform`
    pub fn source(name: impl Into<String>, platform: TargetPlatform) -> Self {
        Self::new(name, Some(platform), ModuleKind::Source)
    }

    /// Library module targeting `platform`
    pub fn library(name: impl Into<String>, platform: TargetPlatform, roots: Vec<PathBuf>) -> Self {
        Self::new(name, Some(platform), ModuleKind::Library { roots })
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Target platform; `None` means the module has no platform restriction
    pub fn platform(&self) -> Option<&TargetPlatform> {
        self.0.platform.as_ref()
    }

    /// Module kind
    pub fn kind(&self) -> &ModuleKind {
        &self.0.kind
    }

    /// Check if this is a library module
    pub fn is_library(&self) -> bool {
        matches!(self.0.kind, ModuleKind::Library { .. })
    }

    /// Library roots (empty for source modules)
    pub fn library_roots(&self) -> &[PathBuf] {
        match &self.0.kind {
            ModuleKind::Library { roots } => roots,
            ModuleKind::Source => &[],
        }
    }
}

impl fmt::Debug for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleInfo({})", self.0.name)
    }
}

impl fmt::Display for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

/// The set of modules whose symbols a module may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentScope {
    module: ModuleInfo,
    dependencies: Vec<ModuleInfo>,
}

impl ContentScope {
    /// Scope of `module` plus its direct dependencies
    pub fn new(module: ModuleInfo, dependencies: Vec<ModuleInfo>) -> Self {
        Self {
            module,
            dependencies,
        }
    }

    /// Scope of a module that sees nothing but itself
    pub fn module_only(module: ModuleInfo) -> Self {
        Self::new(module, Vec::new())
    }

    /// Owning module
    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    /// Direct dependencies
    pub fn dependencies(&self) -> &[ModuleInfo] {
        &self.dependencies
    }

    /// Check whether symbols of `module` are visible in this scope
    pub fn contains(&self, module: &ModuleInfo) -> bool {
        self.module == *module || self.dependencies.contains(module)
    }
}

/// A module's raw inputs
#[derive(Debug, Clone)]
pub struct ModuleContent {
    /// Module identity
    pub info: ModuleInfo,
    /// In-memory source files
    pub synthetic_files: Vec<SyntheticFile>,
    /// Visibility scope
    pub scope: ContentScope,
}

impl ModuleContent {
    /// Content with the given files and dependencies
    pub fn new(
        info: ModuleInfo,
        synthetic_files: Vec<SyntheticFile>,
        dependencies: Vec<ModuleInfo>,
    ) -> Self {
        let scope = ContentScope::new(info.clone(), dependencies);
        Self {
            info,
            synthetic_files,
            scope,
        }
    }
}

/// `MAJOR.MINOR` language or API version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

impl LanguageVersion {
    /// Create a version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Latest stable language version
    pub const LATEST_STABLE: LanguageVersion = LanguageVersion::new(2, 0);
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for LanguageVersion {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlatformError::InvalidVersion(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

/// Language feature level a module is analyzed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageVersionSettings {
    /// Language version
    pub language_version: LanguageVersion,
    /// API version (never above the language version)
    pub api_version: LanguageVersion,
}

impl LanguageVersionSettings {
    /// Settings with the API version clamped to the language version
    pub fn new(language_version: LanguageVersion, api_version: Option<LanguageVersion>) -> Self {
        let api_version = api_version
            .map(|api| api.min(language_version))
            .unwrap_or(language_version);
        Self {
            language_version,
            api_version,
        }
    }
}

impl Default for LanguageVersionSettings {
    fn default() -> Self {
        Self::new(LanguageVersion::LATEST_STABLE, None)
    }
}

/// Descriptor of a module as seen by later phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    info: ModuleInfo,
    platform: TargetPlatform,
    dependencies: Vec<ModuleInfo>,
}

impl ModuleDescriptor {
    /// Create a descriptor
    pub fn new(info: ModuleInfo, platform: TargetPlatform, dependencies: Vec<ModuleInfo>) -> Self {
        Self {
            info,
            platform,
            dependencies,
        }
    }

    /// Module identity
    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    /// Effective platform the module is resolved for
    pub fn platform(&self) -> &TargetPlatform {
        &self.platform
    }

    /// Direct dependencies
    pub fn dependencies(&self) -> &[ModuleInfo] {
        &self.dependencies
    }

    /// Special name, `<name>`
    pub fn stable_name(&self) -> String {
        format!("<{}>", self.info.name())
    }
}

/// Everything a container needs to know about the module it serves
#[derive(Debug, Clone)]
pub struct ModuleContext {
    /// Module descriptor
    pub descriptor: ModuleDescriptor,
    /// Language settings
    pub language_settings: LanguageVersionSettings,
}

impl ModuleContext {
    /// Create a module context
    pub fn new(descriptor: ModuleDescriptor, language_settings: LanguageVersionSettings) -> Self {
        Self {
            descriptor,
            language_settings,
        }
    }

    /// Module identity
    pub fn module(&self) -> &ModuleInfo {
        self.descriptor.info()
    }
}
