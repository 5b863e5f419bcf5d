//! Compiled-artifact part providers
//!
//! Both providers are required by every module container. The factories
//! may decline to produce one, which is a configuration error.

use super::{Declaration, ModuleContent};
use crate::platform::FqName;
use std::sync::Arc;

/// One package's worth of common metadata from a compiled library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPart {
    /// Package
    pub package: FqName,
    /// Declarations in the package
    pub declarations: Vec<Declaration>,
    /// Library or artifact the part came from
    pub origin: String,
}

/// Finds common metadata parts visible to a module
pub trait MetadataPartProvider: Send + Sync {
    /// Metadata parts for `package`
    fn metadata_parts(&self, package: &FqName) -> Vec<MetadataPart>;

    /// Every package with metadata
    fn packages(&self) -> Vec<FqName>;
}

/// Finds JVM package parts (class-file facades) visible to a module
pub trait PackagePartProvider: Send + Sync {
    /// Part names for `package`
    fn package_parts(&self, package: &FqName) -> Vec<String>;
}

/// Creates a module's metadata part provider
pub trait MetadataPartProviderFactory: Send + Sync {
    /// Provider for `content`, or `None` if unavailable
    fn create(&self, content: &ModuleContent) -> Option<Arc<dyn MetadataPartProvider>>;
}

/// Creates a module's package part provider
pub trait PackagePartProviderFactory: Send + Sync {
    /// Provider for `content`, or `None` if unavailable
    fn create(&self, content: &ModuleContent) -> Option<Arc<dyn PackagePartProvider>>;
}
