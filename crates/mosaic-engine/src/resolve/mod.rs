//! Module resolution
//!
//! A [`ResolverForProject`] owns one [`ModuleResolverCache`] and builds each
//! module's [`ResolverForModule`] on first request. Java classes referenced
//! across modules are routed through a [`CrossModuleClassResolver`].

mod cache;
mod cross_module;
mod project;

pub use cache::{CacheStats, ModuleResolverCache};
pub use cross_module::{CrossModuleClassResolver, ModuleOwnership, ResolverProvider};
pub use project::{ProjectEnvironment, ResolverForProject};

use crate::container::{Container, JavaDescriptorResolver};
use crate::fragments::CompositePackageFragmentProvider;
use crate::module::ModuleDescriptor;
use std::fmt;
use std::sync::Arc;

/// Everything later phases need to analyze one module
///
/// Immutable once built; shared through `Arc` by the cache and callers.
pub struct ResolverForModule {
    descriptor: ModuleDescriptor,
    container: Arc<Container>,
    symbol_provider: CompositePackageFragmentProvider,
}

impl ResolverForModule {
    /// Pair a container with its composed symbol surface
    pub fn new(
        descriptor: ModuleDescriptor,
        container: Arc<Container>,
        symbol_provider: CompositePackageFragmentProvider,
    ) -> Self {
        Self {
            descriptor,
            container,
            symbol_provider,
        }
    }

    /// Module descriptor
    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    /// Component registry
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Composite symbol surface
    pub fn symbol_provider(&self) -> &CompositePackageFragmentProvider {
        &self.symbol_provider
    }

    /// Java descriptor resolver, when the module targets JVM
    pub fn java_class_resolver(&self) -> Option<&Arc<JavaDescriptorResolver>> {
        self.container.jvm().map(|jvm| jvm.descriptor_resolver())
    }
}

impl fmt::Debug for ResolverForModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverForModule")
            .field("module", self.descriptor.info())
            .field("platform", self.descriptor.platform())
            .field("symbol_provider", &self.symbol_provider)
            .finish()
    }
}
