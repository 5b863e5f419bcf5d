//! Cross-module class resolution
//!
//! A Java class found while resolving one module may belong to another.
//! The owner's resolver is used when it is already built and eligible;
//! otherwise the class is resolved locally. Local fallback never blocks on
//! another module, which is what keeps mutually referencing modules from
//! recursing or deadlocking. The price is that the same class may get
//! equal descriptors from several modules.
//!
//! Each requesting module keeps the first descriptor it got for a class,
//! so later lookups from that module return the same descriptor even
//! after the owner's resolver becomes available.

use super::ResolverForModule;
use crate::container::{ClassDescriptor, JavaClass, ModuleClassResolver};
use crate::error::ResolveError;
use crate::module::ModuleInfo;
use crate::platform::FqName;
use dashmap::DashMap;
use std::sync::{Arc, Weak};

/// Decides which module owns a Java class
pub trait ModuleOwnership: Send + Sync {
    /// Owning module, if known
    fn module_of(&self, class: &JavaClass) -> Option<ModuleInfo>;
}

impl<F> ModuleOwnership for F
where
    F: Fn(&JavaClass) -> Option<ModuleInfo> + Send + Sync,
{
    fn module_of(&self, class: &JavaClass) -> Option<ModuleInfo> {
        self(class)
    }
}

/// Hands out module resolvers
pub trait ResolverProvider: Send + Sync {
    /// Resolver for `module`, building it if needed
    fn resolver_for_module(
        &self,
        module: &ModuleInfo,
    ) -> Result<Arc<ResolverForModule>, ResolveError>;

    /// Resolver for `module` if it is already built
    fn try_get_resolver_for_module(&self, module: &ModuleInfo) -> Option<Arc<ResolverForModule>>;
}

/// Module class resolver of one module
pub struct CrossModuleClassResolver {
    module: ModuleInfo,
    ownership: Arc<dyn ModuleOwnership>,
    project: Weak<dyn ResolverProvider>,
    resolved: DashMap<FqName, ClassDescriptor>,
}

impl CrossModuleClassResolver {
    /// Resolver for classes referenced from `module`
    pub fn new(
        module: ModuleInfo,
        ownership: Arc<dyn ModuleOwnership>,
        project: Weak<dyn ResolverProvider>,
    ) -> Self {
        Self {
            module,
            ownership,
            project,
            resolved: DashMap::new(),
        }
    }

    /// Requesting module
    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    fn owner_resolver(
        &self,
        project: &dyn ResolverProvider,
        class: &JavaClass,
    ) -> Option<Arc<ResolverForModule>> {
        let owner = self.ownership.module_of(class)?;
        let resolver = project.try_get_resolver_for_module(&owner);
        // An unrestricted owner is built for the default platform, which may lack JVM
        let targets_jvm = owner.platform().map_or(true, |platform| platform.has_jvm());

        match resolver {
            Some(resolver) if targets_jvm && resolver.java_class_resolver().is_some() => {
                Some(resolver)
            }
            Some(_) => {
                tracing::debug!(
                    class = %class.fq_name,
                    owner = %owner,
                    "owner has no JVM class resolver, resolving locally"
                );
                None
            }
            None => {
                tracing::debug!(
                    class = %class.fq_name,
                    owner = %owner,
                    "owner resolver not available, resolving locally"
                );
                None
            }
        }
    }

    fn resolve_uncached(&self, class: &JavaClass) -> Option<ClassDescriptor> {
        let Some(project) = self.project.upgrade() else {
            tracing::warn!(module = %self.module, "{}", ResolveError::ProjectDropped);
            return None;
        };

        let resolver = match self.owner_resolver(project.as_ref(), class) {
            Some(resolver) => resolver,
            None => match project.resolver_for_module(&self.module) {
                Ok(resolver) => resolver,
                Err(err) => {
                    tracing::warn!(
                        module = %self.module,
                        class = %class.fq_name,
                        error = %err,
                        "local class resolution failed"
                    );
                    return None;
                }
            },
        };

        resolver.java_class_resolver()?.resolve_class(class)
    }
}

impl ModuleClassResolver for CrossModuleClassResolver {
    fn resolve_class(&self, class: &JavaClass) -> Option<ClassDescriptor> {
        if let Some(descriptor) = self.resolved.get(&class.fq_name) {
            return Some(descriptor.clone());
        }

        let descriptor = self.resolve_uncached(class)?;
        let descriptor = self
            .resolved
            .entry(class.fq_name.clone())
            .or_insert(descriptor)
            .clone();
        Some(descriptor)
    }
}

impl std::fmt::Debug for CrossModuleClassResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossModuleClassResolver")
            .field("module", &self.module)
            .field("resolved", &self.resolved.len())
            .finish_non_exhaustive()
    }
}
