//! Project-level entry point

use super::cache::ModuleResolverCache;
use super::cross_module::{CrossModuleClassResolver, ModuleOwnership, ResolverProvider};
use super::ResolverForModule;
use crate::container::{ContainerBuilder, ContainerHook, JavaClassFinder};
use crate::error::ResolveError;
use crate::fragments::{
    FragmentProviderComposer, LibraryMetadataLoader, NativeFragmentHook, ResolvedSymbol,
};
use crate::module::{
    DeclarationProviderFactory, LanguageVersionSettings, MetadataPartProviderFactory,
    ModuleContent, ModuleContext, ModuleDescriptor, ModuleInfo, PackagePartProviderFactory,
};
use crate::platform::{CompositeServiceSet, FqName, TargetPlatform};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Collaborators supplied by the embedding environment
#[derive(Clone)]
pub struct ProjectEnvironment {
    declaration_providers: Arc<dyn DeclarationProviderFactory>,
    package_parts: Arc<dyn PackagePartProviderFactory>,
    metadata_parts: Arc<dyn MetadataPartProviderFactory>,
    ownership: Arc<dyn ModuleOwnership>,
    java_classes: Option<Arc<dyn JavaClassFinder>>,
    library_metadata: Option<Arc<dyn LibraryMetadataLoader>>,
    native_fragments: Option<Arc<dyn NativeFragmentHook>>,
    post_configure: Option<ContainerHook>,
}

impl ProjectEnvironment {
    /// Environment with the required collaborators
    pub fn new(
        declaration_providers: Arc<dyn DeclarationProviderFactory>,
        package_parts: Arc<dyn PackagePartProviderFactory>,
        metadata_parts: Arc<dyn MetadataPartProviderFactory>,
        ownership: Arc<dyn ModuleOwnership>,
    ) -> Self {
        Self {
            declaration_providers,
            package_parts,
            metadata_parts,
            ownership,
            java_classes: None,
            library_metadata: None,
            native_fragments: None,
            post_configure: None,
        }
    }

    /// Raw Java class lookup
    pub fn with_java_classes(mut self, finder: Arc<dyn JavaClassFinder>) -> Self {
        self.java_classes = Some(finder);
        self
    }

    /// JS library metadata loader
    pub fn with_library_metadata(mut self, loader: Arc<dyn LibraryMetadataLoader>) -> Self {
        self.library_metadata = Some(loader);
        self
    }

    /// Native fragment hook
    pub fn with_native_fragments(mut self, hook: Arc<dyn NativeFragmentHook>) -> Self {
        self.native_fragments = Some(hook);
        self
    }

    /// Container post-configuration hook
    pub fn with_post_configure(mut self, hook: ContainerHook) -> Self {
        self.post_configure = Some(hook);
        self
    }
}

/// Resolvers for every module of a project
///
/// Always handed out as `Arc`; module class resolvers hold a weak
/// reference back to the project.
pub struct ResolverForProject {
    name: String,
    order: Vec<ModuleInfo>,
    modules: FxHashMap<ModuleInfo, ModuleContent>,
    settings: LanguageVersionSettings,
    default_platform: TargetPlatform,
    environment: ProjectEnvironment,
    cache: ModuleResolverCache,
    self_ref: Weak<ResolverForProject>,
}

impl ResolverForProject {
    /// Create a project
    ///
    /// Modules without a platform restriction are resolved for
    /// `default_platform`.
    pub fn new(
        name: impl Into<String>,
        modules: Vec<ModuleContent>,
        settings: LanguageVersionSettings,
        default_platform: TargetPlatform,
        environment: ProjectEnvironment,
    ) -> Arc<Self> {
        let order = modules.iter().map(|content| content.info.clone()).collect();
        let modules = modules
            .into_iter()
            .map(|content| (content.info.clone(), content))
            .collect();

        Arc::new_cyclic(|self_ref| Self {
            name: name.into(),
            order,
            modules,
            settings,
            default_platform,
            environment,
            cache: ModuleResolverCache::new(),
            self_ref: self_ref.clone(),
        })
    }

    /// Project name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modules in declaration order
    pub fn modules(&self) -> &[ModuleInfo] {
        &self.order
    }

    /// Find a module by name
    pub fn module(&self, name: &str) -> Option<&ModuleInfo> {
        self.order.iter().find(|info| info.name() == name)
    }

    /// Content of a module
    pub fn content(&self, module: &ModuleInfo) -> Option<&ModuleContent> {
        self.modules.get(module)
    }

    /// Language settings every module is analyzed with
    pub fn settings(&self) -> &LanguageVersionSettings {
        &self.settings
    }

    /// Resolver cache
    pub fn cache(&self) -> &ModuleResolverCache {
        &self.cache
    }

    /// Platform a module is resolved for
    pub fn effective_platform(&self, module: &ModuleInfo) -> TargetPlatform {
        module
            .platform()
            .cloned()
            .unwrap_or_else(|| self.default_platform.clone())
    }

    /// Resolver for `module`, building it on first request
    pub fn resolver_for_module(
        &self,
        module: &ModuleInfo,
    ) -> Result<Arc<ResolverForModule>, ResolveError> {
        let content = self
            .modules
            .get(module)
            .ok_or_else(|| ResolveError::UnknownModule(module.name().to_string()))?;
        self.cache.get_or_build(module, || self.build_resolver(content))
    }

    /// Resolver for `module` if it is already built
    pub fn try_get_resolver_for_module(
        &self,
        module: &ModuleInfo,
    ) -> Option<Arc<ResolverForModule>> {
        self.cache.try_get(module)
    }

    /// Resolve a symbol as seen from `module`
    ///
    /// The module's own surface is consulted first, then its dependencies
    /// in declaration order.
    pub fn find_symbol(
        &self,
        module: &ModuleInfo,
        fq_name: &FqName,
    ) -> Result<Option<ResolvedSymbol>, ResolveError> {
        let resolver = self.resolver_for_module(module)?;
        if let Some(symbol) = resolver.symbol_provider().find(fq_name) {
            return Ok(Some(symbol));
        }

        for dependency in resolver.descriptor().dependencies() {
            let resolver = self.resolver_for_module(dependency)?;
            if let Some(symbol) = resolver.symbol_provider().find(fq_name) {
                return Ok(Some(symbol));
            }
        }
        Ok(None)
    }

    fn build_resolver(&self, content: &ModuleContent) -> Result<ResolverForModule, ResolveError> {
        let info = &content.info;
        let platform = self.effective_platform(info);
        let descriptor = ModuleDescriptor::new(
            info.clone(),
            platform.clone(),
            content.scope.dependencies().to_vec(),
        );
        let env = &self.environment;

        let declarations =
            env.declaration_providers.create(&content.synthetic_files, &content.scope, info);
        let project: Weak<dyn ResolverProvider> = self.self_ref.clone();
        let class_resolver =
            CrossModuleClassResolver::new(info.clone(), Arc::clone(&env.ownership), project);

        let mut builder = ContainerBuilder::new(
            ModuleContext::new(descriptor.clone(), self.settings),
            CompositeServiceSet::for_platform(&platform),
            content.scope.clone(),
            declarations,
        )
        .with_package_parts(env.package_parts.create(content))
        .with_metadata_parts(env.metadata_parts.create(content))
        .with_module_class_resolver(Arc::new(class_resolver));
        if let Some(finder) = &env.java_classes {
            builder = builder.with_java_class_finder(Arc::clone(finder));
        }
        if let Some(hook) = &env.post_configure {
            builder = builder.with_post_configure(Arc::clone(hook));
        }
        let container = Arc::new(builder.build()?);

        let symbols = FragmentProviderComposer::new(Arc::clone(&container))
            .with_metadata_loader(env.library_metadata.clone())
            .with_native_hook(env.native_fragments.clone())
            .compose()?;

        Ok(ResolverForModule::new(descriptor, container, symbols))
    }
}

impl ResolverProvider for ResolverForProject {
    fn resolver_for_module(
        &self,
        module: &ModuleInfo,
    ) -> Result<Arc<ResolverForModule>, ResolveError> {
        ResolverForProject::resolver_for_module(self, module)
    }

    fn try_get_resolver_for_module(&self, module: &ModuleInfo) -> Option<Arc<ResolverForModule>> {
        ResolverForProject::try_get_resolver_for_module(self, module)
    }
}

impl fmt::Debug for ResolverForProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverForProject")
            .field("name", &self.name)
            .field("modules", &self.order)
            .field("cache", &self.cache.stats())
            .finish()
    }
}
