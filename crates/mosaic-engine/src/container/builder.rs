//! Ordered container assembly

use super::checkers::{Checker, CheckerKind, ExtensionKind, PlatformExtension, Registrant};
use super::clash::ExtensionClashResolver;
use super::components::{BindingTrace, CommonComponents, SymbolTable};
use super::jvm::{JavaClassFinder, JvmComponents, ModuleClassResolver, SymbolFileFinder};
use super::Container;
use crate::error::ContainerError;
use crate::module::{
    ContentScope, DeclarationProvider, MetadataPartProvider, ModuleContext, PackagePartProvider,
};
use crate::platform::{CompositeServiceSet, PlatformKind};
use std::sync::Arc;

/// Environment-specific post-configuration hook
pub type ContainerHook = Arc<dyn Fn(&mut ContainerBuilder) + Send + Sync>;

/// Assembles the checker, extension and component registry of one module
///
/// Registration order is significant: defaults first, then each
/// constituent platform in constituent order, then the environment hook.
/// Duplicate registrations are resolved first-wins when the container is
/// built.
pub struct ContainerBuilder {
    context: ModuleContext,
    services: CompositeServiceSet,
    scope: ContentScope,
    declaration_provider: Arc<dyn DeclarationProvider>,
    package_parts: Option<Arc<dyn PackagePartProvider>>,
    metadata_parts: Option<Arc<dyn MetadataPartProvider>>,
    module_class_resolver: Option<Arc<dyn ModuleClassResolver>>,
    java_class_finder: Option<Arc<dyn JavaClassFinder>>,
    post_configure: Option<ContainerHook>,
    checkers: Vec<Checker>,
    extensions: Vec<PlatformExtension>,
    clash_resolvers: Vec<ExtensionClashResolver>,
}

impl ContainerBuilder {
    /// Start a builder for the module described by `context`
    pub fn new(
        context: ModuleContext,
        services: CompositeServiceSet,
        scope: ContentScope,
        declaration_provider: Arc<dyn DeclarationProvider>,
    ) -> Self {
        Self {
            context,
            services,
            scope,
            declaration_provider,
            package_parts: None,
            metadata_parts: None,
            module_class_resolver: None,
            java_class_finder: None,
            post_configure: None,
            checkers: Vec::new(),
            extensions: Vec::new(),
            clash_resolvers: Vec::new(),
        }
    }

    /// Package part provider (required)
    pub fn with_package_parts(mut self, provider: Option<Arc<dyn PackagePartProvider>>) -> Self {
        self.package_parts = provider;
        self
    }

    /// Metadata part provider (required)
    pub fn with_metadata_parts(mut self, provider: Option<Arc<dyn MetadataPartProvider>>) -> Self {
        self.metadata_parts = provider;
        self
    }

    /// Module class resolver (required when targeting JVM)
    pub fn with_module_class_resolver(mut self, resolver: Arc<dyn ModuleClassResolver>) -> Self {
        self.module_class_resolver = Some(resolver);
        self
    }

    /// Raw Java class lookup
    pub fn with_java_class_finder(mut self, finder: Arc<dyn JavaClassFinder>) -> Self {
        self.java_class_finder = Some(finder);
        self
    }

    /// Hook run after platform configuration
    pub fn with_post_configure(mut self, hook: ContainerHook) -> Self {
        self.post_configure = Some(hook);
        self
    }

    /// Module the container is built for
    pub fn context(&self) -> &ModuleContext {
        &self.context
    }

    /// Register a checker
    pub fn register_checker(&mut self, kind: CheckerKind, registered_by: Registrant) {
        self.checkers.push(Checker {
            kind,
            registered_by,
        });
    }

    /// Register a platform extension
    pub fn register_extension(&mut self, kind: ExtensionKind, provided_by: PlatformKind) {
        self.extensions.push(PlatformExtension { kind, provided_by });
    }

    /// Install a clash resolver applied when the container is built
    pub fn install_clash_resolver(&mut self, resolver: ExtensionClashResolver) {
        self.clash_resolvers.push(resolver);
    }

    /// Checkers registered so far, duplicates included
    pub fn registered_checkers(&self) -> &[Checker] {
        &self.checkers
    }

    /// Assemble the container
    ///
    /// Fails if a required part provider is absent, or if the platform
    /// includes JVM and no module class resolver was supplied. Nothing is
    /// returned for a partially wired module.
    pub fn build(mut self) -> Result<Container, ContainerError> {
        let module_name = self.context.module().name().to_string();
        let platform = self.context.descriptor.platform().clone();
        tracing::debug!(module = %module_name, platform = %platform, "building container");

        for kind in CheckerKind::DEFAULTS {
            self.register_checker(kind, Registrant::Default);
        }

        let configurator = self.services.configurator.clone();
        configurator.configure(&mut self);

        let symbol_table = SymbolTable::new(Arc::clone(&self.declaration_provider));
        let trace = BindingTrace::default();

        let symbol_file_finder =
            SymbolFileFinder::new(self.scope.clone(), self.java_class_finder.clone());

        let package_parts = self.package_parts.clone().ok_or_else(|| {
            ContainerError::MissingPackagePartProvider {
                module: module_name.clone(),
            }
        })?;
        let metadata_parts = self.metadata_parts.clone().ok_or_else(|| {
            ContainerError::MissingMetadataPartProvider {
                module: module_name.clone(),
            }
        })?;

        let jvm = if platform.has_jvm() {
            let resolver = self.module_class_resolver.clone().ok_or_else(|| {
                ContainerError::MissingModuleClassResolver {
                    module: module_name.clone(),
                }
            })?;
            Some(JvmComponents::new(symbol_file_finder.clone(), resolver))
        } else {
            None
        };

        let common = platform.has(PlatformKind::Common).then(|| {
            CommonComponents::new(
                Arc::clone(&self.declaration_provider),
                Arc::clone(&metadata_parts),
            )
        });

        self.install_clash_resolver(ExtensionClashResolver::for_checker(
            CheckerKind::ExpectedActualDeclaration,
        ));

        if let Some(hook) = self.post_configure.take() {
            hook(&mut self);
        }

        for resolver in &self.clash_resolvers {
            resolver.apply_to_checkers(&mut self.checkers);
        }
        // Extensions are single-valued per kind
        let mut extension_kinds: Vec<ExtensionKind> =
            self.extensions.iter().map(|e| e.kind).collect();
        extension_kinds.sort();
        extension_kinds.dedup();
        for kind in extension_kinds {
            ExtensionClashResolver::for_extension(kind).apply_to_extensions(&mut self.extensions);
        }

        let container = Container {
            descriptor: self.context.descriptor,
            language_settings: self.context.language_settings,
            services: self.services,
            checkers: self.checkers,
            extensions: self.extensions,
            symbol_table,
            trace,
            scope: self.scope,
            declaration_provider: self.declaration_provider,
            symbol_file_finder,
            package_parts,
            metadata_parts,
            jvm,
            common,
        };

        if let Some(jvm) = container.jvm() {
            jvm.initialize(&container);
        }

        tracing::debug!(
            module = %module_name,
            checkers = container.checkers().len(),
            extensions = container.extensions().len(),
            "container built"
        );
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::checkers::Severity;
    use crate::container::jvm::{ClassDescriptor, JavaClass};
    use crate::module::{
        Declaration, DeclarationKind, FileBasedDeclarationProvider, LanguageVersionSettings,
        MetadataPart, ModuleDescriptor, ModuleInfo, SyntheticFile,
    };
    use crate::platform::{FqName, TargetPlatform};

    struct NoParts;

    impl PackagePartProvider for NoParts {
        fn package_parts(&self, _package: &FqName) -> Vec<String> {
            Vec::new()
        }
    }

    impl MetadataPartProvider for NoParts {
        fn metadata_parts(&self, _package: &FqName) -> Vec<MetadataPart> {
            Vec::new()
        }

        fn packages(&self) -> Vec<FqName> {
            Vec::new()
        }
    }

    struct NoClasses;

    impl ModuleClassResolver for NoClasses {
        fn resolve_class(&self, _class: &JavaClass) -> Option<ClassDescriptor> {
            None
        }
    }

    fn builder(platform: TargetPlatform, files: Vec<SyntheticFile>) -> ContainerBuilder {
        let module = ModuleInfo::source("app", platform.clone());
        let descriptor = ModuleDescriptor::new(module.clone(), platform.clone(), Vec::new());
        let context = ModuleContext::new(descriptor, LanguageVersionSettings::default());
        ContainerBuilder::new(
            context,
            CompositeServiceSet::for_platform(&platform),
            ContentScope::module_only(module),
            Arc::new(FileBasedDeclarationProvider::new(&files)),
        )
        .with_package_parts(Some(Arc::new(NoParts)))
        .with_metadata_parts(Some(Arc::new(NoParts)))
    }

    #[test]
    fn test_missing_package_parts() {
        let err = builder(TargetPlatform::js(), Vec::new())
            .with_package_parts(None)
            .build()
            .unwrap_err();
        assert!(matches!(err, ContainerError::MissingPackagePartProvider { .. }));
    }

    #[test]
    fn test_missing_metadata_parts() {
        let err = builder(TargetPlatform::js(), Vec::new())
            .with_metadata_parts(None)
            .build()
            .unwrap_err();
        assert!(matches!(err, ContainerError::MissingMetadataPartProvider { .. }));
    }

    #[test]
    fn test_jvm_requires_class_resolver() {
        let err = builder(TargetPlatform::jvm(), Vec::new()).build().unwrap_err();
        assert_eq!(
            err,
            ContainerError::MissingModuleClassResolver {
                module: "app".to_string()
            }
        );
    }

    #[test]
    fn test_defaults_come_first() {
        let container = builder(TargetPlatform::js(), Vec::new()).build().unwrap();
        let kinds: Vec<CheckerKind> = container.checkers().iter().map(|c| c.kind).collect();
        assert_eq!(&kinds[..5], &CheckerKind::DEFAULTS);
        assert_eq!(kinds[5], CheckerKind::ExpectedActualDeclaration);
    }

    #[test]
    fn test_single_expected_actual_checker() {
        let platform = TargetPlatform::parse("jvm,common").unwrap();
        let container = builder(platform, Vec::new())
            .with_module_class_resolver(Arc::new(NoClasses))
            .build()
            .unwrap();

        assert_eq!(container.checker_count(CheckerKind::ExpectedActualDeclaration), 1);
        let kept = container
            .checkers()
            .iter()
            .find(|c| c.kind == CheckerKind::ExpectedActualDeclaration)
            .unwrap();
        assert_eq!(kept.registered_by, Registrant::Platform(PlatformKind::Jvm));
        assert!(container.jvm().is_some());
        assert!(container.common().is_some());
    }

    #[test]
    fn test_jvm_initialization_pass() {
        let container = builder(TargetPlatform::jvm(), Vec::new())
            .with_module_class_resolver(Arc::new(NoClasses))
            .build()
            .unwrap();
        let resolver = container.jvm().unwrap().descriptor_resolver();
        assert!(resolver.is_initialized());

        let descriptor = resolver.resolve_class(&JavaClass::new("app.Main")).unwrap();
        assert_eq!(descriptor.module.name(), "app");
    }

    #[test]
    fn test_post_configure_hook_runs_before_clash_resolution() {
        let hook: ContainerHook = Arc::new(|builder: &mut ContainerBuilder| {
            builder.register_checker(
                CheckerKind::ExpectedActualDeclaration,
                Registrant::Environment,
            );
            builder.register_checker(CheckerKind::NativeThrows, Registrant::Environment);
        });
        let container = builder(TargetPlatform::js(), Vec::new())
            .with_post_configure(hook)
            .build()
            .unwrap();

        assert_eq!(container.checker_count(CheckerKind::ExpectedActualDeclaration), 1);
        assert_eq!(container.checker_count(CheckerKind::NativeThrows), 1);
    }

    #[test]
    fn test_extensions_single_valued() {
        let platform = TargetPlatform::parse("js,native").unwrap();
        let container = builder(platform, Vec::new()).build().unwrap();

        let identifier = container.extension(ExtensionKind::IdentifierChecker).unwrap();
        assert_eq!(identifier.provided_by, PlatformKind::Js);
        let mapper = container.extension(ExtensionKind::ClassMapper).unwrap();
        assert_eq!(mapper.provided_by, PlatformKind::Native);
        assert!(container.extension(ExtensionKind::SyntheticScopes).is_none());
    }

    #[test]
    fn test_check_declarations_reports_once() {
        let files = vec![SyntheticFile::new(
            "Clock.kt",
            "demo",
            vec![Declaration::expect("Clock", DeclarationKind::Class)],
        )];
        let platform = TargetPlatform::parse("js,common").unwrap();
        let container = builder(platform, files).build().unwrap();

        let diagnostics = container.check_declarations();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(container.trace().len(), 1);
    }

    #[test]
    fn test_actual_without_expect_in_common_module() {
        let files = vec![SyntheticFile::new(
            "Clock.kt",
            "demo",
            vec![Declaration::actual("Clock", DeclarationKind::Class)],
        )];
        let platform = TargetPlatform::parse("js,common").unwrap();
        let container = builder(platform, files).build().unwrap();

        let diagnostics = container.check_declarations();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("no corresponding expect"));
    }
}
