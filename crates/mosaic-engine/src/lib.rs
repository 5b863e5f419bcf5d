//! Mosaic Resolution Engine
//!
//! Builds the symbol-lookup environment of modules that target a
//! combination of platforms:
//! - **Platforms**: target platforms, per-platform services and their merge (`platform` module)
//! - **Modules**: module identity, content and external providers (`module` module)
//! - **Containers**: per-module checker, extension and component registry (`container` module)
//! - **Fragments**: ordered symbol sources and their composite (`fragments` module)
//! - **Resolution**: project resolver, resolver cache and cross-module classes (`resolve` module)
//! - **Smart casts**: receivers with narrowed types (`smartcast` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use mosaic_engine::{
//!     FileBasedDeclarationProviderFactory, ProjectEnvironment, ResolverForProject,
//!     TargetPlatform, LanguageVersionSettings,
//! };
//!
//! let env = ProjectEnvironment::new(decls, package_parts, metadata_parts, ownership);
//! let project = ResolverForProject::new(
//!     "demo",
//!     modules,
//!     LanguageVersionSettings::default(),
//!     TargetPlatform::parse("jvm,common")?,
//!     env,
//! );
//! let resolver = project.resolver_for_module(&app)?;
//! let symbol = resolver.symbol_provider().find(&"demo.Greeter".into());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod container;
pub mod error;
pub mod fragments;
pub mod module;
pub mod platform;
pub mod resolve;
pub mod smartcast;

// ============================================================================
// Re-exports
// ============================================================================

pub use container::{
    CheckerKind, Container, ContainerBuilder, ContainerHook, Diagnostic, ExtensionClashResolver,
    ExtensionKind, Severity,
};
pub use error::{ContainerError, MetadataError, PlatformError, ResolveError};
pub use fragments::{
    CompositePackageFragmentProvider, FragmentProviderComposer, PackageFragmentProvider,
    ResolvedSymbol, SymbolSource,
};
pub use module::{
    FileBasedDeclarationProviderFactory, LanguageVersion, LanguageVersionSettings, ModuleContent,
    ModuleInfo, ModuleKind,
};
pub use platform::{
    CompositeServiceSet, FqName, ImportPath, PlatformKind, PlatformServiceSet, ServiceMerger,
    TargetPlatform,
};
pub use resolve::{
    CacheStats, CrossModuleClassResolver, ModuleResolverCache, ProjectEnvironment,
    ResolverForModule, ResolverForProject,
};
pub use smartcast::{ReceiverKind, ReceiverValue, ReceiverValueWithSmartCastInfo};
