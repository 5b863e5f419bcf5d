//! Module containers
//!
//! A [`Container`] is the typed component registry of one module. It is
//! assembled by a [`ContainerBuilder`] in a fixed order and exposes one
//! accessor per capability; nothing is looked up by name or type id.

mod builder;
mod checkers;
mod clash;
mod components;
mod jvm;

pub use builder::{ContainerBuilder, ContainerHook};
pub use checkers::{
    CheckContext, Checker, CheckerKind, Diagnostic, ExtensionKind, PlatformExtension, Registrant,
    Severity,
};
pub use clash::{ClashTarget, ExtensionClashResolver};
pub use components::{BindingTrace, CommonComponents, SymbolTable};
pub use jvm::{
    ClassDescriptor, JavaClass, JavaClassFinder, JavaDescriptorResolver, JvmComponents,
    ModuleClassResolver, SymbolFileFinder,
};

use crate::module::{
    ContentScope, DeclarationProvider, LanguageVersionSettings, MetadataPartProvider,
    ModuleDescriptor, PackagePartProvider,
};
use crate::platform::{CompositeServiceSet, TargetPlatform};
use std::fmt;
use std::sync::Arc;

/// Assembled component registry of one module
pub struct Container {
    descriptor: ModuleDescriptor,
    language_settings: LanguageVersionSettings,
    services: CompositeServiceSet,
    checkers: Vec<Checker>,
    extensions: Vec<PlatformExtension>,
    symbol_table: SymbolTable,
    trace: BindingTrace,
    scope: ContentScope,
    declaration_provider: Arc<dyn DeclarationProvider>,
    symbol_file_finder: SymbolFileFinder,
    package_parts: Arc<dyn PackagePartProvider>,
    metadata_parts: Arc<dyn MetadataPartProvider>,
    jvm: Option<JvmComponents>,
    common: Option<CommonComponents>,
}

impl Container {
    /// Module descriptor
    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    /// Effective platform
    pub fn platform(&self) -> &TargetPlatform {
        self.descriptor.platform()
    }

    /// Language settings
    pub fn language_settings(&self) -> &LanguageVersionSettings {
        &self.language_settings
    }

    /// Merged platform services
    pub fn services(&self) -> &CompositeServiceSet {
        &self.services
    }

    /// Registered checkers, in registration order
    pub fn checkers(&self) -> &[Checker] {
        &self.checkers
    }

    /// Number of registered checkers of `kind`
    pub fn checker_count(&self, kind: CheckerKind) -> usize {
        self.checkers.iter().filter(|c| c.kind == kind).count()
    }

    /// Registered extensions, one per kind
    pub fn extensions(&self) -> &[PlatformExtension] {
        &self.extensions
    }

    /// The extension of `kind`, if any platform provides one
    pub fn extension(&self, kind: ExtensionKind) -> Option<&PlatformExtension> {
        self.extensions.iter().find(|e| e.kind == kind)
    }

    /// Own-declaration symbol table
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    /// Diagnostics trace
    pub fn trace(&self) -> &BindingTrace {
        &self.trace
    }

    /// Module content scope
    pub fn scope(&self) -> &ContentScope {
        &self.scope
    }

    /// Declaration provider
    pub fn declaration_provider(&self) -> &Arc<dyn DeclarationProvider> {
        &self.declaration_provider
    }

    /// Class finder bound to the module scope
    pub fn symbol_file_finder(&self) -> &SymbolFileFinder {
        &self.symbol_file_finder
    }

    /// Package part provider
    pub fn package_parts(&self) -> &Arc<dyn PackagePartProvider> {
        &self.package_parts
    }

    /// Metadata part provider
    pub fn metadata_parts(&self) -> &Arc<dyn MetadataPartProvider> {
        &self.metadata_parts
    }

    /// JVM components, present when the platform includes JVM
    pub fn jvm(&self) -> Option<&JvmComponents> {
        self.jvm.as_ref()
    }

    /// Common components, present when the platform includes Common
    pub fn common(&self) -> Option<&CommonComponents> {
        self.common.as_ref()
    }

    /// Run every registered checker over the module's own declarations
    ///
    /// Findings are returned and also recorded in the trace.
    pub fn check_declarations(&self) -> Vec<Diagnostic> {
        let declarations = self.symbol_table.all_declarations();
        let ctx = CheckContext {
            platform: self.platform(),
            declarations: &declarations,
            common: self.common(),
        };

        let mut diagnostics = Vec::new();
        for decl in &declarations {
            for checker in &self.checkers {
                if let Some(diagnostic) = checker.check(decl, &ctx) {
                    self.trace.report(diagnostic.clone());
                    diagnostics.push(diagnostic);
                }
            }
        }

        tracing::debug!(
            module = %self.descriptor.info(),
            declarations = declarations.len(),
            diagnostics = diagnostics.len(),
            "checked declarations"
        );
        diagnostics
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("module", self.descriptor.info())
            .field("platform", self.platform())
            .field("checkers", &self.checkers.len())
            .field("extensions", &self.extensions.len())
            .field("jvm", &self.jvm.is_some())
            .field("common", &self.common.is_some())
            .finish()
    }
}
