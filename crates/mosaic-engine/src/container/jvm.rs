//! JVM-specific container components

use super::Container;
use crate::module::{ContentScope, ModuleInfo, PackagePartProvider};
use crate::platform::FqName;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// A Java-family class as seen by the class finder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JavaClass {
    /// Qualified name
    pub fq_name: FqName,
    /// Direct supertypes
    pub supertypes: Vec<FqName>,
}

impl JavaClass {
    /// Class without declared supertypes
    pub fn new(fq_name: impl Into<FqName>) -> Self {
        Self {
            fq_name: fq_name.into(),
            supertypes: Vec::new(),
        }
    }

    /// Add a supertype
    pub fn with_supertype(mut self, supertype: impl Into<FqName>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }
}

/// Raw class lookup, supplied by the embedding environment
pub trait JavaClassFinder: Send + Sync {
    /// Find a class visible in `scope`
    fn find_class(&self, fq_name: &FqName, scope: &ContentScope) -> Option<JavaClass>;

    /// Classes directly inside `package` visible in `scope`
    fn classes_in(&self, package: &FqName, scope: &ContentScope) -> Vec<JavaClass>;

    /// Check whether `package` has classes visible in `scope`
    fn has_package(&self, package: &FqName, scope: &ContentScope) -> bool {
        !self.classes_in(package, scope).is_empty()
    }
}

/// Class finder bound to one module's content scope
#[derive(Clone)]
pub struct SymbolFileFinder {
    scope: ContentScope,
    finder: Option<Arc<dyn JavaClassFinder>>,
}

impl SymbolFileFinder {
    /// Bind `finder` to `scope`; without a finder nothing is found
    pub fn new(scope: ContentScope, finder: Option<Arc<dyn JavaClassFinder>>) -> Self {
        Self { scope, finder }
    }

    /// Scope lookups are restricted to
    pub fn scope(&self) -> &ContentScope {
        &self.scope
    }

    /// Find a class
    pub fn find_class(&self, fq_name: &FqName) -> Option<JavaClass> {
        self.finder
            .as_ref()
            .and_then(|finder| finder.find_class(fq_name, &self.scope))
    }

    /// Classes in a package
    pub fn classes_in(&self, package: &FqName) -> Vec<JavaClass> {
        self.finder
            .as_ref()
            .map(|finder| finder.classes_in(package, &self.scope))
            .unwrap_or_default()
    }

    /// Check whether a package has classes
    pub fn has_package(&self, package: &FqName) -> bool {
        self.finder
            .as_ref()
            .is_some_and(|finder| finder.has_package(package, &self.scope))
    }
}

impl fmt::Debug for SymbolFileFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolFileFinder")
            .field("module", self.scope.module())
            .field("has_finder", &self.finder.is_some())
            .finish()
    }
}

/// Resolved class descriptor
///
/// Two resolutions of the same class by the same module compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassDescriptor {
    /// Qualified name
    pub fq_name: FqName,
    /// Module whose resolver produced the descriptor
    pub module: ModuleInfo,
    /// Direct supertypes
    pub supertypes: Vec<FqName>,
    /// Package part (facade) the class belongs to, if any
    pub package_part: Option<String>,
}

/// Maps a Java class to the descriptor of whichever module is authoritative
pub trait ModuleClassResolver: Send + Sync {
    /// Resolve `class`; `None` if no module can resolve it
    fn resolve_class(&self, class: &JavaClass) -> Option<ClassDescriptor>;
}

struct JavaWiring {
    module: ModuleInfo,
    package_parts: Arc<dyn PackagePartProvider>,
}

/// Produces this module's descriptors for Java classes
///
/// Needs the assembled container for its wiring, so it answers nothing
/// until the JVM initialization pass has run.
pub struct JavaDescriptorResolver {
    finder: SymbolFileFinder,
    wiring: OnceCell<JavaWiring>,
}

impl JavaDescriptorResolver {
    pub(crate) fn new(finder: SymbolFileFinder) -> Self {
        Self {
            finder,
            wiring: OnceCell::new(),
        }
    }

    /// Check whether the initialization pass has run
    pub fn is_initialized(&self) -> bool {
        self.wiring.get().is_some()
    }

    /// Class finder of the owning module
    pub fn finder(&self) -> &SymbolFileFinder {
        &self.finder
    }

    /// Descriptor for `class` as owned by this module
    pub fn resolve_class(&self, class: &JavaClass) -> Option<ClassDescriptor> {
        let wiring = self.wiring.get()?;
        let package_part = wiring
            .package_parts
            .package_parts(&class.fq_name.parent())
            .into_iter()
            .next();

        Some(ClassDescriptor {
            fq_name: class.fq_name.clone(),
            module: wiring.module.clone(),
            supertypes: class.supertypes.clone(),
            package_part,
        })
    }

    /// Returns false if the resolver was already bound; the first wiring is kept
    fn bind(&self, wiring: JavaWiring) -> bool {
        let module = wiring.module.clone();
        if self.wiring.set(wiring).is_err() {
            tracing::trace!(module = %module, "java descriptor resolver already bound");
            return false;
        }
        true
    }
}

impl fmt::Debug for JavaDescriptorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaDescriptorResolver")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Components registered when the platform includes JVM
#[derive(Clone)]
pub struct JvmComponents {
    descriptor_resolver: Arc<JavaDescriptorResolver>,
    module_class_resolver: Arc<dyn ModuleClassResolver>,
}

impl JvmComponents {
    pub(crate) fn new(
        finder: SymbolFileFinder,
        module_class_resolver: Arc<dyn ModuleClassResolver>,
    ) -> Self {
        Self {
            descriptor_resolver: Arc::new(JavaDescriptorResolver::new(finder)),
            module_class_resolver,
        }
    }

    /// This module's Java descriptor resolver
    pub fn descriptor_resolver(&self) -> &Arc<JavaDescriptorResolver> {
        &self.descriptor_resolver
    }

    /// Cross-module class resolver
    pub fn module_class_resolver(&self) -> &Arc<dyn ModuleClassResolver> {
        &self.module_class_resolver
    }

    /// Finish wiring against the assembled container
    pub(crate) fn initialize(&self, container: &Container) {
        // Initialization runs once per container
        self.descriptor_resolver.bind(JavaWiring {
            module: container.descriptor().info().clone(),
            package_parts: Arc::clone(container.package_parts()),
        });
        tracing::trace!(module = %container.descriptor().info(), "initialized JVM components");
    }
}

impl fmt::Debug for JvmComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JvmComponents")
            .field("descriptor_resolver", &self.descriptor_resolver)
            .finish_non_exhaustive()
    }
}
