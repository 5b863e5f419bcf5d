//! Java classes

use super::{PackageFragmentProvider, ResolvedSymbol, SymbolSource};
use crate::container::{JavaClass, JvmComponents, ModuleClassResolver, SymbolFileFinder};
use crate::module::DeclarationKind;
use crate::platform::FqName;
use std::sync::Arc;

/// Java classes visible to the module, resolved through the module class
/// resolver so that each class gets the descriptor of its owning module
pub struct JavaFragmentProvider {
    finder: SymbolFileFinder,
    class_resolver: Arc<dyn ModuleClassResolver>,
}

impl JavaFragmentProvider {
    /// Provider over a module's JVM components
    pub fn new(jvm: &JvmComponents) -> Self {
        Self {
            finder: jvm.descriptor_resolver().finder().clone(),
            class_resolver: Arc::clone(jvm.module_class_resolver()),
        }
    }

    fn symbol(&self, class: &JavaClass) -> Option<ResolvedSymbol> {
        let descriptor = self.class_resolver.resolve_class(class)?;
        Some(ResolvedSymbol {
            fq_name: class.fq_name.clone(),
            kind: DeclarationKind::Class,
            source: SymbolSource::Jvm,
            origin: descriptor.module.name().to_string(),
            class: Some(descriptor),
        })
    }
}

impl PackageFragmentProvider for JavaFragmentProvider {
    fn source(&self) -> SymbolSource {
        SymbolSource::Jvm
    }

    fn describe(&self) -> String {
        format!("java classes of {}", self.finder.scope().module())
    }

    fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol> {
        let class = self.finder.find_class(fq_name)?;
        self.symbol(&class)
    }

    fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol> {
        self.finder
            .classes_in(package)
            .iter()
            .filter_map(|class| self.symbol(class))
            .collect()
    }

    fn package_exists(&self, package: &FqName) -> bool {
        self.finder.has_package(package)
    }
}
