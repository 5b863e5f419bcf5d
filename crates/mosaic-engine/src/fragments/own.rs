//! Own-module declarations

use super::{PackageFragmentProvider, ResolvedSymbol, SymbolSource};
use crate::container::Container;
use crate::module::Declaration;
use crate::platform::FqName;
use std::sync::Arc;

/// Symbols declared by the module itself, served from its lazy symbol table
pub struct ModuleFragmentProvider {
    container: Arc<Container>,
}

impl ModuleFragmentProvider {
    /// Provider over the container's symbol table
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    fn symbol(&self, decl: &Declaration) -> ResolvedSymbol {
        ResolvedSymbol::new(
            decl.fq_name.clone(),
            decl.kind,
            SymbolSource::Module,
            self.container.descriptor().info().name(),
        )
    }
}

impl PackageFragmentProvider for ModuleFragmentProvider {
    fn source(&self) -> SymbolSource {
        SymbolSource::Module
    }

    fn describe(&self) -> String {
        format!("module {}", self.container.descriptor().stable_name())
    }

    fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol> {
        self.container
            .symbol_table()
            .find(fq_name)
            .map(|decl| self.symbol(decl))
    }

    fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol> {
        self.container
            .symbol_table()
            .declarations_in(package)
            .iter()
            .map(|decl| self.symbol(decl))
            .collect()
    }

    fn package_exists(&self, package: &FqName) -> bool {
        self.container.symbol_table().package_exists(package)
    }
}
