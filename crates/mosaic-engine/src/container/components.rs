//! Generic module-resolution components
//!
//! Registered for every module regardless of platform.

use super::checkers::Diagnostic;
use crate::module::{Declaration, DeclarationProvider, MetadataPartProvider};
use crate::platform::FqName;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

struct SymbolIndex {
    by_name: FxHashMap<FqName, Declaration>,
    by_package: FxHashMap<FqName, Vec<Declaration>>,
    packages: FxHashSet<FqName>,
}

/// Lazily built index over a module's own declarations
///
/// The index is computed on first query and shared afterwards.
pub struct SymbolTable {
    provider: Arc<dyn DeclarationProvider>,
    index: OnceCell<SymbolIndex>,
}

impl SymbolTable {
    /// Create a table over `provider`
    pub fn new(provider: Arc<dyn DeclarationProvider>) -> Self {
        Self {
            provider,
            index: OnceCell::new(),
        }
    }

    fn index(&self) -> &SymbolIndex {
        self.index.get_or_init(|| {
            let mut by_name = FxHashMap::default();
            let mut by_package: FxHashMap<FqName, Vec<Declaration>> = FxHashMap::default();
            let mut packages = FxHashSet::default();

            for package in self.provider.packages() {
                // Every enclosing package exists too
                let mut current = package.clone();
                while !current.is_root() {
                    packages.insert(current.clone());
                    current = current.parent();
                }
                packages.insert(FqName::root());

                for decl in self.provider.declarations_in(&package) {
                    // First declaration of a name wins
                    by_name.entry(decl.fq_name.clone()).or_insert_with(|| decl.clone());
                    by_package.entry(package.clone()).or_default().push(decl);
                }
            }

            tracing::trace!(declarations = by_name.len(), "indexed module declarations");
            SymbolIndex {
                by_name,
                by_package,
                packages,
            }
        })
    }

    /// Check whether the index has been built
    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }

    /// Find a declaration by qualified name
    pub fn find(&self, fq_name: &FqName) -> Option<&Declaration> {
        self.index().by_name.get(fq_name)
    }

    /// Declarations directly inside `package`
    pub fn declarations_in(&self, package: &FqName) -> &[Declaration] {
        self.index()
            .by_package
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether `package` or any subpackage has declarations
    pub fn package_exists(&self, package: &FqName) -> bool {
        self.index().packages.contains(package)
    }

    /// Every declaration, ordered by qualified name
    pub fn all_declarations(&self) -> Vec<Declaration> {
        let mut decls: Vec<Declaration> = self.index().by_name.values().cloned().collect();
        decls.sort_by(|a, b| a.fq_name.cmp(&b.fq_name));
        decls
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("indexed", &self.is_indexed())
            .finish()
    }
}

/// Diagnostics recorded while analyzing a module
#[derive(Debug, Default)]
pub struct BindingTrace {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl BindingTrace {
    /// Record a diagnostic
    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    /// Snapshot of recorded diagnostics
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop recorded diagnostics
    pub fn clear(&self) {
        self.diagnostics.lock().clear();
    }
}

/// Components registered when the platform includes Common
pub struct CommonComponents {
    symbols: Arc<dyn DeclarationProvider>,
    metadata_parts: Arc<dyn MetadataPartProvider>,
}

impl CommonComponents {
    pub(crate) fn new(
        symbols: Arc<dyn DeclarationProvider>,
        metadata_parts: Arc<dyn MetadataPartProvider>,
    ) -> Self {
        Self {
            symbols,
            metadata_parts,
        }
    }

    /// Find the `expect` declaration an `actual` named `fq_name` implements
    ///
    /// Looks in the module's own declarations first, then in common
    /// metadata of its dependencies.
    pub fn find_expected(&self, fq_name: &FqName) -> Option<Declaration> {
        if let Some(own) = self.symbols.find(fq_name).filter(|decl| decl.is_expect) {
            return Some(own);
        }

        self.metadata_parts
            .metadata_parts(&fq_name.parent())
            .into_iter()
            .flat_map(|part| part.declarations)
            .find(|decl| decl.is_expect && decl.fq_name == *fq_name)
    }

    /// Common metadata of the module's dependencies
    pub fn metadata_parts(&self) -> &Arc<dyn MetadataPartProvider> {
        &self.metadata_parts
    }
}

impl fmt::Debug for CommonComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonComponents").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::checkers::{CheckerKind, Severity};
    use crate::module::{DeclarationKind, FileBasedDeclarationProvider, MetadataPart, SyntheticFile};

    struct StaticMetadata(Vec<MetadataPart>);

    impl MetadataPartProvider for StaticMetadata {
        fn metadata_parts(&self, package: &FqName) -> Vec<MetadataPart> {
            self.0
                .iter()
                .filter(|part| part.package == *package)
                .cloned()
                .collect()
        }

        fn packages(&self) -> Vec<FqName> {
            self.0.iter().map(|part| part.package.clone()).collect()
        }
    }

    fn provider() -> Arc<dyn DeclarationProvider> {
        Arc::new(FileBasedDeclarationProvider::new(&[SyntheticFile::new(
            "Clock.kt",
            "demo.time",
            vec![
                Declaration::expect("Clock", DeclarationKind::Class),
                Declaration::new("now", DeclarationKind::Function),
            ],
        )]))
    }

    #[test]
    fn test_symbol_table_is_lazy() {
        let table = SymbolTable::new(provider());
        assert!(!table.is_indexed());

        assert!(table.find(&FqName::new("demo.time.now")).is_some());
        assert!(table.is_indexed());
        assert_eq!(table.declarations_in(&FqName::new("demo.time")).len(), 2);
        assert!(table.declarations_in(&FqName::new("demo")).is_empty());
    }

    #[test]
    fn test_enclosing_packages_exist() {
        let table = SymbolTable::new(provider());
        assert!(table.package_exists(&FqName::new("demo")));
        assert!(table.package_exists(&FqName::new("demo.time")));
        assert!(!table.package_exists(&FqName::new("demo.other")));
    }

    #[test]
    fn test_binding_trace() {
        let trace = BindingTrace::default();
        assert!(trace.is_empty());
        trace.report(Diagnostic {
            checker: CheckerKind::JvmName,
            severity: Severity::Error,
            fq_name: FqName::new("a.b"),
            message: "bad".to_string(),
        });
        assert_eq!(trace.len(), 1);
        trace.clear();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_find_expected_in_metadata() {
        let metadata = StaticMetadata(vec![MetadataPart {
            package: FqName::new("lib"),
            declarations: vec![Declaration::expect("lib.Random", DeclarationKind::Class)],
            origin: "lib-common".to_string(),
        }]);
        let common = CommonComponents::new(provider(), Arc::new(metadata));

        assert!(common.find_expected(&FqName::new("demo.time.Clock")).is_some());
        assert!(common.find_expected(&FqName::new("lib.Random")).is_some());
        assert!(common.find_expected(&FqName::new("demo.time.now")).is_none());
    }
}
