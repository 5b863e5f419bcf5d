//! Package fragment providers
//!
//! Each provider answers "what exists under this name" for one symbol
//! source. The [`FragmentProviderComposer`] orders the providers of a module
//! and the [`CompositePackageFragmentProvider`] queries them in that order.

mod composer;
mod js;
mod jvm;
mod metadata;
mod own;

pub use composer::{FragmentProviderComposer, NativeFragmentHook};
pub use js::{
    JsFragmentProvider, JsHeader, JsMetadata, JsPackagePayload, LibraryMetadataLoader,
    MetadataVersion,
};
pub use jvm::JavaFragmentProvider;
pub use metadata::CommonMetadataFragmentProvider;
pub use own::ModuleFragmentProvider;

use crate::container::ClassDescriptor;
use crate::module::DeclarationKind;
use crate::platform::FqName;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Where a symbol came from, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolSource {
    /// The module's own declarations
    Module,
    /// Common metadata of dependencies
    CommonMetadata,
    /// JS library metadata
    JsMetadata,
    /// Java classes
    Jvm,
    /// Native platform libraries
    Native,
}

impl fmt::Display for SymbolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolSource::Module => "module",
            SymbolSource::CommonMetadata => "common-metadata",
            SymbolSource::JsMetadata => "js-metadata",
            SymbolSource::Jvm => "jvm",
            SymbolSource::Native => "native",
        };
        write!(f, "{}", name)
    }
}

/// A symbol found through a fragment provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    /// Qualified name
    pub fq_name: FqName,
    /// Declaration kind
    pub kind: DeclarationKind,
    /// Source that answered
    pub source: SymbolSource,
    /// Module, library or artifact the symbol belongs to
    pub origin: String,
    /// Class descriptor, for Java classes
    pub class: Option<ClassDescriptor>,
}

impl ResolvedSymbol {
    /// Symbol without a class descriptor
    pub fn new(
        fq_name: FqName,
        kind: DeclarationKind,
        source: SymbolSource,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            fq_name,
            kind,
            source,
            origin: origin.into(),
            class: None,
        }
    }
}

/// A symbol source
pub trait PackageFragmentProvider: Send + Sync {
    /// Source kind
    fn source(&self) -> SymbolSource;

    /// Short human-readable description
    fn describe(&self) -> String;

    /// Find a top-level symbol by qualified name
    fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol>;

    /// Symbols directly inside `package`
    fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol>;

    /// Check whether `package` exists in this source
    fn package_exists(&self, package: &FqName) -> bool;
}

/// Providers queried in precedence order
///
/// A lookup returns the first provider's hit; later providers are only
/// consulted on a miss.
#[derive(Clone, Default)]
pub struct CompositePackageFragmentProvider {
    providers: Vec<Arc<dyn PackageFragmentProvider>>,
}

impl CompositePackageFragmentProvider {
    /// Compose `providers`, highest precedence first
    pub fn new(providers: Vec<Arc<dyn PackageFragmentProvider>>) -> Self {
        Self { providers }
    }

    /// Constituent providers
    pub fn providers(&self) -> &[Arc<dyn PackageFragmentProvider>] {
        &self.providers
    }

    /// Source of each constituent, in order
    pub fn sources(&self) -> Vec<SymbolSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Number of constituents
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if there are no constituents
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// First hit in precedence order
    pub fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol> {
        let found = self.providers.iter().find_map(|p| p.find(fq_name));
        tracing::trace!(
            name = %fq_name,
            source = ?found.as_ref().map(|s| s.source),
            "composite lookup"
        );
        found
    }

    /// Symbols of `package` from every source; shadowed names are dropped
    pub fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol> {
        let mut seen = FxHashSet::default();
        let mut symbols = Vec::new();
        for provider in &self.providers {
            for symbol in provider.declarations_in(package) {
                if seen.insert(symbol.fq_name.clone()) {
                    symbols.push(symbol);
                }
            }
        }
        symbols
    }

    /// Check whether any source has `package`
    pub fn package_exists(&self, package: &FqName) -> bool {
        self.providers.iter().any(|p| p.package_exists(package))
    }
}

impl fmt::Debug for CompositePackageFragmentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.describe()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        source: SymbolSource,
        names: Vec<&'static str>,
    }

    impl PackageFragmentProvider for Fixed {
        fn source(&self) -> SymbolSource {
            self.source
        }

        fn describe(&self) -> String {
            format!("fixed {}", self.source)
        }

        fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol> {
            self.names
                .iter()
                .any(|name| *name == fq_name.as_str())
                .then(|| {
                    let kind = DeclarationKind::Class;
                    ResolvedSymbol::new(fq_name.clone(), kind, self.source, "test")
                })
        }

        fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol> {
            self.names
                .iter()
                .map(|name| FqName::new(*name))
                .filter(|name| name.parent() == *package)
                .map(|name| ResolvedSymbol::new(name, DeclarationKind::Class, self.source, "test"))
                .collect()
        }

        fn package_exists(&self, package: &FqName) -> bool {
            self.names.iter().any(|name| FqName::new(*name).is_under(package))
        }
    }

    fn composite() -> CompositePackageFragmentProvider {
        CompositePackageFragmentProvider::new(vec![
            Arc::new(Fixed {
                source: SymbolSource::Module,
                names: vec!["demo.A"],
            }),
            Arc::new(Fixed {
                source: SymbolSource::Jvm,
                names: vec!["demo.A", "demo.B", "java.util.List"],
            }),
        ])
    }

    #[test]
    fn test_first_hit_wins() {
        let composite = composite();
        assert_eq!(
            composite.find(&FqName::new("demo.A")).unwrap().source,
            SymbolSource::Module
        );
        assert_eq!(
            composite.find(&FqName::new("demo.B")).unwrap().source,
            SymbolSource::Jvm
        );
        assert!(composite.find(&FqName::new("demo.C")).is_none());
    }

    #[test]
    fn test_declarations_in_drops_shadowed() {
        let symbols = composite().declarations_in(&FqName::new("demo"));
        let sources: Vec<(String, SymbolSource)> = symbols
            .iter()
            .map(|s| (s.fq_name.to_string(), s.source))
            .collect();
        assert_eq!(
            sources,
            vec![
                ("demo.A".to_string(), SymbolSource::Module),
                ("demo.B".to_string(), SymbolSource::Jvm),
            ]
        );
    }

    #[test]
    fn test_package_exists() {
        let composite = composite();
        assert!(composite.package_exists(&FqName::new("java")));
        assert!(!composite.package_exists(&FqName::new("kotlinx")));
        assert_eq!(composite.sources(), vec![SymbolSource::Module, SymbolSource::Jvm]);
    }
}
