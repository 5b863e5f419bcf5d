//! Common metadata of compiled dependencies

use super::{PackageFragmentProvider, ResolvedSymbol, SymbolSource};
use crate::module::MetadataPartProvider;
use crate::platform::FqName;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Symbols read from common metadata parts
pub struct CommonMetadataFragmentProvider {
    parts: Arc<dyn MetadataPartProvider>,
    packages: OnceCell<FxHashSet<FqName>>,
}

impl CommonMetadataFragmentProvider {
    /// Provider over `parts`
    pub fn new(parts: Arc<dyn MetadataPartProvider>) -> Self {
        Self {
            parts,
            packages: OnceCell::new(),
        }
    }

    fn packages(&self) -> &FxHashSet<FqName> {
        self.packages.get_or_init(|| {
            let mut packages = FxHashSet::default();
            for package in self.parts.packages() {
                let mut current = package;
                while !current.is_root() {
                    let parent = current.parent();
                    packages.insert(current);
                    current = parent;
                }
            }
            packages
        })
    }
}

impl PackageFragmentProvider for CommonMetadataFragmentProvider {
    fn source(&self) -> SymbolSource {
        SymbolSource::CommonMetadata
    }

    fn describe(&self) -> String {
        "common metadata".to_string()
    }

    fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol> {
        self.parts
            .metadata_parts(&fq_name.parent())
            .into_iter()
            .find_map(|part| {
                part.declarations
                    .iter()
                    .find(|decl| decl.fq_name == *fq_name)
                    .map(|decl| {
                        ResolvedSymbol::new(
                            decl.fq_name.clone(),
                            decl.kind,
                            SymbolSource::CommonMetadata,
                            part.origin.clone(),
                        )
                    })
            })
    }

    fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol> {
        self.parts
            .metadata_parts(package)
            .into_iter()
            .flat_map(|part| {
                let origin = part.origin;
                part.declarations.into_iter().map(move |decl| {
                    ResolvedSymbol::new(
                        decl.fq_name,
                        decl.kind,
                        SymbolSource::CommonMetadata,
                        origin.clone(),
                    )
                })
            })
            .collect()
    }

    fn package_exists(&self, package: &FqName) -> bool {
        package.is_root() || self.packages().contains(package)
    }
}
