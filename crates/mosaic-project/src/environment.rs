//! Manifest-backed collaborators
//!
//! Everything the engine asks the embedding environment for is answered
//! from the manifest:
//! - package parts are file facades of the module and its dependencies
//! - metadata parts are the `metadata` packages of dependencies
//! - Java classes are owned by the module that lists them
//! - native fragments serve dependency metadata to `native = true` modules

use mosaic_engine::container::{JavaClass, JavaClassFinder};
use mosaic_engine::fragments::{NativeFragmentHook, PackageFragmentProvider};
use mosaic_engine::module::{
    ContentScope, MetadataPart, MetadataPartProvider, MetadataPartProviderFactory,
    ModuleDescriptor, PackagePartProvider, PackagePartProviderFactory,
};
use mosaic_engine::resolve::ModuleOwnership;
use mosaic_engine::{
    FqName, LanguageVersionSettings, ModuleContent, ModuleInfo, ResolvedSymbol, SymbolSource,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Compiled view of one manifest module
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// Module identity
    pub info: ModuleInfo,
    /// Package facades: package and part name
    pub facades: Vec<(FqName, String)>,
    /// Published common metadata
    pub metadata: Vec<MetadataPart>,
    /// Owned Java classes
    pub classes: Vec<JavaClass>,
    /// Native tooling enabled
    pub native: bool,
    /// Direct dependencies
    pub dependencies: Vec<ModuleInfo>,
}

/// Facade class name of a source file: `Greeter.kt` in `demo` is `demo/GreeterKt`
pub fn facade_name(package: &FqName, file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let mut chars = stem.chars();
    let class = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + "Kt",
        None => "Kt".to_string(),
    };
    if package.is_root() {
        class
    } else {
        format!("{}/{}", package.as_str().replace('.', "/"), class)
    }
}

/// Records of every module, shared by all collaborators
#[derive(Debug, Clone, Default)]
pub struct ManifestModules {
    records: Arc<Vec<ModuleRecord>>,
}

impl ManifestModules {
    /// Wrap compiled records
    pub fn new(records: Vec<ModuleRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// All records in manifest order
    pub fn records(&self) -> &[ModuleRecord] {
        &self.records
    }

    /// Record of `module`
    pub fn record(&self, module: &ModuleInfo) -> Option<&ModuleRecord> {
        self.records.iter().find(|record| record.info == *module)
    }

    fn visible<'a>(
        &'a self,
        scope: &'a ContentScope,
    ) -> impl Iterator<Item = &'a ModuleRecord> + 'a {
        self.records.iter().filter(move |record| scope.contains(&record.info))
    }

    fn dependency_metadata(&self, module: &ModuleInfo) -> Vec<MetadataPart> {
        let Some(record) = self.record(module) else {
            return Vec::new();
        };
        record
            .dependencies
            .iter()
            .filter_map(|dep| self.record(dep))
            .flat_map(|dep| dep.metadata.iter().cloned())
            .collect()
    }
}

/// Part provider over a fixed set of parts
#[derive(Debug, Clone, Default)]
pub struct ScopedParts {
    facades: Vec<(FqName, String)>,
    metadata: Vec<MetadataPart>,
}

impl PackagePartProvider for ScopedParts {
    fn package_parts(&self, package: &FqName) -> Vec<String> {
        self.facades
            .iter()
            .filter(|(p, _)| p == package)
            .map(|(_, facade)| facade.clone())
            .collect()
    }
}

impl MetadataPartProvider for ScopedParts {
    fn metadata_parts(&self, package: &FqName) -> Vec<MetadataPart> {
        self.metadata
            .iter()
            .filter(|part| part.package == *package)
            .cloned()
            .collect()
    }

    fn packages(&self) -> Vec<FqName> {
        let mut packages: Vec<FqName> =
            self.metadata.iter().map(|part| part.package.clone()).collect();
        packages.sort();
        packages.dedup();
        packages
    }
}

impl PackagePartProviderFactory for ManifestModules {
    fn create(&self, content: &ModuleContent) -> Option<Arc<dyn PackagePartProvider>> {
        let facades = self
            .visible(&content.scope)
            .flat_map(|record| record.facades.iter().cloned())
            .collect();
        Some(Arc::new(ScopedParts {
            facades,
            metadata: Vec::new(),
        }))
    }
}

impl MetadataPartProviderFactory for ManifestModules {
    fn create(&self, content: &ModuleContent) -> Option<Arc<dyn MetadataPartProvider>> {
        Some(Arc::new(ScopedParts {
            facades: Vec::new(),
            metadata: self.dependency_metadata(&content.info),
        }))
    }
}

impl JavaClassFinder for ManifestModules {
    fn find_class(&self, fq_name: &FqName, scope: &ContentScope) -> Option<JavaClass> {
        self.visible(scope)
            .flat_map(|record| record.classes.iter())
            .find(|class| class.fq_name == *fq_name)
            .cloned()
    }

    fn classes_in(&self, package: &FqName, scope: &ContentScope) -> Vec<JavaClass> {
        self.visible(scope)
            .flat_map(|record| record.classes.iter())
            .filter(|class| class.fq_name.parent() == *package)
            .cloned()
            .collect()
    }
}

impl ModuleOwnership for ManifestModules {
    fn module_of(&self, class: &JavaClass) -> Option<ModuleInfo> {
        self.records
            .iter()
            .find(|record| record.classes.iter().any(|c| c.fq_name == class.fq_name))
            .map(|record| record.info.clone())
    }
}

impl NativeFragmentHook for ManifestModules {
    fn create(
        &self,
        module: &ModuleInfo,
        _settings: &LanguageVersionSettings,
        _descriptor: &ModuleDescriptor,
    ) -> Option<Arc<dyn PackageFragmentProvider>> {
        if !self.record(module)?.native {
            return None;
        }
        Some(Arc::new(NativeLibraryFragmentProvider::new(
            module.name(),
            self.dependency_metadata(module),
        )))
    }
}

/// Native library symbols of one module
pub struct NativeLibraryFragmentProvider {
    module: String,
    parts: Vec<MetadataPart>,
    packages: FxHashSet<FqName>,
}

impl NativeLibraryFragmentProvider {
    /// Provider serving `parts` to `module`
    pub fn new(module: impl Into<String>, parts: Vec<MetadataPart>) -> Self {
        let mut packages = FxHashSet::default();
        for part in &parts {
            let mut current = part.package.clone();
            while !current.is_root() {
                let parent = current.parent();
                packages.insert(current);
                current = parent;
            }
        }
        Self {
            module: module.into(),
            parts,
            packages,
        }
    }

    fn symbols<'a>(&'a self, package: &'a FqName) -> impl Iterator<Item = ResolvedSymbol> + 'a {
        self.parts
            .iter()
            .filter(move |part| part.package == *package)
            .flat_map(|part| {
                part.declarations.iter().map(move |decl| {
                    ResolvedSymbol::new(
                        decl.fq_name.clone(),
                        decl.kind,
                        SymbolSource::Native,
                        part.origin.clone(),
                    )
                })
            })
    }
}

impl PackageFragmentProvider for NativeLibraryFragmentProvider {
    fn source(&self) -> SymbolSource {
        SymbolSource::Native
    }

    fn describe(&self) -> String {
        format!("native libraries of {}", self.module)
    }

    fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol> {
        let package = fq_name.parent();
        let found = self.symbols(&package).find(|symbol| symbol.fq_name == *fq_name);
        found
    }

    fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol> {
        self.symbols(package).collect()
    }

    fn package_exists(&self, package: &FqName) -> bool {
        package.is_root() || self.packages.contains(package)
    }
}
