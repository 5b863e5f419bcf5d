//! Shared collaborators for integration tests

#![allow(dead_code)]

use mosaic_engine::container::{JavaClass, JavaClassFinder};
use mosaic_engine::fragments::{JsMetadata, LibraryMetadataLoader, MetadataVersion};
use mosaic_engine::module::{
    ContentScope, MetadataPart, MetadataPartProvider, MetadataPartProviderFactory, ModuleContent,
    PackagePartProvider, PackagePartProviderFactory,
};
use mosaic_engine::{FqName, MetadataError, ModuleInfo};
use std::path::Path;
use std::sync::Arc;

/// Part providers with fixed content, available to every module
#[derive(Default, Clone)]
pub struct StaticParts {
    pub metadata: Vec<MetadataPart>,
    pub facades: Vec<(FqName, String)>,
}

impl PackagePartProvider for StaticParts {
    fn package_parts(&self, package: &FqName) -> Vec<String> {
        self.facades
            .iter()
            .filter(|(p, _)| p == package)
            .map(|(_, facade)| facade.clone())
            .collect()
    }
}

impl MetadataPartProvider for StaticParts {
    fn metadata_parts(&self, package: &FqName) -> Vec<MetadataPart> {
        self.metadata
            .iter()
            .filter(|part| part.package == *package)
            .cloned()
            .collect()
    }

    fn packages(&self) -> Vec<FqName> {
        self.metadata.iter().map(|part| part.package.clone()).collect()
    }
}

impl PackagePartProviderFactory for StaticParts {
    fn create(&self, _content: &ModuleContent) -> Option<Arc<dyn PackagePartProvider>> {
        Some(Arc::new(self.clone()))
    }
}

impl MetadataPartProviderFactory for StaticParts {
    fn create(&self, _content: &ModuleContent) -> Option<Arc<dyn MetadataPartProvider>> {
        Some(Arc::new(self.clone()))
    }
}

/// Class finder over a fixed class list, ignoring scopes
pub struct StaticClasses(pub Vec<JavaClass>);

impl JavaClassFinder for StaticClasses {
    fn find_class(&self, fq_name: &FqName, _scope: &ContentScope) -> Option<JavaClass> {
        self.0.iter().find(|class| class.fq_name == *fq_name).cloned()
    }

    fn classes_in(&self, package: &FqName, _scope: &ContentScope) -> Vec<JavaClass> {
        self.0
            .iter()
            .filter(|class| class.fq_name.parent() == *package)
            .cloned()
            .collect()
    }
}

/// Metadata loader returning the same artifacts for every root
pub struct StaticMetadata(pub Vec<JsMetadata>);

impl LibraryMetadataLoader for StaticMetadata {
    fn load(&self, _root: &Path) -> Result<Vec<JsMetadata>, MetadataError> {
        Ok(self.0.clone())
    }
}

/// A JS metadata artifact declaring one class `Name` in `package`
pub fn js_artifact(name: &str, version: MetadataVersion, package: &str, class: &str) -> JsMetadata {
    let body = format!(
        r#"{{"header": {{"module-name": "{name}"}}, "packages": [{{"package": "{package}", "declarations": [{{"name": "{class}", "kind": "class"}}]}}]}}"#
    );
    JsMetadata {
        name: name.to_string(),
        version,
        body: body.into_bytes(),
    }
}

/// Ownership by package prefix
pub fn owned_by_prefix(
    owners: Vec<(&'static str, ModuleInfo)>,
) -> impl Fn(&JavaClass) -> Option<ModuleInfo> + Send + Sync {
    move |class: &JavaClass| {
        owners
            .iter()
            .find(|(prefix, _)| class.fq_name.is_under(&FqName::new(*prefix)))
            .map(|(_, module)| module.clone())
    }
}
