//! Fragment provider composition

use super::js::{JsFragmentProvider, JsPackagePayload, LibraryMetadataLoader};
use super::jvm::JavaFragmentProvider;
use super::metadata::CommonMetadataFragmentProvider;
use super::own::ModuleFragmentProvider;
use super::{CompositePackageFragmentProvider, PackageFragmentProvider};
use crate::container::Container;
use crate::error::MetadataError;
use crate::module::{LanguageVersionSettings, ModuleDescriptor, ModuleInfo};
use std::sync::Arc;

/// Supplies the native platform's fragment provider for a module
///
/// Returning `None` means native tooling has nothing for this module.
pub trait NativeFragmentHook: Send + Sync {
    /// Provider for `module`, if one exists
    fn create(
        &self,
        module: &ModuleInfo,
        settings: &LanguageVersionSettings,
        descriptor: &ModuleDescriptor,
    ) -> Option<Arc<dyn PackageFragmentProvider>>;
}

/// Builds a module's ordered symbol surface from its container
///
/// Precedence is fixed: own declarations, common metadata, JS metadata,
/// Java classes, native libraries. Providers are created eagerly but index
/// their content on first query.
pub struct FragmentProviderComposer {
    container: Arc<Container>,
    metadata_loader: Option<Arc<dyn LibraryMetadataLoader>>,
    native_hook: Option<Arc<dyn NativeFragmentHook>>,
}

impl FragmentProviderComposer {
    /// Composer for the module `container` was built for
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            container,
            metadata_loader: None,
            native_hook: None,
        }
    }

    /// Loader for JS library roots
    pub fn with_metadata_loader(mut self, loader: Option<Arc<dyn LibraryMetadataLoader>>) -> Self {
        self.metadata_loader = loader;
        self
    }

    /// Native fragment hook
    pub fn with_native_hook(mut self, hook: Option<Arc<dyn NativeFragmentHook>>) -> Self {
        self.native_hook = hook;
        self
    }

    /// Compose the providers
    ///
    /// Fails only if a library root cannot be read or a compatible artifact
    /// cannot be decoded. Incompatible artifacts are skipped.
    pub fn compose(&self) -> Result<CompositePackageFragmentProvider, MetadataError> {
        let container = &self.container;
        let platform = container.platform();
        let module = container.descriptor().info();
        let mut providers: Vec<Arc<dyn PackageFragmentProvider>> = Vec::new();

        providers.push(Arc::new(ModuleFragmentProvider::new(Arc::clone(container))));

        if platform.is_common() {
            providers.push(Arc::new(CommonMetadataFragmentProvider::new(Arc::clone(
                container.metadata_parts(),
            ))));
        }

        if module.is_library() && platform.is_js() {
            providers.extend(self.js_providers(module)?);
        }

        if let Some(jvm) = container.jvm() {
            providers.push(Arc::new(JavaFragmentProvider::new(jvm)));
        }

        if platform.has_native() {
            let native = self.native_hook.as_ref().and_then(|hook| {
                hook.create(module, container.language_settings(), container.descriptor())
            });
            match native {
                Some(provider) => providers.push(provider),
                None => tracing::debug!(module = %module, "no native fragment provider"),
            }
        }

        let composite = CompositePackageFragmentProvider::new(providers);
        tracing::debug!(module = %module, providers = ?composite, "composed fragment providers");
        Ok(composite)
    }

    fn js_providers(
        &self,
        module: &ModuleInfo,
    ) -> Result<Vec<Arc<dyn PackageFragmentProvider>>, MetadataError> {
        let Some(loader) = &self.metadata_loader else {
            tracing::debug!(module = %module, "no library metadata loader, skipping JS metadata");
            return Ok(Vec::new());
        };

        let mut providers: Vec<Arc<dyn PackageFragmentProvider>> = Vec::new();
        for root in module.library_roots() {
            for metadata in loader.load(root)? {
                if !metadata.version.is_compatible() {
                    tracing::debug!(
                        artifact = %metadata.name,
                        version = %metadata.version,
                        "skipping incompatible JS metadata"
                    );
                    continue;
                }
                let payload = JsPackagePayload::decode(&metadata)?;
                providers.push(Arc::new(JsFragmentProvider::new(payload, metadata.name)));
            }
        }
        Ok(providers)
    }
}
