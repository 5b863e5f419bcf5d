//! Loading a project from its manifest

use crate::environment::{facade_name, ManifestModules, ModuleRecord};
use crate::jsmeta::JsMetaFileLoader;
use crate::manifest::{ManifestError, ModuleEntry, ProjectManifest, MANIFEST_FILE};
use mosaic_engine::container::JavaClass;
use mosaic_engine::module::{MetadataPart, SyntheticFile};
use mosaic_engine::{
    FileBasedDeclarationProviderFactory, FqName, LanguageVersionSettings, ModuleContent,
    ModuleInfo, ModuleKind, ProjectEnvironment, ResolveError, ResolverForProject,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when loading or querying a project
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Manifest could not be read or is invalid
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// No manifest in the directory or any parent
    #[error("Could not find mosaic.toml in {0} or any parent directory")]
    ManifestNotFound(PathBuf),

    /// A module named on the command line or in a query does not exist
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// Module resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A loaded project: its manifest and the resolver built from it
pub struct Project {
    manifest: ProjectManifest,
    root: PathBuf,
    modules: ManifestModules,
    resolver: Arc<ResolverForProject>,
}

impl Project {
    /// Load the project whose manifest is at `path`
    ///
    /// `path` may be the manifest itself or the directory containing it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let manifest_path = if path.is_dir() {
            path.join(MANIFEST_FILE)
        } else {
            path.to_path_buf()
        };
        let manifest = ProjectManifest::from_file(&manifest_path)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::from_manifest(manifest, root)
    }

    /// Find `mosaic.toml` in `start` or its ancestors and load it
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let start = start.as_ref();
        let manifest_path = find_manifest(start)
            .ok_or_else(|| ProjectError::ManifestNotFound(start.to_path_buf()))?;
        Self::load(manifest_path)
    }

    /// Build a project from a parsed manifest; roots resolve against `root`
    pub fn from_manifest(manifest: ProjectManifest, root: PathBuf) -> Result<Self, ProjectError> {
        let settings =
            LanguageVersionSettings::new(manifest.language_version()?, manifest.api_version()?);
        let default_platform = manifest.default_platform()?;

        let infos = manifest
            .modules
            .iter()
            .map(|entry| Ok((entry.name.as_str(), module_info(entry, &root)?)))
            .collect::<Result<HashMap<&str, ModuleInfo>, ManifestError>>()?;

        let mut contents = Vec::with_capacity(manifest.modules.len());
        let mut records = Vec::with_capacity(manifest.modules.len());
        for entry in &manifest.modules {
            let Some(info) = infos.get(entry.name.as_str()).cloned() else {
                continue;
            };
            let dependencies: Vec<ModuleInfo> = entry
                .dependencies
                .iter()
                .filter_map(|dep| infos.get(dep.as_str()).cloned())
                .collect();
            let files = synthetic_files(entry);

            records.push(ModuleRecord {
                info: info.clone(),
                facades: files
                    .iter()
                    .map(|file| (file.package.clone(), facade_name(&file.package, &file.name)))
                    .collect(),
                metadata: metadata_parts(entry),
                classes: java_classes(entry),
                native: entry.native,
                dependencies: dependencies.clone(),
            });
            contents.push(ModuleContent::new(info, files, dependencies));
        }

        let modules = ManifestModules::new(records);
        let environment = ProjectEnvironment::new(
            Arc::new(FileBasedDeclarationProviderFactory),
            Arc::new(modules.clone()),
            Arc::new(modules.clone()),
            Arc::new(modules.clone()),
        )
        .with_java_classes(Arc::new(modules.clone()))
        .with_library_metadata(Arc::new(JsMetaFileLoader::new()))
        .with_native_fragments(Arc::new(modules.clone()));

        let resolver = ResolverForProject::new(
            manifest.project.name.clone(),
            contents,
            settings,
            default_platform,
            environment,
        );
        tracing::debug!(
            project = %manifest.project.name,
            modules = manifest.modules.len(),
            "loaded project"
        );

        Ok(Self {
            manifest,
            root,
            modules,
            resolver,
        })
    }

    /// Parsed manifest
    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    /// Directory the manifest lives in
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project resolver
    pub fn resolver(&self) -> &Arc<ResolverForProject> {
        &self.resolver
    }

    /// Compiled module records
    pub fn modules(&self) -> &ManifestModules {
        &self.modules
    }

    /// Find a module by name
    pub fn module(&self, name: &str) -> Result<&ModuleInfo, ProjectError> {
        self.resolver
            .module(name)
            .ok_or_else(|| ProjectError::UnknownModule(name.to_string()))
    }

    /// Modules named in `names`, or every module when `names` is empty
    pub fn select_modules(&self, names: &[String]) -> Result<Vec<ModuleInfo>, ProjectError> {
        if names.is_empty() {
            return Ok(self.resolver.modules().to_vec());
        }
        names
            .iter()
            .map(|name| self.module(name).cloned())
            .collect()
    }
}

/// Find the nearest `mosaic.toml` at or above `start`
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE))
        .find(|candidate| candidate.is_file())
}

fn module_info(entry: &ModuleEntry, root: &Path) -> Result<ModuleInfo, ManifestError> {
    let kind = if entry.is_library() {
        ModuleKind::Library {
            roots: entry.roots.iter().map(|r| root.join(r)).collect(),
        }
    } else {
        ModuleKind::Source
    };
    Ok(ModuleInfo::new(entry.name.clone(), entry.target_platform()?, kind))
}

fn synthetic_files(entry: &ModuleEntry) -> Vec<SyntheticFile> {
    entry
        .files
        .iter()
        .map(|file| {
            // SyntheticFile qualifies the names itself
            let declarations = file
                .declarations
                .iter()
                .map(|decl| decl.to_declaration(&FqName::root()))
                .collect();
            SyntheticFile::new(file.name.clone(), FqName::new(file.package.clone()), declarations)
        })
        .collect()
}

fn metadata_parts(entry: &ModuleEntry) -> Vec<MetadataPart> {
    entry
        .metadata
        .iter()
        .map(|meta| {
            let package = FqName::new(meta.package.clone());
            MetadataPart {
                declarations: meta
                    .declarations
                    .iter()
                    .map(|decl| decl.to_declaration(&package))
                    .collect(),
                package,
                origin: entry.name.clone(),
            }
        })
        .collect()
}

fn java_classes(entry: &ModuleEntry) -> Vec<JavaClass> {
    entry
        .java_classes
        .iter()
        .map(|class| {
            class
                .supertypes
                .iter()
                .fold(JavaClass::new(FqName::new(class.name.clone())), |class, supertype| {
                    class.with_supertype(FqName::new(supertype.clone()))
                })
        })
        .collect()
}
