//! Project manifest (mosaic.toml) parsing and validation

use mosaic_engine::module::DeclarationEntry;
use mosaic_engine::{LanguageVersion, PlatformKind, TargetPlatform};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Manifest file name looked up in project directories
pub const MANIFEST_FILE: &str = "mosaic.toml";

/// Errors that can occur when parsing or validating a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// I/O error reading manifest file
    #[error("Failed to read manifest: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid manifest: {0}")]
    ValidationError(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Project manifest (mosaic.toml)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectManifest {
    /// Project metadata
    pub project: ProjectInfo,

    /// Modules, in resolution order
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleEntry>,
}

/// Project metadata section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectInfo {
    /// Project name
    pub name: String,

    /// Language version (`MAJOR.MINOR`)
    #[serde(default = "default_language_version")]
    pub language_version: String,

    /// API version; defaults to the language version
    #[serde(default)]
    pub api_version: Option<String>,

    /// Platforms modules without a `platforms` list are analyzed for
    #[serde(default = "default_platforms")]
    pub default_platforms: Vec<String>,
}

fn default_language_version() -> String {
    LanguageVersion::LATEST_STABLE.to_string()
}

fn default_platforms() -> Vec<String> {
    vec![PlatformKind::Jvm.id().to_string()]
}

/// What a module is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKindEntry {
    /// Sources in the project
    #[default]
    Source,
    /// Precompiled library
    Library,
}

/// A `[[module]]` entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleEntry {
    /// Module name
    pub name: String,

    /// Target platform components; absent means unrestricted
    #[serde(default)]
    pub platforms: Option<Vec<String>>,

    /// Source or library
    #[serde(default)]
    pub kind: ModuleKindEntry,

    /// Library roots, relative to the manifest directory
    #[serde(default)]
    pub roots: Vec<String>,

    /// Names of modules this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// In-memory source files
    #[serde(default)]
    pub files: Vec<FileEntry>,

    /// Java classes owned by this module
    #[serde(default)]
    pub java_classes: Vec<JavaClassEntry>,

    /// Common metadata packages this module publishes
    #[serde(default)]
    pub metadata: Vec<PackageEntry>,

    /// Whether native tooling provides fragments for this module
    #[serde(default)]
    pub native: bool,
}

impl ModuleEntry {
    /// Check if the module is a library
    pub fn is_library(&self) -> bool {
        self.kind == ModuleKindEntry::Library
    }

    /// Parsed platform, or `None` for an unrestricted module
    pub fn target_platform(&self) -> Result<Option<TargetPlatform>, ManifestError> {
        self.platforms
            .as_ref()
            .map(|platforms| parse_platforms(platforms, &self.name))
            .transpose()
    }
}

/// A synthetic source file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileEntry {
    /// File name
    pub name: String,

    /// Package the file declares
    #[serde(default)]
    pub package: String,

    /// Top-level declarations
    #[serde(default)]
    pub declarations: Vec<DeclarationEntry>,
}

/// A Java class owned by a module
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JavaClassEntry {
    /// Qualified class name
    pub name: String,

    /// Direct supertypes
    #[serde(default)]
    pub supertypes: Vec<String>,
}

/// Declarations of one package
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageEntry {
    /// Package name
    pub package: String,

    /// Declarations in the package
    #[serde(default)]
    pub declarations: Vec<DeclarationEntry>,
}

impl ProjectManifest {
    /// Parse a manifest from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: ProjectManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.project.name.is_empty() {
            return Err(ManifestError::MissingField("project.name".to_string()));
        }
        if !is_valid_name(&self.project.name) {
            return Err(ManifestError::ValidationError(format!(
                "Invalid project name '{}'",
                self.project.name
            )));
        }

        self.language_version()?;
        self.api_version()?;
        self.default_platform()?;

        let mut seen = HashSet::new();
        for module in &self.modules {
            if !is_valid_name(&module.name) {
                return Err(ManifestError::ValidationError(format!(
                    "Invalid module name '{}'",
                    module.name
                )));
            }
            if !seen.insert(module.name.as_str()) {
                return Err(ManifestError::ValidationError(format!(
                    "Duplicate module '{}'",
                    module.name
                )));
            }
        }

        for module in &self.modules {
            validate_module(module, &seen)?;
        }

        Ok(())
    }

    /// Parsed language version
    pub fn language_version(&self) -> Result<LanguageVersion, ManifestError> {
        parse_version(&self.project.language_version, "language-version")
    }

    /// Parsed API version, if given
    pub fn api_version(&self) -> Result<Option<LanguageVersion>, ManifestError> {
        self.project
            .api_version
            .as_deref()
            .map(|version| parse_version(version, "api-version"))
            .transpose()
    }

    /// Platform for modules without a `platforms` list
    pub fn default_platform(&self) -> Result<TargetPlatform, ManifestError> {
        parse_platforms(&self.project.default_platforms, "project")
    }

    /// Find a module entry by name
    pub fn module(&self, name: &str) -> Option<&ModuleEntry> {
        self.modules.iter().find(|module| module.name == name)
    }
}

fn validate_module(module: &ModuleEntry, known: &HashSet<&str>) -> Result<(), ManifestError> {
    module.target_platform()?;

    for dep in &module.dependencies {
        if dep == &module.name {
            return Err(ManifestError::ValidationError(format!(
                "Module '{}' depends on itself",
                module.name
            )));
        }
        if !known.contains(dep.as_str()) {
            return Err(ManifestError::ValidationError(format!(
                "Module '{}' depends on unknown module '{}'",
                module.name, dep
            )));
        }
    }

    if !module.roots.is_empty() && !module.is_library() {
        return Err(ManifestError::ValidationError(format!(
            "Module '{}' has roots but is not a library",
            module.name
        )));
    }

    for class in &module.java_classes {
        if !is_valid_qualified_name(&class.name) {
            return Err(ManifestError::ValidationError(format!(
                "Module '{}': invalid class name '{}'",
                module.name, class.name
            )));
        }
    }

    for file in &module.files {
        if !file.package.is_empty() && !is_valid_qualified_name(&file.package) {
            return Err(ManifestError::ValidationError(format!(
                "Module '{}': file '{}' has invalid package '{}'",
                module.name, file.name, file.package
            )));
        }
    }

    Ok(())
}

fn parse_version(version: &str, field: &str) -> Result<LanguageVersion, ManifestError> {
    version.parse().map_err(|_| {
        let message = format!("Invalid {} '{}' (expected MAJOR.MINOR)", field, version);
        ManifestError::ValidationError(message)
    })
}

fn parse_platforms(platforms: &[String], owner: &str) -> Result<TargetPlatform, ManifestError> {
    TargetPlatform::parse(&platforms.join(","))
        .map_err(|e| ManifestError::ValidationError(format!("{}: {}", owner, e)))
}

/// Check if a project or module name is valid
///
/// Names are non-empty, start with a letter and contain only ASCII
/// alphanumerics, `-` and `_`.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Check if a dotted name has only identifier segments
fn is_valid_qualified_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}
