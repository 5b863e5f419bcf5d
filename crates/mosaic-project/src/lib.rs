//! Mosaic Project Library
//!
//! Loads projects described by a `mosaic.toml` manifest:
//! - Manifest parsing and validation (`manifest` module)
//! - Manifest-backed part providers, class finder, ownership and native hook (`environment` module)
//! - `.jsmeta` library metadata loading (`jsmeta` module)
//! - Building the project resolver (`project` module)

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod environment;
pub mod jsmeta;
pub mod manifest;
pub mod project;

pub use environment::{ManifestModules, ModuleRecord, NativeLibraryFragmentProvider};
pub use jsmeta::JsMetaFileLoader;
pub use manifest::{
    FileEntry, JavaClassEntry, ManifestError, ModuleEntry, ModuleKindEntry, PackageEntry,
    ProjectInfo, ProjectManifest, MANIFEST_FILE,
};
pub use project::{find_manifest, Project, ProjectError};
