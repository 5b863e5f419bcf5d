//! Engine errors
//!
//! Every error here is a configuration error in the sense that it aborts
//! construction of a module resolver. Compatibility skips and resolution
//! fallbacks are policies, not errors, and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing platform descriptions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlatformError {
    /// Unknown platform component name
    #[error("Unknown platform: {0} (expected one of: jvm, js, common, native)")]
    UnknownPlatform(String),

    /// A platform list with no components
    #[error("Platform list is empty")]
    Empty,

    /// Malformed language or metadata version
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
}

/// Errors raised while assembling a module container
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContainerError {
    /// No package part provider was supplied
    #[error("Module {module}: package part provider is required")]
    MissingPackagePartProvider {
        /// Module name
        module: String,
    },

    /// No metadata part provider was supplied
    #[error("Module {module}: metadata part provider is required")]
    MissingMetadataPartProvider {
        /// Module name
        module: String,
    },

    /// JVM is targeted but no module class resolver was supplied
    #[error("Module {module} targets JVM but no module class resolver was supplied")]
    MissingModuleClassResolver {
        /// Module name
        module: String,
    },
}

/// Errors raised while reading library metadata
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetadataError {
    /// The metadata loader failed to read a library root
    #[error("Failed to read metadata from {root}: {message}")]
    Io {
        /// Library root
        root: PathBuf,
        /// Underlying error
        message: String,
    },

    /// A compatible artifact could not be decoded
    #[error("Failed to decode metadata artifact {artifact}: {message}")]
    Decode {
        /// Artifact identifier
        artifact: String,
        /// Underlying error
        message: String,
    },
}

/// Errors raised by module resolution
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// The module is not part of the project
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// Container assembly failed
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Library metadata could not be read
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A module's construction asked, on the same thread, for its own resolver
    #[error("Module {module} requested its own resolver while it was being constructed")]
    ReentrantConstruction {
        /// Module name
        module: String,
    },

    /// The owning project was dropped while a resolver still referenced it
    #[error("Project was dropped during resolution")]
    ProjectDropped,
}
