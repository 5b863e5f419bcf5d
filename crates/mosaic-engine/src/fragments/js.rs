//! JS library metadata
//!
//! A JS library root holds any number of metadata artifacts. Each artifact
//! carries a binary version and an opaque body; only bodies with a
//! compatible version are decoded.

use super::{PackageFragmentProvider, ResolvedSymbol, SymbolSource};
use crate::error::MetadataError;
use crate::module::{Declaration, DeclarationEntry};
use crate::platform::FqName;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Binary version of a metadata artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "[u32; 3]")]
pub struct MetadataVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
    /// Patch component
    pub patch: u32,
}

impl MetadataVersion {
    /// Version this reader understands
    pub const CURRENT: MetadataVersion = MetadataVersion::new(1, 4, 0);

    /// Create a version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Check whether a reader at `reader` can decode this version
    ///
    /// Pre-release (`0.x`) versions must match the reader's minor exactly.
    /// Otherwise majors must match and the minor may not be newer than the
    /// reader's.
    pub fn is_compatible_with(&self, reader: &MetadataVersion) -> bool {
        if self.major == 0 {
            reader.major == 0 && self.minor == reader.minor
        } else {
            self.major == reader.major && self.minor <= reader.minor
        }
    }

    /// Check compatibility with [`MetadataVersion::CURRENT`]
    pub fn is_compatible(&self) -> bool {
        self.is_compatible_with(&Self::CURRENT)
    }
}

impl From<[u32; 3]> for MetadataVersion {
    fn from([major, minor, patch]: [u32; 3]) -> Self {
        Self::new(major, minor, patch)
    }
}

impl fmt::Display for MetadataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One metadata artifact as found in a library root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsMetadata {
    /// Artifact identifier (usually its file name)
    pub name: String,
    /// Binary version
    pub version: MetadataVersion,
    /// Undecoded body
    pub body: Vec<u8>,
}

/// Reads metadata artifacts from a library root
pub trait LibraryMetadataLoader: Send + Sync {
    /// Every artifact under `root`, compatible or not
    fn load(&self, root: &Path) -> Result<Vec<JsMetadata>, MetadataError>;
}

/// Header of a decoded metadata body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JsHeader {
    /// JS module name the library compiles to
    pub module_name: String,
    /// Compilation flags
    #[serde(default)]
    pub flags: u32,
}

#[derive(Debug, Deserialize)]
struct JsPackageEntry {
    package: String,
    #[serde(default)]
    declarations: Vec<DeclarationEntry>,
}

/// Decoded metadata body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsPackagePayload {
    /// Header
    pub header: JsHeader,
    /// Declarations per package
    pub packages: Vec<(FqName, Vec<Declaration>)>,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    header: JsHeader,
    #[serde(default)]
    packages: Vec<JsPackageEntry>,
}

impl JsPackagePayload {
    /// Decode the body of `metadata`
    pub fn decode(metadata: &JsMetadata) -> Result<Self, MetadataError> {
        let raw: RawPayload =
            serde_json::from_slice(&metadata.body).map_err(|e| MetadataError::Decode {
                artifact: metadata.name.clone(),
                message: e.to_string(),
            })?;

        let packages = raw
            .packages
            .into_iter()
            .map(|entry| {
                let package = FqName::new(entry.package);
                let decls = entry
                    .declarations
                    .iter()
                    .map(|decl| decl.to_declaration(&package))
                    .collect();
                (package, decls)
            })
            .collect();

        Ok(Self {
            header: raw.header,
            packages,
        })
    }
}

/// Symbols of one decoded JS metadata payload
#[derive(Debug)]
pub struct JsFragmentProvider {
    header: JsHeader,
    origin: String,
    by_package: FxHashMap<FqName, Vec<Declaration>>,
    packages: FxHashSet<FqName>,
}

impl JsFragmentProvider {
    /// Provider over a decoded payload from `origin`
    pub fn new(payload: JsPackagePayload, origin: impl Into<String>) -> Self {
        let mut by_package: FxHashMap<FqName, Vec<Declaration>> = FxHashMap::default();
        let mut packages = FxHashSet::default();
        for (package, decls) in payload.packages {
            let mut current = package.clone();
            while !current.is_root() {
                let parent = current.parent();
                packages.insert(current);
                current = parent;
            }
            by_package.entry(package).or_default().extend(decls);
        }

        Self {
            header: payload.header,
            origin: origin.into(),
            by_package,
            packages,
        }
    }

    /// Payload header
    pub fn header(&self) -> &JsHeader {
        &self.header
    }

    fn symbol(&self, decl: &Declaration) -> ResolvedSymbol {
        ResolvedSymbol::new(
            decl.fq_name.clone(),
            decl.kind,
            SymbolSource::JsMetadata,
            self.origin.clone(),
        )
    }
}

impl PackageFragmentProvider for JsFragmentProvider {
    fn source(&self) -> SymbolSource {
        SymbolSource::JsMetadata
    }

    fn describe(&self) -> String {
        format!("js {} ({})", self.header.module_name, self.origin)
    }

    fn find(&self, fq_name: &FqName) -> Option<ResolvedSymbol> {
        self.by_package
            .get(&fq_name.parent())?
            .iter()
            .find(|decl| decl.fq_name == *fq_name)
            .map(|decl| self.symbol(decl))
    }

    fn declarations_in(&self, package: &FqName) -> Vec<ResolvedSymbol> {
        self.by_package
            .get(package)
            .map(|decls| decls.iter().map(|decl| self.symbol(decl)).collect())
            .unwrap_or_default()
    }

    fn package_exists(&self, package: &FqName) -> bool {
        package.is_root() || self.packages.contains(package)
    }
}
