//! `.jsmeta` artifact loading
//!
//! A JS library root is a directory of `*.jsmeta` files. Each file is a JSON
//! object `{ "version": [major, minor, patch], "body": { ... } }`; the body is
//! kept undecoded until the engine has checked the version.

use mosaic_engine::fragments::{JsMetadata, LibraryMetadataLoader, MetadataVersion};
use mosaic_engine::MetadataError;
use serde::Deserialize;
use std::path::Path;

/// File extension of metadata artifacts
pub const JSMETA_EXTENSION: &str = "jsmeta";

#[derive(Debug, Deserialize)]
struct JsMetaFile {
    version: MetadataVersion,
    body: serde_json::Value,
}

/// Loads `.jsmeta` files from library root directories
#[derive(Debug, Default, Clone, Copy)]
pub struct JsMetaFileLoader;

impl JsMetaFileLoader {
    /// Create a loader
    pub fn new() -> Self {
        Self
    }

    fn read_artifact(path: &Path, name: &str) -> Result<JsMetadata, MetadataError> {
        let decode = |message: String| MetadataError::Decode {
            artifact: name.to_string(),
            message,
        };
        let content = std::fs::read(path).map_err(|e| decode(e.to_string()))?;
        let file: JsMetaFile = serde_json::from_slice(&content).map_err(|e| decode(e.to_string()))?;
        let body = serde_json::to_vec(&file.body).map_err(|e| decode(e.to_string()))?;
        Ok(JsMetadata {
            name: name.to_string(),
            version: file.version,
            body,
        })
    }
}

impl LibraryMetadataLoader for JsMetaFileLoader {
    /// Artifacts are returned in file name order
    fn load(&self, root: &Path) -> Result<Vec<JsMetadata>, MetadataError> {
        let io = |e: std::io::Error| MetadataError::Io {
            root: root.to_path_buf(),
            message: e.to_string(),
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(root).map_err(io)? {
            let path = entry.map_err(io)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == JSMETA_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut artifacts = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            artifacts.push(Self::read_artifact(&path, &name)?);
        }
        tracing::debug!(root = %root.display(), artifacts = artifacts.len(), "loaded JS metadata");
        Ok(artifacts)
    }
}
