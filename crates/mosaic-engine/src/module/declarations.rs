//! Declarations and the declaration-provider collaborator

use super::{ContentScope, ModuleInfo};
use crate::platform::FqName;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Kind of a top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `object`
    Object,
    /// `fun`
    Function,
    /// `val` / `var`
    Property,
    /// `typealias`
    TypeAlias,
}

impl DeclarationKind {
    /// Check if the declaration introduces a classifier
    pub fn is_classifier(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Class
                | DeclarationKind::Interface
                | DeclarationKind::Object
                | DeclarationKind::TypeAlias
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Object => "object",
            DeclarationKind::Function => "function",
            DeclarationKind::Property => "property",
            DeclarationKind::TypeAlias => "typealias",
        };
        write!(f, "{}", name)
    }
}

/// A top-level declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// Qualified name
    pub fq_name: FqName,
    /// Kind
    pub kind: DeclarationKind,
    /// Marked `expect`
    pub is_expect: bool,
    /// Marked `actual`
    pub is_actual: bool,
}

impl Declaration {
    /// Plain declaration
    pub fn new(fq_name: impl Into<FqName>, kind: DeclarationKind) -> Self {
        Self {
            fq_name: fq_name.into(),
            kind,
            is_expect: false,
            is_actual: false,
        }
    }

    /// `expect` declaration
    pub fn expect(fq_name: impl Into<FqName>, kind: DeclarationKind) -> Self {
        Self {
            is_expect: true,
            ..Self::new(fq_name, kind)
        }
    }

    /// `actual` declaration
    pub fn actual(fq_name: impl Into<FqName>, kind: DeclarationKind) -> Self {
        Self {
            is_actual: true,
            ..Self::new(fq_name, kind)
        }
    }

    /// Package the declaration lives in
    pub fn package(&self) -> FqName {
        self.fq_name.parent()
    }
}

/// Serialized form of a declaration, named relative to its package
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeclarationEntry {
    /// Simple name
    pub name: String,
    /// Kind
    pub kind: DeclarationKind,
    /// Marked `expect`
    #[serde(default)]
    pub expect: bool,
    /// Marked `actual`
    #[serde(default)]
    pub actual: bool,
}

impl DeclarationEntry {
    /// Qualify the entry with `package`
    pub fn to_declaration(&self, package: &FqName) -> Declaration {
        Declaration {
            fq_name: package.child(&self.name),
            kind: self.kind,
            is_expect: self.expect,
            is_actual: self.actual,
        }
    }
}

/// An in-memory source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticFile {
    /// File name
    pub name: String,
    /// Package directive
    pub package: FqName,
    /// Top-level declarations, with names relative to the package
    pub declarations: Vec<Declaration>,
}

impl SyntheticFile {
    /// Create a file; declaration names are qualified with `package`
    pub fn new(
        name: impl Into<String>,
        package: impl Into<FqName>,
        declarations: Vec<Declaration>,
    ) -> Self {
        let package = package.into();
        let declarations = declarations
            .into_iter()
            .map(|decl| Declaration {
                fq_name: package.child(decl.fq_name.as_str()),
                ..decl
            })
            .collect();
        Self {
            name: name.into(),
            package,
            declarations,
        }
    }
}

/// Source of a module's own declarations
pub trait DeclarationProvider: Send + Sync {
    /// Declarations directly inside `package`
    fn declarations_in(&self, package: &FqName) -> Vec<Declaration>;

    /// Every package with at least one declaration
    fn packages(&self) -> Vec<FqName>;

    /// Find a declaration by qualified name
    fn find(&self, fq_name: &FqName) -> Option<Declaration> {
        self.declarations_in(&fq_name.parent())
            .into_iter()
            .find(|decl| decl.fq_name == *fq_name)
    }
}

/// Creates declaration providers for modules
pub trait DeclarationProviderFactory: Send + Sync {
    /// Provider over `files`, visible through `scope`
    fn create(
        &self,
        files: &[SyntheticFile],
        scope: &ContentScope,
        module: &ModuleInfo,
    ) -> Arc<dyn DeclarationProvider>;
}

/// Declaration provider indexing synthetic files by package
#[derive(Debug, Default)]
pub struct FileBasedDeclarationProvider {
    by_package: FxHashMap<FqName, Vec<Declaration>>,
}

impl FileBasedDeclarationProvider {
    /// Index the given files
    pub fn new(files: &[SyntheticFile]) -> Self {
        let mut by_package: FxHashMap<FqName, Vec<Declaration>> = FxHashMap::default();
        for file in files {
            by_package
                .entry(file.package.clone())
                .or_default()
                .extend(file.declarations.iter().cloned());
        }
        Self { by_package }
    }
}

impl DeclarationProvider for FileBasedDeclarationProvider {
    fn declarations_in(&self, package: &FqName) -> Vec<Declaration> {
        self.by_package.get(package).cloned().unwrap_or_default()
    }

    fn packages(&self) -> Vec<FqName> {
        let mut packages: Vec<FqName> = self.by_package.keys().cloned().collect();
        packages.sort();
        packages
    }
}

/// Factory producing [`FileBasedDeclarationProvider`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct FileBasedDeclarationProviderFactory;

impl DeclarationProviderFactory for FileBasedDeclarationProviderFactory {
    fn create(
        &self,
        files: &[SyntheticFile],
        _scope: &ContentScope,
        _module: &ModuleInfo,
    ) -> Arc<dyn DeclarationProvider> {
        Arc::new(FileBasedDeclarationProvider::new(files))
    }
}
