//! Qualified names and import paths

use std::fmt;

/// A fully qualified, dot-separated name such as `lang.collections.List`
///
/// The empty name is the root package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FqName(String);

impl FqName {
    /// Create a name from its dotted form
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The root package
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Check if this is the root package
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Dotted form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment (`List` for `lang.collections.List`)
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    /// Enclosing name (`lang.collections` for `lang.collections.List`)
    pub fn parent(&self) -> FqName {
        match self.0.rfind('.') {
            Some(idx) => FqName(self.0[..idx].to_string()),
            None => FqName::root(),
        }
    }

    /// Child name
    pub fn child(&self, name: &str) -> FqName {
        if self.is_root() {
            FqName(name.to_string())
        } else {
            FqName(format!("{}.{}", self.0, name))
        }
    }

    /// Check if `self` equals `package` or lies underneath it
    pub fn is_under(&self, package: &FqName) -> bool {
        package.is_root()
            || self.0 == package.0
            || (self.0.starts_with(&package.0) && self.0[package.0.len()..].starts_with('.'))
    }

    /// Name segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for FqName {
    fn from(value: &str) -> Self {
        FqName::new(value)
    }
}

/// An import directive: `lang.collections.*` or `lang.text.Regex`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportPath {
    /// Imported name, or the package for star imports
    pub fq_name: FqName,
    /// Star import
    pub all_under: bool,
}

impl ImportPath {
    /// Import of a single name
    pub fn exact(fq_name: impl Into<FqName>) -> Self {
        Self {
            fq_name: fq_name.into(),
            all_under: false,
        }
    }

    /// Star import of a package
    pub fn all_under(package: impl Into<FqName>) -> Self {
        Self {
            fq_name: package.into(),
            all_under: true,
        }
    }

    /// Parse `a.b.*` or `a.b.C`
    pub fn parse(path: &str) -> Self {
        match path.strip_suffix(".*") {
            Some(package) => Self::all_under(FqName::new(package)),
            None if path == "*" => Self::all_under(FqName::root()),
            None => Self::exact(FqName::new(path)),
        }
    }

    /// Check whether this import brings `fq_name` into scope
    pub fn imports(&self, fq_name: &FqName) -> bool {
        if self.all_under {
            fq_name.parent() == self.fq_name
        } else {
            *fq_name == self.fq_name
        }
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_under {
            if self.fq_name.is_root() {
                write!(f, "*")
            } else {
                write!(f, "{}.*", self.fq_name.as_str())
            }
        } else {
            write!(f, "{}", self.fq_name.as_str())
        }
    }
}
