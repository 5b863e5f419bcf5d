//! Type system errors

use crate::ty::TypeId;
use thiserror::Error;

/// Errors that can occur when querying the type context
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// A type id that was never interned in this context
    #[error("Unknown type id: {0}")]
    UnknownTypeId(TypeId),

    /// A class type was expected
    #[error("Expected a class type, got {actual}")]
    NotAClass {
        /// Rendered form of the offending type
        actual: String,
    },
}
