//! Core type definitions for the Mosaic type system

use std::fmt;

/// Unique identifier for a type in the type context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Create a new TypeId from a raw value
    ///
    /// Note: This should generally only be used for interop.
    /// Prefer using TypeContext methods to obtain ids.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this TypeId
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Use-site variance of a type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    /// `T`
    Invariant,
    /// `in T`
    In,
    /// `out T`
    Out,
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variance::Invariant => Ok(()),
            Variance::In => write!(f, "in "),
            Variance::Out => write!(f, "out "),
        }
    }
}

/// A type argument at a use site: `out T`, `in T`, `T` or `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeProjection {
    /// Star projection `*`
    Star,
    /// Projection with explicit variance
    Type {
        /// Variance of the projection
        variance: Variance,
        /// Projected type
        ty: TypeId,
    },
}

impl TypeProjection {
    /// Invariant projection of `ty`
    pub fn invariant(ty: TypeId) -> Self {
        TypeProjection::Type {
            variance: Variance::Invariant,
            ty,
        }
    }

    /// `out ty`
    pub fn covariant(ty: TypeId) -> Self {
        TypeProjection::Type {
            variance: Variance::Out,
            ty,
        }
    }

    /// `in ty`
    pub fn contravariant(ty: TypeId) -> Self {
        TypeProjection::Type {
            variance: Variance::In,
            ty,
        }
    }

    /// Projected type, if not a star projection
    pub fn ty(&self) -> Option<TypeId> {
        match self {
            TypeProjection::Star => None,
            TypeProjection::Type { ty, .. } => Some(*ty),
        }
    }
}

/// Nominal class type with type arguments: `List<out T>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    /// Fully qualified class name
    pub name: String,
    /// Type arguments
    pub args: Vec<TypeProjection>,
}

/// Reference to a declared type parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameterType {
    /// Parameter name
    pub name: String,
    /// Declared upper bound (`Any?` when absent)
    pub upper_bound: Option<TypeId>,
}

/// Type produced by capture conversion of a projection.
///
/// Each capture is distinct: two captures of the same projection only
/// compare equal when they carry the same `capture_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapturedType {
    /// Projection that was captured
    pub projection: TypeProjection,
    /// Identity of the capture site
    pub capture_id: u32,
}

/// Function type: `R.(P1, P2) -> T`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Extension receiver type
    pub receiver: Option<TypeId>,
    /// Parameter types
    pub params: Vec<TypeId>,
    /// Return type
    pub return_type: TypeId,
}

/// The core type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Top type
    Any,

    /// Bottom type
    Nothing,

    /// Class type
    Class(ClassType),

    /// Type parameter reference
    TypeParameter(TypeParameterType),

    /// Captured projection
    Captured(CapturedType),

    /// Function type
    Function(FunctionType),

    /// Nullable wrapper around a non-nullable type
    Nullable(TypeId),

    /// Unresolvable type
    Error,
}

impl Type {
    /// Check if this type is a captured type
    pub fn is_captured(&self) -> bool {
        matches!(self, Type::Captured(_))
    }

    /// Check if this type is nullable at the top level
    pub fn is_nullable(&self) -> bool {
        matches!(self, Type::Nullable(_))
    }

    /// Get the class type if this is a class
    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            Type::Class(c) => Some(c),
            _ => None,
        }
    }
}
