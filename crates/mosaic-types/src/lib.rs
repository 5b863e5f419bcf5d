//! Mosaic Type System
//!
//! Interned type representation shared by the resolution engine, plus the
//! captured-type approximation used when normalizing smart-cast receivers.

#![warn(missing_docs)]

pub mod approximation;
pub mod context;
pub mod error;
pub mod ty;

pub use approximation::CapturedTypeApproximator;
pub use context::TypeContext;
pub use error::TypeError;
pub use ty::{
    CapturedType, ClassType, FunctionType, Type, TypeId, TypeParameterType, TypeProjection,
    Variance,
};
