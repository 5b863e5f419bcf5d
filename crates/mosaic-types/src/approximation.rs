//! Captured-type approximation
//!
//! Capture conversion introduces types that only exist inside one call
//! site. Before such a type can be compared structurally or stored beyond
//! that site it must be approximated: a top-level captured type becomes its
//! upper bound, a captured type argument becomes the projection it was
//! captured from.

use crate::context::TypeContext;
use crate::ty::{Type, TypeId, TypeProjection, Variance};

/// Replaces captured types with their approximations
pub struct CapturedTypeApproximator<'a> {
    ctx: &'a mut TypeContext,
}

impl<'a> CapturedTypeApproximator<'a> {
    /// Create an approximator over the given context
    pub fn new(ctx: &'a mut TypeContext) -> Self {
        Self { ctx }
    }

    /// Approximate `ty`, returning `None` when it contains no captured type
    pub fn approximate(&mut self, ty: TypeId) -> Option<TypeId> {
        if !self.ctx.contains_captured(ty) {
            return None;
        }
        Some(self.upper(ty))
    }

    /// Same as [`approximate`](Self::approximate) but returns `ty` itself on a no-op
    pub fn approximate_or_self(&mut self, ty: TypeId) -> TypeId {
        self.approximate(ty).unwrap_or(ty)
    }

    fn upper(&mut self, ty: TypeId) -> TypeId {
        let Some(current) = self.ctx.get(ty).cloned() else {
            return ty;
        };

        match current {
            Type::Captured(captured) => match captured.projection {
                TypeProjection::Star => self.ctx.nullable_any_type(),
                TypeProjection::Type {
                    variance: Variance::In,
                    ..
                } => self.ctx.nullable_any_type(),
                TypeProjection::Type { ty: bound, .. } => self.upper(bound),
            },
            Type::Nullable(inner) => {
                let approximated = self.upper(inner);
                self.ctx.make_nullable(approximated)
            }
            Type::Class(class) => {
                let args = class
                    .args
                    .iter()
                    .map(|arg| self.argument(*arg))
                    .collect();
                self.ctx.class_type(class.name, args)
            }
            Type::Function(func) => {
                let receiver = func.receiver.map(|r| self.upper(r));
                let params = func.params.iter().map(|p| self.upper(*p)).collect();
                let return_type = self.upper(func.return_type);
                self.ctx.function_type(receiver, params, return_type)
            }
            Type::Any | Type::Nothing | Type::TypeParameter(_) | Type::Error => ty,
        }
    }

    fn argument(&mut self, arg: TypeProjection) -> TypeProjection {
        let TypeProjection::Type { variance, ty } = arg else {
            return arg;
        };

        if let Some(Type::Captured(captured)) = self.ctx.get(ty).cloned() {
            // A captured argument turns back into the projection it came from.
            return match captured.projection {
                TypeProjection::Star => TypeProjection::Star,
                TypeProjection::Type {
                    variance: captured_variance,
                    ty: bound,
                } => TypeProjection::Type {
                    variance: captured_variance,
                    ty: self.upper(bound),
                },
            };
        }

        TypeProjection::Type {
            variance,
            ty: self.upper(ty),
        }
    }
}
