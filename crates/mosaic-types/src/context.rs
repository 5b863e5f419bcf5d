//! Type context for managing types and type interning

use crate::error::TypeError;
use crate::ty::{
    CapturedType, ClassType, FunctionType, Type, TypeId, TypeParameterType, TypeProjection,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Type context that owns every type of an analysis session
///
/// Types are interned: structurally identical types share one TypeId, so
/// equality of ids is equality of types.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all types, indexed by TypeId
    types: Vec<Arc<Type>>,

    /// Reverse mapping from Type to TypeId for interning
    type_to_id: FxHashMap<Type, TypeId>,

    /// Next capture site identity
    next_capture: u32,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    /// Well-known id of `Any`
    pub const ANY: TypeId = TypeId(0);
    /// Well-known id of `Nothing`
    pub const NOTHING: TypeId = TypeId(1);
    /// Well-known id of `Any?`
    pub const NULLABLE_ANY: TypeId = TypeId(2);
    /// Well-known id of the error type
    pub const ERROR: TypeId = TypeId(3);

    /// Create a new type context with the well-known types pre-interned
    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
            next_capture: 0,
        };

        ctx.intern(Type::Any);
        ctx.intern(Type::Nothing);
        ctx.intern(Type::Nullable(Self::ANY));
        ctx.intern(Type::Error);

        ctx
    }

    /// Intern a type, returning its TypeId
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }

        let id = TypeId(self.types.len() as u32);
        self.types.push(Arc::new(ty.clone()));
        self.type_to_id.insert(ty, id);
        id
    }

    /// Get a type by its TypeId
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize).map(|arc| arc.as_ref())
    }

    /// Get a type by its TypeId, failing for ids foreign to this context
    pub fn resolve(&self, id: TypeId) -> Result<&Type, TypeError> {
        self.get(id).ok_or(TypeError::UnknownTypeId(id))
    }

    /// Look up a type's ID without interning
    pub fn lookup(&self, ty: &Type) -> Option<TypeId> {
        self.type_to_id.get(ty).copied()
    }

    /// Number of interned types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the context holds no types (never true after `new`)
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// `Any`
    pub fn any_type(&self) -> TypeId {
        Self::ANY
    }

    /// `Any?`
    pub fn nullable_any_type(&self) -> TypeId {
        Self::NULLABLE_ANY
    }

    /// `Nothing`
    pub fn nothing_type(&self) -> TypeId {
        Self::NOTHING
    }

    /// Class type with the given arguments
    pub fn class_type(&mut self, name: impl Into<String>, args: Vec<TypeProjection>) -> TypeId {
        self.intern(Type::Class(ClassType {
            name: name.into(),
            args,
        }))
    }

    /// Type parameter reference
    pub fn type_parameter(
        &mut self,
        name: impl Into<String>,
        upper_bound: Option<TypeId>,
    ) -> TypeId {
        self.intern(Type::TypeParameter(TypeParameterType {
            name: name.into(),
            upper_bound,
        }))
    }

    /// Function type
    pub fn function_type(
        &mut self,
        receiver: Option<TypeId>,
        params: Vec<TypeId>,
        return_type: TypeId,
    ) -> TypeId {
        self.intern(Type::Function(FunctionType {
            receiver,
            params,
            return_type,
        }))
    }

    /// Capture a projection, producing a fresh captured type
    pub fn capture(&mut self, projection: TypeProjection) -> TypeId {
        let capture_id = self.next_capture;
        self.next_capture += 1;
        self.intern(Type::Captured(CapturedType {
            projection,
            capture_id,
        }))
    }

    /// Nullable version of `ty` (idempotent)
    pub fn make_nullable(&mut self, ty: TypeId) -> TypeId {
        match self.get(ty) {
            Some(Type::Nullable(_)) | Some(Type::Error) => ty,
            _ => self.intern(Type::Nullable(ty)),
        }
    }

    /// Check whether a type contains a captured type anywhere in its structure
    pub fn contains_captured(&self, ty: TypeId) -> bool {
        match self.get(ty) {
            Some(Type::Captured(_)) => true,
            Some(Type::Nullable(inner)) => self.contains_captured(*inner),
            Some(Type::Class(class)) => class
                .args
                .iter()
                .filter_map(|arg| arg.ty())
                .any(|arg| self.contains_captured(arg)),
            Some(Type::Function(func)) => {
                func.receiver.is_some_and(|r| self.contains_captured(r))
                    || func.params.iter().any(|p| self.contains_captured(*p))
                    || self.contains_captured(func.return_type)
            }
            _ => false,
        }
    }

    /// Class name of `ty`, looking through nullability
    pub fn class_name(&self, ty: TypeId) -> Result<&str, TypeError> {
        match self.resolve(ty)? {
            Type::Class(class) => Ok(&class.name),
            Type::Nullable(inner) => self.class_name(*inner),
            _ => Err(TypeError::NotAClass {
                actual: self.display(ty),
            }),
        }
    }

    /// Render a type for diagnostics
    pub fn display(&self, ty: TypeId) -> String {
        match self.get(ty) {
            None => format!("<unknown {}>", ty),
            Some(Type::Any) => "Any".to_string(),
            Some(Type::Nothing) => "Nothing".to_string(),
            Some(Type::Error) => "<error>".to_string(),
            Some(Type::Nullable(inner)) => format!("{}?", self.display(*inner)),
            Some(Type::TypeParameter(param)) => param.name.clone(),
            Some(Type::Captured(captured)) => {
                format!("Captured({})", self.display_projection(&captured.projection))
            }
            Some(Type::Class(class)) => {
                if class.args.is_empty() {
                    class.name.clone()
                } else {
                    let args: Vec<String> = class
                        .args
                        .iter()
                        .map(|arg| self.display_projection(arg))
                        .collect();
                    format!("{}<{}>", class.name, args.join(", "))
                }
            }
            Some(Type::Function(func)) => {
                let params: Vec<String> = func.params.iter().map(|p| self.display(*p)).collect();
                let receiver = func
                    .receiver
                    .map(|r| format!("{}.", self.display(r)))
                    .unwrap_or_default();
                format!(
                    "{}({}) -> {}",
                    receiver,
                    params.join(", "),
                    self.display(func.return_type)
                )
            }
        }
    }

    fn display_projection(&self, projection: &TypeProjection) -> String {
        match projection {
            TypeProjection::Star => "*".to_string(),
            TypeProjection::Type { variance, ty } => format!("{}{}", variance, self.display(*ty)),
        }
    }
}
