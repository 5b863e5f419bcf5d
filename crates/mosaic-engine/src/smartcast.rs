//! Call receivers with smart-cast information
//!
//! A receiver may be known to have more specific types than its declared
//! one, proven by earlier type checks. Those narrowed types only hold while
//! the receiver's storage cannot change in between, which is what
//! `is_stable` records.

use mosaic_types::{CapturedTypeApproximator, TypeContext, TypeId};
use rustc_hash::FxHashSet;
use std::fmt;

/// What a receiver value refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// An explicit receiver expression, by expression id
    Expression(u32),
    /// Implicit `this` of the named class
    ImplicitThis(String),
    /// Extension receiver of the named callable
    ExtensionReceiver(String),
}

impl fmt::Display for ReceiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiverKind::Expression(id) => write!(f, "expression #{}", id),
            ReceiverKind::ImplicitThis(class) => write!(f, "this@{}", class),
            ReceiverKind::ExtensionReceiver(callable) => write!(f, "receiver of {}", callable),
        }
    }
}

/// A call receiver and its declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiverValue {
    kind: ReceiverKind,
    ty: TypeId,
}

impl ReceiverValue {
    /// Create a receiver
    pub fn new(kind: ReceiverKind, ty: TypeId) -> Self {
        Self { kind, ty }
    }

    /// What the receiver refers to
    pub fn kind(&self) -> &ReceiverKind {
        &self.kind
    }

    /// Declared type
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Same receiver with another declared type
    pub fn replace_type(&self, ty: TypeId) -> Self {
        Self {
            kind: self.kind.clone(),
            ty,
        }
    }
}

/// A receiver paired with the types smart casts narrowed it to
///
/// `possible_types` never contains the receiver's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverValueWithSmartCastInfo {
    receiver: ReceiverValue,
    possible_types: FxHashSet<TypeId>,
    is_stable: bool,
}

impl ReceiverValueWithSmartCastInfo {
    /// Pair `receiver` with narrowed types; the declared type is dropped from them
    pub fn new(
        receiver: ReceiverValue,
        possible_types: impl IntoIterator<Item = TypeId>,
        is_stable: bool,
    ) -> Self {
        let declared = receiver.ty();
        let possible_types = possible_types
            .into_iter()
            .filter(|ty| *ty != declared)
            .collect();
        Self {
            receiver,
            possible_types,
            is_stable,
        }
    }

    /// Receiver without smart-cast information
    pub fn plain(receiver: ReceiverValue, is_stable: bool) -> Self {
        Self::new(receiver, std::iter::empty(), is_stable)
    }

    /// The receiver
    pub fn receiver(&self) -> &ReceiverValue {
        &self.receiver
    }

    /// Types smart casts narrowed the receiver to
    pub fn possible_types(&self) -> &FxHashSet<TypeId> {
        &self.possible_types
    }

    /// Whether the receiver's storage is stable between check and use
    pub fn is_stable(&self) -> bool {
        self.is_stable
    }

    /// Check whether smart casts contributed any type
    pub fn has_types_from_smart_casts(&self) -> bool {
        !self.possible_types.is_empty()
    }

    /// Declared type followed by the narrowed types in id order
    pub fn all_original_types(&self) -> Vec<TypeId> {
        let mut narrowed: Vec<TypeId> = self.possible_types.iter().copied().collect();
        narrowed.sort();
        std::iter::once(self.receiver.ty()).chain(narrowed).collect()
    }

    /// Narrowed types usable for resolution; none for an unstable receiver
    pub fn stable_possible_types(&self) -> FxHashSet<TypeId> {
        if self.is_stable {
            self.possible_types.clone()
        } else {
            FxHashSet::default()
        }
    }

    /// Replace captured types with their approximations
    ///
    /// Returns `self` untouched when the declared type needs no
    /// approximation and there are no narrowed types. Stability is kept.
    pub fn normalize(self, ctx: &mut TypeContext) -> Self {
        let mut approximator = CapturedTypeApproximator::new(ctx);
        let declared = approximator.approximate(self.receiver.ty());
        if declared.is_none() && self.possible_types.is_empty() {
            return self;
        }

        let possible_types: Vec<TypeId> = self
            .possible_types
            .iter()
            .map(|ty| approximator.approximate_or_self(*ty))
            .collect();
        let receiver = match declared {
            Some(ty) => self.receiver.replace_type(ty),
            None => self.receiver,
        };

        Self::new(receiver, possible_types, self.is_stable)
    }
}
