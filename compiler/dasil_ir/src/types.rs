//! Scalar type universe.

use std::fmt;

use crate::{IrError, TypeId};

/// The shape of a scalar IR type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Two's-complement integer of the given width.
    Int { bits: u32 },
    /// IEEE-754 single precision (`float`).
    Float,
}

impl TypeKind {
    /// True for integer types.
    #[inline]
    pub fn is_int(self) -> bool {
        matches!(self, Self::Int { .. })
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int { bits } => write!(f, "i{bits}"),
            Self::Float => f.write_str("float"),
        }
    }
}

/// Table of the types known to a module.
///
/// The builtin scalars are registered at construction so that
/// [`TypeId::I32`] and [`TypeId::FLOAT`] are valid in every table and
/// requesting the same scalar twice yields the same handle.
#[derive(Clone, Debug)]
pub struct TypeTable {
    kinds: Vec<TypeKind>,
}

impl TypeTable {
    pub fn new() -> Self {
        let kinds = vec![TypeKind::Int { bits: 32 }, TypeKind::Float];
        debug_assert_eq!(kinds[TypeId::I32.index()], TypeKind::Int { bits: 32 });
        debug_assert_eq!(kinds[TypeId::FLOAT.index()], TypeKind::Float);
        Self { kinds }
    }

    /// Resolve a type handle.
    pub fn kind(&self, id: TypeId) -> Result<TypeKind, IrError> {
        self.kinds
            .get(id.index())
            .copied()
            .ok_or(IrError::UnknownType(id))
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
