//! Opaque ID newtypes for IR objects stored in a `Module`.
//!
//! Each ID is a `u32` index into the corresponding arena `Vec` inside the
//! module. A `NONE` sentinel (`u32::MAX`) marks absent values.

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

/// Opaque handle to a value (constant, parameter, or instruction result).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(u32);

/// Opaque handle to a type in a module's `TypeTable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

/// Opaque handle to a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

/// Opaque handle to a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

macro_rules! id_impl {
    ($ty:ident, $what:literal) => {
        impl $ty {
            #[doc = concat!("Sentinel for \"no ", $what, "\".")]
            pub const NONE: Self = Self(u32::MAX);

            /// True if this is the `NONE` sentinel.
            #[inline]
            pub fn is_none(self) -> bool {
                self.0 == u32::MAX
            }

            /// The raw index.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            /// The arena index.
            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

/// Arena-allocated IDs. Type IDs are fixed constants and never allocated.
macro_rules! arena_id_impl {
    ($ty:ident, $what:literal) => {
        impl $ty {
            /// Build an ID from an arena index.
            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            pub(crate) fn from_index(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize, "{} arena overflow", $what);
                Self(index as u32)
            }
        }
    };
}

id_impl!(ValueId, "value");
id_impl!(TypeId, "type");
id_impl!(BlockId, "block");
id_impl!(FunctionId, "function");

arena_id_impl!(ValueId, "value");
arena_id_impl!(BlockId, "block");
arena_id_impl!(FunctionId, "function");

impl TypeId {
    /// The 32-bit integer type, present in every type table.
    pub const I32: Self = Self(0);

    /// The 32-bit floating-point type, present in every type table.
    pub const FLOAT: Self = Self(1);
}
