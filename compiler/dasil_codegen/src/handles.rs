//! Context-stamped handles.
//!
//! Every handle pairs an IR arena ID with the stamp of the [`Context`] that
//! created it. Stamps come from a process-wide 64-bit counter and are never
//! reused, so a handle presented to any other context (including one created
//! after its owner was released) is rejected with `ForeignHandle` instead of
//! silently aliasing an unrelated object.
//!
//! [`Context`]: crate::Context

use std::sync::atomic::{AtomicU64, Ordering};

use dasil_ir::{BlockId, FunctionId, TypeId, ValueId};

/// Identity of one context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ContextStamp(u64);

impl ContextStamp {
    /// Stamp carried by the null value; never issued to a context.
    pub(crate) const NONE: Self = Self(0);

    /// A stamp never issued before. Counts up from 1 on a 64-bit counter,
    /// so `NONE` is never handed out.
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn raw(self) -> u64 {
        self.0
    }
}

/// Handle to a scalar type in a context's type universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Type {
    pub(crate) stamp: ContextStamp,
    pub(crate) id: TypeId,
}

/// Handle to a constant, parameter, or instruction result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Value {
    pub(crate) stamp: ContextStamp,
    pub(crate) id: ValueId,
}

/// Handle to a function in a context's module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Function {
    pub(crate) stamp: ContextStamp,
    pub(crate) id: FunctionId,
}

/// Handle to a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BasicBlock {
    pub(crate) stamp: ContextStamp,
    pub(crate) id: BlockId,
}

impl Value {
    /// Sentinel for "no value"; distinct from every real value.
    pub const NULL: Self = Self {
        stamp: ContextStamp::NONE,
        id: ValueId::NONE,
    };

    /// True if this is the null sentinel.
    #[inline]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}
