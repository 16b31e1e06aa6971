//! Instruction builder.
//!
//! A [`Builder`] is a cursor at the end of one basic block. It borrows the
//! context mutably for its lifetime, so symbol-table access while building
//! goes through [`Builder::lookup_variable`] / [`Builder::bind_variable`]
//! (or [`Builder::cx_mut`]). Instructions it emits live in the module and
//! outlive the builder.
//!
//! The block's terminator is tracked by the IR: once `ret` has been
//! emitted, every further emission into the block fails with
//! `IrError::BlockTerminated`.

use dasil_ir::{BinaryOp, BlockId};

use crate::{BasicBlock, Context, Result, Value};

/// Cursor appending instructions to one basic block.
pub struct Builder<'cx> {
    cx: &'cx mut Context,
    block: BasicBlock,
    block_id: BlockId,
}

impl Context {
    /// Attach a builder to the end of `block`.
    pub fn create_builder(&mut self, block: BasicBlock) -> Result<Builder<'_>> {
        let block_id = self.block_id(block)?;
        self.module.block(block_id)?;
        Ok(Builder {
            cx: self,
            block,
            block_id,
        })
    }
}

impl Builder<'_> {
    /// The block this builder appends to.
    pub fn block(&self) -> BasicBlock {
        self.block
    }

    #[inline]
    pub fn cx(&self) -> &Context {
        &*self.cx
    }

    #[inline]
    pub fn cx_mut(&mut self) -> &mut Context {
        &mut *self.cx
    }

    /// True once the block ends in `ret`.
    pub fn is_terminated(&self) -> bool {
        self.cx
            .module
            .block(self.block_id)
            .is_ok_and(dasil_ir::Block::is_terminated)
    }

    // -- Constants --

    /// A 32-bit integer constant.
    pub fn int_const(&mut self, value: i32) -> Value {
        let id = self.cx.module.const_i32(value);
        self.cx.value_handle(id)
    }

    /// A "float" constant.
    ///
    /// Floating constants go through the integer path: `value` is truncated
    /// toward zero into an `i32` constant (`3.9` yields `i32 3`). Values
    /// outside the `i32` range saturate and NaN becomes `0`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn float_const(&mut self, value: f64) -> Value {
        let truncated = value as i32;
        if f64::from(truncated) != value {
            tracing::warn!(value, truncated, "float constant truncated to i32");
        }
        self.int_const(truncated)
    }

    // -- Instructions --

    /// Append `lhs <op> rhs`.
    ///
    /// Constant operands fold into a constant without emitting anything.
    pub fn binary_op(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
        let l = self.cx.value_id(lhs)?;
        let r = self.cx.value_id(rhs)?;
        let id = self.cx.module.build_binary(self.block_id, op, l, r)?;
        Ok(self.cx.value_handle(id))
    }

    /// Terminate the block with `ret value`.
    pub fn ret(&mut self, value: Value) -> Result<()> {
        let v = self.cx.value_id(value)?;
        self.cx.module.build_ret(self.block_id, v)?;
        Ok(())
    }

    // -- Symbol table --

    /// See [`Context::lookup_variable`].
    pub fn lookup_variable(&self, name: &str) -> Result<Value> {
        self.cx.lookup_variable(name)
    }

    /// See [`Context::bind_variable`].
    pub fn bind_variable(&mut self, name: &str, value: Value) -> Result<()> {
        self.cx.bind_variable(name, value)
    }
}

impl std::fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("block", &self.block)
            .finish_non_exhaustive()
    }
}
