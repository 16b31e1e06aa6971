//! Compilation context.
//!
//! The [`Context`] is the root of ownership: it holds the IR module (and
//! with it every type, function, block and value) plus the symbol table.
//! Dropping the context releases all of them at once. Handles handed out by
//! a context are plain `Copy` data; they are validated against the context's
//! stamp on every use.

use dasil_ir::{interp, BlockId, FunctionId, Module, RuntimeValue, TypeId, ValueId};
use rustc_hash::FxHashMap;

use crate::handles::{BasicBlock, ContextStamp, Function, Type, Value};
use crate::{CodegenError, CodegenOptions, HandleKind, Result};

/// Owner of one compilation unit.
pub struct Context {
    stamp: ContextStamp,
    pub(crate) module: Module,
    /// Source-level name to value. Last binding wins.
    pub(crate) variables: FxHashMap<String, Value>,
    options: CodegenOptions,
}

impl Context {
    /// Create a context with default options.
    pub fn new() -> Self {
        Self::with_options(CodegenOptions::default())
    }

    /// Create a context with explicit options.
    pub fn with_options(options: CodegenOptions) -> Self {
        let stamp = ContextStamp::fresh();
        tracing::debug!(context = stamp.raw(), module = %options.module_name, "created context");
        Self {
            stamp,
            module: Module::new(options.module_name.as_str()),
            variables: FxHashMap::default(),
            options,
        }
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Read-only view of the module being built.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Check the module for unterminated blocks and mistyped returns.
    pub fn verify(&self) -> Result<()> {
        Ok(self.module.verify()?)
    }

    /// Run `function` through the reference interpreter.
    pub fn evaluate(&self, function: Function, args: &[RuntimeValue]) -> Result<RuntimeValue> {
        let id = self.function_id(function)?;
        if self.options.dump_ir {
            eprintln!("{}", self.module);
        }
        Ok(interp::evaluate(&self.module, id, args)?)
    }

    // -- Handle validation --

    fn check(&self, stamp: ContextStamp, kind: HandleKind) -> Result<()> {
        if stamp == self.stamp {
            Ok(())
        } else {
            Err(CodegenError::ForeignHandle { kind })
        }
    }

    /// True if `block` was created by this context.
    pub(crate) fn owns_block(&self, block: BasicBlock) -> bool {
        block.stamp == self.stamp
    }

    pub(crate) fn type_id(&self, ty: Type) -> Result<TypeId> {
        self.check(ty.stamp, HandleKind::Type)?;
        Ok(ty.id)
    }

    pub(crate) fn value_id(&self, value: Value) -> Result<ValueId> {
        if value.is_null() {
            return Err(CodegenError::NullValue);
        }
        self.check(value.stamp, HandleKind::Value)?;
        Ok(value.id)
    }

    pub(crate) fn function_id(&self, function: Function) -> Result<FunctionId> {
        self.check(function.stamp, HandleKind::Function)?;
        Ok(function.id)
    }

    pub(crate) fn block_id(&self, block: BasicBlock) -> Result<BlockId> {
        self.check(block.stamp, HandleKind::Block)?;
        Ok(block.id)
    }

    // -- Handle construction --

    pub(crate) fn type_handle(&self, id: TypeId) -> Type {
        Type {
            stamp: self.stamp,
            id,
        }
    }

    pub(crate) fn value_handle(&self, id: ValueId) -> Value {
        Value {
            stamp: self.stamp,
            id,
        }
    }

    pub(crate) fn function_handle(&self, id: FunctionId) -> Function {
        Function {
            stamp: self.stamp,
            id,
        }
    }

    pub(crate) fn block_handle(&self, id: BlockId) -> BasicBlock {
        BasicBlock {
            stamp: self.stamp,
            id,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        tracing::debug!(
            context = self.stamp.raw(),
            functions = self.module.functions().count(),
            "released context"
        );
    }
}
