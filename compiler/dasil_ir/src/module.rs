//! The IR module and its arenas.
//!
//! A [`Module`] owns every IR object: the type table, all values, all
//! functions and all blocks. Construction methods validate their handles and
//! return [`IrError`] instead of panicking, so a bad handle never corrupts
//! the arenas.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{BlockId, FunctionId, IrError, TypeId, TypeKind, TypeTable, ValueId};

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Integer arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

impl BinaryOp {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 3] = [Self::Add, Self::Sub, Self::Mul];

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
        }
    }

    /// Apply the operator with two's-complement wrapping at `bits` width.
    pub fn fold(self, lhs: i64, rhs: i64, bits: u32) -> i64 {
        let raw = match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mul => lhs.wrapping_mul(rhs),
        };
        wrap_to_width(raw, bits)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Sign-extend the low `bits` bits of `value`.
pub(crate) fn wrap_to_width(value: i64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        return value;
    }
    let shift = 64 - bits;
    (value << shift) >> shift
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Where a value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Uniqued integer constant (already sign-extended to its width).
    ConstInt(i64),
    /// Formal parameter `index` of `function`.
    Param { function: FunctionId, index: usize },
    /// Result of an instruction appended to `block`.
    Inst { block: BlockId },
}

/// A value stored in the module arena.
#[derive(Clone, Debug)]
pub struct ValueData {
    ty: TypeId,
    kind: ValueKind,
    name: String,
}

impl ValueData {
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Display name; empty when the value is unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constant payload, if this is an integer constant.
    pub fn as_const_int(&self) -> Option<i64> {
        match self.kind {
            ValueKind::ConstInt(v) => Some(v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Instructions, blocks, functions
// ---------------------------------------------------------------------------

/// An instruction in a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inst {
    Binary {
        op: BinaryOp,
        lhs: ValueId,
        rhs: ValueId,
        result: ValueId,
    },
    Ret {
        value: ValueId,
    },
}

impl Inst {
    /// True for instructions that end a block.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Ret { .. })
    }

    /// The value produced by this instruction, if any.
    pub fn result(&self) -> Option<ValueId> {
        match self {
            Self::Binary { result, .. } => Some(*result),
            Self::Ret { .. } => None,
        }
    }
}

/// A straight-line sequence of instructions.
#[derive(Clone, Debug)]
pub struct Block {
    name: String,
    function: FunctionId,
    insts: Vec<Inst>,
}

impl Block {
    /// Label; empty when the block is unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> FunctionId {
        self.function
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    /// The terminator, if the block has one.
    pub fn terminator(&self) -> Option<&Inst> {
        self.insts.last().filter(|inst| inst.is_terminator())
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator().is_some()
    }

    /// Name used in diagnostics.
    pub(crate) fn describe(&self) -> &str {
        if self.name.is_empty() {
            "<unnamed>"
        } else {
            &self.name
        }
    }
}

/// Symbol visibility of a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Linkage {
    External,
}

/// A function: signature plus its blocks.
#[derive(Clone, Debug)]
pub struct Function {
    name: String,
    linkage: Linkage,
    return_type: TypeId,
    params: Vec<ValueId>,
    blocks: Vec<BlockId>,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    pub fn return_type(&self) -> TypeId {
        self.return_type
    }

    /// Formal parameter values, in declaration order.
    pub fn params(&self) -> &[ValueId] {
        &self.params
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// A function without blocks is only a declaration.
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

/// One compilation unit's worth of IR.
#[derive(Clone, Debug)]
pub struct Module {
    name: String,
    types: TypeTable,
    values: Vec<ValueData>,
    functions: Vec<Function>,
    blocks: Vec<Block>,
    /// Uniqued integer constants, keyed by type and payload.
    int_constants: FxHashMap<(TypeId, i64), ValueId>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: TypeTable::new(),
            values: Vec::new(),
            functions: Vec::new(),
            blocks: Vec::new(),
            int_constants: FxHashMap::default(),
        }
    }

    /// Module identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    // -- Types --

    /// The 32-bit integer type.
    #[inline]
    pub fn i32_type(&self) -> TypeId {
        TypeId::I32
    }

    /// The 32-bit float type.
    #[inline]
    pub fn float_type(&self) -> TypeId {
        TypeId::FLOAT
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn type_kind(&self, ty: TypeId) -> Result<TypeKind, IrError> {
        self.types.kind(ty)
    }

    // -- Lookups --

    pub fn value(&self, id: ValueId) -> Result<&ValueData, IrError> {
        self.values.get(id.index()).ok_or(IrError::UnknownValue(id))
    }

    pub fn value_type(&self, id: ValueId) -> Result<TypeId, IrError> {
        self.value(id).map(ValueData::ty)
    }

    pub fn function(&self, id: FunctionId) -> Result<&Function, IrError> {
        self.functions
            .get(id.index())
            .ok_or(IrError::UnknownFunction(id))
    }

    pub fn block(&self, id: BlockId) -> Result<&Block, IrError> {
        self.blocks.get(id.index()).ok_or(IrError::UnknownBlock(id))
    }

    /// Functions in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, func)| (FunctionId::from_index(i), func))
    }

    /// Look up a function by its (uniqued) name.
    pub fn function_by_name(&self, name: &str) -> Option<FunctionId> {
        self.functions()
            .find(|(_, func)| func.name == name)
            .map(|(id, _)| id)
    }

    // -- Functions and blocks --

    /// Add a function with external linkage.
    ///
    /// A name already taken in this module gets a `.N` suffix, the way global
    /// symbols are uniqued in LLVM modules.
    pub fn add_function(
        &mut self,
        name: &str,
        return_type: TypeId,
        param_types: &[TypeId],
    ) -> Result<FunctionId, IrError> {
        self.types.kind(return_type)?;
        for &ty in param_types {
            self.types.kind(ty)?;
        }

        let name = self.unique_function_name(name);
        let id = FunctionId::from_index(self.functions.len());
        let params = param_types
            .iter()
            .enumerate()
            .map(|(index, &ty)| {
                self.push_value(ValueData {
                    ty,
                    kind: ValueKind::Param {
                        function: id,
                        index,
                    },
                    name: String::new(),
                })
            })
            .collect();

        tracing::debug!(function = %name, params = param_types.len(), "declared function");
        self.functions.push(Function {
            name,
            linkage: Linkage::External,
            return_type,
            params,
            blocks: Vec::new(),
        });
        Ok(id)
    }

    fn unique_function_name(&self, name: &str) -> String {
        if name.is_empty() || self.function_by_name(name).is_none() {
            return name.to_owned();
        }
        (1u32..)
            .map(|n| format!("{name}.{n}"))
            .find(|candidate| self.function_by_name(candidate).is_none())
            .unwrap_or_else(|| name.to_owned())
    }

    /// Append a new, empty block to `function`.
    pub fn append_block(&mut self, function: FunctionId, name: &str) -> Result<BlockId, IrError> {
        self.function(function)?;
        let id = BlockId::from_index(self.blocks.len());
        self.blocks.push(Block {
            name: name.to_owned(),
            function,
            insts: Vec::new(),
        });
        if let Some(func) = self.functions.get_mut(function.index()) {
            func.blocks.push(id);
        }
        Ok(id)
    }

    // -- Values --

    fn push_value(&mut self, data: ValueData) -> ValueId {
        let id = ValueId::from_index(self.values.len());
        self.values.push(data);
        id
    }

    /// Get the uniqued integer constant `value` of type `ty`.
    ///
    /// The payload is truncated to the type's width first.
    pub fn const_int(&mut self, ty: TypeId, value: i64) -> Result<ValueId, IrError> {
        let kind = self.types.kind(ty)?;
        let TypeKind::Int { bits } = kind else {
            return Err(IrError::NotAnIntegerType { ty: kind });
        };
        Ok(self.intern_int(ty, wrap_to_width(value, bits)))
    }

    /// Get the uniqued `i32` constant `value`.
    pub fn const_i32(&mut self, value: i32) -> ValueId {
        self.intern_int(TypeId::I32, i64::from(value))
    }

    fn intern_int(&mut self, ty: TypeId, value: i64) -> ValueId {
        if let Some(&id) = self.int_constants.get(&(ty, value)) {
            return id;
        }
        let id = self.push_value(ValueData {
            ty,
            kind: ValueKind::ConstInt(value),
            name: String::new(),
        });
        self.int_constants.insert((ty, value), id);
        id
    }

    /// Set the display name of a value.
    ///
    /// Constants cannot carry names; naming one is accepted and ignored.
    pub fn set_value_name(&mut self, id: ValueId, name: &str) -> Result<(), IrError> {
        let data = self
            .values
            .get_mut(id.index())
            .ok_or(IrError::UnknownValue(id))?;
        if matches!(data.kind, ValueKind::ConstInt(_)) {
            return Ok(());
        }
        name.clone_into(&mut data.name);
        Ok(())
    }

    // -- Instructions --

    /// Append an integer arithmetic instruction to `block`.
    ///
    /// When both operands are constants the result is folded into a new
    /// constant and nothing is appended.
    pub fn build_binary(
        &mut self,
        block: BlockId,
        op: BinaryOp,
        lhs: ValueId,
        rhs: ValueId,
    ) -> Result<ValueId, IrError> {
        self.check_open(block)?;
        self.check_operand(block, lhs)?;
        self.check_operand(block, rhs)?;

        let (l, r) = (self.value(lhs)?, self.value(rhs)?);
        let (ty, l_const, r_const) = (l.ty, l.as_const_int(), r.as_const_int());
        let lk = self.types.kind(l.ty)?;
        let rk = self.types.kind(r.ty)?;
        if l.ty != r.ty {
            return Err(IrError::OperandTypeMismatch { op, lhs: lk, rhs: rk });
        }
        let TypeKind::Int { bits } = lk else {
            return Err(IrError::NonIntegerOperand { op, ty: lk });
        };

        if let (Some(a), Some(b)) = (l_const, r_const) {
            let folded = op.fold(a, b, bits);
            tracing::trace!(%op, a, b, folded, "folded constant operands");
            return self.const_int(ty, folded);
        }

        let result = self.push_value(ValueData {
            ty,
            kind: ValueKind::Inst { block },
            name: String::new(),
        });
        self.push_inst(
            block,
            Inst::Binary {
                op,
                lhs,
                rhs,
                result,
            },
        );
        tracing::trace!(%op, result = result.raw(), "appended binary op");
        Ok(result)
    }

    /// Terminate `block` with `ret value`.
    pub fn build_ret(&mut self, block: BlockId, value: ValueId) -> Result<(), IrError> {
        self.check_open(block)?;
        self.check_operand(block, value)?;
        self.push_inst(block, Inst::Ret { value });
        tracing::trace!(value = value.raw(), "appended ret");
        Ok(())
    }

    fn push_inst(&mut self, block: BlockId, inst: Inst) {
        if let Some(b) = self.blocks.get_mut(block.index()) {
            b.insts.push(inst);
        }
    }

    fn check_open(&self, block: BlockId) -> Result<(), IrError> {
        let b = self.block(block)?;
        if b.is_terminated() {
            return Err(IrError::BlockTerminated {
                block: b.describe().to_owned(),
            });
        }
        Ok(())
    }

    /// Operands must be constants or values of the block's own function.
    fn check_operand(&self, block: BlockId, value: ValueId) -> Result<(), IrError> {
        let b = self.block(block)?;
        let owner = match self.value(value)?.kind {
            ValueKind::ConstInt(_) => return Ok(()),
            ValueKind::Param { function, .. } => function,
            ValueKind::Inst { block: def } => self.block(def)?.function,
        };
        if owner == b.function {
            Ok(())
        } else {
            Err(IrError::ForeignOperand {
                value,
                block: b.describe().to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests;
