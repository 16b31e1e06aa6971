//! Errors reported by IR construction, verification, and evaluation.

use std::fmt;

use crate::{BinaryOp, BlockId, FunctionId, TypeId, TypeKind, ValueId};

/// Error from the IR library.
///
/// Construction errors leave the module unchanged; the offending
/// instruction is never appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IrError {
    /// A value handle does not name a value in this module.
    UnknownValue(ValueId),
    /// A type handle does not name a type in this module.
    UnknownType(TypeId),
    /// A function handle does not name a function in this module.
    UnknownFunction(FunctionId),
    /// A block handle does not name a block in this module.
    UnknownBlock(BlockId),
    /// An integer constant was requested for a non-integer type.
    NotAnIntegerType { ty: TypeKind },
    /// An instruction was appended after the block's terminator.
    BlockTerminated { block: String },
    /// Binary operands have different types.
    OperandTypeMismatch {
        op: BinaryOp,
        lhs: TypeKind,
        rhs: TypeKind,
    },
    /// Integer arithmetic was requested on a non-integer operand.
    NonIntegerOperand { op: BinaryOp, ty: TypeKind },
    /// An operand belongs to a different function than the block.
    ForeignOperand { value: ValueId, block: String },
    /// A block of a defined function does not end in a terminator.
    MissingTerminator { function: String, block: String },
    /// A `ret` operand does not match the function's return type.
    ReturnTypeMismatch {
        function: String,
        expected: TypeKind,
        found: TypeKind,
    },
    /// A function with no blocks was evaluated.
    NotDefined { function: String },
    /// Wrong number of arguments passed to the interpreter.
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        found: usize,
    },
    /// An interpreter argument does not match its parameter type.
    ArgumentTypeMismatch {
        function: String,
        index: usize,
        expected: TypeKind,
    },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownValue(id) => write!(f, "unknown value #{}", id.raw()),
            Self::UnknownType(id) => write!(f, "unknown type #{}", id.raw()),
            Self::UnknownFunction(id) => write!(f, "unknown function #{}", id.raw()),
            Self::UnknownBlock(id) => write!(f, "unknown block #{}", id.raw()),
            Self::NotAnIntegerType { ty } => {
                write!(f, "integer constant requested for type {ty}")
            }
            Self::BlockTerminated { block } => {
                write!(f, "block '{block}' already ends in a terminator")
            }
            Self::OperandTypeMismatch { op, lhs, rhs } => {
                write!(f, "operand type mismatch in {op}: {lhs} vs {rhs}")
            }
            Self::NonIntegerOperand { op, ty } => {
                write!(f, "{op} requires integer operands, found {ty}")
            }
            Self::ForeignOperand { value, block } => write!(
                f,
                "value #{} does not belong to the function of block '{block}'",
                value.raw()
            ),
            Self::MissingTerminator { function, block } => {
                write!(f, "block '{block}' in @{function} has no terminator")
            }
            Self::ReturnTypeMismatch {
                function,
                expected,
                found,
            } => write!(
                f,
                "@{function} returns {expected} but a ret yields {found}"
            ),
            Self::NotDefined { function } => {
                write!(f, "@{function} is a declaration and cannot be evaluated")
            }
            Self::ArgumentCountMismatch {
                function,
                expected,
                found,
            } => write!(
                f,
                "@{function} expects {expected} arguments, found {found}"
            ),
            Self::ArgumentTypeMismatch {
                function,
                index,
                expected,
            } => write!(f, "argument {index} of @{function} must be {expected}"),
        }
    }
}

impl std::error::Error for IrError {}
