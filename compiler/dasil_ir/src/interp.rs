//! Reference interpreter for straight-line functions.
//!
//! Executes the entry block of a defined function instruction by
//! instruction, with the same wrapping arithmetic the constant folder uses.
//! Stands in for a JIT when checking what generated code computes.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::module::wrap_to_width;
use crate::{FunctionId, Inst, IrError, Module, TypeKind, ValueId, ValueKind};

/// A value observed while interpreting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RuntimeValue {
    /// Integer, sign-extended from its IR width.
    Int(i64),
    Float(f32),
}

impl RuntimeValue {
    fn matches(self, kind: TypeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Int(_), TypeKind::Int { .. }) | (Self::Float(_), TypeKind::Float)
        )
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Evaluate `function` with `args`, returning the value of its `ret`.
pub fn evaluate(
    module: &Module,
    function: FunctionId,
    args: &[RuntimeValue],
) -> Result<RuntimeValue, IrError> {
    let func = module.function(function)?;
    if func.params().len() != args.len() {
        return Err(IrError::ArgumentCountMismatch {
            function: func.name().to_owned(),
            expected: func.params().len(),
            found: args.len(),
        });
    }
    let mut bound = Vec::with_capacity(args.len());
    for (index, (&param, &arg)) in func.params().iter().zip(args).enumerate() {
        let expected = module.type_kind(module.value_type(param)?)?;
        if !arg.matches(expected) {
            return Err(IrError::ArgumentTypeMismatch {
                function: func.name().to_owned(),
                index,
                expected,
            });
        }
        bound.push(match (arg, expected) {
            (RuntimeValue::Int(v), TypeKind::Int { bits }) => {
                RuntimeValue::Int(wrap_to_width(v, bits))
            }
            _ => arg,
        });
    }

    let Some(&entry) = func.blocks().first() else {
        return Err(IrError::NotDefined {
            function: func.name().to_owned(),
        });
    };
    let block = module.block(entry)?;

    let mut frame = Frame {
        module,
        args: bound,
        results: FxHashMap::default(),
    };
    for inst in block.insts() {
        match *inst {
            Inst::Binary {
                op,
                lhs,
                rhs,
                result,
            } => {
                let kind = module.type_kind(module.value_type(result)?)?;
                let TypeKind::Int { bits } = kind else {
                    return Err(IrError::NonIntegerOperand { op, ty: kind });
                };
                let (RuntimeValue::Int(a), RuntimeValue::Int(b)) =
                    (frame.read(lhs)?, frame.read(rhs)?)
                else {
                    return Err(IrError::NonIntegerOperand {
                        op,
                        ty: TypeKind::Float,
                    });
                };
                frame
                    .results
                    .insert(result, RuntimeValue::Int(op.fold(a, b, bits)));
            }
            Inst::Ret { value } => {
                let out = frame.read(value)?;
                tracing::debug!(function = func.name(), %out, "evaluated");
                return Ok(out);
            }
        }
    }

    Err(IrError::MissingTerminator {
        function: func.name().to_owned(),
        block: block.describe().to_owned(),
    })
}

/// Per-call interpreter state.
struct Frame<'a> {
    module: &'a Module,
    args: Vec<RuntimeValue>,
    results: FxHashMap<ValueId, RuntimeValue>,
}

impl Frame<'_> {
    fn read(&self, value: ValueId) -> Result<RuntimeValue, IrError> {
        match self.module.value(value)?.kind() {
            ValueKind::ConstInt(c) => Ok(RuntimeValue::Int(c)),
            ValueKind::Param { index, .. } => self
                .args
                .get(index)
                .copied()
                .ok_or(IrError::UnknownValue(value)),
            ValueKind::Inst { .. } => self
                .results
                .get(&value)
                .copied()
                .ok_or(IrError::UnknownValue(value)),
        }
    }
}
