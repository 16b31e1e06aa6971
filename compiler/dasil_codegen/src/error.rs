//! Codegen errors.

use std::fmt;

use dasil_ir::IrError;

/// Result type for codegen operations.
pub type Result<T, E = CodegenError> = std::result::Result<T, E>;

/// The kind of handle an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Context,
    Type,
    Value,
    Function,
    Block,
    ArgList,
    Builder,
}

impl HandleKind {
    pub fn description(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Type => "type",
            Self::Value => "value",
            Self::Function => "function",
            Self::Block => "basic block",
            Self::ArgList => "argument list",
            Self::Builder => "builder",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Error during code generation.
///
/// Every variant except `UnboundName` indicates misuse of the API or a
/// failure inside the IR library; the context should be discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodegenError {
    /// `lookup_variable` on a name that was never bound.
    UnboundName { name: String },
    /// The null value sentinel was used as an operand.
    NullValue,
    /// A handle created by a different (possibly released) context.
    ForeignHandle { kind: HandleKind },
    /// A host handle whose slot was released.
    StaleHandle { kind: HandleKind },
    /// Writing the module text failed.
    Io { message: String },
    /// The IR library rejected the operation.
    Ir(IrError),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundName { name } => write!(f, "can't find variable {name}"),
            Self::NullValue => write!(f, "null value used as an operand"),
            Self::ForeignHandle { kind } => {
                write!(f, "{kind} handle belongs to a different context")
            }
            Self::StaleHandle { kind } => write!(f, "{kind} handle was already released"),
            Self::Io { message } => write!(f, "failed to write module: {message}"),
            Self::Ir(err) => write!(f, "IR construction failed: {err}"),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ir(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IrError> for CodegenError {
    fn from(err: IrError) -> Self {
        Self::Ir(err)
    }
}

impl From<std::io::Error> for CodegenError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
