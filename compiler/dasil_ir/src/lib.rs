//! In-memory IR for the Dasil code-generation backend.
//!
//! This crate is the target library the codegen core orchestrates: it owns a
//! scalar type universe, one [`Module`] of functions, their basic blocks, and
//! the values flowing between instructions. It knows how to print itself in
//! LLVM's textual assembly syntax, how to check itself for well-formedness,
//! and how to evaluate a straight-line function.
//!
//! # Architecture
//!
//! ```text
//!   Module
//!     ├── TypeTable      (i32, float)
//!     ├── values         (constants, parameters, instruction results)
//!     ├── functions      (name, params, return type, block list)
//!     └── blocks         (ordered instruction list, terminator last)
//! ```
//!
//! Everything is stored in arenas inside the [`Module`] and addressed by
//! `Copy` ID handles ([`ValueId`], [`TypeId`], [`BlockId`], [`FunctionId`]).
//! Nothing outside the module owns IR objects; dropping the module drops all
//! of them.
//!
//! # Debugging
//!
//! - `RUST_LOG=dasil_ir=trace`: trace every appended instruction.

mod error;
mod ids;
pub mod interp;
mod module;
mod printer;
mod types;
mod verify;

pub use error::IrError;
pub use ids::{BlockId, FunctionId, TypeId, ValueId};
pub use interp::RuntimeValue;
pub use module::{BinaryOp, Block, Function, Inst, Linkage, Module, ValueData, ValueKind};
pub use types::{TypeKind, TypeTable};
