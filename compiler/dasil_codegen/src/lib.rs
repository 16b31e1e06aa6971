//! Code-generation core for Dasil.
//!
//! Orchestrates the IR library in [`dasil_ir`]: a [`Context`] owns one module
//! and a symbol table, and everything created through it is addressed by
//! small `Copy` handles stamped with the owning context.
//!
//! # Debug Environment Variables
//!
//! - `DASIL_DEBUG_IR`: print the module to stderr before evaluating it.
//!   Any non-empty value enables this. Read by [`CodegenOptions::from_env`].
//! - `DASIL_MODULE_NAME`: module identifier used by [`CodegenOptions::from_env`].
//! - `RUST_LOG=dasil_codegen=debug`: context, function and block lifecycle.
//! - `RUST_LOG=dasil_codegen=trace,dasil_ir=trace`: every emitted instruction.
//!
//! # Example
//!
//! ```
//! use dasil_codegen::{ArgList, BinaryOp, Context};
//!
//! let mut cx = Context::new();
//! let i32_ty = cx.int32_type();
//!
//! let mut args = ArgList::new();
//! args.add("n", i32_ty);
//! let inc = cx.create_function("inc", &args, i32_ty)?;
//! let entry = cx.create_basic_block("entry", inc)?;
//!
//! let mut bx = cx.create_builder(entry)?;
//! let n = bx.lookup_variable("n")?;
//! let one = bx.int_const(1);
//! let sum = bx.binary_op(BinaryOp::Add, n, one)?;
//! bx.ret(sum)?;
//! drop(bx);
//!
//! assert!(cx.render_module().contains("add i32 %n, 1"));
//! # Ok::<(), dasil_codegen::CodegenError>(())
//! ```
//!
//! # Threading
//!
//! A context is mutated in place without locking. Mutation goes through
//! `&mut Context`, so sharing one context across threads requires external
//! synchronization by the caller.

mod builder;
mod context;
mod error;
mod function;
mod handles;
pub mod host;
mod options;
mod render;
mod symbols;
mod types;

pub use builder::Builder;
pub use context::Context;
pub use error::{CodegenError, HandleKind, Result};
pub use function::ArgList;
pub use handles::{BasicBlock, Function, Type, Value};
pub use options::CodegenOptions;

pub use dasil_ir::{BinaryOp, RuntimeValue, TypeKind};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=dasil_codegen=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
