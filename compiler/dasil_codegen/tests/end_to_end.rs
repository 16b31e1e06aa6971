//! End-to-End Code Generation Tests
//!
//! These tests drive the public API the way a front end would:
//! - Build small functions and check the exact rendered module
//! - Check symbol-table behavior across functions
//! - Check that handles never outlive their context's validity
//! - Run built functions through the reference interpreter

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dasil_codegen::host::Session;
use dasil_codegen::{
    ArgList, BinaryOp, CodegenError, CodegenOptions, Context, HandleKind, RuntimeValue, TypeKind,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Rendered Output
// ============================================================================

/// Test: The increment function renders exactly
///
/// Scenario: `i32 inc(i32 n) { return n + 1; }` built through the context.
#[test]
fn test_inc_renders_exact_module() {
    let mut cx = Context::with_options(CodegenOptions::default().with_module_name("dasil"));
    let i32_ty = cx.int32_type();
    let mut args = ArgList::new();
    args.add("n", i32_ty);
    let inc = cx.create_function("inc", &args, i32_ty).unwrap();
    let entry = cx.create_basic_block("entry", inc).unwrap();

    let mut bx = cx.create_builder(entry).unwrap();
    let n = bx.lookup_variable("n").unwrap();
    let one = bx.int_const(1);
    let sum = bx.binary_op(BinaryOp::Add, n, one).unwrap();
    bx.ret(sum).unwrap();
    drop(bx);

    assert_eq!(
        cx.render_module(),
        "; ModuleID = 'dasil'\n\
         source_filename = \"dasil\"\n\
         \n\
         define i32 @inc(i32 %n) {\n\
         entry:\n  \
         %0 = add i32 %n, 1\n  \
         ret i32 %0\n\
         }\n"
    );
    assert_eq!(cx.verify(), Ok(()));
    assert_eq!(
        cx.evaluate(inc, &[RuntimeValue::Int(i32::MAX.into())]),
        Ok(RuntimeValue::Int(i32::MIN.into()))
    );
}

/// Test: Constant operands fold instead of emitting
///
/// Scenario: `return 5 + 7;` produces `ret i32 12` with no `add`.
#[test]
fn test_constant_addition_folds() {
    let mut cx = Context::new();
    let i32_ty = cx.int32_type();
    let twelve = cx.create_function("twelve", &ArgList::new(), i32_ty).unwrap();
    let entry = cx.create_basic_block("entry", twelve).unwrap();

    let mut bx = cx.create_builder(entry).unwrap();
    let five = bx.int_const(5);
    let seven = bx.int_const(7);
    let sum = bx.binary_op(BinaryOp::Add, five, seven).unwrap();
    bx.ret(sum).unwrap();
    drop(bx);

    let text = cx.render_module();
    assert!(text.contains("define i32 @twelve() {\nentry:\n  ret i32 12\n}\n"));
    assert!(!text.contains("add"));
    assert_eq!(cx.evaluate(twelve, &[]), Ok(RuntimeValue::Int(12)));
}

/// Test: Float constants truncate toward zero
///
/// Scenario: `return 3.9;` in an i32 function yields `ret i32 3`.
#[test]
fn test_float_constant_truncates() {
    let mut cx = Context::new();
    let i32_ty = cx.int32_type();
    let f = cx.create_function("three", &ArgList::new(), i32_ty).unwrap();
    let entry = cx.create_basic_block("entry", f).unwrap();

    let mut bx = cx.create_builder(entry).unwrap();
    let v = bx.float_const(3.9);
    bx.ret(v).unwrap();
    drop(bx);

    assert!(cx.render_module().contains("ret i32 3\n"));
    assert_eq!(cx.evaluate(f, &[]), Ok(RuntimeValue::Int(3)));
}

/// Test: A function with no blocks is a declaration
#[test]
fn test_blockless_function_is_declared() {
    let mut cx = Context::new();
    let (i32_ty, float_ty) = (cx.int32_type(), cx.float_type());
    let mut args = ArgList::new();
    args.add("a", i32_ty).add("b", float_ty);
    cx.create_function("ext", &args, float_ty).unwrap();

    assert!(cx
        .render_module()
        .ends_with("\ndeclare float @ext(i32, float)\n"));
    assert_eq!(cx.type_kind(float_ty), Ok(TypeKind::Float));
}

// ============================================================================
// Symbol Table
// ============================================================================

/// Test: Unbound names report the name
#[test]
fn test_unbound_variable_fails() {
    let cx = Context::new();
    let err = cx.lookup_variable("ghost").unwrap_err();
    assert_eq!(
        err,
        CodegenError::UnboundName {
            name: "ghost".to_owned()
        }
    );
    assert_eq!(err.to_string(), "can't find variable ghost");
}

/// Test: The null sentinel is never a real value
#[test]
fn test_null_value_is_distinct() {
    let mut cx = Context::new();
    let i32_ty = cx.int32_type();
    let mut args = ArgList::new();
    args.add("x", i32_ty);
    cx.create_function("f", &args, i32_ty).unwrap();

    let null = cx.null_value();
    assert!(null.is_null());
    assert_ne!(cx.lookup_variable("x").unwrap(), null);
    assert_eq!(cx.bind_variable("y", null), Err(CodegenError::NullValue));
}

// ============================================================================
// Handle Validity
// ============================================================================

/// Test: Handles from a released context are rejected
///
/// Scenario: A handle survives its context; a later context must not accept it.
#[test]
fn test_released_context_handles_rejected() {
    let (old_fn, old_value) = {
        let mut cx = Context::new();
        let i32_ty = cx.int32_type();
        let mut args = ArgList::new();
        args.add("n", i32_ty);
        let f = cx.create_function("f", &args, i32_ty).unwrap();
        (f, cx.lookup_variable("n").unwrap())
    };

    let mut cx = Context::new();
    assert_eq!(
        cx.create_basic_block("entry", old_fn),
        Err(CodegenError::ForeignHandle {
            kind: HandleKind::Function
        })
    );
    assert_eq!(
        cx.value_type(old_value),
        Err(CodegenError::ForeignHandle {
            kind: HandleKind::Value
        })
    );
}

/// Test: Host handles go stale on release
#[test]
fn test_session_release_makes_handles_stale() {
    let mut session = Session::new();
    let ctx = session.create_context();
    let args = session.create_arg_list();
    session.release_arg_list(args).unwrap();
    session.release_context(ctx).unwrap();

    assert_eq!(
        session.get_variable(ctx, "n"),
        Err(CodegenError::StaleHandle {
            kind: HandleKind::Context
        })
    );
    assert_eq!(
        session.release_arg_list(args),
        Err(CodegenError::StaleHandle {
            kind: HandleKind::ArgList
        })
    );
}

// ============================================================================
// Properties
// ============================================================================

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

proptest! {
    /// Any non-empty name is unbound in a fresh context.
    #[test]
    fn prop_fresh_context_has_no_bindings(name in "\\PC{1,16}") {
        let cx = Context::new();
        prop_assert_eq!(
            cx.lookup_variable(&name),
            Err(CodegenError::UnboundName { name: name.clone() })
        );
    }

    /// Binding one name leaves every other name unbound.
    #[test]
    fn prop_binding_is_per_name(bound in ident(), other in ident(), v in any::<i32>()) {
        prop_assume!(bound != other);
        let mut cx = Context::new();
        let i32_ty = cx.int32_type();
        let f = cx.create_function("f", &ArgList::new(), i32_ty).unwrap();
        let entry = cx.create_basic_block("entry", f).unwrap();
        let mut bx = cx.create_builder(entry).unwrap();
        let value = bx.int_const(v);
        bx.bind_variable(&bound, value).unwrap();
        drop(bx);

        prop_assert_eq!(cx.lookup_variable(&bound), Ok(value));
        prop_assert_eq!(
            cx.lookup_variable(&other),
            Err(CodegenError::UnboundName { name: other.clone() })
        );
    }

    /// Parameters keep declaration order and types, and each is bound by name.
    #[test]
    fn prop_params_keep_order_and_types(
        names in proptest::collection::hash_set(ident(), 0..8),
        floats in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let mut cx = Context::new();
        let (i32_ty, float_ty) = (cx.int32_type(), cx.float_type());
        let mut args = ArgList::new();
        for (name, &is_float) in names.iter().zip(&floats) {
            args.add(name.as_str(), if is_float { float_ty } else { i32_ty });
        }

        let f = cx.create_function("f", &args, i32_ty).unwrap();
        let params = cx.function_params(f).unwrap();
        prop_assert_eq!(params.len(), names.len());
        for ((name, ty), param) in args.iter().zip(&params) {
            prop_assert_eq!(cx.value_type(*param).unwrap(), ty);
            prop_assert_eq!(cx.lookup_variable(name).unwrap(), *param);
        }
    }

    /// The last binding of a name is the one looked up.
    #[test]
    fn prop_last_binding_wins(name in ident(), a in any::<i32>(), b in any::<i32>()) {
        let mut cx = Context::new();
        let i32_ty = cx.int32_type();
        let f = cx.create_function("f", &ArgList::new(), i32_ty).unwrap();
        let entry = cx.create_basic_block("entry", f).unwrap();
        let mut bx = cx.create_builder(entry).unwrap();
        let first = bx.int_const(a);
        let second = bx.int_const(b);

        bx.bind_variable(&name, first).unwrap();
        prop_assert_eq!(bx.lookup_variable(&name).unwrap(), first);
        bx.bind_variable(&name, second).unwrap();
        prop_assert_eq!(bx.lookup_variable(&name).unwrap(), second);
    }

    /// Built arithmetic evaluates with 32-bit wrapping.
    #[test]
    fn prop_built_arithmetic_wraps(x in any::<i32>(), y in any::<i32>(), op_index in 0usize..3) {
        let op = BinaryOp::ALL[op_index];
        let mut cx = Context::new();
        let i32_ty = cx.int32_type();
        let mut args = ArgList::new();
        args.add("x", i32_ty).add("y", i32_ty);
        let f = cx.create_function("f", &args, i32_ty).unwrap();
        let entry = cx.create_basic_block("entry", f).unwrap();
        let mut bx = cx.create_builder(entry).unwrap();
        let lhs = bx.lookup_variable("x").unwrap();
        let rhs = bx.lookup_variable("y").unwrap();
        let r = bx.binary_op(op, lhs, rhs).unwrap();
        bx.ret(r).unwrap();
        drop(bx);

        let expected = match op {
            BinaryOp::Add => x.wrapping_add(y),
            BinaryOp::Sub => x.wrapping_sub(y),
            BinaryOp::Mul => x.wrapping_mul(y),
        };
        prop_assert_eq!(
            cx.evaluate(f, &[RuntimeValue::Int(x.into()), RuntimeValue::Int(y.into())]),
            Ok(RuntimeValue::Int(expected.into()))
        );
    }
}
