#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

/// Helper: a module with `i32 @f(i32 %a, i32 %b)` and an `entry` block.
fn setup() -> (Module, FunctionId, BlockId) {
    let mut module = Module::new("module_test");
    let i32_ty = module.i32_type();
    let func = module
        .add_function("f", i32_ty, &[i32_ty, i32_ty])
        .unwrap();
    let entry = module.append_block(func, "entry").unwrap();
    (module, func, entry)
}

// -- Functions and blocks --

#[test]
fn add_function_creates_ordered_params() {
    let mut module = Module::new("m");
    let (i, f) = (module.i32_type(), module.float_type());
    let func = module.add_function("g", i, &[i, f, i]).unwrap();

    let params = module.function(func).unwrap().params().to_vec();
    assert_eq!(params.len(), 3);
    let tys: Vec<TypeId> = params
        .iter()
        .map(|&p| module.value_type(p).unwrap())
        .collect();
    assert_eq!(tys, vec![i, f, i]);
    for (index, &p) in params.iter().enumerate() {
        assert_eq!(
            module.value(p).unwrap().kind(),
            ValueKind::Param {
                function: func,
                index
            }
        );
    }
}

#[test]
fn add_function_rejects_unknown_types() {
    let mut module = Module::new("m");
    let err = module
        .add_function("g", TypeId::NONE, &[])
        .unwrap_err();
    assert_eq!(err, IrError::UnknownType(TypeId::NONE));
    assert_eq!(module.functions().count(), 0);
}

#[test]
fn duplicate_function_names_are_uniqued() {
    let mut module = Module::new("m");
    let i = module.i32_type();
    let a = module.add_function("f", i, &[]).unwrap();
    let b = module.add_function("f", i, &[]).unwrap();
    let c = module.add_function("f", i, &[]).unwrap();
    assert_eq!(module.function(a).unwrap().name(), "f");
    assert_eq!(module.function(b).unwrap().name(), "f.1");
    assert_eq!(module.function(c).unwrap().name(), "f.2");
    assert_eq!(module.function_by_name("f.1"), Some(b));
}

#[test]
fn blocks_attach_in_order() {
    let (mut module, func, entry) = setup();
    let second = module.append_block(func, "entry").unwrap();
    assert_eq!(module.function(func).unwrap().blocks(), &[entry, second]);
    assert_eq!(module.block(second).unwrap().function(), func);
    assert!(!module.function(func).unwrap().is_declaration());
}

#[test]
fn append_block_to_unknown_function_fails() {
    let mut module = Module::new("m");
    assert_eq!(
        module.append_block(FunctionId::NONE, "entry"),
        Err(IrError::UnknownFunction(FunctionId::NONE))
    );
}

// -- Constants --

#[test]
fn int_constants_are_uniqued() {
    let mut module = Module::new("m");
    let i = module.i32_type();
    let a = module.const_int(i, 5).unwrap();
    let b = module.const_int(i, 5).unwrap();
    let c = module.const_int(i, 6).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn int_constants_wrap_to_width() {
    let mut module = Module::new("m");
    let i = module.i32_type();
    let big = module.const_int(i, i64::from(u32::MAX)).unwrap();
    assert_eq!(module.value(big).unwrap().as_const_int(), Some(-1));
}

#[test]
fn int_constant_of_float_type_fails() {
    let mut module = Module::new("m");
    let f = module.float_type();
    assert_eq!(
        module.const_int(f, 1),
        Err(IrError::NotAnIntegerType {
            ty: TypeKind::Float
        })
    );
}

#[test]
fn naming_a_constant_is_ignored() {
    let mut module = Module::new("m");
    let i = module.i32_type();
    let c = module.const_int(i, 3).unwrap();
    module.set_value_name(c, "three").unwrap();
    assert_eq!(module.value(c).unwrap().name(), "");
}

// -- Instructions --

#[test]
fn binary_on_params_appends_instruction() {
    let (mut module, func, entry) = setup();
    let params = module.function(func).unwrap().params().to_vec();
    let sum = module
        .build_binary(entry, BinaryOp::Add, params[0], params[1])
        .unwrap();

    let block = module.block(entry).unwrap();
    assert_eq!(
        block.insts(),
        &[Inst::Binary {
            op: BinaryOp::Add,
            lhs: params[0],
            rhs: params[1],
            result: sum,
        }]
    );
    assert_eq!(
        module.value(sum).unwrap().kind(),
        ValueKind::Inst { block: entry }
    );
}

#[test]
fn binary_on_constants_folds() {
    let (mut module, _, entry) = setup();
    let i = module.i32_type();
    let five = module.const_int(i, 5).unwrap();
    let seven = module.const_int(i, 7).unwrap();

    let sum = module.build_binary(entry, BinaryOp::Add, five, seven).unwrap();
    let diff = module.build_binary(entry, BinaryOp::Sub, five, seven).unwrap();
    let prod = module.build_binary(entry, BinaryOp::Mul, five, seven).unwrap();

    assert_eq!(module.value(sum).unwrap().as_const_int(), Some(12));
    assert_eq!(module.value(diff).unwrap().as_const_int(), Some(-2));
    assert_eq!(module.value(prod).unwrap().as_const_int(), Some(35));
    assert!(module.block(entry).unwrap().insts().is_empty());
}

#[test]
fn folding_wraps_like_i32() {
    let (mut module, _, entry) = setup();
    let i = module.i32_type();
    let max = module.const_int(i, i64::from(i32::MAX)).unwrap();
    let one = module.const_int(i, 1).unwrap();
    let wrapped = module.build_binary(entry, BinaryOp::Add, max, one).unwrap();
    assert_eq!(
        module.value(wrapped).unwrap().as_const_int(),
        Some(i64::from(i32::MIN))
    );
}

#[test]
fn mixed_operand_types_are_rejected() {
    let mut module = Module::new("m");
    let (i, f) = (module.i32_type(), module.float_type());
    let func = module.add_function("g", i, &[i, f]).unwrap();
    let entry = module.append_block(func, "entry").unwrap();
    let params = module.function(func).unwrap().params().to_vec();

    assert_eq!(
        module.build_binary(entry, BinaryOp::Mul, params[0], params[1]),
        Err(IrError::OperandTypeMismatch {
            op: BinaryOp::Mul,
            lhs: TypeKind::Int { bits: 32 },
            rhs: TypeKind::Float,
        })
    );
    assert_eq!(
        module.build_binary(entry, BinaryOp::Add, params[1], params[1]),
        Err(IrError::NonIntegerOperand {
            op: BinaryOp::Add,
            ty: TypeKind::Float,
        })
    );
    assert!(module.block(entry).unwrap().insts().is_empty());
}

#[test]
fn operands_from_another_function_are_rejected() {
    let (mut module, func, _) = setup();
    let i = module.i32_type();
    let other = module.add_function("h", i, &[]).unwrap();
    let other_entry = module.append_block(other, "start").unwrap();
    let a = module.function(func).unwrap().params()[0];

    assert_eq!(
        module.build_ret(other_entry, a),
        Err(IrError::ForeignOperand {
            value: a,
            block: "start".to_owned(),
        })
    );
}

#[test]
fn ret_terminates_block() {
    let (mut module, func, entry) = setup();
    let a = module.function(func).unwrap().params()[0];
    module.build_ret(entry, a).unwrap();

    let block = module.block(entry).unwrap();
    assert!(block.is_terminated());
    assert_eq!(block.terminator(), Some(&Inst::Ret { value: a }));
}

#[test]
fn appending_after_terminator_fails() {
    let (mut module, func, entry) = setup();
    let params = module.function(func).unwrap().params().to_vec();
    module.build_ret(entry, params[0]).unwrap();

    let expected = IrError::BlockTerminated {
        block: "entry".to_owned(),
    };
    assert_eq!(module.build_ret(entry, params[1]), Err(expected.clone()));
    assert_eq!(
        module.build_binary(entry, BinaryOp::Add, params[0], params[1]),
        Err(expected)
    );
    assert_eq!(module.block(entry).unwrap().insts().len(), 1);
}

#[test]
fn none_value_is_unknown() {
    let (mut module, _, entry) = setup();
    assert_eq!(
        module.build_ret(entry, ValueId::NONE),
        Err(IrError::UnknownValue(ValueId::NONE))
    );
}

#[test]
fn wrap_to_width_sign_extends() {
    assert_eq!(wrap_to_width(0xFF, 8), -1);
    assert_eq!(wrap_to_width(0x7F, 8), 127);
    assert_eq!(wrap_to_width(-5, 64), -5);
}

#[test]
fn const_i32_shares_uniquing_with_const_int() {
    let mut module = Module::new("m");
    let i = module.i32_type();
    let a = module.const_i32(-4);
    let b = module.const_int(i, -4).unwrap();
    assert_eq!(a, b);
    assert_eq!(module.value_type(a), Ok(TypeId::I32));
}
