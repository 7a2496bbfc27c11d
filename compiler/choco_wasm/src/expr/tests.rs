use choco_ir::{BasicBlock, BinOp, Expr, Type, UniOp, Value};
use pretty_assertions::assert_eq;

use super::*;

fn cx() -> LoweringCx {
    LoweringCx::new("f", ["x"], &[BasicBlock::new("entry", vec![])]).unwrap()
}

fn lower(expr: &Expr) -> Result<Vec<Instr>, CodegenError> {
    let mut out = Vec::new();
    lower_expr(&cx(), expr, &mut out)?;
    Ok(out)
}

#[test]
fn literals() {
    let cx = cx();
    let mut out = Vec::new();
    lower_value(&cx, &Value::num(-7), &mut out);
    lower_value(&cx, &Value::wasmint(16), &mut out);
    lower_value(&cx, &Value::bool(true), &mut out);
    lower_value(&cx, &Value::bool(false), &mut out);
    lower_value(&cx, &Value::None, &mut out);
    assert_eq!(
        out,
        vec![
            Instr::I32Const(-7),
            Instr::I32Const(16),
            Instr::I32Const(1),
            Instr::I32Const(0),
            Instr::I32Const(0),
        ]
    );
}

#[test]
fn identifiers_resolve_local_then_global() {
    let cx = cx();
    let mut out = Vec::new();
    lower_value(&cx, &Value::id("x", Type::Num), &mut out);
    lower_value(&cx, &Value::id("g", Type::Num), &mut out);
    assert_eq!(out, vec![Instr::local_get("x"), Instr::GlobalGet("g".to_owned())]);
}

#[test]
fn binop_operands_left_to_right() {
    let out = lower(&Expr::binop(BinOp::Minus, Value::id("x", Type::Num), Value::num(1))).unwrap();
    assert_eq!(
        out,
        vec![Instr::local_get("x"), Instr::I32Const(1), Instr::Num(NumOp::Sub)]
    );
}

#[test]
fn operator_mapping() {
    let mnemonics: Vec<&str> = BinOp::ALL.iter().map(|op| binop(*op).mnemonic()).collect();
    assert_eq!(
        mnemonics,
        vec![
            "i32.add", "i32.sub", "i32.mul", "i32.div_s", "i32.rem_s", "i32.eq", "i32.ne",
            "i32.le_s", "i32.ge_s", "i32.lt_s", "i32.gt_s", "i32.eq", "i32.and", "i32.or",
        ]
    );
}

#[test]
fn unary_operators() {
    let neg = lower(&Expr::UniOp { op: UniOp::Neg, expr: Value::num(5) }).unwrap();
    assert_eq!(
        neg,
        vec![Instr::I32Const(0), Instr::I32Const(5), Instr::Num(NumOp::Sub)]
    );
    let not = lower(&Expr::UniOp { op: UniOp::Not, expr: Value::bool(true) }).unwrap();
    assert_eq!(
        not,
        vec![Instr::I32Const(0), Instr::I32Const(1), Instr::Num(NumOp::Eq)]
    );
}

#[test]
fn print_dispatches_on_static_type() {
    let print = |arg: Value| Expr::Builtin1 {
        name: "print".to_owned(),
        arg,
    };
    let last_call = |expr: Expr| lower(&expr).unwrap().pop();
    assert_eq!(last_call(print(Value::num(1))), Some(Instr::call("print_num")));
    assert_eq!(last_call(print(Value::bool(true))), Some(Instr::call("print_bool")));
    assert_eq!(last_call(print(Value::None)), Some(Instr::call("print_none")));
    assert_eq!(
        last_call(print(Value::id("flag", Type::Bool))),
        Some(Instr::call("print_bool"))
    );
}

#[test]
fn print_of_object_has_no_overload() {
    let expr = Expr::Builtin1 {
        name: "print".to_owned(),
        arg: Value::id("p", Type::class("Point")),
    };
    assert_eq!(
        lower(&expr),
        Err(CodegenError::NoPrintOverload { ty: Type::class("Point") })
    );
}

#[test]
fn other_builtins_call_by_name() {
    let one = lower(&Expr::Builtin1 {
        name: "factorial".to_owned(),
        arg: Value::num(5),
    })
    .unwrap();
    assert_eq!(one, vec![Instr::I32Const(5), Instr::call("factorial")]);

    let two = lower(&Expr::Builtin2 {
        name: "gcd".to_owned(),
        left: Value::num(4),
        right: Value::num(6),
    })
    .unwrap();
    assert_eq!(
        two,
        vec![Instr::I32Const(4), Instr::I32Const(6), Instr::call("gcd")]
    );
}

#[test]
fn user_call_lowers_arguments_in_order() {
    let out = lower(&Expr::call(
        "Point$norm",
        vec![Value::id("x", Type::Num), Value::num(2), Value::None],
    ))
    .unwrap();
    assert_eq!(
        out,
        vec![
            Instr::local_get("x"),
            Instr::I32Const(2),
            Instr::I32Const(0),
            Instr::call("Point$norm"),
        ]
    );
}

#[test]
fn memory_expressions() {
    let alloc = lower(&Expr::Alloc { amount: Value::num(3) }).unwrap();
    assert_eq!(alloc, vec![Instr::I32Const(3), Instr::call("alloc")]);

    let load = lower(&Expr::Load {
        start: Value::id("x", Type::class("Point")),
        offset: Value::num(1),
    })
    .unwrap();
    assert_eq!(
        load,
        vec![
            Instr::local_get("x"),
            Instr::call("assert_not_none"),
            Instr::I32Const(1),
            Instr::call("load"),
        ]
    );
}
