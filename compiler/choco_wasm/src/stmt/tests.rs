use choco_ir::{BasicBlock, Expr, Label, Stmt, Type, Value};
use pretty_assertions::assert_eq;

use super::*;
use crate::reloop::{LOOP, SELECTOR};
use crate::NumOp;

fn blocks() -> Vec<BasicBlock> {
    vec![
        BasicBlock::new("entry", vec![]),
        BasicBlock::new("then", vec![]),
        BasicBlock::new("done", vec![]),
    ]
}

fn lower(stmt: &Stmt) -> Result<Vec<Instr>, CodegenError> {
    let cx = LoweringCx::new("f", ["x"], &blocks())?;
    let mut out = Vec::new();
    lower_stmt(&cx, stmt, &mut out)?;
    Ok(out)
}

#[test]
fn assign_to_local_and_global() {
    assert_eq!(
        lower(&Stmt::assign("x", Expr::value(Value::num(1)))).unwrap(),
        vec![Instr::I32Const(1), Instr::local_set("x")]
    );
    assert_eq!(
        lower(&Stmt::assign("g", Expr::value(Value::num(1)))).unwrap(),
        vec![Instr::I32Const(1), Instr::GlobalSet("g".to_owned())]
    );
}

#[test]
fn expression_statement_lands_in_last() {
    let out = lower(&Stmt::Expr {
        expr: Expr::call("f", vec![]),
    })
    .unwrap();
    assert_eq!(out, vec![Instr::call("f"), Instr::local_set(LAST)]);
}

#[test]
fn store_calls_checked_primitive() {
    let out = lower(&Stmt::Store {
        start: Value::id("x", Type::class("Point")),
        offset: Value::wasmint(1),
        value: Value::num(9),
    })
    .unwrap();
    assert_eq!(
        out,
        vec![
            Instr::local_get("x"),
            Instr::I32Const(1),
            Instr::I32Const(9),
            Instr::call("store"),
        ]
    );
}

#[test]
fn return_is_direct() {
    assert_eq!(
        lower(&Stmt::Return { value: Value::num(3) }).unwrap(),
        vec![Instr::I32Const(3), Instr::Return]
    );
}

#[test]
fn pass_emits_nothing() {
    assert!(lower(&Stmt::Pass).unwrap().is_empty());
}

#[test]
fn jump_uses_label_index() {
    assert_eq!(
        lower(&Stmt::jmp("done")).unwrap(),
        vec![Instr::I32Const(2), Instr::local_set(SELECTOR), Instr::br(LOOP)]
    );
}

#[test]
fn conditional_jump_sets_selector_in_each_arm() {
    let out = lower(&Stmt::ifjmp(Value::id("x", Type::Bool), "then", "entry")).unwrap();
    assert_eq!(
        out,
        vec![
            Instr::local_get("x"),
            Instr::If {
                then: vec![Instr::I32Const(1), Instr::local_set(SELECTOR), Instr::br(LOOP)],
                els: vec![Instr::I32Const(0), Instr::local_set(SELECTOR), Instr::br(LOOP)],
            },
        ]
    );
}

#[test]
fn unknown_jump_target_fails_fast() {
    assert_eq!(
        lower(&Stmt::ifjmp(Value::bool(true), "then", "elsewhere")),
        Err(CodegenError::UnknownLabel {
            label: Label::from("elsewhere"),
            body: "f".to_owned(),
        })
    );
}

#[test]
fn body_statements_follow_their_block() {
    let blocks = vec![
        BasicBlock::new(
            "entry",
            vec![Stmt::assign(
                "x",
                Expr::binop(choco_ir::BinOp::Plus, Value::id("x", Type::Num), Value::num(1)),
            )],
        ),
        BasicBlock::new("exit", vec![Stmt::Return { value: Value::id("x", Type::Num) }]),
    ];
    let cx = LoweringCx::new("f", ["x"], &blocks).unwrap();
    let out = lower_body(&cx, &blocks).unwrap();
    let Some(Instr::Loop { body, .. }) = out.last() else {
        panic!("expected dispatch loop, got {out:?}");
    };
    let [Instr::Block { label, body: inner }, Instr::LocalGet(_), Instr::Return] = body.as_slice() else {
        panic!("unexpected outer nesting: {body:?}");
    };
    assert_eq!(label, "exit");
    assert_eq!(
        inner[1..].to_vec(),
        vec![
            Instr::local_get("x"),
            Instr::I32Const(1),
            Instr::Num(NumOp::Add),
            Instr::local_set("x"),
        ]
    );
}

#[test]
fn statements_after_terminator_are_not_emitted() {
    let blocks = vec![BasicBlock::new(
        "entry",
        vec![
            Stmt::Return { value: Value::num(7) },
            Stmt::assign("x", Expr::value(Value::num(-1))),
            Stmt::jmp("missing"),
        ],
    )];
    let cx = LoweringCx::new("f", ["x"], &blocks).unwrap();
    let out = lower_body(&cx, &blocks).unwrap();
    let Some(Instr::Loop { body, .. }) = out.last() else {
        panic!("expected dispatch loop, got {out:?}");
    };
    assert!(matches!(
        body.as_slice(),
        [Instr::Block { .. }, Instr::I32Const(7), Instr::Return]
    ));
}
