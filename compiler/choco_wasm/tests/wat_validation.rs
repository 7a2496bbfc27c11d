//! Rendered modules assemble and validate as WebAssembly.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use choco_ir::{BasicBlock, BinOp, Class, Expr, FunDef, Parameter, Program, Stmt, Type, UniOp, Value, VarInit};
use choco_wasm::exec::Machine;
use choco_wasm::runtime::set;
use choco_wasm::{compile_module, GlobalEnv, Module, ModuleConfig};

fn num(name: &str) -> Value {
    Value::id(name, Type::Num)
}

fn cell() -> Value {
    Value::id("p", Type::class("Cell"))
}

fn print(value: Value) -> Stmt {
    Stmt::Expr {
        expr: Expr::Builtin1 {
            name: "print".to_owned(),
            arg: value,
        },
    }
}

fn call(name: &str, args: Vec<Value>) -> Stmt {
    Stmt::Expr {
        expr: Expr::call(name, args),
    }
}

fn fact() -> FunDef {
    FunDef {
        name: "fact".to_owned(),
        parameters: vec![Parameter::new("n", Type::Num)],
        ret: Type::Num,
        inits: vec![VarInit::new("r", Type::Num, Value::num(0))],
        body: vec![
            BasicBlock::new(
                "entry",
                vec![
                    Stmt::assign("r", Expr::binop(BinOp::Lte, num("n"), Value::num(1))),
                    Stmt::ifjmp(Value::id("r", Type::Bool), "base", "rec"),
                ],
            ),
            BasicBlock::new("base", vec![Stmt::Return { value: Value::num(1) }]),
            BasicBlock::new(
                "rec",
                vec![
                    Stmt::assign("r", Expr::binop(BinOp::Minus, num("n"), Value::num(1))),
                    Stmt::assign("r", Expr::call("fact", vec![num("r")])),
                    Stmt::assign("r", Expr::binop(BinOp::Mul, num("n"), num("r"))),
                    Stmt::Return { value: num("r") },
                ],
            ),
        ],
    }
}

fn cell_class() -> Class {
    let get = FunDef {
        name: "get".to_owned(),
        parameters: vec![Parameter::new("self", Type::class("Cell"))],
        ret: Type::Num,
        inits: vec![VarInit::new("v", Type::Num, Value::num(0))],
        body: vec![BasicBlock::new(
            "entry",
            vec![
                Stmt::assign(
                    "v",
                    Expr::Load {
                        start: Value::id("self", Type::class("Cell")),
                        offset: Value::wasmint(0),
                    },
                ),
                Stmt::Return { value: num("v") },
            ],
        )],
    };
    Class {
        name: "Cell".to_owned(),
        fields: vec![VarInit::new("v", Type::Num, Value::num(0))],
        methods: vec![get],
    }
}

/// Touches functions, a method, the set library, memory, branches,
/// builtins and every print overload.
fn kitchen_sink() -> Program {
    let s = || num("s");
    Program {
        inits: vec![
            VarInit::new("s", Type::Num, Value::None),
            VarInit::new("p", Type::class("Cell"), Value::None),
            VarInit::new("out", Type::Num, Value::num(0)),
            VarInit::new("g", Type::Num, Value::num(0)),
            VarInit::new("flag", Type::Bool, Value::bool(false)),
            VarInit::new("nflag", Type::Bool, Value::bool(false)),
        ],
        funs: vec![fact()],
        classes: vec![cell_class()],
        body: vec![
            BasicBlock::new(
                "entry",
                vec![
                    Stmt::assign("s", Expr::Alloc { amount: Value::wasmint(10) }),
                    call(set::ADD, vec![s(), Value::num(3)]),
                    call(set::ADD, vec![s(), Value::num(7)]),
                    call(set::REMOVE, vec![s(), Value::num(3)]),
                    Stmt::assign("out", Expr::call(set::LENGTH, vec![s()])),
                    Stmt::assign("flag", Expr::call(set::CONTAINS, vec![s(), Value::num(7)])),
                    Stmt::assign("p", Expr::Alloc { amount: Value::wasmint(1) }),
                    Stmt::Store {
                        start: cell(),
                        offset: Value::wasmint(0),
                        value: Value::num(41),
                    },
                    Stmt::assign("out", Expr::call("Cell$get", vec![cell()])),
                    Stmt::assign("out", Expr::call("fact", vec![Value::num(5)])),
                    Stmt::assign(
                        "g",
                        Expr::Builtin2 {
                            name: "gcd".to_owned(),
                            left: num("out"),
                            right: Value::num(12),
                        },
                    ),
                    Stmt::assign(
                        "nflag",
                        Expr::UniOp {
                            op: UniOp::Not,
                            expr: Value::id("flag", Type::Bool),
                        },
                    ),
                    print(num("out")),
                    print(Value::id("flag", Type::Bool)),
                    print(Value::None),
                    Stmt::ifjmp(Value::id("flag", Type::Bool), "yes", "no"),
                ],
            ),
            BasicBlock::new("no", vec![Stmt::Return { value: Value::num(-1) }]),
            BasicBlock::new("yes", vec![print(num("g")), Stmt::jmp("end")]),
            BasicBlock::new("end", vec![Stmt::Pass]),
        ],
    }
}

fn validate(module: &Module) {
    let text = module.to_wat();
    let bytes = wat::parse_str(&text).unwrap_or_else(|err| panic!("{err}\n{text}"));
    wasmparser::Validator::new()
        .validate_all(&bytes)
        .unwrap_or_else(|err| panic!("{err}\n{text}"));
}

#[test]
fn full_program_is_valid_wasm() {
    let (module, _) = compile_module(&kitchen_sink(), &GlobalEnv::new(), &ModuleConfig::default()).unwrap();
    validate(&module);

    let mut machine = Machine::new(&module);
    assert_eq!(machine.run_main(), Ok(12));
    assert_eq!(machine.output(), &["120", "True", "None", "12"]);
    assert_eq!(machine.global("nflag"), Some(0));
}

#[test]
fn empty_program_is_valid_wasm() {
    let config = ModuleConfig::default().with_runtime(false).with_main_export("main");
    let (module, _) = compile_module(&Program::default(), &GlobalEnv::new(), &config).unwrap();
    validate(&module);
}

#[test]
fn runtime_library_alone_is_valid_wasm() {
    let config = ModuleConfig::default().with_memory_pages(1);
    let (module, _) = compile_module(&Program::default(), &GlobalEnv::new(), &config).unwrap();
    assert!(module.function(set::REMOVE).is_some());
    validate(&module);
}
