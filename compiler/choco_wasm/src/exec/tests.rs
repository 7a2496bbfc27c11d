use choco_rt::RuntimeError;
use pretty_assertions::assert_eq;

use super::*;
use crate::ModuleConfig;

fn module_with(functions: Vec<Function>, globals: &[&str]) -> Module {
    Module {
        config: ModuleConfig::default().with_memory_pages(1),
        globals: globals.iter().map(|g| (*g).to_owned()).collect(),
        functions,
        main: Function::new("main", vec![], vec![], vec![Instr::I32Const(0)]),
    }
}

fn unary(name: &str, body: Vec<Instr>) -> Function {
    Function::new(name, vec!["x".to_owned()], vec!["t".to_owned()], body)
}

#[test]
fn arithmetic_follows_target_semantics() {
    assert_eq!(binary(NumOp::Add, i32::MAX, 1), Ok(i32::MIN));
    assert_eq!(binary(NumOp::DivS, -7, 2), Ok(-3));
    assert_eq!(binary(NumOp::RemS, -7, 2), Ok(-1));
    assert_eq!(binary(NumOp::RemS, i32::MIN, -1), Ok(0));
    assert_eq!(binary(NumOp::RemU, -1, 10), Ok(5));
    assert_eq!(binary(NumOp::DivS, 1, 0), Err(Trap::DivideByZero));
    assert_eq!(binary(NumOp::DivS, i32::MIN, -1), Err(Trap::IntegerOverflow));
    assert_eq!(binary(NumOp::LeS, -1, 0), Ok(1));
    assert_eq!(binary(NumOp::And, 1, 0), Ok(0));
}

#[test]
fn fall_through_returns_stack_top() {
    let module = module_with(
        vec![unary(
            "double",
            vec![Instr::local_get("x"), Instr::local_get("x"), Instr::Num(NumOp::Add)],
        )],
        &[],
    );
    let mut machine = Machine::new(&module);
    assert_eq!(machine.call("double", &[21]), Ok(42));
}

#[test]
fn blocks_loops_and_branches() {
    // t = 0; loop { if x == 0 break; t += x; x -= 1 } ; t
    let body = vec![
        Instr::Block {
            label: "out".to_owned(),
            body: vec![Instr::Loop {
                label: "top".to_owned(),
                body: vec![
                    Instr::local_get("x"),
                    Instr::I32Const(0),
                    Instr::Num(NumOp::Eq),
                    Instr::BrIf("out".to_owned()),
                    Instr::local_get("t"),
                    Instr::local_get("x"),
                    Instr::Num(NumOp::Add),
                    Instr::local_set("t"),
                    Instr::local_get("x"),
                    Instr::I32Const(1),
                    Instr::Num(NumOp::Sub),
                    Instr::local_set("x"),
                    Instr::br("top"),
                ],
            }],
        },
        Instr::local_get("t"),
    ];
    let module = module_with(vec![unary("sum", body)], &[]);
    let mut machine = Machine::new(&module);
    assert_eq!(machine.call("sum", &[10]), Ok(55));
}

#[test]
fn br_table_out_of_range_takes_default() {
    let body = vec![
        Instr::Block {
            label: "b".to_owned(),
            body: vec![
                Instr::Block {
                    label: "a".to_owned(),
                    body: vec![
                        Instr::local_get("x"),
                        Instr::BrTable {
                            targets: vec!["a".to_owned()],
                            default: "b".to_owned(),
                        },
                    ],
                },
                Instr::I32Const(1),
                Instr::Return,
            ],
        },
        Instr::I32Const(2),
    ];
    let module = module_with(vec![unary("pick", body)], &[]);
    let mut machine = Machine::new(&module);
    assert_eq!(machine.call("pick", &[0]), Ok(1));
    assert_eq!(machine.call("pick", &[1]), Ok(2));
    assert_eq!(machine.call("pick", &[-1]), Ok(2));
}

#[test]
fn memory_primitives() {
    let module = module_with(vec![], &[]);
    let mut machine = Machine::new(&module);
    let a = machine.alloc(2).unwrap();
    let b = machine.alloc(1).unwrap();
    assert_eq!(a, 4);
    assert_eq!(b, 12);
    assert_eq!(machine.load(a, 1), Ok(0));
    machine.store(a, 1, -9).unwrap();
    assert_eq!(machine.load(a, 1), Ok(-9));
    assert_eq!(machine.load(b - 4, 0), Ok(-9));
}

#[test]
fn none_dereference_traps() {
    let module = module_with(vec![], &[]);
    let mut machine = Machine::new(&module);
    assert_eq!(
        machine.load(0, 0),
        Err(Trap::Runtime(RuntimeError::NoneDereference))
    );
    assert_eq!(
        machine.store(0, 1, 1),
        Err(Trap::Runtime(RuntimeError::NoneDereference))
    );
}

#[test]
fn out_of_bounds_traps() {
    let module = module_with(vec![], &[]);
    let mut machine = Machine::new(&module);
    assert!(matches!(machine.load(4, 100_000), Err(Trap::OutOfBounds { .. })));
    assert!(matches!(machine.alloc(1 << 20), Err(Trap::OutOfBounds { .. })));
    assert!(matches!(machine.alloc(-1), Err(Trap::OutOfBounds { .. })));
}

#[test]
fn host_calls_and_builtins() {
    let body = vec![
        Instr::local_get("x"),
        Instr::call(host::PRINT_NUM),
        Instr::call("factorial"),
        Instr::call(host::PRINT_NUM),
        Instr::local_set("t"),
        Instr::I32Const(1),
        Instr::call(host::PRINT_BOOL),
        Instr::call(host::PRINT_NONE),
        Instr::local_get("t"),
    ];
    let module = module_with(vec![unary("f", body)], &[]);
    let mut machine = Machine::new(&module);
    assert_eq!(machine.call("f", &[5]), Ok(120));
    assert_eq!(machine.output(), &["5", "120", "True", "None"]);
}

#[test]
fn builtin_errors_become_traps() {
    let body = vec![Instr::local_get("x"), Instr::I32Const(0), Instr::call("gcd")];
    let module = module_with(vec![unary("f", body)], &[]);
    let mut machine = Machine::new(&module);
    assert!(matches!(
        machine.call("f", &[0]),
        Err(Trap::Runtime(RuntimeError::Domain { builtin: "gcd", .. }))
    ));
}

#[test]
fn globals_start_at_zero() {
    let body = vec![
        Instr::GlobalGet("g".to_owned()),
        Instr::local_get("x"),
        Instr::Num(NumOp::Add),
        Instr::GlobalSet("g".to_owned()),
        Instr::GlobalGet("g".to_owned()),
    ];
    let module = module_with(vec![unary("bump", body)], &["g"]);
    let mut machine = Machine::new(&module);
    assert_eq!(machine.global("g"), Some(0));
    machine.call("bump", &[3]).unwrap();
    assert_eq!(machine.call("bump", &[4]), Ok(7));
    assert_eq!(machine.global("missing"), None);
}

#[test]
fn unknown_names_trap() {
    let module = module_with(
        vec![
            unary("a", vec![Instr::call("nothing")]),
            unary("b", vec![Instr::GlobalGet("nope".to_owned())]),
            unary("c", vec![Instr::local_get("nope")]),
            unary("d", vec![Instr::br("nowhere")]),
            unary("e", vec![Instr::Num(NumOp::Add)]),
        ],
        &[],
    );
    let mut machine = Machine::new(&module);
    assert_eq!(machine.call("a", &[0]), Err(Trap::UnknownFunction("nothing".to_owned())));
    assert_eq!(machine.call("b", &[0]), Err(Trap::UnknownGlobal("nope".to_owned())));
    assert_eq!(machine.call("c", &[0]), Err(Trap::UnknownLocal("nope".to_owned())));
    assert_eq!(machine.call("d", &[0]), Err(Trap::UnknownBranchTarget("nowhere".to_owned())));
    assert_eq!(machine.call("e", &[0]), Err(Trap::StackUnderflow));
    assert!(matches!(machine.call("a", &[]), Err(Trap::Arity { expected: 1, found: 0, .. })));
}

#[test]
fn fuel_bounds_infinite_loops() {
    let body = vec![Instr::Loop {
        label: "spin".to_owned(),
        body: vec![Instr::br("spin")],
    }];
    let module = module_with(vec![unary("spin", body)], &[]);
    let mut machine = Machine::new(&module).with_fuel(1_000);
    assert_eq!(machine.call("spin", &[0]), Err(Trap::FuelExhausted));
}

#[test]
fn runaway_recursion_traps() {
    let body = vec![Instr::local_get("x"), Instr::call("down")];
    let module = module_with(vec![unary("down", body)], &[]);
    let mut machine = Machine::new(&module);
    assert_eq!(machine.call("down", &[0]), Err(Trap::CallDepthExceeded));
}
