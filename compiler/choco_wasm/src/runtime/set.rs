//! Hashed set over linear memory.
//!
//! A set is a bucket array of [`SET_BUCKETS`] words obtained from
//! `alloc(SET_BUCKETS)`. Each bucket holds 0 (none) or the address of the
//! first node of its chain. A node is two words, `{key, next}`. Keys hash to
//! bucket `key rem_u SET_BUCKETS`, at byte address `base + hash * 4`. Nodes
//! are never freed; `remove` only unlinks them.
//!
//! This is the same algorithm as [`choco_rt::set::ChainedSet`], expressed
//! over raw addresses.

use choco_rt::set::{NODE_WORDS, SET_BUCKETS, WORD_BYTES};

use crate::{host, Function, Instr, NumOp};

pub const CREATE_ENTRY: &str = "set$CreateEntry";
pub const ADD: &str = "set$add";
pub const CONTAINS: &str = "set$contains";
pub const LENGTH: &str = "set$length";
pub const REMOVE: &str = "set$remove";

/// Byte offset of `next` within a node.
const NEXT: u32 = 4;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const BUCKETS: i32 = SET_BUCKETS as i32;

pub fn functions() -> Vec<Function> {
    vec![create_entry(), add(), contains(), length(), remove()]
}

fn get(name: &str) -> Instr {
    Instr::local_get(name)
}

fn set(name: &str) -> Instr {
    Instr::local_set(name)
}

fn num(op: NumOp) -> Instr {
    Instr::Num(op)
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

/// `bucket = base + (key rem_u SET_BUCKETS) * WORD_BYTES`
fn bucket_address() -> [Instr; 8] {
    [
        get("base"),
        get("key"),
        Instr::I32Const(BUCKETS),
        num(NumOp::RemU),
        Instr::I32Const(WORD_BYTES),
        num(NumOp::Mul),
        num(NumOp::Add),
        set("bucket"),
    ]
}

/// `set$CreateEntry(key)`: allocate a node `{key, none}` and return it.
fn create_entry() -> Function {
    let body = vec![
        Instr::I32Const(NODE_WORDS),
        Instr::call(host::ALLOC),
        set("node"),
        get("node"),
        get("key"),
        Instr::I32Store { offset: 0 },
        get("node"),
        Instr::I32Const(0),
        Instr::I32Store { offset: NEXT },
        get("node"),
        Instr::Return,
    ];
    Function::new(CREATE_ENTRY, names(&["key"]), names(&["node"]), body)
}

/// `set$add(base, key)`: insert `key`; a present key is left alone.
fn add() -> Function {
    let mut body = bucket_address().to_vec();
    body.extend([
        // Empty bucket: the new node becomes the head.
        get("bucket"),
        Instr::I32Load { offset: 0 },
        Instr::I32Const(0),
        num(NumOp::Eq),
        Instr::If {
            then: vec![
                get("bucket"),
                get("key"),
                Instr::call(CREATE_ENTRY),
                Instr::I32Store { offset: 0 },
                Instr::I32Const(0),
                Instr::Return,
            ],
            els: vec![],
        },
        get("bucket"),
        Instr::I32Load { offset: 0 },
        set("node"),
        Instr::Block {
            label: "done".to_owned(),
            body: vec![Instr::Loop {
                label: "walk".to_owned(),
                body: vec![
                    get("node"),
                    Instr::I32Load { offset: 0 },
                    get("key"),
                    num(NumOp::Eq),
                    Instr::BrIf("done".to_owned()),
                    get("node"),
                    Instr::I32Load { offset: NEXT },
                    set("next"),
                    // End of chain: link a new node after the last one.
                    get("next"),
                    Instr::I32Const(0),
                    num(NumOp::Eq),
                    Instr::If {
                        then: vec![
                            get("node"),
                            get("key"),
                            Instr::call(CREATE_ENTRY),
                            Instr::I32Store { offset: NEXT },
                            Instr::br("done"),
                        ],
                        els: vec![],
                    },
                    get("next"),
                    set("node"),
                    Instr::br("walk"),
                ],
            }],
        },
        Instr::I32Const(0),
        Instr::Return,
    ]);
    Function::new(ADD, names(&["base", "key"]), names(&["bucket", "node", "next"]), body)
}

/// `set$contains(base, key)`: 1 if `key` is present, else 0.
fn contains() -> Function {
    let mut body = bucket_address().to_vec();
    body.extend([
        get("bucket"),
        Instr::I32Load { offset: 0 },
        set("node"),
        Instr::Block {
            label: "miss".to_owned(),
            body: vec![Instr::Loop {
                label: "walk".to_owned(),
                body: vec![
                    get("node"),
                    Instr::I32Const(0),
                    num(NumOp::Eq),
                    Instr::BrIf("miss".to_owned()),
                    get("node"),
                    Instr::I32Load { offset: 0 },
                    get("key"),
                    num(NumOp::Eq),
                    Instr::If {
                        then: vec![Instr::I32Const(1), Instr::Return],
                        els: vec![],
                    },
                    get("node"),
                    Instr::I32Load { offset: NEXT },
                    set("node"),
                    Instr::br("walk"),
                ],
            }],
        },
        Instr::I32Const(0),
        Instr::Return,
    ]);
    Function::new(CONTAINS, names(&["base", "key"]), names(&["bucket", "node"]), body)
}

/// `set$length(base)`: number of keys across all buckets.
fn length() -> Function {
    let body = vec![
        Instr::I32Const(0),
        set("i"),
        Instr::I32Const(0),
        set("count"),
        Instr::Block {
            label: "done".to_owned(),
            body: vec![Instr::Loop {
                label: "buckets".to_owned(),
                body: vec![
                    get("i"),
                    Instr::I32Const(BUCKETS),
                    num(NumOp::GeS),
                    Instr::BrIf("done".to_owned()),
                    get("base"),
                    get("i"),
                    Instr::I32Const(WORD_BYTES),
                    num(NumOp::Mul),
                    num(NumOp::Add),
                    Instr::I32Load { offset: 0 },
                    set("node"),
                    Instr::Block {
                        label: "chain_end".to_owned(),
                        body: vec![Instr::Loop {
                            label: "chain".to_owned(),
                            body: vec![
                                get("node"),
                                Instr::I32Const(0),
                                num(NumOp::Eq),
                                Instr::BrIf("chain_end".to_owned()),
                                get("count"),
                                Instr::I32Const(1),
                                num(NumOp::Add),
                                set("count"),
                                get("node"),
                                Instr::I32Load { offset: NEXT },
                                set("node"),
                                Instr::br("chain"),
                            ],
                        }],
                    },
                    get("i"),
                    Instr::I32Const(1),
                    num(NumOp::Add),
                    set("i"),
                    Instr::br("buckets"),
                ],
            }],
        },
        get("count"),
        Instr::Return,
    ];
    Function::new(LENGTH, names(&["base"]), names(&["i", "node", "count"]), body)
}

/// `set$remove(base, key)`: unlink every node holding `key`.
fn remove() -> Function {
    let mut body = bucket_address().to_vec();
    body.extend([
        Instr::I32Const(0),
        set("prev"),
        get("bucket"),
        Instr::I32Load { offset: 0 },
        set("node"),
        Instr::Block {
            label: "done".to_owned(),
            body: vec![Instr::Loop {
                label: "walk".to_owned(),
                body: vec![
                    get("node"),
                    Instr::I32Const(0),
                    num(NumOp::Eq),
                    Instr::BrIf("done".to_owned()),
                    get("node"),
                    Instr::I32Load { offset: NEXT },
                    set("next"),
                    get("node"),
                    Instr::I32Load { offset: 0 },
                    get("key"),
                    num(NumOp::Eq),
                    Instr::If {
                        then: vec![
                            get("prev"),
                            Instr::I32Const(0),
                            num(NumOp::Eq),
                            Instr::If {
                                then: vec![get("bucket"), get("next"), Instr::I32Store { offset: 0 }],
                                els: vec![get("prev"), get("next"), Instr::I32Store { offset: NEXT }],
                            },
                        ],
                        els: vec![get("node"), set("prev")],
                    },
                    get("next"),
                    set("node"),
                    Instr::br("walk"),
                ],
            }],
        },
        Instr::I32Const(0),
        Instr::Return,
    ]);
    Function::new(
        REMOVE,
        names(&["base", "key"]),
        names(&["bucket", "prev", "node", "next"]),
        body,
    )
}
