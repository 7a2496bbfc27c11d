//! Statements and expressions.

use serde::{Deserialize, Serialize};

use crate::{BinOp, Label, UniOp, Value};

/// A flat expression. Operands are [`Value`]s; nested computation has
/// already been split into temporaries upstream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Expr {
    Value {
        value: Value,
    },
    BinOp {
        op: BinOp,
        left: Value,
        right: Value,
    },
    UniOp {
        op: UniOp,
        expr: Value,
    },
    /// One-argument builtin. `print` is resolved by the argument's type.
    Builtin1 {
        name: String,
        arg: Value,
    },
    Builtin2 {
        name: String,
        left: Value,
        right: Value,
    },
    /// Call to a user function, a mangled method, or a runtime routine.
    Call {
        name: String,
        arguments: Vec<Value>,
    },
    /// Allocate `amount` words from the arena.
    Alloc {
        amount: Value,
    },
    /// Read the word at `start + offset` words. `start` must not be none.
    Load {
        start: Value,
        offset: Value,
    },
}

impl Expr {
    pub fn value(value: Value) -> Self {
        Expr::Value { value }
    }

    pub fn binop(op: BinOp, left: Value, right: Value) -> Self {
        Expr::BinOp { op, left, right }
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Expr::Call {
            name: name.into(),
            arguments,
        }
    }
}

/// A statement inside a basic block.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Stmt {
    Assign {
        name: String,
        value: Expr,
    },
    /// Write `value` to the word at `start + offset` words.
    Store {
        start: Value,
        offset: Value,
        value: Value,
    },
    Return {
        value: Value,
    },
    /// Evaluate for side effects; the result lands in a scratch slot.
    Expr {
        expr: Expr,
    },
    Pass,
    Jmp {
        lbl: Label,
    },
    IfJmp {
        cond: Value,
        thn: Label,
        els: Label,
    },
}

impl Stmt {
    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Stmt::Assign {
            name: name.into(),
            value,
        }
    }

    pub fn jmp(lbl: impl Into<Label>) -> Self {
        Stmt::Jmp { lbl: lbl.into() }
    }

    pub fn ifjmp(cond: Value, thn: impl Into<Label>, els: impl Into<Label>) -> Self {
        Stmt::IfJmp {
            cond,
            thn: thn.into(),
            els: els.into(),
        }
    }

    /// Returns `true` if control never proceeds to the next statement.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Stmt::Return { .. } | Stmt::Jmp { .. } | Stmt::IfJmp { .. }
        )
    }
}
