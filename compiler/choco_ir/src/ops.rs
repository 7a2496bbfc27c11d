//! Operators.

use serde::{Deserialize, Serialize};

/// Binary operator.
///
/// Operands are always bounded machine words at this level; `Is` compares
/// identity, which for word-sized values is plain equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Plus,
    Minus,
    Mul,
    /// Signed floor division (`//`).
    IDiv,
    /// Signed remainder (`%`).
    Mod,
    Eq,
    Neq,
    Lte,
    Gte,
    Lt,
    Gt,
    Is,
    And,
    Or,
}

impl BinOp {
    /// All binary operators, in declaration order.
    pub const ALL: [BinOp; 14] = [
        BinOp::Plus,
        BinOp::Minus,
        BinOp::Mul,
        BinOp::IDiv,
        BinOp::Mod,
        BinOp::Eq,
        BinOp::Neq,
        BinOp::Lte,
        BinOp::Gte,
        BinOp::Lt,
        BinOp::Gt,
        BinOp::Is,
        BinOp::And,
        BinOp::Or,
    ];
}

/// Unary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniOp {
    Neg,
    Not,
}
