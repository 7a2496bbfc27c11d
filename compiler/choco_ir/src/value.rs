//! Leaf values.

use serde::{Deserialize, Serialize};

use crate::Type;

/// An operand: a literal or a reference to a variable.
///
/// Identifiers carry their static type so overload selection never needs
/// a symbol table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Value {
    /// Source-level integer literal.
    Num { value: i32 },
    /// Raw target word, produced by upstream desugaring (sizes, offsets).
    Wasmint { value: i32 },
    Bool { value: bool },
    None,
    Id {
        name: String,
        #[serde(rename = "type")]
        ty: Type,
    },
}

impl Value {
    pub fn num(value: i32) -> Self {
        Value::Num { value }
    }

    pub fn wasmint(value: i32) -> Self {
        Value::Wasmint { value }
    }

    pub fn bool(value: bool) -> Self {
        Value::Bool { value }
    }

    pub fn id(name: impl Into<String>, ty: Type) -> Self {
        Value::Id {
            name: name.into(),
            ty,
        }
    }

    /// Static type of this value.
    ///
    /// Raw target words are reported as numbers.
    pub fn ty(&self) -> Type {
        match self {
            Value::Num { .. } | Value::Wasmint { .. } => Type::Num,
            Value::Bool { .. } => Type::Bool,
            Value::None => Type::None,
            Value::Id { ty, .. } => ty.clone(),
        }
    }
}
