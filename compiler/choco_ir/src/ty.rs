//! Static type annotations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Static type of an IR value.
///
/// Only consulted by codegen to pick builtin overloads (e.g. `print`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Type {
    #[serde(rename = "number")]
    Num,
    Bool,
    None,
    Class { name: String },
}

impl Type {
    /// Shorthand for a class reference type.
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class { name: name.into() }
    }

    /// Returns `true` for class reference types.
    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class { .. })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Num => f.write_str("int"),
            Type::Bool => f.write_str("bool"),
            Type::None => f.write_str("None"),
            Type::Class { name } => f.write_str(name),
        }
    }
}
