//! Top-level definitions: programs, functions, classes, blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Stmt, Type, Value};

/// Basic block label.
///
/// Stored without the target's `$` sigil; the renderer adds it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label(name.to_owned())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label(name)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A labeled straight-line sequence of statements.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasicBlock {
    pub label: Label,
    pub stmts: Vec<Stmt>,
}

impl BasicBlock {
    pub fn new(label: impl Into<Label>, stmts: Vec<Stmt>) -> Self {
        Self {
            label: label.into(),
            stmts,
        }
    }
}

/// A variable declaration with its literal initializer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarInit {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub value: Value,
}

impl VarInit {
    pub fn new(name: impl Into<String>, ty: Type, value: Value) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A function definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunDef {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub ret: Type,
    #[serde(default)]
    pub inits: Vec<VarInit>,
    pub body: Vec<BasicBlock>,
}

/// A class definition. Field initializers are literal defaults.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<VarInit>,
    #[serde(default)]
    pub methods: Vec<FunDef>,
}

/// A whole compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub inits: Vec<VarInit>,
    #[serde(default)]
    pub funs: Vec<FunDef>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub body: Vec<BasicBlock>,
}
