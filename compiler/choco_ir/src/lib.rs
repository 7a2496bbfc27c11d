//! Typed intermediate representation for the Choco backend.
//!
//! The IR is produced upstream by the type checker and consumed here as a
//! precondition: every node is assumed well-typed and well-scoped. Nothing in
//! this crate validates types.
//!
//! # Shape
//!
//! - **[`Program`]**: global initializers, functions, classes, and a top-level
//!   body split into labeled basic blocks
//! - **[`FunDef`]** / **[`Class`]**: function and class definitions
//! - **[`BasicBlock`]**: a [`Label`] plus straight-line [`Stmt`]s, ended by
//!   an explicit jump or by falling into the next block
//! - **[`Expr`]** / **[`Value`]**: flat expressions over already-evaluated
//!   operands (no nesting beyond one operator)
//!
//! Every type derives serde traits so the driver can load programs from JSON.

mod cfg;
mod ops;
mod program;
mod stmt;
mod ty;
mod value;

pub use cfg::{find_block, BlockExit};
pub use ops::{BinOp, UniOp};
pub use program::{BasicBlock, Class, FunDef, Label, Parameter, Program, VarInit};
pub use stmt::{Expr, Stmt};
pub use ty::Type;
pub use value::Value;
