//! Choco WebAssembly Backend
//!
//! Lowers the typed IR ([`choco_ir`]) to a WebAssembly module.
//!
//! # Architecture
//!
//! ```text
//! Program ──► compile_module ──► Module ──► Module::to_wat ──► WAT text
//!    │             │                 └────► exec::Machine  ──► result, output
//!    │             ├─ lower_function / lower_class
//!    │             │     └─ lower_body ─ lower_stmt ─ lower_expr
//!    │             │           └─ reloop (selector + loop + block nest)
//!    │             └─ runtime::library (hashed set over linear memory)
//!    └─ GlobalEnv (globals, class layouts) threaded through compiles
//! ```
//!
//! Lowering produces a structured instruction tree ([`Instr`]) rather than
//! text, so the same output can be rendered as WAT or executed directly.
//!
//! # Tracing
//!
//! Entry points are instrumented with `tracing`; set
//! `RUST_LOG=choco_wasm=debug` (or `trace`) under a subscriber to see
//! lowering progress.

mod env;
mod error;
pub mod exec;
mod expr;
mod function;
pub mod host;
mod instr;
mod module;
mod program;
pub mod reloop;
pub mod runtime;
mod stack;
mod stmt;
mod wat;

pub use env::{ClassLayout, FieldInfo, GlobalEnv, LoweringCx};
pub use error::CodegenError;
pub use expr::{binop, lower_expr, lower_value};
pub use function::{lower_class, lower_function, mangle_method};
pub use instr::{Function, Instr, NumOp};
pub use module::{Module, ModuleConfig};
pub use program::{compile, compile_module, CompileResult};
pub use reloop::LabelTable;
pub use stmt::{lower_body, lower_exit, lower_stmt};
pub use wat::{render_function, render_instrs};
