//! Code generation errors.

use choco_ir::{Label, Type};

/// A compile-time failure. Lowering stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// A `jmp`/`ifjmp` names a label that no block of the body declares.
    #[error("jump to unknown label `{label}` in `{body}`")]
    UnknownLabel { label: Label, body: String },
    /// Two blocks of one body share a label.
    #[error("label `{label}` declared more than once in `{body}`")]
    DuplicateLabel { label: Label, body: String },
    /// `print` applied to a value with no runtime print routine.
    #[error("no `print` overload for values of type `{ty}`")]
    NoPrintOverload { ty: Type },
}
