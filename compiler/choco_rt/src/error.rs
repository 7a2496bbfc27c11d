//! Runtime-reported errors.

use num_bigint::BigInt;

/// An error raised by a builtin or a memory-safety check at run time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Upper bound of a random range is below its lower bound.
    #[error("{builtin} range error, upper bound {upper} less than lower bound {lower}")]
    Range {
        builtin: &'static str,
        lower: BigInt,
        upper: BigInt,
    },
    /// Arguments outside the builtin's mathematical domain.
    #[error("{builtin} param error: {message}")]
    Domain {
        builtin: &'static str,
        message: &'static str,
    },
    /// An arbitrary-precision result does not fit the bounded integer type.
    #[error("{builtin} result does not fit in a 32-bit integer")]
    Overflow { builtin: &'static str },
    /// A memory access through the none sentinel.
    #[error("operation on None")]
    NoneDereference,
    #[error("unknown builtin `{0}`")]
    UnknownBuiltin(String),
    #[error("builtin `{builtin}` expects {expected} argument(s), found {found}")]
    Arity {
        builtin: String,
        expected: usize,
        found: usize,
    },
}

impl RuntimeError {
    pub(crate) fn range(builtin: &'static str, lower: impl Into<BigInt>, upper: impl Into<BigInt>) -> Self {
        RuntimeError::Range {
            builtin,
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    pub(crate) fn domain(builtin: &'static str, message: &'static str) -> Self {
        RuntimeError::Domain { builtin, message }
    }
}
