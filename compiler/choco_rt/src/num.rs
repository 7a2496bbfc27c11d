//! Bounded / arbitrary-precision boundary.

use std::fmt;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::RuntimeError;

/// A numeric builtin operand or result.
///
/// Compiled code only ever sees `Bounded` words. `Big` exists inside the
/// builtins that can leave the machine-word range, and is converted back at
/// their boundary with [`Num::to_bounded`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Num {
    Bounded(i32),
    Big(BigInt),
}

impl Num {
    /// Normalizing constructor: small values become `Bounded`.
    pub fn from_big(value: BigInt) -> Self {
        match value.to_i32() {
            Some(word) => Num::Bounded(word),
            None => Num::Big(value),
        }
    }

    pub fn to_big(&self) -> BigInt {
        match self {
            Num::Bounded(word) => BigInt::from(*word),
            Num::Big(big) => big.clone(),
        }
    }

    /// Convert back to a machine word, failing with
    /// [`RuntimeError::Overflow`] attributed to `builtin`.
    pub fn to_bounded(&self, builtin: &'static str) -> Result<i32, RuntimeError> {
        match self {
            Num::Bounded(word) => Ok(*word),
            Num::Big(big) => big.to_i32().ok_or(RuntimeError::Overflow { builtin }),
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, Num::Bounded(_))
    }
}

impl From<i32> for Num {
    fn from(word: i32) -> Self {
        Num::Bounded(word)
    }
}

impl From<BigInt> for Num {
    fn from(value: BigInt) -> Self {
        Num::from_big(value)
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::Bounded(word) => write!(f, "{word}"),
            Num::Big(big) => write!(f, "{big}"),
        }
    }
}
