//! Choco Runtime Library
//!
//! Native-side support for compiled Choco programs:
//!
//! - **Builtin registry** ([`BuiltinRegistry`]): `(name, params, ret, native)`
//!   tuples shared by the type checker (signatures) and the code generator
//!   (import declarations, call resolution)
//! - **Numeric builtins** ([`numeric`]): factorial, perm, comb, gcd, lcm, pow
//!   computed on big integers and converted at the boundary via [`Num`]
//! - **Random builtins** ([`random`]): uniform ranged generation by bit-width
//!   rejection sampling
//! - **Clock builtins** ([`clock`]): `time` and busy-waiting `sleep`
//! - **Set model** ([`set`]): typed-arena hashed set with the same bucket and
//!   chaining layout as the emitted linear-memory set library
//!
//! Every fallible entry point reports a [`RuntimeError`]; nothing here
//! recovers locally.

pub mod clock;
mod error;
mod num;
pub mod numeric;
pub mod random;
mod registry;
pub mod set;

pub use error::RuntimeError;
pub use num::Num;
pub use registry::{Builtin, BuiltinRegistry, NativeFn};
