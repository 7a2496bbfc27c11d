//! Runtime library emitted into every module.

pub mod set;

use crate::Function;

/// Every runtime library function, in emission order.
pub fn library() -> Vec<Function> {
    set::functions()
}
