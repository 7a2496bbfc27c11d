//! Ranged random generation.
//!
//! All draws reduce to [`random_big_in_range`], which samples uniformly from
//! an inclusive big-integer range by bit-width rejection: draw as many random
//! bits as the range width has, retry while the draw exceeds the width. The
//! expected number of draws is below two.
//!
//! The `*_with` functions take an explicit generator so callers (and tests)
//! control determinism; the registry uses the thread-local generator.

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::ToPrimitive;
use rand::Rng;

use crate::RuntimeError;

/// Uniform draw from `0..=bound`.
pub fn random_biguint_up_to<R: Rng + ?Sized>(rng: &mut R, bound: &BigUint) -> BigUint {
    let bits = bound.bits();
    loop {
        let candidate = rng.gen_biguint(bits);
        if &candidate <= bound {
            return candidate;
        }
    }
}

/// Uniform draw from `x..=y`, failing when `y < x`.
///
/// `builtin` names the caller in the range error.
pub fn random_big_in_range<R: Rng + ?Sized>(
    rng: &mut R,
    builtin: &'static str,
    x: &BigInt,
    y: &BigInt,
) -> Result<BigInt, RuntimeError> {
    let Some(width) = (y - x).to_biguint() else {
        return Err(RuntimeError::range(builtin, x.clone(), y.clone()));
    };
    Ok(x + BigInt::from(random_biguint_up_to(rng, &width)))
}

/// Uniform integer in `[x, y]`.
pub fn randint_with<R: Rng + ?Sized>(rng: &mut R, x: i32, y: i32) -> Result<i32, RuntimeError> {
    draw_i32(rng, "randint", x, y)
}

fn draw_i32<R: Rng + ?Sized>(
    rng: &mut R,
    builtin: &'static str,
    x: i32,
    y: i32,
) -> Result<i32, RuntimeError> {
    let drawn = random_big_in_range(rng, builtin, &BigInt::from(x), &BigInt::from(y))?;
    // x <= drawn <= y, so the conversion cannot fail.
    drawn.to_i32().ok_or(RuntimeError::Overflow { builtin })
}

/// Uniform integer in `[x, y]` with `(result - x) % step == 0`.
///
/// Rejection-samples uniform draws from `[x, y]` until the residue matches.
pub fn randrange_with<R: Rng + ?Sized>(
    rng: &mut R,
    x: i32,
    y: i32,
    step: i32,
) -> Result<i32, RuntimeError> {
    if step <= 0 {
        return Err(RuntimeError::domain("randrange", "step must be positive"));
    }
    loop {
        let result = draw_i32(rng, "randrange", x, y)?;
        if (i64::from(result) - i64::from(x)) % i64::from(step) == 0 {
            return Ok(result);
        }
    }
}

pub fn randint(x: i32, y: i32) -> Result<i32, RuntimeError> {
    randint_with(&mut rand::thread_rng(), x, y)
}

pub fn randrange(x: i32, y: i32, step: i32) -> Result<i32, RuntimeError> {
    randrange_with(&mut rand::thread_rng(), x, y, step)
}
