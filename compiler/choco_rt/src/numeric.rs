//! Integer builtins computed in arbitrary precision.
//!
//! Each builtin has a big-integer core taking [`BigInt`] operands, plus a
//! bounded front door taking and returning machine words. The front doors
//! go through [`Num`] so a result that leaves the `i32` range is reported as
//! [`RuntimeError::Overflow`] instead of wrapping.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Pow, Signed, Zero};

use crate::{Num, RuntimeError};

/// `x!`, with every `x <= 0` yielding 1.
pub fn factorial_big(x: &BigInt) -> BigInt {
    let mut result = BigInt::one();
    let mut i = x.clone();
    while i.is_positive() {
        result *= &i;
        i -= 1u32;
    }
    result
}

/// Falling product `x * (x-1) * ... * (x-y+1)`.
///
/// Requires `x >= y >= 0`.
pub fn perm_big(x: &BigInt, y: &BigInt) -> Result<BigInt, RuntimeError> {
    check_choose_domain("perm", x, y)?;
    Ok(falling_product(x, y))
}

/// Binomial coefficient `perm(x, y) / perm(y, y)`.
///
/// Requires `x >= y >= 0`.
pub fn comb_big(x: &BigInt, y: &BigInt) -> Result<BigInt, RuntimeError> {
    check_choose_domain("comb", x, y)?;
    // comb(x, y) == comb(x, x - y); the smaller side needs fewer factors.
    let k = y.min(&(x - y)).clone();
    Ok(falling_product(x, &k) / falling_product(&k, &k))
}

/// Greatest common divisor by the Euclidean algorithm.
///
/// Requires `a >= 0`, `b >= 0`, and not both zero.
pub fn gcd_big(a: &BigInt, b: &BigInt) -> Result<BigInt, RuntimeError> {
    if a.is_negative() || b.is_negative() || (a.is_zero() && b.is_zero()) {
        return Err(RuntimeError::domain("gcd", "eq or less than 0"));
    }
    let (mut a, mut b) = (a.clone(), b.clone());
    while !b.is_zero() {
        let r = a.mod_floor(&b);
        a = b;
        b = r;
    }
    Ok(a)
}

/// Least common multiple `floor(x * y / gcd(x, y))`.
///
/// Requires `x > 0` and `y > 0`.
pub fn lcm_big(x: &BigInt, y: &BigInt) -> Result<BigInt, RuntimeError> {
    if !x.is_positive() || !y.is_positive() {
        return Err(RuntimeError::domain("lcm", "eq or less than 0"));
    }
    let g = gcd_big(x, y)?;
    Ok((x * y).div_floor(&g))
}

pub fn factorial(x: i32) -> Result<i32, RuntimeError> {
    // 13! already exceeds i32::MAX.
    if x > 12 {
        return Err(RuntimeError::Overflow { builtin: "factorial" });
    }
    Num::from(factorial_big(&BigInt::from(x))).to_bounded("factorial")
}

pub fn perm(x: i32, y: i32) -> Result<i32, RuntimeError> {
    check_choose_domain("perm", &x.into(), &y.into())?;
    // perm(x, y) >= y! once the domain holds.
    if y > 12 {
        return Err(RuntimeError::Overflow { builtin: "perm" });
    }
    Num::from(perm_big(&x.into(), &y.into())?).to_bounded("perm")
}

pub fn comb(x: i32, y: i32) -> Result<i32, RuntimeError> {
    check_choose_domain("comb", &x.into(), &y.into())?;
    // comb(x, k) >= 2^k for k = min(y, x - y).
    if y.min(x - y) >= 32 {
        return Err(RuntimeError::Overflow { builtin: "comb" });
    }
    Num::from(comb_big(&x.into(), &y.into())?).to_bounded("comb")
}

pub fn gcd(a: i32, b: i32) -> Result<i32, RuntimeError> {
    Num::from(gcd_big(&a.into(), &b.into())?).to_bounded("gcd")
}

pub fn lcm(x: i32, y: i32) -> Result<i32, RuntimeError> {
    Num::from(lcm_big(&x.into(), &y.into())?).to_bounded("lcm")
}

/// Integer power. Negative exponents are outside the integer domain.
pub fn pow(base: i32, exp: i32) -> Result<i32, RuntimeError> {
    let Ok(exp) = u32::try_from(exp) else {
        return Err(RuntimeError::domain("pow", "negative exponent"));
    };
    // |base| >= 2 with exp >= 32 leaves the i32 range; skip the big power.
    if base.unsigned_abs() >= 2 && exp >= 32 {
        return Err(RuntimeError::Overflow { builtin: "pow" });
    }
    Num::from(Pow::pow(BigInt::from(base), exp)).to_bounded("pow")
}

pub fn abs(x: i32) -> Result<i32, RuntimeError> {
    x.checked_abs().ok_or(RuntimeError::Overflow { builtin: "abs" })
}

fn check_choose_domain(builtin: &'static str, x: &BigInt, y: &BigInt) -> Result<(), RuntimeError> {
    if x < y || x.is_negative() || y.is_negative() {
        return Err(RuntimeError::domain(builtin, "requires x >= y >= 0"));
    }
    Ok(())
}

fn falling_product(x: &BigInt, y: &BigInt) -> BigInt {
    let mut result = BigInt::one();
    let mut i = BigInt::zero();
    while &i < y {
        result *= x - &i;
        i += 1u32;
    }
    result
}
