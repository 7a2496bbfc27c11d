//! Builtin registry.
//!
//! One table drives both consumers of builtin signatures: the type checker
//! (overload and arity checks, via [`BuiltinRegistry::signature`]) and the
//! code generator (host import declarations and native dispatch). Keeping
//! them in one table keeps the declared signature and the native
//! implementation from drifting apart.

use std::fmt;

use choco_ir::Type;
use rustc_hash::FxHashMap;

use crate::{clock, numeric, random, RuntimeError};

/// Native entry point. Arguments and result are bounded machine words;
/// booleans and none travel as 0/1 and 0.
pub type NativeFn = fn(&[i32]) -> Result<i32, RuntimeError>;

/// A builtin: `(name, parameter types, return type, native implementation)`.
pub struct Builtin {
    pub name: &'static str,
    pub params: &'static [Type],
    pub ret: Type,
    pub native: NativeFn,
}

impl Builtin {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .finish_non_exhaustive()
    }
}

static STANDARD: [Builtin; 15] = [
    Builtin { name: "factorial", params: &[Type::Num], ret: Type::Num, native: |a| numeric::factorial(a[0]) },
    Builtin { name: "randint", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| random::randint(a[0], a[1]) },
    Builtin { name: "gcd", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| numeric::gcd(a[0], a[1]) },
    Builtin { name: "lcm", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| numeric::lcm(a[0], a[1]) },
    Builtin { name: "comb", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| numeric::comb(a[0], a[1]) },
    Builtin { name: "perm", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| numeric::perm(a[0], a[1]) },
    Builtin {
        name: "randrange",
        params: &[Type::Num, Type::Num, Type::Num],
        ret: Type::Num,
        native: |a| random::randrange(a[0], a[1], a[2]),
    },
    Builtin { name: "time", params: &[], ret: Type::Num, native: |_| Ok(clock::time()) },
    Builtin { name: "sleep", params: &[Type::Num], ret: Type::None, native: |a| Ok(clock::sleep(a[0])) },
    Builtin { name: "int", params: &[Type::Bool], ret: Type::Num, native: |a| Ok(a[0]) },
    Builtin { name: "bool", params: &[Type::Num], ret: Type::Bool, native: |a| Ok(i32::from(a[0] != 0)) },
    Builtin { name: "abs", params: &[Type::Num], ret: Type::Num, native: |a| numeric::abs(a[0]) },
    Builtin { name: "min", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| Ok(a[0].min(a[1])) },
    Builtin { name: "max", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| Ok(a[0].max(a[1])) },
    Builtin { name: "pow", params: &[Type::Num, Type::Num], ret: Type::Num, native: |a| numeric::pow(a[0], a[1]) },
];

/// Name-indexed view over the builtin table.
pub struct BuiltinRegistry {
    builtins: &'static [Builtin],
    by_name: FxHashMap<&'static str, usize>,
}

impl BuiltinRegistry {
    /// The standard library builtins.
    pub fn standard() -> Self {
        let builtins: &'static [Builtin] = &STANDARD;
        let by_name = builtins
            .iter()
            .enumerate()
            .map(|(idx, builtin)| (builtin.name, idx))
            .collect();
        Self { builtins, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'static Builtin> {
        let builtins = self.builtins;
        self.by_name.get(name).map(|&idx| &builtins[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Parameter and return types, for overload and arity checking.
    pub fn signature(&self, name: &str) -> Option<(&'static [Type], &'static Type)> {
        self.get(name).map(|builtin| (builtin.params, &builtin.ret))
    }

    /// Builtins in table order.
    pub fn iter(&self) -> impl Iterator<Item = &'static Builtin> {
        self.builtins.iter()
    }

    /// Invoke a builtin by name after checking its arity.
    pub fn call(&self, name: &str, args: &[i32]) -> Result<i32, RuntimeError> {
        let builtin = self
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownBuiltin(name.to_owned()))?;
        if args.len() != builtin.arity() {
            return Err(RuntimeError::Arity {
                builtin: name.to_owned(),
                expected: builtin.arity(),
                found: args.len(),
            });
        }
        tracing::trace!(builtin = name, ?args, "native builtin call");
        (builtin.native)(args)
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
