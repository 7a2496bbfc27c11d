//! Host primitives imported by every module.
//!
//! Memory primitives work in words: `load(addr, off)` and
//! `store(addr, off, v)` address the word at `addr + 4 * off`, and
//! `alloc(n)` reserves `n` words. Address 0 is the none sentinel.

pub const ALLOC: &str = "alloc";
pub const LOAD: &str = "load";
pub const STORE: &str = "store";
pub const ASSERT_NOT_NONE: &str = "assert_not_none";
pub const PRINT_NUM: &str = "print_num";
pub const PRINT_BOOL: &str = "print_bool";
pub const PRINT_NONE: &str = "print_none";

/// Import namespace for host primitives and builtins.
pub const IMPORT_MODULE: &str = "imports";

/// Signature of a host import. Parameters are all `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostImport {
    pub name: &'static str,
    pub params: usize,
    pub returns_value: bool,
}

pub const PRIMITIVES: [HostImport; 7] = [
    HostImport { name: ALLOC, params: 1, returns_value: true },
    HostImport { name: LOAD, params: 2, returns_value: true },
    HostImport { name: STORE, params: 3, returns_value: false },
    HostImport { name: ASSERT_NOT_NONE, params: 1, returns_value: true },
    HostImport { name: PRINT_NUM, params: 1, returns_value: true },
    HostImport { name: PRINT_BOOL, params: 1, returns_value: true },
    HostImport { name: PRINT_NONE, params: 1, returns_value: true },
];
