//! Structured target instructions.
//!
//! The lowering produces a tree rather than text: blocks, loops and `if`
//! arms own their bodies. Two consumers walk it, the WAT renderer
//! ([`crate::wat`]) and the executor ([`crate::exec`]).
//!
//! Names (locals, globals, functions, labels) are stored without the `$`
//! sigil. Compiler-reserved names start with `$` themselves, so they render
//! as `$$name` and can never collide with a source identifier.

/// An `i32` operator taking two operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumOp {
    Add,
    Sub,
    Mul,
    DivS,
    RemS,
    RemU,
    Eq,
    Ne,
    LtS,
    LeS,
    GtS,
    GeS,
    And,
    Or,
}

impl NumOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            NumOp::Add => "i32.add",
            NumOp::Sub => "i32.sub",
            NumOp::Mul => "i32.mul",
            NumOp::DivS => "i32.div_s",
            NumOp::RemS => "i32.rem_s",
            NumOp::RemU => "i32.rem_u",
            NumOp::Eq => "i32.eq",
            NumOp::Ne => "i32.ne",
            NumOp::LtS => "i32.lt_s",
            NumOp::LeS => "i32.le_s",
            NumOp::GtS => "i32.gt_s",
            NumOp::GeS => "i32.ge_s",
            NumOp::And => "i32.and",
            NumOp::Or => "i32.or",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    I32Const(i32),
    LocalGet(String),
    LocalSet(String),
    GlobalGet(String),
    GlobalSet(String),
    Num(NumOp),
    /// Raw word read at `address + offset` bytes. No none check.
    I32Load { offset: u32 },
    /// Raw word write at `address + offset` bytes. No none check.
    I32Store { offset: u32 },
    Call(String),
    Return,
    Block { label: String, body: Vec<Instr> },
    Loop { label: String, body: Vec<Instr> },
    If { then: Vec<Instr>, els: Vec<Instr> },
    Br(String),
    BrIf(String),
    /// Branch to `targets[index]`, or to `default` when the index is out of range.
    BrTable { targets: Vec<String>, default: String },
}

impl Instr {
    pub fn local_get(name: impl Into<String>) -> Self {
        Instr::LocalGet(name.into())
    }

    pub fn local_set(name: impl Into<String>) -> Self {
        Instr::LocalSet(name.into())
    }

    pub fn call(name: impl Into<String>) -> Self {
        Instr::Call(name.into())
    }

    pub fn br(label: impl Into<String>) -> Self {
        Instr::Br(label.into())
    }
}

/// A target function. Every parameter, local and result is `i32`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub locals: Vec<String>,
    pub body: Vec<Instr>,
    /// Export name, if the function is visible to the host.
    pub export: Option<String>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<String>, locals: Vec<String>, body: Vec<Instr>) -> Self {
        Self {
            name: name.into(),
            params,
            locals,
            body,
            export: None,
        }
    }

    #[must_use]
    pub fn exported(mut self, name: impl Into<String>) -> Self {
        self.export = Some(name.into());
        self
    }
}
