//! Executor for lowered modules.
//!
//! Interprets the structured instruction tree directly. Linear memory is a
//! zeroed byte vector; `alloc` bumps a pointer that starts at byte 4, so
//! address 0 is never handed out and stays the none sentinel. Host
//! primitives are implemented here, and every other call resolves to a
//! module function or, failing that, to the builtin registry.
//!
//! An optional fuel budget bounds the number of executed instructions,
//! which keeps generated (possibly non-terminating) programs testable.

use choco_rt::{BuiltinRegistry, RuntimeError};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::stack::ensure_sufficient_stack;
use crate::{host, Function, Instr, Module, NumOp};

/// Bytes per memory page.
pub const PAGE_SIZE: usize = 65_536;

/// First address handed out by `alloc`.
const HEAP_BASE: usize = 4;

const MAX_CALL_DEPTH: usize = 256;

/// An execution failure. Traps are not recoverable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Trap {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("memory access out of bounds at address {addr}")]
    OutOfBounds { addr: i64 },
    #[error("integer divide by zero")]
    DivideByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("`{function}` expects {expected} argument(s), found {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },
    #[error("unknown local `{0}`")]
    UnknownLocal(String),
    #[error("unknown global `{0}`")]
    UnknownGlobal(String),
    #[error("value stack underflow")]
    StackUnderflow,
    #[error("branch to unknown label `{0}`")]
    UnknownBranchTarget(String),
    #[error("call depth exceeded")]
    CallDepthExceeded,
    #[error("fuel exhausted")]
    FuelExhausted,
}

/// How control leaves an instruction sequence.
enum Flow<'m> {
    Next,
    Branch(&'m str),
    Return(i32),
}

struct Frame<'m> {
    locals: FxHashMap<&'m str, i32>,
    stack: Vec<i32>,
}

impl<'m> Frame<'m> {
    fn new(func: &'m Function, args: &[i32]) -> Result<Self, Trap> {
        if args.len() != func.params.len() {
            return Err(Trap::Arity {
                function: func.name.clone(),
                expected: func.params.len(),
                found: args.len(),
            });
        }
        let mut locals = FxHashMap::default();
        for (param, arg) in func.params.iter().zip(args) {
            locals.insert(param.as_str(), *arg);
        }
        for local in &func.locals {
            locals.entry(local.as_str()).or_insert(0);
        }
        Ok(Self {
            locals,
            stack: Vec::with_capacity(16),
        })
    }

    fn push(&mut self, value: i32) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Result<i32, Trap> {
        self.stack.pop().ok_or(Trap::StackUnderflow)
    }

    fn pop_n(&mut self, n: usize) -> Result<SmallVec<[i32; 4]>, Trap> {
        let start = self.stack.len().checked_sub(n).ok_or(Trap::StackUnderflow)?;
        Ok(self.stack.drain(start..).collect())
    }

    fn local_mut(&mut self, name: &str) -> Result<&mut i32, Trap> {
        self.locals
            .get_mut(name)
            .ok_or_else(|| Trap::UnknownLocal(name.to_owned()))
    }
}

/// Interpreter state for one module instance.
pub struct Machine<'m> {
    functions: FxHashMap<&'m str, &'m Function>,
    main: &'m Function,
    globals: FxHashMap<&'m str, i32>,
    memory: Vec<u8>,
    heap_top: usize,
    registry: BuiltinRegistry,
    output: Vec<String>,
    fuel: Option<u64>,
    depth: usize,
}

impl<'m> Machine<'m> {
    pub fn new(module: &'m Module) -> Self {
        let mut functions = FxHashMap::default();
        for func in module.functions.iter().chain(std::iter::once(&module.main)) {
            functions.insert(func.name.as_str(), func);
        }
        let globals = module.globals.iter().map(|name| (name.as_str(), 0)).collect();
        Self {
            functions,
            main: &module.main,
            globals,
            memory: vec![0; module.config.memory_pages as usize * PAGE_SIZE],
            heap_top: HEAP_BASE,
            registry: BuiltinRegistry::standard(),
            output: Vec::new(),
            fuel: None,
            depth: 0,
        }
    }

    /// Limit the number of instructions this machine may execute.
    #[must_use]
    pub fn with_fuel(mut self, fuel: u64) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Run the module's main function.
    pub fn run_main(&mut self) -> Result<i32, Trap> {
        let main = self.main;
        self.invoke(main, &[])
    }

    /// Call a module function by name.
    pub fn call(&mut self, name: &str, args: &[i32]) -> Result<i32, Trap> {
        let func = self
            .functions
            .get(name)
            .copied()
            .ok_or_else(|| Trap::UnknownFunction(name.to_owned()))?;
        self.invoke(func, args)
    }

    /// Lines written by the print primitives, in order.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn global(&self, name: &str) -> Option<i32> {
        self.globals.get(name).copied()
    }

    /// Allocate `words` zeroed words and return the address.
    pub fn alloc(&mut self, words: i32) -> Result<i32, Trap> {
        let too_big = |top: usize| Trap::OutOfBounds {
            addr: i64::try_from(top).unwrap_or(i64::MAX),
        };
        let bytes = usize::try_from(words)
            .ok()
            .and_then(|w| w.checked_mul(4))
            .ok_or(Trap::OutOfBounds { addr: i64::from(words) })?;
        let start = self.heap_top;
        let end = start.checked_add(bytes).ok_or_else(|| too_big(usize::MAX))?;
        if end > self.memory.len() {
            return Err(too_big(end));
        }
        self.heap_top = end;
        i32::try_from(start).map_err(|_| too_big(start))
    }

    /// Word at `addr + 4 * offset`, trapping on the none sentinel.
    pub fn load(&self, addr: i32, offset: i32) -> Result<i32, Trap> {
        if addr == 0 {
            return Err(RuntimeError::NoneDereference.into());
        }
        self.read_word(i64::from(addr) + 4 * i64::from(offset))
    }

    /// Write the word at `addr + 4 * offset`, trapping on the none sentinel.
    pub fn store(&mut self, addr: i32, offset: i32, value: i32) -> Result<(), Trap> {
        if addr == 0 {
            return Err(RuntimeError::NoneDereference.into());
        }
        self.write_word(i64::from(addr) + 4 * i64::from(offset), value)
    }

    fn word_range(&self, addr: i64) -> Result<std::ops::Range<usize>, Trap> {
        usize::try_from(addr)
            .ok()
            .and_then(|start| Some(start..start.checked_add(4)?))
            .filter(|range| range.end <= self.memory.len())
            .ok_or(Trap::OutOfBounds { addr })
    }

    fn read_word(&self, addr: i64) -> Result<i32, Trap> {
        let range = self.word_range(addr)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.memory[range]);
        Ok(i32::from_le_bytes(bytes))
    }

    fn write_word(&mut self, addr: i64, value: i32) -> Result<(), Trap> {
        let range = self.word_range(addr)?;
        self.memory[range].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn consume_fuel(&mut self) -> Result<(), Trap> {
        if let Some(fuel) = &mut self.fuel {
            *fuel = fuel.checked_sub(1).ok_or(Trap::FuelExhausted)?;
        }
        Ok(())
    }

    fn invoke(&mut self, func: &'m Function, args: &[i32]) -> Result<i32, Trap> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(Trap::CallDepthExceeded);
        }
        tracing::trace!(function = %func.name, ?args, "invoke");
        let mut frame = Frame::new(func, args)?;
        self.depth += 1;
        let flow = self.run(&mut frame, &func.body);
        self.depth -= 1;
        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Next => frame.pop(),
            Flow::Branch(label) => Err(Trap::UnknownBranchTarget(label.to_owned())),
        }
    }

    /// Run `instrs`, growing the native stack first if it runs low.
    fn run(&mut self, frame: &mut Frame<'m>, instrs: &'m [Instr]) -> Result<Flow<'m>, Trap> {
        ensure_sufficient_stack(|| self.run_seq(frame, instrs))
    }

    fn run_seq(&mut self, frame: &mut Frame<'m>, instrs: &'m [Instr]) -> Result<Flow<'m>, Trap> {
        for instr in instrs {
            self.consume_fuel()?;
            match instr {
                Instr::I32Const(value) => frame.push(*value),
                Instr::LocalGet(name) => {
                    let value = *frame.local_mut(name)?;
                    frame.push(value);
                }
                Instr::LocalSet(name) => {
                    let value = frame.pop()?;
                    *frame.local_mut(name)? = value;
                }
                Instr::GlobalGet(name) => {
                    let value = self.global(name).ok_or_else(|| Trap::UnknownGlobal(name.clone()))?;
                    frame.push(value);
                }
                Instr::GlobalSet(name) => {
                    let value = frame.pop()?;
                    let slot = self
                        .globals
                        .get_mut(name.as_str())
                        .ok_or_else(|| Trap::UnknownGlobal(name.clone()))?;
                    *slot = value;
                }
                Instr::Num(op) => {
                    let rhs = frame.pop()?;
                    let lhs = frame.pop()?;
                    frame.push(binary(*op, lhs, rhs)?);
                }
                Instr::I32Load { offset } => {
                    let addr = frame.pop()?;
                    frame.push(self.read_word(effective(addr, *offset))?);
                }
                Instr::I32Store { offset } => {
                    let value = frame.pop()?;
                    let addr = frame.pop()?;
                    self.write_word(effective(addr, *offset), value)?;
                }
                Instr::Call(name) => self.call_from(frame, name)?,
                Instr::Return => return Ok(Flow::Return(frame.pop()?)),
                Instr::Block { label, body } => match self.run(frame, body)? {
                    Flow::Next => {}
                    Flow::Branch(target) if target == label.as_str() => {}
                    flow => return Ok(flow),
                },
                Instr::Loop { label, body } => loop {
                    match self.run(frame, body)? {
                        Flow::Next => break,
                        Flow::Branch(target) if target == label.as_str() => {}
                        flow => return Ok(flow),
                    }
                },
                Instr::If { then, els } => {
                    let arm = if frame.pop()? != 0 { then } else { els };
                    match self.run(frame, arm)? {
                        Flow::Next => {}
                        flow => return Ok(flow),
                    }
                }
                Instr::Br(label) => return Ok(Flow::Branch(label)),
                Instr::BrIf(label) => {
                    if frame.pop()? != 0 {
                        return Ok(Flow::Branch(label));
                    }
                }
                Instr::BrTable { targets, default } => {
                    let index = frame.pop()?;
                    let target = usize::try_from(index)
                        .ok()
                        .and_then(|i| targets.get(i))
                        .unwrap_or(default);
                    return Ok(Flow::Branch(target));
                }
            }
        }
        Ok(Flow::Next)
    }

    fn call_from(&mut self, frame: &mut Frame<'m>, name: &str) -> Result<(), Trap> {
        match name {
            host::ALLOC => {
                let words = frame.pop()?;
                let addr = self.alloc(words)?;
                frame.push(addr);
            }
            host::LOAD => {
                let offset = frame.pop()?;
                let addr = frame.pop()?;
                frame.push(self.load(addr, offset)?);
            }
            host::STORE => {
                let value = frame.pop()?;
                let offset = frame.pop()?;
                let addr = frame.pop()?;
                self.store(addr, offset, value)?;
            }
            host::ASSERT_NOT_NONE => {
                let addr = frame.pop()?;
                if addr == 0 {
                    return Err(RuntimeError::NoneDereference.into());
                }
                frame.push(addr);
            }
            host::PRINT_NUM => {
                let value = frame.pop()?;
                self.output.push(value.to_string());
                frame.push(value);
            }
            host::PRINT_BOOL => {
                let value = frame.pop()?;
                self.output.push(if value == 0 { "False" } else { "True" }.to_owned());
                frame.push(value);
            }
            host::PRINT_NONE => {
                frame.pop()?;
                self.output.push("None".to_owned());
                frame.push(0);
            }
            _ => {
                if let Some(func) = self.functions.get(name).copied() {
                    let args = frame.pop_n(func.params.len())?;
                    let result = self.invoke(func, &args)?;
                    frame.push(result);
                } else if let Some(builtin) = self.registry.get(name) {
                    let args = frame.pop_n(builtin.arity())?;
                    let result = self.registry.call(name, &args)?;
                    frame.push(result);
                } else {
                    return Err(Trap::UnknownFunction(name.to_owned()));
                }
            }
        }
        Ok(())
    }
}

/// Byte address of a raw access: the address word read as unsigned.
fn effective(addr: i32, offset: u32) -> i64 {
    i64::from(u32::from_ne_bytes(addr.to_ne_bytes())) + i64::from(offset)
}

fn binary(op: NumOp, lhs: i32, rhs: i32) -> Result<i32, Trap> {
    let value = match op {
        NumOp::Add => lhs.wrapping_add(rhs),
        NumOp::Sub => lhs.wrapping_sub(rhs),
        NumOp::Mul => lhs.wrapping_mul(rhs),
        NumOp::DivS => {
            if rhs == 0 {
                return Err(Trap::DivideByZero);
            }
            lhs.checked_div(rhs).ok_or(Trap::IntegerOverflow)?
        }
        NumOp::RemS => {
            if rhs == 0 {
                return Err(Trap::DivideByZero);
            }
            lhs.wrapping_rem(rhs)
        }
        NumOp::RemU => {
            let (l, r) = (unsigned(lhs), unsigned(rhs));
            if r == 0 {
                return Err(Trap::DivideByZero);
            }
            i32::from_ne_bytes((l % r).to_ne_bytes())
        }
        NumOp::Eq => i32::from(lhs == rhs),
        NumOp::Ne => i32::from(lhs != rhs),
        NumOp::LtS => i32::from(lhs < rhs),
        NumOp::LeS => i32::from(lhs <= rhs),
        NumOp::GtS => i32::from(lhs > rhs),
        NumOp::GeS => i32::from(lhs >= rhs),
        NumOp::And => lhs & rhs,
        NumOp::Or => lhs | rhs,
    };
    Ok(value)
}

fn unsigned(word: i32) -> u32 {
    u32::from_ne_bytes(word.to_ne_bytes())
}

#[cfg(test)]
mod tests;
