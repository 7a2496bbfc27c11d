//! WAT text rendering.
//!
//! Instructions are written in flat (non-folded) form, one per line, with
//! structured bodies indented one level and closed by `end`.

use std::fmt::Write as _;

use crate::{Function, Instr};

/// Indenting text buffer for WAT output.
pub(crate) struct WatWriter {
    /// Current indentation level.
    indent: usize,
    /// Generated text.
    output: String,
}

impl WatWriter {
    pub(crate) fn new() -> Self {
        Self {
            indent: 0,
            output: String::with_capacity(4096),
        }
    }

    pub(crate) fn indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line with indentation and newline.
    pub(crate) fn writeln(&mut self, s: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub(crate) fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub(crate) fn write_function(&mut self, func: &Function) {
        let mut header = format!("(func ${}", func.name);
        if let Some(export) = &func.export {
            let _ = write!(header, " (export \"{export}\")");
        }
        for param in &func.params {
            let _ = write!(header, " (param ${param} i32)");
        }
        header.push_str(" (result i32)");
        self.writeln(&header);
        self.indent();
        self.write_locals(&func.locals);
        self.write_instrs(&func.body);
        self.dedent();
        self.writeln(")");
    }

    pub(crate) fn write_locals(&mut self, locals: &[String]) {
        for local in locals {
            self.writeln(&format!("(local ${local} i32)"));
        }
    }

    pub(crate) fn write_instrs(&mut self, instrs: &[Instr]) {
        for instr in instrs {
            self.write_instr(instr);
        }
    }

    fn write_instr(&mut self, instr: &Instr) {
        match instr {
            Instr::I32Const(value) => self.writeln(&format!("i32.const {value}")),
            Instr::LocalGet(name) => self.writeln(&format!("local.get ${name}")),
            Instr::LocalSet(name) => self.writeln(&format!("local.set ${name}")),
            Instr::GlobalGet(name) => self.writeln(&format!("global.get ${name}")),
            Instr::GlobalSet(name) => self.writeln(&format!("global.set ${name}")),
            Instr::Num(op) => self.writeln(op.mnemonic()),
            Instr::I32Load { offset: 0 } => self.writeln("i32.load"),
            Instr::I32Load { offset } => self.writeln(&format!("i32.load offset={offset}")),
            Instr::I32Store { offset: 0 } => self.writeln("i32.store"),
            Instr::I32Store { offset } => self.writeln(&format!("i32.store offset={offset}")),
            Instr::Call(name) => self.writeln(&format!("call ${name}")),
            Instr::Return => self.writeln("return"),
            Instr::Block { label, body } => self.write_structured("block", label, body),
            Instr::Loop { label, body } => self.write_structured("loop", label, body),
            Instr::If { then, els } => {
                self.writeln("if");
                self.indent();
                self.write_instrs(then);
                self.dedent();
                if !els.is_empty() {
                    self.writeln("else");
                    self.indent();
                    self.write_instrs(els);
                    self.dedent();
                }
                self.writeln("end");
            }
            Instr::Br(label) => self.writeln(&format!("br ${label}")),
            Instr::BrIf(label) => self.writeln(&format!("br_if ${label}")),
            Instr::BrTable { targets, default } => {
                let mut line = String::from("br_table");
                for target in targets.iter().chain(std::iter::once(default)) {
                    let _ = write!(line, " ${target}");
                }
                self.writeln(&line);
            }
        }
    }

    fn write_structured(&mut self, keyword: &str, label: &str, body: &[Instr]) {
        self.writeln(&format!("{keyword} ${label}"));
        self.indent();
        self.write_instrs(body);
        self.dedent();
        self.writeln("end");
    }
}

/// Render one function definition.
pub fn render_function(func: &Function) -> String {
    let mut writer = WatWriter::new();
    writer.write_function(func);
    writer.take_output()
}

/// Render an instruction sequence at zero indentation.
pub fn render_instrs(instrs: &[Instr]) -> String {
    let mut writer = WatWriter::new();
    writer.write_instrs(instrs);
    writer.take_output()
}
