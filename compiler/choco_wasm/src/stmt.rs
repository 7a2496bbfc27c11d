//! Statement and body lowering.

use choco_ir::{BasicBlock, BlockExit, Stmt};

use crate::env::LoweringCx;
use crate::expr::{lower_expr, lower_value};
use crate::reloop::{jump_to, reloop, LAST};
use crate::{host, CodegenError, Instr};

pub fn lower_stmt(cx: &LoweringCx, stmt: &Stmt, out: &mut Vec<Instr>) -> Result<(), CodegenError> {
    match stmt {
        Stmt::Assign { name, value } => {
            lower_expr(cx, value, out)?;
            out.push(set_var(cx, name));
        }
        Stmt::Store { start, offset, value } => {
            lower_value(cx, start, out);
            lower_value(cx, offset, out);
            lower_value(cx, value, out);
            out.push(Instr::call(host::STORE));
        }
        Stmt::Expr { expr } => {
            lower_expr(cx, expr, out)?;
            out.push(Instr::local_set(LAST));
        }
        Stmt::Pass => {}
        Stmt::Return { value } => lower_exit(cx, BlockExit::Return(value), out)?,
        Stmt::Jmp { lbl } => lower_exit(cx, BlockExit::Jump(lbl), out)?,
        Stmt::IfJmp { cond, thn, els } => lower_exit(cx, BlockExit::Branch { cond, thn, els }, out)?,
    }
    Ok(())
}

/// Lower the way control leaves a block.
pub fn lower_exit(cx: &LoweringCx, exit: BlockExit<'_>, out: &mut Vec<Instr>) -> Result<(), CodegenError> {
    match exit {
        BlockExit::Jump(lbl) => out.extend(jump_to(cx.labels().index_of(lbl)?)),
        BlockExit::Branch { cond, thn, els } => {
            let then = jump_to(cx.labels().index_of(thn)?).to_vec();
            let els = jump_to(cx.labels().index_of(els)?).to_vec();
            lower_value(cx, cond, out);
            out.push(Instr::If { then, els });
        }
        BlockExit::Return(value) => {
            lower_value(cx, value, out);
            out.push(Instr::Return);
        }
        BlockExit::FallThrough => {}
    }
    Ok(())
}

/// Write the top of the stack to `name`, local if in scope, else global.
pub(crate) fn set_var(cx: &LoweringCx, name: &str) -> Instr {
    if cx.is_local(name) {
        Instr::local_set(name)
    } else {
        Instr::GlobalSet(name.to_owned())
    }
}

/// Lower every block of a body and nest them under selector dispatch.
///
/// Statements after a block's first terminator are unreachable and are not
/// emitted.
#[tracing::instrument(level = "trace", skip_all, fields(blocks = blocks.len()))]
pub fn lower_body(cx: &LoweringCx, blocks: &[BasicBlock]) -> Result<Vec<Instr>, CodegenError> {
    let mut lowered = Vec::with_capacity(blocks.len());
    for block in blocks {
        let mut out = Vec::new();
        for stmt in block.straight_line() {
            lower_stmt(cx, stmt, &mut out)?;
        }
        lower_exit(cx, block.exit(), &mut out)?;
        lowered.push((block.label.clone(), out));
    }
    Ok(reloop(lowered))
}

#[cfg(test)]
mod tests;
