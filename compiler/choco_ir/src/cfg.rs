//! Control-flow view of labeled blocks.
//!
//! A block runs its statements in order until the first terminator
//! (`return`, `jmp`, `ifjmp`). A block without a terminator falls into the
//! next block in declaration order; the last block falls out of the body.

use crate::{BasicBlock, Label, Stmt, Value};

/// How control leaves a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockExit<'a> {
    Jump(&'a Label),
    Branch {
        cond: &'a Value,
        thn: &'a Label,
        els: &'a Label,
    },
    Return(&'a Value),
    FallThrough,
}

impl BasicBlock {
    /// Statements executed before the block's exit.
    pub fn straight_line(&self) -> &[Stmt] {
        let end = self
            .stmts
            .iter()
            .position(Stmt::is_terminator)
            .unwrap_or(self.stmts.len());
        &self.stmts[..end]
    }

    /// The first terminator of the block, or [`BlockExit::FallThrough`].
    pub fn exit(&self) -> BlockExit<'_> {
        for stmt in &self.stmts {
            match stmt {
                Stmt::Jmp { lbl } => return BlockExit::Jump(lbl),
                Stmt::IfJmp { cond, thn, els } => return BlockExit::Branch { cond, thn, els },
                Stmt::Return { value } => return BlockExit::Return(value),
                _ => {}
            }
        }
        BlockExit::FallThrough
    }
}

/// Position of the block labeled `label`, by linear search.
pub fn find_block(blocks: &[BasicBlock], label: &Label) -> Option<usize> {
    blocks.iter().position(|b| &b.label == label)
}
