//! Restricted relooper: labeled blocks to structured control flow.
//!
//! A body of labeled blocks with arbitrary jumps becomes one loop around a
//! nest of blocks, dispatched by a selector local:
//!
//! ```text
//! i32.const 0
//! local.set $$selector
//! loop $$loop
//!   block $bN            ;; last-declared block is outermost
//!     ...
//!       block $b0        ;; first-declared block is innermost
//!         local.get $$selector
//!         br_table $b0 ... $bN-1 $bN
//!       end
//!       <statements of b0>
//!     ...
//!   end
//!   <statements of bN>
//! end
//! ```
//!
//! Exiting block *i* lands directly before block *i*'s statements, and
//! falling off the end of them continues into block *i+1*. A jump sets the
//! selector to the target's index and branches back to the loop head.

use choco_ir::Label;
use rustc_hash::FxHashMap;

use crate::{CodegenError, Instr};

/// Dispatch selector local.
pub const SELECTOR: &str = "$selector";
/// Scratch local receiving the value of expression statements.
pub const LAST: &str = "$last";
/// Label of the dispatch loop.
pub const LOOP: &str = "$loop";

/// Declaration-ordered labels of one body, indexed for jump lowering.
#[derive(Clone, Debug, Default)]
pub struct LabelTable {
    body: String,
    labels: Vec<Label>,
    index: FxHashMap<Label, usize>,
}

impl LabelTable {
    /// Build the table for the body named `body`. Labels must be unique.
    pub fn new(body: &str, labels: impl IntoIterator<Item = Label>) -> Result<Self, CodegenError> {
        let mut table = Self {
            body: body.to_owned(),
            ..Self::default()
        };
        for label in labels {
            if table.index.contains_key(&label) {
                return Err(CodegenError::DuplicateLabel {
                    label,
                    body: table.body,
                });
            }
            table.index.insert(label.clone(), table.labels.len());
            table.labels.push(label);
        }
        Ok(table)
    }

    /// Selector value dispatching to `label`.
    pub fn index_of(&self, label: &Label) -> Result<i32, CodegenError> {
        let &idx = self.index.get(label).ok_or_else(|| CodegenError::UnknownLabel {
            label: label.clone(),
            body: self.body.clone(),
        })?;
        Ok(selector_value(idx))
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn selector_value(idx: usize) -> i32 {
    idx as i32
}

/// Set the selector to `index` and restart the dispatch loop.
pub fn jump_to(index: i32) -> [Instr; 3] {
    [
        Instr::I32Const(index),
        Instr::local_set(SELECTOR),
        Instr::br(LOOP),
    ]
}

/// Nest already-lowered blocks under selector dispatch.
///
/// `blocks` pairs each label with its lowered statements, in declaration
/// order. An empty body produces no dispatch at all.
#[tracing::instrument(level = "trace", skip_all, fields(blocks = blocks.len()))]
pub fn reloop(blocks: Vec<(Label, Vec<Instr>)>) -> Vec<Instr> {
    let Some((last, init)) = blocks.split_last() else {
        return Vec::new();
    };
    let dispatch = vec![
        Instr::local_get(SELECTOR),
        Instr::BrTable {
            targets: init.iter().map(|(label, _)| label.as_str().to_owned()).collect(),
            default: last.0.as_str().to_owned(),
        },
    ];
    let nested = blocks.into_iter().fold(dispatch, |inner, (label, stmts)| {
        let mut wrapped = Vec::with_capacity(stmts.len() + 1);
        wrapped.push(Instr::Block {
            label: label.as_str().to_owned(),
            body: inner,
        });
        wrapped.extend(stmts);
        wrapped
    });
    vec![
        Instr::I32Const(0),
        Instr::local_set(SELECTOR),
        Instr::Loop {
            label: LOOP.to_owned(),
            body: nested,
        },
    ]
}
