//! Compilation environment.
//!
//! State is split by lifetime:
//!
//! - [`GlobalEnv`] persists across compiles: declared globals, class field
//!   layouts, and the running layout offset. A REPL-style session threads one
//!   value through successive compiles.
//! - [`LoweringCx`] lives for exactly one function or top-level body: its
//!   local names and its label table. It is built at the body boundary and
//!   dropped at the end, so nothing leaks from one body into the next.

use std::collections::hash_map::Entry;

use choco_ir::{BasicBlock, Class, Value};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::reloop::{LabelTable, LAST, SELECTOR};
use crate::CodegenError;

/// Layout slot of one class field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    /// Word offset within an instance.
    pub offset: u32,
    /// Literal the field is initialized with.
    pub default: Value,
}

/// Field layout of one class, fixed when the class is first defined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassLayout {
    fields: FxHashMap<String, FieldInfo>,
}

impl ClassLayout {
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }

    /// Number of words an instance occupies.
    pub fn size(&self) -> usize {
        self.fields.len()
    }
}

/// State that persists across compiles.
#[derive(Clone, Debug, Default)]
pub struct GlobalEnv {
    globals: FxHashSet<String>,
    classes: FxHashMap<String, ClassLayout>,
    /// Field slots laid out so far, across all classes.
    offset: u32,
}

impl GlobalEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a global name. Returns `false` if it was already declared.
    pub fn declare_global(&mut self, name: &str) -> bool {
        self.globals.insert(name.to_owned())
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    pub fn globals(&self) -> impl Iterator<Item = &str> {
        self.globals.iter().map(String::as_str)
    }

    /// Lay out `class`'s fields in declaration order from offset 0.
    ///
    /// A class that is already defined keeps its existing layout.
    pub fn define_class(&mut self, class: &Class) -> &ClassLayout {
        let offset = &mut self.offset;
        self.classes.entry(class.name.clone()).or_insert_with(|| {
            let mut layout = ClassLayout::default();
            let mut slot = 0u32;
            for field in &class.fields {
                if let Entry::Vacant(entry) = layout.fields.entry(field.name.clone()) {
                    entry.insert(FieldInfo {
                        offset: slot,
                        default: field.value.clone(),
                    });
                    slot += 1;
                }
            }
            *offset += slot;
            layout
        })
    }

    pub fn class(&self, name: &str) -> Option<&ClassLayout> {
        self.classes.get(name)
    }

    pub fn field_offset(&self, class: &str, field: &str) -> Option<u32> {
        self.class(class)?.field(field).map(|info| info.offset)
    }

    /// Total field slots laid out so far.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

/// Per-body lowering state: the locals in scope and the label table.
#[derive(Debug)]
pub struct LoweringCx {
    locals: FxHashSet<String>,
    labels: LabelTable,
}

impl LoweringCx {
    /// Context for the body named `body` with the given local names.
    ///
    /// The reserved scratch locals are always in scope. The label table is
    /// built from `blocks` in declaration order.
    pub fn new<I>(body: &str, locals: I, blocks: &[BasicBlock]) -> Result<Self, CodegenError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut set: FxHashSet<String> = locals.into_iter().map(Into::into).collect();
        set.insert(LAST.to_owned());
        set.insert(SELECTOR.to_owned());
        let labels = LabelTable::new(body, blocks.iter().map(|block| block.label.clone()))?;
        Ok(Self { locals: set, labels })
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }
}
