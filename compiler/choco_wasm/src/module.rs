//! Module assembly and configuration.

use choco_rt::BuiltinRegistry;

use crate::host::{self, HostImport};
use crate::wat::WatWriter;
use crate::Function;

/// Module-level code generation settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Linear memory size in 64KB pages.
    pub memory_pages: u32,
    /// Export name of the function running the top-level body.
    pub main_export: String,
    /// Whether the runtime set library is emitted.
    pub emit_runtime: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            // 1MB (16 pages * 64KB)
            memory_pages: 16,
            main_export: "exported_func".to_owned(),
            emit_runtime: true,
        }
    }
}

impl ModuleConfig {
    #[must_use]
    pub fn with_memory_pages(mut self, pages: u32) -> Self {
        self.memory_pages = pages;
        self
    }

    #[must_use]
    pub fn with_main_export(mut self, name: &str) -> Self {
        self.main_export = name.to_owned();
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, emit: bool) -> Self {
        self.emit_runtime = emit;
        self
    }
}

/// A complete compiled unit: globals, functions, and the main body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub config: ModuleConfig,
    /// Mutable `i32` globals, all starting at 0. Initializers run in main.
    pub globals: Vec<String>,
    pub functions: Vec<Function>,
    pub main: Function,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions
            .iter()
            .chain(std::iter::once(&self.main))
            .find(|func| func.name == name)
    }

    /// Render the module as WAT text.
    pub fn to_wat(&self) -> String {
        let mut w = WatWriter::new();
        w.writeln("(module");
        w.indent();

        for import in &host::PRIMITIVES {
            w.writeln(&import_line(import));
        }
        for builtin in BuiltinRegistry::standard().iter() {
            w.writeln(&import_line(&HostImport {
                name: builtin.name,
                params: builtin.arity(),
                returns_value: true,
            }));
        }

        w.writeln(&format!(
            "(memory (export \"memory\") {})",
            self.config.memory_pages
        ));
        for global in &self.globals {
            w.writeln(&format!("(global ${global} (mut i32) (i32.const 0))"));
        }
        for func in &self.functions {
            w.write_function(func);
        }
        w.write_function(&self.main);

        w.dedent();
        w.writeln(")");
        w.take_output()
    }
}

fn import_line(import: &HostImport) -> String {
    let mut sig = String::new();
    if import.params > 0 {
        sig.push_str(" (param");
        for _ in 0..import.params {
            sig.push_str(" i32");
        }
        sig.push(')');
    }
    if import.returns_value {
        sig.push_str(" (result i32)");
    }
    format!(
        "(import \"{}\" \"{name}\" (func ${name}{sig}))",
        host::IMPORT_MODULE,
        name = import.name
    )
}
