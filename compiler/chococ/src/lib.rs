//! Choco compiler driver.
//!
//! Loads IR programs from JSON, compiles them through [`choco_wasm`], and
//! either writes WAT text or runs the result on the executor. A [`Session`]
//! threads one compilation environment through successive programs, so
//! later programs see earlier globals, classes and functions.

use std::path::{Path, PathBuf};
use std::sync::Once;

use choco_ir::Program;
use choco_rt::BuiltinRegistry;
use choco_wasm::exec::{Machine, Trap};
use choco_wasm::{compile_module, CodegenError, Function, GlobalEnv, Module, ModuleConfig};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=choco_wasm=debug` or `RUST_LOG=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("cannot access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid program: {0}")]
    Json(#[from] serde_json::Error),
    #[error("compile error: {0}")]
    Codegen(#[from] CodegenError),
    #[error("runtime error: {0}")]
    Trap(#[from] Trap),
    #[error("{0}")]
    Usage(String),
}

/// Incremental compilation state.
///
/// Each [`Session::compile`] produces a module holding every global and
/// function compiled so far, plus the new program's main body. A failed
/// compile leaves the session unchanged.
#[derive(Debug, Default)]
pub struct Session {
    config: ModuleConfig,
    env: GlobalEnv,
    globals: Vec<String>,
    functions: Vec<Function>,
}

impl Session {
    pub fn new(config: ModuleConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn env(&self) -> &GlobalEnv {
        &self.env
    }

    pub fn compile(&mut self, program: &Program) -> Result<Module, DriverError> {
        let (module, env) = compile_module(program, &self.env, &self.config)?;
        self.env = env;
        for global in module.globals {
            if !self.globals.contains(&global) {
                self.globals.push(global);
            }
        }
        for func in module.functions {
            match self.functions.iter_mut().find(|f| f.name == func.name) {
                Some(slot) => *slot = func,
                None => self.functions.push(func),
            }
        }
        tracing::debug!(
            globals = self.globals.len(),
            functions = self.functions.len(),
            "session compiled program"
        );
        Ok(Module {
            config: module.config,
            globals: self.globals.clone(),
            functions: self.functions.clone(),
            main: module.main,
        })
    }
}

/// Result of running a module's main function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Lines printed by the program.
    pub output: Vec<String>,
    /// Value returned by main.
    pub value: i32,
}

pub fn parse_program(json: &str) -> Result<Program, DriverError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_program(path: &Path) -> Result<Program, DriverError> {
    let text = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_program(&text)
}

/// Compile the program at `path` to WAT text.
pub fn build_file(path: &Path) -> Result<String, DriverError> {
    let program = load_program(path)?;
    let module = Session::default().compile(&program)?;
    Ok(module.to_wat())
}

/// Compile and run the program at `path`.
pub fn run_file(path: &Path) -> Result<RunReport, DriverError> {
    let program = load_program(path)?;
    let module = Session::default().compile(&program)?;
    run_module(&module)
}

pub fn run_module(module: &Module) -> Result<RunReport, DriverError> {
    let mut machine = Machine::new(module);
    let value = machine.run_main()?;
    Ok(RunReport {
        output: machine.output().to_vec(),
        value,
    })
}

/// One line per builtin: `name(params) -> ret`.
pub fn builtin_signatures() -> Vec<String> {
    BuiltinRegistry::standard()
        .iter()
        .map(|builtin| {
            let params: Vec<String> = builtin.params.iter().map(ToString::to_string).collect();
            format!("{}({}) -> {}", builtin.name, params.join(", "), builtin.ret)
        })
        .collect()
}
