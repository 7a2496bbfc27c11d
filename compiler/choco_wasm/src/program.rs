//! Program assembly.

use choco_ir::Program;

use crate::env::{GlobalEnv, LoweringCx};
use crate::expr::lower_value;
use crate::function::{lower_class, lower_function};
use crate::reloop::{LAST, SELECTOR};
use crate::stmt::{lower_body, set_var};
use crate::wat::{render_function, WatWriter};
use crate::{runtime, CodegenError, Function, Instr, Module, ModuleConfig};

/// Text artifacts of one compile, plus the environment for the next one.
#[derive(Clone, Debug)]
pub struct CompileResult {
    /// Globals declared by this program, in declaration order.
    pub globals: Vec<String>,
    /// Every function, class method and runtime library function.
    pub functions: String,
    /// Locals and instructions of the top-level body.
    pub main_source: String,
    pub env: GlobalEnv,
}

/// Compile `program` to WAT text with the default module settings.
pub fn compile(program: &Program, env: &GlobalEnv) -> Result<CompileResult, CodegenError> {
    let (module, env) = compile_module(program, env, &ModuleConfig::default())?;

    let functions = module
        .functions
        .iter()
        .map(render_function)
        .collect::<Vec<_>>()
        .join("\n");
    let mut w = WatWriter::new();
    w.write_locals(&module.main.locals);
    w.write_instrs(&module.main.body);

    Ok(CompileResult {
        globals: module.globals,
        functions,
        main_source: w.take_output(),
        env,
    })
}

/// Compile `program` to a structured [`Module`].
///
/// Globals and classes declared by `program` are added to a copy of `env`,
/// which is returned for the next incremental compile. `env` itself is
/// never modified.
#[tracing::instrument(level = "debug", skip_all, fields(
    funs = program.funs.len(),
    classes = program.classes.len(),
    blocks = program.body.len(),
))]
pub fn compile_module(
    program: &Program,
    env: &GlobalEnv,
    config: &ModuleConfig,
) -> Result<(Module, GlobalEnv), CodegenError> {
    let mut env = env.clone();
    let mut globals = Vec::with_capacity(program.inits.len());
    for init in &program.inits {
        env.declare_global(&init.name);
        if !globals.contains(&init.name) {
            globals.push(init.name.clone());
        }
    }
    for class in &program.classes {
        env.define_class(class);
    }

    let mut functions = Vec::new();
    for def in &program.funs {
        functions.push(lower_function(def)?);
    }
    for class in &program.classes {
        functions.extend(lower_class(class)?);
    }
    if config.emit_runtime {
        functions.extend(runtime::library());
    }

    let main = lower_main(program, &config.main_export)?;
    tracing::debug!(
        globals = globals.len(),
        functions = functions.len(),
        "compiled program"
    );
    let module = Module {
        config: config.clone(),
        globals,
        functions,
        main,
    };
    Ok((module, env))
}

/// The exported function running global initializers and the top-level
/// body. It returns the last expression statement's value.
fn lower_main(program: &Program, name: &str) -> Result<Function, CodegenError> {
    let cx = LoweringCx::new(name, Vec::<String>::new(), &program.body)?;
    let mut body = Vec::new();
    for init in &program.inits {
        lower_value(&cx, &init.value, &mut body);
        body.push(set_var(&cx, &init.name));
    }
    body.extend(lower_body(&cx, &program.body)?);
    body.push(Instr::local_get(LAST));
    body.push(Instr::Return);
    let locals = vec![LAST.to_owned(), SELECTOR.to_owned()];
    Ok(Function::new(name, vec![], locals, body).exported(name))
}
