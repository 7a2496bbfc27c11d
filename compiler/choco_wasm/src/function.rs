//! Function and class lowering.

use choco_ir::{Class, FunDef};
use rustc_hash::FxHashSet;

use crate::env::LoweringCx;
use crate::expr::lower_value;
use crate::reloop::{LAST, SELECTOR};
use crate::stmt::lower_body;
use crate::{CodegenError, Function, Instr};

/// Flat name of method `method` of class `class`.
pub fn mangle_method(class: &str, method: &str) -> String {
    format!("{class}${method}")
}

pub fn lower_function(def: &FunDef) -> Result<Function, CodegenError> {
    lower_named(&def.name, def)
}

/// Lower every method of `class` as a flat `Class$method` function.
#[tracing::instrument(level = "debug", skip_all, fields(class = %class.name, methods = class.methods.len()))]
pub fn lower_class(class: &Class) -> Result<Vec<Function>, CodegenError> {
    class
        .methods
        .iter()
        .map(|method| lower_named(&mangle_method(&class.name, &method.name), method))
        .collect()
}

#[tracing::instrument(level = "debug", skip_all, fields(name = %name))]
fn lower_named(name: &str, def: &FunDef) -> Result<Function, CodegenError> {
    let params: Vec<String> = def.parameters.iter().map(|p| p.name.clone()).collect();

    let mut seen = FxHashSet::default();
    let mut locals: Vec<String> = def
        .inits
        .iter()
        .filter(|init| seen.insert(init.name.as_str()))
        .map(|init| init.name.clone())
        .collect();
    locals.push(LAST.to_owned());
    locals.push(SELECTOR.to_owned());

    let cx = LoweringCx::new(name, params.iter().chain(&locals).cloned(), &def.body)?;

    let mut body = Vec::new();
    for init in &def.inits {
        lower_value(&cx, &init.value, &mut body);
        body.push(Instr::local_set(init.name.as_str()));
    }
    body.extend(lower_body(&cx, &def.body)?);
    body.push(Instr::I32Const(0));
    body.push(Instr::Return);

    tracing::debug!(name, instrs = body.len(), "lowered function");
    Ok(Function::new(name, params, locals, body))
}
