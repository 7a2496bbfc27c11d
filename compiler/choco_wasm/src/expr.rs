//! Value and expression lowering.
//!
//! Every expression leaves exactly one `i32` on the stack. Operands lower
//! left to right.

use choco_ir::{BinOp, Expr, Type, UniOp, Value};

use crate::env::LoweringCx;
use crate::{host, CodegenError, Instr, NumOp};

pub fn lower_value(cx: &LoweringCx, value: &Value, out: &mut Vec<Instr>) {
    let instr = match value {
        Value::Num { value } | Value::Wasmint { value } => Instr::I32Const(*value),
        Value::Bool { value } => Instr::I32Const(i32::from(*value)),
        Value::None => Instr::I32Const(0),
        Value::Id { name, .. } if cx.is_local(name) => Instr::LocalGet(name.clone()),
        Value::Id { name, .. } => Instr::GlobalGet(name.clone()),
    };
    out.push(instr);
}

pub fn lower_expr(cx: &LoweringCx, expr: &Expr, out: &mut Vec<Instr>) -> Result<(), CodegenError> {
    match expr {
        Expr::Value { value } => lower_value(cx, value, out),
        Expr::BinOp { op, left, right } => {
            lower_value(cx, left, out);
            lower_value(cx, right, out);
            out.push(Instr::Num(binop(*op)));
        }
        Expr::UniOp { op: UniOp::Neg, expr } => {
            out.push(Instr::I32Const(0));
            lower_value(cx, expr, out);
            out.push(Instr::Num(NumOp::Sub));
        }
        Expr::UniOp { op: UniOp::Not, expr } => {
            out.push(Instr::I32Const(0));
            lower_value(cx, expr, out);
            out.push(Instr::Num(NumOp::Eq));
        }
        Expr::Builtin1 { name, arg } => {
            let callee = if name == "print" {
                print_routine(&arg.ty())?
            } else {
                name.as_str()
            };
            lower_value(cx, arg, out);
            out.push(Instr::call(callee));
        }
        Expr::Builtin2 { name, left, right } => {
            lower_value(cx, left, out);
            lower_value(cx, right, out);
            out.push(Instr::call(name.as_str()));
        }
        Expr::Call { name, arguments } => {
            for arg in arguments {
                lower_value(cx, arg, out);
            }
            out.push(Instr::call(name.as_str()));
        }
        Expr::Alloc { amount } => {
            lower_value(cx, amount, out);
            out.push(Instr::call(host::ALLOC));
        }
        Expr::Load { start, offset } => {
            lower_value(cx, start, out);
            out.push(Instr::call(host::ASSERT_NOT_NONE));
            lower_value(cx, offset, out);
            out.push(Instr::call(host::LOAD));
        }
    }
    Ok(())
}

/// The target operator for a binary IR operator.
///
/// `is` compares addresses, so it shares `i32.eq` with `==`.
pub fn binop(op: BinOp) -> NumOp {
    match op {
        BinOp::Plus => NumOp::Add,
        BinOp::Minus => NumOp::Sub,
        BinOp::Mul => NumOp::Mul,
        BinOp::IDiv => NumOp::DivS,
        BinOp::Mod => NumOp::RemS,
        BinOp::Eq | BinOp::Is => NumOp::Eq,
        BinOp::Neq => NumOp::Ne,
        BinOp::Lte => NumOp::LeS,
        BinOp::Gte => NumOp::GeS,
        BinOp::Lt => NumOp::LtS,
        BinOp::Gt => NumOp::GtS,
        BinOp::And => NumOp::And,
        BinOp::Or => NumOp::Or,
    }
}

fn print_routine(ty: &Type) -> Result<&'static str, CodegenError> {
    match ty {
        Type::Num => Ok(host::PRINT_NUM),
        Type::Bool => Ok(host::PRINT_BOOL),
        Type::None => Ok(host::PRINT_NONE),
        Type::Class { .. } => Err(CodegenError::NoPrintOverload { ty: ty.clone() }),
    }
}

#[cfg(test)]
mod tests;
