use anyhow::{Result, anyhow};

use crate::ast::{BinOp, Expr, Program, Stmt, UnaryOp};
use crate::interp::{ExecContext, Raised};
use crate::val::Val;

enum Flow {
    Normal,
    Break,
    Continue,
}

/// Run a program with the context's namespace as its complete variable
/// scope. Returns the value of the last expression statement, for
/// interactive echo; assignments and control flow yield nil.
pub fn run_program(program: &Program, ctx: &mut ExecContext) -> Result<Val> {
    let mut last = Val::Nil;
    for stmt in &program.stmts {
        match exec_stmt(stmt, ctx, &mut last)? {
            Flow::Normal => {}
            Flow::Break => return Err(anyhow!("'break' outside of a loop")),
            Flow::Continue => return Err(anyhow!("'continue' outside of a loop")),
        }
    }
    Ok(last)
}

fn exec_block(stmts: &[Stmt], ctx: &mut ExecContext, last: &mut Val) -> Result<Flow> {
    for stmt in stmts {
        match exec_stmt(stmt, ctx, last)? {
            Flow::Normal => {}
            flow => return Ok(flow),
        }
    }
    Ok(Flow::Normal)
}

fn exec_stmt(stmt: &Stmt, ctx: &mut ExecContext, last: &mut Val) -> Result<Flow> {
    match stmt {
        Stmt::Expr(expr) => {
            *last = eval_expr(expr, ctx)?;
            Ok(Flow::Normal)
        }
        Stmt::Assign { name, value } => {
            let value = eval_expr(value, ctx)?;
            ctx.globals_mut().insert(name.clone(), value);
            *last = Val::Nil;
            Ok(Flow::Normal)
        }
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => {
            if eval_expr(cond, ctx)?.is_truthy() {
                exec_block(then_body, ctx, last)
            } else {
                exec_block(else_body, ctx, last)
            }
        }
        Stmt::While { cond, body } => {
            while eval_expr(cond, ctx)?.is_truthy() {
                match exec_block(body, ctx, last)? {
                    Flow::Normal | Flow::Continue => {}
                    Flow::Break => break,
                }
            }
            Ok(Flow::Normal)
        }
        Stmt::Break => Ok(Flow::Break),
        Stmt::Continue => Ok(Flow::Continue),
        Stmt::Raise { kind, message } => {
            let message = eval_expr(message, ctx)?;
            Err(anyhow::Error::new(Raised {
                kind: kind.clone(),
                message: message.to_string(),
            }))
        }
    }
}

fn eval_expr(expr: &Expr, ctx: &mut ExecContext) -> Result<Val> {
    match expr {
        Expr::Nil => Ok(Val::Nil),
        Expr::Bool(b) => Ok(Val::Bool(*b)),
        Expr::Int(n) => Ok(Val::Int(*n)),
        Expr::Float(x) => Ok(Val::Float(*x)),
        Expr::Str(s) => Ok(Val::Str(s.as_str().into())),
        Expr::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval_expr(item, ctx)?);
            }
            Ok(Val::List(out))
        }
        Expr::Var(name) => ctx
            .get_global(name)
            .cloned()
            .ok_or_else(|| anyhow!("Undefined variable '{}'", name)),
        Expr::Unary { op, expr } => {
            let value = eval_expr(expr, ctx)?;
            match op {
                UnaryOp::Neg => value.negate(),
                UnaryOp::Not => Ok(Val::Bool(!value.is_truthy())),
            }
        }
        Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, ctx),
        Expr::Index { target, index } => {
            let target = eval_expr(target, ctx)?;
            let index = eval_expr(index, ctx)?;
            let idx = match index {
                Val::Int(n) => n,
                other => return Err(anyhow!("List index must be int, got {}", other.type_name())),
            };
            match target {
                Val::List(items) => {
                    if idx < 0 || idx as usize >= items.len() {
                        return Err(anyhow!(
                            "Index {} out of bounds for list of length {}",
                            idx,
                            items.len()
                        ));
                    }
                    Ok(items[idx as usize].clone())
                }
                other => Err(anyhow!("Cannot index {}", other.type_name())),
            }
        }
        Expr::Call { callee, args } => {
            let func = match ctx.get_global(callee) {
                Some(Val::Native(func)) => func.clone(),
                Some(other) => {
                    return Err(anyhow!("'{}' is not callable ({})", callee, other.type_name()));
                }
                None => return Err(anyhow!("Undefined function '{}'", callee)),
            };
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                evaluated.push(eval_expr(arg, ctx)?);
            }
            func.call(&evaluated, ctx)
        }
    }
}

fn eval_binary(op: BinOp, lhs: &Expr, rhs: &Expr, ctx: &mut ExecContext) -> Result<Val> {
    // Short-circuit logic evaluates the right side lazily
    match op {
        BinOp::And => {
            let l = eval_expr(lhs, ctx)?;
            if !l.is_truthy() {
                return Ok(l);
            }
            return eval_expr(rhs, ctx);
        }
        BinOp::Or => {
            let l = eval_expr(lhs, ctx)?;
            if l.is_truthy() {
                return Ok(l);
            }
            return eval_expr(rhs, ctx);
        }
        _ => {}
    }

    let l = eval_expr(lhs, ctx)?;
    let r = eval_expr(rhs, ctx)?;
    match op {
        BinOp::Add => &l + &r,
        BinOp::Sub => &l - &r,
        BinOp::Mul => &l * &r,
        BinOp::Div => &l / &r,
        BinOp::Mod => &l % &r,
        BinOp::Eq => Ok(Val::Bool(l == r)),
        BinOp::Ne => Ok(Val::Bool(l != r)),
        BinOp::Lt => Ok(Val::Bool(l.compare(&r)?.is_lt())),
        BinOp::Le => Ok(Val::Bool(l.compare(&r)?.is_le())),
        BinOp::Gt => Ok(Val::Bool(l.compare(&r)?.is_gt())),
        BinOp::Ge => Ok(Val::Bool(l.compare(&r)?.is_ge())),
        BinOp::And | BinOp::Or => unreachable!("handled above"),
    }
}
