use tracing::trace;

use crate::{
    ast::{
        ast::{Stmt, StmtType, StmtWrapper},
        statements::{
            BlockStmt, ExpressionStmt, IfStmt, PrintStmt, ReturnStmt, VarDefStmt, YieldStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::{braced, downcast_stmt, BodyKind, Compiler},
    expr::{gen_expression, gen_stream_operand},
};

pub fn gen_statement(compiler: &mut Compiler, statement: &StmtWrapper) -> Result<String, Error> {
    match statement.get_stmt_type() {
        StmtType::ExpressionStmt => {
            let expression_stmt = downcast_stmt::<ExpressionStmt>(statement, "expression")?;
            let code = gen_expression(compiler, &expression_stmt.expression)?;

            Ok(terminate(code))
        }
        StmtType::BlockStmt => gen_block(compiler, downcast_stmt::<BlockStmt>(statement, "block")?),
        StmtType::VarDefStmt => {
            gen_var_def(compiler, downcast_stmt::<VarDefStmt>(statement, "variable")?)
        }
        StmtType::IfStmt => gen_if(compiler, downcast_stmt::<IfStmt>(statement, "if")?),
        StmtType::ReturnStmt => {
            let return_stmt = downcast_stmt::<ReturnStmt>(statement, "return")?;

            if compiler.in_coroutine() {
                return Err(Error::new(
                    ErrorImpl::ReturnInCoroutine,
                    return_stmt.span.start.clone(),
                ));
            }

            match &return_stmt.value {
                Some(value) => Ok(format!("return {};", gen_expression(compiler, value)?)),
                None => Ok(String::from("return;")),
            }
        }
        StmtType::YieldStmt => {
            let yield_stmt = downcast_stmt::<YieldStmt>(statement, "yield")?;

            if !compiler.in_coroutine() {
                return Err(Error::new(
                    ErrorImpl::YieldOutsideCoroutine,
                    yield_stmt.span.start.clone(),
                ));
            }

            let value = gen_expression(compiler, &yield_stmt.value)?;
            match &mut compiler.body {
                BodyKind::Coroutine(lowering) => Ok(lowering.lower_yield(&value)),
                _ => Err(Error::new(
                    ErrorImpl::YieldOutsideCoroutine,
                    yield_stmt.span.start.clone(),
                )),
            }
        }
        StmtType::PrintStmt => {
            let print_stmt = downcast_stmt::<PrintStmt>(statement, "print")?;

            let mut code = String::from("std::cout");
            for argument in print_stmt.arguments.iter() {
                code.push_str(" << ");
                code.push_str(&gen_stream_operand(compiler, argument)?);
            }
            code.push_str(" << \"\\n\";");

            Ok(code)
        }
        StmtType::FnDeclStmt | StmtType::CoroutineDeclStmt | StmtType::EntryPointStmt => {
            Err(Error::new(
                ErrorImpl::MalformedTree {
                    expected: String::from("statement"),
                },
                statement.get_span().start.clone(),
            ))
        }
    }
}

/// Appends a terminator unless `code` already ends with one.
pub fn terminate(mut code: String) -> String {
    if !code.ends_with(';') {
        code.push(';');
    }
    code
}

/// Generates the statements of `block` in a fresh scope frame, without the
/// surrounding braces.
pub fn gen_block_contents(
    compiler: &mut Compiler,
    block: &BlockStmt,
) -> Result<Vec<String>, Error> {
    compiler.scopes.enter_scope();

    let mut statements = Vec::with_capacity(block.body.len());
    for statement in block.iter() {
        statements.push(gen_statement(compiler, statement)?);
    }

    compiler.scopes.exit_scope(&block.span.end)?;
    Ok(statements)
}

pub fn gen_block(compiler: &mut Compiler, block: &BlockStmt) -> Result<String, Error> {
    Ok(braced(&gen_block_contents(compiler, block)?))
}

/// The body of an `if` or `else`. Single statements get their own block and
/// scope frame, so `else if` comes out as `else { if ... }`.
fn gen_branch(compiler: &mut Compiler, body: &StmtWrapper) -> Result<String, Error> {
    if let Some(block) = body.downcast::<BlockStmt>() {
        return gen_block(compiler, block);
    }

    compiler.scopes.enter_scope();
    let statement = gen_statement(compiler, body)?;
    compiler.scopes.exit_scope(&body.get_span().end)?;

    Ok(braced(&[statement]))
}

fn gen_if(compiler: &mut Compiler, if_stmt: &IfStmt) -> Result<String, Error> {
    let condition = gen_expression(compiler, &if_stmt.condition)?;
    let then_body = gen_branch(compiler, &if_stmt.then_body)?;

    let mut code = format!("if ({}) {}", condition, then_body);
    if let Some(else_body) = &if_stmt.else_body {
        code.push_str(" else ");
        code.push_str(&gen_branch(compiler, else_body)?);
    }

    Ok(code)
}

/// The first definition of a name declares it, later ones assign to it.
fn gen_var_def(compiler: &mut Compiler, var_def: &VarDefStmt) -> Result<String, Error> {
    let value = gen_expression(compiler, &var_def.value)?;

    if compiler.scopes.is_declared(&var_def.identifier) {
        return Ok(format!("{} = {};", var_def.identifier, value));
    }

    if compiler.in_coroutine() {
        return Err(Error::new(
            ErrorImpl::DefinitionInCoroutine,
            var_def.span.start.clone(),
        ));
    }

    compiler.scopes.declare(
        &var_def.identifier,
        &compiler.functions,
        &var_def.span.start,
    )?;
    trace!(name = %var_def.identifier, depth = compiler.scopes.depth(), "declared variable");

    Ok(format!("auto {} = {};", var_def.identifier, value))
}
