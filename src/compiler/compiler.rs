//! Main code generator module.
//!
//! This module contains the `Compiler` context threaded through every
//! generator call and the `compile` entry point that assembles the final
//! translation unit.

use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, ExprWrapper, Stmt, StmtType, StmtWrapper},
        statements::{BlockStmt, CoroutineDeclStmt, EntryPointStmt, FnDeclStmt, VarDefStmt},
    },
    errors::errors::{Error, ErrorImpl},
    parser::stmt::ENTRY_POINT,
    semantics::{
        environment::ScopeStack,
        functions::{CallableKind, FunctionRegistry},
    },
};

use super::{
    coroutine::{gen_coroutine_def, CoroutineLowering},
    expr::gen_expression,
    functions::{gen_entry_point, gen_function_def},
};

/// Headers every generated program relies on.
pub const PRELUDE: &str = "#include <cmath>\n#include <iostream>\n#include <stdexcept>";

const INDENT: &str = "    ";

/// The kind of body currently being generated. Decides whether `return`,
/// `yield` and new variable definitions are legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyKind {
    TopLevel,
    Function,
    Coroutine(CoroutineLowering),
}

/// Traversal context for one translation.
///
/// Holds the scope stack, the function registry and the kind of the body
/// being generated. A fresh context is created per call to `compile`, so no
/// state survives between translations.
#[derive(Debug)]
pub struct Compiler {
    pub scopes: ScopeStack,
    pub functions: FunctionRegistry,
    pub body: BodyKind,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            scopes: ScopeStack::new(),
            functions: FunctionRegistry::new(),
            body: BodyKind::TopLevel,
        }
    }

    pub fn in_coroutine(&self) -> bool {
        matches!(self.body, BodyKind::Coroutine(_))
    }

    /// Runs `gen` with `body` as the current body kind and returns the
    /// generated text together with the body kind as `gen` left it.
    /// The previous body kind is restored afterwards.
    pub fn with_body<T>(
        &mut self,
        body: BodyKind,
        gen: impl FnOnce(&mut Compiler) -> Result<T, Error>,
    ) -> Result<(T, BodyKind), Error> {
        let previous = std::mem::replace(&mut self.body, body);
        let result = gen(self);
        let finished = std::mem::replace(&mut self.body, previous);

        Ok((result?, finished))
    }
}

/// Indents every non-empty line of `text` by one level.
pub fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps already generated statements in braces.
pub fn braced(statements: &[String]) -> String {
    if statements.is_empty() {
        return String::from("{}");
    }

    format!("{{\n{}\n}}", indent(&statements.join("\n")))
}

pub fn downcast_stmt<'s, T: 'static>(
    statement: &'s StmtWrapper,
    expected: &str,
) -> Result<&'s T, Error> {
    statement.downcast::<T>().ok_or_else(|| {
        Error::new(
            ErrorImpl::MalformedTree {
                expected: String::from(expected),
            },
            statement.get_span().start.clone(),
        )
    })
}

pub fn downcast_expr<'e, T: 'static>(
    expression: &'e ExprWrapper,
    expected: &str,
) -> Result<&'e T, Error> {
    expression.downcast::<T>().ok_or_else(|| {
        Error::new(
            ErrorImpl::MalformedTree {
                expected: String::from(expected),
            },
            expression.get_span().start.clone(),
        )
    })
}

/// `x = value;` at the top level. Globals are always declarations.
fn gen_global_var(compiler: &mut Compiler, var_def: &VarDefStmt) -> Result<String, Error> {
    let value = gen_expression(compiler, &var_def.value)?;

    compiler.scopes.declare(
        &var_def.identifier,
        &compiler.functions,
        &var_def.span.start,
    )?;
    debug!(name = %var_def.identifier, "emitted global variable");

    Ok(format!("auto {} = {};", var_def.identifier, value))
}

fn gen_item(compiler: &mut Compiler, item: &StmtWrapper) -> Result<String, Error> {
    match item.get_stmt_type() {
        StmtType::FnDeclStmt => {
            gen_function_def(compiler, downcast_stmt::<FnDeclStmt>(item, "function")?)
        }
        StmtType::CoroutineDeclStmt => gen_coroutine_def(
            compiler,
            downcast_stmt::<CoroutineDeclStmt>(item, "coroutine")?,
        ),
        StmtType::EntryPointStmt => {
            gen_entry_point(compiler, downcast_stmt::<EntryPointStmt>(item, "entry point")?)
        }
        StmtType::VarDefStmt => {
            gen_global_var(compiler, downcast_stmt::<VarDefStmt>(item, "global variable")?)
        }
        _ => Err(Error::new(
            ErrorImpl::MalformedTree {
                expected: String::from("top-level definition"),
            },
            item.get_span().start.clone(),
        )),
    }
}

/// Generates the C++ translation unit for a parsed program.
///
/// Fails on the first semantic error. A program without `def main()` fails
/// with an undefined reference at the end of the input.
pub fn compile(program: &BlockStmt) -> Result<String, Error> {
    let mut compiler = Compiler::new();

    let mut items = vec![String::from(PRELUDE)];
    for item in program.iter() {
        items.push(gen_item(&mut compiler, item)?);
    }

    let has_entry_point = compiler
        .functions
        .get(ENTRY_POINT)
        .is_some_and(|signature| signature.kind == CallableKind::EntryPoint);
    if !has_entry_point {
        return Err(Error::new(
            ErrorImpl::UndefinedFunction {
                name: String::from(ENTRY_POINT),
            },
            program.span.end.clone(),
        ));
    }

    let mut code = items.join("\n\n");
    code.push('\n');
    Ok(code)
}
