//! Signatures for functions, forward declarations and the entry point.
//!
//! DTlang carries no static types, so every parameter becomes its own
//! template parameter: the i-th parameter is declared as `Ti`. Signatures
//! are assembled from the builders below before any body text is attached.

use std::fmt::Display;

use tracing::debug;

use crate::{
    ast::statements::{EntryPointStmt, FnDeclStmt, Parameter},
    errors::errors::Error,
    parser::stmt::ENTRY_POINT,
    semantics::functions::CallableKind,
};

use super::{
    compiler::{BodyKind, Compiler},
    stmt::gen_block,
};

/// `template <class T0, ...>`, empty for zero parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateHeader {
    pub arity: usize,
}

impl TemplateHeader {
    pub fn new(arity: usize) -> Self {
        TemplateHeader { arity }
    }

    pub fn is_empty(&self) -> bool {
        self.arity == 0
    }

    pub fn type_name(index: usize) -> String {
        format!("T{}", index)
    }

    /// Prepends the header line to `declaration`, if there is one.
    pub fn apply(&self, declaration: String) -> String {
        if self.is_empty() {
            declaration
        } else {
            format!("{}\n{}", self, declaration)
        }
    }
}

impl Display for TemplateHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let classes = (0..self.arity)
            .map(|index| format!("class {}", TemplateHeader::type_name(index)))
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "template <{}>", classes)
    }
}

/// Renders `T0 a, T1 b` for a parameter list.
pub fn typed_parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            format!("{} {}", TemplateHeader::type_name(index), parameter.name)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// A complete function signature without its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub template: TemplateHeader,
    pub return_type: &'static str,
    pub name: String,
    pub parameters: String,
}

impl FunctionSignature {
    /// `template <class T0> auto name(T0 a)`
    pub fn generic(name: &str, parameters: &[Parameter]) -> Self {
        FunctionSignature {
            template: TemplateHeader::new(parameters.len()),
            return_type: "auto",
            name: String::from(name),
            parameters: typed_parameters(parameters),
        }
    }

    /// `int main()`, whatever the source parameter list was.
    pub fn entry_point() -> Self {
        FunctionSignature {
            template: TemplateHeader::new(0),
            return_type: "int",
            name: String::from(ENTRY_POINT),
            parameters: String::new(),
        }
    }

    pub fn forward_declaration(&self) -> String {
        self.template.apply(format!(
            "{} {}({});",
            self.return_type, self.name, self.parameters
        ))
    }

    pub fn definition(&self, body: &str) -> String {
        self.template.apply(format!(
            "{} {}({}) {}",
            self.return_type, self.name, self.parameters, body
        ))
    }
}

/// Opens a scope frame holding `parameters`. The caller must exit it.
pub fn declare_parameters(
    compiler: &mut Compiler,
    parameters: &[Parameter],
) -> Result<(), Error> {
    compiler.scopes.enter_scope();

    for parameter in parameters {
        compiler
            .scopes
            .declare(&parameter.name, &compiler.functions, &parameter.span.start)?;
    }

    Ok(())
}

pub fn gen_function_def(compiler: &mut Compiler, function: &FnDeclStmt) -> Result<String, Error> {
    compiler.functions.register(
        &function.identifier,
        function.parameters.len(),
        CallableKind::Function,
        function.body.is_some(),
        &compiler.scopes,
        &function.span.start,
    )?;

    let signature = FunctionSignature::generic(&function.identifier, &function.parameters);

    let body = match &function.body {
        Some(body) => body,
        None => {
            debug!(name = %function.identifier, "emitted forward declaration");
            return Ok(signature.forward_declaration());
        }
    };

    declare_parameters(compiler, &function.parameters)?;
    let (body_code, _) =
        compiler.with_body(BodyKind::Function, |compiler| gen_block(compiler, body))?;
    compiler.scopes.exit_scope(&function.span.end)?;

    debug!(name = %function.identifier, "emitted function");
    Ok(signature.definition(&body_code))
}

pub fn gen_entry_point(compiler: &mut Compiler, entry: &EntryPointStmt) -> Result<String, Error> {
    compiler.functions.register(
        ENTRY_POINT,
        0,
        CallableKind::EntryPoint,
        true,
        &compiler.scopes,
        &entry.span.start,
    )?;

    let (body_code, _) =
        compiler.with_body(BodyKind::Function, |compiler| gen_block(compiler, &entry.body))?;

    debug!("emitted entry point");
    Ok(FunctionSignature::entry_point().definition(&body_code))
}
