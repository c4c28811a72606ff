//! Coroutine lowering.
//!
//! A coroutine becomes a class template holding its parameters as fields
//! and an integer `state` counting the yields already executed. Each call
//! of `next()` jumps through a dispatch table to the point right after the
//! last executed yield and runs until the next one:
//!
//! ```text
//! template <class T0>
//! class counter {
//!     int state = 0;
//!     T0 i;
//! public:
//!     counter(T0 i) : i(i) {}
//!     auto next() {
//!         switch (state) {
//!             case 0: goto start;
//!             case 1: goto state0;
//!             default: throw std::runtime_error("Coroutine is over");
//!         }
//!         start:;
//!         i = 0;
//!         state++;
//!         return i;
//!         state0:;
//!         i = i + 1;
//!         state++;
//!         return i;
//!         state1:;
//!         throw std::runtime_error("Coroutine is over");
//!     }
//! };
//! ```
//!
//! Jumping over declarations is ill-formed in C++, which is one reason
//! coroutine bodies cannot define new variables.

use tracing::debug;

use crate::{
    ast::statements::{CoroutineDeclStmt, Parameter},
    errors::errors::{Error, ErrorImpl},
    semantics::functions::CallableKind,
};

use super::{
    compiler::{braced, indent, BodyKind, Compiler},
    functions::{declare_parameters, typed_parameters, TemplateHeader},
    stmt::gen_block_contents,
};

/// Runtime message of a resumed, already finished coroutine.
pub const COROUTINE_EXHAUSTED: &str = "Coroutine is over";

const STATE_FIELD: &str = "state";
const START_LABEL: &str = "start";

/// Per-coroutine lowering scratch, live for one coroutine definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoroutineLowering {
    pub parameter_count: usize,
    pub yield_count: usize,
}

impl CoroutineLowering {
    pub fn new(parameter_count: usize) -> Self {
        CoroutineLowering {
            parameter_count,
            yield_count: 0,
        }
    }

    /// Lowers one `yield value;` into a state bump, a return and the label
    /// the dispatch table resumes at.
    pub fn lower_yield(&mut self, value: &str) -> String {
        let label = resume_label(self.yield_count);
        self.yield_count += 1;

        format!("{}++;\nreturn {};\n{}:;", STATE_FIELD, value, label)
    }
}

pub fn resume_label(index: usize) -> String {
    format!("{}{}", STATE_FIELD, index)
}

fn exhausted() -> String {
    format!("throw std::runtime_error(\"{}\");", COROUTINE_EXHAUSTED)
}

/// The `switch` that sends each `next()` call to its resume point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTable {
    pub yield_count: usize,
}

impl DispatchTable {
    pub fn render(&self) -> String {
        let mut cases = vec![format!("case 0: goto {};", START_LABEL)];
        for state in 1..self.yield_count {
            cases.push(format!("case {}: goto {};", state, resume_label(state - 1)));
        }
        cases.push(format!("default: {}", exhausted()));

        format!("switch ({}) {}", STATE_FIELD, braced(&cases))
    }
}

/// A fully lowered coroutine, assembled into a class template.
#[derive(Debug, Clone)]
pub struct CoroutineClass {
    pub name: String,
    pub template: TemplateHeader,
    pub parameters: Vec<Parameter>,
    pub dispatch: DispatchTable,
    pub body: Vec<String>,
}

impl CoroutineClass {
    pub fn new(
        name: &str,
        parameters: &[Parameter],
        lowering: CoroutineLowering,
        body: Vec<String>,
    ) -> Self {
        CoroutineClass {
            name: String::from(name),
            template: TemplateHeader::new(lowering.parameter_count),
            parameters: parameters.to_vec(),
            dispatch: DispatchTable {
                yield_count: lowering.yield_count,
            },
            body,
        }
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![format!("int {} = 0;", STATE_FIELD)];
        for (index, parameter) in self.parameters.iter().enumerate() {
            fields.push(format!(
                "{} {};",
                TemplateHeader::type_name(index),
                parameter.name
            ));
        }
        fields
    }

    fn constructor(&self) -> String {
        if self.parameters.is_empty() {
            return format!("{}() {{}}", self.name);
        }

        let initializers = self
            .parameters
            .iter()
            .map(|parameter| format!("{}({})", parameter.name, parameter.name))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{}({}) : {} {{}}",
            self.name,
            typed_parameters(&self.parameters),
            initializers
        )
    }

    fn next_method(&self) -> String {
        let mut statements = vec![self.dispatch.render(), format!("{}:;", START_LABEL)];
        statements.extend(self.body.iter().cloned());
        statements.push(exhausted());

        format!("auto next() {}", braced(&statements))
    }

    pub fn render(&self) -> String {
        let private = self.fields().join("\n");
        let public = format!("{}\n{}", self.constructor(), self.next_method());

        let class = format!(
            "class {} {{\n{}\npublic:\n{}\n}};",
            self.name,
            indent(&private),
            indent(&public)
        );

        self.template.apply(class)
    }

    /// `template <class T0> class name;`
    pub fn forward_declaration(name: &str, arity: usize) -> String {
        TemplateHeader::new(arity).apply(format!("class {};", name))
    }
}

pub fn gen_coroutine_def(
    compiler: &mut Compiler,
    coroutine: &CoroutineDeclStmt,
) -> Result<String, Error> {
    let arity = coroutine.parameters.len();

    compiler.functions.register(
        &coroutine.identifier,
        arity,
        CallableKind::Coroutine,
        coroutine.body.is_some(),
        &compiler.scopes,
        &coroutine.span.start,
    )?;

    let body = match &coroutine.body {
        Some(body) => body,
        None => {
            debug!(name = %coroutine.identifier, arity, "emitted coroutine forward declaration");
            return Ok(CoroutineClass::forward_declaration(
                &coroutine.identifier,
                arity,
            ));
        }
    };

    // The generated class owns a `state` member, which would hide any
    // parameter, global or function of that name inside the body
    let hidden = coroutine
        .parameters
        .iter()
        .find(|parameter| parameter.name == STATE_FIELD)
        .map(|parameter| parameter.span.start.clone())
        .or_else(|| {
            (compiler.scopes.is_declared(STATE_FIELD)
                || compiler.functions.is_registered(STATE_FIELD))
            .then(|| coroutine.span.start.clone())
        });
    if let Some(position) = hidden {
        return Err(Error::new(
            ErrorImpl::Redefinition {
                name: String::from(STATE_FIELD),
            },
            position,
        ));
    }

    declare_parameters(compiler, &coroutine.parameters)?;
    let (statements, finished) = compiler.with_body(
        BodyKind::Coroutine(CoroutineLowering::new(arity)),
        |compiler| gen_block_contents(compiler, body),
    )?;
    compiler.scopes.exit_scope(&coroutine.span.end)?;

    let lowering = match finished {
        BodyKind::Coroutine(lowering) => lowering,
        _ => CoroutineLowering::new(arity),
    };
    debug!(
        name = %coroutine.identifier,
        arity,
        yields = lowering.yield_count,
        "lowered coroutine"
    );

    let class = CoroutineClass::new(
        &coroutine.identifier,
        &coroutine.parameters,
        lowering,
        statements,
    );
    Ok(class.render())
}
