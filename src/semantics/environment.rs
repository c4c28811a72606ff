use std::collections::HashSet;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::functions::FunctionRegistry;

/// One scope frame: the names declared while traversing a single body or
/// block.
#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashSet<String>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variable_lookup.contains(name)
    }
}

/// The stack of active scope frames. The bottom frame holds globals and is
/// never popped.
///
/// Visibility is flat: a name is taken if *any* active frame declares it,
/// so an inner block can never shadow an outer name.
#[derive(Debug)]
pub struct ScopeStack {
    environments: Vec<Environment>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            environments: vec![Environment::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.environments.push(Environment::new());
    }

    pub fn exit_scope(&mut self, position: &Position) -> Result<(), Error> {
        if self.environments.len() <= 1 {
            return Err(Error::new(ErrorImpl::ScopeUnderflow, position.clone()));
        }

        self.environments.pop();
        Ok(())
    }

    /// Number of frames above the global one.
    pub fn depth(&self) -> usize {
        self.environments.len() - 1
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.environments.iter().any(|env| env.contains(name))
    }

    /// Declares `name` in the innermost frame.
    pub fn declare(
        &mut self,
        name: &str,
        functions: &FunctionRegistry,
        position: &Position,
    ) -> Result<(), Error> {
        if self.is_declared(name) || functions.is_registered(name) {
            return Err(Error::new(
                ErrorImpl::Redefinition {
                    name: name.to_string(),
                },
                position.clone(),
            ));
        }

        if let Some(innermost) = self.environments.last_mut() {
            innermost.variable_lookup.insert(name.to_string());
        }
        Ok(())
    }
}
