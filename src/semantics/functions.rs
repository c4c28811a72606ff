use std::collections::HashMap;

use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::environment::ScopeStack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    Coroutine,
    EntryPoint,
}

/// A registered function or coroutine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub arity: usize,
    pub kind: CallableKind,
    /// Whether a full definition has been seen, as opposed to only a forward
    /// declaration.
    pub defined: bool,
}

/// Permanent table of declared functions and coroutines.
///
/// A record is created the first time a name is seen, whether by a
/// definition or a forward declaration. The only later change is a forward
/// declaration being completed by its matching definition.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    signatures: HashMap<String, Signature>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.signatures.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.signatures.get(name)
    }

    pub fn register(
        &mut self,
        name: &str,
        arity: usize,
        kind: CallableKind,
        is_definition: bool,
        scopes: &ScopeStack,
        position: &Position,
    ) -> Result<(), Error> {
        let redefinition = || {
            Error::new(
                ErrorImpl::Redefinition {
                    name: name.to_string(),
                },
                position.clone(),
            )
        };

        if scopes.is_declared(name) {
            return Err(redefinition());
        }

        match self.signatures.get_mut(name) {
            None => {
                trace!(name, arity, ?kind, is_definition, "registered callable");
                self.signatures.insert(
                    name.to_string(),
                    Signature {
                        name: name.to_string(),
                        arity,
                        kind,
                        defined: is_definition,
                    },
                );
                Ok(())
            }
            Some(signature)
                if is_definition
                    && !signature.defined
                    && signature.kind == kind
                    && signature.arity == arity =>
            {
                signature.defined = true;
                Ok(())
            }
            Some(_) => Err(redefinition()),
        }
    }

    /// Validates a call of `name` with `arg_count` arguments.
    pub fn resolve_call(
        &self,
        name: &str,
        arg_count: usize,
        position: &Position,
    ) -> Result<&Signature, Error> {
        let signature = self.signatures.get(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndefinedFunction {
                    name: name.to_string(),
                },
                position.clone(),
            )
        })?;

        if signature.arity != arg_count {
            return Err(Error::new(
                ErrorImpl::ArityMismatch {
                    name: name.to_string(),
                    expected: signature.arity,
                    provided: arg_count,
                },
                position.clone(),
            ));
        }

        Ok(signature)
    }
}
