//! Semantic bookkeeping for the code generator.
//!
//! This module owns the two registries consulted while walking the tree:
//!
//! - The scope stack, which enforces the flat no-shadowing rule for
//!   variables and parameters
//! - The function registry, which records every function and coroutine
//!   arity and validates call sites
//!
//! Both are plain values owned by the translation context; nothing here is
//! global or shared between translations.

pub mod environment;
pub mod functions;

#[cfg(test)]
mod tests;
