//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Top-level items (functions, coroutines, the entry point, globals)
//! - Statement parsing (variable definitions, control flow, yield, print)
//! - Expression parsing (binary ops, percentages, calls, coroutine operations)
//! - Syntax error reporting at the offending token
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
