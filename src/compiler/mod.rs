//! C++ code generation.
//!
//! This module walks the parsed program once, depth first, and turns it into
//! a single C++17 translation unit. It handles:
//!
//! - Statements and blocks, with scope frames pushed around every block
//! - Expressions, including call-site validation against the registry
//! - Function, entry point and forward declaration signatures, with one
//!   template parameter per source parameter
//! - Lowering coroutines into resumable state-machine classes

pub mod compiler;
pub mod coroutine;
pub mod expr;
pub mod functions;
pub mod stmt;
