//! Error types and error handling for the translator.
//!
//! This module defines the error types used throughout translation. It
//! includes:
//!
//! - Error structures with source position information
//! - The error taxonomy shared by the front end and the code generator
//! - Located diagnostics in the `[Ln, Col]` format shown to users

pub mod errors;

#[cfg(test)]
mod tests;
