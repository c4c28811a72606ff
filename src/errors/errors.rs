use std::fmt::Display;

use thiserror::Error;

use crate::{locate, Position};

/// The error categories a translation can fail with.
///
/// `CoroutineExhausted` is never produced while translating: it names the
/// fault raised by a generated program when a finished coroutine is resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SyntaxError,
    RedefinitionError,
    UndefinedReferenceError,
    ArityMismatchError,
    IllegalControlFlowError,
    CoroutineExhaustedError,
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. } => ErrorKind::SyntaxError,
            ErrorImpl::Redefinition { .. } => ErrorKind::RedefinitionError,
            ErrorImpl::UndefinedVariable { .. } | ErrorImpl::UndefinedFunction { .. } => {
                ErrorKind::UndefinedReferenceError
            }
            ErrorImpl::ArityMismatch { .. } => ErrorKind::ArityMismatchError,
            ErrorImpl::ReturnInCoroutine
            | ErrorImpl::YieldOutsideCoroutine
            | ErrorImpl::DefinitionInCoroutine => ErrorKind::IllegalControlFlowError,
            ErrorImpl::ScopeUnderflow | ErrorImpl::MalformedTree { .. } => {
                ErrorKind::InternalError
            }
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::Redefinition { .. } => "Redefinition",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::ReturnInCoroutine => "ReturnInCoroutine",
            ErrorImpl::YieldOutsideCoroutine => "YieldOutsideCoroutine",
            ErrorImpl::DefinitionInCoroutine => "DefinitionInCoroutine",
            ErrorImpl::ScopeUnderflow => "ScopeUnderflow",
            ErrorImpl::MalformedTree { .. } => "MalformedTree",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { .. } => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::Redefinition { .. } => ErrorTip::Suggestion(String::from(
                "names cannot be reused while an earlier declaration is visible",
            )),
            ErrorImpl::UndefinedFunction { .. } => ErrorTip::Suggestion(String::from(
                "define the function or forward-declare it before the call",
            )),
            ErrorImpl::DefinitionInCoroutine => ErrorTip::Suggestion(String::from(
                "coroutines may only assign to parameters or existing variables",
            )),
            ErrorImpl::ReturnInCoroutine => {
                ErrorTip::Suggestion(String::from("use yield to hand a value back"))
            }
            _ => ErrorTip::None,
        }
    }

    /// Resolves the byte offset of this error against `source`, producing the
    /// line/column diagnostic shown to the user.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let (line, column) = locate(source, self.position.0);

        Diagnostic {
            kind: self.get_kind(),
            message: self.internal_error.to_string(),
            line,
            column,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// A located, user-facing error report. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Error: {} [Ln {}, Col {}]",
            self.message, self.line, self.column
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("token recognition error at: '{token}'")]
    UnrecognisedToken { token: String },
    #[error("unexpected token '{token}'")]
    UnexpectedToken { token: String },
    #[error("unexpected token '{token}', {message}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("'{name}' redefinition")]
    Redefinition { name: String },
    #[error("{name} is undefined")]
    UndefinedVariable { name: String },
    #[error("{name}() is undefined")]
    UndefinedFunction { name: String },
    #[error("{name}() must have {expected} arguments, but {provided} are provided")]
    ArityMismatch {
        name: String,
        expected: usize,
        provided: usize,
    },
    #[error("Unable to use return in the coroutine function")]
    ReturnInCoroutine,
    #[error("Unable to use yield in the default function")]
    YieldOutsideCoroutine,
    #[error("Unable to define variable in coroutine")]
    DefinitionInCoroutine,
    #[error("attempted to leave the global scope")]
    ScopeUnderflow,
    #[error("malformed syntax tree: expected {expected}")]
    MalformedTree { expected: String },
}
