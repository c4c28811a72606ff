//! Unit tests for error handling.
//!
//! This module contains tests for error kinds, messages and located
//! diagnostics.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.dtl".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_error_position() {
    let error = Error::new(ErrorImpl::ReturnInCoroutine, at(42));

    assert_eq!(error.get_position().0, 42);
}

#[test]
fn test_redefinition_message() {
    let error = Error::new(
        ErrorImpl::Redefinition {
            name: "x".to_string(),
        },
        at(0),
    );

    assert_eq!(error.to_string(), "'x' redefinition");
    assert_eq!(error.get_kind(), ErrorKind::RedefinitionError);
}

#[test]
fn test_undefined_reference_messages() {
    let variable = Error::new(
        ErrorImpl::UndefinedVariable {
            name: "y".to_string(),
        },
        at(0),
    );
    let function = Error::new(
        ErrorImpl::UndefinedFunction {
            name: "foo".to_string(),
        },
        at(0),
    );

    assert_eq!(variable.to_string(), "y is undefined");
    assert_eq!(function.to_string(), "foo() is undefined");
    assert_eq!(variable.get_kind(), ErrorKind::UndefinedReferenceError);
    assert_eq!(function.get_kind(), ErrorKind::UndefinedReferenceError);
}

#[test]
fn test_arity_mismatch_message() {
    let error = Error::new(
        ErrorImpl::ArityMismatch {
            name: "f".to_string(),
            expected: 0,
            provided: 1,
        },
        at(0),
    );

    assert_eq!(error.get_kind(), ErrorKind::ArityMismatchError);
    assert_eq!(
        error.to_string(),
        "f() must have 0 arguments, but 1 are provided"
    );
}

#[test]
fn test_control_flow_kinds() {
    for error_impl in [
        ErrorImpl::ReturnInCoroutine,
        ErrorImpl::YieldOutsideCoroutine,
        ErrorImpl::DefinitionInCoroutine,
    ] {
        let error = Error::new(error_impl, at(0));
        assert_eq!(error.get_kind(), ErrorKind::IllegalControlFlowError);
    }
}

#[test]
fn test_diagnostic_line_and_column() {
    let source = "def main() {\n    print(x);\n}\n";
    let offset = source.find('x').unwrap() as u32;
    let error = Error::new(
        ErrorImpl::UndefinedVariable {
            name: "x".to_string(),
        },
        at(offset),
    );

    let diagnostic = error.to_diagnostic(source);
    assert_eq!(diagnostic.line, 2);
    assert_eq!(diagnostic.column, 10);
    assert_eq!(diagnostic.to_string(), "Error: x is undefined [Ln 2, Col 10]");
}

#[test]
fn test_diagnostic_at_end_of_input() {
    let source = "x = 1;";
    let error = Error::new(
        ErrorImpl::UndefinedFunction {
            name: "main".to_string(),
        },
        at(source.len() as u32),
    );

    let diagnostic = error.to_diagnostic(source);
    assert_eq!(diagnostic.line, 1);
    assert_eq!(diagnostic.column, 6);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
