//! Unit tests for the scope stack and the function registry.

use std::rc::Rc;

use crate::{
    errors::errors::{ErrorImpl, ErrorKind},
    Position,
};

use super::{
    environment::ScopeStack,
    functions::{CallableKind, FunctionRegistry},
};

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.dtl".to_string()))
}

#[test]
fn test_declare_and_lookup() {
    let functions = FunctionRegistry::new();
    let mut scopes = ScopeStack::new();

    scopes.declare("x", &functions, &at(0)).unwrap();
    assert!(scopes.is_declared("x"));
    assert!(!scopes.is_declared("y"));
}

#[test]
fn test_names_in_outer_frames_cannot_be_shadowed() {
    let functions = FunctionRegistry::new();
    let mut scopes = ScopeStack::new();

    scopes.declare("x", &functions, &at(0)).unwrap();
    scopes.enter_scope();
    scopes.enter_scope();

    let error = scopes.declare("x", &functions, &at(7)).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::RedefinitionError);
    assert_eq!(error.get_position().0, 7);
}

#[test]
fn test_names_are_forgotten_when_their_frame_is_popped() {
    let functions = FunctionRegistry::new();
    let mut scopes = ScopeStack::new();

    scopes.enter_scope();
    scopes.declare("tmp", &functions, &at(0)).unwrap();
    scopes.exit_scope(&at(0)).unwrap();

    assert!(!scopes.is_declared("tmp"));
    scopes.declare("tmp", &functions, &at(0)).unwrap();
}

#[test]
fn test_variable_cannot_take_a_function_name() {
    let mut functions = FunctionRegistry::new();
    let mut scopes = ScopeStack::new();

    functions
        .register("f", 0, CallableKind::Function, true, &scopes, &at(0))
        .unwrap();

    let error = scopes.declare("f", &functions, &at(3)).unwrap_err();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::Redefinition {
            name: "f".to_string()
        }
    );
}

#[test]
fn test_exit_global_scope_fails() {
    let mut scopes = ScopeStack::new();

    let error = scopes.exit_scope(&at(0)).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::InternalError);

    scopes.enter_scope();
    assert_eq!(scopes.depth(), 1);
    scopes.exit_scope(&at(0)).unwrap();
    assert_eq!(scopes.depth(), 0);
}

#[test]
fn test_register_twice_fails() {
    let mut functions = FunctionRegistry::new();
    let scopes = ScopeStack::new();

    functions
        .register("f", 1, CallableKind::Function, true, &scopes, &at(0))
        .unwrap();

    let error = functions
        .register("f", 1, CallableKind::Function, true, &scopes, &at(20))
        .unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::RedefinitionError);

    let error = functions
        .register("f", 0, CallableKind::Coroutine, true, &scopes, &at(40))
        .unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::RedefinitionError);
}

#[test]
fn test_register_cannot_take_a_variable_name() {
    let mut functions = FunctionRegistry::new();
    let mut scopes = ScopeStack::new();
    scopes.declare("g", &functions, &at(0)).unwrap();

    let error = functions
        .register("g", 0, CallableKind::Coroutine, true, &scopes, &at(5))
        .unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::RedefinitionError);
}

#[test]
fn test_forward_declaration_is_completed_once() {
    let mut functions = FunctionRegistry::new();
    let scopes = ScopeStack::new();

    functions
        .register("g", 2, CallableKind::Coroutine, false, &scopes, &at(0))
        .unwrap();
    assert!(!functions.get("g").unwrap().defined);

    functions
        .register("g", 2, CallableKind::Coroutine, true, &scopes, &at(10))
        .unwrap();
    assert!(functions.get("g").unwrap().defined);

    let error = functions
        .register("g", 2, CallableKind::Coroutine, true, &scopes, &at(20))
        .unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::RedefinitionError);
}

#[test]
fn test_forward_declaration_must_match() {
    let mut functions = FunctionRegistry::new();
    let scopes = ScopeStack::new();

    functions
        .register("f", 1, CallableKind::Function, false, &scopes, &at(0))
        .unwrap();

    assert!(functions
        .register("f", 2, CallableKind::Function, true, &scopes, &at(10))
        .is_err());
    assert!(functions
        .register("f", 1, CallableKind::Coroutine, true, &scopes, &at(10))
        .is_err());
    assert!(functions
        .register("f", 1, CallableKind::Function, false, &scopes, &at(10))
        .is_err());
}

#[test]
fn test_resolve_call() {
    let mut functions = FunctionRegistry::new();
    let scopes = ScopeStack::new();
    functions
        .register("add", 2, CallableKind::Function, true, &scopes, &at(0))
        .unwrap();

    let signature = functions.resolve_call("add", 2, &at(30)).unwrap();
    assert_eq!(signature.arity, 2);
    assert_eq!(signature.kind, CallableKind::Function);
}

#[test]
fn test_resolve_call_unknown_function() {
    let functions = FunctionRegistry::new();

    let error = functions.resolve_call("missing", 0, &at(4)).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::UndefinedReferenceError);
    assert_eq!(error.to_string(), "missing() is undefined");
}

#[test]
fn test_resolve_call_arity_mismatch() {
    let mut functions = FunctionRegistry::new();
    let scopes = ScopeStack::new();
    functions
        .register("f", 0, CallableKind::Function, true, &scopes, &at(0))
        .unwrap();

    let error = functions.resolve_call("f", 1, &at(12)).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::ArityMismatchError);
    assert_eq!(
        error.to_string(),
        "f() must have 0 arguments, but 1 are provided"
    );
}
