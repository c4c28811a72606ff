//! Unit tests for the parser module.
//!
//! This module contains tests for parsing DTlang constructs including:
//! - Top-level functions, coroutines, forward declarations and globals
//! - Statements inside bodies
//! - Operator precedence, including both percent forms and power
//! - Syntax errors

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper, Stmt, StmtType},
        expressions::{BinaryExpr, CallExpr, CreateCoroutineExpr, PercentExpr, PrefixExpr},
        statements::{
            BlockStmt, CoroutineDeclStmt, EntryPointStmt, ExpressionStmt, FnDeclStmt, IfStmt,
            VarDefStmt,
        },
    },
    errors::errors::{Error, ErrorKind},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<BlockStmt, Error> {
    let tokens = tokenize(source.to_string(), Some("test.dtl".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.dtl".to_string()));
    result
}

/// Parses `def main() { <expression>; }` and returns the expression.
fn parse_main_expression(expression: &str) -> ExprWrapper {
    let source = format!("def main() {{ {}; }}", expression);
    let program = parse_source(&source).unwrap();
    let main = program.body[0].downcast::<EntryPointStmt>().unwrap();

    main.body.body[0]
        .downcast::<ExpressionStmt>()
        .unwrap()
        .expression
        .clone()
}

#[test]
fn test_parse_entry_point() {
    let program = parse_source("def main() { print(1); }").unwrap();

    assert_eq!(program.body.len(), 1);
    assert_eq!(program.body[0].get_stmt_type(), StmtType::EntryPointStmt);
}

#[test]
fn test_parse_function_definition() {
    let program = parse_source("def add(a, b) { return a + b; }").unwrap();
    let function = program.body[0].downcast::<FnDeclStmt>().unwrap();

    assert_eq!(function.identifier, "add");
    let names: Vec<&str> = function.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    assert!(function.body.is_some());
}

#[test]
fn test_parse_forward_declarations() {
    let program = parse_source("def f(x);\ndef coroutine g(a, b);").unwrap();

    let function = program.body[0].downcast::<FnDeclStmt>().unwrap();
    assert!(function.body.is_none());
    assert_eq!(function.parameters.len(), 1);

    let coroutine = program.body[1].downcast::<CoroutineDeclStmt>().unwrap();
    assert!(coroutine.body.is_none());
    assert_eq!(coroutine.identifier, "g");
}

#[test]
fn test_parse_coroutine_definition() {
    let program = parse_source("def coroutine counter(i) { def i = 0; yield i; }").unwrap();
    let coroutine = program.body[0].downcast::<CoroutineDeclStmt>().unwrap();
    let body = coroutine.body.as_ref().unwrap();

    assert_eq!(body.body[0].get_stmt_type(), StmtType::VarDefStmt);
    assert_eq!(body.body[1].get_stmt_type(), StmtType::YieldStmt);
}

#[test]
fn test_parse_global_variables() {
    let program = parse_source("limit = 10;\ndef rate = 2.5;").unwrap();

    let limit = program.body[0].downcast::<VarDefStmt>().unwrap();
    assert_eq!(limit.identifier, "limit");
    let rate = program.body[1].downcast::<VarDefStmt>().unwrap();
    assert_eq!(rate.identifier, "rate");
}

#[test]
fn test_parse_else_if_chain() {
    let source = "def main() { if (x < 1) print(1); else if (x < 2) print(2); else { print(3); } }";
    let program = parse_source(source).unwrap();
    let main = program.body[0].downcast::<EntryPointStmt>().unwrap();
    let if_stmt = main.body.body[0].downcast::<IfStmt>().unwrap();

    assert_eq!(if_stmt.then_body.get_stmt_type(), StmtType::PrintStmt);
    let else_body = if_stmt.else_body.as_ref().unwrap();
    let nested = else_body.downcast::<IfStmt>().unwrap();
    assert_eq!(
        nested.else_body.as_ref().unwrap().get_stmt_type(),
        StmtType::BlockStmt
    );
}

#[test]
fn test_parse_precedence() {
    let expression = parse_main_expression("1 + 2 * 3");
    let binary = expression.downcast::<BinaryExpr>().unwrap();

    assert_eq!(binary.operator.kind, TokenKind::Plus);
    let right = binary.right.downcast::<BinaryExpr>().unwrap();
    assert_eq!(right.operator.kind, TokenKind::Star);
}

#[test]
fn test_parse_power_is_right_associative() {
    let expression = parse_main_expression("2 ^ 3 ^ 2");
    let binary = expression.downcast::<BinaryExpr>().unwrap();

    assert_eq!(binary.operator.kind, TokenKind::Caret);
    assert_eq!(binary.left.get_expr_type(), ExprType::Number);
    let right = binary.right.downcast::<BinaryExpr>().unwrap();
    assert_eq!(right.operator.kind, TokenKind::Caret);
}

#[test]
fn test_parse_binary_percent() {
    let expression = parse_main_expression("5 % 2");
    let binary = expression.downcast::<BinaryExpr>().unwrap();

    assert_eq!(binary.operator.kind, TokenKind::Percent);
    assert_eq!(binary.left.get_expr_type(), ExprType::Number);
    assert_eq!(binary.right.get_expr_type(), ExprType::Number);
}

#[test]
fn test_parse_postfix_percent_binds_tighter_than_addition() {
    let expression = parse_main_expression("1 + 50%");
    let binary = expression.downcast::<BinaryExpr>().unwrap();

    assert_eq!(binary.operator.kind, TokenKind::Plus);
    let percent = binary.right.downcast::<PercentExpr>().unwrap();
    assert_eq!(percent.operand.get_expr_type(), ExprType::Number);
}

#[test]
fn test_parse_percent_before_operator_is_postfix() {
    let expression = parse_main_expression("20% * 3");
    let binary = expression.downcast::<BinaryExpr>().unwrap();

    assert_eq!(binary.operator.kind, TokenKind::Star);
    assert_eq!(binary.left.get_expr_type(), ExprType::Percent);
}

#[test]
fn test_parse_prefix_operators() {
    let expression = parse_main_expression("-x * 2");
    let binary = expression.downcast::<BinaryExpr>().unwrap();

    let prefix = binary.left.downcast::<PrefixExpr>().unwrap();
    assert_eq!(prefix.operator.kind, TokenKind::Dash);
}

#[test]
fn test_parse_call_arguments() {
    let expression = parse_main_expression("f(1, g(2), 3 + 4)");
    let call = expression.downcast::<CallExpr>().unwrap();

    assert_eq!(call.callee, "f");
    assert_eq!(call.arguments.len(), 3);
    assert_eq!(call.arguments[1].get_expr_type(), ExprType::CallExpr);
}

#[test]
fn test_parse_coroutine_expressions() {
    let expression = parse_main_expression("create_coroutine counter(0)");
    let create = expression.downcast::<CreateCoroutineExpr>().unwrap();
    assert_eq!(create.call.callee, "counter");

    let expression = parse_main_expression("next c + 1");
    let binary = expression.downcast::<BinaryExpr>().unwrap();
    assert_eq!(binary.left.get_expr_type(), ExprType::Next);
}

#[test]
fn test_parse_conversions() {
    let expression = parse_main_expression("int(2.5) + float(1)");
    let binary = expression.downcast::<BinaryExpr>().unwrap();

    assert_eq!(binary.left.get_expr_type(), ExprType::Conversion);
    assert_eq!(binary.right.get_expr_type(), ExprType::Conversion);
}

#[test]
fn test_parse_missing_semicolon() {
    let error = parse_source("def main() { x = 1 }").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
    assert_eq!(error.get_position().0, 19);
}

#[test]
fn test_parse_nested_function_is_rejected() {
    let error = parse_source("def main() { def inner() {} }").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_parse_statement_at_top_level_is_rejected() {
    let error = parse_source("print(1);").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
    assert_eq!(error.get_position().0, 0);
}

#[test]
fn test_parse_unclosed_block() {
    let error = parse_source("def main() { print(1);").unwrap_err();

    assert_eq!(error.get_kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_parse_if_requires_parentheses() {
    assert!(parse_source("def main() { if x print(1); }").is_err());
}
