use crate::{
    ast::{
        ast::{Expr, StmtWrapper},
        statements::{
            BlockStmt, CoroutineDeclStmt, EntryPointStmt, ExpressionStmt, FnDeclStmt, IfStmt,
            Parameter, PrintStmt, ReturnStmt, VarDefStmt, YieldStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::parser::Parser;

/// The name of the program entry point.
pub const ENTRY_POINT: &str = "main";

/// Parses one top-level item: a function, coroutine, entry point or global
/// variable.
pub fn parse_item(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    match (parser.current_token_kind(), parser.peek_kind(1), parser.peek_kind(2)) {
        (TokenKind::Def, TokenKind::Coroutine, _) => parse_coroutine_def(parser),
        (TokenKind::Def, TokenKind::Identifier, TokenKind::OpenParen) => parse_function_def(parser),
        (TokenKind::Def, TokenKind::Identifier, TokenKind::Assignment)
        | (TokenKind::Identifier, TokenKind::Assignment, _) => parse_var_def_stmt(parser),
        _ => Err(parser.unexpected_detailed("expected a definition at the top level")),
    }
}

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Assignment
    {
        return parse_var_def_stmt(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(ExpressionStmt {
        span: expr.get_span().clone(),
        expression: expr,
    }))
}

/// `def x = value;` inside a body. Functions cannot be nested.
pub fn parse_local_def_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    if parser.peek_kind(1) == TokenKind::Identifier && parser.peek_kind(2) == TokenKind::Assignment
    {
        return parse_var_def_stmt(parser);
    }

    Err(parser.unexpected_detailed("functions and coroutines can only be defined at the top level"))
}

pub fn parse_var_def_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.get_position();

    if parser.current_token_kind() == TokenKind::Def {
        parser.advance();
    }

    let error = parser.unexpected_detailed("expected identifier in variable definition");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(VarDefStmt {
        identifier,
        value,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    Ok(StmtWrapper::new(IfStmt {
        condition,
        then_body,
        else_body,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("expected '}'"));
        }
        statements.push(parse_stmt(parser)?);
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(BlockStmt {
        body: statements,
        span: Span { start, end },
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    Ok(StmtWrapper::new(parse_block(parser)?))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(ReturnStmt {
        value,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_yield_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(YieldStmt {
        value,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(PrintStmt {
        arguments,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let error = parser.unexpected_detailed("expected parameter name");
            let token = parser.expect_error(TokenKind::Identifier, Some(error))?;
            parameters.push(Parameter {
                name: token.value,
                span: token.span,
            });

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

/// Parses either a full body or the `;` that ends a forward declaration.
fn parse_optional_body(parser: &mut Parser) -> Result<Option<BlockStmt>, Error> {
    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        Ok(None)
    } else {
        Ok(Some(parse_block(parser)?))
    }
}

pub fn parse_function_def(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let identifier = parser.expect(TokenKind::Identifier)?.value;
    let parameters = parse_parameters(parser)?;

    if identifier == ENTRY_POINT {
        let body = parse_block(parser)?;

        return Ok(StmtWrapper::new(EntryPointStmt {
            parameters,
            body,
            span: Span {
                start,
                end: parser.get_previous_end(),
            },
        }));
    }

    let body = parse_optional_body(parser)?;

    Ok(StmtWrapper::new(FnDeclStmt {
        identifier,
        parameters,
        body,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_coroutine_def(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::Coroutine)?;

    let error = parser.unexpected_detailed("expected coroutine name");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    let parameters = parse_parameters(parser)?;
    let body = parse_optional_body(parser)?;

    Ok(StmtWrapper::new(CoroutineDeclStmt {
        identifier,
        parameters,
        body,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}
