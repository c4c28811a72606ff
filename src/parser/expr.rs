use crate::{
    ast::{
        ast::{Expr, ExprWrapper},
        expressions::{
            BinaryExpr, CallExpr, Conversion, ConversionExpr, CreateCoroutineExpr, GroupingExpr,
            NextExpr, NumberExpr, PercentExpr, PrefixExpr, StringExpr, SymbolExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::unescape_string, tokens::TokenKind},
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Tokens that can begin an operand. A `%` followed by one of these is the
/// binary "percent of" operator, otherwise it is the postfix percentage.
fn starts_operand(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number
            | TokenKind::String
            | TokenKind::Identifier
            | TokenKind::OpenParen
            | TokenKind::Not
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Next
            | TokenKind::CreateCoroutine
    )
}

/// Binding power of the current token when it appears after an operand.
fn binding_power_at(parser: &Parser) -> BindingPower {
    let kind = parser.current_token_kind();

    if kind == TokenKind::Percent {
        return if starts_operand(parser.peek_kind(1)) {
            BindingPower::Multiplicative
        } else {
            BindingPower::Postfix
        };
    }

    *parser
        .get_bp_lookup()
        .get(&kind)
        .unwrap_or(&BindingPower::Default)
}

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while binding_power_at(parser) > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };

        let operator_bp = binding_power_at(parser);
        left = led(parser, left, operator_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let token = parser.current_token().clone();

    let expr = match token.kind {
        TokenKind::Number => ExprWrapper::new(NumberExpr {
            value: token.value,
            span: token.span,
        }),
        TokenKind::Identifier => ExprWrapper::new(SymbolExpr {
            value: token.value,
            span: token.span,
        }),
        TokenKind::String => ExprWrapper::new(StringExpr {
            value: unescape_string(&token.value),
            span: token.span,
        }),
        _ => return Err(parser.unexpected()),
    };

    parser.advance();
    Ok(expr)
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    Ok(ExprWrapper::new(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left,
        operator: operator_token,
        right,
    }))
}

/// `a ^ b`, right associative.
pub fn parse_power_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, BindingPower::Multiplicative)?;

    Ok(ExprWrapper::new(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left,
        operator: operator_token,
        right,
    }))
}

/// `a%` or `a % b`.
pub fn parse_percent_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    if starts_operand(parser.current_token_kind()) {
        let right = parse_expr(parser, BindingPower::Multiplicative)?;

        return Ok(ExprWrapper::new(BinaryExpr {
            span: Span {
                start: left.get_span().start.clone(),
                end: right.get_span().end.clone(),
            },
            left,
            operator: operator_token,
            right,
        }));
    }

    Ok(ExprWrapper::new(PercentExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: operator_token.span.end.clone(),
        },
        operand: left,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(ExprWrapper::new(PrefixExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: rhs.get_span().end.clone(),
        },
        operator: operator_token,
        right_expr: rhs,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.advance().span.start.clone();
    let inner = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(ExprWrapper::new(GroupingExpr {
        inner,
        span: Span { start, end },
    }))
}

pub fn parse_conversion_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let keyword = parser.advance().clone();
    let target = if keyword.kind == TokenKind::Int {
        Conversion::Int
    } else {
        Conversion::Float
    };

    parser.expect(TokenKind::OpenParen)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(ExprWrapper::new(ConversionExpr {
        target,
        value,
        span: Span {
            start: keyword.span.start,
            end,
        },
    }))
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<ExprWrapper>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            args.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(args)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    _bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let callee = match left.downcast::<SymbolExpr>() {
        Some(symbol) => symbol.value.clone(),
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("only named functions can be called"),
                },
                left.get_span().start.clone(),
            ))
        }
    };

    let arguments = parse_arguments(parser)?;

    Ok(ExprWrapper::new(CallExpr {
        callee,
        arguments,
        span: Span {
            start: left.get_span().start.clone(),
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_next_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.advance().span.start.clone();
    let coroutine = parse_expr(parser, BindingPower::Unary)?;

    Ok(ExprWrapper::new(NextExpr {
        span: Span {
            start,
            end: coroutine.get_span().end.clone(),
        },
        coroutine,
    }))
}

pub fn parse_create_coroutine_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.advance().span.start.clone();
    let target = parse_expr(parser, BindingPower::Unary)?;

    let call = match target.downcast::<CallExpr>() {
        Some(call) => call.clone(),
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: String::from("create_coroutine"),
                    message: String::from("expected a coroutine call"),
                },
                target.get_span().start.clone(),
            ))
        }
    };

    Ok(ExprWrapper::new(CreateCoroutineExpr {
        span: Span {
            start,
            end: call.span.end.clone(),
        },
        call,
    }))
}
