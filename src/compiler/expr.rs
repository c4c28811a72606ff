use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper},
        expressions::{
            BinaryExpr, CallExpr, Conversion, ConversionExpr, CreateCoroutineExpr, GroupingExpr,
            NextExpr, NumberExpr, PercentExpr, PrefixExpr, StringExpr, SymbolExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::compiler::{downcast_expr, Compiler};

/// `<<`, between additive and relational operators.
const SHIFT_PRECEDENCE: u8 = 5;

/// Precedence of the C++ text a binary operator is emitted as. Used to
/// parenthesise operands whose source grouping C++ would read differently.
fn cpp_precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Or => 1,
        TokenKind::And => 2,
        TokenKind::Equals | TokenKind::NotEquals => 3,
        TokenKind::Less | TokenKind::LessEquals | TokenKind::Greater | TokenKind::GreaterEquals => {
            4
        }
        TokenKind::Plus | TokenKind::Dash => 6,
        // `a % b` is emitted as a multiplication
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 7,
        // `std::pow(a, b)` is a call
        _ => 10,
    }
}

/// Generates `operand`, parenthesised when it is a binary expression that
/// binds looser than an operator of `precedence`. Right operands are also
/// parenthesised at equal precedence to keep left associativity.
fn gen_operand(
    compiler: &mut Compiler,
    operand: &ExprWrapper,
    precedence: u8,
    is_right: bool,
) -> Result<String, Error> {
    let code = gen_expression(compiler, operand)?;

    let needs_parens = match operand.downcast::<BinaryExpr>() {
        Some(binary) => {
            let inner = cpp_precedence(binary.operator.kind);
            inner < precedence || (is_right && inner == precedence)
        }
        None => false,
    };

    if needs_parens {
        Ok(format!("({})", code))
    } else {
        Ok(code)
    }
}

/// Generates a `std::cout` operand. Comparisons and logical operators bind
/// looser than `<<` in C++ and are parenthesised.
pub fn gen_stream_operand(
    compiler: &mut Compiler,
    operand: &ExprWrapper,
) -> Result<String, Error> {
    gen_operand(compiler, operand, SHIFT_PRECEDENCE, false)
}

/// Re-encodes the bytes of a string literal as a C++ narrow string literal.
pub fn escape_string(value: &[u8]) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('"');

    for &byte in value {
        match byte {
            b'"' => escaped.push_str("\\\""),
            b'\\' => escaped.push_str("\\\\"),
            b'\n' => escaped.push_str("\\n"),
            b'\t' => escaped.push_str("\\t"),
            b'\r' => escaped.push_str("\\r"),
            b' '..=b'~' => escaped.push(byte as char),
            // Three octal digits never run into the following character
            _ => escaped.push_str(&format!("\\{:03o}", byte)),
        }
    }

    escaped.push('"');
    escaped
}

pub fn gen_call(compiler: &mut Compiler, call: &CallExpr) -> Result<String, Error> {
    compiler
        .functions
        .resolve_call(&call.callee, call.arguments.len(), &call.span.start)?;

    let mut arguments = Vec::with_capacity(call.arguments.len());
    for argument in call.arguments.iter() {
        arguments.push(gen_expression(compiler, argument)?);
    }

    Ok(format!("{}({})", call.callee, arguments.join(", ")))
}

/// Generates the C++ text for an expression.
pub fn gen_expression(compiler: &mut Compiler, expression: &ExprWrapper) -> Result<String, Error> {
    match expression.get_expr_type() {
        ExprType::Number => Ok(downcast_expr::<NumberExpr>(expression, "number")?
            .value
            .clone()),
        ExprType::String => Ok(escape_string(
            &downcast_expr::<StringExpr>(expression, "string")?.value,
        )),
        ExprType::Symbol => {
            let symbol = downcast_expr::<SymbolExpr>(expression, "symbol")?;

            if !compiler.scopes.is_declared(&symbol.value) {
                return Err(Error::new(
                    ErrorImpl::UndefinedVariable {
                        name: symbol.value.clone(),
                    },
                    symbol.span.start.clone(),
                ));
            }

            Ok(symbol.value.clone())
        }
        ExprType::Binary => {
            let binary = downcast_expr::<BinaryExpr>(expression, "binary expression")?;
            let precedence = cpp_precedence(binary.operator.kind);

            match binary.operator.kind {
                TokenKind::Caret => {
                    let base = gen_expression(compiler, &binary.left)?;
                    let exponent = gen_expression(compiler, &binary.right)?;

                    Ok(format!("std::pow({}, {})", base, exponent))
                }
                TokenKind::Percent => {
                    let left = gen_operand(compiler, &binary.left, precedence, false)?;
                    let right = gen_expression(compiler, &binary.right)?;

                    Ok(format!("{} * ({} * 0.01)", left, right))
                }
                _ => {
                    let left = gen_operand(compiler, &binary.left, precedence, false)?;
                    let right = gen_operand(compiler, &binary.right, precedence, true)?;

                    Ok(format!("{} {} {}", left, binary.operator.value, right))
                }
            }
        }
        ExprType::Prefix => {
            let prefix = downcast_expr::<PrefixExpr>(expression, "prefix expression")?;
            let operand = gen_expression(compiler, &prefix.right_expr)?;

            // `- -x` must not come out as a decrement
            match prefix.right_expr.get_expr_type() {
                ExprType::Prefix | ExprType::Binary => {
                    Ok(format!("{}({})", prefix.operator.value, operand))
                }
                _ => Ok(format!("{}{}", prefix.operator.value, operand)),
            }
        }
        ExprType::Percent => {
            let percent = downcast_expr::<PercentExpr>(expression, "percent expression")?;
            let operand = gen_operand(
                compiler,
                &percent.operand,
                cpp_precedence(TokenKind::Star),
                false,
            )?;

            Ok(format!("({} * 0.01)", operand))
        }
        ExprType::Grouping => {
            let grouping = downcast_expr::<GroupingExpr>(expression, "grouping")?;

            Ok(format!("({})", gen_expression(compiler, &grouping.inner)?))
        }
        ExprType::Conversion => {
            let conversion = downcast_expr::<ConversionExpr>(expression, "conversion")?;
            let target = match conversion.target {
                Conversion::Int => "int",
                Conversion::Float => "double",
            };

            Ok(format!(
                "static_cast<{}>({})",
                target,
                gen_expression(compiler, &conversion.value)?
            ))
        }
        ExprType::CallExpr => gen_call(compiler, downcast_expr::<CallExpr>(expression, "call")?),
        ExprType::Next => {
            let next = downcast_expr::<NextExpr>(expression, "next")?;
            let coroutine = gen_expression(compiler, &next.coroutine)?;

            match next.coroutine.get_expr_type() {
                ExprType::Prefix | ExprType::Percent | ExprType::Binary => {
                    Ok(format!("({}).next()", coroutine))
                }
                _ => Ok(format!("{}.next()", coroutine)),
            }
        }
        ExprType::CreateCoroutine => {
            let create = downcast_expr::<CreateCoroutineExpr>(expression, "create_coroutine")?;

            gen_call(compiler, &create.call)
        }
    }
}
