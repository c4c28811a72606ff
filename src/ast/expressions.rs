use std::any::Any;

use crate::{lexer::tokens::Token, Span};

use super::ast::{Expr, ExprType, ExprWrapper};

macro_rules! impl_expr {
    ($node:ty, $expr_type:expr) => {
        impl Expr for $node {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn get_expr_type(&self) -> ExprType {
                $expr_type
            }
            fn clone_wrapper(&self) -> ExprWrapper {
                ExprWrapper::new(self.clone())
            }
            fn get_span(&self) -> &Span {
                &self.span
            }
        }
    };
}

// LITERALS

/// Number Expression
/// Represents a numeric literal in the AST. The literal's own text decides
/// whether it is an integer or a floating-point value.
#[derive(Debug, Clone)]
pub struct NumberExpr {
    pub value: String,
    pub span: Span,
}

impl_expr!(NumberExpr, ExprType::Number);

/// String Expression
/// Represents a string literal as the bytes its escapes resolve to.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: Vec<u8>,
    pub span: Span,
}

impl_expr!(StringExpr, ExprType::String);

/// Symbol Expression
/// Represents a variable reference in the AST.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

impl_expr!(SymbolExpr, ExprType::Symbol);

// OPERATORS

/// Binary Expression
/// Arithmetic, comparison, logical, power and percentage-of operators.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: ExprWrapper,
    pub operator: Token,
    pub right: ExprWrapper,
    pub span: Span,
}

impl_expr!(BinaryExpr, ExprType::Binary);

/// Prefix Expression
/// `-x`, `+x` and `!x`.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: ExprWrapper,
    pub span: Span,
}

impl_expr!(PrefixExpr, ExprType::Prefix);

/// Percent Expression
/// The postfix `x%` form.
#[derive(Debug, Clone)]
pub struct PercentExpr {
    pub operand: ExprWrapper,
    pub span: Span,
}

impl_expr!(PercentExpr, ExprType::Percent);

/// Grouping Expression
/// A parenthesised sub-expression, kept so the parentheses survive emission.
#[derive(Debug, Clone)]
pub struct GroupingExpr {
    pub inner: ExprWrapper,
    pub span: Span,
}

impl_expr!(GroupingExpr, ExprType::Grouping);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Int,
    Float,
}

/// Conversion Expression
/// `int(x)` and `float(x)`.
#[derive(Debug, Clone)]
pub struct ConversionExpr {
    pub target: Conversion,
    pub value: ExprWrapper,
    pub span: Span,
}

impl_expr!(ConversionExpr, ExprType::Conversion);

// CALLS AND COROUTINES

/// Call Expression
/// A call of a named function or coroutine.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: String,
    pub arguments: Vec<ExprWrapper>,
    pub span: Span,
}

impl_expr!(CallExpr, ExprType::CallExpr);

/// Next Expression
/// `next g` advances a coroutine instance.
#[derive(Debug, Clone)]
pub struct NextExpr {
    pub coroutine: ExprWrapper,
    pub span: Span,
}

impl_expr!(NextExpr, ExprType::Next);

/// Create Coroutine Expression
/// `create_coroutine g(args)` instantiates a coroutine.
#[derive(Debug, Clone)]
pub struct CreateCoroutineExpr {
    pub call: CallExpr,
    pub span: Span,
}

impl_expr!(CreateCoroutineExpr, ExprType::CreateCoroutine);
