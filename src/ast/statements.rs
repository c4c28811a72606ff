use std::{any::Any, slice::Iter};

use crate::Span;

use super::ast::{ExprWrapper, Stmt, StmtType, StmtWrapper};

macro_rules! impl_stmt {
    ($node:ty, $stmt_type:expr) => {
        impl Stmt for $node {
            fn get_stmt_type(&self) -> StmtType {
                $stmt_type
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn clone_wrapper(&self) -> StmtWrapper {
                StmtWrapper::new(self.clone())
            }
            fn get_span(&self) -> &Span {
                &self.span
            }
        }
    };
}

/// A brace-delimited list of statements. The program root is also a block,
/// holding the top-level items.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, StmtWrapper> {
        self.body.iter()
    }
}

impl_stmt!(BlockStmt, StmtType::BlockStmt);

#[derive(Debug)]
pub struct ExpressionStmt {
    pub expression: ExprWrapper,
    pub span: Span,
}

impl Stmt for ExpressionStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ExpressionStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        self.expression.into_cloned_stmt_wrapper()
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// `x = value;` or `def x = value;`. Declares `x` on first sight and
/// assigns to it afterwards.
#[derive(Debug, Clone)]
pub struct VarDefStmt {
    pub identifier: String,
    pub value: ExprWrapper,
    pub span: Span,
}

impl_stmt!(VarDefStmt, StmtType::VarDefStmt);

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: ExprWrapper,
    pub then_body: StmtWrapper,
    pub else_body: Option<StmtWrapper>,
    pub span: Span,
}

impl_stmt!(IfStmt, StmtType::IfStmt);

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<ExprWrapper>,
    pub span: Span,
}

impl_stmt!(ReturnStmt, StmtType::ReturnStmt);

/// A coroutine suspension point.
#[derive(Debug, Clone)]
pub struct YieldStmt {
    pub value: ExprWrapper,
    pub span: Span,
}

impl_stmt!(YieldStmt, StmtType::YieldStmt);

#[derive(Debug, Clone)]
pub struct PrintStmt {
    pub arguments: Vec<ExprWrapper>,
    pub span: Span,
}

impl_stmt!(PrintStmt, StmtType::PrintStmt);

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub span: Span,
}

/// `def name(params) { ... }`, or a forward declaration when `body` is `None`.
#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub body: Option<BlockStmt>,
    pub span: Span,
}

impl_stmt!(FnDeclStmt, StmtType::FnDeclStmt);

/// `def coroutine name(params) { ... }`, or a forward declaration when
/// `body` is `None`.
#[derive(Debug, Clone)]
pub struct CoroutineDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub body: Option<BlockStmt>,
    pub span: Span,
}

impl_stmt!(CoroutineDeclStmt, StmtType::CoroutineDeclStmt);

/// `def main() { ... }`
#[derive(Debug, Clone)]
pub struct EntryPointStmt {
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub span: Span,
}

impl_stmt!(EntryPointStmt, StmtType::EntryPointStmt);
