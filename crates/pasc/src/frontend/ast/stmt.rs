//! Statement AST nodes

use super::{CallExpr, Expr};
use crate::common::Span;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Nested compound statement: `begin ... end`
    Compound(Compound),

    /// Assignment: `target := value`
    Assign {
        target: String,
        /// Position of the target name token
        target_span: Span,
        value: Expr,
    },

    /// Conditional: `if cond then stmt [else stmt]`
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// Loop: `while cond do stmt`
    While { condition: Expr, body: Box<Stmt> },

    /// Procedure call statement: `P(a, b)`
    Call(CallExpr),

    /// Empty statement
    Empty,
}

/// A statement list between `begin` and `end`
#[derive(Debug, Clone)]
pub struct Compound {
    pub statements: Vec<Stmt>,
}

impl Compound {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
