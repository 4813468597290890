//! Declaration AST nodes

use super::Block;
use crate::common::Span;

/// Declaration kinds
#[derive(Debug, Clone)]
pub enum Declaration {
    /// Variable declaration: `x : INTEGER`
    ///
    /// A multi-name line (`a, b : REAL`) is expanded by the parser into
    /// one node per name.
    Var(VarDecl),

    /// Procedure declaration: `procedure P(a : INTEGER); <block> ;`
    Procedure(ProcedureDecl),

    /// Function declaration: `function F(a : INTEGER) : REAL; <block> ;`
    Function(FunctionDecl),
}

/// A single declared variable
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub type_spec: TypeSpec,
    /// Position of the variable name token
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: String, type_spec: TypeSpec, span: Span) -> Self {
        Self {
            name,
            type_spec,
            span,
        }
    }
}

/// A formal parameter: `name : type`
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub type_spec: TypeSpec,
    /// Position of the parameter name token
    pub span: Span,
}

impl Param {
    pub fn new(name: String, type_spec: TypeSpec, span: Span) -> Self {
        Self {
            name,
            type_spec,
            span,
        }
    }
}

/// Procedure declaration
#[derive(Debug, Clone)]
pub struct ProcedureDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub block: Block,
    /// Position of the procedure name token
    pub span: Span,
}

impl ProcedureDecl {
    pub fn new(name: String, params: Vec<Param>, block: Block, span: Span) -> Self {
        Self {
            name,
            params,
            block,
            span,
        }
    }
}

/// Function declaration
///
/// Identical to a procedure except for the declared return type; the body
/// must assign to the function's own name to produce a return value.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: TypeSpec,
    pub block: Block,
    /// Position of the function name token
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(
        name: String,
        params: Vec<Param>,
        return_type: TypeSpec,
        block: Block,
        span: Span,
    ) -> Self {
        Self {
            name,
            params,
            return_type,
            block,
            span,
        }
    }
}

/// A type name as written in the source (`INTEGER`, `REAL`)
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    pub span: Span,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}
