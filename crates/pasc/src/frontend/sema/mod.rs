//! Semantic analysis module
//!
//! Resolves every identifier to a declaration, enforces lexical scoping
//! with nested procedure/function scopes, and verifies that functions
//! assign a return value before leaving their scope.

mod analyzer;
mod scope;
mod symbol;

pub use analyzer::{AnalyzerConfig, SemaResult, SemanticAnalyzer, SemanticError};
pub use scope::{ScopeKind, ScopeStack, ScopeTable};
pub use symbol::{BuiltinTypeSymbol, ProcedureSymbol, Symbol, VariableSymbol};
