//! The PASC language front-end
//!
//! This front-end handles:
//! - Lexing PASC source into tokens
//! - Parsing tokens into a syntax tree
//! - Semantic analysis (identifier resolution, scope checking)

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use sema::{AnalyzerConfig, SemanticAnalyzer, SemanticError};
