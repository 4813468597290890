//! Token definitions for the PASC lexer

use crate::common::Span;
use logos::Logos;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// All token kinds in PASC
///
/// Keywords are matched case-insensitively (`program`, `PROGRAM` and
/// `Program` are the same token).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")] // Skip whitespace
#[logos(skip r"\{[^}]*\}")] // Skip brace comments
pub enum TokenKind {
    // === Keywords ===
    #[token("program", ignore(ascii_case))]
    Program,
    #[token("var", ignore(ascii_case))]
    Var,
    #[token("procedure", ignore(ascii_case))]
    Procedure,
    #[token("function", ignore(ascii_case))]
    Function,
    #[token("begin", ignore(ascii_case))]
    Begin,
    #[token("end", ignore(ascii_case))]
    End,
    #[token("if", ignore(ascii_case))]
    If,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("do", ignore(ascii_case))]
    Do,
    #[token("div", ignore(ascii_case))]
    Div,
    #[token("integer", ignore(ascii_case))]
    Integer,
    #[token("real", ignore(ascii_case))]
    Real,

    // === Identifiers ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // === Literals ===
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string())]
    RealConst(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    IntegerConst(String),

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(":=")]
    Assign,

    // Comparison
    #[token("=")]
    Eq,
    #[token("<>")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Special
    Eof,
}

impl TokenKind {
    /// Check if this token starts a type specifier
    pub fn is_type_specifier(&self) -> bool {
        matches!(self, TokenKind::Integer | TokenKind::Real)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Program => write!(f, "'program'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::Procedure => write!(f, "'procedure'"),
            TokenKind::Function => write!(f, "'function'"),
            TokenKind::Begin => write!(f, "'begin'"),
            TokenKind::End => write!(f, "'end'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Then => write!(f, "'then'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Do => write!(f, "'do'"),
            TokenKind::Div => write!(f, "'div'"),
            TokenKind::Integer => write!(f, "'integer'"),
            TokenKind::Real => write!(f, "'real'"),
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::RealConst(s) => write!(f, "real constant '{}'", s),
            TokenKind::IntegerConst(s) => write!(f, "integer constant '{}'", s),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Assign => write!(f, "':='"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::NotEq => write!(f, "'<>'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Semi => write!(f, "';'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
