//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer for PASC source code
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(CompileError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let source = "program var procedure function begin end if then else while do";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Program));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Var));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Procedure));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Function));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Begin));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::End));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Then));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::While));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Do));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let source = "PROGRAM Begin END InTeGeR";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Program));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Begin));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::End));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Integer));
    }

    #[test]
    fn test_identifiers() {
        let source = "foo bar_baz _test test123 programx";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "foo"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "bar_baz"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "_test"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "test123"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "programx"
        ));
    }

    #[test]
    fn test_number_literals() {
        let source = "42 3.14 0";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntegerConst(s) if s == "42"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::RealConst(s) if s == "3.14"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::IntegerConst(s) if s == "0"
        ));
    }

    #[test]
    fn test_operators_and_punctuation() {
        let source = ":= = <> < <= > >= + - * / ; : , . ( )";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Assign));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::NotEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Lt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Gt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::GtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Plus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Minus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Star));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Slash));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Semi));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Colon));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Comma));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Dot));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LParen));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::RParen));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "begin { this is a comment } end";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Begin));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::End));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn test_spans() {
        let source = "x := 1";
        let mut lexer = Lexer::new(source);

        let x = lexer.next_token().unwrap();
        assert_eq!(x.span, Span::new(0, 1));
        let assign = lexer.next_token().unwrap();
        assert_eq!(assign.span, Span::new(2, 4));
        let one = lexer.next_token().unwrap();
        assert_eq!(one.span, Span::new(5, 6));
    }

    #[test]
    fn test_unexpected_character() {
        let source = "x := !";
        let mut lexer = Lexer::new(source);

        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        assert!(lexer.next_token().is_err());
    }
}
