//! Recursive descent parser for PASC

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::ast::*;
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for PASC
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        self.expect(TokenKind::Program)?;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(TokenKind::Semi)?;
        let block = self.parse_block()?;
        self.expect(TokenKind::Dot)?;
        self.expect(TokenKind::Eof)?;
        Ok(Program::new(name, block, name_span))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        let token = self.expect(TokenKind::Identifier(String::new()))?;
        match token.kind {
            TokenKind::Identifier(name) => Ok((name, token.span)),
            _ => unreachable!("expect() returned a non-identifier token"),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_block(&mut self) -> CompileResult<Block> {
        let declarations = self.parse_declarations()?;
        let compound_statement = self.parse_compound_statement()?;
        Ok(Block::new(declarations, compound_statement))
    }

    fn parse_declarations(&mut self) -> CompileResult<Vec<Declaration>> {
        let mut declarations = Vec::new();

        loop {
            if self.match_token(&TokenKind::Var)? {
                // One or more `a, b : TYPE ;` lines
                while matches!(self.current.kind, TokenKind::Identifier(_)) {
                    declarations.extend(self.parse_var_decl_line()?.into_iter().map(Declaration::Var));
                    self.expect(TokenKind::Semi)?;
                }
            } else if self.check(&TokenKind::Procedure) {
                declarations.push(Declaration::Procedure(self.parse_procedure_decl()?));
            } else if self.check(&TokenKind::Function) {
                declarations.push(Declaration::Function(self.parse_function_decl()?));
            } else {
                break;
            }
        }

        Ok(declarations)
    }

    /// Parse `a, b, c : TYPE` into one VarDecl per name
    fn parse_var_decl_line(&mut self) -> CompileResult<Vec<VarDecl>> {
        let mut names = vec![self.expect_identifier()?];
        while self.match_token(&TokenKind::Comma)? {
            names.push(self.expect_identifier()?);
        }
        self.expect(TokenKind::Colon)?;
        let type_spec = self.parse_type_spec()?;

        Ok(names
            .into_iter()
            .map(|(name, span)| VarDecl::new(name, type_spec.clone(), span))
            .collect())
    }

    fn parse_type_spec(&mut self) -> CompileResult<TypeSpec> {
        if !self.current.kind.is_type_specifier() {
            return Err(CompileError::parser(
                format!("expected type specifier, found {}", self.current.kind),
                self.current.span,
            ));
        }
        let token = self.advance()?;
        let name = match token.kind {
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            _ => unreachable!("is_type_specifier() covers exactly these tokens"),
        };
        Ok(TypeSpec::new(name, token.span))
    }

    fn parse_procedure_decl(&mut self) -> CompileResult<ProcedureDecl> {
        self.expect(TokenKind::Procedure)?;
        let (name, name_span) = self.expect_identifier()?;
        let params = self.parse_formal_param_list()?;
        self.expect(TokenKind::Semi)?;
        let block = self.parse_block()?;
        self.expect(TokenKind::Semi)?;
        Ok(ProcedureDecl::new(name, params, block, name_span))
    }

    fn parse_function_decl(&mut self) -> CompileResult<FunctionDecl> {
        self.expect(TokenKind::Function)?;
        let (name, name_span) = self.expect_identifier()?;
        let params = self.parse_formal_param_list()?;
        self.expect(TokenKind::Colon)?;
        let return_type = self.parse_type_spec()?;
        self.expect(TokenKind::Semi)?;
        let block = self.parse_block()?;
        self.expect(TokenKind::Semi)?;
        Ok(FunctionDecl::new(name, params, return_type, block, name_span))
    }

    /// Parse `( a, b : INTEGER ; c : REAL )`, or nothing
    fn parse_formal_param_list(&mut self) -> CompileResult<Vec<Param>> {
        let mut params = Vec::new();
        if self.match_token(&TokenKind::LParen)? {
            loop {
                self.parse_formal_params(&mut params)?;
                if !self.match_token(&TokenKind::Semi)? {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        }
        Ok(params)
    }

    /// Parse one `a, b : TYPE` parameter group
    fn parse_formal_params(&mut self, params: &mut Vec<Param>) -> CompileResult<()> {
        let mut names = vec![self.expect_identifier()?];
        while self.match_token(&TokenKind::Comma)? {
            names.push(self.expect_identifier()?);
        }
        self.expect(TokenKind::Colon)?;
        let type_spec = self.parse_type_spec()?;

        params.extend(
            names
                .into_iter()
                .map(|(name, span)| Param::new(name, type_spec.clone(), span)),
        );
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_compound_statement(&mut self) -> CompileResult<Compound> {
        self.expect(TokenKind::Begin)?;
        let mut statements = vec![self.parse_statement()?];
        while self.match_token(&TokenKind::Semi)? {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::End)?;
        Ok(Compound::new(statements))
    }

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        match &self.current.kind {
            TokenKind::Begin => {
                let start = self.current.span;
                let compound = self.parse_compound_statement()?;
                Ok(Stmt::new(StmtKind::Compound(compound), start))
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Identifier(_) => {
                let (name, name_span) = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    let call = self.parse_call_args(name, name_span)?;
                    Ok(Stmt::new(StmtKind::Call(call), name_span))
                } else {
                    self.expect(TokenKind::Assign)?;
                    let value = self.parse_expr()?;
                    let span = name_span.merge(value.span);
                    Ok(Stmt::new(
                        StmtKind::Assign {
                            target: name,
                            target_span: name_span,
                            value,
                        },
                        span,
                    ))
                }
            }
            // Empty statement (e.g. right before `end`)
            _ => Ok(Stmt::new(StmtKind::Empty, self.current.span)),
        }
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::If)?.span;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        let end = else_branch
            .as_ref()
            .map_or(then_branch.span, |stmt| stmt.span);
        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            start.merge(end),
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::While)?.span;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let body = Box::new(self.parse_statement()?);
        let span = start.merge(body.span);
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    /// Parse `( expr, expr, ... )` after a callee name
    fn parse_call_args(&mut self, name: String, name_span: Span) -> CompileResult<CallExpr> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.match_token(&TokenKind::Comma)? {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(CallExpr::new(name, args, name_span))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// expr : arith ((= | <> | < | <= | > | >=) arith)?
    fn parse_expr(&mut self) -> CompileResult<Expr> {
        let left = self.parse_arith()?;

        let op = match self.current.kind {
            TokenKind::Eq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        };

        if let Some(op) = op {
            self.advance()?;
            let right = self.parse_arith()?;
            let span = left.span.merge(right.span);
            Ok(Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            ))
        } else {
            Ok(left)
        }
    }

    /// arith : term ((+ | -) term)*
    fn parse_arith(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_term()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    /// term : factor ((* | / | div) factor)*
    fn parse_term(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Div => BinaryOp::IntDiv,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_factor()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> CompileResult<Expr> {
        match &self.current.kind {
            TokenKind::Plus => {
                let start = self.advance()?.span;
                let operand = self.parse_factor()?;
                let span = start.merge(operand.span);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Plus,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            TokenKind::Minus => {
                let start = self.advance()?.span;
                let operand = self.parse_factor()?;
                let span = start.merge(operand.span);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Neg,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            TokenKind::IntegerConst(_) => {
                let token = self.advance()?;
                let TokenKind::IntegerConst(text) = token.kind else {
                    unreachable!("checked above")
                };
                let value = text.parse::<i64>().map_err(|_| {
                    CompileError::parser(
                        format!("integer constant '{}' out of range", text),
                        token.span,
                    )
                })?;
                Ok(Expr::new(ExprKind::IntLiteral(value), token.span))
            }
            TokenKind::RealConst(_) => {
                let token = self.advance()?;
                let TokenKind::RealConst(text) = token.kind else {
                    unreachable!("checked above")
                };
                let value = text.parse::<f64>().map_err(|_| {
                    CompileError::parser(
                        format!("real constant '{}' out of range", text),
                        token.span,
                    )
                })?;
                Ok(Expr::new(ExprKind::RealLiteral(value), token.span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Identifier(_) => {
                let (name, name_span) = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    let call = self.parse_call_args(name, name_span)?;
                    Ok(Expr::new(ExprKind::Call(call), name_span))
                } else {
                    Ok(Expr::new(ExprKind::Var(name), name_span))
                }
            }
            _ => Err(CompileError::parser(
                format!("expected expression, found {}", self.current.kind),
                self.current.span,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(source).unwrap();
        parser.parse().unwrap()
    }

    #[test]
    fn test_parse_minimal_program() {
        let program = parse("program Test; begin end.");
        assert_eq!(program.name, "Test");
        assert!(program.block.declarations.is_empty());
        assert_eq!(program.block.compound_statement.statements.len(), 1);
        assert!(matches!(
            program.block.compound_statement.statements[0].kind,
            StmtKind::Empty
        ));
    }

    #[test]
    fn test_parse_var_declarations() {
        let program = parse("program Test; var x : INTEGER; y : REAL; begin end.");
        assert_eq!(program.block.declarations.len(), 2);
        if let Declaration::Var(v) = &program.block.declarations[0] {
            assert_eq!(v.name, "x");
            assert_eq!(v.type_spec.name, "INTEGER");
        } else {
            panic!("expected variable declaration");
        }
        if let Declaration::Var(v) = &program.block.declarations[1] {
            assert_eq!(v.name, "y");
            assert_eq!(v.type_spec.name, "REAL");
        } else {
            panic!("expected variable declaration");
        }
    }

    #[test]
    fn test_multi_name_line_expands_to_one_decl_per_name() {
        let program = parse("program Test; var a, b, c : INTEGER; begin end.");
        assert_eq!(program.block.declarations.len(), 3);
        let names: Vec<_> = program
            .block
            .declarations
            .iter()
            .map(|d| match d {
                Declaration::Var(v) => v.name.as_str(),
                _ => panic!("expected variable declaration"),
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_procedure_with_params() {
        let program = parse(
            "program Test; procedure P(a, b : INTEGER; c : REAL); begin end; begin end.",
        );
        assert_eq!(program.block.declarations.len(), 1);
        if let Declaration::Procedure(p) = &program.block.declarations[0] {
            assert_eq!(p.name, "P");
            let names: Vec<_> = p.params.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c"]);
            assert_eq!(p.params[0].type_spec.name, "INTEGER");
            assert_eq!(p.params[2].type_spec.name, "REAL");
        } else {
            panic!("expected procedure declaration");
        }
    }

    #[test]
    fn test_parse_function_declaration() {
        let program =
            parse("program Test; function F(n : INTEGER) : REAL; begin F := 1 end; begin end.");
        if let Declaration::Function(f) = &program.block.declarations[0] {
            assert_eq!(f.name, "F");
            assert_eq!(f.return_type.name, "REAL");
            assert_eq!(f.params.len(), 1);
        } else {
            panic!("expected function declaration");
        }
    }

    #[test]
    fn test_parse_assignment() {
        let program = parse("program Test; var x : INTEGER; begin x := 1 + 2 * 3 end.");
        let stmt = &program.block.compound_statement.statements[0];
        if let StmtKind::Assign { target, value, .. } = &stmt.kind {
            assert_eq!(target, "x");
            // 1 + (2 * 3): multiplication binds tighter
            if let ExprKind::Binary { op, right, .. } = &value.kind {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            } else {
                panic!("expected binary expression");
            }
        } else {
            panic!("expected assignment");
        }
    }

    #[test]
    fn test_parse_if_else() {
        let program = parse(
            "program Test; var x : INTEGER; begin if x < 10 then x := 1 else x := 2 end.",
        );
        let stmt = &program.block.compound_statement.statements[0];
        if let StmtKind::If {
            condition,
            else_branch,
            ..
        } = &stmt.kind
        {
            assert!(matches!(
                condition.kind,
                ExprKind::Binary {
                    op: BinaryOp::Lt,
                    ..
                }
            ));
            assert!(else_branch.is_some());
        } else {
            panic!("expected if statement");
        }
    }

    #[test]
    fn test_parse_while() {
        let program = parse("program Test; var x : INTEGER; begin while x > 0 do x := x - 1 end.");
        let stmt = &program.block.compound_statement.statements[0];
        assert!(matches!(stmt.kind, StmtKind::While { .. }));
    }

    #[test]
    fn test_parse_call_statement_and_expression() {
        let program = parse("program Test; var x : INTEGER; begin P(1, x); x := F(x) end.");
        let stmts = &program.block.compound_statement.statements;
        if let StmtKind::Call(call) = &stmts[0].kind {
            assert_eq!(call.name, "P");
            assert_eq!(call.args.len(), 2);
        } else {
            panic!("expected call statement");
        }
        if let StmtKind::Assign { value, .. } = &stmts[1].kind {
            assert!(matches!(&value.kind, ExprKind::Call(c) if c.name == "F"));
        } else {
            panic!("expected assignment");
        }
    }

    #[test]
    fn test_parse_error_position() {
        let mut parser = Parser::new("program Test begin end.").unwrap();
        let err = parser.parse().unwrap_err();
        assert!(matches!(err, CompileError::Parser { span, .. } if span.start == 13));
    }

    #[test]
    fn test_unary_operators() {
        let program = parse("program Test; var x : INTEGER; begin x := -x + +1 end.");
        let stmt = &program.block.compound_statement.statements[0];
        if let StmtKind::Assign { value, .. } = &stmt.kind {
            if let ExprKind::Binary { left, right, .. } = &value.kind {
                assert!(matches!(
                    left.kind,
                    ExprKind::Unary {
                        op: UnaryOp::Neg,
                        ..
                    }
                ));
                assert!(matches!(
                    right.kind,
                    ExprKind::Unary {
                        op: UnaryOp::Plus,
                        ..
                    }
                ));
            } else {
                panic!("expected binary expression");
            }
        } else {
            panic!("expected assignment");
        }
    }
}
