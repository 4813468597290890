//! Semantic analyzer - identifier resolution and scope checking
//!
//! A single-pass structural walk over the syntax tree. Entering a program,
//! procedure, or function body pushes a scope table; leaving pops it.
//! Declarations insert symbols, references resolve through the chain, and
//! the first violation aborts the pass.

use thiserror::Error;

use super::scope::{ScopeKind, ScopeStack};
use super::symbol::{ProcedureSymbol, Symbol, VariableSymbol};
use crate::common::{CompileError, Span};
use crate::frontend::ast::*;

/// A fatal semantic error
///
/// Each variant carries the offending identifier and its source position.
/// There is no recovery: analysis stops at the first error and scopes
/// opened but not yet closed are simply abandoned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("duplicate identifier '{name}'")]
    DuplicateIdentifier { name: String, span: Span },

    #[error("identifier '{name}' not found")]
    IdentifierNotFound { name: String, span: Span },

    #[error("function '{name}' never assigns its return value")]
    MissingReturn { name: String, span: Span },
}

impl SemanticError {
    /// Stable error-code tag
    pub fn code(&self) -> &'static str {
        match self {
            SemanticError::DuplicateIdentifier { .. } => "duplicate-identifier",
            SemanticError::IdentifierNotFound { .. } => "identifier-not-found",
            SemanticError::MissingReturn { .. } => "missing-return",
        }
    }

    /// The offending identifier
    pub fn name(&self) -> &str {
        match self {
            SemanticError::DuplicateIdentifier { name, .. }
            | SemanticError::IdentifierNotFound { name, .. }
            | SemanticError::MissingReturn { name, .. } => name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SemanticError::DuplicateIdentifier { span, .. }
            | SemanticError::IdentifierNotFound { span, .. }
            | SemanticError::MissingReturn { span, .. } => *span,
        }
    }
}

impl From<SemanticError> for CompileError {
    fn from(err: SemanticError) -> Self {
        let span = err.span();
        CompileError::semantic(err.to_string(), span)
    }
}

pub type SemaResult<T> = Result<T, SemanticError>;

/// Configuration for the semantic analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerConfig {
    /// Emit scope enter/leave events and scope dumps to stderr
    pub trace_scopes: bool,
}

/// Semantic analyzer for PASC programs
pub struct SemanticAnalyzer {
    scopes: ScopeStack,
    trace_scopes: bool,
}

impl SemanticAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let mut scopes = ScopeStack::new();
        // Placeholder outermost scope; the real program scope is pushed
        // on top of it when analysis starts.
        scopes.push("builtins", ScopeKind::Program);
        Self {
            scopes,
            trace_scopes: config.trace_scopes,
        }
    }

    /// Analyze a program
    ///
    /// Success means every declaration and reference was resolved and
    /// every function assigned its return value.
    pub fn analyze(&mut self, program: &Program) -> SemaResult<()> {
        self.trace("ENTER scope: global");
        self.scopes.push("global", ScopeKind::Program);

        self.analyze_block(&program.block)?;

        self.dump_current_scope();
        self.scopes.pop();
        self.trace("LEAVE scope: global");
        Ok(())
    }

    fn trace(&self, msg: &str) {
        if self.trace_scopes {
            eprintln!("{msg}");
        }
    }

    fn dump_current_scope(&self) {
        if self.trace_scopes {
            eprintln!("{}", self.scopes.dump_current());
        }
    }

    fn analyze_block(&mut self, block: &Block) -> SemaResult<()> {
        for declaration in &block.declarations {
            self.analyze_declaration(declaration)?;
        }
        self.analyze_compound(&block.compound_statement)
    }

    fn analyze_declaration(&mut self, decl: &Declaration) -> SemaResult<()> {
        match decl {
            Declaration::Var(var) => self.analyze_var_decl(var),
            Declaration::Procedure(proc) => self.analyze_procedure_decl(proc),
            Declaration::Function(func) => self.analyze_function_decl(func),
        }
    }

    fn analyze_var_decl(&mut self, var: &VarDecl) -> SemaResult<()> {
        // The declared type resolves through the chain; an unknown type
        // name leaves the variable untyped rather than failing.
        let declared_type = self
            .scopes
            .lookup(&var.type_spec.name, false)
            .cloned()
            .map(Box::new);

        // Shadowing an outer-scope name is legal; redeclaring within the
        // current scope is not.
        if self.scopes.lookup(&var.name, true).is_some() {
            return Err(SemanticError::DuplicateIdentifier {
                name: var.name.clone(),
                span: var.span,
            });
        }

        self.scopes.insert(Symbol::Variable(VariableSymbol::new(
            var.name.clone(),
            declared_type,
        )));
        Ok(())
    }

    fn analyze_procedure_decl(&mut self, decl: &ProcedureDecl) -> SemaResult<()> {
        // Inserted into the enclosing scope before descending so recursive
        // calls resolve.
        self.scopes
            .insert(Symbol::Procedure(ProcedureSymbol::new(decl.name.clone())));
        let enclosing = self.scopes.current_index();

        self.trace(&format!("ENTER scope: {}", decl.name));
        self.scopes.push(&decl.name, ScopeKind::Procedure);

        let params = self.define_params(&decl.params);
        if let Some(Symbol::Procedure(sym)) = self.scopes.symbol_mut(enclosing, &decl.name) {
            sym.params = params;
        }

        self.analyze_block(&decl.block)?;

        self.dump_current_scope();
        self.scopes.pop();
        self.trace(&format!("LEAVE scope: {}", decl.name));
        Ok(())
    }

    fn analyze_function_decl(&mut self, decl: &FunctionDecl) -> SemaResult<()> {
        self.scopes
            .insert(Symbol::Procedure(ProcedureSymbol::new(decl.name.clone())));
        let enclosing = self.scopes.current_index();

        self.trace(&format!("ENTER scope: {}", decl.name));
        self.scopes.push(&decl.name, ScopeKind::Function);

        let params = self.define_params(&decl.params);
        if let Some(Symbol::Procedure(sym)) = self.scopes.symbol_mut(enclosing, &decl.name) {
            sym.params = params;
        }

        self.analyze_type_spec(&decl.return_type);
        self.analyze_block(&decl.block)?;

        self.dump_current_scope();

        // Errors inside the body surface first; this check only fires once
        // the body has been fully visited.
        if !self.scopes.current().has_return_assignment() {
            return Err(SemanticError::MissingReturn {
                name: decl.name.clone(),
                span: decl.span,
            });
        }

        self.scopes.pop();
        self.trace(&format!("LEAVE scope: {}", decl.name));
        Ok(())
    }

    /// Define formal parameters in the routine's own scope, returning
    /// their symbols in declaration order
    fn define_params(&mut self, params: &[Param]) -> Vec<VariableSymbol> {
        let mut symbols = Vec::new();
        for param in params {
            // Parameter types resolve in the new scope, not the enclosing one
            let declared_type = self
                .scopes
                .lookup(&param.type_spec.name, false)
                .cloned()
                .map(Box::new);
            let symbol = VariableSymbol::new(param.name.clone(), declared_type);
            self.scopes.insert(Symbol::Variable(symbol.clone()));
            symbols.push(symbol);
        }
        symbols
    }

    fn analyze_compound(&mut self, compound: &Compound) -> SemaResult<()> {
        for stmt in &compound.statements {
            self.analyze_stmt(stmt)?;
        }
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) -> SemaResult<()> {
        match &stmt.kind {
            StmtKind::Compound(compound) => self.analyze_compound(compound),
            StmtKind::Assign {
                target,
                target_span,
                value,
            } => self.analyze_assign(target, *target_span, value),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.analyze_expr(condition)?;
                self.analyze_stmt(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.analyze_stmt(else_branch)?;
                }
                Ok(())
            }
            // Only the condition is resolved; the loop body is not
            // traversed here.
            StmtKind::While { condition, .. } => self.analyze_expr(condition),
            StmtKind::Call(call) => self.analyze_call(call),
            StmtKind::Empty => Ok(()),
        }
    }

    fn analyze_assign(&mut self, target: &str, target_span: Span, value: &Expr) -> SemaResult<()> {
        // Assigning to the enclosing function's own name is the language's
        // return convention; it marks the scope instead of resolving.
        let is_return_assignment = {
            let current = self.scopes.current();
            current.scope_kind() == ScopeKind::Function && target == current.scope_name()
        };

        if is_return_assignment {
            self.scopes.current_mut().mark_return_assignment();
        } else if self.scopes.lookup(target, false).is_none() {
            return Err(SemanticError::IdentifierNotFound {
                name: target.to_string(),
                span: target_span,
            });
        }

        self.analyze_expr(value)
    }

    fn analyze_call(&mut self, call: &CallExpr) -> SemaResult<()> {
        // Calls are resolved structurally only: the callee name is not
        // looked up and arity is not checked against the declaration.
        for arg in &call.args {
            self.analyze_expr(arg)?;
        }
        Ok(())
    }

    fn analyze_expr(&mut self, expr: &Expr) -> SemaResult<()> {
        match &expr.kind {
            ExprKind::IntLiteral(_) | ExprKind::RealLiteral(_) => Ok(()),
            ExprKind::Var(name) => {
                if self.scopes.lookup(name, false).is_none() {
                    return Err(SemanticError::IdentifierNotFound {
                        name: name.clone(),
                        span: expr.span,
                    });
                }
                Ok(())
            }
            ExprKind::Binary { left, right, .. } => {
                self.analyze_expr(left)?;
                self.analyze_expr(right)
            }
            ExprKind::Unary { operand, .. } => self.analyze_expr(operand),
            ExprKind::Call(call) => self.analyze_call(call),
        }
    }

    fn analyze_type_spec(&self, _type_spec: &TypeSpec) {
        // Type nodes carry no scope effects
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
