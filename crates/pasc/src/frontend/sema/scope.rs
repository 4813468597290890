//! Scope tables and the arena-backed scope chain

use indexmap::IndexMap;

use super::symbol::{BuiltinTypeSymbol, Symbol};

/// What kind of body a scope belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Procedure,
    Function,
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeKind::Program => write!(f, "program"),
            ScopeKind::Procedure => write!(f, "procedure"),
            ScopeKind::Function => write!(f, "function"),
        }
    }
}

/// One lexical scope: a symbol map plus a link to its enclosing scope
///
/// Every table starts out holding the two builtin type symbols `INTEGER`
/// and `REAL` — each scope gets its own copies, whatever its depth.
#[derive(Debug)]
pub struct ScopeTable {
    scope_name: String,
    scope_kind: ScopeKind,
    scope_level: usize,
    /// Arena index of the enclosing scope, none for the outermost
    enclosing: Option<usize>,
    /// name -> symbol, insertion order preserved
    symbols: IndexMap<String, Symbol>,
    /// Only meaningful for `Function` scopes
    has_return_assignment: bool,
}

impl ScopeTable {
    fn new(
        scope_name: String,
        scope_kind: ScopeKind,
        scope_level: usize,
        enclosing: Option<usize>,
    ) -> Self {
        let mut table = Self {
            scope_name,
            scope_kind,
            scope_level,
            enclosing,
            symbols: IndexMap::new(),
            has_return_assignment: false,
        };
        table.insert(Symbol::BuiltinType(BuiltinTypeSymbol::new("INTEGER")));
        table.insert(Symbol::BuiltinType(BuiltinTypeSymbol::new("REAL")));
        table
    }

    /// Add or silently overwrite a symbol under its own name
    ///
    /// Last write wins; duplicate detection is the analyzer's job.
    pub fn insert(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.name().to_string(), symbol);
    }

    /// Look up a name in this table only, without following the chain
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbol_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.get_mut(name)
    }

    /// Symbols in insertion order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    pub fn scope_kind(&self) -> ScopeKind {
        self.scope_kind
    }

    pub fn scope_level(&self) -> usize {
        self.scope_level
    }

    pub fn enclosing(&self) -> Option<usize> {
        self.enclosing
    }

    pub fn has_return_assignment(&self) -> bool {
        self.has_return_assignment
    }

    pub fn mark_return_assignment(&mut self) {
        self.has_return_assignment = true;
    }
}

/// The chain of live scopes, stored as an arena
///
/// Scopes are pushed when the analyzer enters a program, procedure, or
/// function body and popped when it leaves, strictly LIFO — the current
/// scope is always the last record and the enclosing links always point
/// at earlier records.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<ScopeTable>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Enter a new scope nested in the current one
    pub fn push(&mut self, scope_name: &str, scope_kind: ScopeKind) {
        let enclosing = self.scopes.len().checked_sub(1);
        let scope_level = self.scopes.last().map_or(1, |s| s.scope_level + 1);
        self.scopes.push(ScopeTable::new(
            scope_name.to_string(),
            scope_kind,
            scope_level,
            enclosing,
        ));
    }

    /// Leave the current scope, discarding its table
    pub fn pop(&mut self) -> Option<ScopeTable> {
        self.scopes.pop()
    }

    /// The current (innermost) scope
    ///
    /// Callers must have pushed at least one scope.
    pub fn current(&self) -> &ScopeTable {
        self.scopes.last().expect("scope stack is empty")
    }

    pub fn current_mut(&mut self) -> &mut ScopeTable {
        self.scopes.last_mut().expect("scope stack is empty")
    }

    /// Arena index of the current scope
    pub fn current_index(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Insert into the current scope
    pub fn insert(&mut self, symbol: Symbol) {
        self.current_mut().insert(symbol);
    }

    /// Resolve a name against the current scope
    ///
    /// With `current_scope_only` the search stops at the current table;
    /// otherwise it follows the enclosing links outward. Absence is a
    /// normal result, never an error, and lookup never mutates state.
    pub fn lookup(&self, name: &str, current_scope_only: bool) -> Option<&Symbol> {
        let mut index = self.scopes.len().checked_sub(1)?;
        loop {
            let scope = &self.scopes[index];
            if let Some(symbol) = scope.lookup_local(name) {
                return Some(symbol);
            }
            if current_scope_only {
                return None;
            }
            index = scope.enclosing()?;
        }
    }

    /// Mutable access to a symbol in an arbitrary scope record
    pub fn symbol_mut(&mut self, scope: usize, name: &str) -> Option<&mut Symbol> {
        self.scopes.get_mut(scope)?.symbol_mut(name)
    }

    /// Render the current scope table for tracing
    pub fn dump_current(&self) -> String {
        use std::fmt::Write;

        let scope = self.current();
        let enclosing_name = scope
            .enclosing()
            .map_or("(none)", |i| self.scopes[i].scope_name());

        let mut out = String::new();
        let _ = writeln!(out, "=== scope: {} ===", scope.scope_name());
        let _ = writeln!(out, "kind     : {}", scope.scope_kind());
        let _ = writeln!(out, "level    : {}", scope.scope_level());
        let _ = writeln!(out, "enclosing: {}", enclosing_name);
        let _ = writeln!(out, "symbols:");
        for symbol in scope.symbols() {
            let _ = writeln!(out, "  {:>9}: {}", symbol.name(), symbol);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::sema::symbol::VariableSymbol;

    fn variable(name: &str) -> Symbol {
        Symbol::Variable(VariableSymbol::new(name.to_string(), None))
    }

    #[test]
    fn test_every_scope_is_seeded_with_builtins() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        stack.push("middle", ScopeKind::Procedure);
        stack.push("inner", ScopeKind::Function);

        // Each table carries its own copies, whatever the depth
        for _ in 0..3 {
            assert!(matches!(
                stack.lookup("INTEGER", true),
                Some(Symbol::BuiltinType(_))
            ));
            assert!(matches!(
                stack.lookup("REAL", true),
                Some(Symbol::BuiltinType(_))
            ));
            stack.pop();
        }
    }

    #[test]
    fn test_scope_levels_increase_with_nesting() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        assert_eq!(stack.current().scope_level(), 1);
        stack.push("middle", ScopeKind::Procedure);
        assert_eq!(stack.current().scope_level(), 2);
        stack.push("inner", ScopeKind::Procedure);
        assert_eq!(stack.current().scope_level(), 3);
    }

    #[test]
    fn test_local_lookup_does_not_follow_the_chain() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        stack.insert(variable("x"));
        stack.push("inner", ScopeKind::Procedure);

        assert!(stack.lookup("x", true).is_none());
        assert!(stack.lookup("x", false).is_some());
    }

    #[test]
    fn test_chained_lookup_prefers_the_innermost_symbol() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        stack.insert(variable("x"));
        stack.push("inner", ScopeKind::Procedure);
        stack.insert(Symbol::Variable(VariableSymbol::new(
            "x".to_string(),
            Some(Box::new(Symbol::BuiltinType(BuiltinTypeSymbol::new(
                "INTEGER",
            )))),
        )));

        let found = stack.lookup("x", false).unwrap();
        assert!(matches!(
            found,
            Symbol::Variable(v) if v.declared_type.is_some()
        ));
    }

    #[test]
    fn test_lookup_of_absent_name_is_none() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        assert!(stack.lookup("nope", false).is_none());
    }

    #[test]
    fn test_insert_silently_overwrites() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        stack.insert(variable("x"));
        stack.insert(Symbol::Variable(VariableSymbol::new(
            "x".to_string(),
            Some(Box::new(Symbol::BuiltinType(BuiltinTypeSymbol::new("REAL")))),
        )));

        let found = stack.lookup("x", true).unwrap();
        assert!(matches!(
            found,
            Symbol::Variable(v) if v.declared_type.is_some()
        ));
    }

    #[test]
    fn test_popped_scope_symbols_are_gone() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        stack.push("inner", ScopeKind::Procedure);
        stack.insert(variable("local"));
        stack.pop();

        assert!(stack.lookup("local", false).is_none());
    }

    #[test]
    fn test_dump_lists_symbols_in_insertion_order() {
        let mut stack = ScopeStack::new();
        stack.push("outer", ScopeKind::Program);
        stack.insert(variable("zz"));
        stack.insert(variable("aa"));

        let dump = stack.dump_current();
        let zz = dump.find("zz").unwrap();
        let aa = dump.find("aa").unwrap();
        // Builtins come first, then declarations as written
        assert!(dump.find("INTEGER").unwrap() < zz);
        assert!(zz < aa);
    }
}
