//! Symbol records produced by semantic analysis

use std::fmt;

/// A symbol in a scope table
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(VariableSymbol),
    BuiltinType(BuiltinTypeSymbol),
    Procedure(ProcedureSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(sym) => &sym.name,
            Symbol::BuiltinType(sym) => &sym.name,
            Symbol::Procedure(sym) => &sym.name,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Variable(sym) => write!(f, "{sym}"),
            Symbol::BuiltinType(sym) => write!(f, "{sym}"),
            Symbol::Procedure(sym) => write!(f, "{sym}"),
        }
    }
}

/// A declared variable or formal parameter
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    /// The symbol the declared type name resolved to at declaration time,
    /// if it resolved at all
    pub declared_type: Option<Box<Symbol>>,
}

impl VariableSymbol {
    pub fn new(name: String, declared_type: Option<Box<Symbol>>) -> Self {
        Self {
            name,
            declared_type,
        }
    }
}

impl fmt::Display for VariableSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declared_type {
            Some(ty) => write!(f, "<variable '{}' : {}>", self.name, ty),
            None => write!(f, "<variable '{}'>", self.name),
        }
    }
}

/// A builtin scalar type (`INTEGER`, `REAL`)
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinTypeSymbol {
    pub name: String,
}

impl BuiltinTypeSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for BuiltinTypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A declared procedure or function
///
/// Functions reuse this record; whether a function body assigned its
/// return value is tracked on the function's scope table, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureSymbol {
    pub name: String,
    /// Formal parameters in declaration order
    pub params: Vec<VariableSymbol>,
}

impl ProcedureSymbol {
    pub fn new(name: String) -> Self {
        Self {
            name,
            params: Vec::new(),
        }
    }
}

impl fmt::Display for ProcedureSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<procedure '{}'(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.name)?;
        }
        write!(f, ")>")
    }
}
