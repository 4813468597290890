//! Parser module for building the PASC syntax tree

mod parser;

pub use parser::Parser;
