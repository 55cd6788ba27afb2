//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`crate::ast::ast::Program`]. It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Top level `gwobaw`, `fwunc` and `cwass` declarations
//! - Statement parsing (declarations, assignments, control flow, loops)
//! - Expression parsing (operators, literals, interpolated strings)
//! - Identifier productions (calls, indexing, constructors, accessor chains)
//! - Type parsing for declarations and signatures
//! - Error recovery and reporting
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
