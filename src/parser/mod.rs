//! Parser module for building the concrete syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`crate::cst::cst::SyntaxTree`]. It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Statement parsing (assignments, functions, classes, control flow)
//! - Expression parsing (operators, calls, member access, comprehensions)
//! - Indented blocks delimited by layout tokens
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
