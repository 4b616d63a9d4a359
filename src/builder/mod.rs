//! AST builder.
//!
//! Walks a concrete syntax tree through the [`crate::cst::cst::Cursor`]
//! trait and produces the untyped [`crate::ast::ast::Program`].

pub mod builder;
