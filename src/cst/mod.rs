//! Concrete syntax tree.
//!
//! A generic tree of kind-tagged nodes with byte spans into the source, and
//! the [`cst::Cursor`] trait through which the AST builder walks it.

pub mod cst;
