//! Error types and error handling for the front end.
//!
//! Every failure in the pipeline is an [`errors::Error`]: an [`errors::ErrorImpl`]
//! variant plus the [`crate::SourceLocation`] it was raised at. Variants fall
//! into two kinds:
//!
//! - `Parse` - lexing, concrete syntax and AST building failures
//! - `TypeCheck` - violations of the typing rules
//!
//! Both are fail-fast: the first error aborts the whole compilation.

pub mod errors;

#[cfg(test)]
mod tests;
