//! Type checking module.
//!
//! Turns a `Program<SourceLocation>` into a `Program<Typed>` while:
//!
//! - Merging top-level declarations into the global type environment
//! - Checking variable initializers, function bodies and class declarations
//! - Annotating every expression and statement with its type
//! - Renaming comprehension variables so they never clash with user names
//!
//! Submodules:
//! - environment: global and local type environments, builtins, assignability
//! - type_checker: the checker itself
//! - typed_ast: the annotation type attached to checked nodes

pub mod environment;
pub mod type_checker;
pub mod typed_ast;

#[cfg(test)]
mod tests;
