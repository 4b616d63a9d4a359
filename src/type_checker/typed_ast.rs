//! The annotation carried by a type checked AST.
//!
//! The typed tree is the same generic tree the builder produces, with every
//! node annotated by its type alongside its source location.

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        types::Type,
    },
    SourceLocation,
};

pub type Typed = (Type, SourceLocation);

impl Expr<Typed> {
    pub fn ty(&self) -> &Type {
        &self.a.0
    }
}

impl Stmt<Typed> {
    pub fn ty(&self) -> &Type {
        &self.a.0
    }
}

impl Program<Typed> {
    /// The type of the last top-level statement, `None` if there are none.
    pub fn ty(&self) -> &Type {
        &self.a.0
    }
}
