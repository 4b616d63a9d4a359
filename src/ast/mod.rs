/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, declaration, statement and expression nodes, generic over
///   their annotation (a source location after building, a type and a source
///   location after type checking)
/// - types: Definitions for type representations in the AST
pub mod ast;
pub mod types;
