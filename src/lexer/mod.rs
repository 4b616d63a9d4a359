//! Lexical analysis.
//!
//! Converts source text into a stream of tokens for the CST parser:
//!
//! - Tokenization using an ordered table of regex patterns
//! - Recognition of keywords, identifiers, literals and operators
//! - Python layout: `Newline`, `Indent` and `Dedent` tokens
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
