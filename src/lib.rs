#![allow(clippy::module_inception)]

use std::path::Path;

use crate::{
    ast::ast::Program,
    builder::builder::AstBuilder,
    cst::cst::SyntaxTree,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    type_checker::{environment::GlobalTypeEnv, type_checker::TypeChecker, typed_ast::Typed},
};

pub mod ast;
pub mod builder;
pub mod cst;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A `[from, to)` byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub fn new(from: usize, to: usize) -> Self {
        Span { from, to }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.from..self.to]
    }
}

/// Where a node starts, for diagnostics only.
///
/// `line` and `column` are 1-based; `src_code` is the full text of the line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub src_code: String,
}

/// Maps byte offsets to [`SourceLocation`]s.
#[derive(Debug, Clone)]
pub struct SourceMap<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> SourceMap<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        SourceMap { source, line_starts }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn location(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.source.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let start = self.line_starts[line_index];
        let end = self.source[start..]
            .find('\n')
            .map(|n| start + n)
            .unwrap_or(self.source.len());

        SourceLocation {
            line: line_index + 1,
            column: self.source[start..offset].chars().count() + 1,
            src_code: self.source[start..end].trim_end_matches('\r').to_string(),
        }
    }
}

/// Lexes, parses and builds the untyped AST for `source`.
pub fn parse_program(source: &str) -> Result<Program<SourceLocation>, Error> {
    let tokens = tokenize(source)?;
    let tree = parser::parser::parse(tokens, source)?;
    build_program(&tree, source)
}

/// Runs the AST builder over an already parsed syntax tree.
pub fn build_program(tree: &SyntaxTree, source: &str) -> Result<Program<SourceLocation>, Error> {
    AstBuilder::new(source).build(&mut tree.cursor())
}

/// Parses `source` and type checks it on top of `env`.
///
/// Returns the annotated program and the environment augmented with the
/// program's declarations.
pub fn check_program(
    source: &str,
    env: &GlobalTypeEnv,
) -> Result<(Program<Typed>, GlobalTypeEnv), Error> {
    let program = parse_program(source)?;
    let mut checker = TypeChecker::new(env.clone());
    let typed = checker.check(program)?;
    Ok((typed, checker.into_env()))
}

pub fn display_error(error: &Error, file: &Path) {
    /*
        error: message
        -> final.py
           |
        20 | x = y + True
           |     ^
    */

    let location = error.get_location();

    let line_string = location.line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file.as_os_str().to_string_lossy());
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&location.src_code);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = location.column.saturating_sub(removed_whitespace).max(1);

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use super::SourceMap;

    #[test]
    fn test_location_at_offset() {
        let source = "x : int = 1\ndef f():\n  pass\n";
        let map = SourceMap::new(source);

        let location = map.location(0);
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 1);
        assert_eq!(location.src_code, "x : int = 1");

        let location = map.location(source.find("pass").unwrap());
        assert_eq!(location.line, 3);
        assert_eq!(location.column, 3);
        assert_eq!(location.src_code, "  pass");
    }

    #[test]
    fn test_location_at_end_of_source() {
        let source = "1 + 2";
        let location = SourceMap::new(source).location(source.len());
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 6);
    }

    #[test]
    fn test_remove_starting_whitespace() {
        let (text, removed) = super::remove_starting_whitespace("    return x");
        assert_eq!(text, "return x");
        assert_eq!(removed, 4);
    }
}
