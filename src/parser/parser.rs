//! Parser implementation for building the concrete syntax tree.
//!
//! This module contains the main Parser struct and the parsing entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::collections::HashMap;

use tracing::debug;

use crate::{
    cst::cst::{SyntaxKind, SyntaxNode, SyntaxTree},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    SourceMap, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// statements and expressions. It tracks the current position in the token
/// stream and provides methods for token consumption.
pub struct Parser<'s> {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Locations for error reporting
    map: SourceMap<'s>,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
}

impl<'s> Parser<'s> {
    pub fn new(mut tokens: Vec<Token>, source: &'s str) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = source.len();
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::new(end, end)));
        }

        Parser {
            tokens,
            pos: 0,
            map: SourceMap::new(source),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Binding power of the current token, `Default` when it has none.
    pub fn current_bp(&self) -> BindingPower {
        self.binding_power_lookup
            .get(&self.current_token_kind())
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token as a leaf of the given kind.
    pub fn leaf(&mut self, kind: SyntaxKind) -> SyntaxNode {
        SyntaxNode::leaf(kind, self.advance().span)
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(self.unexpected()),
            }
        } else {
            Ok(self.advance())
        }
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Expects a token of the given kind and turns it into a leaf.
    pub fn expect_leaf(&mut self, expected_kind: TokenKind, kind: SyntaxKind) -> Result<SyntaxNode, Error> {
        let token = self.expect(expected_kind)?;
        Ok(SyntaxNode::leaf(kind, token.span))
    }

    /// Returns true if the current token is not EOF.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// An `UnexpectedToken` error at the current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        self.error_at(
            ErrorImpl::UnexpectedToken {
                token: token_text(token),
            },
            token.span.from,
        )
    }

    /// An `UnexpectedTokenDetailed` error at the current token.
    pub fn unexpected_detailed(&self, message: &str) -> Error {
        let token = self.current_token();
        self.error_at(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token_text(token),
                message: String::from(message),
            },
            token.span.from,
        )
    }

    pub fn error_at(&self, error: ErrorImpl, offset: usize) -> Error {
        Error::new(error, self.map.location(offset))
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// What a token looks like in a diagnostic; layout tokens have no text.
fn token_text(token: &Token) -> String {
    match token.kind {
        TokenKind::Newline => String::from("newline"),
        TokenKind::Indent => String::from("indent"),
        TokenKind::Dedent => String::from("dedent"),
        TokenKind::EOF => String::from("end of file"),
        _ => token.value.clone(),
    }
}

/// Parses a stream of tokens into a concrete syntax tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF. The
/// first error aborts the parse.
pub fn parse(tokens: Vec<Token>, source: &str) -> Result<SyntaxTree, Error> {
    let mut parser = Parser::new(tokens, source);
    create_token_lookups(&mut parser);

    let mut body = vec![];

    while parser.has_tokens() {
        body.push(parse_stmt(&mut parser)?);
    }

    debug!(statements = body.len(), "parsed concrete syntax tree");

    let mut root = SyntaxNode::branch(SyntaxKind::Script, body);
    root.span = Span::new(0, source.len());

    Ok(SyntaxTree::new(root))
}
