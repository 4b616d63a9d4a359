use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    SourceMap, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\r?\n").unwrap(), handler: newline_handler },
        RegexPattern { regex: Regex::new("^[ \t\r]+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^#[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^(\"[^\"\n]*\"|'[^'\n]*')").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^->").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->") },
        RegexPattern { regex: Regex::new("^//").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleSlash, "//") },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
    ];
}

/// Tokenizer state.
///
/// Besides the token buffer it tracks the indentation stack and the bracket
/// depth, which together decide where layout tokens are emitted.
pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    indents: Vec<usize>,
    depth: usize,
    at_line_start: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            tokens: vec![],
            source: source.to_string(),
            pos: 0,
            indents: vec![0],
            depth: 0,
            at_line_start: true,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        match token.kind {
            TokenKind::OpenBracket | TokenKind::OpenCurly | TokenKind::OpenParen => self.depth += 1,
            TokenKind::CloseBracket | TokenKind::CloseCurly | TokenKind::CloseParen => {
                self.depth = self.depth.saturating_sub(1)
            }
            _ => {}
        }

        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.kind)
    }

    fn error(&self, error: ErrorImpl) -> Error {
        Error::new(error, SourceMap::new(&self.source).location(self.pos))
    }

    /// Measures the indentation of a fresh logical line and emits
    /// `Indent`/`Dedent` tokens against the indentation stack.
    fn handle_indentation(&mut self) -> Result<(), Error> {
        self.at_line_start = false;

        if self.depth > 0 {
            return Ok(());
        }

        let rest = self.remainder();
        let width = rest.chars().take_while(|c| *c == ' ' || *c == '\t').count();
        let after = &rest[width..];

        // Blank and comment-only lines carry no layout.
        if after.is_empty() || after.starts_with('\n') || after.starts_with('\r') || after.starts_with('#') {
            return Ok(());
        }

        let current = self.indents.last().copied().unwrap_or(0);

        if width > current {
            self.indents.push(width);
            let start = self.pos;
            trace!(width, "indent");
            self.push(MK_TOKEN!(TokenKind::Indent, String::new(), Span::new(start, start + width)));
        } else if width < current {
            while self.indents.last().is_some_and(|top| *top > width) {
                self.indents.pop();
                let at = self.pos + width;
                trace!(width, "dedent");
                self.push(MK_TOKEN!(TokenKind::Dedent, String::new(), Span::new(at, at)));
            }

            if self.indents.last().copied().unwrap_or(0) != width {
                self.advance_n(width);
                return Err(self.error(ErrorImpl::InconsistentIndentation));
            }
        }

        Ok(())
    }

    fn finish(mut self) -> Vec<Token> {
        let end = self.source.len();

        if !matches!(self.last_kind(), None | Some(TokenKind::Newline)) {
            self.push(MK_TOKEN!(TokenKind::Newline, String::from("\n"), Span::new(end, end)));
        }

        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(MK_TOKEN!(TokenKind::Dedent, String::new(), Span::new(end, end)));
        }

        self.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::new(end, end)));
        self.tokens
    }
}

fn matched_len(lexer: &Lexer, regex: &Regex) -> usize {
    regex.find(lexer.remainder()).map(|m| m.end()).unwrap_or(0)
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let start = lexer.pos();
    let value = lexer.remainder()[..len].to_string();

    lexer.push(MK_TOKEN!(TokenKind::Number, value, Span::new(start, start + len)));
    lexer.advance_n(len);
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    lexer.advance_n(len);
}

fn newline_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let start = lexer.pos();

    if lexer.depth == 0 {
        if !matches!(lexer.last_kind(), None | Some(TokenKind::Newline)) {
            lexer.push(MK_TOKEN!(TokenKind::Newline, String::from("\n"), Span::new(start, start + len)));
        }
        lexer.at_line_start = true;
    }

    lexer.advance_n(len);
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let start = lexer.pos();
    let contents = lexer.remainder()[1..len - 1].to_string();

    lexer.push(MK_TOKEN!(TokenKind::String, contents, Span::new(start, start + len)));
    lexer.advance_n(len);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = matched_len(lexer, regex);
    let start = lexer.pos();
    let value = lexer.remainder()[..len].to_string();
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value, Span::new(start, start + len)));
    lexer.advance_n(len);
}

/// Splits `source` into tokens, including Python layout tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        if lex.at_line_start {
            lex.handle_indentation()?;
        }

        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex);
                matched = true;
                break;
            }
        }

        if !matched {
            return Err(lex.error(ErrorImpl::UnrecognisedToken {
                token: lex.at().to_string(),
            }));
        }
    }

    Ok(lex.finish())
}
