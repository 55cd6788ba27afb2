//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program-level entry
//! point. The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence
//!
//! Errors are collected rather than returned one at a time: a failed
//! production is recorded and the parser skips ahead to the next statement
//! or top-level declaration.

use std::collections::HashMap;

use crate::{
    ast::ast::Program,
    context::Context,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind, RESERVED_LOOKUP, SPLIT_KEYWORDS, SYMBOL_LOOKUP},
    Span,
};

use super::{
    lookups::{
        create_token_lookups, lookup_key, BPLookup, BindingPower, LEDHandler, LEDLookup,
        NUDHandler, NUDLookup, StmtHandler, StmtLookup,
    },
    stmt::{parse_class, parse_function, parse_global},
};

/// The main parser structure that maintains parsing state.
pub struct Parser<'a> {
    /// Tokens without trivia, always ending in `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Interning tables the tokens were produced with
    context: &'a Context,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Errors recorded so far
    errors: Vec<Error>,
    /// Number of loops enclosing the current statement
    loop_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `tokens`. Trivia is dropped and a trailing
    /// `EOF` is guaranteed.
    pub fn new(tokens: Vec<Token>, context: &'a Context) -> Self {
        let mut tokens = tokens
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect::<Vec<Token>>();

        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let span = tokens
                .last()
                .map(|token| Span::new(token.span.end, token.span.end))
                .unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::EOF,
                lexeme: String::new(),
                span,
            });
        }

        Parser {
            tokens,
            pos: 0,
            context,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            errors: vec![],
            loop_depth: 0,
        }
    }

    pub fn context(&self) -> &Context {
        self.context
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].kind
    }

    /// Advances to the next token and returns the previous token. Stays on
    /// `EOF` once it is reached.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    pub fn is_current(&self, kind: TokenKind) -> bool {
        self.current_token_kind() == kind
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.current_token_kind(), TokenKind::Identifier(_))
    }

    /// A statement starting `name-` is a declaration.
    pub fn at_declaration(&self) -> bool {
        self.is_identifier() && self.peek_kind() == TokenKind::Dash
    }

    /// Builds an error pointing at the current token.
    pub fn error_here(&self, error_impl: ErrorImpl) -> Error {
        Error::new(error_impl, self.current_token().span)
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(error.unwrap_or_else(|| {
                self.error_here(ErrorImpl::ExpectedToken {
                    expected: describe_kind(&expected_kind),
                    received: describe_token(self.current_token()),
                })
            }));
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    pub fn expect_identifier(&mut self) -> Result<Token, Error> {
        if !self.is_identifier() {
            return Err(self.error_here(ErrorImpl::ExpectedToken {
                expected: String::from("an identifier"),
                received: describe_token(self.current_token()),
            }));
        }

        Ok(self.advance().clone())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn record(&mut self, error: Error) {
        log::trace!("syntax error: {}", error);
        self.errors.push(error);
    }

    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
    }

    pub fn exit_loop(&mut self) {
        self.loop_depth = self.loop_depth.saturating_sub(1);
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }

    /// Skips the rest of a broken statement: up to and including the next
    /// `~`, or past a nested block, stopping before a `]]` that closes the
    /// enclosing block.
    pub fn synchronize(&mut self) {
        let mut depth = 0usize;

        while self.has_tokens() {
            match self.current_token_kind() {
                TokenKind::Terminator if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::DoubleOpenBracket => depth += 1,
                TokenKind::DoubleCloseBracket => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skips to the next top-level `gwobaw`, `fwunc` or `cwass`.
    pub fn synchronize_top_level(&mut self) {
        let mut depth = 0usize;

        while self.has_tokens() {
            match self.current_token_kind() {
                TokenKind::Gwobaw | TokenKind::Fwunc | TokenKind::Cwass if depth == 0 => return,
                TokenKind::DoubleOpenBracket => depth += 1,
                TokenKind::DoubleCloseBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    pub fn get_stmt_handler(&self, kind: &TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&lookup_key(kind)).copied()
    }

    pub fn get_nud_handler(&self, kind: &TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&lookup_key(kind)).copied()
    }

    pub fn get_led_handler(&self, kind: &TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&lookup_key(kind)).copied()
    }

    /// Binding power of `kind` as an infix or postfix operator.
    pub fn get_binding_power(&self, kind: &TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&lookup_key(kind))
            .copied()
            .unwrap_or(BindingPower::Lowest)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup
            .insert(lookup_key(&kind), binding_power);
        self.led_lookup.insert(lookup_key(&kind), led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(lookup_key(&kind), nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(lookup_key(&kind), stmt_fn);
    }
}

/// Source form of a token kind for diagnostics: "`~`", "`whiwe`".
pub fn describe_kind(kind: &TokenKind) -> String {
    let text = SYMBOL_LOOKUP
        .iter()
        .chain(SPLIT_KEYWORDS.iter())
        .find(|(_, candidate)| candidate == kind)
        .map(|(text, _)| *text)
        .or_else(|| {
            RESERVED_LOOKUP
                .iter()
                .find(|(_, candidate)| *candidate == kind)
                .map(|(text, _)| *text)
        });

    match text {
        Some(text) => format!("`{}`", text),
        None => match kind {
            TokenKind::EOF => String::from("end of file"),
            TokenKind::Identifier(_) => String::from("an identifier"),
            TokenKind::ClassId(_) => String::from("a class name"),
            kind => kind.to_string(),
        },
    }
}

pub fn describe_token(token: &Token) -> String {
    if token.kind == TokenKind::EOF {
        String::from("end of file")
    } else {
        token.lexeme.clone()
    }
}

/// Parses a token stream into a [`Program`].
///
/// Top level items are `gwobaw` declarations, `fwunc` functions (one of
/// which must be `mainuwu`) and `cwass` declarations. Every syntax error is
/// returned, not just the first.
pub fn parse(tokens: Vec<Token>, context: &Context) -> Result<Program, Vec<Error>> {
    let mut parser = Parser::new(tokens, context);
    create_token_lookups(&mut parser);

    let mut globals = vec![];
    let mut functions = vec![];
    let mut classes = vec![];
    let mut mainuwu = None;

    while parser.has_tokens() {
        let start = parser.pos;

        let result = match parser.current_token_kind() {
            TokenKind::Gwobaw => parse_global(&mut parser).map(|global| globals.push(global)),
            TokenKind::Cwass => parse_class(&mut parser).map(|class| classes.push(class)),
            TokenKind::Fwunc if parser.peek_kind() == TokenKind::Mainuwu => {
                parse_function(&mut parser).map(|function| {
                    if mainuwu.is_some() {
                        parser.record(Error::new(
                            ErrorImpl::DuplicateEntryFunction,
                            function.name.span,
                        ));
                    } else {
                        mainuwu = Some(function);
                    }
                })
            }
            TokenKind::Fwunc => parse_function(&mut parser).map(|function| functions.push(function)),
            _ => Err(parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().lexeme.clone(),
                message: String::from("expected `gwobaw`, `fwunc` or `cwass`"),
            })),
        };

        if let Err(error) = result {
            parser.record(error);
            parser.synchronize_top_level();
            if parser.pos == start {
                parser.advance();
            }
        }
    }

    let mainuwu = match mainuwu {
        Some(mainuwu) => Some(mainuwu),
        None => {
            let span = parser.current_token().span;
            parser.record(Error::new(ErrorImpl::MissingEntryFunction, span));
            None
        }
    };

    log::debug!(
        "parsed {} globals, {} functions, {} classes with {} errors",
        globals.len(),
        functions.len(),
        classes.len(),
        parser.errors.len()
    );

    match mainuwu {
        Some(mainuwu) if parser.errors.is_empty() => Ok(Program {
            globals,
            functions,
            classes,
            mainuwu,
        }),
        _ => Err(parser.errors),
    }
}
