use std::{collections::HashMap, mem::Discriminant};

use crate::{
    ast::ast::{Expr, Stmt},
    errors::errors::Error,
    lexer::tokens::{TokenKind, UniqueId},
};

use super::{expr::*, parser::Parser, stmt::*};

/// Precedence levels, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Lowest,
    Logical,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    FnCall,
}

pub type StmtHandler = fn(&mut Parser<'_>) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser<'_>) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser<'_>, Expr, BindingPower) -> Result<Expr, Error>;

/// Tables are keyed by variant only, so every `Identifier(_)` shares one
/// entry.
pub type LookupKey = Discriminant<TokenKind>;

pub fn lookup_key(kind: &TokenKind) -> LookupKey {
    std::mem::discriminant(kind)
}

pub fn create_token_lookups(parser: &mut Parser<'_>) {
    // Logical
    parser.led(TokenKind::And, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::Or, BindingPower::Logical, parse_binary_expr);

    // Equality
    parser.led(TokenKind::Equals, BindingPower::Equals, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Equals, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Less, BindingPower::LessGreater, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::LessGreater, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::LessGreater, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::LessGreater, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Sum, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Sum, parse_binary_expr);
    parser.led(TokenKind::Ampersand, BindingPower::Sum, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Product, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Product, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Product, parse_binary_expr);

    parser.led(TokenKind::Increment, BindingPower::FnCall, parse_postfix_expr);
    parser.led(TokenKind::Decrement, BindingPower::FnCall, parse_postfix_expr);

    // Literals and symbols
    parser.nud(TokenKind::IntLiteral, parse_literal_expr);
    parser.nud(TokenKind::FloatLiteral, parse_literal_expr);
    parser.nud(TokenKind::StringLiteral, parse_literal_expr);
    parser.nud(TokenKind::Fax, parse_literal_expr);
    parser.nud(TokenKind::Cap, parse_literal_expr);
    parser.nud(TokenKind::Nuww, parse_literal_expr);
    parser.nud(TokenKind::StringPartStart, parse_string_fmt_expr);
    parser.nud(TokenKind::Inpwt, parse_input_expr);
    parser.nud(TokenKind::OpenBrace, parse_array_literal_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::Identifier(UniqueId::default()), parse_ident_expr);
    parser.nud(TokenKind::ClassId(UniqueId::default()), parse_ident_expr);

    // Statements
    parser.stmt(TokenKind::Iwf, parse_if_stmt);
    parser.stmt(TokenKind::Whiwe, parse_while_stmt);
    parser.stmt(TokenKind::DoWhiwe, parse_while_stmt);
    parser.stmt(TokenKind::Fow, parse_for_stmt);
    parser.stmt(TokenKind::Wetuwn, parse_return_stmt);
    parser.stmt(TokenKind::Bweak, parse_break_stmt);
    parser.stmt(TokenKind::Pwint, parse_print_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<LookupKey, StmtHandler>;
pub type NUDLookup = HashMap<LookupKey, NUDHandler>;
pub type LEDLookup = HashMap<LookupKey, LEDHandler>;
pub type BPLookup = HashMap<LookupKey, BindingPower>;
