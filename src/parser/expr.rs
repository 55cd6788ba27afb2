use crate::{
    ast::{
        ast::{Expr, IdentProd},
        expressions::{
            ArrayLiteral, ClassAccessor, ClassConstructor, FmtSegment, FnCall, Identifier,
            Indexed, InfixExpr, Input, Literal, LiteralValue, PostfixExpr, PrefixExpr, StringFmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    lookups::BindingPower,
    parser::{describe_token, Parser},
};

pub fn parse_expr(parser: &mut Parser<'_>, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_handler(&token_kind) else {
        return Err(parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
            token: describe_token(parser.current_token()),
            message: String::from("expected an expression"),
        }));
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than `bp`, keep folding into lhs
    while parser.get_binding_power(&parser.current_token_kind()) > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_handler(&token_kind) else {
            return Err(parser.error_here(ErrorImpl::UnexpectedToken {
                token: describe_token(parser.current_token()),
            }));
        };

        let binding_power = parser.get_binding_power(&token_kind);
        left = led(parser, left, binding_power)?;
    }

    Ok(left)
}

/// Strips `open` and `close` from the ends of a string-part lexeme.
fn trim_delimiters(lexeme: &str, open: char, close: char) -> &str {
    let lexeme = lexeme.strip_prefix(open).unwrap_or(lexeme);
    lexeme.strip_suffix(close).unwrap_or(lexeme)
}

/// Resolves `\"`, `\|`, `\\`, `\n` and `\t`.
pub fn unescape(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            output.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => output.push('\n'),
            Some('t') => output.push('\t'),
            Some(other) => output.push(other),
            None => output.push('\\'),
        }
    }

    output
}

pub fn parse_literal_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let number_error = || {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.lexeme.clone(),
            },
            token.span,
        )
    };

    let value = match token.kind {
        TokenKind::IntLiteral => {
            LiteralValue::Int(token.lexeme.parse::<i64>().map_err(|_| number_error())?)
        }
        TokenKind::FloatLiteral => {
            LiteralValue::Float(token.lexeme.parse::<f64>().map_err(|_| number_error())?)
        }
        TokenKind::StringLiteral => {
            LiteralValue::Str(unescape(trim_delimiters(&token.lexeme, '"', '"')))
        }
        TokenKind::Fax => LiteralValue::Bool(true),
        TokenKind::Cap => LiteralValue::Bool(false),
        TokenKind::Nuww => LiteralValue::Nuww,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.lexeme.clone(),
                },
                token.span,
            ))
        }
    };

    Ok(Expr::Literal(Literal {
        value,
        span: token.span,
    }))
}

fn push_text(segments: &mut Vec<FmtSegment>, text: &str) {
    if !text.is_empty() {
        segments.push(FmtSegment::Text(unescape(text)));
    }
}

/// `"text |expr| text |expr| text"`
pub fn parse_string_fmt_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let start = parser.advance().clone();
    let mut segments = vec![];
    push_text(&mut segments, trim_delimiters(&start.lexeme, '"', '|'));

    loop {
        segments.push(FmtSegment::Expr(parse_expr(parser, BindingPower::Lowest)?));

        let token = parser.current_token().clone();
        match token.kind {
            TokenKind::StringPartMid => {
                parser.advance();
                push_text(&mut segments, trim_delimiters(&token.lexeme, '|', '|'));
            }
            TokenKind::StringPartEnd => {
                parser.advance();
                push_text(&mut segments, trim_delimiters(&token.lexeme, '|', '"'));
                return Ok(Expr::StringFmt(StringFmt {
                    segments,
                    span: start.span.to(&token.span),
                }));
            }
            _ => {
                return Err(parser.error_here(ErrorImpl::ExpectedToken {
                    expected: String::from("`|` to close the interpolated expression"),
                    received: describe_token(&token),
                }))
            }
        }
    }
}

/// `inpwt(prompt)`, the prompt is optional.
pub fn parse_input_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let start = parser.advance().span;
    parser.expect(TokenKind::OpenParen)?;

    let prompt = if parser.is_current(TokenKind::CloseParen) {
        None
    } else {
        Some(Box::new(parse_expr(parser, BindingPower::Lowest)?))
    };

    let end = parser.expect(TokenKind::CloseParen)?.span;

    Ok(Expr::Input(Input {
        prompt,
        span: start.to(&end),
    }))
}

pub fn parse_array_literal_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let start = parser.advance().span;
    let mut elements = vec![];

    while !parser.is_current(TokenKind::CloseBrace) {
        elements.push(parse_expr(parser, BindingPower::Lowest)?);
        if !parser.is_current(TokenKind::Comma) {
            break;
        }
        parser.advance();
    }

    let end = parser.expect(TokenKind::CloseBrace)?.span;

    Ok(Expr::Array(ArrayLiteral {
        elements,
        span: start.to(&end),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Lowest)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_prefix_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, BindingPower::Prefix)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: operator.span.to(&right.span()),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_binary_expr(
    parser: &mut Parser<'_>,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, Error> {
    let operator = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Infix(InfixExpr {
        span: left.span().to(&right.span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_postfix_expr(
    parser: &mut Parser<'_>,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator = parser.advance().clone();

    match left {
        Expr::Ident(target) => Ok(Expr::Postfix(PostfixExpr {
            span: target.span().to(&operator.span),
            target,
            operator,
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: operator.lexeme.clone(),
                message: String::from("only variables can be incremented or decremented"),
            },
            operator.span,
        )),
    }
}

pub fn parse_ident_expr(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    Ok(Expr::Ident(parse_ident_prod(parser)?))
}

/// `(arg, arg, ...)`, returning the arguments and the closing paren's span.
pub fn parse_args(parser: &mut Parser<'_>) -> Result<(Vec<Expr>, Span), Error> {
    parser.expect(TokenKind::OpenParen)?;
    let mut args = vec![];

    while !parser.is_current(TokenKind::CloseParen) {
        args.push(parse_expr(parser, BindingPower::Lowest)?);
        if !parser.is_current(TokenKind::Comma) {
            break;
        }
        parser.advance();
    }

    let end = parser.expect(TokenKind::CloseParen)?.span;
    Ok((args, end))
}

/// Parses an identifier, call, indexed identifier or constructor and any
/// `.member` links after it.
pub fn parse_ident_prod(parser: &mut Parser<'_>) -> Result<IdentProd, Error> {
    let mut prod = match parser.current_token_kind() {
        TokenKind::ClassId(_) => parse_constructor(parser)?,
        _ => parse_ident_link(parser)?,
    };

    while parser.is_current(TokenKind::Dot) {
        parser.advance();
        let member = parse_ident_link(parser)?;
        let span = prod.span().to(&member.span());

        prod = IdentProd::Accessor(ClassAccessor {
            object: Box::new(prod),
            member: Box::new(member),
            span,
        });
    }

    Ok(prod)
}

fn parse_constructor(parser: &mut Parser<'_>) -> Result<IdentProd, Error> {
    let token = parser.advance().clone();

    if !parser.is_current(TokenKind::OpenParen) {
        return Err(parser.error_here(ErrorImpl::ExpectedToken {
            expected: format!("`(` to construct `{}`", token.lexeme),
            received: describe_token(parser.current_token()),
        }));
    }

    let (args, end) = parse_args(parser)?;

    Ok(IdentProd::Constructor(ClassConstructor {
        class: Identifier {
            name: token.lexeme,
            span: token.span,
        },
        args,
        span: token.span.to(&end),
    }))
}

fn parse_ident_link(parser: &mut Parser<'_>) -> Result<IdentProd, Error> {
    let token = parser.expect_identifier()?;
    let id = Identifier {
        name: token.lexeme,
        span: token.span,
    };

    if parser.is_current(TokenKind::OpenParen) {
        let (args, end) = parse_args(parser)?;
        return Ok(IdentProd::Call(FnCall {
            span: id.span.to(&end),
            callee: id,
            args,
        }));
    }

    if parser.is_current(TokenKind::OpenBracket) {
        let mut indices = vec![];
        let mut end = id.span;

        while parser.is_current(TokenKind::OpenBracket) {
            parser.advance();
            indices.push(parse_expr(parser, BindingPower::Lowest)?);
            end = parser.expect(TokenKind::CloseBracket)?.span;
        }

        return Ok(IdentProd::Indexed(Indexed {
            span: id.span.to(&end),
            id,
            indices,
        }));
    }

    Ok(IdentProd::Identifier(id))
}
