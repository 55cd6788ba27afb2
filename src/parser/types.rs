//! Data type parsing.
//!
//! A type is a type keyword or a class name followed by one `[]` per array
//! dimension: `chan`, `senpai[]`, `Idol[][]`.

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{DataType, TokenKind},
};

use super::parser::{describe_token, Parser};

pub fn parse_unit_type(parser: &mut Parser<'_>) -> Result<DataType, Error> {
    let token = parser.current_token().clone();

    let data_type = match token.kind {
        TokenKind::ClassId(id) => {
            let name = parser
                .context()
                .class_name(id)
                .unwrap_or(token.lexeme.as_str())
                .to_string();
            DataType::new(token.kind, &name, 0)
        }
        _ => DataType::from_token(&token).ok_or_else(|| {
            parser.error_here(ErrorImpl::ExpectedToken {
                expected: String::from("a data type"),
                received: describe_token(&token),
            })
        })?,
    };

    parser.advance();
    Ok(data_type)
}

pub fn parse_array_type(parser: &mut Parser<'_>, unit: DataType) -> Result<DataType, Error> {
    let mut dimension = 0;

    while parser.is_current(TokenKind::OpenBracket) {
        parser.advance();
        parser.expect(TokenKind::CloseBracket)?;
        dimension += 1;
    }

    Ok(unit.to_arr_type(dimension))
}

pub fn parse_type(parser: &mut Parser<'_>) -> Result<DataType, Error> {
    let unit = parse_unit_type(parser)?;
    parse_array_type(parser, unit)
}
