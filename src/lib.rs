#![allow(clippy::module_inception)]

use std::fmt::Display;

use crate::{
    ast::ast::Program,
    context::Context,
    errors::errors::{Error, ErrorTip},
    lexer::tokens::TokenKind,
};

pub mod analyzer;
pub mod ast;
pub mod context;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// Zero-indexed line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    pub fn null() -> Self {
        Position::default()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Start and end position, end inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

/// Splits source text into the line format the lexer consumes: every line
/// keeps its trailing newline, so an empty line is exactly `"\n"`.
pub fn source_lines(source: &str) -> Vec<String> {
    source
        .split_inclusive('\n')
        .map(|line| line.to_string())
        .collect()
}

/// Runs every stage over `source`, stopping after the first stage that
/// reports errors.
pub fn compile(source: &str, context: &mut Context) -> Result<Program, Vec<Error>> {
    let lines = source_lines(source);

    let (tokens, lex_errors) = lexer::lexer::tokenize(&lines, context);
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }

    let program = parser::parser::parse(tokens, context)?;

    let analyzer_errors = analyzer::analyze(&program);
    if !analyzer_errors.is_empty() {
        return Err(analyzer_errors);
    }

    let checked = type_checker::type_checker::type_check(&program);
    if !checked.errors.is_empty() {
        return Err(checked.errors);
    }

    Ok(program)
}

pub fn get_line_at_position(lines: &[String], position: Position) -> Option<(usize, String, usize)> {
    let line = lines.get(position.line)?;
    Some((position.line + 1, line.clone(), position.column))
}

/// Renders an error with the offending source line and a caret underline.
///
/// ```text
/// Error: TypeMismatchError (Expected type `chan`, received `senpai`)
/// -> main.uwu:2:14
///   |
/// 2 | x-chan = "5"~
///   | ---------^
/// ```
pub fn display_error(error: &Error, file: &str, lines: &[String]) -> String {
    let span = error.get_span();
    let mut output = String::new();

    if let ErrorTip::None = error.get_tip() {
        output.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        output.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    output.push_str(&format!("-> {}:{}\n", file, span.start));

    let Some((line, line_text, line_pos)) = get_line_at_position(lines, span.start) else {
        return output;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    output.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    output.push_str(&format!(
        "{} | {}\n",
        line_string,
        line_text_removed.trim_end()
    ));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    if let Some(note) = error.get_note() {
        output.push_str(&format!("{:>padding$} note: {}\n", "=", note));
    }

    output
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

    (string.chars().skip(start).collect(), start)
}

/// Human readable dump of a token stream, one token per line.
pub fn dump_tokens(tokens: &[lexer::tokens::Token]) -> String {
    tokens
        .iter()
        .filter(|token| !token.kind.is_trivia() && token.kind != TokenKind::EOF)
        .map(|token| {
            format!(
                "{:>4}:{:<4} {}",
                token.span.start.line + 1,
                token.span.start.column + 1,
                token.debug()
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::errors::ErrorImpl;

    #[test]
    fn test_source_lines_keep_newlines() {
        let lines = source_lines("a\n\nb");
        assert_eq!(lines, vec!["a\n", "\n", "b"]);
    }

    #[test]
    fn test_get_line_at_position() {
        let lines = source_lines("Hello, world!\nTesting { }\n");
        let (line_number, line, line_pos) =
            get_line_at_position(&lines, Position::new(1, 8)).unwrap();
        assert_eq!(line_number, 2);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(get_line_at_position(&lines, Position::new(5, 0)).is_none());
    }

    #[test]
    fn test_display_error_underlines_column() {
        let lines = source_lines("fwunc mainuwu-san() [[\n    x-chan = \"5\"~\n]]\n");
        let error = Error::new(
            ErrorImpl::TypeMismatchError {
                expected: String::from("chan"),
                received: String::from("senpai"),
            },
            Span::new(Position::new(1, 13), Position::new(1, 15)),
        );

        let rendered = display_error(&error, "main.uwu", &lines);
        let rendered_lines = rendered.lines().collect::<Vec<&str>>();
        assert_eq!(
            rendered_lines[0],
            "Error: TypeMismatchError (Expected type `chan`, received `senpai`)"
        );
        assert_eq!(rendered_lines[1], "-> main.uwu:2:14");
        assert_eq!(rendered_lines[3], "2 | x-chan = \"5\"~");
        assert_eq!(rendered_lines[4], "  | ---------^");
    }
}
