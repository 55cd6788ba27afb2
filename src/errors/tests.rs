//! Unit tests for error handling.
//!
//! This module contains tests for error names, tips and notes.

use crate::analyzer::scope::Classification;
use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::{Position, Span};

fn span(line: usize, column: usize) -> Span {
    Span::new(Position::new(line, column), Position::new(line, column))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        span(0, 10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_span() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "]]".to_string(),
        },
        span(3, 42),
    );

    assert_eq!(error.get_span().start.line, 3);
    assert_eq!(error.get_span().start.column, 42);
}

#[test]
fn test_delimiter_error_tip_lists_expected() {
    let error = Error::new(
        ErrorImpl::DelimiterError {
            lexeme: "5".to_string(),
            expected: vec!["~".to_string(), ",".to_string()],
            actual: "a".to_string(),
        },
        span(0, 0),
    );

    assert_eq!(error.get_error_name(), "DelimiterError");
    assert_eq!(
        error.get_tip().to_string(),
        "`5` cannot be followed by `a`, expected one of: ~ ,"
    );
}

#[test]
fn test_duplicate_definition_has_note() {
    let error = Error::new(
        ErrorImpl::DuplicateDefinitionError {
            name: "aqua".to_string(),
            original: span(0, 7),
            original_classification: Classification::Identifier,
            duplicate_classification: Classification::Function,
        },
        span(4, 6),
    );

    assert_eq!(error.get_error_name(), "DuplicateDefinitionError");
    assert_eq!(
        error.get_note().unwrap(),
        "`aqua` was first defined as identifier at 1:8"
    );
}

#[test]
fn test_reassigned_constant_has_note() {
    let error = Error::new(
        ErrorImpl::ReassignedConstantError {
            variable: "x".to_string(),
            declaration: span(1, 4),
        },
        span(2, 4),
    );

    assert_eq!(error.get_note().unwrap(), "`x` was declared at 2:5");
}

#[test]
fn test_constant_loop_variable_points_at_itself() {
    let error = Error::new(
        ErrorImpl::ConstantLoopVariableError {
            variable: "i".to_string(),
        },
        span(3, 9),
    );

    assert_eq!(error.get_error_name(), "ConstantLoopVariableError");
    assert_eq!(error.get_note(), None);
    assert_eq!(
        error.get_tip().to_string(),
        "Loop variable `i` changes every iteration, drop `-dono`"
    );
}

#[test]
fn test_argument_count_tip() {
    let error = Error::new(
        ErrorImpl::ArgumentMismatchError {
            callee: "add".to_string(),
            expected: 2,
            received: 3,
            mismatches: vec![],
        },
        span(0, 0),
    );

    assert_eq!(
        error.get_tip().to_string(),
        "`add` expects 2 arguments, received 3"
    );
}

#[test]
fn test_argument_type_tip() {
    let error = Error::new(
        ErrorImpl::ArgumentMismatchError {
            callee: "add".to_string(),
            expected: 2,
            received: 2,
            mismatches: vec!["argument 2: expected `chan`, received `senpai`".to_string()],
        },
        span(0, 0),
    );

    assert_eq!(
        error.get_tip().to_string(),
        "Arguments of `add` do not match: argument 2: expected `chan`, received `senpai`"
    );
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(ErrorImpl::BreakOutsideLoop, span(2, 0));
    assert_eq!(error.to_string(), "`bweak` outside of a loop at 3:1");
}
