use std::fmt::Display;

use thiserror::Error;

use crate::{analyzer::scope::Classification, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::DelimiterError { .. } => "DelimiterError",
            ErrorImpl::UnterminatedIdentifier { .. } => "UnterminatedIdentifier",
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::MissingEntryFunction => "MissingEntryFunction",
            ErrorImpl::DuplicateEntryFunction => "DuplicateEntryFunction",
            ErrorImpl::ConstantWithoutValue { .. } => "ConstantWithoutValue",
            ErrorImpl::BreakOutsideLoop => "BreakOutsideLoop",
            ErrorImpl::DuplicateDefinitionError { .. } => "DuplicateDefinitionError",
            ErrorImpl::UndefinedError { .. } => "UndefinedError",
            ErrorImpl::TypeMismatchError { .. } => "TypeMismatchError",
            ErrorImpl::ReturnTypeMismatchError { .. } => "ReturnTypeMismatchError",
            ErrorImpl::ArgumentMismatchError { .. } => "ArgumentMismatchError",
            ErrorImpl::InvalidOperandError { .. } => "InvalidOperandError",
            ErrorImpl::NonIterableIndexError { .. } => "NonIterableIndexError",
            ErrorImpl::NonClassAccessError { .. } => "NonClassAccessError",
            ErrorImpl::UndefinedMemberError { .. } => "UndefinedMemberError",
            ErrorImpl::MemberRoleMismatchError { .. } => "MemberRoleMismatchError",
            ErrorImpl::HeterogeneousArrayError { .. } => "HeterogeneousArrayError",
            ErrorImpl::ReassignedConstantError { .. } => "ReassignedConstantError",
            ErrorImpl::ConstantLoopVariableError { .. } => "ConstantLoopVariableError",
            ErrorImpl::MissingReturnError { .. } => "MissingReturnError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::DelimiterError {
                lexeme,
                expected,
                actual,
            } => ErrorTip::Suggestion(format!(
                "`{}` cannot be followed by `{}`, expected one of: {}",
                lexeme,
                actual,
                expected.join(" ")
            )),
            ErrorImpl::UnterminatedIdentifier { lexeme } => ErrorTip::Suggestion(format!(
                "Identifier `{}` runs into the end of the line",
                lexeme
            )),
            ErrorImpl::UnterminatedString { lexeme } => ErrorTip::Suggestion(format!(
                "String `{}` is never closed on this line",
                lexeme
            )),
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a `~`?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedToken { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {}, received `{}`",
                expected, received
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::MissingEntryFunction => ErrorTip::Suggestion(String::from(
                "Every program needs a `fwunc mainuwu-san() [[ ]]`",
            )),
            ErrorImpl::DuplicateEntryFunction => {
                ErrorTip::Suggestion(String::from("Only one `mainuwu` may be declared"))
            }
            ErrorImpl::ConstantWithoutValue { variable } => ErrorTip::Suggestion(format!(
                "Constant `{}` needs a value when it is declared",
                variable
            )),
            ErrorImpl::BreakOutsideLoop => {
                ErrorTip::Suggestion(String::from("`bweak` can only be used inside a loop"))
            }
            ErrorImpl::DuplicateDefinitionError {
                name,
                duplicate_classification,
                ..
            } => ErrorTip::Suggestion(format!(
                "{} `{}` is already defined",
                duplicate_classification, name
            )),
            ErrorImpl::UndefinedError { name, expected } => {
                ErrorTip::Suggestion(format!("{} `{}` is not defined", expected, name))
            }
            ErrorImpl::TypeMismatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ReturnTypeMismatchError {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` returns `{}`, received `{}`",
                function, expected, received
            )),
            ErrorImpl::ArgumentMismatchError {
                callee,
                expected,
                received,
                mismatches,
            } => {
                if expected != received {
                    ErrorTip::Suggestion(format!(
                        "`{}` expects {} arguments, received {}",
                        callee, expected, received
                    ))
                } else {
                    ErrorTip::Suggestion(format!(
                        "Arguments of `{}` do not match: {}",
                        callee,
                        mismatches.join(", ")
                    ))
                }
            }
            ErrorImpl::InvalidOperandError { operator, operand } => ErrorTip::Suggestion(
                format!("Operator `{}` cannot be used on `{}`", operator, operand),
            ),
            ErrorImpl::NonIterableIndexError { received } => ErrorTip::Suggestion(format!(
                "Only arrays and `senpai` can be indexed, received `{}`",
                received
            )),
            ErrorImpl::NonClassAccessError { received } => ErrorTip::Suggestion(format!(
                "Members can only be accessed on classes, `senpai` and arrays, received `{}`",
                received
            )),
            ErrorImpl::UndefinedMemberError { owner, member } => {
                ErrorTip::Suggestion(format!("`{}` has no member `{}`", owner, member))
            }
            ErrorImpl::MemberRoleMismatchError {
                name,
                expected,
                actual,
            } => ErrorTip::Suggestion(format!(
                "`{}` is a {}, but is used as a {}",
                name, actual, expected
            )),
            ErrorImpl::HeterogeneousArrayError { types } => ErrorTip::Suggestion(format!(
                "Array elements must share one type, found: {}",
                types.join(", ")
            )),
            ErrorImpl::ReassignedConstantError { variable, .. } => ErrorTip::Suggestion(
                format!("`{}` is declared `dono` and cannot be reassigned", variable),
            ),
            ErrorImpl::ConstantLoopVariableError { variable } => ErrorTip::Suggestion(format!(
                "Loop variable `{}` changes every iteration, drop `-dono`",
                variable
            )),
            ErrorImpl::MissingReturnError {
                function,
                return_type,
            } => ErrorTip::Suggestion(format!(
                "`{}` must `wetuwn` a `{}` value",
                function, return_type
            )),
        }
    }

    /// Secondary location worth pointing at, if the error has one.
    pub fn get_note(&self) -> Option<String> {
        match &self.internal_error {
            ErrorImpl::DuplicateDefinitionError {
                name,
                original,
                original_classification,
                ..
            } => Some(format!(
                "`{}` was first defined as {} at {}",
                name, original_classification, original.start
            )),
            ErrorImpl::ReassignedConstantError {
                variable,
                declaration,
            } => Some(format!(
                "`{}` was declared at {}",
                variable, declaration.start
            )),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.internal_error, self.span.start)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("{lexeme:?} followed by {actual:?}, expected one of {expected:?}")]
    DelimiterError {
        lexeme: String,
        expected: Vec<String>,
        actual: String,
    },
    #[error("unterminated identifier {lexeme:?}")]
    UnterminatedIdentifier { lexeme: String },
    #[error("unterminated string {lexeme:?}")]
    UnterminatedString { lexeme: String },

    // Syntactic
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected {expected}, received {received:?}")]
    ExpectedToken { expected: String, received: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("missing entry function `mainuwu`")]
    MissingEntryFunction,
    #[error("entry function `mainuwu` declared more than once")]
    DuplicateEntryFunction,
    #[error("constant {variable:?} declared without a value")]
    ConstantWithoutValue { variable: String },
    #[error("`bweak` outside of a loop")]
    BreakOutsideLoop,

    // Name resolution
    #[error("{duplicate_classification} {name:?} already defined as {original_classification}")]
    DuplicateDefinitionError {
        name: String,
        original: Span,
        original_classification: Classification,
        duplicate_classification: Classification,
    },
    #[error("{expected} {name:?} not defined")]
    UndefinedError { name: String, expected: Classification },

    // Types
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMismatchError { expected: String, received: String },
    #[error("return type of {function:?} does not match: expected {expected:?}, received {received:?}")]
    ReturnTypeMismatchError {
        function: String,
        expected: String,
        received: String,
    },
    #[error("arguments of {callee:?} do not match: expected {expected}, received {received}: {mismatches:?}")]
    ArgumentMismatchError {
        callee: String,
        expected: usize,
        received: usize,
        mismatches: Vec<String>,
    },
    #[error("operator {operator:?} cannot be applied to {operand:?}")]
    InvalidOperandError { operator: String, operand: String },
    #[error("cannot index into {received:?}")]
    NonIterableIndexError { received: String },
    #[error("cannot access a member of {received:?}")]
    NonClassAccessError { received: String },
    #[error("{owner:?} has no member {member:?}")]
    UndefinedMemberError { owner: String, member: String },
    #[error("{name:?} is a {actual}, used as a {expected}")]
    MemberRoleMismatchError {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("array elements have different types: {types:?}")]
    HeterogeneousArrayError { types: Vec<String> },
    #[error("constant {variable:?} reassigned")]
    ReassignedConstantError { variable: String, declaration: Span },
    #[error("loop variable {variable:?} declared constant")]
    ConstantLoopVariableError { variable: String },
    #[error("function {function:?} is missing a return of type {return_type:?}")]
    MissingReturnError {
        function: String,
        return_type: String,
    },
}
