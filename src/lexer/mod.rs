//! Lexical analysis module.
//!
//! Converts source lines into a flat token stream. It handles:
//!
//! - A line/column cursor that wraps across line boundaries
//! - Keyword and operator recognition by peek-matching, including keywords
//!   split by spaces (`ewse iwf`, `do whiwe`)
//! - Per-kind delimiter sets: a lexeme is only accepted when the character
//!   after it is allowed to follow it
//! - Interned identifier and class-name kinds, owned by a [`crate::context::Context`]
//! - Interpolated strings (`"a |x| b"`)
//!
//! Whitespace, newlines and comments are kept as tokens so spans stay
//! contiguous; the parser filters them out.

pub mod lexer;
pub mod tokens;
