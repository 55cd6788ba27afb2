//! Error types and error handling for the front end.
//!
//! Every stage reports problems as [`errors::Error`] values instead of
//! stopping at the first one. Errors carry:
//!
//! - The source span they refer to
//! - A specific variant per category (lexical, syntactic, name resolution, type)
//! - A suggestion tip and, for some variants, a note pointing at a second site

pub mod errors;

#[cfg(test)]
mod tests;
