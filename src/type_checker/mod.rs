//! Type checking.
//!
//! Runs after name resolution, so every name is known to exist. Builds
//! signature tables for functions, classes, class members (`Class.member`)
//! and the `senpai`/array builtins, then walks the program checking
//! declarations, assignments, operators, calls, returns and constness
//! against the coercion rules in [`signatures::is_similar_type`].
//!
//! A variable only reads as its declared type once it holds a value; until
//! then, or after a failed assignment, it reads as `san` so one mistake does
//! not cascade.

pub mod signatures;
pub mod type_checker;

#[cfg(test)]
mod tests;
