//! Name resolution.
//!
//! [`member_analyzer::MemberAnalyzer`] builds the global table (globals,
//! functions and classes) and walks every function body, copying the scope
//! at each block boundary. [`class_analyzer::ClassAnalyzer`] then walks each
//! class with a scope seeded from its own members.
//!
//! Types are not looked at here, only whether names exist and are unique.

use crate::{ast::ast::Program, errors::errors::Error};

pub mod class_analyzer;
pub mod member_analyzer;
pub mod scope;


pub fn analyze(program: &Program) -> Vec<Error> {
    let analysis = member_analyzer::MemberAnalyzer::new(program).analyze();
    let mut errors = analysis.errors;

    for class in program.classes.iter() {
        errors.extend(class_analyzer::ClassAnalyzer::new(class, &analysis.globals).analyze());
    }

    log::debug!(
        "analyzed {} globals, {} functions and {} classes: {} errors",
        program.globals.len(),
        program.functions.len(),
        program.classes.len(),
        errors.len()
    );

    errors
}
