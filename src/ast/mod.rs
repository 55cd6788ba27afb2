/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program root and the statement/expression/identifier enums
/// - expressions: Definitions for the expression and identifier productions
/// - statements: Definitions for statements, functions and classes
pub mod ast;
pub mod expressions;
pub mod statements;
