//! Core AST definitions.
//!
//! The tree is a closed set of enums so every stage matches exhaustively:
//! [`Stmt`] for statements, [`Expr`] for value-producing expressions and
//! [`IdentProd`] for the chainable identifier productions.

use crate::Span;

use super::{
    expressions::{
        ArrayLiteral, ClassAccessor, ClassConstructor, FnCall, Identifier, Indexed, Input,
        InfixExpr, Literal, PostfixExpr, PrefixExpr, StringFmt,
    },
    statements::{
        Assignment, Break, Class, Declaration, ExpressionStmt, For, Function, If, Print, Return,
        While,
    },
};

/// Root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub globals: Vec<Declaration>,
    pub functions: Vec<Function>,
    pub classes: Vec<Class>,
    pub mainuwu: Function,
}

impl Program {
    /// Functions in declaration order, `mainuwu` last.
    pub fn all_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().chain(std::iter::once(&self.mainuwu))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration(Declaration),
    Assignment(Assignment),
    Expression(ExpressionStmt),
    Print(Print),
    If(If),
    While(While),
    For(For),
    Return(Return),
    Break(Break),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Declaration(stmt) => stmt.span,
            Stmt::Assignment(stmt) => stmt.span,
            Stmt::Expression(stmt) => stmt.span,
            Stmt::Print(stmt) => stmt.span,
            Stmt::If(stmt) => stmt.span,
            Stmt::While(stmt) => stmt.span,
            Stmt::For(stmt) => stmt.span,
            Stmt::Return(stmt) => stmt.span,
            Stmt::Break(stmt) => stmt.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    StringFmt(StringFmt),
    Input(Input),
    Array(ArrayLiteral),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    Postfix(PostfixExpr),
    Ident(IdentProd),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(expr) => expr.span,
            Expr::StringFmt(expr) => expr.span,
            Expr::Input(expr) => expr.span,
            Expr::Array(expr) => expr.span,
            Expr::Prefix(expr) => expr.span,
            Expr::Infix(expr) => expr.span,
            Expr::Postfix(expr) => expr.span,
            Expr::Ident(expr) => expr.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentProd {
    Identifier(Identifier),
    Indexed(Indexed),
    Call(FnCall),
    Constructor(ClassConstructor),
    Accessor(ClassAccessor),
}

impl IdentProd {
    pub fn span(&self) -> Span {
        match self {
            IdentProd::Identifier(prod) => prod.span,
            IdentProd::Indexed(prod) => prod.span,
            IdentProd::Call(prod) => prod.span,
            IdentProd::Constructor(prod) => prod.span,
            IdentProd::Accessor(prod) => prod.span,
        }
    }

    /// The name this production starts from: `a` in `a[0].b()`.
    pub fn root(&self) -> &Identifier {
        match self {
            IdentProd::Identifier(id) => id,
            IdentProd::Indexed(indexed) => &indexed.id,
            IdentProd::Call(call) => &call.callee,
            IdentProd::Constructor(constructor) => &constructor.class,
            IdentProd::Accessor(accessor) => accessor.object.root(),
        }
    }

    /// Whether the production names a storage location.
    pub fn is_assignable(&self) -> bool {
        match self {
            IdentProd::Identifier(_) | IdentProd::Indexed(_) => true,
            IdentProd::Call(_) | IdentProd::Constructor(_) => false,
            IdentProd::Accessor(accessor) => accessor.member.is_assignable(),
        }
    }
}
