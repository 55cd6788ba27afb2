use crate::{lexer::tokens::Token, Span};

use super::ast::{Expr, IdentProd};

// LITERALS

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Nuww,
}

/// Literal Expression
/// A single-token value: `42`, `4.2`, `"text"`, `fax`, `cap`, `nuww`.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub span: Span,
}

/// One piece of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum FmtSegment {
    Text(String),
    Expr(Expr),
}

/// Interpolated String Expression
/// `"Hello |name|!"` becomes `[Text("Hello "), Expr(name), Text("!")]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StringFmt {
    pub segments: Vec<FmtSegment>,
    pub span: Span,
}

impl StringFmt {
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        self.segments.iter().filter_map(|segment| match segment {
            FmtSegment::Expr(expr) => Some(expr),
            FmtSegment::Text(_) => None,
        })
    }
}

/// `inpwt(prompt)`
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub prompt: Option<Box<Expr>>,
    pub span: Span,
}

/// Array Literal
/// `{1, 2, 3}` or nested `{{1}, {2, 3}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expr>,
    pub span: Span,
}

impl ArrayLiteral {
    /// Nesting depth of the literal, counting this level.
    pub fn depth(&self) -> usize {
        1 + self
            .elements
            .iter()
            .filter_map(|element| match element {
                Expr::Array(array) => Some(array.depth()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

// OPERATORS

/// Prefix Expression
/// `-x`, `!done`
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Binary Expression
/// `left operator right`
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Postfix Expression
/// `x++`, `a[i]--`
#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpr {
    pub target: IdentProd,
    pub operator: Token,
    pub span: Span,
}

// IDENTIFIER PRODUCTIONS

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// `name[i][j]`
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed {
    pub id: Identifier,
    pub indices: Vec<Expr>,
    pub span: Span,
}

/// `name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct FnCall {
    pub callee: Identifier,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `ClassName(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassConstructor {
    pub class: Identifier,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `object.member`, chained left to right: `a.b.c()` is
/// `Accessor(Accessor(a, b), c())`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassAccessor {
    pub object: Box<IdentProd>,
    pub member: Box<IdentProd>,
    pub span: Span,
}
