use std::slice::Iter;

use crate::{
    lexer::tokens::{DataType, Token},
    Span,
};

use super::{
    ast::{Expr, IdentProd, Stmt},
    expressions::{Identifier, PostfixExpr},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }

    /// Whether a `wetuwn` appears anywhere in the block, nested blocks
    /// included. Paths are not considered.
    pub fn contains_return(&self) -> bool {
        self.body.iter().any(|stmt| match stmt {
            Stmt::Return(_) => true,
            Stmt::If(if_stmt) => {
                if_stmt.then_block.contains_return()
                    || if_stmt
                        .else_ifs
                        .iter()
                        .any(|else_if| else_if.block.contains_return())
                    || if_stmt
                        .else_block
                        .as_ref()
                        .map(|block| block.contains_return())
                        .unwrap_or(false)
            }
            Stmt::While(while_stmt) => while_stmt.body.contains_return(),
            Stmt::For(for_stmt) => for_stmt.body.contains_return(),
            _ => false,
        })
    }
}

/// `name-type[-dono] [= value]~`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: Identifier,
    pub data_type: DataType,
    pub is_const: bool,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `target op value~` where op is `=` or a compound assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: IdentProd,
    pub operator: Token,
    pub value: Expr,
    pub span: Span,
}

/// A call, accessor chain or postfix update used as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expr,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expr,
    pub then_block: Block,
    pub else_ifs: Vec<ElseIf>,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// `whiwe` and `do whiwe` loops. A `do` loop runs its body once before the
/// condition is tested.
#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Expr,
    pub body: Block,
    pub is_do: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(Declaration),
    Assignment(Assignment),
}

impl ForInit {
    pub fn span(&self) -> Span {
        match self {
            ForInit::Declaration(declaration) => declaration.span,
            ForInit::Assignment(assignment) => assignment.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForUpdate {
    Assignment(Assignment),
    Postfix(PostfixExpr),
}

/// `fow (init~ condition~ update) [[ body ]]`
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub init: ForInit,
    pub condition: Expr,
    pub update: ForUpdate,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Break {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Identifier,
    pub data_type: DataType,
    pub span: Span,
}

/// `fwunc name-type(params) [[ body ]]`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Identifier,
    pub return_type: DataType,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

impl Function {
    pub fn param_types(&self) -> Vec<DataType> {
        self.params
            .iter()
            .map(|param| param.data_type.clone())
            .collect()
    }
}

/// `cwass Name(params) [[ properties and methods ]]`
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Identifier,
    /// The type values of this class have.
    pub data_type: DataType,
    pub params: Vec<Param>,
    pub properties: Vec<Declaration>,
    pub methods: Vec<Function>,
    pub span: Span,
}

impl Class {
    pub fn param_types(&self) -> Vec<DataType> {
        self.params
            .iter()
            .map(|param| param.data_type.clone())
            .collect()
    }
}
