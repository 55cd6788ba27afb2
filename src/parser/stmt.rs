use crate::{
    ast::{
        ast::{Expr, IdentProd, Stmt},
        expressions::{Identifier, PostfixExpr},
        statements::{
            Assignment, Block, Break, Class, Declaration, ElseIf, ExpressionStmt, For, ForInit,
            ForUpdate, Function, If, Param, Print, Return, While,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    expr::{parse_args, parse_expr, parse_ident_prod},
    lookups::BindingPower,
    parser::{describe_token, Parser},
    types::{parse_type, parse_unit_type},
};

const ASSIGNMENT_OPERATORS: [TokenKind; 6] = [
    TokenKind::Assign,
    TokenKind::PlusAssign,
    TokenKind::DashAssign,
    TokenKind::StarAssign,
    TokenKind::SlashAssign,
    TokenKind::PercentAssign,
];

pub fn parse_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_handler(&parser.current_token_kind()) {
        return handler(parser);
    }

    match parser.current_token_kind() {
        TokenKind::Identifier(_) if parser.at_declaration() => {
            Ok(Stmt::Declaration(parse_declaration(parser)?))
        }
        TokenKind::Identifier(_) | TokenKind::ClassId(_) => parse_ident_stmt(parser),
        _ => Err(parser.error_here(ErrorImpl::UnexpectedToken {
            token: describe_token(parser.current_token()),
        })),
    }
}

/// `[[ statements ]]`. Broken statements are recorded and skipped so the
/// rest of the block is still parsed.
pub fn parse_block(parser: &mut Parser<'_>) -> Result<Block, Error> {
    let start = parser.expect(TokenKind::DoubleOpenBracket)?.span;
    let mut body = vec![];

    while parser.has_tokens() && !parser.is_current(TokenKind::DoubleCloseBracket) {
        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => {
                parser.record(error);
                parser.synchronize();
            }
        }
    }

    let end = parser.expect(TokenKind::DoubleCloseBracket)?.span;

    Ok(Block {
        body,
        span: start.to(&end),
    })
}

/// `name-type[-dono] [= value]~`
pub fn parse_declaration(parser: &mut Parser<'_>) -> Result<Declaration, Error> {
    let token = parser.expect_identifier()?;
    parser.expect(TokenKind::Dash)?;
    let data_type = parse_type(parser)?;

    let is_const =
        parser.is_current(TokenKind::Dash) && parser.peek_kind() == TokenKind::Dono;
    if is_const {
        parser.advance();
        parser.advance();
    }

    let value = if parser.is_current(TokenKind::Assign) {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Lowest)?)
    } else {
        None
    };

    let end = parser.expect(TokenKind::Terminator)?.span;

    if is_const && value.is_none() {
        parser.record(Error::new(
            ErrorImpl::ConstantWithoutValue {
                variable: token.lexeme.clone(),
            },
            token.span,
        ));
    }

    Ok(Declaration {
        name: Identifier {
            name: token.lexeme,
            span: token.span,
        },
        data_type,
        is_const,
        value,
        span: token.span.to(&end),
    })
}

/// The operator and value of an assignment to `target`. The terminator is
/// left for the caller.
fn parse_assignment(parser: &mut Parser<'_>, target: IdentProd) -> Result<Assignment, Error> {
    if !target.is_assignable() {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: describe_token(parser.current_token()),
                message: String::from("the left side of an assignment must be a variable"),
            },
            target.span(),
        ));
    }

    let operator = parser.advance().clone();
    let value = parse_expr(parser, BindingPower::Lowest)?;

    Ok(Assignment {
        span: target.span().to(&value.span()),
        target,
        operator,
        value,
    })
}

fn make_postfix(target: IdentProd, operator: Token) -> PostfixExpr {
    PostfixExpr {
        span: target.span().to(&operator.span),
        target,
        operator,
    }
}

fn ends_in_call(prod: &IdentProd) -> bool {
    match prod {
        IdentProd::Call(_) | IdentProd::Constructor(_) => true,
        IdentProd::Accessor(accessor) => ends_in_call(&accessor.member),
        IdentProd::Identifier(_) | IdentProd::Indexed(_) => false,
    }
}

/// Statements starting with an identifier production: assignments, calls
/// and postfix updates.
pub fn parse_ident_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    let target = parse_ident_prod(parser)?;
    let kind = parser.current_token_kind();

    if ASSIGNMENT_OPERATORS.contains(&kind) {
        let mut assignment = parse_assignment(parser, target)?;
        let end = parser.expect(TokenKind::Terminator)?.span;
        assignment.span = assignment.span.to(&end);
        return Ok(Stmt::Assignment(assignment));
    }

    if matches!(kind, TokenKind::Increment | TokenKind::Decrement) {
        let operator = parser.advance().clone();
        let postfix = make_postfix(target, operator);
        let end = parser.expect(TokenKind::Terminator)?.span;
        return Ok(Stmt::Expression(ExpressionStmt {
            span: postfix.span.to(&end),
            expression: Expr::Postfix(postfix),
        }));
    }

    if ends_in_call(&target) {
        let end = parser.expect(TokenKind::Terminator)?.span;
        return Ok(Stmt::Expression(ExpressionStmt {
            span: target.span().to(&end),
            expression: Expr::Ident(target),
        }));
    }

    Err(parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
        token: describe_token(parser.current_token()),
        message: String::from("expected an assignment, a call, `++` or `--`"),
    }))
}

pub fn parse_print_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    let start = parser.advance().span;
    let (args, _) = parse_args(parser)?;
    let end = parser.expect(TokenKind::Terminator)?.span;

    Ok(Stmt::Print(Print {
        args,
        span: start.to(&end),
    }))
}

fn parse_condition(parser: &mut Parser<'_>) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Lowest)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    let start = parser.advance().span;
    let condition = parse_condition(parser)?;
    let then_block = parse_block(parser)?;
    let mut end = then_block.span;

    let mut else_ifs = vec![];
    while parser.is_current(TokenKind::EwseIwf) {
        let else_if_start = parser.advance().span;
        let condition = parse_condition(parser)?;
        let block = parse_block(parser)?;
        end = block.span;
        else_ifs.push(ElseIf {
            span: else_if_start.to(&block.span),
            condition,
            block,
        });
    }

    let else_block = if parser.is_current(TokenKind::Ewse) {
        parser.advance();
        let block = parse_block(parser)?;
        end = block.span;
        Some(block)
    } else {
        None
    };

    Ok(Stmt::If(If {
        condition,
        then_block,
        else_ifs,
        else_block,
        span: start.to(&end),
    }))
}

fn parse_loop_body(parser: &mut Parser<'_>) -> Result<Block, Error> {
    parser.enter_loop();
    let body = parse_block(parser);
    parser.exit_loop();
    body
}

/// `whiwe (cond) [[ ]]` and `do whiwe (cond) [[ ]]`
pub fn parse_while_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    let keyword = parser.advance().clone();
    let condition = parse_condition(parser)?;
    let body = parse_loop_body(parser)?;

    Ok(Stmt::While(While {
        span: keyword.span.to(&body.span),
        condition,
        body,
        is_do: keyword.kind == TokenKind::DoWhiwe,
    }))
}

/// `fow (init~ condition~ update) [[ ]]`
pub fn parse_for_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    let start = parser.advance().span;
    parser.expect(TokenKind::OpenParen)?;

    let init = if parser.at_declaration() {
        ForInit::Declaration(parse_declaration(parser)?)
    } else {
        let target = parse_ident_prod(parser)?;
        if !ASSIGNMENT_OPERATORS.contains(&parser.current_token_kind()) {
            return Err(parser.error_here(ErrorImpl::ExpectedToken {
                expected: String::from("a declaration or assignment"),
                received: describe_token(parser.current_token()),
            }));
        }
        let assignment = parse_assignment(parser, target)?;
        parser.expect(TokenKind::Terminator)?;
        ForInit::Assignment(assignment)
    };

    let condition = parse_expr(parser, BindingPower::Lowest)?;
    parser.expect(TokenKind::Terminator)?;

    let target = parse_ident_prod(parser)?;
    let update = match parser.current_token_kind() {
        TokenKind::Increment | TokenKind::Decrement => {
            let operator = parser.advance().clone();
            ForUpdate::Postfix(make_postfix(target, operator))
        }
        kind if ASSIGNMENT_OPERATORS.contains(&kind) => {
            ForUpdate::Assignment(parse_assignment(parser, target)?)
        }
        _ => {
            return Err(parser.error_here(ErrorImpl::ExpectedToken {
                expected: String::from("an assignment, `++` or `--`"),
                received: describe_token(parser.current_token()),
            }))
        }
    };

    parser.expect(TokenKind::CloseParen)?;
    let body = parse_loop_body(parser)?;

    Ok(Stmt::For(For {
        span: start.to(&body.span),
        init,
        condition,
        update,
        body,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    let value = if parser.is_current(TokenKind::Terminator) {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Lowest)?)
    };

    let end = parser.expect(TokenKind::Terminator)?.span;

    Ok(Stmt::Return(Return {
        value,
        span: start.to(&end),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser<'_>) -> Result<Stmt, Error> {
    let start = parser.advance().span;
    let end = parser.expect(TokenKind::Terminator)?.span;

    if !parser.in_loop() {
        parser.record(Error::new(ErrorImpl::BreakOutsideLoop, start));
    }

    Ok(Stmt::Break(Break {
        span: start.to(&end),
    }))
}

fn parse_params(parser: &mut Parser<'_>) -> Result<Vec<Param>, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let mut params = vec![];

    while !parser.is_current(TokenKind::CloseParen) {
        let token = parser.expect_identifier()?;
        parser.expect(TokenKind::Dash)?;
        let data_type = parse_type(parser)?;

        params.push(Param {
            span: token.span.to(&parser.previous_span()),
            name: Identifier {
                name: token.lexeme,
                span: token.span,
            },
            data_type,
        });

        if !parser.is_current(TokenKind::Comma) {
            break;
        }
        parser.advance();
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(params)
}

/// `fwunc name-type(params) [[ body ]]`, including `fwunc mainuwu-san()`.
pub fn parse_function(parser: &mut Parser<'_>) -> Result<Function, Error> {
    let start = parser.expect(TokenKind::Fwunc)?.span;

    let token = if parser.is_current(TokenKind::Mainuwu) {
        parser.advance().clone()
    } else {
        parser.expect_identifier()?
    };

    parser.expect(TokenKind::Dash)?;
    let return_type = parse_type(parser)?;
    let params = parse_params(parser)?;
    let body = parse_block(parser)?;

    Ok(Function {
        span: start.to(&body.span),
        name: Identifier {
            name: token.lexeme,
            span: token.span,
        },
        return_type,
        params,
        body,
    })
}

/// `gwobaw name-type[-dono] [= value]~`
pub fn parse_global(parser: &mut Parser<'_>) -> Result<Declaration, Error> {
    let start = parser.expect(TokenKind::Gwobaw)?.span;
    let mut declaration = parse_declaration(parser)?;
    declaration.span = start.to(&declaration.span);
    Ok(declaration)
}

/// `cwass Name(params) [[ properties and methods ]]`
pub fn parse_class(parser: &mut Parser<'_>) -> Result<Class, Error> {
    let start = parser.expect(TokenKind::Cwass)?.span;

    let token = parser.current_token().clone();
    if !matches!(token.kind, TokenKind::ClassId(_)) {
        return Err(parser.error_here(ErrorImpl::ExpectedToken {
            expected: String::from("a class name"),
            received: describe_token(&token),
        }));
    }
    let data_type = parse_unit_type(parser)?;

    let params = parse_params(parser)?;
    parser.expect(TokenKind::DoubleOpenBracket)?;

    let mut properties = vec![];
    let mut methods = vec![];

    while parser.has_tokens() && !parser.is_current(TokenKind::DoubleCloseBracket) {
        let member = if parser.is_current(TokenKind::Fwunc) {
            parse_function(parser).map(|method| methods.push(method))
        } else if parser.at_declaration() {
            parse_declaration(parser).map(|property| properties.push(property))
        } else {
            Err(parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
                token: describe_token(parser.current_token()),
                message: String::from("expected a property declaration or a `fwunc` method"),
            }))
        };

        if let Err(error) = member {
            parser.record(error);
            parser.synchronize();
        }
    }

    let end = parser.expect(TokenKind::DoubleCloseBracket)?.span;

    Ok(Class {
        name: Identifier {
            name: token.lexeme,
            span: token.span,
        },
        data_type,
        params,
        properties,
        methods,
        span: start.to(&end),
    })
}
