//! Unit tests for the parser module.
//!
//! Covers program structure, operator precedence, statements, identifier
//! production chains and error recovery.

use crate::{
    ast::{
        ast::{Expr, IdentProd, Program, Stmt},
        expressions::{FmtSegment, LiteralValue},
        statements::{ForInit, ForUpdate},
    },
    context::Context,
    errors::errors::Error,
    lexer::{lexer::tokenize, tokens::TokenKind},
    source_lines,
};

use super::{expr::unescape, parser::parse};

fn parse_source(source: &str) -> Result<Program, Vec<Error>> {
    let mut context = Context::new();
    let (tokens, errors) = tokenize(&source_lines(source), &mut context);
    assert!(errors.is_empty(), "lexing failed: {:?}", errors);
    parse(tokens, &context)
}

fn parse_main(body: &str) -> Result<Program, Vec<Error>> {
    parse_source(&format!("fwunc mainuwu-san() [[\n{}]]\n", body))
}

fn main_body(body: &str) -> Vec<Stmt> {
    parse_main(body).unwrap().mainuwu.body.body
}

fn error_names(errors: &[Error]) -> Vec<&str> {
    errors.iter().map(|error| error.get_error_name()).collect()
}

fn declared_value(stmt: &Stmt) -> &Expr {
    match stmt {
        Stmt::Declaration(declaration) => declaration.value.as_ref().unwrap(),
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn test_parse_minimal_program() {
    let program = parse_source("fwunc mainuwu-san() [[\n]]\n").unwrap();
    assert_eq!(program.mainuwu.name.name, "mainuwu");
    assert!(program.mainuwu.body.body.is_empty());
    assert!(program.globals.is_empty());
}

#[test]
fn test_parse_globals_and_functions() {
    let program = parse_source(
        "gwobaw count-chan = 0~
gwobaw name-senpai-dono = \"aqua\"~
fwunc add-chan(a-chan, b-chan) [[
    wetuwn a + b~
]]
fwunc mainuwu-san() [[
]]
",
    )
    .unwrap();

    assert_eq!(program.globals.len(), 2);
    assert!(program.globals[1].is_const);
    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.functions[0].params.len(), 2);
    assert_eq!(program.functions[0].return_type.to_string(), "chan");
}

#[test]
fn test_missing_entry_function() {
    let errors = parse_source("gwobaw x-chan = 1~\n").unwrap_err();
    assert_eq!(error_names(&errors), vec!["MissingEntryFunction"]);
}

#[test]
fn test_duplicate_entry_function() {
    let errors =
        parse_source("fwunc mainuwu-san() [[\n]]\nfwunc mainuwu-san() [[\n]]\n").unwrap_err();
    assert_eq!(error_names(&errors), vec!["DuplicateEntryFunction"]);
}

#[test]
fn test_product_binds_tighter_than_sum() {
    let body = main_body("    x-chan = 1 + 2 * 3~\n");

    let Expr::Infix(sum) = declared_value(&body[0]) else {
        panic!("expected an infix expression");
    };
    assert_eq!(sum.operator.kind, TokenKind::Plus);
    let Expr::Infix(product) = sum.right.as_ref() else {
        panic!("expected the product on the right");
    };
    assert_eq!(product.operator.kind, TokenKind::Star);
}

#[test]
fn test_logical_binds_looser_than_equality() {
    let body = main_body("    ok-sama = a == 1 and b == 2~\n");

    let Expr::Infix(logical) = declared_value(&body[0]) else {
        panic!("expected an infix expression");
    };
    assert_eq!(logical.operator.kind, TokenKind::And);
    assert!(matches!(logical.left.as_ref(), Expr::Infix(_)));
    assert!(matches!(logical.right.as_ref(), Expr::Infix(_)));
}

#[test]
fn test_prefix_binds_tighter_than_product() {
    let body = main_body("    x-chan = -y * 2~\n");

    let Expr::Infix(product) = declared_value(&body[0]) else {
        panic!("expected an infix expression");
    };
    assert_eq!(product.operator.kind, TokenKind::Star);
    assert!(matches!(product.left.as_ref(), Expr::Prefix(_)));
}

#[test]
fn test_grouping_overrides_precedence() {
    let body = main_body("    x-chan = (1 + 2) * 3~\n");

    let Expr::Infix(product) = declared_value(&body[0]) else {
        panic!("expected an infix expression");
    };
    assert_eq!(product.operator.kind, TokenKind::Star);
}

#[test]
fn test_constant_without_value() {
    let errors = parse_main("    x-chan-dono~\n").unwrap_err();
    assert_eq!(error_names(&errors), vec!["ConstantWithoutValue"]);
}

#[test]
fn test_break_outside_loop() {
    let errors = parse_main("    bweak~\n").unwrap_err();
    assert_eq!(error_names(&errors), vec!["BreakOutsideLoop"]);

    assert!(parse_main("    whiwe (fax) [[\n        bweak~\n    ]]\n").is_ok());
}

#[test]
fn test_if_chain() {
    let body = main_body(
        "    iwf (x < 1) [[
        pwint(1)~
    ]] ewse iwf (x < 2) [[
        pwint(2)~
    ]] ewse [[
        pwint(3)~
    ]]
",
    );

    let Stmt::If(if_stmt) = &body[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(if_stmt.else_ifs.len(), 1);
    assert!(if_stmt.else_block.is_some());
    assert_eq!(if_stmt.then_block.body.len(), 1);
}

#[test]
fn test_do_while() {
    let body = main_body("    do whiwe (x > 0) [[\n        x--~\n    ]]\n");

    let Stmt::While(while_stmt) = &body[0] else {
        panic!("expected a while statement");
    };
    assert!(while_stmt.is_do);
    assert_eq!(while_stmt.body.body.len(), 1);
}

#[test]
fn test_for_loop() {
    let body = main_body("    fow (i-chan = 0~ i < 3~ i++) [[\n        pwint(i)~\n    ]]\n");

    let Stmt::For(for_stmt) = &body[0] else {
        panic!("expected a for statement");
    };
    assert!(matches!(for_stmt.init, ForInit::Declaration(_)));
    assert!(matches!(for_stmt.update, ForUpdate::Postfix(_)));
}

#[test]
fn test_for_loop_with_assignments() {
    let body = main_body("    fow (i = 0~ i < 3~ i += 1) [[\n    ]]\n");

    let Stmt::For(for_stmt) = &body[0] else {
        panic!("expected a for statement");
    };
    assert!(matches!(for_stmt.init, ForInit::Assignment(_)));
    assert!(matches!(for_stmt.update, ForUpdate::Assignment(_)));
}

#[test]
fn test_accessor_chain_is_left_nested() {
    let body = main_body("    a.b.c(1)~\n");

    let Stmt::Expression(stmt) = &body[0] else {
        panic!("expected an expression statement");
    };
    let Expr::Ident(IdentProd::Accessor(outer)) = &stmt.expression else {
        panic!("expected an accessor");
    };
    assert!(matches!(outer.member.as_ref(), IdentProd::Call(_)));

    let IdentProd::Accessor(inner) = outer.object.as_ref() else {
        panic!("expected a nested accessor");
    };
    assert_eq!(inner.object.root().name, "a");
    assert!(matches!(inner.member.as_ref(), IdentProd::Identifier(_)));
}

#[test]
fn test_multi_dimensional_index_assignment() {
    let body = main_body("    a[0][1] = 2~\n");

    let Stmt::Assignment(assignment) = &body[0] else {
        panic!("expected an assignment");
    };
    let IdentProd::Indexed(indexed) = &assignment.target else {
        panic!("expected an indexed target");
    };
    assert_eq!(indexed.indices.len(), 2);
}

#[test]
fn test_assignment_to_call_is_rejected() {
    let errors = parse_main("    f() = 1~\n").unwrap_err();
    assert_eq!(error_names(&errors), vec!["UnexpectedTokenDetailed"]);
}

#[test]
fn test_class_declaration() {
    let program = parse_source(
        "cwass Idol(name-senpai) [[
    fans-chan = 0~
    fwunc greet-san() [[
        pwint(name)~
    ]]
]]
fwunc mainuwu-san() [[
    i-Idol = Idol(\"aqua\")~
]]
",
    )
    .unwrap();

    let class = &program.classes[0];
    assert_eq!(class.name.name, "Idol");
    assert_eq!(class.params.len(), 1);
    assert_eq!(class.properties.len(), 1);
    assert_eq!(class.methods.len(), 1);

    let Stmt::Declaration(declaration) = &program.mainuwu.body.body[0] else {
        panic!("expected a declaration");
    };
    assert!(declaration.data_type.is_class());
    assert_eq!(declaration.data_type.name, "Idol");
    assert!(matches!(
        declaration.value,
        Some(Expr::Ident(IdentProd::Constructor(_)))
    ));
}

#[test]
fn test_interpolated_string_segments() {
    let body = main_body("    pwint(\"hi |name|!\")~\n");

    let Stmt::Print(print) = &body[0] else {
        panic!("expected a print statement");
    };
    let Expr::StringFmt(fmt) = &print.args[0] else {
        panic!("expected an interpolated string");
    };
    assert_eq!(fmt.segments.len(), 3);
    assert_eq!(fmt.segments[0], FmtSegment::Text(String::from("hi ")));
    assert_eq!(fmt.segments[2], FmtSegment::Text(String::from("!")));
    assert_eq!(fmt.expressions().count(), 1);
}

#[test]
fn test_nested_array_literal() {
    let body = main_body("    m-chan[][] = {{1, 2}, {3}}~\n");

    let Stmt::Declaration(declaration) = &body[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(declaration.data_type.dimension, 2);
    let Some(Expr::Array(array)) = &declaration.value else {
        panic!("expected an array literal");
    };
    assert_eq!(array.elements.len(), 2);
    assert_eq!(array.depth(), 2);
}

#[test]
fn test_literal_values() {
    let body = main_body("    s-senpai = \"a\\\"b\"~\n    f-kun = 2.5~\n");

    let Expr::Literal(string) = declared_value(&body[0]) else {
        panic!("expected a literal");
    };
    assert_eq!(string.value, LiteralValue::Str(String::from("a\"b")));

    let Expr::Literal(float) = declared_value(&body[1]) else {
        panic!("expected a literal");
    };
    assert_eq!(float.value, LiteralValue::Float(2.5));
}

#[test]
fn test_errors_are_collected_per_statement() {
    let errors = parse_main("    x = ~\n    y = ~\n    z-chan = 1~\n").unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_unescape() {
    assert_eq!(unescape("a\\nb"), "a\nb");
    assert_eq!(unescape("\\|x\\|"), "|x|");
    assert_eq!(unescape("plain"), "plain");
}
