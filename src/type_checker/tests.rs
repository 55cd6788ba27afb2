use crate::{
    ast::ast::Program,
    context::Context,
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::DataType},
    parser::parser::parse,
    source_lines, Position,
};

use super::{
    signatures::{is_similar_type, ParamType},
    type_checker::{type_check, TypeCheckResult},
};

fn parse_source(source: &str) -> Program {
    let mut context = Context::new();
    let (tokens, errors) = tokenize(&source_lines(source), &mut context);
    assert!(errors.is_empty(), "lexing failed: {:?}", errors);
    parse(tokens, &context).unwrap()
}

fn check_source(source: &str) -> TypeCheckResult {
    let program = parse_source(source);
    let analyzer_errors = crate::analyzer::analyze(&program);
    assert!(analyzer_errors.is_empty(), "analysis failed: {:?}", analyzer_errors);
    type_check(&program)
}

fn check_main(body: &str) -> Vec<Error> {
    check_source(&format!("fwunc mainuwu-san() [[\n{}]]\n", body)).errors
}

fn error_names(errors: &[Error]) -> Vec<&str> {
    errors.iter().map(|error| error.get_error_name()).collect()
}

#[test]
fn test_similarity_rules() {
    let chan = DataType::chan();
    let kun = DataType::kun();
    let sama = DataType::sama();
    let senpai = DataType::senpai();

    assert!(is_similar_type(&chan, &chan, true));
    assert!(is_similar_type(&kun, &chan, false));
    assert!(is_similar_type(&sama, &kun, false));
    assert!(is_similar_type(&senpai, &sama, false));
    assert!(is_similar_type(&DataType::input(), &chan, false));
    assert!(is_similar_type(&DataType::input(), &senpai, false));
    assert!(!is_similar_type(&senpai, &chan, false));
    assert!(!is_similar_type(&chan, &senpai, false));
    assert!(!is_similar_type(&chan.to_arr_type(1), &kun.to_arr_type(1), false));
}

#[test]
fn test_void_accepted_outside_calls_only() {
    let san = DataType::san();
    assert!(is_similar_type(&san, &DataType::chan(), false));
    assert!(is_similar_type(&san, &DataType::senpai().to_arr_type(2), false));
    assert!(!is_similar_type(&san, &DataType::chan(), true));
    assert!(is_similar_type(&san, &san, true));
}

#[test]
fn test_empty_array_fits_any_array() {
    let empty = DataType::empty_array(1);
    assert!(is_similar_type(&empty, &DataType::chan().to_arr_type(1), false));
    assert!(is_similar_type(&empty, &DataType::senpai().to_arr_type(2), true));
    assert!(!is_similar_type(&DataType::empty_array(2), &DataType::chan().to_arr_type(1), false));
    assert!(!is_similar_type(&empty, &DataType::chan(), false));
}

#[test]
fn test_element_param_resolves_against_receiver() {
    let receiver = DataType::chan().to_arr_type(1);
    assert_eq!(
        ParamType::Element.resolve(Some(&receiver)),
        vec![DataType::chan(), receiver.clone()]
    );
    assert_eq!(ParamType::Element.describe(Some(&receiver)), "chan or chan[]");
}

#[test]
fn test_string_into_chan_is_mismatch() {
    let errors = check_main("    x-chan = \"5\"~\n");
    assert_eq!(
        errors.iter().map(|e| e.get_error().clone()).collect::<Vec<_>>(),
        vec![ErrorImpl::TypeMismatchError {
            expected: String::from("chan"),
            received: String::from("senpai"),
        }]
    );
    assert_eq!(errors[0].get_span().start, Position::new(1, 13));
}

#[test]
fn test_float_into_chan_widens() {
    assert!(check_main("    x-chan = 5.0~\n    y-kun = fax~\n").is_empty());
}

#[test]
fn test_reassigned_constant_references_both_sites() {
    let errors = check_main("    x-chan-dono = 5~\n    x = 6~\n");
    assert_eq!(error_names(&errors), vec!["ReassignedConstantError"]);
    assert_eq!(errors[0].get_span().start, Position::new(2, 4));
    match errors[0].get_error() {
        ErrorImpl::ReassignedConstantError {
            variable,
            declaration,
        } => {
            assert_eq!(variable, "x");
            assert_eq!(declaration.start, Position::new(1, 4));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_constant_postfix_and_for_init() {
    let errors = check_main(
        "    n-chan-dono = 1~
    n++~
    fow (i-chan-dono = 0~ i < 3~ i += 1) [[
    ]]
",
    );
    assert_eq!(
        error_names(&errors),
        vec!["ReassignedConstantError", "ConstantLoopVariableError"]
    );
    assert_eq!(errors[1].get_span().start, Position::new(3, 9));
    assert_eq!(errors[1].get_note(), None);
}

#[test]
fn test_empty_array_into_any_array() {
    let errors = check_main(
        "    a-chan[] = {}~
    b-senpai[][] = {}~
    c-kun[][] = {{}, {1.5}}~
",
    );
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_heterogeneous_array() {
    let errors = check_main("    a-chan[] = {1, \"a\"}~\n");
    assert_eq!(error_names(&errors), vec!["HeterogeneousArrayError"]);

    let errors = check_main("    a-senpai[] = {1, \"a\"}~\n");
    assert_eq!(error_names(&errors), vec!["HeterogeneousArrayError"]);
}

#[test]
fn test_nested_array_dimension() {
    let errors = check_main("    a-chan[] = {{1}, {2}}~\n");
    assert_eq!(
        errors.iter().map(|e| e.get_error().clone()).collect::<Vec<_>>(),
        vec![ErrorImpl::TypeMismatchError {
            expected: String::from("chan[]"),
            received: String::from("chan[][]"),
        }]
    );
}

#[test]
fn test_missing_return() {
    let result = check_source(
        "fwunc f-chan() [[
    pwint(1)~
]]
fwunc mainuwu-san() [[
]]
",
    );
    assert_eq!(error_names(&result.errors), vec!["MissingReturnError"]);
}

#[test]
fn test_return_inside_branch_counts() {
    let result = check_source(
        "fwunc f-chan(a-chan) [[
    iwf (a > 0) [[
        wetuwn a~
    ]]
]]
fwunc mainuwu-san() [[
]]
",
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn test_return_type_mismatch() {
    let result = check_source(
        "fwunc f-chan() [[
    wetuwn \"no\"~
]]
fwunc g-senpai() [[
    wetuwn~
]]
fwunc mainuwu-san() [[
]]
",
    );
    assert_eq!(
        error_names(&result.errors),
        vec!["ReturnTypeMismatchError", "ReturnTypeMismatchError"]
    );
}

#[test]
fn test_call_arguments_aggregate_mismatches() {
    let result = check_source(
        "fwunc f-san(a-chan, b-senpai) [[
]]
fwunc mainuwu-san() [[
    f(\"x\", 1)~
    f(1)~
    f(1, \"ok\")~
]]
",
    );

    let errors = result
        .errors
        .iter()
        .map(|e| e.get_error().clone())
        .collect::<Vec<_>>();
    assert_eq!(errors.len(), 2);

    match &errors[0] {
        ErrorImpl::ArgumentMismatchError {
            callee,
            expected,
            received,
            mismatches,
        } => {
            assert_eq!(callee, "f");
            assert_eq!((*expected, *received), (2, 2));
            assert_eq!(mismatches.len(), 2);
        }
        other => panic!("unexpected error {:?}", other),
    }
    match &errors[1] {
        ErrorImpl::ArgumentMismatchError {
            expected, received, ..
        } => assert_eq!((*expected, *received), (2, 1)),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_void_argument_rejected() {
    let result = check_source(
        "fwunc f-san(a-chan) [[
]]
fwunc mainuwu-san() [[
    f(nuww)~
]]
",
    );
    assert_eq!(error_names(&result.errors), vec!["ArgumentMismatchError"]);
}

#[test]
fn test_operators() {
    let errors = check_main(
        "    a-kun = 1 + 2.5~
    b-chan = 1 * fax~
    c-sama = 1 < 2 and \"a\" == \"b\"~
    d-senpai = \"n: \" & 3~
    e-chan = \"a\" - 1~
    f-sama = \"a\" < 1~
",
    );
    assert_eq!(
        error_names(&errors),
        vec!["InvalidOperandError", "InvalidOperandError"]
    );
}

#[test]
fn test_arithmetic_result_type() {
    let errors = check_main("    x-senpai = 1 + 2.5~\n");
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::TypeMismatchError {
            expected: String::from("senpai"),
            received: String::from("kun"),
        }
    );
}

#[test]
fn test_failed_declaration_does_not_cascade() {
    let errors = check_main(
        "    x-chan = \"a\" * 2~
    y-chan = x + 1~
    pwint(x)~
",
    );
    assert_eq!(error_names(&errors), vec!["InvalidOperandError"]);
}

#[test]
fn test_assignment_initializes() {
    let errors = check_main(
        "    x-chan~
    s-senpai = x~
    x = 1~
    t-senpai = x~
",
    );
    assert_eq!(error_names(&errors), vec!["TypeMismatchError"]);
    assert_eq!(errors[0].get_span().start.line, 4);
}

#[test]
fn test_assignment_in_branch_initializes_after_block() {
    let errors = check_main(
        "    x-chan~
    iwf (fax) [[
        x = 1~
    ]]
    s-senpai = x~
",
    );
    assert_eq!(error_names(&errors), vec!["TypeMismatchError"]);
    assert_eq!(errors[0].get_span().start.line, 5);
}

#[test]
fn test_failed_assignment_clears_initialization() {
    let errors = check_main(
        "    x-chan = 1~
    x = \"a\"~
    s-senpai = x~
",
    );
    assert_eq!(error_names(&errors), vec!["TypeMismatchError"]);
    assert_eq!(errors[0].get_span().start.line, 2);
}

#[test]
fn test_indexed_write_uses_declared_type() {
    let errors = check_main(
        "    a-chan[]~
    a[0] = 1~
    a[1] = \"b\"~
",
    );
    assert_eq!(
        errors.iter().map(|e| e.get_error().clone()).collect::<Vec<_>>(),
        vec![ErrorImpl::TypeMismatchError {
            expected: String::from("chan"),
            received: String::from("senpai"),
        }]
    );
}

#[test]
fn test_input_accepted_for_scalars() {
    let errors = check_main(
        "    a-chan = inpwt(\"age? \")~
    b-senpai = inpwt(\"name? \")~
    c-kun = inpwt(\"x |a| \")~
",
    );
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_indexing() {
    let errors = check_main(
        "    a-chan[][] = {{1, 2}}~
    b-chan = a[0][1]~
    c-chan[] = a[0]~
    s-senpai = \"abc\"~
    d-senpai = s[1]~
    e-chan = b[0]~
    f-chan = a[\"x\"][0]~
",
    );
    assert_eq!(
        error_names(&errors),
        vec!["NonIterableIndexError", "TypeMismatchError"]
    );
}

#[test]
fn test_builtins() {
    let errors = check_main(
        "    s-senpai = \"Aqua\"~
    n-chan = s.len()~
    u-senpai = s.upper()~
    h-sama = s.has(\"q\")~
    a-chan[] = {1, 2}~
    a.append(3)~
    a.reverse()~
    k-sama = a.has(2)~
    s.append(\"x\")~
    m-chan = s.len~
",
    );
    assert_eq!(
        error_names(&errors),
        vec!["UndefinedMemberError", "MemberRoleMismatchError"]
    );
}

#[test]
fn test_builtin_element_argument() {
    let errors = check_main(
        "    a-chan[] = {1, 2}~
    a.append(\"x\")~
",
    );
    assert_eq!(error_names(&errors), vec!["ArgumentMismatchError"]);
}

#[test]
fn test_non_class_access() {
    let errors = check_main("    n-chan = 1~\n    pwint(n.len())~\n");
    assert_eq!(error_names(&errors), vec!["NonClassAccessError"]);
}

const IDOL: &str = "cwass Idol(name-senpai) [[
    fans-chan = 0~
    debut-chan-dono = 2020~
    fwunc greet-senpai(times-chan) [[
        wetuwn \"hi \" & name~
    ]]
    fwunc grow-san() [[
        fans += 1~
        pwint(greet(2))~
    ]]
]]
";

fn check_with_idol(body: &str) -> Vec<Error> {
    check_source(&format!("{}fwunc mainuwu-san() [[\n{}]]\n", IDOL, body)).errors
}

#[test]
fn test_class_members() {
    let errors = check_with_idol(
        "    i-Idol = Idol(\"aqua\")~
    f-chan = i.fans~
    g-senpai = i.greet(1)~
    i.fans = 10~
",
    );
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_class_member_errors() {
    let errors = check_with_idol(
        "    i-Idol = Idol(\"aqua\")~
    pwint(i.age)~
    pwint(i.greet)~
    pwint(i.fans())~
    i.debut = 2021~
    j-Idol = Idol(1, 2)~
",
    );
    assert_eq!(
        error_names(&errors),
        vec![
            "UndefinedMemberError",
            "MemberRoleMismatchError",
            "MemberRoleMismatchError",
            "ReassignedConstantError",
            "ArgumentMismatchError"
        ]
    );
}

#[test]
fn test_member_write_on_uninitialized_object() {
    let errors = check_with_idol("    i-Idol~\n    i.fans = 5~\n    i.fans += 1~\n");
    assert!(errors.is_empty(), "{:?}", errors);

    let errors = check_with_idol("    i-Idol~\n    i.fans = \"many\"~\n");
    assert_eq!(
        errors.iter().map(|e| e.get_error().clone()).collect::<Vec<_>>(),
        vec![ErrorImpl::TypeMismatchError {
            expected: String::from("chan"),
            received: String::from("senpai"),
        }]
    );
}

#[test]
fn test_member_write_after_failed_declaration() {
    let errors = check_with_idol("    i-Idol = 5~\n    i.fans = 5~\n");
    assert_eq!(error_names(&errors), vec!["TypeMismatchError"]);
    assert_eq!(errors[0].get_span().start.line, 12);
}

#[test]
fn test_constructor_type() {
    let errors = check_with_idol("    i-chan = Idol(\"aqua\")~\n");
    assert_eq!(
        errors[0].get_error(),
        &ErrorImpl::TypeMismatchError {
            expected: String::from("chan"),
            received: String::from("Idol"),
        }
    );
}

#[test]
fn test_annotations_record_value_types() {
    let result = check_source(
        "fwunc mainuwu-san() [[
    x-kun = 1 + 2.5~
    x = 3~
]]
",
    );
    assert!(result.errors.is_empty());

    let mut recorded = result
        .annotations
        .iter()
        .map(|(span, data_type)| (span.start, data_type.to_string()))
        .collect::<Vec<_>>();
    recorded.sort();
    assert_eq!(
        recorded,
        vec![
            (Position::new(1, 12), String::from("kun")),
            (Position::new(2, 8), String::from("chan")),
        ]
    );
}
