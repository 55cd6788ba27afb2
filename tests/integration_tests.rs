//! Integration tests for the full front end.
//!
//! These run whole programs through lexing, parsing, name resolution and
//! type checking via `uwucc::compile`.

use uwucc::{
    analyzer::member_analyzer::MemberAnalyzer,
    compile,
    context::Context,
    display_error,
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse,
    source_lines, Position,
};

const IDOL_PROGRAM: &str = "\
>.< fan club bookkeeping
gwobaw club-senpai-dono = \"hololive\"~
gwobaw members-chan = 0~

cwass Idol(name-senpai, gen-chan) [[
    fans-chan = 0~
    songs-senpai[] = {}~

    fwunc greet-senpai() [[
        wetuwn \"Hi, I'm |name| from gen |gen|!\"~
    ]]

    fwunc add_song-san(title-senpai) [[
        iwf (!songs.has(title)) [[
            songs.append(title)~
        ]]
    ]]

    fwunc popular-sama() [[
        wetuwn fans >= 1000 or songs.len() > 10~
    ]]
]]

fwunc total-chan(counts-chan[]) [[
    sum-chan = 0~
    fow (i-chan = 0~ i < counts.len()~ i++) [[
        sum += counts[i]~
    ]]
    wetuwn sum~
]]

fwunc mainuwu-san() [[
    aqua-Idol = Idol(\"Aqua\", 2)~
    aqua.add_song(\"Kira Kira\")~
    aqua.fans = total({300, 450, 500})~
    members++~

    iwf (aqua.popular()) [[
        pwint(aqua.greet(), club)~
    ]] ewse iwf (aqua.fans > 0) [[
        pwint(\"almost there\")~
    ]] ewse [[
        pwint(\"keep going\")~
    ]]

    guess-chan = inpwt(\"guess? \")~
    do whiwe (guess != 7) [[
        guess = inpwt(\"again? \")~
        iwf (guess == 0) [[
            bweak~
        ]]
    ]]
]]
";

fn compile_source(source: &str) -> Result<(), Vec<Error>> {
    let mut context = Context::new();
    compile(source, &mut context).map(|_| ())
}

fn error_names(errors: &[Error]) -> Vec<&str> {
    errors.iter().map(|error| error.get_error_name()).collect()
}

fn main_program(body: &str) -> String {
    format!("fwunc mainuwu-san() [[\n{}]]\n", body)
}

#[test]
fn test_compile_full_program() {
    let mut context = Context::new();
    let program = compile(IDOL_PROGRAM, &mut context).unwrap_or_else(|errors| {
        panic!("unexpected errors: {:?}", errors);
    });

    assert_eq!(program.globals.len(), 2);
    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.classes.len(), 1);
    assert_eq!(program.classes[0].methods.len(), 3);
    assert!(context.is_class("Idol"));
}

#[test]
fn test_context_reset_between_documents() {
    let mut context = Context::new();
    compile(IDOL_PROGRAM, &mut context).unwrap();
    assert!(context.is_class("Idol"));

    context.reset();
    let source = main_program("    Idol-chan = 1~\n    pwint(Idol)~\n");
    assert!(compile(&source, &mut context).is_ok());
    assert!(!context.is_class("Idol"));
}

#[test]
fn test_global_keyword_tokens() {
    let mut context = Context::new();
    let (tokens, errors) = tokenize(&source_lines("gwobaw aqua-senpai~"), &mut context);
    assert!(errors.is_empty());

    let significant = tokens
        .iter()
        .filter(|token| !token.kind.is_trivia() && token.kind != TokenKind::EOF)
        .collect::<Vec<_>>();
    let kinds = significant.iter().map(|token| token.kind).collect::<Vec<_>>();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Gwobaw,
            TokenKind::Identifier(context.identifiers().get("aqua").unwrap()),
            TokenKind::Dash,
            TokenKind::Senpai,
            TokenKind::Terminator,
        ]
    );
    assert_eq!(tokens[0].span.start, Position::new(0, 0));
    assert_eq!(significant.last().unwrap().span.end, Position::new(0, 18));
}

#[test]
fn test_relexing_lexemes_is_stable() {
    let mut context = Context::new();
    let (tokens, errors) = tokenize(&source_lines(IDOL_PROGRAM), &mut context);
    assert!(errors.is_empty(), "{:?}", errors);

    let rebuilt = tokens
        .iter()
        .map(|token| token.lexeme.as_str())
        .collect::<String>();
    assert_eq!(rebuilt, IDOL_PROGRAM);

    let mut fresh = Context::new();
    let (relexed, errors) = tokenize(&source_lines(&rebuilt), &mut fresh);
    assert!(errors.is_empty());
    assert_eq!(
        tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        relexed.iter().map(|token| token.kind).collect::<Vec<_>>()
    );
}

#[test]
fn test_global_table_counts() {
    let source = "gwobaw a-chan = 1~
gwobaw b-kun = 2.0~
fwunc c-san() [[
]]
cwass D() [[
]]
fwunc mainuwu-san() [[
]]
";
    let mut context = Context::new();
    let (tokens, _) = tokenize(&source_lines(source), &mut context);
    let program = parse(tokens, &context).unwrap();
    let analysis = MemberAnalyzer::new(&program).analyze();
    assert_eq!(analysis.globals.len(), 4);
    assert!(analysis.errors.is_empty());

    let repeated = source.replace("gwobaw b-kun", "gwobaw a-kun");
    let errors = compile_source(&repeated).unwrap_err();
    assert_eq!(error_names(&errors), vec!["DuplicateDefinitionError"]);
    match errors[0].get_error() {
        ErrorImpl::DuplicateDefinitionError { original, .. } => {
            assert_eq!(original.start, Position::new(0, 7));
            assert_eq!(errors[0].get_span().start, Position::new(1, 7));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_stops_at_lexical_errors() {
    let errors = compile_source(&main_program("    x-chan = 5a~\n    y-chan = \"5\"~\n")).unwrap_err();
    assert_eq!(error_names(&errors), vec!["DelimiterError"]);
}

#[test]
fn test_stops_at_syntax_errors() {
    let errors = compile_source(&main_program("    pwint(x~\n")).unwrap_err();
    assert_eq!(error_names(&errors), vec!["ExpectedToken"]);
}

#[test]
fn test_stops_at_name_errors() {
    let errors = compile_source(&main_program("    x-chan = \"5\"~\n    pwint(y)~\n")).unwrap_err();
    assert_eq!(error_names(&errors), vec!["UndefinedError"]);
}

#[test]
fn test_missing_entry_function() {
    let errors = compile_source("gwobaw a-chan = 1~\n").unwrap_err();
    assert_eq!(error_names(&errors), vec!["MissingEntryFunction"]);
}

#[test]
fn test_constant_reassignment() {
    let errors = compile_source(&main_program("    x-chan-dono = 5~\n    x = 6~\n")).unwrap_err();
    assert_eq!(error_names(&errors), vec!["ReassignedConstantError"]);
    assert_eq!(
        errors[0].get_note().unwrap(),
        "`x` was declared at 2:5"
    );
}

#[test]
fn test_numeric_widening_and_string_mismatch() {
    assert!(compile_source(&main_program("    x-chan = 5.0~\n")).is_ok());

    let errors = compile_source(&main_program("    x-chan = \"5\"~\n")).unwrap_err();
    assert_eq!(error_names(&errors), vec!["TypeMismatchError"]);
}

#[test]
fn test_array_literals() {
    for declared in ["chan[]", "senpai[]", "Idol[]", "kun[][]"] {
        let source = format!(
            "cwass Idol() [[\n]]\n{}",
            main_program(&format!("    a-{} = {{}}~\n", declared))
        );
        assert!(compile_source(&source).is_ok(), "{} should accept {{}}", declared);

        let source = main_program(&format!("    a-{} = {{1, \"a\"}}~\n", declared.replace("Idol", "chan")));
        let errors = compile_source(&source).unwrap_err();
        assert_eq!(error_names(&errors), vec!["HeterogeneousArrayError"]);
    }
}

#[test]
fn test_missing_return() {
    let source = "fwunc f-chan(a-chan) [[
    pwint(a)~
]]
fwunc g-chan(a-chan) [[
    wetuwn a * 2~
]]
fwunc mainuwu-san() [[
]]
";
    let errors = compile_source(source).unwrap_err();
    assert_eq!(error_names(&errors), vec!["MissingReturnError"]);
    assert_eq!(errors[0].get_span().start, Position::new(0, 6));
}

#[test]
fn test_rendered_diagnostic() {
    let source = main_program("    total-chan = \"many\"~\n");
    let errors = compile_source(&source).unwrap_err();
    let rendered = display_error(&errors[0], "fans.uwu", &source_lines(&source));

    assert_eq!(
        rendered,
        "Error: TypeMismatchError (Expected type `chan`, received `senpai`)
-> fans.uwu:2:18
  |
2 | total-chan = \"many\"~
  | -------------^
"
    );
}

#[test]
fn test_class_name_after_line_break() {
    let source = format!(
        "cwass\n    Later() [[\n]]\n{}",
        main_program("    l-Later = Later()~\n")
    );
    assert!(compile_source(&source).is_ok());
}
