use std::{fs::read_to_string, path::PathBuf, process::exit, time::Instant};

use clap::{Parser, ValueEnum};

use uwucc::{
    analyzer::analyze,
    context::Context,
    display_error, dump_tokens,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    source_lines,
    type_checker::type_checker::type_check,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Stage {
    Lex,
    Parse,
    Analyze,
    Check,
}

/// Front end for the uwu language: lexes, parses, resolves names and type
/// checks a source file.
#[derive(Parser, Debug)]
#[command(name = "uwucc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source file to compile
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Last stage to run
    #[arg(long, value_enum, default_value_t = Stage::Check)]
    stage: Stage,

    /// Print a summary of the program after each stage
    #[arg(short, long)]
    verbose: bool,
}

fn report(errors: &[Error], file_name: &str, lines: &[String]) -> ! {
    for error in errors.iter() {
        eprintln!("{}", display_error(error, file_name, lines));
    }
    eprintln!("{} error(s) found", errors.len());
    exit(1)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| args.input.display().to_string());

    let source = match read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading '{}': {}", args.input.display(), error);
            exit(1);
        }
    };

    let lines = source_lines(&source);
    let mut context = Context::new();

    let start = Instant::now();
    let (tokens, errors) = tokenize(&lines, &mut context);

    if args.tokens {
        println!("{}", dump_tokens(&tokens));
    }
    if !errors.is_empty() {
        report(&errors, &file_name, &lines);
    }

    println!("Tokenized in {:?}", start.elapsed());
    if args.verbose {
        println!(
            "{} tokens, {} identifiers, {} classes",
            tokens.len(),
            context.identifiers().len(),
            context.classes().len()
        );
    }
    if args.stage == Stage::Lex {
        return;
    }

    let parse_start = Instant::now();
    let program = match parse(tokens, &context) {
        Ok(program) => program,
        Err(errors) => report(&errors, &file_name, &lines),
    };

    println!("Parsed in {:?}", parse_start.elapsed());
    if args.verbose {
        println!(
            "{} globals, {} functions, {} classes",
            program.globals.len(),
            program.functions.len(),
            program.classes.len()
        );
    }
    if args.stage == Stage::Parse {
        return;
    }

    let analyze_start = Instant::now();
    let errors = analyze(&program);
    if !errors.is_empty() {
        report(&errors, &file_name, &lines);
    }

    println!("Analyzed in {:?}", analyze_start.elapsed());
    if args.stage == Stage::Analyze {
        return;
    }

    let check_start = Instant::now();
    let checked = type_check(&program);
    if !checked.errors.is_empty() {
        report(&checked.errors, &file_name, &lines);
    }

    println!("Type checked in {:?}", check_start.elapsed());
    if args.verbose {
        println!("{} values annotated", checked.annotations.len());
    }
    println!("Total time: {:?}", start.elapsed());
}
