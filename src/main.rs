use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use pyfront::{
    build_program, display_error, lexer::lexer::tokenize, parser::parser::parse,
    type_checker::{environment::GlobalTypeEnv, type_checker::TypeChecker},
};
use tracing_subscriber::EnvFilter;

/// Parses and type checks a Python source file.
#[derive(Parser, Debug)]
#[command(name = "pyfront", version, about)]
struct Cli {
    /// Source file to check
    file: PathBuf,

    /// Print the typed program
    #[arg(long)]
    dump: bool,
}

fn main() -> ExitCode {
    // Logging is opt-in through PYFRONT_LOG, e.g. `PYFRONT_LOG=pyfront=debug`
    if let Ok(filter) = EnvFilter::try_from_env("PYFRONT_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", cli.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &cli.file);
            return ExitCode::FAILURE;
        }
    };

    println!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let tree = match parse(tokens, &source) {
        Ok(tree) => tree,
        Err(error) => {
            display_error(&error, &cli.file);
            return ExitCode::FAILURE;
        }
    };

    println!("Parsed in {:?}", parse_start.elapsed());

    let build_start = Instant::now();
    let program = match build_program(&tree, &source) {
        Ok(program) => program,
        Err(error) => {
            display_error(&error, &cli.file);
            return ExitCode::FAILURE;
        }
    };

    println!("Built AST in {:?}", build_start.elapsed());

    let type_check_start = Instant::now();
    let mut type_checker = TypeChecker::new(GlobalTypeEnv::builtins());
    let typed = match type_checker.check(program) {
        Ok(typed) => typed,
        Err(error) => {
            display_error(&error, &cli.file);
            return ExitCode::FAILURE;
        }
    };

    println!("Type checked in {:?}", type_check_start.elapsed());
    println!("Total time: {:?}", start.elapsed());
    println!("Program type: {}", typed.ty());

    if cli.dump {
        println!("{:#?}", typed);
    }

    ExitCode::SUCCESS
}
