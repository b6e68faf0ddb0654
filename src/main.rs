//! CLI tool to tokenize and check TyC source files.

use std::fs;
use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt};

/// Log to stderr; `RUST_LOG` overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: tyc <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  tokens  Print the token trace of each file");
        eprintln!("  check   Check that each file is a well-formed program");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  tyc tokens main.tyc");
        eprintln!("  RUST_LOG=debug tyc check main.tyc lib.tyc");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if !matches!(command, "tokens" | "check") {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        let outcome = if command == "tokens" {
            tyc_syntax::tokenize(&content).map(|tokens| {
                println!("{}", tyc_syntax::render_tokens(&tokens));
            })
        } else {
            tyc_syntax::parse(&content).map(|program| {
                let structs = program.structs().count();
                let functions = program.functions().count();
                eprintln!("{path}: valid ({structs} struct(s), {functions} function(s))");
            })
        };

        if let Err(e) = outcome {
            eprintln!("{path}: {e}");
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
