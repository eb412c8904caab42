//! Plet CLI
//!
//! Inspect and evaluate Plet scripts and templates.

mod commands;
mod options;

use commands::{lex_file, parse_file, render_file, run_file};
use options::Options;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let options = match Options::parse(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    };

    tracing::debug!(command = %command, ?options, "starting");

    let needs_file = matches!(command.as_str(), "lex" | "parse" | "run" | "render");
    if needs_file && options.file.is_none() {
        eprintln!("Usage: plet {command} <file> [options]");
        std::process::exit(1);
    }

    let ok = match (command.as_str(), options.file.as_deref()) {
        ("lex", Some(path)) => lex_file(path, &options),
        ("parse", Some(path)) => parse_file(path, &options),
        ("run", Some(path)) => run_file(path, &options),
        ("render", Some(path)) => render_file(path, &options),
        ("help" | "--help" | "-h", _) => {
            print_usage();
            true
        }
        ("version" | "--version" | "-v", _) => {
            println!("Plet {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
}

/// Install a tree-shaped subscriber when `PLET_LOG` or `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{registry, EnvFilter};
    use tracing_tree::HierarchicalLayer;

    let filter = match std::env::var("PLET_LOG") {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };
    registry()
        .with(filter)
        .with(
            HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_targets(true)
                .with_bracketed_fields(true),
        )
        .init();
}

fn print_usage() {
    println!("Plet template engine");
    println!();
    println!("Usage: plet <command> <file> [options]");
    println!();
    println!("Commands:");
    println!("  lex <file>          Tokenize and display tokens");
    println!("  parse <file>        Parse and display AST info");
    println!("  run <file>          Evaluate a script and print its value");
    println!("  render <file>       Render a template, applying its layouts");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Options:");
    println!("  --no-color          Disable colored diagnostics");
    println!("  --max-loops=<n>     Loop iteration limit (0 = unlimited)");
    println!("  --template          Read `lex` and `parse` input as a template");
    println!();
    println!("Files ending in .tss are scripts, anything else is a template.");
    println!("Set PLET_LOG (or RUST_LOG) to trace evaluation, e.g. PLET_LOG=plet_eval=debug");
}
