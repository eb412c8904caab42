//! Debug commands: `lex` and `parse` for inspecting the front end.

use std::path::Path;

use plet_diagnostic::{shared_path, Handler};
use plet_ir::SymbolTable;
use plet_lexer::lex;
use plet_parse::parse_source;

use super::{emitter, finish, read_file};
use crate::options::Options;

/// Lex a file and display the token stream.
pub fn lex_file(path: &str, options: &Options) -> bool {
    let content = read_file(path);
    let file = shared_path(path);
    let symbols = SymbolTable::new();
    let mode = options.mode_for(Path::new(path));

    let output = lex(&content, &file, &symbols, mode);

    println!("Tokens for '{}' ({} tokens):", path, output.tokens.len());
    for token in &output.tokens {
        println!("  {:?} @ {}", token.kind, token.span.start);
    }

    let handler = Handler::new(emitter(options));
    for error in output.errors {
        handler.emit(&error.into_diagnostic(&file));
    }
    finish(&handler, options)
}

/// Parse a file and display AST information.
pub fn parse_file(path: &str, options: &Options) -> bool {
    let content = read_file(path);
    let symbols = SymbolTable::new();
    let mode = options.mode_for(Path::new(path));

    let output = parse_source(&content, shared_path(path), &symbols, mode);
    let ast = &output.ast;

    println!("Parse result for '{path}':");
    println!("  Statements: {}", ast.root().len());
    println!("  Nodes: {}", ast.arena().len());
    println!(
        "  Errors: {}",
        output.lex_errors.len() + output.errors.len()
    );

    let handler = Handler::new(emitter(options));
    for diagnostic in output.diagnostics() {
        handler.emit(&diagnostic);
    }
    finish(&handler, options)
}
