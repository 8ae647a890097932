//! Tally command-line front end.
//!
//! `tally "expr"` simplifies one expression and prints the rewrite path;
//! plain `tally` opens an interactive session. Parse and search failures
//! are reported per line and never end the session.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Editor, Helper, Highlighter, Hinter};

use tally_cli::simplify;
use tally_core::{render, CostModel, Outcome, RefArena, SearchOptions};

const PROMPT: &str = "tally> ";

fn print_help() {
    println!("usage: tally [OPTIONS] [EXPRESSION]");
    println!();
    println!("Simplifies an elementary algebraic expression over integers and");
    println!("named variables, printing the cheapest rewrite path found.");
    println!();
    println!("options:");
    println!("  -h, --help           show this help");
    println!("  -V, --version        show the version");
    println!("  --costs FILE         load cost constants from a TOML table");
    println!();
    println!("With no expression, an interactive session starts. Session");
    println!("commands: help, quit.");
}

// ---------------------------------------------------------------------------
// One expression, parse to printed path
// ---------------------------------------------------------------------------

/// Simplify one expression and print the outcome. Returns the exit code.
fn run_expression(text: &str, costs: &CostModel) -> i32 {
    let mut arena = RefArena::new();
    match simplify(&mut arena, costs, text, &SearchOptions::default()) {
        Ok(Outcome::Solved(path)) => {
            print!("{}", render::format_path(&arena, &path));
            if let Some(last) = path.last() {
                println!("=> {}", render::expand_refs(&arena, &last.refs));
            }
            0
        }
        Ok(Outcome::NoSolution) => {
            eprintln!("no solution found for '{}'", text);
            1
        }
        Ok(Outcome::Cancelled) => {
            eprintln!("search cancelled");
            1
        }
        Err(e) => {
            eprintln!("{}", e.annotate(text));
            2
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive session
// ---------------------------------------------------------------------------

/// Keeps the line editor reading while more `(` than `)` have been typed,
/// so a bracketed sub-expression can continue on the next line.
#[derive(Completer, Helper, Highlighter, Hinter)]
struct OpenParens;

impl Validator for OpenParens {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let line = ctx.input();
        let open = line.matches('(').count();
        let close = line.matches(')').count();
        Ok(if open > close {
            ValidationResult::Incomplete
        } else {
            ValidationResult::Valid(None)
        })
    }
}

/// History lives in the home directory, or the working directory when no
/// home is set.
fn history_path() -> std::path::PathBuf {
    std::env::var_os("HOME")
        .map(std::path::PathBuf::from)
        .unwrap_or_default()
        .join(".tally_history")
}

fn repl(costs: &CostModel) {
    println!(
        "tally {} -- cost-directed algebra simplifier",
        env!("CARGO_PKG_VERSION")
    );
    println!("enter an expression, or 'help' / 'quit'");
    println!();

    let mut editor: Editor<OpenParens, DefaultHistory> = match Editor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("cannot start the interactive session: {}", e);
            return;
        }
    };
    editor.set_helper(Some(OpenParens));
    let history = history_path();
    let _ = editor.load_history(&history);

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            // Ctrl-C clears the line; Ctrl-D ends the session
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("input error: {}", e);
                break;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);
        match input {
            "quit" | "exit" => break,
            "help" => print_help(),
            _ => {
                run_expression(input, costs);
            }
        }
    }

    let _ = editor.save_history(&history);
}

// ---------------------------------------------------------------------------
// Argument handling
// ---------------------------------------------------------------------------

fn main() {
    let mut args = std::env::args().skip(1).peekable();
    let mut costs = CostModel::default();
    let mut expression_parts: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("tally {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--costs" => {
                let Some(path) = args.next() else {
                    eprintln!("--costs needs a file path");
                    std::process::exit(2);
                };
                let text = match std::fs::read_to_string(&path) {
                    Ok(text) => text,
                    Err(e) => {
                        eprintln!("cannot read '{}': {}", path, e);
                        std::process::exit(2);
                    }
                };
                costs = match CostModel::from_toml_str(&text) {
                    Ok(costs) => costs,
                    Err(e) => {
                        eprintln!("bad cost table '{}': {}", path, e);
                        std::process::exit(2);
                    }
                };
            }
            _ => expression_parts.push(arg),
        }
    }

    if expression_parts.is_empty() {
        repl(&costs);
    } else {
        let text = expression_parts.join(" ");
        std::process::exit(run_expression(&text, &costs));
    }
}
