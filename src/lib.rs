//! `rlox` is a tree-walking interpreter for the Lox programming language
//! defined in Bob Nystrom's [Crafting Interpreters](https://craftinginterpreters.com/).
//! Lox is dynamically typed, lexically scoped, and has first-class functions,
//! closures, and single-inheritance classes.
//!
//! ## Scanning
//! The first step is scanning: turning a string of source characters into a
//! flat list of tokens. The scanner is implemented in [`scanner`] as a state
//! machine over a [`peekmore`] character iterator, reporting lexical
//! problems (unterminated strings, unexpected characters) through
//! [`error::Reporter`] as soon as they're found, without stopping the scan.
//!
//! ## Parsing
//! The second step is parsing: turning the token list into an abstract
//! syntax tree. [`parser`] implements a recursive-descent parser producing
//! the tagged [`expr::Expr`]/[`stmt::Stmt`] enums. Expressions
//! ([`expr::Expr`]) are pieces of code that produce an [`object::Object`];
//! statements ([`stmt::Stmt`]) perform some side effect and produce nothing.
//! Parse errors synchronize at the next statement boundary so one run can
//! surface more than one mistake.
//!
//! ## Resolving
//! The third step is resolving: a static pass over the AST that figures out,
//! for every variable reference, how many enclosing scopes separate it from
//! its declaration. [`resolver`] returns this as a table keyed by each
//! reference's [`expr::NodeId`] rather than mutating the interpreter
//! directly. This is what makes closures and shadowing behave consistently
//! — without it, a variable's binding could depend on when it's looked up
//! rather than where it's declared.
//!
//! ## Interpreting
//! The final step is interpreting: walking the AST and evaluating it.
//! [`interpreter::Interpreter`] holds the global scope and the resolver's
//! distance table, and executes statements directly rather than compiling
//! to bytecode. Runtime errors (calling a non-callable value, adding a
//! number to a string) are reported through the same [`error::Reporter`]
//! used by the earlier stages.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Reporter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Exit code a run finished with, matching the conventions `sysexits.h`
/// assigns to usage/data errors — used by [`main`](../bin/rlox/main.rs) to
/// set the process exit status.
pub const EX_OK: i32 = 0;
pub const EX_USAGE: i32 = 64;
pub const EX_DATAERR: i32 = 65;
pub const EX_SOFTWARE: i32 = 70;

/// Drives one interpreter session across however many `run` calls it takes
/// — one for a script file, or one per REPL line. Errors reported during a
/// REPL line don't poison later lines; [`run_prompt`](Lox::run_prompt)
/// resets the reporter between reads.
pub struct Lox {
    reporter: Reporter,
}

impl Lox {
    pub fn new() -> Self {
        Lox { reporter: Reporter::new() }
    }

    /// Reads and runs an entire file, writing `print` output to stdout.
    /// Returns the process exit code the run should finish with.
    pub fn run_file(&mut self, path: &str) -> i32 {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                eprintln!("Could not read file '{path}': {error}");
                return EX_DATAERR;
            }
        };

        let mut stdout = io::stdout();
        self.run(&source, &mut stdout);

        if self.reporter.had_error() {
            EX_DATAERR
        } else if self.reporter.had_runtime_error() {
            EX_SOFTWARE
        } else {
            EX_OK
        }
    }

    /// Runs an interactive read-eval-print loop, persisting line history
    /// across sessions the way a shell does.
    pub fn run_prompt(&mut self) -> i32 {
        let mut editor = match rustyline::DefaultEditor::new() {
            Ok(editor) => editor,
            Err(error) => {
                eprintln!("Could not start the prompt: {error}");
                return EX_SOFTWARE;
            }
        };

        let history_path = history_path();
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        let mut stdout = io::stdout();
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line, &mut stdout);
                    self.reporter.reset();
                }
                Err(rustyline::error::ReadlineError::Interrupted) | Err(rustyline::error::ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("Readline error: {error}");
                    break;
                }
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        EX_OK
    }

    fn run(&mut self, source: &str, out: &mut dyn Write) {
        run_with_reporter(source, out, &self.reporter);
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one piece of source through the full scan/parse/resolve/interpret
/// pipeline with a fresh reporter, writing `print` output to `out`. Exposed
/// for integration tests that want to drive the interpreter directly rather
/// than through [`Lox::run_file`], and for embedders that want a one-shot
/// `eval`.
pub fn run_source(source: &str, out: &mut dyn Write) -> Reporter {
    let reporter = Reporter::new();
    run_with_reporter(source, out, &reporter);
    reporter
}

fn run_with_reporter(source: &str, out: &mut dyn Write, reporter: &Reporter) {
    let tokens = Scanner::new(source, reporter).scan_tokens();
    if reporter.had_error() {
        return;
    }

    let statements = Parser::new(tokens, reporter).parse();
    if reporter.had_error() {
        return;
    }

    let locals = Resolver::new(reporter).resolve(&statements);
    if reporter.had_error() {
        return;
    }

    let mut interpreter = Interpreter::new(reporter, out);
    interpreter.set_locals(locals);
    interpreter.interpret(&statements);
}

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".rlox_history"))
}
