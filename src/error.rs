use std::cell::Cell;

use crate::token::{Location, Token, Kind};

/// Tracks whether a compile-time or runtime error occurred during a run, and
/// prints error messages in the `[line:column] ...` formats SPEC_FULL.md §6
/// defines. Threaded by reference through every pipeline stage in place of
/// the `static mut HAD_ERROR`/`HAD_RUNTIME_ERROR` flags, so an interpreter
/// is instantiable and testable in isolation.
#[derive(Debug, Default)]
pub struct Reporter {
    had_error: Cell<bool>,
    had_runtime_error: Cell<bool>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error.get()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    /// Clears both flags. Called between REPL lines.
    pub fn reset(&self) {
        self.had_error.set(false);
        self.had_runtime_error.set(false);
    }

    pub fn report_scan(&self, error: &ScanError) {
        eprintln!("[line {}] Error: {}", error.location, error.message);
        self.had_error.set(true);
    }

    pub fn report_parse(&self, error: &ParseError) {
        if error.token.kind == Kind::EOF {
            eprintln!("[line {}] Error at end: {}", error.token.location, error.message);
        } else {
            eprintln!("[line {}] Error at '{}': {}", error.token.location, error.token.lexeme, error.message);
        }
        self.had_error.set(true);
    }

    pub fn report_resolve(&self, error: &ResolveError) {
        eprintln!("[line {}] Error at '{}': {}", error.token.location, error.token.lexeme, error.message);
        self.had_error.set(true);
    }

    pub fn report_runtime(&self, error: &RuntimeError) {
        eprintln!("[line {}] Runtime error: {}", error.token.location, error.message);
        self.had_runtime_error.set(true);
    }
}

/// An error raised while scanning source text into tokens.
#[derive(Debug)]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

impl ScanError {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        ScanError { location, message: message.into() }
    }
}

/// An error raised while parsing tokens into an AST.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        ParseError { token, message: message.into() }
    }
}

/// An error raised while resolving variable bindings statically.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl ResolveError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        ResolveError { token, message: message.into() }
    }
}

/// An error raised by the tree-walk evaluator. Carries the offending token
/// so the reporter can point at its source location.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        RuntimeError { token, message: message.into() }
    }
}
