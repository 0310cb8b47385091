//! Driver tying the stages together: scan → parse → resolve → execute.
//!
//! A [`Lox`] session owns one interpreter, so globals and resolved locals
//! survive from one [`Lox::run`] to the next (the interactive prompt relies
//! on this).  Static diagnostics are fresh for every run; a runtime error is
//! remembered for the rest of the session.

use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::error::{Diagnostics, LoxError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// Exit status for a clean run.
pub const EXIT_OK: i32 = 0;
/// Exit status when any scan, parse or resolve error was reported.
pub const EXIT_STATIC_ERROR: i32 = 65;
/// Exit status after an uncaught runtime error.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// What happened to one piece of source text.
#[derive(Debug)]
pub enum Outcome {
    /// Ran to completion.
    Success,

    /// Static errors, in the order they were found.  Nothing was executed.
    StaticErrors(Vec<LoxError>),

    /// Execution started and was aborted by this error.
    RuntimeError(LoxError),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => EXIT_OK,
            Outcome::StaticErrors(_) => EXIT_STATIC_ERROR,
            Outcome::RuntimeError(_) => EXIT_RUNTIME_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

pub struct Lox {
    interpreter: Interpreter,
    had_runtime_error: bool,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }

    /// Session whose program output goes to `out` instead of stdout.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self::with_interpreter(Interpreter::with_output(out))
    }

    fn with_interpreter(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            had_runtime_error: false,
        }
    }

    /// Has any run in this session ended in a runtime error?
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Run one complete piece of source text.
    pub fn run(&mut self, source: &str) -> Outcome {
        info!("Running {} bytes of source", source.len());

        let mut diagnostics = Diagnostics::new();

        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(&tokens, &mut diagnostics).parse();

        // Resolve even after syntax errors: the partial tree still yields
        // useful diagnostics.  Nothing runs either way.
        let locals = Resolver::new(&mut diagnostics).resolve(&statements);

        if diagnostics.had_error() {
            debug!("{} static error(s), not executing", diagnostics.len());
            return Outcome::StaticErrors(diagnostics.into_errors());
        }

        self.interpreter.resolve(locals);

        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Success,
            Err(e) => {
                debug!("Runtime error: {}", e);
                self.had_runtime_error = true;
                Outcome::RuntimeError(e)
            }
        }
    }
}

/// Read a whole source file as UTF‑8.
pub fn read_source(path: &Path) -> Result<String> {
    info!("Reading file: {:?}", path);

    let bytes = fs::read(path)?;
    let source = String::from_utf8(bytes)?;

    info!("Read {} bytes from {:?}", source.len(), path);

    Ok(source)
}
