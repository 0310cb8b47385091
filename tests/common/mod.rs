#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::{Lox, Outcome};

/// `Write` sink that can be read back after the interpreter is done with it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session whose printed output is captured.
pub fn session() -> (Lox, SharedBuffer) {
    let out = SharedBuffer::default();
    (Lox::with_output(Box::new(out.clone())), out)
}

/// Run `source` in a fresh session, returning the outcome and everything printed.
pub fn run(source: &str) -> (Outcome, String) {
    let (mut lox, out) = session();
    let outcome = lox.run(source);
    (outcome, out.contents())
}

/// Run `source`, insist it succeeds, and return its output lines.
pub fn output_of(source: &str) -> Vec<String> {
    let (outcome, out) = run(source);
    assert!(
        outcome.is_success(),
        "expected success, got {:?}\noutput so far:\n{}",
        outcome,
        out
    );
    out.lines().map(str::to_owned).collect()
}

/// Rendered diagnostics of a run that failed statically.
pub fn static_errors(source: &str) -> Vec<String> {
    match run(source).0 {
        Outcome::StaticErrors(errors) => errors.iter().map(ToString::to_string).collect(),
        other => panic!("expected static errors, got {:?}", other),
    }
}

/// Rendered runtime error of a run that failed while executing.
pub fn runtime_error(source: &str) -> String {
    match run(source).0 {
        Outcome::RuntimeError(e) => e.to_string(),
        other => panic!("expected a runtime error, got {:?}", other),
    }
}
