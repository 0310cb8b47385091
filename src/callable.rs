//! Everything that can sit in the callee position of a call expression:
//! host‑provided natives and user functions closing over their environment.

use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

use log::debug;

use crate::ast::FunctionDecl;
use crate::environment::{EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::interpreter::{Flow, Interpreter};
use crate::token::Token;
use crate::value::Value;

#[derive(Clone)]
pub enum Callable {
    Native(NativeFunction),
    Function(Rc<LoxFunction>),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Function(function) => function.declaration.params.len(),
        }
    }

    /// Invoke with already‑evaluated arguments.  The arity check is the
    /// caller's job; `paren` anchors any error raised inside.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        match self {
            Callable::Native(native) => {
                debug!("Calling native function '{}'", native.name);
                (native.func)(&arguments).map_err(|msg| LoxError::runtime(paren, msg))
            }
            Callable::Function(function) => function.call(interpreter, arguments, paren),
        }
    }

    /// Identity comparison.
    pub fn same(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => a.name == b.name,
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "<native fn>"),
            Callable::Function(function) => write!(f, "<fn {}>", function.declaration.name.lexeme),
        }
    }
}

// Environments can reach back to the function that closes over them, so the
// derived `Debug` would never terminate.
impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A function implemented by the host.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> std::result::Result<Value, String>,
}

/// A user function paired with the environment active when its declaration
/// was executed.
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef) -> Self {
        Self {
            declaration,
            closure,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// One fresh frame per call, parented to the closure, holding the
    /// parameters.  A `return` anywhere in the body ends the call here.
    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        debug!("Calling user-defined function '{}'", self.name());

        let mut frame = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, arg) in self.declaration.params.iter().zip(arguments) {
            debug!("Binding parameter '{}' to {}", param.lexeme, arg);
            frame.define(&param.lexeme, arg);
        }

        match interpreter.execute_call(&self.declaration.body, frame.into_ref(), paren)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// `clock()`: seconds since the interpreter first started, monotonic.
pub fn clock() -> NativeFunction {
    EPOCH.get_or_init(Instant::now);

    NativeFunction {
        name: "clock",
        arity: 0,
        func: |_args| {
            let elapsed = EPOCH.get_or_init(Instant::now).elapsed();
            Ok(Value::Number(elapsed.as_secs_f64()))
        },
    }
}
