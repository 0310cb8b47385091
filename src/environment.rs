use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

/// Shared handle to an environment.  Blocks, call frames and closures may all
/// hold the same frame; it lives as long as the last of them.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Define (or redefine) `name` in this frame.  Never fails.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup through the whole chain.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// The frame exactly `distance` enclosing links above `env`.
    fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
        let mut current = Rc::clone(env);

        for _ in 0..distance {
            let next = current.borrow().enclosing.clone()?;
            current = next;
        }

        Some(current)
    }

    /// Resolved lookup: only the frame at `distance` is consulted, never
    /// anything further out.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        let frame = Self::ancestor(env, distance).ok_or_else(|| undefined(name))?;
        let value = frame.borrow().values.get(&name.lexeme).cloned();

        value.ok_or_else(|| undefined(name))
    }

    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        let frame = Self::ancestor(env, distance).ok_or_else(|| undefined(name))?;
        let mut frame = frame.borrow_mut();

        match frame.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(undefined(name)),
        }
    }
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1, 0)
    }

    #[test]
    fn get_at_does_not_fall_through_to_outer_frames() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&outer)).into_ref();

        assert_eq!(
            Environment::get_at(&inner, 1, &ident("a")).unwrap(),
            Value::Number(1.0)
        );
        assert!(Environment::get_at(&inner, 0, &ident("a")).is_err());
        assert!(Environment::get_at(&inner, 2, &ident("a")).is_err());
    }

    #[test]
    fn assign_at_writes_the_shared_frame() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&outer)).into_ref();

        Environment::assign_at(&inner, 1, &ident("a"), Value::Bool(true)).unwrap();

        assert_eq!(outer.borrow().get(&ident("a")).unwrap(), Value::Bool(true));
    }

    #[test]
    fn assigning_an_undeclared_global_fails() {
        let mut globals = Environment::new();

        let err = globals.assign(&ident("nope"), Value::Nil).unwrap_err();

        assert_eq!(err.to_string(), "Undefined variable 'nope'.\n [line: 1]");
    }
}
