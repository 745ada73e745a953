use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A lexical scope: a flat name table plus a link to the enclosing scope.
/// Closures capture the `Rc<RefCell<Environment>>` they were created in, so
/// a function body sees whatever the enclosing scope held at call time, not
/// at definition time.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, values: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self.enclosing.clone().expect("resolver-reported distance undershoots the actual chain");

        for _ in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .expect("resolver-reported distance undershoots the actual chain");
            environment = parent;
        }

        environment
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme)))
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        if distance == 0 {
            return self.get_own(name);
        }
        self.ancestor(distance).borrow().get_own(name)
    }

    fn get_own(&self, name: &Token) -> Result<Object, RuntimeError> {
        self.values.get(&name.lexeme).cloned()
            .ok_or_else(|| RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme)))
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme)))
    }

    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if distance == 0 {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }
        self.ancestor(distance).borrow_mut().values.insert(name.lexeme.clone(), value);
        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
