use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::object::{Callable, Object};
use crate::token::Token;

/// A class: a name, an optional superclass, and a method table.
/// `IndexMap` keeps methods in declaration order purely for predictable
/// iteration (e.g. diagnostics); lookup is still by name.
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub methods: IndexMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<RefCell<Class>>>, methods: IndexMap<String, Rc<Function>>) -> Self {
        Class { name, superclass, methods }
    }

    /// Looks up a method by name, walking the superclass chain. The first
    /// class in the chain that defines the name wins, so subclass methods
    /// shadow inherited ones.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.superclass.as_ref().and_then(|superclass| superclass.borrow().find_method(name))
    }

    /// A class's arity is its initializer's arity, or zero if it has none.
    /// Constructing a class is handled directly in the interpreter's call
    /// evaluation (it needs the `Rc<RefCell<Class>>` the callee evaluated
    /// to, which `Callable::call(&self, ..)` can't hand back out).
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A runtime instance of a `Class`: the class it was constructed from, plus
/// its own field table (separate from the class's shared method table).
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    pub fn get(&self, name: &Token, this: &Object) -> Result<Object, RuntimeError> {
        if let Some(value) = self.fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = self.class.borrow().find_method(&name.lexeme) {
            return Ok(Object::Function(method.bind(this.clone())));
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined property '{}'.", name.lexeme)))
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class.borrow().name)
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}
