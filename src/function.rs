use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Unwind};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionDecl;
use crate::token::{Kind, Location, Token};

/// A user-defined function or method. Shares its declaration (via `Rc`) with
/// every other `Function` bound from the same source, and carries the
/// environment it closed over, so nested functions see variables from their
/// defining scope rather than their call site.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Produces a fresh `Function` whose closure adds a single `this`
    /// binding pointing at `instance`, used when a method is looked up off
    /// an instance.
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);
        Function::new(Rc::clone(&self.declaration), Rc::new(RefCell::new(environment)), self.is_initializer)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration) && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(&param.lexeme, argument);
        }

        let result = interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(environment)));

        match result {
            Ok(()) if self.is_initializer => self.closure.borrow().get_at(0, &this_token()),
            Ok(()) => Ok(Object::Literal(Literal::Nil)),
            Err(Unwind::Return(_)) if self.is_initializer => self.closure.borrow().get_at(0, &this_token()),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

fn this_token() -> Token {
    Token::new(Kind::This, "this".to_string(), None, Location::new(0, 0))
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A builtin implemented in Rust rather than Lox, exposed through the same
/// `Callable` seam as user-defined functions.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(Vec<Object>) -> Result<Object, RuntimeError>,
}

impl NativeFunction {
    pub fn globals() -> Vec<NativeFunction> {
        vec![NativeFunction {
            name: "clock",
            arity: 0,
            function: |_| {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .expect("system clock is after the Unix epoch")
                    .as_secs_f64();
                Ok(Object::Literal(Literal::Number(now)))
            },
        }]
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Callable for NativeFunction {
    fn call(&self, _interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
