use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Reporter, RuntimeError};
use crate::expr::{Expr, NodeId};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::Stmt;
use crate::token::{Kind, Token};

/// Non-local control flow out of statement execution: either a `return`
/// unwinding back to the enclosing call, or a runtime error unwinding all
/// the way to the top of `interpret`. Modeled as the `Err` side of a
/// `Result` and propagated with `?`, rather than threading a sentinel
/// "did we return" flag through every statement.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

type EvalResult = Result<Object, Unwind>;
type ExecResult = Result<(), Unwind>;

/// The tree-walk evaluator. Holds the global scope and the resolver's
/// variable-distance table, and writes `print` output through `out` so
/// tests can capture it instead of stdout.
pub struct Interpreter<'a> {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    reporter: &'a Reporter,
    out: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(reporter: &'a Reporter, out: &'a mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(native.name, Object::NativeFunction(native));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), reporter, out }
    }

    pub fn set_locals(&mut self, locals: HashMap<NodeId, usize>) {
        self.locals = locals;
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(Unwind::Error(error)) = self.execute(statement) {
                self.reporter.report_runtime(&error);
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{value}").expect("write to interpreter output");
                Ok(())
            }
            Stmt::Var(v) => {
                let value = match &v.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Object::Literal(Literal::Nil),
                };
                self.environment.borrow_mut().define(&v.name.lexeme, value);
                Ok(())
            }
            Stmt::Block(statements) => {
                let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
                self.execute_block(statements, scope)
            }
            Stmt::If(i) => {
                if self.evaluate(&i.condition)?.is_truthy() {
                    self.execute(&i.then_branch)
                } else if let Some(else_branch) = &i.else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While(w) => {
                while self.evaluate(&w.condition)?.is_truthy() {
                    self.execute(&w.body)?;
                }
                Ok(())
            }
            Stmt::Function(declaration) => {
                let function = Function::new(Rc::clone(declaration), Rc::clone(&self.environment), false);
                self.environment.borrow_mut().define(&declaration.name.lexeme, Object::Function(function));
                Ok(())
            }
            Stmt::Return(r) => {
                let value = match &r.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Object::Literal(Literal::Nil),
                };
                Err(Unwind::Return(value))
            }
            Stmt::Class(c) => self.execute_class(c),
        }
    }

    fn execute_class(&mut self, stmt: &crate::stmt::ClassStmt) -> ExecResult {
        let superclass = match &stmt.superclass {
            Some(expr) => match self.evaluate(expr)? {
                Object::Class(class) => Some(class),
                _ => {
                    let token = match expr {
                        Expr::Variable(v) => v.name.clone(),
                        _ => unreachable!("resolver only allows a variable expression as a superclass"),
                    };
                    return Err(RuntimeError::new(token, "Superclass must be a class.").into());
                }
            },
            None => None,
        };

        self.environment.borrow_mut().define(&stmt.name.lexeme, Object::Literal(Literal::Nil));

        let enclosing = if let Some(superclass) = &superclass {
            let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            scope.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            Some(std::mem::replace(&mut self.environment, scope))
        } else {
            None
        };

        let mut methods = IndexMap::new();
        for method in &stmt.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::clone(method), Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        if let Some(enclosing) = enclosing {
            self.environment = enclosing;
        }

        let class = Class::new(stmt.name.lexeme.clone(), superclass, methods);
        self.environment.borrow_mut().assign(&stmt.name, Object::Class(Rc::new(RefCell::new(class))))?;
        Ok(())
    }

    /// Runs `statements` in `scope`, always restoring the interpreter's
    /// previous environment on the way out — normal completion, an early
    /// `return`, and a propagating error all take this same path.
    pub fn execute_block(&mut self, statements: &[Stmt], scope: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, scope);

        let mut result = Ok(());
        for statement in statements {
            if let Err(unwind) = self.execute(statement) {
                result = Err(unwind);
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(literal) => Ok(Object::Literal(literal.clone())),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary(u) => self.evaluate_unary(u),
            Expr::Binary(b) => self.evaluate_binary(b),
            Expr::Logical(l) => self.evaluate_logical(l),
            Expr::Variable(v) => self.lookup_variable(&v.name, v.id),
            Expr::Assign(a) => self.evaluate_assign(a),
            Expr::Call(c) => self.evaluate_call(c),
            Expr::Get(g) => self.evaluate_get(g),
            Expr::Set(s) => self.evaluate_set(s),
            Expr::This(t) => self.lookup_variable(&t.keyword, t.id),
            Expr::Super(s) => self.evaluate_super(s),
        }
    }

    fn lookup_variable(&self, name: &Token, id: NodeId) -> EvalResult {
        match self.locals.get(&id) {
            Some(&distance) => Ok(self.environment.borrow().get_at(distance, name)?),
            None => Ok(self.globals.borrow().get(name)?),
        }
    }

    fn evaluate_unary(&mut self, u: &crate::expr::UnaryExpr) -> EvalResult {
        let right = self.evaluate(&u.right)?;

        match u.operator.kind {
            Kind::Minus => match right {
                Object::Literal(Literal::Number(n)) => Ok(Object::Literal(Literal::Number(-n))),
                _ => Err(RuntimeError::new(u.operator.clone(), "Operand must be a number.").into()),
            },
            Kind::Bang => Ok(Object::Literal(Literal::Bool(!right.is_truthy()))),
            _ => unreachable!("parser only produces ! and - as unary operators"),
        }
    }

    fn evaluate_binary(&mut self, b: &crate::expr::BinaryExpr) -> EvalResult {
        let left = self.evaluate(&b.left)?;
        let right = self.evaluate(&b.right)?;
        let op = &b.operator;

        match op.kind {
            Kind::Minus => Ok(Object::Literal(Literal::Number(number(op, &left)? - number(op, &right)?))),
            Kind::Slash => {
                let divisor = number(op, &right)?;
                if divisor == 0.0 {
                    return Err(RuntimeError::new(op.clone(), "Division by zero.").into());
                }
                Ok(Object::Literal(Literal::Number(number(op, &left)? / divisor)))
            }
            Kind::Star => Ok(Object::Literal(Literal::Number(number(op, &left)? * number(op, &right)?))),
            Kind::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
                    Ok(Object::Literal(Literal::Number(l + r)))
                }
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                    Ok(Object::Literal(Literal::String(format!("{l}{r}"))))
                }
                _ => Err(RuntimeError::new(op.clone(), "Operands must be two numbers or two strings.").into()),
            },
            Kind::Greater => Ok(Object::Literal(Literal::Bool(number(op, &left)? > number(op, &right)?))),
            Kind::GreaterEqual => Ok(Object::Literal(Literal::Bool(number(op, &left)? >= number(op, &right)?))),
            Kind::Less => Ok(Object::Literal(Literal::Bool(number(op, &left)? < number(op, &right)?))),
            Kind::LessEqual => Ok(Object::Literal(Literal::Bool(number(op, &left)? <= number(op, &right)?))),
            Kind::EqualEqual => Ok(Object::Literal(Literal::Bool(left.is_equal(&right)))),
            Kind::BangEqual => Ok(Object::Literal(Literal::Bool(!left.is_equal(&right)))),
            _ => unreachable!("parser only produces arithmetic/comparison operators as binary operators"),
        }
    }

    fn evaluate_logical(&mut self, l: &crate::expr::LogicalExpr) -> EvalResult {
        let left = self.evaluate(&l.left)?;

        if l.operator.kind == Kind::Or {
            if left.is_truthy() {
                return Ok(left);
            }
        } else if !left.is_truthy() {
            return Ok(left);
        }

        self.evaluate(&l.right)
    }

    fn evaluate_assign(&mut self, a: &crate::expr::AssignExpr) -> EvalResult {
        let value = self.evaluate(&a.value)?;

        match self.locals.get(&a.id) {
            Some(&distance) => self.environment.borrow_mut().assign_at(distance, &a.name, value.clone())?,
            None => self.globals.borrow_mut().assign(&a.name, value.clone())?,
        }

        Ok(value)
    }

    fn evaluate_call(&mut self, c: &crate::expr::CallExpr) -> EvalResult {
        let callee = self.evaluate(&c.callee)?;
        let mut arguments = Vec::with_capacity(c.arguments.len());
        for argument in &c.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let check_arity = |expected: usize| -> Result<(), Unwind> {
            if arguments.len() != expected {
                return Err(RuntimeError::new(
                    c.paren.clone(),
                    format!("Expected {expected} arguments but got {}.", arguments.len()),
                )
                .into());
            }
            Ok(())
        };

        match callee {
            Object::Function(function) => {
                check_arity(function.arity())?;
                Ok(function.call(self, arguments)?)
            }
            Object::NativeFunction(function) => {
                check_arity(function.arity())?;
                Ok(function.call(self, arguments)?)
            }
            Object::Class(class) => {
                check_arity(class.borrow().arity())?;
                let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(&class))));
                if let Some(init) = class.borrow().find_method("init") {
                    init.bind(Object::Instance(Rc::clone(&instance))).call(self, arguments)?;
                }
                Ok(Object::Instance(instance))
            }
            _ => Err(RuntimeError::new(c.paren.clone(), "Can only call functions and classes.").into()),
        }
    }

    fn evaluate_get(&mut self, g: &crate::expr::GetExpr) -> EvalResult {
        let object = self.evaluate(&g.object)?;
        match object {
            Object::Instance(instance) => {
                let this = Object::Instance(Rc::clone(&instance));
                Ok(instance.borrow().get(&g.name, &this)?)
            }
            _ => Err(RuntimeError::new(g.name.clone(), "Only instances have properties.").into()),
        }
    }

    fn evaluate_set(&mut self, s: &crate::expr::SetExpr) -> EvalResult {
        let object = self.evaluate(&s.object)?;
        let Object::Instance(instance) = object else {
            return Err(RuntimeError::new(s.name.clone(), "Only instances have fields.").into());
        };

        let value = self.evaluate(&s.value)?;
        instance.borrow_mut().set(&s.name, value.clone());
        Ok(value)
    }

    fn evaluate_super(&mut self, s: &crate::expr::SuperExpr) -> EvalResult {
        let distance = *self.locals.get(&s.id).expect("resolver always resolves 'super' to a local distance");
        let superclass = match self.environment.borrow().get_at(distance, &s.keyword)? {
            Object::Class(class) => class,
            _ => unreachable!("resolver only binds 'super' to a class value"),
        };

        let this_token = Token::new(Kind::This, "this".to_string(), None, s.keyword.location);
        let this = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let method = superclass.borrow().find_method(&s.method.lexeme).ok_or_else(|| {
            RuntimeError::new(s.method.clone(), format!("Undefined property '{}'.", s.method.lexeme))
        })?;

        Ok(Object::Function(method.bind(this)))
    }
}

fn number(op: &Token, value: &Object) -> Result<f64, Unwind> {
    match value {
        Object::Literal(Literal::Number(n)) => Ok(*n),
        _ => Err(RuntimeError::new(op.clone(), "Operand must be a number.").into()),
    }
}
