use std::collections::HashMap;
use std::mem;

use crate::error::{ResolveError, Reporter};
use crate::expr::{Expr, NodeId};
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::Token;

#[derive(Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Static pass between parsing and evaluation. Walks the AST once to figure
/// out, for every variable reference, how many enclosing scopes separate it
/// from its declaration — so the interpreter never has to search an
/// environment chain at runtime for a statically-resolvable name. Resolves
/// by `NodeId` into a plain map rather than mutating an `Interpreter`
/// directly, so this pass has no knowledge of runtime values at all.
pub struct Resolver<'a> {
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
    locals: HashMap<NodeId, usize>,
    reporter: &'a Reporter,
}

impl<'a> Resolver<'a> {
    pub fn new(reporter: &'a Reporter) -> Self {
        Resolver {
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            locals: HashMap::new(),
            reporter,
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> HashMap<NodeId, usize> {
        self.resolve_stmts(statements);
        self.locals
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_function(&mut self, function: &FunctionDecl, kind: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.reporter.report_resolve(&ResolveError::new(
                name.clone(),
                format!("Already a variable with this name in this scope: '{}'.", name.lexeme),
            ));
        }
        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: NodeId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.locals.insert(id, depth);
                return;
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Variable(v) => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&v.name.lexeme) == Some(&false) {
                        self.reporter.report_resolve(&ResolveError::new(
                            v.name.clone(),
                            "Can't read local variable in its own initializer.",
                        ));
                    }
                }
                self.resolve_local(v.id, &v.name);
            }
            Expr::Assign(a) => {
                self.resolve_expr(&a.value);
                self.resolve_local(a.id, &a.name);
            }
            Expr::Literal(_) => {}
            Expr::Logical(l) => {
                self.resolve_expr(&l.left);
                self.resolve_expr(&l.right);
            }
            Expr::Unary(u) => self.resolve_expr(&u.right),
            Expr::Binary(b) => {
                self.resolve_expr(&b.left);
                self.resolve_expr(&b.right);
            }
            Expr::Grouping(g) => self.resolve_expr(g),
            Expr::Call(c) => {
                self.resolve_expr(&c.callee);
                for argument in &c.arguments {
                    self.resolve_expr(argument);
                }
            }
            Expr::Get(g) => self.resolve_expr(&g.object),
            Expr::Set(s) => {
                self.resolve_expr(&s.value);
                self.resolve_expr(&s.object);
            }
            Expr::This(t) => {
                if self.current_class == ClassType::None {
                    self.reporter.report_resolve(&ResolveError::new(
                        t.keyword.clone(),
                        "Can't use 'this' outside of a class.",
                    ));
                    return;
                }
                self.resolve_local(t.id, &t.keyword);
            }
            Expr::Super(s) => {
                match self.current_class {
                    ClassType::Subclass => {}
                    ClassType::None => self.reporter.report_resolve(&ResolveError::new(
                        s.keyword.clone(),
                        "Can't use 'super' outside of a class.",
                    )),
                    ClassType::Class => self.reporter.report_resolve(&ResolveError::new(
                        s.keyword.clone(),
                        "Can't use 'super' in a class with no superclass.",
                    )),
                }
                self.resolve_local(s.id, &s.keyword);
            }
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }
            Stmt::Var(v) => {
                self.declare(&v.name);
                if let Some(initializer) = &v.initializer {
                    self.resolve_expr(initializer);
                }
                self.define(&v.name);
            }
            Stmt::Function(f) => {
                self.declare(&f.name);
                self.define(&f.name);
                self.resolve_function(f, FunctionType::Function);
            }
            Stmt::Expression(e) => self.resolve_expr(e),
            Stmt::If(i) => {
                self.resolve_expr(&i.condition);
                self.resolve_stmt(&i.then_branch);
                if let Some(else_branch) = &i.else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::Print(e) => self.resolve_expr(e),
            Stmt::Return(r) => {
                if self.current_function == FunctionType::None {
                    self.reporter.report_resolve(&ResolveError::new(
                        r.keyword.clone(),
                        "Can't return from top-level code.",
                    ));
                }
                if let Some(value) = &r.value {
                    if self.current_function == FunctionType::Initializer {
                        self.reporter.report_resolve(&ResolveError::new(
                            r.keyword.clone(),
                            "Can't return a value from an initializer.",
                        ));
                        return;
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::While(w) => {
                self.resolve_expr(&w.condition);
                self.resolve_stmt(&w.body);
            }
            Stmt::Class(c) => {
                let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

                self.declare(&c.name);
                self.define(&c.name);

                if let Some(superclass) = &c.superclass {
                    if let Expr::Variable(v) = superclass {
                        if v.name.lexeme == c.name.lexeme {
                            self.reporter.report_resolve(&ResolveError::new(
                                v.name.clone(),
                                "A class can't inherit from itself.",
                            ));
                        }
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_expr(superclass);

                    self.begin_scope();
                    self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
                }

                self.begin_scope();
                self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

                for method in &c.methods {
                    let kind = if method.name.lexeme == "init" { FunctionType::Initializer } else { FunctionType::Method };
                    self.resolve_function(method, kind);
                }

                self.end_scope();

                if c.superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
        }
    }
}
