use crate::error::{ParseError, Reporter};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Kind, Token};

type ParseResult<T> = Result<T, ParseError>;

/// Returns whether the next token is any of the given kinds, consuming it if so.
macro_rules! match_any {
    ( $self:ident, $( $kind:expr ),+ ) => {
        {
            if $( $self.check($kind) )||+ {
                $self.advance();
                true
            } else {
                false
            }
        }
    }
}

/// Recursive-descent parser producing the tagged `Expr`/`Stmt` AST.
///
/// - Program      -> Declaration* EOF ;
/// - Declaration  -> ClassDecl | FunDecl | VarDecl | Statement ;
/// - ClassDecl    -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" Function* "}" ;
/// - FunDecl      -> "fun" Function ;
/// - VarDecl      -> "var" IDENTIFIER ( "=" Expression )? ";" ;
/// - Function     -> IDENTIFIER "(" Parameters? ")" Block ;
/// - Parameters   -> IDENTIFIER ( "," IDENTIFIER )* ;
/// - Statement    -> ExprStmt | ForStmt | IfStmt | PrintStmt | ReturnStmt | WhileStmt | Block ;
/// - ExprStmt     -> Expression ";" ;
/// - ForStmt      -> "for" "(" ( VarDecl | ExprStmt | ";" ) Expression? ";" Expression? ")" Statement ;
/// - IfStmt       -> "if" "(" Expression ")" Statement ( "else" Statement )? ;
/// - PrintStmt    -> "print" Expression ";" ;
/// - ReturnStmt   -> "return" Expression? ";" ;
/// - WhileStmt    -> "while" "(" Expression ")" Statement ;
/// - Expression   -> Assignment ;
/// - Assignment   -> ( Call "." )? IDENTIFIER "=" Assignment | LogicOr ;
/// - LogicOr      -> LogicAnd ( "or" LogicAnd )* ;
/// - LogicAnd     -> Equality ( "and" Equality )* ;
/// - Equality     -> Comparison ( ( "!=" | "==" ) Comparison )* ;
/// - Comparison   -> Term ( ( ">" | ">=" | "<" | "<=" ) Term )* ;
/// - Term         -> Factor ( ( "+" | "-" ) Factor )* ;
/// - Factor       -> Unary ( ( "*" | "/" ) Unary )* ;
/// - Unary        -> ( "!" | "-" ) Unary | Call ;
/// - Arguments    -> Expression ( "," Expression )* ;
/// - Call         -> Primary ( "(" Arguments? ")" | "." IDENTIFIER )* ;
/// - Primary      -> NUMBER | STRING | "false" | "true" | "nil" | "this" | "(" Expression ")" | IDENTIFIER | "super" "." IDENTIFIER ;
pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    ids: NodeIdGen,
    reporter: &'a Reporter,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, reporter: &'a Reporter) -> Self {
        let tokens = tokens.into_iter().filter(|t| t.kind != Kind::Comment).collect();
        Parser { tokens, current: 0, ids: NodeIdGen::default(), reporter }
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == Kind::EOF
    }

    fn check(&self, kind: Kind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn consume(&mut self, kind: Kind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }

        Err(ParseError::new(self.peek().clone(), message))
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if match_any!(self, Kind::Class) {
            self.class_declaration()
        } else if match_any!(self, Kind::Fun) {
            self.function("function").map(|decl| Stmt::Function(std::rc::Rc::new(decl)))
        } else if match_any!(self, Kind::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.reporter.report_parse(&error);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Kind::Identifier, "Expect class name.")?;

        let superclass = if match_any!(self, Kind::Less) {
            let name = self.consume(Kind::Identifier, "Expect superclass name.")?;
            Some(Expr::Variable(VariableExpr { id: self.ids.next(), name }))
        } else {
            None
        };

        self.consume(Kind::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(Kind::RightBrace) && !self.is_at_end() {
            methods.push(std::rc::Rc::new(self.function("method")?));
        }

        self.consume(Kind::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassStmt { name, superclass, methods }))
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Kind::Identifier, "Expect variable name.")?;

        let initializer = if match_any!(self, Kind::Equal) { Some(self.expression()?) } else { None };

        self.consume(Kind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var(VarStmt { name, initializer }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Kind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Kind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While(WhileStmt { condition, body }))
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if match_any!(self, Kind::For) {
            return self.for_statement();
        }
        if match_any!(self, Kind::If) {
            return self.if_statement();
        }
        if match_any!(self, Kind::Print) {
            return self.print_statement();
        }
        if match_any!(self, Kind::Return) {
            return self.return_statement();
        }
        if match_any!(self, Kind::While) {
            return self.while_statement();
        }
        if match_any!(self, Kind::LeftBrace) {
            return Ok(Stmt::Block(self.block()?));
        }

        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Kind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if match_any!(self, Kind::Semicolon) {
            None
        } else if match_any!(self, Kind::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Kind::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(Kind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Kind::RightParen) { Some(self.expression()?) } else { None };
        self.consume(Kind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        body = Stmt::While(WhileStmt {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Kind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Kind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if match_any!(self, Kind::Else) { Some(Box::new(self.statement()?)) } else { None };

        Ok(Stmt::If(IfStmt { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Kind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(expr))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if self.check(Kind::Semicolon) { None } else { Some(self.expression()?) };

        self.consume(Kind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnStmt { keyword, value }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Kind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    fn function(&mut self, kind: &str) -> ParseResult<FunctionDecl> {
        let name = self.consume(Kind::Identifier, &format!("Expect {kind} name."))?;
        self.consume(Kind::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.check(Kind::RightParen) {
            loop {
                if params.len() >= 255 {
                    self.reporter.report_parse(&ParseError::new(self.peek().clone(), "Can't have more than 255 parameters."));
                }

                params.push(self.consume(Kind::Identifier, "Expect parameter name.")?);

                if !match_any!(self, Kind::Comma) {
                    break;
                }
            }
        }

        self.consume(Kind::RightParen, "Expect ')' after parameters.")?;
        self.consume(Kind::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block()?;

        Ok(FunctionDecl { name, params, body })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Kind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(Kind::RightBrace, "Expect '}' after block.")?;

        Ok(statements)
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if match_any!(self, Kind::Equal) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(v) => Ok(Expr::Assign(AssignExpr { id: self.ids.next(), name: v.name, value: Box::new(value) })),
                Expr::Get(g) => Ok(Expr::Set(SetExpr { object: g.object, name: g.name, value: Box::new(value) })),
                _ => {
                    self.reporter.report_parse(&ParseError::new(equals, "Invalid assignment target."));
                    Ok(expr)
                }
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while match_any!(self, Kind::Or) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while match_any!(self, Kind::And) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while match_any!(self, Kind::BangEqual, Kind::EqualEqual) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while match_any!(self, Kind::Greater, Kind::GreaterEqual, Kind::Less, Kind::LessEqual) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while match_any!(self, Kind::Minus, Kind::Plus) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while match_any!(self, Kind::Slash, Kind::Star) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryExpr { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if match_any!(self, Kind::Bang, Kind::Minus) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryExpr { operator, right: Box::new(right) }));
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(Kind::RightParen) {
            loop {
                if arguments.len() >= 255 {
                    self.reporter.report_parse(&ParseError::new(self.peek().clone(), "Can't have more than 255 arguments."));
                }
                arguments.push(self.expression()?);
                if !match_any!(self, Kind::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(Kind::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call(CallExpr { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if match_any!(self, Kind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if match_any!(self, Kind::Dot) {
                let name = self.consume(Kind::Identifier, "Expect property name after '.'.")?;
                expr = Expr::Get(GetExpr { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if match_any!(self, Kind::False) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }
        if match_any!(self, Kind::True) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }
        if match_any!(self, Kind::Nil) {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if match_any!(self, Kind::Number, Kind::String) {
            let literal = self.previous().literal.clone().expect("number or string token carries a literal");
            return Ok(Expr::Literal(literal));
        }
        if match_any!(self, Kind::Super) {
            let keyword = self.previous().clone();
            self.consume(Kind::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(Kind::Identifier, "Expect superclass method name.")?;
            return Ok(Expr::Super(SuperExpr { id: self.ids.next(), keyword, method }));
        }
        if match_any!(self, Kind::This) {
            return Ok(Expr::This(ThisExpr { id: self.ids.next(), keyword: self.previous().clone() }));
        }
        if match_any!(self, Kind::Identifier) {
            return Ok(Expr::Variable(VariableExpr { id: self.ids.next(), name: self.previous().clone() }));
        }
        if match_any!(self, Kind::LeftParen) {
            let expr = self.expression()?;
            self.consume(Kind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(ParseError::new(self.peek().clone(), "Expect expression."))
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == Kind::Semicolon {
                return;
            }

            match self.peek().kind {
                Kind::Class | Kind::Fun | Kind::Var | Kind::For | Kind::If | Kind::While | Kind::Print | Kind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
