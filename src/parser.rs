/*!
Recursive-descent parser for Rill.

Grammar (EBNF, condensed)
-------------------------

```text
program        → declaration* EOF ;
declaration    → classDecl | funDecl | letDecl | statement ;
classDecl      → "class" IDENT "{" method* "}" ;
method         → IDENT "(" parameters? ")" block ;
funDecl        → "define" IDENT "(" parameters? ")" block ;
letDecl        → "let" IDENT ( ":=" expression )? ";" ;
statement      → exprStmt | printStmt | ifStmt | whileStmt | doWhileStmt
               | forStmt | switchStmt | returnStmt | breakStmt
               | continueStmt | block ;
exprStmt       → expression ";" ;
printStmt      → "print" expression ";" ;
ifStmt         → "if" "(" expression ")" statement ( "else" statement )? ;
whileStmt      → "while" "(" expression ")" statement ;
doWhileStmt    → "do" statement "while" "(" expression ")" ";" ;
forStmt        → "for" "(" ( letDecl | exprStmt | ";" ) expression? ";"
                 expression? ")" statement ;
switchStmt     → "switch" "(" expression ")" "{" switchArm* "}" ;
switchArm      → ( "case" literal | "default" ) ":" declaration* ;
returnStmt     → "return" expression? ";" ;
block          → "{" declaration* "}" ;
parameters     → IDENT ( "," IDENT )* ;          // at most 8

expression     → assignment ;
assignment     → ( call "." )? IDENT ":=" assignment | conditional ;
conditional    → logic_or ( "?" expression ":" conditional )? ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → bit_or ( "and" bit_or )* ;
bit_or         → bit_xor ( "|" bit_xor )* ;
bit_xor        → bit_and ( "^" bit_and )* ;
bit_and        → equality ( "&" equality )* ;
equality       → comparison ( ( "!=" | "=" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → modulo ( ( "/" | "*" ) modulo )* ;
modulo         → exponent ( "%" exponent )* ;
exponent       → unary ( "**" exponent )? ;      // right-associative
unary          → ( "-" | "not" | "~" ) unary | call ;
call           → primary ( "(" arguments? ")" | "." IDENT )* ;
arguments      → expression ( "," expression )* ; // at most 8
primary        → NUMBER | STRING | "true" | "false" | "nil"
               | IDENT | "self" | "(" expression ")" ;
```

One function per precedence level, lowest to highest, each Θ(1) per token;
the whole parse is Θ(n) over the token stream.

Error discipline: a parse error inside a declaration is reported through the
shared [`Diagnostics`] sink, then the parser enters panic-mode recovery
(`synchronize`) -- tokens are discarded up to a statement boundary and
parsing resumes, so one malformed statement does not suppress later
diagnostics.  Exceeding the 8-entry argument/parameter cap and duplicate
switch labels are reported the same way but are *non-fatal*: parsing
continues in place.
*/

use std::rc::Rc;

use crate::diagnostics::Diagnostics;
use crate::error::{Result, RillError};
use crate::expr::{Expr, LiteralValue, NodeIds};
use crate::stmt::{FunctionDecl, Stmt, SwitchBranch};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Maximum number of arguments or parameters a call may carry.
const MAX_ARITY: usize = 8;

/// Top-level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    ids: &'a mut NodeIds,
    diag: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.  `ids` must be the session-wide id generator
    /// so reference-site ids stay unique across REPL lines.
    pub fn new(tokens: &'a [Token], ids: &'a mut NodeIds, diag: &'a mut Diagnostics) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            ids,
            diag,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its statement list.  The list may
    /// be partial if errors were reported; the caller checks the
    /// [`Diagnostics`] flags before executing anything.
    pub fn parse(&mut self) -> Vec<Stmt> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),

                Err(e) => {
                    self.diag.report(&e);
                    self.synchronize();
                }
            }
        }

        statements
    }

    /// Parse the token stream as a single expression.  Used by the `parse`
    /// debug subcommand to dump an AST without requiring statements.
    pub fn parse_expression(&mut self) -> Result<Expr> {
        self.expression()
    }

    // ──────────────────────── declaration rules ───────────────────

    fn declaration(&mut self) -> Result<Stmt> {
        debug!("Entering declaration");

        if self.matches(TokenType::CLASS) {
            self.class_declaration()
        } else if self.matches(TokenType::DEFINE) {
            Ok(Stmt::Function(self.function("function")?))
        } else if self.matches(TokenType::LET) {
            self.let_declaration()
        } else {
            self.statement()
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, "Expected class name")?
            .clone();

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before class body")?;

        let mut methods: Vec<Rc<FunctionDecl>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after class body")?;

        Ok(Stmt::Class { name, methods })
    }

    /// Parse a function or method declaration.  The `define` keyword (for
    /// functions) has already been consumed; methods start directly at the
    /// name.
    fn function(&mut self, kind: &str) -> Result<Rc<FunctionDecl>> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, format!("Expected {} name", kind))?
            .clone();

        self.consume(
            TokenType::LEFT_PAREN,
            format!("Expected '(' after {} name", kind),
        )?;

        let mut params: Vec<Token> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    // Non-fatal: report and keep consuming parameters.
                    let at = self.peek().clone();
                    self.diag.report(&RillError::parse_at(
                        &at,
                        format!("Cannot have more than {} parameters", MAX_ARITY),
                    ));
                }

                params.push(
                    self.consume(TokenType::IDENTIFIER, "Expected parameter name")?
                        .clone(),
                );

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;
        self.consume(
            TokenType::LEFT_BRACE,
            format!("Expected '{{' before {} body", kind),
        )?;

        let body: Vec<Stmt> = self.block()?;

        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    fn let_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, "Expected variable name")?
            .clone();

        let initializer: Option<Expr> = if self.matches(TokenType::ASSIGN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expected ';' after variable declaration",
        )?;

        Ok(Stmt::Let { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::DO) {
            self.do_while_statement()
        } else if self.matches(TokenType::SWITCH) {
            self.switch_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::BREAK) {
            let keyword: Token = self.previous().clone();
            self.consume(TokenType::SEMICOLON, "Expected ';' after 'break'")?;
            Ok(Stmt::Break(keyword))
        } else if self.matches(TokenType::CONTINUE) {
            let keyword: Token = self.previous().clone();
            self.consume(TokenType::SEMICOLON, "Expected ';' after 'continue'")?;
            Ok(Stmt::Continue(keyword))
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'for'")?;

        let initializer = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::LET) {
            Some(Box::new(self.let_declaration()?))
        } else {
            Some(Box::new(self.expression_statement()?))
        };

        let condition = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::SEMICOLON, "Expected ';' after loop condition")?;

        let increment = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after for clauses")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::For {
            initializer,
            condition,
            increment,
            body,
        })
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'if'")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        let then_branch: Box<Stmt> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;
        let body: Box<Stmt> = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn do_while_statement(&mut self) -> Result<Stmt> {
        let body: Box<Stmt> = Box::new(self.statement()?);

        self.consume(TokenType::WHILE, "Expected 'while' after do body")?;
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'")?;
        let condition: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;
        self.consume(TokenType::SEMICOLON, "Expected ';' after do-while")?;

        Ok(Stmt::DoWhile { condition, body })
    }

    fn switch_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'switch'")?;
        let subject: Expr = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after switch subject")?;
        self.consume(TokenType::LEFT_BRACE, "Expected '{' before switch body")?;

        let mut branches: Vec<SwitchBranch> = Vec::new();
        let mut seen_default = false;

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            let label: Option<LiteralValue> = if self.matches(TokenType::CASE) {
                let case_keyword: Token = self.previous().clone();
                let literal = self.case_literal()?;
                self.consume(TokenType::COLON, "Expected ':' after case value")?;

                // Case values must be pairwise distinct; non-fatal so the
                // rest of the switch still gets checked.
                let duplicate = branches
                    .iter()
                    .any(|b| b.label.as_ref() == Some(&literal));
                if duplicate {
                    self.diag.report(&RillError::parse_at(
                        &case_keyword,
                        "Duplicate case value in switch",
                    ));
                }

                Some(literal)
            } else if self.matches(TokenType::DEFAULT) {
                let default_keyword: Token = self.previous().clone();
                self.consume(TokenType::COLON, "Expected ':' after 'default'")?;

                if seen_default {
                    self.diag.report(&RillError::parse_at(
                        &default_keyword,
                        "Duplicate 'default' in switch",
                    ));
                }
                seen_default = true;

                None
            } else {
                return Err(RillError::parse_at(
                    self.peek(),
                    "Expected 'case' or 'default' inside switch body",
                ));
            };

            // Everything up to the next label (or the closing brace) belongs
            // to this arm.
            let mut body: Vec<Stmt> = Vec::new();
            while !self.check(TokenType::CASE)
                && !self.check(TokenType::DEFAULT)
                && !self.check(TokenType::RIGHT_BRACE)
                && !self.is_at_end()
            {
                body.push(self.declaration()?);
            }

            branches.push(SwitchBranch { label, body });
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after switch body")?;

        Ok(Stmt::Switch { subject, branches })
    }

    /// A switch case label must be a constant literal.
    fn case_literal(&mut self) -> Result<LiteralValue> {
        if self.matches(TokenType::FALSE) {
            return Ok(LiteralValue::False);
        }
        if self.matches(TokenType::TRUE) {
            return Ok(LiteralValue::True);
        }
        if self.matches(TokenType::NIL) {
            return Ok(LiteralValue::Nil);
        }

        if self.matches(TokenType::NUMBER(0.0)) {
            if let TokenType::NUMBER(n) = self.previous().token_type {
                return Ok(LiteralValue::Number(n));
            }
        }

        if let TokenType::STRING(ref s) = self.peek().token_type {
            let s = s.clone();
            self.advance();
            return Ok(LiteralValue::Str(s));
        }

        Err(RillError::parse_at(
            self.peek(),
            "Expected constant literal after 'case'",
        ))
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let value: Expr = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after value")?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr: Expr = self.expression()?;
        self.consume(TokenType::SEMICOLON, "Expected ';' after expression")?;
        Ok(Stmt::Expression(expr))
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();
        let value: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after return value")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            // Recover inside the block too: one bad statement must not
            // discard its siblings.
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),

                Err(e) => {
                    self.diag.report(&e);
                    self.synchronize();
                }
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block")?;
        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr: Expr = self.conditional()?;

        if self.matches(TokenType::ASSIGN) {
            let equals: Token = self.previous().clone();
            let value: Expr = self.assignment()?;

            match expr {
                Expr::Variable { name, .. } => {
                    return Ok(Expr::Assign {
                        name,
                        value: Box::new(value),
                        id: self.ids.next_id(),
                    });
                }

                Expr::Get { object, name } => {
                    return Ok(Expr::Set {
                        object,
                        name,
                        value: Box::new(value),
                    });
                }

                _ => {
                    return Err(RillError::parse_at(&equals, "Invalid assignment target"));
                }
            }
        }

        Ok(expr)
    }

    fn conditional(&mut self) -> Result<Expr> {
        let expr: Expr = self.logical_or()?;

        if self.matches(TokenType::QUESTION) {
            let then_branch: Expr = self.expression()?;
            self.consume(
                TokenType::COLON,
                "Expected ':' in conditional expression",
            )?;
            // Right-associative else branch.
            let else_branch: Expr = self.conditional()?;

            return Ok(Expr::Conditional {
                condition: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.bit_or()?;

        while self.matches(TokenType::AND) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.bit_or()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn bit_or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.bit_xor()?;

        while self.matches(TokenType::PIPE) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.bit_xor()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn bit_xor(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.bit_and()?;

        while self.matches(TokenType::CARET) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.bit_and()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn bit_and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.matches(TokenType::AMP) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.equality()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.comparison()?;

        while self.matches(TokenType::BANG_EQUAL) || self.matches(TokenType::EQUAL) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.comparison()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr = self.term()?;

        while self.matches(TokenType::GREATER)
            || self.matches(TokenType::GREATER_EQUAL)
            || self.matches(TokenType::LESS)
            || self.matches(TokenType::LESS_EQUAL)
        {
            let operator: Token = self.previous().clone();
            let right: Expr = self.term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.factor()?;

        while self.matches(TokenType::MINUS) || self.matches(TokenType::PLUS) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.modulo()?;

        while self.matches(TokenType::STAR) || self.matches(TokenType::SLASH) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.modulo()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn modulo(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.exponent()?;

        while self.matches(TokenType::PERCENT) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.exponent()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn exponent(&mut self) -> Result<Expr> {
        let expr: Expr = self.unary()?;

        if self.matches(TokenType::STAR_STAR) {
            let operator: Token = self.previous().clone();
            // Right-associative: 2 ** 3 ** 2 is 2 ** (3 ** 2).
            let right: Expr = self.exponent()?;
            return Ok(Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::MINUS)
            || self.matches(TokenType::NOT)
            || self.matches(TokenType::TILDE)
        {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::DOT) {
                let name: Token = self
                    .consume(TokenType::IDENTIFIER, "Expected property name after '.'")?
                    .clone();

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    // Non-fatal: report and keep consuming arguments.
                    let at = self.peek().clone();
                    self.diag.report(&RillError::parse_at(
                        &at,
                        format!("Cannot have more than {} arguments", MAX_ARITY),
                    ));
                }

                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: Token = self
            .consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?
            .clone();

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::False));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::True));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if self.matches(TokenType::NUMBER(0.0)) {
            if let TokenType::NUMBER(n) = self.previous().token_type {
                return Ok(Expr::Literal(LiteralValue::Number(n)));
            }
        }

        if let TokenType::STRING(ref s) = self.peek().token_type {
            let s = s.clone();
            self.advance();
            return Ok(Expr::Literal(LiteralValue::Str(s)));
        }

        if self.matches(TokenType::IDENTIFIER) {
            return Ok(Expr::Variable {
                name: self.previous().clone(),
                id: self.ids.next_id(),
            });
        }

        if self.matches(TokenType::SELF) {
            return Ok(Expr::SelfRef {
                keyword: self.previous().clone(),
                id: self.ids.next_id(),
            });
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(RillError::parse_at(self.peek(), "Expected expression"))
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume<S: Into<String>>(&mut self, ttype: TokenType, message: S) -> Result<&Token> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(RillError::parse_at(self.peek(), message.into()))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::DEFINE
                | TokenType::LET
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::DO
                | TokenType::SWITCH
                | TokenType::PRINT
                | TokenType::RETURN
                | TokenType::BREAK
                | TokenType::CONTINUE => return,
                _ => {}
            }

            self.advance();
        }
    }
}
