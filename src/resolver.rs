//! Static resolver pass for the **Rill** interpreter.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of `HashMap<String, bool>` tracking
//!    declared/defined).
//! 2. Report static errors (redeclaration, forward-read in an initializer,
//!    `return` outside a function, `self` outside a class, `break` outside a
//!    loop or switch, `continue` outside a loop).  Errors accumulate through
//!    the shared [`Diagnostics`] sink; the walk always completes.
//! 3. Tell the interpreter, for *each* variable occurrence, whether it's a
//!    local (and at what depth) or a global -- so evaluation never falls back
//!    to dynamic lookup that would see a later shadowing local.
//!
//! The pass must fully complete, with no runtime side effects beyond the
//! distance table, before interpretation starts; the driver withholds
//! execution entirely when any error was reported.

use std::collections::HashMap;

use log::{debug, info};

use crate::diagnostics::Diagnostics;
use crate::error::RillError;
use crate::expr::Expr;
use crate::interpreter::Interpreter;
use crate::stmt::Stmt;
use crate::token::Token;

/// Are we inside a user function?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
}

/// Are we inside a class body?  Used to validate `self`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
}

/// Resolver: tracks scopes, enforces static rules, and *records* binding
/// distances (locals vs. globals) by calling back into the interpreter.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    diag: &'a mut Diagnostics,
    scopes: Vec<HashMap<String, bool>>, // false=declared, true=defined
    current_function: FunctionType,
    current_class: ClassType,

    /// Loops enclosing the current node, within the current function.
    loop_depth: usize,

    /// Loops *and* switches enclosing the current node, within the current
    /// function.  `break` targets either; `continue` targets loops only.
    breakable_depth: usize,
}

impl<'a> Resolver<'a> {
    /// Create a new resolver bound to the given interpreter.
    pub fn new(interpreter: &'a mut Interpreter, diag: &'a mut Diagnostics) -> Self {
        info!("Resolver instantiated");

        Resolver {
            interpreter,
            diag,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            loop_depth: 0,
            breakable_depth: 0,
        }
    }

    /// Walk all top-level statements.
    pub fn resolve(&mut self, statements: &[Stmt]) {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        debug!("Resolving stmt: {:?}", stmt);

        match stmt {
            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr);
            }

            Stmt::Let { name, initializer } => {
                // declare → resolve initializer → define, so reading the
                // name inside its own initializer is catchable.
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(name);
            }

            Stmt::Block(statements) => {
                self.begin_scope();
                for s in statements {
                    self.resolve_stmt(s);
                }
                self.end_scope();
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While { condition, body } | Stmt::DoWhile { condition, body } => {
                self.resolve_expr(condition);

                self.loop_depth += 1;
                self.breakable_depth += 1;
                self.resolve_stmt(body);
                self.loop_depth -= 1;
                self.breakable_depth -= 1;
            }

            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                // Outer scope for the loop variable; the clauses resolve
                // against it.
                self.begin_scope();

                let mut loop_var: Option<&Token> = None;

                if let Some(init) = initializer {
                    if let Stmt::Let { name, .. } = init.as_ref() {
                        loop_var = Some(name);
                    }
                    self.resolve_stmt(init);
                }
                if let Some(cond) = condition {
                    self.resolve_expr(cond);
                }
                if let Some(incr) = increment {
                    self.resolve_expr(incr);
                }

                // Per-iteration scope: the interpreter gives every iteration
                // a fresh frame holding its own copy of the loop variable,
                // so references in the body must bind to *this* scope for
                // closures to capture per-iteration values.
                self.begin_scope();
                if let Some(name) = loop_var {
                    if let Some(scope) = self.scopes.last_mut() {
                        scope.insert(name.lexeme.clone(), true);
                    }
                }

                self.loop_depth += 1;
                self.breakable_depth += 1;
                self.resolve_stmt(body);
                self.loop_depth -= 1;
                self.breakable_depth -= 1;

                self.end_scope();
                self.end_scope();
            }

            Stmt::Function(decl) => {
                // The function name is visible *inside* its own body,
                // enabling recursion.
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(&decl.params, &decl.body, FunctionType::Function);
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.diag.report(&RillError::resolve_at(
                        keyword,
                        "Cannot return from top-level code",
                    ));
                }
                if let Some(expr) = value {
                    self.resolve_expr(expr);
                }
            }

            Stmt::Break(token) => {
                if self.breakable_depth == 0 {
                    self.diag.report(&RillError::resolve_at(
                        token,
                        "'break' outside of a loop or switch",
                    ));
                }
            }

            Stmt::Continue(token) => {
                if self.loop_depth == 0 {
                    self.diag.report(&RillError::resolve_at(
                        token,
                        "'continue' outside of a loop",
                    ));
                }
            }

            Stmt::Switch { subject, branches } => {
                self.resolve_expr(subject);

                // One scope spans every arm: fallthrough executes arms in
                // the same frame, so declarations collide across arms too.
                self.begin_scope();
                self.breakable_depth += 1;

                for branch in branches {
                    for s in &branch.body {
                        self.resolve_stmt(s);
                    }
                }

                self.breakable_depth -= 1;
                self.end_scope();
            }

            Stmt::Class { name, methods } => {
                self.declare(name);
                self.define(name);

                let enclosing_class = self.current_class;
                self.current_class = ClassType::Class;

                // `self` lives in a scope wrapped around the methods; the
                // interpreter splices the matching frame in when binding a
                // method to an instance.
                self.begin_scope();
                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert("self".to_string(), true);
                }

                for method in methods {
                    self.resolve_function(&method.params, &method.body, FunctionType::Method);
                }

                self.end_scope();
                self.current_class = enclosing_class;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) {
        debug!("Resolving expr: {:?}", expr);

        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => {
                self.resolve_expr(inner);
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right);
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_expr(then_branch);
                self.resolve_expr(else_branch);
            }

            Expr::Variable { name, id } => {
                // Cannot read in own initializer.
                if let Some(scope) = self.scopes.last() {
                    if scope.get(&name.lexeme) == Some(&false) {
                        self.diag.report(&RillError::resolve_at(
                            name,
                            "Cannot read local variable in its own initializer",
                        ));
                    }
                }

                self.resolve_local(*id, name);
            }

            Expr::Assign { name, value, id } => {
                // First resolve RHS, then bind LHS.
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(value);
            }

            Expr::SelfRef { keyword, id } => {
                if self.current_class == ClassType::None {
                    self.diag.report(&RillError::resolve_at(
                        keyword,
                        "Cannot use 'self' outside of a class",
                    ));
                    return;
                }

                self.resolve_local(*id, keyword);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function's parameters + body.  Loop and
    /// switch context does not cross the function boundary: a `break`
    /// inside a function defined inside a loop does not target that loop.
    fn resolve_function(&mut self, params: &[Token], body: &[Stmt], ftype: FunctionType) {
        let enclosing = self.current_function;
        let enclosing_loop_depth = self.loop_depth;
        let enclosing_breakable_depth = self.breakable_depth;

        self.current_function = ftype;
        self.loop_depth = 0;
        self.breakable_depth = 0;

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        for stmt in body {
            self.resolve_stmt(stmt);
        }
        self.end_scope();

        self.current_function = enclosing;
        self.loop_depth = enclosing_loop_depth;
        self.breakable_depth = enclosing_breakable_depth;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(&name.lexeme) {
                self.diag.report(&RillError::resolve_at(
                    name,
                    "Variable with this name already declared in this scope",
                ));
                return;
            }

            scope.insert(name.lexeme.clone(), false);
        }
        // Top level: the global frame is checked at definition time instead.
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding-distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this variable occurrence as either a local at depth `d`
    /// (0 = innermost), or a global if not found in *any* scope (globals
    /// are left unrecorded; evaluation then consults the global frame
    /// directly).
    fn resolve_local(&mut self, id: usize, name: &Token) {
        // 1. check innermost → outermost
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);
                self.interpreter.note_local(id, depth);
                return;
            }
        }

        // 2. not found in any local scope ⇒ global
        debug!("Resolved '{}' as global", name.lexeme);
    }
}
