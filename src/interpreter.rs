//! Tree-walking evaluator for Rill.
//!
//! The interpreter owns the runtime state: the global frame, the pointer to
//! the "current" frame (swapped, never destroyed, when entering and leaving
//! blocks and calls), and the resolver's side table mapping reference-site
//! ids to scope distances.
//!
//! Non-local control transfer (`return` / `break` / `continue`) travels as a
//! variant of [`Interrupt`] through the `Err` channel of every statement
//! executor.  Each loop, switch, and call boundary consumes exactly the
//! signal meant for it and re-propagates everything else; a signal reaching
//! the top level is a defect and is surfaced as a runtime error there.
//!
//! Runtime errors carry the offending token; the driver reports them once
//! and stops the current run.  A fresh run (the next REPL line) starts
//! clean because the error state lives in [`crate::diagnostics::Diagnostics`],
//! not here.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use log::{debug, info};
use thiserror::Error;

use crate::environment::Environment;
use crate::expr::{Expr, LiteralValue};
use crate::stmt::{Stmt, SwitchBranch};
use crate::token::{Token, TokenType};
use crate::value::{Class, Function, Instance, Value};

/// A runtime failure: the operation that detected it and why.
#[derive(Debug, Error)]
#[error("[line {l}, col {c}] Runtime error at '{lexeme}': {message}",
        l = .token.line, c = .token.col, lexeme = .token.lexeme)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    fn new<S: Into<String>>(token: &Token, message: S) -> Self {
        RuntimeError {
            token: token.clone(),
            message: message.into(),
        }
    }
}

/// Result variant threaded through statement execution: either a real
/// runtime error or one of the three control-transfer signals.
#[derive(Debug, Error)]
pub enum Interrupt {
    #[error(transparent)]
    Error(#[from] RuntimeError),

    /// `return` unwinding to the nearest call boundary.
    #[error("return signal")]
    Return { keyword: Token, value: Value },

    /// `break` unwinding to the nearest loop or switch.
    #[error("break signal")]
    Break(Token),

    /// `continue` unwinding to the nearest loop.
    #[error("continue signal")]
    Continue(Token),
}

impl Interrupt {
    /// A signal that reached a boundary it should never cross.  The
    /// resolver rejects such programs statically; this is the runtime
    /// backstop for the invariant.
    fn into_runtime_error(self) -> RuntimeError {
        match self {
            Interrupt::Error(e) => e,

            Interrupt::Return { keyword, .. } => {
                RuntimeError::new(&keyword, "'return' escaped to top-level code")
            }

            Interrupt::Break(token) => {
                RuntimeError::new(&token, "'break' escaped its enclosing loop or switch")
            }

            Interrupt::Continue(token) => {
                RuntimeError::new(&token, "'continue' escaped its enclosing loop")
            }
        }
    }
}

/// Convenient alias for interpreter results.
pub type ExecResult<T> = Result<T, Interrupt>;

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,

    /// Reference-site id → scope distance, recorded by the resolver.
    /// Absence means the reference is global.
    locals: HashMap<usize, usize>,

    /// Where `print` writes.  Stdout normally; tests inject a buffer.
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a new Interpreter printing to stdout, with native functions
    /// such as `clock` predefined in the global frame.
    pub fn new() -> Self {
        Self::with_output(Box::new(std::io::stdout()))
    }

    /// Creates a new Interpreter writing `print` output to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                func: |_args: &[Value]| {
                    let timestamp: f64 = SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map_err(|e: SystemTimeError| format!("Clock error: {}", e))?
                        .as_secs_f64();
                    Ok(Value::Number(timestamp))
                },
            },
        );

        Self {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// The global frame.  Exposed for the driver and for tests that inspect
    /// end-of-run state.
    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        self.globals.clone()
    }

    /// Record that the reference site `id` resolves `depth` frames up.
    /// Called by the resolver; entries accumulate for the whole session so
    /// closures from earlier REPL lines keep their annotations.
    pub fn note_local(&mut self, id: usize, depth: usize) {
        debug!("Noting local: id={} depth={}", id, depth);

        self.locals.insert(id, depth);
    }

    /// Interprets a list of statements (a "program").  Stops at the first
    /// runtime error; later top-level statements are not executed.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            if let Err(interrupt) = self.execute(stmt) {
                return Err(interrupt.into_runtime_error());
            }
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    // ───────────────────────── statement execution ──────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> ExecResult<()> {
        match stmt {
            Stmt::Expression(expr) => {
                // Value discarded at statement level.
                let _ = self.evaluate(expr)?;
                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value).ok();
                self.out.flush().ok();
                Ok(())
            }

            Stmt::Let { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    // Declared but not yet initialized: reading this marker
                    // is a runtime error, unlike reading an explicit nil.
                    None => Value::Uninit,
                };

                self.define_checked(name, value)
            }

            Stmt::Block(statements) => {
                let env = Rc::new(RefCell::new(Environment::with_enclosing(
                    self.environment.clone(),
                )));

                self.execute_block(statements, env)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(())
                }
            }

            Stmt::While { condition, body } => {
                while is_truthy(&self.evaluate(condition)?) {
                    match self.execute(body) {
                        Ok(()) => {}
                        Err(Interrupt::Break(_)) => break,
                        Err(Interrupt::Continue(_)) => continue,
                        Err(other) => return Err(other),
                    }
                }

                Ok(())
            }

            Stmt::DoWhile { condition, body } => {
                loop {
                    match self.execute(body) {
                        Ok(()) => {}
                        Err(Interrupt::Break(_)) => break,
                        // continue falls through to the condition test
                        Err(Interrupt::Continue(_)) => {}
                        Err(other) => return Err(other),
                    }

                    if !is_truthy(&self.evaluate(condition)?) {
                        break;
                    }
                }

                Ok(())
            }

            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                let previous = self.environment.clone();
                self.environment = Rc::new(RefCell::new(Environment::with_enclosing(
                    previous.clone(),
                )));

                let result =
                    self.execute_for(initializer.as_deref(), condition.as_ref(), increment.as_ref(), body);

                self.environment = previous;
                result
            }

            Stmt::Function(decl) => {
                debug!("Defining function '{}'", decl.name.lexeme);

                // Capture the current environment as the closure.
                let function = Value::Function(Rc::new(Function {
                    decl: decl.clone(),
                    closure: self.environment.clone(),
                    is_initializer: false,
                }));

                self.define_checked(&decl.name, function)
            }

            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Err(Interrupt::Return {
                    keyword: keyword.clone(),
                    value,
                })
            }

            Stmt::Break(token) => Err(Interrupt::Break(token.clone())),

            Stmt::Continue(token) => Err(Interrupt::Continue(token.clone())),

            Stmt::Switch { subject, branches } => self.execute_switch(subject, branches),

            Stmt::Class { name, methods } => {
                let mut table: HashMap<String, Rc<Function>> = HashMap::new();

                for decl in methods {
                    let method = Rc::new(Function {
                        decl: decl.clone(),
                        closure: self.environment.clone(),
                        is_initializer: decl.name.lexeme == "init",
                    });

                    table.insert(decl.name.lexeme.clone(), method);
                }

                let class = Value::Class(Rc::new(Class::new(name.lexeme.clone(), table)));

                self.define_checked(name, class)
            }
        }
    }

    /// Execute `statements` with `env` as the current frame, restoring the
    /// previous frame afterwards even when a signal or error unwinds.
    fn execute_block(&mut self, statements: &[Stmt], env: Rc<RefCell<Environment>>) -> ExecResult<()> {
        let previous = self.environment.clone();
        self.environment = env;

        let mut result = Ok(());

        for stmt in statements {
            result = self.execute(stmt);

            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    /// The body of a `for` loop, running with the loop frame already
    /// current.  Each iteration gets a fresh frame holding its own copy of
    /// the `let`-declared loop variable, so closures formed in the body
    /// capture that iteration's binding; the copy is written back before
    /// the increment clause runs.
    fn execute_for(
        &mut self,
        initializer: Option<&Stmt>,
        condition: Option<&Expr>,
        increment: Option<&Expr>,
        body: &Stmt,
    ) -> ExecResult<()> {
        let mut loop_var: Option<String> = None;

        if let Some(init) = initializer {
            if let Stmt::Let { name, .. } = init {
                loop_var = Some(name.lexeme.clone());
            }

            self.execute(init)?;
        }

        loop {
            if let Some(cond) = condition {
                if !is_truthy(&self.evaluate(cond)?) {
                    break;
                }
            }

            // Per-iteration frame (the resolver declares the loop variable
            // in a matching per-iteration scope).
            let iter_env = Rc::new(RefCell::new(Environment::with_enclosing(
                self.environment.clone(),
            )));

            if let Some(name) = &loop_var {
                if let Some(value) = self.environment.borrow().get_here(name) {
                    iter_env.borrow_mut().define(name, value);
                }
            }

            let saved = self.environment.clone();
            self.environment = iter_env.clone();
            let result = self.execute(body);
            self.environment = saved;

            match result {
                // continue still runs the write-back and increment below
                Ok(()) | Err(Interrupt::Continue(_)) => {}
                Err(Interrupt::Break(_)) => break,
                Err(other) => return Err(other),
            }

            if let Some(name) = &loop_var {
                if let Some(updated) = iter_env.borrow().get_here(name) {
                    self.environment.borrow_mut().assign_here(name, updated);
                }
            }

            if let Some(incr) = increment {
                self.evaluate(incr)?;
            }
        }

        Ok(())
    }

    /// Evaluate the subject once, pick the first matching `case` (else
    /// `default`), then run that branch and every later branch in source
    /// order until a `break` is consumed or the arms run out.
    fn execute_switch(&mut self, subject: &Expr, branches: &[SwitchBranch]) -> ExecResult<()> {
        let value = self.evaluate(subject)?;

        let mut start = branches.iter().position(|branch| {
            branch
                .label
                .as_ref()
                .is_some_and(|lit| literal_to_value(lit) == value)
        });

        if start.is_none() {
            start = branches.iter().position(|branch| branch.label.is_none());
        }

        let Some(start) = start else {
            return Ok(());
        };

        // One frame for the whole switch body, matching the resolver's
        // single scope across all arms.
        let previous = self.environment.clone();
        self.environment = Rc::new(RefCell::new(Environment::with_enclosing(previous.clone())));

        let mut result = Ok(());

        'arms: for branch in &branches[start..] {
            for stmt in &branch.body {
                match self.execute(stmt) {
                    Ok(()) => {}

                    Err(Interrupt::Break(_)) => break 'arms,

                    Err(other) => {
                        result = Err(other);
                        break 'arms;
                    }
                }
            }
        }

        self.environment = previous;
        result
    }

    /// Declare a name in the current frame, erroring on redefinition
    /// within that frame (shadowing in an inner frame is fine).
    fn define_checked(&mut self, name: &Token, value: Value) -> ExecResult<()> {
        if self.environment.borrow().defined_here(&name.lexeme) {
            return Err(Interrupt::Error(RuntimeError::new(
                name,
                format!("Variable '{}' already exists in this scope", name.lexeme),
            )));
        }

        self.environment.borrow_mut().define(&name.lexeme, value);
        Ok(())
    }

    // ───────────────────────── expression evaluation ────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> ExecResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(literal_to_value(lit)),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_val = self.evaluate(left)?;

                // Short-circuit: the left value itself is the result when it
                // decides the outcome.
                match operator.token_type {
                    TokenType::OR if is_truthy(&left_val) => Ok(left_val),
                    TokenType::AND if !is_truthy(&left_val) => Ok(left_val),
                    _ => self.evaluate(right),
                }
            }

            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }

            Expr::Variable { name, id } => self.lookup_variable(name, *id),

            Expr::Assign { name, value, id } => {
                let val = self.evaluate(value)?;

                let assigned = match self.locals.get(id) {
                    Some(&distance) => Environment::assign_at(
                        &self.environment,
                        distance,
                        &name.lexeme,
                        val.clone(),
                    ),
                    None => self
                        .globals
                        .borrow_mut()
                        .assign_here(&name.lexeme, val.clone()),
                };

                if assigned {
                    Ok(val)
                } else {
                    Err(Interrupt::Error(RuntimeError::new(
                        name,
                        format!("Undefined variable '{}'", name.lexeme),
                    )))
                }
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_val = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }

                self.invoke_callable(&callee_val, paren, &args)
            }

            Expr::Get { object, name } => {
                let object = self.evaluate(object)?;

                let Value::Instance(instance) = object else {
                    return Err(Interrupt::Error(RuntimeError::new(
                        name,
                        "Only instances have properties",
                    )));
                };

                // Fields first, then the class's method table; each method
                // access yields a freshly bound callable.
                if let Some(value) = instance.borrow().field(&name.lexeme) {
                    return Ok(value);
                }

                let class = instance.borrow().class();
                match class.find_method(&name.lexeme) {
                    Some(method) => Ok(Value::Function(Rc::new(method.bind(&instance)))),

                    None => Err(Interrupt::Error(RuntimeError::new(
                        name,
                        format!("Undefined property '{}'", name.lexeme),
                    ))),
                }
            }

            Expr::Set {
                object,
                name,
                value,
            } => {
                let object = self.evaluate(object)?;

                let Value::Instance(instance) = object else {
                    return Err(Interrupt::Error(RuntimeError::new(
                        name,
                        "Only instances have fields",
                    )));
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set_field(&name.lexeme, value.clone());
                Ok(value)
            }

            Expr::SelfRef { keyword, id } => self.lookup_variable(keyword, *id),
        }
    }

    /// Read a variable through the resolver's recorded distance, or from
    /// the global frame when no distance was recorded.
    fn lookup_variable(&self, name: &Token, id: usize) -> ExecResult<Value> {
        let value = match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, &name.lexeme),
            None => self.globals.borrow().get_here(&name.lexeme),
        };

        match value {
            Some(Value::Uninit) => Err(Interrupt::Error(RuntimeError::new(
                name,
                format!("Variable '{}' has not been initialized", name.lexeme),
            ))),

            Some(value) => Ok(value),

            None => Err(Interrupt::Error(RuntimeError::new(
                name,
                format!("Undefined variable '{}'", name.lexeme),
            ))),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> ExecResult<Value> {
        let right_val = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right_val {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(Interrupt::Error(RuntimeError::new(
                    operator,
                    "Operand must be a number",
                ))),
            },

            TokenType::NOT => Ok(Value::Bool(!is_truthy(&right_val))),

            TokenType::TILDE => {
                let n = bitwise_operand(operator, &right_val)?;
                Ok(Value::Number(f64::from(!n)))
            }

            _ => Err(Interrupt::Error(RuntimeError::new(
                operator,
                "Invalid unary operator",
            ))),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> ExecResult<Value> {
        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (&left_val, &right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),

                // Either operand a string → concatenate display forms.
                (Value::Str(_), _) | (_, Value::Str(_)) => {
                    Ok(Value::Str(format!("{}{}", left_val, right_val)))
                }

                _ => Err(Interrupt::Error(RuntimeError::new(
                    operator,
                    "Addition operation not supported for operands",
                ))),
            },

            TokenType::MINUS => {
                let (a, b) = check_numbers(operator, &left_val, &right_val)?;
                Ok(Value::Number(a - b))
            }

            TokenType::STAR => {
                let (a, b) = check_numbers(operator, &left_val, &right_val)?;
                Ok(Value::Number(a * b))
            }

            TokenType::SLASH => {
                let (a, b) = check_numbers(operator, &left_val, &right_val)?;

                if b == 0.0 {
                    return Err(Interrupt::Error(RuntimeError::new(
                        operator,
                        "Cannot divide by zero",
                    )));
                }

                Ok(Value::Number(a / b))
            }

            TokenType::PERCENT => {
                let (a, b) = check_numbers(operator, &left_val, &right_val)?;

                if b == 0.0 {
                    return Err(Interrupt::Error(RuntimeError::new(
                        operator,
                        "Cannot divide by zero",
                    )));
                }

                Ok(Value::Number(a % b))
            }

            TokenType::STAR_STAR => {
                let (a, b) = check_numbers(operator, &left_val, &right_val)?;
                Ok(Value::Number(a.powf(b)))
            }

            TokenType::AMP => {
                let a = bitwise_operand(operator, &left_val)?;
                let b = bitwise_operand(operator, &right_val)?;
                Ok(Value::Number(f64::from(a & b)))
            }

            TokenType::PIPE => {
                let a = bitwise_operand(operator, &left_val)?;
                let b = bitwise_operand(operator, &right_val)?;
                Ok(Value::Number(f64::from(a | b)))
            }

            TokenType::CARET => {
                let a = bitwise_operand(operator, &left_val)?;
                let b = bitwise_operand(operator, &right_val)?;
                Ok(Value::Number(f64::from(a ^ b)))
            }

            TokenType::GREATER => compare(operator, &left_val, &right_val, |ord| ord > 0),

            TokenType::GREATER_EQUAL => compare(operator, &left_val, &right_val, |ord| ord >= 0),

            TokenType::LESS => compare(operator, &left_val, &right_val, |ord| ord < 0),

            TokenType::LESS_EQUAL => compare(operator, &left_val, &right_val, |ord| ord <= 0),

            TokenType::EQUAL => Ok(Value::Bool(is_equal(&left_val, &right_val))),

            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left_val, &right_val))),

            _ => Err(Interrupt::Error(RuntimeError::new(
                operator,
                "Invalid binary operator",
            ))),
        }
    }

    // ───────────────────────────── call machinery ───────────────────────────

    /// Invokes a callable (native function, user function, or class).
    fn invoke_callable(
        &mut self,
        callee: &Value,
        paren: &Token,
        args: &[Value],
    ) -> ExecResult<Value> {
        match callee {
            Value::NativeFunction { name, arity, func } => {
                debug!("Calling native function '{}'", name);

                check_arity(paren, *arity, args.len())?;

                func(args)
                    .map_err(|msg| Interrupt::Error(RuntimeError::new(paren, msg)))
            }

            Value::Function(function) => self.call_function(function, paren, args),

            Value::Class(class) => {
                debug!("Instantiating class '{}'", class.name);

                check_arity(paren, class.arity(), args.len())?;

                let instance = Rc::new(RefCell::new(Instance::new(class.clone())));

                if let Some(init) = class.find_method("init") {
                    let bound = init.bind(&instance);
                    self.call_function(&bound, paren, args)?;
                }

                Ok(Value::Instance(instance))
            }

            _ => Err(Interrupt::Error(RuntimeError::new(
                paren,
                "Can only call functions and classes",
            ))),
        }
    }

    /// Call a user function: fresh frame parented to the *captured closure*
    /// (not the caller's frame), parameters bound positionally, `return`
    /// consumed at exactly this boundary.
    fn call_function(
        &mut self,
        function: &Function,
        paren: &Token,
        args: &[Value],
    ) -> ExecResult<Value> {
        debug!("Calling function '{}'", function.decl.name.lexeme);

        check_arity(paren, function.arity(), args.len())?;

        let mut env = Environment::with_enclosing(function.closure.clone());

        for (param, arg) in function.decl.params.iter().zip(args.iter()) {
            env.define(&param.lexeme, arg.clone());
        }

        let result = self.execute_block(&function.decl.body, Rc::new(RefCell::new(env)));

        match result {
            Ok(()) => {
                if function.is_initializer {
                    Ok(self.bound_self(function))
                } else {
                    Ok(Value::Nil)
                }
            }

            Err(Interrupt::Return { value, .. }) => {
                // An initializer yields its instance no matter what its
                // body returned.
                if function.is_initializer {
                    Ok(self.bound_self(function))
                } else {
                    Ok(value)
                }
            }

            Err(other) => Err(other),
        }
    }

    /// The instance an initializer was bound to (frame 0 of its closure).
    fn bound_self(&self, function: &Function) -> Value {
        function
            .closure
            .borrow()
            .get_here("self")
            .unwrap_or(Value::Nil)
    }
}

// ───────────────────────────── value helpers ───────────────────────────────

/// Materialize an AST literal as a runtime value.
fn literal_to_value(lit: &LiteralValue) -> Value {
    match lit {
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::Str(s) => Value::Str(s.clone()),
        LiteralValue::True => Value::Bool(true),
        LiteralValue::False => Value::Bool(false),
        LiteralValue::Nil => Value::Nil,
    }
}

/// nil and false are falsy; every other value (including 0 and "") is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        _ => true,
    }
}

/// Total equality: nil equals only nil, no numeric/string coercion,
/// callables and instances compare by identity.
fn is_equal(left: &Value, right: &Value) -> bool {
    left == right
}

fn check_arity(paren: &Token, expected: usize, actual: usize) -> ExecResult<()> {
    if actual != expected {
        return Err(Interrupt::Error(RuntimeError::new(
            paren,
            format!("Expected {} arguments but got {}", expected, actual),
        )));
    }

    Ok(())
}

fn check_numbers(operator: &Token, left: &Value, right: &Value) -> ExecResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(Interrupt::Error(RuntimeError::new(
            operator,
            "Operands must be numbers",
        ))),
    }
}

/// Bitwise operands must be numbers with no fractional part and no
/// infinity; the operation runs in 32-bit space.
fn bitwise_operand(operator: &Token, value: &Value) -> Result<i32, Interrupt> {
    match value {
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(*n as i32),

        Value::Number(_) => Err(Interrupt::Error(RuntimeError::new(
            operator,
            "Bitwise operand must be an integer",
        ))),

        _ => Err(Interrupt::Error(RuntimeError::new(
            operator,
            "Operands must be numbers",
        ))),
    }
}

/// Ordering: defined for two numbers or two strings (lexicographic).
fn compare(
    operator: &Token,
    left: &Value,
    right: &Value,
    test: fn(i8) -> bool,
) -> ExecResult<Value> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => {
            return Err(Interrupt::Error(RuntimeError::new(
                operator,
                "Comparison not supported for operands",
            )));
        }
    };

    match ordering {
        Some(ord) => Ok(Value::Bool(test(ord as i8))),

        // NaN comparisons are false for every relational operator.
        None => Ok(Value::Bool(false)),
    }
}
