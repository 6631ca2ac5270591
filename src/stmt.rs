//! Statement nodes for the Rill AST.

use std::rc::Rc;

use crate::expr::{Expr, LiteralValue};
use crate::token::Token;

/// A function declaration shared between the statement that introduced it
/// and every closure value created from it.  The `Rc` lets function values
/// outlive the statement list they were parsed from (the REPL drops each
/// line's AST after running it; captured functions keep their body alive).
#[derive(Debug)]
pub struct FunctionDecl {
    pub name: Token,

    /// Parameter name tokens (arity ≤ 8, enforced by the parser).
    pub params: Vec<Token>,

    /// Body executed when the function is called.
    pub body: Vec<Stmt>,
}

/// One `case literal:` or `default:` arm of a switch statement, together
/// with the statements that follow it up to the next label.
///
/// `label` is `None` for the `default` arm -- a sentinel outside the
/// language's value space, so a literal `"default"` string case stays an
/// ordinary case.
#[derive(Debug, Clone)]
pub struct SwitchBranch {
    pub label: Option<LiteralValue>,
    pub body: Vec<Stmt>,
}

/// **Abstract-syntax-tree node** for *statements* (complete executable
/// constructs).  A program is a sequence of these nodes returned by
/// [`crate::parser::Parser::parse`].
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Stand-alone expression terminated by a semicolon.
    Expression(Expr),

    /// `print` statement used for output.
    Print(Expr),

    /// Variable declaration: `"let" IDENT (":=" initializer)? ";"`.
    /// Without an initializer the binding is created in the uninitialized
    /// state; reading it before assignment is a runtime error.
    Let {
        name: Token,
        initializer: Option<Expr>,
    },

    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt>),

    /// `if` / `else` conditional.
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// `while` loop.
    While { condition: Expr, body: Box<Stmt> },

    /// `do ... while (...)` loop; the body runs before the first test.
    DoWhile { condition: Expr, body: Box<Stmt> },

    /// C-style `for` with optional clauses.
    For {
        initializer: Option<Box<Stmt>>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Box<Stmt>,
    },

    /// Function declaration - becomes a first-class callable value.
    Function(Rc<FunctionDecl>),

    /// `return` statement inside a function body.
    Return {
        /// The `return` keyword token (for error locations).
        keyword: Token,

        /// Optional expression to return.
        /// Absent ⇒ `nil` is returned.
        value: Option<Expr>,
    },

    /// `break ;` -- stops the nearest enclosing loop or switch.
    Break(Token),

    /// `continue ;` -- stops the current iteration of the nearest loop.
    Continue(Token),

    /// `switch` dispatch with fallthrough between branches.
    Switch {
        subject: Expr,
        branches: Vec<SwitchBranch>,
    },

    /// Class declaration: a name and its method declarations.
    Class {
        name: Token,
        methods: Vec<Rc<FunctionDecl>>,
    },
}
