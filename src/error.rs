//! Centralised static-error hierarchy for the **Rill interpreter**.
//!
//! The scanner, parser, and resolver convert their failure modes into one of
//! the variants defined here.  This enables a uniform `Result<T>` alias
//! throughout the crate and ergonomic inter-operation with `anyhow`, while
//! still preserving rich diagnostic detail (1-based line and column).
//!
//! Runtime errors are a different animal: they carry the offending token and
//! travel through the interpreter's signal channel (see `interpreter`).
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::debug;

use crate::token::{Token, TokenType};

/// Canonical static-error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RillError {
    /// Lexical (scanner) error with source position information.
    #[error("[line {line}, col {col}] Error: {message}")]
    Lex {
        /// Human-readable description.
        message: String,

        /// 1-based line where the error occurred.
        line: usize,

        /// 1-based column where the error occurred.
        col: usize,
    },

    /// Syntactic (parser) error.
    #[error("[line {line}, col {col}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        col: usize,

        /// " at 'lexeme'" or " at end", filled in from the offending token.
        location: String,
    },

    /// Static-analysis or resolution failure (e.g. early-binding errors).
    #[error("[line {line}, col {col}] Error{location}: {message}")]
    Resolve {
        message: String,
        line: usize,
        col: usize,
        location: String,
    },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF-8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl RillError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, col: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Lex error: line={}, col={}, msg={}", line, col, message);

        RillError::Lex { message, line, col }
    }

    /// Helper constructor for the **parser**.  `location` describes the
    /// offending token (`" at ':='"`, `" at end"`).
    pub fn parse<S: Into<String>>(line: usize, col: usize, location: String, msg: S) -> Self {
        let message: String = msg.into();

        debug!(
            "Creating Parse error: line={}, col={}, msg={}",
            line, col, message
        );

        RillError::Parse {
            message,
            line,
            col,
            location,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(line: usize, col: usize, location: String, msg: S) -> Self {
        let message: String = msg.into();

        debug!(
            "Creating Resolve error: line={}, col={}, msg={}",
            line, col, message
        );

        RillError::Resolve {
            message,
            line,
            col,
            location,
        }
    }

    /// Parser error anchored to a token.
    pub fn parse_at<S: Into<String>>(token: &Token, msg: S) -> Self {
        Self::parse(token.line, token.col, Self::location(token), msg)
    }

    /// Resolver error anchored to a token.
    pub fn resolve_at<S: Into<String>>(token: &Token, msg: S) -> Self {
        Self::resolve(token.line, token.col, Self::location(token), msg)
    }

    /// " at 'lexeme'", or " at end" for the EOF token.
    fn location(token: &Token) -> String {
        if token.token_type == TokenType::EOF {
            " at end".to_string()
        } else {
            format!(" at '{}'", token.lexeme)
        }
    }
}

/// Crate-wide `Result` alias for static-analysis phases.
pub type Result<T> = std::result::Result<T, RillError>;
