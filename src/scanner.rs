//! Module `scanner` implements a one-pass, streaming lexer for the Rill
//! language.
//!
//! It transforms a byte slice (`&[u8]`) into a sequence of [`Token`]s,
//! skipping whitespace and comments, and emitting exactly one `EOF` token at
//! the end.  Designed as a `FusedIterator`, it can be chained safely with
//! other iterator adapters.  Errors are yielded in-stream as `Err` items and
//! never stop the scan: the driver reports them and keeps pulling, so every
//! token-level problem in a file surfaces in one pass.
//!
//! Recognized surface:
//! - single-character punctuators and operators, including the bitwise set
//!   (`&`, `|`, `^`, `~`) and the conditional pair (`?`, `:`)
//! - two-character operators: `:=` (assignment), `**` (exponent), `!=`,
//!   `<=`, `>=`
//! - `#` line comments (bulk-skipped with `memchr`) and `/* ... */` block
//!   comments with nesting
//! - string literals (no escapes, may not cross a newline), numeric
//!   literals (integer and decimal, stored as `f64`), identifiers, and a
//!   perfect-hash keyword table
//!
//! Both line and column are tracked per byte, 1-based, for diagnostics.

use crate::error::{RillError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile-time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"      => TokenType::AND,
    b"or"       => TokenType::OR,
    b"not"      => TokenType::NOT,
    b"if"       => TokenType::IF,
    b"else"     => TokenType::ELSE,
    b"true"     => TokenType::TRUE,
    b"false"    => TokenType::FALSE,
    b"let"      => TokenType::LET,
    b"define"   => TokenType::DEFINE,
    b"for"      => TokenType::FOR,
    b"while"    => TokenType::WHILE,
    b"do"       => TokenType::DO,
    b"nil"      => TokenType::NIL,
    b"return"   => TokenType::RETURN,
    b"break"    => TokenType::BREAK,
    b"continue" => TokenType::CONTINUE,
    b"print"    => TokenType::PRINT,
    b"class"    => TokenType::CLASS,
    b"self"     => TokenType::SELF,
    b"switch"   => TokenType::SWITCH,
    b"case"     => TokenType::CASE,
    b"default"  => TokenType::DEFAULT,
};

/// A single-pass **scanner / lexer** that converts raw source bytes into a
/// sequence of [`Token`]s.  Lexemes are copied out of the buffer so tokens
/// (and the AST built from them) can outlive the source line, which the REPL
/// relies on.
pub struct Scanner<'a> {
    src: &'a [u8],              // entire source buffer
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1-based line counter
    col: usize,                 // 1-based column of the *next* byte
    start_line: usize,          // line where the current lexeme begins
    start_col: usize,           // column where the current lexeme begins
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            col: 1,
            start_line: 1,
            start_col: 1,
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Return the length of the input slice.
    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it, updating the line/column counters.
    /// *Panics* if called at EOF -- higher-level code always guards with
    /// [`Self::is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;

        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }

        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` if past
    /// EOF to avoid branching at call-site.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Peek one byte beyond [`Self::peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    /// Returns `true` on success so callers can branch inline without an else.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces
    /// an actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single-character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b',' => self.pending = Some(TokenType::COMMA),
            b'.' => self.pending = Some(TokenType::DOT),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'+' => self.pending = Some(TokenType::PLUS),
            b'%' => self.pending = Some(TokenType::PERCENT),
            b'&' => self.pending = Some(TokenType::AMP),
            b'|' => self.pending = Some(TokenType::PIPE),
            b'^' => self.pending = Some(TokenType::CARET),
            b'~' => self.pending = Some(TokenType::TILDE),
            b'?' => self.pending = Some(TokenType::QUESTION),
            b'=' => self.pending = Some(TokenType::EQUAL),

            // ── two-character operators ──────────────────────────────────
            b'*' => {
                let tt = if self.match_byte(b'*') {
                    TokenType::STAR_STAR
                } else {
                    TokenType::STAR
                };

                self.pending = Some(tt);
            }

            b':' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::ASSIGN
                } else {
                    TokenType::COLON
                };

                self.pending = Some(tt);
            }

            // '!' only exists as part of '!='; logical not is the keyword `not`.
            b'!' => {
                if self.match_byte(b'=') {
                    self.pending = Some(TokenType::BANG_EQUAL);
                } else {
                    return Err(RillError::lex(
                        self.start_line,
                        self.start_col,
                        "Unexpected character: !",
                    ));
                }
            }

            b'<' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            b'>' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' | b'\n' => {
                return Ok(()); // advance() already tracked the newline
            }

            // ── comments ─────────────────────────────────────────────────
            b'#' => {
                // Fast-forward to the next newline using `memchr`; the
                // newline itself is left for the main loop so line/col
                // bookkeeping stays in one place.  If none found, skip to EOF.
                if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                    self.curr += pos;
                    self.col += pos;
                } else {
                    self.col += self.len() - self.curr;
                    self.curr = self.len();
                }

                return Ok(());
            }

            b'/' => {
                if self.match_byte(b'*') {
                    return self.skip_block_comment();
                }

                self.pending = Some(TokenType::SLASH);
            }

            // ── string literal " ... " ───────────────────────────────────
            b'"' => {
                return self.parse_string();
            }

            // ── number literal (digit-leading) ───────────────────────────
            b'0'..=b'9' => {
                self.parse_number();
            }

            // ── identifiers / keywords (alpha or underscore-leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                return Err(RillError::lex(
                    self.start_line,
                    self.start_col,
                    format!("Unexpected character: {}", b as char),
                ));
            }
        }

        Ok(())
    }

    /// Skip a `/* ... */` block comment, honouring nesting.  The opening
    /// `/*` has already been consumed; an unterminated comment is an error
    /// anchored at its opening position, and the scan resumes at EOF.
    fn skip_block_comment(&mut self) -> Result<()> {
        let mut depth: usize = 1;

        while depth > 0 {
            if self.is_at_end() {
                return Err(RillError::lex(
                    self.start_line,
                    self.start_col,
                    "Unterminated block comment.",
                ));
            }

            let b = self.advance();

            if b == b'/' && self.match_byte(b'*') {
                depth += 1;
            } else if b == b'*' && self.match_byte(b'/') {
                depth -= 1;
            }
        }

        Ok(())
    }

    /// Parse a double-quoted string literal.  No escape sequences; the
    /// string may not cross a newline.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' && self.peek() != b'\n' {
            self.advance();
        }

        if self.is_at_end() || self.peek() == b'\n' {
            // Leave the newline for the main loop; lexing resumes after it.
            return Err(RillError::lex(
                self.start_line,
                self.start_col,
                "Unterminated string.",
            ));
        }

        self.advance(); // consume closing quote

        // Slice excluding the surrounding quotes.
        let slice: &[u8] = &self.src[self.start + 1..self.curr - 1];

        // SAFETY: the original source is valid UTF-8 (guaranteed by caller).
        let s: &str = unsafe { std::str::from_utf8_unchecked(slice) };

        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Optional fractional part.
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let slice: &[u8] = &self.src[self.start..self.curr];
        let s: &str = unsafe { std::str::from_utf8_unchecked(slice) };
        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // parse never fails (checked digits)
        self.pending = Some(TokenType::NUMBER(n));
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we either emit a token, hit EOF, or see an error.
        while self.curr <= self.len() {
            // 1. EOF guard -- emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1; // ensure fused semantics
                return Some(Ok(Token::new(TokenType::EOF, "", self.line, self.col)));
            }

            // 2. Reset per-token state.
            self.start = self.curr;
            self.start_line = self.line;
            self.start_col = self.col;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                let slice: &[u8] = &self.src[self.start..self.curr];
                let lex: &str = unsafe { std::str::from_utf8_unchecked(slice) };
                debug!("Scanned token ({:?}) on line {}", tt, self.start_line);

                return Some(Ok(Token::new(tt, lex, self.start_line, self.start_col)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
