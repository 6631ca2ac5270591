use log::debug;
use serde::Serialize;
use std::fmt;
use std::mem;

/// The different kinds of tokens recognized by the Rill scanner.
///
/// Variants without data represent operators and keywords.
/// `STRING(String)` and `NUMBER(f64)` carry their literal values.
/// `IDENTIFIER` is used for user-defined names.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '{'
    LEFT_BRACE,

    /// '}'
    RIGHT_BRACE,

    /// ','
    COMMA,

    /// '.'
    DOT,

    /// ';'
    SEMICOLON,

    /// '-'
    MINUS,

    /// '+'
    PLUS,

    /// '/'
    SLASH,

    /// '*'
    STAR,

    /// '**'
    STAR_STAR,

    /// '%'
    PERCENT,

    /// ':=' (assignment)
    ASSIGN,

    /// '=' (equality test)
    EQUAL,

    /// '!='
    BANG_EQUAL,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// '&'
    AMP,

    /// '|'
    PIPE,

    /// '^'
    CARET,

    /// '~'
    TILDE,

    /// '?'
    QUESTION,

    /// ':' (conditional else branch, case labels)
    COLON,

    /// A user-defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes)
    STRING(String),

    /// A numeric literal
    #[serde(rename = "NUMBER")]
    NUMBER(f64),

    /// 'and'
    AND,

    /// 'or'
    OR,

    /// 'not'
    NOT,

    /// 'if'
    IF,

    /// 'else'
    ELSE,

    /// 'true'
    TRUE,

    /// 'false'
    FALSE,

    /// 'let'
    LET,

    /// 'define'
    DEFINE,

    /// 'for'
    FOR,

    /// 'while'
    WHILE,

    /// 'do'
    DO,

    /// 'nil'
    NIL,

    /// 'return'
    RETURN,

    /// 'break'
    BREAK,

    /// 'continue'
    CONTINUE,

    /// 'print'
    PRINT,

    /// 'class'
    CLASS,

    /// 'self'
    SELF,

    /// 'switch'
    SWITCH,

    /// 'case'
    CASE,

    /// 'default'
    DEFAULT,

    /// End-of-file marker
    EOF,
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token: its kind, the original lexeme, and the 1-based
/// line/column where it starts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: String,

    /// 1-based line number in the source.
    pub line: usize,

    /// 1-based column of the first character of the lexeme.
    pub col: usize,
}

impl Token {
    /// Create a new Token with the given type, lexeme, and position.
    pub fn new<S: Into<String>>(token_type: TokenType, lexeme: S, line: usize, col: usize) -> Self {
        let lexeme: String = lexeme.into();

        debug!(
            "Creating token: type={:?}, lexeme={}, line={}, col={}",
            token_type, lexeme, line, col
        );

        Self {
            token_type,
            lexeme,
            line,
            col,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ── 1. literal payload, if any ─────────────────────────────────────
        let literal_str: String = match &self.token_type {
            TokenType::STRING(s) => s.clone(),
            TokenType::NUMBER(n) => {
                // 3 → "3.0", 3.14 → "3.14"
                if n.fract() == 0.0 {
                    let mut buf: itoa::Buffer = itoa::Buffer::new();
                    format!("{}.0", buf.format(*n as i64))
                } else {
                    n.to_string()
                }
            }
            _ => "null".to_string(),
        };

        // ── 2. variant name without payloads ───────────────────────────────
        let variant: &'static str = match self.token_type {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::LEFT_BRACE => "LEFT_BRACE",
            TokenType::RIGHT_BRACE => "RIGHT_BRACE",
            TokenType::COMMA => "COMMA",
            TokenType::DOT => "DOT",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::MINUS => "MINUS",
            TokenType::PLUS => "PLUS",
            TokenType::SLASH => "SLASH",
            TokenType::STAR => "STAR",
            TokenType::STAR_STAR => "STAR_STAR",
            TokenType::PERCENT => "PERCENT",
            TokenType::ASSIGN => "ASSIGN",
            TokenType::EQUAL => "EQUAL",
            TokenType::BANG_EQUAL => "BANG_EQUAL",
            TokenType::GREATER => "GREATER",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::LESS => "LESS",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::AMP => "AMP",
            TokenType::PIPE => "PIPE",
            TokenType::CARET => "CARET",
            TokenType::TILDE => "TILDE",
            TokenType::QUESTION => "QUESTION",
            TokenType::COLON => "COLON",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::STRING(_) => "STRING",
            TokenType::NUMBER(_) => "NUMBER",
            TokenType::AND => "AND",
            TokenType::OR => "OR",
            TokenType::NOT => "NOT",
            TokenType::IF => "IF",
            TokenType::ELSE => "ELSE",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::LET => "LET",
            TokenType::DEFINE => "DEFINE",
            TokenType::FOR => "FOR",
            TokenType::WHILE => "WHILE",
            TokenType::DO => "DO",
            TokenType::NIL => "NIL",
            TokenType::RETURN => "RETURN",
            TokenType::BREAK => "BREAK",
            TokenType::CONTINUE => "CONTINUE",
            TokenType::PRINT => "PRINT",
            TokenType::CLASS => "CLASS",
            TokenType::SELF => "SELF",
            TokenType::SWITCH => "SWITCH",
            TokenType::CASE => "CASE",
            TokenType::DEFAULT => "DEFAULT",
            TokenType::EOF => "EOF",
        };

        write!(f, "{} {} {}", variant, self.lexeme, literal_str)
    }
}
