use log::debug;
use serde::Serialize;
use std::fmt;
use std::mem;

/// The kinds of tokens the Kaleidoscope scanner produces.
///
/// `Number` carries its parsed value and `Unknown` carries the character
/// that matched no other rule. Keywords and identifiers are distinguished
/// by kind only; their text lives in [`Token::lexeme`].
#[derive(Debug, Clone, Copy, Serialize)]
pub enum TokenKind {
    /// End of input
    Eof,

    /// 'def'
    Def,

    /// 'extern'
    Extern,

    /// A user‑defined name
    Identifier,

    /// A numeric literal
    Number(f64),

    /// Any character no other rule claims, e.g. '(' or '+'
    Unknown(char),
}

impl TokenKind {
    /// Upper‑case variant name, used in the textual token dump.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Def => "DEF",
            TokenKind::Extern => "EXTERN",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number(_) => "NUMBER",
            TokenKind::Unknown(_) => "UNKNOWN",
        }
    }

    /// Classic integer token code: negative for the named kinds, the code
    /// point itself for an unknown character.
    pub fn code(&self) -> i32 {
        match self {
            TokenKind::Eof => -1,
            TokenKind::Def => -2,
            TokenKind::Extern => -3,
            TokenKind::Identifier => -4,
            TokenKind::Number(_) => -5,
            TokenKind::Unknown(c) => *c as i32,
        }
    }
}

impl PartialEq for TokenKind {
    /// Two kinds are equal if they share the same variant, payloads ignored.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token with the slice of source that produced it.
///
/// Equality goes through [`TokenKind`]'s variant-only comparison, so a
/// `Number` payload is never compared directly. The lexeme is compared,
/// and a lexeme determines its value, so tokens scanned from source that
/// differ in value always differ in lexeme too.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,

    /// The exact substring from the source that produced this token.
    pub lexeme: &'a str,

    /// 1‑based line number in the source.
    pub line: usize,

    /// 1‑based column, counted in characters.
    pub column: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, line: usize, column: usize) -> Self {
        debug!(
            "Creating new token: kind={:?}, lexeme={:?}, line={}, column={}",
            kind, lexeme, line, column
        );

        Self {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

/// Writes a number the way the token dump expects: `3` → `3.0`, `3.14` → `3.14`.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        let mut buf = itoa::Buffer::new();
        write!(f, "{}.0", buf.format(n as i64))
    } else if n.fract() == 0.0 {
        write!(f, "{}.0", n)
    } else {
        write!(f, "{}", n)
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.kind.name(), self.lexeme)?;

        match self.kind {
            TokenKind::Number(n) => write_number(f, n),
            _ => f.write_str("null"),
        }
    }
}
