//! Module `scanner` implements the one‑pass Kaleidoscope lexer.
//!
//! It turns a `&str` into a stream of [`Token`]s, one character at a time,
//! skipping whitespace and `#` comments and emitting exactly one `Eof` token
//! at the end. The scanner is a `FusedIterator`, so it chains safely with
//! other iterator adapters.
//!
//! # Token rules
//!
//! - Identifiers: an ASCII letter followed by ASCII alphanumerics. `def` and
//!   `extern` are resolved to keywords through a perfect‑hash `KEYWORDS` map.
//! - Numbers: a run of digits and `.`, parsed as `f64`. A run that does not
//!   parse (`1.2.3`) is reported as an error and scanning continues after it.
//! - Comments: `#` to end of line, skipped with `memchr`.
//! - Anything else becomes `Unknown(c)`; the caller (a parser, eventually)
//!   decides what `(`, `+` or `;` mean.
//!
//! # Example
//!
//! ```rust
//! use kaleido::scanner::Scanner;
//!
//! for result in Scanner::new("def foo(x) x") {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("{}", err),
//!     }
//! }
//! ```

use crate::error::{KaleidoError, Result};
use crate::token::{Token, TokenKind};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

static KEYWORDS: phf::Map<&'static [u8], TokenKind> = phf_map! {
    b"def"    => TokenKind::Def,
    b"extern" => TokenKind::Extern,
};

/// A single pass lexer. The lifetime `'a` ties every emitted token's
/// `lexeme` back to the original source text.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    start: usize,               // byte index of the first byte of the current lexeme
    curr: usize,                // byte index one past the last byte examined
    line: usize,                // 1‑based line counter
    column: usize,              // 1‑based column of `curr`, in characters
    start_column: usize,        // column of `start`
    pending: Option<TokenKind>, // recognised kind waiting to be emitted
    done: bool,                 // `Eof` already yielded
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            bytes: src.as_bytes(),
            start: 0,
            curr: 0,
            line: 1,
            column: 1,
            start_column: 1,
            pending: None,
            done: false,
        }
    }

    /// Scans only the first token of `src`.
    pub fn first_token(src: &'a str) -> Result<Token<'a>> {
        let mut scanner = Scanner::new(src);

        // A fresh scanner always yields at least `Eof`.
        scanner
            .next()
            .unwrap_or_else(|| Ok(Token::new(TokenKind::Eof, "", 1, 1)))
    }

    /// Drains a scanner over `src`, separating tokens from errors.
    pub fn tokenize(src: &'a str) -> (Vec<Token<'a>>, Vec<KaleidoError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        for result in Scanner::new(src) {
            match result {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }

        info!(
            "Tokenized {} tokens with {} errors",
            tokens.len(),
            errors.len()
        );

        (tokens, errors)
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.bytes.len()
    }

    /// Peek at the current byte without consuming it. Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.bytes[self.curr]
        }
    }

    /// Consume one full character. `curr` always sits on a char boundary.
    #[inline(always)]
    fn advance(&mut self) -> Option<char> {
        let c = self.src[self.curr..].chars().next()?;
        self.curr += c.len_utf8();

        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(c)
    }

    /// Consume ASCII bytes while `pred` holds.
    #[inline(always)]
    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_at_end() && pred(self.peek()) {
            self.curr += 1;
            self.column += 1;
        }
    }

    #[inline(always)]
    fn lexeme(&self) -> &'a str {
        &self.src[self.start..self.curr]
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan one lexeme starting at `self.curr`. Whitespace and comments
    /// leave `pending` empty.
    fn scan_token(&mut self) -> Result<()> {
        let Some(c) = self.advance() else {
            return Ok(());
        };

        match c {
            c if c.is_whitespace() => {
                debug!("Skipping whitespace {:?} (code {})", c, c as u32);
            }

            '#' => {
                match memchr(b'\n', &self.bytes[self.curr..]) {
                    Some(pos) => {
                        self.column += self.src[self.curr..self.curr + pos].chars().count();
                        self.curr += pos;
                    }
                    None => {
                        self.column += self.src[self.curr..].chars().count();
                        self.curr = self.bytes.len();
                    }
                }

                debug!("Skipped comment ending at byte {}", self.curr);
            }

            'a'..='z' | 'A'..='Z' => self.identifier(),

            '0'..='9' | '.' => return self.number(),

            other => self.pending = Some(TokenKind::Unknown(other)),
        }

        Ok(())
    }

    fn identifier(&mut self) {
        self.advance_while(|b| b.is_ascii_alphanumeric());

        let kind = KEYWORDS
            .get(self.lexeme().as_bytes())
            .copied()
            .unwrap_or(TokenKind::Identifier);

        self.pending = Some(kind);
    }

    fn number(&mut self) -> Result<()> {
        self.advance_while(|b| b.is_ascii_digit() || b == b'.');

        let text = self.lexeme();

        match text.parse::<f64>() {
            Ok(n) => {
                self.pending = Some(TokenKind::Number(n));
                Ok(())
            }
            Err(_) => Err(KaleidoError::lex(
                self.line,
                self.start_column,
                format!("Invalid number literal: {}", text),
            )),
        }
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.is_at_end() {
                self.done = true;
                debug!("Reached end of input on line {}", self.line);

                return Some(Ok(Token::new(TokenKind::Eof, "", self.line, self.column)));
            }

            self.start = self.curr;
            self.start_column = self.column;
            self.pending = None;

            let line = self.line;

            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            if let Some(kind) = self.pending.take() {
                return Some(Ok(Token::new(
                    kind,
                    self.lexeme(),
                    line,
                    self.start_column,
                )));
            }
        }

        None
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
