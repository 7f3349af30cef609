//! Error hierarchy for the **kaleido** front end.
//!
//! The scanner, the source loader and the stack unwinder all report failures
//! through [`KaleidoError`]. The binary wraps these in `anyhow` at the edge.
//!
//! The module **does not** print diagnostics itself; callers decide where
//! an error is reported.

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KaleidoError {
    /// Lexical (scanner) error with source position.
    #[error("[line {line}, column {column}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the lexeme starts.
        line: usize,

        /// 1‑based column (in characters) where the lexeme starts.
        column: usize,
    },

    /// The call stack could not be walked.
    #[error("Unwind error: {0}")]
    Unwind(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Source text was not valid UTF‑8.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl KaleidoError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, column: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Lex error: line={}, column={}, msg={}",
            line, column, message
        );

        KaleidoError::Lex {
            message,
            line,
            column,
        }
    }

    /// Helper constructor for the **unwinder**.
    pub fn unwind<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Unwind error: msg={}", message);

        KaleidoError::Unwind(message)
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, KaleidoError>;
