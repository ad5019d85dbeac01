//! Centralised error hierarchy for the **syntax analyser**.
//!
//! The scanner, the parsing engine, the stock notification sinks and the CLI
//! all convert their failure modes into one of the variants defined here, so a
//! single `Result<T>` alias flows through the crate and plays well with
//! `anyhow` in the binary.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the analyser.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Grammar mismatch raised by a notification sink.
    #[error("[line {line}] Error: {message}")]
    Parse { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl AnalysisError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        AnalysisError::Lex { message, line }
    }

    /// Helper constructor for grammar mismatches.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        AnalysisError::Parse { message, line }
    }

    /// Source line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            AnalysisError::Lex { line, .. } | AnalysisError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, AnalysisError>;
