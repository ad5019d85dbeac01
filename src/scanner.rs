//! Module `scanner` implements a one‑pass, streaming lexer for the toy language.
//!
//! It transforms a byte slice (`&[u8]`) into a sequence of [`Token`]s, skipping whitespace
//! and comments, and emitting exactly one `EOF` token at the end. Designed as a `FusedIterator`,
//! it plugs straight into the parser as a token source.
//!
//! # Token Recognition
//!
//! - Punctuation and single‑character operators: `(`, `)`, `;`, `,`, `+`, `-`, `*`, `=`.
//! - Two‑character operators: `:=`, `/=`, `<=`, `>=` (a lone `:` is an error).
//! - String literals: `"` … `"` on a single line; unterminated strings are reported.
//! - Numeric literals: integer and optional fractional part.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash `KEYWORDS` map.
//! - Comments: `//` to end of line, skipped in bulk with `memchr`.
//! - Errors: any unexpected byte yields `AnalysisError::lex(line, message)`.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut scanner = Scanner::new(b"begin x := 1 end");
//! for result in &mut scanner {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err)  => eprintln!("Lex error: {}", err),
//!     }
//! }
//! ```

use crate::error::{AnalysisError, Result};
use crate::token::{Symbol, Token};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], Symbol> = phf_map! {
    b"begin" => Symbol::BEGIN,
    b"end"   => Symbol::END,
    b"if"    => Symbol::IF,
    b"then"  => Symbol::THEN,
    b"else"  => Symbol::ELSE,
    b"while" => Symbol::WHILE,
    b"loop"  => Symbol::LOOP,
    b"do"    => Symbol::DO,
    b"until" => Symbol::UNTIL,
    b"for"   => Symbol::FOR,
    b"call"  => Symbol::CALL,
    b"mod"   => Symbol::MOD,
};

/// A single pass **scanner** that converts raw bytes into a sequence of
/// [`Token`]s on demand.
pub struct Scanner<'a> {
    src: &'a [u8],           // entire source file (memory‑mapped by the CLI)
    start: usize,            // index of the *first* byte of the current lexeme
    curr: usize,             // index *one past* the last byte examined
    line: usize,             // 1‑based line counter (\n increments)
    pending: Option<Symbol>, // recognised symbol waiting to be emitted
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
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  *Panics* if called at EOF – higher‑level
    /// code always guards with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Current lexeme as text.
    fn lexeme(&self, from: usize, to: usize) -> Result<&'a str> {
        Ok(std::str::from_utf8(&self.src[from..to])?)
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at `self.curr`.  Tokens store their
    /// symbol in `self.pending`; whitespace and comments leave it `None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(Symbol::LEFT_PAREN),
            b')' => self.pending = Some(Symbol::RIGHT_PAREN),
            b',' => self.pending = Some(Symbol::COMMA),
            b';' => self.pending = Some(Symbol::SEMICOLON),
            b'+' => self.pending = Some(Symbol::PLUS),
            b'-' => self.pending = Some(Symbol::MINUS),
            b'*' => self.pending = Some(Symbol::TIMES),
            b'=' => self.pending = Some(Symbol::EQUAL),

            // ── two‑character operators (:=, <=, >=) ─────────────────────
            b':' => {
                if !self.match_byte(b'=') {
                    return Err(AnalysisError::lex(
                        self.line,
                        "Unexpected character: ':' (did you mean ':='?)",
                    ));
                }

                self.pending = Some(Symbol::BECOMES);
            }

            b'<' => {
                let symbol = if self.match_byte(b'=') {
                    Symbol::LESS_EQUAL
                } else {
                    Symbol::LESS
                };

                self.pending = Some(symbol);
            }

            b'>' => {
                let symbol = if self.match_byte(b'=') {
                    Symbol::GREATER_EQUAL
                } else {
                    Symbol::GREATER
                };

                self.pending = Some(symbol);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(());
            }

            b'\n' => {
                self.line += 1;

                return Ok(());
            }

            // ── '/', '/=' and comments (// … until newline) ──────────────
            b'/' => {
                if self.match_byte(b'/') {
                    if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                        self.curr += pos;
                    } else {
                        self.curr = self.len();
                    }

                    return Ok(());
                }

                let symbol = if self.match_byte(b'=') {
                    Symbol::NOT_EQUAL
                } else {
                    Symbol::DIVIDE
                };

                self.pending = Some(symbol);
            }

            b'"' => {
                return self.parse_string();
            }

            b'0'..=b'9' => {
                self.parse_number();
            }

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                self.parse_identifier();
            }

            _ => {
                return Err(AnalysisError::lex(
                    self.line,
                    format!("Unexpected character: {}", b as char),
                ));
            }
        }

        Ok(())
    }

    /// Parse a double‑quoted string literal.  Strings end on the same line.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' && self.peek() != b'\n' {
            self.advance();
        }

        if self.peek() != b'"' {
            return Err(AnalysisError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // closing quote

        self.pending = Some(Symbol::STRING);

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.pending = Some(Symbol::NUMBER);
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

        let symbol: Symbol = KEYWORDS
            .get(slice)
            .copied()
            .unwrap_or(Symbol::IDENTIFIER);

        self.pending = Some(symbol);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr <= self.len() {
            // EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1;
                return Some(Ok(Token::new(Symbol::EOF, "", self.line)));
            }

            self.start = self.curr;
            self.pending = None;

            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            if let Some(symbol) = self.pending.take() {
                // String constants drop their surrounding quotes.
                let (from, to) = match symbol {
                    Symbol::STRING => (self.start + 1, self.curr - 1),
                    _ => (self.start, self.curr),
                };

                let text: &str = match self.lexeme(from, to) {
                    Ok(text) => text,
                    Err(e) => return Some(Err(e)),
                };

                debug!("Scanned token ({:?}) on line {}", symbol, self.line);

                return Some(Ok(Token::new(symbol, text, self.line)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
