//! Notification sinks for the parsing engine.
//!
//! The analyser never builds a tree. Instead it pushes three kinds of events,
//! strictly nested, into a [`Generate`] implementation:
//!
//! * `commence_nonterminal` when a grammar rule is entered,
//! * `insert_terminal` for every token it consumes,
//! * `finish_nonterminal` when the rule returns.
//!
//! The sink also owns the error policy: [`Generate::report_error`] returns a
//! `Result`, and the engine propagates whatever comes back. Returning `Err`
//! aborts the parse on the spot.

use std::fmt::{self, Write};

use log::{debug, info};
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::token::Token;

/// Grammar rules that produce an enter/exit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Nonterminal {
    StatementPart,
    StatementList,
    Statement,
    AssignmentStatement,
    IfStatement,
    WhileStatement,
    ProcedureStatement,
    UntilStatement,
    ForStatement,
    ArgumentList,
    Condition,
    ConditionalOperator,
    Expression,
    Term,
    Factor,
}

impl Nonterminal {
    pub fn name(self) -> &'static str {
        match self {
            Nonterminal::StatementPart => "StatementPart",
            Nonterminal::StatementList => "StatementList",
            Nonterminal::Statement => "Statement",
            Nonterminal::AssignmentStatement => "AssignmentStatement",
            Nonterminal::IfStatement => "IfStatement",
            Nonterminal::WhileStatement => "WhileStatement",
            Nonterminal::ProcedureStatement => "ProcedureStatement",
            Nonterminal::UntilStatement => "UntilStatement",
            Nonterminal::ForStatement => "ForStatement",
            Nonterminal::ArgumentList => "ArgumentList",
            Nonterminal::Condition => "Condition",
            Nonterminal::ConditionalOperator => "ConditionalOperator",
            Nonterminal::Expression => "Expression",
            Nonterminal::Term => "Term",
            Nonterminal::Factor => "Factor",
        }
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receiver of the analyser's parse events.
pub trait Generate {
    /// A grammar rule has been entered.
    fn commence_nonterminal(&mut self, name: Nonterminal);

    /// `token` has been matched and consumed.
    fn insert_terminal(&mut self, token: &Token);

    /// The most recently entered grammar rule has returned.
    fn finish_nonterminal(&mut self, name: Nonterminal);

    /// The lookahead `token` does not fit the grammar at this point.
    ///
    /// Returning `Err` unwinds the whole parse. Returning `Ok` lets the
    /// engine carry on without consuming `token`.
    fn report_error(&mut self, token: &Token, message: &str) -> Result<()>;
}

impl<G: Generate + ?Sized> Generate for &mut G {
    fn commence_nonterminal(&mut self, name: Nonterminal) {
        (**self).commence_nonterminal(name)
    }

    fn insert_terminal(&mut self, token: &Token) {
        (**self).insert_terminal(token)
    }

    fn finish_nonterminal(&mut self, name: Nonterminal) {
        (**self).finish_nonterminal(name)
    }

    fn report_error(&mut self, token: &Token, message: &str) -> Result<()> {
        (**self).report_error(token, message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TreeGenerate: indented text rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Renders the implicit parse tree as indented text:
///
/// ```text
/// enter StatementPart
///     match BEGIN begin 1
///     enter StatementList
///     ...
/// ```
///
/// Grammar errors are always fatal.
#[derive(Debug, Default)]
pub struct TreeGenerate {
    out: String,
    depth: usize,
}

impl TreeGenerate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered tree so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn into_output(self) -> String {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }

        // Writing into a `String` cannot fail.
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }
}

impl Generate for TreeGenerate {
    fn commence_nonterminal(&mut self, name: Nonterminal) {
        self.line(format_args!("enter {}", name));
        self.depth += 1;
    }

    fn insert_terminal(&mut self, token: &Token) {
        self.line(format_args!("match {}", token));
    }

    fn finish_nonterminal(&mut self, name: Nonterminal) {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("exit {}", name));
    }

    fn report_error(&mut self, token: &Token, message: &str) -> Result<()> {
        info!("Parsing encountered error at line {}", token.line);
        debug!("Caused by: {}", message);

        Err(AnalysisError::parse(token.line, message))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventRecorder: ordered event log
// ─────────────────────────────────────────────────────────────────────────────

/// A single notification, as recorded by [`EventRecorder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Event {
    Commence(Nonterminal),
    Terminal(Token),
    Finish(Nonterminal),
    Error { token: Token, message: String },
}

/// Records every notification in order.
///
/// A fatal recorder (the default) turns `report_error` into an
/// [`AnalysisError::Parse`] after recording it; a tolerant one records it and
/// lets the engine continue.
#[derive(Debug)]
pub struct EventRecorder {
    events: Vec<Event>,
    fatal: bool,
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRecorder {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            fatal: true,
        }
    }

    /// A recorder whose `report_error` never aborts the parse.
    pub fn tolerant() -> Self {
        Self {
            events: Vec::new(),
            fatal: false,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Every recorded `Error` event.
    pub fn errors(&self) -> impl Iterator<Item = (&Token, &str)> {
        self.events.iter().filter_map(|event| match event {
            Event::Error { token, message } => Some((token, message.as_str())),
            _ => None,
        })
    }

    /// Recorded tokens, in the order they were matched.
    pub fn terminals(&self) -> impl Iterator<Item = &Token> {
        self.events.iter().filter_map(|event| match event {
            Event::Terminal(token) => Some(token),
            _ => None,
        })
    }

    /// How many activations of `name` were entered.
    pub fn count(&self, name: Nonterminal) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::Commence(n) if *n == name))
            .count()
    }

    /// Do the enter/exit events pair up like brackets, with every exit naming
    /// the most recently entered open rule?
    pub fn is_well_nested(&self) -> bool {
        let mut open: Vec<Nonterminal> = Vec::new();

        for event in &self.events {
            match event {
                Event::Commence(name) => open.push(*name),
                Event::Finish(name) => {
                    if open.pop() != Some(*name) {
                        return false;
                    }
                }
                _ => {}
            }
        }

        open.is_empty()
    }
}

impl Generate for EventRecorder {
    fn commence_nonterminal(&mut self, name: Nonterminal) {
        self.events.push(Event::Commence(name));
    }

    fn insert_terminal(&mut self, token: &Token) {
        self.events.push(Event::Terminal(token.clone()));
    }

    fn finish_nonterminal(&mut self, name: Nonterminal) {
        self.events.push(Event::Finish(name));
    }

    fn report_error(&mut self, token: &Token, message: &str) -> Result<()> {
        debug!("Recording grammar error at line {}: {}", token.line, message);

        self.events.push(Event::Error {
            token: token.clone(),
            message: message.to_owned(),
        });

        if self.fatal {
            return Err(AnalysisError::parse(token.line, message));
        }

        Ok(())
    }
}
