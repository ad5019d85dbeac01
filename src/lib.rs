//! Syntactic front end for a small imperative language.
//!
//! [`scanner::Scanner`] turns source bytes into [`token::Token`]s,
//! [`parser::SyntaxAnalyser`] checks them against the grammar and reports the
//! parse shape to a [`generate::Generate`] sink.

pub mod error;
pub mod generate;
pub mod parser;
pub mod scanner;
pub mod token;
