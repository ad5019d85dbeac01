use log::{debug, info};
use serde::Serialize;
use std::fmt;

/// The closed set of lexical symbols recognised by the scanner.
///
/// Reserved words, operators and punctuation carry no data; the three literal
/// classes (`IDENTIFIER`, `NUMBER`, `STRING`) keep their spelling in
/// [`Token::text`]. `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Symbol {
    /// 'begin'
    BEGIN,

    /// 'end'
    END,

    /// 'if'
    IF,

    /// 'then'
    THEN,

    /// 'else'
    ELSE,

    /// 'while'
    WHILE,

    /// 'loop'
    LOOP,

    /// 'do'
    DO,

    /// 'until'
    UNTIL,

    /// 'for'
    FOR,

    /// 'call'
    CALL,

    /// ':='
    BECOMES,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '*'
    TIMES,

    /// '/'
    DIVIDE,

    /// 'mod'
    MOD,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// '='
    EQUAL,

    /// '/='
    NOT_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// ';'
    SEMICOLON,

    /// ','
    COMMA,

    /// A user‑defined identifier
    IDENTIFIER,

    /// A numeric literal
    NUMBER,

    /// A string literal (contents without quotes)
    STRING,

    /// End‑of‑file marker
    EOF,
}

impl Symbol {
    /// Human‑readable name used in diagnostics ("Expected `:=`, ...").
    pub fn name(self) -> &'static str {
        match self {
            Symbol::BEGIN => "'begin'",
            Symbol::END => "'end'",
            Symbol::IF => "'if'",
            Symbol::THEN => "'then'",
            Symbol::ELSE => "'else'",
            Symbol::WHILE => "'while'",
            Symbol::LOOP => "'loop'",
            Symbol::DO => "'do'",
            Symbol::UNTIL => "'until'",
            Symbol::FOR => "'for'",
            Symbol::CALL => "'call'",
            Symbol::BECOMES => "':='",
            Symbol::PLUS => "'+'",
            Symbol::MINUS => "'-'",
            Symbol::TIMES => "'*'",
            Symbol::DIVIDE => "'/'",
            Symbol::MOD => "'mod'",
            Symbol::GREATER => "'>'",
            Symbol::GREATER_EQUAL => "'>='",
            Symbol::EQUAL => "'='",
            Symbol::NOT_EQUAL => "'/='",
            Symbol::LESS => "'<'",
            Symbol::LESS_EQUAL => "'<='",
            Symbol::LEFT_PAREN => "'('",
            Symbol::RIGHT_PAREN => "')'",
            Symbol::SEMICOLON => "';'",
            Symbol::COMMA => "','",
            Symbol::IDENTIFIER => "identifier",
            Symbol::NUMBER => "number constant",
            Symbol::STRING => "string constant",
            Symbol::EOF => "end of file",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token: its symbol, the source text that produced it and the line
/// number where it was found.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Token {
    /// The category of this token.
    pub symbol: Symbol,

    /// Source spelling. String constants drop their quotes; `EOF` is empty.
    pub text: String,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given symbol, text, and line.
    pub fn new<S: Into<String>>(symbol: Symbol, text: S, line: usize) -> Self {
        let text: String = text.into();

        info!(
            "Creating new token: symbol={:?}, text={}, line={}",
            symbol, text, line
        );

        Self { symbol, text, line }
    }

    /// Does this token belong to `symbol`?
    #[inline]
    pub fn is(&self, symbol: Symbol) -> bool {
        self.symbol == symbol
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug!(
            "Formatting token: symbol={:?}, text={}, line={}",
            self.symbol, self.text, self.line
        );

        // `SYMBOL text line`, with string constants re‑quoted so the text
        // column stays unambiguous.
        match self.symbol {
            Symbol::STRING => write!(f, "{:?} \"{}\" {}", self.symbol, self.text, self.line),
            _ => write!(f, "{:?} {} {}", self.symbol, self.text, self.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_quote_fixed_spellings_only() {
        assert_eq!(Symbol::BECOMES.name(), "':='");
        assert_eq!(Symbol::MOD.name(), "'mod'");
        assert_eq!(Symbol::IDENTIFIER.name(), "identifier");
        assert_eq!(Symbol::EOF.to_string(), "end of file");
    }

    #[test]
    fn display_requotes_strings() {
        let token = Token::new(Symbol::STRING, "hi there", 3);

        assert_eq!(token.to_string(), "STRING \"hi there\" 3");
        assert_eq!(Token::new(Symbol::BECOMES, ":=", 1).to_string(), "BECOMES := 1");
    }
}
