/*!
Recursive‑descent syntax analyser
=================================

One procedure per nonterminal, one token of lookahead, no backtracking. The
analyser pulls tokens from a [`TokenSource`] and pushes enter / match / exit
events into a [`Generate`] sink; it never builds a tree of its own.

### Cost

| Phase                        | Cost | Rationale                                              |
|------------------------------|-----:|--------------------------------------------------------|
| `parse_statement_part`       | Θ(n) | Each token is consumed once by `accept_terminal`.      |
| Per production               | O(1) | Every branch decision reads only the lookahead.        |

Call‑stack depth grows with syntactic nesting (≪ n in practice). Space is O(1)
besides the stack: a single lookahead token is held at a time.

### Logging Policy

| Location                          | Level   | Purpose                               |
|-----------------------------------|---------|---------------------------------------|
| `SyntaxAnalyser::new`, top rule   | `info`  | Lifecycle milestones.                 |
| nonterminal procedures            | `debug` | Descent into grammar branches.        |
| `accept_terminal`                 | `debug` | Token flow and mismatches.            |

--------------------------------------------------------------------------------
Grammar (after left‑recursion removal and left‑factoring)
--------------------------------------------------------

```text
StatementPart        → "begin" StatementList "end" ;
StatementList        → Statement ( ";" Statement )* ;
Statement            → AssignmentStatement | IfStatement | WhileStatement
                     | ProcedureStatement | UntilStatement | ForStatement ;
AssignmentStatement  → IDENT ":=" ( Expression | STRING ) ;
IfStatement          → "if" Condition "then" StatementList
                       ( "else" StatementList "end" "if" | "end" "if" ) ;
WhileStatement       → "while" Condition "loop" StatementList "end" "loop" ;
ProcedureStatement   → "call" IDENT "(" ArgumentList ")" ;
UntilStatement       → "do" StatementList "until" Condition ;
ForStatement         → "for" "(" AssignmentStatement ";" Condition ";"
                       AssignmentStatement ")" "do" StatementList "end" "loop" ;
ArgumentList         → IDENT ( "," IDENT )* ;
Condition            → IDENT ConditionalOperator ( IDENT | NUMBER | STRING ) ;
ConditionalOperator  → ">" | ">=" | "=" | "/=" | "<" | "<=" ;
Expression           → Term ( ( "+" | "-" ) Term )* ;
Term                 → Factor ( ( "*" | "/" | "mod" ) Factor )* ;
Factor               → IDENT | NUMBER | "(" Expression ")" ;
```

The left‑recursive lists of the source grammar (`List → List sep X | X`)
become the `( sep X )*` loops above. Alternatives sharing a prefix are split
into a shared head plus a *remainder* chosen by one lookahead check. Remainders
are not rules of the source grammar, so they emit no enter/exit pair.
*/

use crate::error::Result;
use crate::generate::{Generate, Nonterminal};
use crate::token::{Symbol, Token};

use log::{debug, info};

/// Where the analyser pulls its tokens from.
pub trait TokenSource {
    /// Produce the next token, or the lexical error that prevented it.
    fn next_token(&mut self) -> Result<Token>;
}

/// Any fallible token iterator (the [`Scanner`](crate::scanner::Scanner)
/// included) is a token source. Once exhausted it keeps answering `EOF`.
impl<I> TokenSource for I
where
    I: Iterator<Item = Result<Token>>,
{
    fn next_token(&mut self) -> Result<Token> {
        match self.next() {
            Some(token) => token,
            None => Ok(Token::new(Symbol::EOF, "", 0)),
        }
    }
}

/// Recursive‑descent analyser over a pull‑based token source.
pub struct SyntaxAnalyser<S, G> {
    lex: S,
    generate: G,
    next_token: Token,
}

impl<S: TokenSource, G: Generate> SyntaxAnalyser<S, G> {
    /// Construct an analyser and prime the lookahead with the first token.
    pub fn new(mut lex: S, generate: G) -> Result<Self> {
        let next_token: Token = lex.next_token()?;

        info!("Syntax analyser primed with {:?}", next_token.symbol);

        Ok(Self {
            lex,
            generate,
            next_token,
        })
    }

    /// The unconsumed lookahead token.
    pub fn lookahead(&self) -> &Token {
        &self.next_token
    }

    pub fn generate(&self) -> &G {
        &self.generate
    }

    pub fn into_generate(self) -> G {
        self.generate
    }

    // ───────────────────────── public API ─────────────────────────

    /// `StatementPart → "begin" StatementList "end"`
    ///
    /// Anything after the closing `end` is left in [`lookahead`](Self::lookahead)
    /// for the caller to judge.
    pub fn parse_statement_part(&mut self) -> Result<()> {
        info!("Beginning parse phase");

        self.nonterminal(Nonterminal::StatementPart, |this| {
            this.accept_terminal(Symbol::BEGIN)?;
            this.statement_list()?;
            this.accept_terminal(Symbol::END)
        })?;

        info!("Statement part recognised");

        Ok(())
    }

    // ────────────────────── matching primitives ───────────────────

    /// Match the lookahead against `symbol`, consuming it on success.
    ///
    /// On mismatch the lookahead is left untouched and the sink decides what
    /// happens next.
    fn accept_terminal(&mut self, symbol: Symbol) -> Result<()> {
        if self.next_token.symbol == symbol {
            debug!("Accepted {:?} on line {}", symbol, self.next_token.line);

            self.generate.insert_terminal(&self.next_token);
            self.next_token = self.lex.next_token()?;

            return Ok(());
        }

        debug!(
            "Expected {:?}, lookahead is {:?}",
            symbol, self.next_token.symbol
        );

        self.report(symbol.name())
    }

    /// Hand a mismatch at the lookahead to the sink.
    fn report(&mut self, expected: &str) -> Result<()> {
        let found: &str = if self.next_token.text.is_empty() {
            self.next_token.symbol.name()
        } else {
            &self.next_token.text
        };

        let message: String = format!(
            "Expected {}, found {}, at line {}",
            expected, found, self.next_token.line
        );

        self.generate.report_error(&self.next_token, &message)
    }

    /// Bracket `body` with the enter/exit events of `name`.
    fn nonterminal<F>(&mut self, name: Nonterminal, body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        debug!("Entering {}", name);

        self.generate.commence_nonterminal(name);
        body(self)?;
        self.generate.finish_nonterminal(name);

        Ok(())
    }

    #[inline(always)]
    fn check(&self, symbol: Symbol) -> bool {
        self.next_token.symbol == symbol
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement_list(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::StatementList, |this| {
            this.statement()?;

            while this.check(Symbol::SEMICOLON) {
                this.accept_terminal(Symbol::SEMICOLON)?;
                this.statement()?;
            }

            Ok(())
        })
    }

    fn statement(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::Statement, |this| match this.next_token.symbol {
            Symbol::IDENTIFIER => this.assignment_statement(),
            Symbol::IF => this.if_statement(),
            Symbol::WHILE => this.while_statement(),
            Symbol::CALL => this.procedure_statement(),
            Symbol::DO => this.until_statement(),
            Symbol::FOR => this.for_statement(),
            _ => this.report("starting symbol for statement"),
        })
    }

    fn assignment_statement(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::AssignmentStatement, |this| {
            this.accept_terminal(Symbol::IDENTIFIER)?;
            this.accept_terminal(Symbol::BECOMES)?;
            this.assignment_statement_remainder()
        })
    }

    /// `Expression | STRING`, chosen after `IDENT ":="` is consumed.
    fn assignment_statement_remainder(&mut self) -> Result<()> {
        if self.check(Symbol::STRING) {
            self.accept_terminal(Symbol::STRING)
        } else {
            self.expression()
        }
    }

    fn if_statement(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::IfStatement, |this| {
            this.accept_terminal(Symbol::IF)?;
            this.condition()?;
            this.accept_terminal(Symbol::THEN)?;
            this.statement_list()?;
            this.if_statement_remainder()
        })
    }

    /// `"else" StatementList "end" "if" | "end" "if"`
    fn if_statement_remainder(&mut self) -> Result<()> {
        if self.check(Symbol::ELSE) {
            self.accept_terminal(Symbol::ELSE)?;
            self.statement_list()?;
        }

        self.accept_terminal(Symbol::END)?;
        self.accept_terminal(Symbol::IF)
    }

    fn while_statement(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::WhileStatement, |this| {
            this.accept_terminal(Symbol::WHILE)?;
            this.condition()?;
            this.accept_terminal(Symbol::LOOP)?;
            this.statement_list()?;
            this.accept_terminal(Symbol::END)?;
            this.accept_terminal(Symbol::LOOP)
        })
    }

    fn procedure_statement(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::ProcedureStatement, |this| {
            this.accept_terminal(Symbol::CALL)?;
            this.accept_terminal(Symbol::IDENTIFIER)?;
            this.accept_terminal(Symbol::LEFT_PAREN)?;
            this.argument_list()?;
            this.accept_terminal(Symbol::RIGHT_PAREN)
        })
    }

    fn until_statement(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::UntilStatement, |this| {
            this.accept_terminal(Symbol::DO)?;
            this.statement_list()?;
            this.accept_terminal(Symbol::UNTIL)?;
            this.condition()
        })
    }

    fn for_statement(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::ForStatement, |this| {
            this.accept_terminal(Symbol::FOR)?;
            this.accept_terminal(Symbol::LEFT_PAREN)?;
            this.assignment_statement()?;
            this.accept_terminal(Symbol::SEMICOLON)?;
            this.condition()?;
            this.accept_terminal(Symbol::SEMICOLON)?;
            this.assignment_statement()?;
            this.accept_terminal(Symbol::RIGHT_PAREN)?;
            this.accept_terminal(Symbol::DO)?;
            this.statement_list()?;
            this.accept_terminal(Symbol::END)?;
            this.accept_terminal(Symbol::LOOP)
        })
    }

    fn argument_list(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::ArgumentList, |this| {
            this.accept_terminal(Symbol::IDENTIFIER)?;

            while this.check(Symbol::COMMA) {
                this.accept_terminal(Symbol::COMMA)?;
                this.accept_terminal(Symbol::IDENTIFIER)?;
            }

            Ok(())
        })
    }

    // ───────────────────────── condition rules ────────────────────

    fn condition(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::Condition, |this| {
            this.accept_terminal(Symbol::IDENTIFIER)?;
            this.conditional_operator()?;
            this.condition_remainder()
        })
    }

    fn condition_remainder(&mut self) -> Result<()> {
        match self.next_token.symbol {
            symbol @ (Symbol::IDENTIFIER | Symbol::NUMBER | Symbol::STRING) => {
                self.accept_terminal(symbol)
            }
            _ => self.report("one of identifier, number constant, string constant"),
        }
    }

    fn conditional_operator(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::ConditionalOperator, |this| {
            match this.next_token.symbol {
                symbol @ (Symbol::GREATER
                | Symbol::GREATER_EQUAL
                | Symbol::EQUAL
                | Symbol::NOT_EQUAL
                | Symbol::LESS
                | Symbol::LESS_EQUAL) => this.accept_terminal(symbol),
                _ => this.report("a conditional operator ('>', '>=', '=', '/=', '<', '<=')"),
            }
        })
    }

    // ───────────────────────── expression rules ───────────────────

    fn expression(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::Expression, |this| {
            this.term()?;

            while let symbol @ (Symbol::PLUS | Symbol::MINUS) = this.next_token.symbol {
                this.accept_terminal(symbol)?;
                this.term()?;
            }

            Ok(())
        })
    }

    fn term(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::Term, |this| {
            this.factor()?;

            while let symbol @ (Symbol::TIMES | Symbol::DIVIDE | Symbol::MOD) =
                this.next_token.symbol
            {
                this.accept_terminal(symbol)?;
                this.factor()?;
            }

            Ok(())
        })
    }

    fn factor(&mut self) -> Result<()> {
        self.nonterminal(Nonterminal::Factor, |this| match this.next_token.symbol {
            symbol @ (Symbol::IDENTIFIER | Symbol::NUMBER) => this.accept_terminal(symbol),
            Symbol::LEFT_PAREN => {
                this.accept_terminal(Symbol::LEFT_PAREN)?;
                this.expression()?;
                this.accept_terminal(Symbol::RIGHT_PAREN)
            }
            _ => this.report("identifier, number constant or '('"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::EventRecorder;

    fn tokens(symbols: &[(Symbol, &str)]) -> std::vec::IntoIter<Result<Token>> {
        symbols
            .iter()
            .map(|(symbol, text)| Ok(Token::new(*symbol, *text, 1)))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn failed_accept_keeps_the_lookahead() {
        let source = tokens(&[(Symbol::PLUS, "+"), (Symbol::EOF, "")]);
        let mut analyser = SyntaxAnalyser::new(source, EventRecorder::new()).unwrap();

        assert!(analyser.accept_terminal(Symbol::BECOMES).is_err());
        assert_eq!(analyser.lookahead().symbol, Symbol::PLUS);

        // A corrected expectation sees the very same token.
        analyser.accept_terminal(Symbol::PLUS).unwrap();
        assert_eq!(analyser.lookahead().symbol, Symbol::EOF);
        assert_eq!(analyser.generate().terminals().count(), 1);
    }

    #[test]
    fn exhausted_source_answers_eof() {
        let source = tokens(&[(Symbol::IDENTIFIER, "x")]);
        let mut analyser = SyntaxAnalyser::new(source, EventRecorder::new()).unwrap();

        analyser.accept_terminal(Symbol::IDENTIFIER).unwrap();
        assert!(analyser.lookahead().is(Symbol::EOF));
    }

    #[test]
    fn statement_list_stops_before_end() {
        let source = tokens(&[
            (Symbol::IDENTIFIER, "a"),
            (Symbol::BECOMES, ":="),
            (Symbol::NUMBER, "1"),
            (Symbol::SEMICOLON, ";"),
            (Symbol::IDENTIFIER, "b"),
            (Symbol::BECOMES, ":="),
            (Symbol::NUMBER, "2"),
            (Symbol::SEMICOLON, ";"),
            (Symbol::IDENTIFIER, "c"),
            (Symbol::BECOMES, ":="),
            (Symbol::NUMBER, "3"),
            (Symbol::END, "end"),
        ]);
        let mut analyser = SyntaxAnalyser::new(source, EventRecorder::new()).unwrap();

        analyser.statement_list().unwrap();

        let recorder = analyser.generate();
        assert_eq!(recorder.count(Nonterminal::Statement), 3);
        assert_eq!(
            recorder.terminals().filter(|t| t.is(Symbol::SEMICOLON)).count(),
            2
        );
        assert!(recorder.is_well_nested());
        assert!(analyser.lookahead().is(Symbol::END));
    }
}
