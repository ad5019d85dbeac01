#[cfg(test)]
mod scanner_tests {
    use syntax_analyser as analyser;

    use analyser::error::AnalysisError;
    use analyser::scanner::*;
    use analyser::token::*;

    fn assert_token_sequence(source: &str, expected: &[(Symbol, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_symbol, expected_text)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.symbol, *expected_symbol);
            assert_eq!(actual.text, *expected_text);
        }
    }

    #[test]
    fn test_scanner_01_operators() {
        assert_token_sequence(
            ":= + - * / mod > >= = /= < <=",
            &[
                (Symbol::BECOMES, ":="),
                (Symbol::PLUS, "+"),
                (Symbol::MINUS, "-"),
                (Symbol::TIMES, "*"),
                (Symbol::DIVIDE, "/"),
                (Symbol::MOD, "mod"),
                (Symbol::GREATER, ">"),
                (Symbol::GREATER_EQUAL, ">="),
                (Symbol::EQUAL, "="),
                (Symbol::NOT_EQUAL, "/="),
                (Symbol::LESS, "<"),
                (Symbol::LESS_EQUAL, "<="),
                (Symbol::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_keywords_and_identifiers() {
        assert_token_sequence(
            "begin end if then else while loop do until for call beginning _x9",
            &[
                (Symbol::BEGIN, "begin"),
                (Symbol::END, "end"),
                (Symbol::IF, "if"),
                (Symbol::THEN, "then"),
                (Symbol::ELSE, "else"),
                (Symbol::WHILE, "while"),
                (Symbol::LOOP, "loop"),
                (Symbol::DO, "do"),
                (Symbol::UNTIL, "until"),
                (Symbol::FOR, "for"),
                (Symbol::CALL, "call"),
                (Symbol::IDENTIFIER, "beginning"),
                (Symbol::IDENTIFIER, "_x9"),
                (Symbol::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_literals_and_punctuation() {
        assert_token_sequence(
            "call f(x, \"a b\", 3.25);",
            &[
                (Symbol::CALL, "call"),
                (Symbol::IDENTIFIER, "f"),
                (Symbol::LEFT_PAREN, "("),
                (Symbol::IDENTIFIER, "x"),
                (Symbol::COMMA, ","),
                (Symbol::STRING, "a b"),
                (Symbol::COMMA, ","),
                (Symbol::NUMBER, "3.25"),
                (Symbol::RIGHT_PAREN, ")"),
                (Symbol::SEMICOLON, ";"),
                (Symbol::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_comments_and_lines() {
        let source = "begin // opening\n  x := 1 // trailing\nend";
        let tokens: Vec<Token> = Scanner::new(source.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        let lines: Vec<(Symbol, usize)> = tokens.iter().map(|t| (t.symbol, t.line)).collect();

        assert_eq!(
            lines,
            vec![
                (Symbol::BEGIN, 1),
                (Symbol::IDENTIFIER, 2),
                (Symbol::BECOMES, 2),
                (Symbol::NUMBER, 2),
                (Symbol::END, 3),
                (Symbol::EOF, 3),
            ]
        );
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = "x $ : y";
        let results: Vec<_> = Scanner::new(source.as_bytes()).collect();

        // x, error for '$', error for lone ':', y, EOF
        assert_eq!(results.len(), 5, "Expected 5 items in result");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                err
            );
        }

        assert!(matches!(results.last(), Some(Ok(t)) if t.symbol == Symbol::EOF));
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let source = "\"open\nx";
        let results: Vec<_> = Scanner::new(source.as_bytes()).collect();

        assert!(matches!(
            &results[0],
            Err(AnalysisError::Lex { line: 1, message }) if message == "Unterminated string."
        ));
        assert!(matches!(&results[1], Ok(t) if t.symbol == Symbol::IDENTIFIER && t.line == 2));
    }

    #[test]
    fn test_scanner_is_fused() {
        let mut scanner = Scanner::new(b"");

        assert!(matches!(scanner.next(), Some(Ok(t)) if t.symbol == Symbol::EOF));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
