#[cfg(test)]
mod scanner_tests {
    use pretty_assertions::assert_eq;

    use rox::error::{Diagnostics, LoxError};
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn rendered(source: &str) -> Vec<String> {
        Scanner::new(source)
            .map(|r| match r {
                Ok(token) => token.to_string(),
                Err(e) => e.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_character_operators() {
        assert_token_sequence(
            "! != = == < <= > >= !!",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::BANG, "!"),
                (TokenType::BANG, "!"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_comments_and_slash() {
        assert_token_sequence(
            "a / b // the rest is ignored ( { \n c",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SLASH, "/"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::IDENTIFIER, "c"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_keywords_and_identifiers() {
        assert_token_sequence(
            "and class else false for fun if nil or print return super this true var while orchid _x1",
            &[
                (TokenType::AND, "and"),
                (TokenType::CLASS, "class"),
                (TokenType::ELSE, "else"),
                (TokenType::FALSE, "false"),
                (TokenType::FOR, "for"),
                (TokenType::FUN, "fun"),
                (TokenType::IF, "if"),
                (TokenType::NIL, "nil"),
                (TokenType::OR, "or"),
                (TokenType::PRINT, "print"),
                (TokenType::RETURN, "return"),
                (TokenType::SUPER, "super"),
                (TokenType::THIS, "this"),
                (TokenType::TRUE, "true"),
                (TokenType::VAR, "var"),
                (TokenType::WHILE, "while"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::IDENTIFIER, "_x1"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_number_literals() {
        // Neither a leading nor a trailing dot belongs to the number.
        assert_eq!(
            rendered("12 3.25 .5 7."),
            vec![
                "NUMBER 12 12.0",
                "NUMBER 3.25 3.25",
                "DOT . null",
                "NUMBER 5 5.0",
                "NUMBER 7 7.0",
                "DOT . null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_06_string_literals_span_lines() {
        let tokens: Vec<Token> = Scanner::new("\"one\ntwo\" x")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));
        assert_eq!(tokens[0].to_string(), "STRING \"one\ntwo\" one\ntwo");
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let results: Vec<_> = Scanner::new(",.$(#").collect();

        // COMMA, DOT, error '$', LEFT_PAREN, error '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error : Unexpected character: $",
                "[line 1] Error : Unexpected character: #",
            ]
        );

        fn assert_token_matches(
            result: &Result<Token, LoxError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(token.token_type, expected_type);
                    assert_eq!(token.lexeme, expected_lexeme);
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_non_ascii_character_is_skipped_whole() {
        assert_eq!(
            rendered("a é b"),
            vec![
                "IDENTIFIER a null",
                "[line 1] Error : Unexpected character: é",
                "IDENTIFIER b null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_unterminated_string_reports_opening_line() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("x\n\"abc\ndef", &mut diagnostics);

        assert_eq!(
            diagnostics
                .errors()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["[line 2] Error : Unterminated string."]
        );

        // No token for the broken literal, but EOF is still there.
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].lexeme, "x");
        assert_eq!(tokens[1].token_type, TokenType::EOF);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_exactly_one_eof_and_fused() {
        let mut scanner = Scanner::new("");

        assert!(matches!(scanner.next(), Some(Ok(Token { token_type: TokenType::EOF, .. }))));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());

        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("var a = 1; // trailing", &mut diagnostics);
        let eofs = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::EOF)
            .count();

        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().map(|t| t.token_type.clone()), Some(TokenType::EOF));
    }

    #[test]
    fn test_lexeme_matches_source_span() {
        let source = "fun add(a, b) {\n  return a + b; // sum\n}\nprint \"héllo\" <= 3.5;";
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);

        assert!(!diagnostics.had_error());

        for token in &tokens {
            let span = &source[token.offset..token.offset + token.lexeme.len()];
            assert_eq!(span, token.lexeme);
        }
    }

    #[test]
    fn test_line_numbers_advance_on_newlines() {
        let lines: Vec<usize> = Scanner::new("a\nb\n\n// c\nd")
            .filter_map(Result::ok)
            .map(|t| t.line)
            .collect();

        assert_eq!(lines, vec![1, 2, 5, 5]);
    }

    #[test]
    fn test_token_serializes_to_json() {
        let token = Scanner::new("42").next().unwrap().unwrap();
        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(json["lexeme"], "42");
        assert_eq!(json["line"], 1);
        assert_eq!(json["token_type"]["NUMBER"], 42.0);
    }
}
