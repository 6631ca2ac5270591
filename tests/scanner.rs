#[cfg(test)]
mod scanner_tests {
    use rill::scanner::Scanner;
    use rill::token::{Token, TokenType};

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<Token> = scanner.filter_map(Result::ok).collect();

        assert_eq!(
            tokens.len(),
            expected.len(),
            "token count mismatch for {:?}",
            source
        );

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
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
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            ":= = != <= >= ** * :",
            &[
                (TokenType::ASSIGN, ":="),
                (TokenType::EQUAL, "="),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::STAR_STAR, "**"),
                (TokenType::STAR, "*"),
                (TokenType::COLON, ":"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_bitwise_and_conditional() {
        assert_token_sequence(
            "& | ^ ~ ? :",
            &[
                (TokenType::AMP, "&"),
                (TokenType::PIPE, "|"),
                (TokenType::CARET, "^"),
                (TokenType::TILDE, "~"),
                (TokenType::QUESTION, "?"),
                (TokenType::COLON, ":"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_keywords_and_identifiers() {
        assert_token_sequence(
            "let x := not y and z or self",
            &[
                (TokenType::LET, "let"),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::ASSIGN, ":="),
                (TokenType::NOT, "not"),
                (TokenType::IDENTIFIER, "y"),
                (TokenType::AND, "and"),
                (TokenType::IDENTIFIER, "z"),
                (TokenType::OR, "or"),
                (TokenType::SELF, "self"),
                (TokenType::EOF, ""),
            ],
        );

        assert_token_sequence(
            "switch case default define do break continue",
            &[
                (TokenType::SWITCH, "switch"),
                (TokenType::CASE, "case"),
                (TokenType::DEFAULT, "default"),
                (TokenType::DEFINE, "define"),
                (TokenType::DO, "do"),
                (TokenType::BREAK, "break"),
                (TokenType::CONTINUE, "continue"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_numbers_and_strings() {
        let scanner = Scanner::new(b"12 3.14 \"hello\"");
        let tokens: Vec<Token> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), 4);

        match &tokens[0].token_type {
            TokenType::NUMBER(n) => assert_eq!(*n, 12.0),
            other => panic!("expected NUMBER, got {:?}", other),
        }

        match &tokens[1].token_type {
            TokenType::NUMBER(n) => assert_eq!(*n, 3.14),
            other => panic!("expected NUMBER, got {:?}", other),
        }

        match &tokens[2].token_type {
            TokenType::STRING(s) => assert_eq!(s, "hello"),
            other => panic!("expected STRING, got {:?}", other),
        }
    }

    #[test]
    fn test_scanner_06_line_comment_skipped() {
        assert_token_sequence(
            "1 # all of this is ignored := ** \n2",
            &[
                (TokenType::NUMBER(1.0), "1"),
                (TokenType::NUMBER(2.0), "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_07_nested_block_comment() {
        assert_token_sequence(
            "1 /* outer /* inner */ still outer */ 2",
            &[
                (TokenType::NUMBER(1.0), "1"),
                (TokenType::NUMBER(2.0), "2"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_08_unterminated_block_comment_reports_and_finishes() {
        let scanner = Scanner::new(b"1 /* never closed");
        let results: Vec<_> = scanner.collect();

        // NUMBER, error, EOF: the error does not abort the scan.
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(matches!(
            results[2].as_ref().map(|t| t.token_type.clone()),
            Ok(TokenType::EOF)
        ));

        let err = results[1].as_ref().unwrap_err().to_string();
        assert!(
            err.contains("Unterminated block comment"),
            "unexpected message: {}",
            err
        );
    }

    #[test]
    fn test_scanner_09_string_may_not_cross_newline() {
        let scanner = Scanner::new(b"\"abc\n1");
        let results: Vec<_> = scanner.collect();

        // error, NUMBER (scanning resumed after the newline), EOF
        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());

        let err = results[0].as_ref().unwrap_err().to_string();
        assert!(err.contains("Unterminated string"), "got: {}", err);

        match &results[1] {
            Ok(token) => assert_eq!(token.token_type, TokenType::NUMBER(1.0)),
            Err(e) => panic!("expected number after bad string, got error: {}", e),
        }
    }

    #[test]
    fn test_scanner_10_unexpected_chars_reported_and_skipped() {
        let scanner = Scanner::new(b",.$(!");
        let results: Vec<_> = scanner.collect();

        // COMMA, DOT, error($), LEFT_PAREN, error(bare !), EOF
        assert_eq!(results.len(), 6);

        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
        assert!(results[3].is_ok());
        assert!(results[4].is_err());
        assert!(results[5].is_ok());

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                err
            );
        }
    }

    #[test]
    fn test_scanner_11_positions_are_one_based() {
        let scanner = Scanner::new(b"ab\n  cd");
        let tokens: Vec<Token> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens[0].lexeme, "ab");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].col, 1);

        assert_eq!(tokens[1].lexeme, "cd");
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].col, 3);
    }

    #[test]
    fn test_scanner_12_exactly_one_eof() {
        let mut scanner = Scanner::new(b"1");

        assert!(scanner.next().is_some()); // NUMBER
        let eof = scanner.next();
        assert!(matches!(
            eof,
            Some(Ok(Token {
                token_type: TokenType::EOF,
                ..
            }))
        ));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none()); // fused
    }
}
