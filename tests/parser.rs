#[cfg(test)]
mod parser_tests {
    use rill::ast_printer::AstPrinter;
    use rill::diagnostics::Diagnostics;
    use rill::expr::NodeIds;
    use rill::parser::Parser;
    use rill::scanner::Scanner;
    use rill::stmt::Stmt;
    use rill::token::Token;

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("scan failed")
    }

    /// Parse a single expression and return its printed prefix form.
    fn printed(source: &str) -> String {
        let tokens = scan(source);
        let mut ids = NodeIds::new();
        let mut diag = Diagnostics::new();
        let mut parser = Parser::new(&tokens, &mut ids, &mut diag);

        let expr = parser.parse_expression().expect("parse failed");
        AstPrinter::print(&expr)
    }

    /// Parse a program, returning the statements and whether errors were
    /// reported.
    fn parse_program(source: &str) -> (Vec<Stmt>, bool) {
        let tokens = scan(source);
        let mut ids = NodeIds::new();
        let mut diag = Diagnostics::new();
        let mut parser = Parser::new(&tokens, &mut ids, &mut diag);

        let statements = parser.parse();
        (statements, diag.had_error())
    }

    #[test]
    fn test_additive_vs_multiplicative_precedence() {
        assert_eq!(printed("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(printed("(2 + 3) * 4"), "(* (group (+ 2.0 3.0)) 4.0)");
    }

    #[test]
    fn test_modulo_binds_tighter_than_multiplicative() {
        assert_eq!(printed("2 * 3 % 4"), "(* 2.0 (% 3.0 4.0))");
        assert_eq!(printed("10 % 4 % 3"), "(% (% 10.0 4.0) 3.0)");
    }

    #[test]
    fn test_exponent_is_right_associative_and_tightest_binary() {
        assert_eq!(printed("2 ** 3 ** 2"), "(** 2.0 (** 3.0 2.0))");
        assert_eq!(printed("2 * 3 ** 2"), "(* 2.0 (** 3.0 2.0))");
        assert_eq!(printed("7 % 2 ** 3"), "(% 7.0 (** 2.0 3.0))");
    }

    #[test]
    fn test_bitwise_precedence_chain() {
        // or < xor < and, all below equality's operands
        assert_eq!(printed("1 | 2 ^ 3 & 4"), "(| 1.0 (^ 2.0 (& 3.0 4.0)))");
        assert_eq!(printed("1 & 2 = 3"), "(& 1.0 (= 2.0 3.0))");
    }

    #[test]
    fn test_equality_uses_single_equals() {
        assert_eq!(printed("1 = 2"), "(= 1.0 2.0)");
        assert_eq!(printed("1 != 2"), "(!= 1.0 2.0)");
    }

    #[test]
    fn test_logical_operators_nest_below_bitwise() {
        assert_eq!(printed("a and b or c"), "(or (and a b) c)");
        assert_eq!(printed("a or b | c"), "(or a (| b c))");
    }

    #[test]
    fn test_conditional_right_associative() {
        assert_eq!(printed("a ? b : c ? d : e"), "(?: a b (?: c d e))");
        assert_eq!(printed("a or b ? c : d"), "(?: (or a b) c d)");
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(printed("-x"), "(- x)");
        assert_eq!(printed("not ready"), "(not ready)");
        assert_eq!(printed("~5"), "(~ 5.0)");
        assert_eq!(printed("- -1"), "(- (- 1.0))");
    }

    #[test]
    fn test_assignment_right_associative_and_targets() {
        assert_eq!(printed("a := b := 1"), "(:= a (:= b 1.0))");
        assert_eq!(printed("obj.field := 1"), "(set obj field 1.0)");
        assert_eq!(printed("a.b.c"), "(get (get a b) c)");
        assert_eq!(printed("f(1)(2)"), "(call (call f 1.0) 2.0)");
        assert_eq!(printed("self.x"), "(get self x)");
    }

    #[test]
    fn test_invalid_assignment_target_is_error() {
        let (_, had_error) = parse_program("1 := 2;");
        assert!(had_error, "literal assignment target must be rejected");

        let (_, had_error) = parse_program("a + b := 2;");
        assert!(had_error, "binary assignment target must be rejected");
    }

    #[test]
    fn test_statement_forms_parse() {
        let source = r#"
            let x := 1;
            define add(a, b) { return a + b; }
            class Point {
                init(x, y) { self.x := x; self.y := y; }
                sum() { return self.x + self.y; }
            }
            if (x < 2) print "small"; else print "big";
            while (x < 10) x := x + 1;
            do { x := x - 1; } while (x > 0);
            for (let i := 0; i < 3; i := i + 1) { print i; }
            switch (x) {
                case 0: print "zero"; break;
                case 1: print "one";
                default: print "other";
            }
            print add(x, 2);
        "#;

        let (statements, had_error) = parse_program(source);

        assert!(!had_error, "program should parse cleanly");
        assert_eq!(statements.len(), 9);

        assert!(matches!(statements[0], Stmt::Let { .. }));
        assert!(matches!(statements[1], Stmt::Function(_)));
        assert!(matches!(statements[2], Stmt::Class { .. }));
        assert!(matches!(statements[3], Stmt::If { .. }));
        assert!(matches!(statements[4], Stmt::While { .. }));
        assert!(matches!(statements[5], Stmt::DoWhile { .. }));
        assert!(matches!(statements[6], Stmt::For { .. }));
        assert!(matches!(statements[7], Stmt::Switch { .. }));
        assert!(matches!(statements[8], Stmt::Print(_)));
    }

    #[test]
    fn test_switch_branch_layout() {
        let (statements, had_error) = parse_program(
            "switch (n) { case 1: print \"a\"; print \"b\"; default: print \"c\"; }",
        );

        assert!(!had_error);

        let Stmt::Switch { branches, .. } = &statements[0] else {
            panic!("expected switch");
        };

        assert_eq!(branches.len(), 2);
        assert!(branches[0].label.is_some());
        assert_eq!(branches[0].body.len(), 2);
        assert!(branches[1].label.is_none()); // default sentinel is None
        assert_eq!(branches[1].body.len(), 1);
    }

    #[test]
    fn test_duplicate_case_and_default_reported() {
        let (_, had_error) =
            parse_program("switch (n) { case 1: print \"a\"; case 1: print \"b\"; }");
        assert!(had_error, "duplicate case value must be reported");

        let (_, had_error) =
            parse_program("switch (n) { default: print \"a\"; default: print \"b\"; }");
        assert!(had_error, "duplicate default must be reported");

        // A string case "default" does not collide with the default arm.
        let (_, had_error) =
            parse_program("switch (n) { case \"default\": print \"a\"; default: print \"b\"; }");
        assert!(!had_error);
    }

    #[test]
    fn test_case_label_must_be_constant() {
        let (_, had_error) = parse_program("switch (n) { case x: print \"a\"; }");
        assert!(had_error, "non-literal case label must be rejected");
    }

    #[test]
    fn test_arity_cap_is_reported_but_non_fatal() {
        let (statements, had_error) =
            parse_program("f(1, 2, 3, 4, 5, 6, 7, 8, 9);\nprint 1;");

        assert!(had_error, "ninth argument must be reported");
        // Parsing continued: both statements present.
        assert_eq!(statements.len(), 2);

        let (statements, had_error) =
            parse_program("define f(a, b, c, d, e, g, h, i, j) { return 0; }\nprint 1;");

        assert!(had_error, "ninth parameter must be reported");
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_panic_mode_recovers_at_statement_boundary() {
        let (statements, had_error) = parse_program("let := 3;\nprint 1;\nlet y 2;\nprint 2;");

        assert!(had_error);

        // Both malformed declarations were discarded; both prints survive.
        let prints = statements
            .iter()
            .filter(|s| matches!(s, Stmt::Print(_)))
            .count();
        assert_eq!(prints, 2);
    }
}
