#[cfg(test)]
mod resolver_tests {
    use rill::diagnostics::Diagnostics;
    use rill::expr::NodeIds;
    use rill::interpreter::Interpreter;
    use rill::parser::Parser;
    use rill::resolver::Resolver;
    use rill::scanner::Scanner;
    use rill::token::Token;

    /// Run scan + parse + resolve; return whether any static error was
    /// reported.  Panics if the program fails before the resolver gets to
    /// run, so these tests only exercise resolution rules.
    fn resolve_errors(source: &str) -> bool {
        let tokens: Vec<Token> = Scanner::new(source.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("scan failed");

        let mut ids = NodeIds::new();
        let mut diag = Diagnostics::new();

        let statements = Parser::new(&tokens, &mut ids, &mut diag).parse();
        assert!(!diag.had_error(), "program must parse cleanly: {}", source);

        let mut interpreter = Interpreter::new();
        let mut resolver = Resolver::new(&mut interpreter, &mut diag);
        resolver.resolve(&statements);

        diag.had_error()
    }

    #[test]
    fn test_redeclaration_in_same_scope_is_error() {
        assert!(resolve_errors("{ let a := 1; let a := 2; }"));
    }

    #[test]
    fn test_shadowing_across_scopes_is_fine() {
        assert!(!resolve_errors("{ let a := 1; { let a := 2; } }"));
    }

    #[test]
    fn test_read_in_own_initializer_is_error() {
        assert!(resolve_errors("{ let a := 1; { let a := a + 1; } }"));
    }

    #[test]
    fn test_global_initializer_from_outer_is_fine() {
        // At top level the declaration goes to the global frame; reading
        // another binding there is ordinary.
        assert!(!resolve_errors("let a := 1; let b := a + 1;"));
    }

    #[test]
    fn test_return_outside_function_is_error() {
        assert!(resolve_errors("return 1;"));
        assert!(!resolve_errors("define f() { return 1; }"));
    }

    #[test]
    fn test_break_outside_loop_or_switch_is_error() {
        assert!(resolve_errors("break;"));
        assert!(resolve_errors("if (true) break;"));

        assert!(!resolve_errors("while (true) break;"));
        assert!(!resolve_errors("do { break; } while (true);"));
        assert!(!resolve_errors("for (;;) break;"));
        assert!(!resolve_errors("switch (1) { case 1: break; }"));
    }

    #[test]
    fn test_continue_needs_a_loop_not_a_switch() {
        assert!(resolve_errors("continue;"));
        assert!(resolve_errors("switch (1) { case 1: continue; }"));

        assert!(!resolve_errors("while (true) continue;"));
        assert!(!resolve_errors(
            "while (true) { switch (1) { case 1: continue; } }"
        ));
    }

    #[test]
    fn test_loop_context_does_not_cross_function_boundary() {
        assert!(resolve_errors(
            "while (true) { define f() { break; } }"
        ));
        assert!(resolve_errors(
            "while (true) { define f() { continue; } }"
        ));
    }

    #[test]
    fn test_self_outside_class_is_error() {
        assert!(resolve_errors("print self;"));
        assert!(resolve_errors("define f() { return self; }"));

        assert!(!resolve_errors(
            "class C { who() { return self; } }"
        ));
    }

    #[test]
    fn test_return_outside_function_even_inside_loop() {
        assert!(resolve_errors("while (true) return 1;"));
    }

    #[test]
    fn test_method_parameters_open_their_own_scope() {
        assert!(!resolve_errors(
            "class C { set(v) { self.v := v; } get() { return self.v; } }"
        ));
    }
}
