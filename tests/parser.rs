use pretty_assertions::assert_eq;

use rox::ast::{Expr, LiteralValue, Stmt};
use rox::ast_printer::AstPrinter;
use rox::error::Diagnostics;
use rox::parser::Parser;
use rox::scanner::scan_tokens;

fn parse_program(source: &str) -> (Vec<Stmt>, Vec<String>) {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(source, &mut diagnostics);
    let statements = Parser::new(&tokens, &mut diagnostics).parse();
    let errors = diagnostics.errors().iter().map(ToString::to_string).collect();

    (statements, errors)
}

fn print_expression(source: &str) -> String {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(source, &mut diagnostics);
    let expr = Parser::new(&tokens, &mut diagnostics)
        .parse_expression()
        .expect("expression should parse");

    assert!(!diagnostics.had_error(), "{:?}", diagnostics.errors());

    AstPrinter::print(&expr)
}

#[test]
fn precedence_and_left_associativity() {
    assert_eq!(print_expression("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
    assert_eq!(print_expression("1 - 2 - 3"), "(- (- 1.0 2.0) 3.0)");
    assert_eq!(print_expression("8 / 4 / 2"), "(/ (/ 8.0 4.0) 2.0)");
    assert_eq!(print_expression("-(1 + 2.5)"), "(- (group (+ 1.0 2.5)))");
    assert_eq!(print_expression("!!true"), "(! (! true))");
    assert_eq!(
        print_expression("1 < 2 == 3 >= 4"),
        "(== (< 1.0 2.0) (>= 3.0 4.0))"
    );
}

#[test]
fn logical_operators_bind_looser_than_equality() {
    assert_eq!(
        print_expression("a or b and c == nil"),
        "(or a (and b (== c nil)))"
    );
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(print_expression("a = b = \"x\""), "(= a (= b x))");
}

#[test]
fn calls_chain_and_take_arguments() {
    assert_eq!(
        print_expression("f(1, g(2))(3)"),
        "(call (call f 1.0 (call g 2.0)) 3.0)"
    );
    assert_eq!(print_expression("clock()"), "(call clock)");
}

#[test]
fn for_loop_desugars_into_block_and_while() {
    let (statements, errors) = parse_program("for (var i = 0; i < 3; i = i + 1) print i;");

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(statements.len(), 1);

    let Stmt::Block(outer) = &statements[0] else {
        panic!("expected a block, got {:?}", statements[0]);
    };
    assert!(matches!(outer[0], Stmt::Var { .. }));

    let Stmt::While { condition, body } = &outer[1] else {
        panic!("expected a while loop, got {:?}", outer[1]);
    };
    assert_eq!(AstPrinter::print(condition), "(< i 3.0)");

    let Stmt::Block(inner) = body.as_ref() else {
        panic!("expected the body block, got {:?}", body);
    };
    assert!(matches!(inner[0], Stmt::Print(_)));
    let Stmt::Expression(increment) = &inner[1] else {
        panic!("expected the increment, got {:?}", inner[1]);
    };
    assert_eq!(AstPrinter::print(increment), "(= i (+ i 1.0))");
}

#[test]
fn empty_for_clauses_loop_forever_on_true() {
    let (statements, errors) = parse_program("for (;;) print 1;");

    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::While { condition, body } = &statements[0] else {
        panic!("expected a bare while loop, got {:?}", statements[0]);
    };
    assert_eq!(*condition, Expr::Literal(LiteralValue::True));
    assert!(matches!(body.as_ref(), Stmt::Print(_)));
}

#[test]
fn function_declaration_keeps_params_and_body() {
    let (statements, errors) = parse_program("fun add(a, b) { return a + b; }");

    assert!(errors.is_empty(), "{:?}", errors);

    let Stmt::Function(decl) = &statements[0] else {
        panic!("expected a function, got {:?}", statements[0]);
    };
    assert_eq!(decl.name.lexeme, "add");
    assert_eq!(
        decl.params.iter().map(|p| p.lexeme.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    assert!(matches!(decl.body[0], Stmt::Return { value: Some(_), .. }));
}

#[test]
fn missing_semicolon_is_reported_at_the_next_token() {
    let (_, errors) = parse_program("print 1\nprint 2;");

    assert_eq!(errors, vec!["[line 2] Error at 'print': Expected ';' after value."]);
}

#[test]
fn error_at_end_of_input() {
    let (_, errors) = parse_program("print (1 + 2");

    assert_eq!(
        errors,
        vec!["[line 1] Error at end: Expected ')' after expression."]
    );
}

#[test]
fn synchronization_reports_independent_errors_in_one_pass() {
    let source = "var = 1;\nprint 2;\nvar x = ;\nprint 3;";
    let (statements, errors) = parse_program(source);

    assert_eq!(
        errors,
        vec![
            "[line 1] Error at '=': Expected variable name.",
            "[line 3] Error at ';': Expected expression.",
        ]
    );

    // Both well-formed prints survive recovery.
    assert_eq!(
        statements
            .iter()
            .filter(|s| matches!(s, Stmt::Print(_)))
            .count(),
        2
    );
}

#[test]
fn invalid_assignment_target_does_not_abort_the_statement() {
    let (statements, errors) = parse_program("1 + 2 = 3; print 4;");

    assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);
    assert_eq!(statements.len(), 2);
}

#[test]
fn errors_inside_blocks_recover_within_the_block() {
    let (_, errors) = parse_program("{\n  var a = 1\n  print a;\n  print ;\n}");

    assert_eq!(
        errors,
        vec![
            "[line 3] Error at 'print': Expected ';' after variable declaration.",
            "[line 4] Error at ';': Expected expression.",
        ]
    );
}

#[test]
fn too_many_arguments_is_reported() {
    let args = vec!["1"; 256].join(", ");
    let (statements, errors) = parse_program(&format!("f({});", args));

    assert_eq!(
        errors,
        vec!["[line 1] Error at '1': Can't have more than 255 arguments."]
    );
    assert_eq!(statements.len(), 1);
}

#[test]
fn trailing_tokens_after_an_expression_are_rejected() {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens("1 2", &mut diagnostics);
    let expr = Parser::new(&tokens, &mut diagnostics).parse_expression();

    assert!(expr.is_none());
    assert_eq!(
        diagnostics
            .errors()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["[line 1] Error at '2': Expected end of expression."]
    );
}

#[test]
fn deeply_nested_groupings_parse() {
    let depth = 2000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

    let printed = print_expression(&source);

    assert!(printed.starts_with("(group (group "));
    assert_eq!(printed.matches("group").count(), depth);
}
