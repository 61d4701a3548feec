use cinebrew::lang::ast::*;
use cinebrew::lang::{lex, parse, Keywords, Parser};

fn parse_str(s: &str) -> Program {
    let keywords = Keywords::new();
    parse(&lex(s, &keywords).unwrap()).unwrap()
}

fn parse_error(s: &str) -> String {
    let keywords = Keywords::new();
    parse(&lex(s, &keywords).unwrap()).unwrap_err().to_string()
}

#[test]
fn test_declaration() {
    let answer = Stmt::Declaration(
        1,
        "x".to_string(),
        Expr::Binary(
            1,
            BinaryOp::Add,
            Box::new(Expr::Literal(1, Literal::Integer(1))),
            Box::new(Expr::Literal(1, Literal::Integer(2))),
        ),
    );
    assert_eq!(parse_str("TAKE x = 1 + 2;").statements, vec![answer]);
}

#[test]
fn test_assignment_needs_identifier_then_equal() {
    let program = parse_str("x = 3;\nx == 3;");
    assert!(matches!(program.statements[0], Stmt::Assignment(1, ..)));
    assert!(matches!(program.statements[1], Stmt::Expression(2, Expr::Binary(..))));
}

#[test]
fn test_function() {
    let program = parse_str("SCENE add(a, b) {\n  SHOT a + b;\n}\nPOUR add(1, 2);");
    assert_eq!(
        program.to_string(),
        "SCENE add(a, b)\n  SHOT (+ a b)\nPOUR add(1, 2)\n"
    );
    match &program.statements[0] {
        Stmt::Function(line, name, params, body) => {
            assert_eq!(*line, 1);
            assert_eq!(name, "add");
            assert_eq!(params, &vec!["a".to_string(), "b".to_string()]);
            assert_eq!(body.len(), 1);
        }
        s => panic!("{:?}", s),
    }
}

#[test]
fn test_control_flow() {
    let source = "\
LOOP i < 10 {
  IF i == 5 { BREAK; } ELSE { CONTINUE; }
  { SHOT; }
}";
    assert_eq!(
        parse_str(source).to_string(),
        "LOOP (< i 10)\n  IF (== i 5)\n    BREAK\n  ELSE\n    CONTINUE\n  BLOCK\n    SHOT\n"
    );
}

#[test]
fn test_unary_and_literals() {
    let program = parse_str("POUR - x * -2;\nPOUR true;\nPOUR \"hi\";\nPOUR (1 + 2) * 3;");
    assert_eq!(
        program.to_string(),
        "POUR (* (- x) -2)\nPOUR true\nPOUR \"hi\"\nPOUR (* (+ 1 2) 3)\n"
    );
}

#[test]
fn test_comparison_is_left_associative() {
    assert_eq!(parse_str("a < b == c;").to_string(), "(== (< a b) c)\n");
}

#[test]
fn test_syntax_errors() {
    assert_eq!(
        parse_error("TAKE x = 1\nPOUR x;"),
        "PARSER SYNTAX ERROR IN LINE 2; Expected ';' after variable declaration at 'POUR'"
    );
    assert_eq!(
        parse_error("IF x POUR x;"),
        "PARSER SYNTAX ERROR IN LINE 1; Expected '{' after IF condition at 'POUR'"
    );
    assert_eq!(
        parse_error("POUR ;"),
        "PARSER SYNTAX ERROR IN LINE 1; Expected expression at ';'"
    );
    assert_eq!(
        parse_error("SCENE (a) {}"),
        "PARSER SYNTAX ERROR IN LINE 1; Expected function name at '('"
    );
    assert_eq!(
        parse_error("POUR 99999999999999999999;"),
        "PARSER OVERFLOW IN LINE 1; Integer literal '99999999999999999999' out of range"
    );
}

#[test]
fn test_first_error_wins_and_keeps_prefix() {
    let keywords = Keywords::new();
    let tokens = lex("POUR 1;\nPOUR 2;\nPOUR 3 POUR 4;\nPOUR 5 POUR 6;", &keywords).unwrap();
    let mut parser = Parser::new(&tokens);
    let program = parser.parse();
    assert!(parser.had_error());
    assert_eq!(program.len(), 2);
    assert_eq!(parser.error().and_then(|e| e.line_number()), Some(3));
}

#[test]
fn test_argument_limit() {
    let args: Vec<String> = (0..255).map(|n| n.to_string()).collect();
    let ok = format!("f({});", args.join(", "));
    match &parse_str(&ok).statements[0] {
        Stmt::Expression(_, Expr::Call(_, _, args)) => assert_eq!(args.len(), 255),
        s => panic!("{:?}", s),
    }
    let too_many = format!("f({}, 255);", args.join(", "));
    assert_eq!(
        parse_error(&too_many),
        "PARSER SYNTAX ERROR IN LINE 1; Cannot have more than 255 arguments at '255'"
    );
    let params: Vec<String> = (0..256).map(|n| format!("p{}", n)).collect();
    let source = format!("SCENE f({}) {{}}", params.join(", "));
    assert_eq!(
        parse_error(&source),
        "PARSER SYNTAX ERROR IN LINE 1; Cannot have more than 255 parameters at 'p255'"
    );
}
