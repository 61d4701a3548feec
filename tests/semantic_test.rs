use cinebrew::lang::{analyze, lex, parse, Analyzer, Keywords, SymbolKind};
use cinebrew::mach::Builtins;

fn errors(source: &str) -> Vec<String> {
    let keywords = Keywords::new();
    let builtins = Builtins::new();
    let program = parse(&lex(source, &keywords).unwrap()).unwrap();
    match analyze(&program, &builtins) {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}

#[test]
fn test_clean_program() {
    let source = "\
TAKE total = 0;
SCENE bump(by) { total = total + by; SHOT total; }
LOOP total < 10 { bump(random(3)); }
POUR total;";
    assert_eq!(errors(source), Vec::<String>::new());
}

#[test]
fn test_redeclaration() {
    assert_eq!(
        errors("TAKE a = 1;\nTAKE a = 2;"),
        vec!["SEMANTIC REDECLARATION IN LINE 2; Redeclaration of 'a' (first declared at line 1)"]
    );
    assert_eq!(
        errors("SCENE f() {}\nSCENE f() {}"),
        vec!["SEMANTIC REDECLARATION IN LINE 2; Redeclaration of 'f' (first declared at line 1)"]
    );
    assert_eq!(
        errors("SCENE f() {}\nTAKE f = 1;"),
        vec!["SEMANTIC REDECLARATION IN LINE 2; Redeclaration of 'f' (first declared at line 1)"]
    );
}

#[test]
fn test_kinds() {
    assert_eq!(
        errors("TAKE a = 1;\nPOUR a();"),
        vec!["SEMANTIC NOT A FUNCTION IN LINE 2; 'a' is a variable, not a function"]
    );
    assert_eq!(
        errors("SCENE f() {}\nPOUR f;"),
        vec!["SEMANTIC NOT A VARIABLE IN LINE 2; 'f' is a function, not a variable"]
    );
    assert_eq!(
        errors("g();"),
        vec!["SEMANTIC UNDEFINED FUNCTION IN LINE 1; Undefined function: 'g'"]
    );
    assert_eq!(
        errors("x = 1;"),
        vec!["SEMANTIC UNDEFINED VARIABLE IN LINE 1; Undefined variable: 'x'"]
    );
}

#[test]
fn test_arity() {
    assert_eq!(
        errors("POUR max(1);"),
        vec!["SEMANTIC WRONG NUMBER OF ARGUMENTS IN LINE 1; Built-in function 'max' expects 2 argument(s), but got 1"]
    );
    assert_eq!(
        errors("SCENE f(a, b) { SHOT a; }\nPOUR f(1, 2, 3);"),
        vec!["SEMANTIC WRONG NUMBER OF ARGUMENTS IN LINE 2; Function 'f' expects 2 argument(s), but got 3"]
    );
}

#[test]
fn test_arguments_checked_even_on_bad_call() {
    assert_eq!(errors("POUR abs(y, z);").len(), 3);
}

#[test]
fn test_declaration_after_use() {
    assert_eq!(
        errors("POUR a;\nTAKE a = 1;"),
        vec!["SEMANTIC UNDEFINED VARIABLE IN LINE 1; Undefined variable: 'a'"]
    );
    assert_eq!(
        errors("TAKE a = a;"),
        vec!["SEMANTIC UNDEFINED VARIABLE IN LINE 1; Undefined variable: 'a'"]
    );
}

#[test]
fn test_parameters() {
    assert_eq!(errors("SCENE sq(n) { SHOT n * n; }\nPOUR sq(4);"), Vec::<String>::new());
    assert_eq!(
        errors("SCENE f(n) { n = 2; }"),
        vec!["SEMANTIC READ-ONLY PARAMETER IN LINE 1; Cannot assign to parameter 'n'"]
    );
    assert_eq!(
        errors("SCENE f(n) { SHOT n; }\nPOUR n;"),
        vec!["SEMANTIC UNDEFINED VARIABLE IN LINE 2; Undefined variable: 'n'"]
    );
}

#[test]
fn test_nested_scene_declared_when_reached() {
    let source = "\
SCENE outer() {
  SCENE inner() { SHOT 1; }
  SHOT inner();
}
POUR outer();";
    assert_eq!(errors(source), Vec::<String>::new());
    assert_eq!(
        errors("POUR late();\n{ SCENE late() { SHOT 2; } }"),
        vec!["SEMANTIC UNDEFINED FUNCTION IN LINE 1; Undefined function: 'late'"]
    );
}

#[test]
fn test_symbol_table() {
    let keywords = Keywords::new();
    let builtins = Builtins::new();
    let program = parse(&lex("TAKE a = 1;\nSCENE f(x, y) {}", &keywords).unwrap()).unwrap();
    let mut analyzer = Analyzer::new(&builtins);
    analyzer.analyze(&program);
    assert!(!analyzer.had_error());
    let f = analyzer.symbol("f").unwrap();
    assert_eq!((f.kind, f.line, f.params), (SymbolKind::Function, 2, 2));
    let a = analyzer.symbol("a").unwrap();
    assert_eq!((a.kind, a.line), (SymbolKind::Variable, 1));
    assert_eq!(analyzer.errors().len(), 0);
    assert!(analyzer.symbol("x").is_none());
}
