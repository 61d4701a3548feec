mod common;
use cinebrew::mach::{Builtins, Runtime};
use common::*;

#[test]
fn test_sum_loop() {
    let source = r#"
# sum of 1..5
TAKE i = 1;
TAKE sum = 0;
LOOP i <= 5 {
    sum = sum + i;
    i = i + 1;
}
POUR sum;
"#;
    assert_eq!(run_source(source), "15\n");
}

#[test]
fn test_recursive_factorial() {
    let source = r#"
POUR fact(5);
SCENE fact(n) {
    IF n <= 1 {
        SHOT 1;
    }
    SHOT n * fact(n - 1);
}
"#;
    assert_eq!(run_source(source), "120\n");
}

#[test]
fn test_call_before_definition() {
    let source = "POUR twice(21);\nSCENE twice(x) { SHOT x * 2; }";
    assert_eq!(run_source(source), "42\n");
}

#[test]
fn test_function_without_shot() {
    assert_eq!(run_source("POUR f();\nSCENE f() { TAKE y = 1; }"), "0\n");
}

#[test]
fn test_straight_line_code_stops_in_first_scene() {
    assert_eq!(run_source("SCENE f() { TAKE y = 1; }\nPOUR f();"), "");
    assert_eq!(run_source("POUR 1;\nSCENE f() { POUR 2; }\nPOUR 3;"), "1\n2\n");
}

#[test]
fn test_long_print_loop_completes() {
    let source = "TAKE i = 0;\nLOOP i < 70000 { POUR 1; i = i + 1; }\nPOUR 42;";
    let builtins = Builtins::new();
    let bytecode = cinebrew::compile(source, &builtins).unwrap();
    let mut runtime = Runtime::new(builtins);
    let out = runtime.run(&bytecode).unwrap();
    assert_eq!(out.lines().count(), 70001);
    assert!(out.ends_with("1\n42\n"));
    assert_eq!(runtime.stack_len(), 70001);
}

#[test]
fn test_nested_scene_body_runs_inline() {
    let source = r#"
POUR outer(5);
SCENE outer(a) {
    SCENE inner(b) {
        SHOT b * 2;
    }
    SHOT inner(a) + 1;
}
"#;
    assert_eq!(run_source(source), "10\n");
}

#[test]
fn test_literals() {
    assert_eq!(run_source("POUR \"Hi there\";"), "Hi there\n");
    assert_eq!(run_source("POUR true;\nPOUR false;"), "1\n0\n");
    assert_eq!(run_source("POUR - 5;"), "-5\n");
    assert_eq!(run_source("POUR -5;"), "-5\n");
}

#[test]
fn test_comparisons() {
    let source = "TAKE a = 3;\nPOUR a != 3;\nPOUR a >= 3;\nPOUR a <= 2;\nPOUR a == 3;";
    assert_eq!(run_source(source), "0\n1\n0\n1\n");
}

#[test]
fn test_arithmetic() {
    assert_eq!(run_source("POUR 2 + 3 * 4;"), "14\n");
    assert_eq!(run_source("POUR (2 + 3) * 4;"), "20\n");
    assert_eq!(run_source("POUR 10 - 4 - 3;"), "3\n");
    assert_eq!(run_source("POUR 7 / 2;"), "3\n");
    assert_eq!(run_source("POUR 1 / 0;"), "0\n");
}

#[test]
fn test_if_else() {
    let source = "TAKE x = 0;\nIF x > 0 { POUR 1; } ELSE { POUR 2; }";
    assert_eq!(run_source(source), "2\n");
}

#[test]
fn test_break_falls_through() {
    let source = "TAKE i = 0;\nLOOP i < 2 {\n    i = i + 1;\n    BREAK;\n    POUR i;\n}";
    assert_eq!(run_source(source), "1\n2\n");
}

#[test]
fn test_runaway_loop() {
    assert_eq!(
        run_source("LOOP true { }"),
        "\n5000 Execution cycles exceeded.\n"
    );
}

#[test]
fn test_builtins() {
    assert_eq!(run_source("print(5);"), "5\n");
    assert_eq!(run_source("POUR max(3, 9) + min(2, abs(-7));"), "11\n");
    assert_eq!(run_source("POUR getScreenWidth() * getScreenHeight();"), "480000\n");
    assert_eq!(run_source("POUR keyPressed(32);"), "0\n");
}

#[test]
fn test_compile_errors() {
    assert_eq!(
        run_source("POUR x;"),
        "SEMANTIC UNDEFINED VARIABLE IN LINE 1; Undefined variable: 'x'\n"
    );
    assert_eq!(
        run_source("POUR 1"),
        "PARSER SYNTAX ERROR IN LINE 1; Expected ';' after POUR statement at end\n"
    );
    assert!(run_source("POUR 1.5;").starts_with("LEXER UNSUPPORTED NUMBER IN LINE 1"));
    assert_eq!(
        run_source("SCENE f(n) { n = 1; }"),
        "SEMANTIC READ-ONLY PARAMETER IN LINE 1; Cannot assign to parameter 'n'\n"
    );
}
