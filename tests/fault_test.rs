mod common;
use common::*;
use shiftlang::lang::ErrorCode;

#[test]
fn test_division_by_zero() {
    let result = run("OUTPUT 1, 1\nOUTPUT 1, 6 / 0");
    assert!(!result.success());
    assert!(result.messages().is_empty());
    let e = result.error().unwrap();
    assert_eq!(e.code(), ErrorCode::DivisionByZero);
    assert_eq!(e.line_number(), Some(2));
    assert!(!e.is_internal());
}

#[test]
fn test_malformed_time() {
    let result = run("OUTPUT 1, TimeToHours(\"25:99\")");
    let e = result.error().unwrap();
    assert_eq!(e.code(), ErrorCode::MalformedTime);
    assert_eq!(e.line_number(), Some(1));
}

#[test]
fn test_malformed_time_from_binding() {
    let mut bindings = shiftlang::mach::Bindings::new();
    bindings.set("start", "noon");
    let result = run_with("IMPORT start\nOUTPUT 1, TimeToHours(start)", &bindings);
    assert_eq!(result.error().unwrap().code(), ErrorCode::MalformedTime);
}

#[test]
fn test_type_mismatch() {
    let result = run("OUTPUT 1, \"a\" + 1");
    assert_eq!(result.error().unwrap().code(), ErrorCode::TypeMismatch);
    let result = run("OUTPUT 1, \"a\" < \"b\"");
    assert_eq!(result.error().unwrap().code(), ErrorCode::TypeMismatch);
}

#[test]
fn test_undefined_variable() {
    let result = run("OUTPUT 1, bonus");
    let e = result.error().unwrap();
    assert_eq!(e.code(), ErrorCode::UndefinedVariable);
    assert_eq!(e.line_number(), Some(1));
}

#[test]
fn test_undefined_function() {
    let result = run("OUTPUT 1, Bonus(1)");
    assert_eq!(result.error().unwrap().code(), ErrorCode::UndefinedFunction);
}

#[test]
fn test_duplicate_declaration() {
    let result = run("IMPORT rate\nIMPORT rate");
    let e = result.error().unwrap();
    assert_eq!(e.code(), ErrorCode::DuplicateDeclaration);
    assert_eq!(e.line_number(), Some(2));
}

#[test]
fn test_wrong_argument_count() {
    let result = run("OUTPUT 1, TimeOverlap(\"01:00\", \"02:00\")");
    assert_eq!(
        result.error().unwrap().code(),
        ErrorCode::WrongArgumentCount
    );

    let source = "\
FUNCTION Double(n)
Double = n * 2
ENDFUNCTION
OUTPUT 1, Double(1, 2)";
    let result = run(source);
    assert_eq!(
        result.error().unwrap().code(),
        ErrorCode::WrongArgumentCount
    );
}

#[test]
fn test_round_digits_must_be_integral() {
    let result = run("OUTPUT 1, Round(3.14, 1.5)");
    assert_eq!(result.error().unwrap().code(), ErrorCode::TypeMismatch);
}

#[test]
fn test_syntax_error_surfaces_on_execute() {
    let result = run("IF 1 THEN\nOUTPUT 1, 1");
    let e = result.error().unwrap();
    assert_eq!(e.code(), ErrorCode::SyntaxError);
    assert_eq!(e.to_string(), "SYNTAX ERROR IN LINE 1; IF WITHOUT ENDIF");
}

#[test]
fn test_assignment_to_undeclared_name() {
    let result = run("bonus = 10");
    assert_eq!(result.error().unwrap().code(), ErrorCode::UndefinedVariable);
}
