mod common;
use common::*;
use shiftlang::mach::{compile, Bindings, Runtime};

#[test]
fn test_unbound_import_is_zero() {
    assert_eq!(outputs("IMPORT rate\nOUTPUT 1, rate"), vec!["0"]);
}

#[test]
fn test_binding_case_is_irrelevant() {
    let mut bindings = Bindings::new();
    bindings.set("shiftstart", "22:00");
    assert_eq!(
        outputs_with("IMPORT ShiftStart\nOUTPUT 1, SHIFTSTART", &bindings),
        vec!["22:00"]
    );
}

#[test]
fn test_unimported_binding_is_ignored() {
    let mut bindings = Bindings::new();
    bindings.set("rate", 20);
    bindings.set("unrelated", 999);
    assert_eq!(outputs_with("IMPORT rate\nOUTPUT 1, rate", &bindings), vec!["20"]);
}

#[test]
fn test_program_reused_with_different_bindings() {
    let program = compile("IMPORT rate\nIMPORT hours\nOUTPUT 1, rate * hours");
    assert!(program.error().is_none());

    let mut weekday = Bindings::new();
    weekday.set("rate", 20);
    weekday.set("hours", 8);
    let result = Runtime::new(&program, &weekday).execute();
    assert_eq!(result.messages()[0].value, "160");

    let mut sunday = Bindings::new();
    sunday.set("rate", 30);
    sunday.set("hours", 6);
    let result = Runtime::new(&program, &sunday).execute();
    assert_eq!(result.messages()[0].value, "180");
}

#[test]
fn test_program_shared_across_threads() {
    let program = compile("IMPORT rate\nIMPORT hours\nOUTPUT 1, rate * hours");
    assert!(program.error().is_none());
    std::thread::scope(|scope| {
        for (rate, hours, expected) in [(20, 8, "160"), (30, 6, "180"), (25, 10, "250")] {
            let program = &program;
            scope.spawn(move || {
                let mut bindings = Bindings::new();
                bindings.set("rate", rate);
                bindings.set("hours", hours);
                let result = Runtime::new(program, &bindings).execute();
                assert!(result.success());
                assert_eq!(result.messages()[0].value, expected);
            });
        }
    });
}

#[test]
fn test_has_external() {
    let program = compile("IMPORT NightRate");
    assert!(program.has_external("nightrate"));
    assert!(program.has_external("NIGHTRATE"));
    assert!(!program.has_external("dayrate"));
}

#[test]
fn test_string_and_number_bindings() {
    let mut bindings = Bindings::new();
    bindings.set("start", "23:00");
    bindings.set("rate", 21);
    let source = "IMPORT start\nIMPORT rate\nOUTPUT 1, start\nOUTPUT 2, rate + 1";
    assert_eq!(outputs_with(source, &bindings), vec!["23:00", "22"]);
}
