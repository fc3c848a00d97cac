use shiftlang::mach::{compile, Bindings, ExecutionResult, Runtime};

pub fn run(source: &str) -> ExecutionResult {
    run_with(source, &Bindings::new())
}

pub fn run_with(source: &str, bindings: &Bindings) -> ExecutionResult {
    let program = compile(source);
    Runtime::new(&program, bindings).execute()
}

/// Runs a script expected to succeed and returns the output values in
/// emission order.
pub fn outputs(source: &str) -> Vec<String> {
    outputs_with(source, &Bindings::new())
}

pub fn outputs_with(source: &str, bindings: &Bindings) -> Vec<String> {
    let result = run_with(source, bindings);
    if let Some(error) = result.error() {
        panic!("unexpected fault: {}", error);
    }
    result
        .messages()
        .iter()
        .map(|m| m.value.clone())
        .collect()
}
