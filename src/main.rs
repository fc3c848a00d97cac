use shiftlang::lang::Number;
use shiftlang::mach::{compile, Bindings, Runtime};
use std::process::exit;

const USAGE: &str = "usage: shiftlang [--list] <script> [NAME=VALUE]...";

/// Compiles and runs one macro script. Bindings come from the command
/// line as `NAME=VALUE`; values that parse as numbers bind as numbers,
/// anything else binds as a string. Output messages go to stdout as
/// `channel<TAB>value`, diagnostics to stderr.
fn main() {
    let mut args = std::env::args().skip(1).peekable();
    let list = match args.peek().map(String::as_str) {
        Some("--list") => {
            args.next();
            true
        }
        _ => false,
    };
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("{}", USAGE);
            exit(2);
        }
    };
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            exit(2);
        }
    };
    let program = compile(&source);
    if let Some(error) = program.error() {
        eprintln!("{}", error);
        exit(1);
    }
    if list {
        print!("{}", program);
        return;
    }
    let mut bindings = Bindings::new();
    for arg in args {
        let mut parts = arg.splitn(2, '=');
        let (name, value) = match (parts.next(), parts.next()) {
            (Some(name), Some(value)) if !name.is_empty() => (name, value),
            _ => {
                eprintln!("{}", USAGE);
                exit(2);
            }
        };
        match Number::from_literal(value) {
            Some(n) => bindings.set(name, n),
            None => bindings.set(name, value),
        }
    }
    let result = Runtime::new(&program, &bindings).execute();
    if let Some(error) = result.error() {
        eprintln!("{}", error);
        exit(1);
    }
    for message in result.messages() {
        println!("{}\t{}", message.channel, message.value);
    }
}
