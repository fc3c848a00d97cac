use super::{codegen, Program};
use crate::lang::{lex, parse};

/// Compiles a macro script into a [`Program`].
///
/// This never returns an error: a script that fails to lex, parse or
/// generate still produces a `Program` carrying the diagnostic, which
/// surfaces when the program is executed. Callers that want to reject a
/// script up front can check [`Program::error`].
pub fn compile(source: &str) -> Program {
    let result = lex(source)
        .and_then(|lines| parse(&lines))
        .and_then(|ast| codegen::generate(&ast));
    match result {
        Ok(program) => {
            log::debug!("compiled {} ops", program.len());
            program
        }
        Err(error) => {
            log::debug!("compile failed: {}", error);
            Program::from_error(error)
        }
    }
}
