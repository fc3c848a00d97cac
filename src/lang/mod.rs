/*!
## Language module

Lexical analysis and parsing of the macro language. Everything here is
pure: source text goes in, a statement tree or an [`Error`] comes out.

*/

#[macro_use]
mod error;
mod lex;
mod line;
mod number;
mod parse;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use line::Line;
pub use number::Number;
pub use parse::parse;
pub use token::{Literal, Operator, Token, Word};

pub mod ast;

/// 1-based source line used in diagnostics.
pub type LineNumber = usize;
