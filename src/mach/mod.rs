/*!
## Machine module

Code generation and the stack virtual machine. A script compiles once
into an immutable [`Program`]; each evaluation builds a fresh
[`Runtime`] over that program plus a per-run set of [`Bindings`].

*/

/// Index into the instruction stream.
pub type Address = usize;
/// Generation-time placeholder for a not-yet-known Address.
pub type Symbol = usize;

mod codegen;
mod compile;
mod function;
mod link;
mod opcode;
mod operation;
mod program;
mod runtime;
mod stack;
mod val;

pub use compile::compile;
pub use function::Function;
pub use opcode::Opcode;
pub use program::Program;
pub use runtime::Bindings;
pub use runtime::ExecutionResult;
pub use runtime::Message;
pub use runtime::Runtime;
pub use val::Val;
