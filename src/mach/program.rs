use super::{Address, Opcode};
use crate::lang::ast::Name;
use crate::lang::{Error, LineNumber};
use std::collections::HashMap;

/// ## Compiled artifact
///
/// Immutable once built: the instruction stream, the source line for
/// each instruction, the slot layout, and the names of the external
/// inputs the script imported. A `Program` holds no run state and no
/// bindings, so one compilation can be evaluated any number of times
/// concurrently with different inputs.
///
/// Compilation never fails outright; a broken script still yields a
/// `Program` carrying its diagnostic, which [`super::Runtime`] reports
/// on execution.
#[derive(Debug)]
pub struct Program {
    ops: Vec<Opcode>,
    lines: Vec<LineNumber>,
    externals: HashMap<Name, Address>,
    functions: Vec<(Name, Address, usize)>,
    slot_count: usize,
    error: Option<Error>,
}

impl Program {
    pub(crate) fn from_parts(
        ops: Vec<Opcode>,
        lines: Vec<LineNumber>,
        externals: HashMap<Name, Address>,
        functions: Vec<(Name, Address, usize)>,
        slot_count: usize,
    ) -> Program {
        Program {
            ops,
            lines,
            externals,
            functions,
            slot_count,
            error: None,
        }
    }

    pub(crate) fn from_error(error: Error) -> Program {
        Program {
            ops: vec![],
            lines: vec![],
            externals: HashMap::new(),
            functions: vec![],
            slot_count: 0,
            error: Some(error),
        }
    }

    /// The compile-time diagnostic, if the script failed to compile.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True when the script declared `name` as an external input.
    /// Names are folded to uppercase, matching the language.
    pub fn has_external(&self, name: &str) -> bool {
        self.externals.contains_key(name.to_uppercase().as_str())
    }

    /// Entry address and arity per user function, in definition order.
    pub fn functions(&self) -> &[(Name, Address, usize)] {
        &self.functions
    }

    pub(crate) fn op(&self, addr: Address) -> Option<&Opcode> {
        self.ops.get(addr)
    }

    pub(crate) fn line(&self, addr: Address) -> Option<LineNumber> {
        self.lines.get(addr).copied()
    }

    pub(crate) fn externals(&self) -> &HashMap<Name, Address> {
        &self.externals
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.slot_count
    }
}

/// A disassembly listing, one instruction per line.
impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(error) = &self.error {
            return writeln!(f, "{}", error);
        }
        for (name, entry, arity) in &self.functions {
            writeln!(f, "; FUNCTION {}/{} AT {}", name, arity, entry)?;
        }
        for (addr, op) in self.ops.iter().enumerate() {
            writeln!(f, "{:>4}: {}", addr, op)?;
        }
        Ok(())
    }
}
