use super::{Address, Opcode, Symbol, Val};
use crate::error;
use crate::lang::{Error, LineNumber};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// ## Instruction buffer with symbolic branch targets
///
/// The generator emits branches before it knows where they land. It
/// allocates a [`Symbol`], emits the opcode with the symbol in place of
/// an address, and defines the symbol once the target address is
/// reached. [`Link::link`] patches every symbolic operand to its
/// resolved address.
///
/// Each op also records the 1-based source line it came from, so a
/// runtime fault can point back into the script.
#[derive(Debug, Default)]
pub struct Link {
    ops: Vec<Opcode>,
    lines: Vec<LineNumber>,
    current_symbol: Symbol,
    symbols: HashMap<Symbol, Address>,
    unlinked: HashMap<Address, Symbol>,
}

impl Link {
    pub fn new() -> Link {
        Link::default()
    }

    pub fn push(&mut self, op: Opcode, line: LineNumber) {
        self.ops.push(op);
        self.lines.push(line);
    }

    pub fn next_symbol(&mut self) -> Symbol {
        self.current_symbol += 1;
        self.current_symbol
    }

    /// Defines `symbol` as the address of the next op to be pushed.
    pub fn define_symbol(&mut self, symbol: Symbol) -> Address {
        let addr = self.ops.len();
        self.symbols.insert(symbol, addr);
        addr
    }

    pub fn push_jump(&mut self, symbol: Symbol, line: LineNumber) {
        self.unlinked.insert(self.ops.len(), symbol);
        self.push(Opcode::Jump(0), line);
    }

    pub fn push_ifnot(&mut self, symbol: Symbol, line: LineNumber) {
        self.unlinked.insert(self.ops.len(), symbol);
        self.push(Opcode::IfNot(0), line);
    }

    /// Pushes the return-address literal for a call; the symbol is
    /// defined just after the matching `Jump` to the function entry.
    pub fn push_return_val(&mut self, symbol: Symbol, line: LineNumber) {
        self.unlinked.insert(self.ops.len(), symbol);
        self.push(Opcode::Literal(Val::Return(0)), line);
    }

    pub fn link(mut self) -> Result<(Vec<Opcode>, Vec<LineNumber>)> {
        for (op_addr, symbol) in std::mem::take(&mut self.unlinked) {
            let dest = match self.symbols.get(&symbol) {
                Some(dest) => *dest,
                None => return Err(error!(InternalError; "LINK FAILURE")),
            };
            let op = match self.ops.get_mut(op_addr) {
                Some(op) => op,
                None => return Err(error!(InternalError; "LINK FAILURE")),
            };
            *op = match op {
                Opcode::Jump(_) => Opcode::Jump(dest),
                Opcode::IfNot(_) => Opcode::IfNot(dest),
                Opcode::Literal(Val::Return(_)) => Opcode::Literal(Val::Return(dest)),
                _ => return Err(error!(InternalError; "LINK FAILURE")),
            };
        }
        Ok((self.ops, self.lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patches_forward_branch() {
        let mut link = Link::new();
        let sym = link.next_symbol();
        link.push_ifnot(sym, 1);
        link.push(Opcode::Literal(1.into()), 1);
        link.define_symbol(sym);
        link.push(Opcode::Output, 2);
        let (ops, lines) = link.link().unwrap();
        assert_eq!(ops[0], Opcode::IfNot(2));
        assert_eq!(lines, vec![1, 1, 2]);
    }

    #[test]
    fn test_undefined_symbol_is_internal() {
        let mut link = Link::new();
        let sym = link.next_symbol();
        link.push_jump(sym, 1);
        assert!(link.link().unwrap_err().is_internal());
    }
}
