use super::{Address, Val};

/// ## Virtual machine instruction set
///
/// The machine has no registers; every operation works on the operand
/// stack. `night = rate * 2` compiles to
/// `[Load(rate), Literal(2), Mul, Store(night)]`.
///
/// Variable and jump operands are resolved slot and instruction indices.
/// There is no name lookup at run time.
#[derive(Clone, Debug, PartialEq)]
pub enum Opcode {
    // *** Stack manipulation
    /// Push a literal value.
    Literal(Val),
    /// Push the value of a variable slot.
    Load(Address),
    /// Pop into a variable slot.
    Store(Address),

    // *** Branch control
    /// Pop; branch to Address when the value is false (zero).
    IfNot(Address),
    /// Unconditional branch to Address.
    Jump(Address),
    /// Pop the function result, pop the `Val::Return` beneath it, push
    /// the result back and branch to the recorded address.
    Return,

    // *** Statements
    /// Pop a value, then a channel number; append one output message.
    Output,

    // *** Expression operations
    Neg,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Not,

    // *** Built-in functions
    TimeToHours,
    TimeOverlap,
    Round,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            Literal(v) => write!(f, "LITERAL({})", v),
            Load(s) => write!(f, "LOAD({})", s),
            Store(s) => write!(f, "STORE({})", s),

            IfNot(a) => write!(f, "IFNOT({})", a),
            Jump(a) => write!(f, "JUMP({})", a),
            Return => write!(f, "RETURN"),

            Output => write!(f, "OUTPUT"),

            Neg => write!(f, "NEG"),
            Mul => write!(f, "MUL"),
            Div => write!(f, "DIV"),
            Mod => write!(f, "MOD"),
            Add => write!(f, "ADD"),
            Sub => write!(f, "SUB"),
            Eq => write!(f, "EQ"),
            NotEq => write!(f, "NOTEQ"),
            Lt => write!(f, "LT"),
            LtEq => write!(f, "LTEQ"),
            Gt => write!(f, "GT"),
            GtEq => write!(f, "GTEQ"),
            Not => write!(f, "NOT"),

            TimeToHours => write!(f, "TIMETOHOURS"),
            TimeOverlap => write!(f, "TIMEOVERLAP"),
            Round => write!(f, "ROUND"),
        }
    }
}
