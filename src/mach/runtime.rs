use super::operation::Operation;
use super::stack::Stack;
use super::{Address, Function, Opcode, Program, Val};
use crate::error;
use crate::lang::{Error, Number};
use std::collections::HashMap;
use std::sync::Arc;

type Result<T> = std::result::Result<T, Error>;

/// External input values for one evaluation, keyed by the names the
/// script `import`s. Names fold to upper case, matching the language.
///
/// Binding a name the script never imports is a silent no-op, so one
/// wide set of payroll facts can serve many different macros. An
/// imported name with no binding evaluates as numeric zero.
#[derive(Debug, Default)]
pub struct Bindings {
    values: HashMap<Arc<str>, Val>,
}

impl Bindings {
    pub fn new() -> Bindings {
        Bindings::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Val>) {
        self.values.insert(name.to_uppercase().into(), value.into());
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Val> {
        self.values.get(name)
    }
}

/// One line of script output: `OUTPUT <channel>, <value>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub channel: i64,
    pub value: String,
}

/// The outcome of one evaluation. A faulted run reports its diagnostic
/// and no messages, even if some `OUTPUT` statements ran before the
/// fault; partial output never reaches the host.
#[derive(Debug)]
pub struct ExecutionResult {
    messages: Vec<Message>,
    error: Option<Error>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}

/// ## Evaluation state over a compiled [`Program`]
///
/// Cheap to build: an operand stack, a slot array sized by the program,
/// and the bound externals copied into their slots. The program itself
/// is borrowed and untouched, so evaluations can run back to back or on
/// separate programs without recompiling.
pub struct Runtime<'a> {
    program: &'a Program,
    slots: Vec<Val>,
    stack: Stack<Val>,
    pc: Address,
    messages: Vec<Message>,
}

impl<'a> Runtime<'a> {
    pub fn new(program: &'a Program, bindings: &Bindings) -> Runtime<'a> {
        let mut slots = vec![Val::Number(Number::ZERO); program.slot_count()];
        for (name, slot) in program.externals() {
            if let Some(val) = bindings.get(name) {
                slots[*slot] = val.clone();
            }
        }
        Runtime {
            program,
            slots,
            stack: Stack::new("OPERAND STACK OVERFLOW"),
            pc: 0,
            messages: vec![],
        }
    }

    pub fn execute(mut self) -> ExecutionResult {
        if let Some(error) = self.program.error() {
            return ExecutionResult {
                messages: vec![],
                error: Some(error.clone()),
            };
        }
        // Scripts have no loop statements, but recursion can still run
        // away. The budget scales with program size so deep but finite
        // call chains pass while a runaway faults.
        let mut budget = self.program.len() * 64 + 1024;
        while self.pc < self.program.len() {
            if budget == 0 {
                log::debug!("cycle budget exhausted at op {}", self.pc);
                return self.fault(error!(Overflow; "EXECUTION CYCLE LIMIT"));
            }
            budget -= 1;
            let at = self.pc;
            if let Err(e) = self.step() {
                let e = match self.program.line(at) {
                    Some(line) => e.or_in_line_number(line),
                    None => e,
                };
                return self.fault(e);
            }
        }
        log::trace!("executed; {} messages", self.messages.len());
        ExecutionResult {
            messages: self.messages,
            error: None,
        }
    }

    fn fault(self, error: Error) -> ExecutionResult {
        ExecutionResult {
            messages: vec![],
            error: Some(error),
        }
    }

    fn load(&self, slot: Address) -> Result<Val> {
        match self.slots.get(slot) {
            Some(val) => Ok(val.clone()),
            None => Err(error!(InternalError; "BAD SLOT")),
        }
    }

    fn store(&mut self, slot: Address, val: Val) -> Result<()> {
        match self.slots.get_mut(slot) {
            Some(dest) => {
                *dest = val;
                Ok(())
            }
            None => Err(error!(InternalError; "BAD SLOT")),
        }
    }

    fn truthy(val: Val) -> Result<bool> {
        match val {
            Val::Number(n) => Ok(n.is_true()),
            _ => Err(error!(TypeMismatch)),
        }
    }

    fn step(&mut self) -> Result<()> {
        let op = match self.program.op(self.pc) {
            Some(op) => op.clone(),
            None => return Err(error!(InternalError; "PC OUT OF RANGE")),
        };
        self.pc += 1;
        match op {
            Opcode::Literal(val) => self.stack.push(val)?,
            Opcode::Load(slot) => {
                let val = self.load(slot)?;
                self.stack.push(val)?;
            }
            Opcode::Store(slot) => {
                let val = self.stack.pop()?;
                self.store(slot, val)?;
            }

            Opcode::IfNot(addr) => {
                if !Runtime::truthy(self.stack.pop()?)? {
                    self.pc = addr;
                }
            }
            Opcode::Jump(addr) => self.pc = addr,
            Opcode::Return => {
                let result = self.stack.pop()?;
                match self.stack.pop()? {
                    Val::Return(addr) => {
                        self.stack.push(result)?;
                        self.pc = addr;
                    }
                    _ => return Err(error!(InternalError; "RETURN WITHOUT CALL")),
                }
            }

            Opcode::Output => {
                let (channel, value) = self.stack.pop_2()?;
                let channel = match channel {
                    Val::Number(n) => n.to_i64(),
                    _ => None,
                };
                let channel =
                    channel.ok_or_else(|| error!(TypeMismatch; "CHANNEL MUST BE A WHOLE NUMBER"))?;
                let value = match value {
                    Val::Number(n) => n.to_string(),
                    Val::String(s) => s.to_string(),
                    Val::Return(_) => return Err(error!(InternalError; "RETURN ON STACK")),
                };
                self.messages.push(Message { channel, value });
            }

            Opcode::Neg => {
                let val = self.stack.pop()?;
                self.stack.push(Operation::negate(val)?)?;
            }
            Opcode::Not => {
                let val = self.stack.pop()?;
                self.stack.push(Operation::not(val)?)?;
            }
            Opcode::Mul => self.binary(Operation::multiply)?,
            Opcode::Div => self.binary(Operation::divide)?,
            Opcode::Mod => self.binary(Operation::modulo)?,
            Opcode::Add => self.binary(Operation::add)?,
            Opcode::Sub => self.binary(Operation::subtract)?,
            Opcode::Eq => self.binary(Operation::equal)?,
            Opcode::NotEq => self.binary(Operation::not_equal)?,
            Opcode::Lt => self.binary(Operation::less)?,
            Opcode::LtEq => self.binary(Operation::less_equal)?,
            Opcode::Gt => self.binary(Operation::greater)?,
            Opcode::GtEq => self.binary(Operation::greater_equal)?,

            Opcode::TimeToHours => {
                let val = self.stack.pop()?;
                self.stack.push(Function::time_to_hours(val)?)?;
            }
            Opcode::TimeOverlap => {
                let (a, b, c, d) = self.stack.pop_4()?;
                self.stack.push(Function::time_overlap(a, b, c, d)?)?;
            }
            Opcode::Round => self.binary(Function::round)?,
        }
        Ok(())
    }

    fn binary(&mut self, op: fn(Val, Val) -> Result<Val>) -> Result<()> {
        let (lhs, rhs) = self.stack.pop_2()?;
        self.stack.push(op(lhs, rhs)?)
    }
}
