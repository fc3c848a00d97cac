use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Size-limited operand stack
///
/// Underflow means the generator emitted unbalanced code, so it reports
/// as an internal error rather than a script diagnostic.
pub struct Stack<T> {
    overflow_message: &'static str,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str) -> Stack<T> {
        Stack {
            overflow_message,
            vec: vec![],
        }
    }

    fn max_len(&self) -> usize {
        u16::max_value() as usize
    }

    pub fn push(&mut self, val: T) -> Result<()> {
        if self.vec.len() >= self.max_len() {
            return Err(error!(Overflow; self.overflow_message));
        }
        self.vec.push(val);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(error!(InternalError; "STACK UNDERFLOW")),
        }
    }

    pub fn pop_2(&mut self) -> Result<(T, T)> {
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two))
    }

    pub fn pop_4(&mut self) -> Result<(T, T, T, T)> {
        let four = self.pop()?;
        let three = self.pop()?;
        let two = self.pop()?;
        let one = self.pop()?;
        Ok((one, two, three, four))
    }
}
