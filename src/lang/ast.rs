use super::{LineNumber, Number};
use std::sync::Arc;

/// Canonical (upper-cased) identifier. Atomically refcounted so the
/// compiled program it ends up in can be shared across threads.
pub type Name = Arc<str>;

#[derive(Debug, PartialEq)]
pub enum Statement {
    /// `import <name>` — declares an external input variable.
    Import(LineNumber, Name),
    /// `DIM a, b, c` — declares locals, initialized to numeric zero.
    Dim(LineNumber, Vec<Name>),
    /// `name = expression`
    Let(LineNumber, Name, Expression),
    /// Condition, THEN branch, ELSE branch (empty when absent).
    If(LineNumber, Expression, Vec<Statement>, Vec<Statement>),
    /// Selector, CASE arms in source order, optional CASE ELSE body.
    Select(LineNumber, Expression, Vec<CaseArm>, Option<Vec<Statement>>),
    /// Name, parameters, body. The body assigns the function's own name
    /// to produce its return value.
    Function(LineNumber, Name, Vec<Name>, Vec<Statement>),
    /// `OUTPUT <channel>, <expr>`
    Output(LineNumber, Expression, Expression),
}

impl Statement {
    pub fn line_number(&self) -> LineNumber {
        use Statement::*;
        match self {
            Import(line, ..) | Dim(line, ..) | Let(line, ..) | If(line, ..) | Select(line, ..)
            | Function(line, ..) | Output(line, ..) => *line,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct CaseArm {
    pub line: LineNumber,
    pub literal: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, PartialEq)]
pub enum Expression {
    Number(LineNumber, Number),
    String(LineNumber, Arc<str>),
    Var(LineNumber, Name),
    Call(LineNumber, Name, Vec<Expression>),
    Negation(LineNumber, Box<Expression>),
    Not(LineNumber, Box<Expression>),
    Multiply(LineNumber, Box<Expression>, Box<Expression>),
    Divide(LineNumber, Box<Expression>, Box<Expression>),
    Modulo(LineNumber, Box<Expression>, Box<Expression>),
    Add(LineNumber, Box<Expression>, Box<Expression>),
    Subtract(LineNumber, Box<Expression>, Box<Expression>),
    Equal(LineNumber, Box<Expression>, Box<Expression>),
    NotEqual(LineNumber, Box<Expression>, Box<Expression>),
    Less(LineNumber, Box<Expression>, Box<Expression>),
    LessEqual(LineNumber, Box<Expression>, Box<Expression>),
    Greater(LineNumber, Box<Expression>, Box<Expression>),
    GreaterEqual(LineNumber, Box<Expression>, Box<Expression>),
    AndAlso(LineNumber, Box<Expression>, Box<Expression>),
    OrElse(LineNumber, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn line_number(&self) -> LineNumber {
        use Expression::*;
        match self {
            Number(line, ..) | String(line, ..) | Var(line, ..) | Call(line, ..)
            | Negation(line, ..) | Not(line, ..) | Multiply(line, ..) | Divide(line, ..)
            | Modulo(line, ..) | Add(line, ..) | Subtract(line, ..) | Equal(line, ..)
            | NotEqual(line, ..) | Less(line, ..) | LessEqual(line, ..) | Greater(line, ..)
            | GreaterEqual(line, ..) | AndAlso(line, ..) | OrElse(line, ..) => *line,
        }
    }

    /// True for the literal forms a `CASE` arm may carry.
    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Number(..) | Expression::String(..))
    }
}
