use super::link::Link;
use super::{Address, Function, Opcode, Program, Symbol, Val};
use crate::error;
use crate::lang::ast::{CaseArm, Expression, Name, Statement};
use crate::lang::{Error, LineNumber, Number};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// ## Code generator
///
/// Two passes over the statement tree. The first collects every
/// `FUNCTION` signature so calls may precede definitions; the second
/// emits opcodes into a [`Link`] buffer and resolves every name to a
/// slot. Externals, locals, parameters and function results all live in
/// one flat slot array, so the runtime never looks anything up by name.
pub fn generate(statements: &[Statement]) -> Result<Program> {
    let mut generator = Generator::default();
    generator.collect_functions(statements)?;
    for statement in statements {
        generator
            .statement(statement)
            .map_err(|e| e.or_in_line_number(statement.line_number()))?;
    }
    let (ops, lines) = generator.link.link()?;
    Ok(Program::from_parts(
        ops,
        lines,
        generator.externals,
        generator.function_table,
        generator.slot_count,
    ))
}

#[derive(Default)]
struct Generator {
    link: Link,
    externals: HashMap<Name, Address>,
    locals: HashMap<Name, Address>,
    functions: HashMap<Name, FunctionInfo>,
    function_table: Vec<(Name, Address, usize)>,
    scope: Option<FnScope>,
    slot_count: usize,
}

#[derive(Clone)]
struct FunctionInfo {
    entry: Symbol,
    params: Vec<(Name, Address)>,
    result: Address,
}

/// Name resolution inside a `FUNCTION` body: its parameters plus its
/// own name, which addresses the result slot.
struct FnScope {
    vars: HashMap<Name, Address>,
}

impl Generator {
    fn new_slot(&mut self) -> Address {
        let slot = self.slot_count;
        self.slot_count += 1;
        slot
    }

    /// Registers every `FUNCTION` ahead of emission so a call site may
    /// precede the definition in source order.
    fn collect_functions(&mut self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            match statement {
                Statement::Function(line, name, params, body) => {
                    if Function::is_builtin(name) {
                        return Err(
                            error!(DuplicateDeclaration, *line; "REDEFINES A BUILT-IN FUNCTION"),
                        );
                    }
                    if self.functions.contains_key(name) {
                        return Err(error!(DuplicateDeclaration, *line));
                    }
                    let entry = self.link.next_symbol();
                    let result = self.new_slot();
                    let mut slots: Vec<(Name, Address)> = Vec::with_capacity(params.len());
                    for param in params {
                        if param == name || slots.iter().any(|(n, _)| n == param) {
                            return Err(error!(DuplicateDeclaration, *line));
                        }
                        let slot = self.new_slot();
                        slots.push((param.clone(), slot));
                    }
                    self.functions.insert(
                        name.clone(),
                        FunctionInfo {
                            entry,
                            params: slots,
                            result,
                        },
                    );
                    self.collect_functions(body)?;
                }
                Statement::If(_, _, then_body, else_body) => {
                    self.collect_functions(then_body)?;
                    self.collect_functions(else_body)?;
                }
                Statement::Select(_, _, arms, default) => {
                    for arm in arms {
                        self.collect_functions(&arm.body)?;
                    }
                    if let Some(body) = default {
                        self.collect_functions(body)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// A name may be declared once, in any namespace.
    fn check_declarable(&self, name: &Name, line: LineNumber) -> Result<()> {
        if Function::is_builtin(name) {
            return Err(error!(DuplicateDeclaration, line; "REDEFINES A BUILT-IN FUNCTION"));
        }
        if self.externals.contains_key(name)
            || self.locals.contains_key(name)
            || self.functions.contains_key(name)
        {
            return Err(error!(DuplicateDeclaration, line));
        }
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Import(line, name) => self.import(*line, name),
            Statement::Dim(line, names) => self.dim(*line, names),
            Statement::Let(line, name, expression) => self.r#let(*line, name, expression),
            Statement::If(line, condition, then_body, else_body) => {
                self.r#if(*line, condition, then_body, else_body)
            }
            Statement::Select(line, selector, arms, default) => {
                self.select(*line, selector, arms, default)
            }
            Statement::Function(line, name, _, body) => self.function(*line, name, body),
            Statement::Output(line, channel, value) => self.output(*line, channel, value),
        }
    }

    fn body(&mut self, statements: &[Statement]) -> Result<()> {
        for statement in statements {
            self.statement(statement)
                .map_err(|e| e.or_in_line_number(statement.line_number()))?;
        }
        Ok(())
    }

    fn import(&mut self, line: LineNumber, name: &Name) -> Result<()> {
        if self.scope.is_some() {
            return Err(error!(SyntaxError, line; "IMPORT NOT ALLOWED IN FUNCTION"));
        }
        self.check_declarable(name, line)?;
        let slot = self.new_slot();
        self.externals.insert(name.clone(), slot);
        Ok(())
    }

    fn dim(&mut self, line: LineNumber, names: &[Name]) -> Result<()> {
        for name in names {
            self.check_declarable(name, line)?;
            if let Some(scope) = &self.scope {
                if scope.vars.contains_key(name) {
                    return Err(error!(DuplicateDeclaration, line));
                }
            }
            let slot = self.new_slot();
            match &mut self.scope {
                Some(scope) => {
                    scope.vars.insert(name.clone(), slot);
                }
                None => {
                    self.locals.insert(name.clone(), slot);
                }
            }
        }
        Ok(())
    }

    /// Read resolution order: function scope, then locals, then
    /// externals. A zero-parameter function name used as a value is a
    /// call.
    fn load(&mut self, line: LineNumber, name: &Name) -> Result<()> {
        if let Some(slot) = self.var_slot(name) {
            self.link.push(Opcode::Load(slot), line);
            return Ok(());
        }
        if self.functions.contains_key(name) {
            return self.call(line, name, &[]);
        }
        Err(error!(UndefinedVariable, line))
    }

    fn var_slot(&self, name: &Name) -> Option<Address> {
        if let Some(scope) = &self.scope {
            if let Some(slot) = scope.vars.get(name) {
                return Some(*slot);
            }
        }
        self.locals
            .get(name)
            .or_else(|| self.externals.get(name))
            .copied()
    }

    fn r#let(&mut self, line: LineNumber, name: &Name, expression: &Expression) -> Result<()> {
        let slot = match self.var_slot(name) {
            Some(slot) => slot,
            None => return Err(error!(UndefinedVariable, line)),
        };
        self.expression(expression)?;
        self.link.push(Opcode::Store(slot), line);
        Ok(())
    }

    fn r#if(
        &mut self,
        line: LineNumber,
        condition: &Expression,
        then_body: &[Statement],
        else_body: &[Statement],
    ) -> Result<()> {
        self.expression(condition)?;
        let else_sym = self.link.next_symbol();
        self.link.push_ifnot(else_sym, line);
        self.body(then_body)?;
        if else_body.is_empty() {
            self.link.define_symbol(else_sym);
        } else {
            let end_sym = self.link.next_symbol();
            self.link.push_jump(end_sym, line);
            self.link.define_symbol(else_sym);
            self.body(else_body)?;
            self.link.define_symbol(end_sym);
        }
        Ok(())
    }

    /// The selector evaluates once into a hidden slot; each arm is an
    /// equality test against it. First match wins.
    fn select(
        &mut self,
        line: LineNumber,
        selector: &Expression,
        arms: &[CaseArm],
        default: &Option<Vec<Statement>>,
    ) -> Result<()> {
        let temp = self.new_slot();
        self.expression(selector)?;
        self.link.push(Opcode::Store(temp), line);
        let end_sym = self.link.next_symbol();
        for arm in arms {
            let next_sym = self.link.next_symbol();
            self.link.push(Opcode::Load(temp), arm.line);
            self.expression(&arm.literal)?;
            self.link.push(Opcode::Eq, arm.line);
            self.link.push_ifnot(next_sym, arm.line);
            self.body(&arm.body)?;
            self.link.push_jump(end_sym, arm.line);
            self.link.define_symbol(next_sym);
        }
        if let Some(body) = default {
            self.body(body)?;
        }
        self.link.define_symbol(end_sym);
        Ok(())
    }

    /// Emits the body inline behind a jump. Entry expects the stack to
    /// hold a return address then the arguments; parameters pop off in
    /// reverse. The result slot seeds to zero so a function that never
    /// assigns its own name returns zero.
    ///
    /// Definitions may nest in source position; the inner function is
    /// still a global name and sees only its own parameters plus
    /// globals, not the enclosing function's scope.
    fn function(&mut self, line: LineNumber, name: &Name, body: &[Statement]) -> Result<()> {
        let info = match self.functions.get(name) {
            Some(info) => info.clone(),
            None => return Err(error!(InternalError; "UNCOLLECTED FUNCTION")),
        };
        let skip_sym = self.link.next_symbol();
        self.link.push_jump(skip_sym, line);
        let entry = self.link.define_symbol(info.entry);
        self.function_table
            .push((name.clone(), entry, info.params.len()));
        for (_, slot) in info.params.iter().rev() {
            self.link.push(Opcode::Store(*slot), line);
        }
        self.link.push(Opcode::Literal(Val::Number(Number::ZERO)), line);
        self.link.push(Opcode::Store(info.result), line);
        let mut vars: HashMap<Name, Address> = info.params.iter().cloned().collect();
        vars.insert(name.clone(), info.result);
        let enclosing = self.scope.replace(FnScope { vars });
        let emitted = self.body(body);
        self.scope = enclosing;
        emitted?;
        self.link.push(Opcode::Load(info.result), line);
        self.link.push(Opcode::Return, line);
        self.link.define_symbol(skip_sym);
        Ok(())
    }

    fn output(&mut self, line: LineNumber, channel: &Expression, value: &Expression) -> Result<()> {
        self.expression(channel)?;
        self.expression(value)?;
        self.link.push(Opcode::Output, line);
        Ok(())
    }

    fn call(&mut self, line: LineNumber, name: &Name, args: &[Expression]) -> Result<()> {
        if let Some((opcode, arity)) = Function::opcode_and_arity(name) {
            if args.len() != arity {
                return Err(error!(WrongArgumentCount, line));
            }
            for arg in args {
                self.expression(arg)?;
            }
            self.link.push(opcode, line);
            return Ok(());
        }
        let info = match self.functions.get(name) {
            Some(info) => info.clone(),
            None => return Err(error!(UndefinedFunction, line)),
        };
        if args.len() != info.params.len() {
            return Err(error!(WrongArgumentCount, line));
        }
        let return_sym = self.link.next_symbol();
        self.link.push_return_val(return_sym, line);
        for arg in args {
            self.expression(arg)?;
        }
        self.link.push_jump(info.entry, line);
        self.link.define_symbol(return_sym);
        Ok(())
    }

    fn expression(&mut self, expression: &Expression) -> Result<()> {
        use Expression::*;
        match expression {
            Number(line, n) => {
                self.link.push(Opcode::Literal(Val::Number(*n)), *line);
                Ok(())
            }
            String(line, s) => {
                self.link.push(Opcode::Literal(Val::String(s.clone())), *line);
                Ok(())
            }
            Var(line, name) => self.load(*line, name),
            Call(line, name, args) => self.call(*line, name, args),
            Negation(line, e) => self.unary(*line, e, Opcode::Neg),
            Not(line, e) => self.unary(*line, e, Opcode::Not),
            Multiply(line, l, r) => self.binary(*line, l, r, Opcode::Mul),
            Divide(line, l, r) => self.binary(*line, l, r, Opcode::Div),
            Modulo(line, l, r) => self.binary(*line, l, r, Opcode::Mod),
            Add(line, l, r) => self.binary(*line, l, r, Opcode::Add),
            Subtract(line, l, r) => self.binary(*line, l, r, Opcode::Sub),
            Equal(line, l, r) => self.binary(*line, l, r, Opcode::Eq),
            NotEqual(line, l, r) => self.binary(*line, l, r, Opcode::NotEq),
            Less(line, l, r) => self.binary(*line, l, r, Opcode::Lt),
            LessEqual(line, l, r) => self.binary(*line, l, r, Opcode::LtEq),
            Greater(line, l, r) => self.binary(*line, l, r, Opcode::Gt),
            GreaterEqual(line, l, r) => self.binary(*line, l, r, Opcode::GtEq),
            AndAlso(line, l, r) => self.and_also(*line, l, r),
            OrElse(line, l, r) => self.or_else(*line, l, r),
        }
    }

    fn unary(&mut self, line: LineNumber, e: &Expression, opcode: Opcode) -> Result<()> {
        self.expression(e)?;
        self.link.push(opcode, line);
        Ok(())
    }

    fn binary(
        &mut self,
        line: LineNumber,
        lhs: &Expression,
        rhs: &Expression,
        opcode: Opcode,
    ) -> Result<()> {
        self.expression(lhs)?;
        self.expression(rhs)?;
        self.link.push(opcode, line);
        Ok(())
    }

    /// Short-circuit: the right side never evaluates when the left
    /// decides, and the result is always the canonical -1 or 0.
    fn and_also(&mut self, line: LineNumber, lhs: &Expression, rhs: &Expression) -> Result<()> {
        let false_sym = self.link.next_symbol();
        let end_sym = self.link.next_symbol();
        self.expression(lhs)?;
        self.link.push_ifnot(false_sym, line);
        self.expression(rhs)?;
        self.link.push_ifnot(false_sym, line);
        self.link.push(Opcode::Literal(true.into()), line);
        self.link.push_jump(end_sym, line);
        self.link.define_symbol(false_sym);
        self.link.push(Opcode::Literal(false.into()), line);
        self.link.define_symbol(end_sym);
        Ok(())
    }

    fn or_else(&mut self, line: LineNumber, lhs: &Expression, rhs: &Expression) -> Result<()> {
        let rhs_sym = self.link.next_symbol();
        let false_sym = self.link.next_symbol();
        let end_sym = self.link.next_symbol();
        self.expression(lhs)?;
        self.link.push_ifnot(rhs_sym, line);
        self.link.push(Opcode::Literal(true.into()), line);
        self.link.push_jump(end_sym, line);
        self.link.define_symbol(rhs_sym);
        self.expression(rhs)?;
        self.link.push_ifnot(false_sym, line);
        self.link.push(Opcode::Literal(true.into()), line);
        self.link.push_jump(end_sym, line);
        self.link.define_symbol(false_sym);
        self.link.push(Opcode::Literal(false.into()), line);
        self.link.define_symbol(end_sym);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{lex, parse, ErrorCode};

    fn gen(source: &str) -> Result<Program> {
        generate(&parse(&lex(source).unwrap()).unwrap())
    }

    #[test]
    fn test_let_and_output() {
        let program = gen("DIM x\nx = 2 + 3\nOUTPUT 1, x\n").unwrap();
        assert!(program.error().is_none());
        let listing = program.to_string();
        assert!(listing.contains("ADD"));
        assert!(listing.contains("STORE(0)"));
        assert!(listing.contains("OUTPUT"));
    }

    #[test]
    fn test_undefined_variable() {
        let e = gen("OUTPUT 1, nope\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::UndefinedVariable);
        assert_eq!(e.line_number(), Some(1));
    }

    #[test]
    fn test_undefined_function() {
        let e = gen("OUTPUT 1, Missing(2)\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::UndefinedFunction);
    }

    #[test]
    fn test_duplicate_declaration() {
        let e = gen("IMPORT rate\nDIM rate\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::DuplicateDeclaration);
        assert_eq!(e.line_number(), Some(2));
    }

    #[test]
    fn test_builtin_name_is_reserved() {
        let e = gen("FUNCTION Round(x)\nENDFUNCTION\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::DuplicateDeclaration);
    }

    #[test]
    fn test_wrong_argument_count() {
        let e = gen("OUTPUT 1, Round(1)\n").unwrap_err();
        assert_eq!(e.code(), ErrorCode::WrongArgumentCount);
    }

    #[test]
    fn test_call_before_definition() {
        let source = "DIM x\nx = Twice(4)\nFUNCTION Twice(n)\nTwice = n * 2\nENDFUNCTION\n";
        assert!(gen(source).is_ok());
    }
}
