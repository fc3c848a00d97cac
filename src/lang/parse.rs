use super::{ast::*, token::*, Error, Line, LineNumber, Number};

type Result<T> = std::result::Result<T, Error>;

/// Builds the statement tree for a lexed script. First error wins: the
/// parse stops at the first structural problem and reports its line.
pub fn parse(lines: &[Line]) -> Result<Vec<Statement>> {
    Parser::parse(lines)
}

struct Parser<'a> {
    lines: &'a [Line],
    li: usize,
    ti: usize,
}

impl<'a> Parser<'a> {
    fn parse(lines: &'a [Line]) -> Result<Vec<Statement>> {
        let mut this = Parser { lines, li: 0, ti: 0 };
        let mut statements: Vec<Statement> = vec![];
        while !this.at_end() {
            statements.push(this.statement()?);
            this.expect_end_of_line()?;
            this.advance_line();
        }
        Ok(statements)
    }

    fn at_end(&self) -> bool {
        self.li >= self.lines.len()
    }

    fn line_number(&self) -> LineNumber {
        if self.li < self.lines.len() {
            self.lines[self.li].number()
        } else {
            self.lines.last().map_or(0, |line| line.number())
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.lines.get(self.li)?.tokens().get(self.ti)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        self.ti += 1;
        Some(token)
    }

    fn advance_line(&mut self) {
        self.li += 1;
        self.ti = 0;
    }

    fn end_of_line(&self) -> bool {
        self.peek().is_none()
    }

    fn expect_end_of_line(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(_) => {
                Err(error!(SyntaxError, self.line_number(); "EXPECTED END OF STATEMENT"))
            }
        }
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if let Some(t) = self.next() {
            if *t == token {
                return Ok(());
            }
        }
        use Token::*;
        Err(error!(SyntaxError;
            match token {
                Literal(_) => "EXPECTED LITERAL",
                Word(_) => "EXPECTED RESERVED WORD",
                Operator(_) => "EXPECTED OPERATOR",
                Ident(_) => "EXPECTED IDENTIFIER",
                LParen => "EXPECTED LEFT PARENTHESIS",
                RParen => "EXPECTED RIGHT PARENTHESIS",
                Comma => "EXPECTED COMMA",
            }
        ))
    }

    fn ident(&mut self) -> Result<Name> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(name.clone()),
            _ => Err(error!(SyntaxError; "EXPECTED IDENTIFIER")),
        }
    }

    fn statement(&mut self) -> Result<Statement> {
        let result = match self.peek() {
            Some(Token::Word(Word::Import)) => self.r#import(),
            Some(Token::Word(Word::Dim)) => self.r#dim(),
            Some(Token::Word(Word::If)) => self.r#if(),
            Some(Token::Word(Word::Select)) => self.r#select(),
            Some(Token::Word(Word::Function)) => self.r#function(),
            Some(Token::Word(Word::Output)) => self.r#output(),
            Some(Token::Ident(_)) => self.r#let(),
            _ => Err(error!(SyntaxError; "EXPECTED STATEMENT")),
        };
        result.map_err(|e| e.or_in_line_number(self.line_number()))
    }

    fn r#import(&mut self) -> Result<Statement> {
        let line = self.line_number();
        self.next();
        Ok(Statement::Import(line, self.ident()?))
    }

    fn r#dim(&mut self) -> Result<Statement> {
        let line = self.line_number();
        self.next();
        let mut names = vec![self.ident()?];
        while let Some(Token::Comma) = self.peek() {
            self.next();
            names.push(self.ident()?);
        }
        Ok(Statement::Dim(line, names))
    }

    fn r#let(&mut self) -> Result<Statement> {
        let line = self.line_number();
        let name = self.ident()?;
        self.expect(Token::Operator(Operator::Equal))?;
        Ok(Statement::Let(line, name, self.expression()?))
    }

    fn r#output(&mut self) -> Result<Statement> {
        let line = self.line_number();
        self.next();
        let channel = self.expression()?;
        self.expect(Token::Comma)?;
        Ok(Statement::Output(line, channel, self.expression()?))
    }

    /// Both IF forms. Single-line puts statements after THEN and carries
    /// no ENDIF; the block form ends its line at THEN and closes with
    /// ENDIF on its own line.
    fn r#if(&mut self) -> Result<Statement> {
        let line = self.line_number();
        self.next();
        let condition = self.expression()?;
        self.expect(Token::Word(Word::Then))?;
        if !self.end_of_line() {
            let then_branch = vec![self.statement()?];
            let else_branch = match self.peek() {
                Some(Token::Word(Word::Else)) => {
                    self.next();
                    vec![self.statement()?]
                }
                _ => vec![],
            };
            return Ok(Statement::If(line, condition, then_branch, else_branch));
        }
        self.advance_line();
        let mut then_branch: Vec<Statement> = vec![];
        let mut else_branch: Vec<Statement> = vec![];
        let mut in_else = false;
        loop {
            if self.at_end() {
                return Err(error!(SyntaxError, line; "IF WITHOUT ENDIF"));
            }
            match self.peek() {
                Some(Token::Word(Word::EndIf)) => {
                    self.next();
                    return Ok(Statement::If(line, condition, then_branch, else_branch));
                }
                Some(Token::Word(Word::Else)) => {
                    if in_else {
                        return Err(error!(SyntaxError, self.line_number(); "DUPLICATE ELSE"));
                    }
                    self.next();
                    self.expect_end_of_line()?;
                    self.advance_line();
                    in_else = true;
                }
                _ => {
                    let statement = self.statement()?;
                    self.expect_end_of_line()?;
                    self.advance_line();
                    if in_else {
                        else_branch.push(statement);
                    } else {
                        then_branch.push(statement);
                    }
                }
            }
        }
    }

    fn r#select(&mut self) -> Result<Statement> {
        let line = self.line_number();
        self.next();
        self.expect(Token::Word(Word::Case))?;
        let selector = self.expression()?;
        self.expect_end_of_line()?;
        self.advance_line();
        let mut arms: Vec<CaseArm> = vec![];
        let mut else_body: Option<Vec<Statement>> = None;
        loop {
            if self.at_end() {
                return Err(error!(SyntaxError, line; "SELECT WITHOUT END SELECT"));
            }
            match self.peek() {
                Some(Token::Word(Word::End)) => {
                    self.next();
                    self.expect(Token::Word(Word::Select))?;
                    return Ok(Statement::Select(line, selector, arms, else_body));
                }
                Some(Token::Word(Word::Case)) => {
                    let arm_line = self.line_number();
                    self.next();
                    if let Some(Token::Word(Word::Else)) = self.peek() {
                        self.next();
                        self.expect_end_of_line()?;
                        self.advance_line();
                        if else_body.is_some() {
                            return Err(error!(SyntaxError, arm_line; "DUPLICATE CASE ELSE"));
                        }
                        else_body = Some(self.case_body(line)?);
                    } else {
                        let literal = self.case_literal()?;
                        self.expect_end_of_line()?;
                        self.advance_line();
                        if else_body.is_some() {
                            return Err(error!(SyntaxError, arm_line; "CASE AFTER CASE ELSE"));
                        }
                        arms.push(CaseArm {
                            line: arm_line,
                            literal,
                            body: self.case_body(line)?,
                        });
                    }
                }
                _ => return Err(error!(SyntaxError, self.line_number(); "EXPECTED CASE")),
            }
        }
    }

    fn case_body(&mut self, select_line: LineNumber) -> Result<Vec<Statement>> {
        let mut body: Vec<Statement> = vec![];
        loop {
            if self.at_end() {
                return Err(error!(SyntaxError, select_line; "SELECT WITHOUT END SELECT"));
            }
            match self.peek() {
                Some(Token::Word(Word::Case)) | Some(Token::Word(Word::End)) => return Ok(body),
                _ => {
                    body.push(self.statement()?);
                    self.expect_end_of_line()?;
                    self.advance_line();
                }
            }
        }
    }

    /// A CASE arm dispatches on a literal, optionally negated.
    fn case_literal(&mut self) -> Result<Expression> {
        let expr = self.expression()?;
        match expr {
            Expression::Negation(line, inner) => match *inner {
                Expression::Number(_, n) => Ok(Expression::Number(line, n.checked_neg()?)),
                _ => Err(error!(SyntaxError, line; "EXPECTED LITERAL")),
            },
            expr if expr.is_literal() => Ok(expr),
            expr => Err(error!(SyntaxError, expr.line_number(); "EXPECTED LITERAL")),
        }
    }

    fn r#function(&mut self) -> Result<Statement> {
        let line = self.line_number();
        self.next();
        let name = self.ident()?;
        self.expect(Token::LParen)?;
        let mut params: Vec<Name> = vec![];
        if let Some(Token::RParen) = self.peek() {
            self.next();
        } else {
            loop {
                params.push(self.ident()?);
                match self.next() {
                    Some(Token::RParen) => break,
                    Some(Token::Comma) => continue,
                    _ => return Err(error!(SyntaxError; "EXPECTED END OR SEPARATOR")),
                }
            }
        }
        self.expect_end_of_line()?;
        self.advance_line();
        let mut body: Vec<Statement> = vec![];
        loop {
            if self.at_end() {
                return Err(error!(SyntaxError, line; "FUNCTION WITHOUT ENDFUNCTION"));
            }
            match self.peek() {
                Some(Token::Word(Word::EndFunction)) => {
                    self.next();
                    return Ok(Statement::Function(line, name, params, body));
                }
                _ => {
                    body.push(self.statement()?);
                    self.expect_end_of_line()?;
                    self.advance_line();
                }
            }
        }
    }

    fn expression(&mut self) -> Result<Expression> {
        self.expression_prec(0)
    }

    fn expression_prec(&mut self, precedence: usize) -> Result<Expression> {
        let mut lhs = self.primary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Operator(op)) => *op,
                _ => break,
            };
            let op_precedence = match Parser::op_precedence(&op) {
                Some(p) => p,
                None => break,
            };
            if op_precedence < precedence {
                break;
            }
            self.next();
            let line = self.line_number();
            let rhs = self.expression_prec(op_precedence + 1)?;
            lhs = Parser::binary(op, line, lhs, rhs);
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Expression> {
        let line = self.line_number();
        match self.next() {
            Some(Token::LParen) => {
                let expr = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Operator(Operator::Minus)) => Ok(Expression::Negation(
                line,
                Box::new(self.expression_prec(6)?),
            )),
            Some(Token::Operator(Operator::Not)) => {
                Ok(Expression::Not(line, Box::new(self.expression_prec(3)?)))
            }
            Some(Token::Ident(name)) => {
                let name = name.clone();
                match self.peek() {
                    Some(Token::LParen) => {
                        Ok(Expression::Call(line, name, self.expression_list()?))
                    }
                    _ => Ok(Expression::Var(line, name)),
                }
            }
            Some(Token::Literal(Literal::Number(s))) => match Number::from_literal(s) {
                Some(n) => Ok(Expression::Number(line, n)),
                None => Err(error!(SyntaxError; "MALFORMED NUMBER")),
            },
            Some(Token::Literal(Literal::String(s))) => {
                Ok(Expression::String(line, s.as_str().into()))
            }
            _ => Err(error!(SyntaxError; "EXPECTED EXPRESSION")),
        }
    }

    fn expression_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Expression> = vec![];
        if let Some(Token::RParen) = self.peek() {
            self.next();
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            match self.next() {
                Some(Token::RParen) => return Ok(v),
                Some(Token::Comma) => continue,
                _ => return Err(error!(SyntaxError; "EXPECTED END OR SEPARATOR")),
            }
        }
    }

    fn op_precedence(op: &Operator) -> Option<usize> {
        use Operator::*;
        match op {
            OrElse => Some(1),
            AndAlso => Some(2),
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => Some(3),
            Plus | Minus => Some(4),
            Multiply | Divide | Modulo => Some(5),
            Not => None,
        }
    }

    fn binary(op: Operator, line: LineNumber, lhs: Expression, rhs: Expression) -> Expression {
        let lhs = Box::new(lhs);
        let rhs = Box::new(rhs);
        use Operator::*;
        match op {
            Plus => Expression::Add(line, lhs, rhs),
            Minus => Expression::Subtract(line, lhs, rhs),
            Multiply => Expression::Multiply(line, lhs, rhs),
            Divide => Expression::Divide(line, lhs, rhs),
            Modulo => Expression::Modulo(line, lhs, rhs),
            Equal => Expression::Equal(line, lhs, rhs),
            NotEqual => Expression::NotEqual(line, lhs, rhs),
            Less => Expression::Less(line, lhs, rhs),
            LessEqual => Expression::LessEqual(line, lhs, rhs),
            Greater => Expression::Greater(line, lhs, rhs),
            GreaterEqual => Expression::GreaterEqual(line, lhs, rhs),
            AndAlso => Expression::AndAlso(line, lhs, rhs),
            OrElse => Expression::OrElse(line, lhs, rhs),
            Not => unreachable!("NOT is unary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex::lex;
    use super::*;

    fn parse_str(s: &str) -> Vec<Statement> {
        let lines = lex(s).unwrap();
        match parse(&lines) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }

    fn parse_err(s: &str) -> Error {
        let lines = lex(s).unwrap();
        parse(&lines).unwrap_err()
    }

    #[test]
    fn test_let_and_precedence() {
        let v = parse_str("pay = base + night * 2");
        assert_eq!(
            v,
            vec![Statement::Let(
                1,
                "PAY".into(),
                Expression::Add(
                    1,
                    Box::new(Expression::Var(1, "BASE".into())),
                    Box::new(Expression::Multiply(
                        1,
                        Box::new(Expression::Var(1, "NIGHT".into())),
                        Box::new(Expression::Number(1, Number::from_int(2))),
                    )),
                ),
            )]
        );
    }

    #[test]
    fn test_left_associative_subtraction() {
        let v = parse_str("x = 10 - 4 - 3");
        if let Statement::Let(_, _, Expression::Subtract(_, lhs, rhs)) = &v[0] {
            assert!(matches!(**lhs, Expression::Subtract(..)));
            assert!(matches!(**rhs, Expression::Number(..)));
        } else {
            panic!("wrong shape: {:?}", v);
        }
    }

    #[test]
    fn test_import_and_dim() {
        let v = parse_str("import NightRate\nDIM a, b, c");
        assert_eq!(
            v,
            vec![
                Statement::Import(1, "NIGHTRATE".into()),
                Statement::Dim(2, vec!["A".into(), "B".into(), "C".into()]),
            ]
        );
    }

    #[test]
    fn test_single_line_if() {
        let v = parse_str("IF x > 1 THEN OUTPUT 1, x ELSE OUTPUT 2, x");
        if let Statement::If(_, _, then_branch, else_branch) = &v[0] {
            assert_eq!(then_branch.len(), 1);
            assert_eq!(else_branch.len(), 1);
        } else {
            panic!("wrong shape: {:?}", v);
        }
    }

    #[test]
    fn test_block_if() {
        let v = parse_str("IF x THEN\ny = 1\nELSE\ny = 2\nz = 3\nENDIF");
        if let Statement::If(1, _, then_branch, else_branch) = &v[0] {
            assert_eq!(then_branch.len(), 1);
            assert_eq!(else_branch.len(), 2);
        } else {
            panic!("wrong shape: {:?}", v);
        }
    }

    #[test]
    fn test_if_without_endif() {
        let e = parse_err("IF x THEN\ny = 1");
        assert_eq!(e.to_string(), "SYNTAX ERROR IN LINE 1; IF WITHOUT ENDIF");
    }

    #[test]
    fn test_select_case() {
        let v = parse_str(
            "SELECT CASE day\nCASE 6\nOUTPUT 1, 1\nCASE 7\nOUTPUT 1, 2\nCASE ELSE\nOUTPUT 1, 0\nEND SELECT",
        );
        if let Statement::Select(1, _, arms, else_body) = &v[0] {
            assert_eq!(arms.len(), 2);
            assert!(else_body.is_some());
        } else {
            panic!("wrong shape: {:?}", v);
        }
    }

    #[test]
    fn test_case_requires_literal() {
        let e = parse_err("SELECT CASE day\nCASE x + 1\nEND SELECT");
        assert_eq!(e.line_number(), Some(2));
    }

    #[test]
    fn test_function() {
        let v = parse_str("FUNCTION double(n)\ndouble = n * 2\nENDFUNCTION");
        if let Statement::Function(1, name, params, body) = &v[0] {
            assert_eq!(&**name, "DOUBLE");
            assert_eq!(params.len(), 1);
            assert_eq!(body.len(), 1);
        } else {
            panic!("wrong shape: {:?}", v);
        }
    }

    #[test]
    fn test_short_circuit_binds_below_comparison() {
        let v = parse_str("ok = a > 1 AndAlso b < 2");
        if let Statement::Let(_, _, Expression::AndAlso(_, lhs, rhs)) = &v[0] {
            assert!(matches!(**lhs, Expression::Greater(..)));
            assert!(matches!(**rhs, Expression::Less(..)));
        } else {
            panic!("wrong shape: {:?}", v);
        }
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let e = parse_err("import Rate 5");
        assert_eq!(e.line_number(), Some(1));
    }
}
