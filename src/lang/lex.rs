use super::{token::*, Error, Line};

type Result<T> = std::result::Result<T, Error>;

/// Tokenizes an entire script. Lines are 1-based; blank and comment-only
/// lines are dropped but still counted. The first lexical problem aborts
/// the scan with a diagnostic naming the offending line.
pub fn lex(source: &str) -> Result<Vec<Line>> {
    let mut lines: Vec<Line> = vec![];
    for (index, text) in source.lines().enumerate() {
        let number = index + 1;
        let tokens = LineLexer::lex(text).map_err(|e| e.or_in_line_number(number))?;
        if !tokens.is_empty() {
            lines.push(Line::new(number, tokens));
        }
    }
    Ok(lines)
}

fn is_macro_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct LineLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> LineLexer<'a> {
    fn lex(text: &str) -> Result<Vec<Token>> {
        let mut this = LineLexer {
            chars: text.chars().peekable(),
        };
        let mut tokens: Vec<Token> = vec![];
        loop {
            let pk = match this.chars.peek() {
                Some(pk) => *pk,
                None => return Ok(tokens),
            };
            if is_macro_whitespace(pk) {
                this.chars.next();
                continue;
            }
            // Rest-of-line comment.
            if pk == '\'' {
                return Ok(tokens);
            }
            let token = if pk.is_ascii_digit() {
                this.number()?
            } else if is_ident_start(pk) {
                this.alphabetic()
            } else if pk == '"' {
                this.string()?
            } else {
                this.minutia()?
            };
            tokens.push(token);
        }
    }

    fn number(&mut self) -> Result<Token> {
        let mut s = String::new();
        while let Some(&pk) = self.chars.peek() {
            if !pk.is_ascii_digit() {
                break;
            }
            self.chars.next();
            s.push(pk);
        }
        if let Some('.') = self.chars.peek() {
            self.chars.next();
            s.push('.');
            let mut digits = 0;
            while let Some(&pk) = self.chars.peek() {
                if !pk.is_ascii_digit() {
                    break;
                }
                self.chars.next();
                s.push(pk);
                digits += 1;
            }
            if digits == 0 {
                return Err(error!(LexicalError; "MALFORMED NUMBER"));
            }
        }
        Ok(Token::Literal(Literal::Number(s)))
    }

    fn alphabetic(&mut self) -> Token {
        let mut s = String::new();
        while let Some(&pk) = self.chars.peek() {
            if !is_ident_part(pk) {
                break;
            }
            self.chars.next();
            s.push(pk.to_ascii_uppercase());
        }
        match Token::from_string(&s) {
            Some(token) => token,
            None => Token::Ident(s.into()),
        }
    }

    fn string(&mut self) -> Result<Token> {
        let mut s = String::new();
        self.chars.next();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(Token::Literal(Literal::String(s))),
                Some(ch) => s.push(ch),
                None => return Err(error!(LexicalError; "UNTERMINATED STRING")),
            }
        }
    }

    fn minutia(&mut self) -> Result<Token> {
        let ch = match self.chars.next() {
            Some(ch) => ch,
            None => return Err(error!(InternalError; "LEXER PAST END OF LINE")),
        };
        let token = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '+' => Token::Operator(Operator::Plus),
            '-' => Token::Operator(Operator::Minus),
            '*' => Token::Operator(Operator::Multiply),
            '/' => Token::Operator(Operator::Divide),
            '=' => Token::Operator(Operator::Equal),
            '<' => match self.chars.peek() {
                Some('=') => {
                    self.chars.next();
                    Token::Operator(Operator::LessEqual)
                }
                Some('>') => {
                    self.chars.next();
                    Token::Operator(Operator::NotEqual)
                }
                _ => Token::Operator(Operator::Less),
            },
            '>' => match self.chars.peek() {
                Some('=') => {
                    self.chars.next();
                    Token::Operator(Operator::GreaterEqual)
                }
                _ => Token::Operator(Operator::Greater),
            },
            _ => return Err(error!(LexicalError; "UNRECOGNIZED CHARACTER")),
        };
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<Token> {
        let lines = lex(s).unwrap();
        assert_eq!(lines.len(), 1);
        lines.into_iter().next().unwrap().into_tokens()
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(
            tokens("output 1, nightRate"),
            vec![
                Token::Word(Word::Output),
                Token::Literal(Literal::Number("1".to_string())),
                Token::Comma,
                Token::Ident("NIGHTRATE".into()),
            ]
        );
    }

    #[test]
    fn test_operators_collapse() {
        assert_eq!(
            tokens("a <= b <> c >= d"),
            vec![
                Token::Ident("A".into()),
                Token::Operator(Operator::LessEqual),
                Token::Ident("B".into()),
                Token::Operator(Operator::NotEqual),
                Token::Ident("C".into()),
                Token::Operator(Operator::GreaterEqual),
                Token::Ident("D".into()),
            ]
        );
    }

    #[test]
    fn test_time_string_literal() {
        assert_eq!(
            tokens("x = \"23:00\""),
            vec![
                Token::Ident("X".into()),
                Token::Operator(Operator::Equal),
                Token::Literal(Literal::String("23:00".to_string())),
            ]
        );
    }

    #[test]
    fn test_comment_and_blank_lines_counted() {
        let lines = lex("' holiday rules\n\nimport Rate\n").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number(), 3);
    }

    #[test]
    fn test_unterminated_string() {
        let e = lex("x = \"23:00\ny = 1").unwrap_err();
        assert_eq!(e.line_number(), Some(1));
        assert_eq!(e.to_string(), "LEXICAL ERROR IN LINE 1; UNTERMINATED STRING");
    }

    #[test]
    fn test_unrecognized_character() {
        let e = lex("rate = 5 @ 3").unwrap_err();
        assert_eq!(e.code(), crate::lang::ErrorCode::LexicalError);
        assert_eq!(e.line_number(), Some(1));
    }
}
