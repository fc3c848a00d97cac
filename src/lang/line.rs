use super::{token::Token, LineNumber};

/// One source line that survived lexing: its 1-based number and tokens.
#[derive(Debug, PartialEq)]
pub struct Line {
    number: LineNumber,
    tokens: Vec<Token>,
}

impl Line {
    pub fn new(number: LineNumber, tokens: Vec<Token>) -> Line {
        Line { number, tokens }
    }

    pub fn number(&self) -> LineNumber {
        self.number
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut sep = "";
        for token in &self.tokens {
            write!(f, "{}{}", sep, token)?;
            sep = " ";
        }
        Ok(())
    }
}
