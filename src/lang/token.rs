use std::collections::HashMap;
use std::sync::Arc;

thread_local!(
    static STRING_TO_TOKEN: HashMap<String, Token> = {
        let mut map = HashMap::new();
        for word in Word::ALL {
            map.insert(word.to_string(), Token::Word(*word));
        }
        for op in Operator::ALL {
            map.insert(op.to_string(), Token::Operator(*op));
        }
        map
    };
);

/// One lexical unit of a macro script. Keywords and identifiers are
/// case-folded to upper case by the lexer, so every later comparison is
/// a plain equality check.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Literal(Literal),
    Word(Word),
    Operator(Operator),
    Ident(Arc<str>),
    LParen,
    RParen,
    Comma,
}

impl Token {
    /// Keyword and operator lookup on the canonical (upper-case) spelling.
    pub fn from_string(s: &str) -> Option<Token> {
        STRING_TO_TOKEN.with(|stt| stt.get(s).cloned())
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Literal(s) => write!(f, "{}", s),
            Word(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Comma => write!(f, ","),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(String),
    String(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Number(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Word {
    Import,
    Dim,
    If,
    Then,
    Else,
    EndIf,
    Select,
    Case,
    End,
    Function,
    EndFunction,
    Output,
}

impl Word {
    const ALL: &'static [Word] = &[
        Word::Import,
        Word::Dim,
        Word::If,
        Word::Then,
        Word::Else,
        Word::EndIf,
        Word::Select,
        Word::Case,
        Word::End,
        Word::Function,
        Word::EndFunction,
        Word::Output,
    ];
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Word::*;
        match self {
            Import => write!(f, "IMPORT"),
            Dim => write!(f, "DIM"),
            If => write!(f, "IF"),
            Then => write!(f, "THEN"),
            Else => write!(f, "ELSE"),
            EndIf => write!(f, "ENDIF"),
            Select => write!(f, "SELECT"),
            Case => write!(f, "CASE"),
            End => write!(f, "END"),
            Function => write!(f, "FUNCTION"),
            EndFunction => write!(f, "ENDFUNCTION"),
            Output => write!(f, "OUTPUT"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Multiply,
    Divide,
    Modulo,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    AndAlso,
    OrElse,
}

impl Operator {
    const ALL: &'static [Operator] = &[
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulo,
        Operator::Plus,
        Operator::Minus,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Not,
        Operator::AndAlso,
        Operator::OrElse,
    ];
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Modulo => write!(f, "MOD"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            AndAlso => write!(f, "ANDALSO"),
            OrElse => write!(f, "ORELSE"),
        }
    }
}
