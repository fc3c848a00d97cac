use super::LineNumber;

/// A compile-time or run-time diagnostic: what went wrong and on which
/// 1-based source line. This is the only error type that crosses the
/// `compile` and `execute` boundaries; it never carries a stack trace.
#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: Option<LineNumber>,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            message: "",
        }
    }

    pub fn in_line_number(&self, line: LineNumber) -> Error {
        Error {
            code: self.code,
            line_number: Some(line),
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        Error {
            code: self.code,
            line_number: self.line_number,
            message,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The source line the diagnostic refers to, when known.
    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    /// True for generator invariant violations. These are defects in the
    /// compiler, not in the script, and tests treat them separately from
    /// ordinary diagnostics.
    pub fn is_internal(&self) -> bool {
        self.code == ErrorCode::InternalError
    }

    /// Attach a line only if one was never recorded. Inner helpers build
    /// errors without position; the statement driver knows the line.
    pub(crate) fn or_in_line_number(self, line: LineNumber) -> Error {
        match self.line_number {
            Some(_) => self,
            None => self.in_line_number(line),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorCode {
    LexicalError,
    SyntaxError,
    UndefinedVariable,
    UndefinedFunction,
    DuplicateDeclaration,
    WrongArgumentCount,
    TypeMismatch,
    DivisionByZero,
    Overflow,
    MalformedTime,
    InternalError,
}

impl ErrorCode {
    fn as_str(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            LexicalError => "LEXICAL ERROR",
            SyntaxError => "SYNTAX ERROR",
            UndefinedVariable => "UNDEFINED VARIABLE",
            UndefinedFunction => "UNDEFINED FUNCTION",
            DuplicateDeclaration => "DUPLICATE DECLARATION",
            WrongArgumentCount => "WRONG NUMBER OF ARGUMENTS",
            TypeMismatch => "TYPE MISMATCH",
            DivisionByZero => "DIVISION BY ZERO",
            Overflow => "OVERFLOW",
            MalformedTime => "MALFORMED TIME",
            InternalError => "INTERNAL ERROR",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code.as_str())?;
        if let Some(line_number) = self.line_number {
            write!(f, " IN LINE {}", line_number)?;
        }
        if !self.message.is_empty() {
            write!(f, "; {}", self.message)?;
        }
        Ok(())
    }
}
