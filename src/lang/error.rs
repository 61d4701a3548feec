use super::LineNumber;
use crate::mach::Address;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line_number: Option<LineNumber>,
    address: Option<Address>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, @$addr:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_address($addr)
            .message($msg)
    };
    ($err:ident, @$addr:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_address($addr)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line_number: None,
            address: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn stage(&self) -> Stage {
        self.code.stage()
    }

    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn in_line_number(self, line: LineNumber) -> Error {
        debug_assert!(self.line_number.is_none());
        Error {
            line_number: Some(line),
            ..self
        }
    }

    pub fn in_address(self, address: Address) -> Error {
        debug_assert!(self.address.is_none());
        Error {
            address: Some(address),
            ..self
        }
    }

    pub fn message<S: Into<String>>(self, message: S) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            message: message.into(),
            ..self
        }
    }
}

/// Pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Semantic,
    Runtime,
    Io,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Stage::*;
        match self {
            Lexer => write!(f, "LEXER"),
            Parser => write!(f, "PARSER"),
            Semantic => write!(f, "SEMANTIC"),
            Runtime => write!(f, "RUNTIME"),
            Io => write!(f, "I/O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnexpectedCharacter,
    UnterminatedString,
    UnsupportedFloat,
    SyntaxError,
    Overflow,
    Redeclaration,
    UndefinedVariable,
    UndefinedFunction,
    NotAVariable,
    NotAFunction,
    WrongArgumentCount,
    ReadOnlyParameter,
    StackUnderflow,
    StackOverflow,
    Interrupted,
    FileNotFound,
    InternalError,
}

impl ErrorCode {
    pub fn stage(self) -> Stage {
        use ErrorCode::*;
        match self {
            UnexpectedCharacter | UnterminatedString | UnsupportedFloat => Stage::Lexer,
            SyntaxError | Overflow => Stage::Parser,
            Redeclaration | UndefinedVariable | UndefinedFunction | NotAVariable
            | NotAFunction | WrongArgumentCount | ReadOnlyParameter => Stage::Semantic,
            StackUnderflow | StackOverflow | Interrupted | InternalError => Stage::Runtime,
            FileNotFound => Stage::Io,
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let code_str = match self.code {
            UnexpectedCharacter => "UNEXPECTED CHARACTER",
            UnterminatedString => "UNTERMINATED STRING",
            UnsupportedFloat => "UNSUPPORTED NUMBER",
            SyntaxError => "SYNTAX ERROR",
            Overflow => "OVERFLOW",
            Redeclaration => "REDECLARATION",
            UndefinedVariable => "UNDEFINED VARIABLE",
            UndefinedFunction => "UNDEFINED FUNCTION",
            NotAVariable => "NOT A VARIABLE",
            NotAFunction => "NOT A FUNCTION",
            WrongArgumentCount => "WRONG NUMBER OF ARGUMENTS",
            ReadOnlyParameter => "READ-ONLY PARAMETER",
            StackUnderflow => "STACK UNDERFLOW",
            StackOverflow => "STACK OVERFLOW",
            Interrupted => "BREAK",
            FileNotFound => "FILE NOT FOUND",
            InternalError => "INTERNAL ERROR",
        };
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" IN LINE {}", line_number));
        }
        if let Some(address) = self.address {
            suffix.push_str(&format!(" AT {}", address));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        write!(f, "{} {}{}", self.stage(), code_str, suffix)
    }
}
