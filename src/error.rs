use std::fmt;
use std::io;
use chumsky::error::Simple;
use crate::lexer::{Span, Token};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Lex {
        lexeme: String,
        span: Span,
    },
    Syntax(Vec<Simple<Token>>),
    StructuralMismatch {
        form: &'static str,
    },
    UnboundIdentifier(String),
    TypeMismatch {
        operator: String,
        expected: &'static str,
        found: &'static str,
    },
    DivisionByZero,
    Output(io::Error),
}

impl Error {
    /// Lexing and parsing failures, including bad `car`/`cdr` shapes.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Lex { .. } | Error::Syntax(_) | Error::StructuralMismatch { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex { lexeme, span } => {
                write!(f, "unexpected character(s) '{}' at {}..{}", lexeme, span.start, span.end)
            }
            Error::Syntax(errors) => {
                let messages = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>();
                write!(f, "syntax error: {}", messages.join("; "))
            }
            Error::StructuralMismatch { form } => {
                write!(f, "'{}' expects a quoted list", form)
            }
            Error::UnboundIdentifier(name) => write!(f, "unbound identifier '{}'", name),
            Error::TypeMismatch { operator, expected, found } => {
                write!(f, "type mismatch in '{}': expected {}, found {}", operator, expected, found)
            }
            Error::DivisionByZero => f.write_str("division by zero"),
            Error::Output(e) => write!(f, "cannot write output: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Output(e)
    }
}

impl From<Vec<Simple<Token>>> for Error {
    fn from(errors: Vec<Simple<Token>>) -> Self {
        Error::Syntax(errors)
    }
}
