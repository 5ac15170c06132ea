use std::fmt;
use std::ops::Range;
use logos::Logos;
use crate::error::{Error, Result};

pub type Span = Range<usize>;

#[derive(Logos, Hash, Eq, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("'")]
    Quote,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    #[token("=")]
    Equal,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("<=")]
    LessEqual,

    #[token(">=")]
    GreaterEqual,

    #[token("#t")]
    True,

    #[token("#f")]
    False,

    #[token("not")]
    Not,

    #[token("eq")]
    Eq,

    #[token("length")]
    Length,

    #[token("cons")]
    Cons,

    #[token("car")]
    Car,

    #[token("cdr")]
    Cdr,

    #[token("list")]
    List,

    #[token("null?")]
    NullP,

    #[token("if")]
    If,

    #[token("define")]
    Define,

    #[token("print")]
    Print,

    // Kept as the lexeme; the parser turns it into an `f64`.
    #[regex(r"[0-9]+", |lex| lex.slice().to_owned())]
    Number(String),

    // The surrounding quotes are part of the stored literal.
    #[regex(r#""[^"\n]*""#, |lex| lex.slice().to_owned())]
    Text(String),

    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_owned())]
    Identifier(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexeme = match self {
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Quote => "'",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Caret => "^",
            Token::Equal => "=",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LessEqual => "<=",
            Token::GreaterEqual => ">=",
            Token::True => "#t",
            Token::False => "#f",
            Token::Not => "not",
            Token::Eq => "eq",
            Token::Length => "length",
            Token::Cons => "cons",
            Token::Car => "car",
            Token::Cdr => "cdr",
            Token::List => "list",
            Token::NullP => "null?",
            Token::If => "if",
            Token::Define => "define",
            Token::Print => "print",
            Token::Number(value) | Token::Text(value) | Token::Identifier(value) => value.as_str(),
        };

        f.write_str(lexeme)
    }
}

/// Splits `source` into tokens paired with their byte spans.
///
/// Fails on the first character sequence no token matches.
pub fn lex(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();

    for (token, span) in Token::lexer(source).spanned() {
        match token {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(Error::Lex {
                    lexeme: source[span.clone()].to_owned(),
                    span,
                });
            }
        }
    }

    Ok(tokens)
}
