use crate::tokens::{tokenize, Token, TokenizerError};
use regex::Regex;
use std::fmt;
use std::iter::Peekable;

/// One node of the parsed syntax tree, before any interpretation.
///
/// Number and symbol leaves keep the literal source text; deciding whether
/// `-9999999999999999999` fits in a number is the builder's job, not ours.
#[derive(Debug, PartialEq)]
pub enum Syntax {
    Number(String),
    Symbol(String),
    SExpr(Vec<Syntax>),
    QExpr(Vec<Syntax>),
    Root(Vec<Syntax>),
}

#[derive(Debug, PartialEq)]
pub enum Error {
    Tokenizer(TokenizerError),
    UnclosedList(char),
    UnexpectedCloseBracket(char),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Tokenizer(e) => write!(f, "{}", e),
            Error::UnclosedList(close) => write!(f, "unclosed list: expected '{}'", close),
            Error::UnexpectedCloseBracket(close) => write!(f, "unexpected '{}'", close),
        }
    }
}

type Reader<'a> = Peekable<std::vec::IntoIter<&'a Token<'a>>>;

/// Parse one line of source into a `Root` node holding its forms.
pub fn read_str(input: &str) -> Result<Syntax, Error> {
    let tokens = tokenize(input).map_err(Error::Tokenizer)?;
    let tokens: Vec<&Token> = tokens
        .iter()
        .filter(|token| !matches!(token, Token::Comment(_)))
        .collect();
    let mut reader = tokens.into_iter().peekable();
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(read_form(&mut reader)?);
    }
    Ok(Syntax::Root(forms))
}

fn read_form(reader: &mut Reader) -> Result<Syntax, Error> {
    match reader.next() {
        Some(Token::OpenRoundBracket) => read_list(reader, ')').map(Syntax::SExpr),
        Some(Token::OpenBraceBracket) => read_list(reader, '}').map(Syntax::QExpr),
        Some(Token::CloseRoundBracket) => Err(Error::UnexpectedCloseBracket(')')),
        Some(Token::CloseBraceBracket) => Err(Error::UnexpectedCloseBracket('}')),
        Some(Token::PlainChars(chars)) => Ok(read_atom(chars)),
        Some(Token::Comment(_)) | None => unreachable!(),
    }
}

fn read_list(reader: &mut Reader, close: char) -> Result<Vec<Syntax>, Error> {
    let mut elements = Vec::new();
    loop {
        match (reader.peek(), close) {
            (Some(Token::CloseRoundBracket), ')') | (Some(Token::CloseBraceBracket), '}') => {
                reader.next();
                return Ok(elements);
            }
            (Some(Token::CloseRoundBracket), _) => {
                return Err(Error::UnexpectedCloseBracket(')'));
            }
            (Some(Token::CloseBraceBracket), _) => {
                return Err(Error::UnexpectedCloseBracket('}'));
            }
            (Some(_), _) => elements.push(read_form(reader)?),
            (None, _) => return Err(Error::UnclosedList(close)),
        }
    }
}

fn read_atom(chars: &str) -> Syntax {
    lazy_static! {
        static ref NUMBER_RE: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
    }
    match NUMBER_RE.is_match(chars) {
        true => Syntax::Number(String::from(chars)),
        false => Syntax::Symbol(String::from(chars)),
    }
}
