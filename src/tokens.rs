use regex::Regex;
use std::fmt;

#[derive(Debug, Eq, PartialEq)]
pub enum Token<'a> {
    OpenRoundBracket,
    CloseRoundBracket,
    OpenBraceBracket,
    CloseBraceBracket,
    Comment(&'a str),
    PlainChars(&'a str),
}

#[derive(Debug, PartialEq)]
pub enum TokenizerError {
    NoFirstCharacter,
    BadCharacter(char),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tokenizer failed: ")?;
        match self {
            TokenizerError::NoFirstCharacter => write!(f, "no characters to parse token from"),
            TokenizerError::BadCharacter(c) => write!(f, "unexpected character '{}'", c),
        }
    }
}

fn create_token(captured: &str) -> Result<Token, TokenizerError> {
    let bytes = captured.as_bytes();
    let first_char = bytes.first().ok_or(TokenizerError::NoFirstCharacter)?;
    match first_char {
        b'(' => Ok(Token::OpenRoundBracket),
        b')' => Ok(Token::CloseRoundBracket),
        b'{' => Ok(Token::OpenBraceBracket),
        b'}' => Ok(Token::CloseBraceBracket),
        // Comment. Note that ; is ASCII so safe to slice on bytes even if the rest of the string is
        // non ASCII.
        b';' => Ok(Token::Comment(&captured[1..])),
        _ => Ok(Token::PlainChars(&captured)),
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r"(?x)                         # ignore whitespace in this pattern & allow comments
                \s*                        # leading whitespace, ignored
                (                          # token capture group
                    [(){}]                 # single bracket characters
                    |;.*                   # comments
                    |[a-zA-Z0-9_+\-*/\\=<>!&]+   # one or more symbol/number characters
                )
                \s*                        # trailing whitespace, ignored
            "
        )
        .unwrap();
    }
    let mut input = input.trim_start();
    let mut tokens = Vec::new();
    while !input.is_empty() {
        let caps = match TOKEN_RE.captures(input) {
            Some(caps) if caps.get(0).map(|m| m.start()) == Some(0) => caps,
            _ => {
                let bad = match input.chars().next() {
                    Some(c) => c,
                    None => unreachable!(),
                };
                return Err(TokenizerError::BadCharacter(bad));
            }
        };
        let captured = match caps.get(1) {
            Some(group) => group,
            None => unreachable!(),
        };
        tokens.push(create_token(captured.as_str())?);
        input = &input[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_brackets_and_atoms() {
        let tokens = tokenize("(+ 1 {2 x})").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::OpenRoundBracket,
                Token::PlainChars("+"),
                Token::PlainChars("1"),
                Token::OpenBraceBracket,
                Token::PlainChars("2"),
                Token::PlainChars("x"),
                Token::CloseBraceBracket,
                Token::CloseRoundBracket,
            ]
        );
    }

    #[test]
    fn tokenize_comment_runs_to_end_of_line() {
        let tokens = tokenize("1 ; the rest is ignored").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::PlainChars("1"),
                Token::Comment(" the rest is ignored"),
            ]
        );
    }

    #[test]
    fn tokenize_empty_input() {
        assert_eq!(tokenize("").unwrap(), Vec::new());
        assert_eq!(tokenize("   ").unwrap(), Vec::new());
    }

    #[test]
    fn tokenize_rejects_characters_outside_the_alphabet() {
        assert_eq!(tokenize("(+ 1 #)"), Err(TokenizerError::BadCharacter('#')));
    }

    #[test]
    fn tokenize_negative_number_text() {
        assert_eq!(tokenize("-12").unwrap(), vec![Token::PlainChars("-12")]);
    }
}
