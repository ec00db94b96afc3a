//! Formula tokenizer
//!
//! Splits formula text into a flat list of tokens. The leading `=` is
//! required and consumed here; the parser only sees what follows it.

use crate::error::{FormulaError, FormulaResult};
use std::fmt;

/// Lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of decimal digits
    Number(String),
    /// Uppercase letter followed by uppercase letters or digits (`A1`, `AB32`)
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) | Token::Ident(text) => f.write_str(text),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

/// Tokenize a formula string
///
/// # Example
/// ```rust
/// use cellgraph_formula::token::{tokenize, Token};
///
/// let tokens = tokenize("=A1 * 13").unwrap();
/// assert_eq!(
///     tokens,
///     vec![Token::Ident("A1".into()), Token::Star, Token::Number("13".into())]
/// );
/// ```
pub fn tokenize(formula: &str) -> FormulaResult<Vec<Token>> {
    let body = formula
        .strip_prefix('=')
        .ok_or(FormulaError::MissingPrefix)?;

    let mut tokens = Vec::new();
    let mut chars = body.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            ' ' => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '0'..='9' => {
                let mut text = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    text.push(next);
                    chars.next();
                }
                Token::Number(text)
            }
            'A'..='Z' => {
                let mut text = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if !(next.is_ascii_uppercase() || next.is_ascii_digit()) {
                        break;
                    }
                    text.push(next);
                    chars.next();
                }
                Token::Ident(text)
            }
            _ => {
                return Err(FormulaError::UnexpectedCharacter {
                    ch: c,
                    // Position within the full formula, counting the '='
                    position: offset + 1,
                })
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}
