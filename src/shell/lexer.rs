//! Command line lexer.
//!
//! Splits a command line template into words and flags without any shell
//! interpretation. Input is expected to come from reviewed configuration
//! files, not from untrusted users.
//!
//! Quoted sections are kept verbatim, quotes included, so that a templated
//! value containing spaces stays one argument:
//!
//! ```
//! use seqrun::shell::{Lexer, Token};
//!
//! let tokens: Vec<Token> = Lexer::new(r#"az group create --name "my group""#).collect();
//! assert_eq!(tokens[3], Token::Flag("--name".to_string()));
//! assert_eq!(tokens[4], Token::Word("\"my group\"".to_string()));
//! ```

use crate::error::LexError;
use std::iter::FusedIterator;

/// A lexed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A plain word.
    Word(String),
    /// Starts with `-` or `--` and has no `=`.
    Flag(String),
    /// Starts with `-` or `--` and has an `=`.
    FlagAndValue(String),
    /// Lexing stopped; nothing follows this token.
    Error(LexError),
}

impl Token {
    fn classify(raw: String) -> Self {
        if raw.starts_with('-') {
            if raw.contains('=') {
                Token::FlagAndValue(raw)
            } else {
                Token::Flag(raw)
            }
        } else {
            Token::Word(raw)
        }
    }

    /// The token's text, or `None` for an error.
    pub fn value(&self) -> Option<&str> {
        match self {
            Token::Word(s) | Token::Flag(s) | Token::FlagAndValue(s) => Some(s),
            Token::Error(_) => None,
        }
    }
}

/// Pull-based lexer over one command line.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    done: bool,
}

impl Lexer {
    /// Start lexing `line`. Surrounding whitespace is ignored.
    pub fn new(line: &str) -> Self {
        Self {
            input: line.trim().chars().collect(),
            pos: 0,
            done: false,
        }
    }

    /// Start over on a new line.
    pub fn reset(&mut self, line: &str) {
        *self = Self::new(line);
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Gather a quoted section, quotes included.
    ///
    /// The closing quote must be followed by whitespace or the end of input.
    fn until_close(&mut self, raw: &mut String) -> Result<(), LexError> {
        let Some(quote) = self.bump() else {
            return Ok(());
        };
        raw.push(quote);

        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedQuote { quote }),
                Some(c) if c == quote => {
                    if self.peek().is_some_and(|p| !p.is_whitespace()) {
                        return Err(LexError::QuoteNotAtBoundary { quote });
                    }
                    raw.push(c);
                    return Ok(());
                }
                Some(c) => raw.push(c),
            }
        }
    }

    fn fail(&mut self, err: LexError) -> Option<Token> {
        self.done = true;
        Some(Token::Error(err))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.done {
                return None;
            }
            self.skip_spaces();
            if self.peek().is_none() {
                self.done = true;
                return None;
            }

            let mut raw = String::new();
            while let Some(c) = self.peek() {
                match c {
                    '\'' | '"' => {
                        if let Err(err) = self.until_close(&mut raw) {
                            return self.fail(err);
                        }
                        break;
                    }
                    c if c.is_whitespace() => break,
                    '\0' => self.pos += 1,
                    c => {
                        raw.push(c);
                        self.pos += 1;
                    }
                }
            }

            // A run of NULs yields nothing; move on to the next word.
            if !raw.is_empty() {
                return Some(Token::classify(raw));
            }
        }
    }
}

impl FusedIterator for Lexer {}
