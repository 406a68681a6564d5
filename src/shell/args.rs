//! Argument building.
//!
//! Turns a command template into a program name and a rendered argument
//! list. The program name is taken verbatim; every argument after it goes
//! through the template engine.

use crate::config::template::render;
use crate::config::values::ValueTable;
use crate::error::{Result, SeqrunError};
use crate::shell::lexer::{Lexer, Token};
use std::fmt;

/// A program and its arguments, ready to invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Lex `template` and render each argument against `vals`.
    ///
    /// # Errors
    ///
    /// Returns `Lex` for a bad quote, `MissingProgram` for an empty line and
    /// `Argument` when an argument fails to render.
    pub fn build(template: &str, vals: &ValueTable) -> Result<Self> {
        let mut words = tokenize(template)?.into_iter();
        let program = words.next().ok_or(SeqrunError::MissingProgram)?;

        let args = words
            .map(|arg| {
                render(&arg, vals)
                    .map(|rendered| strip_wrapping_quotes(&rendered).to_string())
                    .map_err(|source| SeqrunError::Argument { arg, source })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { program, args })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Drain the lexer into token texts, stopping at the first error.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    for token in Lexer::new(line) {
        match token {
            Token::Error(err) => return Err(err.into()),
            Token::Word(s) | Token::Flag(s) | Token::FlagAndValue(s) => words.push(s),
        }
    }
    Ok(words)
}

/// Remove one matching pair of `"` or `'` wrapping the whole string.
pub fn strip_wrapping_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
