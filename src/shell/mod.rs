//! Command line lexing, argument building and process invocation.

pub mod args;
pub mod command;
pub mod lexer;

pub use args::{strip_wrapping_quotes, tokenize, CommandLine};
pub use command::{
    base_env, CommandOptions, CommandResult, OutputLine, ProcessRunner, SystemProcessRunner,
    BASE_ENV_VARS,
};
pub use lexer::{Lexer, Token};
