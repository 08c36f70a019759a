//! Surface syntax for processes and domain length declarations

mod lexer;
mod parser;

pub use lexer::{tokenize, Lexeme, Token};
pub use parser::{parse_domain_lengths, parse_process};

use thiserror::Error;

/// Errors raised while tokenizing or parsing input text
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Illegal character '{ch}' on line {line}")]
    IllegalCharacter { ch: char, line: usize },

    #[error("Unterminated comment starting on line {line}")]
    UnterminatedComment { line: usize },

    #[error("Syntax error at {found} on line {line}: expected {expected}")]
    Syntax {
        found: String,
        expected: String,
        line: usize,
    },

    #[error("Syntax error at end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Bad nucleotide length '{text}' on line {line}")]
    BadLength { text: String, line: usize },
}
