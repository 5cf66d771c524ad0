use std::{error::Error, fmt, fmt::Display};

use crate::frontend::utils::Position;

/// Everything that can go wrong while analyzing a line of MiniLang source.
///
/// Both variants abort the current pass immediately: there is no recovery
/// and no partial output within a single tokenize/parse call.
#[derive(Debug, Clone, PartialEq)]
pub enum MiniLangError {
    /// The lexer rejected the input: an invalid character, an unterminated
    /// string literal, a malformed declaration or a type/literal mismatch.
    LexicalError { pos: Position, msg: String },
    /// The parser rejected the token stream: an unexpected token, an
    /// unexpected end of input or a malformed if-condition.
    SyntaxError { pos: Position, msg: String },
}

impl MiniLangError {
    /// The message without the position prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            MiniLangError::LexicalError { msg, .. } => msg,
            MiniLangError::SyntaxError { msg, .. } => msg,
        }
    }
}

impl Display for MiniLangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiniLangError::LexicalError { pos, msg } => {
                write!(f, "Lexical error at {}: {}", pos, msg)
            }
            MiniLangError::SyntaxError { pos, msg } => {
                write!(f, "Syntax error at {}: {}", pos, msg)
            }
        }
    }
}

impl Error for MiniLangError {}
