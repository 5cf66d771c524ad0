use phf::phf_map;
use std::fmt;

use super::utils::Position;

/// A classified lexeme cut out of the source line.
///
/// The `value` borrows the source text; for string literals it is the
/// content between the quotes. Tokens are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: Kind,
    pub pos: Position,
    pub value: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: Kind, pos: Position, value: &'a str) -> Self {
        Self { kind, pos, value }
    }

    /// Look up the keyword table. `None` means the lexeme is an identifier.
    pub fn get_keyword(lexeme: &str) -> Option<Keyword> {
        KEYWORDS.get(lexeme).cloned()
    }

    /// The keyword this token carries, if it is a keyword token.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            Kind::Keyword => Token::get_keyword(self.value),
            _ => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<15} | {}", self.kind.as_str(), self.value)
    }
}

/// Lexical classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Keyword,
    Identifier,
    Operator,
    Separator,
    Number,
    String,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Keyword => "KEYWORD",
            Kind::Identifier => "IDENTIFIER",
            Kind::Operator => "OPERATOR",
            Kind::Separator => "SEPARATOR",
            Kind::Number => "NUMBER",
            Kind::String => "STRING",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The fixed keyword set of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Int,
    Float,
    Double,
    String,
    If,
    Else,
}

impl Keyword {
    /// True for the keywords that open a typed declaration.
    pub fn is_data_type(self) -> bool {
        matches!(
            self,
            Keyword::Int | Keyword::Float | Keyword::Double | Keyword::String
        )
    }
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "int" => Keyword::Int,
    "float" => Keyword::Float,
    "double" => Keyword::Double,
    "string" => Keyword::String,
    "if" => Keyword::If,
    "else" => Keyword::Else,
};
