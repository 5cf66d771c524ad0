//! The lexer is responsible for tokenizing a line of MiniLang source so that
//! it can be used by the parser to build the parse tree.
//!
//! Scanning runs left to right, skipping whitespace. Operators are read with
//! maximal munch: the lexeme grows while it is still a prefix of some
//! operator in the fixed set, so `==`, `!=`, `<=` and `>=` come out as single
//! tokens. While scanning, the lexer also tracks the structure of the current
//! declaration statement (data type, identifier, assignment) and rejects
//! malformed declarations and type/literal mismatches on the spot.
//!
//! Example:
//! ```rust
//! use minilang::frontend::lexer::Lexer;
//! let tokens_or_err = Lexer::new("int x = 5;").tokenize();
//! ```
//! `tokenize` either returns an error or a queue containing all tokens.

use std::{collections::VecDeque, iter::Peekable, str::Chars};

use super::{
    token::{Keyword, Kind, Token},
    utils::Position,
};
use crate::error::MiniLangError::{self, LexicalError};

/// Every operator of the language. `operator` extends its lexeme while the
/// scanned text is still a prefix of one of these.
const OPERATORS: [&str; 11] = ["+", "-", "*", "/", "=", "==", "!=", "<", ">", "<=", ">="];

/// Single-character separators, each its own token.
const SEPARATORS: [char; 5] = [';', '(', ')', '{', '}'];

/// The lexer struct is responsible for the tokenization of the source code.
pub struct Lexer<'a> {
    /// Contains the source code. Used for cutting out lexemes for the tokens.
    source: &'a str,
    /// Peekable iterator over all characters of the source string.
    chars: Peekable<Chars<'a>>,
    /// Queue where all the tokens are saved.
    tokens: VecDeque<Token<'a>>,
    /// The current position in the source code relative to the current line.
    token_pos: Position,
    /// The byte offset at which the current token starts.
    start_idx: usize,
    /// The current byte offset in the source code.
    current_idx: usize,
    /// Declaration pieces observed in the current statement.
    decl: DeclState<'a>,
}

/// The lexer either returns a token or an error which will be propagated to
/// the user informing about an error.
type LexerResult<'a> = Result<Token<'a>, MiniLangError>;

impl<'a> Lexer<'a> {
    /// Create a new instance of `Lexer`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            tokens: VecDeque::new(),
            token_pos: Position::new(1, 1, 0),
            start_idx: 0,
            current_idx: 0,
            decl: DeclState::default(),
        }
    }

    /// Tokenize the source string into a queue of tokens.
    pub fn tokenize(&mut self) -> Result<VecDeque<Token<'a>>, MiniLangError> {
        while !self.is_at_end() {
            self.start_idx = self.current_idx;
            if let Some(token) = self.next_token()? {
                self.track_declaration(&token)?;
                self.tokens.push_back(token);
            }
            self.token_pos.start_column = self.token_pos.end_column + 1;
        }
        // A declaration left open at the end of the input never saw its ';'.
        if self.decl.is_open() {
            return Err(LexicalError {
                pos: self.token_pos,
                msg: "Missing semicolon at the end of statement".to_string(),
            });
        }
        Ok(std::mem::take(&mut self.tokens))
    }

    /// Scan the next token. `None` stands for skipped whitespace.
    fn next_token(&mut self) -> Result<Option<Token<'a>>, MiniLangError> {
        let current = match self.advance() {
            Some(c) => c,
            None => return Ok(None),
        };
        match current {
            '\n' => {
                self.token_pos.next_line();
                Ok(None)
            }
            c if c.is_whitespace() => Ok(None),
            c if c.is_ascii_digit() => self.number().map(Some),
            c if c.is_alphabetic() => self.word().map(Some),
            '"' => self.string().map(Some),
            c if SEPARATORS.contains(&c) => self.new_token(Kind::Separator).map(Some),
            c if OPERATORS.iter().any(|op| op.starts_with(c)) => self.operator().map(Some),
            c => Err(LexicalError {
                pos: self.token_pos,
                msg: format!("Invalid character: {}", c),
            }),
        }
    }

    /// Feed a freshly scanned token into the declaration tracker.
    fn track_declaration(&mut self, token: &Token<'a>) -> Result<(), MiniLangError> {
        match token.kind {
            Kind::Keyword if token.keyword().map_or(false, Keyword::is_data_type) => {
                self.decl.data_type(token.value, token.pos)
            }
            Kind::Identifier => self.decl.identifier(token.value, token.pos),
            Kind::Operator if token.value == "=" => self.decl.assignment(token.pos),
            Kind::Number => self.decl.number_literal(token.pos),
            Kind::String => self.decl.string_literal(token.pos),
            Kind::Separator if token.value == ";" => self.decl.end_statement(token.pos),
            _ => Ok(()),
        }
    }

    //-------
    // HELPER
    //-------

    /// Extracts a substring from the source string starting at `start_idx`
    /// and ending at `current_idx`.
    fn get_substr_from_current_range(&self) -> &'a str {
        &self.source[self.start_idx..self.current_idx]
    }

    /// Convenience function for creating new `Token`s easily.
    fn new_token(&self, kind: Kind) -> LexerResult<'a> {
        Ok(Token::new(
            kind,
            self.token_pos,
            self.get_substr_from_current_range(),
        ))
    }

    /// Consume the current iterator and return the char it pointed at.
    /// Byte offsets advance by the char's UTF-8 width so lexeme slicing
    /// always lands on a char boundary.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.token_pos.next_column();
        self.current_idx += c.len_utf8();
        Some(c)
    }

    /// Consumes characters while a given predicate is fulfilled.
    ///
    /// ## Example
    /// advance_while(&|c| c.is_alphanumeric());
    fn advance_while(&mut self, predicate: &dyn Fn(&char) -> bool) {
        while let Some(c) = self.chars.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    /// Check if the char iterator has reached the end.
    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    //---------
    // Literals
    //---------

    /// Tokenize a number literal: a maximal digit run containing at most one
    /// decimal point. A second decimal point ends the number; the stray `.`
    /// then fails on its own as an invalid character.
    fn number(&mut self) -> LexerResult<'a> {
        let mut has_decimal_point = false;
        loop {
            match self.chars.peek() {
                Some(c) if c.is_ascii_digit() => {
                    self.advance();
                }
                Some(&'.') if !has_decimal_point => {
                    has_decimal_point = true;
                    self.advance();
                }
                _ => break,
            }
        }
        self.new_token(Kind::Number)
    }

    /// Tokenize a string literal. The token value is the content between the
    /// quotes; there is no escape processing.
    fn string(&mut self) -> LexerResult<'a> {
        while !self.is_at_end() && self.chars.peek() != Some(&'"') {
            self.advance();
        }
        if self.is_at_end() {
            return Err(LexicalError {
                pos: self.token_pos,
                msg: "Unterminated string literal".to_string(),
            });
        }
        // Advance over the closing quote.
        self.advance();

        let value = &self.source[self.start_idx + 1..self.current_idx - 1];
        Ok(Token::new(Kind::String, self.token_pos, value))
    }

    //-----------------------
    // Identifiers & keywords
    //-----------------------

    /// Checks whether the following character stream is a known keyword.
    /// If not it has to be an identifier.
    fn word(&mut self) -> LexerResult<'a> {
        self.advance_while(&|c| c.is_alphanumeric() || c == &'_');
        let lexeme = self.get_substr_from_current_range();
        let kind = match Token::get_keyword(lexeme) {
            Some(_) => Kind::Keyword,
            None => Kind::Identifier,
        };
        self.new_token(kind)
    }

    //----------
    // Operators
    //----------

    /// Tokenize an operator with maximal munch: keep extending while the
    /// lexeme so far is still a prefix of some operator in the fixed set.
    fn operator(&mut self) -> LexerResult<'a> {
        loop {
            let extended_end = match self.chars.peek() {
                Some(c) => self.current_idx + c.len_utf8(),
                None => break,
            };
            let candidate = &self.source[self.start_idx..extended_end];
            if OPERATORS.iter().any(|op| op.starts_with(candidate)) {
                self.advance();
            } else {
                break;
            }
        }
        self.new_token(Kind::Operator)
    }
}

/// Per-statement record of the declaration pieces seen so far. One value of
/// this type lives inside the lexer; `end_statement` resets it at every `;`,
/// so the state never leaks across statements, let alone across inputs.
#[derive(Default)]
struct DeclState<'a> {
    is_declaration: bool,
    data_type: Option<&'a str>,
    identifier: Option<&'a str>,
    has_assignment: bool,
}

impl<'a> DeclState<'a> {
    fn is_open(&self) -> bool {
        self.is_declaration
    }

    /// A data-type keyword opens a declaration; a second one is an error.
    fn data_type(&mut self, lexeme: &'a str, pos: Position) -> Result<(), MiniLangError> {
        if self.data_type.is_some() {
            return Err(LexicalError {
                pos,
                msg: "Multiple data types in declaration".to_string(),
            });
        }
        self.is_declaration = true;
        self.data_type = Some(lexeme);
        Ok(())
    }

    fn identifier(&mut self, lexeme: &'a str, pos: Position) -> Result<(), MiniLangError> {
        if self.is_declaration && self.data_type.is_none() {
            return Err(LexicalError {
                pos,
                msg: "Variable declaration must start with a data type".to_string(),
            });
        }
        self.identifier = Some(lexeme);
        Ok(())
    }

    fn assignment(&mut self, pos: Position) -> Result<(), MiniLangError> {
        if self.is_declaration && self.identifier.is_none() {
            return Err(LexicalError {
                pos,
                msg: "Assignment operator must follow an identifier".to_string(),
            });
        }
        self.has_assignment = true;
        Ok(())
    }

    /// The initializer of a `string` declaration must be a string literal.
    fn number_literal(&self, pos: Position) -> Result<(), MiniLangError> {
        if self.is_declaration && self.has_assignment && self.data_type == Some("string") {
            return Err(LexicalError {
                pos,
                msg: format!(
                    "Cannot assign number to string variable '{}'",
                    self.identifier.unwrap_or_default()
                ),
            });
        }
        Ok(())
    }

    /// Symmetrically, a non-`string` declaration cannot take a string literal.
    fn string_literal(&self, pos: Position) -> Result<(), MiniLangError> {
        match self.data_type {
            Some(data_type)
                if self.is_declaration && self.has_assignment && data_type != "string" =>
            {
                Err(LexicalError {
                    pos,
                    msg: format!(
                        "Cannot assign string to {} variable '{}'",
                        data_type,
                        self.identifier.unwrap_or_default()
                    ),
                })
            }
            _ => Ok(()),
        }
    }

    /// `;` closes the statement: a declaration must be structurally complete
    /// by now. The state resets either way.
    fn end_statement(&mut self, pos: Position) -> Result<(), MiniLangError> {
        if self.is_declaration {
            if self.data_type.is_none() {
                return Err(LexicalError {
                    pos,
                    msg: "Variable declaration must start with a data type".to_string(),
                });
            }
            if self.identifier.is_none() {
                return Err(LexicalError {
                    pos,
                    msg: "Variable declaration must contain an identifier".to_string(),
                });
            }
            if !self.has_assignment {
                return Err(LexicalError {
                    pos,
                    msg: "Variable declaration must contain an assignment".to_string(),
                });
            }
        }
        *self = DeclState::default();
        Ok(())
    }
}
