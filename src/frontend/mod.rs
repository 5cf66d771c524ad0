//! The frontend module contains everything that is concerned with tokenizing
//! and parsing a line of MiniLang source.
//!
//! # Lexer
//! Firstly the lexer is responsible for converting the input string into a
//! queue of tokens which are defined in the token module.
//! ### Example
//! ```rust
//! use minilang::frontend::lexer::Lexer;
//! let tokens_or_err = Lexer::new("int x = 5;").tokenize();
//! ```
//! `tokenize` either returns an error or a queue containing all tokens.
//!
//! # Parser
//! The parser module is responsible for consuming the token stream and
//! turning it into a parse tree of `ast::ParseTreeNode` values rooted at a
//! `Program` node.
//! ### Example
//! ```rust
//! use minilang::frontend::{lexer::Lexer, parser::Parser};
//! let tokens = Lexer::new("int x = 5;").tokenize().unwrap();
//! let tree_or_err = Parser::new(tokens).parse();
//! ```
//! Again, the parser returns either an error informing the user of a syntax
//! error or the parse tree, which renders itself as an indented box-drawing
//! diagram via `Display`.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod utils;
