//! Recursive descent parser implementation.
//!
//! The parser consumes the token queue produced by the lexer and builds a
//! single `Program` parse tree node via one function per grammar rule:
//!
//! ```text
//! Program     := Statement*
//! Statement   := Declaration | IfStatement | ExpressionStatement
//! Declaration := Type Identifier '=' Expression ';'
//! IfStatement := 'if' '(' Expression ')' '{' Statement* '}'
//!                ( 'else' ( IfStatement | '{' Statement* '}' ) )?
//! Expression  := Term ( ('+'|'-'|'=='|'!='|'<'|'>'|'<='|'>=') Term )*
//! Term        := Factor ( ('*'|'/') Factor )*
//! Factor      := NUMBER | IDENTIFIER | STRING | '(' Expression ')'
//! ```
//!
//! Additive and comparison operators deliberately share one left-associative
//! precedence tier inside `Expression`; only `*` and `/` bind tighter. An
//! if-condition must come out of `Expression` as a comparison node, checked
//! on the outermost node only.

use std::collections::VecDeque;

use super::{
    ast::{NodeKind, ParseTreeNode},
    token::{Keyword, Kind, Token},
    utils::Position,
};
use crate::error::MiniLangError::{self, SyntaxError};

/// Operators folding at the outer expression tier. Additive and comparison
/// operators share this single tier, left-associative.
const EXPRESSION_OPERATORS: [&str; 8] = ["+", "-", "==", "!=", "<", ">", "<=", ">="];

/// Operators binding tighter, inside a term.
const TERM_OPERATORS: [&str; 2] = ["*", "/"];

/// The comparison subset an if-condition's outermost node must carry.
const COMPARISON_OPERATORS: [&str; 6] = ["==", "!=", "<", ">", "<=", ">="];

/// The `Parser` struct is responsible for parsing a queue of tokens into the
/// parse tree representation.
pub struct Parser<'a> {
    tokens: VecDeque<Token<'a>>,
    /// Position of the most recently consumed token, so that errors at end
    /// of input still point somewhere useful.
    last_pos: Position,
}

/// Represents the result of most parser functions where either a parse tree
/// node is returned or a syntax error occurred and Err is returned.
type ParserResult = Result<ParseTreeNode, MiniLangError>;

impl<'a> Parser<'a> {
    pub fn new(tokens: VecDeque<Token<'a>>) -> Self {
        Self {
            tokens,
            last_pos: Position::new(1, 1, 0),
        }
    }

    //-------
    // HELPER
    //-------

    /// Peeks at the token at the front of the queue.
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.front()
    }

    /// Pops the first token off the queue.
    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.pop_front();
        if let Some(ref token) = token {
            self.last_pos = token.pos;
        }
        token
    }

    /// Pops the next token or fails with the given end-of-input message.
    fn next_or(&mut self, msg: &str) -> Result<Token<'a>, MiniLangError> {
        match self.next() {
            Some(token) => Ok(token),
            None => Err(self.syntax_err(msg)),
        }
    }

    /// True if the next token matches the given kind and lexeme.
    fn next_is(&self, kind: Kind, value: &str) -> bool {
        self.peek()
            .map_or(false, |token| token.kind == kind && token.value == value)
    }

    /// True if the next token is an operator with a lexeme from `set`.
    fn next_operator_in(&self, set: &[&str]) -> bool {
        self.peek()
            .map_or(false, |token| token.kind == Kind::Operator && set.contains(&token.value))
    }

    /// Consumes the next token, requiring an exact kind and lexeme. A missing
    /// or mismatching token is a syntax error.
    fn consume(&mut self, expected_kind: Kind, expected_value: &str) -> Result<Token<'a>, MiniLangError> {
        match self.next() {
            Some(token) if token.kind == expected_kind && token.value == expected_value => Ok(token),
            Some(token) => Err(SyntaxError {
                pos: token.pos,
                msg: format!(
                    "Expected {} '{}', but got {} '{}'",
                    expected_kind, expected_value, token.kind, token.value
                ),
            }),
            None => Err(self.syntax_err(&format!(
                "Unexpected end of input, expected {} '{}'",
                expected_kind, expected_value
            ))),
        }
    }

    /// Create a syntax error anchored at the last consumed token.
    fn syntax_err(&self, msg: &str) -> MiniLangError {
        SyntaxError {
            pos: self.last_pos,
            msg: msg.to_string(),
        }
    }

    //--------
    // PARSING
    //--------

    /// Parse the given tokens into a parse tree rooted at a `Program` node.
    /// Corresponds to the Program non-terminal in the grammar rules.
    pub fn parse(&mut self) -> ParserResult {
        let mut program = ParseTreeNode::new(NodeKind::Program, "Program");
        while self.peek().is_some() {
            let statement = self.parse_statement()?;
            program.add_child(statement);
        }
        Ok(program)
    }

    fn parse_statement(&mut self) -> ParserResult {
        let keyword = match self.peek() {
            Some(token) => token.keyword(),
            None => return Err(self.syntax_err("Unexpected end of input while parsing statement")),
        };
        match keyword {
            Some(keyword) if keyword.is_data_type() => self.parse_declaration(),
            Some(Keyword::If) => self.parse_if_statement(),
            _ => {
                let expression = self.parse_expression()?;
                // A trailing ';' after an expression statement is consumed
                // but not required.
                if self.next_is(Kind::Separator, ";") {
                    self.next();
                }
                Ok(expression)
            }
        }
    }

    /// Declaration := Type Identifier '=' Expression ';'
    ///
    /// The declared name is taken from the next token verbatim; the lexer has
    /// already policed the declaration's shape while tokenizing.
    fn parse_declaration(&mut self) -> ParserResult {
        let type_token = self.next_or("Unexpected end of input")?;
        let identifier_token = self.next_or("Unexpected end of input after type in declaration")?;
        if self.peek().is_none() {
            return Err(self.syntax_err("Unexpected end of input after identifier in declaration"));
        }
        self.consume(Kind::Operator, "=")?;
        if self.peek().is_none() {
            return Err(self.syntax_err("Unexpected end of input after = in declaration"));
        }
        let initializer = self.parse_expression()?;
        if self.peek().is_none() {
            return Err(self.syntax_err("Unexpected end of input after expression in declaration"));
        }
        self.consume(Kind::Separator, ";")?;

        let mut declaration = ParseTreeNode::new(NodeKind::Declaration, type_token.value);
        declaration.add_child(ParseTreeNode::new(NodeKind::Identifier, identifier_token.value));
        declaration.add_child(initializer);
        Ok(declaration)
    }

    /// IfStatement := 'if' '(' Expression ')' '{' Statement* '}'
    ///                ( 'else' ( IfStatement | '{' Statement* '}' ) )?
    fn parse_if_statement(&mut self) -> ParserResult {
        self.consume(Kind::Keyword, "if")?;
        self.consume(Kind::Separator, "(")?;

        let condition = self.parse_expression()?;
        // Only the outermost node of the condition is inspected. Parentheses
        // collapse at the factor level, so `(a == b)` passes, while a
        // top-level additive operator over an inner comparison is rejected.
        if condition.kind != NodeKind::BinaryOperation
            || !COMPARISON_OPERATORS.contains(&condition.value.as_str())
        {
            return Err(self.syntax_err(
                "If condition must be a comparison expression (==, !=, <, >, <=, >=)",
            ));
        }

        self.consume(Kind::Separator, ")")?;
        self.consume(Kind::Separator, "{")?;

        let mut if_node = ParseTreeNode::new(NodeKind::IfStatement, "if");
        if_node.add_child(condition);

        while self.peek().is_some() && !self.next_is(Kind::Separator, "}") {
            let statement = self.parse_statement()?;
            if_node.add_child(statement);
        }
        if self.peek().is_none() {
            return Err(
                self.syntax_err("Unexpected end of input: missing closing brace for if statement")
            );
        }
        self.consume(Kind::Separator, "}")?;

        if self.next_is(Kind::Keyword, "else") {
            self.consume(Kind::Keyword, "else")?;

            if self.next_is(Kind::Keyword, "if") {
                // else-if chains: the nested if statement is wrapped in an
                // ElseStatement node.
                let else_if = self.parse_if_statement()?;
                let mut else_node = ParseTreeNode::new(NodeKind::ElseStatement, "else");
                else_node.add_child(else_if);
                if_node.add_child(else_node);
            } else {
                self.consume(Kind::Separator, "{")?;

                let mut else_node = ParseTreeNode::new(NodeKind::ElseStatement, "else");
                while self.peek().is_some() && !self.next_is(Kind::Separator, "}") {
                    let statement = self.parse_statement()?;
                    else_node.add_child(statement);
                }
                if self.peek().is_none() {
                    return Err(self.syntax_err(
                        "Unexpected end of input: missing closing brace for else statement",
                    ));
                }
                if_node.add_child(else_node);
                self.consume(Kind::Separator, "}")?;
            }
        }

        Ok(if_node)
    }

    /// Expression := Term ( ('+'|'-'|'=='|'!='|'<'|'>'|'<='|'>=') Term )*
    fn parse_expression(&mut self) -> ParserResult {
        let mut left = self.parse_term()?;
        while self.next_operator_in(&EXPRESSION_OPERATORS) {
            let operator = self.next().unwrap();
            let right = self.parse_term()?;
            left = Self::binary_operation(operator.value, left, right);
        }
        Ok(left)
    }

    /// Term := Factor ( ('*'|'/') Factor )*
    fn parse_term(&mut self) -> ParserResult {
        let mut left = self.parse_factor()?;
        while self.next_operator_in(&TERM_OPERATORS) {
            let operator = self.next().unwrap();
            let right = self.parse_factor()?;
            left = Self::binary_operation(operator.value, left, right);
        }
        Ok(left)
    }

    /// Factor := NUMBER | IDENTIFIER | STRING | '(' Expression ')'
    ///
    /// A parenthesized expression collapses to its inner node; the tree keeps
    /// no trace of the parentheses.
    fn parse_factor(&mut self) -> ParserResult {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.syntax_err("Unexpected end of input while parsing factor")),
        };
        match token.kind {
            Kind::Number => {
                self.next();
                Ok(ParseTreeNode::new(NodeKind::Number, token.value))
            }
            Kind::Identifier => {
                self.next();
                Ok(ParseTreeNode::new(NodeKind::Identifier, token.value))
            }
            Kind::String => {
                self.next();
                Ok(ParseTreeNode::new(NodeKind::String, token.value))
            }
            Kind::Separator if token.value == "(" => {
                self.next();
                let expression = self.parse_expression()?;
                if self.peek().is_none() {
                    return Err(
                        self.syntax_err("Unexpected end of input: missing closing parenthesis")
                    );
                }
                self.consume(Kind::Separator, ")")?;
                Ok(expression)
            }
            _ => {
                self.next();
                Err(SyntaxError {
                    pos: token.pos,
                    msg: format!(
                        "Unexpected token: {} '{}' while parsing factor",
                        token.kind, token.value
                    ),
                })
            }
        }
    }

    /// Fold two operands under a binary operator node, left-associatively.
    fn binary_operation(operator: &str, left: ParseTreeNode, right: ParseTreeNode) -> ParseTreeNode {
        let mut node = ParseTreeNode::new(NodeKind::BinaryOperation, operator);
        node.add_child(left);
        node.add_child(right);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;

    fn parse(input: &str) -> ParseTreeNode {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse().unwrap()
    }

    fn parse_err(input: &str) -> MiniLangError {
        let tokens = Lexer::new(input).tokenize().unwrap();
        Parser::new(tokens).parse().unwrap_err()
    }

    #[test]
    fn test_parse_declaration() {
        let program = parse("int x = 5;");
        assert_eq!(program.kind, NodeKind::Program);
        assert_eq!(program.children().len(), 1);

        let declaration = &program.children()[0];
        assert_eq!(declaration.kind, NodeKind::Declaration);
        assert_eq!(declaration.value, "int");
        assert_eq!(declaration.children()[0].kind, NodeKind::Identifier);
        assert_eq!(declaration.children()[0].value, "x");
        assert_eq!(declaration.children()[1].kind, NodeKind::Number);
        assert_eq!(declaration.children()[1].value, "5");
    }

    #[test]
    fn test_declaration_value_is_declared_type() {
        for &(src, data_type) in [
            ("int a = 1;", "int"),
            ("float b = 1.5;", "float"),
            ("double c = 2.5;", "double"),
            ("string d = \"s\";", "string"),
        ]
        .iter()
        {
            let program = parse(src);
            let declaration = &program.children()[0];
            assert_eq!(declaration.value, data_type);
            assert_eq!(declaration.children()[0].kind, NodeKind::Identifier);
        }
    }

    #[test]
    fn test_additive_and_comparison_share_one_tier() {
        // `a + b == c` folds left to right into ((a + b) == c) ...
        let program = parse("a + b == c");
        let root = &program.children()[0];
        assert_eq!(root.kind, NodeKind::BinaryOperation);
        assert_eq!(root.value, "==");
        assert_eq!(root.children()[0].value, "+");

        // ... and `a == b + c` into ((a == b) + c): comparisons do not bind
        // tighter than addition.
        let program = parse("a == b + c");
        let root = &program.children()[0];
        assert_eq!(root.value, "+");
        assert_eq!(root.children()[0].value, "==");
    }

    #[test]
    fn test_term_binds_tighter() {
        let program = parse("a + b * c");
        let root = &program.children()[0];
        assert_eq!(root.value, "+");
        assert_eq!(root.children()[0].value, "a");
        assert_eq!(root.children()[1].value, "*");
    }

    #[test]
    fn test_parentheses_collapse() {
        assert_eq!(parse("(5)"), parse("5"));
        assert_eq!(parse("((a + b))"), parse("a + b"));
    }

    #[test]
    fn test_expression_statement_semicolon_is_optional() {
        assert_eq!(parse("a + b"), parse("a + b;"));
    }

    #[test]
    fn test_parse_if_else() {
        let program = parse("if (x == 5) { int y = 1; } else { int y = 2; }");
        let if_node = &program.children()[0];
        assert_eq!(if_node.kind, NodeKind::IfStatement);
        assert_eq!(if_node.value, "if");
        assert_eq!(if_node.children().len(), 3);

        let condition = &if_node.children()[0];
        assert_eq!(condition.kind, NodeKind::BinaryOperation);
        assert_eq!(condition.value, "==");

        let then_branch = &if_node.children()[1];
        assert_eq!(then_branch.kind, NodeKind::Declaration);

        let else_node = &if_node.children()[2];
        assert_eq!(else_node.kind, NodeKind::ElseStatement);
        assert_eq!(else_node.children().len(), 1);
        assert_eq!(else_node.children()[0].kind, NodeKind::Declaration);
    }

    #[test]
    fn test_parse_else_if_chain() {
        let program = parse("if (a < 1) { x; } else if (a > 2) { y; } else { z; }");
        let if_node = &program.children()[0];
        let else_node = &if_node.children()[2];
        assert_eq!(else_node.kind, NodeKind::ElseStatement);

        // else-if wraps a nested IfStatement, which carries its own else.
        let nested_if = &else_node.children()[0];
        assert_eq!(nested_if.kind, NodeKind::IfStatement);
        assert_eq!(nested_if.children()[0].value, ">");
        assert_eq!(
            nested_if.children()[2].kind,
            NodeKind::ElseStatement
        );
    }

    #[test]
    fn test_if_condition_must_be_comparison() {
        let err = parse_err("if (x) { }");
        assert_eq!(
            err.message(),
            "If condition must be a comparison expression (==, !=, <, >, <=, >=)"
        );
    }

    #[test]
    fn test_if_condition_checks_outermost_node_only() {
        // The parenthesized comparison collapses to the inner node and passes.
        parse("if ((a == b)) { }");
        // A top-level additive operator defeats the check even though an
        // inner comparison exists.
        let err = parse_err("if (x == 1 + 1) { }");
        assert_eq!(
            err.message(),
            "If condition must be a comparison expression (==, !=, <, >, <=, >=)"
        );
        // With the comparison folding last, the same pieces are accepted.
        parse("if (1 + x == 1) { }");
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse_err("if (a == b) { x;");
        assert_eq!(
            err.message(),
            "Unexpected end of input: missing closing brace for if statement"
        );

        let err = parse_err("if (a == b) { x; } else { y;");
        assert_eq!(
            err.message(),
            "Unexpected end of input: missing closing brace for else statement"
        );
    }

    #[test]
    fn test_token_mismatch() {
        let err = parse_err("if (a == b} { }");
        assert_eq!(err.message(), "Expected SEPARATOR ')', but got SEPARATOR '}'");
    }

    #[test]
    fn test_unexpected_token_in_factor() {
        let err = parse_err("int x = ;");
        assert_eq!(
            err.message(),
            "Unexpected token: SEPARATOR ';' while parsing factor"
        );
    }

    #[test]
    fn test_unexpected_end_of_input_in_factor() {
        let err = parse_err("a +");
        assert_eq!(err.message(), "Unexpected end of input while parsing factor");
    }

    #[test]
    fn test_missing_closing_parenthesis() {
        let err = parse_err("(a + b");
        assert_eq!(
            err.message(),
            "Unexpected end of input: missing closing parenthesis"
        );
    }
}
