//! Parse tree datastructures.
//! In here are all datastructures needed for representing one derivation of
//! the Program grammar rule over a token sequence.

use std::fmt;

/// The grammar construct a parse tree node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    Declaration,
    IfStatement,
    ElseStatement,
    BinaryOperation,
    Identifier,
    Number,
    String,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Declaration => "Declaration",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ElseStatement => "ElseStatement",
            NodeKind::BinaryOperation => "BinaryOperation",
            NodeKind::Identifier => "Identifier",
            NodeKind::Number => "Number",
            NodeKind::String => "String",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A node of the parse tree: a grammar construct, the lexeme identifying the
/// specific instance, and an ordered list of exclusively owned children.
///
/// Children are position-significant; a `Declaration` node keeps its
/// `Identifier` at index 0 and the initializer expression at index 1.
/// Children are only appended while the node itself is being built by the
/// parser; afterwards the tree is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTreeNode {
    pub kind: NodeKind,
    pub value: String,
    children: Vec<ParseTreeNode>,
}

impl ParseTreeNode {
    pub fn new(kind: NodeKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: ParseTreeNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[ParseTreeNode] {
        &self.children
    }

    /// Depth-first rendering with box-drawing connectors. `last` marks a node
    /// that is the last child of its parent (the root counts as last); the
    /// continuation column `│` is only drawn below intermediate children.
    fn render(&self, out: &mut String, prefix: &str, last: bool) {
        out.push_str(prefix);
        out.push_str(if last { "└─ " } else { "├─ " });
        out.push_str(self.kind.as_str());
        out.push_str(": ");
        out.push_str(&self.value);
        out.push('\n');

        for (i, child) in self.children.iter().enumerate() {
            let is_last = i + 1 == self.children.len();
            let child_prefix = if last {
                format!("{}   ", prefix)
            } else if is_last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            child.render(out, &child_prefix, is_last);
        }
    }
}

impl fmt::Display for ParseTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, "", true);
        write!(f, "{}", out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration() -> ParseTreeNode {
        let mut declaration = ParseTreeNode::new(NodeKind::Declaration, "int");
        declaration.add_child(ParseTreeNode::new(NodeKind::Identifier, "x"));
        declaration.add_child(ParseTreeNode::new(NodeKind::Number, "5"));
        declaration
    }

    #[test]
    fn test_children_are_ordered() {
        let declaration = declaration();
        assert_eq!(declaration.children().len(), 2);
        assert_eq!(declaration.children()[0].kind, NodeKind::Identifier);
        assert_eq!(declaration.children()[1].kind, NodeKind::Number);
    }

    #[test]
    fn test_render_single_node() {
        let node = ParseTreeNode::new(NodeKind::Number, "42");
        assert_eq!(node.to_string(), "└─ Number: 42\n");
    }

    #[test]
    fn test_render_tree() {
        let mut program = ParseTreeNode::new(NodeKind::Program, "Program");
        program.add_child(declaration());
        assert_eq!(
            program.to_string(),
            "└─ Program: Program\n\
             \x20\x20\x20└─ Declaration: int\n\
             \x20\x20\x20\x20\x20\x20├─ Identifier: x\n\
             \x20\x20\x20\x20\x20\x20└─ Number: 5\n"
        );
    }

    #[test]
    fn test_render_distinguishes_last_child() {
        let mut program = ParseTreeNode::new(NodeKind::Program, "Program");
        program.add_child(declaration());
        program.add_child(ParseTreeNode::new(NodeKind::Identifier, "x"));
        let rendered = program.to_string();
        // The declaration is no longer the last child, so its subtree keeps
        // the │ continuation column.
        assert!(rendered.contains("├─ Declaration: int"));
        assert!(rendered.contains("│"));
        assert!(rendered.ends_with("└─ Identifier: x\n"));
    }
}
