//! Parse tree and its fixed-width listing.
//!
//! Nodes live in an arena owned by the [`ParseTree`]; one arena per parse,
//! so every node (and every lexeme moved into a leaf) is released together
//! regardless of how panic-mode recovery reshuffled the stacks.

use std::io::{self, Write};

use rill_common::token::TokenKind;

use crate::grammar::Symbol;

/// Handle to a node in a [`ParseTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// One parse-tree node.
///
/// Interior nodes carry a non-terminal symbol and one child per symbol of
/// the production chosen for them (or a single `EPSILON` leaf). Terminal
/// leaves carry the matched token's kind, line, and lexeme.
#[derive(Debug)]
pub struct Node {
    pub symbol: Symbol,
    pub line: Option<u32>,
    pub lexeme: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-backed parse tree. The root is always the start non-terminal.
#[derive(Debug)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ParseTree {
    /// Create a tree containing only the root node.
    pub(crate) fn new(root_symbol: Symbol) -> Self {
        let root = Node {
            symbol: root_symbol,
            line: None,
            lexeme: None,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Allocate a child of `parent`, appended after its existing children.
    pub(crate) fn add_child(&mut self, parent: NodeId, symbol: Symbol) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            symbol,
            line: None,
            lexeme: None,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Terminal leaves in left-to-right source order, epsilon leaves
    /// excluded. Concatenating their lexemes reproduces the token sequence
    /// of the accepted input.
    pub fn terminal_leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = self.node(id);
        if node.children.is_empty() {
            if let Symbol::Terminal(kind) = node.symbol {
                if kind != TokenKind::Epsilon {
                    out.push(id);
                }
            }
            return;
        }
        for &child in &node.children {
            self.collect_leaves(child, out);
        }
    }
}

const COL: usize = 30;

/// Write the parse-tree listing: an in-order traversal (first child, self,
/// remaining children) with one row of seven width-30 columns per node.
/// The header row is written exactly once, at the top.
pub fn write_parse_tree(tree: &ParseTree, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{:<COL$}{:<COL$}{:<COL$}{:<COL$}{:<COL$}{:<COL$}{:<COL$}\n",
        "lexeme",
        "lineno",
        "token",
        "valueIfNumber",
        "parentNodeSymbol",
        "isLeafNode(yes/no)",
        "NodeSymbol"
    )?;
    write_node(tree, tree.root(), out)
}

fn write_node(tree: &ParseTree, id: NodeId, out: &mut impl Write) -> io::Result<()> {
    let node = tree.node(id);

    if let Some(&first) = node.children.first() {
        write_node(tree, first, out)?;
    }

    let lexeme = node.lexeme.as_deref().unwrap_or("----");
    let line = match node.line {
        Some(l) => l.to_string(),
        None => "----".to_string(),
    };
    let name = node.symbol.name();
    let value = match node.symbol {
        Symbol::Terminal(TokenKind::Num) | Symbol::Terminal(TokenKind::RNum) => lexeme,
        _ => "----",
    };
    let (parent, leaf, symbol) = match node.parent {
        Some(p) => (
            tree.node(p).symbol.name(),
            if node.children.is_empty() { "YES" } else { "NO" },
            name,
        ),
        None => ("----", "----", "----"),
    };
    writeln!(
        out,
        "{lexeme:<COL$}{line:<COL$}{name:<COL$}{value:<COL$}{parent:<COL$}{leaf:<COL$}{symbol:<COL$}"
    )?;

    for &child in node.children.iter().skip(1) {
        write_node(tree, child, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::NonTerminal;

    fn tiny_tree() -> ParseTree {
        // <program> with two children: a matched TK_MAIN leaf and an
        // epsilon leaf.
        let mut tree = ParseTree::new(Symbol::NonTerminal(NonTerminal::Program));
        let leaf = tree.add_child(tree.root(), Symbol::Terminal(TokenKind::Main));
        {
            let node = tree.node_mut(leaf);
            node.line = Some(1);
            node.lexeme = Some("_main".to_string());
        }
        tree.add_child(tree.root(), Symbol::Terminal(TokenKind::Epsilon));
        tree
    }

    #[test]
    fn children_attach_in_order() {
        let tree = tiny_tree();
        let root = tree.node(tree.root());
        assert_eq!(root.children.len(), 2);
        let first = tree.node(root.children[0]);
        assert_eq!(first.symbol, Symbol::Terminal(TokenKind::Main));
        assert_eq!(first.parent, Some(tree.root()));
    }

    #[test]
    fn terminal_leaves_skip_epsilon() {
        let tree = tiny_tree();
        let leaves = tree.terminal_leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(tree.node(leaves[0]).lexeme.as_deref(), Some("_main"));
    }

    #[test]
    fn listing_is_in_order_with_single_header() {
        let tree = tiny_tree();
        let mut out = Vec::new();
        write_parse_tree(&tree, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Header, blank spacer, then three node rows: first child, root,
        // second child.
        assert!(lines[0].starts_with("lexeme"));
        assert_eq!(text.matches("lexeme").count(), 1);
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("_main"));
        assert!(lines[3].starts_with("----"));
        assert!(lines[3].contains("<program>"));
        assert!(lines[4].contains("EPSILON"));
    }

    #[test]
    fn rows_are_fixed_width() {
        let tree = tiny_tree();
        let mut out = Vec::new();
        write_parse_tree(&tree, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for row in text.lines().filter(|l| !l.is_empty()) {
            assert_eq!(row.len(), 7 * COL, "row not seven 30-wide columns: {row:?}");
        }
    }

    #[test]
    fn num_leaves_fill_the_value_column() {
        let mut tree = ParseTree::new(Symbol::NonTerminal(NonTerminal::Var));
        let leaf = tree.add_child(tree.root(), Symbol::Terminal(TokenKind::Num));
        {
            let node = tree.node_mut(leaf);
            node.line = Some(2);
            node.lexeme = Some("42".to_string());
        }
        let mut out = Vec::new();
        write_parse_tree(&tree, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(2).unwrap();
        // Columns: lexeme, lineno, token, valueIfNumber.
        assert_eq!(&row[0..4], "42  ");
        assert_eq!(row[3 * COL..3 * COL + 2].trim(), "42");
    }
}
