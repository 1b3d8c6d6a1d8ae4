//! Table-driven LL(1) driver.
//!
//! The driver keeps one stack of (grammar symbol, tree node) pairs so the
//! symbol being predicted and the node it will fill can never fall out of
//! step. The bottom entry is the synthetic `Dollar` terminal (which has no
//! tree node); above it sits the start non-terminal paired with the root.
//!
//! Recovery is panic-mode with fixed per-kind actions:
//! - terminal mismatch: pop the expected symbol, keep the lookahead;
//! - error cell: discard the lookahead, keep the non-terminal;
//! - sync cell: pop the non-terminal, keep the lookahead.
//!
//! At most one syntax error is reported per source line; suppressed repeats
//! on the same line still perform their recovery action.

use std::io::{self, Read};

use rill_common::diag::{Diagnostic, Diagnostics};
use rill_common::token::TokenKind;
use rill_common::trie::KeywordTable;
use rill_lexer::Scanner;

use crate::grammar::{Grammar, Symbol};
use crate::table::{Cell, ParseTable};
use crate::tree::{NodeId, ParseTree};

/// Initial capacity of the parse stack. Deep enough for the grammar as
/// shipped; the stack grows if a pathological input needs more.
const STACK_DEPTH: usize = 200;

/// Result of one parse: the tree (returned even on failure), everything
/// that was reported, and the verdict.
pub struct ParseOutcome {
    pub tree: ParseTree,
    pub diagnostics: Diagnostics,
    /// True when no syntactic or structural error was recorded. Recovered
    /// lexical errors do not by themselves clear this flag.
    pub success: bool,
}

/// Parse a byte source against the grammar, building the parse tree and
/// recovering from errors along the way.
pub fn parse_source<R: Read>(
    src: R,
    grammar: &Grammar,
    table: &ParseTable,
    keywords: &KeywordTable,
) -> io::Result<ParseOutcome> {
    let mut diags = Diagnostics::new();
    let mut scanner = Scanner::new(src, keywords)?;

    let start = Grammar::start();
    let mut tree = ParseTree::new(Symbol::NonTerminal(start));

    let mut stack: Vec<(Symbol, Option<NodeId>)> = Vec::with_capacity(STACK_DEPTH);
    stack.push((Symbol::Terminal(TokenKind::Dollar), None));
    stack.push((Symbol::NonTerminal(start), Some(tree.root())));

    let mut lookahead = scanner.next_token(&mut diags)?;
    let mut had_syntax_error = false;
    let mut last_err_line: Option<u32> = None;

    while let Some(&(top, node)) = stack.last() {
        match top {
            Symbol::Terminal(expected) => {
                if expected == TokenKind::Dollar && lookahead.kind == TokenKind::Dollar {
                    break; // accept
                }
                if expected == lookahead.kind {
                    stack.pop();
                    if let Some(id) = node {
                        let leaf = tree.node_mut(id);
                        leaf.symbol = Symbol::Terminal(lookahead.kind);
                        leaf.line = Some(lookahead.line);
                        leaf.lexeme = Some(std::mem::take(&mut lookahead.lexeme));
                    }
                    lookahead = scanner.next_token(&mut diags)?;
                } else {
                    // Delete the expected stack symbol, keep the lookahead.
                    had_syntax_error = true;
                    if last_err_line != Some(lookahead.line) {
                        last_err_line = Some(lookahead.line);
                        diags.push(Diagnostic::TokenMismatch {
                            line: lookahead.line,
                            found: lookahead.kind,
                            lexeme: lookahead.lexeme.clone(),
                            expected,
                        });
                    }
                    stack.pop();
                }
            }
            Symbol::NonTerminal(nt) => match table.cell(nt, lookahead.kind) {
                Cell::Rule(rule_idx) => {
                    stack.pop();
                    let parent = node.expect("non-terminal entries always carry a node");
                    let prod = &grammar.productions(nt)[rule_idx];
                    if prod.is_epsilon() {
                        tree.add_child(parent, Symbol::Terminal(TokenKind::Epsilon));
                    } else {
                        let kids: Vec<NodeId> = prod
                            .rhs
                            .iter()
                            .map(|&sym| tree.add_child(parent, sym))
                            .collect();
                        // Push in reverse so the leftmost symbol is handled
                        // next.
                        for (&sym, &kid) in prod.rhs.iter().zip(kids.iter()).rev() {
                            stack.push((sym, Some(kid)));
                        }
                    }
                }
                Cell::Error => {
                    had_syntax_error = true;
                    if last_err_line != Some(lookahead.line) {
                        last_err_line = Some(lookahead.line);
                        diags.push(Diagnostic::UnexpectedToken {
                            line: lookahead.line,
                            found: lookahead.kind,
                            lexeme: lookahead.lexeme.clone(),
                            expanding: nt.name(),
                        });
                    }
                    if lookahead.kind == TokenKind::Dollar {
                        // Buffer exhausted with work remaining.
                        break;
                    }
                    lookahead = scanner.next_token(&mut diags)?;
                }
                Cell::Sync => {
                    had_syntax_error = true;
                    if last_err_line != Some(lookahead.line) {
                        last_err_line = Some(lookahead.line);
                        diags.push(Diagnostic::AbandonedNonTerminal {
                            line: lookahead.line,
                            found: lookahead.kind,
                            lexeme: lookahead.lexeme.clone(),
                            expanding: nt.name(),
                        });
                    }
                    stack.pop();
                }
            },
        }
    }

    // Structural verdicts.
    let stack_is_clean =
        stack.len() == 1 && matches!(stack[0].0, Symbol::Terminal(TokenKind::Dollar));
    if stack.is_empty() {
        if lookahead.kind != TokenKind::Dollar {
            had_syntax_error = true;
            diags.push(Diagnostic::InputNotConsumed);
        }
    } else if !stack_is_clean {
        had_syntax_error = true;
        diags.push(Diagnostic::StackNotEmpty);
    } else if lookahead.kind != TokenKind::Dollar {
        had_syntax_error = true;
        diags.push(Diagnostic::InputNotConsumed);
    }

    Ok(ParseOutcome {
        tree,
        diagnostics: diags,
        success: !had_syntax_error,
    })
}
