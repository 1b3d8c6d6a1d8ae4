//! LL(1) parse-table construction.

use rill_common::token::TokenKind;

use crate::first_follow::FirstFollow;
use crate::grammar::NonTerminal;

/// One parse-table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Expand the production with this rule index.
    Rule(usize),
    /// No rule applies; the lookahead is discarded.
    Error,
    /// The lookahead is in FOLLOW of the row's non-terminal (which has no
    /// epsilon rule); the non-terminal is abandoned.
    Sync,
}

/// Dense `|NT| x |TokenKind|` table of [`Cell`]s.
#[derive(Debug)]
pub struct ParseTable {
    cells: Vec<Cell>,
}

impl ParseTable {
    /// Build the table from precomputed FIRST/FOLLOW sets.
    ///
    /// Every cell starts as `Error`. FIRST entries write their contributing
    /// rule. For a nullable non-terminal, the epsilon rule is written over
    /// every FOLLOW cell; otherwise still-empty FOLLOW cells become `Sync`.
    pub fn build(ff: &FirstFollow) -> Self {
        let mut table = Self {
            cells: vec![Cell::Error; NonTerminal::COUNT * TokenKind::COUNT],
        };

        for nt in NonTerminal::ALL {
            for (&t, &rule) in ff.first(nt) {
                table.set(nt, t, Cell::Rule(rule));
            }
            match ff.follow_rule(nt) {
                Some(eps_rule) => {
                    for &t in ff.follow(nt) {
                        table.set(nt, t, Cell::Rule(eps_rule));
                    }
                }
                None => {
                    for &t in ff.follow(nt) {
                        if table.cell(nt, t) == Cell::Error {
                            table.set(nt, t, Cell::Sync);
                        }
                    }
                }
            }
        }

        table
    }

    pub fn cell(&self, nt: NonTerminal, tok: TokenKind) -> Cell {
        self.cells[nt.index() * TokenKind::COUNT + tok.index()]
    }

    fn set(&mut self, nt: NonTerminal, tok: TokenKind, cell: Cell) {
        self.cells[nt.index() * TokenKind::COUNT + tok.index()] = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use rill_common::token::TokenKind as Tk;

    fn build() -> (Grammar, FirstFollow, ParseTable) {
        let g = Grammar::language();
        let ff = FirstFollow::compute(&g);
        let table = ParseTable::build(&ff);
        (g, ff, table)
    }

    #[test]
    fn first_and_follow_cells_are_never_error() {
        let (_, ff, table) = build();
        for nt in NonTerminal::ALL {
            for &t in ff.first(nt).keys() {
                assert_ne!(
                    table.cell(nt, t),
                    Cell::Error,
                    "FIRST cell [{}][{}] is Error",
                    nt.name(),
                    t.name()
                );
            }
            for &t in ff.follow(nt) {
                assert_ne!(
                    table.cell(nt, t),
                    Cell::Error,
                    "FOLLOW cell [{}][{}] is Error",
                    nt.name(),
                    t.name()
                );
            }
        }
    }

    #[test]
    fn sync_cells_respect_the_discipline() {
        let (g, ff, table) = build();
        for nt in NonTerminal::ALL {
            // A Sync cell only arises in a FOLLOW column of a non-terminal
            // without an epsilon rule.
            for &t in ff.follow(nt) {
                if table.cell(nt, t) == Cell::Sync {
                    assert!(!g.has_epsilon(nt), "Sync in nullable row {}", nt.name());
                }
            }
            if g.has_epsilon(nt) {
                for &t in ff.follow(nt) {
                    assert!(matches!(table.cell(nt, t), Cell::Rule(_)));
                }
            }
        }
    }

    #[test]
    fn rule_cells_index_real_productions() {
        let (g, ff, table) = build();
        for nt in NonTerminal::ALL {
            for &t in ff.first(nt).keys() {
                if let Cell::Rule(idx) = table.cell(nt, t) {
                    assert!(idx < g.productions(nt).len());
                }
            }
        }
    }

    #[test]
    fn known_cells_of_the_payload() {
        let (g, _, table) = build();
        // <program> on TK_MAIN expands rule 0 (its only production).
        assert_eq!(table.cell(NonTerminal::Program, Tk::Main), Cell::Rule(0));
        // <otherFunctions> on TK_MAIN takes the epsilon rule (index 1).
        assert_eq!(
            table.cell(NonTerminal::OtherFunctions, Tk::Main),
            Cell::Rule(1)
        );
        assert!(g.productions(NonTerminal::OtherFunctions)[1].is_epsilon());
        // <stmt> on TK_WHILE expands the iterative alternative.
        assert_eq!(table.cell(NonTerminal::Stmt, Tk::While), Cell::Rule(1));
        // <program> has no rule for a stray operator.
        assert_eq!(table.cell(NonTerminal::Program, Tk::Or), Cell::Error);
        // <program> on DOLLAR is a sync point (no epsilon rule).
        assert_eq!(table.cell(NonTerminal::Program, Tk::Dollar), Cell::Sync);
    }
}
