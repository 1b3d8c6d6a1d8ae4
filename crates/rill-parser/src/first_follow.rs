//! FIRST and FOLLOW set computation.
//!
//! FIRST is computed by recursive descent with a per-non-terminal done
//! flag, recording for each contributed terminal the production that
//! contributed it (the parse-table builder needs that rule index). The
//! grammar is required to be LL(1) and free of left recursion through
//! nullable bodies; that is a precondition of the payload, not a runtime
//! check, and when two productions would contribute the same terminal the
//! first one encountered wins.
//!
//! FOLLOW is seeded with `Dollar` for the start symbol, then one pass over
//! every rule body adds `FIRST(beta) \ epsilon` after each non-terminal and
//! records a containment dependency where `beta` is nullable. Dependencies
//! are then closed by iterating merges to a fixpoint, which handles the
//! mutual-containment pairs the grammar produces (e.g. `<idList>` and
//! `<more_ids>`).

use rustc_hash::{FxHashMap, FxHashSet};

use rill_common::token::TokenKind;

use crate::grammar::{Grammar, NonTerminal, Symbol};

/// Precomputed FIRST and FOLLOW sets for every non-terminal.
#[derive(Debug)]
pub struct FirstFollow {
    /// Per NT: terminal -> index of the production that contributed it.
    first: Vec<FxHashMap<TokenKind, usize>>,
    first_has_epsilon: Vec<bool>,
    follow: Vec<FxHashSet<TokenKind>>,
    /// Per NT: the rule index written into FOLLOW-driven table cells when
    /// the non-terminal can derive epsilon.
    follow_rule: Vec<Option<usize>>,
}

impl FirstFollow {
    /// Compute both sets for the whole grammar.
    pub fn compute(grammar: &Grammar) -> Self {
        let mut ff = Self {
            first: vec![FxHashMap::default(); NonTerminal::COUNT],
            first_has_epsilon: vec![false; NonTerminal::COUNT],
            follow: vec![FxHashSet::default(); NonTerminal::COUNT],
            follow_rule: vec![None; NonTerminal::COUNT],
        };

        let mut done = [false; NonTerminal::COUNT];
        for nt in NonTerminal::ALL {
            ff.first_of(grammar, nt, &mut done);
        }

        ff.follow[Grammar::start().index()].insert(TokenKind::Dollar);

        // deps[x] holds every A with FOLLOW(x) >= FOLLOW(A).
        let mut deps: Vec<Vec<NonTerminal>> = vec![Vec::new(); NonTerminal::COUNT];
        for a in NonTerminal::ALL {
            for prod in grammar.productions(a) {
                follow_contribution(&mut ff, &mut deps, a, &prod.rhs);
            }
        }

        // Transitive closure of the containments.
        let mut changed = true;
        while changed {
            changed = false;
            for x in NonTerminal::ALL {
                for i in 0..deps[x.index()].len() {
                    let a = deps[x.index()][i];
                    let from: Vec<TokenKind> =
                        ff.follow[a.index()].iter().copied().collect();
                    let target = &mut ff.follow[x.index()];
                    let before = target.len();
                    target.extend(from);
                    changed |= target.len() != before;
                }
            }
        }

        ff
    }

    /// Recursive FIRST for one non-terminal.
    fn first_of(&mut self, grammar: &Grammar, nt: NonTerminal, done: &mut [bool]) {
        if done[nt.index()] {
            return;
        }
        done[nt.index()] = true;

        for (rule_idx, prod) in grammar.productions(nt).iter().enumerate() {
            if prod.is_epsilon() {
                self.first_has_epsilon[nt.index()] = true;
                self.follow_rule[nt.index()] = Some(rule_idx);
                continue;
            }
            let mut all_nullable = true;
            for sym in &prod.rhs {
                match *sym {
                    Symbol::Terminal(t) => {
                        self.first[nt.index()].entry(t).or_insert(rule_idx);
                        all_nullable = false;
                        break;
                    }
                    Symbol::NonTerminal(x) => {
                        self.first_of(grammar, x, done);
                        let inherited: Vec<TokenKind> =
                            self.first[x.index()].keys().copied().collect();
                        for t in inherited {
                            self.first[nt.index()].entry(t).or_insert(rule_idx);
                        }
                        if !self.first_has_epsilon[x.index()] {
                            all_nullable = false;
                            break;
                        }
                    }
                }
            }
            if all_nullable {
                self.first_has_epsilon[nt.index()] = true;
                self.follow_rule[nt.index()] = Some(rule_idx);
            }
        }
    }

    /// FIRST(nt) with the contributing rule index per terminal.
    pub fn first(&self, nt: NonTerminal) -> &FxHashMap<TokenKind, usize> {
        &self.first[nt.index()]
    }

    /// Whether epsilon is in FIRST(nt).
    pub fn first_has_epsilon(&self, nt: NonTerminal) -> bool {
        self.first_has_epsilon[nt.index()]
    }

    /// FOLLOW(nt). Never contains epsilon; contains `Dollar` for the start
    /// symbol (and everything the closure propagates it into).
    pub fn follow(&self, nt: NonTerminal) -> &FxHashSet<TokenKind> {
        &self.follow[nt.index()]
    }

    /// The rule index used for FOLLOW-driven cells, when `nt` is nullable.
    pub fn follow_rule(&self, nt: NonTerminal) -> Option<usize> {
        self.follow_rule[nt.index()]
    }
}

/// One production body's contribution to FOLLOW: for `A -> alpha X beta`,
/// add `FIRST(beta) \ epsilon` to FOLLOW(X), and record `FOLLOW(X) >=
/// FOLLOW(A)` when `beta` is nullable or empty.
fn follow_contribution(
    ff: &mut FirstFollow,
    deps: &mut [Vec<NonTerminal>],
    a: NonTerminal,
    rhs: &[Symbol],
) {
    for (i, sym) in rhs.iter().enumerate() {
        let Symbol::NonTerminal(x) = *sym else {
            continue;
        };
        let mut beta_nullable = true;
        for later in &rhs[i + 1..] {
            match *later {
                Symbol::Terminal(t) => {
                    ff.follow[x.index()].insert(t);
                    beta_nullable = false;
                    break;
                }
                Symbol::NonTerminal(y) => {
                    let firsts: Vec<TokenKind> =
                        ff.first[y.index()].keys().copied().collect();
                    ff.follow[x.index()].extend(firsts);
                    if !ff.first_has_epsilon[y.index()] {
                        beta_nullable = false;
                        break;
                    }
                }
            }
        }
        if beta_nullable && x != a && !deps[x.index()].contains(&a) {
            deps[x.index()].push(a);
        }
    }
}
