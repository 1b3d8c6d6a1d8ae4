//! End-to-end parser tests: whole programs through the scanner, table, and
//! LL(1) driver, asserting on the outcome, the diagnostics, and the tree.

use rill_common::diag::Diagnostics;
use rill_common::token::TokenKind;
use rill_common::trie::KeywordTable;
use rill_lexer::Scanner;
use rill_parser::{
    parse_source, Cell, FirstFollow, Grammar, NonTerminal, ParseOutcome, ParseTable, Symbol,
};

fn parse(source: &str) -> ParseOutcome {
    let grammar = Grammar::language();
    let ff = FirstFollow::compute(&grammar);
    let table = ParseTable::build(&ff);
    let keywords = KeywordTable::new();
    parse_source(source.as_bytes(), &grammar, &table, &keywords).expect("in-memory source")
}

fn syntax_error_count(outcome: &ParseOutcome) -> usize {
    outcome
        .diagnostics
        .iter()
        .filter(|d| d.is_syntactic())
        .count()
}

const VALID_MAIN_ONLY: &str = "\
_main
type int : d2;
read(d2);
d2 <--- d2 + 42;
write(d2);
return;
end
";

const VALID_WITH_FUNCTION: &str = "\
_one input parameter list [int b2] output parameter list [int c2];
c2 <--- b2 * 2;
return [c2];
end
_main
type int : d2;
[d2] <--- call _one with parameters [d2];
return;
end
";

#[test]
fn valid_program_succeeds() {
    let outcome = parse(VALID_MAIN_ONLY);
    assert!(
        outcome.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        outcome.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    );
    assert!(outcome.success);
    assert_eq!(
        outcome.tree.node(outcome.tree.root()).symbol,
        Symbol::NonTerminal(NonTerminal::Program)
    );
}

#[test]
fn valid_program_with_function_succeeds() {
    let outcome = parse(VALID_WITH_FUNCTION);
    assert!(
        outcome.success,
        "diagnostics: {:?}",
        outcome.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn record_and_union_definitions_parse() {
    let source = "\
_main
record #point
    type int : x;
    type real : y;
endrecord
definetype union #point as #p
type #point : b2;
b2.x <--- 3;
return;
end
";
    let outcome = parse(source);
    assert!(
        outcome.success,
        "diagnostics: {:?}",
        outcome.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn control_flow_and_booleans_parse() {
    let source = "\
_main
type int : d2;
type int : c3;
while ( d2 <= 10 )
    d2 <--- d2 + 1;
endwhile
if ( ( d2 == c3 ) &&& ( d2 != 4 ) )
then
    write(d2);
else
    write(c3);
endif
if ( ~ ( d2 > c3 ) )
then
    read(d2);
endif
return;
end
";
    let outcome = parse(source);
    assert!(
        outcome.success,
        "diagnostics: {:?}",
        outcome.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn stray_operator_reports_one_error_and_recovers() {
    let source = "\
_main
type int : d2;
d2 <--- @@@ 3;
read(d2);
return;
end
";
    let outcome = parse(source);
    assert!(!outcome.success);
    assert_eq!(syntax_error_count(&outcome), 1);
    let message = outcome
        .diagnostics
        .iter()
        .find(|d| d.is_syntactic())
        .unwrap()
        .to_string();
    assert!(message.starts_with("Line 03: Syntax Error :"), "{message}");
    assert!(message.contains("TK_OR"), "{message}");
}

#[test]
fn repeated_errors_on_one_line_are_suppressed() {
    let source = "\
_main
type int : d2;
d2 <--- @@@ @@@ 3;
return;
end
";
    let outcome = parse(source);
    assert!(!outcome.success);
    // Both stray operators are consumed by recovery, one report.
    assert_eq!(syntax_error_count(&outcome), 1);
}

#[test]
fn errors_on_distinct_lines_are_all_reported() {
    let source = "\
_main
type int : d2;
d2 <--- @@@ 3;
c3 <--- @@@ 4;
return;
end
";
    let outcome = parse(source);
    assert!(!outcome.success);
    assert_eq!(syntax_error_count(&outcome), 2);
}

#[test]
fn truncated_program_reports_structural_error() {
    let outcome = parse("_main\ntype int : d2;\n");
    assert!(!outcome.success);
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.to_string() == "Syntax Error : Input consumed but symbol stack is not empty"));
}

#[test]
fn trailing_tokens_report_input_not_consumed() {
    let mut source = VALID_MAIN_ONLY.to_string();
    source.push_str("d2");
    let outcome = parse(&source);
    assert!(!outcome.success);
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.to_string() == "Syntax Error : Symbol stack empty but input not fully consumed"));
}

#[test]
fn empty_input_fails_cleanly() {
    let outcome = parse("");
    assert!(!outcome.success);
    assert_eq!(syntax_error_count(&outcome), 1);
}

#[test]
fn dropped_oversized_id_surfaces_lexical_then_syntax_errors() {
    let long_id = format!("b{}", "2".repeat(21));
    let source = format!(
        "_main\ntype int : {long_id};\ntype int : c3;\nread(c3);\nreturn;\nend\n"
    );
    let outcome = parse(&source);
    assert!(!outcome.success);
    let lexical: Vec<String> = outcome
        .diagnostics
        .iter()
        .filter(|d| !d.is_syntactic())
        .map(|d| d.to_string())
        .collect();
    assert_eq!(lexical.len(), 1);
    assert!(lexical[0].contains("exceeds the maximum length of 20"));
    // The declaration on line 3 still parses: no error mentions line 03.
    assert!(outcome
        .diagnostics
        .iter()
        .all(|d| !d.to_string().starts_with("Line 03")));
}

#[test]
fn parse_tree_children_mirror_chosen_productions() {
    let grammar = Grammar::language();
    let outcome = parse(VALID_WITH_FUNCTION);
    assert!(outcome.success);

    let tree = &outcome.tree;
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.children.is_empty() {
            continue;
        }
        let Symbol::NonTerminal(nt) = node.symbol else {
            panic!("terminal node with children");
        };
        let child_syms: Vec<Symbol> =
            node.children.iter().map(|&c| tree.node(c).symbol).collect();
        let is_epsilon_expansion =
            child_syms == [Symbol::Terminal(TokenKind::Epsilon)];
        let matches_some_rule = grammar
            .productions(nt)
            .iter()
            .any(|p| p.rhs == child_syms);
        assert!(
            is_epsilon_expansion || matches_some_rule,
            "children of {} match no production: {child_syms:?}",
            nt.name()
        );
        assert!(node.children.len() <= rill_parser::MAX_RHS_LEN);
        stack.extend(node.children.iter().copied());
    }
}

#[test]
fn terminal_leaves_have_lines_and_lexemes() {
    let outcome = parse(VALID_MAIN_ONLY);
    assert!(outcome.success);
    let tree = &outcome.tree;
    let mut last_line = 0;
    for id in tree.terminal_leaves() {
        let node = tree.node(id);
        let line = node.line.expect("matched leaf must carry a line");
        let lexeme = node.lexeme.as_ref().expect("matched leaf owns its lexeme");
        assert!(!lexeme.is_empty());
        assert!(line >= last_line, "leaf lines must be non-decreasing");
        last_line = line;
    }
}

#[test]
fn leaf_round_trip_relexes_to_the_same_terminals() {
    let outcome = parse(VALID_WITH_FUNCTION);
    assert!(outcome.success);
    let tree = &outcome.tree;

    let mut rebuilt = String::new();
    let mut original_kinds = Vec::new();
    for id in tree.terminal_leaves() {
        let node = tree.node(id);
        rebuilt.push_str(node.lexeme.as_deref().unwrap());
        rebuilt.push(' ');
        let Symbol::Terminal(kind) = node.symbol else {
            panic!("non-terminal leaf");
        };
        original_kinds.push(kind);
    }

    let keywords = KeywordTable::new();
    let mut scanner = Scanner::new(rebuilt.as_bytes(), &keywords).unwrap();
    let mut diags = Diagnostics::new();
    let mut relexed = Vec::new();
    loop {
        let tok = scanner.next_token(&mut diags).unwrap();
        if tok.kind == TokenKind::Dollar {
            break;
        }
        relexed.push(tok.kind);
    }
    assert!(diags.is_empty());
    assert_eq!(relexed, original_kinds);
}

#[test]
fn grammar_coverage_cells_never_error() {
    let grammar = Grammar::language();
    let ff = FirstFollow::compute(&grammar);
    let table = ParseTable::build(&ff);
    for nt in NonTerminal::ALL {
        for &t in ff.first(nt).keys() {
            assert_ne!(table.cell(nt, t), Cell::Error);
        }
        for &t in ff.follow(nt) {
            assert_ne!(table.cell(nt, t), Cell::Error);
        }
    }
}
