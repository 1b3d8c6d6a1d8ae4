//! Keyword lookup table for the Rill scanner.
//!
//! Reserved words share the lexical shape of field identifiers, so the
//! scanner first emits a `FieldId` lexeme and then consults this table.
//! The table is a 26-ary trie keyed on `[a-z]`; a lookup walks one node per
//! character and falls back to `FieldId` the moment an edge is missing.
//! Built once at startup and read-only afterwards.

use crate::token::TokenKind;

const ALPHABET: usize = 26;

/// The 27 reserved words of the language and the kinds they map to.
const RESERVED: [(&str, TokenKind); 27] = [
    ("as", TokenKind::As),
    ("call", TokenKind::Call),
    ("definetype", TokenKind::DefineType),
    ("else", TokenKind::Else),
    ("end", TokenKind::End),
    ("endif", TokenKind::EndIf),
    ("endrecord", TokenKind::EndRecord),
    ("endunion", TokenKind::EndUnion),
    ("endwhile", TokenKind::EndWhile),
    ("global", TokenKind::Global),
    ("if", TokenKind::If),
    ("input", TokenKind::Input),
    ("int", TokenKind::Int),
    ("list", TokenKind::List),
    ("output", TokenKind::Output),
    ("parameter", TokenKind::Parameter),
    ("parameters", TokenKind::Parameters),
    ("read", TokenKind::Read),
    ("real", TokenKind::Real),
    ("record", TokenKind::Record),
    ("return", TokenKind::Return),
    ("then", TokenKind::Then),
    ("type", TokenKind::Type),
    ("union", TokenKind::Union),
    ("while", TokenKind::While),
    ("with", TokenKind::With),
    ("write", TokenKind::Write),
];

struct Node {
    kids: [Option<Box<Node>>; ALPHABET],
    /// Kind reported when a lookup ends on this node. `FieldId` everywhere
    /// except the terminal node of a reserved word.
    stored: TokenKind,
}

impl Node {
    fn new() -> Self {
        Self {
            kids: Default::default(),
            stored: TokenKind::FieldId,
        }
    }
}

/// Trie over the reserved words; see module docs.
pub struct KeywordTable {
    root: Node,
}

impl KeywordTable {
    /// Build the table with all 27 reserved words inserted.
    pub fn new() -> Self {
        let mut table = Self { root: Node::new() };
        for (word, kind) in RESERVED {
            table.insert(word, kind);
        }
        table
    }

    fn insert(&mut self, word: &str, kind: TokenKind) {
        let mut cur = &mut self.root;
        for b in word.bytes() {
            debug_assert!(b.is_ascii_lowercase(), "keywords are lowercase only");
            let idx = (b - b'a') as usize;
            cur = cur.kids[idx].get_or_insert_with(|| Box::new(Node::new()));
        }
        cur.stored = kind;
    }

    /// Classify a scanned identifier lexeme.
    ///
    /// Returns the keyword kind when `word` is reserved, `FieldId` otherwise.
    /// Any character outside `[a-z]` (an uppercase first letter, say) cannot
    /// be part of a keyword and short-circuits to `FieldId`.
    pub fn lookup(&self, word: &str) -> TokenKind {
        let mut cur = &self.root;
        for b in word.bytes() {
            if !b.is_ascii_lowercase() {
                return TokenKind::FieldId;
            }
            match &cur.kids[(b - b'a') as usize] {
                Some(next) => cur = next,
                None => return TokenKind::FieldId,
            }
        }
        cur.stored
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new()
    }
}
