//! Rill parser: table-driven LL(1) front end producing an owned parse tree.
//!
//! The crate is layered leaves-first: the grammar model and payload
//! ([`grammar`]), the FIRST/FOLLOW engine ([`first_follow`]), the table
//! builder ([`table`]), and the driver ([`parser`]) that walks the token
//! stream from `rill-lexer` while building the tree ([`tree`]).
//!
//! Grammar, sets, and table are built once at startup and are immutable
//! afterwards; one [`ParseTree`] arena is created per parse.

pub mod first_follow;
pub mod grammar;
pub mod parser;
pub mod table;
pub mod tree;

pub use first_follow::FirstFollow;
pub use grammar::{Grammar, NonTerminal, Production, Symbol, MAX_RHS_LEN};
pub use parser::{parse_source, ParseOutcome};
pub use table::{Cell, ParseTable};
pub use tree::{write_parse_tree, Node, NodeId, ParseTree};
