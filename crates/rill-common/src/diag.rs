//! Diagnostic values for the Rill front end.
//!
//! Every lexical and syntactic error is recorded as a [`Diagnostic`] in an
//! ordered [`Diagnostics`] sink instead of being printed at the point of
//! detection. The driver renders the sink in source order; `Display`
//! produces the exact user-visible `Line NN: ...` formats.

use std::fmt;

use crate::token::TokenKind;

/// Which multi-character pattern a failed scan was partway through.
///
/// Selects the expected-suffix hint appended to an unknown-pattern report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexCode {
    /// `@` not followed by `@@`.
    ExpectedOr,
    /// `!` not followed by `=`.
    ExpectedNe,
    /// `&` not followed by `&&`.
    ExpectedAnd,
    /// `=` not followed by `=`.
    ExpectedEq,
    /// `<--` not followed by `-`.
    ExpectedAssign,
    /// `_` not followed by a letter.
    FunIdStart,
    /// `#` not followed by a lowercase letter.
    RuIdStart,
    /// Decimal point not followed by two digits.
    FractionDigits,
    /// `E` not followed by a digit or sign.
    ExponentStart,
    /// Exponent sign not followed by a digit.
    ExponentDigit,
    /// Exponent shorter than two digits.
    ExponentWidth,
}

impl LexCode {
    /// The expected-suffix hint for this failure.
    pub fn hint(self) -> &'static str {
        match self {
            LexCode::ExpectedOr => "Expected @@@",
            LexCode::ExpectedNe => "Expected !=",
            LexCode::ExpectedAnd => "Expected &&&",
            LexCode::ExpectedEq => "Expected ==",
            LexCode::ExpectedAssign => "Expected <---",
            LexCode::FunIdStart => "Expected a letter [a-z]|[A-Z] after _",
            LexCode::RuIdStart => "Expected a lowercase letter [a-z] after #",
            LexCode::FractionDigits => "Expected two digits after decimal point",
            LexCode::ExponentStart => "Expected a digit [0-9] or +|- after E",
            LexCode::ExponentDigit => "Expected a digit [0-9] after sign/E",
            LexCode::ExponentWidth => "Expected two digits in exponent",
        }
    }
}

/// One recorded front-end error.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A character with no outgoing DFA edge from the start state.
    UnknownSymbol { line: u32, symbol: char },
    /// A prefix that looked like a multi-character token but was not completed.
    UnknownPattern {
        line: u32,
        pattern: String,
        code: Option<LexCode>,
    },
    /// An `Id` lexeme longer than 20 bytes. The token is dropped.
    IdTooLong { line: u32, lexeme: String },
    /// A `FunId` lexeme longer than 30 bytes. The token is dropped.
    FunIdTooLong { line: u32, lexeme: String },
    /// Stack-top terminal differs from the lookahead token.
    TokenMismatch {
        line: u32,
        found: TokenKind,
        lexeme: String,
        expected: TokenKind,
    },
    /// Parse-table error cell: the stack-top non-terminal has no rule for
    /// the lookahead. The lookahead is discarded.
    UnexpectedToken {
        line: u32,
        found: TokenKind,
        lexeme: String,
        expanding: &'static str,
    },
    /// Parse-table sync cell: the lookahead is in FOLLOW of the stack-top
    /// non-terminal, which is abandoned.
    AbandonedNonTerminal {
        line: u32,
        found: TokenKind,
        lexeme: String,
        expanding: &'static str,
    },
    /// Input consumed but the symbol stack is not empty.
    StackNotEmpty,
    /// Symbol stack empty but input not fully consumed.
    InputNotConsumed,
}

impl Diagnostic {
    /// Whether this diagnostic counts against `COMPILATION SUCCESS!`.
    ///
    /// Recovered lexical errors drop a token or a span but do not by
    /// themselves fail the parse.
    pub fn is_syntactic(&self) -> bool {
        matches!(
            self,
            Diagnostic::TokenMismatch { .. }
                | Diagnostic::UnexpectedToken { .. }
                | Diagnostic::AbandonedNonTerminal { .. }
                | Diagnostic::StackNotEmpty
                | Diagnostic::InputNotConsumed
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownSymbol { line, symbol } => {
                write!(f, "Line {line:02}: Lexical Error: Unknown symbol <{symbol}>")
            }
            Diagnostic::UnknownPattern {
                line,
                pattern,
                code,
            } => {
                write!(f, "Line {line:02}: Lexical Error: Unknown pattern <{pattern}>")?;
                if let Some(code) = code {
                    write!(f, " : {}", code.hint())?;
                }
                Ok(())
            }
            Diagnostic::IdTooLong { line, lexeme } => write!(
                f,
                "Line {line:02}: Lexical Error: Variable identifier \"{lexeme}\" exceeds the maximum length of 20 characters"
            ),
            Diagnostic::FunIdTooLong { line, lexeme } => write!(
                f,
                "Line {line:02}: Lexical Error: Function identifier \"{lexeme}\" exceeds the maximum length of 30 characters"
            ),
            Diagnostic::TokenMismatch {
                line,
                found,
                lexeme,
                expected,
            } => write!(
                f,
                "Line {line:02}: Syntax Error : Token {} (lexeme \"{lexeme}\") does not match the expected token {}",
                found.name(),
                expected.name()
            ),
            Diagnostic::UnexpectedToken {
                line,
                found,
                lexeme,
                expanding,
            } => write!(
                f,
                "Line {line:02}: Syntax Error : Unexpected token {} (lexeme \"{lexeme}\") while expanding {expanding}",
                found.name()
            ),
            Diagnostic::AbandonedNonTerminal {
                line,
                found,
                lexeme,
                expanding,
            } => write!(
                f,
                "Line {line:02}: Syntax Error : Unexpected token {} (lexeme \"{lexeme}\") while expanding {expanding} - popping",
                found.name()
            ),
            Diagnostic::StackNotEmpty => {
                write!(f, "Syntax Error : Input consumed but symbol stack is not empty")
            }
            Diagnostic::InputNotConsumed => {
                write!(f, "Syntax Error : Symbol stack empty but input not fully consumed")
            }
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Ordered sink of diagnostics.
///
/// Entries are appended in source order (the scanner and parser both work
/// strictly left to right), so iteration order is reporting order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.entries.push(diag);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Remove and return all entries recorded so far, preserving order.
    /// Used by streaming consumers that interleave reports with output rows.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }

    /// Whether any recorded diagnostic is syntactic or structural.
    pub fn has_syntax_errors(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_syntactic)
    }
}
