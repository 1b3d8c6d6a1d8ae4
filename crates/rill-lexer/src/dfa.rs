//! Scanner DFA for the Rill language.
//!
//! [`transition`] is a pure function from (state, byte) to a [`Step`]. The
//! scanner drives it in a loop: `Shift` keeps reading, `Emit` completes a
//! token (possibly retracting one or two already-read bytes), `Invalid`
//! aborts the current scan with an error classification.
//!
//! Comments are not handled here: the scanner intercepts `%` before feeding
//! the DFA.

use rill_common::diag::LexCode;
use rill_common::token::TokenKind;

/// DFA states: `Start` plus one state per partially recognised pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    /// Seen `@`.
    At1,
    /// Seen `@@`.
    At2,
    /// Seen `!`.
    Bang,
    /// Seen `&`.
    Amp1,
    /// Seen `&&`.
    Amp2,
    /// Seen `=`.
    Eq1,
    /// Seen `<`.
    Lt1,
    /// Seen `<-`.
    LtDash1,
    /// Seen `<--`.
    LtDash2,
    /// Seen `>`.
    Gt1,
    /// Seen `_`.
    Underscore,
    /// In the letter run of a function identifier.
    FunAlpha,
    /// In the trailing digit run of a function identifier.
    FunDigit,
    /// Seen `#`.
    Hash,
    /// In the letter run of a record/union identifier.
    RuidBody,
    /// In the digit run of an integer literal.
    IntPart,
    /// Seen the decimal point of a would-be real literal.
    FracDot,
    /// Seen one fractional digit.
    Frac1,
    /// Seen both fractional digits; an exponent may follow.
    Frac2,
    /// Seen `E`.
    Exp,
    /// Seen `E+` or `E-`.
    ExpSign,
    /// Seen one exponent digit.
    ExpDigit,
    /// In the lowercase run of a field identifier or keyword.
    LowerWord,
    /// Seen a single `b`, `c`, or `d`: may become an `Id` or a field identifier.
    BcdPrefix,
    /// In the mixed letter/digit body of a variable identifier.
    IdBody,
    /// In the trailing digit run of a variable identifier.
    IdDigitTail,
}

/// What the DFA wants the scanner to do after consuming one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep scanning in the given state.
    Shift(State),
    /// A token is complete. `retract` bytes (0..=2) at the end of the scan
    /// belong to the next token and are returned to the buffer.
    Emit { kind: TokenKind, retract: usize },
    /// The scan cannot continue. `code` selects the expected-suffix hint;
    /// `None` means a lone character with no outgoing edge from `Start`.
    Invalid { code: Option<LexCode> },
}

const fn emit(kind: TokenKind) -> Step {
    Step::Emit { kind, retract: 0 }
}

const fn emit_back(kind: TokenKind, retract: usize) -> Step {
    Step::Emit { kind, retract }
}

const fn invalid(code: LexCode) -> Step {
    Step::Invalid { code: Some(code) }
}

/// The transition function. See the module docs for the driving protocol.
pub fn transition(state: State, ch: u8) -> Step {
    match state {
        State::Start => match ch {
            // Single-character tokens emit immediately.
            b';' => emit(TokenKind::Sem),
            b',' => emit(TokenKind::Comma),
            b'.' => emit(TokenKind::Dot),
            b'(' => emit(TokenKind::Op),
            b')' => emit(TokenKind::Cl),
            b'[' => emit(TokenKind::Sql),
            b']' => emit(TokenKind::Sqr),
            b'*' => emit(TokenKind::Mul),
            b'/' => emit(TokenKind::Div),
            b'+' => emit(TokenKind::Plus),
            b'-' => emit(TokenKind::Minus),
            b'~' => emit(TokenKind::Not),
            b':' => emit(TokenKind::Colon),

            // Multi-character tokens move through intermediate states.
            b'@' => Step::Shift(State::At1),
            b'!' => Step::Shift(State::Bang),
            b'&' => Step::Shift(State::Amp1),
            b'=' => Step::Shift(State::Eq1),
            b'<' => Step::Shift(State::Lt1),
            b'>' => Step::Shift(State::Gt1),
            b'_' => Step::Shift(State::Underscore),
            b'#' => Step::Shift(State::Hash),

            b'0'..=b'9' => Step::Shift(State::IntPart),

            // b/c/d may start a variable identifier with digit groups.
            b'b'..=b'd' => Step::Shift(State::BcdPrefix),
            c if c.is_ascii_alphabetic() => Step::Shift(State::LowerWord),

            b' ' | b'\t' => emit(TokenKind::Blank),
            b'\n' => emit(TokenKind::Newline),
            // Buffer exhaustion sentinel: signalled to the driver as a blank.
            0 => emit(TokenKind::Blank),

            _ => Step::Invalid { code: None },
        },

        // `@@@`
        State::At1 => match ch {
            b'@' => Step::Shift(State::At2),
            _ => invalid(LexCode::ExpectedOr),
        },
        State::At2 => match ch {
            b'@' => emit(TokenKind::Or),
            _ => invalid(LexCode::ExpectedOr),
        },

        // `!=`
        State::Bang => match ch {
            b'=' => emit(TokenKind::Ne),
            _ => invalid(LexCode::ExpectedNe),
        },

        // `&&&`
        State::Amp1 => match ch {
            b'&' => Step::Shift(State::Amp2),
            _ => invalid(LexCode::ExpectedAnd),
        },
        State::Amp2 => match ch {
            b'&' => emit(TokenKind::And),
            _ => invalid(LexCode::ExpectedAnd),
        },

        // `==`
        State::Eq1 => match ch {
            b'=' => emit(TokenKind::Eq),
            _ => invalid(LexCode::ExpectedEq),
        },

        // `<`, `<=`, `<---`
        State::Lt1 => match ch {
            b'-' => Step::Shift(State::LtDash1),
            b'=' => emit(TokenKind::Le),
            _ => emit_back(TokenKind::Lt, 1),
        },
        State::LtDash1 => match ch {
            b'-' => Step::Shift(State::LtDash2),
            _ => emit_back(TokenKind::Lt, 2),
        },
        State::LtDash2 => match ch {
            b'-' => emit(TokenKind::AssignOp),
            _ => invalid(LexCode::ExpectedAssign),
        },

        // `>`, `>=`
        State::Gt1 => match ch {
            b'=' => emit(TokenKind::Ge),
            _ => emit_back(TokenKind::Gt, 1),
        },

        // `_[a-zA-Z]+[0-9]*`
        State::Underscore => match ch {
            c if c.is_ascii_alphabetic() => Step::Shift(State::FunAlpha),
            _ => invalid(LexCode::FunIdStart),
        },
        State::FunAlpha => match ch {
            c if c.is_ascii_alphabetic() => Step::Shift(State::FunAlpha),
            b'0'..=b'9' => Step::Shift(State::FunDigit),
            _ => emit_back(TokenKind::FunId, 1),
        },
        State::FunDigit => match ch {
            b'0'..=b'9' => Step::Shift(State::FunDigit),
            _ => emit_back(TokenKind::FunId, 1),
        },

        // `#[a-z]+`
        State::Hash => match ch {
            b'a'..=b'z' => Step::Shift(State::RuidBody),
            _ => invalid(LexCode::RuIdStart),
        },
        State::RuidBody => match ch {
            b'a'..=b'z' => Step::Shift(State::RuidBody),
            _ => emit_back(TokenKind::RuId, 1),
        },

        // Integer and real literals. The fraction must be exactly two
        // digits; the exponent, when present, exactly two as well.
        State::IntPart => match ch {
            b'0'..=b'9' => Step::Shift(State::IntPart),
            b'.' => Step::Shift(State::FracDot),
            _ => emit_back(TokenKind::Num, 1),
        },
        State::FracDot => match ch {
            b'0'..=b'9' => Step::Shift(State::Frac1),
            // `12.x`: the dot was not a fraction after all.
            _ => emit_back(TokenKind::Num, 2),
        },
        State::Frac1 => match ch {
            b'0'..=b'9' => Step::Shift(State::Frac2),
            _ => invalid(LexCode::FractionDigits),
        },
        State::Frac2 => match ch {
            b'E' => Step::Shift(State::Exp),
            _ => emit_back(TokenKind::RNum, 1),
        },
        State::Exp => match ch {
            b'+' | b'-' => Step::Shift(State::ExpSign),
            b'0'..=b'9' => Step::Shift(State::ExpDigit),
            _ => invalid(LexCode::ExponentStart),
        },
        State::ExpSign => match ch {
            b'0'..=b'9' => Step::Shift(State::ExpDigit),
            _ => invalid(LexCode::ExponentDigit),
        },
        State::ExpDigit => match ch {
            b'0'..=b'9' => emit(TokenKind::RNum),
            _ => invalid(LexCode::ExponentWidth),
        },

        // `[a-zA-Z][a-z]*` field identifier / keyword.
        State::LowerWord => match ch {
            b'a'..=b'z' => Step::Shift(State::LowerWord),
            _ => emit_back(TokenKind::FieldId, 1),
        },

        // Variable identifiers: `[b-d]` then `[2-7]`, with `[b-d]+[2-7]+`
        // groups interleaved. A b/c/d run that never sees a digit falls
        // back to the field-identifier path.
        State::BcdPrefix => match ch {
            b'a'..=b'z' => Step::Shift(State::LowerWord),
            b'2'..=b'7' => Step::Shift(State::IdBody),
            _ => emit_back(TokenKind::FieldId, 1),
        },
        State::IdBody => match ch {
            b'2'..=b'7' => Step::Shift(State::IdDigitTail),
            b'b'..=b'd' => Step::Shift(State::IdBody),
            _ => emit_back(TokenKind::Id, 1),
        },
        State::IdDigitTail => match ch {
            b'2'..=b'7' => Step::Shift(State::IdDigitTail),
            _ => emit_back(TokenKind::Id, 1),
        },
    }
}
