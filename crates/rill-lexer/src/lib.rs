// Rill lexer -- streaming tokenizer over a twin input buffer.

pub mod dfa;
pub mod twin_buffer;

use std::io::{self, Read};

use rill_common::diag::{Diagnostic, Diagnostics};
use rill_common::token::{Token, TokenKind};
use rill_common::trie::KeywordTable;

use dfa::{transition, State, Step};
use twin_buffer::{TwinBuffer, WINDOW};

/// Maximum byte length of a variable identifier lexeme.
pub const MAX_ID_LEN: usize = 20;
/// Maximum byte length of a function identifier lexeme.
pub const MAX_FUNID_LEN: usize = 30;

/// The Rill scanner. Streams a byte source through the twin buffer and the
/// DFA, producing tokens on demand.
///
/// Two consumption paths are offered:
/// - [`Scanner::next_token`] for the parser: comments are elided and the
///   stream is terminated by a single `Dollar` token;
/// - [`Scanner::next_lexeme`] for inspection: comments are included and the
///   stream ends with `None`.
///
/// Lexical errors never abort scanning; they are recorded in the
/// [`Diagnostics`] sink passed to each call and the offending span is
/// skipped.
pub struct Scanner<'kw, R> {
    buffer: TwinBuffer<R>,
    keywords: &'kw KeywordTable,
}

impl<'kw, R: Read> Scanner<'kw, R> {
    /// Create a scanner over a byte source. Bootstraps the twin buffer,
    /// so the first `2 * CHUNK` bytes are read eagerly.
    pub fn new(src: R, keywords: &'kw KeywordTable) -> io::Result<Self> {
        Ok(Self {
            buffer: TwinBuffer::new(src)?,
            keywords,
        })
    }

    /// Whether the scanner has reached the end of the source.
    pub fn at_end(&self) -> bool {
        self.buffer.at_end()
    }

    /// Current 1-based source line.
    pub fn line(&self) -> u32 {
        self.buffer.line()
    }

    /// Next token for the parser. Whitespace, comments, dropped-by-length
    /// identifiers, and invalid spans are all consumed silently (errors go
    /// to `diags`); at exhaustion a `Dollar` token is returned, and keeps
    /// being returned on subsequent calls.
    pub fn next_token(&mut self, diags: &mut Diagnostics) -> io::Result<Token> {
        loop {
            if self.buffer.at_end() {
                return Ok(Token::new(TokenKind::Dollar, "", self.buffer.line()));
            }
            let Some(tok) = self.scan_once(diags)? else {
                continue;
            };
            if tok.kind == TokenKind::Comment {
                continue;
            }
            if self.enforce_length(&tok, diags) {
                return Ok(tok);
            }
        }
    }

    /// Next token for stream inspection: identical to [`Self::next_token`]
    /// except that comments are included and exhaustion yields `None`.
    pub fn next_lexeme(&mut self, diags: &mut Diagnostics) -> io::Result<Option<Token>> {
        loop {
            if self.buffer.at_end() {
                return Ok(None);
            }
            let Some(tok) = self.scan_once(diags)? else {
                continue;
            };
            if tok.kind == TokenKind::Comment || self.enforce_length(&tok, diags) {
                return Ok(Some(tok));
            }
        }
    }

    /// Run the DFA once from the current buffer position.
    ///
    /// Returns `None` for whitespace, newlines, and invalid spans (which are
    /// reported and skipped); `Some` for every completed token, comments
    /// included.
    fn scan_once(&mut self, diags: &mut Diagnostics) -> io::Result<Option<Token>> {
        if self.buffer.current() == b'%' {
            return self.scan_comment().map(Some);
        }

        let head = self.buffer.pos();
        let mut tail = head;
        let mut step = transition(State::Start, self.buffer.byte_at(head));
        loop {
            match step {
                Step::Shift(next) => {
                    tail = (tail + 1) % WINDOW;
                    step = transition(next, self.buffer.byte_at(tail));
                }
                Step::Emit { kind, retract } => {
                    return self.finish_token(head, tail, kind, retract);
                }
                Step::Invalid { code } => {
                    self.report_invalid(head, tail, code, diags)?;
                    return Ok(None);
                }
            }
        }
    }

    /// Consume a `%` comment up to (and including) the line break.
    ///
    /// Only the leading `%` is kept as the token lexeme; the body is not
    /// preserved. The buffer sentinel is never stepped past.
    fn scan_comment(&mut self) -> io::Result<Token> {
        let line = self.buffer.line();
        while self.buffer.current() != b'\n' && self.buffer.current() != 0 {
            self.buffer.advance()?;
        }
        if self.buffer.current() == b'\n' {
            self.buffer.advance()?;
            self.buffer.bump_line();
        }
        Ok(Token::new(TokenKind::Comment, "%", line))
    }

    /// Complete an emission: extract the lexeme (minus retracted bytes),
    /// advance the read head past it, and resolve the final token kind.
    fn finish_token(
        &mut self,
        head: usize,
        tail: usize,
        kind: TokenKind,
        retract: usize,
    ) -> io::Result<Option<Token>> {
        match kind {
            TokenKind::Blank => {
                // The exhaustion sentinel also surfaces as a blank; leave
                // the head parked on it.
                if self.buffer.byte_at(head) == 0 {
                    return Ok(None);
                }
                self.buffer.set_pos(tail + 1)?;
                Ok(None)
            }
            TokenKind::Newline => {
                self.buffer.set_pos(tail + 1)?;
                self.buffer.bump_line();
                Ok(None)
            }
            _ => {
                let lex_end = (tail + WINDOW - retract) % WINDOW;
                let bytes = self.buffer.slice(head, lex_end);
                let line = self.buffer.line();
                self.buffer.set_pos(lex_end + 1)?;

                // The DFA only emits over ASCII bytes.
                let lexeme = String::from_utf8_lossy(&bytes).into_owned();
                let kind = match kind {
                    TokenKind::FieldId => self.keywords.lookup(&lexeme),
                    TokenKind::FunId if lexeme == "_main" => TokenKind::Main,
                    other => other,
                };
                Ok(Some(Token { kind, lexeme, line }))
            }
        }
    }

    /// Report an invalid scan and advance past the offending span.
    ///
    /// Single characters are reported individually and consumed; failed
    /// multi-character prefixes are reported as a span and the head is
    /// parked on the byte that broke the pattern, which is rescanned.
    fn report_invalid(
        &mut self,
        head: usize,
        tail: usize,
        code: Option<rill_common::diag::LexCode>,
        diags: &mut Diagnostics,
    ) -> io::Result<()> {
        let line = self.buffer.line();
        if head == tail {
            diags.push(Diagnostic::UnknownSymbol {
                line,
                symbol: self.buffer.byte_at(head) as char,
            });
            self.buffer.set_pos(tail + 1)?;
        } else {
            let mut pattern = String::new();
            let mut idx = head;
            while idx != tail {
                pattern.push(self.buffer.byte_at(idx) as char);
                idx = (idx + 1) % WINDOW;
            }
            diags.push(Diagnostic::UnknownPattern {
                line,
                pattern,
                code,
            });
            self.buffer.set_pos(tail)?;
        }
        Ok(())
    }

    /// Enforce identifier length limits. Returns `false` (dropping the
    /// token) on violation.
    fn enforce_length(&self, tok: &Token, diags: &mut Diagnostics) -> bool {
        match tok.kind {
            TokenKind::Id if tok.lexeme.len() > MAX_ID_LEN => {
                diags.push(Diagnostic::IdTooLong {
                    line: tok.line,
                    lexeme: tok.lexeme.clone(),
                });
                false
            }
            TokenKind::FunId if tok.lexeme.len() > MAX_FUNID_LEN => {
                diags.push(Diagnostic::FunIdTooLong {
                    line: tok.line,
                    lexeme: tok.lexeme.clone(),
                });
                false
            }
            _ => true,
        }
    }
}

/// Strip `%` comments from source text, preserving the line count.
///
/// Everything from each `%` up to the end of its line is removed; the line
/// break itself is kept, so a comment-only line becomes an empty line.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_comment = false;
    for ch in source.chars() {
        if in_comment {
            if ch == '\n' {
                out.push('\n');
                in_comment = false;
            }
        } else if ch == '%' {
            in_comment = true;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> (Vec<Token>, Diagnostics) {
        let keywords = KeywordTable::new();
        let mut scanner = Scanner::new(source.as_bytes(), &keywords).unwrap();
        let mut diags = Diagnostics::new();
        let mut tokens = Vec::new();
        loop {
            let tok = scanner.next_token(&mut diags).unwrap();
            let done = tok.kind == TokenKind::Dollar;
            tokens.push(tok);
            if done {
                break;
            }
        }
        (tokens, diags)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keyword_vs_identifier() {
        let (tokens, diags) = tokenize("int d2;");
        assert!(diags.is_empty());
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Int, TokenKind::Id, TokenKind::Sem, TokenKind::Dollar]
        );
        assert_eq!(tokens[0].lexeme, "int");
        assert_eq!(tokens[1].lexeme, "d2");
    }

    #[test]
    fn assignment_and_real_with_exponent() {
        let (tokens, diags) = tokenize("a <--- 3.14E+05");
        assert!(diags.is_empty());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::FieldId,
                TokenKind::AssignOp,
                TokenKind::RNum,
                TokenKind::Dollar
            ]
        );
        assert_eq!(tokens[0].lexeme, "a");
        assert_eq!(tokens[1].lexeme, "<---");
        assert_eq!(tokens[2].lexeme, "3.14E+05");
    }

    #[test]
    fn comments_are_elided_on_the_parser_path() {
        let (tokens, diags) = tokenize("% hello\nint a;");
        assert!(diags.is_empty());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Int,
                TokenKind::FieldId,
                TokenKind::Sem,
                TokenKind::Dollar
            ]
        );
        // Tokens after the comment carry the post-comment line number.
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn comments_appear_on_the_inspection_path() {
        let keywords = KeywordTable::new();
        let mut scanner = Scanner::new("% note\nint".as_bytes(), &keywords).unwrap();
        let mut diags = Diagnostics::new();
        let first = scanner.next_lexeme(&mut diags).unwrap().unwrap();
        assert_eq!(first.kind, TokenKind::Comment);
        assert_eq!(first.lexeme, "%");
        assert_eq!(first.line, 1);
        let second = scanner.next_lexeme(&mut diags).unwrap().unwrap();
        assert_eq!(second.kind, TokenKind::Int);
        assert!(scanner.next_lexeme(&mut diags).unwrap().is_none());
    }

    #[test]
    fn oversized_id_is_reported_and_dropped() {
        // 21 bytes: 'b' + twenty digits in [2-7].
        let long_id = format!("b{}", "2".repeat(20));
        let (tokens, diags) = tokenize(&format!("{long_id} ;"));
        assert_eq!(kinds(&tokens), vec![TokenKind::Sem, TokenKind::Dollar]);
        assert_eq!(diags.len(), 1);
        assert!(diags
            .iter()
            .next()
            .unwrap()
            .to_string()
            .contains("exceeds the maximum length of 20"));
    }

    #[test]
    fn id_of_exactly_twenty_bytes_is_kept() {
        let id = format!("b{}", "3".repeat(19));
        let (tokens, diags) = tokenize(&id);
        assert!(diags.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Id);
        assert_eq!(tokens[0].lexeme.len(), 20);
    }

    #[test]
    fn oversized_funid_is_reported_and_dropped() {
        let long_fun = format!("_{}", "f".repeat(30));
        let (tokens, diags) = tokenize(&long_fun);
        assert_eq!(kinds(&tokens), vec![TokenKind::Dollar]);
        assert_eq!(diags.len(), 1);
        assert!(diags
            .iter()
            .next()
            .unwrap()
            .to_string()
            .contains("exceeds the maximum length of 30"));
    }

    #[test]
    fn main_function_identifier_is_elevated() {
        let (tokens, _) = tokenize("_main _mainx _main2");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Main,
                TokenKind::FunId,
                TokenKind::FunId,
                TokenKind::Dollar
            ]
        );
    }

    #[test]
    fn mixed_class_identifier_paths() {
        let (tokens, _) = tokenize("b2 c4d7 bcd d234 b");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Id,
                TokenKind::Id,
                TokenKind::FieldId,
                TokenKind::Id,
                TokenKind::FieldId,
                TokenKind::Dollar
            ]
        );
        assert_eq!(tokens[1].lexeme, "c4d7");
        assert_eq!(tokens[2].lexeme, "bcd");
    }

    #[test]
    fn number_followed_by_dot_retracts() {
        let (tokens, diags) = tokenize("12.b2");
        assert!(diags.is_empty());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Num,
                TokenKind::Dot,
                TokenKind::Id,
                TokenKind::Dollar
            ]
        );
        assert_eq!(tokens[0].lexeme, "12");
    }

    #[test]
    fn unknown_symbol_is_skipped() {
        let (tokens, diags) = tokenize("a ? b2");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::FieldId, TokenKind::Id, TokenKind::Dollar]
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().to_string(),
            "Line 01: Lexical Error: Unknown symbol <?>"
        );
    }

    #[test]
    fn failed_operator_prefix_reports_span_and_rescans() {
        let (tokens, diags) = tokenize("@a");
        // The 'a' that broke the pattern is rescanned as its own token.
        assert_eq!(kinds(&tokens), vec![TokenKind::FieldId, TokenKind::Dollar]);
        assert_eq!(
            diags.iter().next().unwrap().to_string(),
            "Line 01: Lexical Error: Unknown pattern <@> : Expected @@@"
        );
    }

    #[test]
    fn assign_prefix_at_eof_reports_error_then_dollar() {
        let (tokens, diags) = tokenize("<--");
        assert_eq!(kinds(&tokens), vec![TokenKind::Dollar]);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().to_string(),
            "Line 01: Lexical Error: Unknown pattern <<--> : Expected <---"
        );
    }

    #[test]
    fn token_lines_are_monotonic() {
        let source = "int a;\nreal b;\n% gap\nwhile ( d2 == 4 )\nendwhile";
        let (tokens, _) = tokenize(source);
        let mut last = 0;
        for tok in &tokens {
            assert!(tok.line >= last, "line went backwards at {:?}", tok);
            last = tok.line;
        }
    }

    #[test]
    fn lexeme_straddling_the_buffer_midpoint_survives() {
        // Pad so a 9-byte identifier starts at byte 45 and crosses byte 50.
        let mut source = " ".repeat(45);
        source.push_str("b23456222");
        source.push(';');
        let (tokens, diags) = tokenize(&source);
        assert!(diags.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Id);
        assert_eq!(tokens[0].lexeme, "b23456222");
        assert_eq!(tokens[1].kind, TokenKind::Sem);
    }

    #[test]
    fn lexeme_straddling_the_window_end_survives() {
        // A token that wraps from the end of the window back to index 0.
        let mut source = " ".repeat(95);
        source.push_str("endwhile");
        source.push(' ');
        let (tokens, diags) = tokenize(&source);
        assert!(diags.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::EndWhile);
        assert_eq!(tokens[0].lexeme, "endwhile");
    }

    #[test]
    fn operators_scan_end_to_end() {
        let (tokens, diags) = tokenize("@@@ &&& != == <= < <--- >= > ~");
        assert!(diags.is_empty());
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Or,
                TokenKind::And,
                TokenKind::Ne,
                TokenKind::Eq,
                TokenKind::Le,
                TokenKind::Lt,
                TokenKind::AssignOp,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::Not,
                TokenKind::Dollar
            ]
        );
    }

    #[test]
    fn strip_comments_preserves_line_count() {
        assert_eq!(strip_comments("% hello\nint a;"), "\nint a;");
        assert_eq!(strip_comments("int a; % trailing\nb2"), "int a; \nb2");
        assert_eq!(strip_comments("no comments"), "no comments");
        let source = "a\n% one\n% two\nb";
        assert_eq!(
            strip_comments(source).matches('\n').count(),
            source.matches('\n').count()
        );
    }

    #[test]
    fn dollar_is_sticky_after_exhaustion() {
        let keywords = KeywordTable::new();
        let mut scanner = Scanner::new("a".as_bytes(), &keywords).unwrap();
        let mut diags = Diagnostics::new();
        assert_eq!(scanner.next_token(&mut diags).unwrap().kind, TokenKind::FieldId);
        assert_eq!(scanner.next_token(&mut diags).unwrap().kind, TokenKind::Dollar);
        assert_eq!(scanner.next_token(&mut diags).unwrap().kind, TokenKind::Dollar);
    }
}
