use serde::Serialize;

/// A token produced by the Rill scanner.
///
/// A token owns its lexeme: the lexeme string is a byte-for-byte copy of the
/// source slice that produced it. On a successful parse the lexeme moves into
/// the matching parse-tree leaf; on error paths it is dropped with the token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// 1-based source line on which the lexeme began.
    pub line: u32,
}

impl Token {
    /// Create a new token from a kind, lexeme text, and source line.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

/// Every kind of token in the Rill language.
///
/// This enum is the complete terminal vocabulary: punctuation, arithmetic and
/// boolean operators, the 27 reserved words, the identifier classes, number
/// literals, and the stream sentinels. Variant order is significant: the
/// discriminant doubles as the parse-table column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// `<---`
    AssignOp,
    /// `%` to end of line. Emitted on the inspection path, elided for the parser.
    Comment,
    /// Field identifier `[a-zA-Z][a-z]*` that is not a reserved word.
    FieldId,
    /// Variable identifier: `b`/`c`/`d` followed by `[2-7]` runs, at most 20 bytes.
    Id,
    /// Integer literal `[0-9]+`.
    Num,
    /// Real literal `[0-9]+.[0-9]{2}` with optional `E[+-]?[0-9]{2}` exponent.
    RNum,
    /// Function identifier `_[a-zA-Z]+[0-9]*`, at most 30 bytes.
    FunId,
    /// Record/union identifier `#[a-z]+`.
    RuId,

    // ── Reserved words ─────────────────────────────────────────────────
    With,
    Parameters,
    End,
    While,
    Union,
    EndUnion,
    DefineType,
    As,
    Type,
    /// The function identifier `_main`, elevated from `FunId` after scanning.
    Main,
    Global,
    Parameter,
    List,

    // ── Punctuation ────────────────────────────────────────────────────
    /// `[`
    Sql,
    /// `]`
    Sqr,

    Input,
    Output,
    Int,
    Real,

    /// `,`
    Comma,
    /// `;`
    Sem,
    /// `:`
    Colon,
    /// `.`
    Dot,

    EndWhile,

    /// `(`
    Op,
    /// `)`
    Cl,

    If,
    Then,
    EndIf,
    Read,
    Write,
    Return,

    // ── Operators ──────────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,

    Call,
    Record,
    EndRecord,
    Else,

    /// `&&&`
    And,
    /// `@@@`
    Or,
    /// `~`
    Not,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `!=`
    Ne,

    // ── Stream sentinels ───────────────────────────────────────────────
    /// Space, tab, or the buffer exhaustion byte. Never reaches the parser.
    Blank,
    /// `\n`. Increments the line counter; never reaches the parser.
    Newline,
    /// Marks an empty expansion in the parse tree.
    Epsilon,
    /// End-of-stream marker. The parser sees exactly one per source.
    Dollar,
}

impl TokenKind {
    /// Number of token kinds; the parse table has this many columns.
    pub const COUNT: usize = 61;

    /// Column index of this kind in the parse table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The user-visible spelling used in the token stream, diagnostics,
    /// and the parse-tree listing.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::AssignOp => "TK_ASSIGNOP",
            TokenKind::Comment => "TK_COMMENT",
            TokenKind::FieldId => "TK_FIELDID",
            TokenKind::Id => "TK_ID",
            TokenKind::Num => "TK_NUM",
            TokenKind::RNum => "TK_RNUM",
            TokenKind::FunId => "TK_FUNID",
            TokenKind::RuId => "TK_RUID",
            TokenKind::With => "TK_WITH",
            TokenKind::Parameters => "TK_PARAMETERS",
            TokenKind::End => "TK_END",
            TokenKind::While => "TK_WHILE",
            TokenKind::Union => "TK_UNION",
            TokenKind::EndUnion => "TK_ENDUNION",
            TokenKind::DefineType => "TK_DEFINETYPE",
            TokenKind::As => "TK_AS",
            TokenKind::Type => "TK_TYPE",
            TokenKind::Main => "TK_MAIN",
            TokenKind::Global => "TK_GLOBAL",
            TokenKind::Parameter => "TK_PARAMETER",
            TokenKind::List => "TK_LIST",
            TokenKind::Sql => "TK_SQL",
            TokenKind::Sqr => "TK_SQR",
            TokenKind::Input => "TK_INPUT",
            TokenKind::Output => "TK_OUTPUT",
            TokenKind::Int => "TK_INT",
            TokenKind::Real => "TK_REAL",
            TokenKind::Comma => "TK_COMMA",
            TokenKind::Sem => "TK_SEM",
            TokenKind::Colon => "TK_COLON",
            TokenKind::Dot => "TK_DOT",
            TokenKind::EndWhile => "TK_ENDWHILE",
            TokenKind::Op => "TK_OP",
            TokenKind::Cl => "TK_CL",
            TokenKind::If => "TK_IF",
            TokenKind::Then => "TK_THEN",
            TokenKind::EndIf => "TK_ENDIF",
            TokenKind::Read => "TK_READ",
            TokenKind::Write => "TK_WRITE",
            TokenKind::Return => "TK_RETURN",
            TokenKind::Plus => "TK_PLUS",
            TokenKind::Minus => "TK_MINUS",
            TokenKind::Mul => "TK_MUL",
            TokenKind::Div => "TK_DIV",
            TokenKind::Call => "TK_CALL",
            TokenKind::Record => "TK_RECORD",
            TokenKind::EndRecord => "TK_ENDRECORD",
            TokenKind::Else => "TK_ELSE",
            TokenKind::And => "TK_AND",
            TokenKind::Or => "TK_OR",
            TokenKind::Not => "TK_NOT",
            TokenKind::Lt => "TK_LT",
            TokenKind::Le => "TK_LE",
            TokenKind::Eq => "TK_EQ",
            TokenKind::Gt => "TK_GT",
            TokenKind::Ge => "TK_GE",
            TokenKind::Ne => "TK_NE",
            TokenKind::Blank => "BLANK",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Epsilon => "EPSILON",
            TokenKind::Dollar => "DOLLAR",
        }
    }
}
