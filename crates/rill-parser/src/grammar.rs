//! Grammar model and the embedded Rill grammar payload.
//!
//! The parser consumes the grammar as data: per non-terminal, an ordered
//! list of productions. Insertion order is significant -- it defines the
//! rule indices recorded in FIRST bookkeeping and written into the parse
//! table. An epsilon production has an empty right-hand side and is always
//! stored last for its non-terminal.

use rill_common::token::TokenKind;

/// Maximum number of symbols on the right-hand side of any production.
/// Also bounds the arity of every interior parse-tree node.
pub const MAX_RHS_LEN: usize = 15;

/// One symbol in a production: a terminal token or a non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Terminal(TokenKind),
    NonTerminal(NonTerminal),
}

impl Symbol {
    /// Display name: `TK_*` for terminals, `<angleBracketed>` for
    /// non-terminals.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Terminal(t) => t.name(),
            Symbol::NonTerminal(nt) => nt.name(),
        }
    }
}

/// The 53 non-terminals of the Rill grammar, in declaration order.
/// The discriminant doubles as the parse-table row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    Program,
    MainFunction,
    OtherFunctions,
    Function,
    InputPar,
    OutputPar,
    ParameterList,
    DataType,
    PrimitiveDataType,
    ConstructedDataType,
    RemainingList,
    Stmts,
    TypeDefinitions,
    ActualOrRedefined,
    TypeDefinition,
    FieldDefinitions,
    FieldDefinition,
    FieldType,
    MoreFields,
    Declarations,
    Declaration,
    GlobalOrNot,
    OtherStmts,
    Stmt,
    AssignmentStmt,
    SingleOrRecId,
    OptionSingleConstructed,
    OneExpansion,
    MoreExpansions,
    FunCallStmt,
    OutputParameters,
    InputParameters,
    IterativeStmt,
    ConditionalStmt,
    ElsePart,
    IoStmt,
    ArithmeticExpression,
    ExpPrime,
    Term,
    TermPrime,
    Factor,
    HighPrecedenceOperators,
    LowPrecedenceOperators,
    BooleanExpression,
    Var,
    LogicalOp,
    RelationalOp,
    ReturnStmt,
    OptionalReturn,
    IdList,
    MoreIds,
    DefineTypeStmt,
    A,
}

impl NonTerminal {
    /// Number of non-terminals; the parse table has this many rows.
    pub const COUNT: usize = 53;

    /// All non-terminals in declaration order.
    pub const ALL: [NonTerminal; Self::COUNT] = [
        NonTerminal::Program,
        NonTerminal::MainFunction,
        NonTerminal::OtherFunctions,
        NonTerminal::Function,
        NonTerminal::InputPar,
        NonTerminal::OutputPar,
        NonTerminal::ParameterList,
        NonTerminal::DataType,
        NonTerminal::PrimitiveDataType,
        NonTerminal::ConstructedDataType,
        NonTerminal::RemainingList,
        NonTerminal::Stmts,
        NonTerminal::TypeDefinitions,
        NonTerminal::ActualOrRedefined,
        NonTerminal::TypeDefinition,
        NonTerminal::FieldDefinitions,
        NonTerminal::FieldDefinition,
        NonTerminal::FieldType,
        NonTerminal::MoreFields,
        NonTerminal::Declarations,
        NonTerminal::Declaration,
        NonTerminal::GlobalOrNot,
        NonTerminal::OtherStmts,
        NonTerminal::Stmt,
        NonTerminal::AssignmentStmt,
        NonTerminal::SingleOrRecId,
        NonTerminal::OptionSingleConstructed,
        NonTerminal::OneExpansion,
        NonTerminal::MoreExpansions,
        NonTerminal::FunCallStmt,
        NonTerminal::OutputParameters,
        NonTerminal::InputParameters,
        NonTerminal::IterativeStmt,
        NonTerminal::ConditionalStmt,
        NonTerminal::ElsePart,
        NonTerminal::IoStmt,
        NonTerminal::ArithmeticExpression,
        NonTerminal::ExpPrime,
        NonTerminal::Term,
        NonTerminal::TermPrime,
        NonTerminal::Factor,
        NonTerminal::HighPrecedenceOperators,
        NonTerminal::LowPrecedenceOperators,
        NonTerminal::BooleanExpression,
        NonTerminal::Var,
        NonTerminal::LogicalOp,
        NonTerminal::RelationalOp,
        NonTerminal::ReturnStmt,
        NonTerminal::OptionalReturn,
        NonTerminal::IdList,
        NonTerminal::MoreIds,
        NonTerminal::DefineTypeStmt,
        NonTerminal::A,
    ];

    /// Row index of this non-terminal in the parse table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name used in diagnostics and the parse-tree listing.
    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Program => "<program>",
            NonTerminal::MainFunction => "<mainFunction>",
            NonTerminal::OtherFunctions => "<otherFunctions>",
            NonTerminal::Function => "<function>",
            NonTerminal::InputPar => "<input_par>",
            NonTerminal::OutputPar => "<output_par>",
            NonTerminal::ParameterList => "<parameter_list>",
            NonTerminal::DataType => "<dataType>",
            NonTerminal::PrimitiveDataType => "<primitiveDatatype>",
            NonTerminal::ConstructedDataType => "<constructedDatatype>",
            NonTerminal::RemainingList => "<remaining_list>",
            NonTerminal::Stmts => "<stmts>",
            NonTerminal::TypeDefinitions => "<typeDefinitions>",
            NonTerminal::ActualOrRedefined => "<actualOrRedefined>",
            NonTerminal::TypeDefinition => "<typeDefinition>",
            NonTerminal::FieldDefinitions => "<fieldDefinitions>",
            NonTerminal::FieldDefinition => "<fieldDefinition>",
            NonTerminal::FieldType => "<fieldType>",
            NonTerminal::MoreFields => "<moreFields>",
            NonTerminal::Declarations => "<declarations>",
            NonTerminal::Declaration => "<declaration>",
            NonTerminal::GlobalOrNot => "<global_or_not>",
            NonTerminal::OtherStmts => "<otherStmts>",
            NonTerminal::Stmt => "<stmt>",
            NonTerminal::AssignmentStmt => "<assignmentStmt>",
            NonTerminal::SingleOrRecId => "<singleOrRecId>",
            NonTerminal::OptionSingleConstructed => "<option_single_constructed>",
            NonTerminal::OneExpansion => "<oneExpansion>",
            NonTerminal::MoreExpansions => "<moreExpansions>",
            NonTerminal::FunCallStmt => "<funCallStmt>",
            NonTerminal::OutputParameters => "<outputParameters>",
            NonTerminal::InputParameters => "<inputParameters>",
            NonTerminal::IterativeStmt => "<iterativeStmt>",
            NonTerminal::ConditionalStmt => "<conditionalStmt>",
            NonTerminal::ElsePart => "<elsePart>",
            NonTerminal::IoStmt => "<ioStmt>",
            NonTerminal::ArithmeticExpression => "<arithmeticExpression>",
            NonTerminal::ExpPrime => "<expPrime>",
            NonTerminal::Term => "<term>",
            NonTerminal::TermPrime => "<termPrime>",
            NonTerminal::Factor => "<factor>",
            NonTerminal::HighPrecedenceOperators => "<highPrecedenceOperators>",
            NonTerminal::LowPrecedenceOperators => "<lowPrecedenceOperators>",
            NonTerminal::BooleanExpression => "<booleanExpression>",
            NonTerminal::Var => "<var>",
            NonTerminal::LogicalOp => "<logicalOp>",
            NonTerminal::RelationalOp => "<relationalOp>",
            NonTerminal::ReturnStmt => "<returnStmt>",
            NonTerminal::OptionalReturn => "<optionalReturn>",
            NonTerminal::IdList => "<idList>",
            NonTerminal::MoreIds => "<more_ids>",
            NonTerminal::DefineTypeStmt => "<definetypestmt>",
            NonTerminal::A => "<a>",
        }
    }
}

/// One production rule. An empty right-hand side denotes epsilon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// The grammar: per non-terminal, an ordered list of productions.
#[derive(Debug)]
pub struct Grammar {
    prods: Vec<Vec<Production>>,
}

impl Grammar {
    fn new() -> Self {
        Self {
            prods: vec![Vec::new(); NonTerminal::COUNT],
        }
    }

    /// Append a production for `lhs`. Must not follow an epsilon rule.
    fn add(&mut self, lhs: NonTerminal, rhs: Vec<Symbol>) {
        debug_assert!(!rhs.is_empty(), "use add_epsilon for epsilon rules");
        debug_assert!(rhs.len() <= MAX_RHS_LEN);
        debug_assert!(
            !self.has_epsilon(lhs),
            "epsilon must stay the last production of {:?}",
            lhs
        );
        self.prods[lhs.index()].push(Production { rhs });
    }

    /// Append the epsilon production for `lhs` (always stored last).
    fn add_epsilon(&mut self, lhs: NonTerminal) {
        debug_assert!(!self.has_epsilon(lhs), "duplicate epsilon rule for {:?}", lhs);
        self.prods[lhs.index()].push(Production { rhs: Vec::new() });
    }

    /// Productions of `nt`, in rule-index order.
    pub fn productions(&self, nt: NonTerminal) -> &[Production] {
        &self.prods[nt.index()]
    }

    /// Whether `nt` derives epsilon directly.
    pub fn has_epsilon(&self, nt: NonTerminal) -> bool {
        self.prods[nt.index()]
            .last()
            .is_some_and(Production::is_epsilon)
    }

    /// The start symbol.
    pub fn start() -> NonTerminal {
        NonTerminal::Program
    }

    /// The Rill grammar payload: 53 non-terminals, 95 productions.
    pub fn language() -> Grammar {
        use crate::grammar::NonTerminal::*;
        use rill_common::token::TokenKind as Tk;

        fn t(kind: TokenKind) -> Symbol {
            Symbol::Terminal(kind)
        }
        fn n(nt: NonTerminal) -> Symbol {
            Symbol::NonTerminal(nt)
        }

        let mut g = Grammar::new();

        g.add(Program, vec![n(OtherFunctions), n(MainFunction)]);

        g.add(MainFunction, vec![t(Tk::Main), n(Stmts), t(Tk::End)]);

        g.add(OtherFunctions, vec![n(Function), n(OtherFunctions)]);
        g.add_epsilon(OtherFunctions);

        g.add(
            Function,
            vec![
                t(Tk::FunId),
                n(InputPar),
                n(OutputPar),
                t(Tk::Sem),
                n(Stmts),
                t(Tk::End),
            ],
        );

        g.add(
            InputPar,
            vec![
                t(Tk::Input),
                t(Tk::Parameter),
                t(Tk::List),
                t(Tk::Sql),
                n(ParameterList),
                t(Tk::Sqr),
            ],
        );

        g.add(
            OutputPar,
            vec![
                t(Tk::Output),
                t(Tk::Parameter),
                t(Tk::List),
                t(Tk::Sql),
                n(ParameterList),
                t(Tk::Sqr),
            ],
        );
        g.add_epsilon(OutputPar);

        g.add(ParameterList, vec![n(DataType), t(Tk::Id), n(RemainingList)]);

        g.add(DataType, vec![n(PrimitiveDataType)]);
        g.add(DataType, vec![n(ConstructedDataType)]);

        g.add(PrimitiveDataType, vec![t(Tk::Int)]);
        g.add(PrimitiveDataType, vec![t(Tk::Real)]);

        g.add(ConstructedDataType, vec![t(Tk::Record), t(Tk::RuId)]);
        g.add(ConstructedDataType, vec![t(Tk::Union), t(Tk::RuId)]);
        g.add(ConstructedDataType, vec![t(Tk::RuId)]);

        g.add(RemainingList, vec![t(Tk::Comma), n(ParameterList)]);
        g.add_epsilon(RemainingList);

        g.add(
            Stmts,
            vec![
                n(TypeDefinitions),
                n(Declarations),
                n(OtherStmts),
                n(ReturnStmt),
            ],
        );

        g.add(TypeDefinitions, vec![n(ActualOrRedefined), n(TypeDefinitions)]);
        g.add_epsilon(TypeDefinitions);

        g.add(ActualOrRedefined, vec![n(TypeDefinition)]);
        g.add(ActualOrRedefined, vec![n(DefineTypeStmt)]);

        g.add(
            TypeDefinition,
            vec![
                t(Tk::Record),
                t(Tk::RuId),
                n(FieldDefinitions),
                t(Tk::EndRecord),
            ],
        );
        g.add(
            TypeDefinition,
            vec![
                t(Tk::Union),
                t(Tk::RuId),
                n(FieldDefinitions),
                t(Tk::EndUnion),
            ],
        );

        g.add(
            FieldDefinitions,
            vec![n(FieldDefinition), n(FieldDefinition), n(MoreFields)],
        );

        g.add(
            FieldDefinition,
            vec![
                t(Tk::Type),
                n(FieldType),
                t(Tk::Colon),
                t(Tk::FieldId),
                t(Tk::Sem),
            ],
        );

        g.add(FieldType, vec![n(PrimitiveDataType)]);
        g.add(FieldType, vec![n(ConstructedDataType)]);

        g.add(MoreFields, vec![n(FieldDefinition), n(MoreFields)]);
        g.add_epsilon(MoreFields);

        g.add(Declarations, vec![n(Declaration), n(Declarations)]);
        g.add_epsilon(Declarations);

        g.add(
            Declaration,
            vec![
                t(Tk::Type),
                n(DataType),
                t(Tk::Colon),
                t(Tk::Id),
                n(GlobalOrNot),
                t(Tk::Sem),
            ],
        );

        g.add(GlobalOrNot, vec![t(Tk::Colon), t(Tk::Global)]);
        g.add_epsilon(GlobalOrNot);

        g.add(OtherStmts, vec![n(Stmt), n(OtherStmts)]);
        g.add_epsilon(OtherStmts);

        g.add(Stmt, vec![n(AssignmentStmt)]);
        g.add(Stmt, vec![n(IterativeStmt)]);
        g.add(Stmt, vec![n(ConditionalStmt)]);
        g.add(Stmt, vec![n(IoStmt)]);
        g.add(Stmt, vec![n(FunCallStmt)]);

        g.add(
            AssignmentStmt,
            vec![
                n(SingleOrRecId),
                t(Tk::AssignOp),
                n(ArithmeticExpression),
                t(Tk::Sem),
            ],
        );

        g.add(SingleOrRecId, vec![t(Tk::Id), n(OptionSingleConstructed)]);

        g.add(
            OptionSingleConstructed,
            vec![n(OneExpansion), n(MoreExpansions)],
        );
        g.add_epsilon(OptionSingleConstructed);

        g.add(OneExpansion, vec![t(Tk::Dot), t(Tk::FieldId)]);

        g.add(MoreExpansions, vec![n(OneExpansion), n(MoreExpansions)]);
        g.add_epsilon(MoreExpansions);

        g.add(
            FunCallStmt,
            vec![
                n(OutputParameters),
                t(Tk::Call),
                t(Tk::FunId),
                t(Tk::With),
                t(Tk::Parameters),
                n(InputParameters),
                t(Tk::Sem),
            ],
        );

        g.add(
            OutputParameters,
            vec![t(Tk::Sql), n(IdList), t(Tk::Sqr), t(Tk::AssignOp)],
        );
        g.add_epsilon(OutputParameters);

        g.add(InputParameters, vec![t(Tk::Sql), n(IdList), t(Tk::Sqr)]);

        g.add(
            IterativeStmt,
            vec![
                t(Tk::While),
                t(Tk::Op),
                n(BooleanExpression),
                t(Tk::Cl),
                n(Stmt),
                n(OtherStmts),
                t(Tk::EndWhile),
            ],
        );

        g.add(
            ConditionalStmt,
            vec![
                t(Tk::If),
                t(Tk::Op),
                n(BooleanExpression),
                t(Tk::Cl),
                t(Tk::Then),
                n(Stmt),
                n(OtherStmts),
                n(ElsePart),
            ],
        );

        g.add(
            ElsePart,
            vec![t(Tk::Else), n(Stmt), n(OtherStmts), t(Tk::EndIf)],
        );
        g.add(ElsePart, vec![t(Tk::EndIf)]);

        g.add(
            IoStmt,
            vec![t(Tk::Read), t(Tk::Op), n(Var), t(Tk::Cl), t(Tk::Sem)],
        );
        g.add(
            IoStmt,
            vec![t(Tk::Write), t(Tk::Op), n(Var), t(Tk::Cl), t(Tk::Sem)],
        );

        g.add(ArithmeticExpression, vec![n(Term), n(ExpPrime)]);

        g.add(
            ExpPrime,
            vec![n(LowPrecedenceOperators), n(Term), n(ExpPrime)],
        );
        g.add_epsilon(ExpPrime);

        g.add(Term, vec![n(Factor), n(TermPrime)]);

        g.add(
            TermPrime,
            vec![n(HighPrecedenceOperators), n(Factor), n(TermPrime)],
        );
        g.add_epsilon(TermPrime);

        g.add(Factor, vec![t(Tk::Op), n(ArithmeticExpression), t(Tk::Cl)]);
        g.add(Factor, vec![n(Var)]);

        g.add(HighPrecedenceOperators, vec![t(Tk::Mul)]);
        g.add(HighPrecedenceOperators, vec![t(Tk::Div)]);

        g.add(LowPrecedenceOperators, vec![t(Tk::Plus)]);
        g.add(LowPrecedenceOperators, vec![t(Tk::Minus)]);

        g.add(
            BooleanExpression,
            vec![
                t(Tk::Op),
                n(BooleanExpression),
                t(Tk::Cl),
                n(LogicalOp),
                t(Tk::Op),
                n(BooleanExpression),
                t(Tk::Cl),
            ],
        );
        g.add(BooleanExpression, vec![n(Var), n(RelationalOp), n(Var)]);
        g.add(
            BooleanExpression,
            vec![t(Tk::Not), t(Tk::Op), n(BooleanExpression), t(Tk::Cl)],
        );

        g.add(Var, vec![n(SingleOrRecId)]);
        g.add(Var, vec![t(Tk::Num)]);
        g.add(Var, vec![t(Tk::RNum)]);

        g.add(LogicalOp, vec![t(Tk::And)]);
        g.add(LogicalOp, vec![t(Tk::Or)]);

        g.add(RelationalOp, vec![t(Tk::Lt)]);
        g.add(RelationalOp, vec![t(Tk::Le)]);
        g.add(RelationalOp, vec![t(Tk::Eq)]);
        g.add(RelationalOp, vec![t(Tk::Gt)]);
        g.add(RelationalOp, vec![t(Tk::Ge)]);
        g.add(RelationalOp, vec![t(Tk::Ne)]);

        g.add(ReturnStmt, vec![t(Tk::Return), n(OptionalReturn), t(Tk::Sem)]);

        g.add(OptionalReturn, vec![t(Tk::Sql), n(IdList), t(Tk::Sqr)]);
        g.add_epsilon(OptionalReturn);

        g.add(IdList, vec![t(Tk::Id), n(MoreIds)]);

        g.add(MoreIds, vec![t(Tk::Comma), n(IdList)]);
        g.add_epsilon(MoreIds);

        g.add(
            DefineTypeStmt,
            vec![t(Tk::DefineType), n(A), t(Tk::RuId), t(Tk::As), t(Tk::RuId)],
        );

        g.add(A, vec![t(Tk::Record)]);
        g.add(A, vec![t(Tk::Union)]);

        g
    }
}
