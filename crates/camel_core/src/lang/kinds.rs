//! Define the token and node kind vocabulary shared by the lexer, the merger, the parser and every tree consumer.
//!
//! [`SyntaxKind`] is a single `#[repr(u16)]` enumeration with **explicit, stable discriminants**. Downstream tools
//! persist kinds by number, so a kind's number never changes once published; new kinds take unused numbers and bump
//! [`KIND_VOCABULARY_VERSION`].
//!
//! ## Notes
//! - `0..400` are primitive tokens produced by the lexer.
//! - `400..500` are composite tokens assembled by the merger (a quote literal, a heredoc body, ...).
//! - `500..` are tree nodes produced by the parser.
//!
//! ## Examples
//! ```rust
//! use camel_core::lang::kinds::SyntaxKind;
//!
//! assert_eq!(SyntaxKind::from_raw(SyntaxKind::StringDq as u16), Some(SyntaxKind::StringDq));
//! assert!(SyntaxKind::StringDq.is_composite());
//! assert!(SyntaxKind::KwQq.is_token());
//! ```

/// Version of the kind table. Bump whenever kinds are added.
pub const KIND_VOCABULARY_VERSION: u32 = 1;

/// First discriminant of composite (merged) token kinds.
pub const COMPOSITE_START: u16 = 400;

/// First discriminant of node kinds.
pub const NODE_START: u16 = 500;

macro_rules! syntax_kinds {
    ($( $(#[$meta:meta])* $name:ident = $value:literal, )*) => {
        /// Stable identifier for every token, composite token and node kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $( $(#[$meta])* $name = $value, )*
        }

        impl SyntaxKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [SyntaxKind] = &[ $( SyntaxKind::$name, )* ];

            /// Resolve a raw discriminant back to its kind.
            pub const fn from_raw(raw: u16) -> Option<SyntaxKind> {
                match raw {
                    $( $value => Some(SyntaxKind::$name), )*
                    _ => None,
                }
            }

            /// Variant name, used in tree dumps.
            pub const fn name(self) -> &'static str {
                match self {
                    $( SyntaxKind::$name => stringify!($name), )*
                }
            }
        }
    };
}

syntax_kinds! {
    /// End of input. Never stored in a tree.
    Eof = 0,

    // ---- trivia -------------------------------------------------------------------------------------------------
    Whitespace = 1,
    CommentLine = 2,
    /// A whole POD block, from `=word` through the `=cut` line.
    Pod = 3,
    /// `#@deprecated`, `#@returns`, ...
    AnnotationKey = 4,
    AnnotationValue = 5,
    /// A character no rule matched.
    Unrecognized = 6,
    /// `__END__` / `__DATA__`.
    DataMarker = 7,
    DataContent = 8,

    // ---- punctuation --------------------------------------------------------------------------------------------
    LParen = 10,
    RParen = 11,
    LBracket = 12,
    RBracket = 13,
    LBrace = 14,
    RBrace = 15,
    /// `{` opening a hash subscript (`$h{key}`, `$r->{key}`).
    LBraceHash = 16,
    RBraceHash = 17,
    /// `[` opening an array subscript (`$a[0]`, `$r->[0]`).
    LBracketArray = 18,
    RBracketArray = 19,
    Semicolon = 20,
    Comma = 21,
    /// `=>`
    FatComma = 22,
    /// `->`
    Arrow = 23,
    Colon = 24,
    Question = 25,
    Backslash = 26,
    /// `@*`, `%*`, `$*`, `&*`, `$#*` after `->`.
    PostfixDeref = 27,
    /// `<STDIN>`, `<$fh>`, `<>`, `<<>>`.
    Readline = 28,

    // ---- operators ----------------------------------------------------------------------------------------------
    Assign = 30,
    PlusAssign = 31,
    MinusAssign = 32,
    StarAssign = 33,
    SlashAssign = 34,
    PercentAssign = 35,
    PowAssign = 36,
    ConcatAssign = 37,
    RepeatAssign = 38,
    AndAndAssign = 39,
    OrOrAssign = 40,
    DefinedOrAssign = 41,
    BitAndAssign = 42,
    BitOrAssign = 43,
    BitXorAssign = 44,
    ShiftLeftAssign = 45,
    ShiftRightAssign = 46,
    OrOr = 47,
    DefinedOr = 48,
    AndAnd = 49,
    BitOr = 50,
    BitXor = 51,
    BitAnd = 52,
    NumEq = 53,
    NumNe = 54,
    /// `<=>`
    NumCmp = 55,
    StrEq = 56,
    StrNe = 57,
    StrCmp = 58,
    /// `~~`
    SmartMatch = 59,
    NumLt = 60,
    NumGt = 61,
    NumLe = 62,
    NumGe = 63,
    StrLt = 64,
    StrGt = 65,
    StrLe = 66,
    StrGe = 67,
    Isa = 68,
    ShiftLeft = 69,
    ShiftRight = 70,
    Plus = 71,
    Minus = 72,
    /// `.`
    Concat = 73,
    Star = 74,
    Slash = 75,
    Percent = 76,
    /// `x`
    Repeat = 77,
    /// `=~`
    Match = 78,
    /// `!~`
    NotMatch = 79,
    Not = 80,
    Tilde = 81,
    Pow = 82,
    PlusPlus = 83,
    MinusMinus = 84,
    Range = 85,
    Ellipsis = 86,
    LowAnd = 87,
    LowOr = 88,
    LowXor = 89,
    LowNot = 90,
    /// `-e`, `-f`, `-d`, ...
    FileTest = 91,

    // ---- sigils and names ---------------------------------------------------------------------------------------
    ScalarSigil = 100,
    ArraySigil = 101,
    HashSigil = 102,
    GlobSigil = 103,
    CodeSigil = 104,
    /// `$#`
    ArrayIndexSigil = 105,
    VariableName = 106,

    Identifier = 115,
    PackageName = 116,
    SubName = 117,
    Number = 118,
    NumberHex = 119,
    NumberBin = 120,
    NumberOct = 121,
    NumberVersion = 122,
    /// `__FILE__`, `__LINE__`, `__PACKAGE__`, `__SUB__`.
    TagConstant = 123,
    /// `BEGIN`, `END`, `INIT`, `CHECK`, `UNITCHECK` before a block.
    SpecialBlockName = 124,

    // ---- keywords -----------------------------------------------------------------------------------------------
    KwMy = 130,
    KwOur = 131,
    KwLocal = 132,
    KwState = 133,
    KwSub = 134,
    KwPackage = 135,
    KwUse = 136,
    KwNo = 137,
    KwRequire = 138,
    KwIf = 139,
    KwElsif = 140,
    KwElse = 141,
    KwUnless = 142,
    KwWhile = 143,
    KwUntil = 144,
    KwFor = 145,
    KwForeach = 146,
    KwGiven = 147,
    KwWhen = 148,
    KwDefault = 149,
    KwDo = 150,
    KwEval = 151,
    KwReturn = 152,
    KwLast = 153,
    KwNext = 154,
    KwRedo = 155,
    KwGoto = 156,
    KwContinue = 157,
    KwPrint = 158,
    KwSay = 159,
    KwPrintf = 160,
    KwUndef = 161,
    KwDefined = 162,
    KwShift = 163,
    KwUnshift = 164,
    KwPush = 165,
    KwPop = 166,
    KwGrep = 167,
    KwMap = 168,
    KwSort = 169,
    KwScalar = 170,
    KwKeys = 171,
    KwValues = 172,
    KwEach = 173,
    KwDelete = 174,
    KwExists = 175,
    KwSplice = 176,
    KwBless = 177,
    KwWantarray = 178,
    KwRef = 179,
    KwDie = 180,
    KwWarn = 181,

    // dialect-gated keywords
    KwTry = 190,
    KwCatch = 191,
    KwFinally = 192,
    KwMethod = 193,
    KwFunc = 194,
    KwAsync = 195,
    KwAwait = 196,
    KwHas = 197,
    KwExtends = 198,
    KwWith = 199,
    KwBefore = 200,
    KwAfter = 201,
    KwAround = 202,
    KwOverride = 203,
    KwAugment = 204,
    KwSuper = 205,
    KwInner = 206,

    // quote-like operators
    KwQ = 230,
    KwQq = 231,
    KwQx = 232,
    KwQw = 233,
    KwQr = 234,
    KwM = 235,
    KwS = 236,
    KwTr = 237,
    KwY = 238,

    // ---- quote parts --------------------------------------------------------------------------------------------
    /// Opening delimiter after a quote keyword.
    QuoteOpen = 240,
    /// `'`
    QuoteSingleOpen = 241,
    /// `"`
    QuoteDoubleOpen = 242,
    /// backtick
    QuoteTickOpen = 243,
    /// `/` in term position.
    RegexQuoteOpen = 244,
    /// Shared delimiter between sections: the middle `/` of `s/a/b/`.
    QuoteMiddle = 245,
    QuoteClose = 246,
    RegexModifiers = 247,
    /// Non-interpolated content.
    StringContent = 248,
    /// Interpolated content.
    StringContentQq = 249,
    /// Command content.
    StringContentXq = 250,
    RegexContent = 251,

    // ---- string specials ----------------------------------------------------------------------------------------
    StringSpecialLf = 260,
    StringSpecialTab = 261,
    StringSpecialCr = 262,
    StringSpecialFormFeed = 263,
    StringSpecialBackspace = 264,
    StringSpecialAlarm = 265,
    StringSpecialEscape = 266,
    StringSpecialHex = 267,
    StringSpecialOct = 268,
    StringSpecialCharName = 269,
    StringSpecialControl = 270,
    StringSpecialUpper = 271,
    StringSpecialLower = 272,
    StringSpecialUpperFirst = 273,
    StringSpecialLowerFirst = 274,
    StringSpecialQuote = 275,
    StringSpecialFoldCase = 276,
    StringSpecialEnd = 277,
    /// Any other backslash escape: `\"`, `\\`, `\$`.
    StringEscapedChar = 278,

    // ---- heredocs -----------------------------------------------------------------------------------------------
    /// `<<` or `<<~`
    HeredocOpener = 280,
    /// `EOM`, `"EOM"`, `'EOM'`, backticked `EOM`.
    HeredocMarker = 281,
    /// The terminator line.
    HeredocEnd = 282,

    // ---- embedded template --------------------------------------------------------------------------------------
    /// `<?`
    TemplateCodeOpen = 290,
    /// `?>`
    TemplateCodeClose = 291,
    TemplateText = 292,

    // ---- composite tokens ---------------------------------------------------------------------------------------
    StringSq = 400,
    StringDq = 401,
    StringXq = 402,
    StringList = 403,
    RegexMatch = 404,
    RegexCompile = 405,
    RegexReplace = 406,
    Transliteration = 407,
    HeredocDeclaration = 408,
    Heredoc = 409,
    HeredocQq = 410,
    HeredocQx = 411,
    Annotation = 412,
    TemplateRegion = 413,
    DataSection = 414,

    // ---- nodes: structure ---------------------------------------------------------------------------------------
    File = 500,
    Statement = 501,
    UseStatement = 502,
    NoStatement = 503,
    PackageStatement = 504,
    SubDefinition = 505,
    MethodDefinition = 506,
    FuncDefinition = 507,
    Signature = 508,
    SubAttribute = 509,
    /// A `{ ... }` region whose statements are not parsed yet.
    LazyBlock = 510,
    Block = 511,
    IfStatement = 512,
    UnlessStatement = 513,
    ElsifClause = 514,
    ElseClause = 515,
    WhileStatement = 516,
    UntilStatement = 517,
    ForStatement = 518,
    ForeachStatement = 519,
    GivenStatement = 520,
    WhenStatement = 521,
    DefaultStatement = 522,
    ContinueClause = 523,
    TryCatch = 524,
    CatchClause = 525,
    FinallyClause = 526,
    SpecialBlock = 527,
    LabeledStatement = 528,
    StatementModifier = 529,
    Condition = 530,

    // ---- nodes: expressions -------------------------------------------------------------------------------------
    CommaExpr = 540,
    LowOrExpr = 541,
    LowAndExpr = 542,
    LowNotExpr = 543,
    AssignExpr = 544,
    TernaryExpr = 545,
    RangeExpr = 546,
    OrExpr = 547,
    AndExpr = 548,
    BitOrExpr = 549,
    BitAndExpr = 550,
    EqualityExpr = 551,
    RelationalExpr = 552,
    IsaExpr = 553,
    ShiftExpr = 554,
    AddExpr = 555,
    MulExpr = 556,
    MatchExpr = 557,
    UnaryExpr = 558,
    PowExpr = 559,
    PrefixIncDec = 560,
    SuffixIncDec = 561,
    RefExpr = 562,
    FileTestExpr = 563,
    ParenExpr = 564,
    AnonArray = 565,
    AnonHash = 566,
    AnonSub = 567,
    DoBlockExpr = 568,
    EvalExpr = 569,
    CallExpr = 570,
    CallArgs = 571,
    MethodCall = 572,
    DerefExpr = 573,
    ArrayIndex = 574,
    HashIndex = 575,
    NamedListExpr = 576,
    NamedUnaryExpr = 577,
    ReturnExpr = 578,
    LoopControl = 579,
    SortMapGrep = 580,
    ObjectSystemCall = 581,
    AwaitExpr = 582,
    FileHandle = 583,
    ReadlineExpr = 584,

    // ---- nodes: variables ---------------------------------------------------------------------------------------
    /// `my` / `state`
    VariableDeclarationLexical = 600,
    /// `our`
    VariableDeclarationGlobal = 601,
    /// `local`
    VariableDeclarationLocal = 602,
    ScalarVariable = 603,
    ArrayVariable = 604,
    HashVariable = 605,
    GlobVariable = 606,
    CodeVariable = 607,
    ArrayIndexVariable = 608,

    // ---- nodes: misc --------------------------------------------------------------------------------------------
    NumberConstant = 620,
    BarewordString = 621,
    Bareword = 622,
    PackageExpr = 623,
    TagExpr = 624,
    /// Wraps the smallest range needed to keep the tree well formed around a syntax error.
    ErrorElement = 625,
    Label = 626,
}

impl SyntaxKind {
    /// Return `true` for primitive lexer tokens.
    pub const fn is_token(self) -> bool {
        (self as u16) < COMPOSITE_START
    }

    /// Return `true` for merged (composite) tokens.
    pub const fn is_composite(self) -> bool {
        let raw = self as u16;
        raw >= COMPOSITE_START && raw < NODE_START
    }

    /// Return `true` for parser node kinds.
    pub const fn is_node(self) -> bool {
        (self as u16) >= NODE_START
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
