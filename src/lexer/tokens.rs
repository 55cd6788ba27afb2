use lazy_static::lazy_static;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use crate::Span;

fn char_set(chars: &str) -> HashSet<char> {
    chars.chars().collect()
}

fn extend(base: &HashSet<char>, chars: &str) -> HashSet<char> {
    let mut set = base.clone();
    set.extend(chars.chars());
    set
}

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("chan", TokenKind::Chan);
        map.insert("kun", TokenKind::Kun);
        map.insert("senpai", TokenKind::Senpai);
        map.insert("sama", TokenKind::Sama);
        map.insert("san", TokenKind::San);
        map.insert("dono", TokenKind::Dono);
        map.insert("fwunc", TokenKind::Fwunc);
        map.insert("mainuwu", TokenKind::Mainuwu);
        map.insert("cwass", TokenKind::Cwass);
        map.insert("gwobaw", TokenKind::Gwobaw);
        map.insert("iwf", TokenKind::Iwf);
        map.insert("ewse", TokenKind::Ewse);
        map.insert("whiwe", TokenKind::Whiwe);
        map.insert("fow", TokenKind::Fow);
        map.insert("wetuwn", TokenKind::Wetuwn);
        map.insert("bweak", TokenKind::Bweak);
        map.insert("pwint", TokenKind::Pwint);
        map.insert("inpwt", TokenKind::Inpwt);
        map.insert("fax", TokenKind::Fax);
        map.insert("cap", TokenKind::Cap);
        map.insert("nuww", TokenKind::Nuww);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map
    };

    /// Keywords made of two words. The space matches any run of blanks.
    pub static ref SPLIT_KEYWORDS: Vec<(&'static str, TokenKind)> = vec![
        ("ewse iwf", TokenKind::EwseIwf),
        ("do whiwe", TokenKind::DoWhiwe),
    ];

    /// Symbols in match order: longer lexemes first.
    pub static ref SYMBOL_LOOKUP: Vec<(&'static str, TokenKind)> = vec![
        (">.<", TokenKind::Comment),
        ("[[", TokenKind::DoubleOpenBracket),
        ("]]", TokenKind::DoubleCloseBracket),
        ("==", TokenKind::Equals),
        ("!=", TokenKind::NotEquals),
        ("<=", TokenKind::LessEquals),
        (">=", TokenKind::GreaterEquals),
        ("++", TokenKind::Increment),
        ("--", TokenKind::Decrement),
        ("+=", TokenKind::PlusAssign),
        ("-=", TokenKind::DashAssign),
        ("*=", TokenKind::StarAssign),
        ("/=", TokenKind::SlashAssign),
        ("%=", TokenKind::PercentAssign),
        ("+", TokenKind::Plus),
        ("-", TokenKind::Dash),
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("%", TokenKind::Percent),
        ("&", TokenKind::Ampersand),
        ("=", TokenKind::Assign),
        ("!", TokenKind::Not),
        ("<", TokenKind::Less),
        (">", TokenKind::Greater),
        ("(", TokenKind::OpenParen),
        (")", TokenKind::CloseParen),
        ("[", TokenKind::OpenBracket),
        ("]", TokenKind::CloseBracket),
        ("{", TokenKind::OpenBrace),
        ("}", TokenKind::CloseBrace),
        (".", TokenKind::Dot),
        (",", TokenKind::Comma),
        ("~", TokenKind::Terminator),
    ];

    static ref WHITESPACE: HashSet<char> = char_set(" \t\r\n");
    static ref ALPHANUMERIC: HashSet<char> = char_set(
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_"
    );

    pub static ref TYPE_DELIMS: HashSet<char> = extend(&WHITESPACE, "[(=~,)-");
    pub static ref DONO_DELIMS: HashSet<char> = extend(&WHITESPACE, "=~,)");
    pub static ref DECL_KEYWORD_DELIMS: HashSet<char> = WHITESPACE.clone();
    pub static ref MAINUWU_DELIMS: HashSet<char> = char_set("-");
    pub static ref CONTROL_DELIMS: HashSet<char> = extend(&WHITESPACE, "(");
    pub static ref EWSE_DELIMS: HashSet<char> = extend(&WHITESPACE, "[");
    pub static ref WETUWN_DELIMS: HashSet<char> = extend(&WHITESPACE, "~(\"{-!");
    pub static ref BWEAK_DELIMS: HashSet<char> = extend(&WHITESPACE, "~");
    pub static ref LOGICAL_DELIMS: HashSet<char> = extend(&WHITESPACE, "(!");
    pub static ref VALUE_DELIMS: HashSet<char> = extend(&WHITESPACE, "~,)]}|+-*/%=!<>&");
    pub static ref IDENTIFIER_DELIMS: HashSet<char> = extend(&VALUE_DELIMS, "([.");
    pub static ref CLOSE_DELIMS: HashSet<char> = extend(&VALUE_DELIMS, "[.(");
    pub static ref OPERATOR_DELIMS: HashSet<char> = {
        let mut set = extend(&WHITESPACE, "(\"{-!");
        set.extend(ALPHANUMERIC.iter());
        set
    };
    pub static ref NOT_DELIMS: HashSet<char> = {
        let mut set = extend(&WHITESPACE, "(!");
        set.extend(ALPHANUMERIC.iter());
        set
    };
    pub static ref POSTFIX_DELIMS: HashSet<char> = extend(&WHITESPACE, "~),]");
    pub static ref DOT_DELIMS: HashSet<char> = ALPHANUMERIC.clone();
    pub static ref BLOCK_CLOSE_DELIMS: HashSet<char> = WHITESPACE.clone();
}

/// Per-compilation id of an interned identifier or class name.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Default)]
pub struct UniqueId(pub u32);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Whitespace,
    Newline,
    Comment,

    IntLiteral,
    FloatLiteral,
    StringLiteral,
    StringPartStart,
    StringPartMid,
    StringPartEnd,
    Fax,
    Cap,
    Nuww,

    Identifier(UniqueId),
    ClassId(UniqueId),

    // Data types
    Chan,
    Kun,
    Senpai,
    Sama,
    San,
    Dono,

    // Reserved
    Fwunc,
    Mainuwu,
    Cwass,
    Gwobaw,
    Iwf,
    Ewse,
    EwseIwf,
    Whiwe,
    DoWhiwe,
    Fow,
    Wetuwn,
    Bweak,
    Pwint,
    Inpwt,
    And,
    Or,

    Plus,
    Dash,
    Star,
    Slash,
    Percent,
    Ampersand,

    Assign,
    PlusAssign,
    DashAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,

    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Not,

    Increment,
    Decrement,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    DoubleOpenBracket,
    DoubleCloseBracket,

    Dot,
    Comma,
    Terminator,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Identifier(_) => write!(f, "Identifier"),
            TokenKind::ClassId(_) => write!(f, "ClassId"),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl TokenKind {
    /// Characters allowed directly after a lexeme of this kind. `None` means
    /// anything may follow.
    pub fn delimiters(&self) -> Option<&'static HashSet<char>> {
        let set: &'static HashSet<char> = match self {
            TokenKind::Chan
            | TokenKind::Kun
            | TokenKind::Senpai
            | TokenKind::Sama
            | TokenKind::San => &*TYPE_DELIMS,
            TokenKind::Dono => &*DONO_DELIMS,
            TokenKind::Fwunc | TokenKind::Cwass | TokenKind::Gwobaw => &*DECL_KEYWORD_DELIMS,
            TokenKind::Mainuwu => &*MAINUWU_DELIMS,
            TokenKind::Iwf
            | TokenKind::EwseIwf
            | TokenKind::Whiwe
            | TokenKind::DoWhiwe
            | TokenKind::Fow
            | TokenKind::Pwint
            | TokenKind::Inpwt => &*CONTROL_DELIMS,
            TokenKind::Ewse => &*EWSE_DELIMS,
            TokenKind::Wetuwn => &*WETUWN_DELIMS,
            TokenKind::Bweak => &*BWEAK_DELIMS,
            TokenKind::And | TokenKind::Or => &*LOGICAL_DELIMS,
            TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::StringPartEnd
            | TokenKind::Fax
            | TokenKind::Cap
            | TokenKind::Nuww
            | TokenKind::CloseBrace => &*VALUE_DELIMS,
            TokenKind::Identifier(_) | TokenKind::ClassId(_) => &*IDENTIFIER_DELIMS,
            TokenKind::CloseParen | TokenKind::CloseBracket => &*CLOSE_DELIMS,
            TokenKind::Plus
            | TokenKind::Dash
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Ampersand
            | TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::DashAssign
            | TokenKind::StarAssign
            | TokenKind::SlashAssign
            | TokenKind::PercentAssign
            | TokenKind::Equals
            | TokenKind::NotEquals
            | TokenKind::Less
            | TokenKind::LessEquals
            | TokenKind::Greater
            | TokenKind::GreaterEquals
            | TokenKind::Comma => &*OPERATOR_DELIMS,
            TokenKind::Not => &*NOT_DELIMS,
            TokenKind::Increment | TokenKind::Decrement => &*POSTFIX_DELIMS,
            TokenKind::Dot => &*DOT_DELIMS,
            TokenKind::DoubleCloseBracket => &*BLOCK_CLOSE_DELIMS,
            TokenKind::EOF
            | TokenKind::Whitespace
            | TokenKind::Newline
            | TokenKind::Comment
            | TokenKind::StringPartStart
            | TokenKind::StringPartMid
            | TokenKind::OpenParen
            | TokenKind::OpenBracket
            | TokenKind::OpenBrace
            | TokenKind::DoubleOpenBracket
            | TokenKind::Terminator => return None,
        };
        Some(set)
    }

    /// Tokens the parser never sees.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment
        )
    }

    pub fn is_data_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Chan
                | TokenKind::Kun
                | TokenKind::Senpai
                | TokenKind::Sama
                | TokenKind::San
                | TokenKind::ClassId(_)
        )
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, TokenKind::Identifier(_) | TokenKind::ClassId(_))
    }
}

/// Sorted, printable form of a delimiter set, used in diagnostics.
pub fn describe_delimiters(set: &HashSet<char>) -> Vec<String> {
    let mut chars = set.iter().copied().collect::<Vec<char>>();
    chars.sort_unstable();
    chars
        .into_iter()
        .map(|c| match c {
            ' ' => String::from("space"),
            '\t' => String::from("tab"),
            '\n' => String::from("newline"),
            '\r' => String::from("return"),
            c => c.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.lexeme == other.lexeme
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    pub fn debug(&self) -> String {
        if self.kind.is_unique()
            || self.is_one_of_many(&[
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::StringLiteral,
            ])
        {
            format!("{} ({})", self.kind, self.lexeme)
        } else {
            format!("{} ()", self.kind)
        }
    }
}

/// A data type: the type keyword (or class id) plus an array dimension.
///
/// `chan[][]` is `DataType { kind: Chan, name: "chan", dimension: 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    pub kind: TokenKind,
    pub name: String,
    pub dimension: usize,
}

impl DataType {
    pub fn new(kind: TokenKind, name: &str, dimension: usize) -> Self {
        DataType {
            kind,
            name: name.to_string(),
            dimension,
        }
    }

    pub fn chan() -> Self {
        DataType::new(TokenKind::Chan, "chan", 0)
    }

    pub fn kun() -> Self {
        DataType::new(TokenKind::Kun, "kun", 0)
    }

    pub fn senpai() -> Self {
        DataType::new(TokenKind::Senpai, "senpai", 0)
    }

    pub fn sama() -> Self {
        DataType::new(TokenKind::Sama, "sama", 0)
    }

    pub fn san() -> Self {
        DataType::new(TokenKind::San, "san", 0)
    }

    /// The value of an `inpwt(...)` expression.
    pub fn input() -> Self {
        DataType::new(TokenKind::Inpwt, "inpwt", 0)
    }

    /// Element type of an empty array literal, `dimension` levels deep.
    pub fn empty_array(dimension: usize) -> Self {
        DataType::new(TokenKind::San, "san", dimension)
    }

    pub fn from_token(token: &Token) -> Option<Self> {
        if token.kind.is_data_type() {
            Some(DataType::new(token.kind, &token.lexeme, 0))
        } else {
            None
        }
    }

    pub fn to_arr_type(&self, n: usize) -> Self {
        DataType {
            kind: self.kind,
            name: self.name.clone(),
            dimension: self.dimension + n,
        }
    }

    pub fn to_unit_type(&self, n: usize) -> Self {
        DataType {
            kind: self.kind,
            name: self.name.clone(),
            dimension: self.dimension.saturating_sub(n),
        }
    }

    pub fn is_void(&self) -> bool {
        self.kind == TokenKind::San && self.dimension == 0
    }

    pub fn is_array(&self) -> bool {
        self.dimension > 0
    }

    pub fn is_empty_array(&self) -> bool {
        self.kind == TokenKind::San && self.dimension > 0
    }

    pub fn is_numeric(&self) -> bool {
        self.dimension == 0
            && matches!(self.kind, TokenKind::Chan | TokenKind::Kun | TokenKind::Sama)
    }

    pub fn is_string(&self) -> bool {
        self.dimension == 0 && self.kind == TokenKind::Senpai
    }

    pub fn is_input(&self) -> bool {
        self.dimension == 0 && self.kind == TokenKind::Inpwt
    }

    pub fn is_class(&self) -> bool {
        self.dimension == 0 && matches!(self.kind, TokenKind::ClassId(_))
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, "[]".repeat(self.dimension))
    }
}
