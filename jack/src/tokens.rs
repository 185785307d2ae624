//! Tokens
use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Reserved identifiers
    Keyword(Keyword),
    /// User defined name of a class, subroutine or variable.
    Ident(SmolStr),
    /// Single character punctuation or operator, one of [`SYMBOLS`].
    Symbol(char),
    /// String literal, without the surrounding quotes.
    StringConst(SmolStr),
    /// Integer literal in the range `0..=32767`.
    IntConst(u16),
}

impl TokenKind {
    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == keyword)
    }

    #[inline]
    pub fn is_symbol(&self, symbol: char) -> bool {
        matches!(self, TokenKind::Symbol(c) if *c == symbol)
    }

    /// Source text that lexes back into this token kind.
    pub fn to_source(&self) -> String {
        match self {
            TokenKind::Keyword(keyword) => keyword.to_string(),
            TokenKind::Ident(name) => name.to_string(),
            TokenKind::Symbol(c) => c.to_string(),
            TokenKind::StringConst(value) => format!("\"{value}\""),
            TokenKind::IntConst(value) => value.to_string(),
        }
    }
}

/// Descriptive form, used in diagnostics.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "keyword '{keyword}'"),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Symbol(c) => write!(f, "symbol '{c}'"),
            TokenKind::StringConst(value) => write!(f, "string literal \"{value}\""),
            TokenKind::IntConst(value) => write!(f, "integer literal '{value}'"),
        }
    }
}

/// Characters that each form a symbol token on their own.
pub const SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
];

#[inline]
pub fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(&c)
}

/// Chunk of source code, encoded as a byte range plus the
/// human readable position of its first character.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Span {
    pub index: u32,
    pub size: u32,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
}

impl Span {
    pub fn new(index: u32, size: u32, line: u32, column: u32) -> Self {
        Self {
            index,
            size,
            line,
            column,
        }
    }

    #[inline]
    pub fn fragment<'a>(&self, text: &'a str) -> &'a str {
        &text[(self.index as usize)..(self.end() as usize)]
    }

    /// Ending index of the span, exclusive.
    #[inline]
    pub fn end(&self) -> u32 {
        self.index + self.size
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Reserved keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Keyword {
    // ------------------------------------------------------------------------
    // Declarations
    Class,        // class
    Constructor,  // constructor
    Function,     // function
    Method,       // method
    Field,        // field
    Static,       // static
    Var,          // var

    // ------------------------------------------------------------------------
    // Types
    Int,          // int
    Char,         // char
    Boolean,      // boolean
    Void,         // void

    // ------------------------------------------------------------------------
    // Constants
    True,         // true
    False,        // false
    Null,         // null
    This,         // this

    // ------------------------------------------------------------------------
    // Statements
    Let,          // let
    Do,           // do
    If,           // if
    Else,         // else
    While,        // while
    Return,       // return
}

impl Keyword {
    /// Exact, case sensitive lookup of a reserved word.
    #[rustfmt::skip]
    pub fn parse(text: impl AsRef<str>) -> Option<Self> {
        match text.as_ref() {
            "class"       => Some(Self::Class),
            "constructor" => Some(Self::Constructor),
            "function"    => Some(Self::Function),
            "method"      => Some(Self::Method),
            "field"       => Some(Self::Field),
            "static"      => Some(Self::Static),
            "var"         => Some(Self::Var),
            // ----------------------------------------------------------------
            "int"         => Some(Self::Int),
            "char"        => Some(Self::Char),
            "boolean"     => Some(Self::Boolean),
            "void"        => Some(Self::Void),
            // ----------------------------------------------------------------
            "true"        => Some(Self::True),
            "false"       => Some(Self::False),
            "null"        => Some(Self::Null),
            "this"        => Some(Self::This),
            // ----------------------------------------------------------------
            "let"         => Some(Self::Let),
            "do"          => Some(Self::Do),
            "if"          => Some(Self::If),
            "else"        => Some(Self::Else),
            "while"       => Some(Self::While),
            "return"      => Some(Self::Return),
            // ----------------------------------------------------------------
            _ => None,
        }
    }

    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class       => "class",
            Self::Constructor => "constructor",
            Self::Function    => "function",
            Self::Method      => "method",
            Self::Field       => "field",
            Self::Static      => "static",
            Self::Var         => "var",
            Self::Int         => "int",
            Self::Char        => "char",
            Self::Boolean     => "boolean",
            Self::Void        => "void",
            Self::True        => "true",
            Self::False       => "false",
            Self::Null        => "null",
            Self::This        => "this",
            Self::Let         => "let",
            Self::Do          => "do",
            Self::If          => "if",
            Self::Else        => "else",
            Self::While       => "while",
            Self::Return      => "return",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_span_fragment() {
        const CODE: &str = "let x = 10;";

        let spans = &[
            Span::new(0, 3, 1, 1),  // let
            Span::new(4, 1, 1, 5),  // x
            Span::new(6, 1, 1, 7),  // =
            Span::new(8, 2, 1, 9),  // 10
            Span::new(10, 1, 1, 11), // ;
        ];

        assert_eq!(spans[0].fragment(CODE), "let");
        assert_eq!(spans[1].fragment(CODE), "x");
        assert_eq!(spans[2].fragment(CODE), "=");
        assert_eq!(spans[3].fragment(CODE), "10");
        assert_eq!(spans[4].fragment(CODE), ";");
    }

    #[test]
    fn test_keyword_lookup_is_exact() {
        assert_eq!(Keyword::parse("boolean"), Some(Keyword::Boolean));
        assert_eq!(Keyword::parse("Class"), None);
        assert_eq!(Keyword::parse("classy"), None);
        assert_eq!(Keyword::parse("bool"), None);
    }

    #[test]
    fn test_keyword_display_round_trips() {
        for word in ["class", "constructor", "method", "null", "this", "while", "return"] {
            let keyword = Keyword::parse(word).unwrap();
            assert_eq!(keyword.to_string(), word);
        }
    }

    #[test]
    fn test_token_kind_to_source() {
        assert_eq!(TokenKind::StringConst("hi there".into()).to_source(), "\"hi there\"");
        assert_eq!(TokenKind::IntConst(32767).to_source(), "32767");
        assert_eq!(TokenKind::Symbol('~').to_source(), "~");
        assert_eq!(TokenKind::Keyword(Keyword::Void).to_source(), "void");
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::Symbol('{').to_string(), "symbol '{'");
        assert_eq!(TokenKind::Ident("Main".into()).to_string(), "identifier 'Main'");
    }
}
