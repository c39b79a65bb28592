use logos::Logos;

/// Span represents a byte range in the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Token with its span information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The token's text within `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

/// All token types in SOQL
///
/// Keywords only get their own kind when the parser or validator branches
/// on them. Clause keywords are matched by text, so anything word-like is
/// either a keyword kind or `Identifier`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // Keywords - Clauses
    #[token("select", ignore(ascii_case))]
    Select,
    #[token("from", ignore(ascii_case))]
    From,
    #[token("where", ignore(ascii_case))]
    Where,
    #[token("group", ignore(ascii_case))]
    Group,
    #[token("by", ignore(ascii_case))]
    By,
    #[token("having", ignore(ascii_case))]
    Having,
    #[token("order", ignore(ascii_case))]
    Order,
    #[token("limit", ignore(ascii_case))]
    Limit,
    #[token("offset", ignore(ascii_case))]
    Offset,
    #[token("with", ignore(ascii_case))]
    With,
    #[token("for", ignore(ascii_case))]
    For,

    // Keywords - Ordering
    #[token("asc", ignore(ascii_case))]
    Asc,
    #[token("desc", ignore(ascii_case))]
    Desc,
    #[token("nulls", ignore(ascii_case))]
    Nulls,

    // Keywords - Conditions
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("in", ignore(ascii_case))]
    In,
    #[token("like", ignore(ascii_case))]
    Like,
    #[token("includes", ignore(ascii_case))]
    Includes,
    #[token("excludes", ignore(ascii_case))]
    Excludes,

    // Keywords - Literals
    #[token("null", ignore(ascii_case))]
    Null,
    #[token("true", ignore(ascii_case))]
    True,
    #[token("false", ignore(ascii_case))]
    False,

    // Operators - Comparison
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<>")]
    LtGt,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    // Operators - Arithmetic (only seen inside date-times and signed numbers)
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    // Literals
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"'([^'\\]|\\.)*'")]
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,

    /// A quote that is never closed swallows the rest of the input
    #[regex(r"'([^'\\]|\\.)*")]
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    /// Any character the grammar has no use for. Non-ASCII runs are matched
    /// whole so spans always fall on char boundaries.
    #[regex(r"[^\x00-\x7F]+")]
    Unknown,
}

impl TokenKind {
    /// True for identifiers and every keyword kind
    pub fn is_word(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Select
                | From
                | Where
                | Group
                | By
                | Having
                | Order
                | Limit
                | Offset
                | With
                | For
                | Asc
                | Desc
                | Nulls
                | And
                | Or
                | Not
                | In
                | Like
                | Includes
                | Excludes
                | Null
                | True
                | False
                | Identifier
        )
    }

    pub fn is_comparison(&self) -> bool {
        use TokenKind::*;
        matches!(self, Eq | NotEq | LtGt | Lt | LtEq | Gt | GtEq)
    }
}

/// Lexer for SOQL text
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let kind = match self.inner.next()? {
            Ok(kind) => kind,
            Err(_) => TokenKind::Unknown,
        };
        let span = self.inner.span();
        Some(Token::new(kind, Span::new(span.start, span.end)))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenize a query into a vector of tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}
