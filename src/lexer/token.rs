//! Token definitions for the TypeScript scanner.

use crate::span::Span;

/// Token types produced by the scanner.
///
/// Only the reserved words the statement parser dispatches on get their own
/// variant. Contextual words (`type`, `as`, `from`, `declare`, ...) are valid
/// identifiers in TypeScript and stay `Identifier`.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Raw lexeme including its delimiters: `'./m'` keeps the quotes.
    StringLiteral(String),
    /// Raw template literal, backticks included.
    Template(String),
    NumberLiteral(String),
    RegexLiteral(String),
    /// A whole JSX element, only produced in JSX-enabled sources.
    Jsx,

    // Identifiers
    Identifier(String),
    /// `#name` class member.
    PrivateName(String),

    // Reserved keywords
    Export,
    Import,
    Default,
    Const,
    Let,
    Var,
    Function,
    Class,
    Enum,
    Interface,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Spread,      // ...
    Question,    // ?
    QuestionDot, // ?.
    At,          // @

    // Operators the parser looks at
    Star,
    Equal,
    Less,
    Greater,
    FatArrow, // =>
    Pipe,
    Ampersand,
    Bang,
    Slash,
    /// Every other operator, kept verbatim.
    Operator(String),

    // Special
    Eof,
}

impl TokenKind {
    /// Check if this identifier is a reserved keyword and return its kind.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "export" => Some(TokenKind::Export),
            "import" => Some(TokenKind::Import),
            "default" => Some(TokenKind::Default),
            "const" => Some(TokenKind::Const),
            "let" => Some(TokenKind::Let),
            "var" => Some(TokenKind::Var),
            "function" => Some(TokenKind::Function),
            "class" => Some(TokenKind::Class),
            "enum" => Some(TokenKind::Enum),
            "interface" => Some(TokenKind::Interface),
            _ => None,
        }
    }

    /// Source text of a keyword token, `None` for everything else.
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            TokenKind::Export => Some("export"),
            TokenKind::Import => Some("import"),
            TokenKind::Default => Some("default"),
            TokenKind::Const => Some("const"),
            TokenKind::Let => Some("let"),
            TokenKind::Var => Some("var"),
            TokenKind::Function => Some("function"),
            TokenKind::Class => Some("class"),
            TokenKind::Enum => Some("enum"),
            TokenKind::Interface => Some("interface"),
            _ => None,
        }
    }

    /// True for tokens after which a `/` starts an expression, so it must be
    /// a regular expression rather than a division.
    pub fn allows_regex_after(&self) -> bool {
        match self {
            TokenKind::Identifier(name) => matches!(
                name.as_str(),
                "return"
                    | "typeof"
                    | "instanceof"
                    | "in"
                    | "of"
                    | "new"
                    | "delete"
                    | "void"
                    | "throw"
                    | "case"
                    | "do"
                    | "else"
                    | "yield"
                    | "await"
            ),
            TokenKind::StringLiteral(_)
            | TokenKind::Template(_)
            | TokenKind::NumberLiteral(_)
            | TokenKind::RegexLiteral(_)
            | TokenKind::Jsx
            | TokenKind::PrivateName(_)
            | TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace => false,
            TokenKind::Operator(op) => op != "++" && op != "--",
            _ => true,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(text) = self.keyword_text() {
            return write!(f, "{}", text);
        }
        match self {
            TokenKind::StringLiteral(s) => write!(f, "{}", s),
            TokenKind::Template(s) => write!(f, "{}", s),
            TokenKind::NumberLiteral(s) => write!(f, "{}", s),
            TokenKind::RegexLiteral(s) => write!(f, "{}", s),
            TokenKind::Jsx => write!(f, "<jsx element>"),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::PrivateName(s) => write!(f, "#{}", s),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Spread => write!(f, "..."),
            TokenKind::Question => write!(f, "?"),
            TokenKind::QuestionDot => write!(f, "?."),
            TokenKind::At => write!(f, "@"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::FatArrow => write!(f, "=>"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Ampersand => write!(f, "&"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Eof => write!(f, "EOF"),
            _ => Ok(()),
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator separates this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Self {
            kind,
            span,
            newline_before,
        }
    }

    pub fn eof(position: usize, line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            span: Span::new(position, position, line, column),
            newline_before: true,
        }
    }

    /// True if this token is the identifier `word`.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(name) if name == word)
    }
}
