//! Error types for scanning, parsing and export resolution.

use crate::module::ResolveError;
use crate::span::Span;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Clone, Error)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("Unterminated string at {0}")]
    UnterminatedString(Span),

    #[error("Unterminated template literal at {0}")]
    UnterminatedTemplate(Span),

    #[error("Unterminated regular expression at {0}")]
    UnterminatedRegex(Span),

    #[error("Unterminated block comment at {0}")]
    UnterminatedComment(Span),

    #[error("Unterminated JSX element at {0}")]
    UnterminatedJsx(Span),
}

impl LexerError {
    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::UnexpectedChar(c, span)
    }

    pub fn unterminated_string(span: Span) -> Self {
        Self::UnterminatedString(span)
    }

    pub fn unterminated_template(span: Span) -> Self {
        Self::UnterminatedTemplate(span)
    }

    pub fn unterminated_regex(span: Span) -> Self {
        Self::UnterminatedRegex(span)
    }

    pub fn unterminated_comment(span: Span) -> Self {
        Self::UnterminatedComment(span)
    }

    pub fn unterminated_jsx(span: Span) -> Self {
        Self::UnterminatedJsx(span)
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::UnterminatedString(span) => *span,
            Self::UnterminatedTemplate(span) => *span,
            Self::UnterminatedRegex(span) => *span,
            Self::UnterminatedComment(span) => *span,
            Self::UnterminatedJsx(span) => *span,
        }
    }
}

/// Parser errors.
#[derive(Debug, Clone, Error)]
pub enum ParserError {
    #[error("Unexpected token '{found}', expected {expected} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of file at {0}")]
    UnexpectedEof(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn unexpected_eof(span: Span) -> Self {
        Self::UnexpectedEof(span)
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::UnexpectedEof(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

impl From<LexerError> for ParserError {
    fn from(err: LexerError) -> Self {
        Self::General {
            message: err.to_string(),
            span: err.span(),
        }
    }
}

/// Errors that abort a whole resolution run.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Entry module '{module}' could not be loaded: {source}")]
    MissingEntryModule {
        module: String,
        #[source]
        source: ResolveError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub fn missing_entry(module: impl Into<String>, source: ResolveError) -> Self {
        Self::MissingEntryModule {
            module: module.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
