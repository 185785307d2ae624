//! Result and errors.
use smol_str::SmolStr;
use thiserror::Error;

use crate::tokens::Span;

pub type JackResult<T> = std::result::Result<T, JackError>;

/// Failure of any stage in the pipeline for one compilation unit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JackError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
    #[error("symbol error: {0}")]
    Symbol(#[from] SymbolError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    /// None of the token classes matched the remaining input.
    #[error("unexpected input '{prefix}' at {span}")]
    Unmatched { prefix: String, span: Span },
    #[error("integer constant {literal} at {span} exceeds {max}", max = crate::constants::MAX_INT_CONSTANT)]
    IntegerOverflow { literal: String, span: Span },
    #[error("unterminated string literal at {span}")]
    UnterminatedString { span: Span },
    #[error("unterminated block comment at {span}")]
    UnterminatedComment { span: Span },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Error returned when an unexpected token is encountered.
    #[error("expected {expected}, found {encountered} at {span}")]
    Mismatch {
        expected: String,
        encountered: String,
        span: Span,
    },
    #[error("expected {expected}, found end of source")]
    EndOfSource { expected: String },
    #[error("expected a term, found {encountered} at {span}")]
    ExpectedTerm { encountered: String, span: Span },
    #[error("expected another parameter after ',' at {span}")]
    ExpectedParameter { span: Span },
    #[error("expected another argument after ',' at {span}")]
    ExpectedArgument { span: Span },
    #[error("unexpected {encountered} after end of class at {span}")]
    TrailingInput { encountered: String, span: Span },
    #[error("nesting exceeds {limit} levels at {span}")]
    TooDeep { limit: usize, span: Span },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("duplicate identifier '{name}'")]
    Duplicate { name: SmolStr },
    #[error("symbol '{name}' not found")]
    Unresolved { name: SmolStr },
    #[error("too many {segment} variables, index space exhausted")]
    Overflow { segment: &'static str },
}
