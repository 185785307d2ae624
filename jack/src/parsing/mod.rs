//! Syntactic analysis.
//!
//! Recursive descent over a [`TokenStream`], one [`Parse`] implementation
//! per grammar production. Parsing is all-or-nothing: the first error
//! aborts the compilation unit and there is no recovery.
mod class;
mod delim;
mod expr;
mod stmts;
mod subroutine;
mod ty;
mod visitor;

pub use self::{
    class::{Class, ClassVariable},
    expr::{BinaryOp, Expression, SubroutineCall, Term, UnaryOp},
    stmts::{IfStmt, LetStmt, Stmt, WhileStmt},
    subroutine::{LocalDecl, Parameter, Subroutine, SubroutineKind},
    ty::TypeName,
    visitor::AstVisitor,
};

use crate::{
    compiler::CompilerConf,
    error::ParseError,
    token_stream::TokenStream,
    tokens::{Keyword, Span, Token, TokenKind},
};
use smol_str::SmolStr;

pub trait Parse: Sized {
    type Output;

    fn parse(input: &mut Parser) -> Result<Self::Output, ParseError>;
}

/// Parse one class from a token sequence, with default configuration.
pub fn parse(tokens: &[Token]) -> Result<Class, ParseError> {
    parse_with(tokens, &CompilerConf::default())
}

pub fn parse_with(tokens: &[Token], conf: &CompilerConf) -> Result<Class, ParseError> {
    let mut input = Parser::new(TokenStream::new(tokens), conf.max_depth);
    let class = Class::parse(&mut input)?;

    // One class per compilation unit.
    if let Some(token) = input.peek() {
        return Err(ParseError::TrailingInput {
            encountered: token.kind.to_string(),
            span: token.span,
        });
    }

    log::debug!(
        "parsed class '{}' with {} subroutines",
        class.identifier,
        class.subroutines.len()
    );
    Ok(class)
}

/// Parser state handed to each [`Parse`] implementation.
///
/// Wraps the token cursor with the `expect_*` helpers every
/// production uses, and tracks recursion depth so pathological
/// nesting fails with an error instead of exhausting the stack.
pub struct Parser<'a> {
    stream: TokenStream<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(stream: TokenStream<'a>, max_depth: usize) -> Self {
        Self {
            stream,
            depth: 0,
            max_depth,
        }
    }

    #[inline]
    pub fn peek(&self) -> Option<&'a Token> {
        self.stream.peek()
    }

    #[inline]
    pub fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.stream.peek_kind()
    }

    #[inline]
    pub fn peek_nth_kind(&self, offset: usize) -> Option<&'a TokenKind> {
        self.stream.peek_nth(offset).map(|token| &token.kind)
    }

    #[inline]
    pub fn next_token(&mut self) -> Option<&'a Token> {
        self.stream.next_token()
    }

    #[inline]
    pub fn match_symbol(&mut self, symbol: char) -> bool {
        self.stream.match_symbol(symbol)
    }

    #[inline]
    pub fn match_keyword(&mut self, keyword: Keyword) -> bool {
        self.stream.match_keyword(keyword)
    }

    #[inline]
    pub fn check_symbol(&self, symbol: char) -> bool {
        matches!(self.peek_kind(), Some(kind) if kind.is_symbol(symbol))
    }

    #[inline]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek_kind(), Some(kind) if kind.is_keyword(keyword))
    }

    /// Consume the current token, which must be the given symbol.
    pub fn expect_symbol(&mut self, symbol: char) -> Result<&'a Token, ParseError> {
        if self.check_symbol(symbol) {
            self.advance()
        } else {
            Err(self.mismatch(format!("symbol '{symbol}'")))
        }
    }

    /// Consume the current token, which must be the given keyword.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<&'a Token, ParseError> {
        if self.check_keyword(keyword) {
            self.advance()
        } else {
            Err(self.mismatch(format!("keyword '{keyword}'")))
        }
    }

    /// Consume the current token, which must be an identifier, and return its name.
    pub fn expect_ident(&mut self) -> Result<SmolStr, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) => {
                self.stream.next_token();
                Ok(name.clone())
            }
            _ => Err(self.mismatch("an identifier")),
        }
    }

    /// Build the error for a current token that doesn't fit the grammar.
    #[inline(never)]
    #[cold]
    pub fn mismatch(&self, expected: impl ToString) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::Mismatch {
                expected: expected.to_string(),
                encountered: token.kind.to_string(),
                span: token.span,
            },
            None => ParseError::EndOfSource {
                expected: expected.to_string(),
            },
        }
    }

    /// Span of the current token, or of the last token at end of source.
    pub fn current_span(&self) -> Span {
        self.peek()
            .or_else(|| self.stream.previous_token())
            .map(|token| token.span)
            .unwrap_or_default()
    }

    /// Run a recursive production one nesting level deeper.
    pub fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                span: self.current_span(),
            });
        }

        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn advance(&mut self) -> Result<&'a Token, ParseError> {
        self.stream
            .next_token()
            .ok_or_else(|| ParseError::EndOfSource {
                expected: "a token".to_owned(),
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lex::tokenize;

    fn parse_src(source: &str) -> Result<Class, ParseError> {
        parse(&tokenize(source).unwrap())
    }

    #[test]
    fn test_parse_rejects_trailing_input() {
        match parse_src("class A {} class B {}") {
            Err(ParseError::TrailingInput { encountered, .. }) => {
                assert_eq!(encountered, "keyword 'class'")
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_parse_reports_expected_and_encountered() {
        match parse_src("class A { field int x }") {
            Err(ParseError::Mismatch {
                expected,
                encountered,
                span,
            }) => {
                assert_eq!(expected, "symbol ';'");
                assert_eq!(encountered, "symbol '}'");
                assert_eq!((span.line, span.column), (1, 23));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_parse_end_of_source() {
        assert_eq!(
            parse_src("class A {"),
            Err(ParseError::EndOfSource {
                expected: "symbol '}'".to_owned()
            })
        );
    }

    #[test]
    fn test_parse_nesting_limit() {
        let deep = format!(
            "class A {{ function int f() {{ return {}1{}; }} }}",
            "(".repeat(150),
            ")".repeat(150)
        );
        let tokens = tokenize(&deep).unwrap();

        assert!(matches!(
            parse(&tokens),
            Err(ParseError::TooDeep { limit: 256, .. })
        ));

        let conf = CompilerConf {
            max_depth: 1024,
            ..CompilerConf::default()
        };
        assert!(parse_with(&tokens, &conf).is_ok());
    }
}
