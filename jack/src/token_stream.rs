//! Restartable cursor over a token sequence.
use crate::tokens::{Keyword, Token, TokenKind};

/// Cursor over an immutable, already lexed sequence of tokens.
///
/// Unlike a lazy lexer, the underlying tokens can be rescanned:
/// [`TokenStream::reset`] rewinds the cursor to the first token,
/// and [`TokenStream::peek_nth`] looks ahead by any offset
/// without consuming.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    /// Index of the current token.
    cursor: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Rewind the cursor to the start of the sequence.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Index of the current token.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Return the current token without advancing the cursor.
    ///
    /// Returns `None` when the cursor is at the end of the token stream.
    #[inline]
    pub fn peek(&self) -> Option<&'a Token> {
        self.peek_nth(0)
    }

    /// Look ahead `offset` tokens past the current one, without advancing.
    #[inline]
    pub fn peek_nth(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.cursor + offset)
    }

    #[inline]
    pub fn peek_kind(&self) -> Option<&'a TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    /// Consumes the current token regardless of kind.
    ///
    /// Returns `None` when the cursor is at the end of the token stream.
    #[inline]
    pub fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// Last token consumed, if any.
    ///
    /// This can be used to build errors that refer to
    /// the end of the previous token's span.
    #[inline]
    pub fn previous_token(&self) -> Option<&'a Token> {
        self.cursor.checked_sub(1).and_then(|index| self.tokens.get(index))
    }

    /// Consumes the current token if it is the given symbol.
    ///
    /// Does not consume the token if it does not match.
    pub fn match_symbol(&mut self, symbol: char) -> bool {
        self.match_with(|kind| kind.is_symbol(symbol))
    }

    /// Consumes the current token if it is the given keyword.
    pub fn match_keyword(&mut self, keyword: Keyword) -> bool {
        self.match_with(|kind| kind.is_keyword(keyword))
    }

    fn match_with(&mut self, predicate: impl Fn(&TokenKind) -> bool) -> bool {
        match self.peek_kind() {
            Some(kind) if predicate(kind) => {
                self.cursor += 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lex::tokenize;

    #[test]
    fn test_stream_peek_does_not_consume() {
        let tokens = tokenize("do foo.bar();").unwrap();
        let mut stream = TokenStream::new(&tokens);

        assert!(stream.peek_kind().unwrap().is_keyword(Keyword::Do));
        assert!(stream.peek_nth(2).unwrap().kind.is_symbol('.'));
        assert_eq!(stream.position(), 0);

        assert!(stream.match_keyword(Keyword::Do));
        assert!(!stream.match_keyword(Keyword::Do));
        assert_eq!(stream.position(), 1);
        assert!(stream.peek_nth(100).is_none());
    }

    #[test]
    fn test_stream_is_restartable() {
        let tokens = tokenize("a , b ;").unwrap();
        let mut stream = TokenStream::new(&tokens);

        let first_pass = std::iter::from_fn(|| stream.next_token()).cloned().collect::<Vec<_>>();
        assert!(stream.at_end());
        assert!(stream.previous_token().unwrap().kind.is_symbol(';'));

        stream.reset();
        assert!(stream.previous_token().is_none());
        let second_pass = std::iter::from_fn(|| stream.next_token()).cloned().collect::<Vec<_>>();
        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass.len(), 4);
    }
}
