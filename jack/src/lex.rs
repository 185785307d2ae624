//! Lexical analysis (tokenizer)
use crate::{
    constants::MAX_INT_CONSTANT,
    error::LexError,
    tokens::{is_symbol, Keyword, Span, Token, TokenKind},
};

use itertools::{multipeek, MultiPeek};
use smol_str::SmolStr;
use std::{iter::Iterator, str::CharIndices};

/// Longest prefix of unmatched input quoted in an error.
const UNMATCHED_PREFIX_LEN: usize = 16;

/// Tokenize a whole compilation unit.
///
/// Stops at the first lexical error.
pub fn tokenize(source_code: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(source_code).collect::<Result<Vec<_>, _>>()?;
    log::debug!("tokenized {} tokens", tokens.len());
    Ok(tokens)
}

/// Lexical analyzer.
///
/// Comments and whitespace are erased while scanning. Each remaining
/// token is matched by its first character, in the priority order
/// symbol, number, string, then keyword or identifier.
pub struct Lexer<'a> {
    source: SourceText<'a>,
    token_start: SourcePos,
    /// Set after end-of-source or an error, so iteration ends.
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self {
            source: SourceText::new(source_code),
            token_start: SourcePos::default(),
            done: false,
        }
    }

    /// Scan the source characters and construct the next token.
    ///
    /// Returns `None` at the end of the source.
    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        if let Err(err) = self.erase_trivia() {
            return Some(Err(err));
        }

        self.start_token();

        let result = match self.source.next_char()? {
            c if is_symbol(c) => Ok(self.make_token(TokenKind::Symbol(c))),
            '0'..='9' => self.consume_number(),
            '"' => self.consume_string(),
            '_' | 'a'..='z' | 'A'..='Z' => Ok(self.consume_word()),
            _ => Err(self.unmatched()),
        };

        Some(result)
    }

    /// Prime the lexer state for recording a new token.
    fn start_token(&mut self) {
        self.token_start = self.source.pos();
    }

    fn make_span(&self) -> Span {
        let start = &self.token_start;
        let end = self.source.offset;
        debug_assert!(end >= start.offset);

        Span {
            index: start.offset as u32,
            size: (end - start.offset) as u32,
            line: start.line,
            column: start.column,
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn token_fragment(&self) -> &'a str {
        &self.source.original[self.token_start.offset..self.source.offset]
    }

    /// Erase whitespace, line comments and block comments until
    /// the cursor rests on the first character of a token.
    fn erase_trivia(&mut self) -> Result<(), LexError> {
        loop {
            while matches!(self.source.peek_char(), Some(c) if c.is_whitespace()) {
                self.source.next_char();
            }

            match self.source.peek_char2() {
                (Some('/'), Some('/')) => {
                    while !matches!(self.source.peek_char(), None | Some('\n')) {
                        self.source.next_char();
                    }
                }
                (Some('/'), Some('*')) => self.erase_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Block comments end at the first `*/` and do not nest.
    fn erase_block_comment(&mut self) -> Result<(), LexError> {
        self.start_token();
        self.source.next_char(); // '/'
        self.source.next_char(); // '*'

        loop {
            match self.source.next_char() {
                Some('*') if self.source.peek_char() == Some('/') => {
                    self.source.next_char();
                    return Ok(());
                }
                Some(_) => continue,
                None => {
                    let span = Span {
                        size: 2,
                        ..self.make_span()
                    };
                    return Err(LexError::UnterminatedComment { span });
                }
            }
        }
    }

    fn consume_number(&mut self) -> Result<Token, LexError> {
        while let Some('0'..='9') = self.source.peek_char() {
            self.source.next_char();
        }

        // Only digits were consumed, so parsing can only fail on overflow.
        let literal = self.token_fragment();
        match literal.parse::<u16>() {
            Ok(value) if value <= MAX_INT_CONSTANT => Ok(self.make_token(TokenKind::IntConst(value))),
            _ => Err(LexError::IntegerOverflow {
                literal: literal.to_owned(),
                span: self.make_span(),
            }),
        }
    }

    /// String literals have no escape sequences, and may not
    /// contain a quote or a newline.
    fn consume_string(&mut self) -> Result<Token, LexError> {
        loop {
            match self.source.peek_char() {
                Some('"') => {
                    self.source.next_char();
                    break;
                }
                Some('\n') | None => {
                    let span = Span {
                        size: 1,
                        ..self.make_span()
                    };
                    return Err(LexError::UnterminatedString { span });
                }
                Some(_) => {
                    self.source.next_char();
                }
            }
        }

        let fragment = self.token_fragment();
        let value = SmolStr::from(&fragment[1..fragment.len() - 1]);
        Ok(self.make_token(TokenKind::StringConst(value)))
    }

    /// Make a keyword or identifier token.
    fn consume_word(&mut self) -> Token {
        while let Some('_' | 'a'..='z' | 'A'..='Z' | '0'..='9') = self.source.peek_char() {
            self.source.next_char();
        }

        // If the whole word is a reserved keyword, then the token
        // is a keyword instead of a user defined identifier.
        let word = self.token_fragment();
        let kind = match Keyword::parse(word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Ident(SmolStr::from(word)),
        };
        self.make_token(kind)
    }

    fn unmatched(&self) -> LexError {
        let rest = &self.source.original[self.token_start.offset..];
        let prefix = rest
            .split(char::is_whitespace)
            .next()
            .unwrap_or(rest)
            .chars()
            .take(UNMATCHED_PREFIX_LEN)
            .collect::<String>();

        LexError::Unmatched {
            prefix,
            span: self.make_span(),
        }
    }
}

/// Lexing ends at the end of source, or after the first error.
impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.next_token();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

/// Wrapper for source code that keeps a cursor position.
///
/// Allows forward lookup via peeking.
struct SourceText<'a> {
    original: &'a str,

    /// Iterator over UTF-8 encoded source code.
    ///
    /// The `MultiPeek` wrapper allows for arbitrary lookahead by consuming
    /// the iterator internally and buffering the result. Peeking advances
    /// the internal peek cursor by 1, so every peek helper resets it first.
    chars: MultiPeek<CharIndices<'a>>,

    /// Byte position of the next character.
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> SourceText<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            original: source,
            chars: multipeek(source.char_indices()),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn pos(&self) -> SourcePos {
        SourcePos {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Advance the cursor and return the consumed character.
    fn next_char(&mut self) -> Option<char> {
        let (index, c) = self.chars.next()?;
        self.offset = index + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Peeks the character under the cursor.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.reset_peek();
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Two character lookahead.
    fn peek_char2(&mut self) -> (Option<char>, Option<char>) {
        self.chars.reset_peek();
        (
            self.chars.peek().map(|(_, c)| *c),
            self.chars.peek().map(|(_, c)| *c),
        )
    }
}

#[derive(Debug, Default)]
struct SourcePos {
    offset: usize,
    line: u32,
    column: u32,
}
