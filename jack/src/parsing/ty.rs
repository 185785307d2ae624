//! Type names.
use super::{Parse, Parser};
use crate::{
    error::ParseError,
    tokens::{Keyword, TokenKind},
};
use smol_str::SmolStr;
use std::fmt;

/// Declared type of a variable, parameter or subroutine result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Int,
    Char,
    Boolean,
    /// Only valid as a subroutine return type.
    Void,
    /// User defined or library class.
    Class(SmolStr),
}

impl TypeName {
    /// Parse a return type, which may additionally be `void`.
    pub fn parse_voidable(input: &mut Parser) -> Result<Self, ParseError> {
        if input.match_keyword(Keyword::Void) {
            Ok(TypeName::Void)
        } else {
            TypeName::parse(input).map_err(|_| input.mismatch("a type or 'void'"))
        }
    }

    /// Indicates whether the current token can start a type.
    pub(crate) fn check(input: &Parser) -> bool {
        matches!(
            input.peek_kind(),
            Some(TokenKind::Ident(_))
                | Some(TokenKind::Keyword(Keyword::Int | Keyword::Char | Keyword::Boolean))
        )
    }
}

impl Parse for TypeName {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        let ty = match input.peek_kind() {
            Some(TokenKind::Keyword(Keyword::Int)) => TypeName::Int,
            Some(TokenKind::Keyword(Keyword::Char)) => TypeName::Char,
            Some(TokenKind::Keyword(Keyword::Boolean)) => TypeName::Boolean,
            Some(TokenKind::Ident(name)) => TypeName::Class(name.clone()),
            _ => return Err(input.mismatch("a type")),
        };
        input.next_token();
        Ok(ty)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeName::Int => f.write_str("int"),
            TypeName::Char => f.write_str("char"),
            TypeName::Boolean => f.write_str("boolean"),
            TypeName::Void => f.write_str("void"),
            TypeName::Class(name) => f.write_str(name),
        }
    }
}
