//! Class declaration, the root of every compilation unit.
use super::{delim::ident_list, subroutine::Subroutine, ty::TypeName, Parse, Parser};
use crate::{
    error::ParseError,
    tokens::{Keyword, TokenKind},
};
use smol_str::SmolStr;

/// # Example
///
/// ```text
/// class Point {
///     field int x, y;
///     static int count;
///
///     constructor Point new(int ax, int ay) { ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub identifier: SmolStr,
    pub variables: Vec<ClassVariable>,
    pub subroutines: Vec<Subroutine>,
}

/// One `static` or `field` declaration, which may introduce
/// several names sharing the type and storage class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVariable {
    pub is_static: bool,
    pub ty: TypeName,
    pub identifiers: Vec<SmolStr>,
}

impl Parse for Class {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        input.expect_keyword(Keyword::Class)?;
        let identifier = input.expect_ident()?;
        input.expect_symbol('{')?;

        let mut variables = vec![];
        let mut subroutines = vec![];

        // Declarations may be interleaved, the first token decides which one follows.
        loop {
            match input.peek_kind() {
                Some(TokenKind::Keyword(Keyword::Static | Keyword::Field)) => {
                    variables.push(ClassVariable::parse(input)?);
                }
                Some(TokenKind::Keyword(
                    Keyword::Constructor | Keyword::Function | Keyword::Method,
                )) => {
                    subroutines.push(Subroutine::parse(input)?);
                }
                _ => break,
            }
        }

        input.expect_symbol('}')?;

        Ok(Class {
            identifier,
            variables,
            subroutines,
        })
    }
}

impl Parse for ClassVariable {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        let is_static = if input.match_keyword(Keyword::Static) {
            true
        } else {
            input.expect_keyword(Keyword::Field)?;
            false
        };

        let ty = TypeName::parse(input)?;
        let identifiers = ident_list(input)?;
        input.expect_symbol(';')?;

        Ok(ClassVariable {
            is_static,
            ty,
            identifiers,
        })
    }
}
