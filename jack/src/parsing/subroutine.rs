//! Subroutine declarations.
use super::{
    delim::{comma_separated, ident_list},
    stmts::{parse_statements, Stmt},
    ty::TypeName,
    Parse, Parser,
};
use crate::{
    error::ParseError,
    tokens::{Keyword, TokenKind},
};
use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subroutine {
    pub kind: SubroutineKind,
    pub return_type: TypeName,
    pub identifier: SmolStr,
    pub parameters: Vec<Parameter>,
    pub locals: Vec<LocalDecl>,
    pub body: Vec<Stmt>,
}

impl Subroutine {
    /// Number of local variable names, across all `var` declarations.
    pub fn local_count(&self) -> usize {
        self.locals.iter().map(|decl| decl.identifiers.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubroutineKind {
    /// Instance subroutine, receives the object as an implicit first argument.
    Method,
    /// Class level subroutine without a receiver.
    Function,
    /// Allocates and returns a new instance.
    Constructor,
}

impl fmt::Display for SubroutineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubroutineKind::Method => f.write_str("method"),
            SubroutineKind::Function => f.write_str("function"),
            SubroutineKind::Constructor => f.write_str("constructor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeName,
    pub identifier: SmolStr,
}

/// One `var` declaration inside a subroutine body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDecl {
    pub ty: TypeName,
    pub identifiers: Vec<SmolStr>,
}

impl Parse for Subroutine {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        let kind = match input.peek_kind() {
            Some(TokenKind::Keyword(Keyword::Method)) => SubroutineKind::Method,
            Some(TokenKind::Keyword(Keyword::Function)) => SubroutineKind::Function,
            Some(TokenKind::Keyword(Keyword::Constructor)) => SubroutineKind::Constructor,
            _ => return Err(input.mismatch("a subroutine declaration")),
        };
        input.next_token();

        let return_type = TypeName::parse_voidable(input)?;
        let identifier = input.expect_ident()?;

        input.expect_symbol('(')?;
        let parameters = comma_separated::<Parameter, _>(input, |span| {
            ParseError::ExpectedParameter { span }
        })?;
        input.expect_symbol(')')?;

        input.expect_symbol('{')?;
        let mut locals = vec![];
        while input.check_keyword(Keyword::Var) {
            locals.push(LocalDecl::parse(input)?);
        }
        let body = parse_statements(input)?;
        input.expect_symbol('}')?;

        Ok(Subroutine {
            kind,
            return_type,
            identifier,
            parameters,
            locals,
            body,
        })
    }
}

/// Parse one parameter definition.
///
/// Allowed to fail because the lookahead is here and not in the delimiter list.
impl Parse for Parameter {
    type Output = Option<Self>;

    fn parse(input: &mut Parser) -> Result<Option<Self>, ParseError> {
        if !TypeName::check(input) {
            return Ok(None);
        }

        Ok(Some(Parameter {
            ty: TypeName::parse(input)?,
            identifier: input.expect_ident()?,
        }))
    }
}

impl Parse for LocalDecl {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        input.expect_keyword(Keyword::Var)?;
        let ty = TypeName::parse(input)?;
        let identifiers = ident_list(input)?;
        input.expect_symbol(';')?;

        Ok(LocalDecl { ty, identifiers })
    }
}
