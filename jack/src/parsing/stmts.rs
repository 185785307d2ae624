//! Statement parsing.
use super::{
    expr::{Expression, SubroutineCall, Term},
    Parse, Parser,
};
use crate::{
    error::ParseError,
    tokens::{Keyword, TokenKind},
};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Let(LetStmt),
    If(IfStmt),
    While(WhileStmt),
    /// Subroutine call for its side effects, the result is discarded.
    Do(SubroutineCall),
    /// A bare `return;` is parsed as returning the integer `0`.
    Return(Expression),
}

/// Assignment to a variable or to an array element.
///
/// ```text
/// let x = 1;
/// let a[i] = x;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetStmt {
    pub identifier: SmolStr,
    pub index: Option<Expression>,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub condition: Expression,
    pub then_branch: Vec<Stmt>,
    /// Empty when there is no `else`.
    pub else_branch: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStmt {
    pub condition: Expression,
    pub body: Vec<Stmt>,
}

/// Parse statements until a token that can't start one.
pub fn parse_statements(input: &mut Parser) -> Result<Vec<Stmt>, ParseError> {
    let mut stmts = vec![];
    while let Some(stmt) = Stmt::parse(input)? {
        stmts.push(stmt);
    }
    Ok(stmts)
}

/// Parse a braced statement block.
///
/// ```text
/// '{' statement* '}'
/// ```
fn parse_block(input: &mut Parser) -> Result<Vec<Stmt>, ParseError> {
    input.nested(|input| {
        input.expect_symbol('{')?;
        let stmts = parse_statements(input)?;
        input.expect_symbol('}')?;
        Ok(stmts)
    })
}

/// Parse one statement, chosen by its leading keyword.
///
/// Returns `None` when the current token doesn't start a statement.
impl Parse for Stmt {
    type Output = Option<Self>;

    fn parse(input: &mut Parser) -> Result<Option<Self>, ParseError> {
        use Keyword as K;

        let keyword = match input.peek_kind() {
            Some(TokenKind::Keyword(keyword)) => *keyword,
            _ => return Ok(None),
        };

        let stmt = match keyword {
            K::Let => Stmt::Let(LetStmt::parse(input)?),
            K::If => Stmt::If(IfStmt::parse(input)?),
            K::While => Stmt::While(WhileStmt::parse(input)?),
            K::Do => {
                input.expect_keyword(K::Do)?;
                let call = SubroutineCall::parse(input)?;
                input.expect_symbol(';')?;
                Stmt::Do(call)
            }
            K::Return => {
                input.expect_keyword(K::Return)?;
                let value = if input.check_symbol(';') {
                    Expression::from(Term::IntConst(0))
                } else {
                    Expression::parse(input)?
                };
                input.expect_symbol(';')?;
                Stmt::Return(value)
            }
            _ => return Ok(None),
        };

        Ok(Some(stmt))
    }
}

impl Parse for LetStmt {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        input.expect_keyword(Keyword::Let)?;
        let identifier = input.expect_ident()?;

        let index = if input.match_symbol('[') {
            let index = Expression::parse(input)?;
            input.expect_symbol(']')?;
            Some(index)
        } else {
            None
        };

        input.expect_symbol('=')?;
        let value = Expression::parse(input)?;
        input.expect_symbol(';')?;

        Ok(LetStmt {
            identifier,
            index,
            value,
        })
    }
}

impl Parse for IfStmt {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        input.expect_keyword(Keyword::If)?;
        input.expect_symbol('(')?;
        let condition = Expression::parse(input)?;
        input.expect_symbol(')')?;

        let then_branch = parse_block(input)?;
        let else_branch = if input.match_keyword(Keyword::Else) {
            parse_block(input)?
        } else {
            vec![]
        };

        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
        })
    }
}

impl Parse for WhileStmt {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        input.expect_keyword(Keyword::While)?;
        input.expect_symbol('(')?;
        let condition = Expression::parse(input)?;
        input.expect_symbol(')')?;
        let body = parse_block(input)?;

        Ok(WhileStmt { condition, body })
    }
}
