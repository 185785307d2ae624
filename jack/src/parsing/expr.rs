//! Expressions and terms.
use super::{delim::comma_separated, Parse, Parser};
use crate::{
    error::ParseError,
    tokens::{Keyword, TokenKind},
};
use smol_str::SmolStr;
use std::fmt;

/// Flat chain of terms joined by binary operators.
///
/// There is no operator precedence. Operators apply strictly left to
/// right, so `1 + 2 * 3` evaluates as `(1 + 2) * 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub primary: Term,
    pub secondaries: Vec<(BinaryOp, Term)>,
}

impl From<Term> for Expression {
    fn from(primary: Term) -> Self {
        Expression {
            primary,
            secondaries: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    IntConst(u16),
    StringConst(SmolStr),
    Null,
    This,
    True,
    False,
    /// Bare variable reference.
    Var(SmolStr),
    /// Array element access, `a[i]`.
    Index {
        identifier: SmolStr,
        index: Box<Expression>,
    },
    Paren(Box<Expression>),
    Unary {
        op: UnaryOp,
        operand: Box<Term>,
    },
    Call(SubroutineCall),
}

/// Call of a subroutine, with an optional class or variable prefix.
///
/// ```text
/// draw()          // implicit call on the current object
/// ball.move(1)    // method call on a variable
/// Math.max(a, b)  // function or constructor call on a class
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineCall {
    pub callee: Option<SmolStr>,
    pub identifier: SmolStr,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum BinaryOp {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    And,      // &
    Or,       // |
    Lesser,   // <
    Greater,  // >
    Equal,    // =
}

impl BinaryOp {
    #[rustfmt::skip]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            '&' => Some(Self::And),
            '|' => Some(Self::Or),
            '<' => Some(Self::Lesser),
            '>' => Some(Self::Greater),
            '=' => Some(Self::Equal),
            _   => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            Self::Add      => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide   => '/',
            Self::And      => '&',
            Self::Or       => '|',
            Self::Lesser   => '<',
            Self::Greater  => '>',
            Self::Equal    => '=',
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation, `-`
    Negate,
    /// Bitwise not, `~`
    Invert,
}

impl Parse for Expression {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        input.nested(|input| {
            let primary = Term::parse(input)?;
            let mut secondaries = vec![];

            while let Some(op) = peek_binary_op(input) {
                input.next_token();
                secondaries.push((op, Term::parse(input)?));
            }

            Ok(Expression {
                primary,
                secondaries,
            })
        })
    }
}

fn peek_binary_op(input: &Parser) -> Option<BinaryOp> {
    match input.peek_kind() {
        Some(TokenKind::Symbol(c)) => BinaryOp::from_symbol(*c),
        _ => None,
    }
}

impl Parse for Term {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        input.nested(parse_term)
    }
}

fn parse_term(input: &mut Parser) -> Result<Term, ParseError> {
    use Keyword as K;
    use TokenKind as T;

    let token = match input.peek() {
        Some(token) => token,
        None => {
            return Err(ParseError::EndOfSource {
                expected: "a term".to_owned(),
            })
        }
    };

    let term = match &token.kind {
        T::IntConst(value) => Term::IntConst(*value),
        T::StringConst(value) => Term::StringConst(value.clone()),
        T::Keyword(K::True) => Term::True,
        T::Keyword(K::False) => Term::False,
        T::Keyword(K::Null) => Term::Null,
        T::Keyword(K::This) => Term::This,
        T::Symbol('(') => {
            input.next_token();
            let expr = Expression::parse(input)?;
            input.expect_symbol(')')?;
            return Ok(Term::Paren(Box::new(expr)));
        }
        T::Symbol(c @ ('-' | '~')) => {
            let op = if *c == '-' {
                UnaryOp::Negate
            } else {
                UnaryOp::Invert
            };
            input.next_token();
            let operand = Term::parse(input)?;
            return Ok(Term::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        T::Ident(name) => {
            // One token of lookahead separates a call from a variable.
            return match input.peek_nth_kind(1) {
                Some(T::Symbol('(' | '.')) => SubroutineCall::parse(input).map(Term::Call),
                Some(T::Symbol('[')) => {
                    input.next_token();
                    input.next_token();
                    let index = Expression::parse(input)?;
                    input.expect_symbol(']')?;
                    Ok(Term::Index {
                        identifier: name.clone(),
                        index: Box::new(index),
                    })
                }
                _ => {
                    input.next_token();
                    Ok(Term::Var(name.clone()))
                }
            };
        }
        kind => {
            return Err(ParseError::ExpectedTerm {
                encountered: kind.to_string(),
                span: token.span,
            })
        }
    };

    // Single token terms.
    input.next_token();
    Ok(term)
}

impl Parse for SubroutineCall {
    type Output = Self;

    fn parse(input: &mut Parser) -> Result<Self, ParseError> {
        let name = input.expect_ident()?;
        let (callee, identifier) = if input.match_symbol('.') {
            (Some(name), input.expect_ident()?)
        } else {
            (None, name)
        };

        input.expect_symbol('(')?;
        let arguments = comma_separated::<Argument, _>(input, |span| {
            ParseError::ExpectedArgument { span }
        })?;
        input.expect_symbol(')')?;

        Ok(SubroutineCall {
            callee,
            identifier,
            arguments,
        })
    }
}

/// Call argument, for the delimited list.
struct Argument;

impl Parse for Argument {
    type Output = Option<Expression>;

    fn parse(input: &mut Parser) -> Result<Option<Expression>, ParseError> {
        if input.check_symbol(')') {
            Ok(None)
        } else {
            Expression::parse(input).map(Some)
        }
    }
}
